use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::{
    constants::*,
    errors::ErrorCode,
    events::PrizeCollected,
    state::{Lottery, PrizeAccount},
};

#[derive(Accounts)]
#[instruction(lottery_id: u64)]
pub struct CollectPrize<'info> {
    #[account(mut)]
    pub winner: Signer<'info>,

    #[account(
        mut,
        seeds = [SEED_LOTTERY, &lottery_id.to_le_bytes()],
        bump,
    )]
    pub lottery: AccountLoader<'info, Lottery>,

    /// Prize vault owned by the lottery PDA, verified against lottery state in the handler.
    #[account(mut)]
    pub vault_prize_ata: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = winner_prize_ata.owner == winner.key() @ ErrorCode::InvalidTokenAccount,
    )]
    pub winner_prize_ata: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<CollectPrize>, lottery_id: u64) -> Result<()> {
    let winner = ctx.accounts.winner.key();
    let lottery_key = ctx.accounts.lottery.key();

    let (amount, lottery_bump) = {
        let mut lottery = ctx.accounts.lottery.load_mut()?;
        let amount = lottery.collect_prize(&winner)?;

        let vault = &ctx.accounts.vault_prize_ata;
        lottery.check_prize_accounts(
            &lottery_key,
            &PrizeAccount {
                key: vault.key(),
                owner: vault.owner,
                mint: vault.mint,
            },
            &ctx.accounts.winner_prize_ata.mint,
        )?;

        (amount, lottery.bump)
    };

    let lottery_id_le = lottery_id.to_le_bytes();
    let signer_seeds: &[&[u8]] = &[SEED_LOTTERY, &lottery_id_le, &[lottery_bump]];

    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.vault_prize_ata.to_account_info(),
                to: ctx.accounts.winner_prize_ata.to_account_info(),
                authority: ctx.accounts.lottery.to_account_info(),
            },
            &[signer_seeds],
        ),
        amount,
    )?;

    emit!(PrizeCollected {
        lottery: lottery_key,
        lottery_id,
        winner,
        amount,
    });

    Ok(())
}
