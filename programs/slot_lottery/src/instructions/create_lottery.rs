use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::{
    constants::*,
    errors::ErrorCode,
    events::LotteryCreated,
    state::{Config, Lottery, NewLottery},
};

#[derive(Accounts)]
#[instruction(lottery_id: u64)]
pub struct CreateLottery<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(mut, seeds = [SEED_CFG], bump = config.bump)]
    pub config: Account<'info, Config>,

    #[account(
        init,
        payer = creator,
        space = Lottery::SPACE,
        seeds = [SEED_LOTTERY, &lottery_id.to_le_bytes()],
        bump
    )]
    pub lottery: AccountLoader<'info, Lottery>,

    #[account(address = config.prize_mint @ ErrorCode::InvalidPrizeMint)]
    pub prize_mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = creator_prize_ata.mint == prize_mint.key() @ ErrorCode::InvalidTokenAccount,
        constraint = creator_prize_ata.owner == creator.key() @ ErrorCode::InvalidTokenAccount,
    )]
    pub creator_prize_ata: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = creator,
        associated_token::mint = prize_mint,
        associated_token::authority = lottery,
    )]
    pub vault_prize_ata: Account<'info, TokenAccount>,

    pub associated_token_program: Program<'info, AssociatedToken>,
    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<CreateLottery>,
    lottery_id: u64,
    prize_amount: u64,
    fee_amount: u64,
) -> Result<()> {
    ctx.accounts.config.check_new_lottery(
        lottery_id,
        prize_amount,
        fee_amount,
        ctx.accounts.creator_prize_ata.amount,
    )?;

    let now = Clock::get()?.unix_timestamp;
    let creator = ctx.accounts.creator.key();
    let lottery_key = ctx.accounts.lottery.key();
    let prize_mint = ctx.accounts.prize_mint.key();

    let mut lottery = ctx.accounts.lottery.load_init()?;
    lottery.init(NewLottery {
        lottery_id,
        creator,
        prize_mint,
        vault_prize_ata: ctx.accounts.vault_prize_ata.key(),
        prize_amount,
        fee_amount,
        created_at: now,
        bump: ctx.bumps.lottery,
    })?;
    drop(lottery);

    ctx.accounts.config.next_lottery_id()?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.creator_prize_ata.to_account_info(),
                to: ctx.accounts.vault_prize_ata.to_account_info(),
                authority: ctx.accounts.creator.to_account_info(),
            },
        ),
        prize_amount,
    )?;

    emit!(LotteryCreated {
        lottery: lottery_key,
        lottery_id,
        creator,
        prize_mint,
        fee_amount,
        prize_amount,
        timestamp: now,
    });

    Ok(())
}
