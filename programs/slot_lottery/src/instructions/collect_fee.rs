use anchor_lang::prelude::*;

use crate::{
    constants::*,
    events::FeeCollected,
    state::Lottery,
    utils::move_lamports_above_reserve,
};

#[derive(Accounts)]
#[instruction(lottery_id: u64)]
pub struct CollectFee<'info> {
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(
        mut,
        seeds = [SEED_LOTTERY, &lottery_id.to_le_bytes()],
        bump,
    )]
    pub lottery: AccountLoader<'info, Lottery>,
}

pub fn handler(ctx: Context<CollectFee>, lottery_id: u64) -> Result<()> {
    let creator = ctx.accounts.creator.key();

    let amount = {
        let mut lottery = ctx.accounts.lottery.load_mut()?;
        lottery.collect_fee(&creator)?
    };

    let lottery_info = ctx.accounts.lottery.to_account_info();
    let reserve = Rent::get()?.minimum_balance(lottery_info.data_len());
    move_lamports_above_reserve(
        &lottery_info,
        &ctx.accounts.creator.to_account_info(),
        amount,
        reserve,
    )?;

    emit!(FeeCollected {
        lottery: ctx.accounts.lottery.key(),
        lottery_id,
        creator,
        amount,
    });

    Ok(())
}
