use anchor_lang::prelude::*;

use crate::{constants::*, errors::ErrorCode, state::Config};

/// Only future lotteries see these changes; existing ones keep the mint they were funded in.
#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct UpdateConfigArgs {
    pub paused: Option<bool>,
    pub prize_mint: Option<Pubkey>,
}

#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [SEED_CFG],
        bump = config.bump,
        constraint = config.admin == admin.key() @ ErrorCode::Unauthorized,
    )]
    pub config: Account<'info, Config>,
}

pub fn handler(ctx: Context<UpdateConfig>, args: UpdateConfigArgs) -> Result<()> {
    ctx.accounts.config.apply_update(args.paused, args.prize_mint)
}
