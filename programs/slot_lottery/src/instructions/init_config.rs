use anchor_lang::prelude::*;

use crate::{constants::*, state::Config};

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct InitConfigArgs {
    pub prize_mint: Pubkey,
}

#[derive(Accounts)]
pub struct InitConfig<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    pub admin: Signer<'info>,

    #[account(
        init,
        payer = payer,
        space = Config::SPACE,
        seeds = [SEED_CFG],
        bump
    )]
    pub config: Account<'info, Config>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitConfig>, args: InitConfigArgs) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    let bump = ctx.bumps.config;
    ctx.accounts.config.initialize(admin, args.prize_mint, bump)
}
