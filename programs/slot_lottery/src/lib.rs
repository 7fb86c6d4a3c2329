use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod projection;
pub mod randomness;
pub mod registry;
pub mod state;
pub mod utils;
pub mod instructions;

use instructions::*;

#[cfg(feature = "devnet")]
declare_id!("6HPg33RuPdqtxdPQafSUKKFTZoJpkT5hTFjAtqAeQksk");

#[cfg(not(feature = "devnet"))]
declare_id!("CgohREU2q5NewdyY5X1WocLJRUrzdTfx7K3HEb6kkDJu");

#[program]
pub mod slot_lottery {
    use super::*;

    pub fn init_config(ctx: Context<InitConfig>, args: InitConfigArgs) -> Result<()> {
        init_config::handler(ctx, args)
    }

    pub fn update_config(ctx: Context<UpdateConfig>, args: UpdateConfigArgs) -> Result<()> {
        update_config::handler(ctx, args)
    }

    /// Open a new 9-slot lottery and escrow its prize in the lottery's vault.
    pub fn create_lottery(
        ctx: Context<CreateLottery>,
        lottery_id: u64,
        prize_amount: u64,
        fee_amount: u64,
    ) -> Result<()> {
        create_lottery::handler(ctx, lottery_id, prize_amount, fee_amount)
    }

    /// Pay the fee for one open slot. Claiming the last open slot draws the winner.
    pub fn claim_slot(
        ctx: Context<ClaimSlot>,
        lottery_id: u64,
        slot_index: u64,
        payment: u64,
    ) -> Result<()> {
        claim_slot::handler(ctx, lottery_id, slot_index, payment)
    }

    /// Creator withdraws the accumulated entry fees of a settled lottery.
    pub fn collect_fee(ctx: Context<CollectFee>, lottery_id: u64) -> Result<()> {
        collect_fee::handler(ctx, lottery_id)
    }

    /// Winner withdraws the prize of a settled lottery. Once only.
    pub fn collect_prize(ctx: Context<CollectPrize>, lottery_id: u64) -> Result<()> {
        collect_prize::handler(ctx, lottery_id)
    }
}
