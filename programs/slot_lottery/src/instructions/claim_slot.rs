use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    instruction::get_stack_height,
    sysvar::{instructions::ID as SYSVAR_INSTRUCTIONS_ID, slot_hashes},
};
use anchor_lang::system_program::{self, Transfer};

use crate::{
    constants::*,
    events::{LotterySettled, SlotClaimed},
    randomness::{has_trailing_instruction, CallContext, SlotHashesSource},
    state::{Lottery, SlotClaim},
};

#[derive(Accounts)]
#[instruction(lottery_id: u64)]
pub struct ClaimSlot<'info> {
    #[account(mut)]
    pub claimer: Signer<'info>,

    #[account(
        mut,
        seeds = [SEED_LOTTERY, &lottery_id.to_le_bytes()],
        bump,
    )]
    pub lottery: AccountLoader<'info, Lottery>,

    /// CHECK: address-checked SlotHashes sysvar, read raw because it is too large to deserialize.
    #[account(address = slot_hashes::ID)]
    pub slot_hashes: UncheckedAccount<'info>,

    /// CHECK: address-checked instructions sysvar.
    #[account(address = SYSVAR_INSTRUCTIONS_ID)]
    pub instructions: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<ClaimSlot>,
    lottery_id: u64,
    slot_index: u64,
    payment: u64,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let claimer = ctx.accounts.claimer.key();
    let lottery_key = ctx.accounts.lottery.key();

    // Only consulted if this claim settles the lottery.
    let call = CallContext {
        stack_height: get_stack_height(),
        trailing_instructions: has_trailing_instruction(&ctx.accounts.instructions)?,
    };

    let outcome = {
        let slot_hashes_data = ctx.accounts.slot_hashes.try_borrow_data()?;
        let mut source = SlotHashesSource::new(&slot_hashes_data, call);

        let claim = SlotClaim {
            lottery: lottery_key,
            claimer,
            slot_index,
            payment,
            now,
        };
        let mut lottery = ctx.accounts.lottery.load_mut()?;
        lottery.claim_slot(&claim, &mut source)?
    };

    // Fee lamports sit on the lottery PDA until the creator collects them.
    system_program::transfer(
        CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            Transfer {
                from: ctx.accounts.claimer.to_account_info(),
                to: ctx.accounts.lottery.to_account_info(),
            },
        ),
        outcome.fee_paid,
    )?;

    emit!(SlotClaimed {
        lottery: lottery_key,
        lottery_id,
        claimer,
        slot_index: outcome.slot_index,
        fee_paid: outcome.fee_paid,
        taken_slots: outcome.taken_slots,
        timestamp: now,
    });

    if let Some(settlement) = outcome.settlement {
        msg!(
            "lottery {} settled: slot {} wins",
            lottery_id,
            settlement.winning_slot
        );
        emit!(LotterySettled {
            lottery: lottery_key,
            lottery_id,
            winner: settlement.winner,
            winning_slot: settlement.winning_slot,
            timestamp: now,
        });
    }

    Ok(())
}
