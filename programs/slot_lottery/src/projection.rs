//! Read-only view of a lottery for listing and detail pages.
//!
//! Everything here is derived from `Lottery` state on demand and never written back.

use anchor_lang::prelude::*;

use crate::{
    constants::{BPS_DENOMINATOR, DEFAULT_DECIMALS},
    state::Lottery,
    utils::format_units,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotteryView {
    pub lottery: Pubkey,
    pub lottery_id: u64,
    pub is_active: bool,
    pub slot_count: u8,
    pub slots: Vec<bool>,
    pub taken_slots: u8,
    pub winning_slot: Option<u8>,
    pub winner: Option<Pubkey>,
    pub settled_at: Option<i64>,
    pub creator: Pubkey,
    pub prize_mint: Pubkey,
    pub prize_amount: u64,
    pub prize_remaining: u64,
    pub fee_remaining: u64,
    pub prize_claimed: bool,
    pub fee_per_slot: u64,
    pub created_at: i64,
}

impl LotteryView {
    pub fn from_account(lottery: Pubkey, state: &Lottery) -> Self {
        let slots: Vec<bool> = state.slots.iter().map(|s| *s != 0).collect();
        let winner = state.winner();

        Self {
            lottery,
            lottery_id: state.lottery_id,
            is_active: winner.is_none(),
            slot_count: state.slot_count,
            taken_slots: state.taken_slots(),
            slots,
            winning_slot: state.winning_slot(),
            winner,
            settled_at: state.is_settled().then_some(state.settled_at),
            creator: state.creator_pubkey(),
            prize_mint: state.prize_mint_pubkey(),
            prize_amount: state.prize_amount,
            prize_remaining: state.prize_pool,
            fee_remaining: state.fee_balance,
            prize_claimed: state.is_prize_claimed(),
            fee_per_slot: state.fee_amount,
            created_at: state.created_at,
        }
    }

    pub fn open_slots(&self) -> u8 {
        self.slot_count.saturating_sub(self.taken_slots)
    }

    /// Indices still available to claim.
    pub fn available_slots(&self) -> Vec<u8> {
        if !self.is_active {
            return Vec::new();
        }
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, taken)| !**taken)
            .map(|(i, _)| i as u8)
            .collect()
    }

    /// Denominator `n` of the `1 / n` chance a claim on an open slot has right now.
    pub fn odds(&self) -> Option<u8> {
        let open = self.open_slots();
        (self.is_active && open > 0).then_some(open)
    }

    /// Same chance in basis points, rounded down.
    pub fn win_chance_bps(&self) -> Option<u64> {
        self.odds().map(|open| BPS_DENOMINATOR / open as u64)
    }

    pub fn is_winner(&self, who: &Pubkey) -> bool {
        self.winner.as_ref() == Some(who)
    }

    pub fn can_collect_fee(&self, who: &Pubkey) -> bool {
        !self.is_active && self.creator == *who && self.fee_remaining > 0
    }

    pub fn can_collect_prize(&self, who: &Pubkey) -> bool {
        self.is_winner(who) && !self.prize_claimed
    }

    pub fn fee_display(&self) -> String {
        format_units(self.fee_per_slot, DEFAULT_DECIMALS)
    }

    pub fn prize_display(&self, decimals: u8) -> String {
        format_units(self.prize_remaining, decimals)
    }

    pub fn fee_remaining_display(&self) -> String {
        format_units(self.fee_remaining, DEFAULT_DECIMALS)
    }
}
