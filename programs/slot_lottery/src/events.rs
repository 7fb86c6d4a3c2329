use anchor_lang::prelude::*;

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotteryCreated {
    pub lottery: Pubkey,
    pub lottery_id: u64,
    pub creator: Pubkey,
    pub prize_mint: Pubkey,
    pub fee_amount: u64,
    pub prize_amount: u64,
    pub timestamp: i64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotClaimed {
    pub lottery: Pubkey,
    pub lottery_id: u64,
    pub claimer: Pubkey,
    pub slot_index: u8,
    pub fee_paid: u64,
    pub taken_slots: u8,
    pub timestamp: i64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotterySettled {
    pub lottery: Pubkey,
    pub lottery_id: u64,
    pub winner: Pubkey,
    pub winning_slot: u8,
    pub timestamp: i64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeCollected {
    pub lottery: Pubkey,
    pub lottery_id: u64,
    pub creator: Pubkey,
    pub amount: u64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrizeCollected {
    pub lottery: Pubkey,
    pub lottery_id: u64,
    pub winner: Pubkey,
    pub amount: u64,
}
