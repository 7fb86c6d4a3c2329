use anchor_lang::prelude::*;

use crate::{
    constants::SLOT_COUNT,
    errors::ErrorCode,
    randomness::{context_seed, RandomnessSource},
    utils::checked_add_u64,
};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LotteryStatus {
    Open = 0,
    Settled = 1,
}

#[account]
pub struct Config {
    pub admin: Pubkey,
    /// Token every new lottery's prize is funded in.
    pub prize_mint: Pubkey,
    /// Id handed to the next created lottery.
    pub lottery_count: u64,
    /// Blocks creation of new lotteries. Existing lotteries are unaffected.
    pub paused: bool,
    pub bump: u8,
    pub reserved: [u8; 30],
}

impl Config {
    pub const SPACE: usize = 8
        + 32 + 32
        + 8
        + 1
        + 1
        + 30;

    pub fn initialize(&mut self, admin: Pubkey, prize_mint: Pubkey, bump: u8) -> Result<()> {
        require!(prize_mint != Pubkey::default(), ErrorCode::InvalidPrizeMint);
        self.admin = admin;
        self.prize_mint = prize_mint;
        self.lottery_count = 0;
        self.paused = false;
        self.bump = bump;
        self.reserved = [0u8; 30];
        Ok(())
    }

    /// Only future lotteries see these changes.
    pub fn apply_update(&mut self, paused: Option<bool>, prize_mint: Option<Pubkey>) -> Result<()> {
        if let Some(v) = prize_mint {
            require!(v != Pubkey::default(), ErrorCode::InvalidPrizeMint);
            self.prize_mint = v;
        }
        if let Some(v) = paused {
            self.paused = v;
        }
        Ok(())
    }

    /// Gate for `create_lottery`; `funded` is the creator's prize token balance.
    pub fn check_new_lottery(
        &self,
        lottery_id: u64,
        prize_amount: u64,
        fee_amount: u64,
        funded: u64,
    ) -> Result<()> {
        require!(!self.paused, ErrorCode::Paused);
        require!(lottery_id == self.lottery_count, ErrorCode::LotteryIdMismatch);
        require!(prize_amount > 0 && fee_amount > 0, ErrorCode::InvalidAmount);
        require!(funded >= prize_amount, ErrorCode::InsufficientFunds);
        Ok(())
    }

    pub fn next_lottery_id(&mut self) -> Result<u64> {
        let id = self.lottery_count;
        self.lottery_count = checked_add_u64(id, 1)?;
        Ok(id)
    }
}

/// One lottery instance. Zero-copy; load through `AccountLoader<'info, Lottery>`.
///
/// Prize tokens sit in `vault_prize_ata` (owned by this PDA); entry fees are lamports
/// held on this account above its rent-exempt reserve.
#[account(zero_copy)]
#[repr(C)]
pub struct Lottery {
    pub lottery_id: u64,
    pub created_at: i64,
    pub settled_at: i64,

    pub fee_amount: u64,
    pub prize_amount: u64,
    pub prize_pool: u64,
    pub fee_balance: u64,
    pub fees_collected: u64,
    pub claim_sequence: u64,

    pub creator: [u8; 32],
    pub prize_mint: [u8; 32],
    pub vault_prize_ata: [u8; 32],
    pub winner: [u8; 32],
    pub randomness: [u8; 32],

    pub claimers: [[u8; 32]; SLOT_COUNT],
    pub slots: [u8; SLOT_COUNT],

    pub slot_count: u8,
    pub status: u8,
    pub winning_slot: u8,
    pub prize_claimed: u8,
    pub bump: u8,
    pub _padding: [u8; 2],

    pub reserved: [u8; 32],
}

pub struct NewLottery {
    pub lottery_id: u64,
    pub creator: Pubkey,
    pub prize_mint: Pubkey,
    pub vault_prize_ata: Pubkey,
    pub prize_amount: u64,
    pub fee_amount: u64,
    pub created_at: i64,
    pub bump: u8,
}

pub struct SlotClaim {
    pub lottery: Pubkey,
    pub claimer: Pubkey,
    pub slot_index: u64,
    pub payment: u64,
    pub now: i64,
}

/// Identity of a token account as the prize checks see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrizeAccount {
    pub key: Pubkey,
    pub owner: Pubkey,
    pub mint: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub winner: Pubkey,
    pub winning_slot: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimOutcome {
    pub slot_index: u8,
    /// Lamports the handler must move from the claimer to the lottery.
    pub fee_paid: u64,
    pub taken_slots: u8,
    pub settlement: Option<Settlement>,
}

impl Lottery {
    pub const SPACE: usize = 8 + core::mem::size_of::<Lottery>();

    pub fn init(&mut self, args: NewLottery) -> Result<()> {
        require!(
            args.prize_amount > 0 && args.fee_amount > 0,
            ErrorCode::InvalidAmount
        );

        self.lottery_id = args.lottery_id;
        self.created_at = args.created_at;
        self.settled_at = 0;
        self.fee_amount = args.fee_amount;
        self.prize_amount = args.prize_amount;
        self.prize_pool = args.prize_amount;
        self.fee_balance = 0;
        self.fees_collected = 0;
        self.claim_sequence = 0;
        self.creator = args.creator.to_bytes();
        self.prize_mint = args.prize_mint.to_bytes();
        self.vault_prize_ata = args.vault_prize_ata.to_bytes();
        self.winner = [0u8; 32];
        self.randomness = [0u8; 32];
        self.claimers = [[0u8; 32]; SLOT_COUNT];
        self.slots = [0u8; SLOT_COUNT];
        self.slot_count = SLOT_COUNT as u8;
        self.status = LotteryStatus::Open as u8;
        self.winning_slot = 0;
        self.prize_claimed = 0;
        self.bump = args.bump;
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.status == LotteryStatus::Open as u8
    }

    pub fn is_settled(&self) -> bool {
        self.status == LotteryStatus::Settled as u8
    }

    pub fn creator_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.creator)
    }

    pub fn prize_mint_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.prize_mint)
    }

    pub fn vault_pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.vault_prize_ata)
    }

    pub fn winner(&self) -> Option<Pubkey> {
        self.is_settled()
            .then(|| Pubkey::new_from_array(self.winner))
    }

    pub fn winning_slot(&self) -> Option<u8> {
        self.is_settled().then_some(self.winning_slot)
    }

    pub fn is_slot_taken(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|s| *s != 0)
    }

    pub fn claimer(&self, index: usize) -> Option<Pubkey> {
        if !self.is_slot_taken(index) {
            return None;
        }
        Some(Pubkey::new_from_array(self.claimers[index]))
    }

    pub fn taken_slots(&self) -> u8 {
        self.slots.iter().filter(|s| **s != 0).count() as u8
    }

    pub fn open_slots(&self) -> u8 {
        self.slot_count.saturating_sub(self.taken_slots())
    }

    pub fn is_prize_claimed(&self) -> bool {
        self.prize_claimed != 0
    }

    /// Record a paid claim on an open slot. When it fills the last open slot the winner is
    /// drawn in the same call; on any error nothing has been written.
    pub fn claim_slot<R: RandomnessSource + ?Sized>(
        &mut self,
        claim: &SlotClaim,
        rng: &mut R,
    ) -> Result<ClaimOutcome> {
        require!(self.is_open(), ErrorCode::LotteryClosed);
        require!(claim.slot_index < SLOT_COUNT as u64, ErrorCode::InvalidSlot);
        let index = claim.slot_index as usize;
        require!(!self.is_slot_taken(index), ErrorCode::SlotTaken);
        require!(claim.payment == self.fee_amount, ErrorCode::WrongFeeAmount);

        let fee_balance = checked_add_u64(self.fee_balance, claim.payment)?;
        let claim_sequence = checked_add_u64(self.claim_sequence, 1)?;
        let taken_after = self.taken_slots() + 1;

        let draw = if taken_after as usize == SLOT_COUNT {
            let seed = context_seed(&claim.lottery, self.lottery_id, claim_sequence);
            let drawn = rng.draw_uniform(SLOT_COUNT as u64, &seed)?;
            require!(drawn < SLOT_COUNT as u64, ErrorCode::InvalidRandomness);
            Some((drawn as u8, rng.last_digest()))
        } else {
            None
        };

        self.slots[index] = 1;
        self.claimers[index] = claim.claimer.to_bytes();
        self.fee_balance = fee_balance;
        self.claim_sequence = claim_sequence;

        let mut settlement = None;
        if let Some((winning_slot, digest)) = draw {
            self.winning_slot = winning_slot;
            self.winner = self.claimers[winning_slot as usize];
            self.randomness = digest;
            self.settled_at = claim.now;
            self.status = LotteryStatus::Settled as u8;

            settlement = Some(Settlement {
                winner: Pubkey::new_from_array(self.winner),
                winning_slot,
            });
        }

        Ok(ClaimOutcome {
            slot_index: index as u8,
            fee_paid: claim.payment,
            taken_slots: taken_after,
            settlement,
        })
    }

    /// Zero the fee balance for the creator and return the amount to pay out.
    pub fn collect_fee(&mut self, caller: &Pubkey) -> Result<u64> {
        require!(self.is_settled(), ErrorCode::LotteryNotSettled);
        require!(caller.to_bytes() == self.creator, ErrorCode::Unauthorized);
        require!(self.fee_balance > 0, ErrorCode::NothingToCollect);

        let amount = self.fee_balance;
        self.fees_collected = checked_add_u64(self.fees_collected, amount)?;
        self.fee_balance = 0;
        Ok(amount)
    }

    /// The vault must be the one recorded at creation, owned by this lottery and in the prize
    /// mint; the payout account must hold the same mint.
    pub fn check_prize_accounts(
        &self,
        lottery: &Pubkey,
        vault: &PrizeAccount,
        payout_mint: &Pubkey,
    ) -> Result<()> {
        let prize_mint = self.prize_mint_pubkey();
        require_keys_eq!(vault.key, self.vault_pubkey(), ErrorCode::InvalidVault);
        require_keys_eq!(vault.owner, *lottery, ErrorCode::InvalidVault);
        require_keys_eq!(vault.mint, prize_mint, ErrorCode::InvalidVault);
        require_keys_eq!(*payout_mint, prize_mint, ErrorCode::InvalidTokenAccount);
        Ok(())
    }

    /// Zero the prize pool for the winner and return the amount to pay out.
    pub fn collect_prize(&mut self, caller: &Pubkey) -> Result<u64> {
        require!(self.is_settled(), ErrorCode::LotteryNotSettled);
        require!(caller.to_bytes() == self.winner, ErrorCode::Unauthorized);
        require!(!self.is_prize_claimed(), ErrorCode::AlreadyClaimed);

        let amount = self.prize_pool;
        self.prize_pool = 0;
        self.prize_claimed = 1;
        Ok(amount)
    }
}
