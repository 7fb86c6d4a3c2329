//! Listing index rebuilt from program events.
//!
//! The index is a cache: `reconcile` overwrites an entry with the lottery's account state,
//! which always wins over what the event log implied.

use std::collections::HashMap;

use anchor_lang::prelude::*;
use anchor_lang::Discriminator;

use crate::{
    events::{FeeCollected, LotteryCreated, LotterySettled, PrizeCollected, SlotClaimed},
    projection::LotteryView,
};

/// Upper bound on settlements held while their creation event is missing.
pub const MAX_PENDING_SETTLEMENTS: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LotteryEvent {
    Created(LotteryCreated),
    SlotClaimed(SlotClaimed),
    Settled(LotterySettled),
    FeeCollected(FeeCollected),
    PrizeCollected(PrizeCollected),
}

fn decode_body<T: AnchorDeserialize>(body: &[u8]) -> Result<T> {
    T::try_from_slice(body).map_err(|_| ProgramError::InvalidAccountData.into())
}

impl LotteryEvent {
    /// Decode `discriminator ‖ borsh` bytes as written by `emit!`.
    /// Events of other programs or types yield `Ok(None)`.
    pub fn decode(data: &[u8]) -> Result<Option<Self>> {
        let event = if let Some(body) = data.strip_prefix(LotteryCreated::DISCRIMINATOR) {
            Self::Created(decode_body(body)?)
        } else if let Some(body) = data.strip_prefix(SlotClaimed::DISCRIMINATOR) {
            Self::SlotClaimed(decode_body(body)?)
        } else if let Some(body) = data.strip_prefix(LotterySettled::DISCRIMINATOR) {
            Self::Settled(decode_body(body)?)
        } else if let Some(body) = data.strip_prefix(FeeCollected::DISCRIMINATOR) {
            Self::FeeCollected(decode_body(body)?)
        } else if let Some(body) = data.strip_prefix(PrizeCollected::DISCRIMINATOR) {
            Self::PrizeCollected(decode_body(body)?)
        } else {
            return Ok(None);
        };
        Ok(Some(event))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub lottery: Pubkey,
    pub lottery_id: u64,
    pub creator: Pubkey,
    pub prize_mint: Pubkey,
    pub fee_amount: u64,
    pub prize_amount: u64,
    pub created_at: i64,
    pub taken_slots: u8,
    pub winner: Option<Pubkey>,
    pub winning_slot: Option<u8>,
    pub settled_at: Option<i64>,
    pub fee_collected: bool,
    pub prize_claimed: bool,
}

impl RegistryEntry {
    fn from_created(ev: &LotteryCreated) -> Self {
        Self {
            lottery: ev.lottery,
            lottery_id: ev.lottery_id,
            creator: ev.creator,
            prize_mint: ev.prize_mint,
            fee_amount: ev.fee_amount,
            prize_amount: ev.prize_amount,
            created_at: ev.timestamp,
            taken_slots: 0,
            winner: None,
            winning_slot: None,
            settled_at: None,
            fee_collected: false,
            prize_claimed: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.winner.is_none()
    }

    fn settle(&mut self, ev: &LotterySettled) {
        if self.winner.is_none() {
            self.winner = Some(ev.winner);
            self.winning_slot = Some(ev.winning_slot);
            self.settled_at = Some(ev.timestamp);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    All,
    Active,
    Ended,
}

impl Listing {
    fn admits(self, entry: &RegistryEntry) -> bool {
        match self {
            Listing::All => true,
            Listing::Active => entry.is_active(),
            Listing::Ended => !entry.is_active(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub entries: Vec<RegistryEntry>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

impl Page {
    pub fn page_count(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }
}

#[derive(Debug, Default)]
pub struct LotteryRegistry {
    entries: HashMap<Pubkey, RegistryEntry>,
    /// Settlements seen before the matching creation.
    pending_settlements: HashMap<Pubkey, LotterySettled>,
}

impl LotteryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, lottery: &Pubkey) -> Option<&RegistryEntry> {
        self.entries.get(lottery)
    }

    /// Decode and apply one event payload. Returns whether the index changed.
    pub fn ingest(&mut self, data: &[u8]) -> Result<bool> {
        Ok(match LotteryEvent::decode(data)? {
            Some(event) => self.apply(&event),
            None => false,
        })
    }

    /// Apply one event. Replays and duplicates are no-ops.
    pub fn apply(&mut self, event: &LotteryEvent) -> bool {
        match event {
            LotteryEvent::Created(ev) => {
                if self.entries.contains_key(&ev.lottery) {
                    return false;
                }
                let mut entry = RegistryEntry::from_created(ev);
                if let Some(settled) = self.pending_settlements.remove(&ev.lottery) {
                    entry.settle(&settled);
                }
                self.entries.insert(ev.lottery, entry);
                true
            }
            LotteryEvent::SlotClaimed(ev) => match self.entries.get_mut(&ev.lottery) {
                Some(entry) if ev.taken_slots > entry.taken_slots => {
                    entry.taken_slots = ev.taken_slots;
                    true
                }
                _ => false,
            },
            LotteryEvent::Settled(ev) => match self.entries.get_mut(&ev.lottery) {
                Some(entry) => {
                    let changed = entry.winner.is_none();
                    entry.settle(ev);
                    changed
                }
                None => {
                    self.hold_settlement(ev);
                    false
                }
            },
            LotteryEvent::FeeCollected(ev) => match self.entries.get_mut(&ev.lottery) {
                Some(entry) if !entry.fee_collected => {
                    entry.fee_collected = true;
                    true
                }
                _ => false,
            },
            LotteryEvent::PrizeCollected(ev) => match self.entries.get_mut(&ev.lottery) {
                Some(entry) if !entry.prize_claimed => {
                    entry.prize_claimed = true;
                    true
                }
                _ => false,
            },
        }
    }

    /// Overwrite (or insert) an entry from account state.
    pub fn reconcile(&mut self, view: &LotteryView) {
        let entry = self
            .entries
            .entry(view.lottery)
            .or_insert_with(|| RegistryEntry {
                lottery: view.lottery,
                lottery_id: view.lottery_id,
                creator: view.creator,
                prize_mint: view.prize_mint,
                fee_amount: view.fee_per_slot,
                prize_amount: view.prize_amount,
                created_at: view.created_at,
                taken_slots: 0,
                winner: None,
                winning_slot: None,
                settled_at: None,
                fee_collected: false,
                prize_claimed: false,
            });

        entry.lottery_id = view.lottery_id;
        entry.creator = view.creator;
        entry.prize_mint = view.prize_mint;
        entry.fee_amount = view.fee_per_slot;
        entry.prize_amount = view.prize_amount;
        entry.created_at = view.created_at;
        entry.taken_slots = view.taken_slots;
        entry.winner = view.winner;
        entry.winning_slot = view.winning_slot;
        entry.settled_at = view.settled_at;
        entry.fee_collected = !view.is_active && view.fee_remaining == 0;
        entry.prize_claimed = view.prize_claimed;
        self.pending_settlements.remove(&view.lottery);
    }

    pub fn pending_settlements(&self) -> usize {
        self.pending_settlements.len()
    }

    /// Buffer an orphan settlement; when full, the oldest one is evicted.
    fn hold_settlement(&mut self, ev: &LotterySettled) {
        if !self.pending_settlements.contains_key(&ev.lottery)
            && self.pending_settlements.len() >= MAX_PENDING_SETTLEMENTS
        {
            let oldest = self
                .pending_settlements
                .values()
                .min_by_key(|s| (s.timestamp, s.lottery))
                .map(|s| s.lottery);
            if let Some(oldest) = oldest {
                self.pending_settlements.remove(&oldest);
            }
        }
        self.pending_settlements.insert(ev.lottery, ev.clone());
    }

    /// One 1-based page, newest lottery first. Page 0 is treated as page 1.
    pub fn page(&self, page: usize, page_size: usize, listing: Listing) -> Page {
        let mut matching: Vec<&RegistryEntry> = self
            .entries
            .values()
            .filter(|e| listing.admits(e))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.lottery_id.cmp(&a.lottery_id))
                .then(b.lottery.cmp(&a.lottery))
        });

        let page = page.max(1);
        let total = matching.len();
        let start = (page - 1).saturating_mul(page_size).min(total);
        let end = start.saturating_add(page_size).min(total);

        Page {
            entries: matching[start..end].iter().map(|e| (*e).clone()).collect(),
            total,
            page,
            page_size,
        }
    }
}
