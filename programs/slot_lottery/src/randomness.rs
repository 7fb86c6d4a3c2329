use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    instruction::TRANSACTION_LEVEL_STACK_HEIGHT,
    sysvar::instructions::{load_current_index_checked, load_instruction_at_checked},
};

use crate::{
    constants::{DRAW_DOMAIN, SLOT_HASHES_LEN_PREFIX, SLOT_HASH_ENTRY_LEN},
    errors::ErrorCode,
};

/// Supplies the settlement draw. Queried exactly once per lottery, inside the claim that
/// fills the last open slot.
pub trait RandomnessSource {
    /// Return a value uniform over `[0, bound)` bound to `context_seed`.
    fn draw_uniform(&mut self, bound: u64, context_seed: &[u8; 32]) -> Result<u64>;

    /// Digest behind the most recent draw, kept on the lottery for audit.
    fn last_digest(&self) -> [u8; 32];
}

/// Per-instance, per-call seed. Nothing in it is chosen by the claimer, so a settling claim
/// cannot be re-keyed offline to move the result.
pub fn context_seed(lottery: &Pubkey, lottery_id: u64, claim_sequence: u64) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(DRAW_DOMAIN);
    hasher.update(lottery.as_ref());
    hasher.update(&lottery_id.to_le_bytes());
    hasher.update(&claim_sequence.to_le_bytes());
    *hasher.finalize().as_bytes()
}

/// Reduce a 32-byte digest to `[0, bound)`. Uses 128 bits so the modulo bias is at most
/// `bound / 2^128`.
pub fn uniform_from_digest(digest: &[u8; 32], bound: u64) -> Result<u64> {
    require!(bound > 0, ErrorCode::InvalidRandomness);
    let mut bytes16 = [0u8; 16];
    bytes16.copy_from_slice(&digest[..16]);
    let r = u128::from_le_bytes(bytes16);
    Ok((r % bound as u128) as u64)
}

/// Where the settling claim sits in its transaction.
///
/// The outcome is written in the same instruction that draws it, so whoever observes it
/// within the transaction could revert a losing draw. A draw is only taken when no caller
/// program wraps the claim and no later instruction can read the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub stack_height: usize,
    pub trailing_instructions: bool,
}

impl CallContext {
    pub fn check(&self) -> Result<()> {
        require!(
            self.stack_height == TRANSACTION_LEVEL_STACK_HEIGHT,
            ErrorCode::CpiNotAllowed
        );
        require!(!self.trailing_instructions, ErrorCode::TrailingInstruction);
        Ok(())
    }
}

/// Whether the instructions sysvar lists anything after the executing instruction.
pub fn has_trailing_instruction(instructions: &AccountInfo) -> Result<bool> {
    let current = load_current_index_checked(instructions)?;
    Ok(load_instruction_at_checked(current as usize + 1, instructions).is_ok())
}

/// Host-provided entropy: the newest entry of the SlotHashes sysvar mixed with the
/// context seed. Refuses to draw outside an isolated top-level call.
pub struct SlotHashesSource<'a> {
    data: &'a [u8],
    call: CallContext,
    last_digest: [u8; 32],
}

impl<'a> SlotHashesSource<'a> {
    pub fn new(data: &'a [u8], call: CallContext) -> Self {
        Self {
            data,
            call,
            last_digest: [0u8; 32],
        }
    }

    fn most_recent(&self) -> Result<(u64, [u8; 32])> {
        let len_bytes = self
            .data
            .get(..SLOT_HASHES_LEN_PREFIX)
            .ok_or(ErrorCode::RandomnessUnavailable)?;
        let mut len_le = [0u8; 8];
        len_le.copy_from_slice(len_bytes);
        require!(u64::from_le_bytes(len_le) > 0, ErrorCode::RandomnessUnavailable);

        let entry = self
            .data
            .get(SLOT_HASHES_LEN_PREFIX..SLOT_HASHES_LEN_PREFIX + SLOT_HASH_ENTRY_LEN)
            .ok_or(ErrorCode::RandomnessUnavailable)?;
        let mut slot_le = [0u8; 8];
        slot_le.copy_from_slice(&entry[..8]);
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&entry[8..]);
        require!(hash != [0u8; 32], ErrorCode::RandomnessUnavailable);

        Ok((u64::from_le_bytes(slot_le), hash))
    }
}

impl RandomnessSource for SlotHashesSource<'_> {
    fn draw_uniform(&mut self, bound: u64, context_seed: &[u8; 32]) -> Result<u64> {
        self.call.check()?;
        let (slot, hash) = self.most_recent()?;

        let mut hasher = blake3::Hasher::new();
        hasher.update(context_seed);
        hasher.update(&hash);
        hasher.update(&slot.to_le_bytes());
        let digest = *hasher.finalize().as_bytes();

        self.last_digest = digest;
        uniform_from_digest(&digest, bound)
    }

    fn last_digest(&self) -> [u8; 32] {
        self.last_digest
    }
}

/// Deterministic source for tests: replays a fixed sequence and records every seed it saw.
#[cfg(test)]
pub struct FixedSequence {
    pub values: Vec<u64>,
    pub seeds: Vec<[u8; 32]>,
}

#[cfg(test)]
impl FixedSequence {
    pub fn new(values: &[u64]) -> Self {
        Self {
            values: values.to_vec(),
            seeds: Vec::new(),
        }
    }
}

#[cfg(test)]
impl RandomnessSource for FixedSequence {
    fn draw_uniform(&mut self, _bound: u64, context_seed: &[u8; 32]) -> Result<u64> {
        self.seeds.push(*context_seed);
        let idx = self.seeds.len() - 1;
        self.values
            .get(idx)
            .copied()
            .ok_or(ErrorCode::RandomnessUnavailable.into())
    }

    fn last_digest(&self) -> [u8; 32] {
        self.seeds.last().copied().unwrap_or_default()
    }
}

/// Top-level, last-in-transaction call.
#[cfg(test)]
pub fn isolated_call() -> CallContext {
    CallContext {
        stack_height: TRANSACTION_LEVEL_STACK_HEIGHT,
        trailing_instructions: false,
    }
}

/// Build SlotHashes sysvar bytes with a single entry.
#[cfg(test)]
pub fn slot_hashes_fixture(slot: u64, hash: [u8; 32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(SLOT_HASHES_LEN_PREFIX + SLOT_HASH_ENTRY_LEN);
    data.extend_from_slice(&1u64.to_le_bytes());
    data.extend_from_slice(&slot.to_le_bytes());
    data.extend_from_slice(&hash);
    data
}
