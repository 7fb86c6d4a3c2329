pub const SLOT_COUNT: usize = 9;

pub const SEED_CFG: &[u8] = b"cfg";
pub const SEED_LOTTERY: &[u8] = b"lottery";

/// Domain tag mixed into every settlement draw.
pub const DRAW_DOMAIN: &[u8] = b"slot-lottery/draw/v1";

/// SlotHashes sysvar layout: u64 entry count, then (u64 slot, [u8; 32] hash) newest first.
pub const SLOT_HASHES_LEN_PREFIX: usize = 8;
pub const SLOT_HASH_ENTRY_LEN: usize = 8 + 32;

/// Basis-point denominator used by display odds.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Decimals of both the native fee asset and the default prize token.
pub const DEFAULT_DECIMALS: u8 = 9;
