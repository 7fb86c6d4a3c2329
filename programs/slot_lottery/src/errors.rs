use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Prize and fee amounts must be greater than zero")]
    InvalidAmount,
    #[msg("Creator cannot fund the prize amount")]
    InsufficientFunds,
    #[msg("Slot index is out of range")]
    InvalidSlot,
    #[msg("Slot is already taken")]
    SlotTaken,
    #[msg("Payment must equal the lottery fee exactly")]
    WrongFeeAmount,
    #[msg("Lottery is closed")]
    LotteryClosed,
    #[msg("Lottery is not settled")]
    LotteryNotSettled,
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Nothing to collect")]
    NothingToCollect,
    #[msg("Prize already claimed")]
    AlreadyClaimed,
    #[msg("Lottery creation is paused")]
    Paused,
    #[msg("Lottery id does not match the next id in config")]
    LotteryIdMismatch,
    #[msg("Prize mint does not match config")]
    InvalidPrizeMint,
    #[msg("Invalid token account")]
    InvalidTokenAccount,
    #[msg("Invalid prize vault")]
    InvalidVault,
    #[msg("Randomness source unavailable")]
    RandomnessUnavailable,
    #[msg("Randomness source returned a value out of range")]
    InvalidRandomness,
    #[msg("The settling claim cannot be invoked through another program")]
    CpiNotAllowed,
    #[msg("The settling claim must be the last instruction in its transaction")]
    TrailingInstruction,
    #[msg("Withdrawal would dip into the rent-exempt reserve")]
    BelowRentReserve,
    #[msg("Math overflow")]
    MathOverflow,
}
