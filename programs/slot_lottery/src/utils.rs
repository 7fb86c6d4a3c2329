use anchor_lang::prelude::*;

use crate::errors::ErrorCode;

pub fn checked_add_u64(a: u64, b: u64) -> Result<u64> {
    a.checked_add(b).ok_or(ErrorCode::MathOverflow.into())
}

pub fn checked_sub_u64(a: u64, b: u64) -> Result<u64> {
    a.checked_sub(b).ok_or(ErrorCode::MathOverflow.into())
}

/// Move lamports out of an account owned by this program.
/// The system program cannot debit program-owned accounts, so balances are edited directly.
pub fn move_lamports(from: &AccountInfo, to: &AccountInfo, amount: u64) -> Result<()> {
    let from_balance = checked_sub_u64(from.lamports(), amount)?;
    let to_balance = checked_add_u64(to.lamports(), amount)?;

    **from.try_borrow_mut_lamports()? = from_balance;
    **to.try_borrow_mut_lamports()? = to_balance;
    Ok(())
}

/// Like `move_lamports`, but `from` must keep at least `reserve` afterwards.
pub fn move_lamports_above_reserve(
    from: &AccountInfo,
    to: &AccountInfo,
    amount: u64,
    reserve: u64,
) -> Result<()> {
    let remaining = checked_sub_u64(from.lamports(), amount)?;
    require!(remaining >= reserve, ErrorCode::BelowRentReserve);
    move_lamports(from, to, amount)
}

/// Render a raw base-unit amount as a decimal string, trailing zeros trimmed.
pub fn format_units(raw: u64, decimals: u8) -> String {
    if decimals == 0 {
        return raw.to_string();
    }
    let scale = 10u128.pow(decimals as u32);
    let raw = raw as u128;
    let whole = raw / scale;
    let frac = raw % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let frac_str = format!("{:0width$}", frac, width = decimals as usize);
    format!("{}.{}", whole, frac_str.trim_end_matches('0'))
}
