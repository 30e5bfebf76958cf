//! Fixed-precision invoice amounts
//!
//! Amounts are stored as `NUMERIC(10,2)`: two fractional digits, at most
//! eight integral digits. Both stores normalize through [`normalize_amount`]
//! so a body of `{"amt": 100}` always comes back as `"100.00"`.

use crate::core::error::{BizTimeError, Result};
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits kept for an amount
pub const AMOUNT_SCALE: u32 = 2;

/// Number of integral digits allowed before the column overflows
pub const AMOUNT_INTEGER_DIGITS: u32 = 8;

/// Round to two places (half away from zero, as PostgreSQL does) and pin the scale
pub fn normalize_amount(amt: Decimal) -> Result<Decimal> {
    let mut rounded =
        amt.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(AMOUNT_SCALE);

    if rounded.abs() >= Decimal::from(10_i64.pow(AMOUNT_INTEGER_DIGITS)) {
        return Err(BizTimeError::InvalidBody {
            message: format!("amount {} is out of range", amt),
        });
    }

    Ok(rounded)
}
