use crate::prelude::{RmsfError, RmsfResult};
use std::hint::black_box;

/// Requires IEEE-754 binary64 with gradual underflow (no flush-to-zero).
pub fn check_float_environment() -> RmsfResult<()> {
    if f64::MANTISSA_DIGITS != 53 || f64::RADIX != 2 {
        return Err(RmsfError::FloatEnvironment(format!(
            "expected binary64 with 53 mantissa digits, found radix {} with {} digits",
            f64::RADIX,
            f64::MANTISSA_DIGITS
        )));
    }

    // black_box keeps the division at run time, where FTZ/DAZ would apply.
    let halved = black_box(f64::MIN_POSITIVE) / black_box(2.0);
    if halved == 0.0 || !halved.is_subnormal() {
        return Err(RmsfError::FloatEnvironment(
            "subnormal numbers are flushed to zero".into(),
        ));
    }

    Ok(())
}
