// Pairswap Engine: Unit Conversion
// Human-readable decimal amounts <-> integer base units (wei, token wei).
//
// Amounts are `rust_decimal::Decimal` (96-bit mantissa, scale <= 28), never
// binary floats. Conversion to base units is exact multiplication by 10^decimals
// with truncation of anything below one base unit. Conversion back is exact while
// the value fits Decimal's mantissa; beyond that trailing digits are truncated.

use alloy_primitives::U256;
use rust_decimal::Decimal;

use crate::atoms::error::{PairswapError, PairswapResult};

/// Largest scale a Decimal can carry.
const MAX_DECIMAL_SCALE: u32 = 28;

/// 10^exp, or an error past 10^77 where U256 runs out.
fn pow10(exp: u32) -> PairswapResult<U256> {
    U256::from(10u64).checked_pow(U256::from(exp)).ok_or_else(|| {
        PairswapError::InvalidAmount(format!("10^{} does not fit 256-bit base units", exp))
    })
}

/// Convert a decimal amount to base units: `amount * 10^decimals`, truncated.
/// e.g. 1.5 with 18 decimals → 1500000000000000000
pub fn to_base_units(amount: Decimal, decimals: u8) -> PairswapResult<U256> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PairswapError::InvalidAmount(format!(
            "{} is negative and has no base-unit representation",
            amount
        )));
    }
    let mantissa = U256::from(amount.mantissa().unsigned_abs());
    let scale = amount.scale();
    let decimals = decimals as u32;

    if decimals >= scale {
        mantissa.checked_mul(pow10(decimals - scale)?).ok_or_else(|| {
            PairswapError::InvalidAmount(format!("{} overflows 256-bit base units", amount))
        })
    } else {
        Ok(mantissa / pow10(scale - decimals)?)
    }
}

/// Convert base units back to a decimal amount: `amount / 10^decimals`.
pub fn from_base_units(amount: U256, decimals: u8) -> PairswapResult<Decimal> {
    // Decimal holds a 96-bit mantissa; drop low-order digits until both it and
    // the scale fit.
    let max_mantissa = U256::from(u128::MAX >> 32);
    let mut mantissa = amount;
    let mut scale = decimals as u32;
    while scale > 0 && (mantissa > max_mantissa || scale > MAX_DECIMAL_SCALE) {
        mantissa /= U256::from(10u64);
        scale -= 1;
    }
    if mantissa > max_mantissa {
        return Err(PairswapError::InvalidAmount(format!(
            "{} base units with {} decimals exceeds the decimal range",
            amount, decimals
        )));
    }
    let mantissa = u128::try_from(mantissa)
        .map_err(|e| PairswapError::InvalidAmount(format!("{}: {}", amount, e)))?;
    Ok(Decimal::from_i128_with_scale(mantissa as i128, scale).normalize())
}

/// Native asset: ether → wei
pub fn ether_to_wei(amount: Decimal) -> PairswapResult<U256> {
    to_base_units(amount, crate::atoms::constants::ETHER_DECIMALS)
}

/// Native asset: wei → ether
pub fn wei_to_ether(amount: U256) -> PairswapResult<Decimal> {
    from_base_units(amount, crate::atoms::constants::ETHER_DECIMALS)
}
