// Pairswap Engine: Quotes and Slippage
//
// Router reads along the fixed two-hop path. Every call goes to the chain:
// reserves move every block, so a quote is never reused across calls.

use std::sync::Arc;

use alloy_primitives::U256;
use rust_decimal::Decimal;

use super::abi::{decode_uint256_array, encode_get_amounts_in, encode_get_amounts_out};
use super::primitives::Address;
use super::traits::ChainConnection;
use super::types::{Direction, Quote};
use crate::atoms::error::{PairswapError, PairswapResult};

// ── Slippage ───────────────────────────────────────────────────────────────

/// Maximum tolerated slippage, a fraction in [0, 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slippage(Decimal);

impl Slippage {
    pub fn new(fraction: Decimal) -> PairswapResult<Self> {
        if (fraction.is_sign_negative() && !fraction.is_zero()) || fraction >= Decimal::ONE {
            return Err(PairswapError::config(format!(
                "Max slippage must be a fraction in [0, 1), got {}",
                fraction
            )));
        }
        Ok(Self(fraction))
    }

    pub fn fraction(&self) -> Decimal {
        self.0
    }

    /// `quoted * (1 - slippage)`, truncated to whole base units.
    /// Exact integer arithmetic: 0 <= result <= quoted, equal when slippage is 0.
    pub fn min_output(&self, quoted: U256) -> U256 {
        let keep = Decimal::ONE - self.0;
        // keep = numerator / 10^scale with numerator <= 10^scale <= 10^28
        let numerator = U256::from(keep.mantissa().unsigned_abs());
        let denominator = U256::from(10u64).pow(U256::from(keep.scale()));
        // Split quoted = whole * denominator + rest so nothing overflows 256 bits.
        let whole = quoted / denominator;
        let rest = quoted % denominator;
        whole * numerator + rest * numerator / denominator
    }
}

impl std::fmt::Display for Slippage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", (self.0 * Decimal::ONE_HUNDRED).normalize())
    }
}

// ── QuoteService ───────────────────────────────────────────────────────────

pub struct QuoteService {
    conn: Arc<dyn ChainConnection>,
    router: Address,
    weth: Address,
    token: Address,
}

impl QuoteService {
    pub fn new(conn: Arc<dyn ChainConnection>, router: Address, weth: Address, token: Address) -> Self {
        Self { conn, router, weth, token }
    }

    pub fn path(&self, direction: Direction) -> [Address; 2] {
        direction.path(self.weth, self.token)
    }

    async fn router_amounts(&self, method: &str, calldata: Vec<u8>) -> PairswapResult<Vec<U256>> {
        let ret = self
            .conn
            .call(&self.router, &calldata)
            .await
            .map_err(|e| PairswapError::Quote(format!("{} reverted: {}", method, e)))?;
        let amounts = decode_uint256_array(&ret)
            .map_err(|e| PairswapError::Quote(format!("{} returned malformed data: {}", method, e)))?;
        if amounts.is_empty() {
            return Err(PairswapError::Quote(format!("{} returned no amounts", method)));
        }
        Ok(amounts)
    }

    /// Router `getAmountsOut(input, path)`, last element: what `input` buys.
    pub async fn quote_output_for(&self, amount_in: U256, path: &[Address]) -> PairswapResult<U256> {
        let amounts = self
            .router_amounts("getAmountsOut", encode_get_amounts_out(amount_in, path))
            .await?;
        Ok(amounts[amounts.len() - 1])
    }

    /// Router `getAmountsIn(output, path)`, first element: what buying `output` costs.
    pub async fn quote_input_for(&self, amount_out: U256, path: &[Address]) -> PairswapResult<U256> {
        let amounts = self
            .router_amounts("getAmountsIn", encode_get_amounts_in(amount_out, path))
            .await?;
        Ok(amounts[0])
    }

    /// Fresh output quote for swapping `amount_in` in `direction`.
    pub async fn quote(&self, direction: Direction, amount_in: U256) -> PairswapResult<Quote> {
        let amount_out = self.quote_output_for(amount_in, &self.path(direction)).await?;
        Ok(Quote { direction, amount_in, amount_out })
    }
}
