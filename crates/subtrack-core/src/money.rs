//! Money helpers
//!
//! Costs are exact decimals. Intermediate sums are never rounded; only the
//! values placed into a result structure go through [`round_currency`].

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Error, Result};

/// Round to cents, half away from zero
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Reject negative costs
pub fn validate_cost(cost: Decimal) -> Result<Decimal> {
    if cost < Decimal::ZERO {
        return Err(Error::InvalidCost(cost.to_string()));
    }
    Ok(cost)
}

/// Bring a cost into storage form: non-negative, exactly two decimal places
pub fn normalize_cost(cost: Decimal) -> Result<Decimal> {
    let mut cost = round_currency(validate_cost(cost)?);
    cost.rescale(2);
    Ok(cost)
}

/// Parse a user-supplied cost such as `"15.99"`, `"$15.99"` or `"1,200"`
pub fn parse_cost(input: &str) -> Result<Decimal> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    let cost: Decimal = cleaned
        .parse()
        .map_err(|_| Error::InvalidCost(input.to_string()))?;
    normalize_cost(cost)
}
