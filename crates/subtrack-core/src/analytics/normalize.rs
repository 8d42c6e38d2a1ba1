//! Billing normalization
//!
//! Converts a per-cycle cost into monthly and yearly equivalents so that
//! subscriptions on different cycles can be summed and compared.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::Result;
use crate::models::{BillingCycle, Subscription};
use crate::money::validate_cost;

/// Mean weeks per month approximation
pub const WEEKS_PER_MONTH: Decimal = dec!(4.33);

/// Monthly equivalent of one cycle's cost
///
/// Weekly costs use [`WEEKS_PER_MONTH`], so for weekly subscriptions the
/// monthly and yearly equivalents are not exact multiples of each other.
pub fn to_monthly(cost: Decimal, cycle: BillingCycle) -> Result<Decimal> {
    let cost = validate_cost(cost)?;
    Ok(match cycle {
        BillingCycle::Monthly => cost,
        BillingCycle::Yearly => cost / dec!(12),
        BillingCycle::Weekly => cost * WEEKS_PER_MONTH,
        BillingCycle::Quarterly => cost / dec!(3),
    })
}

/// Yearly equivalent of one cycle's cost
pub fn to_yearly(cost: Decimal, cycle: BillingCycle) -> Result<Decimal> {
    let cost = validate_cost(cost)?;
    Ok(match cycle {
        BillingCycle::Monthly => cost * dec!(12),
        BillingCycle::Yearly => cost,
        BillingCycle::Weekly => cost * dec!(52),
        BillingCycle::Quarterly => cost * dec!(4),
    })
}

pub fn monthly_cost(sub: &Subscription) -> Result<Decimal> {
    to_monthly(sub.cost, sub.billing_cycle)
}

pub fn yearly_cost(sub: &Subscription) -> Result<Decimal> {
    to_yearly(sub.cost, sub.billing_cycle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::money::round_currency;

    #[test]
    fn test_conversion_table() {
        let cost = dec!(12);
        assert_eq!(to_monthly(cost, BillingCycle::Monthly).unwrap(), dec!(12));
        assert_eq!(to_yearly(cost, BillingCycle::Monthly).unwrap(), dec!(144));

        assert_eq!(to_monthly(cost, BillingCycle::Yearly).unwrap(), dec!(1));
        assert_eq!(to_yearly(cost, BillingCycle::Yearly).unwrap(), dec!(12));

        assert_eq!(to_monthly(cost, BillingCycle::Weekly).unwrap(), dec!(51.96));
        assert_eq!(to_yearly(cost, BillingCycle::Weekly).unwrap(), dec!(624));

        assert_eq!(to_monthly(cost, BillingCycle::Quarterly).unwrap(), dec!(4));
        assert_eq!(to_yearly(cost, BillingCycle::Quarterly).unwrap(), dec!(48));
    }

    #[test]
    fn test_yearly_is_about_twelve_months() {
        let tolerance = dec!(0.005);
        for cost in [dec!(0.99), dec!(9.99), dec!(15), dec!(120), dec!(999.95)] {
            for cycle in BillingCycle::ALL {
                let monthly = to_monthly(cost, cycle).unwrap();
                let yearly = to_yearly(cost, cycle).unwrap();
                let drift = ((monthly * dec!(12)) - yearly).abs() / yearly;
                assert!(
                    drift <= tolerance,
                    "{} {} drifted {}",
                    cost,
                    cycle,
                    drift
                );
                if cycle != BillingCycle::Weekly {
                    assert_eq!(round_currency(monthly * dec!(12)), round_currency(yearly));
                }
            }
        }
    }

    #[test]
    fn test_no_rounding_mid_computation() {
        // 10/3 summed three times stays exact until the caller rounds
        let third = to_monthly(dec!(10), BillingCycle::Quarterly).unwrap();
        assert_eq!(round_currency(third + third + third), dec!(10.00));
    }

    #[test]
    fn test_negative_cost_rejected() {
        assert!(matches!(
            to_monthly(dec!(-1), BillingCycle::Monthly),
            Err(Error::InvalidCost(_))
        ));
        assert!(matches!(
            to_yearly(dec!(-0.01), BillingCycle::Yearly),
            Err(Error::InvalidCost(_))
        ));
    }

    #[test]
    fn test_unknown_cycle_string_fails() {
        let err = "biweekly".parse::<BillingCycle>().unwrap_err();
        assert!(matches!(err, Error::InvalidBillingCycle(_)));
    }
}
