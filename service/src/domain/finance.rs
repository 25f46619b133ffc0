//! Financial [`Assumptions`] definitions.

use common::{money::Currency, Money, Months, Percent};
use rust_decimal::Decimal;

#[cfg(doc)]
use crate::domain::Project;

/// Financial assumptions an appraisal of a [`Project`] is built upon.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Assumptions {
    /// Professional fees as a [`Percent`] of the build cost.
    pub fees: Percent,

    /// Contingency as a [`Percent`] of the build cost.
    pub contingency: Percent,

    /// Target profit as a [`Percent`] of the gross development value.
    pub target_profit: Percent,

    /// Annual finance interest rate as a [`Percent`].
    pub finance_rate: Percent,

    /// Number of [`Months`] the development finance is borrowed for.
    pub finance_months: Months,

    /// Cost of acquiring the land.
    pub land_acquisition: Money,
}

impl Assumptions {
    /// Creates new default [`Assumptions`] in the provided [`Currency`].
    #[expect(unsafe_code, reason = "literals are valid")]
    #[must_use]
    pub fn new(currency: Currency) -> Self {
        // SAFETY: All the literals are within the required bounds.
        unsafe {
            Self {
                fees: Percent::new_unchecked(Decimal::from(5)),
                contingency: Percent::new_unchecked(Decimal::from(10)),
                target_profit: Percent::new_unchecked(Decimal::from(20)),
                finance_rate: Percent::new_unchecked(Decimal::new(85, 1)),
                finance_months: Months::new_unchecked(18),
                land_acquisition: Money::zero(currency),
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use common::money::Currency;
    use rust_decimal::Decimal;

    use super::Assumptions;

    #[test]
    fn new_seeds_defaults() {
        let assumptions = Assumptions::new(Currency::Gbp);

        assert_eq!(assumptions.fees.value(), Decimal::from(5));
        assert_eq!(assumptions.contingency.value(), Decimal::from(10));
        assert_eq!(assumptions.target_profit.value(), Decimal::from(20));
        assert_eq!(assumptions.finance_rate.value(), Decimal::new(85, 1));
        assert_eq!(assumptions.finance_months.get(), 18);
        assert!(assumptions.land_acquisition.amount.is_zero());
        assert_eq!(assumptions.land_acquisition.currency, Currency::Gbp);
    }
}
