//! [`Rate`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{
    prelude::ToPrimitive as _, Decimal, RoundingStrategy,
};

use crate::{area, money::Currency, Area, Money};

/// [`Money`] amount per one [`area::Unit`] of surface.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Rate {
    /// Amount of this [`Rate`] per one `per` unit.
    pub amount: Decimal,

    /// [`Currency`] of this [`Rate`]'s amount.
    pub currency: Currency,

    /// [`area::Unit`] this [`Rate`] is measured against.
    pub per: area::Unit,
}

impl Rate {
    /// Creates a new zero [`Rate`] in the given [`Currency`] per the given
    /// [`area::Unit`].
    #[must_use]
    pub const fn zero(currency: Currency, per: area::Unit) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
            per,
        }
    }

    /// Returns the [`Money`] amount this [`Rate`] yields over the provided
    /// [`Area`].
    ///
    /// The [`Area`] is converted into this [`Rate`]'s [`area::Unit`] first.
    #[must_use]
    pub fn for_area(&self, area: Area) -> Money {
        Money {
            amount: self.amount * area.to_unit(self.per).amount(),
            currency: self.currency,
        }
    }

    /// Rounds this [`Rate`]'s amount to a whole number of [`Currency`]
    /// units, away from zero on midpoint.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self {
            amount: self
                .amount
                .round_dp_with_strategy(
                    0,
                    RoundingStrategy::MidpointAwayFromZero,
                ),
            ..self
        }
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency, per } = self;
        if amount.is_integer() {
            write!(
                f,
                "{}{currency}/{per}",
                amount.to_i128().expect("integer"),
            )
        } else {
            write!(f, "{amount}{currency}/{per}")
        }
    }
}

impl FromStr for Rate {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (money, per) = s.split_once('/').ok_or("missing area unit")?;
        let Money { amount, currency } = Money::from_str(money)?;
        let per = area::Unit::from_str(per).map_err(|_| "invalid area unit")?;

        Ok(Self { amount, currency, per })
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Money per area unit in `{amount}{currency}/{unit}` format, where
    /// `unit` is either `sqm` or `sqft`.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Rate = super::Rate;

    impl Rate {
        fn to_output<S: ScalarValue>(r: &Rate) -> Value<S> {
            Value::scalar(r.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Rate` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Rate` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{area, Area, Currency, Rate};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Rate::from_str("350GBP/sqft").unwrap(),
            Rate {
                amount: decimal("350"),
                currency: Currency::Gbp,
                per: area::Unit::SquareFeet,
            },
        );
        assert_eq!(
            Rate::from_str("150.5GBP/sqm").unwrap(),
            Rate {
                amount: decimal("150.5"),
                currency: Currency::Gbp,
                per: area::Unit::SquareMeters,
            },
        );

        assert!(Rate::from_str("350GBP").is_err());
        assert!(Rate::from_str("350GBP/acre").is_err());
        assert!(Rate::from_str("350/sqft").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(
            Rate {
                amount: decimal("350.00"),
                currency: Currency::Gbp,
                per: area::Unit::SquareFeet,
            }
            .to_string(),
            "350GBP/sqft",
        );
        assert_eq!(
            Rate {
                amount: decimal("150.5"),
                currency: Currency::Usd,
                per: area::Unit::SquareMeters,
            }
            .to_string(),
            "150.5USD/sqm",
        );
    }

    #[test]
    fn yields_over_area() {
        let rate = Rate {
            amount: decimal("350"),
            currency: Currency::Gbp,
            per: area::Unit::SquareFeet,
        };

        let money = rate.for_area(Area::SquareFeet(decimal("1000")));
        assert_eq!(money.amount, decimal("350000"));
        assert_eq!(money.currency, Currency::Gbp);
    }

    #[test]
    fn converts_area_before_applying() {
        let rate = Rate {
            amount: decimal("100"),
            currency: Currency::Gbp,
            per: area::Unit::SquareFeet,
        };

        let money = rate.for_area(Area::SquareMeters(Decimal::TEN));
        assert_eq!(money.amount, decimal("10763.91041671"));
    }

    #[test]
    fn rounds_to_whole_unit() {
        let rate = |s: &str| Rate {
            amount: decimal(s),
            currency: Currency::Gbp,
            per: area::Unit::SquareFeet,
        };

        assert_eq!(rate("205.4").rounded().amount, decimal("205"));
        assert_eq!(rate("205.5").rounded().amount, decimal("206"));
        assert_eq!(rate("205.6").rounded().amount, decimal("206"));
    }
}
