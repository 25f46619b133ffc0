//! [`Area`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal};
use strum::{Display, EnumString};

/// Square feet per square meter.
const SQFT_PER_SQM: Decimal = Decimal::from_parts(2_649_217_671, 250, 0, false, 11);

/// Non-negative surface area tagged with its measurement [`Unit`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Area {
    /// [`Area`] measured in square meters.
    SquareMeters(Decimal),

    /// [`Area`] measured in square feet.
    SquareFeet(Decimal),
}

impl Area {
    /// Creates a new [`Area`] by checking the provided `amount` is not
    /// negative.
    #[must_use]
    pub fn new(unit: Unit, amount: Decimal) -> Option<Self> {
        (amount >= Decimal::ZERO).then_some(match unit {
            Unit::SquareMeters => Self::SquareMeters(amount),
            Unit::SquareFeet => Self::SquareFeet(amount),
        })
    }

    /// Returns the measurement [`Unit`] of this [`Area`].
    #[must_use]
    pub const fn unit(&self) -> Unit {
        match self {
            Self::SquareMeters(_) => Unit::SquareMeters,
            Self::SquareFeet(_) => Unit::SquareFeet,
        }
    }

    /// Returns the amount of this [`Area`] in its own [`Unit`].
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        match self {
            Self::SquareMeters(amount) | Self::SquareFeet(amount) => *amount,
        }
    }

    /// Converts this [`Area`] into the given measurement [`Unit`].
    #[must_use]
    pub fn to_unit(self, unit: Unit) -> Self {
        match (self, unit) {
            (Self::SquareMeters(amount), Unit::SquareFeet) => {
                Self::SquareFeet(amount * SQFT_PER_SQM)
            }
            (Self::SquareFeet(amount), Unit::SquareMeters) => {
                Self::SquareMeters(amount / SQFT_PER_SQM)
            }
            (me @ Self::SquareMeters(_), Unit::SquareMeters)
            | (me @ Self::SquareFeet(_), Unit::SquareFeet) => me,
        }
    }

    /// Indicates whether this [`Area`] is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount().is_zero()
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (amount, unit) = (self.amount(), self.unit());
        if amount.is_integer() {
            write!(f, "{}{unit}", amount.to_i128().expect("integer"))
        } else {
            write!(f, "{amount}{unit}")
        }
    }
}

impl FromStr for Area {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (amount, unit) = s
            .strip_suffix("sqft")
            .map(|a| (a, Unit::SquareFeet))
            .or_else(|| {
                s.strip_suffix("sqm").map(|a| (a, Unit::SquareMeters))
            })
            .ok_or("invalid area unit")?;
        let amount =
            Decimal::from_str(amount).map_err(|_| "invalid area amount")?;

        Self::new(unit, amount).ok_or("negative area amount")
    }
}

/// Measurement unit of an [`Area`].
#[derive(Clone, Copy, Debug, Display, EnumString, Eq, Hash, PartialEq)]
pub enum Unit {
    /// Square meters.
    #[strum(serialize = "sqm")]
    SquareMeters,

    /// Square feet.
    #[strum(serialize = "sqft")]
    SquareFeet,
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Surface area in `{amount}{unit}` format, where `unit` is either
    /// `sqm` or `sqft`.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Area = super::Area;

    impl Area {
        fn to_output<S: ScalarValue>(a: &Area) -> Value<S> {
            Value::scalar(a.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Area` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Area` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Area, Unit};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn rejects_negative() {
        assert!(Area::new(Unit::SquareMeters, Decimal::NEGATIVE_ONE).is_none());
        assert!(Area::new(Unit::SquareFeet, Decimal::ZERO).is_some());
    }

    #[test]
    fn converts_units() {
        let sqm = Area::SquareMeters(Decimal::TEN);

        assert_eq!(
            sqm.to_unit(Unit::SquareFeet).amount(),
            decimal("107.6391041671"),
        );
        assert_eq!(sqm.to_unit(Unit::SquareMeters), sqm);

        let back = sqm.to_unit(Unit::SquareFeet).to_unit(Unit::SquareMeters);
        assert_eq!(back.amount().round_dp(9), Decimal::TEN);
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Area::from_str("93sqm").unwrap(),
            Area::SquareMeters(decimal("93")),
        );
        assert_eq!(
            Area::from_str("1001.5sqft").unwrap(),
            Area::SquareFeet(decimal("1001.5")),
        );

        assert!(Area::from_str("93").is_err());
        assert!(Area::from_str("93m2").is_err());
        assert!(Area::from_str("-5sqm").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(Area::SquareMeters(decimal("93.00")).to_string(), "93sqm");
        assert_eq!(Area::SquareFeet(decimal("1001.5")).to_string(), "1001.5sqft");
    }
}
