//! [`HouseType`] definitions.

use common::{area, money::Currency, Area, Rate};
use derive_more::{AsRef, Display, From, FromStr, Into};
use rust_decimal::Decimal;
use uuid::Uuid;

#[cfg(doc)]
use crate::domain::Project;

/// Dwelling archetype buildable on a [`Project`]'s site.
#[derive(Clone, Debug)]
pub struct HouseType {
    /// ID of this [`HouseType`].
    pub id: Id,

    /// [`Name`] of this [`HouseType`].
    pub name: Name,

    /// Number of bedrooms in this [`HouseType`].
    pub beds: Beds,

    /// Gross internal floor [`Area`] of a single unit.
    pub floor_area: Area,

    /// Build cost [`Rate`] of this [`HouseType`] per floor area.
    pub build_rate: Rate,

    /// Expected sale [`Rate`] of this [`HouseType`] per floor area.
    pub sale_rate: Rate,

    /// Indicator whether this [`HouseType`] comes from the default catalog.
    pub is_default: bool,
}

/// ID of a [`HouseType`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Name of a [`HouseType`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 128
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Number of bedrooms in a [`HouseType`].
pub type Beds = u8;

/// Returns the default [`HouseType`] catalog seeded into every new
/// [`Project`].
#[expect(unsafe_code, reason = "literals are valid")]
#[must_use]
pub fn defaults(currency: Currency) -> Vec<HouseType> {
    let of = |name: &str, beds: Beds, sqm: u32, build: u32, sale: u32| {
        HouseType {
            id: Id::new(),
            // SAFETY: The catalog names below are non-empty, trimmed and
            //         short enough.
            name: unsafe { Name::new_unchecked(name) },
            beds,
            floor_area: Area::SquareMeters(Decimal::from(sqm)),
            build_rate: Rate {
                amount: Decimal::from(build),
                currency,
                per: area::Unit::SquareFeet,
            },
            sale_rate: Rate {
                amount: Decimal::from(sale),
                currency,
                per: area::Unit::SquareFeet,
            },
            is_default: true,
        }
    };

    vec![
        of("1 Bed Flat", 1, 50, 180, 340),
        of("2 Bed Flat", 2, 70, 180, 330),
        of("2 Bed Terraced", 2, 75, 160, 320),
        of("3 Bed Semi", 3, 93, 150, 310),
        of("4 Bed Detached", 4, 120, 145, 325),
        of("5 Bed Detached", 5, 150, 145, 330),
    ]
}

#[cfg(test)]
mod spec {
    use common::money::Currency;
    use itertools::Itertools as _;

    use super::{defaults, Name};

    #[test]
    fn name_requires_trimmed_non_empty() {
        assert!(Name::new("3 Bed Semi").is_some());

        assert!(Name::new("").is_none());
        assert!(Name::new(" padded ").is_none());
        assert!(Name::new("x".repeat(129)).is_none());
    }

    #[test]
    fn catalog_is_seeded() {
        let catalog = defaults(Currency::Gbp);

        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.iter().map(|ht| ht.id).unique().count(), 6);
        assert!(catalog.iter().all(|ht| ht.is_default));
        assert!(catalog
            .iter()
            .all(|ht| ht.sale_rate.currency == Currency::Gbp
                && ht.build_rate.currency == Currency::Gbp));
        assert!(catalog.iter().all(|ht| !ht.floor_area.is_zero()));
    }
}
