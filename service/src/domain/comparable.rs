//! [`Comparable`] definitions.

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{area, define_kind, unit, Area, DateTimeOf, Money, Months, Rate};
use derive_more::{AsRef, Display, From, FromStr, Into};
use regex::Regex;
use rust_decimal::Decimal;
use uuid::Uuid;
use xxhash_rust::xxh3;

#[cfg(doc)]
use crate::domain::Project;

/// Observed market sale comparable to units of a [`Project`].
#[derive(Clone, Debug)]
pub struct Comparable {
    /// ID of this [`Comparable`].
    pub id: Id,

    /// [`Hash`] of this [`Comparable`] used for deduplication.
    ///
    /// [`Hash`]: struct@Hash
    pub hash: Hash,

    /// [`Address`] of the sold property.
    pub address: Address,

    /// [`Postcode`] of the sold property.
    pub postcode: Postcode,

    /// Number of bedrooms in the sold property.
    pub beds: Beds,

    /// [`Category`] of the sold property.
    pub category: Category,

    /// [`DateTime`] when the sale completed.
    pub sale_date: SaleDateTime,

    /// Achieved sale price.
    pub price: Money,

    /// Gross internal [`Area`] of the sold property.
    pub area: Area,

    /// Free-text [`Notes`] on this [`Comparable`].
    pub notes: Notes,

    /// [`DateTime`] when this [`Comparable`] was recorded.
    pub created_at: CreationDateTime,
}

impl Comparable {
    /// Returns the sale [`Rate`] of this [`Comparable`] per the provided
    /// [`area::Unit`], derived from its price and area.
    ///
    /// [`None`] is returned if the area is zero.
    #[must_use]
    pub fn price_per_area(&self, unit: area::Unit) -> Option<Rate> {
        let area = self.area.to_unit(unit).amount();
        (!area.is_zero()).then(|| Rate {
            amount: self.price.amount / area,
            currency: self.price.currency,
            per: unit,
        })
    }
}

/// ID of a [`Comparable`].
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

/// Hash of a [`Comparable`] used for deduplication.
#[derive(Clone, Copy, Debug, Display, Eq, From, Hash, Into, PartialEq)]
pub struct Hash(Uuid);

impl Hash {
    /// Calculates a new [`Hash`] for a [`Comparable`].
    ///
    /// [`Hash`]: struct@Hash
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    #[must_use]
    pub fn new(
        address: &Address,
        postcode: &Postcode,
        beds: Beds,
        category: Category,
        sale_date: SaleDateTime,
        price: Money,
        area: Area,
    ) -> Self {
        use std::hash::Hash as _;

        // WARNING: Avoid changing the order of the fields in the hasher,
        //          because it will be a breaking change diverging from all
        //          the previously recorded hashes.
        let mut hasher = xxh3::Xxh3Builder::new().build();
        address.hash(&mut hasher);
        postcode.hash(&mut hasher);
        beds.hash(&mut hasher);
        category.u8().hash(&mut hasher);
        sale_date.unix_timestamp().hash(&mut hasher);
        price.amount.hash(&mut hasher);
        price.currency.u8().hash(&mut hasher);
        area.unit().hash(&mut hasher);
        area.amount().hash(&mut hasher);

        Self(Uuid::from_u128(hasher.digest128()))
    }
}

/// Full address of a sold property.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Address(String);

impl Address {
    /// Creates a new [`Address`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Address`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Address`].
    fn check(address: impl AsRef<str>) -> bool {
        let address = address.as_ref();
        address.trim() == address && !address.is_empty() && address.len() <= 512
    }
}

impl FromStr for Address {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Address`")
    }
}

/// UK postcode of a sold property.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Postcode(String);

impl Postcode {
    /// Creates a new [`Postcode`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `postcode` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(postcode: impl Into<String>) -> Self {
        Self(postcode.into())
    }

    /// Creates a new [`Postcode`] if the given `postcode` is valid.
    #[must_use]
    pub fn new(postcode: impl Into<String>) -> Option<Self> {
        let postcode = postcode.into();
        Self::check(&postcode).then_some(Self(postcode))
    }

    /// Checks whether the given `postcode` is a valid [`Postcode`].
    fn check(postcode: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Postcode`] invariants:
        /// - Must start with an outward code (area letters and district);
        /// - May end with an inward code separated by a single space.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[A-Za-z]{1,2}[0-9][A-Za-z0-9]?( [0-9][A-Za-z]{2})?$")
                .expect("valid regex")
        });

        REGEX.is_match(postcode.as_ref())
    }

    /// Returns the outward code of this [`Postcode`] (the part before the
    /// space).
    #[must_use]
    pub fn outward(&self) -> &str {
        self.0.split_whitespace().next().unwrap_or(self.0.as_str())
    }

    /// Indicates whether this [`Postcode`]'s outward code matches the
    /// provided one's, ignoring ASCII case.
    #[must_use]
    pub fn matches_outward(&self, other: &Self) -> bool {
        self.outward().eq_ignore_ascii_case(other.outward())
    }
}

impl FromStr for Postcode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Postcode`")
    }
}

/// Number of bedrooms of a [`Comparable`].
pub type Beds = u8;

define_kind! {
    #[doc = "Category of a sold property."]
    enum Category {
        #[doc = "A detached house."]
        Detached = 1,

        #[doc = "A semi-detached house."]
        SemiDetached = 2,

        #[doc = "A terraced house."]
        Terraced = 3,

        #[doc = "A flat or an apartment."]
        Flat = 4,

        #[doc = "A bungalow."]
        Bungalow = 5,

        #[doc = "Any other kind of property."]
        Other = 6,
    }
}

/// Free-text notes on a [`Comparable`].
#[derive(AsRef, Clone, Debug, Default, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Notes(String);

impl Notes {
    /// Creates a new [`Notes`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `notes` match the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(notes: impl Into<String>) -> Self {
        Self(notes.into())
    }

    /// Creates a new [`Notes`] if the given `notes` are valid.
    ///
    /// Unlike other text fields, [`Notes`] may be empty.
    #[must_use]
    pub fn new(notes: impl Into<String>) -> Option<Self> {
        let notes = notes.into();
        Self::check(&notes).then_some(Self(notes))
    }

    /// Checks whether the given `notes` are valid [`Notes`].
    fn check(notes: impl AsRef<str>) -> bool {
        let notes = notes.as_ref();
        notes.trim() == notes && notes.len() <= 1024
    }
}

impl FromStr for Notes {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Notes`")
    }
}

/// Settings filtering [`Comparable`]s before computing statistics.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FilterSettings {
    /// Number of [`Months`] a [`Comparable`]'s sale date may lie in the
    /// past.
    pub include_months: Months,

    /// Minimum number of bedrooms, inclusive.
    ///
    /// [`None`] means unbounded.
    pub min_beds: Option<Beds>,

    /// Maximum number of bedrooms, inclusive.
    ///
    /// [`None`] means unbounded.
    pub max_beds: Option<Beds>,

    /// [`IqrMultiplier`] controlling outlier rejection strictness.
    pub iqr_multiplier: IqrMultiplier,

    /// Indicator whether only [`Comparable`]s sharing the [`Project`]'s
    /// outward postcode are considered.
    pub strict_postcode: bool,

    /// [`area::Unit`] the statistics are expressed in.
    pub rate_unit: area::Unit,
}

impl Default for FilterSettings {
    #[expect(unsafe_code, reason = "literal is valid")]
    fn default() -> Self {
        Self {
            // SAFETY: The literal is non-zero.
            include_months: unsafe { Months::new_unchecked(12) },
            min_beds: None,
            max_beds: None,
            iqr_multiplier: IqrMultiplier::default(),
            strict_postcode: false,
            rate_unit: area::Unit::SquareFeet,
        }
    }
}

/// Multiplier of the interquartile range controlling how aggressively
/// outlying [`Comparable`]s are rejected.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub struct IqrMultiplier(Decimal);

impl IqrMultiplier {
    /// Creates a new [`IqrMultiplier`] by checking the provided value is not
    /// negative.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        (val >= Decimal::ZERO).then_some(Self(val))
    }

    /// Returns the inner [`Decimal`] value of this [`IqrMultiplier`].
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }
}

impl Default for IqrMultiplier {
    fn default() -> Self {
        Self(Decimal::new(15, 1))
    }
}

impl FromStr for IqrMultiplier {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `IqrMultiplier`")
    }
}

/// [`DateTime`] when a [`Comparable`]'s sale completed.
pub type SaleDateTime = DateTimeOf<(Comparable, unit::Sale)>;

/// [`DateTime`] when a [`Comparable`] was recorded.
pub type CreationDateTime = DateTimeOf<(Comparable, unit::Creation)>;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{money::Currency, Area, DateTime, Money};
    use rust_decimal::Decimal;

    use super::{
        area, Address, Category, FilterSettings, Hash, IqrMultiplier, Notes,
        Postcode, SaleDateTime,
    };

    fn sale_date(s: &str) -> SaleDateTime {
        DateTime::from_rfc3339(s).unwrap().coerce()
    }

    fn price(amount: u32) -> Money {
        Money {
            amount: amount.into(),
            currency: Currency::Gbp,
        }
    }

    #[test]
    fn postcode_validates_format() {
        for valid in ["SW1A 1AA", "M1 1AE", "CR2 6XH", "DN55 1PT", "W1", "EC1A"]
        {
            assert!(Postcode::new(valid).is_some(), "rejected {valid}");
        }

        for invalid in ["", " SW1A 1AA", "SW1A  1AA", "12345", "STREET"] {
            assert!(Postcode::new(invalid).is_none(), "accepted {invalid}");
        }
    }

    #[test]
    fn postcode_outward() {
        assert_eq!(Postcode::new("SW1A 1AA").unwrap().outward(), "SW1A");
        assert_eq!(Postcode::new("M1").unwrap().outward(), "M1");
    }

    #[test]
    fn postcode_outward_matching_ignores_case() {
        let a = Postcode::new("sw1a 1aa").unwrap();
        let b = Postcode::new("SW1A 9ZZ").unwrap();
        let c = Postcode::new("M1 1AE").unwrap();

        assert!(a.matches_outward(&b));
        assert!(b.matches_outward(&a));
        assert!(!a.matches_outward(&c));
    }

    #[test]
    fn notes_may_be_empty() {
        assert!(Notes::new("").is_some());
        assert!(Notes::new("sold at auction").is_some());

        assert!(Notes::new(" padded ").is_none());
    }

    #[test]
    fn hash_ignores_notes_only() {
        let address = Address::new("12 Mill Lane").unwrap();
        let postcode = Postcode::new("SW1A 1AA").unwrap();
        let date = sale_date("2025-03-01T00:00:00Z");
        let area = Area::SquareFeet(Decimal::from(1000));

        let hash = |beds, price_amount| {
            Hash::new(
                &address,
                &postcode,
                beds,
                Category::Terraced,
                date,
                price(price_amount),
                area,
            )
        };

        assert_eq!(hash(3, 200_000), hash(3, 200_000));
        assert_ne!(hash(3, 200_000), hash(4, 200_000));
        assert_ne!(hash(3, 200_000), hash(3, 210_000));
    }

    #[test]
    fn derives_price_per_area() {
        let comparable = super::Comparable {
            id: super::Id::new(),
            hash: Hash::new(
                &Address::new("12 Mill Lane").unwrap(),
                &Postcode::new("SW1A 1AA").unwrap(),
                3,
                Category::Terraced,
                sale_date("2025-03-01T00:00:00Z"),
                price(200_000),
                Area::SquareFeet(Decimal::from(1000)),
            ),
            address: Address::new("12 Mill Lane").unwrap(),
            postcode: Postcode::new("SW1A 1AA").unwrap(),
            beds: 3,
            category: Category::Terraced,
            sale_date: sale_date("2025-03-01T00:00:00Z"),
            price: price(200_000),
            area: Area::SquareFeet(Decimal::from(1000)),
            notes: Notes::default(),
            created_at: DateTime::now().coerce(),
        };

        let rate = comparable
            .price_per_area(area::Unit::SquareFeet)
            .unwrap();
        assert_eq!(rate.amount, Decimal::from(200));
        assert_eq!(rate.currency, Currency::Gbp);

        let zero_area = super::Comparable {
            area: Area::SquareFeet(Decimal::ZERO),
            ..comparable
        };
        assert!(zero_area.price_per_area(area::Unit::SquareFeet).is_none());
    }

    #[test]
    fn filter_settings_defaults() {
        let settings = FilterSettings::default();

        assert_eq!(settings.include_months.get(), 12);
        assert_eq!(settings.min_beds, None);
        assert_eq!(settings.max_beds, None);
        assert_eq!(
            settings.iqr_multiplier.value(),
            "1.5".parse::<Decimal>().unwrap(),
        );
        assert!(!settings.strict_postcode);
        assert_eq!(settings.rate_unit, area::Unit::SquareFeet);
    }

    #[test]
    fn iqr_multiplier_rejects_negative() {
        assert!(IqrMultiplier::new(Decimal::ZERO).is_some());
        assert!(IqrMultiplier::new(Decimal::NEGATIVE_ONE).is_none());
        assert!(IqrMultiplier::from_str("-0.5").is_err());
    }
}
