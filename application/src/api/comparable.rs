//! [`Comparable`]-related definitions.

use common::{Area, DateTime, Money, Rate};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use rust_decimal::prelude::ToPrimitive as _;
use service::domain;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// Observed market sale comparable to units of a `Project`.
#[derive(Clone, Debug, From)]
pub struct Comparable(domain::Comparable);

/// Observed market sale comparable to units of a `Project`.
#[graphql_object(context = Context)]
impl Comparable {
    /// Unique identifier of this `Comparable`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Comparable.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Full address of the sold property.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Comparable.address",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn address(&self) -> Address {
        self.0.address.clone().into()
    }

    /// `Postcode` of the sold property.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Comparable.postcode",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn postcode(&self) -> Postcode {
        self.0.postcode.clone().into()
    }

    /// Number of bedrooms in the sold property.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Comparable.beds",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn beds(&self) -> i32 {
        self.0.beds.into()
    }

    /// `Category` of the sold property.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Comparable.category",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn category(&self) -> Category {
        self.0.category.into()
    }

    /// `DateTime` when the sale completed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Comparable.saleDate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn sale_date(&self) -> DateTime {
        self.0.sale_date.coerce()
    }

    /// Achieved sale price.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Comparable.price",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn price(&self) -> Money {
        self.0.price
    }

    /// Gross internal `Area` of the sold property.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Comparable.area",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn area(&self) -> Area {
        self.0.area
    }

    /// Sale `Rate` of this `Comparable` per the provided unit, derived from
    /// its price and area.
    ///
    /// `null` is returned if the area is zero.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Comparable.pricePerArea",
            otel.name = api::Query::SPAN_NAME,
            unit = ?unit,
        ),
    )]
    #[must_use]
    pub fn price_per_area(&self, unit: RateUnit) -> Option<Rate> {
        self.0.price_per_area(unit.into())
    }

    /// Free-text notes on this `Comparable`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Comparable.notes",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn notes(&self) -> Notes {
        self.0.notes.clone().into()
    }

    /// `DateTime` when this `Comparable` was recorded.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Comparable.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Comparable`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::comparable::Id)]
#[into(domain::comparable::Id)]
#[graphql(name = "ComparableId", transparent)]
pub struct Id(Uuid);

/// Full address of a sold property.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ComparableAddress",
    with = scalar::Via::<domain::comparable::Address>,
)]
pub struct Address(domain::comparable::Address);

/// UK postcode.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "Postcode",
    with = scalar::Via::<domain::comparable::Postcode>,
)]
pub struct Postcode(domain::comparable::Postcode);

/// Free-text notes on a `Comparable`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ComparableNotes",
    with = scalar::Via::<domain::comparable::Notes>,
)]
pub struct Notes(domain::comparable::Notes);

/// Category of a sold property.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
#[graphql(name = "ComparableCategory")]
pub enum Category {
    /// A detached house.
    Detached,

    /// A semi-detached house.
    SemiDetached,

    /// A terraced house.
    Terraced,

    /// A flat or an apartment.
    Flat,

    /// A bungalow.
    Bungalow,

    /// Any other kind of property.
    Other,
}

impl From<domain::comparable::Category> for Category {
    fn from(category: domain::comparable::Category) -> Self {
        use domain::comparable::Category as C;
        match category {
            C::Detached => Self::Detached,
            C::SemiDetached => Self::SemiDetached,
            C::Terraced => Self::Terraced,
            C::Flat => Self::Flat,
            C::Bungalow => Self::Bungalow,
            C::Other => Self::Other,
        }
    }
}

impl From<Category> for domain::comparable::Category {
    fn from(category: Category) -> Self {
        use domain::comparable::Category as C;
        match category {
            Category::Detached => C::Detached,
            Category::SemiDetached => C::SemiDetached,
            Category::Terraced => C::Terraced,
            Category::Flat => C::Flat,
            Category::Bungalow => C::Bungalow,
            Category::Other => C::Other,
        }
    }
}

/// Unit of area a `Rate` is expressed per.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum RateUnit {
    /// Square meters.
    SquareMeters,

    /// Square feet.
    SquareFeet,
}

impl From<common::area::Unit> for RateUnit {
    fn from(unit: common::area::Unit) -> Self {
        use common::area::Unit as U;
        match unit {
            U::SquareMeters => Self::SquareMeters,
            U::SquareFeet => Self::SquareFeet,
        }
    }
}

impl From<RateUnit> for common::area::Unit {
    fn from(unit: RateUnit) -> Self {
        match unit {
            RateUnit::SquareMeters => Self::SquareMeters,
            RateUnit::SquareFeet => Self::SquareFeet,
        }
    }
}

/// Settings filtering `Comparable`s before computing statistics.
#[derive(Clone, Copy, Debug, From)]
pub struct FilterSettings(domain::comparable::FilterSettings);

/// Settings filtering `Comparable`s before computing statistics.
#[graphql_object(name = "ComparableFilterSettings", context = Context)]
impl FilterSettings {
    /// Number of months a `Comparable`'s sale date may lie in the past.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ComparableFilterSettings.includeMonths",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn include_months(&self) -> i32 {
        self.0.include_months.get().into()
    }

    /// Minimum number of bedrooms, inclusive.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ComparableFilterSettings.minBeds",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn min_beds(&self) -> Option<i32> {
        self.0.min_beds.map(Into::into)
    }

    /// Maximum number of bedrooms, inclusive.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ComparableFilterSettings.maxBeds",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn max_beds(&self) -> Option<i32> {
        self.0.max_beds.map(Into::into)
    }

    /// Multiplier of the interquartile range controlling how aggressively
    /// outlying `Comparable`s are rejected.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ComparableFilterSettings.iqrMultiplier",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn iqr_multiplier(&self) -> f64 {
        self.0.iqr_multiplier.value().to_f64().unwrap_or_default()
    }

    /// Indicator whether only `Comparable`s sharing the `Project`'s outward
    /// postcode are considered.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ComparableFilterSettings.strictPostcode",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn strict_postcode(&self) -> bool {
        self.0.strict_postcode
    }

    /// Unit the statistics are expressed in.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ComparableFilterSettings.rateUnit",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn rate_unit(&self) -> RateUnit {
        self.0.rate_unit.into()
    }
}

/// Market statistics over a `Project`'s `Comparable`s.
#[derive(Clone, Debug, From)]
pub struct Stats(domain::comps::Stats);

/// Market statistics over a `Project`'s `Comparable`s.
#[graphql_object(name = "MarketStats", context = Context)]
impl Stats {
    /// Number of `Comparable`s that passed the filters.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MarketStats.count",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn count(&self, ctx: &Context) -> Result<i32, Error> {
        i32::try_from(self.0.count)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// IDs of the `Comparable`s that passed the filters.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MarketStats.used",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn used(&self) -> Vec<Id> {
        self.0.used.iter().copied().map(Into::into).collect()
    }

    /// 25th percentile of the sale `Rate`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MarketStats.p25",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn p25(&self) -> Rate {
        self.0.p25
    }

    /// Median of the sale `Rate`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MarketStats.median",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn median(&self) -> Rate {
        self.0.median
    }

    /// 75th percentile of the sale `Rate`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MarketStats.p75",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn p75(&self) -> Rate {
        self.0.p75
    }

    /// Recommended sale `Rate`, being the median with outliers rejected.
    ///
    /// `null` is returned if no `Comparable`s passed the filters.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MarketStats.recommended",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn recommended(&self) -> Option<Rate> {
        self.0.recommended
    }
}
