//! [`HouseType`]-related definitions.

use common::{Area, Rate};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, api::scalar, Context};

/// Dwelling archetype buildable on a `Project`'s site.
#[derive(Clone, Debug, From)]
pub struct HouseType(domain::house_type::HouseType);

/// Dwelling archetype buildable on a `Project`'s site.
#[graphql_object(context = Context)]
impl HouseType {
    /// Unique identifier of this `HouseType`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "HouseType.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Name of this `HouseType`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "HouseType.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn name(&self) -> Name {
        self.0.name.clone().into()
    }

    /// Number of bedrooms in this `HouseType`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "HouseType.beds",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn beds(&self) -> i32 {
        self.0.beds.into()
    }

    /// Gross internal floor `Area` of a single unit.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "HouseType.floorArea",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn floor_area(&self) -> Area {
        self.0.floor_area
    }

    /// Build cost `Rate` of this `HouseType` per floor area.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "HouseType.buildRate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn build_rate(&self) -> Rate {
        self.0.build_rate
    }

    /// Expected sale `Rate` of this `HouseType` per floor area.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "HouseType.saleRate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn sale_rate(&self) -> Rate {
        self.0.sale_rate
    }

    /// Indicator whether this `HouseType` comes from the default catalog.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "HouseType.isDefault",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0.is_default
    }
}

/// Unique identifier of a `HouseType`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::house_type::Id)]
#[into(domain::house_type::Id)]
#[graphql(name = "HouseTypeId", transparent)]
pub struct Id(Uuid);

/// Name of a `HouseType`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "HouseTypeName",
    with = scalar::Via::<domain::house_type::Name>,
)]
pub struct Name(domain::house_type::Name);
