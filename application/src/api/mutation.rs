//! GraphQL [`Mutation`]s definitions.

use common::{Area, DateTime, Money, Months, Percent, Rate};
use juniper::{graphql_object, GraphQLInputObject};
use rust_decimal::{prelude::FromPrimitive as _, Decimal};
use service::{command, domain, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Project` with the provided name.
    ///
    /// The `Project` starts with an empty `Survey`, an empty `HouseType`
    /// catalog and default financial assumptions.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createProject",
            name = %name,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_project(
        name: api::project::Name,
        ctx: &Context,
    ) -> Result<api::Project, Error> {
        ctx.service()
            .execute(command::CreateProject { name: name.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Renames the `Project` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROJECT_NOT_EXISTS` - the `Project` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "renameProject",
            name = %name,
            otel.name = Self::SPAN_NAME,
            project_id = %project_id,
        ),
    )]
    pub async fn rename_project(
        project_id: api::project::Id,
        name: api::project::Name,
        ctx: &Context,
    ) -> Result<api::Project, Error> {
        ctx.service()
            .execute(command::RenameProject {
                project_id: project_id.into(),
                name: name.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Replaces the `Survey` of the `Project` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROJECT_NOT_EXISTS` - the `Project` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateSurvey",
            efficiency = %efficiency,
            otel.name = Self::SPAN_NAME,
            postcode = ?postcode,
            project_id = %project_id,
            site_area = %site_area,
        ),
    )]
    pub async fn update_survey(
        project_id: api::project::Id,
        boundary: Vec<VertexInput>,
        postcode: Option<api::comparable::Postcode>,
        site_area: Area,
        efficiency: Percent,
        ctx: &Context,
    ) -> Result<api::Project, Error> {
        ctx.service()
            .execute(command::UpdateSurvey {
                project_id: project_id.into(),
                survey: domain::project::Survey {
                    boundary: boundary.into_iter().map(Into::into).collect(),
                    postcode: postcode.map(Into::into),
                    site_area,
                    efficiency,
                },
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `HouseType` in the `Project`'s catalog, or updates the
    /// existing one if `houseTypeId` is provided.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROJECT_NOT_EXISTS` - the `Project` with the specified ID does not
    ///                          exist;
    /// - `HOUSE_TYPE_NOT_EXISTS` - the provided `houseTypeId` does not refer
    ///                             to a `HouseType` of the `Project`;
    /// - `CURRENCY_MISMATCH` - the provided `Rate`s are expressed in a
    ///                         currency other than the `Project`'s one;
    /// - `ZERO_FLOOR_AREA` - the provided floor `Area` is not positive;
    /// - `NEGATIVE_RATE` - one of the provided `Rate`s is negative.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "upsertHouseType",
            beds = %beds,
            build_rate = %build_rate,
            floor_area = %floor_area,
            house_type_id = ?house_type_id,
            name = %name,
            otel.name = Self::SPAN_NAME,
            project_id = %project_id,
            sale_rate = %sale_rate,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn upsert_house_type(
        project_id: api::project::Id,
        house_type_id: Option<api::house_type::Id>,
        name: api::house_type::Name,
        beds: i32,
        floor_area: Area,
        build_rate: Rate,
        sale_rate: Rate,
        ctx: &Context,
    ) -> Result<api::Project, Error> {
        let beds = beds.try_into().map_err(AsError::into_error)?;

        ctx.service()
            .execute(command::UpsertHouseType {
                project_id: project_id.into(),
                house_type_id: house_type_id.map(Into::into),
                name: name.into(),
                beds,
                floor_area,
                build_rate,
                sale_rate,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `HouseType` from the `Project`'s catalog, along with any
    /// mix entries referring to it.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROJECT_NOT_EXISTS` - the `Project` with the specified ID does not
    ///                          exist;
    /// - `HOUSE_TYPE_NOT_EXISTS` - the provided `houseTypeId` does not refer
    ///                             to a `HouseType` of the `Project`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteHouseType",
            house_type_id = %house_type_id,
            otel.name = Self::SPAN_NAME,
            project_id = %project_id,
        ),
    )]
    pub async fn delete_house_type(
        project_id: api::project::Id,
        house_type_id: api::house_type::Id,
        ctx: &Context,
    ) -> Result<api::Project, Error> {
        ctx.service()
            .execute(command::DeleteHouseType {
                project_id: project_id.into(),
                house_type_id: house_type_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Replaces the unit mix of the `Project` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROJECT_NOT_EXISTS` - the `Project` with the specified ID does not
    ///                          exist;
    /// - `HOUSE_TYPE_NOT_EXISTS` - a mix entry refers to a `HouseType` not
    ///                             present in the `Project`'s catalog;
    /// - `DUPLICATE_HOUSE_TYPE` - several mix entries refer to the same
    ///                            `HouseType`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "setUnitMix",
            otel.name = Self::SPAN_NAME,
            project_id = %project_id,
        ),
    )]
    pub async fn set_unit_mix(
        project_id: api::project::Id,
        mix: Vec<MixEntryInput>,
        ctx: &Context,
    ) -> Result<api::Project, Error> {
        let mix = mix
            .into_iter()
            .map(|entry| {
                Ok(domain::project::MixEntry {
                    house_type: entry.house_type_id.into(),
                    count: entry
                        .count
                        .try_into()
                        .map_err(AsError::into_error)?,
                })
            })
            .collect::<Result<_, Error>>()?;

        ctx.service()
            .execute(command::SetUnitMix {
                project_id: project_id.into(),
                mix,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Replaces the financial assumptions of the `Project` with the
    /// specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROJECT_NOT_EXISTS` - the `Project` with the specified ID does not
    ///                          exist;
    /// - `CURRENCY_MISMATCH` - the provided land acquisition cost is
    ///                         expressed in a currency other than the
    ///                         `Project`'s one;
    /// - `ZERO_MONTHS` - the provided finance term is zero months long.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateAssumptions",
            contingency = %contingency,
            fees = %fees,
            finance_months = %finance_months,
            finance_rate = %finance_rate,
            land_acquisition = %land_acquisition,
            otel.name = Self::SPAN_NAME,
            project_id = %project_id,
            target_profit = %target_profit,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn update_assumptions(
        project_id: api::project::Id,
        fees: Percent,
        contingency: Percent,
        target_profit: Percent,
        finance_rate: Percent,
        finance_months: i32,
        land_acquisition: Money,
        ctx: &Context,
    ) -> Result<api::Project, Error> {
        let finance_months =
            Months::new(finance_months.try_into().map_err(AsError::into_error)?)
                .ok_or_else(|| MonthsError::Zero.into())
                .map_err(ctx.error())?;

        ctx.service()
            .execute(command::UpdateAssumptions {
                project_id: project_id.into(),
                assumptions: domain::finance::Assumptions {
                    fees,
                    contingency,
                    target_profit,
                    finance_rate,
                    finance_months,
                    land_acquisition,
                },
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Records a new `Comparable` sale on the `Project` with the specified
    /// ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROJECT_NOT_EXISTS` - the `Project` with the specified ID does not
    ///                          exist;
    /// - `CURRENCY_MISMATCH` - the provided price is expressed in a currency
    ///                         other than the `Project`'s one;
    /// - `NON_POSITIVE_PRICE` - the provided price is not positive;
    /// - `ZERO_AREA` - the provided floor `Area` is not positive.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "addComparable",
            address = %address,
            area = %area,
            beds = %beds,
            category = ?category,
            otel.name = Self::SPAN_NAME,
            postcode = %postcode,
            price = %price,
            project_id = %project_id,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn add_comparable(
        project_id: api::project::Id,
        address: api::comparable::Address,
        postcode: api::comparable::Postcode,
        beds: i32,
        category: api::comparable::Category,
        sale_date: DateTime,
        price: Money,
        area: Area,
        notes: Option<api::comparable::Notes>,
        ctx: &Context,
    ) -> Result<api::Project, Error> {
        let beds = beds.try_into().map_err(AsError::into_error)?;

        ctx.service()
            .execute(command::AddComparable {
                project_id: project_id.into(),
                address: address.into(),
                postcode: postcode.into(),
                beds,
                category: category.into(),
                sale_date: sale_date.coerce(),
                price,
                area,
                notes: notes.map(Into::into).unwrap_or_default(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Removes the `Comparable` from the `Project` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROJECT_NOT_EXISTS` - the `Project` with the specified ID does not
    ///                          exist;
    /// - `COMPARABLE_NOT_EXISTS` - the provided `comparableId` does not
    ///                             refer to a `Comparable` of the `Project`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "removeComparable",
            comparable_id = %comparable_id,
            otel.name = Self::SPAN_NAME,
            project_id = %project_id,
        ),
    )]
    pub async fn remove_comparable(
        project_id: api::project::Id,
        comparable_id: api::comparable::Id,
        ctx: &Context,
    ) -> Result<api::Project, Error> {
        ctx.service()
            .execute(command::RemoveComparable {
                project_id: project_id.into(),
                comparable_id: comparable_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Replaces the `ComparableFilterSettings` of the `Project` with the
    /// specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROJECT_NOT_EXISTS` - the `Project` with the specified ID does not
    ///                          exist;
    /// - `ZERO_MONTHS` - the provided look-back window is zero months long;
    /// - `INVALID_IQR_MULTIPLIER` - the provided IQR multiplier is negative
    ///                              or not a number.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateFilterSettings",
            include_months = %include_months,
            iqr_multiplier = %iqr_multiplier,
            max_beds = ?max_beds,
            min_beds = ?min_beds,
            otel.name = Self::SPAN_NAME,
            project_id = %project_id,
            rate_unit = ?rate_unit,
            strict_postcode = %strict_postcode,
        ),
    )]
    #[expect(clippy::too_many_arguments, reason = "still readable")]
    pub async fn update_filter_settings(
        project_id: api::project::Id,
        include_months: i32,
        min_beds: Option<i32>,
        max_beds: Option<i32>,
        iqr_multiplier: f64,
        strict_postcode: bool,
        rate_unit: api::comparable::RateUnit,
        ctx: &Context,
    ) -> Result<api::Project, Error> {
        let include_months =
            Months::new(include_months.try_into().map_err(AsError::into_error)?)
                .ok_or_else(|| MonthsError::Zero.into())
                .map_err(ctx.error())?;
        let min_beds = min_beds
            .map(TryInto::try_into)
            .transpose()
            .map_err(AsError::into_error)?;
        let max_beds = max_beds
            .map(TryInto::try_into)
            .transpose()
            .map_err(AsError::into_error)?;
        let iqr_multiplier = Decimal::from_f64(iqr_multiplier)
            .and_then(domain::comparable::IqrMultiplier::new)
            .ok_or_else(|| IqrMultiplierError::Invalid.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(command::UpdateFilterSettings {
                project_id: project_id.into(),
                filter: domain::comparable::FilterSettings {
                    include_months,
                    min_beds,
                    max_beds,
                    iqr_multiplier,
                    strict_postcode,
                    rate_unit: rate_unit.into(),
                },
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Switches the `Project` with the specified ID between market-derived
    /// and per-`HouseType` sale pricing.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PROJECT_NOT_EXISTS` - the `Project` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "setMarketPricing",
            otel.name = Self::SPAN_NAME,
            project_id = %project_id,
            use_market_rate = %use_market_rate,
        ),
    )]
    pub async fn set_market_pricing(
        project_id: api::project::Id,
        use_market_rate: bool,
        ctx: &Context,
    ) -> Result<api::Project, Error> {
        ctx.service()
            .execute(command::SetMarketPricing {
                project_id: project_id.into(),
                use_market_rate,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

/// Geographic vertex of a site boundary.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "SurveyVertexInput")]
pub struct VertexInput {
    /// Latitude of the vertex, in degrees.
    pub lat: f64,

    /// Longitude of the vertex, in degrees.
    pub lng: f64,
}

impl From<VertexInput> for domain::project::Vertex {
    fn from(input: VertexInput) -> Self {
        let VertexInput { lat, lng } = input;
        Self { lat, lng }
    }
}

/// Entry of a `Project`'s unit mix.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "MixEntryInput")]
pub struct MixEntryInput {
    /// ID of the `HouseType` to build.
    pub house_type_id: api::house_type::Id,

    /// Number of units of the `HouseType` to build.
    pub count: i32,
}

define_error! {
    enum MonthsError {
        #[code = "ZERO_MONTHS"]
        #[status = BAD_REQUEST]
        #[message = "Number of months must not be zero"]
        Zero,
    }
}

define_error! {
    enum IqrMultiplierError {
        #[code = "INVALID_IQR_MULTIPLIER"]
        #[status = BAD_REQUEST]
        #[message = "IQR multiplier must be a non-negative number"]
        Invalid,
    }
}

impl AsError for command::rename_project::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ProjectNotExists(_) => {
                Some(api::query::ProjectError::NotExists.into())
            }
        }
    }
}

impl AsError for command::update_survey::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ProjectNotExists(_) => {
                Some(api::query::ProjectError::NotExists.into())
            }
        }
    }
}

impl AsError for command::upsert_house_type::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "HOUSE_TYPE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`HouseType` with the specified ID does not \
                             exist in the `Project`"]
                HouseTypeNotExists,

                #[code = "CURRENCY_MISMATCH"]
                #[status = BAD_REQUEST]
                #[message = "Monetary amounts must be expressed in the \
                             `Project`'s currency"]
                CurrencyMismatch,

                #[code = "ZERO_FLOOR_AREA"]
                #[status = BAD_REQUEST]
                #[message = "Floor `Area` must be positive"]
                ZeroFloorArea,

                #[code = "NEGATIVE_RATE"]
                #[status = BAD_REQUEST]
                #[message = "`Rate`s must not be negative"]
                NegativeRate,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ProjectNotExists(_) => {
                api::query::ProjectError::NotExists.into()
            }
            Self::HouseTypeNotExists(_) => Error::HouseTypeNotExists.into(),
            Self::CurrencyMismatch(_) => Error::CurrencyMismatch.into(),
            Self::ZeroFloorArea => Error::ZeroFloorArea.into(),
            Self::NegativeRate(_) => Error::NegativeRate.into(),
        })
    }
}

impl AsError for command::delete_house_type::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "HOUSE_TYPE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`HouseType` with the specified ID does not \
                             exist in the `Project`"]
                HouseTypeNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ProjectNotExists(_) => {
                api::query::ProjectError::NotExists.into()
            }
            Self::HouseTypeNotExists(_) => Error::HouseTypeNotExists.into(),
        })
    }
}

impl AsError for command::set_unit_mix::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "HOUSE_TYPE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`HouseType` with the specified ID does not \
                             exist in the `Project`"]
                HouseTypeNotExists,

                #[code = "DUPLICATE_HOUSE_TYPE"]
                #[status = CONFLICT]
                #[message = "`HouseType` is referenced by multiple mix \
                             entries"]
                DuplicateHouseType,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ProjectNotExists(_) => {
                api::query::ProjectError::NotExists.into()
            }
            Self::HouseTypeNotExists(_) => Error::HouseTypeNotExists.into(),
            Self::DuplicateHouseType(_) => Error::DuplicateHouseType.into(),
        })
    }
}

impl AsError for command::update_assumptions::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CURRENCY_MISMATCH"]
                #[status = BAD_REQUEST]
                #[message = "Monetary amounts must be expressed in the \
                             `Project`'s currency"]
                CurrencyMismatch,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ProjectNotExists(_) => {
                api::query::ProjectError::NotExists.into()
            }
            Self::CurrencyMismatch(_) => Error::CurrencyMismatch.into(),
        })
    }
}

impl AsError for command::add_comparable::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CURRENCY_MISMATCH"]
                #[status = BAD_REQUEST]
                #[message = "Monetary amounts must be expressed in the \
                             `Project`'s currency"]
                CurrencyMismatch,

                #[code = "NON_POSITIVE_PRICE"]
                #[status = BAD_REQUEST]
                #[message = "Sale price must be positive"]
                NonPositivePrice,

                #[code = "ZERO_AREA"]
                #[status = BAD_REQUEST]
                #[message = "Floor `Area` must be positive"]
                ZeroArea,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ProjectNotExists(_) => {
                api::query::ProjectError::NotExists.into()
            }
            Self::CurrencyMismatch(_) => Error::CurrencyMismatch.into(),
            Self::NonPositivePrice(_) => Error::NonPositivePrice.into(),
            Self::ZeroArea => Error::ZeroArea.into(),
        })
    }
}

impl AsError for command::remove_comparable::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "COMPARABLE_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Comparable` with the specified ID does not \
                             exist in the `Project`"]
                ComparableNotExists,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::ProjectNotExists(_) => {
                api::query::ProjectError::NotExists.into()
            }
            Self::ComparableNotExists(_) => Error::ComparableNotExists.into(),
        })
    }
}

impl AsError for command::update_filter_settings::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ProjectNotExists(_) => {
                Some(api::query::ProjectError::NotExists.into())
            }
        }
    }
}

impl AsError for command::set_market_pricing::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ProjectNotExists(_) => {
                Some(api::query::ProjectError::NotExists.into())
            }
        }
    }
}
