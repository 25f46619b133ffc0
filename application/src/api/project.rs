//! [`Project`]-related definitions.

use std::future;

use common::{Area, DateTime, Handler as _, Money, Percent};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, query};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, api::scalar, AsError, Context, Error};

/// Feasibility study of a residential development scheme.
#[derive(Clone, Debug)]
pub struct Project {
    /// ID of this [`Project`].
    id: Id,

    /// Underlying [`domain::Project`].
    project: OnceCell<domain::Project>,
}

impl From<domain::Project> for Project {
    fn from(project: domain::Project) -> Self {
        Self {
            id: project.id.into(),
            project: OnceCell::new_with(Some(project)),
        }
    }
}

impl Project {
    /// Creates a new [`Project`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Project`] with the provided ID exists,
    /// otherwise accessing this [`Project`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            project: OnceCell::new(),
        }
    }

    /// Returns the underlying [`domain::Project`].
    ///
    /// # Errors
    ///
    /// Errors if the [`domain::Project`] doesn't exist.
    async fn project(&self, ctx: &Context) -> Result<&domain::Project, Error> {
        let id = self.id.into();
        self.project
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::project::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|p| {
                        future::ready(p.ok_or_else(|| {
                            api::query::ProjectError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// Feasibility study of a residential development scheme.
#[graphql_object(context = Context)]
impl Project {
    /// Unique identifier of this `Project`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Project.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Name of this `Project`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Project.name",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn name(&self, ctx: &Context) -> Result<Name, Error> {
        Ok(self.project(ctx).await?.name.clone().into())
    }

    /// `Currency` all the monetary amounts of this `Project` are expressed
    /// in.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Project.currency",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn currency(&self, ctx: &Context) -> Result<Currency, Error> {
        Ok(self.project(ctx).await?.currency.into())
    }

    /// `Survey` of the development site.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Project.survey",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn survey(&self, ctx: &Context) -> Result<Survey, Error> {
        Ok(self.project(ctx).await?.survey.clone().into())
    }

    /// `HouseType`s available to this `Project`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Project.houseTypes",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn house_types(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::HouseType>, Error> {
        Ok(self
            .project(ctx)
            .await?
            .house_types
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// Unit mix of this `Project` referring to its `HouseType`s.
    ///
    /// Entries referring to a `HouseType` no longer present in the catalog
    /// are omitted.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Project.mix",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn mix(&self, ctx: &Context) -> Result<Vec<MixEntry>, Error> {
        let project = self.project(ctx).await?;
        project
            .mix
            .iter()
            .filter_map(|entry| {
                let house_type =
                    project.house_type(entry.house_type).cloned().map(Into::into)?;
                Some(
                    i32::try_from(entry.count)
                        .map(|count| MixEntry { house_type, count }),
                )
            })
            .collect::<Result<_, _>>()
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Financial `Assumptions` of this `Project`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Project.assumptions",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn assumptions(&self, ctx: &Context) -> Result<Assumptions, Error> {
        Ok(self.project(ctx).await?.assumptions.into())
    }

    /// `Comparable`s recorded on this `Project`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Project.comparables",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn comparables(
        &self,
        ctx: &Context,
    ) -> Result<Vec<api::Comparable>, Error> {
        Ok(self
            .project(ctx)
            .await?
            .market
            .comparables
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    /// `ComparableFilterSettings` applied when computing `MarketStats`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Project.filterSettings",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn filter_settings(
        &self,
        ctx: &Context,
    ) -> Result<api::comparable::FilterSettings, Error> {
        Ok(self.project(ctx).await?.market.filter.into())
    }

    /// Indicator whether the appraisal prices units with the market-derived
    /// rate instead of the per-`HouseType` sale rates.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Project.useMarketRate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn use_market_rate(&self, ctx: &Context) -> Result<bool, Error> {
        Ok(self.project(ctx).await?.market.use_market_rate)
    }

    /// `MarketStats` over this `Project`'s `Comparable`s.
    ///
    /// Statistics are narrowed to the provided `contextPostcode` when the
    /// strict postcode matching is enabled, falling back to the surveyed
    /// postcode if omitted.
    #[tracing::instrument(
        skip_all,
        fields(
            context_postcode = ?context_postcode,
            gql.name = "Project.marketStats",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn market_stats(
        &self,
        context_postcode: Option<api::comparable::Postcode>,
        ctx: &Context,
    ) -> Result<api::comparable::Stats, Error> {
        ctx.service()
            .execute(query::market::OfProject {
                project_id: self.id.into(),
                context_postcode: context_postcode.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::query::ProjectError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Residual `Appraisal` of this `Project` at the current moment.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Project.appraisal",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn appraisal(&self, ctx: &Context) -> Result<api::Appraisal, Error> {
        ctx.service()
            .execute(query::appraisal::OfProject {
                project_id: self.id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::query::ProjectError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// `DateTime` when this `Project` was created.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Project.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.project(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Project` was updated last time.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Project.updatedAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.project(ctx).await?.updated_at.coerce())
    }
}

/// Unique identifier of a `Project`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::project::Id)]
#[into(domain::project::Id)]
#[graphql(name = "ProjectId", transparent)]
pub struct Id(Uuid);

/// Name of a `Project`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ProjectName",
    with = scalar::Via::<domain::project::Name>,
)]
pub struct Name(domain::project::Name);

/// Currency monetary amounts are expressed in.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum Currency {
    /// Pound sterling.
    Gbp,

    /// United States dollar.
    Usd,

    /// Euro.
    Eur,
}

impl From<common::money::Currency> for Currency {
    fn from(currency: common::money::Currency) -> Self {
        use common::money::Currency as C;
        match currency {
            C::Gbp => Self::Gbp,
            C::Usd => Self::Usd,
            C::Eur => Self::Eur,
        }
    }
}

/// Survey of a `Project`'s development site.
#[derive(Clone, Debug, From)]
pub struct Survey(domain::project::Survey);

/// Survey of a `Project`'s development site.
#[graphql_object(name = "ProjectSurvey", context = Context)]
impl Survey {
    /// `Vertex`es outlining the site boundary.
    #[must_use]
    pub fn boundary(&self) -> Vec<Vertex> {
        self.0.boundary.iter().copied().map(Into::into).collect()
    }

    /// `Postcode` locating the site.
    #[must_use]
    pub fn postcode(&self) -> Option<api::comparable::Postcode> {
        self.0.postcode.clone().map(Into::into)
    }

    /// Gross `Area` of the site.
    #[must_use]
    pub fn site_area(&self) -> Area {
        self.0.site_area
    }

    /// `Percent` of the site `Area` considered developable.
    #[must_use]
    pub fn efficiency(&self) -> Percent {
        self.0.efficiency
    }

    /// Developable `Area` of the site, being its gross `Area` scaled by the
    /// efficiency.
    #[must_use]
    pub fn developable_area(&self) -> Area {
        self.0.developable_area()
    }
}

/// Geographic vertex of a site boundary.
#[derive(Clone, Copy, Debug, From)]
pub struct Vertex(domain::project::Vertex);

/// Geographic vertex of a site boundary.
#[graphql_object(name = "SurveyVertex", context = Context)]
impl Vertex {
    /// Latitude of this `SurveyVertex`, in degrees.
    #[must_use]
    pub fn lat(&self) -> f64 {
        self.0.lat
    }

    /// Longitude of this `SurveyVertex`, in degrees.
    #[must_use]
    pub fn lng(&self) -> f64 {
        self.0.lng
    }
}

/// Entry of a `Project`'s unit mix.
#[derive(Clone, Debug)]
pub struct MixEntry {
    /// [`api::HouseType`] to build.
    house_type: api::HouseType,

    /// Number of units to build.
    count: i32,
}

/// Entry of a `Project`'s unit mix.
#[graphql_object(name = "MixEntry", context = Context)]
impl MixEntry {
    /// `HouseType` to build.
    #[must_use]
    pub fn house_type(&self) -> &api::HouseType {
        &self.house_type
    }

    /// Number of units of the `HouseType` to build.
    #[must_use]
    pub fn count(&self) -> i32 {
        self.count
    }
}

/// Financial assumptions an appraisal of a `Project` is built upon.
#[derive(Clone, Copy, Debug, From)]
pub struct Assumptions(domain::finance::Assumptions);

/// Financial assumptions an appraisal of a `Project` is built upon.
#[graphql_object(name = "ProjectAssumptions", context = Context)]
impl Assumptions {
    /// Professional fees as a `Percent` of the build cost.
    #[must_use]
    pub fn fees(&self) -> Percent {
        self.0.fees
    }

    /// Contingency as a `Percent` of the build cost.
    #[must_use]
    pub fn contingency(&self) -> Percent {
        self.0.contingency
    }

    /// Target profit as a `Percent` of the gross development value.
    #[must_use]
    pub fn target_profit(&self) -> Percent {
        self.0.target_profit
    }

    /// Annual finance interest rate as a `Percent`.
    #[must_use]
    pub fn finance_rate(&self) -> Percent {
        self.0.finance_rate
    }

    /// Number of months the development finance is borrowed for.
    #[must_use]
    pub fn finance_months(&self) -> i32 {
        self.0.finance_months.get().into()
    }

    /// Cost of acquiring the land.
    #[must_use]
    pub fn land_acquisition(&self) -> Money {
        self.0.land_acquisition
    }
}

pub mod list {
    //! Definitions related to the [`Project`] list.

    use derive_more::{AsRef, From, Into};
    use juniper::{graphql_object, GraphQLScalar};
    use service::{query, read, Query as _};

    use super::{Id, Project};
    use crate::{api::scalar, AsError, Context, Error};

    /// Cursor for the `Project` list.
    #[derive(AsRef, Clone, Copy, Debug, From, GraphQLScalar, Into)]
    #[from(Id, read::project::list::Cursor)]
    #[graphql(
        name = "ProjectListCursor",
        with = scalar::Via::<read::project::list::Cursor>,
    )]
    pub struct Cursor(pub read::project::list::Cursor);

    /// Edge in the [`Project`] list.
    #[derive(Clone, Copy, Debug, From, Into)]
    pub struct Edge(read::project::list::Edge);

    /// Edge in the `Project` list.
    #[graphql_object(name = "ProjectListEdge", context = Context)]
    impl Edge {
        /// Cursor of this `ProjectListEdge`.
        #[must_use]
        pub fn cursor(&self) -> Cursor {
            self.0.cursor.into()
        }

        /// Node of this `ProjectListEdge`.
        #[must_use]
        pub fn node(&self) -> Project {
            #[expect(
                unsafe_code,
                reason = "`Edge` loaded from repository guarantees `Project` \
                          existence"
            )]
            unsafe {
                Project::new_unchecked(self.0.node)
            }
        }
    }

    /// Connection of the [`Project`] list.
    #[derive(Clone, Debug, From, Into)]
    pub struct Connection(read::project::list::Connection);

    /// Connection of the `Project` list.
    #[graphql_object(name = "ProjectListConnection", context = Context)]
    impl Connection {
        /// Edges of this `ProjectListConnection`.
        #[must_use]
        pub fn edges(&self) -> Vec<Edge> {
            self.0.edges.iter().copied().map(Into::into).collect()
        }

        /// Information about the page.
        #[must_use]
        pub fn page_info(&self) -> PageInfo {
            PageInfo {
                info: self.0.page_info(),
                start_cursor: self.0.edges.first().map(|e| e.cursor.into()),
                end_cursor: self.0.edges.last().map(|e| e.cursor.into()),
            }
        }
    }

    /// Information about a [`Connection`] page.
    #[derive(Clone, Copy, Debug)]
    pub struct PageInfo {
        /// Underlying [`read::project::list::PageInfo`].
        info: read::project::list::PageInfo,

        /// Start cursor of the page.
        start_cursor: Option<Cursor>,

        /// End cursor of the page.
        end_cursor: Option<Cursor>,
    }

    /// Information about a `ProjectListConnection` page.
    #[graphql_object(name = "ProjectListPageInfo", context = Context)]
    impl PageInfo {
        /// Indicator whether there is a next page.
        #[must_use]
        pub fn has_next_page(&self) -> bool {
            self.info.has_next_page
        }

        /// Indicator whether there is a previous page.
        #[must_use]
        pub fn has_previous_page(&self) -> bool {
            self.info.has_previous_page
        }

        /// Start cursor of the page.
        #[must_use]
        pub fn start_cursor(&self) -> &Option<Cursor> {
            &self.start_cursor
        }

        /// End cursor of the page.
        #[must_use]
        pub fn end_cursor(&self) -> &Option<Cursor> {
            &self.end_cursor
        }

        /// Total `Project` count.
        pub async fn total_count(&self, ctx: &Context) -> Result<i32, Error> {
            ctx.service()
                .execute(query::projects::TotalCount::by(()))
                .await
                .map_err(AsError::into_error)
                .map_err(ctx.error())
                .map(Into::into)
        }
    }
}
