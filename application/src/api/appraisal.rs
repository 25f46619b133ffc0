//! [`Appraisal`]-related definitions.

use common::Money;
use derive_more::From;
use juniper::{graphql_object, GraphQLEnum};
use rust_decimal::prelude::ToPrimitive as _;
use service::domain;

use crate::{api, Context};

/// Residual land value appraisal of a `Project`.
#[derive(Clone, Copy, Debug, From)]
pub struct Appraisal(domain::appraisal::Totals);

/// Residual land value appraisal of a `Project`.
#[graphql_object(context = Context)]
impl Appraisal {
    /// Gross development value, being the projected sale revenue of all the
    /// units.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Appraisal.gdv",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn gdv(&self) -> Money {
        self.0.gdv
    }

    /// Cost of building all the units.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Appraisal.buildCost",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn build_cost(&self) -> Money {
        self.0.build_cost
    }

    /// Professional fees.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Appraisal.fees",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn fees(&self) -> Money {
        self.0.fees
    }

    /// Contingency allowance.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Appraisal.contingency",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn contingency(&self) -> Money {
        self.0.contingency
    }

    /// Cost of the development finance.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Appraisal.financeCost",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn finance_cost(&self) -> Money {
        self.0.finance_cost
    }

    /// Profit required to hit the target margin.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Appraisal.targetProfit",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn target_profit(&self) -> Money {
        self.0.target_profit
    }

    /// All the costs of the development, including the land acquisition.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Appraisal.totalCosts",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn total_costs(&self) -> Money {
        self.0.total_costs
    }

    /// Maximum price payable for the land while still hitting the target
    /// profit margin.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Appraisal.residualLandValue",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn residual_land_value(&self) -> Money {
        self.0.residual_land_value
    }

    /// Profit actually achieved at the assumed land acquisition cost.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Appraisal.actualProfit",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn actual_profit(&self) -> Money {
        self.0.actual_profit
    }

    /// Achieved profit as a percentage of the gross development value.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Appraisal.actualProfitPct",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn actual_profit_pct(&self) -> f64 {
        self.0.actual_profit_pct.to_f64().unwrap_or_default()
    }

    /// All the costs as a percentage of the gross development value.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Appraisal.costToGdvPct",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn cost_to_gdv_pct(&self) -> f64 {
        self.0.cost_to_gdv_pct.to_f64().unwrap_or_default()
    }

    /// `Viability` verdict of the scheme.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Appraisal.viability",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn viability(&self) -> Viability {
        self.0.viability.into()
    }
}

/// Viability verdict of a `Project`'s appraisal.
#[derive(Clone, Copy, Debug, GraphQLEnum)]
pub enum Viability {
    /// Residual land value is non-negative and the achieved profit meets the
    /// target margin.
    Viable,

    /// Residual land value is non-negative, while the achieved profit misses
    /// the target margin by fewer than 10 percentage points.
    AtRisk,

    /// The scheme cannot pay for its land at the target margin.
    Unviable,
}

impl From<domain::appraisal::Viability> for Viability {
    fn from(viability: domain::appraisal::Viability) -> Self {
        use domain::appraisal::Viability as V;
        match viability {
            V::Viable => Self::Viable,
            V::AtRisk => Self::AtRisk,
            V::Unviable => Self::Unviable,
        }
    }
}
