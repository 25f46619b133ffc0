//! [`Command`] definition.

pub mod add_comparable;
pub mod create_project;
pub mod delete_house_type;
pub mod remove_comparable;
pub mod rename_project;
pub mod set_market_pricing;
pub mod set_unit_mix;
pub mod update_assumptions;
pub mod update_filter_settings;
pub mod update_survey;
pub mod upsert_house_type;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    add_comparable::AddComparable, create_project::CreateProject,
    delete_house_type::DeleteHouseType, remove_comparable::RemoveComparable,
    rename_project::RenameProject, set_market_pricing::SetMarketPricing,
    set_unit_mix::SetUnitMix, update_assumptions::UpdateAssumptions,
    update_filter_settings::UpdateFilterSettings, update_survey::UpdateSurvey,
    upsert_house_type::UpsertHouseType,
};
