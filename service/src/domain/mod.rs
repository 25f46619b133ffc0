//! Domain definitions.

pub mod appraisal;
pub mod comparable;
pub mod comps;
pub mod finance;
pub mod house_type;
pub mod project;

pub use self::{
    comparable::Comparable, house_type::HouseType, project::Project,
};
