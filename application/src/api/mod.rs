//! GraphQL API definitions.

pub mod appraisal;
pub mod comparable;
pub mod house_type;
mod mutation;
pub mod project;
mod query;
pub mod scalar;
mod subscription;

use crate::define_error;

pub use self::{
    appraisal::Appraisal,
    comparable::Comparable,
    house_type::HouseType,
    mutation::Mutation,
    project::Project,
    query::Query,
    subscription::Subscription,
};

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;

define_error! {
    enum PaginationError {
        #[code = "AMBIGUOUS_PAGINATION_ARGUMENTS"]
        #[status = BAD_REQUEST]
        #[message = "Ambiguous pagination arguments"]
        Ambiguous,
    }
}
