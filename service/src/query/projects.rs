//! [`Query`] collection related to the multiple [`Project`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Project, Query};

use super::DatabaseQuery;

/// Queries a list of [`Project`]s.
pub type List = DatabaseQuery<
    By<read::project::list::Page, read::project::list::Selector>,
>;

/// Queries total count of [`Project`] list items.
pub type TotalCount = DatabaseQuery<By<read::project::list::TotalCount, ()>>;
