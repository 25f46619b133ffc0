//! [`Project`]-related read definitions.

#[cfg(doc)]
use crate::domain::Project;

pub mod list {
    //! [`Project`] list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain::project;
    #[cfg(doc)]
    use crate::domain::Project;

    define_pagination!(Cursor, Node, Filter);

    /// Node in a [`Connection`].
    pub type Node = project::Id;

    /// Cursor pointing to a specific [`Project`] in a list.
    pub type Cursor = project::Id;

    /// Filter for [`Selector`].
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// [`project::Name`] (or its part) to fuzzy search for.
        pub name: Option<project::Name>,
    }

    /// Total count of [`Project`] list items.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
