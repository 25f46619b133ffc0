//! In-memory [`Database`] implementation.

use std::{
    collections::{hash_map::Entry, HashMap},
    sync::Arc,
};

use common::operations::{By, Insert, Select, Update};
use derive_more::{Display, Error as StdError};
use itertools::Itertools as _;
use tokio::sync::{broadcast, RwLock};
use tracerr::Traced;
use uuid::Uuid;

use crate::{
    domain::{project, Project},
    infra::{database, Database},
    read,
};

/// Capacity of the [`Memory`] changes channel.
const CHANGES_CAPACITY: usize = 64;

/// In-memory [`Database`] storing [`Project`]s.
///
/// Cheap to [`Clone`], as all the clones share the same storage.
#[derive(Clone, Debug)]
pub struct Memory(Arc<Inner>);

/// Inner state of a [`Memory`] database.
#[derive(Debug)]
struct Inner {
    /// Stored [`Project`]s.
    projects: RwLock<HashMap<project::Id, Project>>,

    /// Channel notifying about changed [`Project`]s.
    changes: broadcast::Sender<project::Id>,
}

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGES_CAPACITY);
        Self(Arc::new(Inner {
            projects: RwLock::new(HashMap::new()),
            changes,
        }))
    }

    /// Returns a [`broadcast::Receiver`] of IDs of changed [`Project`]s.
    #[must_use]
    pub fn changes(&self) -> broadcast::Receiver<project::Id> {
        self.0.changes.subscribe()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Database<Insert<Project>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(project): Insert<Project>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = project.id;
        match self.0.projects.write().await.entry(id) {
            Entry::Occupied(_) => {
                return Err(tracerr::new!(database::Error::from(
                    Error::DuplicateProject(id),
                )));
            }
            Entry::Vacant(e) => {
                let _ = e.insert(project);
            }
        }
        let _ = self.0.changes.send(id);
        Ok(())
    }
}

impl Database<Update<Project>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(project): Update<Project>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = project.id;
        match self.0.projects.write().await.get_mut(&id) {
            Some(stored) => *stored = project,
            None => {
                return Err(tracerr::new!(database::Error::from(
                    Error::UnknownProject(id),
                )));
            }
        }
        let _ = self.0.changes.send(id);
        Ok(())
    }
}

impl Database<Select<By<Option<Project>, project::Id>>> for Memory {
    type Ok = Option<Project>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Project>, project::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.0.projects.read().await.get(&by.into_inner()).cloned())
    }
}

impl
    Database<
        Select<By<read::project::list::Page, read::project::list::Selector>>,
    > for Memory
{
    type Ok = read::project::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::project::list::Page, read::project::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::project::list::Selector {
            arguments,
            filter: read::project::list::Filter { name },
        } = by.into_inner();

        let needle = name.map(|n| AsRef::<str>::as_ref(&n).to_lowercase());
        let ids = self
            .0
            .projects
            .read()
            .await
            .values()
            .filter(|p| {
                needle.as_ref().is_none_or(|needle| {
                    AsRef::<str>::as_ref(&p.name)
                        .to_lowercase()
                        .contains(needle)
                })
            })
            .map(|p| (p.created_at, Uuid::from(p.id), p.id))
            .sorted_unstable_by_key(|(created_at, uuid, _)| {
                (*created_at, *uuid)
            })
            .map(|(_, _, id)| id)
            .collect::<Vec<_>>();

        let limit = arguments.limit();
        let including = arguments.kind().is_including();
        let position = arguments
            .cursor()
            .map(|cursor| ids.iter().position(|id| id == cursor));

        let (edges, has_more) = match (arguments.kind().is_forward(), position)
        {
            // A cursor pointing past the stored list yields nothing.
            (_, Some(None)) => (Vec::new(), false),
            (true, position) => {
                let start = position.flatten().map_or(0, |p| {
                    if including {
                        p
                    } else {
                        p + 1
                    }
                });
                let has_more = ids.len().saturating_sub(start) > limit;
                let edges = ids[start..]
                    .iter()
                    .take(limit)
                    .map(|id| (*id, *id))
                    .collect::<Vec<_>>();
                (edges, has_more)
            }
            (false, position) => {
                let end = position.flatten().map_or(ids.len(), |p| {
                    if including {
                        p + 1
                    } else {
                        p
                    }
                });
                let edges = ids[..end]
                    .iter()
                    .rev()
                    .take(limit)
                    .map(|id| (*id, *id))
                    .collect::<Vec<_>>();
                (edges, end > limit)
            }
        };

        Ok(read::project::list::Page::new(&arguments, edges, has_more))
    }
}

impl Database<Select<By<read::project::list::TotalCount, ()>>> for Memory {
    type Ok = read::project::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::project::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let len = self.0.projects.read().await.len();
        Ok(i32::try_from(len).unwrap_or(i32::MAX).into())
    }
}

/// [`Memory`] database error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// [`Project`] already exists.
    #[display("`Project(id: {_0})` already exists")]
    DuplicateProject(#[error(not(source))] project::Id),

    /// [`Project`] doesn't exist.
    #[display("`Project(id: {_0})` doesn't exist")]
    UnknownProject(#[error(not(source))] project::Id),
}

#[cfg(test)]
mod spec {
    use common::{
        money::Currency,
        operations::{By, Insert, Select, Update},
        pagination::Arguments,
    };

    use super::{Database as _, Memory};
    use crate::{
        domain::{project, Project},
        infra::database,
        read,
    };

    fn project(name: &str) -> Project {
        Project::new(project::Name::new(name).unwrap(), Currency::Gbp)
    }

    fn list_selector(
        arguments: Arguments<project::Id>,
        name: Option<&str>,
    ) -> Select<By<read::project::list::Page, read::project::list::Selector>>
    {
        Select(By::new(read::project::list::Selector {
            arguments,
            filter: read::project::list::Filter {
                name: name.map(|n| project::Name::new(n).unwrap()),
            },
        }))
    }

    #[tokio::test]
    async fn inserts_and_selects_by_id() {
        let memory = Memory::new();
        let project = project("Riverside Gardens");

        memory.execute(Insert(project.clone())).await.unwrap();

        let selected = memory
            .execute(Select(By::<Option<Project>, _>::new(project.id)))
            .await
            .unwrap();
        assert_eq!(selected.map(|p| p.id), Some(project.id));

        let missing = memory
            .execute(Select(By::<Option<Project>, _>::new(project::Id::new())))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn rejects_duplicate_insert() {
        let memory = Memory::new();
        let project = project("Riverside Gardens");

        memory.execute(Insert(project.clone())).await.unwrap();
        let err = memory.execute(Insert(project.clone())).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            database::Error::Memory(super::Error::DuplicateProject(id))
                if *id == project.id,
        ));
    }

    #[tokio::test]
    async fn updates_stored_project() {
        let memory = Memory::new();
        let mut project = project("Riverside Gardens");

        memory.execute(Insert(project.clone())).await.unwrap();

        project.name = project::Name::new("Hilltop View").unwrap();
        memory.execute(Update(project.clone())).await.unwrap();

        let selected = memory
            .execute(Select(By::<Option<Project>, _>::new(project.id)))
            .await
            .unwrap();
        assert_eq!(
            selected.map(|p| p.name),
            Some(project::Name::new("Hilltop View").unwrap()),
        );
    }

    #[tokio::test]
    async fn rejects_update_of_unknown_project() {
        let memory = Memory::new();

        let err = memory
            .execute(Update(project("Riverside Gardens")))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            database::Error::Memory(super::Error::UnknownProject(_)),
        ));
    }

    #[tokio::test]
    async fn pages_forward_in_creation_order() {
        let memory = Memory::new();
        let mut ids = Vec::new();
        for name in ["First", "Second", "Third"] {
            let project = project(name);
            ids.push(project.id);
            memory.execute(Insert(project)).await.unwrap();
        }

        let args = Arguments::new(Some(2), None, None, None, 10).unwrap();
        let page = memory.execute(list_selector(args, None)).await.unwrap();

        assert!(page.has_more);
        assert_eq!(
            page.edges.iter().map(|e| e.node).collect::<Vec<_>>(),
            ids[..2],
        );

        let args =
            Arguments::new(Some(2), Some(ids[1]), None, None, 10).unwrap();
        let page = memory.execute(list_selector(args, None)).await.unwrap();

        assert!(!page.has_more);
        assert_eq!(
            page.edges.iter().map(|e| e.node).collect::<Vec<_>>(),
            ids[2..],
        );
    }

    #[tokio::test]
    async fn pages_backward_from_the_end() {
        let memory = Memory::new();
        let mut ids = Vec::new();
        for name in ["First", "Second", "Third"] {
            let project = project(name);
            ids.push(project.id);
            memory.execute(Insert(project)).await.unwrap();
        }

        let args = Arguments::new(None, None, Some(2), None, 10).unwrap();
        let page = memory.execute(list_selector(args, None)).await.unwrap();

        assert!(page.has_more);
        assert_eq!(
            page.edges.iter().map(|e| e.node).collect::<Vec<_>>(),
            [ids[2], ids[1]],
        );
    }

    #[tokio::test]
    async fn unknown_cursor_yields_empty_page() {
        let memory = Memory::new();
        memory.execute(Insert(project("Lonely"))).await.unwrap();

        let args =
            Arguments::new(Some(2), Some(project::Id::new()), None, None, 10)
                .unwrap();
        let page = memory.execute(list_selector(args, None)).await.unwrap();

        assert!(page.edges.is_empty());
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn filters_list_by_name_part() {
        let memory = Memory::new();
        let riverside = project("Riverside Gardens");
        let riverside_id = riverside.id;
        memory.execute(Insert(riverside)).await.unwrap();
        memory.execute(Insert(project("Hilltop View"))).await.unwrap();

        let args = Arguments::new(Some(10), None, None, None, 10).unwrap();
        let page = memory
            .execute(list_selector(args, Some("riverside")))
            .await
            .unwrap();

        assert_eq!(
            page.edges.iter().map(|e| e.node).collect::<Vec<_>>(),
            [riverside_id],
        );
    }

    #[tokio::test]
    async fn counts_stored_projects() {
        let memory = Memory::new();
        memory.execute(Insert(project("First"))).await.unwrap();
        memory.execute(Insert(project("Second"))).await.unwrap();

        let count = memory
            .execute(Select(By::<read::project::list::TotalCount, _>::new(())))
            .await
            .unwrap();
        assert_eq!(i32::from(count), 2);
    }

    #[tokio::test]
    async fn notifies_about_changes() {
        let memory = Memory::new();
        let mut changes = memory.changes();
        let project = project("Riverside Gardens");

        memory.execute(Insert(project.clone())).await.unwrap();
        assert_eq!(changes.recv().await.unwrap(), project.id);

        memory.execute(Update(project.clone())).await.unwrap();
        assert_eq!(changes.recv().await.unwrap(), project.id);
    }
}
