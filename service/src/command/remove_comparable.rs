//! [`Command`] for removing a [`Comparable`].

use common::{
    operations::{By, Select, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Comparable;
use crate::{
    domain::{comparable, project, Project},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for removing a [`Comparable`] from a [`Project`].
#[derive(Clone, Copy, Debug, From)]
pub struct RemoveComparable {
    /// ID of the [`Project`] owning the [`Comparable`].
    pub project_id: project::Id,

    /// ID of the [`Comparable`] to remove.
    pub comparable_id: comparable::Id,
}

impl<Db> Command<RemoveComparable> for Service<Db>
where
    Db: Database<
            Select<By<Option<Project>, project::Id>>,
            Ok = Option<Project>,
            Err = Traced<database::Error>,
        > + Database<Update<Project>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Project;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RemoveComparable,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RemoveComparable {
            project_id,
            comparable_id,
        } = cmd;

        let mut project = self
            .database()
            .execute(Select(By::<Option<Project>, _>::new(project_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProjectNotExists(project_id))
            .map_err(tracerr::wrap!())?;

        let before = project.market.comparables.len();
        project.market.comparables.retain(|c| c.id != comparable_id);
        if project.market.comparables.len() == before {
            return Err(tracerr::new!(E::ComparableNotExists(comparable_id)));
        }

        project.updated_at = DateTime::now().coerce();
        self.database()
            .execute(Update(project.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(project)
    }
}

/// Error of [`RemoveComparable`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Project`] doesn't exist.
    #[display("`Project(id: {_0})` does not exist")]
    #[from(ignore)]
    ProjectNotExists(#[error(not(source))] project::Id),

    /// [`Comparable`] doesn't exist.
    #[display("`Comparable(id: {_0})` does not exist")]
    #[from(ignore)]
    ComparableNotExists(#[error(not(source))] comparable::Id),
}
