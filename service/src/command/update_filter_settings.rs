//! [`Command`] for updating a [`Project`]'s [`FilterSettings`].

use common::{
    operations::{By, Select, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Comparable;
use crate::{
    domain::{comparable::FilterSettings, project, Project},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating the [`FilterSettings`] applied to a [`Project`]'s
/// [`Comparable`]s.
#[derive(Clone, Copy, Debug, From)]
pub struct UpdateFilterSettings {
    /// ID of the [`Project`] to update the [`FilterSettings`] of.
    pub project_id: project::Id,

    /// New [`FilterSettings`] of the [`Project`].
    pub filter: FilterSettings,
}

impl<Db> Command<UpdateFilterSettings> for Service<Db>
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
        cmd: UpdateFilterSettings,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateFilterSettings { project_id, filter } = cmd;

        let mut project = self
            .database()
            .execute(Select(By::<Option<Project>, _>::new(project_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProjectNotExists(project_id))
            .map_err(tracerr::wrap!())?;
        if project.market.filter == filter {
            return Ok(project);
        }

        project.market.filter = filter;
        project.updated_at = DateTime::now().coerce();
        self.database()
            .execute(Update(project.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(project)
    }
}

/// Error of [`UpdateFilterSettings`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Project`] doesn't exist.
    #[display("`Project(id: {_0})` does not exist")]
    #[from(ignore)]
    ProjectNotExists(#[error(not(source))] project::Id),
}
