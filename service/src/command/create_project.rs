//! [`Command`] for creating a new [`Project`].

use common::operations::Insert;
use derive_more::From;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::project::Name;
use crate::{
    domain::{project, Project},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Project`].
#[derive(Clone, Debug, From)]
pub struct CreateProject {
    /// [`Name`] of a new [`Project`].
    pub name: project::Name,
}

impl<Db> Command<CreateProject> for Service<Db>
where
    Db: Database<Insert<Project>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Project;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateProject,
    ) -> Result<Self::Ok, Self::Err> {
        let CreateProject { name } = cmd;

        let project = Project::new(name, self.config().currency);

        self.database()
            .execute(Insert(project.clone()))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(project)
    }
}

/// Error of [`CreateProject`] [`Command`] execution.
pub type ExecutionError = database::Error;
