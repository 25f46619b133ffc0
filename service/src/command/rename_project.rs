//! [`Command`] for renaming a [`Project`].

use common::{
    operations::{By, Select, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::project::Name;
use crate::{
    domain::{project, Project},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for renaming a [`Project`].
#[derive(Clone, Debug, From)]
pub struct RenameProject {
    /// ID of the [`Project`] to rename.
    pub project_id: project::Id,

    /// New [`Name`] of the [`Project`].
    pub name: project::Name,
}

impl<Db> Command<RenameProject> for Service<Db>
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
        cmd: RenameProject,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RenameProject { project_id, name } = cmd;

        let mut project = self
            .database()
            .execute(Select(By::<Option<Project>, _>::new(project_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProjectNotExists(project_id))
            .map_err(tracerr::wrap!())?;
        if project.name == name {
            return Ok(project);
        }

        project.name = name;
        project.updated_at = DateTime::now().coerce();
        self.database()
            .execute(Update(project.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(project)
    }
}

/// Error of [`RenameProject`] [`Command`] execution.
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

#[cfg(test)]
mod spec {
    use common::money::Currency;

    use super::{Command as _, ExecutionError, RenameProject};
    use crate::{
        command::CreateProject,
        domain::{project, Project},
        infra::Memory,
        Config, Service,
    };

    fn service() -> Service<Memory> {
        Service::new(
            Config {
                currency: Currency::Gbp,
            },
            Memory::new(),
        )
    }

    async fn create(service: &Service<Memory>, name: &str) -> Project {
        service
            .execute(CreateProject {
                name: project::Name::new(name).unwrap(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn renames_stored_project() {
        let service = service();
        let project = create(&service, "Riverside Gardens").await;

        let renamed = service
            .execute(RenameProject {
                project_id: project.id,
                name: project::Name::new("Hilltop View").unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(AsRef::<str>::as_ref(&renamed.name), "Hilltop View");
        assert!(renamed.updated_at >= project.updated_at);
    }

    #[tokio::test]
    async fn fails_for_unknown_project() {
        let service = service();

        let err = service
            .execute(RenameProject {
                project_id: project::Id::new(),
                name: project::Name::new("Hilltop View").unwrap(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::ProjectNotExists(_)));
    }
}
