//! [`Command`] for updating a [`Project`]'s [`Assumptions`].

use common::{
    operations::{By, Select, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{finance::Assumptions, project, Project},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for updating a [`Project`]'s financial [`Assumptions`].
#[derive(Clone, Copy, Debug, From)]
pub struct UpdateAssumptions {
    /// ID of the [`Project`] to update the [`Assumptions`] of.
    pub project_id: project::Id,

    /// New [`Assumptions`] of the [`Project`].
    pub assumptions: Assumptions,
}

impl<Db> Command<UpdateAssumptions> for Service<Db>
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
        cmd: UpdateAssumptions,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateAssumptions {
            project_id,
            assumptions,
        } = cmd;

        let mut project = self
            .database()
            .execute(Select(By::<Option<Project>, _>::new(project_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProjectNotExists(project_id))
            .map_err(tracerr::wrap!())?;

        if assumptions.land_acquisition.currency != project.currency {
            return Err(tracerr::new!(E::CurrencyMismatch(
                assumptions.land_acquisition.currency,
            )));
        }

        if project.assumptions == assumptions {
            return Ok(project);
        }

        project.assumptions = assumptions;
        project.updated_at = DateTime::now().coerce();
        self.database()
            .execute(Update(project.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(project)
    }
}

/// Error of [`UpdateAssumptions`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Project`] doesn't exist.
    #[display("`Project(id: {_0})` does not exist")]
    #[from(ignore)]
    ProjectNotExists(#[error(not(source))] project::Id),

    /// Provided land acquisition cost is in a wrong [`Currency`].
    ///
    /// [`Currency`]: common::money::Currency
    #[display(
        "Land acquisition currency `{_0}` doesn't match the `Project`'s one"
    )]
    #[from(ignore)]
    CurrencyMismatch(#[error(not(source))] common::money::Currency),
}
