//! [`Query`] collection related to a [`Project`]'s appraisal.

use common::{
    operations::{By, Select},
    DateTime,
};
use tracerr::Traced;

use crate::{
    domain::{appraisal::Totals, project, Project},
    infra::{database, Database},
    Query, Service,
};

/// [`Query`] to appraise a [`Project`] at the current moment.
///
/// Returns [`None`] if the [`Project`] doesn't exist.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OfProject {
    /// ID of the [`Project`] to appraise.
    pub project_id: project::Id,
}

impl<Db> Query<OfProject> for Service<Db>
where
    Db: Database<
        Select<By<Option<Project>, project::Id>>,
        Ok = Option<Project>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Totals>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        OfProject { project_id }: OfProject,
    ) -> Result<Self::Ok, Self::Err> {
        let project = self
            .database()
            .execute(Select(By::<Option<Project>, _>::new(project_id)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(project.map(|p| Totals::of_project(&p, DateTime::now())))
    }
}
