//! [`Query`] collection related to a [`Project`]'s market evidence.

use common::{
    operations::{By, Select},
    DateTime,
};
use tracerr::Traced;

use crate::{
    domain::{comparable, comps::Stats, project, Project},
    infra::{database, Database},
    Query, Service,
};

/// [`Query`] of market [`Stats`] over a [`Project`]'s [`Comparable`]s.
///
/// Returns [`None`] if the [`Project`] doesn't exist.
///
/// [`Comparable`]: crate::domain::Comparable
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OfProject {
    /// ID of the [`Project`] to compute the [`Stats`] for.
    pub project_id: project::Id,

    /// [`comparable::Postcode`] to narrow the [`Stats`] to, when the strict
    /// postcode matching is enabled.
    ///
    /// The [`Project`]'s surveyed postcode is used if omitted.
    pub context_postcode: Option<comparable::Postcode>,
}

impl<Db> Query<OfProject> for Service<Db>
where
    Db: Database<
        Select<By<Option<Project>, project::Id>>,
        Ok = Option<Project>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Stats>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        OfProject {
            project_id,
            context_postcode,
        }: OfProject,
    ) -> Result<Self::Ok, Self::Err> {
        let project = self
            .database()
            .execute(Select(By::<Option<Project>, _>::new(project_id)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(project.map(|p| {
            let context = context_postcode.or_else(|| p.survey.postcode.clone());
            Stats::new(
                &p.market.comparables,
                &p.market.filter,
                context.as_ref(),
                p.currency,
                DateTime::now(),
            )
        }))
    }
}
