//! [`Command`] for toggling a [`Project`]'s market pricing.

use common::{
    operations::{By, Select, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::HouseType;
use crate::{
    domain::{project, Project},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for toggling whether a [`Project`]'s appraisal prices its
/// units with the market-derived rate instead of the per-[`HouseType`] sale
/// rates.
#[derive(Clone, Copy, Debug, From)]
pub struct SetMarketPricing {
    /// ID of the [`Project`] to toggle the market pricing of.
    pub project_id: project::Id,

    /// Indicator whether the market-derived rate should be used.
    pub use_market_rate: bool,
}

impl<Db> Command<SetMarketPricing> for Service<Db>
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
        cmd: SetMarketPricing,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SetMarketPricing {
            project_id,
            use_market_rate,
        } = cmd;

        let mut project = self
            .database()
            .execute(Select(By::<Option<Project>, _>::new(project_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProjectNotExists(project_id))
            .map_err(tracerr::wrap!())?;
        if project.market.use_market_rate == use_market_rate {
            return Ok(project);
        }

        project.market.use_market_rate = use_market_rate;
        project.updated_at = DateTime::now().coerce();
        self.database()
            .execute(Update(project.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(project)
    }
}

/// Error of [`SetMarketPricing`] [`Command`] execution.
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
