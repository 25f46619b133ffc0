//! [`Command`] for setting a [`Project`]'s unit mix.

use common::{
    operations::{By, Select, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use itertools::Itertools as _;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::HouseType;
use crate::{
    domain::{house_type, project, project::MixEntry, Project},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for setting a [`Project`]'s unit mix.
#[derive(Clone, Debug, From)]
pub struct SetUnitMix {
    /// ID of the [`Project`] to set the unit mix of.
    pub project_id: project::Id,

    /// New unit mix of the [`Project`].
    pub mix: Vec<MixEntry>,
}

impl<Db> Command<SetUnitMix> for Service<Db>
where
    Db: Database<
            Select<By<Option<Project>, project::Id>>,
            Ok = Option<Project>,
            Err = Traced<database::Error>,
        > + Database<Update<Project>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Project;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: SetUnitMix) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let SetUnitMix { project_id, mix } = cmd;

        let mut project = self
            .database()
            .execute(Select(By::<Option<Project>, _>::new(project_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProjectNotExists(project_id))
            .map_err(tracerr::wrap!())?;

        if let Some(id) =
            mix.iter().map(|e| e.house_type).duplicates().next()
        {
            return Err(tracerr::new!(E::DuplicateHouseType(id)));
        }
        if let Some(id) = mix
            .iter()
            .map(|e| e.house_type)
            .find(|id| project.house_type(*id).is_none())
        {
            return Err(tracerr::new!(E::HouseTypeNotExists(id)));
        }

        if project.mix == mix {
            return Ok(project);
        }

        project.mix = mix;
        project.updated_at = DateTime::now().coerce();
        self.database()
            .execute(Update(project.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(project)
    }
}

/// Error of [`SetUnitMix`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Project`] doesn't exist.
    #[display("`Project(id: {_0})` does not exist")]
    #[from(ignore)]
    ProjectNotExists(#[error(not(source))] project::Id),

    /// [`HouseType`] doesn't exist.
    #[display("`HouseType(id: {_0})` does not exist")]
    #[from(ignore)]
    HouseTypeNotExists(#[error(not(source))] house_type::Id),

    /// Multiple mix entries refer to the same [`HouseType`].
    #[display("`HouseType(id: {_0})` occurs in the mix more than once")]
    #[from(ignore)]
    DuplicateHouseType(#[error(not(source))] house_type::Id),
}

#[cfg(test)]
mod spec {
    use common::money::Currency;

    use super::{Command as _, ExecutionError, SetUnitMix};
    use crate::{
        command::CreateProject,
        domain::{house_type, project, project::MixEntry, Project},
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

    async fn create(service: &Service<Memory>) -> Project {
        service
            .execute(CreateProject {
                name: project::Name::new("Riverside Gardens").unwrap(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn replaces_unit_mix() {
        let service = service();
        let project = create(&service).await;
        let mix = vec![
            MixEntry {
                house_type: project.house_types[0].id,
                count: 4,
            },
            MixEntry {
                house_type: project.house_types[3].id,
                count: 2,
            },
        ];

        let project = service
            .execute(SetUnitMix {
                project_id: project.id,
                mix: mix.clone(),
            })
            .await
            .unwrap();

        assert_eq!(project.mix, mix);
    }

    #[tokio::test]
    async fn rejects_duplicate_entries() {
        let service = service();
        let project = create(&service).await;
        let id = project.house_types[0].id;

        let err = service
            .execute(SetUnitMix {
                project_id: project.id,
                mix: vec![
                    MixEntry {
                        house_type: id,
                        count: 1,
                    },
                    MixEntry {
                        house_type: id,
                        count: 2,
                    },
                ],
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::DuplicateHouseType(i) if *i == id,
        ));
    }

    #[tokio::test]
    async fn rejects_unknown_house_type() {
        let service = service();
        let project = create(&service).await;

        let err = service
            .execute(SetUnitMix {
                project_id: project.id,
                mix: vec![MixEntry {
                    house_type: house_type::Id::new(),
                    count: 1,
                }],
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::HouseTypeNotExists(_),
        ));
    }
}
