//! [`Command`] for deleting a [`HouseType`].

use common::{
    operations::{By, Select, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::HouseType;
use crate::{
    domain::{house_type, project, Project},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`HouseType`] of a [`Project`].
///
/// Unit mix entries referring to the deleted [`HouseType`] are removed along
/// with it.
#[derive(Clone, Copy, Debug, From)]
pub struct DeleteHouseType {
    /// ID of the [`Project`] owning the [`HouseType`].
    pub project_id: project::Id,

    /// ID of the [`HouseType`] to delete.
    pub house_type_id: house_type::Id,
}

impl<Db> Command<DeleteHouseType> for Service<Db>
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
        cmd: DeleteHouseType,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteHouseType {
            project_id,
            house_type_id,
        } = cmd;

        let mut project = self
            .database()
            .execute(Select(By::<Option<Project>, _>::new(project_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProjectNotExists(project_id))
            .map_err(tracerr::wrap!())?;

        if project.house_type(house_type_id).is_none() {
            return Err(tracerr::new!(E::HouseTypeNotExists(house_type_id)));
        }

        project.house_types.retain(|t| t.id != house_type_id);
        project.mix.retain(|e| e.house_type != house_type_id);
        project.updated_at = DateTime::now().coerce();
        self.database()
            .execute(Update(project.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(project)
    }
}

/// Error of [`DeleteHouseType`] [`Command`] execution.
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
}

#[cfg(test)]
mod spec {
    use common::money::Currency;

    use super::{Command as _, DeleteHouseType, ExecutionError};
    use crate::{
        command::{CreateProject, SetUnitMix},
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
    async fn deletes_house_type_and_its_mix_entries() {
        let service = service();
        let project = create(&service).await;
        let deleted = project.house_types[0].id;
        let kept = project.house_types[1].id;

        let project = service
            .execute(SetUnitMix {
                project_id: project.id,
                mix: vec![
                    MixEntry {
                        house_type: deleted,
                        count: 3,
                    },
                    MixEntry {
                        house_type: kept,
                        count: 2,
                    },
                ],
            })
            .await
            .unwrap();

        let project = service
            .execute(DeleteHouseType {
                project_id: project.id,
                house_type_id: deleted,
            })
            .await
            .unwrap();

        assert_eq!(project.house_types.len(), 5);
        assert!(project.house_type(deleted).is_none());
        assert_eq!(
            project.mix,
            [MixEntry {
                house_type: kept,
                count: 2,
            }],
        );
    }

    #[tokio::test]
    async fn fails_for_unknown_house_type() {
        let service = service();
        let project = create(&service).await;

        let err = service
            .execute(DeleteHouseType {
                project_id: project.id,
                house_type_id: house_type::Id::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::HouseTypeNotExists(_),
        ));
    }
}
