//! [`Command`] for creating or updating a [`HouseType`].

use common::{
    operations::{By, Select, Update},
    Area, DateTime, Rate,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::house_type::Name;
use crate::{
    domain::{house_type, project, HouseType, Project},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating or updating a [`HouseType`] of a [`Project`].
#[derive(Clone, Debug)]
pub struct UpsertHouseType {
    /// ID of the [`Project`] owning the [`HouseType`].
    pub project_id: project::Id,

    /// ID of the [`HouseType`] to update.
    ///
    /// A new [`HouseType`] is created if [`None`].
    pub house_type_id: Option<house_type::Id>,

    /// [`Name`] of the [`HouseType`].
    pub name: house_type::Name,

    /// Number of bedrooms of the [`HouseType`].
    pub beds: house_type::Beds,

    /// Floor [`Area`] of the [`HouseType`].
    pub floor_area: Area,

    /// Build cost [`Rate`] of the [`HouseType`].
    pub build_rate: Rate,

    /// Sale price [`Rate`] of the [`HouseType`].
    pub sale_rate: Rate,
}

impl<Db> Command<UpsertHouseType> for Service<Db>
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
        cmd: UpsertHouseType,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpsertHouseType {
            project_id,
            house_type_id,
            name,
            beds,
            floor_area,
            build_rate,
            sale_rate,
        } = cmd;

        let mut project = self
            .database()
            .execute(Select(By::<Option<Project>, _>::new(project_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProjectNotExists(project_id))
            .map_err(tracerr::wrap!())?;

        if build_rate.currency != project.currency {
            return Err(tracerr::new!(E::CurrencyMismatch(
                build_rate.currency,
            )));
        }
        if sale_rate.currency != project.currency {
            return Err(tracerr::new!(E::CurrencyMismatch(
                sale_rate.currency,
            )));
        }
        if floor_area.is_zero() {
            return Err(tracerr::new!(E::ZeroFloorArea));
        }
        if build_rate.amount < Decimal::ZERO {
            return Err(tracerr::new!(E::NegativeRate(build_rate)));
        }
        if sale_rate.amount < Decimal::ZERO {
            return Err(tracerr::new!(E::NegativeRate(sale_rate)));
        }

        match house_type_id {
            Some(id) => {
                let Some(existing) =
                    project.house_types.iter_mut().find(|t| t.id == id)
                else {
                    return Err(tracerr::new!(E::HouseTypeNotExists(id)));
                };
                existing.name = name;
                existing.beds = beds;
                existing.floor_area = floor_area;
                existing.build_rate = build_rate;
                existing.sale_rate = sale_rate;
            }
            None => project.house_types.push(HouseType {
                id: house_type::Id::new(),
                name,
                beds,
                floor_area,
                build_rate,
                sale_rate,
                is_default: false,
            }),
        }

        project.updated_at = DateTime::now().coerce();
        self.database()
            .execute(Update(project.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(project)
    }
}

/// Error of [`UpsertHouseType`] [`Command`] execution.
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

    /// Provided [`Rate`]s are in a wrong [`Currency`].
    ///
    /// [`Currency`]: common::money::Currency
    #[display("`Rate` currency `{_0}` doesn't match the `Project`'s one")]
    #[from(ignore)]
    CurrencyMismatch(#[error(not(source))] common::money::Currency),

    /// Provided floor [`Area`] is zero.
    #[display("`HouseType` floor area cannot be zero")]
    ZeroFloorArea,

    /// Provided [`Rate`] is negative.
    #[display("`Rate` cannot be negative: {_0}")]
    #[from(ignore)]
    NegativeRate(#[error(not(source))] Rate),
}

#[cfg(test)]
mod spec {
    use common::{area, money::Currency, Area, Rate};
    use rust_decimal::Decimal;

    use super::{Command as _, ExecutionError, UpsertHouseType};
    use crate::{
        command::CreateProject,
        domain::{house_type, project, Project},
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

    fn rate(amount: i64, currency: Currency) -> Rate {
        Rate {
            amount: amount.into(),
            currency,
            per: area::Unit::SquareFeet,
        }
    }

    fn upsert(
        project_id: project::Id,
        house_type_id: Option<house_type::Id>,
        currency: Currency,
    ) -> UpsertHouseType {
        UpsertHouseType {
            project_id,
            house_type_id,
            name: house_type::Name::new("6 Bed Manor").unwrap(),
            beds: 6,
            floor_area: Area::SquareMeters(Decimal::from(200)),
            build_rate: rate(140, currency),
            sale_rate: rate(320, currency),
        }
    }

    #[tokio::test]
    async fn creates_custom_house_type() {
        let service = service();
        let project = create(&service).await;

        let updated = service
            .execute(upsert(project.id, None, Currency::Gbp))
            .await
            .unwrap();

        assert_eq!(updated.house_types.len(), 7);
        let created = updated.house_types.last().unwrap();
        assert_eq!(AsRef::<str>::as_ref(&created.name), "6 Bed Manor");
        assert!(!created.is_default);
    }

    #[tokio::test]
    async fn updates_existing_house_type() {
        let service = service();
        let project = create(&service).await;
        let id = project.house_types[0].id;

        let updated = service
            .execute(upsert(project.id, Some(id), Currency::Gbp))
            .await
            .unwrap();

        assert_eq!(updated.house_types.len(), 6);
        let house_type = updated.house_type(id).unwrap();
        assert_eq!(AsRef::<str>::as_ref(&house_type.name), "6 Bed Manor");
        assert_eq!(house_type.beds, 6);
        assert!(house_type.is_default);
    }

    #[tokio::test]
    async fn fails_for_unknown_house_type() {
        let service = service();
        let project = create(&service).await;

        let err = service
            .execute(upsert(
                project.id,
                Some(house_type::Id::new()),
                Currency::Gbp,
            ))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::HouseTypeNotExists(_),
        ));
    }

    #[tokio::test]
    async fn rejects_foreign_currency_rates() {
        let service = service();
        let project = create(&service).await;

        let err = service
            .execute(upsert(project.id, None, Currency::Usd))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::CurrencyMismatch(Currency::Usd),
        ));
    }

    #[tokio::test]
    async fn rejects_zero_floor_area() {
        let service = service();
        let project = create(&service).await;

        let err = service
            .execute(UpsertHouseType {
                floor_area: Area::SquareMeters(Decimal::ZERO),
                ..upsert(project.id, None, Currency::Gbp)
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::ZeroFloorArea));
    }

    #[tokio::test]
    async fn rejects_negative_rate() {
        let service = service();
        let project = create(&service).await;

        let err = service
            .execute(UpsertHouseType {
                build_rate: rate(-1, Currency::Gbp),
                ..upsert(project.id, None, Currency::Gbp)
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::NegativeRate(_)));
    }
}
