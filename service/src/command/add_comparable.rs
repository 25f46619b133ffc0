//! [`Command`] for recording a new [`Comparable`].

use common::{
    operations::{By, Select, Update},
    Area, DateTime, Money,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::comparable::{Address, Notes, Postcode};
use crate::{
    domain::{comparable, project, Comparable, Project},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for recording a new [`Comparable`] on a [`Project`].
///
/// Recording a [`Comparable`] identical to an already recorded one is a
/// no-op, keeping the [`Project`] unchanged.
#[derive(Clone, Debug)]
pub struct AddComparable {
    /// ID of the [`Project`] to record the [`Comparable`] on.
    pub project_id: project::Id,

    /// [`Address`] of the sold property.
    pub address: comparable::Address,

    /// [`Postcode`] of the sold property.
    pub postcode: comparable::Postcode,

    /// Number of bedrooms in the sold property.
    pub beds: comparable::Beds,

    /// [`comparable::Category`] of the sold property.
    pub category: comparable::Category,

    /// [`DateTime`] when the sale completed.
    pub sale_date: comparable::SaleDateTime,

    /// Achieved sale price.
    pub price: Money,

    /// Gross internal [`Area`] of the sold property.
    pub area: Area,

    /// Free-text [`Notes`] on the [`Comparable`].
    pub notes: comparable::Notes,
}

impl<Db> Command<AddComparable> for Service<Db>
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
        cmd: AddComparable,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AddComparable {
            project_id,
            address,
            postcode,
            beds,
            category,
            sale_date,
            price,
            area,
            notes,
        } = cmd;

        let mut project = self
            .database()
            .execute(Select(By::<Option<Project>, _>::new(project_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProjectNotExists(project_id))
            .map_err(tracerr::wrap!())?;

        if price.currency != project.currency {
            return Err(tracerr::new!(E::CurrencyMismatch(price.currency)));
        }
        if price.amount <= Decimal::ZERO {
            return Err(tracerr::new!(E::NonPositivePrice(price)));
        }
        if area.is_zero() {
            return Err(tracerr::new!(E::ZeroArea));
        }

        let hash = comparable::Hash::new(
            &address, &postcode, beds, category, sale_date, price, area,
        );
        if project.market.comparables.iter().any(|c| c.hash == hash) {
            // The same sale is already recorded.
            return Ok(project);
        }

        project.market.comparables.push(Comparable {
            id: comparable::Id::new(),
            hash,
            address,
            postcode,
            beds,
            category,
            sale_date,
            price,
            area,
            notes,
            created_at: DateTime::now().coerce(),
        });
        project.updated_at = DateTime::now().coerce();
        self.database()
            .execute(Update(project.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(project)
    }
}

/// Error of [`AddComparable`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Project`] doesn't exist.
    #[display("`Project(id: {_0})` does not exist")]
    #[from(ignore)]
    ProjectNotExists(#[error(not(source))] project::Id),

    /// Provided sale price is in a wrong [`Currency`].
    ///
    /// [`Currency`]: common::money::Currency
    #[display("Sale price currency `{_0}` doesn't match the `Project`'s one")]
    #[from(ignore)]
    CurrencyMismatch(#[error(not(source))] common::money::Currency),

    /// Provided sale price is not positive.
    #[display("Sale price must be positive: {_0}")]
    #[from(ignore)]
    NonPositivePrice(#[error(not(source))] Money),

    /// Provided [`Area`] is zero.
    #[display("`Comparable` area cannot be zero")]
    ZeroArea,
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Area, DateTime, Money};
    use rust_decimal::Decimal;

    use super::{AddComparable, Command as _, ExecutionError};
    use crate::{
        command::CreateProject,
        domain::{comparable, project, Project},
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

    fn add(project_id: project::Id) -> AddComparable {
        AddComparable {
            project_id,
            address: comparable::Address::new("12 Mill Lane").unwrap(),
            postcode: comparable::Postcode::new("GU1 2AB").unwrap(),
            beds: 3,
            category: comparable::Category::SemiDetached,
            sale_date: DateTime::now().coerce(),
            price: Money {
                amount: Decimal::from(320_000),
                currency: Currency::Gbp,
            },
            area: Area::SquareFeet(Decimal::from(1050)),
            notes: comparable::Notes::default(),
        }
    }

    #[tokio::test]
    async fn records_comparable() {
        let service = service();
        let project = create(&service).await;

        let project = service.execute(add(project.id)).await.unwrap();

        assert_eq!(project.market.comparables.len(), 1);
        let comp = &project.market.comparables[0];
        assert_eq!(AsRef::<str>::as_ref(&comp.address), "12 Mill Lane");
        assert_eq!(comp.beds, 3);
    }

    #[tokio::test]
    async fn skips_already_recorded_sale() {
        let service = service();
        let project = create(&service).await;

        let first = service.execute(add(project.id)).await.unwrap();
        let second = service.execute(add(project.id)).await.unwrap();

        assert_eq!(second.market.comparables.len(), 1);
        assert_eq!(second.updated_at, first.updated_at);
    }

    #[tokio::test]
    async fn rejects_non_positive_price() {
        let service = service();
        let project = create(&service).await;

        let err = service
            .execute(AddComparable {
                price: Money {
                    amount: Decimal::ZERO,
                    currency: Currency::Gbp,
                },
                ..add(project.id)
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::NonPositivePrice(_),
        ));
    }

    #[tokio::test]
    async fn rejects_zero_area() {
        let service = service();
        let project = create(&service).await;

        let err = service
            .execute(AddComparable {
                area: Area::SquareMeters(Decimal::ZERO),
                ..add(project.id)
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::ZeroArea));
    }

    #[tokio::test]
    async fn rejects_foreign_currency_price() {
        let service = service();
        let project = create(&service).await;

        let err = service
            .execute(AddComparable {
                price: Money {
                    amount: Decimal::from(320_000),
                    currency: Currency::Usd,
                },
                ..add(project.id)
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::CurrencyMismatch(Currency::Usd),
        ));
    }
}
