//! Financial appraisal of a [`Project`].

use common::{define_kind, money::Currency, DateTime, Money, Rate};
use rust_decimal::Decimal;

use crate::domain::{
    comps::Stats,
    finance::Assumptions,
    house_type::HouseType,
    project::{MixEntry, Project},
};

/// Residual land value appraisal of a [`Project`].
#[derive(Clone, Copy, Debug)]
pub struct Totals {
    /// Gross development value, being the projected sale revenue of all the
    /// units.
    pub gdv: Money,

    /// Cost of building all the units.
    pub build_cost: Money,

    /// Professional fees.
    pub fees: Money,

    /// Contingency allowance.
    pub contingency: Money,

    /// Cost of the development finance.
    pub finance_cost: Money,

    /// Profit required to hit the target margin.
    pub target_profit: Money,

    /// All the costs of the development, including the land acquisition.
    pub total_costs: Money,

    /// Maximum price payable for the land while still hitting the target
    /// profit margin.
    pub residual_land_value: Money,

    /// Profit actually achieved at the assumed land acquisition cost.
    pub actual_profit: Money,

    /// Achieved profit as a percentage of the gross development value.
    pub actual_profit_pct: Decimal,

    /// All the costs as a percentage of the gross development value.
    pub cost_to_gdv_pct: Decimal,

    /// [`Viability`] verdict of the scheme.
    pub viability: Viability,
}

impl Totals {
    /// Calculates new appraisal [`Totals`] over the provided unit mix.
    ///
    /// Mix entries referring to a [`HouseType`] missing from the catalog
    /// contribute nothing. The provided `market_rate` (if any) overrides the
    /// sale [`Rate`] of every [`HouseType`].
    #[must_use]
    pub fn new(
        mix: &[MixEntry],
        house_types: &[HouseType],
        assumptions: &Assumptions,
        market_rate: Option<Rate>,
        currency: Currency,
    ) -> Self {
        let mut gdv = Decimal::ZERO;
        let mut build_cost = Decimal::ZERO;
        for entry in mix {
            let Some(house_type) =
                house_types.iter().find(|t| t.id == entry.house_type)
            else {
                continue;
            };
            let count = Decimal::from(entry.count);
            build_cost += count
                * house_type.build_rate.for_area(house_type.floor_area).amount;
            let sale_rate = market_rate.unwrap_or(house_type.sale_rate);
            gdv +=
                count * sale_rate.for_area(house_type.floor_area).amount;
        }

        let fees = assumptions.fees.of(build_cost);
        let contingency = assumptions.contingency.of(build_cost);
        let land = assumptions.land_acquisition.amount;
        // Half cost of funds: interest is charged on half the peak exposure,
        // assuming a linear drawdown over the borrowing period.
        let finance_cost = assumptions
            .finance_rate
            .of(build_cost + fees + contingency + land)
            * Decimal::from(assumptions.finance_months.get())
            / Decimal::from(12)
            / Decimal::TWO;
        let target_profit = assumptions.target_profit.of(gdv);
        let total_costs =
            build_cost + fees + contingency + finance_cost + land;
        let residual = gdv - total_costs - target_profit;
        let actual_profit = gdv - total_costs;
        let (actual_profit_pct, cost_to_gdv_pct) = if gdv.is_zero() {
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            (
                actual_profit / gdv * Decimal::ONE_HUNDRED,
                total_costs / gdv * Decimal::ONE_HUNDRED,
            )
        };

        let target = assumptions.target_profit.value();
        let viability = if gdv.is_zero() {
            Viability::Unviable
        } else if residual >= Decimal::ZERO && actual_profit_pct >= target {
            Viability::Viable
        } else if residual >= Decimal::ZERO
            && actual_profit_pct >= target - Decimal::TEN
        {
            Viability::AtRisk
        } else {
            Viability::Unviable
        };

        let money = |amount| Money { amount, currency };
        Self {
            gdv: money(gdv),
            build_cost: money(build_cost),
            fees: money(fees),
            contingency: money(contingency),
            finance_cost: money(finance_cost),
            target_profit: money(target_profit),
            total_costs: money(total_costs),
            residual_land_value: money(residual),
            actual_profit: money(actual_profit),
            actual_profit_pct,
            cost_to_gdv_pct,
            viability,
        }
    }

    /// Calculates new appraisal [`Totals`] of the provided [`Project`] at
    /// the provided moment.
    ///
    /// If the [`Project`] prices its units with the market-derived rate, the
    /// rate is recomputed from its [`Comparable`]s first.
    ///
    /// [`Comparable`]: crate::domain::Comparable
    #[must_use]
    pub fn of_project(project: &Project, now: DateTime) -> Self {
        let market_rate = project
            .market
            .use_market_rate
            .then(|| {
                Stats::new(
                    &project.market.comparables,
                    &project.market.filter,
                    project.survey.postcode.as_ref(),
                    project.currency,
                    now,
                )
                .recommended
            })
            .flatten();

        Self::new(
            &project.mix,
            &project.house_types,
            &project.assumptions,
            market_rate,
            project.currency,
        )
    }
}

define_kind! {
    #[doc = "Viability verdict of a [`Project`]'s appraisal."]
    enum Viability {
        #[doc = "Residual land value is non-negative and the achieved \
                 profit meets the target margin."]
        Viable = 1,

        #[doc = "Residual land value is non-negative, while the achieved \
                 profit misses the target margin by fewer than 10 \
                 percentage points."]
        AtRisk = 2,

        #[doc = "The scheme cannot pay for its land at the target margin."]
        Unviable = 3,
    }
}

#[cfg(test)]
mod spec {
    use common::{area, money::Currency, Area, Money, Months, Percent, Rate};
    use rust_decimal::Decimal;

    use super::{Assumptions, HouseType, MixEntry, Totals, Viability};
    use crate::domain::house_type;

    fn rate(amount: u32) -> Rate {
        Rate {
            amount: amount.into(),
            currency: Currency::Gbp,
            per: area::Unit::SquareFeet,
        }
    }

    fn house_type(build: u32, sale: u32) -> HouseType {
        HouseType {
            id: house_type::Id::new(),
            name: house_type::Name::new("Test Type").unwrap(),
            beds: 3,
            floor_area: Area::SquareFeet(Decimal::from(1000)),
            build_rate: rate(build),
            sale_rate: rate(sale),
            is_default: false,
        }
    }

    fn assumptions(target_pct: u32, land: u32) -> Assumptions {
        Assumptions {
            fees: Percent::new(Decimal::from(5)).unwrap(),
            contingency: Percent::new(Decimal::from(10)).unwrap(),
            target_profit: Percent::new(Decimal::from(target_pct)).unwrap(),
            finance_rate: Percent::new(Decimal::new(85, 1)).unwrap(),
            finance_months: Months::new(18).unwrap(),
            land_acquisition: Money {
                amount: land.into(),
                currency: Currency::Gbp,
            },
        }
    }

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn computes_residual_land_value() {
        let house_type = house_type(150, 250);
        let mix = [MixEntry {
            house_type: house_type.id,
            count: 4,
        }];

        let totals = Totals::new(
            &mix,
            &[house_type],
            &assumptions(20, 25_000),
            None,
            Currency::Gbp,
        );

        assert_eq!(totals.gdv.amount, Decimal::from(1_000_000));
        assert_eq!(totals.build_cost.amount, Decimal::from(600_000));
        assert_eq!(totals.fees.amount, Decimal::from(30_000));
        assert_eq!(totals.contingency.amount, Decimal::from(60_000));
        assert_eq!(totals.finance_cost.amount, decimal("45581.25"));
        assert_eq!(totals.total_costs.amount, decimal("760581.25"));
        assert_eq!(totals.target_profit.amount, Decimal::from(200_000));
        assert_eq!(totals.residual_land_value.amount, decimal("39418.75"));
        assert_eq!(totals.actual_profit.amount, decimal("239418.75"));
        assert_eq!(totals.actual_profit_pct, decimal("23.941875"));
        assert_eq!(totals.viability, Viability::Viable);
    }

    #[test]
    fn empty_mix_is_unviable() {
        let totals = Totals::new(
            &[],
            &[house_type(150, 300)],
            &assumptions(20, 0),
            None,
            Currency::Gbp,
        );

        assert!(totals.gdv.amount.is_zero());
        assert!(totals.build_cost.amount.is_zero());
        assert!(totals.actual_profit_pct.is_zero());
        assert!(totals.cost_to_gdv_pct.is_zero());
        assert_eq!(totals.viability, Viability::Unviable);
    }

    #[test]
    fn skips_mix_entries_missing_from_catalog() {
        let mix = [MixEntry {
            house_type: house_type::Id::new(),
            count: 3,
        }];

        let totals = Totals::new(
            &mix,
            &[house_type(150, 300)],
            &assumptions(20, 0),
            None,
            Currency::Gbp,
        );

        assert!(totals.gdv.amount.is_zero());
        assert_eq!(totals.viability, Viability::Unviable);
    }

    #[test]
    fn zero_count_equals_absence() {
        let house_type = house_type(150, 300);
        let mix = [MixEntry {
            house_type: house_type.id,
            count: 0,
        }];

        let with_zero = Totals::new(
            &mix,
            std::slice::from_ref(&house_type),
            &assumptions(20, 0),
            None,
            Currency::Gbp,
        );
        let without = Totals::new(
            &[],
            &[house_type],
            &assumptions(20, 0),
            None,
            Currency::Gbp,
        );

        assert_eq!(with_zero.gdv.amount, without.gdv.amount);
        assert_eq!(with_zero.total_costs.amount, without.total_costs.amount);
        assert_eq!(with_zero.viability, without.viability);
    }

    #[test]
    fn market_rate_overrides_sale_rates() {
        let house_type = house_type(150, 300);
        let mix = [MixEntry {
            house_type: house_type.id,
            count: 2,
        }];

        let totals = Totals::new(
            &mix,
            &[house_type],
            &assumptions(20, 0),
            Some(rate(250)),
            Currency::Gbp,
        );

        assert_eq!(totals.gdv.amount, Decimal::from(500_000));
        assert_eq!(totals.build_cost.amount, Decimal::from(300_000));
    }

    #[test]
    fn raising_target_cannot_improve_viability() {
        let house_type = house_type(150, 250);
        let mix = [MixEntry {
            house_type: house_type.id,
            count: 4,
        }];

        let modest = Totals::new(
            &mix,
            std::slice::from_ref(&house_type),
            &assumptions(20, 25_000),
            None,
            Currency::Gbp,
        );
        let greedy = Totals::new(
            &mix,
            &[house_type],
            &assumptions(45, 25_000),
            None,
            Currency::Gbp,
        );

        assert_eq!(modest.viability, Viability::Viable);
        assert_eq!(greedy.viability, Viability::Unviable);
    }

    #[test]
    fn zeroed_assumptions_leave_build_cost_only() {
        let house_type = house_type(150, 300);
        let mix = [MixEntry {
            house_type: house_type.id,
            count: 2,
        }];
        let assumptions = Assumptions {
            fees: Percent::ZERO,
            contingency: Percent::ZERO,
            target_profit: Percent::new(Decimal::from(20)).unwrap(),
            finance_rate: Percent::ZERO,
            finance_months: Months::new(1).unwrap(),
            land_acquisition: Money {
                amount: Decimal::ZERO,
                currency: Currency::Gbp,
            },
        };

        let totals =
            Totals::new(&mix, &[house_type], &assumptions, None, Currency::Gbp);

        assert_eq!(totals.gdv.amount, Decimal::from(600_000));
        assert_eq!(totals.total_costs.amount, Decimal::from(300_000));
        assert_eq!(
            totals.residual_land_value.amount,
            Decimal::from(180_000),
        );
    }
}
