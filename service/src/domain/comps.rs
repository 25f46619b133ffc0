//! Market [`Stats`] computed over [`Comparable`]s.

use common::{money::Currency, DateTime, Rate};
use itertools::Itertools as _;
use rust_decimal::{prelude::ToPrimitive as _, Decimal};

use crate::domain::comparable::{self, Comparable, FilterSettings, Postcode};

/// Minimum number of [`Comparable`]s required for outlier rejection to
/// engage.
const MIN_SAMPLE: usize = 3;

/// Position of the lower quartile.
const LOWER_QUARTILE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// Position of the upper quartile.
const UPPER_QUARTILE: Decimal = Decimal::from_parts(75, 0, 0, false, 2);

/// Sale [`Rate`] statistics computed over a set of [`Comparable`]s.
#[derive(Clone, Debug)]
pub struct Stats {
    /// Number of [`Comparable`]s the statistics are computed over.
    pub count: usize,

    /// IDs of the [`Comparable`]s the statistics are computed over.
    pub used: Vec<comparable::Id>,

    /// Lower quartile of the sale [`Rate`]s.
    pub p25: Rate,

    /// Median of the sale [`Rate`]s.
    pub median: Rate,

    /// Upper quartile of the sale [`Rate`]s.
    pub p75: Rate,

    /// Sale [`Rate`] recommended for pricing, if any [`Comparable`]s
    /// remained.
    pub recommended: Option<Rate>,
}

impl Stats {
    /// Calculates new [`Stats`] over the provided [`Comparable`]s.
    ///
    /// [`Comparable`]s priced in another [`Currency`], with a non-positive
    /// price, or with a zero area never participate. The remaining ones are
    /// narrowed by the provided [`FilterSettings`], and then outlying sale
    /// [`Rate`]s are rejected by the interquartile range fence, unless that
    /// would leave too few samples.
    ///
    /// All the reported [`Rate`]s are rounded to a whole currency unit.
    #[must_use]
    pub fn new(
        comparables: &[Comparable],
        settings: &FilterSettings,
        context: Option<&Postcode>,
        currency: Currency,
        now: DateTime,
    ) -> Self {
        let months_limit = i32::from(settings.include_months.get());

        let mut sample = comparables
            .iter()
            .filter(|c| c.price.currency == currency)
            .filter(|c| c.price.amount > Decimal::ZERO)
            .filter(|c| {
                (0..=months_limit)
                    .contains(&now.whole_months_since(c.sale_date))
            })
            .filter(|c| settings.min_beds.is_none_or(|min| c.beds >= min))
            .filter(|c| settings.max_beds.is_none_or(|max| c.beds <= max))
            .filter(|c| {
                !settings.strict_postcode
                    || context.is_none_or(|ctx| c.postcode.matches_outward(ctx))
            })
            .filter_map(|c| {
                c.price_per_area(settings.rate_unit).map(|r| (c, r.amount))
            })
            .sorted_unstable_by_key(|(_, amount)| *amount)
            .collect::<Vec<_>>();

        if sample.len() >= MIN_SAMPLE {
            let amounts =
                sample.iter().map(|(_, amount)| *amount).collect::<Vec<_>>();
            let q1 = nearest_rank(&amounts, LOWER_QUARTILE);
            let q3 = nearest_rank(&amounts, UPPER_QUARTILE);
            let margin = (q3 - q1) * settings.iqr_multiplier.value();
            let fence = (q1 - margin)..=(q3 + margin);

            let survivors = sample
                .iter()
                .filter(|(_, amount)| fence.contains(amount))
                .count();
            if survivors >= MIN_SAMPLE {
                sample.retain(|(_, amount)| fence.contains(amount));
            }
        }

        if sample.is_empty() {
            let zero = Rate::zero(currency, settings.rate_unit);
            return Self {
                count: 0,
                used: Vec::new(),
                p25: zero,
                median: zero,
                p75: zero,
                recommended: None,
            };
        }

        let used = sample.iter().map(|(c, _)| c.id).collect();
        let amounts =
            sample.iter().map(|(_, amount)| *amount).collect::<Vec<_>>();
        let rate = |amount| {
            Rate {
                amount,
                currency,
                per: settings.rate_unit,
            }
            .rounded()
        };
        let median = rate(median(&amounts));

        Self {
            count: amounts.len(),
            used,
            p25: rate(nearest_rank(&amounts, LOWER_QUARTILE)),
            median,
            p75: rate(nearest_rank(&amounts, UPPER_QUARTILE)),
            recommended: Some(median),
        }
    }
}

/// Returns the value standing at the provided `percentile` of the `sorted`
/// sample, picked by the nearest-rank method.
///
/// The `sorted` sample must be non-empty.
fn nearest_rank(sorted: &[Decimal], percentile: Decimal) -> Decimal {
    let index = (Decimal::from(sorted.len()) * percentile)
        .floor()
        .to_usize()
        .unwrap_or_default()
        .min(sorted.len() - 1);
    sorted[index]
}

/// Returns the median of the `sorted` sample, averaging the two middle
/// values for an even-sized one.
///
/// The `sorted` sample must be non-empty.
fn median(sorted: &[Decimal]) -> Decimal {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / Decimal::TWO
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Area, DateTime, Money, Months};
    use rust_decimal::Decimal;

    use super::{comparable, Comparable, FilterSettings, Postcode, Stats};
    use crate::domain::comparable::{Address, Category, Hash, Notes};

    fn now() -> DateTime {
        DateTime::from_rfc3339("2025-06-15T12:00:00Z").unwrap()
    }

    fn comp(price: u32, area: Area, sale: &str) -> Comparable {
        let address = Address::new("12 Mill Lane").unwrap();
        let postcode = Postcode::new("SW1A 1AA").unwrap();
        let price = Money {
            amount: price.into(),
            currency: Currency::Gbp,
        };
        let sale_date = DateTime::from_rfc3339(sale).unwrap().coerce();
        Comparable {
            id: comparable::Id::new(),
            hash: Hash::new(
                &address,
                &postcode,
                3,
                Category::Terraced,
                sale_date,
                price,
                area,
            ),
            address,
            postcode,
            beds: 3,
            category: Category::Terraced,
            sale_date,
            price,
            area,
            notes: Notes::default(),
            created_at: DateTime::now().coerce(),
        }
    }

    fn sqft_comp(price: u32) -> Comparable {
        comp(
            price,
            Area::SquareFeet(Decimal::from(1000)),
            "2025-05-01T00:00:00Z",
        )
    }

    fn stats(comps: &[Comparable], settings: &FilterSettings) -> Stats {
        Stats::new(comps, settings, None, Currency::Gbp, now())
    }

    #[test]
    fn yields_zero_stats_without_comparables() {
        let stats = stats(&[], &FilterSettings::default());

        assert_eq!(stats.count, 0);
        assert!(stats.used.is_empty());
        assert!(stats.median.amount.is_zero());
        assert!(stats.recommended.is_none());
    }

    #[test]
    fn computes_quartiles_and_median() {
        let comps = [
            sqft_comp(100_000),
            sqft_comp(300_000),
            sqft_comp(200_000),
            sqft_comp(400_000),
        ];

        let stats = stats(&comps, &FilterSettings::default());

        assert_eq!(stats.count, 4);
        assert_eq!(stats.p25.amount, Decimal::from(200));
        assert_eq!(stats.median.amount, Decimal::from(250));
        assert_eq!(stats.p75.amount, Decimal::from(400));
        assert_eq!(stats.recommended.unwrap().amount, Decimal::from(250));
    }

    #[test]
    fn recommends_median_over_mean() {
        let comps =
            [sqft_comp(200_000), sqft_comp(210_000), sqft_comp(1_000_000)];

        let stats = stats(&comps, &FilterSettings::default());

        // With three samples the quartile fence spans the whole range, so
        // the skewed 1000/sqft sale stays in. The mean (470) would be pulled
        // towards it, while the median is not.
        assert_eq!(stats.count, 3);
        assert_eq!(stats.median.amount, Decimal::from(210));
        assert_eq!(stats.recommended.unwrap().amount, Decimal::from(210));
    }

    #[test]
    fn rejects_outliers_beyond_iqr_fence() {
        let outlier = sqft_comp(1_000_000);
        let comps = [
            sqft_comp(100_000),
            sqft_comp(100_000),
            sqft_comp(100_000),
            sqft_comp(100_000),
            outlier.clone(),
        ];

        let stats = stats(&comps, &FilterSettings::default());

        assert_eq!(stats.count, 4);
        assert_eq!(stats.median.amount, Decimal::from(100));
        assert!(!stats.used.contains(&outlier.id));
    }

    #[test]
    fn keeps_small_samples_intact() {
        let comps = [sqft_comp(100_000), sqft_comp(1_000_000)];

        let stats = stats(&comps, &FilterSettings::default());

        assert_eq!(stats.count, 2);
        assert_eq!(stats.median.amount, Decimal::from(550));
    }

    #[test]
    fn filters_by_sale_recency() {
        let area = Area::SquareFeet(Decimal::from(1000));
        let comps = [
            comp(100_000, area, "2024-06-30T00:00:00Z"),
            comp(200_000, area, "2024-05-31T00:00:00Z"),
            comp(300_000, area, "2025-07-01T00:00:00Z"),
        ];
        let settings = FilterSettings {
            include_months: Months::new(12).unwrap(),
            ..FilterSettings::default()
        };

        let stats = stats(&comps, &settings);

        assert_eq!(stats.count, 1);
        assert_eq!(stats.median.amount, Decimal::from(100));
    }

    #[test]
    fn filters_by_beds_bounds_inclusively() {
        let mut comps = [
            sqft_comp(100_000),
            sqft_comp(200_000),
            sqft_comp(300_000),
            sqft_comp(400_000),
        ];
        comps[0].beds = 1;
        comps[1].beds = 2;
        comps[2].beds = 3;
        comps[3].beds = 4;
        let settings = FilterSettings {
            min_beds: Some(2),
            max_beds: Some(3),
            ..FilterSettings::default()
        };

        let stats = stats(&comps, &settings);

        assert_eq!(stats.count, 2);
        assert_eq!(stats.median.amount, Decimal::from(250));
    }

    #[test]
    fn strict_postcode_narrows_to_matching_outward() {
        let mut comps = [sqft_comp(100_000), sqft_comp(200_000)];
        comps[1].postcode = Postcode::new("M1 1AE").unwrap();
        let settings = FilterSettings {
            strict_postcode: true,
            ..FilterSettings::default()
        };
        let context = Postcode::new("sw1a 9zz").unwrap();

        let narrowed = Stats::new(
            &comps,
            &settings,
            Some(&context),
            Currency::Gbp,
            now(),
        );
        assert_eq!(narrowed.count, 1);
        assert_eq!(narrowed.median.amount, Decimal::from(100));

        // Without a context postcode the restriction cannot engage.
        let unrestricted =
            Stats::new(&comps, &settings, None, Currency::Gbp, now());
        assert_eq!(unrestricted.count, 2);
    }

    #[test]
    fn skips_ineligible_comparables() {
        let mut comps = [
            sqft_comp(100_000),
            sqft_comp(0),
            sqft_comp(200_000),
            sqft_comp(300_000),
        ];
        comps[2].price.currency = Currency::Usd;
        comps[3].area = Area::SquareFeet(Decimal::ZERO);

        let stats = stats(&comps, &FilterSettings::default());

        assert_eq!(stats.count, 1);
        assert_eq!(stats.median.amount, Decimal::from(100));
    }

    #[test]
    fn normalizes_mixed_area_units() {
        let comps = [
            comp(
                100_000,
                Area::SquareFeet("1076.391041671".parse().unwrap()),
                "2025-05-01T00:00:00Z",
            ),
            comp(
                200_000,
                Area::SquareMeters(Decimal::from(100)),
                "2025-05-01T00:00:00Z",
            ),
        ];
        let settings = FilterSettings {
            rate_unit: common::area::Unit::SquareMeters,
            ..FilterSettings::default()
        };

        let stats = stats(&comps, &settings);

        assert_eq!(stats.count, 2);
        assert_eq!(stats.median.amount, Decimal::from(1500));
        assert_eq!(stats.median.per, common::area::Unit::SquareMeters);
    }

    #[test]
    fn rounds_reported_rates_to_whole_units() {
        let stats = stats(&[sqft_comp(205_500)], &FilterSettings::default());

        assert_eq!(stats.count, 1);
        assert_eq!(stats.median.amount, Decimal::from(206));
    }
}
