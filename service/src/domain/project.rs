//! [`Project`] definitions.

use common::{money::Currency, unit, Area, DateTime, DateTimeOf, Percent};
use derive_more::{AsRef, Display, From, FromStr, Into};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{
    comparable::{Comparable, FilterSettings, Postcode},
    finance::Assumptions,
    house_type::{self, HouseType},
};

/// Feasibility study of a residential development scheme.
#[derive(Clone, Debug)]
pub struct Project {
    /// ID of this [`Project`].
    pub id: Id,

    /// Name of this [`Project`].
    pub name: Name,

    /// [`Currency`] all the monetary amounts of this [`Project`] are
    /// expressed in.
    pub currency: Currency,

    /// [`Survey`] of the development site.
    pub survey: Survey,

    /// [`HouseType`]s available to this [`Project`].
    pub house_types: Vec<HouseType>,

    /// Unit mix of this [`Project`] referring to its [`HouseType`]s.
    pub mix: Vec<MixEntry>,

    /// Financial [`Assumptions`] of this [`Project`].
    pub assumptions: Assumptions,

    /// [`Market`] evidence backing this [`Project`]'s pricing.
    pub market: Market,

    /// [`DateTime`] when this [`Project`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Project`] was updated last time.
    pub updated_at: UpdateDateTime,
}

impl Project {
    /// Creates a new [`Project`] with the default [`HouseType`]s catalog and
    /// [`Assumptions`] in the provided [`Currency`].
    #[must_use]
    pub fn new(name: Name, currency: Currency) -> Self {
        let now = DateTime::now();
        Self {
            id: Id::new(),
            name,
            currency,
            survey: Survey::default(),
            house_types: house_type::defaults(currency),
            mix: Vec::new(),
            assumptions: Assumptions::new(currency),
            market: Market::default(),
            created_at: now.coerce(),
            updated_at: now.coerce(),
        }
    }

    /// Looks up a [`HouseType`] of this [`Project`] by its ID.
    #[must_use]
    pub fn house_type(&self, id: house_type::Id) -> Option<&HouseType> {
        self.house_types.iter().find(|t| t.id == id)
    }
}

/// ID of a [`Project`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Name of a [`Project`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 128
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Survey of a [`Project`]'s development site.
#[derive(Clone, Debug, PartialEq)]
pub struct Survey {
    /// [`Vertex`]es outlining the site boundary.
    pub boundary: Vec<Vertex>,

    /// [`Postcode`] locating the site.
    pub postcode: Option<Postcode>,

    /// Gross [`Area`] of the site.
    pub site_area: Area,

    /// [`Percent`] of the site [`Area`] considered developable.
    pub efficiency: Percent,
}

impl Survey {
    /// Returns the developable [`Area`] of the site, being its gross
    /// [`Area`] scaled by the efficiency.
    #[must_use]
    pub fn developable_area(&self) -> Area {
        match self.site_area {
            Area::SquareMeters(amount) => {
                Area::SquareMeters(self.efficiency.of(amount))
            }
            Area::SquareFeet(amount) => {
                Area::SquareFeet(self.efficiency.of(amount))
            }
        }
    }
}

impl Default for Survey {
    fn default() -> Self {
        Self {
            boundary: Vec::new(),
            postcode: None,
            site_area: Area::SquareMeters(Decimal::ZERO),
            efficiency: Percent::ONE_HUNDRED,
        }
    }
}

/// Geographic vertex of a [`Survey`]'s site boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    /// Latitude of this [`Vertex`], in degrees.
    pub lat: f64,

    /// Longitude of this [`Vertex`], in degrees.
    pub lng: f64,
}

/// Entry of a [`Project`]'s unit mix.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MixEntry {
    /// ID of the [`HouseType`] to build.
    pub house_type: house_type::Id,

    /// Number of units of the [`HouseType`] to build.
    pub count: u32,
}

/// Market evidence backing a [`Project`]'s pricing.
#[derive(Clone, Debug, Default)]
pub struct Market {
    /// Recorded [`Comparable`]s.
    pub comparables: Vec<Comparable>,

    /// [`FilterSettings`] applied to the [`Comparable`]s when computing
    /// statistics.
    pub filter: FilterSettings,

    /// Indicator whether the appraisal prices units with the market-derived
    /// rate instead of the per-[`HouseType`] sale rates.
    pub use_market_rate: bool,
}

/// [`DateTime`] when a [`Project`] was created.
pub type CreationDateTime = DateTimeOf<(Project, unit::Creation)>;

/// [`DateTime`] when a [`Project`] was updated last time.
pub type UpdateDateTime = DateTimeOf<(Project, unit::Update)>;

#[cfg(test)]
mod spec {
    use common::{money::Currency, Area, Percent};
    use rust_decimal::Decimal;

    use super::{Name, Project, Survey};

    #[test]
    fn name_requires_trimmed_non_empty() {
        assert!(Name::new("Riverside Gardens").is_some());

        assert!(Name::new("").is_none());
        assert!(Name::new(" Riverside").is_none());
        assert!(Name::new("x".repeat(129)).is_none());
    }

    #[test]
    fn new_seeds_catalog_and_defaults() {
        let project = Project::new(
            Name::new("Riverside Gardens").unwrap(),
            Currency::Gbp,
        );

        assert_eq!(project.house_types.len(), 6);
        assert!(project.mix.is_empty());
        assert!(project.market.comparables.is_empty());
        assert!(!project.market.use_market_rate);
        assert!(project.survey.postcode.is_none());
        assert_eq!(project.assumptions.land_acquisition.currency, Currency::Gbp);
    }

    #[test]
    fn looks_up_house_type_by_id() {
        let project = Project::new(
            Name::new("Riverside Gardens").unwrap(),
            Currency::Gbp,
        );

        let id = project.house_types[2].id;
        assert_eq!(project.house_type(id).map(|t| t.id), Some(id));

        assert!(project.house_type(super::house_type::Id::new()).is_none());
    }

    #[test]
    fn survey_scales_developable_area_by_efficiency() {
        let survey = Survey {
            site_area: Area::SquareMeters(Decimal::from(1000)),
            efficiency: Percent::new(Decimal::from(85)).unwrap(),
            ..Survey::default()
        };

        assert_eq!(
            survey.developable_area(),
            Area::SquareMeters(Decimal::from(850)),
        );
    }
}
