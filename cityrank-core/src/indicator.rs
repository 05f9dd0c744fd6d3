//! Indicators describing measurable city attributes.
//!
//! The enum is a closed registry: every indicator has exactly one
//! [`IndicatorDefinition`] carrying its key, polarity and display format.
//! [`Indicator::ALL`] fixes the canonical order used wherever position
//! carries meaning, such as the shareable weight list.
//!
//! # Examples
//! ```
//! use cityrank_core::{Indicator, Polarity};
//!
//! assert_eq!(Indicator::Pm25.as_str(), "pm25");
//! assert_eq!(Indicator::Pm25.polarity(), Polarity::LowerIsBetter);
//! assert_eq!(Indicator::LifeExpectancy.to_string(), "life_expectancy");
//! ```

use Polarity::{HigherIsBetter, LowerIsBetter};

/// A named numeric attribute of a city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Indicator {
    /// Residents per square kilometre.
    PopulationDensity,
    /// Mean annual PM2.5 concentration in µg/m³.
    Pm25,
    /// Intentional homicides per 100 000 residents.
    HomicideRate,
    /// Life expectancy at birth in years.
    LifeExpectancy,
    /// Physicians per 1 000 residents.
    #[cfg_attr(feature = "serde", serde(rename = "doctors_per_1000"))]
    DoctorsPer1000,
    /// Infant deaths per 1 000 live births.
    InfantMortalityRate,
    /// Average daily maximum temperature in °C.
    AvgTemperature,
    /// Average precipitation in millimetres.
    AvgPrecipitation,
    /// GDP per capita in current US dollars.
    GdpPerCapita,
    /// GNI per capita in current US dollars.
    GniPerCapita,
    /// Unemployment as a share of the labour force.
    UnemploymentRate,
    /// Annual consumer price inflation.
    InflationRate,
    /// Gross tertiary education enrolment ratio.
    TertiaryEducationEnrollment,
    /// Income relative to the catalog median.
    IncomeIndex,
    /// Cost of living relative to the catalog median.
    CostIndex,
}

/// Whether larger raw values rank a city higher or lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// Larger raw values map to larger normalised scores.
    HigherIsBetter,
    /// Larger raw values map to smaller normalised scores.
    LowerIsBetter,
}

impl Polarity {
    /// Return `true` for [`Polarity::HigherIsBetter`].
    pub const fn higher_is_better(self) -> bool {
        matches!(self, Self::HigherIsBetter)
    }
}

/// Static metadata for one indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorDefinition {
    /// The indicator described.
    pub indicator: Indicator,
    /// Catalog field name.
    pub key: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Ranking direction.
    pub polarity: Polarity,
    /// Decimal places shown when formatting values.
    pub decimals: usize,
    /// Unit appended to formatted values; empty when unitless.
    pub unit: &'static str,
}

impl IndicatorDefinition {
    /// Format a raw value for display, or `"n/a"` when absent.
    ///
    /// # Examples
    /// ```
    /// use cityrank_core::Indicator;
    ///
    /// let def = Indicator::LifeExpectancy.definition();
    /// assert_eq!(def.format(Some(81.26)), "81.3 yrs");
    /// assert_eq!(def.format(None), "n/a");
    /// ```
    pub fn format(&self, value: Option<f64>) -> String {
        match value.filter(|v| v.is_finite()) {
            Some(v) if self.unit.is_empty() => format!("{v:.prec$}", prec = self.decimals),
            Some(v) => format!("{v:.prec$} {unit}", prec = self.decimals, unit = self.unit),
            None => "n/a".to_owned(),
        }
    }
}

const fn define(
    indicator: Indicator,
    key: &'static str,
    label: &'static str,
    polarity: Polarity,
    decimals: usize,
    unit: &'static str,
) -> IndicatorDefinition {
    IndicatorDefinition {
        indicator,
        key,
        label,
        polarity,
        decimals,
        unit,
    }
}

/// Registry of every indicator in canonical order.
pub const REGISTRY: [IndicatorDefinition; Indicator::COUNT] = [
    define(
        Indicator::PopulationDensity,
        "population_density",
        "Population Density",
        LowerIsBetter,
        0,
        "/km²",
    ),
    define(Indicator::Pm25, "pm25", "PM2.5", LowerIsBetter, 1, "µg/m³"),
    define(
        Indicator::HomicideRate,
        "homicide_rate",
        "Homicide Rate",
        LowerIsBetter,
        2,
        "per 100k",
    ),
    define(
        Indicator::LifeExpectancy,
        "life_expectancy",
        "Life Expectancy",
        HigherIsBetter,
        1,
        "yrs",
    ),
    define(
        Indicator::DoctorsPer1000,
        "doctors_per_1000",
        "Doctors Per 1000",
        HigherIsBetter,
        2,
        "",
    ),
    define(
        Indicator::InfantMortalityRate,
        "infant_mortality_rate",
        "Infant Mortality Rate",
        LowerIsBetter,
        1,
        "per 1k",
    ),
    define(
        Indicator::AvgTemperature,
        "avg_temperature",
        "Avg Temperature",
        HigherIsBetter,
        1,
        "°C",
    ),
    define(
        Indicator::AvgPrecipitation,
        "avg_precipitation",
        "Avg Precipitation",
        LowerIsBetter,
        1,
        "mm",
    ),
    define(
        Indicator::GdpPerCapita,
        "gdp_per_capita",
        "GDP Per Capita",
        HigherIsBetter,
        0,
        "USD",
    ),
    define(
        Indicator::GniPerCapita,
        "gni_per_capita",
        "GNI Per Capita",
        HigherIsBetter,
        0,
        "USD",
    ),
    define(
        Indicator::UnemploymentRate,
        "unemployment_rate",
        "Unemployment Rate",
        LowerIsBetter,
        1,
        "%",
    ),
    define(
        Indicator::InflationRate,
        "inflation_rate",
        "Inflation Rate",
        LowerIsBetter,
        1,
        "%",
    ),
    define(
        Indicator::TertiaryEducationEnrollment,
        "tertiary_education_enrollment",
        "Tertiary Education Enrollment",
        HigherIsBetter,
        1,
        "%",
    ),
    define(
        Indicator::IncomeIndex,
        "income_index",
        "Income Index",
        HigherIsBetter,
        2,
        "",
    ),
    define(
        Indicator::CostIndex,
        "cost_index",
        "Cost Index",
        LowerIsBetter,
        2,
        "",
    ),
];

impl Indicator {
    /// Number of indicators in the registry.
    pub const COUNT: usize = 15;

    /// Every indicator in canonical order.
    ///
    /// The order is part of the shareable configuration format and must
    /// never change.
    pub const ALL: [Self; Self::COUNT] = [
        Self::PopulationDensity,
        Self::Pm25,
        Self::HomicideRate,
        Self::LifeExpectancy,
        Self::DoctorsPer1000,
        Self::InfantMortalityRate,
        Self::AvgTemperature,
        Self::AvgPrecipitation,
        Self::GdpPerCapita,
        Self::GniPerCapita,
        Self::UnemploymentRate,
        Self::InflationRate,
        Self::TertiaryEducationEnrollment,
        Self::IncomeIndex,
        Self::CostIndex,
    ];

    /// Position of the indicator within [`Indicator::ALL`].
    pub const fn position(self) -> usize {
        match self {
            Self::PopulationDensity => 0,
            Self::Pm25 => 1,
            Self::HomicideRate => 2,
            Self::LifeExpectancy => 3,
            Self::DoctorsPer1000 => 4,
            Self::InfantMortalityRate => 5,
            Self::AvgTemperature => 6,
            Self::AvgPrecipitation => 7,
            Self::GdpPerCapita => 8,
            Self::GniPerCapita => 9,
            Self::UnemploymentRate => 10,
            Self::InflationRate => 11,
            Self::TertiaryEducationEnrollment => 12,
            Self::IncomeIndex => 13,
            Self::CostIndex => 14,
        }
    }

    /// Look up the registry entry for this indicator.
    pub const fn definition(self) -> &'static IndicatorDefinition {
        &REGISTRY[self.position()]
    }

    /// Return the catalog field name.
    ///
    /// # Examples
    /// ```
    /// use cityrank_core::Indicator;
    ///
    /// assert_eq!(Indicator::GdpPerCapita.as_str(), "gdp_per_capita");
    /// ```
    pub fn as_str(self) -> &'static str {
        self.definition().key
    }

    /// Return the ranking direction.
    pub fn polarity(self) -> Polarity {
        self.definition().polarity
    }

    /// Return the human-readable label.
    pub fn label(self) -> &'static str {
        self.definition().label
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Indicator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        REGISTRY
            .iter()
            .find(|def| def.key == key)
            .map(|def| def.indicator)
            .ok_or_else(|| format!("unknown indicator '{s}'"))
    }
}
