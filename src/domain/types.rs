//! Record and category types.
//!
//! `ExplosionRecord` is the typed row the whole crate works on. Raw dataset
//! codes (`"Wr"`, `"Ug"`, `"PAKIST"`, ...) are resolved into the category
//! enums here, once, so that every aggregate downstream matches on variants
//! instead of strings.

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// First year covered by the dataset (inclusive).
pub const FIRST_YEAR: i32 = 1945;
/// Last year covered by the dataset (inclusive).
pub const LAST_YEAR: i32 = 1998;

/// Nation that conducted a test.
///
/// Variants are declared in code order so the derived `Ord` matches the
/// lexicographic order of `code()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "CHINA")]
    China,
    #[serde(rename = "FRANCE")]
    France,
    #[serde(rename = "INDIA")]
    India,
    #[serde(rename = "PAKIST")]
    Pakistan,
    #[serde(rename = "UK")]
    Uk,
    #[serde(rename = "UNKNOWN")]
    Unknown,
    #[serde(rename = "USA")]
    Usa,
    #[serde(rename = "USSR")]
    Ussr,
}

impl Country {
    pub const ALL: [Country; 8] = [
        Country::China,
        Country::France,
        Country::India,
        Country::Pakistan,
        Country::Uk,
        Country::Unknown,
        Country::Usa,
        Country::Ussr,
    ];

    /// Dataset code, also used as the deterministic tie-breaker.
    pub fn code(self) -> &'static str {
        match self {
            Country::China => "CHINA",
            Country::France => "FRANCE",
            Country::India => "INDIA",
            Country::Pakistan => "PAKIST",
            Country::Uk => "UK",
            Country::Unknown => "UNKNOWN",
            Country::Usa => "USA",
            Country::Ussr => "USSR",
        }
    }

    /// Strict lookup: `None` when the text is not a known code or alias.
    pub fn from_label(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_uppercase();
        let country = match key.as_str() {
            "CHINA" => Country::China,
            "FRANCE" => Country::France,
            "INDIA" => Country::India,
            "PAKIST" | "PAKISTAN" => Country::Pakistan,
            "UK" | "GB" | "UNITED KINGDOM" => Country::Uk,
            "USA" | "US" | "UNITED STATES" => Country::Usa,
            "USSR" | "SOVIET UNION" => Country::Ussr,
            "UNKNOWN" => Country::Unknown,
            _ => return None,
        };
        Some(country)
    }

    /// Lenient lookup used by ingest; anything unrecognized becomes `Unknown`.
    pub fn parse(raw: &str) -> Self {
        Self::from_label(raw).unwrap_or(Country::Unknown)
    }
}

/// Stated rationale for a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    WeaponsResearch,
    WeaponsEffects,
    Peaceful,
    Safety,
    Combat,
    /// A recognized code outside the main categories (`Fms`, `Me`, `Se`, `Transp`).
    Other,
    /// Missing or unrecognized code.
    Unknown,
}

impl Purpose {
    pub const ALL: [Purpose; 7] = [
        Purpose::WeaponsResearch,
        Purpose::WeaponsEffects,
        Purpose::Peaceful,
        Purpose::Safety,
        Purpose::Combat,
        Purpose::Other,
        Purpose::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Purpose::WeaponsResearch => "weapons research",
            Purpose::WeaponsEffects => "weapons effects",
            Purpose::Peaceful => "peaceful",
            Purpose::Safety => "safety",
            Purpose::Combat => "combat",
            Purpose::Other => "other",
            Purpose::Unknown => "unknown",
        }
    }

    /// Strict lookup. Compound codes such as `Wr/We` resolve by their first
    /// component.
    pub fn from_label(raw: &str) -> Option<Self> {
        let first = raw.split('/').next().unwrap_or("").trim();
        let key = first.to_ascii_lowercase().replace(['_', '-'], " ");
        let purpose = match key.as_str() {
            "wr" | "weapons research" => Purpose::WeaponsResearch,
            "we" | "weapons effects" => Purpose::WeaponsEffects,
            "pne" | "peaceful" => Purpose::Peaceful,
            "sb" | "sam" | "safety" => Purpose::Safety,
            "combat" => Purpose::Combat,
            "fms" | "me" | "se" | "transp" | "other" => Purpose::Other,
            "unknown" => Purpose::Unknown,
            _ => return None,
        };
        Some(purpose)
    }

    pub fn parse(raw: &str) -> Self {
        Self::from_label(raw).unwrap_or(Purpose::Unknown)
    }
}

/// How the device was emplaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    Underground,
    Atmospheric,
    Tower,
    Airdrop,
    Surface,
    Underwater,
    Barge,
    Unknown,
}

impl TestType {
    pub const ALL: [TestType; 8] = [
        TestType::Underground,
        TestType::Atmospheric,
        TestType::Tower,
        TestType::Airdrop,
        TestType::Surface,
        TestType::Underwater,
        TestType::Barge,
        TestType::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TestType::Underground => "underground",
            TestType::Atmospheric => "atmospheric",
            TestType::Tower => "tower",
            TestType::Airdrop => "airdrop",
            TestType::Surface => "surface",
            TestType::Underwater => "underwater",
            TestType::Barge => "barge",
            TestType::Unknown => "unknown",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_lowercase();
        if key.starts_with("shaft") {
            return Some(TestType::Underground);
        }
        let test_type = match key.as_str() {
            "ug" | "underground" | "tunnel" | "gallery" | "mine" | "crater" => TestType::Underground,
            "atmosph" | "atmospheric" | "balloon" | "rocket" | "space" => TestType::Atmospheric,
            "tower" => TestType::Tower,
            "airdrop" => TestType::Airdrop,
            "surface" => TestType::Surface,
            "uw" | "underwater" => TestType::Underwater,
            "barge" | "ship" | "watersur" | "water su" | "watr cr" => TestType::Barge,
            "unknown" => TestType::Unknown,
            _ => return None,
        };
        Some(test_type)
    }

    pub fn parse(raw: &str) -> Self {
        Self::from_label(raw).unwrap_or(TestType::Unknown)
    }
}

/// Yield bucket of a record's representative yield.
///
/// Boundaries are closed below and open above: `[0,20)`, `[20,150)`,
/// `[150,1000)`, `[1000,∞)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YieldCategory {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl YieldCategory {
    pub const ALL: [YieldCategory; 4] = [
        YieldCategory::Low,
        YieldCategory::Medium,
        YieldCategory::High,
        YieldCategory::VeryHigh,
    ];

    /// Classify a representative yield in kilotons.
    ///
    /// Returns `None` for negative or non-finite values; those are data
    /// quality problems, not a bucket.
    pub fn classify(kilotons: f64) -> Option<Self> {
        if !kilotons.is_finite() || kilotons < 0.0 {
            return None;
        }
        let category = if kilotons < 20.0 {
            YieldCategory::Low
        } else if kilotons < 150.0 {
            YieldCategory::Medium
        } else if kilotons < 1000.0 {
            YieldCategory::High
        } else {
            YieldCategory::VeryHigh
        };
        Some(category)
    }

    pub fn label(self) -> &'static str {
        match self {
            YieldCategory::Low => "Low (<20kt)",
            YieldCategory::Medium => "Medium (20-150kt)",
            YieldCategory::High => "High (150-1000kt)",
            YieldCategory::VeryHigh => "Very High (>1000kt)",
        }
    }
}

/// Fixed historical testing periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Era {
    AtomicDawn,
    AtmosphericRace,
    PartialTestBan,
    ThresholdTestBan,
    PostColdWar,
}

impl Era {
    pub const ALL: [Era; 5] = [
        Era::AtomicDawn,
        Era::AtmosphericRace,
        Era::PartialTestBan,
        Era::ThresholdTestBan,
        Era::PostColdWar,
    ];

    /// Inclusive year span.
    pub fn span(self) -> (i32, i32) {
        match self {
            Era::AtomicDawn => (1945, 1949),
            Era::AtmosphericRace => (1950, 1962),
            Era::PartialTestBan => (1963, 1974),
            Era::ThresholdTestBan => (1975, 1991),
            Era::PostColdWar => (1992, 1998),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Era::AtomicDawn => "Atomic dawn (1945-1949)",
            Era::AtmosphericRace => "Atmospheric race (1950-1962)",
            Era::PartialTestBan => "Partial Test Ban (1963-1974)",
            Era::ThresholdTestBan => "Threshold Test Ban (1975-1991)",
            Era::PostColdWar => "Post-Cold War (1992-1998)",
        }
    }

    pub fn for_year(year: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|era| {
            let (start, end) = era.span();
            (start..=end).contains(&year)
        })
    }

    /// Accepts the snake_case name (`partial_test_ban`) or the span (`1963-1974`).
    pub fn from_label(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL.into_iter().find(|era| {
            let (start, end) = era.span();
            key == era.slug() || key == format!("{start}_{end}")
        })
    }

    fn slug(self) -> &'static str {
        match self {
            Era::AtomicDawn => "atomic_dawn",
            Era::AtmosphericRace => "atmospheric_race",
            Era::PartialTestBan => "partial_test_ban",
            Era::ThresholdTestBan => "threshold_test_ban",
            Era::PostColdWar => "post_cold_war",
        }
    }
}

/// Bucket width for temporal breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Year,
    Decade,
    Era,
}

/// Numeric field of a record, for correlations and group comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Year,
    Month,
    Day,
    Latitude,
    Longitude,
    Depth,
    /// Representative yield (midpoint of the bounds).
    Yield,
    YieldLower,
    YieldUpper,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
            Field::Depth => "depth",
            Field::Yield => "yield",
            Field::YieldLower => "yield_lower",
            Field::YieldUpper => "yield_upper",
        }
    }
}

/// Categorical field used to split records into comparison groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GroupField {
    Country,
    Purpose,
    Type,
    Era,
    Decade,
}

/// A resolved group value; see `GroupField::key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Country(Country),
    Purpose(Purpose),
    Type(TestType),
    Era(Era),
    Decade(i32),
}

impl GroupField {
    /// Resolve user-supplied group text into a key. `None` means no record
    /// can belong to the group.
    pub fn key(self, raw: &str) -> Option<GroupKey> {
        match self {
            GroupField::Country => Country::from_label(raw).map(GroupKey::Country),
            GroupField::Purpose => Purpose::from_label(raw).map(GroupKey::Purpose),
            GroupField::Type => TestType::from_label(raw).map(GroupKey::Type),
            GroupField::Era => Era::from_label(raw).map(GroupKey::Era),
            GroupField::Decade => {
                let digits = raw.trim().trim_end_matches('s');
                let year: i32 = digits.parse().ok()?;
                Some(GroupKey::Decade(year - year.rem_euclid(10)))
            }
        }
    }
}

/// Where a record stands with respect to yield data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YieldStatus {
    Present(f64),
    Missing,
    /// `yield_upper < yield_lower`.
    Inverted,
    Negative,
}

/// One row of the dataset.
///
/// Immutable for the duration of a run; derived quantities are methods, never
/// stored fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionRecord {
    pub country: Country,
    pub region: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Absent for tests that were not underground.
    pub depth: Option<f64>,
    pub yield_lower: Option<f64>,
    pub yield_upper: Option<f64>,
    pub purpose: Purpose,
    #[serde(rename = "type")]
    pub test_type: TestType,
    pub name: String,
}

impl ExplosionRecord {
    pub fn yield_status(&self) -> YieldStatus {
        let lower = self.yield_lower.filter(|v| v.is_finite());
        let upper = self.yield_upper.filter(|v| v.is_finite());
        match (lower, upper) {
            (None, None) => YieldStatus::Missing,
            (Some(lo), Some(hi)) => {
                if lo < 0.0 || hi < 0.0 {
                    YieldStatus::Negative
                } else if hi < lo {
                    YieldStatus::Inverted
                } else {
                    YieldStatus::Present((lo + hi) / 2.0)
                }
            }
            (Some(v), None) | (None, Some(v)) => {
                if v < 0.0 {
                    YieldStatus::Negative
                } else {
                    YieldStatus::Present(v)
                }
            }
        }
    }

    /// Midpoint of the yield bounds (or the single bound present), in
    /// kilotons. `None` when yield data is missing or inconsistent.
    pub fn representative_yield(&self) -> Option<f64> {
        match self.yield_status() {
            YieldStatus::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn yield_category(&self) -> Option<YieldCategory> {
        self.representative_yield().and_then(YieldCategory::classify)
    }

    pub fn in_study_period(&self) -> bool {
        (FIRST_YEAR..=LAST_YEAR).contains(&self.year)
    }

    pub fn decade(&self) -> i32 {
        self.year - self.year.rem_euclid(10)
    }

    pub fn era(&self) -> Option<Era> {
        Era::for_year(self.year)
    }

    /// Calendar date, when year/month/day form a real date.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    pub fn field(&self, field: Field) -> Option<f64> {
        let value = match field {
            Field::Year => Some(f64::from(self.year)),
            Field::Month => Some(f64::from(self.month)),
            Field::Day => Some(f64::from(self.day)),
            Field::Latitude => self.latitude,
            Field::Longitude => self.longitude,
            Field::Depth => self.depth,
            Field::Yield => self.representative_yield(),
            Field::YieldLower => self.yield_lower,
            Field::YieldUpper => self.yield_upper,
        };
        value.filter(|v| v.is_finite())
    }

    pub fn belongs_to(&self, key: GroupKey) -> bool {
        match key {
            GroupKey::Country(c) => self.country == c,
            GroupKey::Purpose(p) => self.purpose == p,
            GroupKey::Type(t) => self.test_type == t,
            GroupKey::Era(e) => self.era() == Some(e),
            GroupKey::Decade(d) => self.in_study_period() && self.decade() == d,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn record(lower: Option<f64>, upper: Option<f64>) -> ExplosionRecord {
        ExplosionRecord {
            country: Country::Usa,
            region: "NTS".to_string(),
            year: 1962,
            month: 7,
            day: 6,
            latitude: Some(37.0),
            longitude: Some(-116.0),
            depth: None,
            yield_lower: lower,
            yield_upper: upper,
            purpose: Purpose::WeaponsResearch,
            test_type: TestType::Underground,
            name: "SEDAN".to_string(),
        }
    }

    #[test]
    fn twenty_kilotons_is_medium() {
        assert_eq!(YieldCategory::classify(19.999), Some(YieldCategory::Low));
        assert_eq!(YieldCategory::classify(20.0), Some(YieldCategory::Medium));
        assert_eq!(YieldCategory::classify(150.0), Some(YieldCategory::High));
        assert_eq!(YieldCategory::classify(1000.0), Some(YieldCategory::VeryHigh));
        assert_eq!(YieldCategory::classify(-1.0), None);
        assert_eq!(YieldCategory::classify(f64::NAN), None);
    }

    #[test]
    fn representative_yield_uses_midpoint() {
        assert_eq!(record(Some(10.0), Some(30.0)).representative_yield(), Some(20.0));
        assert_eq!(record(None, Some(5.0)).representative_yield(), Some(5.0));
        assert_eq!(record(None, None).yield_status(), YieldStatus::Missing);
        assert_eq!(record(Some(30.0), Some(10.0)).yield_status(), YieldStatus::Inverted);
        assert_eq!(record(Some(-1.0), Some(10.0)).yield_status(), YieldStatus::Negative);
    }

    #[test]
    fn dataset_codes_resolve() {
        assert_eq!(Country::parse("PAKIST"), Country::Pakistan);
        assert_eq!(Country::parse("usa"), Country::Usa);
        assert_eq!(Country::parse("ATLANTIS"), Country::Unknown);
        assert_eq!(Purpose::parse("Wr/We"), Purpose::WeaponsResearch);
        assert_eq!(Purpose::parse("Fms"), Purpose::Other);
        assert_eq!(Purpose::parse(""), Purpose::Unknown);
        assert_eq!(TestType::parse("Shaft/Gr"), TestType::Underground);
        assert_eq!(TestType::parse("Atmosph"), TestType::Atmospheric);
        assert_eq!(TestType::parse("Uw"), TestType::Underwater);
        assert_eq!(TestType::parse("???"), TestType::Unknown);
    }

    #[test]
    fn country_order_matches_code_order() {
        let mut codes: Vec<&str> = Country::ALL.iter().map(|c| c.code()).collect();
        let declared = codes.clone();
        codes.sort_unstable();
        assert_eq!(codes, declared);
    }

    #[test]
    fn eras_cover_study_period() {
        for year in FIRST_YEAR..=LAST_YEAR {
            assert!(Era::for_year(year).is_some(), "year {year} has no era");
        }
        assert_eq!(Era::for_year(1944), None);
        assert_eq!(Era::for_year(1963), Some(Era::PartialTestBan));
        assert_eq!(Era::from_label("1975-1991"), Some(Era::ThresholdTestBan));
        assert_eq!(Era::from_label("post cold war"), Some(Era::PostColdWar));
    }

    #[test]
    fn group_keys_resolve() {
        assert_eq!(GroupField::Decade.key("1960s"), Some(GroupKey::Decade(1960)));
        assert_eq!(GroupField::Decade.key("1967"), Some(GroupKey::Decade(1960)));
        assert_eq!(GroupField::Country.key("Narnia"), None);
        assert_eq!(GroupField::Type.key("tower"), Some(GroupKey::Type(TestType::Tower)));
    }
}
