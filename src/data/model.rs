use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const LAUNCH_SITE_COLUMN: &str = "Launch Site";
pub const PAYLOAD_MASS_COLUMN: &str = "Payload Mass (kg)";
pub const CLASS_COLUMN: &str = "class";

/// Columns every input file must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = [LAUNCH_SITE_COLUMN, PAYLOAD_MASS_COLUMN, CLASS_COLUMN];

// ---------------------------------------------------------------------------
// OutcomeClass – binary launch outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum OutcomeClass {
    Failure,
    Success,
}

impl OutcomeClass {
    /// Accepts the numeric encodings found in exported frames: `0`/`1` and `0.0`/`1.0`.
    pub fn from_f64(value: f64) -> Option<Self> {
        if value == 0.0 {
            Some(OutcomeClass::Failure)
        } else if value == 1.0 {
            Some(OutcomeClass::Success)
        } else {
            None
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        s.trim().parse::<f64>().ok().and_then(Self::from_f64)
    }

    pub fn as_u8(self) -> u8 {
        match self {
            OutcomeClass::Failure => 0,
            OutcomeClass::Success => 1,
        }
    }
}

impl From<OutcomeClass> for u8 {
    fn from(class: OutcomeClass) -> u8 {
        class.as_u8()
    }
}

impl fmt::Display for OutcomeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

// ---------------------------------------------------------------------------
// ColorAttribute – which column colours the scatter points
// ---------------------------------------------------------------------------

/// The categorical attribute used to colour scatter points.
///
/// Resolved once per file, in this order:
/// `Booster Version Category` → `Booster Version` → `Launch Site`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorAttribute {
    BoosterVersionCategory,
    BoosterVersion,
    LaunchSite,
}

impl ColorAttribute {
    /// Booster columns in fallback order. `LaunchSite` is the last resort and
    /// always present, so it is not listed.
    pub const BOOSTER_CANDIDATES: [ColorAttribute; 2] = [
        ColorAttribute::BoosterVersionCategory,
        ColorAttribute::BoosterVersion,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            ColorAttribute::BoosterVersionCategory => "Booster Version Category",
            ColorAttribute::BoosterVersion => "Booster Version",
            ColorAttribute::LaunchSite => LAUNCH_SITE_COLUMN,
        }
    }

    /// Pick the first booster column for which `has_column` holds.
    pub fn resolve(has_column: impl Fn(&str) -> bool) -> Self {
        Self::BOOSTER_CANDIDATES
            .into_iter()
            .find(|attr| has_column(attr.column_name()))
            .unwrap_or(ColorAttribute::LaunchSite)
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the source table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub launch_site: String,
    pub payload_mass_kg: f64,
    pub class: OutcomeClass,
    /// Value of the resolved booster column, if the file has one.
    pub booster_category: Option<String>,
}

#[cfg(test)]
impl LaunchRecord {
    pub fn new(launch_site: impl Into<String>, payload_mass_kg: f64, class: OutcomeClass) -> Self {
        Self {
            launch_site: launch_site.into(),
            payload_mass_kg,
            class,
            booster_category: None,
        }
    }

    pub fn with_booster(mut self, booster: impl Into<String>) -> Self {
        self.booster_category = Some(booster.into());
        self
    }
}

// ---------------------------------------------------------------------------
// PayloadBounds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadBounds {
    pub min: f64,
    pub max: f64,
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded table with pre-computed site index and payload bounds.
/// Read-only after construction.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    records: Vec<LaunchRecord>,
    sites: BTreeSet<String>,
    bounds: PayloadBounds,
    color_attribute: ColorAttribute,
}

impl LaunchDataset {
    /// Build the site index and payload bounds. Returns `None` for an empty
    /// record list, which has no bounds.
    pub fn from_records(records: Vec<LaunchRecord>, color_attribute: ColorAttribute) -> Option<Self> {
        let first = records.first()?.payload_mass_kg;
        let bounds = records.iter().fold(
            PayloadBounds {
                min: first,
                max: first,
            },
            |b, r| PayloadBounds {
                min: b.min.min(r.payload_mass_kg),
                max: b.max.max(r.payload_mass_kg),
            },
        );
        let sites = records.iter().map(|r| r.launch_site.clone()).collect();

        Some(LaunchDataset {
            records,
            sites,
            bounds,
            color_attribute,
        })
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    /// Distinct site names, sorted.
    pub fn sites(&self) -> &BTreeSet<String> {
        &self.sites
    }

    pub fn has_site(&self, site: &str) -> bool {
        self.sites.contains(site)
    }

    pub fn bounds(&self) -> PayloadBounds {
        self.bounds
    }

    pub fn color_attribute(&self) -> ColorAttribute {
        self.color_attribute
    }

    /// The colouring value for one record under the resolved attribute.
    pub fn color_value<'a>(&self, record: &'a LaunchRecord) -> &'a str {
        match self.color_attribute {
            ColorAttribute::LaunchSite => &record.launch_site,
            _ => record.booster_category.as_deref().unwrap_or("<null>"),
        }
    }

    /// Sorted distinct colouring values across all records.
    pub fn color_values(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .map(|r| self.color_value(r).to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LaunchDataset {
        LaunchDataset::from_records(
            vec![
                LaunchRecord::new("SiteB", 1500.0, OutcomeClass::Success).with_booster("FT"),
                LaunchRecord::new("SiteA", 500.0, OutcomeClass::Success).with_booster("v1.0"),
                LaunchRecord::new("SiteA", 2000.0, OutcomeClass::Failure),
            ],
            ColorAttribute::BoosterVersionCategory,
        )
        .unwrap()
    }

    #[test]
    fn bounds_and_sites_are_derived() {
        let ds = sample();
        assert_eq!(ds.bounds(), PayloadBounds { min: 500.0, max: 2000.0 });
        let sites: Vec<&str> = ds.sites().iter().map(String::as_str).collect();
        assert_eq!(sites, ["SiteA", "SiteB"]);
        assert!(ds.has_site("SiteB"));
        assert!(!ds.has_site("SiteC"));
    }

    #[test]
    fn empty_records_have_no_dataset() {
        assert!(LaunchDataset::from_records(Vec::new(), ColorAttribute::LaunchSite).is_none());
    }

    #[test]
    fn outcome_class_parsing() {
        assert_eq!(OutcomeClass::parse("1"), Some(OutcomeClass::Success));
        assert_eq!(OutcomeClass::parse(" 0.0 "), Some(OutcomeClass::Failure));
        assert_eq!(OutcomeClass::parse("2"), None);
        assert_eq!(OutcomeClass::parse("yes"), None);
    }

    #[test]
    fn color_attribute_fallback_order() {
        let both = |c: &str| c == "Booster Version" || c == "Booster Version Category";
        assert_eq!(ColorAttribute::resolve(both), ColorAttribute::BoosterVersionCategory);
        assert_eq!(
            ColorAttribute::resolve(|c| c == "Booster Version"),
            ColorAttribute::BoosterVersion
        );
        assert_eq!(ColorAttribute::resolve(|_| false), ColorAttribute::LaunchSite);
    }

    #[test]
    fn color_values_follow_attribute() {
        let ds = sample();
        let vals: Vec<String> = ds.color_values().into_iter().collect();
        assert_eq!(vals, ["<null>", "FT", "v1.0"]);

        let by_site = LaunchDataset::from_records(ds.records().to_vec(), ColorAttribute::LaunchSite)
            .unwrap();
        let vals: Vec<String> = by_site.color_values().into_iter().collect();
        assert_eq!(vals, ["SiteA", "SiteB"]);
    }
}
