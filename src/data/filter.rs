use super::model::{LaunchDataset, LaunchRecord};
use crate::error::SelectionError;

// ---------------------------------------------------------------------------
// Filter predicate: site selector + inclusive payload range
// ---------------------------------------------------------------------------

/// Dropdown value standing for "every site".
pub const ALL_SITES: &str = "ALL";

/// Which launch sites a view covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteSelection {
    All,
    Site(String),
}

impl SiteSelection {
    /// Interpret a dropdown value, rejecting sites the dataset never saw.
    pub fn parse(value: &str, dataset: &LaunchDataset) -> Result<Self, SelectionError> {
        if value == ALL_SITES {
            Ok(SiteSelection::All)
        } else if dataset.has_site(value) {
            Ok(SiteSelection::Site(value.to_string()))
        } else {
            Err(SelectionError::UnknownSite(value.to_string()))
        }
    }

    pub fn matches(&self, record: &LaunchRecord) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(site) => record.launch_site == *site,
        }
    }
}

/// Inclusive payload interval in kilograms, `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Result<Self, SelectionError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(SelectionError::NonFiniteBound);
        }
        if low > high {
            return Err(SelectionError::InvertedRange { low, high });
        }
        Ok(Self { low, high })
    }

    /// The full observed range of a dataset.
    pub fn full(dataset: &LaunchDataset) -> Self {
        let bounds = dataset.bounds();
        Self {
            low: bounds.min,
            high: bounds.max,
        }
    }

    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        self.low <= payload_mass_kg && payload_mass_kg <= self.high
    }
}

/// The scatter view's full selection.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub site: SiteSelection,
    pub payload: PayloadRange,
}

/// Records passing both the payload range and the site selector, in dataset order.
pub fn filtered_records<'a>(
    dataset: &'a LaunchDataset,
    selection: &'a FilterSelection,
) -> impl Iterator<Item = &'a LaunchRecord> + 'a {
    dataset
        .records()
        .iter()
        .filter(move |r| selection.payload.contains(r.payload_mass_kg) && selection.site.matches(r))
}
