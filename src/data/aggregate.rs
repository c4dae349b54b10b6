use std::collections::BTreeMap;

use super::model::{LaunchDataset, OutcomeClass};

// ---------------------------------------------------------------------------
// Group-and-sum queries behind the pie view
// ---------------------------------------------------------------------------

/// Sum of outcome classes (i.e. successful launches) per site.
/// Every observed site appears, including sites with zero successes.
pub fn success_counts_by_site(dataset: &LaunchDataset) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = dataset.sites().iter().map(|s| (s.clone(), 0)).collect();
    for record in dataset.records() {
        *counts.entry(record.launch_site.clone()).or_default() += u64::from(record.class.as_u8());
    }
    counts
}

/// Failure and success counts for one site.
///
/// Both classes are present (possibly zero) when the site has records;
/// the map is empty when it has none.
pub fn outcome_counts_for_site(dataset: &LaunchDataset, site: &str) -> BTreeMap<OutcomeClass, u64> {
    let mut counts = BTreeMap::new();
    for record in dataset.records().iter().filter(|r| r.launch_site == site) {
        if counts.is_empty() {
            counts.insert(OutcomeClass::Failure, 0);
            counts.insert(OutcomeClass::Success, 0);
        }
        *counts.entry(record.class).or_default() += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{ColorAttribute, LaunchRecord};

    fn sample() -> LaunchDataset {
        LaunchDataset::from_records(
            vec![
                LaunchRecord::new("SiteA", 500.0, OutcomeClass::Success),
                LaunchRecord::new("SiteA", 2000.0, OutcomeClass::Failure),
                LaunchRecord::new("SiteB", 1500.0, OutcomeClass::Success),
                LaunchRecord::new("SiteB", 3000.0, OutcomeClass::Success),
                LaunchRecord::new("SiteC", 800.0, OutcomeClass::Failure),
            ],
            ColorAttribute::LaunchSite,
        )
        .unwrap()
    }

    #[test]
    fn successes_per_site_cover_every_site() {
        let counts = success_counts_by_site(&sample());
        let expected: BTreeMap<String, u64> =
            [("SiteA", 1), ("SiteB", 2), ("SiteC", 0)].map(|(s, c)| (s.to_string(), c)).into();
        assert_eq!(counts, expected);
    }

    #[test]
    fn site_outcomes_sum_to_site_total() {
        let ds = sample();
        for site in ds.sites() {
            let counts = outcome_counts_for_site(&ds, site);
            let total = ds.records().iter().filter(|r| r.launch_site == *site).count() as u64;
            assert_eq!(counts.len(), 2);
            assert_eq!(counts.values().sum::<u64>(), total);
        }

        let b = outcome_counts_for_site(&ds, "SiteB");
        assert_eq!(b[&OutcomeClass::Failure], 0);
        assert_eq!(b[&OutcomeClass::Success], 2);
    }

    #[test]
    fn site_without_records_has_no_categories() {
        assert!(outcome_counts_for_site(&sample(), "Nowhere").is_empty());
    }
}
