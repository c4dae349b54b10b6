use serde::Serialize;

use crate::config::DashboardConfig;
use crate::data::filter::ALL_SITES;
use crate::data::model::LaunchDataset;

// ---------------------------------------------------------------------------
// Widget ids shared by the layout and the binding table
// ---------------------------------------------------------------------------

pub const SITE_DROPDOWN: &str = "site-dropdown";
pub const PAYLOAD_SLIDER: &str = "payload-slider";
pub const PIE_CHART: &str = "success-pie-chart";
pub const SCATTER_CHART: &str = "success-payload-scatter-chart";

// ---------------------------------------------------------------------------
// Widget registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

/// Static page elements, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Widget {
    Heading {
        text: String,
    },
    Label {
        text: String,
    },
    Dropdown {
        id: &'static str,
        options: Vec<DropdownOption>,
        value: String,
        placeholder: String,
        searchable: bool,
    },
    RangeSlider {
        id: &'static str,
        min: f64,
        max: f64,
        step: f64,
        value: [f64; 2],
    },
    Graph {
        id: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLayout {
    pub title: String,
    pub widgets: Vec<Widget>,
}

impl PageLayout {
    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id() == Some(id))
    }
}

impl Widget {
    pub fn id(&self) -> Option<&'static str> {
        match self {
            Widget::Heading { .. } | Widget::Label { .. } => None,
            Widget::Dropdown { id, .. } | Widget::RangeSlider { id, .. } | Widget::Graph { id } => {
                Some(*id)
            }
        }
    }
}

/// Build the page once from the loaded dataset: dropdown options from the
/// observed sites, slider bounds from the observed payloads.
pub fn build_layout(dataset: &LaunchDataset, config: &DashboardConfig) -> PageLayout {
    let options = std::iter::once(DropdownOption {
        label: "All Sites".to_string(),
        value: ALL_SITES.to_string(),
    })
    .chain(dataset.sites().iter().map(|site| DropdownOption {
        label: site.clone(),
        value: site.clone(),
    }))
    .collect();

    let bounds = dataset.bounds();

    PageLayout {
        title: config.title.clone(),
        widgets: vec![
            Widget::Heading {
                text: config.title.clone(),
            },
            Widget::Dropdown {
                id: SITE_DROPDOWN,
                options,
                value: ALL_SITES.to_string(),
                placeholder: "Select a Launch Site here".to_string(),
                searchable: true,
            },
            Widget::Graph { id: PIE_CHART },
            Widget::Label {
                text: "Payload range (Kg):".to_string(),
            },
            Widget::RangeSlider {
                id: PAYLOAD_SLIDER,
                min: bounds.min,
                max: bounds.max,
                step: config.slider_step,
                value: [bounds.min, bounds.max],
            },
            Widget::Graph { id: SCATTER_CHART },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{ColorAttribute, LaunchRecord, OutcomeClass};

    fn sample() -> LaunchDataset {
        LaunchDataset::from_records(
            vec![
                LaunchRecord::new("VAFB SLC-4E", 9600.0, OutcomeClass::Success),
                LaunchRecord::new("CCAFS LC-40", 0.0, OutcomeClass::Failure),
                LaunchRecord::new("CCAFS LC-40", 525.0, OutcomeClass::Failure),
            ],
            ColorAttribute::LaunchSite,
        )
        .unwrap()
    }

    #[test]
    fn dropdown_lists_sentinel_then_sorted_sites() {
        let layout = build_layout(&sample(), &DashboardConfig::default());
        let Some(Widget::Dropdown { options, value, .. }) = layout.widget(SITE_DROPDOWN) else {
            panic!("dropdown missing");
        };
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["ALL", "CCAFS LC-40", "VAFB SLC-4E"]);
        assert_eq!(options[0].label, "All Sites");
        assert_eq!(value, "ALL");
    }

    #[test]
    fn slider_spans_observed_payloads() {
        let layout = build_layout(&sample(), &DashboardConfig::default());
        let Some(Widget::RangeSlider { min, max, step, value, .. }) = layout.widget(PAYLOAD_SLIDER)
        else {
            panic!("slider missing");
        };
        assert_eq!((*min, *max), (0.0, 9600.0));
        assert_eq!(*step, 1000.0);
        assert_eq!(*value, [0.0, 9600.0]);
    }

    #[test]
    fn both_graph_regions_exist() {
        let layout = build_layout(&sample(), &DashboardConfig::default());
        assert!(matches!(layout.widget(PIE_CHART), Some(Widget::Graph { .. })));
        assert!(matches!(layout.widget(SCATTER_CHART), Some(Widget::Graph { .. })));
        assert_eq!(layout.title, "SpaceX Launch Records Dashboard");
    }
}
