use std::collections::BTreeSet;

use serde::Serialize;

use crate::color::{ColorMap, LegendEntry};
use crate::data::aggregate::{outcome_counts_for_site, success_counts_by_site};
use crate::data::filter::{FilterSelection, SiteSelection, filtered_records};
use crate::data::model::{CLASS_COLUMN, LAUNCH_SITE_COLUMN, LaunchDataset, OutcomeClass, PAYLOAD_MASS_COLUMN};

// ---------------------------------------------------------------------------
// ChartSpec – declarative chart description sent to the browser
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Pie,
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
    pub color: String,
}

/// One launch passed through to the scatter view unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub class: OutcomeClass,
    /// Value of the colouring attribute.
    pub category: String,
    /// Hover metadata.
    pub launch_site: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterAxes {
    pub x: &'static str,
    pub y: &'static str,
    pub color: &'static str,
    pub hover: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    Pie {
        slices: Vec<PieSlice>,
    },
    Scatter {
        axes: ScatterAxes,
        points: Vec<ScatterPoint>,
        /// Categories present in `points`, with their colours.
        legend: Vec<LegendEntry>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    #[serde(flatten)]
    pub data: ChartData,
    /// Set when the inputs could not be evaluated; the chart is then empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChartSpec {
    pub fn kind(&self) -> ChartKind {
        match self.data {
            ChartData::Pie { .. } => ChartKind::Pie,
            ChartData::Scatter { .. } => ChartKind::Scatter,
        }
    }

    /// An empty chart of the given kind carrying an error message.
    pub fn unavailable(kind: ChartKind, dataset: &LaunchDataset, message: impl Into<String>) -> Self {
        let data = match kind {
            ChartKind::Pie => ChartData::Pie { slices: Vec::new() },
            ChartKind::Scatter => ChartData::Scatter {
                axes: scatter_axes(dataset),
                points: Vec::new(),
                legend: Vec::new(),
            },
        };
        ChartSpec {
            title: "Chart unavailable".to_string(),
            data,
            error: Some(message.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.data {
            ChartData::Pie { slices } => slices.is_empty(),
            ChartData::Scatter { points, .. } => points.is_empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// Pie transform
// ---------------------------------------------------------------------------

/// Success counts per site, or the failure/success split of one site.
pub fn success_pie(dataset: &LaunchDataset, site: &SiteSelection) -> ChartSpec {
    let (title, counts): (String, Vec<(String, u64)>) = match site {
        SiteSelection::All => (
            "Total Successful Launches by Site".to_string(),
            success_counts_by_site(dataset).into_iter().collect(),
        ),
        SiteSelection::Site(name) => (
            format!("Success vs Failure for {name}"),
            outcome_counts_for_site(dataset, name)
                .into_iter()
                .map(|(class, n)| (class.to_string(), n))
                .collect(),
        ),
    };

    let labels: BTreeSet<String> = counts.iter().map(|(label, _)| label.clone()).collect();
    let colors = ColorMap::new(&labels);
    let slices = counts
        .into_iter()
        .map(|(label, value)| PieSlice {
            color: colors.color_for(&label).to_string(),
            label,
            value,
        })
        .collect();

    ChartSpec {
        title,
        data: ChartData::Pie { slices },
        error: None,
    }
}

// ---------------------------------------------------------------------------
// Scatter transform
// ---------------------------------------------------------------------------

fn scatter_axes(dataset: &LaunchDataset) -> ScatterAxes {
    ScatterAxes {
        x: PAYLOAD_MASS_COLUMN,
        y: CLASS_COLUMN,
        color: dataset.color_attribute().column_name(),
        hover: vec![LAUNCH_SITE_COLUMN],
    }
}

/// Launches within the payload range (and site, if one is selected), coloured
/// by the dataset's categorical attribute.
pub fn payload_scatter(dataset: &LaunchDataset, selection: &FilterSelection) -> ChartSpec {
    let title = match &selection.site {
        SiteSelection::All => "Payload vs. Outcome for All Sites".to_string(),
        SiteSelection::Site(name) => format!("Payload vs. Outcome for {name}"),
    };

    let points: Vec<ScatterPoint> = filtered_records(dataset, selection)
        .map(|r| ScatterPoint {
            payload_mass_kg: r.payload_mass_kg,
            class: r.class,
            category: dataset.color_value(r).to_string(),
            launch_site: r.launch_site.clone(),
        })
        .collect();

    // Colours come from the whole dataset so a category keeps its colour
    // while the range slider moves.
    let colors = ColorMap::new(&dataset.color_values());
    let present: BTreeSet<&str> = points.iter().map(|p| p.category.as_str()).collect();
    let legend = colors
        .legend_entries()
        .into_iter()
        .filter(|e| present.contains(e.label.as_str()))
        .collect();

    ChartSpec {
        title,
        data: ChartData::Scatter {
            axes: scatter_axes(dataset),
            points,
            legend,
        },
        error: None,
    }
}
