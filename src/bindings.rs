use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::chart::{ChartKind, ChartSpec, payload_scatter, success_pie};
use crate::data::filter::{FilterSelection, PayloadRange, SiteSelection};
use crate::data::model::LaunchDataset;
use crate::error::SelectionError;
use crate::widgets::{PAYLOAD_SLIDER, PIE_CHART, SCATTER_CHART, SITE_DROPDOWN};

// ---------------------------------------------------------------------------
// Reactive bindings: which inputs feed which output, through which transform
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    SuccessPie,
    PayloadScatter,
}

impl Transform {
    pub fn kind(self) -> ChartKind {
        match self {
            Transform::SuccessPie => ChartKind::Pie,
            Transform::PayloadScatter => ChartKind::Scatter,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binding {
    pub output: &'static str,
    pub inputs: &'static [&'static str],
    pub transform: Transform,
}

/// The page's whole binding graph.
pub const BINDINGS: &[Binding] = &[
    Binding {
        output: PIE_CHART,
        inputs: &[SITE_DROPDOWN],
        transform: Transform::SuccessPie,
    },
    Binding {
        output: SCATTER_CHART,
        inputs: &[SITE_DROPDOWN, PAYLOAD_SLIDER],
        transform: Transform::PayloadScatter,
    },
];

/// Current widget values keyed by widget id, as the browser sends them.
pub type InputValues = BTreeMap<String, JsonValue>;

pub fn binding_for(output: &str) -> Option<&'static Binding> {
    BINDINGS.iter().find(|b| b.output == output)
}

/// Outputs to refresh when `input` changes.
pub fn bindings_for_input(input: &str) -> impl Iterator<Item = &'static Binding> + '_ {
    BINDINGS.iter().filter(move |b| b.inputs.contains(&input))
}

impl Binding {
    /// Decode the inputs and run the transform.
    pub fn evaluate(
        &self,
        dataset: &LaunchDataset,
        inputs: &InputValues,
    ) -> Result<ChartSpec, SelectionError> {
        let site = site_input(dataset, inputs)?;
        match self.transform {
            Transform::SuccessPie => Ok(success_pie(dataset, &site)),
            Transform::PayloadScatter => {
                let payload = payload_input(inputs)?;
                Ok(payload_scatter(dataset, &FilterSelection { site, payload }))
            }
        }
    }

    /// Like [`Binding::evaluate`], but a bad input yields an empty chart
    /// carrying the error instead of failing the request.
    pub fn render(&self, dataset: &LaunchDataset, inputs: &InputValues) -> ChartSpec {
        match self.evaluate(dataset, inputs) {
            Ok(spec) => spec,
            Err(e) => {
                log::warn!("{}: {e}", self.output);
                ChartSpec::unavailable(self.transform.kind(), dataset, e.to_string())
            }
        }
    }
}

fn site_input(dataset: &LaunchDataset, inputs: &InputValues) -> Result<SiteSelection, SelectionError> {
    let value = inputs
        .get(SITE_DROPDOWN)
        .ok_or(SelectionError::MissingInput(SITE_DROPDOWN))?;
    let site = value.as_str().ok_or(SelectionError::InvalidInput {
        input: SITE_DROPDOWN,
        expected: "a site name",
    })?;
    SiteSelection::parse(site, dataset)
}

fn payload_input(inputs: &InputValues) -> Result<PayloadRange, SelectionError> {
    let invalid = SelectionError::InvalidInput {
        input: PAYLOAD_SLIDER,
        expected: "a [low, high] pair of numbers",
    };
    let value = inputs
        .get(PAYLOAD_SLIDER)
        .ok_or(SelectionError::MissingInput(PAYLOAD_SLIDER))?;
    match value.as_array().map(Vec::as_slice) {
        Some([low, high]) => match (low.as_f64(), high.as_f64()) {
            (Some(low), Some(high)) => PayloadRange::new(low, high),
            _ => Err(invalid),
        },
        _ => Err(invalid),
    }
}
