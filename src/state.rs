use std::sync::Arc;

use crate::bindings::{BINDINGS, bindings_for_input};
use crate::config::DashboardConfig;
use crate::data::model::LaunchDataset;
use crate::widgets::{PageLayout, build_layout};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything the handlers share. Built once at startup and never mutated,
/// so clones handed to concurrent requests need no locking.
#[derive(Clone)]
pub struct AppState {
    /// The loaded table.
    pub dataset: Arc<LaunchDataset>,

    /// Widget registry derived from the table.
    pub layout: Arc<PageLayout>,
}

impl AppState {
    pub fn new(dataset: LaunchDataset, config: &DashboardConfig) -> Self {
        let layout = build_layout(&dataset, config);
        log_binding_graph(&layout);
        Self {
            dataset: Arc::new(dataset),
            layout: Arc::new(layout),
        }
    }
}

/// Log which outputs each input drives, flagging ids missing from the layout.
fn log_binding_graph(layout: &PageLayout) {
    for widget in &layout.widgets {
        let Some(id) = widget.id() else { continue };
        let outputs: Vec<&str> = bindings_for_input(id).map(|b| b.output).collect();
        if !outputs.is_empty() {
            log::debug!("{id} -> {outputs:?}");
        }
    }
    for binding in BINDINGS {
        for id in std::iter::once(&binding.output).chain(binding.inputs) {
            if layout.widget(id).is_none() {
                log::warn!("binding refers to '{id}', which is not on the page");
            }
        }
    }
}
