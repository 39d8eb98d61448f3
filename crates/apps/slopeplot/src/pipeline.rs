use std::fs;
use std::path::Path;

use feed::{CandidateFeed, FosColorTable};
use render::{
    ChartView, Layout, MobileLegend, RecordingSurface, RenderConfig, RenderEvent, RenderState,
    ThresholdOutcome, Trace, Viewport,
};
use section::{SectionInput, SectionParams};
use serde::Serialize;
use tracing::debug;

pub struct Inputs {
    pub section: SectionInput,
    pub feed: CandidateFeed,
    pub colors: FosColorTable,
}

impl Inputs {
    pub fn load(section: &Path, feed: &Path, colors: Option<&Path>) -> Result<Self, String> {
        let params = SectionParams::from_json_str(&read(section)?)
            .map_err(|e| format!("parse {section:?}: {e}"))?;
        let section_input = params.resolve().map_err(|e| e.to_string())?;
        let feed = CandidateFeed::from_json_str(&read(feed)?).map_err(|e| e.to_string())?;
        debug!(candidates = feed.len(), "loaded candidate feed");
        Ok(Self {
            section: section_input,
            feed,
            colors: load_colors(colors)?,
        })
    }
}

pub fn load_colors(path: Option<&Path>) -> Result<FosColorTable, String> {
    match path {
        Some(p) => FosColorTable::from_json_str(&read(p)?).map_err(|e| e.to_string()),
        None => Ok(FosColorTable::default_ladder()),
    }
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))
}

/// Final surface contents plus how each threshold was applied.
#[derive(Debug, Serialize)]
pub struct Figure {
    pub layout: Option<Layout>,
    pub traces: Vec<Trace>,
    pub legend: Option<MobileLegend>,
    pub state: Option<RenderState>,
    pub outcomes: Vec<ThresholdOutcome>,
    pub events: Vec<RenderEvent>,
}

pub fn render_figure(
    inputs: Inputs,
    thresholds: &[f64],
    viewport: Viewport,
    config: RenderConfig,
) -> Result<Figure, String> {
    let mut view = ChartView::new(
        RecordingSurface::new(),
        &inputs.section,
        inputs.feed,
        inputs.colors,
        viewport,
        config,
    )
    .map_err(|e| e.to_string())?;

    let mut outcomes = Vec::with_capacity(thresholds.len());
    for &t in thresholds {
        outcomes.push(view.set_threshold(t).map_err(|e| e.to_string())?);
    }

    let legend = view.presentation().legend.clone();
    let state = view.state();
    let events = view.drain_events();
    let surface = view.into_surface();
    Ok(Figure {
        layout: surface.layout().cloned(),
        traces: surface.traces().to_vec(),
        legend,
        state,
        outcomes,
        events,
    })
}
