//! How a threshold change reaches the drawing surface.
//!
//! `Rebuild` redraws the section plus every candidate below the threshold;
//! `AppendBatch` only adds the candidates between the old and new threshold
//! on top of what is already drawn. Both build their batch without touching
//! the surface, so a failed color lookup commits nothing.
//!
//! Within a batch the most critical candidate is drawn last (topmost). Across
//! appended batches this does not hold: a later batch of higher-FOS traces is
//! drawn above earlier, more critical ones.

use feed::{CandidateFeed, FeedError, FosColorTable};

use crate::layout::Layout;
use crate::surface::DrawingSurface;
use crate::trace::Trace;
use crate::view::{RenderState, ThresholdOutcome};

pub trait ThresholdStrategy {
    fn name(&self) -> &'static str;

    /// Candidate traces to commit, in draw order.
    fn collect(
        &self,
        feed: &CandidateFeed,
        colors: &FosColorTable,
        drawn_up_to: f64,
        threshold: f64,
    ) -> Result<Vec<Trace>, FeedError>;

    /// Hands the batch to the surface and returns the resulting state.
    fn commit(
        &self,
        surface: &mut dyn DrawingSurface,
        section: &[Trace],
        layout: &Layout,
        batch: Vec<Trace>,
        previous: Option<RenderState>,
        threshold: f64,
    ) -> RenderState;

    fn outcome(&self, added: usize, state: &RenderState) -> ThresholdOutcome;
}

/// Replaces everything on the surface.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Rebuild;

/// Appends only the newly admitted candidates.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct AppendBatch;

/// Collects candidates with `from <= fos < threshold`, most critical last.
fn scan(
    feed: &CandidateFeed,
    colors: &FosColorTable,
    from: Option<f64>,
    threshold: f64,
) -> Result<Vec<Trace>, FeedError> {
    let mut traces = feed
        .window(from, threshold)
        .iter()
        .map(|c| Ok(Trace::candidate(c, colors.bucket_color(c.fos)?)))
        .collect::<Result<Vec<_>, FeedError>>()?;
    traces.reverse();
    Ok(traces)
}

impl ThresholdStrategy for Rebuild {
    fn name(&self) -> &'static str {
        "rebuild"
    }

    fn collect(
        &self,
        feed: &CandidateFeed,
        colors: &FosColorTable,
        _drawn_up_to: f64,
        threshold: f64,
    ) -> Result<Vec<Trace>, FeedError> {
        scan(feed, colors, None, threshold)
    }

    fn commit(
        &self,
        surface: &mut dyn DrawingSurface,
        section: &[Trace],
        layout: &Layout,
        batch: Vec<Trace>,
        _previous: Option<RenderState>,
        threshold: f64,
    ) -> RenderState {
        let candidate_count = batch.len();
        let mut traces = Vec::with_capacity(section.len() + batch.len());
        traces.extend_from_slice(section);
        traces.extend(batch);
        let trace_count = traces.len();
        surface.replace_all(traces, layout);
        RenderState {
            drawn_up_to_fos: threshold,
            trace_count,
            candidate_count,
        }
    }

    fn outcome(&self, _added: usize, state: &RenderState) -> ThresholdOutcome {
        ThresholdOutcome::Rebuilt {
            candidates: state.candidate_count,
        }
    }
}

impl ThresholdStrategy for AppendBatch {
    fn name(&self) -> &'static str {
        "append"
    }

    fn collect(
        &self,
        feed: &CandidateFeed,
        colors: &FosColorTable,
        drawn_up_to: f64,
        threshold: f64,
    ) -> Result<Vec<Trace>, FeedError> {
        scan(feed, colors, Some(drawn_up_to), threshold)
    }

    fn commit(
        &self,
        surface: &mut dyn DrawingSurface,
        _section: &[Trace],
        _layout: &Layout,
        batch: Vec<Trace>,
        previous: Option<RenderState>,
        threshold: f64,
    ) -> RenderState {
        let previous = previous.unwrap_or_default();
        let added = batch.len();
        if added > 0 {
            surface.append(batch);
        }
        RenderState {
            drawn_up_to_fos: threshold,
            trace_count: previous.trace_count + added,
            candidate_count: previous.candidate_count + added,
        }
    }

    fn outcome(&self, added: usize, _state: &RenderState) -> ThresholdOutcome {
        ThresholdOutcome::Appended { added }
    }
}
