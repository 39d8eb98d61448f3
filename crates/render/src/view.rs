use feed::{CandidateFeed, FosColorTable};
use section::{SectionGeometry, SectionInput, SectionOptions, build_section_with};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::events::{EventLog, RenderEvent};
use crate::layout::{Presentation, Viewport};
use crate::strategy::{AppendBatch, Rebuild, ThresholdStrategy};
use crate::surface::DrawingSurface;
use crate::trace::Trace;

/// What is currently on the surface. Absent until the first render.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize)]
pub struct RenderState {
    pub drawn_up_to_fos: f64,
    /// Section and candidate traces together.
    pub trace_count: usize,
    pub candidate_count: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ThresholdOutcome {
    Rebuilt { candidates: usize },
    Appended { added: usize },
    Unchanged,
}

/// One chart: owns its surface and the state of what has been drawn on it.
///
/// The surface always shows the section plus exactly the candidates with
/// `fos < threshold` for the last threshold applied.
#[derive(Debug)]
pub struct ChartView<S: DrawingSurface> {
    surface: S,
    config: RenderConfig,
    feed: CandidateFeed,
    colors: FosColorTable,
    section: SectionGeometry,
    section_traces: Vec<Trace>,
    presentation: Presentation,
    state: Option<RenderState>,
    events: EventLog,
}

impl<S: DrawingSurface> ChartView<S> {
    /// Builds the section geometry up front; nothing is drawn until the first
    /// [`ChartView::set_threshold`].
    pub fn new(
        surface: S,
        input: &SectionInput,
        feed: CandidateFeed,
        colors: FosColorTable,
        viewport: Viewport,
        config: RenderConfig,
    ) -> Result<Self, RenderError> {
        let options = SectionOptions {
            arc_samples: config.arc_samples,
        };
        let section = build_section_with(input, &options)?;
        let critical_color = match section.critical_fos {
            Some(fos) => Some(colors.bucket_color(fos)?.to_string()),
            None => None,
        };
        let section_traces = section
            .shapes
            .iter()
            .map(|s| Trace::from_shape(s, critical_color.as_deref()))
            .collect();
        let presentation = Presentation::derive(viewport, &config, &section, &colors);

        Ok(Self {
            surface,
            config,
            feed,
            colors,
            section,
            section_traces,
            presentation,
            state: None,
            events: EventLog::new(),
        })
    }

    pub fn set_threshold(&mut self, threshold: f64) -> Result<ThresholdOutcome, RenderError> {
        if !threshold.is_finite() {
            return Err(RenderError::InvalidThreshold { value: threshold });
        }
        let strategy: &dyn ThresholdStrategy = match self.state {
            None => &Rebuild,
            Some(s) if threshold > s.drawn_up_to_fos => &AppendBatch,
            Some(s) if threshold < s.drawn_up_to_fos => &Rebuild,
            Some(_) => {
                debug!(threshold, "threshold unchanged");
                self.events
                    .emit("unchanged", format!("threshold {threshold} already drawn"));
                return Ok(ThresholdOutcome::Unchanged);
            }
        };
        let presentation = self.presentation.clone();
        self.apply(strategy, threshold, presentation)
    }

    /// New viewport: re-derive the layout and redraw at the current threshold.
    pub fn resize(&mut self, viewport: Viewport) -> Result<ThresholdOutcome, RenderError> {
        let presentation =
            Presentation::derive(viewport, &self.config, &self.section, &self.colors);
        match self.state {
            Some(s) => self.apply(&Rebuild, s.drawn_up_to_fos, presentation),
            None => {
                self.presentation = presentation;
                self.events.emit("resize", "nothing drawn yet");
                Ok(ThresholdOutcome::Unchanged)
            }
        }
    }

    fn apply(
        &mut self,
        strategy: &dyn ThresholdStrategy,
        threshold: f64,
        presentation: Presentation,
    ) -> Result<ThresholdOutcome, RenderError> {
        let drawn_up_to = self.state.map(|s| s.drawn_up_to_fos).unwrap_or(0.0);
        let batch = strategy.collect(&self.feed, &self.colors, drawn_up_to, threshold)?;
        let added = batch.len();

        // Infallible from here on: surface and state change together.
        let state = strategy.commit(
            &mut self.surface,
            &self.section_traces,
            &presentation.layout,
            batch,
            self.state,
            threshold,
        );
        self.state = Some(state);
        self.presentation = presentation;

        let outcome = strategy.outcome(added, &state);
        info!(
            strategy = strategy.name(),
            threshold,
            added,
            candidates = state.candidate_count,
            "chart updated"
        );
        self.events.emit(
            strategy.name(),
            format!(
                "threshold {threshold}: +{added} traces, {} candidates drawn",
                state.candidate_count
            ),
        );
        Ok(outcome)
    }

    pub fn state(&self) -> Option<RenderState> {
        self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn section_traces(&self) -> &[Trace] {
        &self.section_traces
    }

    /// Hands over the events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<RenderEvent> {
        self.events.drain()
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use feed::{Candidate, FeedError};
    use foundation::Vec2;
    use pretty_assertions::assert_eq;
    use section::{CriticalCircle, SlipCircle, SlopeProfile, Stratum};

    fn input() -> SectionInput {
        let mut input = SectionInput::new(SlopeProfile::new(
            Vec2::new(0.0, 10.0),
            Vec2::new(5.0, 10.0),
            Vec2::new(15.0, 0.0),
            Vec2::new(20.0, 0.0),
        ));
        input.strata = vec![Stratum::new(0, 3.0), Stratum::new(1, 8.0)];
        input.critical = Some(CriticalCircle {
            circle: SlipCircle::new(10.0, 15.0, 12.0),
            fos: 0.8,
        });
        input
    }

    fn feed(values: &[f64]) -> CandidateFeed {
        CandidateFeed::new(
            values
                .iter()
                .map(|&fos| Candidate::new(vec![Vec2::new(0.0, 10.0), Vec2::new(9.0, fos)], fos))
                .collect(),
        )
        .expect("sorted feed")
    }

    const FEED: [f64; 10] = [0.8, 0.95, 1.2, 1.2, 1.5, 1.75, 2.0, 2.5, 3.1, 4.4];

    fn view(values: &[f64]) -> ChartView<RecordingSurface> {
        ChartView::new(
            RecordingSurface::new(),
            &input(),
            feed(values),
            FosColorTable::default_ladder(),
            Viewport::new(1200.0, 800.0),
            RenderConfig::default(),
        )
        .expect("view")
    }

    fn sorted(mut v: Vec<f64>) -> Vec<f64> {
        v.sort_by(|a, b| a.total_cmp(b));
        v
    }

    fn expected_below(values: &[f64], t: f64) -> Vec<f64> {
        values.iter().copied().filter(|f| *f < t).collect()
    }

    #[test]
    fn first_render_draws_exactly_the_candidates_below_threshold() {
        for t in [0.0, 0.8, 1.0, 1.2, 1.3, 2.5, 10.0] {
            let mut v = view(&FEED);
            assert_eq!(
                v.set_threshold(t).expect("render"),
                ThresholdOutcome::Rebuilt {
                    candidates: expected_below(&FEED, t).len()
                }
            );
            assert_eq!(
                sorted(v.surface().candidate_fos()),
                expected_below(&FEED, t)
            );
            assert_eq!(v.surface().replace_calls(), 1);
        }
    }

    #[test]
    fn example_scenario_orders_most_critical_on_top() {
        let mut v = view(&[0.8, 1.2, 2.5]);
        v.set_threshold(1.5).expect("render");
        assert_eq!(v.surface().candidate_fos(), vec![1.2, 0.8]);
        // section traces are underneath the candidates
        let traces = v.surface().traces();
        let section_len = v.section_traces().len();
        assert!(traces[..section_len].iter().all(|t| !t.is_candidate()));
        assert_eq!(traces.len(), section_len + 2);
    }

    #[test]
    fn same_threshold_twice_adds_nothing() {
        let mut v = view(&FEED);
        v.set_threshold(1.5).expect("render");
        let before = v.surface().traces().len();
        assert_eq!(
            v.set_threshold(1.5).expect("render"),
            ThresholdOutcome::Unchanged
        );
        assert_eq!(v.surface().traces().len(), before);
        assert_eq!(v.surface().replace_calls(), 1);
        assert_eq!(v.surface().append_calls(), 0);
    }

    #[test]
    fn growing_threshold_appends_to_match_a_fresh_rebuild() {
        let mut v = view(&FEED);
        v.set_threshold(1.2).expect("render");
        assert_eq!(
            v.set_threshold(2.1).expect("render"),
            ThresholdOutcome::Appended { added: 5 }
        );
        let state = v.state().expect("state");
        assert_eq!(state.drawn_up_to_fos, 2.1);

        let mut fresh = view(&FEED);
        fresh.set_threshold(2.1).expect("render");
        assert_eq!(state.candidate_count, fresh.surface().candidate_count());
        assert_eq!(
            sorted(v.surface().candidate_fos()),
            sorted(fresh.surface().candidate_fos())
        );
        assert_eq!(v.surface().traces().len(), state.trace_count);
        assert_eq!(v.surface().replace_calls(), 1);
        assert_eq!(v.surface().append_calls(), 1);
    }

    #[test]
    fn appended_batches_are_layered_per_batch() {
        let mut v = view(&FEED);
        v.set_threshold(1.0).expect("render");
        v.set_threshold(1.6).expect("render");
        // each batch is reversed on its own; the later batch sits on top
        assert_eq!(v.surface().candidate_fos(), vec![0.95, 0.8, 1.5, 1.2, 1.2]);
    }

    #[test]
    fn shrinking_threshold_rebuilds() {
        let mut v = view(&FEED);
        v.set_threshold(3.0).expect("render");
        assert_eq!(
            v.set_threshold(1.3).expect("render"),
            ThresholdOutcome::Rebuilt { candidates: 4 }
        );
        let mut fresh = view(&FEED);
        fresh.set_threshold(1.3).expect("render");
        assert_eq!(v.surface().candidate_fos(), fresh.surface().candidate_fos());
        assert_eq!(v.surface().replace_calls(), 2);
        assert_eq!(v.state().map(|s| s.drawn_up_to_fos), Some(1.3));
    }

    #[test]
    fn resize_rebuilds_at_current_threshold() {
        let mut v = view(&FEED);
        assert_eq!(
            v.resize(Viewport::new(500.0, 400.0)).expect("resize"),
            ThresholdOutcome::Unchanged
        );
        v.set_threshold(1.0).expect("render");
        v.set_threshold(2.0).expect("render");
        let before = sorted(v.surface().candidate_fos());
        assert_eq!(
            v.resize(Viewport::new(600.0, 400.0)).expect("resize"),
            ThresholdOutcome::Rebuilt { candidates: 6 }
        );
        assert_eq!(sorted(v.surface().candidate_fos()), before);
        let layout = v.surface().layout().expect("layout");
        assert!((layout.width - 588.0).abs() < 1e-9);
        assert!(layout.annotations.is_empty());
        assert!(v.presentation().legend.is_some());
        let kinds: Vec<&str> = v.drain_events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec!["resize", "rebuild", "append", "rebuild"]);
    }

    #[test]
    fn failed_lookup_commits_nothing() {
        // The table has a hole at 0.9, below its 1.0 ceiling.
        let colors = FosColorTable::from_entries([("0.8", "a"), ("1.0", "c")]).expect("table");
        let mut v = ChartView::new(
            RecordingSurface::new(),
            &input(),
            feed(&[0.8, 0.9, 1.0]),
            colors,
            Viewport::new(1200.0, 800.0),
            RenderConfig::default(),
        )
        .expect("view");
        v.set_threshold(0.85).expect("render");
        let before_traces = v.surface().traces().to_vec();
        let before_state = v.state();

        let err = v.set_threshold(2.0).unwrap_err();
        assert_eq!(
            err,
            RenderError::Feed(FeedError::UnknownBucket {
                key: "0.9".to_string()
            })
        );
        assert_eq!(v.surface().traces(), &before_traces[..]);
        assert_eq!(v.state(), before_state);
        assert_eq!(v.surface().append_calls(), 0);

        // A shrink that only needs covered buckets still works afterwards.
        assert_eq!(
            v.set_threshold(0.5).expect("render"),
            ThresholdOutcome::Rebuilt { candidates: 0 }
        );
    }

    #[test]
    fn failed_first_rebuild_leaves_surface_untouched() {
        // 0.9 has no bucket, and every rebuild walks past it.
        let colors = FosColorTable::from_entries([("0.8", "a"), ("1.0", "c")]).expect("table");
        let mut v = ChartView::new(
            RecordingSurface::new(),
            &input(),
            feed(&[0.9, 1.0]),
            colors,
            Viewport::new(1200.0, 800.0),
            RenderConfig::default(),
        )
        .expect("view");

        assert!(matches!(
            v.set_threshold(2.0),
            Err(RenderError::Feed(FeedError::UnknownBucket { .. }))
        ));
        assert_eq!(v.state(), None);
        assert_eq!(v.surface().replace_calls(), 0);
        assert!(v.surface().traces().is_empty());
        assert!(v.surface().layout().is_none());

        // Nothing was drawn, so a resize has nothing to rebuild either.
        assert_eq!(
            v.resize(Viewport::new(600.0, 400.0)).expect("resize"),
            ThresholdOutcome::Unchanged
        );
        assert_eq!(v.surface().replace_calls(), 0);
    }

    #[test]
    fn events_are_handed_over_once() {
        let mut v = view(&FEED);
        v.set_threshold(1.0).expect("render");
        v.set_threshold(1.0).expect("render");
        let first = v.drain_events();
        assert_eq!(
            first.iter().map(|e| e.kind).collect::<Vec<_>>(),
            vec!["rebuild", "unchanged"]
        );
        assert!(v.drain_events().is_empty());
        v.set_threshold(2.0).expect("render");
        let next = v.drain_events();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].sequence, 2);
    }

    #[test]
    fn non_finite_threshold_is_rejected() {
        let mut v = view(&FEED);
        assert_eq!(
            v.set_threshold(f64::NAN).unwrap_err().to_string(),
            "FOS display threshold must be finite, got NaN"
        );
        assert!(v.state().is_none());
    }

    #[test]
    fn critical_arc_uses_bucket_color() {
        let v = view(&FEED);
        let arc = v
            .section_traces()
            .iter()
            .find(|t| t.style.fill == section::Fill::ToSelf)
            .expect("arc");
        let ladder = FosColorTable::default_ladder();
        assert_eq!(arc.color.as_deref(), ladder.bucket_color(0.8).ok());
    }

    #[test]
    fn geometry_errors_surface_from_new() {
        let mut bad = input();
        bad.strata[1].depth_to_bottom = f64::INFINITY;
        let err = ChartView::new(
            RecordingSurface::new(),
            &bad,
            feed(&FEED),
            FosColorTable::default_ladder(),
            Viewport::new(1200.0, 800.0),
            RenderConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::Geometry(_)));
    }
}
