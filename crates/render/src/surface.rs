use crate::layout::Layout;
use crate::trace::Trace;

/// The plotting backend. Calls are synchronous and always succeed from the
/// caller's point of view.
pub trait DrawingSurface {
    fn replace_all(&mut self, traces: Vec<Trace>, layout: &Layout);
    fn append(&mut self, traces: Vec<Trace>);
}

/// Headless surface that keeps whatever was drawn, in draw order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    traces: Vec<Trace>,
    layout: Option<Layout>,
    replace_calls: usize,
    append_calls: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    /// FOS of every candidate trace, bottom-most first.
    pub fn candidate_fos(&self) -> Vec<f64> {
        self.traces.iter().filter_map(|t| t.fos).collect()
    }

    pub fn candidate_count(&self) -> usize {
        self.traces.iter().filter(|t| t.is_candidate()).count()
    }

    pub fn replace_calls(&self) -> usize {
        self.replace_calls
    }

    pub fn append_calls(&self) -> usize {
        self.append_calls
    }
}

impl DrawingSurface for RecordingSurface {
    fn replace_all(&mut self, traces: Vec<Trace>, layout: &Layout) {
        self.traces = traces;
        self.layout = Some(layout.clone());
        self.replace_calls += 1;
    }

    fn append(&mut self, traces: Vec<Trace>) {
        self.traces.extend(traces);
        self.append_calls += 1;
    }
}

impl<S: DrawingSurface + ?Sized> DrawingSurface for &mut S {
    fn replace_all(&mut self, traces: Vec<Trace>, layout: &Layout) {
        (**self).replace_all(traces, layout);
    }

    fn append(&mut self, traces: Vec<Trace>) {
        (**self).append(traces);
    }
}
