use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

pub const DEFAULT_MAX_DEPTH: usize = 100;
pub const DEFAULT_MAX_ARGUMENTS: usize = 255;

/// Cooperative cancellation flag shared between a caller and a running pipeline.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Parser limits and hooks.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub max_depth: usize,
    pub max_arguments: usize,
    pub abort: Option<AbortSignal>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_arguments: DEFAULT_MAX_ARGUMENTS,
            abort: None,
        }
    }
}

impl ParseOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_arguments(mut self, max_arguments: usize) -> Self {
        self.max_arguments = max_arguments;
        self
    }

    pub fn with_abort(mut self, abort: AbortSignal) -> Self {
        self.abort = Some(abort);
        self
    }

    pub(crate) fn is_aborted(&self) -> bool {
        self.abort.as_ref().is_some_and(AbortSignal::is_aborted)
    }
}
