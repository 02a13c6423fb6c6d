//! Reconciler configuration.

/// Default maximum fiber depth before a render is aborted.
const DEFAULT_MAX_DEPTH: usize = 500;

/// Default number of units performed per cooperative slice.
const DEFAULT_SLICE_UNITS: usize = 64;

/// Configuration for reconciler limits and scheduling.
///
/// Use this to tune behavior for specific trees:
/// - Increase `max_depth` for deeply nested generated trees
/// - Decrease `slice_units` to yield to the host more often
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// Maximum fiber depth. A deeper fiber fails the render with
    /// [`RenderError::DepthExceeded`](crate::RenderError::DepthExceeded),
    /// which catches components that render themselves without end.
    /// Default: 500
    pub max_depth: usize,
    /// Units of work performed per [`Root::tick_slice`](crate::Root::tick_slice).
    /// Default: 64
    pub slice_units: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            slice_units: DEFAULT_SLICE_UNITS,
        }
    }
}

impl ReconcilerConfig {
    /// Create config with custom limits.
    pub fn new(max_depth: usize, slice_units: usize) -> Self {
        Self {
            max_depth,
            slice_units: slice_units.max(1),
        }
    }

    /// Create config for large trees (deeper limit, longer slices).
    pub fn large() -> Self {
        Self {
            max_depth: 2000,
            slice_units: 512,
        }
    }

    /// Create config for small trees (shallow limit, short slices).
    pub fn small() -> Self {
        Self {
            max_depth: 100,
            slice_units: 16,
        }
    }
}
