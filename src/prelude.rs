//! Prelude module for common imports.
//!
//! ```ignore
//! use fiber_vdom::prelude::*;
//! ```

// Elements
pub use crate::element::{
    create_element, create_text_element, Component, Element, ElementType, Event, Listener,
    PropValue, Props, PropsExt,
};

// Rendering
pub use crate::reconcile::RenderStats;
pub use crate::root::{create_root, Root};

// Host
pub use crate::host::{HostDocument, MemoryDocument, NodeId};

// Scheduling
pub use crate::scheduler::{Deadline, TimeBudget, UnitBudget, Unbounded, WorkStatus};

// Config
pub use crate::config::ReconcilerConfig;

// Error
pub use crate::error::{BoxError, RenderError, RenderResult};
