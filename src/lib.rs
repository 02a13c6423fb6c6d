//! fiber-vdom - Incremental fiber reconciler for declarative UI trees
//!
//! ## Core Concepts
//!
//! **Render/Commit Split**: Rendering builds a work-in-progress fiber tree one
//! unit at a time and can be paused or cancelled. Commit applies the collected
//! effects to the host document in one uninterruptible pass.
//!
//! **Positional Reconciliation**: Each new child is matched against the child
//! at the same position in the last committed tree. Same type reuses the host
//! node (`Update`); anything else creates a new one (`Placement`) and removes
//! the old one (`Deletion`).
//!
//! ## Modules
//! - `element`: Element descriptions, props, components, listeners
//! - `fiber`: Fiber arena and tree walks
//! - `host`: Host document abstraction and the in-memory document
//! - `root`: Render roots (`create_root`, `Root::render`, ticks)
//! - `scheduler`: Cooperative deadlines
//! - `config`: Reconciler limits
//! - `error`: Error types
//!
//! ## Usage
//!
//! ```
//! use fiber_vdom::prelude::*;
//!
//! let mut doc = MemoryDocument::new();
//! let container = doc.create_container("root");
//! let mut root = create_root::<MemoryDocument>(container);
//!
//! let app = Element::host("div")
//!     .child(Element::host("h1").text("hello"))
//!     .child(Element::host("ul").child(Element::host("li").text("foo")));
//! let stats = root.render(&mut doc, app).unwrap();
//! assert_eq!(stats.placements, 6);
//!
//! assert_eq!(
//!     doc.to_markup(container),
//!     "<root><div><h1>hello</h1><ul><li>foo</li></ul></div></root>"
//! );
//! ```

#[macro_use]
mod macros;

// =============================================================================
// Core modules
// =============================================================================

/// Element descriptions: Element, ElementType, Props, Component
pub mod element;

/// Fiber arena: Fiber, FiberTree, EffectTag
pub mod fiber;

/// Host documents: HostDocument, MemoryDocument
pub mod host;

/// Work loop, child reconciliation, commit
mod reconcile;

/// Render roots
pub mod root;

/// Cooperative scheduling
pub mod scheduler;

/// Reconciler configuration
pub mod config;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Elements
pub use element::{
    create_element, create_text_element, Component, Element, ElementType, Event, Listener,
    PropValue, Props,
};

// Fibers
pub use fiber::{EffectTag, Fiber, FiberId, FiberTree};

// Host
pub use host::{DomOp, HostDocument, MemoryDocument, NodeId};

// Rendering
pub use reconcile::RenderStats;
pub use root::{create_root, Root};

// Scheduling
pub use scheduler::{Deadline, TimeBudget, UnitBudget, Unbounded, WorkStatus};

// Configuration
pub use config::ReconcilerConfig;

// Error types
pub use error::{BoxError, DocumentError, RenderError, RenderResult};
