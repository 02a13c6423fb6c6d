//! Error types for fiber-vdom.
//!
//! The reconciler defines no error taxonomy of its own beyond carrying the
//! underlying fault out of a render call: a failing component, a failing host
//! document operation, or misuse of the scheduling surface.

use thiserror::Error;

use crate::host::NodeId;

/// Boxed error used for component and host document failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while rendering or committing.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A fallible component returned an error
    #[error("component `{component}` failed to render")]
    Component {
        /// Type name of the component function
        component: &'static str,
        /// Error returned by the component
        #[source]
        source: BoxError,
    },

    /// A host document operation failed
    #[error("host document operation failed: {0}")]
    Document(#[source] BoxError),

    /// A component type reached host node creation; components own no node
    #[error("component `{0}` has no host node")]
    ComponentNode(&'static str),

    /// The fiber tree grew deeper than the configured limit
    #[error("fiber depth {depth} exceeds limit {limit}")]
    DepthExceeded {
        /// Depth of the offending fiber
        depth: usize,
        /// Configured maximum depth
        limit: usize,
    },

    /// `commit` was called with nothing scheduled
    #[error("no render in progress")]
    NoWorkInProgress,

    /// `commit` was called before the work loop finished
    #[error("render has pending units of work")]
    WorkPending,
}

/// Result type alias for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

impl RenderError {
    /// Wrap a host document error.
    pub fn document(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Document(Box::new(err))
    }

    /// Check if this error came from a component.
    pub fn is_component(&self) -> bool {
        matches!(self, Self::Component { .. })
    }
}

/// Errors raised by [`MemoryDocument`](crate::host::MemoryDocument).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The node handle does not belong to this document
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    /// `remove_child` was given a node that is not a child of `parent`
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Parent node passed to the operation
        parent: NodeId,
        /// Child node passed to the operation
        child: NodeId,
    },

    /// Text nodes cannot have children
    #[error("text node {0:?} cannot have children")]
    TextNodeParent(NodeId),
}

/// Result type alias for [`MemoryDocument`](crate::host::MemoryDocument) operations.
pub type DocumentResult<T> = Result<T, DocumentError>;
