//! Fiber tree: the retained, mutable render tree.
//!
//! Fibers live in a [`FiberTree`] arena and refer to each other through
//! [`FiberId`] handles. A fiber links to its parent, its first child, its
//! next sibling, and its `alternate` (the fiber at the same position in the
//! last committed tree). Storing handles instead of references lets the
//! current and work-in-progress trees point at each other without ownership
//! cycles.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::rc::Rc;

use rustc_hash::FxHashSet;
use slotmap::SlotMap;

use crate::element::{Component, Element, ElementType, Props};

slotmap::new_key_type! {
    /// Handle to a fiber in a [`FiberTree`].
    pub struct FiberId;
}

// =============================================================================
// EffectTag
// =============================================================================

/// What the commit phase must do for a fiber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectTag {
    /// Newly created; append its node to the host parent
    Placement,
    /// Matched an old fiber; diff props onto the reused node
    Update,
    /// Old fiber without counterpart; remove its node(s)
    Deletion,
}

// =============================================================================
// Fiber
// =============================================================================

/// One unit of work and one node of the retained tree.
pub struct Fiber<N> {
    /// Element type; `None` only for the root record
    pub ty: Option<ElementType>,
    /// Props for this render
    pub props: Rc<Props>,
    /// Owned host node; always `None` for components
    pub dom: Option<N>,
    /// Parent fiber
    pub parent: Option<FiberId>,
    /// First child
    pub child: Option<FiberId>,
    /// Next sibling
    pub sibling: Option<FiberId>,
    /// Same position in the last committed tree
    pub alternate: Option<FiberId>,
    /// Pending effect, consumed by commit
    pub effect: Option<EffectTag>,
    /// Distance from the root record
    pub depth: usize,
}

impl<N> Fiber<N> {
    /// Root record for a container, rendering `element` as its only child.
    pub fn root(container: N, element: Element, alternate: Option<FiberId>) -> Self {
        let mut props = Props::new();
        props.children.push(element);
        Self {
            ty: None,
            props: Rc::new(props),
            dom: Some(container),
            parent: None,
            child: None,
            sibling: None,
            alternate,
            effect: None,
            depth: 0,
        }
    }

    /// New child fiber of `parent` for `element`.
    pub fn for_element(element: &Element, parent: FiberId, depth: usize) -> Self {
        Self {
            ty: Some(element.ty.clone()),
            props: element.props.clone(),
            dom: None,
            parent: Some(parent),
            child: None,
            sibling: None,
            alternate: None,
            effect: None,
            depth,
        }
    }

    /// Check if this is the root record.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.ty.is_none()
    }

    /// Component, if this is a component fiber.
    #[inline]
    pub fn component(&self) -> Option<&Component> {
        self.ty.as_ref().and_then(ElementType::as_component)
    }

    /// Display name of the fiber type.
    pub fn name(&self) -> &str {
        self.ty.as_ref().map(ElementType::name).unwrap_or("#root")
    }
}

impl<N: fmt::Debug> fmt::Debug for Fiber<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fiber")
            .field("ty", &self.name())
            .field("dom", &self.dom)
            .field("parent", &self.parent)
            .field("child", &self.child)
            .field("sibling", &self.sibling)
            .field("alternate", &self.alternate)
            .field("effect", &self.effect)
            .finish()
    }
}

// =============================================================================
// FiberTree
// =============================================================================

/// Arena holding the current and work-in-progress fibers.
pub struct FiberTree<N> {
    fibers: SlotMap<FiberId, Fiber<N>>,
}

impl<N> Default for FiberTree<N> {
    fn default() -> Self {
        Self {
            fibers: SlotMap::with_key(),
        }
    }
}

impl<N> FiberTree<N> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fiber.
    pub fn insert(&mut self, fiber: Fiber<N>) -> FiberId {
        self.fibers.insert(fiber)
    }

    /// Get a fiber.
    pub fn get(&self, id: FiberId) -> Option<&Fiber<N>> {
        self.fibers.get(id)
    }

    /// Get a fiber mutably.
    pub fn get_mut(&mut self, id: FiberId) -> Option<&mut Fiber<N>> {
        self.fibers.get_mut(id)
    }

    /// Check if a fiber is alive.
    pub fn contains(&self, id: FiberId) -> bool {
        self.fibers.contains_key(id)
    }

    /// Number of live fibers.
    pub fn len(&self) -> usize {
        self.fibers.len()
    }

    /// Check if the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.fibers.is_empty()
    }

    /// Iterate over the children of a fiber.
    pub fn children(&self, id: FiberId) -> Children<'_, N> {
        Children {
            tree: self,
            next: self.get(id).and_then(|f| f.child),
        }
    }

    /// Pre-order successor of `id` that stays inside the subtree of `boundary`.
    ///
    /// First child, else the nearest sibling found walking up the parent
    /// chain. Reaching `boundary` ends the walk.
    pub fn next_in_subtree(&self, id: FiberId, boundary: FiberId) -> Option<FiberId> {
        if let Some(child) = self[id].child {
            return Some(child);
        }
        let mut current = id;
        while current != boundary {
            let fiber = &self[current];
            if let Some(sibling) = fiber.sibling {
                return Some(sibling);
            }
            current = fiber.parent?;
        }
        None
    }

    /// Iterate over the subtree rooted at `root` in pre-order, root first.
    pub fn descendants(&self, root: FiberId) -> Descendants<'_, N> {
        Descendants {
            tree: self,
            root,
            next: self.contains(root).then_some(root),
        }
    }

    /// Nearest ancestor of `id` that owns a host node.
    pub fn host_parent(&self, id: FiberId) -> Option<&N> {
        let mut current = self.get(id)?.parent;
        while let Some(parent) = current {
            let fiber = self.get(parent)?;
            if let Some(dom) = &fiber.dom {
                return Some(dom);
            }
            current = fiber.parent;
        }
        None
    }

    /// Topmost host nodes below `id`: the nodes a removal from the host
    /// parent has to detach. Component fibers are looked through.
    pub fn top_host_nodes(&self, id: FiberId) -> Vec<N>
    where
        N: Clone,
    {
        let mut out = Vec::new();
        let mut stack: Vec<FiberId> = self.children(id).collect();
        stack.reverse();
        while let Some(current) = stack.pop() {
            match &self[current].dom {
                Some(dom) => out.push(dom.clone()),
                None => {
                    let start = stack.len();
                    stack.extend(self.children(current));
                    stack[start..].reverse();
                }
            }
        }
        out
    }

    /// Host nodes created for the subtree under `root` rather than reused
    /// from an alternate.
    pub fn created_nodes(&self, root: FiberId) -> Vec<N>
    where
        N: Clone,
    {
        self.descendants(root)
            .skip(1)
            .filter(|&id| self[id].alternate.is_none())
            .filter_map(|id| self[id].dom.clone())
            .collect()
    }

    /// Drop every fiber outside the tree rooted at `root`, and clear the
    /// `alternate` links of the fibers that remain.
    ///
    /// Returns the number of fibers removed.
    pub fn retain_tree(&mut self, root: FiberId) -> usize {
        let live: FxHashSet<FiberId> = self.descendants(root).collect();
        let before = self.fibers.len();
        self.fibers.retain(|id, fiber| {
            fiber.alternate = None;
            live.contains(&id)
        });
        before - self.fibers.len()
    }

    /// Drop every fiber.
    pub fn clear(&mut self) {
        self.fibers.clear();
    }
}

impl<N> Index<FiberId> for FiberTree<N> {
    type Output = Fiber<N>;

    fn index(&self, id: FiberId) -> &Fiber<N> {
        &self.fibers[id]
    }
}

impl<N> IndexMut<FiberId> for FiberTree<N> {
    fn index_mut(&mut self, id: FiberId) -> &mut Fiber<N> {
        &mut self.fibers[id]
    }
}

impl<N: fmt::Debug> fmt::Debug for FiberTree<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.fibers.iter()).finish()
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over a fiber's child chain.
pub struct Children<'a, N> {
    tree: &'a FiberTree<N>,
    next: Option<FiberId>,
}

impl<N> Iterator for Children<'_, N> {
    type Item = FiberId;

    fn next(&mut self) -> Option<FiberId> {
        let id = self.next?;
        self.next = self.tree.get(id).and_then(|f| f.sibling);
        Some(id)
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a, N> {
    tree: &'a FiberTree<N>,
    root: FiberId,
    next: Option<FiberId>,
}

impl<N> Iterator for Descendants<'_, N> {
    type Item = FiberId;

    fn next(&mut self) -> Option<FiberId> {
        let id = self.next?;
        self.next = self.tree.next_in_subtree(id, self.root);
        Some(id)
    }
}

// =============================================================================
// Tests
// =============================================================================
