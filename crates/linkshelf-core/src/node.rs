//! # Element tree
//!
//! A small retained tree that stands in for the host's document. A [`Node`]
//! is a cheap, cloneable handle; clones refer to the same element. Children
//! are owned by their parent, the parent link is weak.
//!
//! ```rust
//! use linkshelf_core::node::Node;
//!
//! let list = Node::new("div");
//! let card = Node::new("article").with_class("card");
//! list.append_child(&card).unwrap();
//!
//! assert_eq!(list.child_count(), 1);
//! assert_eq!(list.query_class("card").len(), 1);
//! assert!(card.remove());
//! assert!(card.parent().is_none());
//! ```

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::error::HostError;
use crate::geometry::Rect;

thread_local! {
    static NEXT_NODE_ID: Cell<u64> = const { Cell::new(1) };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionType {
    Relative,
    Absolute,
}

/// The subset of layout style the list renderer reads and writes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    pub position_type: Option<PositionType>,
    pub offset_top: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    /// Stretch to the parent's full width.
    pub fill_max_w: bool,
}

#[derive(Clone)]
pub struct Node(Rc<NodeInner>);

#[derive(Clone, Default)]
pub struct WeakNode(Weak<NodeInner>);

struct NodeInner {
    id: NodeId,
    tag: String,
    data: RefCell<NodeData>,
}

#[derive(Default)]
struct NodeData {
    attributes: BTreeMap<String, String>,
    classes: SmallVec<[String; 4]>,
    style: Style,
    text: Option<String>,
    children: Vec<Node>,
    parent: WeakNode,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        let id = NEXT_NODE_ID.with(|n| {
            let id = n.get();
            n.set(id + 1);
            NodeId(id)
        });
        Node(Rc::new(NodeInner {
            id,
            tag: tag.into(),
            data: RefCell::new(NodeData::default()),
        }))
    }

    pub fn id(&self) -> NodeId {
        self.0.id
    }

    pub fn tag(&self) -> &str {
        &self.0.tag
    }

    pub fn downgrade(&self) -> WeakNode {
        WeakNode(Rc::downgrade(&self.0))
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // Attributes

    pub fn attr(&self, name: &str) -> Option<String> {
        self.0.data.borrow().attributes.get(name).cloned()
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.0.data.borrow().attributes.contains_key(name)
    }

    pub fn set_attr(&self, name: impl Into<String>, value: impl Into<String>) {
        self.0
            .data
            .borrow_mut()
            .attributes
            .insert(name.into(), value.into());
    }

    pub fn remove_attr(&self, name: &str) -> Option<String> {
        self.0.data.borrow_mut().attributes.remove(name)
    }

    pub fn with_attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    // Classes

    pub fn has_class(&self, class: &str) -> bool {
        self.0.data.borrow().classes.iter().any(|c| c == class)
    }

    pub fn add_class(&self, class: impl Into<String>) {
        let class = class.into();
        let mut data = self.0.data.borrow_mut();
        if !data.classes.iter().any(|c| *c == class) {
            data.classes.push(class);
        }
    }

    pub fn remove_class(&self, class: &str) -> bool {
        let mut data = self.0.data.borrow_mut();
        let before = data.classes.len();
        data.classes.retain(|c| c != class);
        data.classes.len() != before
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.data.borrow().classes.to_vec()
    }

    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    // Style and text

    pub fn style(&self) -> Style {
        self.0.data.borrow().style.clone()
    }

    pub fn update_style(&self, f: impl FnOnce(&mut Style)) {
        f(&mut self.0.data.borrow_mut().style);
    }

    /// Layout box in the parent's coordinates, derived from `offset_top` and
    /// `height`. Unset values count as zero.
    pub fn bounds(&self) -> Rect {
        let data = self.0.data.borrow();
        let s = &data.style;
        Rect {
            x: 0.0,
            y: s.offset_top.unwrap_or(0.0),
            w: s.width.unwrap_or(0.0),
            h: s.height.unwrap_or(0.0),
        }
    }

    pub fn text(&self) -> Option<String> {
        self.0.data.borrow().text.clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.0.data.borrow_mut().text = Some(text.into());
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    // Tree

    pub fn parent(&self) -> Option<Node> {
        self.0.data.borrow().parent.upgrade()
    }

    pub fn is_attached(&self) -> bool {
        self.parent().is_some()
    }

    pub fn children(&self) -> Vec<Node> {
        self.0.data.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.data.borrow().children.len()
    }

    /// True if `other` is this node or one of its descendants.
    pub fn contains(&self, other: &Node) -> bool {
        let mut cur = Some(other.clone());
        while let Some(n) = cur {
            if n.ptr_eq(self) {
                return true;
            }
            cur = n.parent();
        }
        false
    }

    /// Appends `child` as the last child, moving it out of its current
    /// parent first.
    pub fn append_child(&self, child: &Node) -> Result<(), HostError> {
        if child.contains(self) {
            return Err(HostError::HierarchyCycle {
                parent: self.id(),
                child: child.id(),
            });
        }
        child.remove();
        self.0.data.borrow_mut().children.push(child.clone());
        child.0.data.borrow_mut().parent = self.downgrade();
        Ok(())
    }

    pub fn with_child(self, child: Node) -> Self {
        if let Err(err) = self.append_child(&child) {
            log::warn!("with_child: {err}");
        }
        self
    }

    pub fn remove_child(&self, child: &Node) -> Result<(), HostError> {
        let removed = {
            let mut data = self.0.data.borrow_mut();
            let pos = data.children.iter().position(|c| c.ptr_eq(child));
            pos.map(|i| data.children.remove(i))
        };
        match removed {
            Some(child) => {
                child.0.data.borrow_mut().parent = WeakNode::default();
                Ok(())
            }
            None => Err(HostError::NotAChild {
                parent: self.id(),
                child: child.id(),
            }),
        }
    }

    /// Detaches this node from its parent. Returns `false` if it had none.
    pub fn remove(&self) -> bool {
        match self.parent() {
            Some(parent) => parent.remove_child(self).is_ok(),
            None => false,
        }
    }

    pub fn clear_children(&self) {
        let children = std::mem::take(&mut self.0.data.borrow_mut().children);
        for child in children {
            child.0.data.borrow_mut().parent = WeakNode::default();
        }
    }

    /// Every node in this subtree (this node included) carrying `class`, in
    /// document order.
    pub fn query_class(&self, class: &str) -> Vec<Node> {
        let mut found = Vec::new();
        let mut stack = vec![self.clone()];
        while let Some(n) = stack.pop() {
            if n.has_class(class) {
                found.push(n.clone());
            }
            stack.extend(n.children().into_iter().rev());
        }
        found
    }

    /// Indented one-line-per-node dump of the subtree, for debugging and
    /// snapshot tests.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, 0);
        out
    }

    fn write_outline(&self, out: &mut String, depth: usize) {
        use std::fmt::Write;

        let data = self.0.data.borrow();
        let _ = write!(out, "{}{}", "  ".repeat(depth), self.tag());
        if let Some(top) = data.style.offset_top {
            let _ = write!(out, " top={top}");
        }
        if let Some(h) = data.style.height {
            let _ = write!(out, " h={h}");
        }
        for (k, v) in &data.attributes {
            let _ = write!(out, " {k}={v:?}");
        }
        for c in &data.classes {
            let _ = write!(out, " .{c}");
        }
        if let Some(text) = &data.text {
            let _ = write!(out, " {text:?}");
        }
        out.push('\n');
        for child in &data.children {
            child.write_outline(out, depth + 1);
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id())
            .field("tag", &self.tag())
            .field("children", &self.child_count())
            .finish()
    }
}

impl WeakNode {
    pub fn upgrade(&self) -> Option<Node> {
        self.0.upgrade().map(Node)
    }
}

impl fmt::Debug for WeakNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(n) => write!(f, "WeakNode({})", n.id()),
            None => write!(f, "WeakNode(<dropped>)"),
        }
    }
}
