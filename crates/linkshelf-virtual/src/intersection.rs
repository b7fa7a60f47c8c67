//! Visibility tracking for rendered elements.
//!
//! `IntersectionWatcher` follows a set of nodes and reports when each one
//! starts or stops intersecting a root rect grown by a vertical margin. Every
//! newly observed node gets one initial report on the next
//! [`take_records`](IntersectionWatcher::take_records); after that only
//! changes are reported.

use linkshelf_core::geometry::Rect;
use linkshelf_core::node::{Node, NodeId, WeakNode};

#[derive(Clone, Debug)]
pub struct IntersectionEntry {
    pub target: Node,
    pub is_intersecting: bool,
    /// Fraction of the target's height inside the margin-grown root.
    pub ratio: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WatcherOptions {
    /// Pixels added above and below the root.
    pub root_margin: f32,
    pub threshold: f32,
}

struct Observed {
    id: NodeId,
    node: WeakNode,
    last: Option<bool>,
}

pub struct IntersectionWatcher {
    options: WatcherOptions,
    observed: Vec<Observed>,
}

impl IntersectionWatcher {
    pub fn new(options: WatcherOptions) -> Self {
        Self {
            options,
            observed: Vec::new(),
        }
    }

    pub fn options(&self) -> WatcherOptions {
        self.options
    }

    pub fn observe(&mut self, node: &Node) {
        if self.is_observing(node) {
            return;
        }
        self.observed.push(Observed {
            id: node.id(),
            node: node.downgrade(),
            last: None,
        });
    }

    pub fn unobserve(&mut self, node: &Node) -> bool {
        let before = self.observed.len();
        self.observed.retain(|o| o.id != node.id());
        self.observed.len() != before
    }

    pub fn is_observing(&self, node: &Node) -> bool {
        self.observed.iter().any(|o| o.id == node.id())
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// Stops watching everything. The watcher stays usable.
    pub fn disconnect(&mut self) {
        self.observed.clear();
    }

    /// Evaluates every observed node against `root` (in the nodes' parent
    /// coordinates) and returns the ones whose state changed, in observation
    /// order. Detached nodes never intersect; dropped nodes are forgotten.
    pub fn take_records(&mut self, root: Rect) -> Vec<IntersectionEntry> {
        let root = root.expand_y(self.options.root_margin);
        let threshold = self.options.threshold;
        let mut records = Vec::new();

        self.observed.retain_mut(|o| {
            let Some(node) = o.node.upgrade() else {
                return false;
            };
            let (is_intersecting, ratio) = if node.is_attached() {
                measure(&node.bounds(), &root, threshold)
            } else {
                (false, 0.0)
            };
            if o.last != Some(is_intersecting) {
                o.last = Some(is_intersecting);
                records.push(IntersectionEntry {
                    target: node,
                    is_intersecting,
                    ratio,
                });
            }
            true
        });
        records
    }
}

fn measure(bounds: &Rect, root: &Rect, threshold: f32) -> (bool, f32) {
    if bounds.h <= 0.0 {
        // A zero-height box intersects when its edge lies inside the root.
        let inside = bounds.y >= root.y && bounds.y <= root.bottom();
        return (inside, if inside { 1.0 } else { 0.0 });
    }
    let overlap = bounds.vertical_overlap(root);
    let ratio = (overlap / bounds.h).clamp(0.0, 1.0);
    (overlap > 0.0 && ratio >= threshold, ratio)
}

impl std::fmt::Debug for IntersectionWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntersectionWatcher")
            .field("options", &self.options)
            .field("observed", &self.observed.len())
            .finish()
    }
}
