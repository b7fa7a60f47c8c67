use thiserror::Error;

use crate::node::NodeId;

/// Tree mutations the element tree refuses to perform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("cannot append node {child} into its own subtree (parent {parent})")]
    HierarchyCycle { parent: NodeId, child: NodeId },
    #[error("node {child} is not a child of node {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
}
