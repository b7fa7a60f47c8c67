use std::fmt::Debug;
use std::hash::Hash;

/// An entry the list can window. Ids must be stable across `set_items`
/// calls and unique within one sequence.
pub trait ListItem {
    type Id: Eq + Hash + Clone + Debug;

    fn id(&self) -> Self::Id;
}
