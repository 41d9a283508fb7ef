use super::*;

/// Terminal node: holds exactly one value and always counts as one leaf.
#[derive(Debug)]
pub(crate) struct Leaf<V> {
    pub(crate) value: V,
}

impl<V> Leaf<V> {
    pub(crate) fn new(value: V) -> Self {
        Leaf { value }
    }
}
