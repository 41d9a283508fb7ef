use super::*;

use std::collections::HashMap;

/// Internal node: routes every tuple operation on its first key and
/// delegates the remainder to a child one arity below.
///
/// Children are created lazily. The parent link carries count deltas
/// upward; it is severed when the subtree is detached, after which
/// changes below no longer reach the old ancestors.
#[derive(Debug)]
pub(crate) struct Branch<K, V> {
    pub(crate) arity: Arity,
    pub(crate) children: Counted<HashMap<K, NodeRef<K, V>>>,
    pub(crate) parent: ParentLink<K, V>,
}

impl<K, V> Branch<K, V> {
    pub(crate) fn new(arity: Arity, parent: ParentLink<K, V>) -> Self {
        Branch {
            arity,
            children: Counted::new(HashMap::new()),
            parent,
        }
    }
}

fn check_tuple(expected: usize, actual: usize) -> Result<(), CurryError> {
    if actual != expected {
        return Err(CurryError::ArityMismatch { expected, actual });
    }
    Ok(())
}

fn check_prefix(arity: usize, actual: usize) -> Result<(), CurryError> {
    if actual > arity {
        return Err(CurryError::ArityMismatch {
            expected: arity,
            actual,
        });
    }
    Ok(())
}

/// Builds the node chain for a previously-absent path: branches of
/// decreasing arity ending in the leaf that holds `value`. An arity of
/// `None` resolves the remaining path directly into a leaf.
fn materialize<K, V>(
    parent: ParentLink<K, V>,
    arity: Option<Arity>,
    value: V,
    keys: &[K],
) -> NodeRef<K, V>
where
    K: Eq + Hash + Clone,
{
    let Some(arity) = arity else {
        debug_assert!(keys.is_empty());
        return Arc::new(Mutex::new(Node::Leaf(Leaf::new(value))));
    };
    let [first, rest @ ..] = keys else {
        unreachable!("a branch arity is always positive");
    };
    let node = Arc::new(Mutex::new(Node::Branch(Branch::new(arity, parent))));
    let child = materialize(Arc::downgrade(&node), arity.child(), value, rest);
    {
        let mut guard = lock(&node);
        let Node::Branch(branch) = &mut *guard else {
            unreachable!("just constructed as a branch");
        };
        branch.children.run(|children| {
            children.insert(first.clone(), child);
            ((), 1)
        });
    }
    node
}

/// Recursive insertion. Returns whether the value was inserted and the
/// number of leaves created, for count propagation.
///
/// A full path that already resolves to a leaf is left untouched and
/// reported as not inserted; `update` is the overwrite path.
pub(crate) fn add_at<K, V>(
    node: &NodeRef<K, V>,
    value: V,
    keys: &[K],
) -> Result<(bool, i64), CurryError>
where
    K: Eq + Hash + Clone,
{
    let mut guard = lock(node);
    match &mut *guard {
        Node::Leaf(_) => {
            check_tuple(0, keys.len())?;
            Ok((false, 0))
        }
        Node::Branch(branch) => {
            check_tuple(branch.arity.get(), keys.len())?;
            let [first, rest @ ..] = keys else {
                unreachable!("tuple length was checked against a positive arity");
            };
            if let Some(child) = branch.children.get().get(first).cloned() {
                let (inserted, delta) = add_at(&child, value, rest)?;
                if delta != 0 {
                    branch.children.bump(delta);
                }
                Ok((inserted, delta))
            } else {
                let child = materialize(Arc::downgrade(node), branch.arity.child(), value, rest);
                let (_, delta) = branch.children.run(|children| {
                    children.insert(first.clone(), child);
                    ((), 1)
                });
                Ok((true, delta))
            }
        }
    }
}

/// Overwrites the value at an existing path. Absent paths are left
/// untouched and reported as `false`. Counts never change.
pub(crate) fn update_at<K, V>(node: &NodeRef<K, V>, value: V, keys: &[K]) -> Result<bool, CurryError>
where
    K: Eq + Hash + Clone,
{
    let mut guard = lock(node);
    match &mut *guard {
        Node::Leaf(leaf) => {
            check_tuple(0, keys.len())?;
            leaf.value = value;
            Ok(true)
        }
        Node::Branch(branch) => {
            check_tuple(branch.arity.get(), keys.len())?;
            let [first, rest @ ..] = keys else {
                unreachable!("tuple length was checked against a positive arity");
            };
            match branch.children.get().get(first).cloned() {
                Some(child) => update_at(&child, value, rest),
                None => Ok(false),
            }
        }
    }
}

pub(crate) fn get_at<K, V>(node: &NodeRef<K, V>, keys: &[K], depth: usize) -> Result<V, CurryError>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    let guard = lock(node);
    match &*guard {
        Node::Leaf(leaf) => {
            check_tuple(0, keys.len())?;
            Ok(leaf.value.clone())
        }
        Node::Branch(branch) => {
            check_tuple(branch.arity.get(), keys.len())?;
            let [first, rest @ ..] = keys else {
                unreachable!("tuple length was checked against a positive arity");
            };
            match branch.children.get().get(first).cloned() {
                Some(child) => get_at(&child, rest, depth + 1),
                None => Err(CurryError::KeyNotFound { depth }),
            }
        }
    }
}

pub(crate) fn contains_at<K, V>(node: &NodeRef<K, V>, keys: &[K]) -> Result<bool, CurryError>
where
    K: Eq + Hash + Clone,
{
    let guard = lock(node);
    match &*guard {
        Node::Leaf(_) => {
            check_tuple(0, keys.len())?;
            Ok(true)
        }
        Node::Branch(branch) => {
            check_tuple(branch.arity.get(), keys.len())?;
            let [first, rest @ ..] = keys else {
                unreachable!("tuple length was checked against a positive arity");
            };
            match branch.children.get().get(first).cloned() {
                Some(child) => contains_at(&child, rest),
                None => Ok(false),
            }
        }
    }
}

/// Prefix containment. An empty prefix is trivially contained, even in
/// an empty dictionary; a prefix longer than the arity is malformed.
pub(crate) fn contains_prefix_at<K, V>(
    node: &NodeRef<K, V>,
    prefix: &[K],
) -> Result<bool, CurryError>
where
    K: Eq + Hash + Clone,
{
    let guard = lock(node);
    match &*guard {
        Node::Leaf(_) => {
            check_prefix(0, prefix.len())?;
            Ok(true)
        }
        Node::Branch(branch) => {
            check_prefix(branch.arity.get(), prefix.len())?;
            let [first, rest @ ..] = prefix else {
                return Ok(true);
            };
            match branch.children.get().get(first).cloned() {
                Some(child) => contains_prefix_at(&child, rest),
                None => Ok(false),
            }
        }
    }
}

/// Resolves the node reached by fixing `prefix` as the leading keys.
pub(crate) fn curried_at<K, V>(
    node: &NodeRef<K, V>,
    prefix: &[K],
    depth: usize,
) -> Result<NodeRef<K, V>, CurryError>
where
    K: Eq + Hash + Clone,
{
    let [first, rest @ ..] = prefix else {
        return Ok(node.clone());
    };
    let guard = lock(node);
    match &*guard {
        Node::Leaf(_) => Err(CurryError::ArityMismatch {
            expected: 0,
            actual: prefix.len(),
        }),
        Node::Branch(branch) => {
            check_prefix(branch.arity.get(), prefix.len())?;
            match branch.children.get().get(first).cloned() {
                Some(child) => curried_at(&child, rest, depth + 1),
                None => Err(CurryError::KeyNotFound { depth }),
            }
        }
    }
}

/// Recursive removal of the subtree addressed by a non-empty prefix.
/// Returns the number of leaves removed; an absent key removes nothing.
pub(crate) fn remove_at<K, V>(node: &NodeRef<K, V>, prefix: &[K]) -> Result<u64, CurryError>
where
    K: Eq + Hash + Clone,
{
    let mut guard = lock(node);
    match &mut *guard {
        Node::Leaf(_) => Err(CurryError::ArityMismatch {
            expected: 0,
            actual: prefix.len(),
        }),
        Node::Branch(branch) => {
            check_prefix(branch.arity.get(), prefix.len())?;
            let [first, rest @ ..] = prefix else {
                unreachable!("empty prefixes are handled by the caller");
            };
            let Some(child) = branch.children.get().get(first).cloned() else {
                return Ok(0);
            };
            if rest.is_empty() {
                let removed = detach(&child);
                branch.children.run(|children| {
                    children.remove(first);
                    ((), -(removed as i64))
                });
                Ok(removed)
            } else {
                let removed = remove_at(&child, rest)?;
                if removed != 0 {
                    branch.children.bump(-(removed as i64));
                }
                Ok(removed)
            }
        }
    }
}

/// Severs a subtree's parent link and reports how many leaves it held.
fn detach<K, V>(node: &NodeRef<K, V>) -> u64 {
    let mut guard = lock(node);
    match &mut *guard {
        Node::Leaf(_) => 1,
        Node::Branch(branch) => {
            branch.parent = Weak::new();
            branch.children.count().get()
        }
    }
}

/// Re-raises a count delta to every ancestor of `node`, nearest first.
/// Must be called without holding any node lock.
pub(crate) fn notify_ancestors<K, V>(node: &NodeRef<K, V>, delta: i64) {
    let mut parent = {
        let guard = lock(node);
        match &*guard {
            Node::Branch(branch) => branch.parent.clone(),
            Node::Leaf(_) => Weak::new(),
        }
    };
    while let Some(ancestor) = parent.upgrade() {
        let mut guard = lock(&ancestor);
        let Node::Branch(branch) = &mut *guard else {
            unreachable!("leaves cannot be parents");
        };
        branch.children.bump(delta);
        parent = branch.parent.clone();
    }
}

/// Child handles of a branch, or `None` when the node is a leaf.
pub(crate) fn child_snapshot<K, V>(node: &NodeRef<K, V>) -> Option<Vec<(K, NodeRef<K, V>)>>
where
    K: Clone,
{
    let guard = lock(node);
    match &*guard {
        Node::Leaf(_) => None,
        Node::Branch(branch) => Some(
            branch
                .children
                .get()
                .iter()
                .map(|(key, child)| (key.clone(), child.clone()))
                .collect(),
        ),
    }
}

pub(crate) fn leaf_value<K, V>(node: &NodeRef<K, V>) -> V
where
    V: Clone,
{
    let guard = lock(node);
    match &*guard {
        Node::Leaf(leaf) => leaf.value.clone(),
        Node::Branch(_) => unreachable!("value lookups end at leaves"),
    }
}

pub(crate) fn node_count<K, V>(node: &NodeRef<K, V>) -> u64 {
    let guard = lock(node);
    match &*guard {
        Node::Leaf(_) => 1,
        Node::Branch(branch) => branch.children.count().get(),
    }
}

/// Recomputes the leaf count below `node` by traversal and checks it
/// against every cached branch count on the way. Returns the recomputed
/// count, or `None` at the first stale cache.
#[cfg(debug_assertions)]
pub(crate) fn verify_counts_at<K, V>(node: &NodeRef<K, V>) -> Option<u64> {
    let guard = lock(node);
    match &*guard {
        Node::Leaf(_) => Some(1),
        Node::Branch(branch) => {
            let mut total = 0;
            for child in branch.children.get().values() {
                total += verify_counts_at(child)?;
            }
            (total == branch.children.count().get()).then_some(total)
        }
    }
}
