//! A recursive, arity-parameterized, multi-key dictionary.
//!
//! A [`CurryDict`] stores values addressed by a fixed-length tuple of
//! keys. Every multi-key operation is a descent that consumes one key
//! per level until a leaf is reached. Fixing a prefix of the tuple
//! ("currying", by analogy with function currying) yields a lower-arity
//! dictionary backed by the same subtree: mutations through the curried
//! handle are visible through the original, including the cached leaf
//! counts of every ancestor.
//!
//! The tree is a sum type with exactly two node variants. Branches own a
//! mapping from a single key to a child node of arity one less than
//! their own; leaves hold one value. Each branch caches the number of
//! leaves reachable beneath it, maintained by delta propagation along an
//! explicit parent chain rather than recomputed by traversal.

mod branch;
mod leaf;

use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::counted::Counted;
use crate::num::{Arity, InvalidArity};

use branch::*;
use leaf::*;

/// Errors surfaced by tuple and prefix operations.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CurryError {
    /// The request's key count does not fit the arity of the dictionary
    /// it was addressed to: full-tuple operations require exactly
    /// `expected` keys, prefix operations at most that many.
    ArityMismatch { expected: usize, actual: usize },
    /// Routing failed: no child exists for the key at position `depth`
    /// of the presented tuple.
    KeyNotFound { depth: usize },
}

impl fmt::Display for CurryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurryError::ArityMismatch { expected, actual } => {
                write!(
                    f,
                    "arity mismatch: dictionary of arity {} was given {} keys",
                    expected, actual
                )
            }
            CurryError::KeyNotFound { depth } => {
                write!(f, "no entry for the key at depth {}", depth)
            }
        }
    }
}

impl std::error::Error for CurryError {}

#[derive(Debug)]
pub(crate) enum Node<K, V> {
    Branch(Branch<K, V>),
    Leaf(Leaf<V>),
}

pub(crate) type NodeRef<K, V> = Arc<Mutex<Node<K, V>>>;
pub(crate) type ParentLink<K, V> = Weak<Mutex<Node<K, V>>>;

/// A panic while a node lock was held may have broken the count
/// invariant, so a poisoned node is not recoverable.
pub(crate) fn lock<K, V>(node: &NodeRef<K, V>) -> MutexGuard<'_, Node<K, V>> {
    match node.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("dictionary node poisoned by an earlier panic"),
    }
}

/// A dictionary addressing values by fixed-length key tuples.
///
/// `CurryDict` is a handle onto a shared tree. [`CurryDict::curried`]
/// returns a handle onto an interior node, and [`Clone`] aliases the
/// same tree, so two handles may observe each other's mutations. The
/// root handle always has positive arity; curried handles may reach
/// arity 0, at which point the empty tuple addresses the single value.
pub struct CurryDict<K, V> {
    node: NodeRef<K, V>,
    arity: usize,
}

impl<K, V> Clone for CurryDict<K, V> {
    fn clone(&self) -> Self {
        CurryDict {
            node: self.node.clone(),
            arity: self.arity,
        }
    }
}

impl<K, V> CurryDict<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty dictionary addressed by `arity` keys.
    /// Fails for an arity of zero.
    pub fn new(arity: usize) -> Result<Self, InvalidArity> {
        let arity = Arity::new(arity)?;
        let node = Arc::new(Mutex::new(Node::Branch(Branch::new(arity, Weak::new()))));
        Ok(CurryDict {
            node,
            arity: arity.get(),
        })
    }

    /// The number of keys required to address a value through this
    /// handle.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// The number of values stored, served from the cached count.
    pub fn len(&self) -> u64 {
        node_count(&self.node)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts `value` at the full-length key tuple `keys`, creating the
    /// missing path lazily. Returns whether the value was inserted; a
    /// tuple whose path already resolves to a leaf is left untouched and
    /// reported as `false` ([`CurryDict::update`] is the overwrite
    /// path).
    pub fn add(&self, value: V, keys: &[K]) -> Result<bool, CurryError> {
        let (inserted, delta) = add_at(&self.node, value, keys)?;
        if delta != 0 {
            notify_ancestors(&self.node, delta);
        }
        Ok(inserted)
    }

    /// Overwrites the value at an existing full-length key tuple.
    /// Returns `false` without inserting when the tuple is absent.
    pub fn update(&self, value: V, keys: &[K]) -> Result<bool, CurryError> {
        update_at(&self.node, value, keys)
    }

    /// Looks up the value at a full-length key tuple.
    pub fn get(&self, keys: &[K]) -> Result<V, CurryError>
    where
        V: Clone,
    {
        get_at(&self.node, keys, 0)
    }

    /// Whether the full-length key tuple resolves to a value.
    pub fn contains_key_tuple(&self, keys: &[K]) -> Result<bool, CurryError> {
        contains_at(&self.node, keys)
    }

    /// Whether at least one stored tuple starts with `prefix`. The empty
    /// prefix is trivially contained, even in an empty dictionary. This
    /// is the primitive that tests curry-ability.
    pub fn contains_prefix(&self, prefix: &[K]) -> Result<bool, CurryError> {
        contains_prefix_at(&self.node, prefix)
    }

    /// Fixes `prefix` as the leading keys and returns the dictionary of
    /// arity `arity - prefix.len()` addressed by the remaining keys.
    ///
    /// The returned handle is backed by the same subtree: mutations
    /// through it are reflected in this dictionary, counts included. An
    /// empty prefix returns an aliasing handle onto this dictionary.
    pub fn curried(&self, prefix: &[K]) -> Result<CurryDict<K, V>, CurryError> {
        let node = curried_at(&self.node, prefix, 0)?;
        Ok(CurryDict {
            node,
            arity: self.arity - prefix.len(),
        })
    }

    /// Removes the entire subtree addressed by `prefix` and returns the
    /// number of values it held.
    ///
    /// An empty prefix is a no-op returning 0, as is an absent prefix.
    /// A prefix longer than the arity is malformed and rejected.
    pub fn remove(&self, prefix: &[K]) -> Result<u64, CurryError> {
        if prefix.is_empty() {
            return Ok(0);
        }
        let removed = remove_at(&self.node, prefix)?;
        if removed != 0 {
            notify_ancestors(&self.node, -(removed as i64));
        }
        Ok(removed)
    }

    /// Iterates over all stored full-length key tuples, one per value,
    /// in no particular order. Each produced tuple is freshly allocated.
    pub fn keys(&self) -> Keys<K, V> {
        Keys(Walker::new(&self.node))
    }

    /// Iterates over `(key tuple, value)` pairs, in no particular order.
    pub fn entries(&self) -> Entries<K, V>
    where
        V: Clone,
    {
        Entries(Walker::new(&self.node))
    }

    /// Recomputes leaf counts by traversal and checks every cached
    /// branch count against them.
    #[cfg(debug_assertions)]
    pub fn debug_verify_counts(&self) -> bool {
        verify_counts_at(&self.node).is_some()
    }
}

impl<K, V> fmt::Debug for CurryDict<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurryDict")
            .field("arity", &self.arity)
            .field("len", &self.len())
            .finish()
    }
}

impl<'a, K, V> IntoIterator for &'a CurryDict<K, V>
where
    K: Eq + Hash + Clone,
{
    type Item = Vec<K>;
    type IntoIter = Keys<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys()
    }
}

struct Frame<K, V> {
    children: std::vec::IntoIter<(K, NodeRef<K, V>)>,
    keyed: bool,
}

/// Depth-first walk over the leaves below a node. Each level's children
/// are snapshotted when the walk first descends into it, so no node lock
/// is held between steps.
struct Walker<K, V> {
    stack: Vec<Frame<K, V>>,
    prefix: Vec<K>,
    lone_leaf: Option<NodeRef<K, V>>,
    remaining: u64,
}

impl<K, V> Walker<K, V>
where
    K: Clone,
{
    fn new(node: &NodeRef<K, V>) -> Self {
        let remaining = node_count(node);
        match child_snapshot(node) {
            None => Walker {
                stack: Vec::new(),
                prefix: Vec::new(),
                lone_leaf: Some(node.clone()),
                remaining,
            },
            Some(children) => Walker {
                stack: vec![Frame {
                    children: children.into_iter(),
                    keyed: false,
                }],
                prefix: Vec::new(),
                lone_leaf: None,
                remaining,
            },
        }
    }
}

impl<K, V> Iterator for Walker<K, V>
where
    K: Clone,
{
    type Item = (Vec<K>, NodeRef<K, V>);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(leaf) = self.lone_leaf.take() {
            self.remaining = self.remaining.saturating_sub(1);
            return Some((Vec::new(), leaf));
        }
        loop {
            let frame = self.stack.last_mut()?;
            if let Some((key, child)) = frame.children.next() {
                match child_snapshot(&child) {
                    None => {
                        let mut tuple = self.prefix.clone();
                        tuple.push(key);
                        self.remaining = self.remaining.saturating_sub(1);
                        return Some((tuple, child));
                    }
                    Some(children) => {
                        self.prefix.push(key);
                        self.stack.push(Frame {
                            children: children.into_iter(),
                            keyed: true,
                        });
                    }
                }
            } else {
                let done = self.stack.pop();
                if done.is_some_and(|frame| frame.keyed) {
                    self.prefix.pop();
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining.min(usize::MAX as u64) as usize;
        (0, Some(remaining))
    }
}

/// An iterator over all stored key tuples. See [`CurryDict::keys`].
pub struct Keys<K, V>(Walker<K, V>);

impl<K, V> Iterator for Keys<K, V>
where
    K: Clone,
{
    type Item = Vec<K>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(tuple, _)| tuple)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> std::iter::FusedIterator for Keys<K, V> where K: Clone {}

/// An iterator over `(key tuple, value)` pairs. See
/// [`CurryDict::entries`].
pub struct Entries<K, V>(Walker<K, V>);

impl<K, V> Iterator for Entries<K, V>
where
    K: Clone,
    V: Clone,
{
    type Item = (Vec<K>, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.0
            .next()
            .map(|(tuple, leaf)| {
                let value = leaf_value(&leaf);
                (tuple, value)
            })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<K, V> std::iter::FusedIterator for Entries<K, V>
where
    K: Clone,
    V: Clone,
{
}
