//! Structural comparison of curry dictionaries.
//!
//! Two dictionaries are checked in three ordered stages, short-circuiting
//! at the first failing one: arity, cached count, and the first
//! structural mismatch found by a synchronized traversal. The same
//! staging applies to any container exposing an arity, a count, and an
//! entry enumeration, such as a sparse multi-dimensional array.

use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;

use itertools::Itertools;

use crate::dict::CurryDict;

/// The outcome of a structural comparison: a verdict plus a
/// human-readable report naming the first difference found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    equal: bool,
    report: String,
}

impl Comparison {
    pub fn is_equal(&self) -> bool {
        self.equal
    }

    pub fn report(&self) -> &str {
        &self.report
    }

    fn equal(report: String) -> Self {
        Comparison {
            equal: true,
            report,
        }
    }

    fn unequal(report: String) -> Self {
        Comparison {
            equal: false,
            report,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report)
    }
}

fn render_tuple<K: Debug>(keys: &[K]) -> String {
    format!(
        "[{}]",
        keys.iter()
            .format_with(", ", |key, f| f(&format_args!("{:?}", key)))
    )
}

/// Compares two dictionaries under a caller-supplied value equality
/// predicate. Scanning stops at the first mismatch.
pub fn compare<K, V, F>(left: &CurryDict<K, V>, right: &CurryDict<K, V>, value_eq: F) -> Comparison
where
    K: Eq + Hash + Clone + Debug,
    V: Clone + Debug,
    F: Fn(&V, &V) -> bool,
{
    if left.arity() != right.arity() {
        return Comparison::unequal(format!(
            "arities differ: left has arity {}, right has arity {}",
            left.arity(),
            right.arity()
        ));
    }
    if left.len() != right.len() {
        return Comparison::unequal(format!(
            "counts differ: left holds {} values, right holds {}",
            left.len(),
            right.len()
        ));
    }
    // The counts are equal, so scanning one side finds every possible
    // mismatch: a tuple only present in the right would force some left
    // tuple to be missing from the right as well.
    for (keys, value) in left.entries() {
        match right.get(&keys) {
            Err(_) => {
                return Comparison::unequal(format!(
                    "key tuple {} is present in the left dictionary only",
                    render_tuple(&keys)
                ));
            }
            Ok(other) => {
                if !value_eq(&value, &other) {
                    return Comparison::unequal(format!(
                        "values differ at key tuple {}: left holds {:?}, right holds {:?}",
                        render_tuple(&keys),
                        value,
                        other
                    ));
                }
            }
        }
    }
    Comparison::equal(format!(
        "dictionaries are equal: arity {}, {} values",
        left.arity(),
        left.len()
    ))
}
