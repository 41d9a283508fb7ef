//! A recursive, arity-parameterized, multi-key associative container.
//!
//! A [`CurryDict`] stores values addressed by a fixed-length tuple of
//! keys and supports partial application of a key prefix — the "curry"
//! operation, by analogy with function currying — yielding a lower-arity
//! sub-dictionary backed by the same tree. Every node caches the number
//! of leaves reachable beneath it; structural mutations bubble their
//! count deltas to every ancestor through an explicit parent chain.
//!
//! ```
//! use currymap::CurryDict;
//!
//! let dict: CurryDict<&str, i32> = CurryDict::new(2).unwrap();
//! dict.add(1, &["a", "b"]).unwrap();
//! dict.add(2, &["a", "c"]).unwrap();
//! assert_eq!(dict.len(), 2);
//!
//! let sub = dict.curried(&["a"]).unwrap();
//! assert_eq!(sub.arity(), 1);
//! assert_eq!(sub.get(&["b"]).unwrap(), 1);
//!
//! // The curried handle writes through to the original.
//! sub.add(3, &["d"]).unwrap();
//! assert_eq!(dict.len(), 3);
//!
//! assert_eq!(dict.remove(&["a", "b"]).unwrap(), 1);
//! assert_eq!(dict.len(), 2);
//! ```

pub mod compare;
pub mod counted;
pub mod dict;
pub mod num;

pub use compare::{compare, Comparison};
pub use dict::{CurryDict, CurryError, Entries, Keys};
pub use num::{Arity, Count, InvalidArity};
