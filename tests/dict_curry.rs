use currymap::{CurryDict, CurryError};

#[test]
fn currying_fixes_a_prefix_and_lowers_the_arity() {
    let dict = CurryDict::new(2).unwrap();
    dict.add("X", &["a", "b"]).unwrap();
    dict.add("Y", &["a", "c"]).unwrap();
    assert_eq!(dict.len(), 2);

    let sub = dict.curried(&["a"]).unwrap();
    assert_eq!(sub.arity(), 1);
    assert_eq!(sub.len(), 2);
    assert_eq!(sub.get(&["b"]).unwrap(), "X");
    assert_eq!(sub.get(&["c"]).unwrap(), "Y");

    assert_eq!(dict.remove(&["a", "b"]).unwrap(), 1);
    assert_eq!(dict.len(), 1);
}

#[test]
fn curried_lookups_match_the_original() {
    let dict = CurryDict::new(3).unwrap();
    dict.add(1, &["a", "b", "c"]).unwrap();
    dict.add(2, &["a", "b", "d"]).unwrap();
    dict.add(3, &["a", "e", "f"]).unwrap();

    let sub = dict.curried(&["a"]).unwrap();
    assert_eq!(sub.arity(), 2);
    for remainder in [["b", "c"], ["b", "d"], ["e", "f"], ["b", "x"]] {
        let full = [&["a"][..], &remainder[..]].concat();
        assert_eq!(
            sub.contains_key_tuple(&remainder).unwrap(),
            dict.contains_key_tuple(&full).unwrap()
        );
    }
}

#[test]
fn an_empty_prefix_curries_to_the_dictionary_itself() {
    let dict = CurryDict::new(2).unwrap();
    dict.add(7, &["a", "b"]).unwrap();

    let same = dict.curried(&[]).unwrap();
    assert_eq!(same.arity(), 2);
    same.add(8, &["a", "c"]).unwrap();
    assert_eq!(dict.len(), 2);
}

#[test]
fn currying_an_absent_prefix_fails() {
    let dict: CurryDict<&str, u8> = CurryDict::new(2).unwrap();
    assert_eq!(
        dict.curried(&["a"]),
        Err(CurryError::KeyNotFound { depth: 0 })
    );
    dict.add(1, &["a", "b"]).unwrap();
    assert_eq!(
        dict.curried(&["a", "x"]),
        Err(CurryError::KeyNotFound { depth: 1 })
    );
}

#[test]
fn mutations_through_a_curried_handle_write_through() {
    let dict = CurryDict::new(3).unwrap();
    dict.add(1, &["a", "b", "c"]).unwrap();

    let sub = dict.curried(&["a"]).unwrap();
    assert!(sub.add(2, &["b", "d"]).unwrap());
    assert!(sub.add(3, &["e", "f"]).unwrap());

    // The original sees the inserts, counts included.
    assert_eq!(dict.len(), 3);
    assert_eq!(dict.get(&["a", "b", "d"]).unwrap(), 2);
    assert_eq!(dict.get(&["a", "e", "f"]).unwrap(), 3);
    #[cfg(debug_assertions)]
    assert!(dict.debug_verify_counts());

    // And removals through the handle propagate the same way.
    assert_eq!(sub.remove(&["b"]).unwrap(), 2);
    assert_eq!(dict.len(), 1);
    assert!(!dict.contains_prefix(&["a", "b"]).unwrap());
    #[cfg(debug_assertions)]
    assert!(dict.debug_verify_counts());
}

#[test]
fn curried_handles_compose() {
    let dict = CurryDict::new(3).unwrap();
    dict.add("deep", &["a", "b", "c"]).unwrap();

    let once = dict.curried(&["a"]).unwrap();
    let twice = once.curried(&["b"]).unwrap();
    assert_eq!(twice.arity(), 1);
    assert_eq!(twice.get(&["c"]).unwrap(), "deep");

    let through_both = dict.curried(&["a", "b"]).unwrap();
    assert_eq!(through_both.arity(), 1);
    assert_eq!(through_both.get(&["c"]).unwrap(), "deep");
}

#[test]
fn a_detached_subtree_no_longer_reaches_the_original() {
    let dict = CurryDict::new(2).unwrap();
    dict.add(1, &["a", "b"]).unwrap();
    let sub = dict.curried(&["a"]).unwrap();

    assert_eq!(dict.remove(&["a"]).unwrap(), 1);
    assert_eq!(dict.len(), 0);

    // The handle still works on the detached subtree, but its changes
    // stay local.
    assert!(sub.add(2, &["c"]).unwrap());
    assert_eq!(sub.len(), 2);
    assert_eq!(dict.len(), 0);
    #[cfg(debug_assertions)]
    assert!(dict.debug_verify_counts());
}
