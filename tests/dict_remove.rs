use currymap::{CurryDict, CurryError};

fn sample() -> CurryDict<&'static str, u32> {
    let dict = CurryDict::new(3).unwrap();
    dict.add(1, &["a", "b", "c"]).unwrap();
    dict.add(2, &["a", "b", "d"]).unwrap();
    dict.add(3, &["a", "e", "f"]).unwrap();
    dict.add(4, &["g", "h", "i"]).unwrap();
    dict
}

#[test]
fn an_empty_prefix_removes_nothing() {
    let dict = sample();
    assert_eq!(dict.remove(&[]).unwrap(), 0);
    assert_eq!(dict.len(), 4);
}

#[test]
fn an_absent_prefix_removes_nothing() {
    let dict = sample();
    assert_eq!(dict.remove(&["z"]).unwrap(), 0);
    assert_eq!(dict.remove(&["a", "z"]).unwrap(), 0);
    assert_eq!(dict.len(), 4);
    assert_eq!(dict.get(&["a", "b", "c"]).unwrap(), 1);
    #[cfg(debug_assertions)]
    assert!(dict.debug_verify_counts());
}

#[test]
fn removing_a_prefix_discards_the_whole_subtree() {
    let dict = sample();
    assert_eq!(dict.remove(&["a", "b"]).unwrap(), 2);
    assert_eq!(dict.len(), 2);
    assert!(!dict.contains_prefix(&["a", "b"]).unwrap());
    assert!(dict.contains_key_tuple(&["a", "e", "f"]).unwrap());
    #[cfg(debug_assertions)]
    assert!(dict.debug_verify_counts());
}

#[test]
fn removing_a_first_level_key_cascades() {
    let dict = sample();
    assert_eq!(dict.remove(&["a"]).unwrap(), 3);
    assert_eq!(dict.len(), 1);
    assert!(!dict.contains_prefix(&["a"]).unwrap());
    assert_eq!(dict.get(&["g", "h", "i"]).unwrap(), 4);
    #[cfg(debug_assertions)]
    assert!(dict.debug_verify_counts());
}

#[test]
fn removing_a_full_tuple_removes_one_value() {
    let dict = sample();
    assert_eq!(dict.remove(&["a", "b", "c"]).unwrap(), 1);
    assert_eq!(dict.len(), 3);
    assert!(!dict.contains_key_tuple(&["a", "b", "c"]).unwrap());
    assert!(dict.contains_key_tuple(&["a", "b", "d"]).unwrap());
}

#[test]
fn an_overlong_prefix_is_malformed() {
    let dict = sample();
    assert_eq!(
        dict.remove(&["a", "b", "c", "d"]),
        Err(CurryError::ArityMismatch {
            expected: 3,
            actual: 4,
        })
    );
    assert_eq!(dict.len(), 4);
}
