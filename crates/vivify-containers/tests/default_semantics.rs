//! Default-value contracts: absent slots, shared aliasing, factory independence,
//! out-of-range reads and lazy mapping defaults.

use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::rc::Rc;
use vivify_containers::prelude::*;
use vivify_test_utils::{bounded_containers, decades, init_tracing, present_values};

#[test]
fn create_yields_absent_slots() {
    init_tracing();
    let containers = FixedSizeContainer::default();

    for size in [0, 1, 5, 64] {
        let seq: Sequence<String> = containers.create(size).unwrap();
        assert_eq!(seq.len(), size as usize);
        assert!(seq.iter().all(|slot| slot.is_none()));
    }
}

#[test]
fn negative_size_fails_for_every_constructor() {
    let containers = FixedSizeContainer::default();

    assert!(matches!(
        containers.create::<i32>(-1),
        Err(ContainerError::InvalidSize { size: -1, .. })
    ));
    assert!(matches!(
        containers.create_with_shared_default(-5, 0),
        Err(ContainerError::InvalidSize { size: -5, .. })
    ));
    assert!(matches!(
        containers.create_with_factory(-5, || 0),
        Err(ContainerError::InvalidSize { size: -5, .. })
    ));
}

#[test]
fn configured_limit_is_enforced() {
    let containers = bounded_containers(3);
    assert_eq!(containers.config().max_slots, 3);
    assert!(containers.create::<i32>(3).is_ok());
    assert!(matches!(
        containers.create::<i32>(4),
        Err(ContainerError::InvalidSize { size: 4, .. })
    ));
}

#[test]
fn shared_default_mutation_is_visible_everywhere() {
    init_tracing();
    let containers = FixedSizeContainer::default();
    let seq = containers
        .create_with_shared_default(5, Vec::<i32>::new())
        .unwrap();

    containers.get(&seq, 0).unwrap().borrow_mut().push(1);

    assert_eq!(containers.get(&seq, 4).unwrap().get(), vec![1]);
    assert_eq!(seq.values(), vec![Some(vec![1]); 5]);
    assert!(seq.get(0).unwrap().ptr_eq(&seq.get(4).unwrap()));
}

#[test]
fn shared_default_negative_index_push() {
    let seq = FixedSizeContainer::default()
        .create_with_shared_default(5, Vec::<i32>::new())
        .unwrap();
    seq.get(-1).unwrap().borrow_mut().push(1);

    assert_eq!(present_values(&seq), vec![vec![1]; 5]);
}

#[test]
fn factory_values_are_independent() {
    let containers = FixedSizeContainer::default();
    let seq = containers.create_with_factory(5, Vec::<i32>::new).unwrap();

    containers.get(&seq, 4).unwrap().borrow_mut().push(1);

    assert_eq!(containers.get(&seq, 0).unwrap().get(), Vec::<i32>::new());
    assert_eq!(seq.value_at(-1), Some(vec![1]));
}

#[test]
fn negative_index_matches_last() {
    let seq = decades();
    assert_eq!(seq.len(), 9);
    assert_eq!(seq.get(-1), seq.get(8));
    assert!(seq.get(-1).unwrap().ptr_eq(&seq.get(8).unwrap()));
}

#[test]
fn out_of_range_reads_are_absent() {
    let seq = decades();
    let containers = FixedSizeContainer::default();
    assert!(containers.get(&seq, 100).is_none());
    assert!(containers.get(&seq, -100).is_none());
}

#[test]
fn slice_truncates_and_rejects_far_start() {
    let seq = decades();
    let containers = FixedSizeContainer::default();

    let tail = containers.slice(&seq, 5, 100).unwrap();
    assert_eq!(present_values(&tail), vec![60, 70, 80, 90]);
    assert!(containers.slice(&seq, 100, 2).is_none());
}

#[test]
fn non_inserting_provider_leaves_mapping_unchanged() {
    let containers = FixedSizeContainer::default();
    let mut mapping =
        containers.mapping_with_lazy_default::<String, Vec<i32>>(|_, _| Handle::new(Vec::new()));

    let value = mapping.get(&"a".to_string()).unwrap();
    value.borrow_mut().push(1);

    assert_eq!(mapping.len(), 0);
    assert_eq!(mapping.get(&"a".to_string()).unwrap().get(), Vec::<i32>::new());
}

#[test]
fn inserting_provider_caches_first_result() {
    init_tracing();
    let calls = Rc::new(Cell::new(0_u32));
    let counter = Rc::clone(&calls);
    let containers = FixedSizeContainer::default();
    let mut mapping = containers.mapping_with_lazy_default::<String, Vec<i32>>(move |m, key| {
        counter.set(counter.get() + 1);
        let handle = Handle::new(Vec::new());
        m.insert_handle(key.clone(), handle.clone());
        handle
    });

    let key = "a".to_string();
    mapping.get(&key).unwrap().borrow_mut().push(1);
    assert_eq!(mapping.len(), 1);

    let again = mapping.get(&key).unwrap();
    assert_eq!(again.get(), vec![1]);
    assert_eq!(calls.get(), 1);
    assert_eq!(mapping.len(), 1);
}

#[test]
fn shared_default_mapping_accumulates_into_one_object() {
    let mut mapping: Mapping<String, Vec<i32>> = Mapping::with_shared_default(Vec::new());
    for (key, n) in [("a", 1), ("b", 2), ("1", 3)] {
        let key = key.to_string();
        let handle = mapping.get(&key).unwrap();
        handle.borrow_mut().push(n);
        mapping.insert_handle(key, handle);
    }

    let values: Vec<Vec<i32>> = mapping.values().map(Handle::get).collect();
    assert_eq!(values, vec![vec![1, 2, 3]; 3]);
    assert!(matches!(mapping.provider(), DefaultProvider::Shared(_)));
}

#[test]
fn vivifying_mapping_keeps_values_apart() {
    let mut mapping: Mapping<String, Vec<i32>> = Mapping::with_vivifying_default(Vec::new);
    mapping.get(&"a".to_string()).unwrap().borrow_mut().push(1);
    mapping.get(&"b".to_string()).unwrap().borrow_mut().push(2);

    let values: Vec<Vec<i32>> = mapping.values().map(Handle::get).collect();
    assert_eq!(values, vec![vec![1], vec![2]]);
}

#[test]
fn counting_with_shared_zero_default_reassigns() {
    let mut counts: Mapping<i32, usize> = Mapping::with_shared_default(0);
    for x in [1, 2, 1, 2, 1, 3] {
        let current = counts.get(&x).map_or(0, |h| h.get());
        counts.insert(x, current + 1);
    }

    assert_eq!(counts.fetch(&1).unwrap().get(), 3);
    assert_eq!(counts.fetch(&3).unwrap().get(), 1);
    // the shared zero itself was never mutated
    assert_eq!(counts.get(&99).unwrap().get(), 0);
    assert_eq!(counts, Mapping::tally([1, 2, 1, 2, 1, 3]));
}
