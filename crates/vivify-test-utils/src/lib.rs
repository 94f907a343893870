//! Testing utilities for the vivify workspace
//!
//! Shared fixtures and tracing setup.

#![allow(missing_docs)]

use std::sync::Once;
use tracing_subscriber::EnvFilter;
use vivify_containers::{ContainerConfig, FixedSizeContainer, Mapping, Sequence};

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once; `RUST_LOG` controls the filter
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

pub fn decades() -> Sequence<i32> {
    (1..=9).map(|n| n * 10).collect()
}

pub fn sequence_of(values: &[i32]) -> Sequence<i32> {
    values.iter().copied().collect()
}

pub fn present_values<T: Clone>(sequence: &Sequence<T>) -> Vec<T> {
    sequence.values().into_iter().flatten().collect()
}

pub fn user_params() -> Mapping<String, String> {
    [
        ("user_id", "1"),
        ("user_name", "kim"),
        ("user_password", "secret"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub fn mapping_pairs<V: Clone>(mapping: &Mapping<String, V>) -> Vec<(String, V)> {
    mapping.iter().map(|(k, v)| (k.clone(), v.get())).collect()
}

pub fn bounded_containers(max_slots: usize) -> FixedSizeContainer {
    FixedSizeContainer::new(ContainerConfig::new().with_max_slots(max_slots))
}
