//! vivify containers
//!
//! Sequences, mappings and sets whose default values are an explicit choice.
//!
//! # Core Concepts
//!
//! - [`Handle<T>`]: shared, interior-mutable value; cloning aliases
//! - [`Sequence<T>`]: ordered slots, each absent or holding a handle
//! - [`FixedSizeContainer`]: sized construction with an absent, shared or
//!   per-slot default
//! - [`Mapping<K, V>`]: insertion-ordered map with a shared or lazy default
//!   provider
//! - [`OrderedSet<T>`]: insertion-ordered set with set algebra
//!
//! # Shared vs per-slot defaults
//!
//! ```rust
//! use vivify_containers::FixedSizeContainer;
//!
//! let containers = FixedSizeContainer::default();
//!
//! // one object behind every slot
//! let shared = containers.create_with_shared_default(3, Vec::<i32>::new()).unwrap();
//! shared.get(0).unwrap().borrow_mut().push(7);
//! assert_eq!(shared.value_at(2), Some(vec![7]));
//!
//! // one object per slot
//! let owned = containers.create_with_factory(3, Vec::<i32>::new).unwrap();
//! owned.get(0).unwrap().borrow_mut().push(7);
//! assert_eq!(owned.value_at(2), Some(vec![]));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod fixed;
pub mod handle;
pub mod mapping;
pub mod sequence;
pub mod set;

// Re-exports
pub use config::ContainerConfig;
pub use error::{ContainerError, Result};
pub use fixed::FixedSizeContainer;
pub use handle::Handle;
pub use mapping::{DefaultProvider, LazyDefault, Mapping, Nested};
pub use sequence::{Sequence, Slot};
pub use set::OrderedSet;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for container work
    pub use crate::{
        ContainerConfig, ContainerError, DefaultProvider, FixedSizeContainer, Handle, Mapping,
        Nested, OrderedSet, Sequence, Slot,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
