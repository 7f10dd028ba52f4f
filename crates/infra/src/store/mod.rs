//! Entity storage abstractions and adapters.

pub mod entity_store;
pub mod merge_graph;

pub use entity_store::{EntityStore, InMemoryEntityStore, StoreError};
pub use merge_graph::StoreMergeGraph;
