// src/metadata/mod.rs
mod trace_index;
mod snapshot;

pub use trace_index::TraceIndex;
pub use snapshot::{MetadataSnapshot, MetadataValue};
