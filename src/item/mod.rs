//! Pipeline item types produced outside the core (source, fetch, synthesis steps).

pub mod metadata;
pub mod types;


pub use metadata::{Metadata, MetadataExt, TIMESTAMP_KEYS};
pub use types::{FetchedItem, ItemKind, RawItem, Synthesis, SynthesizedItem};
