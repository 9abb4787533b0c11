//! Cross-source correlation.
//!
//! Topics come from explicit topic/tag metadata, significant title words, and synthesis key
//! features. A topic contributed by at least `min_sources` distinct sources boosts every item
//! carrying it by `1 + boost_step * (sources - 1)`, capped so scores never exceed `1.0`.

pub mod engine;
pub mod topics;
pub mod types;


pub use engine::CorrelationEngine;
pub use topics::{extract_topics, significant_words, source_of};
pub use types::CorrelatedTopic;
