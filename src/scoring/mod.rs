//! Multi-factor quality scoring.
//!
//! A [`Scorer`] turns one [`SynthesizedItem`](crate::item::SynthesizedItem) plus a search query
//! into a [`QualityScore`] built from five normalized factors:
//!
//! | Factor | Source |
//! |---|---|
//! | `engagement` | stars (repositories) or points + comments (discussions), log-scaled |
//! | `citations` | citation count, log-scaled; neutral when absent |
//! | `recency` | half-life decay from the newest timestamp field |
//! | `query_match` | query terms found in title, description, topics |
//! | `synthesis` | the synthesis step's own confidence |
//!
//! Scoring is pure: no I/O and no shared state.

pub mod factors;
pub mod scorer;
pub mod types;


pub use factors::temporal_decay;
pub use scorer::Scorer;
pub use types::{QualityLevel, QualityScore, ScoredItem};
