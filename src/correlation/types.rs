use serde::{Deserialize, Serialize};

/// A topic surfaced independently by multiple sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelatedTopic {
    pub topic: String,
    /// Distinct contributing sources, sorted.
    pub sources: Vec<String>,
    pub boost_factor: f64,
    /// Distinct items carrying the topic.
    pub item_count: usize,
}

impl CorrelatedTopic {
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}
