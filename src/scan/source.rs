use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::item::SynthesizedItem;

#[async_trait]
/// A hunter: collects synthesized items for one query from an external source.
///
/// Implementations own their fetching, rate limiting, and synthesis. They should return
/// promptly once `cancel` fires.
pub trait ItemSource: Send + Sync {
    /// Hunter name used in scan requests.
    fn name(&self) -> &str;

    async fn collect(
        &self,
        query: &str,
        targets: &[String],
        cancel: &CancellationToken,
    ) -> anyhow::Result<Vec<SynthesizedItem>>;
}
