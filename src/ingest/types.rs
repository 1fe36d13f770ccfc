// src/ingest/types.rs
use anyhow::Result;

use crate::contest::Contest;
use crate::window::MonthScope;

/// One upstream contest source.
///
/// Implementations map their native payload into [`Contest`] records and
/// leave `resource` as the provider reported it; normalization happens once,
/// downstream. Providers without server-side date filtering ignore `scope`.
#[async_trait::async_trait]
pub trait ContestProvider: Send + Sync {
    async fn fetch_contests(&self, scope: MonthScope) -> Result<Vec<Contest>>;
    fn name(&self) -> &'static str;
}
