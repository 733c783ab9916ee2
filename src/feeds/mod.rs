pub mod live_odds;
pub mod stats;

pub use live_odds::LiveOddsFeed;
pub use stats::StatsApiFeed;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{LiveEvent, Sport, StatsEvent};

/// Trait for the bookmaker side: in-progress events with prices.
#[async_trait]
pub trait EventFeed: Send + Sync {
    /// Return a snapshot of all currently in-progress events for one sport.
    async fn fetch_live_events(&self, sport: Sport) -> Result<Vec<LiveEvent>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Trait for the statistics side: form, standings, head-to-head.
#[async_trait]
pub trait StatsFeed: Send + Sync {
    /// Return today's stats records for one sport.
    async fn fetch_stats_events(&self, sport: Sport) -> Result<Vec<StatsEvent>>;

    fn name(&self) -> &str;
}
