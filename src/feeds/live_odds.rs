use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::models::{LiveEvent, Sport};

use super::EventFeed;

/// Bookmaker feed for in-progress events and their current prices.
pub struct LiveOddsFeed {
    http: Client,
    /// Base URL for overriding in tests
    base_url: String,
}

impl LiveOddsFeed {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(LiveOddsFeed {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl EventFeed for LiveOddsFeed {
    fn name(&self) -> &str {
        "LiveOdds"
    }

    async fn fetch_live_events(&self, sport: Sport) -> Result<Vec<LiveEvent>> {
        let url = format!("{}/live/{}", self.base_url, sport);
        debug!("Fetching live events from {}", url);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("live odds request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("live odds feed error: {}", resp.status());
        }

        let raw: serde_json::Value = resp
            .json()
            .await
            .context("Failed to parse live odds response")?;

        Ok(parse_live_response(sport, &raw))
    }
}

/// Events missing either participant name are dropped; everything else is
/// kept as-is and left to the sport rules to validate.
fn parse_live_response(sport: Sport, raw: &serde_json::Value) -> Vec<LiveEvent> {
    let events = match raw["events"].as_array() {
        Some(a) => a,
        None => return vec![],
    };

    events
        .iter()
        .filter_map(|ev| {
            let side_a = ev["home"].as_str()?.to_string();
            let side_b = ev["away"].as_str()?.to_string();
            let score = ev["score"].as_str().unwrap_or("").to_string();

            // Out-of-range values are dropped rather than truncated into
            // a plausible-looking number.
            let minute: Option<u32> = ev["minute"]
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .or_else(|| ev["minute"].as_str().and_then(|s| s.parse().ok()));
            let half: Option<u8> = ev["half"].as_u64().and_then(|v| u8::try_from(v).ok());

            let odds = ev["odds"].as_object().map(|map| {
                map.iter()
                    .filter_map(|(label, price)| Some((label.clone(), price.as_f64()?)))
                    .collect::<HashMap<String, f64>>()
            });

            Some(LiveEvent {
                sport,
                side_a,
                side_b,
                score,
                games: ev["games"].as_str().map(String::from),
                minute,
                half,
                odds,
                locked: ev["locked"].as_bool().unwrap_or(false),
                league: ev["league"].as_str().map(String::from),
            })
        })
        .collect()
}
