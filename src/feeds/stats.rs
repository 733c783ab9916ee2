use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::models::{FormResult, Sport, StatsEvent, StatsProfile};

use super::StatsFeed;

/// Statistics feed: recent form, standings, scoring rates, head-to-head.
pub struct StatsApiFeed {
    http: Client,
    /// Base URL for overriding in tests
    base_url: String,
}

impl StatsApiFeed {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(StatsApiFeed {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl StatsFeed for StatsApiFeed {
    fn name(&self) -> &str {
        "StatsApi"
    }

    async fn fetch_stats_events(&self, sport: Sport) -> Result<Vec<StatsEvent>> {
        let url = format!("{}/matches/{}", self.base_url, sport);
        debug!("Fetching stats events from {}", url);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .context("stats request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("stats feed error: {}", resp.status());
        }

        let raw: serde_json::Value = resp
            .json()
            .await
            .context("Failed to parse stats response")?;

        Ok(parse_stats_response(sport, &raw))
    }
}

/// Parse a form string like `"WWDLW"`, most recent result first.
/// Unknown characters are skipped rather than failing the record.
fn parse_form(form: &str) -> Vec<FormResult> {
    form.chars()
        .filter_map(|c| match c.to_ascii_uppercase() {
            'W' => Some(FormResult::Win),
            'D' => Some(FormResult::Draw),
            'L' => Some(FormResult::Loss),
            _ => None,
        })
        .take(5)
        .collect()
}

/// Parse a head-to-head summary like `"15-10"` (wins for side A, side B).
fn parse_head_to_head(h2h: &str) -> Option<(u32, u32)> {
    let (a, b) = h2h.split_once('-')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

fn parse_profile(raw: &serde_json::Value) -> StatsProfile {
    StatsProfile {
        recent_form: raw["form"].as_str().map(parse_form).unwrap_or_default(),
        position: raw["position"].as_u64().unwrap_or(0) as u32,
        scoring_rate: raw["scoring_rate"].as_f64().unwrap_or(0.0),
        recent_win_rate: raw["win_rate"].as_f64(),
    }
}

fn parse_stats_response(sport: Sport, raw: &serde_json::Value) -> Vec<StatsEvent> {
    let matches = match raw["matches"].as_array() {
        Some(a) => a,
        None => return vec![],
    };

    matches
        .iter()
        .filter_map(|m| {
            let side_a = m["home"]["name"].as_str()?.to_string();
            let side_b = m["away"]["name"].as_str()?.to_string();
            Some(StatsEvent {
                sport,
                side_a,
                side_b,
                profile_a: parse_profile(&m["home"]),
                profile_b: parse_profile(&m["away"]),
                head_to_head: m["head_to_head"].as_str().and_then(parse_head_to_head),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_form() {
        use FormResult::*;
        assert_eq!(parse_form("WWDLW"), vec![Win, Win, Draw, Loss, Win]);
        assert_eq!(parse_form("wdl"), vec![Win, Draw, Loss]);
        // Separators and unknown letters are skipped, window capped at 5.
        assert_eq!(parse_form("W-W-?-W-W-W-W").len(), 5);
        assert!(parse_form("").is_empty());
    }

    #[test]
    fn test_parse_head_to_head() {
        assert_eq!(parse_head_to_head("15-10"), Some((15, 10)));
        assert_eq!(parse_head_to_head(" 3 - 0 "), Some((3, 0)));
        assert_eq!(parse_head_to_head("unknown"), None);
    }

    #[test]
    fn test_parse_match_record() {
        let raw = json!({
            "matches": [{
                "home": {
                    "name": "FC Barcelona",
                    "form": "WWWWW",
                    "position": 1,
                    "scoring_rate": 2.6,
                    "win_rate": 88.0
                },
                "away": {
                    "name": "Real Madrid CF",
                    "form": "LDLWL",
                    "position": 6,
                    "scoring_rate": 1.2
                },
                "head_to_head": "7-3"
            }]
        });
        let events = parse_stats_response(Sport::Football, &raw);
        assert_eq!(events.len(), 1);
        let ev = &events[0];
        assert_eq!(ev.side_a, "FC Barcelona");
        assert_eq!(ev.profile_a.recent_form.len(), 5);
        assert_eq!(ev.profile_a.position, 1);
        assert_eq!(ev.profile_a.recent_win_rate, Some(88.0));
        assert_eq!(ev.profile_b.recent_win_rate, None);
        assert_eq!(ev.head_to_head, Some((7, 3)));
    }

    #[test]
    fn test_partial_record_defaults() {
        let raw = json!({
            "matches": [{
                "home": {"name": "Fan Zhendong"},
                "away": {"name": "Hugo Calderano"}
            }]
        });
        let events = parse_stats_response(Sport::TableTennis, &raw);
        let ev = &events[0];
        assert!(ev.profile_a.recent_form.is_empty());
        assert_eq!(ev.profile_a.position, 0);
        assert_eq!(ev.head_to_head, None);
    }

    #[test]
    fn test_nameless_record_is_dropped() {
        let raw = json!({
            "matches": [{"home": {"name": "Boll T."}, "away": {}}]
        });
        assert!(parse_stats_response(Sport::TableTennis, &raw).is_empty());
    }
}
