//! Formatting and delivery of accepted recommendations to Telegram.

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::info;

use crate::models::{Recommendation, Sport};

fn sport_emoji(sport: Sport) -> &'static str {
    match sport {
        Sport::Football => "\u{26bd}",
        Sport::Tennis => "\u{1f3be}",
        Sport::TableTennis => "\u{1f3d3}",
        Sport::Handball => "\u{1f93e}",
    }
}

/// Render a recommendation as a Telegram HTML message.
pub fn format_message(rec: &Recommendation) -> String {
    format!(
        "{} <b>{}</b>\n\
         {} vs {}\n\
         Score: {}\n\
         Tip: <b>{}</b> ({})\n\
         Confidence: {}%\n\
         <i>{}</i>",
        sport_emoji(rec.sport),
        rec.sport,
        rec.side_a,
        rec.side_b,
        rec.score,
        rec.leading_name(),
        rec.bet_type,
        rec.confidence,
        rec.reasoning,
    )
}

/// Sends tips through the Telegram Bot API.
pub struct TelegramSender {
    http: Client,
    /// Base URL for overriding in tests
    base_url: String,
    token: String,
    chat_id: String,
}

impl TelegramSender {
    pub fn new(token: &str, chat_id: &str, base_url: Option<&str>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(TelegramSender {
            http,
            base_url: base_url
                .unwrap_or("https://api.telegram.org")
                .trim_end_matches('/')
                .to_string(),
            token: token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }

    pub async fn send(&self, rec: &Recommendation) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": format_message(rec),
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        });

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Telegram request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Telegram API error {}: {}", status, body);
        }

        info!(
            "Sent tip: {} '{}' ({}%)",
            rec.sport,
            rec.leading_name(),
            rec.confidence
        );
        Ok(())
    }
}
