use clap::Parser;

/// Live betting-tips analysis bot
#[derive(Parser, Debug, Clone)]
#[command(name = "livetips-bot", version, about)]
pub struct Config {
    /// Run in dry-run mode (log tips instead of sending them)
    #[arg(long, env = "DRY_RUN", default_value = "false")]
    pub dry_run: bool,

    /// SQLite database path
    #[arg(long, env = "DATABASE_PATH", default_value = "livetips.db")]
    pub database_path: String,

    /// Bookmaker live-odds feed base URL
    #[arg(
        long,
        env = "ODDS_FEED_URL",
        default_value = "https://betboom.com/api"
    )]
    pub odds_feed_url: String,

    /// Statistics feed base URL
    #[arg(
        long,
        env = "STATS_FEED_URL",
        default_value = "https://scores24.live/api"
    )]
    pub stats_feed_url: String,

    /// Telegram bot token (required unless --dry-run)
    #[arg(long, env = "TELEGRAM_BOT_TOKEN")]
    pub telegram_bot_token: Option<String>,

    /// Telegram chat to deliver tips to
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub telegram_chat_id: Option<String>,

    /// Analysis cycle interval in seconds
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value = "300")]
    pub poll_interval_secs: u64,

    /// Minimum per-participant name similarity for a cross-feed match (0.0-1.0)
    #[arg(long, env = "FUZZY_THRESHOLD", default_value = "0.7")]
    pub fuzzy_threshold: f64,

    /// Minimum scoring confidence (0-100) for a tip to be sent
    #[arg(long, env = "MIN_CONFIDENCE", default_value = "80")]
    pub min_confidence: u8,

    /// Minutes played before a football lead is considered
    #[arg(long, env = "FOOTBALL_MIN_MINUTE", default_value = "60")]
    pub football_min_minute: u32,

    /// JSON file of name aliases (canonical -> list of alternates)
    #[arg(long, env = "ALIAS_FILE")]
    pub alias_file: Option<String>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.dry_run {
            if self.telegram_bot_token.is_none() {
                anyhow::bail!(
                    "TELEGRAM_BOT_TOKEN is required for delivery. Use --dry-run to log tips instead."
                );
            }
            if self.telegram_chat_id.is_none() {
                anyhow::bail!(
                    "TELEGRAM_CHAT_ID is required for delivery. Use --dry-run to log tips instead."
                );
            }
        }
        if !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            anyhow::bail!("fuzzy_threshold must be between 0.0 and 1.0");
        }
        if self.min_confidence > 100 {
            anyhow::bail!("min_confidence must be between 0 and 100");
        }
        if self.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be positive");
        }
        Ok(())
    }
}
