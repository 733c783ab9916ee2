use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use rand::Rng;
use tracing::{error, info, warn};

mod config;
mod db;
mod delivery;
mod feeds;
mod matching;
mod models;
mod pipeline;
mod rules;

use config::Config;
use db::Database;
use delivery::TelegramSender;
use feeds::{EventFeed, LiveOddsFeed, StatsApiFeed, StatsFeed};
use matching::AliasTable;
use models::Sport;
use pipeline::{AnalysisPipeline, PipelineConfig, PipelineError};

/// Sent-tip records older than this are pruned each cycle.
const SENT_TIP_RETENTION_HOURS: i64 = 24;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    if config.dry_run {
        info!("🟡 DRY RUN mode – tips will be logged, not sent");
    } else {
        info!("🔴 LIVE mode – tips WILL be sent to Telegram");
    }

    let db = Database::open(&config.database_path)?;
    info!("Database opened: {}", config.database_path);

    let aliases = match &config.alias_file {
        Some(path) => {
            let table = AliasTable::from_json_file(path)?;
            info!("Loaded alias table from {}", path);
            table
        }
        None => AliasTable::with_defaults(),
    };

    let pipeline = AnalysisPipeline::new(
        aliases,
        &PipelineConfig {
            fuzzy_threshold: config.fuzzy_threshold,
            min_confidence: config.min_confidence,
            football_min_minute: config.football_min_minute,
        },
    );

    let odds_feed = LiveOddsFeed::new(&config.odds_feed_url)?;
    let stats_feed = StatsApiFeed::new(&config.stats_feed_url)?;

    let sender = match (&config.telegram_bot_token, &config.telegram_chat_id) {
        (Some(token), Some(chat_id)) => Some(TelegramSender::new(token, chat_id, None)?),
        _ => None,
    };

    let poll_interval = Duration::from_secs(config.poll_interval_secs);
    info!(
        "Analysis loop started (interval={:?}, feeds: {}, {})",
        poll_interval,
        odds_feed.name(),
        stats_feed.name()
    );

    let mut interval = tokio::time::interval(poll_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        // Small jitter so cycles don't hit the feeds on an exact beat.
        let jitter = rand::thread_rng().gen_range(0..2000);
        tokio::time::sleep(Duration::from_millis(jitter)).await;

        if let Err(e) = run_cycle(
            &pipeline,
            &odds_feed,
            &stats_feed,
            &db,
            sender.as_ref(),
            config.dry_run,
        )
        .await
        {
            error!("Analysis cycle failed: {}", e);
        }

        match db.prune_older_than(chrono::Duration::hours(SENT_TIP_RETENTION_HOURS)) {
            Ok(removed) if removed > 0 => info!("Pruned {} old sent-tip records", removed),
            Ok(_) => {}
            Err(e) => warn!("Failed to prune sent tips: {}", e),
        }
    }
}

/// One analysis cycle: fetch both feeds for every sport, run the
/// pipeline, and deliver whatever clears deduplication.
async fn run_cycle(
    pipeline: &AnalysisPipeline,
    odds_feed: &LiveOddsFeed,
    stats_feed: &StatsApiFeed,
    db: &Database,
    sender: Option<&TelegramSender>,
    dry_run: bool,
) -> Result<()> {
    let fetches = Sport::ALL.map(|sport| async move {
        let live = odds_feed.fetch_live_events(sport).await;
        let stats = stats_feed.fetch_stats_events(sport).await;
        (sport, live, stats)
    });
    let results = futures_util::future::join_all(fetches).await;

    for (sport, live, stats) in results {
        let live = match live {
            Ok(events) => events,
            Err(e) => {
                warn!("{}: live feed failed: {}", sport, e);
                continue;
            }
        };
        let stats = match stats {
            Ok(events) => events,
            Err(e) => {
                warn!("{}: stats feed failed: {}", sport, e);
                continue;
            }
        };

        let report = match pipeline.run(&live, &stats) {
            Ok(report) => report,
            Err(e @ PipelineError::EmptyFeed(_)) => {
                info!("{}: {}", sport, e);
                continue;
            }
        };
        info!(
            "{}: {} recommendation(s), {} skipped",
            sport,
            report.recommendations.len(),
            report.skipped.len()
        );

        for rec in &report.recommendations {
            if db.was_sent(rec)? {
                info!(
                    "{}: tip for '{}' already sent, skipping",
                    sport,
                    rec.leading_name()
                );
                continue;
            }
            if dry_run {
                info!("DRY RUN tip:\n{}", delivery::format_message(rec));
            } else if let Some(sender) = sender {
                if let Err(e) = sender.send(rec).await {
                    error!("Failed to deliver tip: {}", e);
                    continue;
                }
            }
            db.record_sent(rec)?;
        }
    }
    Ok(())
}
