//! The per-cycle analysis pipeline: eligibility, cross-feed matching,
//! scoring, and the final confidence gate, in that order.

use thiserror::Error;
use tracing::debug;

use crate::matching::{AliasTable, FuzzyMatcher};
use crate::models::{LiveEvent, Recommendation, StatsEvent};
use crate::rules::{
    Assessment, Eligibility, FootballRule, HandballRule, SkipReason, SportRule, TableTennisRule,
    TennisRule,
};

/// Which input feed a pipeline error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSide {
    Bookmaker,
    Stats,
}

impl std::fmt::Display for FeedSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedSide::Bookmaker => write!(f, "bookmaker"),
            FeedSide::Stats => write!(f, "stats"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// An empty feed means the cycle has nothing to reconcile against;
    /// distinct from a cycle that merely produces no recommendations.
    #[error("{0} feed returned no events")]
    EmptyFeed(FeedSide),
}

/// Tunables for one pipeline instance. Defaults mirror the CLI defaults.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Minimum per-participant similarity for a cross-feed match.
    pub fuzzy_threshold: f64,
    /// Minimum scoring confidence for a recommendation to survive.
    pub min_confidence: u8,
    /// Minutes played before a football lead is considered.
    pub football_min_minute: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            fuzzy_threshold: 0.7,
            min_confidence: 80,
            football_min_minute: 60,
        }
    }
}

/// An event the cycle looked at but did not recommend, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedEvent {
    pub side_a: String,
    pub side_b: String,
    pub reason: SkipReason,
}

/// Everything one analysis cycle produced.
#[derive(Debug, Default)]
pub struct CycleReport {
    pub recommendations: Vec<Recommendation>,
    pub skipped: Vec<SkippedEvent>,
}

/// One pipeline serves every sport; dispatch is on the event's sport tag.
pub struct AnalysisPipeline {
    matcher: FuzzyMatcher,
    football: FootballRule,
    tennis: TennisRule,
    table_tennis: TableTennisRule,
    handball: HandballRule,
    min_confidence: u8,
}

impl AnalysisPipeline {
    pub fn new(aliases: AliasTable, config: &PipelineConfig) -> Self {
        AnalysisPipeline {
            matcher: FuzzyMatcher::new(aliases, config.fuzzy_threshold),
            football: FootballRule {
                min_minute: config.football_min_minute,
            },
            tennis: TennisRule,
            table_tennis: TableTennisRule,
            handball: HandballRule,
            min_confidence: config.min_confidence,
        }
    }

    fn rule_for(&self, event: &LiveEvent) -> &dyn SportRule {
        match event.sport {
            crate::models::Sport::Football => &self.football,
            crate::models::Sport::Tennis => &self.tennis,
            crate::models::Sport::TableTennis => &self.table_tennis,
            crate::models::Sport::Handball => &self.handball,
        }
    }

    /// Run one cycle over both feeds. A malformed or unmatched event
    /// skips that event only; the rest of the batch is still analyzed.
    pub fn run(
        &self,
        live_events: &[LiveEvent],
        stats_events: &[StatsEvent],
    ) -> Result<CycleReport, PipelineError> {
        if live_events.is_empty() {
            return Err(PipelineError::EmptyFeed(FeedSide::Bookmaker));
        }
        if stats_events.is_empty() {
            return Err(PipelineError::EmptyFeed(FeedSide::Stats));
        }

        let mut report = CycleReport::default();
        for event in live_events {
            match self.analyze(event, stats_events) {
                Assessment::Verdict(verdict) => report.recommendations.push(Recommendation {
                    sport: event.sport,
                    side_a: event.side_a.clone(),
                    side_b: event.side_b.clone(),
                    score: event.score.clone(),
                    leading_side: verdict.leading_side,
                    confidence: verdict.confidence,
                    reasoning: verdict.reasoning,
                    bet_type: verdict.bet_type,
                }),
                Assessment::Skip(reason) => {
                    debug!(
                        "skipping {} '{}' vs '{}': {}",
                        event.sport, event.side_a, event.side_b, reason
                    );
                    report.skipped.push(SkippedEvent {
                        side_a: event.side_a.clone(),
                        side_b: event.side_b.clone(),
                        reason,
                    });
                }
            }
        }
        Ok(report)
    }

    fn analyze(&self, event: &LiveEvent, stats_events: &[StatsEvent]) -> Assessment {
        let rule = self.rule_for(event);
        match rule.eligibility(event) {
            Eligibility::Eligible => {}
            Eligibility::NotEligible => return Assessment::Skip(SkipReason::NotEligible),
            Eligibility::Malformed => return Assessment::Skip(SkipReason::MalformedEvent),
        }

        let candidates = stats_events.iter().filter(|s| s.sport == event.sport);
        let Some(found) = self
            .matcher
            .match_pair(&event.side_a, &event.side_b, candidates)
        else {
            return Assessment::Skip(SkipReason::NoMatch);
        };
        debug!(
            "matched '{}' vs '{}' to stats '{}' vs '{}' ({:.2})",
            event.side_a, event.side_b, found.event.side_a, found.event.side_b, found.confidence
        );

        let assessment = rule.assess(event, found.event.oriented(found.swapped));
        let Assessment::Verdict(verdict) = assessment else {
            return assessment;
        };

        // Gates after scoring so the skip reason carries the computed
        // confidence.
        if event.locked {
            return Assessment::Skip(SkipReason::Locked);
        }
        if verdict.confidence < self.min_confidence {
            return Assessment::Skip(SkipReason::LowConfidence(verdict.confidence));
        }
        Assessment::Verdict(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FormResult::{self, *};
    use crate::models::{Side, Sport, StatsProfile};

    fn pipeline() -> AnalysisPipeline {
        AnalysisPipeline::new(AliasTable::with_defaults(), &PipelineConfig::default())
    }

    fn football_event(side_a: &str, side_b: &str, score: &str, minute: u32) -> LiveEvent {
        LiveEvent {
            sport: Sport::Football,
            side_a: side_a.into(),
            side_b: side_b.into(),
            score: score.into(),
            games: None,
            minute: Some(minute),
            half: None,
            odds: None,
            locked: false,
            league: Some("La Liga".into()),
        }
    }

    fn profile(form: &[FormResult], position: u32, scoring_rate: f64) -> StatsProfile {
        StatsProfile {
            recent_form: form.to_vec(),
            position,
            scoring_rate,
            recent_win_rate: None,
        }
    }

    fn clasico_stats() -> StatsEvent {
        StatsEvent {
            sport: Sport::Football,
            side_a: "FC Barcelona".into(),
            side_b: "Real Madrid CF".into(),
            profile_a: profile(&[Win; 5], 1, 2.6),
            profile_b: profile(&[Loss, Draw, Loss, Win, Loss], 6, 1.2),
            head_to_head: None,
        }
    }

    #[test]
    fn test_end_to_end_recommendation() {
        let live = [football_event("Barcelona", "Real Madrid", "2:0", 65)];
        let stats = [clasico_stats()];
        let report = pipeline().run(&live, &stats).unwrap();

        assert_eq!(report.recommendations.len(), 1);
        let rec = &report.recommendations[0];
        assert_eq!(rec.leading_side, Side::A);
        assert_eq!(rec.leading_name(), "Barcelona");
        assert!(rec.confidence >= 80);
        assert!(rec.reasoning.contains("form") || rec.reasoning.contains("table"));
    }

    #[test]
    fn test_reversed_stats_ordering_still_matches() {
        let live = [football_event("Barcelona", "Real Madrid", "0:2", 70)];
        // The stats feed lists the same match in the opposite order, with
        // the in-form side (Real Madrid) as its side A.
        let stats = [StatsEvent {
            sport: Sport::Football,
            side_a: "Real Madrid CF".into(),
            side_b: "FC Barcelona".into(),
            profile_a: profile(&[Win; 5], 1, 2.6),
            profile_b: profile(&[Loss, Draw, Loss, Win, Loss], 6, 1.2),
            head_to_head: None,
        }];
        let report = pipeline().run(&live, &stats).unwrap();

        // Real Madrid leads on the live feed's side B; its stats are the
        // candidate's side A, re-oriented through the swap.
        assert_eq!(report.recommendations.len(), 1);
        let rec = &report.recommendations[0];
        assert_eq!(rec.leading_side, Side::B);
        assert_eq!(rec.leading_name(), "Real Madrid");
        assert!(rec.confidence >= 80, "got {}", rec.confidence);
    }

    #[test]
    fn test_locked_event_is_skipped() {
        let mut event = football_event("Barcelona", "Real Madrid", "2:0", 65);
        event.locked = true;
        let report = pipeline().run(&[event], &[clasico_stats()]).unwrap();

        assert!(report.recommendations.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::Locked);
    }

    #[test]
    fn test_low_confidence_is_gated() {
        let live = [football_event("Levante", "Getafe", "1:0", 65)];
        let stats = [StatsEvent {
            sport: Sport::Football,
            side_a: "Levante".into(),
            side_b: "Getafe".into(),
            profile_a: profile(&[Win, Draw, Loss, Win, Draw], 10, 1.1),
            profile_b: profile(&[Win, Draw, Loss, Win, Draw], 10, 1.1),
            head_to_head: None,
        }];
        let report = pipeline().run(&live, &stats).unwrap();

        assert!(report.recommendations.is_empty());
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::LowConfidence(c) if c < 80
        ));
    }

    #[test]
    fn test_malformed_event_does_not_abort_batch() {
        let live = [
            football_event("Barcelona", "Real Madrid", "abc", 65),
            football_event("Barcelona", "Real Madrid", "2:0", 65),
        ];
        let report = pipeline().run(&live, &[clasico_stats()]).unwrap();

        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::MalformedEvent);
    }

    #[test]
    fn test_bad_data_and_no_bet_report_distinct_reasons() {
        let live = [
            football_event("Barcelona", "Real Madrid", "abc", 65),
            football_event("Barcelona", "Real Madrid", "1:1", 65),
        ];
        let report = pipeline().run(&live, &[clasico_stats()]).unwrap();

        assert_eq!(report.skipped[0].reason, SkipReason::MalformedEvent);
        assert_eq!(report.skipped[1].reason, SkipReason::NotEligible);
    }

    #[test]
    fn test_unmatched_event_is_skipped() {
        let live = [football_event("Bayern Munich", "Dortmund", "3:0", 70)];
        let report = pipeline().run(&live, &[clasico_stats()]).unwrap();

        assert!(report.recommendations.is_empty());
        assert_eq!(report.skipped[0].reason, SkipReason::NoMatch);
    }

    #[test]
    fn test_wrong_sport_candidates_are_ignored() {
        let live = [football_event("Barcelona", "Real Madrid", "2:0", 65)];
        let stats = [StatsEvent {
            sport: Sport::Handball,
            ..clasico_stats()
        }];
        let report = pipeline().run(&live, &stats).unwrap();

        assert_eq!(report.skipped[0].reason, SkipReason::NoMatch);
    }

    #[test]
    fn test_empty_feeds_error() {
        let live = [football_event("Barcelona", "Real Madrid", "2:0", 65)];
        assert!(matches!(
            pipeline().run(&[], &[clasico_stats()]),
            Err(PipelineError::EmptyFeed(FeedSide::Bookmaker))
        ));
        assert!(matches!(
            pipeline().run(&live, &[]),
            Err(PipelineError::EmptyFeed(FeedSide::Stats))
        ));
    }
}
