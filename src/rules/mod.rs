//! Per-sport eligibility and confidence-scoring rules.
//!
//! Every rule is a pure function of the live event and the reconciled
//! stats: no clock reads, no I/O, no randomness. Confidence is a 0-100
//! value assembled from fixed, documented sub-signal weights so a given
//! input always reproduces the same recommendation.

pub mod football;
pub mod handball;
pub mod table_tennis;
pub mod tennis;

pub use football::FootballRule;
pub use handball::HandballRule;
pub use table_tennis::TableTennisRule;
pub use tennis::TennisRule;

use std::fmt;

use crate::models::{BetType, FormResult, LiveEvent, OrientedStats, Side, Sport};

/// Form points per result in the recent-form window.
pub const FORM_WIN_POINTS: f64 = 20.0;
pub const FORM_DRAW_POINTS: f64 = 10.0;
/// Neutral score assumed when a feed reports no form history at all.
pub const FORM_UNKNOWN_SCORE: f64 = 50.0;

/// A positive scoring verdict for one event.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub confidence: u8,
    pub leading_side: Side,
    pub reasoning: String,
    pub bet_type: BetType,
}

/// Why an event produced no recommendation. Skips are normal outcomes,
/// not errors; the pipeline logs them and moves on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The sport's eligibility predicate did not hold.
    NotEligible,
    /// A required field was missing or unparsable.
    MalformedEvent,
    /// No stats-feed candidate cleared the fuzzy threshold.
    NoMatch,
    /// The bookmaker suspended betting on the event.
    Locked,
    /// Scoring confidence fell below the configured minimum.
    LowConfidence(u8),
    /// Handball totals only: projected pace matches the season average,
    /// so neither over nor under has an edge.
    NeutralPace,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotEligible => write!(f, "not eligible"),
            SkipReason::MalformedEvent => write!(f, "malformed event data"),
            SkipReason::NoMatch => write!(f, "no stats match"),
            SkipReason::Locked => write!(f, "betting locked"),
            SkipReason::LowConfidence(c) => write!(f, "low confidence ({c}%)"),
            SkipReason::NeutralPace => write!(f, "neutral pace"),
        }
    }
}

/// Outcome of scoring one eligible, reconciled event.
#[derive(Debug, Clone)]
pub enum Assessment {
    Verdict(Verdict),
    Skip(SkipReason),
}

/// Pre-scoring classification of a live event. Distinguishes an event
/// whose data could not be read from one that was read and found
/// uninteresting, so the cycle report can tell "bad data" from "no bet".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    NotEligible,
    /// A required field was missing or unparsable.
    Malformed,
}

/// One rule per sport behind a common interface; the pipeline dispatches
/// on the event's sport tag.
pub trait SportRule: Send + Sync {
    fn sport(&self) -> Sport;

    /// Pure classification over the event's raw fields.
    fn eligibility(&self, event: &LiveEvent) -> Eligibility;

    /// Convenience predicate over [`SportRule::eligibility`].
    fn is_eligible(&self, event: &LiveEvent) -> bool {
        self.eligibility(event) == Eligibility::Eligible
    }

    /// Score an eligible event against its reconciled stats. Must not
    /// panic on malformed input; degrade to `Assessment::Skip`.
    fn assess(&self, event: &LiveEvent, stats: OrientedStats<'_>) -> Assessment;
}

/// Form points over the recent window: W=20, D=10, L=0. A missing window
/// scores a neutral 50 so absent data neither helps nor hurts.
pub fn form_score(form: &[FormResult]) -> f64 {
    if form.is_empty() {
        return FORM_UNKNOWN_SCORE;
    }
    form.iter()
        .map(|result| match result {
            FormResult::Win => FORM_WIN_POINTS,
            FormResult::Draw => FORM_DRAW_POINTS,
            FormResult::Loss => 0.0,
        })
        .sum()
}

/// Positional advantage in table/ranking places (lower position is
/// better); zero when `ours` is not ahead.
pub fn position_advantage(ours: u32, theirs: u32) -> f64 {
    theirs.saturating_sub(ours) as f64
}

/// Parse a `"N:N"` goals score.
pub fn parse_goals(score: &str) -> Option<(u32, u32)> {
    let (a, b) = score.split_once(':')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

/// Parse a `"N-N"` sets (or games) score.
pub fn parse_sets(score: &str) -> Option<(u32, u32)> {
    let (a, b) = score.split_once('-')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

/// Parse the in-progress set from a per-set listing like `"6-4, 3-1"`.
pub fn parse_current_games(games: &str) -> Option<(u32, u32)> {
    parse_sets(games.rsplit(',').next()?.trim())
}

/// Round and clamp a raw confidence value to the 0-100 scale.
pub fn clamp_confidence(raw: f64) -> u8 {
    raw.round().clamp(0.0, 100.0) as u8
}
