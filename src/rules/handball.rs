use crate::models::{BetType, LiveEvent, OrientedStats, Side, Sport};

use super::{
    clamp_confidence, form_score, parse_goals, Assessment, Eligibility, SkipReason, SportRule,
    Verdict,
};

/// Goal margin that qualifies an event for an outright-win tip.
const OUTRIGHT_MARGIN: u32 = 5;
/// Base confidence for an outright tip before statistical adjustment.
const OUTRIGHT_BASE: f64 = 60.0;
/// Confidence points per goal of margin.
const MARGIN_WEIGHT: f64 = 5.0;

/// Totals are considered only in the second half, within this window of
/// minutes into that half.
const TOTAL_WINDOW: (u32, u32) = (10, 45);
/// Regulation length of the first half.
const FIRST_HALF_MINUTES: u32 = 30;
/// Full regulation time used for pace projection.
const FULL_TIME_MINUTES: u32 = 60;
/// The over line sits this far under the projected total, the under line
/// the same distance above it.
const TOTAL_BAND_MARGIN: u32 = 4;

/// Combined rule for handball: a big-margin outright win, or an
/// over/under tip from the scoring pace in the second half.
pub struct HandballRule;

impl HandballRule {
    fn in_total_window(event: &LiveEvent) -> bool {
        event.half == Some(2)
            && event
                .minute
                .is_some_and(|m| (TOTAL_WINDOW.0..=TOTAL_WINDOW.1).contains(&m))
    }

    fn assess_outright(
        &self,
        goals: (u32, u32),
        margin: u32,
        stats: OrientedStats<'_>,
    ) -> Assessment {
        let leading_side = if goals.0 > goals.1 { Side::A } else { Side::B };
        let (leader, trailer) = match leading_side {
            Side::A => (stats.side_a, stats.side_b),
            Side::B => (stats.side_b, stats.side_a),
        };

        let base = (OUTRIGHT_BASE + margin as f64 * MARGIN_WEIGHT).min(95.0);

        // Count the leader's statistical advantages: recent form, table
        // position, season scoring rate.
        let mut advantages = 0;
        if form_score(&leader.recent_form) > form_score(&trailer.recent_form) {
            advantages += 1;
        }
        if leader.position < trailer.position {
            advantages += 1;
        }
        if leader.scoring_rate > trailer.scoring_rate {
            advantages += 1;
        }

        let (confidence, reasoning) = match advantages {
            2 | 3 => (
                (base + 15.0).min(95.0),
                format!("{margin}-goal lead backed by form and table position"),
            ),
            1 => (
                (base + 10.0).min(90.0),
                format!("{margin}-goal lead with a statistical edge"),
            ),
            _ => (
                (base - 10.0).max(50.0),
                format!("{margin}-goal lead against the run of the stats"),
            ),
        };

        Assessment::Verdict(Verdict {
            confidence: clamp_confidence(confidence),
            leading_side,
            reasoning,
            bet_type: BetType::OutrightWin,
        })
    }

    fn assess_total(
        &self,
        goals: (u32, u32),
        minute: u32,
        stats: OrientedStats<'_>,
    ) -> Assessment {
        let minutes_played = minute + FIRST_HALF_MINUTES;
        let total_goals = goals.0 + goals.1;

        // Integer ceiling division keeps the projection exact.
        let projected =
            (total_goals * FULL_TIME_MINUTES + minutes_played - 1) / minutes_played;
        let over_line = projected.saturating_sub(TOTAL_BAND_MARGIN);
        let under_line = projected + TOTAL_BAND_MARGIN;

        // Pace is judged against what these two sides usually combine for.
        let season_expected = stats.side_a.scoring_rate + stats.side_b.scoring_rate;
        let pace_gap = projected as f64 - season_expected;

        let bet_type = if pace_gap > 0.0 {
            BetType::TotalOver(over_line)
        } else if pace_gap < 0.0 {
            BetType::TotalUnder(under_line)
        } else {
            return Assessment::Skip(SkipReason::NeutralPace);
        };

        let confidence = if pace_gap.abs() >= 10.0 {
            85
        } else if pace_gap.abs() >= 5.0 {
            80
        } else {
            75
        };

        let pace = if pace_gap > 0.0 { "fast" } else { "slow" };
        let reasoning = format!(
            "{pace} pace: projected {projected} vs season average {season_expected:.0}"
        );
        let leading_side = if goals.1 > goals.0 { Side::B } else { Side::A };

        Assessment::Verdict(Verdict {
            confidence,
            leading_side,
            reasoning,
            bet_type,
        })
    }
}

impl SportRule for HandballRule {
    fn sport(&self) -> Sport {
        Sport::Handball
    }

    fn eligibility(&self, event: &LiveEvent) -> Eligibility {
        let Some((goals_a, goals_b)) = parse_goals(&event.score) else {
            return Eligibility::Malformed;
        };
        if goals_a.abs_diff(goals_b) >= OUTRIGHT_MARGIN || Self::in_total_window(event) {
            Eligibility::Eligible
        } else {
            Eligibility::NotEligible
        }
    }

    fn assess(&self, event: &LiveEvent, stats: OrientedStats<'_>) -> Assessment {
        let Some(goals) = parse_goals(&event.score) else {
            return Assessment::Skip(SkipReason::MalformedEvent);
        };
        let margin = goals.0.abs_diff(goals.1);

        if margin >= OUTRIGHT_MARGIN {
            self.assess_outright(goals, margin, stats)
        } else if Self::in_total_window(event) {
            match event.minute {
                Some(minute) => self.assess_total(goals, minute, stats),
                None => Assessment::Skip(SkipReason::MalformedEvent),
            }
        } else {
            Assessment::Skip(SkipReason::NotEligible)
        }
    }
}
