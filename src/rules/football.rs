use crate::models::{BetType, LiveEvent, OrientedStats, Side, Sport, StatsProfile};

use super::{
    clamp_confidence, form_score, parse_goals, position_advantage, Assessment, Eligibility,
    SkipReason, SportRule, Verdict,
};

/// Confidence baseline for an eligible non-draw lead.
const BASE_CONFIDENCE: f64 = 60.0;
/// Confidence cap before the underdog penalty.
const MAX_CONFIDENCE: f64 = 95.0;
/// Points of rating advantage per table place.
const POSITION_WEIGHT: f64 = 5.0;
/// Rating points per goal of recent scoring rate.
const SCORING_RATE_WEIGHT: f64 = 10.0;
/// Confidence points per point of rating gap.
const RATING_GAP_WEIGHT: f64 = 2.0;
/// Penalty when the side trailing on paper is the one in front.
const UNDERDOG_PENALTY: f64 = 40.0;
const UNDERDOG_FLOOR: f64 = 30.0;

/// Outright-win rule for football: the leading side must be ahead on a
/// non-draw scoreline deep enough into the match for the lead to mean
/// something.
pub struct FootballRule {
    /// Minimum minutes played before a lead is considered.
    pub min_minute: u32,
}

impl FootballRule {
    fn rating(profile: &StatsProfile, opponent: &StatsProfile) -> f64 {
        form_score(&profile.recent_form)
            + position_advantage(profile.position, opponent.position) * POSITION_WEIGHT
            + profile.scoring_rate * SCORING_RATE_WEIGHT
    }
}

impl SportRule for FootballRule {
    fn sport(&self) -> Sport {
        Sport::Football
    }

    fn eligibility(&self, event: &LiveEvent) -> Eligibility {
        let Some((goals_a, goals_b)) = parse_goals(&event.score) else {
            return Eligibility::Malformed;
        };
        let Some(minute) = event.minute else {
            return Eligibility::Malformed;
        };
        if goals_a != goals_b && minute >= self.min_minute {
            Eligibility::Eligible
        } else {
            Eligibility::NotEligible
        }
    }

    fn assess(&self, event: &LiveEvent, stats: OrientedStats<'_>) -> Assessment {
        let Some((goals_a, goals_b)) = parse_goals(&event.score) else {
            return Assessment::Skip(SkipReason::MalformedEvent);
        };
        if goals_a == goals_b {
            return Assessment::Skip(SkipReason::NotEligible);
        }
        let leading_side = if goals_a > goals_b { Side::A } else { Side::B };

        let rating_a = Self::rating(stats.side_a, stats.side_b);
        let rating_b = Self::rating(stats.side_b, stats.side_a);
        let (leader, trailer) = match leading_side {
            Side::A => (stats.side_a, stats.side_b),
            Side::B => (stats.side_b, stats.side_a),
        };
        let (leader_rating, trailer_rating) = match leading_side {
            Side::A => (rating_a, rating_b),
            Side::B => (rating_b, rating_a),
        };

        let mut confidence =
            (BASE_CONFIDENCE + (rating_a - rating_b).abs() * RATING_GAP_WEIGHT).min(MAX_CONFIDENCE);

        let favorite_leading = leader_rating >= trailer_rating;
        if !favorite_leading {
            confidence = (confidence - UNDERDOG_PENALTY).max(UNDERDOG_FLOOR);
        }

        let reasoning = if favorite_leading {
            let mut parts = Vec::new();
            if form_score(&leader.recent_form) > form_score(&trailer.recent_form) {
                parts.push("better recent form".to_string());
            }
            if leader.position < trailer.position {
                parts.push(format!(
                    "higher in the table ({} vs {})",
                    leader.position, trailer.position
                ));
            }
            if leader.scoring_rate > trailer.scoring_rate {
                parts.push("scoring more freely".to_string());
            }
            if parts.is_empty() {
                "statistical edge for the leader".to_string()
            } else {
                parts.join(", ")
            }
        } else {
            "leads against the run of the stats".to_string()
        };

        Assessment::Verdict(Verdict {
            confidence: clamp_confidence(confidence),
            leading_side,
            reasoning,
            bet_type: BetType::OutrightWin,
        })
    }
}
