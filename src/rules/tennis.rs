use crate::models::{BetType, LiveEvent, OrientedStats, Side, Sport, StatsProfile};

use super::{
    clamp_confidence, form_score, parse_current_games, parse_sets, position_advantage, Assessment,
    Eligibility, SkipReason, SportRule, Verdict,
};

const BASE_CONFIDENCE: f64 = 65.0;
const MAX_CONFIDENCE: f64 = 95.0;
/// Confidence points of rating advantage per ranking place.
const RANKING_WEIGHT: f64 = 2.0;
/// Scale applied to the head-to-head win share (centered on 0.5).
const H2H_WEIGHT: f64 = 20.0;
/// Bonus when the lead is a won set rather than in-set games.
const SET_LEAD_BONUS: f64 = 10.0;
/// In-set game gap required while sets are level.
const GAME_LEAD_MARGIN: u32 = 4;
const UNDERDOG_PENALTY: f64 = 30.0;
const UNDERDOG_FLOOR: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Advantage {
    WonFirstSet,
    GameLead,
}

/// Outright-win rule for tennis: back a player who took the first set, or
/// who is running away with the current set while sets are level.
pub struct TennisRule;

impl TennisRule {
    fn leader(sets: (u32, u32), games: Option<&str>) -> Option<(Side, Advantage)> {
        match sets {
            (1, 0) => Some((Side::A, Advantage::WonFirstSet)),
            (0, 1) => Some((Side::B, Advantage::WonFirstSet)),
            (0, 0) => {
                let (games_a, games_b) = parse_current_games(games?)?;
                if games_a.abs_diff(games_b) >= GAME_LEAD_MARGIN {
                    let side = if games_a > games_b { Side::A } else { Side::B };
                    Some((side, Advantage::GameLead))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn rating(profile: &StatsProfile, opponent: &StatsProfile, h2h_share: f64) -> f64 {
        form_score(&profile.recent_form)
            + position_advantage(profile.position, opponent.position) * RANKING_WEIGHT
            + (h2h_share - 0.5) * H2H_WEIGHT
    }

    fn h2h_shares(head_to_head: Option<(u32, u32)>) -> (f64, f64) {
        match head_to_head {
            Some((wins_a, wins_b)) if wins_a + wins_b > 0 => {
                let total = (wins_a + wins_b) as f64;
                (wins_a as f64 / total, wins_b as f64 / total)
            }
            _ => (0.5, 0.5),
        }
    }
}

impl SportRule for TennisRule {
    fn sport(&self) -> Sport {
        Sport::Tennis
    }

    fn eligibility(&self, event: &LiveEvent) -> Eligibility {
        let Some(sets) = parse_sets(&event.score) else {
            return Eligibility::Malformed;
        };
        if Self::leader(sets, event.games.as_deref()).is_some() {
            Eligibility::Eligible
        } else {
            Eligibility::NotEligible
        }
    }

    fn assess(&self, event: &LiveEvent, stats: OrientedStats<'_>) -> Assessment {
        let Some(sets) = parse_sets(&event.score) else {
            return Assessment::Skip(SkipReason::MalformedEvent);
        };
        let Some((leading_side, advantage)) = Self::leader(sets, event.games.as_deref()) else {
            return Assessment::Skip(SkipReason::NotEligible);
        };

        let (share_a, share_b) = Self::h2h_shares(stats.head_to_head);
        let rating_a = Self::rating(stats.side_a, stats.side_b, share_a);
        let rating_b = Self::rating(stats.side_b, stats.side_a, share_b);

        let (leader, trailer, leader_rating, trailer_rating, leader_h2h) = match leading_side {
            Side::A => (stats.side_a, stats.side_b, rating_a, rating_b, share_a),
            Side::B => (stats.side_b, stats.side_a, rating_b, rating_a, share_b),
        };

        let mut confidence =
            (BASE_CONFIDENCE + (rating_a - rating_b).abs()).min(MAX_CONFIDENCE);
        if advantage == Advantage::WonFirstSet {
            confidence += SET_LEAD_BONUS;
        }
        let favorite_leading = leader_rating >= trailer_rating;
        if !favorite_leading {
            confidence = (confidence - UNDERDOG_PENALTY).max(UNDERDOG_FLOOR);
        }

        let mut parts = Vec::new();
        if leader.position < trailer.position {
            parts.push(format!(
                "higher ranked ({} vs {})",
                leader.position, trailer.position
            ));
        }
        if form_score(&leader.recent_form) > form_score(&trailer.recent_form) {
            parts.push("better recent form".to_string());
        }
        if leader_h2h > 0.5 {
            parts.push("head-to-head edge".to_string());
        }
        let reasoning = if parts.is_empty() {
            "statistical edge for the leader".to_string()
        } else {
            parts.join(", ")
        };

        Assessment::Verdict(Verdict {
            confidence: clamp_confidence(confidence),
            leading_side,
            reasoning,
            bet_type: BetType::OutrightWin,
        })
    }
}
