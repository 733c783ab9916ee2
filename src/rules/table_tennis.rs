use crate::models::{BetType, LiveEvent, OrientedStats, Side, Sport, StatsProfile};

use super::{
    clamp_confidence, form_score, parse_sets, position_advantage, Assessment, Eligibility,
    SkipReason, SportRule, Verdict,
};

const BASE_CONFIDENCE: f64 = 70.0;
const MAX_CONFIDENCE: f64 = 95.0;
/// Confidence points of rating advantage per ranking place.
const RANKING_WEIGHT: f64 = 3.0;
/// Weight of the recent win-rate percentage in the rating.
const WIN_RATE_WEIGHT: f64 = 0.5;
/// Neutral win rate assumed when the feed provides none.
const WIN_RATE_UNKNOWN: f64 = 50.0;
/// Confidence points per point of rating gap.
const RATING_GAP_WEIGHT: f64 = 0.8;
/// Set-lead bonuses: a 2-0 cushion is worth more than 1-0.
const TWO_SET_BONUS: f64 = 15.0;
const ONE_SET_BONUS: f64 = 10.0;
const UNDERDOG_PENALTY: f64 = 35.0;
const UNDERDOG_FLOOR: f64 = 35.0;

/// Outright-win rule for table tennis: back a player up 1-0 or 2-0 in
/// sets. Best-of-5/7 formats make an early set cushion decisive when the
/// stats agree.
pub struct TableTennisRule;

impl TableTennisRule {
    fn leader(sets: (u32, u32)) -> Option<(Side, u32)> {
        match sets {
            (1, 0) | (2, 0) => Some((Side::A, sets.0)),
            (0, 1) | (0, 2) => Some((Side::B, sets.1)),
            _ => None,
        }
    }

    fn rating(profile: &StatsProfile, opponent: &StatsProfile) -> f64 {
        form_score(&profile.recent_form)
            + position_advantage(profile.position, opponent.position) * RANKING_WEIGHT
            + profile.recent_win_rate.unwrap_or(WIN_RATE_UNKNOWN) * WIN_RATE_WEIGHT
    }
}

impl SportRule for TableTennisRule {
    fn sport(&self) -> Sport {
        Sport::TableTennis
    }

    fn eligibility(&self, event: &LiveEvent) -> Eligibility {
        let Some(sets) = parse_sets(&event.score) else {
            return Eligibility::Malformed;
        };
        if Self::leader(sets).is_some() {
            Eligibility::Eligible
        } else {
            Eligibility::NotEligible
        }
    }

    fn assess(&self, event: &LiveEvent, stats: OrientedStats<'_>) -> Assessment {
        let Some(sets) = parse_sets(&event.score) else {
            return Assessment::Skip(SkipReason::MalformedEvent);
        };
        let Some((leading_side, sets_up)) = Self::leader(sets) else {
            return Assessment::Skip(SkipReason::NotEligible);
        };

        let rating_a = Self::rating(stats.side_a, stats.side_b);
        let rating_b = Self::rating(stats.side_b, stats.side_a);
        let (leader, trailer, leader_rating, trailer_rating) = match leading_side {
            Side::A => (stats.side_a, stats.side_b, rating_a, rating_b),
            Side::B => (stats.side_b, stats.side_a, rating_b, rating_a),
        };

        let mut confidence = (BASE_CONFIDENCE + (rating_a - rating_b).abs() * RATING_GAP_WEIGHT)
            .min(MAX_CONFIDENCE);
        confidence += if sets_up == 2 {
            TWO_SET_BONUS
        } else {
            ONE_SET_BONUS
        };
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
        if let (Some(leader_rate), Some(trailer_rate)) =
            (leader.recent_win_rate, trailer.recent_win_rate)
        {
            if leader_rate > trailer_rate {
                parts.push(format!("steadier results ({leader_rate:.0}% wins)"));
            }
        }
        let reasoning = if parts.is_empty() {
            format!("{sets_up}-0 cushion in sets")
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FormResult::{self, *};

    fn event(sets: &str) -> LiveEvent {
        LiveEvent {
            sport: Sport::TableTennis,
            side_a: "Fan Zhendong".into(),
            side_b: "Hugo Calderano".into(),
            score: sets.into(),
            games: Some("11-7, 11-9".into()),
            minute: None,
            half: None,
            odds: None,
            locked: false,
            league: Some("WTT Champions".into()),
        }
    }

    fn profile(form: &[FormResult], ranking: u32, win_rate: f64) -> StatsProfile {
        StatsProfile {
            recent_form: form.to_vec(),
            position: ranking,
            scoring_rate: 0.0,
            recent_win_rate: Some(win_rate),
        }
    }

    fn stats<'a>(a: &'a StatsProfile, b: &'a StatsProfile) -> OrientedStats<'a> {
        OrientedStats {
            side_a: a,
            side_b: b,
            head_to_head: None,
        }
    }

    #[test]
    fn test_eligibility() {
        let rule = TableTennisRule;
        assert!(rule.is_eligible(&event("1-0")));
        assert!(rule.is_eligible(&event("2-0")));
        assert!(rule.is_eligible(&event("0-2")));
        assert!(!rule.is_eligible(&event("0-0")));
        assert!(!rule.is_eligible(&event("2-1")));
        assert_eq!(rule.eligibility(&event("broken")), Eligibility::Malformed);
    }

    #[test]
    fn test_two_set_lead_beats_one_set_lead() {
        let rule = TableTennisRule;
        // Rating gap kept small so the pre-bonus cap is not hit.
        let a = profile(&[Win, Win, Loss, Win, Loss], 3, 80.0);
        let b = profile(&[Win, Loss, Win, Loss, Win], 4, 76.0);
        let one = rule.assess(&event("1-0"), stats(&a, &b));
        let two = rule.assess(&event("2-0"), stats(&a, &b));
        let (Assessment::Verdict(one_v), Assessment::Verdict(two_v)) = (one, two) else {
            panic!("expected verdicts");
        };
        assert_eq!(two_v.confidence - one_v.confidence, 5);
        assert!(two_v.confidence >= 80);
    }

    #[test]
    fn test_underdog_ahead_is_penalized() {
        let rule = TableTennisRule;
        // Leader is ranked far below and out of form.
        let a = profile(&[Loss, Win, Win, Win, Loss], 8, 75.0);
        let b = profile(&[Win; 5], 2, 90.0);
        let Assessment::Verdict(v) = rule.assess(&event("2-0"), stats(&a, &b)) else {
            panic!("expected verdict");
        };
        assert_eq!(v.leading_side, Side::A);
        assert!(v.confidence < 80, "got {}", v.confidence);
    }

    #[test]
    fn test_reasoning_mentions_ranking_and_win_rate() {
        let rule = TableTennisRule;
        let a = profile(&[Win; 5], 1, 95.0);
        let b = profile(&[Loss; 5], 9, 40.0);
        let Assessment::Verdict(v) = rule.assess(&event("2-0"), stats(&a, &b)) else {
            panic!("expected verdict");
        };
        assert!(v.reasoning.contains("ranked"));
        assert!(v.reasoning.contains("95% wins"));
    }
}
