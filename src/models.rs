use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Sports the bot knows how to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    Football,
    Tennis,
    TableTennis,
    Handball,
}

impl Sport {
    pub const ALL: [Sport; 4] = [
        Sport::Football,
        Sport::Tennis,
        Sport::TableTennis,
        Sport::Handball,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Football => "football",
            Sport::Tennis => "tennis",
            Sport::TableTennis => "table_tennis",
            Sport::Handball => "handball",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which participant of an event a result refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

/// One in-progress event as reported by the bookmaker feed.
///
/// Score fields are kept as the raw strings the feed reported; the sport
/// rules parse them and degrade to a skip when a value is malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveEvent {
    pub sport: Sport,
    pub side_a: String,
    pub side_b: String,
    /// `"2:1"` goals for football/handball, `"1-0"` sets for racket sports.
    pub score: String,
    /// Per-set game scores for racket sports, e.g. `"6-4, 3-1"`.
    pub games: Option<String>,
    /// Minutes played (football), or minutes into the current half (handball).
    pub minute: Option<u32>,
    /// Current half for handball.
    pub half: Option<u8>,
    /// Outcome label -> decimal price, as offered by the bookmaker.
    pub odds: Option<HashMap<String, f64>>,
    /// The bookmaker suspended betting on this event.
    pub locked: bool,
    pub league: Option<String>,
}

/// A single result in a participant's recent-form window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormResult {
    Win,
    Draw,
    Loss,
}

/// Per-participant statistics from the stats feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsProfile {
    /// Most recent result first, at most the last five matches.
    pub recent_form: Vec<FormResult>,
    /// League table or world-ranking position; lower is better.
    pub position: u32,
    /// Recent average goals/points scored per match.
    pub scoring_rate: f64,
    /// Recent win percentage (0-100), where the feed provides one.
    pub recent_win_rate: Option<f64>,
}

/// One event from the stats feed: the same real-world match as a
/// `LiveEvent`, but with differently-rendered names and form data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsEvent {
    pub sport: Sport,
    pub side_a: String,
    pub side_b: String,
    pub profile_a: StatsProfile,
    pub profile_b: StatsProfile,
    /// Head-to-head wins (side_a, side_b), where known.
    pub head_to_head: Option<(u32, u32)>,
}

/// Stats profiles re-oriented to a live event's participant order.
#[derive(Debug, Clone, Copy)]
pub struct OrientedStats<'a> {
    pub side_a: &'a StatsProfile,
    pub side_b: &'a StatsProfile,
    pub head_to_head: Option<(u32, u32)>,
}

impl StatsEvent {
    /// View this event's profiles in the caller's participant order.
    /// `swapped` means the caller's side A maps to this event's side B.
    pub fn oriented(&self, swapped: bool) -> OrientedStats<'_> {
        if swapped {
            OrientedStats {
                side_a: &self.profile_b,
                side_b: &self.profile_a,
                head_to_head: self.head_to_head.map(|(a, b)| (b, a)),
            }
        } else {
            OrientedStats {
                side_a: &self.profile_a,
                side_b: &self.profile_b,
                head_to_head: self.head_to_head,
            }
        }
    }
}

/// The kind of bet a recommendation proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "line")]
pub enum BetType {
    OutrightWin,
    TotalOver(u32),
    TotalUnder(u32),
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetType::OutrightWin => write!(f, "outright win"),
            BetType::TotalOver(line) => write!(f, "over {line}"),
            BetType::TotalUnder(line) => write!(f, "under {line}"),
        }
    }
}

/// An accepted betting recommendation, ready for delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub sport: Sport,
    pub side_a: String,
    pub side_b: String,
    pub score: String,
    pub leading_side: Side,
    /// Scoring confidence, 0-100. Distinct from fuzzy-match confidence.
    pub confidence: u8,
    pub reasoning: String,
    pub bet_type: BetType,
}

impl Recommendation {
    pub fn leading_name(&self) -> &str {
        match self.leading_side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(position: u32) -> StatsProfile {
        StatsProfile {
            recent_form: vec![FormResult::Win],
            position,
            scoring_rate: 1.0,
            recent_win_rate: None,
        }
    }

    #[test]
    fn oriented_stats_swap() {
        let event = StatsEvent {
            sport: Sport::Football,
            side_a: "Barcelona".into(),
            side_b: "Real Madrid".into(),
            profile_a: profile(1),
            profile_b: profile(2),
            head_to_head: Some((7, 3)),
        };

        let direct = event.oriented(false);
        assert_eq!(direct.side_a.position, 1);
        assert_eq!(direct.head_to_head, Some((7, 3)));

        let swapped = event.oriented(true);
        assert_eq!(swapped.side_a.position, 2);
        assert_eq!(swapped.head_to_head, Some((3, 7)));
    }

    #[test]
    fn bet_type_display() {
        assert_eq!(BetType::OutrightWin.to_string(), "outright win");
        assert_eq!(BetType::TotalOver(68).to_string(), "over 68");
        assert_eq!(BetType::TotalUnder(76).to_string(), "under 76");
    }

    #[test]
    fn bet_type_wire_format() {
        use serde_json::json;

        assert_eq!(
            serde_json::to_value(BetType::OutrightWin).unwrap(),
            json!({"kind": "outright_win"})
        );
        assert_eq!(
            serde_json::to_value(BetType::TotalOver(68)).unwrap(),
            json!({"kind": "total_over", "line": 68})
        );
        let back: BetType =
            serde_json::from_value(json!({"kind": "total_under", "line": 76})).unwrap();
        assert_eq!(back, BetType::TotalUnder(76));
    }
}
