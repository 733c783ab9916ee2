use tracing::trace;

use crate::models::StatsEvent;

use super::alias::AliasTable;
use super::similarity::similarity;

/// Result of reconciling a live event against the stats feed.
#[derive(Debug, Clone, Copy)]
pub struct MatchCandidate<'a> {
    pub event: &'a StatsEvent,
    /// Average of the two per-participant similarities, in [0, 1].
    pub confidence: f64,
    /// True when the live event's side A maps to the candidate's side B.
    pub swapped: bool,
}

/// Reconciles participant pairs across two feeds that render the same
/// real-world match with different name strings, possibly in reversed
/// home/away order.
///
/// A candidate matches only when *both* participants clear the threshold
/// in the same ordering; a single blended score would let one very strong
/// name drag an unrelated opponent along with it.
pub struct FuzzyMatcher {
    aliases: AliasTable,
    threshold: f64,
}

impl FuzzyMatcher {
    pub fn new(aliases: AliasTable, threshold: f64) -> Self {
        FuzzyMatcher { aliases, threshold }
    }

    /// Alias fast path first, fuzzy score otherwise.
    fn pair_score(&self, a: &str, b: &str) -> f64 {
        if self.aliases.are_aliases(a, b) {
            1.0
        } else {
            similarity(a, b)
        }
    }

    /// Find the stats event matching the given participant pair.
    ///
    /// Candidates are tried in input order and the first one with a
    /// qualifying ordering wins; when both the direct and the swapped
    /// ordering qualify, the better-averaging one is reported. This makes
    /// the result deterministic and insensitive to the caller's A/B order.
    pub fn match_pair<'a, I>(
        &self,
        side_a: &str,
        side_b: &str,
        candidates: I,
    ) -> Option<MatchCandidate<'a>>
    where
        I: IntoIterator<Item = &'a StatsEvent>,
    {
        for candidate in candidates {
            let direct_a = self.pair_score(side_a, &candidate.side_a);
            let direct_b = self.pair_score(side_b, &candidate.side_b);
            let cross_a = self.pair_score(side_a, &candidate.side_b);
            let cross_b = self.pair_score(side_b, &candidate.side_a);

            let direct_ok = direct_a >= self.threshold && direct_b >= self.threshold;
            let cross_ok = cross_a >= self.threshold && cross_b >= self.threshold;
            let direct_avg = (direct_a + direct_b) / 2.0;
            let cross_avg = (cross_a + cross_b) / 2.0;

            trace!(
                "candidate '{}' vs '{}': direct={:.3} cross={:.3}",
                candidate.side_a,
                candidate.side_b,
                direct_avg,
                cross_avg
            );

            let found = match (direct_ok, cross_ok) {
                (true, true) if cross_avg > direct_avg => Some((cross_avg, true)),
                (true, _) => Some((direct_avg, false)),
                (_, true) => Some((cross_avg, true)),
                _ => None,
            };

            if let Some((confidence, swapped)) = found {
                return Some(MatchCandidate {
                    event: candidate,
                    confidence,
                    swapped,
                });
            }
        }
        None
    }
}
