//! Pareto (80/20) prioritization over scored business factors.
//!
//! Ranks factors by descending impact and flags the leading subset that
//! stays within 80% of total impact as High priority. Pure transformation:
//! no side effects, never fails, degrades to documented edge-case behavior
//! on bad input.

use serde_json::Value as JsonValue;

use super::{AnalysisKind, Priority, PrioritizedFactor, ScoredFactor};

/// Cumulative-share threshold separating High from Low priority.
const HIGH_PRIORITY_THRESHOLD: f64 = 80.0;

/// Calculator applying 80/20 prioritization to scored factors.
pub struct ParetoAnalyzer;

impl ParetoAnalyzer {
    /// Annotates factors with `rank`, `cumulative_percentage`, and `priority`.
    ///
    /// Factors are stably sorted by descending impact; the running share of
    /// total impact is rounded to one decimal and compared against the 80%
    /// threshold. The factor that crosses the threshold is already Low.
    ///
    /// # Edge Cases
    ///
    /// - Empty input: empty output.
    /// - No factor has a usable score: original order kept, all shares 0,
    ///   all Low, rank = original 1-based index.
    /// - Usable scores summing to zero: stable sort still applied, all
    ///   shares 0, all Low, sequential rank.
    /// - A mix of usable and unusable scores: unusable factors are dropped.
    ///   The asymmetry against the no-usable-scores case is intentional
    ///   compatibility with the upstream contract.
    pub fn prioritize(factors: Vec<ScoredFactor>) -> Vec<PrioritizedFactor> {
        if factors.is_empty() {
            return Vec::new();
        }

        if !factors.iter().any(ScoredFactor::has_valid_score) {
            return factors
                .into_iter()
                .enumerate()
                .map(|(index, factor)| PrioritizedFactor {
                    factor,
                    rank: (index + 1) as u32,
                    cumulative_percentage: 0.0,
                    priority: Priority::Low,
                })
                .collect();
        }

        let mut scored: Vec<(f64, ScoredFactor)> = factors
            .into_iter()
            .filter_map(|factor| factor.impact().map(|impact| (impact, factor)))
            .collect();

        // Stable sort keeps first-appearance order for equal scores.
        scored.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        let total: f64 = scored.iter().map(|(impact, _)| impact).sum();
        let mut running = 0.0;

        scored
            .into_iter()
            .enumerate()
            .map(|(index, (impact, factor))| {
                let cumulative_percentage = if total == 0.0 {
                    0.0
                } else {
                    running += impact;
                    round_one_decimal(running / total * 100.0)
                };
                let priority = if total != 0.0 && cumulative_percentage <= HIGH_PRIORITY_THRESHOLD
                {
                    Priority::High
                } else {
                    Priority::Low
                };
                PrioritizedFactor {
                    factor,
                    rank: (index + 1) as u32,
                    cumulative_percentage,
                    priority,
                }
            })
            .collect()
    }

    /// Applies prioritization in place to every scored-factor array of a
    /// validated response payload.
    ///
    /// Arrays named by the kind's scored-factor paths are replaced by their
    /// annotated versions; everything else passes through untouched. Paths
    /// that are absent or not arrays are left alone - shape validation has
    /// already decided what is required.
    pub fn annotate_payload(kind: AnalysisKind, mut payload: JsonValue) -> JsonValue {
        for path in kind.scored_factor_paths() {
            let Some(entry) = payload.get_mut(*path) else {
                continue;
            };
            let Some(items) = entry.as_array() else {
                continue;
            };

            let factors: Vec<ScoredFactor> = items
                .iter()
                .cloned()
                .map(serde_json::from_value)
                .collect::<Result<_, _>>()
                .unwrap_or_default();
            if factors.is_empty() && !items.is_empty() {
                continue;
            }

            let annotated = Self::prioritize(factors);
            *entry = serde_json::to_value(annotated).unwrap_or(JsonValue::Array(Vec::new()));
        }
        payload
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
