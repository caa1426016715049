//! Scored business factors and their priority annotations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// One extracted business factor (strength, weakness, objective, KPI, ...).
///
/// Descriptive fields are free-form and pass through untouched; only
/// `impact_score` is interpreted. Upstream services return scores as JSON
/// numbers or numeric strings, so the raw value is kept and coerced on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredFactor {
    /// Raw impact score as delivered (number, numeric string, or absent).
    #[serde(default, skip_serializing_if = "JsonValue::is_null")]
    pub impact_score: JsonValue,

    /// All remaining descriptive fields, passed through verbatim.
    #[serde(flatten)]
    pub fields: Map<String, JsonValue>,
}

impl ScoredFactor {
    /// Creates a factor with a numeric impact score.
    pub fn with_score(score: f64) -> Self {
        Self {
            impact_score: JsonValue::from(score),
            fields: Map::new(),
        }
    }

    /// Creates a factor with a description field and a numeric score.
    pub fn described(description: impl Into<String>, score: f64) -> Self {
        let mut fields = Map::new();
        fields.insert(
            "description".to_string(),
            JsonValue::String(description.into()),
        );
        Self {
            impact_score: JsonValue::from(score),
            fields,
        }
    }

    /// Returns the coerced numeric impact score, if the raw value is usable.
    ///
    /// JSON numbers and numeric strings coerce; null, missing, booleans,
    /// objects, arrays, and non-numeric strings do not. Non-finite values
    /// are rejected.
    pub fn impact(&self) -> Option<f64> {
        let value = match &self.impact_score {
            JsonValue::Number(n) => n.as_f64(),
            JsonValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }

    /// Returns true if the factor carries a usable numeric score.
    pub fn has_valid_score(&self) -> bool {
        self.impact().is_some()
    }
}

/// Priority bucket assigned by the Pareto prioritizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Low,
}

impl Priority {
    /// Returns the display label for this priority.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Low => "Low",
        }
    }
}

/// A factor annotated by the Pareto prioritizer.
///
/// Immutable once produced; replaced wholesale when the containing
/// analysis result is replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritizedFactor {
    /// The original factor, fields passed through.
    #[serde(flatten)]
    pub factor: ScoredFactor,

    /// 1-based position after sorting by descending impact (dense, unique).
    pub rank: u32,

    /// Running share of total impact up to and including this factor,
    /// as a percentage rounded to one decimal place.
    pub cumulative_percentage: f64,

    /// High while the cumulative share stays within the leading 80%.
    pub priority: Priority,
}
