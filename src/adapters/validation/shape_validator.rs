//! Declarative shape validation for producer payloads.
//!
//! Each analysis kind declares its response shape as a static field table;
//! one walker applies every table uniformly. All violations in a payload
//! are reported together, with field paths.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::Value as JsonValue;

use crate::domain::analysis::AnalysisKind;
use crate::ports::{ShapeValidator, ShapeViolation, ShapeViolations};

/// Expected type of one declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    /// A JSON object.
    Object,
    /// A JSON array (element types unchecked).
    Array,
    /// An array of factor objects, each with a string `description`.
    FactorArray,
    /// A JSON string.
    Text,
}

/// One required field of a response shape.
#[derive(Debug, Clone, Copy)]
struct FieldSpec {
    name: &'static str,
    kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

/// Required fields per analysis kind.
static RESPONSE_SHAPES: Lazy<HashMap<AnalysisKind, &'static [FieldSpec]>> = Lazy::new(|| {
    const SWOT: &[FieldSpec] = &[
        field("strengths", FieldKind::FactorArray),
        field("weaknesses", FieldKind::FactorArray),
        field("opportunities", FieldKind::FactorArray),
        field("threats", FieldKind::FactorArray),
    ];
    const KEY_INDICATORS: &[FieldSpec] = &[field("indicators", FieldKind::FactorArray)];
    const MISSION_VISION: &[FieldSpec] = &[
        field("mission", FieldKind::Object),
        field("vision", FieldKind::Object),
        field("alignment_gaps", FieldKind::Array),
    ];
    const OBJECTIVES: &[FieldSpec] = &[field("objectives", FieldKind::FactorArray)];

    let mut shapes: HashMap<AnalysisKind, &'static [FieldSpec]> = HashMap::new();
    shapes.insert(AnalysisKind::Swot, SWOT);
    shapes.insert(AnalysisKind::KeyIndicators, KEY_INDICATORS);
    shapes.insert(AnalysisKind::MissionVision, MISSION_VISION);
    shapes.insert(AnalysisKind::Objectives, OBJECTIVES);
    shapes
});

/// Required fields of the workflow callback result, shared by all kinds.
static WORKFLOW_RESULT_SHAPE: &[FieldSpec] = &[
    field("insights", FieldKind::Array),
    field("summary", FieldKind::Text),
];

/// Shape validator driven by the static field tables above.
#[derive(Debug, Default)]
pub struct DeclarativeShapeValidator;

impl DeclarativeShapeValidator {
    /// Creates a validator.
    pub fn new() -> Self {
        Self
    }

    fn check(specs: &[FieldSpec], payload: &JsonValue) -> Result<(), ShapeViolations> {
        let Some(object) = payload.as_object() else {
            return Err(ShapeViolations::single("root", "expected object"));
        };

        let mut violations = Vec::new();
        for spec in specs {
            let Some(value) = object.get(spec.name) else {
                violations.push(ShapeViolation::new(spec.name, "missing required field"));
                continue;
            };
            Self::check_field(spec, value, &mut violations);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ShapeViolations::new(violations))
        }
    }

    fn check_field(spec: &FieldSpec, value: &JsonValue, violations: &mut Vec<ShapeViolation>) {
        match spec.kind {
            FieldKind::Object => {
                if !value.is_object() {
                    violations.push(ShapeViolation::new(spec.name, "expected object"));
                }
            }
            FieldKind::Array => {
                if !value.is_array() {
                    violations.push(ShapeViolation::new(spec.name, "expected array"));
                }
            }
            FieldKind::Text => {
                if !value.is_string() {
                    violations.push(ShapeViolation::new(spec.name, "expected string"));
                }
            }
            FieldKind::FactorArray => {
                let Some(items) = value.as_array() else {
                    violations.push(ShapeViolation::new(spec.name, "expected array"));
                    return;
                };
                for (index, item) in items.iter().enumerate() {
                    let path = format!("{}[{}]", spec.name, index);
                    let Some(object) = item.as_object() else {
                        violations.push(ShapeViolation::new(path, "expected object"));
                        continue;
                    };
                    match object.get("description") {
                        Some(description) if description.is_string() => {}
                        Some(_) => violations.push(ShapeViolation::new(
                            format!("{}.description", path),
                            "expected string",
                        )),
                        None => violations.push(ShapeViolation::new(
                            format!("{}.description", path),
                            "missing required field",
                        )),
                    }
                }
            }
        }
    }
}

impl ShapeValidator for DeclarativeShapeValidator {
    fn validate(&self, kind: AnalysisKind, payload: &JsonValue) -> Result<(), ShapeViolations> {
        let specs = RESPONSE_SHAPES
            .get(&kind)
            .copied()
            .unwrap_or_default();
        Self::check(specs, payload)
    }

    fn validate_workflow_result(&self, payload: &JsonValue) -> Result<(), ShapeViolations> {
        Self::check(WORKFLOW_RESULT_SHAPE, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> DeclarativeShapeValidator {
        DeclarativeShapeValidator::new()
    }

    #[test]
    fn every_kind_has_a_declared_shape() {
        for kind in AnalysisKind::all() {
            assert!(
                RESPONSE_SHAPES.contains_key(kind),
                "no shape declared for {}",
                kind
            );
        }
    }

    #[test]
    fn valid_swot_payload_passes() {
        let payload = json!({
            "strengths": [{"description": "brand", "impact_score": 9}],
            "weaknesses": [],
            "opportunities": [{"description": "exports", "impact_score": "6"}],
            "threats": []
        });
        assert!(validator().validate(AnalysisKind::Swot, &payload).is_ok());
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let payload = json!({"strengths": []});
        let err = validator()
            .validate(AnalysisKind::Swot, &payload)
            .unwrap_err();
        assert_eq!(err.violations.len(), 3);
        assert!(err.summary().contains("weaknesses"));
        assert!(err.summary().contains("opportunities"));
        assert!(err.summary().contains("threats"));
    }

    #[test]
    fn non_object_root_is_rejected() {
        let err = validator()
            .validate(AnalysisKind::Objectives, &json!([1, 2, 3]))
            .unwrap_err();
        assert_eq!(err.violations[0].path, "root");
    }

    #[test]
    fn factor_items_need_string_descriptions() {
        let payload = json!({
            "objectives": [
                {"description": "grow", "impact_score": 5},
                {"impact_score": 3},
                {"description": 42},
                "not an object"
            ]
        });
        let err = validator()
            .validate(AnalysisKind::Objectives, &payload)
            .unwrap_err();

        let paths: Vec<&str> = err.violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "objectives[1].description",
                "objectives[2].description",
                "objectives[3]"
            ]
        );
    }

    #[test]
    fn mission_vision_checks_nested_kinds() {
        let payload = json!({
            "mission": {"statement": "feed people", "assessment": "clear"},
            "vision": "not an object",
            "alignment_gaps": []
        });
        let err = validator()
            .validate(AnalysisKind::MissionVision, &payload)
            .unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].path, "vision");
    }

    #[test]
    fn workflow_result_shape_is_enforced() {
        let ok = json!({"insights": [], "summary": "fine"});
        assert!(validator().validate_workflow_result(&ok).is_ok());

        let bad = json!({"insights": {}, "summary": 1});
        let err = validator().validate_workflow_result(&bad).unwrap_err();
        assert_eq!(err.violations.len(), 2);
    }
}
