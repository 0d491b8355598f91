//! Structural Validator
//!
//! Walks an untyped candidate against the declarative schema and collects
//! every violation in a single pass. Never mutates the candidate.

use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use tracing::debug;
use vdp_core::schema::{ArraySpec, FieldSpec, FieldType, PROFILE_FIELDS};
use vdp_core::{ValidationResult, Violation, ViolationKind};

/// Longest string echoed back in an `actual` description
const MAX_ECHO_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    scene: Option<usize>,
    shot: Option<usize>,
}

/// Schema-driven validator.
///
/// Paths registered with [`with_exempt`](Self::with_exempt) are skipped
/// entirely, children included: the caller's value replaces them after
/// validation.
#[derive(Debug, Clone, Default)]
pub struct StructuralValidator {
    exempt: HashSet<String>,
}

impl StructuralValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exempt<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exempt.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn validate(&self, candidate: &Value) -> ValidationResult {
        let mut out = Vec::new();
        match candidate.as_object() {
            Some(root) => {
                self.walk_fields(PROFILE_FIELDS, root, "", Scope::default(), &mut out);
                check_identifiers(root, &mut out);
            }
            None => out.push(
                Violation::new(ViolationKind::TypeMismatch, "$", "candidate must be an object")
                    .expected("object")
                    .actual(json_kind(candidate)),
            ),
        }
        debug!(violations = out.len(), "structural validation finished");
        ValidationResult::from_violations(out)
    }

    fn walk_fields(
        &self,
        fields: &'static [FieldSpec],
        object: &Map<String, Value>,
        prefix: &str,
        scope: Scope,
        out: &mut Vec<Violation>,
    ) {
        for field in fields {
            let path = join(prefix, field.name);
            if self.exempt.contains(&path) {
                continue;
            }
            match object.get(field.name) {
                None if field.required => out.push(scoped(
                    Violation::new(ViolationKind::MissingRequiredField, &path, "required field is missing")
                        .expected(field.ty.describe()),
                    scope,
                )),
                None => {}
                Some(Value::Null) if !field.nullable => out.push(scoped(
                    Violation::new(ViolationKind::NullabilityViolation, &path, "field must not be null")
                        .expected(field.ty.describe())
                        .actual("null"),
                    scope,
                )),
                Some(Value::Null) => {}
                Some(value) => self.check_value(&field.ty, value, &path, field.name, scope, out),
            }
        }
    }

    fn check_value(
        &self,
        ty: &FieldType,
        value: &Value,
        path: &str,
        name: &str,
        scope: Scope,
        out: &mut Vec<Violation>,
    ) {
        let mismatch = |out: &mut Vec<Violation>| {
            out.push(scoped(
                Violation::new(ViolationKind::TypeMismatch, path, "wrong value type")
                    .expected(ty.describe())
                    .actual(json_kind(value)),
                scope,
            ))
        };

        match ty {
            FieldType::Text => {
                if !value.is_string() {
                    mismatch(out);
                }
            }
            FieldType::Pattern(pattern) => match value.as_str() {
                None => mismatch(out),
                Some(text) if !pattern.is_match(text) => out.push(scoped(
                    Violation::new(ViolationKind::PatternMismatch, path, "value does not match the required pattern")
                        .expected(pattern.describe())
                        .actual(describe(value)),
                    scope,
                )),
                Some(_) => {}
            },
            FieldType::Number => {
                if !value.is_number() {
                    mismatch(out);
                }
            }
            FieldType::Seconds => match value.as_f64() {
                None => mismatch(out),
                Some(n) if n < 0.0 => out.push(out_of_range(ty, value, path, scope)),
                Some(_) => {}
            },
            FieldType::Fraction => match value.as_f64() {
                None => mismatch(out),
                Some(n) if !(0.0..=1.0).contains(&n) => out.push(out_of_range(ty, value, path, scope)),
                Some(_) => {}
            },
            FieldType::Count => {
                if value.is_u64() {
                    return;
                }
                if value.is_i64() {
                    out.push(out_of_range(ty, value, path, scope));
                } else {
                    mismatch(out);
                }
            }
            FieldType::Enum(allowed) => match value.as_str() {
                None => mismatch(out),
                Some(text) if !allowed.contains(&text) => out.push(scoped(
                    Violation::new(ViolationKind::EnumViolation, path, "value outside the enumerated set")
                        .expected(ty.describe())
                        .actual(describe(value)),
                    scope,
                )),
                Some(_) => {}
            },
            FieldType::Object(fields) => match value.as_object() {
                None => mismatch(out),
                Some(object) => self.walk_fields(fields, object, path, scope, out),
            },
            FieldType::Array(spec) => match value.as_array() {
                None => mismatch(out),
                Some(items) => self.check_array(spec, items, path, name, scope, out),
            },
        }
    }

    fn check_array(
        &self,
        spec: &ArraySpec,
        items: &[Value],
        path: &str,
        name: &str,
        scope: Scope,
        out: &mut Vec<Violation>,
    ) {
        let len = items.len();
        let too_long = spec.max_items.is_some_and(|max| len > max);
        if len < spec.min_items || too_long {
            let expected = match spec.max_items {
                Some(max) if max == spec.min_items => format!("exactly {} items", max),
                Some(max) => format!("{} to {} items", spec.min_items, max),
                None => format!("at least {} items", spec.min_items),
            };
            out.push(scoped(
                Violation::new(ViolationKind::CardinalityViolation, path, "array length out of bounds")
                    .expected(expected)
                    .actual(format!("{} items", len)),
                scope,
            ));
        }

        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{}[{}]", path, i);
            let item_scope = enter(scope, name, i);
            if item.is_null() {
                out.push(scoped(
                    Violation::new(ViolationKind::NullabilityViolation, &item_path, "array item must not be null")
                        .expected(spec.items.describe())
                        .actual("null"),
                    item_scope,
                ));
                continue;
            }
            self.check_value(&spec.items, item, &item_path, name, item_scope, out);
        }
    }
}

/// Validate a candidate with no exempt paths.
pub fn validate(candidate: &Value) -> ValidationResult {
    StructuralValidator::new().validate(candidate)
}

// === Identifier uniqueness ===

fn check_identifiers(root: &Map<String, Value>, out: &mut Vec<Violation>) {
    let Some(scenes) = root.get("scenes").and_then(Value::as_array) else {
        return;
    };

    let mut scene_ids: HashMap<&str, usize> = HashMap::new();
    for (i, scene) in scenes.iter().enumerate() {
        if let Some(id) = scene.get("scene_id").and_then(Value::as_str) {
            if let Some(first) = scene_ids.insert(id, i) {
                scene_ids.insert(id, first);
                out.push(
                    Violation::new(
                        ViolationKind::DuplicateIdentifier,
                        format!("scenes[{}].scene_id", i),
                        format!("scene_id already used by scenes[{}]", first),
                    )
                    .expected("unique scene_id")
                    .actual(describe(&Value::String(id.to_string())))
                    .in_scene(i),
                );
            }
        }

        let Some(shots) = scene.get("shots").and_then(Value::as_array) else {
            continue;
        };
        let mut shot_ids: HashMap<&str, usize> = HashMap::new();
        for (j, shot) in shots.iter().enumerate() {
            let Some(id) = shot.get("shot_id").and_then(Value::as_str) else {
                continue;
            };
            if let Some(first) = shot_ids.insert(id, j) {
                shot_ids.insert(id, first);
                out.push(
                    Violation::new(
                        ViolationKind::DuplicateIdentifier,
                        format!("scenes[{}].shots[{}].shot_id", i, j),
                        format!("shot_id already used by shots[{}] of the same scene", first),
                    )
                    .expected("unique shot_id within the scene")
                    .actual(describe(&Value::String(id.to_string())))
                    .in_shot(i, j),
                );
            }
        }
    }
}

// === Helpers ===

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn enter(scope: Scope, array_name: &str, index: usize) -> Scope {
    match array_name {
        "scenes" if scope.scene.is_none() => Scope { scene: Some(index), shot: None },
        "shots" if scope.scene.is_some() && scope.shot.is_none() => Scope { shot: Some(index), ..scope },
        _ => scope,
    }
}

fn scoped(violation: Violation, scope: Scope) -> Violation {
    match (scope.scene, scope.shot) {
        (Some(scene), Some(shot)) => violation.in_shot(scene, shot),
        (Some(scene), None) => violation.in_scene(scene),
        _ => violation,
    }
}

fn out_of_range(ty: &FieldType, value: &Value, path: &str, scope: Scope) -> Violation {
    scoped(
        Violation::new(ViolationKind::OutOfRange, path, "number outside the allowed range")
            .expected(ty.describe())
            .actual(describe(value)),
        scope,
    )
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Short rendering of a scalar for `actual` descriptions.
fn describe(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > MAX_ECHO_CHARS => {
            let head: String = s.chars().take(MAX_ECHO_CHARS).collect();
            format!("\"{}…\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Number(n) => n.to_string(),
        other => json_kind(other).to_string(),
    }
}
