//! Field constraints.

use core::fmt;

use schemars::JsonSchema;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use tablecloth_common::Scalar;

/// Column constraints of a Table Schema field.
///
/// Both the descriptor's camelCase keys (`minLength`) and snake_case keys
/// (`min_length`) are accepted. Unrecognized keys are ignored. The order in
/// which constraints appear in the descriptor is kept in `declared_order`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    #[serde(default, alias = "min_length", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, alias = "max_length", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<serde_json::Value>")]
    pub minimum: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<serde_json::Value>")]
    pub maximum: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Permitted values.
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<Vec<serde_json::Value>>")]
    pub enum_values: Option<Vec<Scalar>>,
    /// Constraints in descriptor order. Kinds missing here (all of them for
    /// constraints built in code) follow in [`ConstraintKind::ALL`] order.
    #[serde(skip)]
    #[schemars(skip)]
    pub declared_order: Vec<ConstraintKind>,
}

/// Constraint with a formula template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintKind {
    Required,
    Unique,
    MinLength,
    MaxLength,
    Minimum,
    Maximum,
    Pattern,
}

impl ConstraintKind {
    pub const ALL: [ConstraintKind; 7] = [
        ConstraintKind::Required,
        ConstraintKind::Unique,
        ConstraintKind::MinLength,
        ConstraintKind::MaxLength,
        ConstraintKind::Minimum,
        ConstraintKind::Maximum,
        ConstraintKind::Pattern,
    ];

    /// snake_case key.
    pub fn key(self) -> &'static str {
        match self {
            ConstraintKind::Required => "required",
            ConstraintKind::Unique => "unique",
            ConstraintKind::MinLength => "min_length",
            ConstraintKind::MaxLength => "max_length",
            ConstraintKind::Minimum => "minimum",
            ConstraintKind::Maximum => "maximum",
            ConstraintKind::Pattern => "pattern",
        }
    }

    /// Kind for a descriptor key, in either casing.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "required" => Some(ConstraintKind::Required),
            "unique" => Some(ConstraintKind::Unique),
            "minLength" | "min_length" => Some(ConstraintKind::MinLength),
            "maxLength" | "max_length" => Some(ConstraintKind::MaxLength),
            "minimum" => Some(ConstraintKind::Minimum),
            "maximum" => Some(ConstraintKind::Maximum),
            "pattern" => Some(ConstraintKind::Pattern),
            _ => None,
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

struct ConstraintsVisitor;

impl<'de> Visitor<'de> for ConstraintsVisitor {
    type Value = Constraints;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of field constraints")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Constraints, A::Error> {
        let mut c = Constraints::default();
        while let Some(key) = map.next_key::<String>()? {
            if key == "enum" {
                c.enum_values = map.next_value()?;
                continue;
            }
            let Some(kind) = ConstraintKind::from_key(&key) else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };
            match kind {
                ConstraintKind::Required => c.required = map.next_value()?,
                ConstraintKind::Unique => c.unique = map.next_value()?,
                ConstraintKind::MinLength => c.min_length = map.next_value()?,
                ConstraintKind::MaxLength => c.max_length = map.next_value()?,
                ConstraintKind::Minimum => c.minimum = map.next_value()?,
                ConstraintKind::Maximum => c.maximum = map.next_value()?,
                ConstraintKind::Pattern => c.pattern = map.next_value()?,
            }
            if !c.declared_order.contains(&kind) {
                c.declared_order.push(kind);
            }
        }
        Ok(c)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Constraints, E> {
        Ok(Constraints::default())
    }
}

impl<'de> Deserialize<'de> for Constraints {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ConstraintsVisitor)
    }
}

impl Constraints {
    /// Value of one constraint, if set.
    pub fn get(&self, kind: ConstraintKind) -> Option<Scalar> {
        match kind {
            ConstraintKind::Required => self.required.map(Scalar::Boolean),
            ConstraintKind::Unique => self.unique.map(Scalar::Boolean),
            ConstraintKind::MinLength => self.min_length.map(length_scalar),
            ConstraintKind::MaxLength => self.max_length.map(length_scalar),
            ConstraintKind::Minimum => self.minimum.clone(),
            ConstraintKind::Maximum => self.maximum.clone(),
            ConstraintKind::Pattern => self.pattern.clone().map(Scalar::Text),
        }
    }

    /// Constraints that carry information, in declared order.
    ///
    /// Unset, `false`, null and empty-string values are skipped; zero is kept.
    pub fn active(&self) -> Vec<(ConstraintKind, Scalar)> {
        let undeclared = ConstraintKind::ALL
            .into_iter()
            .filter(|kind| !self.declared_order.contains(kind));
        self.declared_order
            .iter()
            .copied()
            .chain(undeclared)
            .filter_map(|kind| self.get(kind).map(|value| (kind, value)))
            .filter(|(_, value)| !value.is_blank())
            .collect()
    }

    /// Non-empty `enum` constraint values.
    pub fn enum_values(&self) -> Option<&[Scalar]> {
        self.enum_values.as_deref().filter(|v| !v.is_empty())
    }

    /// Copy with the `pattern` constraint removed.
    pub fn without_pattern(&self) -> Self {
        Self {
            pattern: None,
            ..self.clone()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.active().is_empty() && self.enum_values().is_none()
    }
}

fn length_scalar(n: u64) -> Scalar {
    i64::try_from(n).map_or(Scalar::Number(n as f64), Scalar::Int)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_both_key_casings() {
        let camel: Constraints =
            serde_yaml::from_str("{minLength: 2, maxLength: 5, required: true}").unwrap();
        let snake: Constraints =
            serde_yaml::from_str("{min_length: 2, max_length: 5, required: true}").unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel.min_length, Some(2));
    }

    #[test]
    fn ignores_unknown_keys() {
        let c: Constraints = serde_yaml::from_str("{unique: true, exclusiveMinimum: 3}").unwrap();
        assert_eq!(c.unique, Some(true));
        assert_eq!(c.active(), vec![(ConstraintKind::Unique, Scalar::Boolean(true))]);
    }

    #[test]
    fn active_keeps_declared_order_and_skips_blanks() {
        let c: Constraints = serde_yaml::from_str(
            "{pattern: '[a-z]+', maximum: 10, required: false, minimum: 0, unique: true}",
        )
        .unwrap();
        let kinds: Vec<_> = c.active().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                ConstraintKind::Pattern,
                ConstraintKind::Maximum,
                ConstraintKind::Minimum,
                ConstraintKind::Unique
            ]
        );
    }

    #[test]
    fn repeated_key_in_other_casing_keeps_first_position() {
        let c: Constraints =
            serde_json::from_str(r#"{"maxLength": 3, "unique": true, "max_length": 5}"#).unwrap();
        assert_eq!(c.max_length, Some(5));
        assert_eq!(
            c.declared_order,
            vec![ConstraintKind::MaxLength, ConstraintKind::Unique]
        );
    }

    #[test]
    fn constraints_built_in_code_use_kind_order() {
        let c = Constraints {
            maximum: Some(Scalar::Int(10)),
            required: Some(true),
            ..Constraints::default()
        };
        let kinds: Vec<_> = c.active().into_iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![ConstraintKind::Required, ConstraintKind::Maximum]);
    }

    #[test]
    fn zero_bounds_are_active() {
        for yaml in ["{minimum: 0}", "{maximum: 0}", "{minLength: 0}", "{maxLength: 0}"] {
            let c: Constraints = serde_yaml::from_str(yaml).unwrap();
            assert_eq!(c.active().len(), 1, "{yaml}");
        }
    }

    #[test]
    fn empty_pattern_and_enum_are_inactive() {
        let c: Constraints = serde_yaml::from_str("{pattern: '', enum: []}").unwrap();
        assert!(c.is_empty());
        assert_eq!(c.enum_values(), None);
    }

    #[test]
    fn enum_values_accept_scalars_only() {
        let c: Constraints = serde_yaml::from_str("{enum: [a, 1, 2.5, true]}").unwrap();
        assert_eq!(
            c.enum_values().unwrap(),
            &[
                Scalar::from("a"),
                Scalar::Int(1),
                Scalar::Number(2.5),
                Scalar::Boolean(true)
            ]
        );
        assert!(serde_yaml::from_str::<Constraints>("{enum: [[a]]}").is_err());
    }

    #[test]
    fn without_pattern_drops_only_pattern() {
        let c: Constraints = serde_yaml::from_str("{pattern: x, unique: true}").unwrap();
        let stripped = c.without_pattern();
        assert_eq!(stripped.pattern, None);
        assert_eq!(stripped.unique, Some(true));
    }
}
