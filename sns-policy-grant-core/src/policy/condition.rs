//! Statement conditions.
//!
//! On the wire a statement's conditions are nested maps keyed by operator and
//! then by condition key. The model flattens them into an ordered list of
//! [`Condition`] values, which is the shape reconciliation works on.

use std::fmt;

/// A predicate restricting when a statement applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub comparison: ComparisonType,
    pub key: String,
    pub values: Vec<String>,
}

impl Condition {
    pub fn new(comparison: ComparisonType, key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            comparison,
            key: key.into(),
            values,
        }
    }

    /// Condition keys are case-insensitive in the policy language.
    pub fn has_key(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// Condition operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComparisonType {
    ArnEquals,
    ArnLike,
    ArnNotEquals,
    ArnNotLike,
    StringEquals,
    StringNotEquals,
    StringEqualsIgnoreCase,
    StringNotEqualsIgnoreCase,
    StringLike,
    StringNotLike,
    /// Any operator outside the set above (`Bool`, `IpAddress`, `...IfExists`).
    Other(String),
}

impl ComparisonType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ArnEquals => "ArnEquals",
            Self::ArnLike => "ArnLike",
            Self::ArnNotEquals => "ArnNotEquals",
            Self::ArnNotLike => "ArnNotLike",
            Self::StringEquals => "StringEquals",
            Self::StringNotEquals => "StringNotEquals",
            Self::StringEqualsIgnoreCase => "StringEqualsIgnoreCase",
            Self::StringNotEqualsIgnoreCase => "StringNotEqualsIgnoreCase",
            Self::StringLike => "StringLike",
            Self::StringNotLike => "StringNotLike",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for ComparisonType {
    fn from(name: &str) -> Self {
        match name {
            "ArnEquals" => Self::ArnEquals,
            "ArnLike" => Self::ArnLike,
            "ArnNotEquals" => Self::ArnNotEquals,
            "ArnNotLike" => Self::ArnNotLike,
            "StringEquals" => Self::StringEquals,
            "StringNotEquals" => Self::StringNotEquals,
            "StringEqualsIgnoreCase" => Self::StringEqualsIgnoreCase,
            "StringNotEqualsIgnoreCase" => Self::StringNotEqualsIgnoreCase,
            "StringLike" => Self::StringLike,
            "StringNotLike" => Self::StringNotLike,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ComparisonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serde adapter between `Vec<Condition>` and the nested `Condition` block.
pub(super) mod block {
    use super::{ComparisonType, Condition};
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;
    use std::collections::BTreeMap;

    pub fn serialize<S>(conditions: &[Condition], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut wire: BTreeMap<&str, BTreeMap<&str, &[String]>> = BTreeMap::new();
        for condition in conditions {
            wire.entry(condition.comparison.as_str())
                .or_default()
                .insert(condition.key.as_str(), condition.values.as_slice());
        }
        wire.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Condition>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = BTreeMap::<String, BTreeMap<String, Value>>::deserialize(deserializer)?;
        let mut conditions = Vec::new();
        for (operator, keys) in wire {
            let comparison = ComparisonType::from(operator.as_str());
            for (key, raw) in keys {
                let values = condition_values(raw).map_err(|found| {
                    <D::Error as de::Error>::custom(format!(
                        "unsupported value for condition {operator}/{key}: {found}"
                    ))
                })?;
                conditions.push(Condition::new(comparison.clone(), key, values));
            }
        }
        Ok(conditions)
    }

    /// Scalars are kept in their textual form; the policy language compares strings.
    fn condition_values(raw: Value) -> Result<Vec<String>, Value> {
        match raw {
            Value::Array(items) => items.into_iter().map(scalar).collect(),
            other => scalar(other).map(|value| vec![value]),
        }
    }

    fn scalar(raw: Value) -> Result<String, Value> {
        match raw {
            Value::String(s) => Ok(s),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyDocument;

    #[test]
    fn test_comparison_type_names_round_trip() {
        for name in ["ArnEquals", "ArnLike", "StringEquals", "StringNotLike"] {
            assert_eq!(ComparisonType::from(name).to_string(), name);
        }
        let other = ComparisonType::from("ArnEqualsIfExists");
        assert_eq!(
            other,
            ComparisonType::Other("ArnEqualsIfExists".to_string())
        );
        assert_eq!(other.as_str(), "ArnEqualsIfExists");
    }

    #[test]
    fn test_has_key_ignores_case() {
        let condition = Condition::new(
            ComparisonType::ArnEquals,
            "AWS:SourceArn",
            vec!["arn:aws:s3:::a".to_string()],
        );
        assert!(condition.has_key("aws:SourceArn"));
        assert!(!condition.has_key("aws:SourceAccount"));
    }

    #[test]
    fn test_condition_block_flattens_and_regroups() {
        let json = r#"{
            "Version": "2012-10-17",
            "Statement": [{
                "Sid": "s3-events",
                "Effect": "Allow",
                "Principal": "*",
                "Action": "sns:Publish",
                "Resource": "arn:aws:sns:us-west-2:123456789012:events",
                "Condition": {
                    "StringEquals": {"aws:SourceAccount": "123456789012"},
                    "ArnLike": {"aws:SourceArn": ["arn:aws:s3:::a", "arn:aws:s3:::b"]},
                    "Bool": {"aws:SecureTransport": false}
                }
            }]
        }"#;
        let policy = PolicyDocument::from_json(json).unwrap();
        let conditions = &policy.statements[0].conditions;
        assert_eq!(conditions.len(), 3);

        let arn_like = conditions
            .iter()
            .find(|c| c.comparison == ComparisonType::ArnLike)
            .unwrap();
        assert_eq!(arn_like.values, vec!["arn:aws:s3:::a", "arn:aws:s3:::b"]);

        let secure = conditions.iter().find(|c| c.has_key("aws:SecureTransport")).unwrap();
        assert_eq!(secure.comparison, ComparisonType::Other("Bool".to_string()));
        assert_eq!(secure.values, vec!["false"]);

        let value: serde_json::Value =
            serde_json::from_str(&policy.to_json().unwrap()).unwrap();
        assert_eq!(
            value["Statement"][0]["Condition"]["StringEquals"]["aws:SourceAccount"],
            serde_json::json!(["123456789012"])
        );
    }

    #[test]
    fn test_nested_object_condition_value_is_rejected() {
        let json = r#"{"Statement": [{
            "Effect": "Allow",
            "Condition": {"StringEquals": {"aws:SourceAccount": {"nested": 1}}}
        }]}"#;
        assert!(PolicyDocument::from_json(json).is_err());
    }
}
