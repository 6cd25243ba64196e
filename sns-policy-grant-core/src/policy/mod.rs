//! SNS topic access policy model.
//!
//! Mirrors the AWS policy language JSON document attached to a topic through
//! the `Policy` attribute. Statement fields the model does not know about are
//! carried through untouched so a fetched document can be written back whole.

mod condition;

pub use condition::{ComparisonType, Condition};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Policy language version written on documents created from scratch.
pub const POLICY_VERSION: &str = "2012-10-17";

/// The complete access policy of a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        rename = "Statement",
        default,
        deserialize_with = "one_or_many_statements"
    )]
    pub statements: Vec<Statement>,
}

fn default_version() -> String {
    POLICY_VERSION.to_string()
}

impl Default for PolicyDocument {
    fn default() -> Self {
        Self {
            version: default_version(),
            id: None,
            statements: Vec::new(),
        }
    }
}

impl PolicyDocument {
    /// Parse a policy document from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the document to compact JSON, the form SNS stores.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// First statement whose `Sid` equals `sid`.
    pub fn find_statement_by_sid(&self, sid: &str) -> Option<&Statement> {
        self.statements
            .iter()
            .find(|statement| statement.sid.as_deref() == Some(sid))
    }
}

/// One allow/deny rule of a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub effect: Effect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<StringOrArray>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<StringOrArray>,
    #[serde(
        rename = "Condition",
        default,
        skip_serializing_if = "Vec::is_empty",
        with = "condition::block"
    )]
    pub conditions: Vec<Condition>,
    /// Statement members outside the modelled set (`NotAction`, `NotPrincipal`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The effect of a policy statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// The principal(s) a statement applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Principal {
    /// `"*"`: everyone.
    Wildcard(WildcardPrincipal),
    /// `{"AWS": ..., "Service": ...}`
    Identities(Map<String, Value>),
}

impl Principal {
    pub fn wildcard() -> Self {
        Self::Wildcard(WildcardPrincipal)
    }
}

/// Represents the wildcard principal `"*"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPrincipal;

impl Serialize for WildcardPrincipal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str("*")
    }
}

impl<'de> Deserialize<'de> for WildcardPrincipal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == "*" {
            Ok(WildcardPrincipal)
        } else {
            Err(serde::de::Error::custom("expected \"*\""))
        }
    }
}

/// Either a single string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrArray {
    Single(String),
    Array(Vec<String>),
}

impl StringOrArray {
    /// Returns the values as a vector of string slices.
    pub fn values(&self) -> Vec<&str> {
        match self {
            StringOrArray::Single(s) => vec![s.as_str()],
            StringOrArray::Array(v) => v.iter().map(String::as_str).collect(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values().contains(&value)
    }
}

/// `Statement` may be a lone object instead of an array.
fn one_or_many_statements<'de, D>(deserializer: D) -> Result<Vec<Statement>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Box<Statement>),
        Many(Vec<Statement>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(statement) => vec![*statement],
        OneOrMany::Many(statements) => statements,
    })
}
