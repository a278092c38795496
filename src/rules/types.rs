//! Type definitions for validation rules.

use serde::{Deserialize, Serialize};

use crate::types::{RuleId, RulePurpose};

/// A stored validation rule: a regex plus the message shown when it fails.
///
/// Rules are owned by the store. The engine only borrows a snapshot for the
/// duration of one validation pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRule {
    /// Store-assigned id; rules of one purpose run in ascending id order.
    pub id: RuleId,

    /// What input this rule guards.
    #[serde(rename = "type")]
    pub purpose: RulePurpose,

    /// Human-readable failure message, returned verbatim.
    pub description: String,

    /// Regular expression the candidate must contain a match for.
    #[serde(rename = "regex")]
    pub pattern: String,
}

/// A rule to be stored; the store assigns the id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewValidationRule {
    /// What input this rule guards.
    #[serde(rename = "type")]
    pub purpose: RulePurpose,

    /// Failure message.
    pub description: String,

    /// Regular expression.
    #[serde(rename = "regex")]
    pub pattern: String,
}

impl NewValidationRule {
    /// Creates a new rule.
    pub fn new(
        purpose: RulePurpose,
        description: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Self {
        Self {
            purpose,
            description: description.into(),
            pattern: pattern.into(),
        }
    }

    /// Attaches the store-assigned id.
    pub fn with_id(self, id: RuleId) -> ValidationRule {
        ValidationRule {
            id,
            purpose: self.purpose,
            description: self.description,
            pattern: self.pattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_json_uses_wire_names() {
        let rule = NewValidationRule::new(RulePurpose::Search, "letters only", "^[a-z]+$")
            .with_id(RuleId(4));
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["type"], "search");
        assert_eq!(json["regex"], "^[a-z]+$");
        assert_eq!(json["description"], "letters only");
    }

    #[test]
    fn test_rule_bincode_roundtrip() {
        let rule = NewValidationRule::new(RulePurpose::Add, "no digits", r"^\D*$").with_id(RuleId(1));
        let bytes = bincode::serialize(&rule).unwrap();
        let restored: ValidationRule = bincode::deserialize(&bytes).unwrap();
        assert_eq!(rule, restored);
    }
}
