use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user- or system-defined categorization rule.
///
/// Rules are read-only during classification. Higher `priority` is evaluated
/// first; ties keep their input order, and the first matching rule wins
/// outright (partial matches are never merged).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorizationRule {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub debit_account_id: Uuid,
    pub credit_account_id: Uuid,
    /// Logical AND over all conditions; an empty set always matches.
    #[serde(default)]
    pub conditions: Vec<RuleCondition>,
    #[serde(default)]
    pub is_business: bool,
    #[serde(default)]
    pub priority: i32,
}

impl CategorizationRule {
    pub fn new(debit_account_id: Uuid, credit_account_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: None,
            debit_account_id,
            credit_account_id,
            conditions: Vec::new(),
            is_business: false,
            priority: 0,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_condition(mut self, condition: RuleCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Rule label used in suggestion explanations.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Custom rule")
    }
}

/// One `{field, operator, value}` predicate of a rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleCondition {
    pub field: ConditionField,
    pub operator: ConditionOperator,
    pub value: ConditionValue,
}

impl RuleCondition {
    pub fn merchant_contains(value: impl Into<String>) -> Self {
        Self {
            field: ConditionField::Merchant,
            operator: ConditionOperator::Contains,
            value: ConditionValue::Text(value.into()),
        }
    }

    pub fn merchant_equals(value: impl Into<String>) -> Self {
        Self {
            field: ConditionField::Merchant,
            operator: ConditionOperator::Equals,
            value: ConditionValue::Text(value.into()),
        }
    }

    pub fn merchant_matches(pattern: impl Into<String>) -> Self {
        Self {
            field: ConditionField::Merchant,
            operator: ConditionOperator::Matches,
            value: ConditionValue::Text(pattern.into()),
        }
    }

    pub fn category_contains(value: impl Into<String>) -> Self {
        Self {
            field: ConditionField::Category,
            operator: ConditionOperator::Contains,
            value: ConditionValue::Text(value.into()),
        }
    }

    pub fn amount(operator: ConditionOperator, value: f64) -> Self {
        Self {
            field: ConditionField::Amount,
            operator,
            value: ConditionValue::Number(value),
        }
    }

    pub fn amount_between(min: f64, max: f64) -> Self {
        Self {
            field: ConditionField::Amount,
            operator: ConditionOperator::Between,
            value: ConditionValue::Range(min, max),
        }
    }
}

/// Transaction field a condition inspects.
///
/// Persisted rules can carry field names this version does not know about;
/// those deserialize into `Unknown` and evaluate false (fail-closed, never
/// fail-open).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConditionField {
    Merchant,
    Amount,
    Category,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    Contains,
    /// Regex match; the pattern is compiled once at engine construction.
    Matches,
    GreaterThan,
    LessThan,
    /// Inclusive `[min, max]` range on the unsigned amount.
    Between,
}

/// Condition payload: a string for text predicates, a number or inclusive
/// range for amount predicates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ConditionValue {
    Text(String),
    Number(f64),
    Range(f64, f64),
}
