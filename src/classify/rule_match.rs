use regex::Regex;
use tracing::{debug, warn};

use crate::domain::account::Account;
use crate::domain::entry::EntrySuggestion;
use crate::domain::rule::{
    CategorizationRule, ConditionField, ConditionOperator, ConditionValue, RuleCondition,
};
use crate::domain::transaction::TransactionContext;
use crate::ledger::lines::within_tolerance;

use super::Classify;

/// Confidence assigned to any user-rule match. User rules are explicit intent
/// and are maximally trusted.
const USER_RULE_CONFIDENCE: f64 = 0.95;

/// Evaluates user-defined categorization rules against transactions.
///
/// Rules are sorted once by descending priority (ties keep input order) and
/// `matches` patterns are compiled once at construction. An invalid pattern
/// makes its condition permanently false rather than failing the build.
pub struct RuleMatcher {
    rules: Vec<PreparedRule>,
}

struct PreparedRule {
    rule: CategorizationRule,
    conditions: Vec<PreparedCondition>,
}

struct PreparedCondition {
    condition: RuleCondition,
    pattern: Option<Regex>,
}

impl RuleMatcher {
    pub fn new(mut rules: Vec<CategorizationRule>) -> Self {
        // Stable sort keeps input order for equal priorities.
        rules.sort_by_key(|rule| std::cmp::Reverse(rule.priority));
        let rules = rules
            .into_iter()
            .map(|rule| {
                let conditions = rule.conditions.iter().map(prepare_condition).collect();
                PreparedRule { rule, conditions }
            })
            .collect();
        Self { rules }
    }
}

fn prepare_condition(condition: &RuleCondition) -> PreparedCondition {
    let pattern = match (&condition.operator, &condition.value) {
        (ConditionOperator::Matches, ConditionValue::Text(raw)) => match Regex::new(raw) {
            Ok(regex) => Some(regex),
            Err(error) => {
                warn!(pattern = %raw, %error, "dropping unparsable rule pattern");
                None
            }
        },
        _ => None,
    };
    PreparedCondition {
        condition: condition.clone(),
        pattern,
    }
}

impl Classify for RuleMatcher {
    fn try_classify(
        &self,
        transaction: &TransactionContext,
        accounts: &[Account],
    ) -> Option<EntrySuggestion> {
        for prepared in &self.rules {
            if !evaluate_conditions(transaction, &prepared.conditions) {
                continue;
            }
            let rule = &prepared.rule;
            let debit = accounts.iter().find(|a| a.id == rule.debit_account_id);
            let credit = accounts.iter().find(|a| a.id == rule.credit_account_id);
            if debit.is_none() || credit.is_none() {
                // Dangling account references silently skip the rule.
                debug!(rule = %rule.display_name(), "rule matched but accounts do not resolve");
                continue;
            }
            debug!(rule = %rule.display_name(), "user rule matched");
            return Some(EntrySuggestion {
                debit_account_id: rule.debit_account_id,
                credit_account_id: rule.credit_account_id,
                amount: transaction.magnitude(),
                memo: transaction.description.clone(),
                confidence: USER_RULE_CONFIDENCE,
                explanation: format!("Matched your rule: {}", rule.display_name()),
            });
        }
        None
    }
}

/// Logical AND over every condition; an empty set always matches.
fn evaluate_conditions(
    transaction: &TransactionContext,
    conditions: &[PreparedCondition],
) -> bool {
    conditions
        .iter()
        .all(|prepared| evaluate_condition(transaction, prepared))
}

fn evaluate_condition(transaction: &TransactionContext, prepared: &PreparedCondition) -> bool {
    let condition = &prepared.condition;
    match condition.field {
        ConditionField::Merchant => {
            let Some(merchant) = transaction.merchant.as_deref() else {
                return false;
            };
            let ConditionValue::Text(value) = &condition.value else {
                return false;
            };
            match condition.operator {
                ConditionOperator::Contains => {
                    merchant.to_lowercase().contains(&value.to_lowercase())
                }
                ConditionOperator::Equals => merchant.to_lowercase() == value.to_lowercase(),
                ConditionOperator::Matches => prepared
                    .pattern
                    .as_ref()
                    .map_or(false, |regex| regex.is_match(merchant)),
                _ => false,
            }
        }
        ConditionField::Amount => {
            let amount = transaction.magnitude();
            match (&condition.operator, &condition.value) {
                (ConditionOperator::Equals, ConditionValue::Number(value)) => {
                    within_tolerance(amount, *value)
                }
                (ConditionOperator::GreaterThan, ConditionValue::Number(value)) => amount > *value,
                (ConditionOperator::LessThan, ConditionValue::Number(value)) => amount < *value,
                (ConditionOperator::Between, ConditionValue::Range(min, max)) => {
                    amount >= *min && amount <= *max
                }
                _ => false,
            }
        }
        ConditionField::Category => {
            let ConditionValue::Text(value) = &condition.value else {
                return false;
            };
            let needle = value.to_lowercase();
            transaction
                .category
                .iter()
                .any(|category| category.to_lowercase().contains(&needle))
        }
        // Fields this version does not understand never match.
        ConditionField::Unknown => false,
    }
}
