use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entry::EntrySuggestion;
use crate::domain::transaction::TransactionContext;

const HISTORICAL_BOOST: f64 = 0.15;
const HISTORICAL_CAP: f64 = 0.98;
const BUSINESS_BOOST: f64 = 0.10;
const BUSINESS_CAP: f64 = 0.95;
const MERCHANT_MATCH_THRESHOLD: u32 = 3;
const CATEGORY_MATCH_THRESHOLD: u32 = 5;

/// Usage aggregate derived from past accepted entries.
///
/// Historical matches only ever adjust confidence; they never override an
/// explicit rule or change the account selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoricalMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,
    pub category: String,
    pub account_id: Uuid,
    pub count: u32,
    pub last_used: NaiveDate,
}

/// Behavioral priors used by the enhancer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserPreferences {
    /// Fraction of similar transactions the user has marked as business.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_percentage: Option<f64>,
}

/// Everything the enhancer may consult beyond the base suggestion.
#[derive(Debug, Clone)]
pub struct SuggestionContext {
    pub transaction: TransactionContext,
    pub historical_matches: Vec<HistoricalMatch>,
    pub user_preferences: Option<UserPreferences>,
}

/// Adjusts a suggestion's confidence using historical usage and behavioral
/// priors. Pure: account selection and amount are copied through untouched,
/// and confidence never decreases.
pub fn enhance_suggestion(
    base: &EntrySuggestion,
    context: &SuggestionContext,
) -> EntrySuggestion {
    let mut confidence = base.confidence;
    let mut explanation = base.explanation.clone();

    if let Some(historical) = find_historical_match(&context.transaction, &context.historical_matches)
    {
        confidence = (confidence + HISTORICAL_BOOST).min(HISTORICAL_CAP);
        explanation = format!(
            "{explanation} (You've used this category {} times before)",
            historical.count
        );
    }

    if context.transaction.is_business {
        let business_share = context
            .user_preferences
            .as_ref()
            .and_then(|prefs| prefs.business_percentage)
            .unwrap_or(0.0);
        if business_share > 0.7 {
            // The business ceiling is lower than the historical one; never let
            // it pull an already-boosted confidence back down.
            confidence = confidence.max((confidence + BUSINESS_BOOST).min(BUSINESS_CAP));
        }
    }

    EntrySuggestion {
        confidence,
        explanation,
        ..base.clone()
    }
}

/// Merchant match first (exact, case-insensitive, count >= 3), then category
/// match (first category element, count >= 5). Returns on the first
/// qualifying match.
fn find_historical_match<'a>(
    transaction: &TransactionContext,
    matches: &'a [HistoricalMatch],
) -> Option<&'a HistoricalMatch> {
    let merchant = transaction.merchant.as_deref()?.to_lowercase();

    let exact = matches.iter().find(|m| {
        m.merchant
            .as_deref()
            .map_or(false, |name| name.to_lowercase() == merchant)
    });
    if let Some(m) = exact {
        if m.count >= MERCHANT_MATCH_THRESHOLD {
            return Some(m);
        }
    }

    let first_category = transaction.category.first()?.to_lowercase();
    matches
        .iter()
        .find(|m| m.category.to_lowercase() == first_category)
        .filter(|m| m.count >= CATEGORY_MATCH_THRESHOLD)
}

/// Inputs for [`calculate_confidence`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceFactors {
    pub has_merchant_match: bool,
    pub has_category_match: bool,
    pub has_historical_data: bool,
    pub has_user_rule: bool,
}

/// Confidence composition used by alternate callers: floors first (`max`),
/// then the historical boost (`min`-capped), in this order.
pub fn calculate_confidence(suggestion: &EntrySuggestion, factors: ConfidenceFactors) -> f64 {
    let mut confidence = suggestion.confidence;

    if factors.has_user_rule {
        confidence = confidence.max(0.95);
    }
    if factors.has_merchant_match && factors.has_category_match {
        confidence = confidence.max(0.85);
    }
    if factors.has_historical_data {
        confidence = (confidence + 0.10).min(0.98);
    }

    confidence
}
