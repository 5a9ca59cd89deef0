// =============================================================================
// Multi-Timeframe Confluence
// =============================================================================
//
// Blends a daily and a weekly basic confidence result with the weights and
// bias table of a confluence profile.  When the weekly result is missing or
// was itself a fallback, the daily score and bias pass through unchanged.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::Bias;

use super::confidence::ConfidenceResult;
use super::profile::ConfluenceProfile;
use super::weighted_score::final_score;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceResult {
    pub profile: String,
    pub score: u8,
    pub bias: Bias,
    /// Daily reasons followed by the confluence reasons.
    pub reasons: Vec<String>,
    pub confluence_reasons: Vec<String>,
    /// Whether a weekly result took part in the blend.
    pub blended: bool,
    pub daily: ConfidenceResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly: Option<ConfidenceResult>,
}

pub fn compute_confluence(
    profile: &ConfluenceProfile,
    daily: &ConfidenceResult,
    weekly: Option<&ConfidenceResult>,
) -> ConfluenceResult {
    let usable = weekly.filter(|w| w.sufficient && daily.sufficient);

    let Some(weekly) = usable else {
        debug!(profile = %profile.name, score = daily.score, "Confluence: daily only");
        return ConfluenceResult {
            profile: profile.name.clone(),
            score: daily.score,
            bias: daily.bias,
            reasons: daily.reasons.clone(),
            confluence_reasons: Vec::new(),
            blended: false,
            daily: daily.clone(),
            weekly: weekly.cloned(),
        };
    };

    let score = final_score(
        daily.score as f64 * profile.daily_weight + weekly.score as f64 * profile.weekly_weight,
    );
    let bias = profile.bias.classify(score as f64);

    let mut confluence_reasons = Vec::new();
    if profile.alignment_reasons {
        if daily.bias == weekly.bias {
            confluence_reasons.push(format!("Daily & Weekly aligned ({})", weekly.bias));
        } else {
            confluence_reasons.push(format!(
                "Daily ({}) vs Weekly ({}) divergence",
                daily.bias, weekly.bias
            ));
        }
    }

    let mut reasons = daily.reasons.clone();
    reasons.extend(confluence_reasons.iter().cloned());

    debug!(
        profile = %profile.name,
        daily = daily.score,
        weekly = weekly.score,
        score,
        bias = %bias,
        "Confluence scored"
    );

    ConfluenceResult {
        profile: profile.name.clone(),
        score,
        bias,
        reasons,
        confluence_reasons,
        blended: true,
        daily: daily.clone(),
        weekly: Some(weekly.clone()),
    }
}
