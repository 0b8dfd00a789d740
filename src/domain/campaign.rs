//! src/domain/campaign.rs

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::campaign_draft::CampaignDraft;

/// Aggregate tally of one dispatch run. On normal completion
/// `success + failed` equals the number of recipients processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SendResult {
    pub success: u64,
    pub failed: u64,
}

/// Immutable historical record of one completed dispatch run.
///
/// Created exactly once, when the run finishes (whether or not every
/// send succeeded), and never mutated afterwards.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Campaign {
    pub id: Uuid,
    pub subject: String,
    pub body_template: String,
    pub recipients_count: u64,
    pub result: SendResult,
    pub sent_at: DateTime<Utc>,
}

impl Campaign {
    /// Shapes the durable record out of a finished run: field copying,
    /// a fresh identity and a timestamp, nothing else.
    pub fn record(draft: &CampaignDraft, recipients_count: u64, result: SendResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject: draft.subject().to_owned(),
            body_template: draft.body_template().to_owned(),
            recipients_count,
            result,
            sent_at: Utc::now(),
        }
    }
}
