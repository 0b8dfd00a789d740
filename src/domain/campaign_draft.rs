//! src/domain/campaign_draft.rs

use unicode_segmentation::UnicodeSegmentation;

/// A frozen subject + body-template pair.
///
/// Dispatch only ever sees drafts that made it through `parse`, so an
/// empty subject or body is a caller error at the boundary, never a
/// runtime failure mode of the engine.
#[derive(Debug, Clone)]
pub struct CampaignDraft {
    subject: String,
    body_template: String,
}

impl CampaignDraft {
    pub fn parse(subject: String, body_template: String) -> Result<CampaignDraft, String> {
        if subject.trim().is_empty() {
            return Err("a campaign subject must not be empty.".to_string());
        }

        if subject.graphemes(true).count() > 256 {
            return Err("a campaign subject must not exceed 256 characters.".to_string());
        }

        if body_template.trim().is_empty() {
            return Err("a campaign body must not be empty.".to_string());
        }

        Ok(Self {
            subject,
            body_template,
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body_template(&self) -> &str {
        &self.body_template
    }
}
