//! src/routes/campaigns.rs

use std::fmt::Formatter;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use tokio::sync::mpsc;

use crate::dispatch::engine::{CampaignRun, DispatchError, DispatchProgress};
use crate::domain::campaign::Campaign;
use crate::domain::campaign_draft::CampaignDraft;
use crate::ingest::roster::parse_roster;
use crate::mail::send_email::EmailClient;
use crate::store::CampaignStore;
use crate::utils::error_helpers::error_chain_fmt;

#[derive(serde::Deserialize)]
pub struct CampaignRequest {
    subject: String,
    body: String,
    roster: String,
}

#[derive(thiserror::Error)]
pub enum PublishError {
    #[error("{0}")]
    ValidationError(String),

    #[error("a campaign needs at least one recipient")]
    NoRecipients,

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for PublishError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for PublishError {
    fn status_code(&self) -> StatusCode {
        match self {
            PublishError::ValidationError(_) | PublishError::NoRecipients => {
                StatusCode::BAD_REQUEST
            }
            PublishError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Validates the draft, parses the roster, runs the dispatch loop and
/// appends the resulting record. Per-recipient failures end up in the
/// tally, never in the response status.
#[tracing::instrument(
    name = "Publish campaign",
    skip(request, email_client, store),
    fields(subject = %request.subject)
)]
pub async fn publish_campaign(
    request: web::Json<CampaignRequest>,
    email_client: web::Data<EmailClient>,
    store: web::Data<CampaignStore>,
) -> Result<HttpResponse, PublishError> {
    let request = request.into_inner();

    let draft = CampaignDraft::parse(request.subject, request.body)
        .map_err(PublishError::ValidationError)?;
    let recipients = parse_roster(&request.roster)
        .map_err(|error| PublishError::ValidationError(error.to_string()))?;

    let (progress, updates) = mpsc::unbounded_channel();
    let reporter = tokio::spawn(log_progress(updates));

    let run = CampaignRun::new(&email_client).with_progress(progress);
    let result = run
        .dispatch(&draft, &recipients)
        .await
        .map_err(|error| match error {
            DispatchError::NoRecipients => PublishError::NoRecipients,
        })?;

    // the run holds the last progress sender; dropping it lets the
    // reporter drain what is left and finish.
    drop(run);
    let _ = reporter.await;

    let campaign = Campaign::record(&draft, recipients.len() as u64, result);
    store.append(campaign.clone()).await;

    Ok(HttpResponse::Ok().json(campaign))
}

async fn log_progress(mut updates: mpsc::UnboundedReceiver<DispatchProgress>) {
    while let Some(update) = updates.recv().await {
        tracing::info!(
            recipient = %update.recipient_email,
            sent = update.sent,
            failed = update.failed,
            total = update.total,
            "Campaign progress"
        );
    }
}

#[tracing::instrument(name = "List campaign history", skip(store))]
pub async fn campaign_history(store: web::Data<CampaignStore>) -> HttpResponse {
    HttpResponse::Ok().json(store.list().await)
}
