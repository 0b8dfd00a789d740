//! src/dispatch/engine.rs
//!
//! The campaign dispatch loop: one personalized send per roster entry,
//! in roster order, with per-recipient failure tolerance and a live
//! progress feed.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::dispatch::render::personalize;
use crate::domain::campaign::SendResult;
use crate::domain::campaign_draft::CampaignDraft;
use crate::domain::recipient::{Recipient, RecipientList};
use crate::mail::send_email::{EmailClient, SendError};

/// Cooperative cancellation for an in-flight dispatch run.
///
/// Cloning hands out another handle onto the same signal. The engine
/// polls `is_cancelled` before issuing each send; a send already in
/// flight is always awaited to completion, never abandoned.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn cancel(&self) {
        // every receiver may already be gone; nothing left to signal then.
        let _ = self.tx.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// One progress event per completed attempt.
///
/// The counts are running totals; the last event of a run agrees with
/// the returned `SendResult`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DispatchProgress {
    pub recipient_email: String,
    pub sent: u64,
    pub failed: u64,
    pub total: u64,
}

/// Per-recipient result of a single attempt. Attempts are never retried
/// within a run.
#[derive(Debug)]
pub enum SendOutcome {
    Sent,
    Failed(SendError),
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("a campaign needs at least one recipient")]
    NoRecipients,
}

/// A single dispatch run over one roster.
///
/// The run exclusively owns its counters; the send against the mail API
/// is the only suspension point.
pub struct CampaignRun<'a> {
    email_client: &'a EmailClient,
    progress: Option<mpsc::UnboundedSender<DispatchProgress>>,
    cancellation: CancellationToken,
}

impl<'a> CampaignRun<'a> {
    pub fn new(email_client: &'a EmailClient) -> Self {
        Self {
            email_client,
            progress: None,
            cancellation: CancellationToken::new(),
        }
    }

    /// Streams one `DispatchProgress` per attempt into `sender`.
    ///
    /// The receiver side is free to disappear at any point; delivery of
    /// progress is best-effort and has no bearing on the tally.
    pub fn with_progress(mut self, sender: mpsc::UnboundedSender<DispatchProgress>) -> Self {
        self.progress = Some(sender);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// A handle onto this run's cancellation signal.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Processes the roster strictly in order, one send in flight at a
    /// time. A recipient's failure is counted and logged, never
    /// escalated; the run always finishes with a tally covering exactly
    /// the attempts made.
    #[tracing::instrument(
        name = "Dispatch campaign",
        skip(self, draft, recipients),
        fields(subject = %draft.subject(), recipients = recipients.len())
    )]
    pub async fn dispatch(
        &self,
        draft: &CampaignDraft,
        recipients: &RecipientList,
    ) -> Result<SendResult, DispatchError> {
        if recipients.is_empty() {
            return Err(DispatchError::NoRecipients);
        }

        let total = recipients.len() as u64;
        let mut sent = 0u64;
        let mut failed = 0u64;

        for recipient in recipients.iter() {
            if self.cancellation.is_cancelled() {
                tracing::info!(
                    attempted = sent + failed,
                    total,
                    "Cancellation requested; stopping before the next send"
                );
                break;
            }

            match self.attempt(draft, recipient).await {
                SendOutcome::Sent => sent += 1,
                SendOutcome::Failed(error) => {
                    failed += 1;
                    tracing::warn!(
                        recipient = %recipient.email(),
                        class = error.class(),
                        error.cause_chain = ?error,
                        "Failed to send a campaign email"
                    );
                }
            }

            self.report(recipient, sent, failed, total);
        }

        Ok(SendResult {
            success: sent,
            failed,
        })
    }

    async fn attempt(&self, draft: &CampaignDraft, recipient: &Recipient) -> SendOutcome {
        let body = personalize(draft.body_template(), recipient);
        match self
            .email_client
            .send_email(recipient.email(), draft.subject(), &body)
            .await
        {
            Ok(()) => SendOutcome::Sent,
            Err(error) => SendOutcome::Failed(error),
        }
    }

    fn report(&self, recipient: &Recipient, sent: u64, failed: u64, total: u64) {
        if let Some(progress) = &self.progress {
            let _ = progress.send(DispatchProgress {
                recipient_email: recipient.email().as_ref().to_owned(),
                sent,
                failed,
                total,
            });
        }
    }
}
