//! src/ingest/roster.rs
//!
//! Turns an uploaded roster - comma-separated text with a header row -
//! into a validated `RecipientList`.

use crate::domain::recipient::{Recipient, RecipientList};
use crate::domain::recipient_email::RecipientEmail;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("a roster must contain an 'email' column")]
    MissingEmailColumn,
}

/// Parses roster text. The `email` column is required; `name` is
/// optional. Rows without a usable email address are dropped, a missing
/// `email` column is a hard format error, and a header-only roster
/// parses to an empty list (refusing that is the dispatch precondition's
/// job).
#[tracing::instrument(name = "Parse recipient roster", skip(text))]
pub fn parse_roster(text: &str) -> Result<RecipientList, RosterError> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

    let header = lines.next().ok_or(RosterError::MissingEmailColumn)?;
    let columns: Vec<String> = header
        .split(',')
        .map(|column| column.trim().to_lowercase())
        .collect();
    let email_column = columns
        .iter()
        .position(|column| column == "email")
        .ok_or(RosterError::MissingEmailColumn)?;
    let name_column = columns.iter().position(|column| column == "name");

    let mut rows = Vec::new();
    for line in lines {
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();

        let raw_email = match cells.get(email_column) {
            Some(cell) if !cell.is_empty() => (*cell).to_string(),
            // rows without an email cell never reach the engine.
            _ => continue,
        };

        let email = match RecipientEmail::parse(raw_email) {
            Ok(email) => email,
            Err(error) => {
                tracing::warn!(%error, "Skipping a roster row with an unusable email address");
                continue;
            }
        };

        let name = name_column
            .and_then(|column| cells.get(column))
            .map(|cell| (*cell).to_string());

        rows.push(Recipient::new(email, name));
    }

    Ok(RecipientList::from_rows(rows))
}
