//! src/domain/recipient.rs

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::domain::recipient_email::RecipientEmail;

/// One entry of a campaign roster.
///
/// A missing or blank name is stored as `None`; the renderer substitutes
/// a neutral fallback for it. Recipients are immutable once a dispatch
/// run starts.
#[derive(Debug, Clone)]
pub struct Recipient {
    email: RecipientEmail,
    name: Option<String>,
}

impl Recipient {
    pub fn new(email: RecipientEmail, name: Option<String>) -> Self {
        let name = name.filter(|n| !n.trim().is_empty());
        Self { email, name }
    }

    pub fn email(&self) -> &RecipientEmail {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// An ordered roster. Insertion order is send order, and the first entry
/// backs the compose-preview contract.
///
/// Duplicate addresses (case-insensitive) collapse to a single entry:
/// the last occurrence's attributes win, kept at the position the
/// address first appeared.
#[derive(Debug, Clone, Default)]
pub struct RecipientList(Vec<Recipient>);

impl RecipientList {
    pub fn from_rows(rows: Vec<Recipient>) -> Self {
        let mut seen: HashMap<String, usize> = HashMap::with_capacity(rows.len());
        let mut entries: Vec<Recipient> = Vec::with_capacity(rows.len());

        for recipient in rows {
            match seen.entry(recipient.email().normalized()) {
                Entry::Occupied(slot) => entries[*slot.get()] = recipient,
                Entry::Vacant(slot) => {
                    slot.insert(entries.len());
                    entries.push(recipient);
                }
            }
        }

        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The recipient the compose preview is rendered for.
    pub fn first(&self) -> Option<&Recipient> {
        self.0.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recipient> {
        self.0.iter()
    }
}
