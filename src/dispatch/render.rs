//! src/dispatch/render.rs

use crate::domain::recipient::Recipient;

/// The literal token a body template may carry for personalization.
pub const NAME_PLACEHOLDER: &str = "{name}";

const NAME_FALLBACK: &str = "there";

/// Expands every `{name}` occurrence against one recipient.
///
/// Total and pure: a nameless recipient gets the neutral fallback rather
/// than an error, the inputs are never mutated, and the substituted value
/// is not rescanned, so a name containing the token itself comes through
/// verbatim.
pub fn personalize(template: &str, recipient: &Recipient) -> String {
    let name = recipient.name().unwrap_or(NAME_FALLBACK);
    template.replace(NAME_PLACEHOLDER, name)
}
