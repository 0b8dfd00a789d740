pub mod campaign;
pub mod campaign_draft;
pub mod recipient;
pub mod recipient_email;
