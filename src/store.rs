//! src/store.rs

use tokio::sync::RwLock;

use crate::domain::campaign::Campaign;

/// Append-only home of completed campaign records: append on run
/// completion, list for the history view, nothing else. Records are
/// never updated or removed.
#[derive(Debug, Default)]
pub struct CampaignStore {
    campaigns: RwLock<Vec<Campaign>>,
}

impl CampaignStore {
    pub fn new() -> Self {
        Self {
            campaigns: RwLock::new(Vec::new()),
        }
    }

    #[tracing::instrument(
        name = "Append campaign record",
        skip(self, campaign),
        fields(campaign_id = %campaign.id)
    )]
    pub async fn append(&self, campaign: Campaign) {
        self.campaigns.write().await.push(campaign);
    }

    /// Newest first, the order the history view wants.
    pub async fn list(&self) -> Vec<Campaign> {
        let campaigns = self.campaigns.read().await;
        campaigns.iter().rev().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::CampaignStore;
    use crate::domain::campaign::{Campaign, SendResult};
    use crate::domain::campaign_draft::CampaignDraft;

    fn campaign(subject: &str) -> Campaign {
        let draft = CampaignDraft::parse(subject.to_string(), "Hello {name}".to_string()).unwrap();
        Campaign::record(
            &draft,
            1,
            SendResult {
                success: 1,
                failed: 0,
            },
        )
    }

    #[tokio::test]
    async fn an_empty_store_lists_nothing() {
        let store = CampaignStore::new();
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn records_are_listed_newest_first() {
        let store = CampaignStore::new();

        store.append(campaign("first")).await;
        store.append(campaign("second")).await;

        let listed = store.list().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].subject, "second");
        assert_eq!(listed[1].subject, "first");
    }
}
