use crate::domain::model::{
    ChangeSetDescription, ChangeSetRequest, EntityDescription, EntitySummary, StartedChangeSet,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Operations of the Marketplace Catalog API used by this crate. Every call
/// targets the `AWSMarketplace` catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn describe_change_set(&self, change_set_id: &str) -> Result<ChangeSetDescription>;

    async fn describe_entity(&self, entity_id: &str) -> Result<EntityDescription>;

    /// Follows pagination until exhausted or `max_results` entries are read.
    async fn list_entities(
        &self,
        entity_type: &str,
        max_results: Option<i32>,
    ) -> Result<Vec<EntitySummary>>;

    async fn start_change_set(&self, request: &ChangeSetRequest) -> Result<StartedChangeSet>;

    async fn cancel_change_set(&self, change_set_id: &str) -> Result<StartedChangeSet>;
}
