use crate::config::AppConfig;
use crate::domain::model::{
    ChangeSetDescription, ChangeSetRequest, ChangeSummary, EntityDescription, EntityRef,
    EntitySummary, ErrorDetail, StartedChangeSet, CATALOG,
};
use crate::domain::ports::CatalogClient;
use crate::utils::error::{MpError, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_marketplacecatalog::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_marketplacecatalog::types::{Change, Entity};
use aws_sdk_marketplacecatalog::Client;
use aws_smithy_types::{Document, Number};
use serde_json::Value;
use std::future::Future;

// ListEntities rejects larger pages
const MAX_PAGE_SIZE: i32 = 50;

/// Follows `NextToken` until it runs out or `max_results` items are
/// collected. `fetch_page` receives the page size and the token to resume
/// from, and returns one page plus the next token.
pub(crate) async fn collect_pages<T, F, Fut>(
    max_results: Option<i32>,
    mut fetch_page: F,
) -> Result<Vec<T>>
where
    F: FnMut(Option<i32>, Option<String>) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, Option<String>)>>,
{
    let limit = max_results.and_then(|n| usize::try_from(n).ok());
    let page_size = max_results.map(|n| n.min(MAX_PAGE_SIZE));
    let mut items = Vec::new();
    let mut next_token: Option<String> = None;

    loop {
        let (page, token) = fetch_page(page_size, next_token.take()).await?;
        items.extend(page);

        if let Some(limit) = limit {
            if items.len() >= limit {
                items.truncate(limit);
                break;
            }
        }

        match token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => break,
        }
    }

    Ok(items)
}

/// Marketplace Catalog client backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct AwsCatalogClient {
    client: Client,
}

impl AwsCatalogClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client for the configured profile and region.
    pub async fn connect(config: &AppConfig) -> Self {
        tracing::debug!(
            "Creating marketplace catalog client (profile: {}, region: {})",
            config.profile,
            config.region
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(&config.profile)
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        Self::new(Client::new(&sdk_config))
    }
}

fn api_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> MpError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = match err.message() {
        Some(message) => message.to_string(),
        None => DisplayErrorContext(&err).to_string(),
    };
    MpError::api(operation, err.code(), message)
}

fn build_error(err: impl std::fmt::Display) -> MpError {
    MpError::BuildError {
        message: err.to_string(),
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_owned)
}

/// Converts an SDK document into plain JSON.
pub fn document_to_json(document: &Document) -> Value {
    match document {
        Document::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), document_to_json(value)))
                .collect(),
        ),
        Document::Array(items) => Value::Array(items.iter().map(document_to_json).collect()),
        Document::Number(Number::PosInt(n)) => Value::from(*n),
        Document::Number(Number::NegInt(n)) => Value::from(*n),
        Document::Number(Number::Float(f)) => {
            serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number)
        }
        Document::String(s) => Value::String(s.clone()),
        Document::Bool(b) => Value::Bool(*b),
        Document::Null => Value::Null,
    }
}

fn to_change(request: &crate::domain::model::ChangeRequest) -> Result<Change> {
    let entity = Entity::builder()
        .r#type(&request.entity.entity_type)
        .identifier(&request.entity.identifier)
        .build()
        .map_err(build_error)?;

    Change::builder()
        .change_type(&request.change_type)
        .entity(entity)
        .details(&request.details)
        .set_change_name(request.change_name.clone())
        .build()
        .map_err(build_error)
}

#[async_trait]
impl CatalogClient for AwsCatalogClient {
    async fn describe_change_set(&self, change_set_id: &str) -> Result<ChangeSetDescription> {
        tracing::debug!("Describing change set {}", change_set_id);
        let output = self
            .client
            .describe_change_set()
            .catalog(CATALOG)
            .change_set_id(change_set_id)
            .send()
            .await
            .map_err(|e| api_error("DescribeChangeSet", e))?;

        let change_set = output
            .change_set()
            .iter()
            .map(|summary| ChangeSummary {
                change_type: owned(summary.change_type()),
                entity: summary.entity().map(|entity| {
                    EntityRef::new(entity.r#type(), entity.identifier().unwrap_or_default())
                }),
                details: owned(summary.details()),
                details_document: summary.details_document().map(document_to_json),
                error_detail_list: summary
                    .error_detail_list()
                    .iter()
                    .map(|detail| ErrorDetail {
                        error_code: owned(detail.error_code()),
                        error_message: owned(detail.error_message()),
                    })
                    .collect(),
                change_name: owned(summary.change_name()),
            })
            .collect();

        Ok(ChangeSetDescription {
            change_set_id: owned(output.change_set_id()),
            change_set_arn: owned(output.change_set_arn()),
            change_set_name: owned(output.change_set_name()),
            intent: output.intent().map(|i| i.as_str().to_string()),
            start_time: owned(output.start_time()),
            end_time: owned(output.end_time()),
            status: output.status().map(|s| s.as_str().to_string()),
            failure_code: output.failure_code().map(|f| f.as_str().to_string()),
            failure_description: owned(output.failure_description()),
            change_set,
        })
    }

    async fn describe_entity(&self, entity_id: &str) -> Result<EntityDescription> {
        tracing::debug!("Describing entity {}", entity_id);
        let output = self
            .client
            .describe_entity()
            .catalog(CATALOG)
            .entity_id(entity_id)
            .send()
            .await
            .map_err(|e| api_error("DescribeEntity", e))?;

        Ok(EntityDescription {
            entity_type: owned(output.entity_type()),
            entity_identifier: owned(output.entity_identifier()),
            entity_arn: owned(output.entity_arn()),
            last_modified_date: owned(output.last_modified_date()),
            details: owned(output.details()),
            details_document: output.details_document().map(document_to_json),
        })
    }

    async fn list_entities(
        &self,
        entity_type: &str,
        max_results: Option<i32>,
    ) -> Result<Vec<EntitySummary>> {
        let client = &self.client;
        collect_pages(max_results, move |page_size, next_token| async move {
            tracing::debug!("Listing {} entities", entity_type);
            let output = client
                .list_entities()
                .catalog(CATALOG)
                .entity_type(entity_type)
                .set_max_results(page_size)
                .set_next_token(next_token)
                .send()
                .await
                .map_err(|e| api_error("ListEntities", e))?;

            let entities: Vec<EntitySummary> = output
                .entity_summary_list()
                .iter()
                .map(|summary| EntitySummary {
                    name: owned(summary.name()),
                    entity_type: owned(summary.entity_type()),
                    entity_id: owned(summary.entity_id()),
                    entity_arn: owned(summary.entity_arn()),
                    last_modified_date: owned(summary.last_modified_date()),
                    visibility: owned(summary.visibility()),
                })
                .collect();
            Ok::<_, MpError>((entities, output.next_token().map(str::to_owned)))
        })
        .await
    }

    async fn start_change_set(&self, request: &ChangeSetRequest) -> Result<StartedChangeSet> {
        let changes = request
            .changes
            .iter()
            .map(to_change)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("Starting change set with {} change(s)", changes.len());
        let output = self
            .client
            .start_change_set()
            .catalog(CATALOG)
            .set_change_set(Some(changes))
            .set_change_set_name(request.name.clone())
            .send()
            .await
            .map_err(|e| api_error("StartChangeSet", e))?;

        started(output.change_set_id(), output.change_set_arn())
    }

    async fn cancel_change_set(&self, change_set_id: &str) -> Result<StartedChangeSet> {
        tracing::debug!("Cancelling change set {}", change_set_id);
        let output = self
            .client
            .cancel_change_set()
            .catalog(CATALOG)
            .change_set_id(change_set_id)
            .send()
            .await
            .map_err(|e| api_error("CancelChangeSet", e))?;

        started(output.change_set_id(), output.change_set_arn())
    }
}

fn started(change_set_id: Option<&str>, change_set_arn: Option<&str>) -> Result<StartedChangeSet> {
    let change_set_id = change_set_id.ok_or_else(|| MpError::NotFound {
        what: "ChangeSetId in response".to_string(),
    })?;

    Ok(StartedChangeSet {
        change_set_id: change_set_id.to_string(),
        change_set_arn: owned(change_set_arn),
    })
}
