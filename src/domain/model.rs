use crate::utils::error::{MpError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Catalog every request in this crate is made against.
pub const CATALOG: &str = "AWSMarketplace";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityRef {
    #[serde(rename = "Type")]
    pub entity_type: String,
    pub identifier: String,
}

impl EntityRef {
    pub fn new(entity_type: &str, identifier: &str) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            identifier: identifier.to_string(),
        }
    }
}

/// One entry of a change set. `details` is the JSON encoded change body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeRequest {
    pub change_type: String,
    pub entity: EntityRef,
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_name: Option<String>,
}

impl ChangeRequest {
    pub fn new(change_type: &str, entity: EntityRef, details: &Value) -> Result<Self> {
        Ok(Self {
            change_type: change_type.to_string(),
            entity,
            details: serde_json::to_string(details)?,
            change_name: None,
        })
    }

    pub fn details_value(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.details)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSetRequest {
    pub changes: Vec<ChangeRequest>,
    pub name: Option<String>,
}

impl ChangeSetRequest {
    pub fn single(change: ChangeRequest) -> Self {
        Self {
            changes: vec![change],
            name: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorDetail {
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeSummary {
    pub change_type: Option<String>,
    pub entity: Option<EntityRef>,
    pub details: Option<String>,
    pub details_document: Option<Value>,
    #[serde(default)]
    pub error_detail_list: Vec<ErrorDetail>,
    pub change_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangeSetDescription {
    pub change_set_id: Option<String>,
    pub change_set_arn: Option<String>,
    pub change_set_name: Option<String>,
    pub intent: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub status: Option<String>,
    pub failure_code: Option<String>,
    pub failure_description: Option<String>,
    #[serde(default)]
    pub change_set: Vec<ChangeSummary>,
}

impl ChangeSetDescription {
    pub fn is_finished(&self) -> bool {
        matches!(
            self.status.as_deref(),
            Some("SUCCEEDED") | Some("FAILED") | Some("CANCELLED")
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityDescription {
    pub entity_type: Option<String>,
    pub entity_identifier: Option<String>,
    pub entity_arn: Option<String>,
    pub last_modified_date: Option<String>,
    pub details: Option<String>,
    pub details_document: Option<Value>,
}

impl EntityDescription {
    /// The entity details as JSON. The document form wins over the string.
    pub fn details_value(&self) -> Result<Value> {
        if let Some(document) = &self.details_document {
            return Ok(document.clone());
        }

        match &self.details {
            Some(details) => Ok(serde_json::from_str(details)?),
            None => Err(MpError::NotFound {
                what: format!(
                    "Details of entity {}",
                    self.entity_identifier.as_deref().unwrap_or("<unknown>")
                ),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntitySummary {
    pub name: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub entity_arn: Option<String>,
    pub last_modified_date: Option<String>,
    pub visibility: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartedChangeSet {
    pub change_set_id: String,
    pub change_set_arn: Option<String>,
}
