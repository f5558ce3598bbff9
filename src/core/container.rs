use crate::core::query::{json_literal, search};
use crate::domain::model::{ChangeRequest, EntityRef};
use crate::domain::ports::CatalogClient;
use crate::utils::error::{MpError, Result};
use crate::utils::validation::{validate_non_empty_list, validate_non_empty_string, Validate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::path::Path;

pub const CONTAINER_PRODUCT: &str = "ContainerProduct@1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OverrideParameterMetadata {
    pub label: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfuscate: Option<bool>,
}

/// A Helm value the buyer may override at deployment time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OverrideParameter {
    pub key: String,
    #[serde(deserialize_with = "scalar_string")]
    pub default_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<OverrideParameterMetadata>,
}

/// Accepts any YAML scalar (`2`, `true`, `IfNotPresent`) as its string form.
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "DefaultValue must be a scalar, got {:?}",
            other
        ))),
    }
}

/// Reads a YAML list of override parameters.
pub fn load_override_parameters<P: AsRef<Path>>(path: P) -> Result<Vec<OverrideParameter>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_yaml::from_str(&content)?)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HelmDeliveryOption {
    pub version_title: String,
    pub release_notes: String,
    pub delivery_option_title: String,
    pub compatible_services: Vec<String>,
    pub container_images: Vec<String>,
    pub helm_chart_uri: String,
    pub description: String,
    pub usage_instructions: String,
    pub quick_launch_enabled: bool,
    pub marketplace_service_account_name: String,
    pub release_name: String,
    pub namespace: String,
    pub override_parameters: Vec<OverrideParameter>,
}

impl HelmDeliveryOption {
    fn version(&self) -> Value {
        json!({
            "VersionTitle": self.version_title,
            "ReleaseNotes": self.release_notes,
        })
    }

    fn helm_details(&self) -> Value {
        json!({
            "CompatibleServices": self.compatible_services,
            "ContainerImages": self.container_images,
            "HelmChartUri": self.helm_chart_uri,
            "Description": self.description,
            "UsageInstructions": self.usage_instructions,
            "QuickLaunchEnabled": self.quick_launch_enabled,
            "MarketplaceServiceAccountName": self.marketplace_service_account_name,
            "ReleaseName": self.release_name,
            "Namespace": self.namespace,
            "OverrideParameters": self.override_parameters,
        })
    }
}

impl Validate for HelmDeliveryOption {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("version_title", &self.version_title)?;
        validate_non_empty_string("delivery_option_title", &self.delivery_option_title)?;
        validate_non_empty_list("compatible_services", &self.compatible_services)?;
        validate_non_empty_list("container_images", &self.container_images)?;
        validate_non_empty_string("helm_chart_uri", &self.helm_chart_uri)?;
        Ok(())
    }
}

/// Id of the first Helm delivery option of the version titled
/// `version_title`.
///
/// Example details document:
/// ```json
/// {"Versions": [{
///     "VersionTitle": "Product 1.2.3",
///     "DeliveryOptions": [{"Id": "4321", "Type": "Helm"}]
/// }]}
/// ```
pub async fn get_helm_delivery_option_id<C: CatalogClient + ?Sized>(
    client: &C,
    entity_id: &str,
    version_title: &str,
) -> Result<String> {
    let entity = client.describe_entity(entity_id).await?;
    let details = entity.details_value()?;

    helm_delivery_option_id(&details, version_title)?.ok_or_else(|| MpError::NotFound {
        what: format!(
            "Helm delivery option for version '{}' in entity {}",
            version_title, entity_id
        ),
    })
}

pub fn helm_delivery_option_id(details: &Value, version_title: &str) -> Result<Option<String>> {
    let found = search(
        &format!(
            "Versions[?VersionTitle=={}] | [0].DeliveryOptions[?Type=='Helm'] | [0].Id",
            json_literal(version_title)
        ),
        details,
    )?;
    Ok(found.as_str().map(str::to_owned))
}

pub fn add_delivery_options_change(
    entity_id: &str,
    option: &HelmDeliveryOption,
) -> Result<ChangeRequest> {
    let details = json!({
        "Version": option.version(),
        "DeliveryOptions": [{
            "DeliveryOptionTitle": option.delivery_option_title,
            "Details": {
                "HelmDeliveryOptionDetails": option.helm_details(),
            }
        }]
    });

    ChangeRequest::new(
        "AddDeliveryOptions",
        EntityRef::new(CONTAINER_PRODUCT, entity_id),
        &details,
    )
}

/// Same body as an add, except the option is addressed by id and its title
/// moves into the Helm details.
pub fn update_delivery_options_change(
    entity_id: &str,
    option: &HelmDeliveryOption,
    delivery_option_id: &str,
) -> Result<ChangeRequest> {
    let mut helm = option.helm_details();
    helm["DeliveryOptionTitle"] = json!(option.delivery_option_title);

    let details = json!({
        "Version": option.version(),
        "DeliveryOptions": [{
            "Id": delivery_option_id,
            "Details": {
                "HelmDeliveryOptionDetails": helm,
            }
        }]
    });

    ChangeRequest::new(
        "UpdateDeliveryOptions",
        EntityRef::new(CONTAINER_PRODUCT, entity_id),
        &details,
    )
}
