use crate::core::query::{json_literal, search};
use crate::domain::model::{ChangeRequest, EntityRef};
use crate::domain::ports::CatalogClient;
use crate::utils::error::{MpError, Result};
use crate::utils::validation::{
    validate_ami_id, validate_non_empty_string, validate_range, Validate,
};
use serde_json::{json, Value};

pub const AMI_PRODUCT: &str = "AmiProduct@1.0";

/// A new AMI version published through `AddDeliveryOptions`.
#[derive(Debug, Clone, PartialEq)]
pub struct AmiVersion {
    pub ami_id: String,
    pub version_title: String,
    pub release_notes: String,
    pub access_role_arn: String,
    pub os_name: String,
    pub os_version: String,
    pub usage_instructions: String,
    pub recommended_instance_type: String,
    pub ssh_user: String,
    pub ssh_port: u16,
}

impl Validate for AmiVersion {
    fn validate(&self) -> Result<()> {
        validate_ami_id("ami_id", &self.ami_id)?;
        validate_non_empty_string("version_title", &self.version_title)?;
        validate_non_empty_string("access_role_arn", &self.access_role_arn)?;
        validate_non_empty_string("os_name", &self.os_name)?;
        validate_non_empty_string("recommended_instance_type", &self.recommended_instance_type)?;
        validate_non_empty_string("ssh_user", &self.ssh_user)?;
        validate_range("ssh_port", self.ssh_port, 1, u16::MAX)?;
        Ok(())
    }
}

/// Looks up the delivery option serving `ami_id` in the product's versions.
///
/// Example details document:
/// ```json
/// {"Versions": [{
///     "Sources": [{"Id": "src-1", "Image": "ami-123"}],
///     "DeliveryOptions": [{"Id": "do-1", "SourceId": "src-1"}]
/// }]}
/// ```
pub async fn get_image_delivery_option_id<C: CatalogClient + ?Sized>(
    client: &C,
    entity_id: &str,
    ami_id: &str,
) -> Result<String> {
    let entity = client.describe_entity(entity_id).await?;
    let details = entity.details_value()?;

    image_delivery_option_id(&details, ami_id)?.ok_or_else(|| MpError::NotFound {
        what: format!("Delivery option for image {} in entity {}", ami_id, entity_id),
    })
}

pub fn image_delivery_option_id(details: &Value, ami_id: &str) -> Result<Option<String>> {
    let source = search(
        &format!(
            "Versions[].Sources[?Image=={}][] | [0].Id",
            json_literal(ami_id)
        ),
        details,
    )?;
    let Some(source_id) = source.as_str() else {
        return Ok(None);
    };

    let option = search(
        &format!(
            "Versions[].DeliveryOptions[?SourceId=={}][] | [0].Id",
            json_literal(source_id)
        ),
        details,
    )?;
    Ok(option.as_str().map(str::to_owned))
}

pub fn restrict_version_change(entity_id: &str, delivery_option_id: &str) -> Result<ChangeRequest> {
    ChangeRequest::new(
        "RestrictDeliveryOptions",
        EntityRef::new(AMI_PRODUCT, entity_id),
        &json!({ "DeliveryOptionIds": [delivery_option_id] }),
    )
}

pub fn add_version_change(entity_id: &str, version: &AmiVersion) -> Result<ChangeRequest> {
    let details = json!({
        "Version": {
            "VersionTitle": version.version_title,
            "ReleaseNotes": version.release_notes,
        },
        "DeliveryOptions": [{
            "Details": {
                "AmiDeliveryOptionDetails": {
                    "AmiSource": {
                        "AmiId": version.ami_id,
                        "AccessRoleArn": version.access_role_arn,
                        "UserName": version.ssh_user,
                        "OperatingSystemName": version.os_name,
                        "OperatingSystemVersion": version.os_version,
                    },
                    "UsageInstructions": version.usage_instructions,
                    "RecommendedInstanceType": version.recommended_instance_type,
                    "SecurityGroups": [{
                        "IpProtocol": "tcp",
                        "FromPort": version.ssh_port,
                        "ToPort": version.ssh_port,
                        "IpRanges": ["0.0.0.0/0"],
                    }],
                }
            }
        }]
    });

    ChangeRequest::new(
        "AddDeliveryOptions",
        EntityRef::new(AMI_PRODUCT, entity_id),
        &details,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::EntityDescription;
    use crate::domain::ports::MockCatalogClient;

    fn product_details() -> Value {
        json!({
            "Versions": [
                {
                    "VersionTitle": "15.5",
                    "Sources": [{"Id": "src-old", "Image": "ami-11111"}],
                    "DeliveryOptions": [{"Id": "do-old", "SourceId": "src-old"}]
                },
                {
                    "VersionTitle": "15.6",
                    "Sources": [{"Id": "src-new", "Image": "ami-12345"}],
                    "DeliveryOptions": [{"Id": "do-new", "SourceId": "src-new"}]
                }
            ]
        })
    }

    fn version() -> AmiVersion {
        AmiVersion {
            ami_id: "ami-12345".to_string(),
            version_title: "15.6".to_string(),
            release_notes: "Security fixes".to_string(),
            access_role_arn: "arn:aws:iam::123456789012:role/mp-ingest".to_string(),
            os_name: "SLES".to_string(),
            os_version: "15.6".to_string(),
            usage_instructions: "Login as ec2-user".to_string(),
            recommended_instance_type: "t3.medium".to_string(),
            ssh_user: "ec2-user".to_string(),
            ssh_port: 22,
        }
    }

    #[test]
    fn test_image_delivery_option_id_matches_source() {
        let details = product_details();
        assert_eq!(
            image_delivery_option_id(&details, "ami-12345").unwrap().as_deref(),
            Some("do-new")
        );
        assert_eq!(image_delivery_option_id(&details, "ami-99999").unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_image_delivery_option_id_not_found() {
        let mut client = MockCatalogClient::new();
        client.expect_describe_entity().returning(|_| {
            Ok(EntityDescription {
                details_document: Some(product_details()),
                ..Default::default()
            })
        });

        assert_eq!(
            get_image_delivery_option_id(&client, "prod-1", "ami-11111")
                .await
                .unwrap(),
            "do-old"
        );
        let err = get_image_delivery_option_id(&client, "prod-1", "ami-99999")
            .await
            .unwrap_err();
        assert!(matches!(err, MpError::NotFound { .. }));
    }

    #[test]
    fn test_restrict_version_change() {
        let change = restrict_version_change("prod-1", "do-new").unwrap();
        assert_eq!(change.change_type, "RestrictDeliveryOptions");
        assert_eq!(change.entity, EntityRef::new(AMI_PRODUCT, "prod-1"));
        assert_eq!(
            change.details_value().unwrap(),
            json!({"DeliveryOptionIds": ["do-new"]})
        );
    }

    #[test]
    fn test_add_version_change() {
        let change = add_version_change("prod-1", &version()).unwrap();
        assert_eq!(change.change_type, "AddDeliveryOptions");

        let details = change.details_value().unwrap();
        assert_eq!(details["Version"]["VersionTitle"], "15.6");
        let ami = &details["DeliveryOptions"][0]["Details"]["AmiDeliveryOptionDetails"];
        assert_eq!(ami["AmiSource"]["AmiId"], "ami-12345");
        assert_eq!(ami["AmiSource"]["UserName"], "ec2-user");
        assert_eq!(ami["SecurityGroups"][0]["FromPort"], 22);
    }

    #[test]
    fn test_ami_version_validation() {
        assert!(version().validate().is_ok());

        let mut bad = version();
        bad.ami_id = "image-1".to_string();
        assert!(bad.validate().is_err());

        let mut bad = version();
        bad.ssh_port = 0;
        assert!(bad.validate().is_err());
    }
}
