use crate::app::{document, Report};
use crate::config::cli::{
    CancelChangeSetArgs, DescribeChangeSetArgs, DescribeEntityArgs, ListEntitiesArgs,
};
use crate::core::changeset::{cancel_change_set as cancel, get_change_set};
use crate::domain::ports::CatalogClient;
use crate::utils::error::Result;
use crate::utils::validation::validate_non_empty_string;

pub async fn describe_change_set<C: CatalogClient + ?Sized>(
    client: &C,
    args: &DescribeChangeSetArgs,
) -> Result<Report> {
    validate_non_empty_string("change_set_id", &args.change_set_id)?;

    let description = get_change_set(client, &args.change_set_id)
        .await
        .map_err(|e| e.context("Unable to describe change set"))?;
    document(&description, &args.output)
}

pub async fn describe_entity<C: CatalogClient + ?Sized>(
    client: &C,
    args: &DescribeEntityArgs,
) -> Result<Report> {
    validate_non_empty_string("entity_id", &args.entity_id)?;

    let entity = client
        .describe_entity(&args.entity_id)
        .await
        .map_err(|e| e.context("Unable to describe entity"))?;
    document(&entity, &args.output)
}

pub async fn list_entities<C: CatalogClient + ?Sized>(
    client: &C,
    args: &ListEntitiesArgs,
) -> Result<Report> {
    validate_non_empty_string("entity_type", &args.entity_type)?;

    let entities = client
        .list_entities(&args.entity_type, args.max_results)
        .await
        .map_err(|e| e.context("Unable to list entities"))?;
    tracing::info!("Found {} {} entities", entities.len(), args.entity_type);
    document(&entities, &args.output)
}

pub async fn cancel_change_set<C: CatalogClient + ?Sized>(
    client: &C,
    args: &CancelChangeSetArgs,
) -> Result<Report> {
    validate_non_empty_string("change_set_id", &args.change_set_id)?;

    let cancelled = cancel(client, &args.change_set_id)
        .await
        .map_err(|e| e.context("Unable to cancel change set"))?;
    Ok(Report::Success(format!(
        "Cancelled change set Id: {}",
        cancelled.change_set_id
    )))
}

#[cfg(test)]
mod tests {
    use crate::app::testing::command;
    use crate::app::{execute, Report};
    use crate::domain::model::{
        ChangeSetDescription, ChangeSummary, EntityDescription, EntityRef, EntitySummary,
        StartedChangeSet,
    };
    use crate::domain::ports::MockCatalogClient;
    use crate::utils::error::MpError;
    use serde_json::{json, Value};

    fn change_set(id: &str) -> ChangeSetDescription {
        ChangeSetDescription {
            change_set_id: Some(id.to_string()),
            change_set_arn: Some("string".to_string()),
            change_set_name: Some("string".to_string()),
            intent: Some("APPLY".to_string()),
            start_time: Some("2018-02-27T13:45:22Z".to_string()),
            end_time: Some("2018-02-27T13:45:22Z".to_string()),
            status: Some("SUCCEEDED".to_string()),
            change_set: vec![ChangeSummary {
                change_type: Some("string".to_string()),
                entity: Some(EntityRef::new("string", "string")),
                details: Some("string".to_string()),
                details_document: Some(json!({"changeset": "details"})),
                error_detail_list: vec![],
                change_name: Some("string".to_string()),
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_describe_change_set() {
        let mut client = MockCatalogClient::new();
        client
            .expect_describe_change_set()
            .withf(|id| id == "12345")
            .returning(|id| Ok(change_set(id)));

        let cmd = command(&["describe-change-set", "--change-set-id", "12345", "--no-color"]);
        let report = execute(&client, &cmd).await.unwrap();

        let Report::Document(text) = report else {
            panic!("expected a document");
        };
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["ChangeSetId"], "12345");
        assert_eq!(parsed["ChangeSet"][0]["DetailsDocument"]["changeset"], "details");
    }

    #[tokio::test]
    async fn test_describe_change_set_failure() {
        let mut client = MockCatalogClient::new();
        client
            .expect_describe_change_set()
            .returning(|_| Err(MpError::api("DescribeChangeSet", None, "403: Auth failure!")));

        let cmd = command(&["describe-change-set", "--change-set-id", "12345"]);
        let err = execute(&client, &cmd).await.unwrap_err();
        assert!(err.to_string().contains("403: Auth failure!"));
        assert!(err.to_string().starts_with("Unable to describe change set"));
    }

    #[tokio::test]
    async fn test_describe_change_set_with_query() {
        let mut client = MockCatalogClient::new();
        client
            .expect_describe_change_set()
            .returning(|id| Ok(change_set(id)));

        let cmd = command(&[
            "describe-change-set",
            "--change-set-id",
            "12345",
            "--query",
            "Status",
        ]);
        let report = execute(&client, &cmd).await.unwrap();
        assert_eq!(report, Report::Document("\"SUCCEEDED\"".to_string()));
    }

    #[tokio::test]
    async fn test_describe_entity_yaml() {
        let mut client = MockCatalogClient::new();
        client.expect_describe_entity().returning(|id| {
            Ok(EntityDescription {
                entity_type: Some("AmiProduct@1.0".to_string()),
                entity_identifier: Some(id.to_string()),
                details_document: Some(json!({"Versions": []})),
                ..Default::default()
            })
        });

        let cmd = command(&[
            "describe-entity",
            "--entity-id",
            "prod-1",
            "--output",
            "yaml",
        ]);
        let report = execute(&client, &cmd).await.unwrap();
        let parsed: Value = serde_yaml::from_str(report.text()).unwrap();
        assert_eq!(parsed["EntityIdentifier"], "prod-1");
        assert_eq!(parsed["EntityType"], "AmiProduct@1.0");
    }

    #[tokio::test]
    async fn test_list_entities() {
        let mut client = MockCatalogClient::new();
        client
            .expect_list_entities()
            .withf(|entity_type, max| entity_type == "Offer" && *max == Some(2))
            .returning(|_, _| {
                Ok(vec![
                    EntitySummary {
                        name: Some("Offer A".to_string()),
                        entity_id: Some("offer-a".to_string()),
                        ..Default::default()
                    },
                    EntitySummary {
                        name: Some("Offer B".to_string()),
                        entity_id: Some("offer-b".to_string()),
                        ..Default::default()
                    },
                ])
            });

        let cmd = command(&[
            "list-entities",
            "--entity-type",
            "Offer",
            "--max-results",
            "2",
            "--query",
            "[].EntityId",
        ]);
        let report = execute(&client, &cmd).await.unwrap();
        let parsed: Value = serde_json::from_str(report.text()).unwrap();
        assert_eq!(parsed, json!(["offer-a", "offer-b"]));
    }

    #[tokio::test]
    async fn test_cancel_change_set() {
        let mut client = MockCatalogClient::new();
        client.expect_cancel_change_set().returning(|id| {
            Ok(StartedChangeSet {
                change_set_id: id.to_string(),
                change_set_arn: None,
            })
        });

        let cmd = command(&["cancel-change-set", "--change-set-id", "cs-9"]);
        let report = execute(&client, &cmd).await.unwrap();
        assert_eq!(
            report,
            Report::Success("Cancelled change set Id: cs-9".to_string())
        );
    }
}
