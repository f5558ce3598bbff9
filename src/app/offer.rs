use crate::app::{document, start_change, Report};
use crate::config::cli::{OfferCommands, OfferExpiryArgs, OfferReleaseArgs};
use crate::core::offer::{release_offer_change, update_expiry_change};
use crate::domain::ports::CatalogClient;
use crate::utils::error::Result;
use crate::utils::validation::validate_non_empty_string;

pub async fn execute<C: CatalogClient + ?Sized>(
    client: &C,
    command: &OfferCommands,
) -> Result<Report> {
    match command {
        OfferCommands::Describe(args) => {
            validate_non_empty_string("offer_id", &args.offer_id)?;
            let offer = client
                .describe_entity(&args.offer_id)
                .await
                .map_err(|e| e.context("Unable to describe offer"))?;
            document(&offer, &args.output)
        }
        OfferCommands::Release(args) => release(client, args).await,
        OfferCommands::UpdateExpiry(args) => update_expiry(client, args).await,
    }
}

async fn release<C: CatalogClient + ?Sized>(client: &C, args: &OfferReleaseArgs) -> Result<Report> {
    validate_non_empty_string("offer_id", &args.offer_id)?;

    let change = release_offer_change(&args.offer_id)?;
    start_change(client, change, &args.recheck).await
}

async fn update_expiry<C: CatalogClient + ?Sized>(
    client: &C,
    args: &OfferExpiryArgs,
) -> Result<Report> {
    validate_non_empty_string("offer_id", &args.offer_id)?;

    let change = update_expiry_change(&args.offer_id, args.expiry_date)?;
    start_change(client, change, &args.recheck).await
}

#[cfg(test)]
mod tests {
    use crate::app::testing::command;
    use crate::app::{execute, Report};
    use crate::domain::model::{EntityDescription, StartedChangeSet};
    use crate::domain::ports::MockCatalogClient;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_release_offer() {
        let mut client = MockCatalogClient::new();
        client
            .expect_start_change_set()
            .withf(|request| {
                let change = &request.changes[0];
                change.change_type == "ReleaseOffer"
                    && change.entity.entity_type == "Offer@1.0"
                    && change.entity.identifier == "offer-1"
            })
            .returning(|_| {
                Ok(StartedChangeSet {
                    change_set_id: "cs-release".to_string(),
                    change_set_arn: None,
                })
            });

        let cmd = command(&["offer", "release", "--offer-id", "offer-1"]);
        let report = execute(&client, &cmd).await.unwrap();
        assert_eq!(report, Report::Success("Change set Id: cs-release".to_string()));
    }

    #[tokio::test]
    async fn test_update_expiry() {
        let mut client = MockCatalogClient::new();
        client
            .expect_start_change_set()
            .withf(|request| {
                let details = request.changes[0].details_value().unwrap();
                details == json!({"AvailabilityEndDate": "2026-12-31"})
            })
            .returning(|_| {
                Ok(StartedChangeSet {
                    change_set_id: "cs-expiry".to_string(),
                    change_set_arn: None,
                })
            });

        let cmd = command(&[
            "offer",
            "update-expiry",
            "--offer-id",
            "offer-1",
            "--expiry-date",
            "2026-12-31",
        ]);
        let report = execute(&client, &cmd).await.unwrap();
        assert_eq!(report.text(), "Change set Id: cs-expiry");
    }

    #[tokio::test]
    async fn test_describe_offer_with_query() {
        let mut client = MockCatalogClient::new();
        client.expect_describe_entity().returning(|_| {
            Ok(EntityDescription {
                entity_type: Some("Offer@1.0".to_string()),
                details_document: Some(json!({"Name": "Private offer", "State": "Released"})),
                ..Default::default()
            })
        });

        let cmd = command(&[
            "offer",
            "describe",
            "--offer-id",
            "offer-1",
            "--query",
            "DetailsDocument.State",
        ]);
        let report = execute(&client, &cmd).await.unwrap();
        let parsed: Value = serde_json::from_str(report.text()).unwrap();
        assert_eq!(parsed, json!("Released"));
    }
}
