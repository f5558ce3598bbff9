use crate::app::{start_change, Report};
use crate::config::cli::{ContainerCommands, ContainerLookupArgs, HelmArgs, UpdateHelmArgs};
use crate::core::container::{
    add_delivery_options_change, get_helm_delivery_option_id, update_delivery_options_change,
};
use crate::domain::ports::CatalogClient;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, Validate};

pub async fn execute<C: CatalogClient + ?Sized>(
    client: &C,
    command: &ContainerCommands,
) -> Result<Report> {
    match command {
        ContainerCommands::AddDeliveryOption(args) => add_delivery_option(client, args).await,
        ContainerCommands::UpdateDeliveryOption(args) => {
            update_delivery_option(client, args).await
        }
        ContainerCommands::DeliveryOptionId(args) => {
            let id = lookup_delivery_option(client, args).await?;
            Ok(Report::Document(id))
        }
    }
}

async fn lookup_delivery_option<C: CatalogClient + ?Sized>(
    client: &C,
    args: &ContainerLookupArgs,
) -> Result<String> {
    validate_non_empty_string("entity_id", &args.entity_id)?;
    validate_non_empty_string("version_title", &args.version_title)?;

    get_helm_delivery_option_id(client, &args.entity_id, &args.version_title)
        .await
        .map_err(|e| e.context("Unable to get delivery option id for the given product"))
}

async fn add_delivery_option<C: CatalogClient + ?Sized>(
    client: &C,
    args: &HelmArgs,
) -> Result<Report> {
    validate_non_empty_string("entity_id", &args.target.entity_id)?;
    let option = args.delivery_option()?;
    option.validate()?;

    let change = add_delivery_options_change(&args.target.entity_id, &option)?;
    start_change(client, change, &args.recheck).await
}

async fn update_delivery_option<C: CatalogClient + ?Sized>(
    client: &C,
    args: &UpdateHelmArgs,
) -> Result<Report> {
    let helm = &args.helm;
    let option = helm.delivery_option()?;
    option.validate()?;

    let delivery_option_id = match &args.delivery_option_id {
        Some(id) => id.clone(),
        None => lookup_delivery_option(client, &helm.target).await?,
    };
    tracing::info!(
        "Updating delivery option {} of {}",
        delivery_option_id,
        helm.target.entity_id
    );

    let change = update_delivery_options_change(&helm.target.entity_id, &option, &delivery_option_id)?;
    start_change(client, change, &helm.recheck).await
}
