use crate::app::{start_change, Report};
use crate::config::cli::{AddVersionArgs, ImageCommands, ImageLookupArgs, RestrictVersionArgs};
use crate::core::image::{add_version_change, get_image_delivery_option_id, restrict_version_change};
use crate::domain::ports::CatalogClient;
use crate::utils::error::Result;
use crate::utils::validation::{validate_ami_id, validate_non_empty_string, Validate};

pub async fn execute<C: CatalogClient + ?Sized>(
    client: &C,
    command: &ImageCommands,
) -> Result<Report> {
    match command {
        ImageCommands::RestrictVersion(args) => restrict_version(client, args).await,
        ImageCommands::AddVersion(args) => add_version(client, args).await,
        ImageCommands::DeliveryOptionId(args) => {
            let id = lookup_delivery_option(client, args).await?;
            Ok(Report::Document(id))
        }
    }
}

async fn lookup_delivery_option<C: CatalogClient + ?Sized>(
    client: &C,
    args: &ImageLookupArgs,
) -> Result<String> {
    validate_non_empty_string("entity_id", &args.entity_id)?;
    validate_ami_id("ami_id", &args.ami_id)?;

    get_image_delivery_option_id(client, &args.entity_id, &args.ami_id)
        .await
        .map_err(|e| e.context("Unable to get delivery option id for the given product"))
}

async fn restrict_version<C: CatalogClient + ?Sized>(
    client: &C,
    args: &RestrictVersionArgs,
) -> Result<Report> {
    let delivery_option_id = lookup_delivery_option(client, &args.image).await?;
    tracing::info!(
        "Restricting delivery option {} of {}",
        delivery_option_id,
        args.image.entity_id
    );

    let change = restrict_version_change(&args.image.entity_id, &delivery_option_id)?;
    start_change(client, change, &args.recheck).await
}

async fn add_version<C: CatalogClient + ?Sized>(
    client: &C,
    args: &AddVersionArgs,
) -> Result<Report> {
    validate_non_empty_string("entity_id", &args.image.entity_id)?;
    let version = args.ami_version();
    version.validate()?;

    let change = add_version_change(&args.image.entity_id, &version)?;
    start_change(client, change, &args.recheck).await
}
