use crate::config::{ConfigOverrides, LogLevel};
use crate::core::changeset::RecheckPolicy;
use crate::core::container::{load_override_parameters, HelmDeliveryOption};
use crate::core::image::AmiVersion;
use crate::core::query::OutputFormat;
use crate::utils::error::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const LICENSE: &str = "GPLv3+";

#[derive(Debug, Clone, Parser)]
#[command(name = "aws-mp-utils", version)]
#[command(about = "The command line interface provides AWS Marketplace Catalog utilities.")]
#[command(
    long_about = "The command line interface provides AWS Marketplace Catalog utilities.\n\n\
                  This includes handling changesets for images, containers and offers."
)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[arg(long, help = "Show license information.")]
    pub license: bool,

    #[command(flatten)]
    pub shared: SharedOptions,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options accepted before or after any subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct SharedOptions {
    #[arg(
        short = 'C',
        long,
        global = true,
        value_name = "PATH",
        value_parser = existing_path,
        help = "AWS MP utils config file to use. Default: ~/.config/aws_mp_utils/default.yaml"
    )]
    pub config_file: Option<PathBuf>,

    #[arg(long, global = true, help = "The AWS profile to use.")]
    pub profile: Option<String>,

    #[arg(long, global = true, help = "Remove ANSI color and styling from output.")]
    pub no_color: bool,

    #[arg(long, global = true, help = "Display debug level logging to console.")]
    pub debug: bool,

    #[arg(long, global = true, help = "Display logging info to console. (Default)")]
    pub info: bool,

    #[arg(long, global = true, help = "Display only errors to console.")]
    pub quiet: bool,

    #[arg(long, global = true, help = "The region to use for the catalog requests.")]
    pub region: Option<String>,
}

impl SharedOptions {
    pub fn log_level(&self) -> Option<LogLevel> {
        if self.debug {
            Some(LogLevel::Debug)
        } else if self.quiet {
            Some(LogLevel::Error)
        } else if self.info {
            Some(LogLevel::Info)
        } else {
            None
        }
    }

    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_file: self.config_file.clone(),
            profile: self.profile.clone(),
            log_level: self.log_level(),
            no_color: self.no_color.then_some(true),
            region: self.region.clone(),
        }
    }
}

fn existing_path(value: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("Path '{}' does not exist.", value))
    }
}

fn expiry_date(value: &str) -> std::result::Result<NaiveDate, String> {
    crate::core::offer::parse_expiry_date(value).map_err(|e| e.to_string())
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Describe a change set.
    DescribeChangeSet(DescribeChangeSetArgs),
    /// Describe a catalog entity.
    DescribeEntity(DescribeEntityArgs),
    /// List catalog entities of a type.
    ListEntities(ListEntitiesArgs),
    /// Cancel a change set that has not finished.
    CancelChangeSet(CancelChangeSetArgs),
    /// Commands for marketplace catalog AMI product management.
    #[command(subcommand)]
    Image(ImageCommands),
    /// Commands for marketplace catalog container product management.
    #[command(subcommand)]
    Container(ContainerCommands),
    /// Commands for marketplace catalog offer management.
    #[command(subcommand)]
    Offer(OfferCommands),
}

#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    #[arg(long, help = "JMESPath expression applied to the response.")]
    pub query: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Args)]
pub struct RecheckArgs {
    #[arg(
        long,
        help = "The maximum number of checks that are performed when a marketplace change \
                cannot be applied because some resource is affected by some other ongoing change."
    )]
    pub max_rechecks: Option<u32>,

    #[arg(
        long,
        help = "The period (in seconds) that is waited between checks for the ongoing mp \
                change to be finished."
    )]
    pub conflict_wait_period: Option<u64>,

    #[arg(long, help = "Optional name for the change set.")]
    pub change_set_name: Option<String>,
}

impl RecheckArgs {
    pub fn policy(&self) -> RecheckPolicy {
        RecheckPolicy::new(self.max_rechecks, self.conflict_wait_period)
    }
}

#[derive(Debug, Clone, Args)]
pub struct DescribeChangeSetArgs {
    #[arg(long, help = "The unique identifier of the change set.")]
    pub change_set_id: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Clone, Args)]
pub struct DescribeEntityArgs {
    #[arg(long, help = "The unique identifier of the entity.")]
    pub entity_id: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Clone, Args)]
pub struct ListEntitiesArgs {
    #[arg(long, help = "Entity type such as AmiProduct, ContainerProduct or Offer.")]
    pub entity_type: String,

    #[arg(long, value_parser = clap::value_parser!(i32).range(1..))]
    pub max_results: Option<i32>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Clone, Args)]
pub struct CancelChangeSetArgs {
    #[arg(long, help = "The unique identifier of the change set.")]
    pub change_set_id: String,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ImageCommands {
    /// Restrict the product version that delivers the given AMI.
    RestrictVersion(RestrictVersionArgs),
    /// Add a new AMI version to the product.
    AddVersion(AddVersionArgs),
    /// Print the delivery option id serving the given AMI.
    DeliveryOptionId(ImageLookupArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ImageLookupArgs {
    #[arg(
        long,
        help = "The unique identifier the product in the AWS Marketplace. \
                The expected format of the ID is a UUID."
    )]
    pub entity_id: String,

    #[arg(long, help = "The EC2 image ID.")]
    pub ami_id: String,
}

#[derive(Debug, Clone, Args)]
pub struct RestrictVersionArgs {
    #[command(flatten)]
    pub image: ImageLookupArgs,

    #[command(flatten)]
    pub recheck: RecheckArgs,
}

#[derive(Debug, Clone, Args)]
pub struct AddVersionArgs {
    #[command(flatten)]
    pub image: ImageLookupArgs,

    #[arg(long)]
    pub version_title: String,

    #[arg(long)]
    pub release_notes: String,

    #[arg(long, help = "IAM role the marketplace assumes to ingest the AMI.")]
    pub access_role_arn: String,

    #[arg(long)]
    pub os_name: String,

    #[arg(long)]
    pub os_version: String,

    #[arg(long)]
    pub usage_instructions: String,

    #[arg(long)]
    pub recommended_instance_type: String,

    #[arg(long, default_value = "ec2-user")]
    pub ssh_user: String,

    #[arg(long, default_value_t = 22)]
    pub ssh_port: u16,

    #[command(flatten)]
    pub recheck: RecheckArgs,
}

impl AddVersionArgs {
    pub fn ami_version(&self) -> AmiVersion {
        AmiVersion {
            ami_id: self.image.ami_id.clone(),
            version_title: self.version_title.clone(),
            release_notes: self.release_notes.clone(),
            access_role_arn: self.access_role_arn.clone(),
            os_name: self.os_name.clone(),
            os_version: self.os_version.clone(),
            usage_instructions: self.usage_instructions.clone(),
            recommended_instance_type: self.recommended_instance_type.clone(),
            ssh_user: self.ssh_user.clone(),
            ssh_port: self.ssh_port,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum ContainerCommands {
    /// Add a Helm delivery option in a new product version.
    AddDeliveryOption(HelmArgs),
    /// Update the Helm delivery option of a product version.
    UpdateDeliveryOption(UpdateHelmArgs),
    /// Print the Helm delivery option id of a product version.
    DeliveryOptionId(ContainerLookupArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ContainerLookupArgs {
    #[arg(long, help = "The unique identifier the product in the AWS Marketplace.")]
    pub entity_id: String,

    #[arg(long, help = "Title of the product version.")]
    pub version_title: String,
}

#[derive(Debug, Clone, Args)]
pub struct HelmArgs {
    #[command(flatten)]
    pub target: ContainerLookupArgs,

    #[arg(long)]
    pub release_notes: String,

    #[arg(long)]
    pub delivery_option_title: String,

    #[arg(long, value_delimiter = ',', required = true, help = "For example EKS,EKS-Anywhere.")]
    pub compatible_services: Vec<String>,

    #[arg(long, value_delimiter = ',', required = true)]
    pub container_images: Vec<String>,

    #[arg(long)]
    pub helm_chart_uri: String,

    #[arg(long = "description", help = "Description of the Helm chart.")]
    pub helm_chart_description: String,

    #[arg(long)]
    pub usage_instructions: String,

    #[arg(long)]
    pub quick_launch_enabled: bool,

    #[arg(long)]
    pub marketplace_service_account_name: String,

    #[arg(long)]
    pub release_name: String,

    #[arg(long)]
    pub namespace: String,

    #[arg(
        long,
        value_name = "PATH",
        value_parser = existing_path,
        help = "YAML file with a list of override parameters."
    )]
    pub override_parameters: Option<PathBuf>,

    #[command(flatten)]
    pub recheck: RecheckArgs,
}

impl HelmArgs {
    pub fn delivery_option(&self) -> Result<HelmDeliveryOption> {
        let override_parameters = match &self.override_parameters {
            Some(path) => load_override_parameters(path)?,
            None => Vec::new(),
        };

        Ok(HelmDeliveryOption {
            version_title: self.target.version_title.clone(),
            release_notes: self.release_notes.clone(),
            delivery_option_title: self.delivery_option_title.clone(),
            compatible_services: self.compatible_services.clone(),
            container_images: self.container_images.clone(),
            helm_chart_uri: self.helm_chart_uri.clone(),
            description: self.helm_chart_description.clone(),
            usage_instructions: self.usage_instructions.clone(),
            quick_launch_enabled: self.quick_launch_enabled,
            marketplace_service_account_name: self.marketplace_service_account_name.clone(),
            release_name: self.release_name.clone(),
            namespace: self.namespace.clone(),
            override_parameters,
        })
    }
}

#[derive(Debug, Clone, Args)]
pub struct UpdateHelmArgs {
    #[command(flatten)]
    pub helm: HelmArgs,

    #[arg(
        long,
        help = "Delivery option to update. Looked up by version title when omitted."
    )]
    pub delivery_option_id: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum OfferCommands {
    /// Describe an offer.
    Describe(OfferDescribeArgs),
    /// Release a draft offer.
    Release(OfferReleaseArgs),
    /// Change the date the offer expires.
    UpdateExpiry(OfferExpiryArgs),
}

#[derive(Debug, Clone, Args)]
pub struct OfferDescribeArgs {
    #[arg(long)]
    pub offer_id: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Clone, Args)]
pub struct OfferReleaseArgs {
    #[arg(long)]
    pub offer_id: String,

    #[command(flatten)]
    pub recheck: RecheckArgs,
}

#[derive(Debug, Clone, Args)]
pub struct OfferExpiryArgs {
    #[arg(long)]
    pub offer_id: String,

    #[arg(long, value_parser = expiry_date, help = "New expiry date as YYYY-MM-DD.")]
    pub expiry_date: NaiveDate,

    #[command(flatten)]
    pub recheck: RecheckArgs,
}
