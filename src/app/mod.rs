pub mod catalog;
pub mod container;
pub mod image;
pub mod offer;

use crate::config::cli::{Commands, OutputArgs, RecheckArgs};
use crate::core::changeset::start_mp_change_set;
use crate::core::query;
use crate::domain::model::{ChangeRequest, ChangeSetRequest};
use crate::domain::ports::CatalogClient;
use crate::utils::error::Result;
use serde::Serialize;

/// What a command produced, ready to be printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Rendered API response, printed as is.
    Document(String),
    /// Outcome of a mutation, printed highlighted.
    Success(String),
}

impl Report {
    pub fn text(&self) -> &str {
        match self {
            Report::Document(text) | Report::Success(text) => text,
        }
    }
}

pub async fn execute<C: CatalogClient + ?Sized>(client: &C, command: &Commands) -> Result<Report> {
    match command {
        Commands::DescribeChangeSet(args) => catalog::describe_change_set(client, args).await,
        Commands::DescribeEntity(args) => catalog::describe_entity(client, args).await,
        Commands::ListEntities(args) => catalog::list_entities(client, args).await,
        Commands::CancelChangeSet(args) => catalog::cancel_change_set(client, args).await,
        Commands::Image(command) => image::execute(client, command).await,
        Commands::Container(command) => container::execute(client, command).await,
        Commands::Offer(command) => offer::execute(client, command).await,
    }
}

pub(crate) fn document<T: Serialize>(value: &T, output: &OutputArgs) -> Result<Report> {
    let value = serde_json::to_value(value)?;
    let filtered = query::filter(output.query.as_deref(), value)?;
    Ok(Report::Document(query::render(&filtered, output.output)?))
}

pub(crate) async fn start_change<C: CatalogClient + ?Sized>(
    client: &C,
    change: ChangeRequest,
    recheck: &RecheckArgs,
) -> Result<Report> {
    let request = ChangeSetRequest {
        changes: vec![change],
        name: recheck.change_set_name.clone(),
    };

    let started = start_mp_change_set(client, &request, &recheck.policy())
        .await
        .map_err(|e| e.context("Unable to start change set"))?;

    Ok(Report::Success(format!("Change set Id: {}", started.change_set_id)))
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::config::cli::{Cli, Commands};
    use clap::Parser;

    pub fn command(args: &[&str]) -> Commands {
        let cli = Cli::try_parse_from(std::iter::once("aws-mp-utils").chain(args.iter().copied()))
            .unwrap();
        cli.command.unwrap()
    }
}
