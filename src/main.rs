use aws_mp_utils::app::{self, Report};
use aws_mp_utils::config::cli::LICENSE;
use aws_mp_utils::utils::output::{echo_style, eecho_style, Tone};
use aws_mp_utils::utils::{logger, validation::Validate};
use aws_mp_utils::{AppConfig, AwsCatalogClient, Cli};
use clap::{CommandFactory, Parser};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.license {
        println!("{}", LICENSE);
        return;
    }

    let Some(command) = cli.command.as_ref() else {
        // Only shared options were given
        if let Err(e) = Cli::command().print_help() {
            eecho_style(&e.to_string(), Tone::Failure, cli.shared.no_color);
        }
        std::process::exit(2);
    };

    let overrides = cli.shared.overrides();
    let no_color = overrides.no_color.unwrap_or(false);
    let config = match AppConfig::load(&overrides) {
        Ok(config) => config,
        Err(e) => {
            eecho_style(&e.to_string(), Tone::Failure, no_color);
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(config.log_level, config.no_color);
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eecho_style(&e.to_string(), Tone::Failure, config.no_color);
        std::process::exit(1);
    }

    let client = AwsCatalogClient::connect(&config).await;

    match app::execute(&client, command).await {
        Ok(Report::Document(text)) => println!("{}", text),
        Ok(Report::Success(text)) => echo_style(&text, Tone::Success, config.no_color),
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            eecho_style(&e.to_string(), Tone::Failure, config.no_color);
            std::process::exit(1);
        }
    }
}
