use crate::config::LogLevel;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays machine readable.
pub fn init_cli_logger(level: LogLevel, no_color: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!no_color)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

fn default_directive(level: LogLevel) -> String {
    match level {
        // SDK internals are only interesting when debugging
        LogLevel::Debug => "aws_mp_utils=debug,aws_config=info,warn".to_string(),
        other => format!("aws_mp_utils={},error", other.as_filter()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(LogLevel::Info), "aws_mp_utils=info,error");
        assert_eq!(default_directive(LogLevel::Error), "aws_mp_utils=error,error");
        assert!(default_directive(LogLevel::Debug).starts_with("aws_mp_utils=debug"));
    }
}
