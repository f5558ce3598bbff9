use console::style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Notice,
    Success,
    Failure,
}

pub fn styled(message: &str, tone: Tone, no_color: bool) -> String {
    if no_color {
        return message.to_string();
    }

    match tone {
        Tone::Notice => style(message).yellow().to_string(),
        Tone::Success => style(message).green().to_string(),
        Tone::Failure => style(message).red().to_string(),
    }
}

/// Prints to stdout.
pub fn echo_style(message: &str, tone: Tone, no_color: bool) {
    println!("{}", styled(message, tone, no_color));
}

/// Prints to stderr; used for notices and failures.
pub fn eecho_style(message: &str, tone: Tone, no_color: bool) {
    eprintln!("{}", styled(message, tone, no_color));
}
