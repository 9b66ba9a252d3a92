use log::LevelFilter;

#[cfg(not(debug_assertions))]
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Warn;

#[cfg(debug_assertions)]
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Debug;

const DEFAULT_BACKGROUND: &str = "rgb(255, 255, 255)";

#[derive(Debug, PartialEq)]
pub enum Command {
    // Print luminance and brightness class of a color
    Classify(String),

    // Load a page with the given background and print its state
    State { background: String },

    // Load a page with the given background, toggle it and print the outcome
    Toggle { background: String },

    Help,
}

#[derive(Debug)]
pub struct CliArguments {
    // Directory holding config.json and the stored preference
    pub data: Option<String>,

    // Log level to use: off, error, warn, info, debug, trace
    pub log_level: log::LevelFilter,

    pub command: Command,
}

impl CliArguments {
    fn parse_log(&mut self, level: String) {
        self.log_level = match level.as_ref() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => DEFAULT_LOG_LEVEL,
        }
    }
}

pub const USAGE: &str = "usage: dark-mode-reader [--data=<dir>] [--log=<level>] <command>

commands:
    classify <color>              print luminance and class of a CSS color
    state [--background=<color>]  print the state of a page with that background
    toggle [--background=<color>] toggle a page with that background and persist the choice";

pub fn parse(raw: impl IntoIterator<Item = impl Into<std::ffi::OsString>>) -> CliArguments {
    let mut cli = CliArguments {
        data: None,
        log_level: DEFAULT_LOG_LEVEL,
        command: Command::Help,
    };

    let mut background: Option<String> = None;
    let mut positional: Vec<String> = Vec::new();

    let raw = clap_lex::RawArgs::new(raw);
    let mut cursor = raw.cursor();
    raw.next(&mut cursor); // Skip the bin

    while let Some(arg) = raw.next(&mut cursor) {
        if let Some((long, value)) = arg.to_long() {
            let value = value.map(|v| v.to_string_lossy().into_owned());
            match long {
                Ok("data") => cli.data = value.or(cli.data),
                Ok("log") => {
                    if let Some(value) = value {
                        cli.parse_log(value);
                    }
                }
                Ok("background") => background = value.or(background),
                _ => {
                    // Ignore unexpected flags
                }
            }
        } else if let Some(mut shorts) = arg.to_short() {
            while let Some(short) = shorts.next() {
                match short {
                    Ok('l') => {
                        if let Some(value) = shorts.next_value_os() {
                            let value = value.to_string_lossy();
                            cli.parse_log(value.trim_start_matches('=').to_string());
                        }
                    }
                    Ok('d') => {
                        if let Some(value) = shorts.next_value_os() {
                            let value = value.to_string_lossy();
                            cli.data = Some(value.trim_start_matches('=').to_string());
                        }
                    }
                    _ => {
                        // Ignore unexpected flags
                    }
                }
            }
        } else {
            positional.push(arg.to_value_os().to_string_lossy().into_owned());
        }
    }

    let background = background.unwrap_or_else(|| DEFAULT_BACKGROUND.to_string());
    let mut positional = positional.into_iter();
    cli.command = match positional.next().as_deref() {
        Some("classify") => match positional.next() {
            Some(color) => Command::Classify(color),
            None => Command::Help,
        },
        Some("state") => Command::State { background },
        Some("toggle") => Command::Toggle { background },
        _ => Command::Help,
    };

    cli
}
