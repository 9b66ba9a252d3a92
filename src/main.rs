use std::path::PathBuf;

use anyhow::Context;
use log::{debug, info};

use dark_mode_reader::background::ActionButton;
use dark_mode_reader::page::{PageContext, PageRuntime};
use dark_mode_reader::storage::JsonFileStore;
use dark_mode_reader::utils::rgb::Rgb;
use dark_mode_reader::{config, detect, luminance, Config, RootStyle, StaticDocument, ThemeMachine};

mod cli;

use cli::{CliArguments, Command};

const PREFERENCES_FILE_NAME: &str = "preferences.json";

fn main() -> anyhow::Result<()> {
    let cli = cli::parse(std::env::args_os());

    pretty_env_logger::formatted_builder()
        .filter_level(cli.log_level)
        .init();
    debug!("cli arguments={:?}", cli);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(run(cli))
}

async fn run(cli: CliArguments) -> anyhow::Result<()> {
    let data_dir = config::config_dir(cli.data.as_deref().map(PathBuf::from).as_deref())?;

    match cli.command {
        Command::Help => println!("{}", cli::USAGE),

        Command::Classify(color) => {
            let page = StaticDocument::with_body_background(&color);
            let sample = Rgb::parse_css(&color);
            if sample.is_none() {
                info!("{:?} is not an rgb()/rgba()/#RRGGBB color, assuming white", color);
            }

            println!(
                "{} luminance={:.4} mode={:?}",
                color,
                luminance(sample.unwrap_or(Rgb::WHITE)),
                detect(&page)
            );
        }

        Command::State { background } => {
            let (runtime, _action) = load_page(&data_dir, &background).await;
            let state = runtime.client().get_state().await?;
            println!("{}", serde_json::to_string(&state)?);
            runtime.unload().await;
        }

        Command::Toggle { background } => {
            let (runtime, _action) = load_page(&data_dir, &background).await;
            let outcome = runtime.client().toggle().await?;
            println!("{}", serde_json::to_string(&outcome)?);
            runtime.unload().await;
        }
    }

    Ok(())
}

/// Loads a page with the given background the way a content script would on
/// document load.
async fn load_page(data_dir: &std::path::Path, background: &str) -> (PageRuntime, ActionButton) {
    let config: Config = config::load(data_dir);
    let store = JsonFileStore::new(data_dir.join(PREFERENCES_FILE_NAME));

    let machine = ThemeMachine::new(
        StaticDocument::with_body_background(background),
        RootStyle::new(&config),
    );
    let context = PageContext::load(machine, store, config.storage_key.clone()).await;

    let (action, triggers) = ActionButton::channel();
    (PageRuntime::spawn(context, triggers), action)
}
