use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use anim_loader::{
    config::Config,
    services::{DirectoryPicker, FileImporter, PathPicker, PickerRegistry},
    storage::SqliteStore,
    FilePicker, ImportSummary,
};

#[derive(Parser, Debug)]
#[command(name = "anim-loader", version, about = "Import animation files into local storage")]
struct Cli {
    /// Config file to use instead of ~/.anim-loader/config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import the given files
    Import {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Import every file in a directory
    ImportDir { dir: PathBuf },
    /// Open the native file dialog and import the selection
    Pick,
    /// Print the stored animation and load counter
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Reset the load counter to 0
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Load config
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("anim_loader={}", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let store = Arc::new(SqliteStore::connect(&config.database_url).await?);

    match cli.command {
        Command::Import { paths } => {
            run_import(store, &config, Arc::new(PathPicker::new(paths))).await
        }
        Command::ImportDir { dir } => {
            run_import(store, &config, Arc::new(DirectoryPicker::new(dir))).await
        }
        Command::Pick => run_pick(store, &config).await,
        Command::Show { json } => {
            let state = FileImporter::from_config(store, &config).state().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                println!("{}: {}", config.counter_key, state.count);
                match state.content {
                    Some(content) => println!("{}:\n{}", config.content_key, content),
                    None => println!("{}: <empty>", config.content_key),
                }
            }
            Ok(())
        }
        Command::Reset => {
            FileImporter::from_config(store, &config).reset().await?;
            println!("{} reset to 0", config.counter_key);
            Ok(())
        }
    }
}

async fn run_import(
    store: Arc<SqliteStore>,
    config: &Config,
    picker: Arc<dyn FilePicker>,
) -> anyhow::Result<()> {
    let controls = PickerRegistry::new().with(config.control_id.clone(), picker);
    let importer = FileImporter::from_config(store, config).with_controls(controls);
    importer.initialize().await?;

    let summary = importer.trigger_pick().await?;
    report(&summary)
}

#[cfg(feature = "dialog")]
async fn run_pick(store: Arc<SqliteStore>, config: &Config) -> anyhow::Result<()> {
    let picker = anim_loader::services::DialogPicker::new("Load animation");
    run_import(store, config, Arc::new(picker)).await
}

#[cfg(not(feature = "dialog"))]
async fn run_pick(store: Arc<SqliteStore>, config: &Config) -> anyhow::Result<()> {
    // Built without a native dialog, so nothing is registered under the control id
    let importer = FileImporter::from_config(store, config);
    let summary = importer.trigger_pick().await?;
    report(&summary)
}

fn report(summary: &ImportSummary) -> anyhow::Result<()> {
    for outcome in &summary.outcomes {
        match &outcome.result {
            Ok(imported) => println!(
                "imported {} ({} bytes) -> count {}",
                outcome.name, imported.bytes, imported.count
            ),
            Err(e) => eprintln!("failed {}: {}", outcome.name, e),
        }
    }

    if summary.failed() > 0 {
        anyhow::bail!(
            "{} of {} files failed to import",
            summary.failed(),
            summary.outcomes.len()
        );
    }
    Ok(())
}
