use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use threadview_browse::{BrowseEvent, Browser, BrowserHandle, ViewModel};
use threadview_cli::{CliError, Command, Config, Renderer, HELP};
use threadview_engine::ArchiveEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!(
        page_size = config.browse.page_size,
        initial_window = config.engine.initial_window,
        "Starting threadview"
    );

    let engine = Arc::new(ArchiveEngine::new(config.engine.clone()));
    let (handle, mut events) = Browser::new(engine)
        .with_config(config.browse.clone())
        .spawn();
    let renderer = Renderer::new(&config.display);

    match std::env::args().nth(1) {
        Some(path) => load_archive(&handle, Path::new(&path)).await?,
        None => {
            println!("{}", renderer.render(&ViewModel::Empty { loading: false }));
            println!("Type `help` for commands.");
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_view: Option<String> = None;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match Command::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(Command::Help)) => println!("{}", HELP),
                    Ok(Some(Command::Load(path))) => {
                        if let Err(e) = load_archive(&handle, &path).await {
                            println!("Error: {}", e);
                        }
                    }
                    Ok(Some(command)) => {
                        if let Some(intent) = command.into_intent() {
                            handle.send(intent).await?;
                        }
                    }
                    Err(e) => println!("{}", e),
                }
            }
            event = events.recv() => {
                let Some(event) = event else {
                    break;
                };
                let is_view = matches!(event, BrowseEvent::View(_));
                if let Some(text) = renderer.render_event(&event) {
                    // The browser re-emits unchanged views after dropped results
                    if is_view && last_view.as_deref() == Some(text.as_str()) {
                        continue;
                    }
                    println!("{}", text);
                    if is_view {
                        last_view = Some(text);
                    }
                }
            }
        }
    }

    tracing::info!("Exiting");
    Ok(())
}

async fn load_archive(handle: &BrowserHandle, path: &Path) -> Result<(), CliError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::ReadArchive {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(path = %path.display(), bytes = raw.len(), "Loading archive");
    handle.load_archive(raw).await?;
    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // Rendered views own stdout
    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
