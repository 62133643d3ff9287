//! `page-router`: resolve and render routes from an app manifest.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use page_router::config::{load_config, ConfigWatcher};
use page_router::lifecycle::signals::spawn_ctrl_c;
use page_router::observability::logging::init_logging;
use page_router::{RouterApp, Shutdown};

#[derive(Parser)]
#[command(name = "page-router")]
#[command(about = "Resolve and render file-system routes", long_about = None)]
struct Cli {
    /// App manifest (TOML).
    #[arg(short, long, default_value = "manifest.toml")]
    manifest: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render each path and print the result
    Render { paths: Vec<String> },
    /// Render paths read from stdin, one per line
    ServeStdin {
        /// Reload the manifest when it changes and re-render the last path
        #[arg(long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.manifest)?;
    init_logging(&config.observability)?;

    tracing::info!(
        manifest = ?cli.manifest,
        pages = config.pages.len(),
        "page-router v0.1.0 starting"
    );

    let mut app = RouterApp::new(config);

    match cli.command {
        Commands::Render { paths } => {
            for path in paths {
                println!("{}", app.render(&path).await);
            }
        }
        Commands::ServeStdin { watch } => serve_stdin(&mut app, &cli.manifest, watch).await?,
    }

    app.controller_mut().unmount();
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn serve_stdin(
    app: &mut RouterApp,
    manifest: &std::path::Path,
    watch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let shutdown = Arc::new(Shutdown::new());
    spawn_ctrl_c(shutdown.clone());
    let mut stop = shutdown.subscribe();

    let (watcher, mut updates) = ConfigWatcher::new(manifest);
    let _guard = if watch { Some(watcher.run()?) } else { None };
    let mut watching = watch;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last: Option<String> = None;

    loop {
        tokio::select! {
            _ = stop.recv() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let path = line.trim();
                if path.is_empty() {
                    continue;
                }
                println!("{}", app.render(path).await);
                last = Some(path.to_string());
            }
            update = updates.recv(), if watching => match update {
                Some(next) => {
                    let diff = app.reload(next).await?;
                    if diff.is_empty() {
                        continue;
                    }
                    if let Some(path) = &last {
                        println!("{}", app.render(path).await);
                    }
                }
                None => watching = false,
            },
        }
    }
    Ok(())
}
