use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use symdex::{AppConfig, AppState, IndexHandle, SearchMetrics, TableFormat};
use tracing::info;

#[derive(Parser)]
#[command(name = "symdex")]
#[command(about = "Symbol search service for generated documentation", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(long, env = "SYMDEX_CONFIG")]
    config: Option<PathBuf>,

    /// Serve a single search table file
    #[arg(long, env = "SYMDEX_TABLE", conflicts_with = "search_dir")]
    table: Option<PathBuf>,

    /// Table format (auto, doxygen, json)
    #[arg(long, env = "SYMDEX_FORMAT", default_value = "auto")]
    format: String,

    /// Serve a Doxygen search/ directory
    #[arg(long, env = "SYMDEX_SEARCH_DIR")]
    search_dir: Option<PathBuf>,

    /// Search table category inside --search-dir (all, classes, functions, ...)
    #[arg(long, env = "SYMDEX_CATEGORY", default_value = "all")]
    category: String,

    /// Bind address for the HTTP API
    #[arg(long, env = "SYMDEX_BIND_ADDR")]
    bind_addr: Option<String>,

    /// HTTP API port
    #[arg(long, env = "SYMDEX_HTTP_PORT")]
    http_port: Option<u16>,
}

impl Args {
    fn into_config(self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(table) = self.table {
            let format: TableFormat = self.format.parse()?;
            config = config.with_table_file(table, format);
        } else if let Some(dir) = self.search_dir {
            config = config.with_search_dir(dir, self.category);
        }
        if let Some(addr) = self.bind_addr {
            config = config.with_bind_addr(addr);
        }
        if let Some(port) = self.http_port {
            config = config.with_http_port(port);
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = Args::parse().into_config()?;

    info!("Starting symdex v{}", symdex::VERSION);
    info!("  Table source: {}", config.index.source.describe());
    info!("  Default limit: {}", config.index.default_limit);
    info!("  Max limit: {}", config.index.max_limit);

    let handle = Arc::new(
        IndexHandle::open(config.index.source.clone())
            .with_context(|| format!("loading {}", config.index.source.describe()))?,
    );
    info!(
        "Symbol index loaded: {} entries, {} keys",
        handle.current().len(),
        handle.current().key_count()
    );

    let metrics = Arc::new(SearchMetrics::new()?);

    #[cfg(unix)]
    spawn_reload_on_sighup(handle.clone(), metrics.clone())?;

    let app_state = AppState::new(handle, metrics, config.index.clone());
    let app = symdex::create_router(app_state, config.server.permissive_cors);

    let http_addr = config.server.listen_addr();
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    info!("HTTP API server listening on {}", http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received shutdown signal, gracefully shutting down");
            }
        })
        .await?;

    Ok(())
}

/// Reload the table whenever the process receives SIGHUP
#[cfg(unix)]
fn spawn_reload_on_sighup(handle: Arc<IndexHandle>, metrics: Arc<SearchMetrics>) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangups = signal(SignalKind::hangup())?;
    tokio::spawn(async move {
        while hangups.recv().await.is_some() {
            info!("Received SIGHUP, reloading symbol index");
            let reloading = handle.clone();
            // Failures are logged by the handle; the old index keeps serving
            match tokio::task::spawn_blocking(move || reloading.reload()).await {
                Ok(Ok((index, generation))) => {
                    metrics.record_reload(true);
                    metrics.set_index(&index, generation);
                }
                _ => metrics.record_reload(false),
            }
        }
    });
    Ok(())
}
