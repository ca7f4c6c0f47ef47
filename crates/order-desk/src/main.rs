mod core;
mod domain;
mod infra;

use std::sync::Arc;

use crate::core::App;
use crate::infra::{
    Config, Consumer, LineSource, LogGuard, MemoryOrderStore, Settings, StdoutSender,
    UnixSignalHandler, handlers, handlers::audit::AuditTrail,
};
use tracing::info;

const CONFIG_PATH: &str = "./config";

fn main() -> anyhow::Result<()> {
    load_config()?;
    let settings = Settings::from_config(&Config::new())?;
    let _log_guard = LogGuard::init(settings.log_filter.as_deref())?;
    info!("starting with {:?}", settings);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let res = runtime.block_on(serve(settings));

    // A pending stdin read holds a blocking thread that cannot be interrupted.
    runtime.shutdown_background();
    res
}

async fn serve(settings: Settings) -> anyhow::Result<()> {
    let audit = Arc::new(AuditTrail::new());
    let mediator = handlers::registry(Arc::new(MemoryOrderStore::new()), audit.clone())?;

    let source = LineSource::stdin();
    let consumer = Consumer::new(mediator, StdoutSender::stdout(), settings.concurrency);

    let app = App::new(
        UnixSignalHandler::new()?,
        source,
        consumer,
        settings.shutdown_timeout,
    );

    app.run().await?;

    info!("{} orders placed this session", audit.entries().await.len());
    Ok(())
}

/// A missing config file is fine; a malformed one is not.
fn load_config() -> anyhow::Result<()> {
    match dotenv::from_path(CONFIG_PATH) {
        Ok(()) | Err(dotenv::Error::Io(_)) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
