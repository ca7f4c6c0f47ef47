use std::{sync::Arc, time::Duration};

use tokio::time::timeout;
use tracing::{error, info};

use crate::{
    core::{Shutdowner, SignalHandler},
    domain::{consumer::CommandConsumer, source::CommandSource},
};

pub struct App<S, F, C> {
    signal_handler: S,
    source: F,
    consumer: Arc<C>,
    shutdown_timeout: Duration,
}

impl<S, F, C> App<S, F, C>
where
    S: SignalHandler,
    F: CommandSource + Shutdowner,
    C: CommandConsumer + Shutdowner,
{
    pub fn new(signal_handler: S, source: F, consumer: C, shutdown_timeout: Duration) -> Self {
        Self {
            signal_handler,
            source,
            consumer: Arc::new(consumer),
            shutdown_timeout,
        }
    }

    /// Runs until input is exhausted or a shutdown signal arrives.
    pub async fn run(self) -> anyhow::Result<()> {
        info!("app running...");

        let Self {
            signal_handler,
            source,
            consumer,
            shutdown_timeout,
        } = self;

        let command_ch = source.fetch().await?;
        let mut handle = {
            let consumer = consumer.clone();
            tokio::spawn(async move {
                consumer.consume(command_ch).await;
            })
        };

        tokio::select! {
            res = &mut handle => {
                info!("input exhausted, stopping");
                res?;
                return Ok(());
            }
            signal = signal_handler.wait_for_shutdown() => {
                info!("received signal {}, stopping", signal?);
            }
        }

        source.shutdown().await?;

        match timeout(shutdown_timeout, &mut handle).await {
            Ok(res) => {
                info!("graceful shutdown complete");
                res?;
            }
            Err(_) => {
                error!("shutdown timeout exceeded, cancelling in-flight requests");
                consumer.shutdown().await?;
                handle.abort();
            }
        }

        Ok(())
    }
}
