use async_trait::async_trait;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin},
    sync::{Mutex, mpsc},
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{
    core::Shutdowner,
    domain::{models::Incoming, source::CommandSource},
    infra::source::parser::parse_line,
};

const CHANNEL_CAPACITY: usize = 100;

/// Reads commands line by line from any buffered reader.
pub struct LineSource<R> {
    reader: Mutex<Option<R>>,
    cancel_token: CancellationToken,
}

impl LineSource<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(Some(reader)),
            cancel_token: CancellationToken::new(),
        }
    }
}

#[async_trait]
impl<R> Shutdowner for LineSource<R>
where
    R: Send,
{
    async fn shutdown(&self) -> anyhow::Result<()> {
        self.cancel_token.cancel();
        Ok(())
    }
}

impl<R> Drop for LineSource<R> {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

#[async_trait]
impl<R> CommandSource for LineSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    async fn fetch(&self) -> anyhow::Result<mpsc::Receiver<Incoming>> {
        let reader = self
            .reader
            .lock()
            .await
            .take()
            .ok_or_else(|| anyhow::anyhow!("line source already started"))?;
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let cancellation_token = self.cancel_token.clone();

        tokio::spawn(async move {
            let mut lines = reader.lines();
            let mut line_no = 0u64;

            loop {
                tokio::select! {
                    biased;

                    _ = cancellation_token.cancelled() => {
                        info!("source cancelled, stopping...");
                        break
                    }

                    next = lines.next_line() => {
                        let text = match next {
                            Ok(Some(text)) => text,
                            Ok(None) => {
                                info!("input closed");
                                break;
                            }
                            Err(e) => {
                                error!("failed to read input: {}", e);
                                break;
                            }
                        };

                        line_no += 1;
                        let command = match parse_line(&text) {
                            Ok(Some(command)) => Ok(command),
                            Ok(None) => continue,
                            Err(e) => Err(e),
                        };

                        let incoming = Incoming { line: line_no, command };
                        if tx.send(incoming).await.is_err() {
                            info!("receiver dropped");
                            break;
                        }
                    }
                }
            }
        });

        Ok(rx)
    }
}
