use async_trait::async_trait;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt, Stdout},
    sync::Mutex,
};

use crate::domain::sender::Sender;

/// Writes each message as one line. Concurrent sends never interleave.
pub struct LineSender<W> {
    out: Mutex<W>,
}

pub type StdoutSender = LineSender<Stdout>;

impl StdoutSender {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W> LineSender<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W> Sender for LineSender<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn send(&self, message: &str) -> anyhow::Result<()> {
        let mut out = self.out.lock().await;
        out.write_all(message.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_each_message_is_one_line() {
        let sender = LineSender::new(Vec::<u8>::new());

        sender.send("first").await.unwrap();
        sender.send("second").await.unwrap();

        let written = String::from_utf8(sender.into_inner()).unwrap();
        assert_eq!(written, "first\nsecond\n");
    }
}
