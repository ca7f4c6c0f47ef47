use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, stream::FuturesUnordered};
use mediator::{Context, Mediator, SendError};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::{
    core::Shutdowner,
    domain::{
        consumer::CommandConsumer,
        models::{Command, Incoming},
        requests::{CreateOrderRequest, GetOrderRequest, ListOrdersRequest, OrderPlaced},
        sender::Sender,
    },
};

/// Dispatches every incoming command through the mediator and writes one
/// JSON reply per command. Replies to concurrent reads may arrive out of
/// line order; the `line` field ties each reply to its command.
pub struct Consumer<S> {
    mediator: Mediator,
    sender: Arc<S>,
    concurrency: usize,
    cancel_token: CancellationToken,
}

impl<S: Sender> Consumer<S> {
    pub fn new(mediator: Mediator, sender: S, concurrency: usize) -> Self {
        Self {
            mediator,
            sender: Arc::new(sender),
            concurrency: concurrency.max(1),
            cancel_token: CancellationToken::new(),
        }
    }

    async fn reply(&self, incoming: Incoming) {
        let Incoming { line, command } = incoming;

        let body = match command {
            Ok(command) => {
                let ctx = Context::with_cancel_token(self.cancel_token.child_token());
                match execute(&self.mediator, command, &ctx).await {
                    Ok(value) => json!({ "line": line, "ok": value }),
                    Err(e) => json!({ "line": line, "error": format!("{e:#}") }),
                }
            }
            Err(e) => json!({ "line": line, "error": e.to_string() }),
        };

        if let Err(e) = self.sender.send(&body.to_string()).await {
            handle_error(e);
        }
    }
}

#[async_trait]
impl<S: Sender> CommandConsumer for Consumer<S> {
    /// Reads run up to `concurrency` at a time. A create waits for every
    /// earlier command to finish and runs alone, so a later `get` sees it.
    async fn consume(&self, ch: mpsc::Receiver<Incoming>) {
        let mut commands = ReceiverStream::new(ch);
        let mut in_flight = FuturesUnordered::new();

        loop {
            tokio::select! {
                Some(()) = in_flight.next(), if !in_flight.is_empty() => {}

                next = commands.next(), if in_flight.len() < self.concurrency => {
                    let Some(incoming) = next else { break };

                    if incoming.is_write() {
                        while in_flight.next().await.is_some() {}
                        self.reply(incoming).await;
                    } else {
                        in_flight.push(self.reply(incoming));
                    }
                }
            }
        }

        while in_flight.next().await.is_some() {}
    }
}

#[async_trait]
impl<S: Sender> Shutdowner for Consumer<S> {
    async fn shutdown(&self) -> anyhow::Result<()> {
        self.cancel_token.cancel();
        Ok(())
    }
}

/// Maps a command onto its request type and sends it.
async fn execute(
    mediator: &Mediator,
    command: Command,
    ctx: &Context,
) -> Result<Value, SendError> {
    let value = match command {
        Command::Create {
            customer,
            product,
            qty,
        } => {
            let request = CreateOrderRequest {
                customer: customer.clone(),
                product,
                qty,
            };
            let order_id = mediator.send_with(request, ctx).await?;

            mediator
                .publish_with(OrderPlaced { order_id, customer }, ctx)
                .await?;

            json!({ "order_id": order_id })
        }
        Command::Get { order_id } => {
            let view = mediator
                .send_with(GetOrderRequest { order_id }, ctx)
                .await?;
            json!(view)
        }
        Command::List => {
            let views = mediator.send_with(ListOrdersRequest, ctx).await?;
            json!(views)
        }
    };

    Ok(value)
}

fn handle_error(e: anyhow::Error) {
    error!("failed to send reply: {}", e);
}
