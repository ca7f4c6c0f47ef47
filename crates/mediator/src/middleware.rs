use std::{any::type_name, fmt::Debug, time::Instant};

use async_trait::async_trait;
use tracing::{debug, error};

use crate::{context::Context, handler::RequestHandler, request::Request};

/// Logs each request and any failure, then defers to the wrapped handler.
pub struct LoggingMiddleware<H> {
    inner: H,
}

impl<H> LoggingMiddleware<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

#[async_trait]
impl<R, H> RequestHandler<R> for LoggingMiddleware<H>
where
    R: Request + Debug,
    H: RequestHandler<R>,
{
    async fn handle(&self, request: R, ctx: &Context) -> anyhow::Result<R::Response> {
        debug!("{:?}", request);
        let started = Instant::now();

        let res = self.inner.handle(request, ctx).await;
        if let Err(e) = &res {
            error!(
                "{} failed after {:?}: {:#}",
                type_name::<R>(),
                started.elapsed(),
                e
            );
        }

        res
    }
}
