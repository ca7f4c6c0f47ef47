use std::any::{Any, type_name};
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{context::Context, error::SendError};

/// A fact broadcast to every subscriber of its type.
///
/// Unlike a [`Request`](crate::Request) a notification may have any number
/// of handlers, including none.
pub trait Notification: Clone + Send + Sync + 'static {}

#[async_trait]
pub trait NotificationHandler<N: Notification>: Send + Sync + 'static {
    async fn handle(&self, notification: N, ctx: &Context) -> anyhow::Result<()>;
}

#[async_trait]
impl<N, H> NotificationHandler<N> for Arc<H>
where
    N: Notification,
    H: NotificationHandler<N> + ?Sized,
{
    async fn handle(&self, notification: N, ctx: &Context) -> anyhow::Result<()> {
        (**self).handle(notification, ctx).await
    }
}

#[async_trait]
pub(crate) trait DynNotificationHandler: Send + Sync + 'static {
    async fn call(
        &self,
        notification: &(dyn Any + Send + Sync),
        ctx: &Context,
    ) -> Result<(), SendError>;
}

pub(crate) struct TypedNotificationHandler<N, H> {
    handler: H,
    _phantom: PhantomData<fn(N)>,
}

impl<N, H> TypedNotificationHandler<N, H>
where
    N: Notification,
    H: NotificationHandler<N>,
{
    pub(crate) fn new(handler: H) -> Self {
        Self {
            handler,
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<N, H> DynNotificationHandler for TypedNotificationHandler<N, H>
where
    N: Notification,
    H: NotificationHandler<N>,
{
    async fn call(
        &self,
        notification: &(dyn Any + Send + Sync),
        ctx: &Context,
    ) -> Result<(), SendError> {
        let notification = notification
            .downcast_ref::<N>()
            .ok_or_else(|| SendError::ErasedTypeMismatch {
                request: type_name::<N>(),
                expected: type_name::<N>(),
                found: (*notification).type_id(),
            })?
            .clone();

        self.handler
            .handle(notification, ctx)
            .await
            .map_err(SendError::Handler)
    }
}
