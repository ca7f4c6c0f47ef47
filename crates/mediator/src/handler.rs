use std::any::Any;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    context::Context,
    error::SendError,
    request::{Request, RequestKind, TypeTag},
};

/// Owned, type-erased value passed across [`DynHandler`].
pub type AnyBox = Box<dyn Any + Send>;

/// The unit of behavior bound to exactly one request type.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync + 'static {
    async fn handle(&self, request: R, ctx: &Context) -> anyhow::Result<R::Response>;
}

#[async_trait]
impl<R, H> RequestHandler<R> for Arc<H>
where
    R: Request,
    H: RequestHandler<R> + ?Sized,
{
    async fn handle(&self, request: R, ctx: &Context) -> anyhow::Result<R::Response> {
        (**self).handle(request, ctx).await
    }
}

/// Handler built from an async closure, see [`handler_fn`].
pub struct FnHandler<F, R, Fut> {
    f: F,
    _phantom: PhantomData<fn(R) -> Fut>,
}

/// Adapts `|request, ctx| async move { ... }` into a [`RequestHandler`].
///
/// The closure receives an owned clone of the [`Context`] so the returned
/// future does not borrow from the call.
pub fn handler_fn<R, F, Fut>(f: F) -> FnHandler<F, R, Fut>
where
    R: Request,
    F: Fn(R, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<R::Response>> + Send + 'static,
{
    FnHandler {
        f,
        _phantom: PhantomData,
    }
}

#[async_trait]
impl<R, F, Fut> RequestHandler<R> for FnHandler<F, R, Fut>
where
    R: Request,
    F: Fn(R, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<R::Response>> + Send + 'static,
{
    async fn handle(&self, request: R, ctx: &Context) -> anyhow::Result<R::Response> {
        (self.f)(request, ctx.clone()).await
    }
}

/// Type-erased handler as stored in the registry.
///
/// Most code never implements this directly; [`TypedHandler`] covers every
/// [`RequestHandler`]. It exists so bindings can be assembled from a
/// manifest and checked when they are registered.
#[async_trait]
pub trait DynHandler: Send + Sync + 'static {
    /// The request type this handler accepts.
    fn request_kind(&self) -> RequestKind;

    /// The type this handler actually produces.
    fn response_type(&self) -> TypeTag;

    async fn call(&self, request: AnyBox, ctx: &Context) -> Result<AnyBox, SendError>;
}

pub struct TypedHandler<R, H> {
    handler: H,
    _phantom: PhantomData<fn(R)>,
}

impl<R, H> TypedHandler<R, H>
where
    R: Request,
    H: RequestHandler<R>,
{
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            _phantom: PhantomData,
        }
    }

    pub fn inner(&self) -> &H {
        &self.handler
    }
}

#[async_trait]
impl<R, H> DynHandler for TypedHandler<R, H>
where
    R: Request,
    H: RequestHandler<R>,
{
    fn request_kind(&self) -> RequestKind {
        RequestKind::of::<R>()
    }

    fn response_type(&self) -> TypeTag {
        TypeTag::of::<R::Response>()
    }

    async fn call(&self, request: AnyBox, ctx: &Context) -> Result<AnyBox, SendError> {
        let request = request
            .downcast::<R>()
            .map_err(|other| SendError::ErasedTypeMismatch {
                request: self.request_kind().name(),
                expected: std::any::type_name::<R>(),
                found: (*other).type_id(),
            })?;

        let response = self
            .handler
            .handle(*request, ctx)
            .await
            .map_err(SendError::Handler)?;

        Ok(Box::new(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Double(u32);
    impl Request for Double {
        type Response = u32;
    }

    struct Doubler;

    #[async_trait]
    impl RequestHandler<Double> for Doubler {
        async fn handle(&self, request: Double, _ctx: &Context) -> anyhow::Result<u32> {
            Ok(request.0 * 2)
        }
    }

    #[tokio::test]
    async fn test_handler_fn_receives_request() {
        let handler = handler_fn(|req: Double, _ctx| async move { Ok::<_, anyhow::Error>(req.0 + 1) });
        let out = handler.handle(Double(4), &Context::new()).await.unwrap();
        assert_eq!(out, 5);
    }

    #[tokio::test]
    async fn test_arc_forwards() {
        let handler: Arc<dyn RequestHandler<Double>> = Arc::new(Doubler);
        let out = handler.handle(Double(21), &Context::new()).await.unwrap();
        assert_eq!(out, 42);
    }

    #[tokio::test]
    async fn test_typed_handler_round_trips_through_any() {
        let erased = TypedHandler::<Double, _>::new(Doubler);
        assert_eq!(erased.request_kind(), RequestKind::of::<Double>());
        assert_eq!(erased.response_type(), TypeTag::of::<u32>());

        let out = erased
            .call(Box::new(Double(3)), &Context::new())
            .await
            .unwrap();
        assert_eq!(*out.downcast::<u32>().unwrap(), 6);
    }

    #[tokio::test]
    async fn test_typed_handler_rejects_foreign_request() {
        let erased = TypedHandler::<Double, _>::new(Doubler);
        let err = erased
            .call(Box::new("not a Double"), &Context::new())
            .await
            .unwrap_err();
        match err {
            SendError::ErasedTypeMismatch {
                request, found, ..
            } => {
                assert!(request.ends_with("Double"));
                assert_eq!(found, std::any::TypeId::of::<&str>());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handler_failure_is_wrapped_untouched() {
        let erased = TypedHandler::<Double, _>::new(handler_fn(|_: Double, _ctx| async move {
            Err::<u32, _>(anyhow::anyhow!("boom"))
        }));
        let err = erased
            .call(Box::new(Double(1)), &Context::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
