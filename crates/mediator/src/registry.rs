use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    sync::Arc,
};

use tracing::{debug, info, warn};

use crate::{
    context::Context,
    error::{RegistrationError, SendError},
    handler::{DynHandler, RequestHandler, TypedHandler},
    notification::{
        DynNotificationHandler, Notification, NotificationHandler, TypedNotificationHandler,
    },
    request::{Request, RequestKind},
};

/// One (request type, handler) pair, as listed in a startup manifest.
#[derive(Clone)]
pub struct Binding {
    kind: RequestKind,
    handler: Arc<dyn DynHandler>,
}

impl Binding {
    /// Pairs a declared request kind with an erased handler. Nothing is
    /// checked until the binding is handed to [`RegistryBuilder::bind`].
    pub fn new(kind: RequestKind, handler: Arc<dyn DynHandler>) -> Self {
        Self { kind, handler }
    }

    pub fn of<R, H>(handler: H) -> Self
    where
        R: Request,
        H: RequestHandler<R>,
    {
        Self::new(
            RequestKind::of::<R>(),
            Arc::new(TypedHandler::<R, H>::new(handler)),
        )
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    fn check(&self) -> Result<(), RegistrationError> {
        let actual = self.handler.request_kind();
        if actual != self.kind {
            return Err(RegistrationError::TypeMismatch {
                request: self.kind.name(),
                expected: self.kind.name(),
                found: actual.name(),
            });
        }

        let produced = self.handler.response_type();
        if produced != self.kind.response() {
            return Err(RegistrationError::TypeMismatch {
                request: self.kind.name(),
                expected: self.kind.response().name(),
                found: produced.name(),
            });
        }

        Ok(())
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding").field("kind", &self.kind).finish()
    }
}

type Subscribers = Vec<Arc<dyn DynNotificationHandler>>;

/// Startup-phase table. Consumed by [`RegistryBuilder::build`], after which
/// no binding can be added or removed.
#[derive(Default)]
pub struct RegistryBuilder {
    handlers: HashMap<TypeId, Binding>,
    order: Vec<RequestKind>,
    subscribers: HashMap<TypeId, Subscribers>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `R` to `handler`. A second handler for the same request type is
    /// rejected and the first one stays in place.
    pub fn register<R, H>(&mut self, handler: H) -> Result<&mut Self, RegistrationError>
    where
        R: Request,
        H: RequestHandler<R>,
    {
        self.bind(Binding::of::<R, H>(handler))
    }

    pub fn bind(&mut self, binding: Binding) -> Result<&mut Self, RegistrationError> {
        binding.check()?;

        let key = binding.kind.request().id();
        if self.handlers.contains_key(&key) {
            return Err(RegistrationError::DuplicateRegistration {
                request: binding.kind.name(),
            });
        }

        debug!("registered handler for {:?}", binding.kind);
        self.order.push(binding.kind);
        self.handlers.insert(key, binding);
        Ok(self)
    }

    /// Binds every entry of a manifest in order, stopping at the first error.
    pub fn register_all<I>(&mut self, bindings: I) -> Result<&mut Self, RegistrationError>
    where
        I: IntoIterator<Item = Binding>,
    {
        for binding in bindings {
            self.bind(binding)?;
        }
        Ok(self)
    }

    /// Adds a handler for notification `N`. Subscribers run in the order they
    /// were added.
    pub fn subscribe<N, H>(&mut self, handler: H) -> &mut Self
    where
        N: Notification,
        H: NotificationHandler<N>,
    {
        self.subscribers
            .entry(TypeId::of::<N>())
            .or_default()
            .push(Arc::new(TypedNotificationHandler::<N, H>::new(handler)));
        self
    }

    #[must_use]
    pub fn build(self) -> Mediator {
        info!(
            "mediator ready: {} request handlers, {} notification types",
            self.handlers.len(),
            self.subscribers.len()
        );

        Mediator {
            inner: Arc::new(Inner {
                handlers: self.handlers,
                order: self.order,
                subscribers: self.subscribers,
            }),
        }
    }
}

struct Inner {
    handlers: HashMap<TypeId, Binding>,
    order: Vec<RequestKind>,
    subscribers: HashMap<TypeId, Subscribers>,
}

/// Frozen handler table and the run-time entry point.
///
/// Clones share the same table; concurrent sends need no coordination.
#[derive(Clone)]
pub struct Mediator {
    inner: Arc<Inner>,
}

impl Mediator {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub async fn send<R: Request>(&self, request: R) -> Result<R::Response, SendError> {
        self.send_with(request, &Context::new()).await
    }

    /// Routes `request` to the handler bound to its exact type and returns
    /// that handler's response. `ctx` is forwarded untouched.
    pub async fn send_with<R: Request>(
        &self,
        request: R,
        ctx: &Context,
    ) -> Result<R::Response, SendError> {
        let kind = RequestKind::of::<R>();

        let Some(binding) = self.inner.handlers.get(&kind.request().id()) else {
            warn!("no handler registered for {}", kind);
            return Err(SendError::NoHandlerRegistered {
                request: kind.name(),
            });
        };

        debug!("dispatching {}", kind);
        let response = binding.handler.call(Box::new(request), ctx).await?;

        response
            .downcast::<R::Response>()
            .map(|response| *response)
            .map_err(|other| SendError::ErasedTypeMismatch {
                request: kind.name(),
                expected: kind.response().name(),
                found: (*other).type_id(),
            })
    }

    pub async fn publish<N: Notification>(&self, notification: N) -> Result<(), SendError> {
        self.publish_with(notification, &Context::new()).await
    }

    /// Hands `notification` to each subscriber in turn. The first failing
    /// subscriber stops the fan-out.
    pub async fn publish_with<N: Notification>(
        &self,
        notification: N,
        ctx: &Context,
    ) -> Result<(), SendError> {
        let Some(subscribers) = self.inner.subscribers.get(&TypeId::of::<N>()) else {
            debug!("no subscribers for {}", std::any::type_name::<N>());
            return Ok(());
        };

        let notification: &(dyn Any + Send + Sync) = &notification;
        for subscriber in subscribers {
            subscriber.call(notification, ctx).await?;
        }

        Ok(())
    }

    pub fn handles<R: Request>(&self) -> bool {
        self.inner.handlers.contains_key(&TypeId::of::<R>())
    }

    /// Bound request kinds in registration order.
    pub fn request_kinds(&self) -> impl Iterator<Item = RequestKind> + '_ {
        self.inner.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.inner.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.handlers.is_empty()
    }
}

impl fmt::Debug for Mediator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mediator")
            .field("requests", &self.inner.order)
            .field("notification_types", &self.inner.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::handler::handler_fn;
    use crate::request::TypeTag;

    struct Add(i64, i64);
    impl Request for Add {
        type Response = i64;
    }

    struct Negate(i64);
    impl Request for Negate {
        type Response = i64;
    }

    struct Adder;

    #[async_trait]
    impl RequestHandler<Add> for Adder {
        async fn handle(&self, request: Add, _ctx: &Context) -> anyhow::Result<i64> {
            Ok(request.0 + request.1)
        }
    }

    /// Claims to answer `Add` but hands back a string.
    struct Liar;

    #[async_trait]
    impl DynHandler for Liar {
        fn request_kind(&self) -> RequestKind {
            RequestKind::of::<Add>()
        }

        fn response_type(&self) -> TypeTag {
            TypeTag::of::<i64>()
        }

        async fn call(
            &self,
            _request: crate::handler::AnyBox,
            _ctx: &Context,
        ) -> Result<crate::handler::AnyBox, SendError> {
            Ok(Box::new(String::from("forty-two")))
        }
    }

    #[tokio::test]
    async fn test_send_routes_by_type() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(Adder)
            .unwrap()
            .register(handler_fn(|req: Negate, _ctx| async move {
                Ok::<_, anyhow::Error>(-req.0)
            }))
            .unwrap();
        let mediator = builder.build();

        assert_eq!(mediator.send(Add(2, 3)).await.unwrap(), 5);
        assert_eq!(mediator.send(Negate(2)).await.unwrap(), -2);
    }

    #[test]
    fn test_register_keeps_order() {
        let mut builder = RegistryBuilder::new();
        builder.register(Adder).unwrap();
        builder
            .register(handler_fn(|req: Negate, _ctx| async move {
                Ok::<_, anyhow::Error>(-req.0)
            }))
            .unwrap();
        let mediator = builder.build();

        let kinds: Vec<_> = mediator.request_kinds().collect();
        assert_eq!(kinds, vec![RequestKind::of::<Add>(), RequestKind::of::<Negate>()]);
        assert_eq!(mediator.len(), 2);
        assert!(mediator.handles::<Add>());
    }

    #[test]
    fn test_empty_builder() {
        let mediator = Mediator::builder().build();
        assert!(mediator.is_empty());
        assert!(!mediator.handles::<Add>());
    }

    #[test]
    fn test_bind_rejects_wrong_request_kind() {
        let binding = Binding::new(
            RequestKind::of::<Negate>(),
            Arc::new(TypedHandler::<Add, _>::new(Adder)),
        );

        let err = RegistryBuilder::new().bind(binding).map(|_| ()).unwrap_err();
        assert!(matches!(err, RegistrationError::TypeMismatch { .. }));
    }

    #[tokio::test]
    async fn test_lying_dyn_handler_is_caught_at_dispatch() {
        let mut builder = RegistryBuilder::new();
        builder
            .bind(Binding::new(RequestKind::of::<Add>(), Arc::new(Liar)))
            .unwrap();
        let mediator = builder.build();

        let err = mediator.send(Add(1, 1)).await.unwrap_err();
        match err {
            SendError::ErasedTypeMismatch {
                request,
                expected,
                found,
            } => {
                assert!(request.ends_with("Add"));
                assert_eq!(expected, "i64");
                assert_eq!(found, TypeId::of::<String>());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_debug_lists_requests() {
        let mut builder = RegistryBuilder::new();
        builder.register(Adder).unwrap();
        let rendered = format!("{:?}", builder.build());
        assert!(rendered.contains("Add"));
    }
}
