use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A value describing one operation, identified by its own concrete type.
///
/// The associated `Response` is what the single registered handler for this
/// type hands back.
pub trait Request: Send + 'static {
    type Response: Send + 'static;
}

/// A `TypeId` together with the type's name for diagnostics.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Type token for a request type and the response it declares.
///
/// Equality and hashing only look at the request type; two structurally
/// identical request types are still different kinds.
#[derive(Clone, Copy)]
pub struct RequestKind {
    request: TypeTag,
    response: TypeTag,
}

impl RequestKind {
    #[must_use]
    pub fn of<R: Request>() -> Self {
        Self {
            request: TypeTag::of::<R>(),
            response: TypeTag::of::<R::Response>(),
        }
    }

    pub fn request(&self) -> TypeTag {
        self.request
    }

    pub fn response(&self) -> TypeTag {
        self.response
    }

    pub fn name(&self) -> &'static str {
        self.request.name
    }
}

impl PartialEq for RequestKind {
    fn eq(&self, other: &Self) -> bool {
        self.request == other.request
    }
}

impl Eq for RequestKind {}

impl Hash for RequestKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.request.hash(state);
    }
}

impl fmt::Debug for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.request.name, self.response.name)
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.request.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;
    impl Request for Ping {
        type Response = ();
    }

    struct Pong;
    impl Request for Pong {
        type Response = ();
    }

    struct Echo;
    impl Request for Echo {
        type Response = String;
    }

    #[test]
    fn test_same_shape_different_kind() {
        assert_ne!(RequestKind::of::<Ping>(), RequestKind::of::<Pong>());
    }

    #[test]
    fn test_kind_is_stable() {
        assert_eq!(RequestKind::of::<Echo>(), RequestKind::of::<Echo>());
    }

    #[test]
    fn test_kind_carries_response_type() {
        let kind = RequestKind::of::<Echo>();
        assert_eq!(kind.response(), TypeTag::of::<String>());
        assert!(kind.name().ends_with("Echo"));
        assert!(kind.response().name().ends_with("String"));
    }

    #[test]
    fn test_display_is_request_name() {
        let kind = RequestKind::of::<Ping>();
        assert_eq!(kind.to_string(), kind.name());
    }
}
