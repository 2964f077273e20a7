use crate::error::ParseError;
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A consume-once request body.
///
/// The body is shared by handle so middleware can forward the request without
/// giving up access to it, but the payload itself can only be taken once:
/// request bodies are not rewindable, and a second read is a caller bug.
#[derive(Debug, Clone)]
pub struct ReqBody {
    inner: Arc<Mutex<Option<Bytes>>>,
}

impl ReqBody {
    /// Creates an empty body.
    pub fn empty() -> Self {
        Bytes::new().into()
    }

    /// Returns true if the body has not been consumed yet.
    pub async fn can_consume(&self) -> bool {
        let guard = self.inner.lock().await;
        guard.is_some()
    }

    /// Takes the payload out of the body.
    ///
    /// Fails with [`ParseError::BodyConsumed`] on a second take.
    pub async fn take(&self) -> Result<Bytes, ParseError> {
        let mut guard = self.inner.lock().await;
        guard.take().ok_or(ParseError::BodyConsumed)
    }
}

impl Default for ReqBody {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Bytes> for ReqBody {
    fn from(bytes: Bytes) -> Self {
        ReqBody { inner: Arc::new(Mutex::new(Some(bytes))) }
    }
}

impl From<String> for ReqBody {
    fn from(value: String) -> Self {
        Bytes::from(value).into()
    }
}

impl From<&'static str> for ReqBody {
    fn from(value: &'static str) -> Self {
        Bytes::from(value).into()
    }
}

#[cfg(test)]
mod tests {
    use super::ReqBody;
    use crate::error::ParseError;
    use bytes::Bytes;

    #[tokio::test]
    async fn take_consumes_the_body() {
        let body = ReqBody::from(r#"{"a": 1}"#);

        assert!(body.can_consume().await);
        assert_eq!(body.take().await.unwrap(), Bytes::from(r#"{"a": 1}"#));

        assert!(!body.can_consume().await);
        assert!(matches!(body.take().await, Err(ParseError::BodyConsumed)));
    }

    #[tokio::test]
    async fn clones_share_the_payload() {
        let body = ReqBody::from("payload");
        let other = body.clone();

        other.take().await.unwrap();
        assert!(matches!(body.take().await, Err(ParseError::BodyConsumed)));
    }

    #[tokio::test]
    async fn empty_body_is_consumable_once() {
        let body = ReqBody::empty();
        assert_eq!(body.take().await.unwrap(), Bytes::new());
        assert!(body.take().await.is_err());
    }
}
