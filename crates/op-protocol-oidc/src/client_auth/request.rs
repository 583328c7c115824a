//! Client credential material extracted from a request.

use base64::{Engine, engine::general_purpose::STANDARD};

use super::assertion::CLIENT_ASSERTION_TYPE_JWT;

/// Credentials a client presented, as parsed by the transport layer.
///
/// Each authenticator looks at the fields relevant to its method and
/// ignores the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientRequest {
    /// `client_id` request parameter.
    pub client_id: Option<String>,
    /// `client_secret` request parameter.
    pub client_secret: Option<String>,
    /// `client_assertion_type` request parameter.
    pub client_assertion_type: Option<String>,
    /// `client_assertion` request parameter.
    pub client_assertion: Option<String>,
    /// Raw `Authorization` header value.
    pub authorization_header: Option<String>,
    /// DER-encoded client certificate from the TLS layer.
    pub client_certificate: Option<Vec<u8>>,
}

impl ClientRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `client_id`.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets `client_secret`.
    #[must_use]
    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Sets the raw `Authorization` header.
    #[must_use]
    pub fn with_authorization_header(mut self, header: impl Into<String>) -> Self {
        self.authorization_header = Some(header.into());
        self
    }

    /// Sets an HTTP Basic `Authorization` header.
    ///
    /// Both parts are form-url-encoded before base64 encoding.
    #[must_use]
    pub fn with_basic_auth(self, client_id: &str, secret: &str) -> Self {
        let credentials = format!(
            "{}:{}",
            urlencoding::encode(client_id),
            urlencoding::encode(secret)
        );
        self.with_authorization_header(format!("Basic {}", STANDARD.encode(credentials)))
    }

    /// Sets a client assertion of the given type.
    #[must_use]
    pub fn with_assertion(
        mut self,
        assertion_type: impl Into<String>,
        assertion: impl Into<String>,
    ) -> Self {
        self.client_assertion_type = Some(assertion_type.into());
        self.client_assertion = Some(assertion.into());
        self
    }

    /// Sets a JWT bearer client assertion.
    #[must_use]
    pub fn with_jwt_assertion(self, assertion: impl Into<String>) -> Self {
        self.with_assertion(CLIENT_ASSERTION_TYPE_JWT, assertion)
    }

    /// Sets the client certificate.
    #[must_use]
    pub fn with_client_certificate(mut self, der: impl Into<Vec<u8>>) -> Self {
        self.client_certificate = Some(der.into());
        self
    }

    /// Returns `client_id` if present and non-empty.
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        non_empty(self.client_id.as_deref())
    }

    /// Returns `client_assertion` if present and non-empty.
    #[must_use]
    pub fn client_assertion(&self) -> Option<&str> {
        non_empty(self.client_assertion.as_deref())
    }

    /// Checks whether any secret or assertion was presented.
    #[must_use]
    pub const fn has_credentials(&self) -> bool {
        self.client_secret.is_some()
            || self.client_assertion.is_some()
            || self.authorization_header.is_some()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_header_is_encoded() {
        let request = ClientRequest::new().with_basic_auth("client_id", "client_secret");
        assert_eq!(
            request.authorization_header.as_deref(),
            Some("Basic Y2xpZW50X2lkOmNsaWVudF9zZWNyZXQ=")
        );
    }

    #[test]
    fn empty_values_are_absent() {
        let request = ClientRequest::new().with_client_id("");
        assert_eq!(request.client_id(), None);
        assert!(!request.has_credentials());
    }

    #[test]
    fn jwt_assertion_sets_type() {
        let request = ClientRequest::new().with_jwt_assertion("a.b.c");
        assert_eq!(
            request.client_assertion_type.as_deref(),
            Some("urn:ietf:params:oauth:client-assertion-type:jwt-bearer")
        );
        assert!(request.has_credentials());
    }
}
