//! Audit events for client authentication and backchannel requests.
//!
//! Every authentication attempt and every backchannel authentication request
//! produces one [`Event`]. Events are emitted through `tracing` at INFO
//! level with structured fields so that any subscriber can ship them.
//!
//! All events include:
//! - Timestamp
//! - Event type
//! - Client identity (when known)
//! - Outcome (success/failure) and error code on failure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event type categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// A client authenticated.
    ClientLogin,
    /// No authenticator accepted the client credentials.
    ClientLoginError,
    /// A backchannel authentication request passed validation.
    BackchannelAuthentication,
    /// A backchannel authentication request was rejected.
    BackchannelAuthenticationError,
}

/// Outcome of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventOutcome {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Failure,
}

/// A security event for audit logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    pub id: Uuid,

    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,

    /// Type of event.
    pub event_type: EventType,

    /// Outcome of the event.
    pub outcome: EventOutcome,

    /// Client ID associated with the event.
    pub client_id: Option<String>,

    /// Error code (for failure events).
    pub error: Option<String>,

    /// Additional details as key-value pairs.
    pub details: Vec<(String, String)>,
}

impl Event {
    /// Creates a new event builder.
    #[must_use]
    pub const fn builder(event_type: EventType) -> EventBuilder {
        EventBuilder::new(event_type)
    }

    /// Writes the event to the tracing framework.
    pub fn emit(&self) {
        tracing::info!(
            event_id = %self.id,
            event_type = ?self.event_type,
            outcome = ?self.outcome,
            client_id = ?self.client_id,
            error = ?self.error,
            details = ?self.details,
            "audit_event"
        );
    }
}

/// Builder for creating events.
#[derive(Debug)]
pub struct EventBuilder {
    event_type: EventType,
    outcome: EventOutcome,
    client_id: Option<String>,
    error: Option<String>,
    details: Vec<(String, String)>,
}

impl EventBuilder {
    /// Creates a new event builder.
    #[must_use]
    pub const fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            outcome: EventOutcome::Success,
            client_id: None,
            error: None,
            details: Vec::new(),
        }
    }

    /// Sets the outcome to success.
    #[must_use]
    pub const fn success(mut self) -> Self {
        self.outcome = EventOutcome::Success;
        self
    }

    /// Sets the outcome to failure with an error code.
    #[must_use]
    pub fn failure(mut self, error: impl Into<String>) -> Self {
        self.outcome = EventOutcome::Failure;
        self.error = Some(error.into());
        self
    }

    /// Sets the client ID.
    #[must_use]
    pub fn client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the client ID when one is known.
    #[must_use]
    pub fn maybe_client(mut self, client_id: Option<&str>) -> Self {
        self.client_id = client_id.map(ToString::to_string);
        self
    }

    /// Adds a detail key-value pair.
    #[must_use]
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push((key.into(), value.into()));
        self
    }

    /// Builds the event.
    #[must_use]
    pub fn build(self) -> Event {
        Event {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            event_type: self.event_type,
            outcome: self.outcome,
            client_id: self.client_id,
            error: self.error,
            details: self.details,
        }
    }

    /// Builds and emits the event.
    pub fn emit(self) {
        self.build().emit();
    }
}
