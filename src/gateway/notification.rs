//! Notification service gateway.

use url::Url;

use crate::clock::SharedClock;
use crate::config::schema::NAME_PLACEHOLDER;
use crate::config::{BodyFormat, NotificationServiceConfig, RetryConfig};
use crate::gateway::downstream::Downstream;
use crate::gateway::types::GatewayOutcome;
use crate::http::{HttpRequest, RequestBody, Transport};
use crate::resilience::{BreakerSnapshot, CircuitBreaker, RetryPolicy};

pub const NOTIFICATION_SERVICE: &str = "notification-service";

/// Dispatches messages through the breaker-gated, retried client.
#[derive(Debug)]
pub struct NotificationGateway<T> {
    downstream: Downstream<T>,
    url: Url,
    recipient: String,
    message_template: String,
    body_format: BodyFormat,
    recipient_field: String,
    message_field: String,
}

impl<T: Transport> NotificationGateway<T> {
    pub fn new(
        transport: T,
        config: &NotificationServiceConfig,
        retry: &RetryConfig,
        clock: SharedClock,
    ) -> Result<Self, url::ParseError> {
        let url = Url::parse(&config.url)?;
        let breaker = CircuitBreaker::from_config(NOTIFICATION_SERVICE, &config.circuit_breaker, clock);
        let policy = RetryPolicy::new(config.max_retries, config.timeout(), retry);
        Ok(Self {
            downstream: Downstream::new(transport, breaker, policy),
            url,
            recipient: config.recipient.clone(),
            message_template: config.message_template.clone(),
            body_format: config.body_format,
            recipient_field: config.recipient_field.clone(),
            message_field: config.message_field.clone(),
        })
    }

    pub fn message_for(&self, name: &str) -> String {
        self.message_template.replace(NAME_PLACEHOLDER, name)
    }

    /// Tell the configured recipient that `name` went offline.
    pub async fn notify_offline(&mut self, name: &str) -> GatewayOutcome<()> {
        let recipient = self.recipient.clone();
        let message = self.message_for(name);
        self.send(&recipient, &message).await
    }

    /// Dispatch `message` to `recipient`. Any 2xx answer is a delivery.
    pub async fn send(&mut self, recipient: &str, message: &str) -> GatewayOutcome<()> {
        let body = match self.body_format {
            BodyFormat::Json => {
                let mut fields = serde_json::Map::new();
                fields.insert(self.recipient_field.clone(), recipient.into());
                fields.insert(self.message_field.clone(), message.into());
                RequestBody::Json(serde_json::Value::Object(fields))
            }
            BodyFormat::Form => RequestBody::Form(vec![
                (self.recipient_field.clone(), recipient.to_string()),
                (self.message_field.clone(), message.to_string()),
            ]),
        };

        let request = HttpRequest::post(self.url.clone(), body);
        self.downstream.call(request, |_| Ok(())).await
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        self.downstream.breaker()
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        self.downstream.snapshot()
    }
}
