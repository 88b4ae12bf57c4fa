use crate::contact::ContactFormData;
use serde::Serialize;
use std::fmt;
use url::Url;

pub const DEFAULT_RELAY_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";
const DELIVERED_TEXT: &str = "OK";

// Injected at build time, never written into the source.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RelayConfig {
    pub endpoint: Url,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

impl RelayConfig {
    pub fn from_parts(
        endpoint: Option<&str>,
        service_id: Option<&str>,
        template_id: Option<&str>,
        public_key: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let endpoint = non_empty(endpoint).unwrap_or(DEFAULT_RELAY_ENDPOINT);
        let endpoint = Url::parse(endpoint)
            .ok()
            .filter(|url| url.scheme() == "http" || url.scheme() == "https")
            .ok_or_else(|| ConfigError::InvalidEndpoint(endpoint.to_string()))?;

        Ok(Self {
            endpoint,
            service_id: required(service_id, "PORTFOLIO_RELAY_SERVICE_ID")?,
            template_id: required(template_id, "PORTFOLIO_RELAY_TEMPLATE_ID")?,
            public_key: required(public_key, "PORTFOLIO_RELAY_PUBLIC_KEY")?,
        })
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_parts(
            option_env!("PORTFOLIO_RELAY_ENDPOINT"),
            option_env!("PORTFOLIO_RELAY_SERVICE_ID"),
            option_env!("PORTFOLIO_RELAY_TEMPLATE_ID"),
            option_env!("PORTFOLIO_RELAY_PUBLIC_KEY"),
        )
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn required(value: Option<&str>, name: &'static str) -> Result<String, ConfigError> {
    non_empty(value)
        .map(ToString::to_string)
        .ok_or(ConfigError::Missing(name))
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ConfigError {
    Missing(&'static str),
    InvalidEndpoint(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "relay setting {name} is not set"),
            Self::InvalidEndpoint(value) => write!(f, "relay endpoint {value:?} is not an http(s) URL"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Serialize, PartialEq, Eq, Debug)]
pub struct TemplateParams<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub subject: &'a str,
    pub message: &'a str,
}

#[derive(Serialize, PartialEq, Eq, Debug)]
pub struct RelayRequest<'a> {
    pub service_id: &'a str,
    pub template_id: &'a str,
    pub user_id: &'a str,
    pub template_params: TemplateParams<'a>,
}

impl<'a> RelayRequest<'a> {
    pub fn new(config: &'a RelayConfig, message: &'a ContactFormData) -> Self {
        Self {
            service_id: &config.service_id,
            template_id: &config.template_id,
            user_id: &config.public_key,
            template_params: TemplateParams {
                name: &message.name,
                email: &message.email,
                subject: &message.subject,
                message: &message.message,
            },
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct RelayReply {
    pub status: u16,
    pub text: String,
}

impl RelayReply {
    pub fn into_result(self) -> Result<(), RelayError> {
        if (200..300).contains(&self.status) && self.text.trim() == DELIVERED_TEXT {
            Ok(())
        } else {
            Err(RelayError::Rejected {
                status: self.status,
                text: self.text,
            })
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RelayError {
    NotConfigured,
    Transport(String),
    Rejected { status: u16, text: String },
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => f.write_str("message relay is not configured"),
            Self::Transport(reason) => write!(f, "message relay unreachable: {reason}"),
            Self::Rejected { status, text } => {
                write!(f, "message relay rejected the message ({status}): {text}")
            }
        }
    }
}

impl std::error::Error for RelayError {}

#[allow(async_fn_in_trait)]
pub trait MessageRelay {
    async fn deliver(&self, message: &ContactFormData) -> Result<(), RelayError>;
}

#[cfg(target_arch = "wasm32")]
pub use browser::HttpRelay;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{MessageRelay, RelayConfig, RelayError, RelayReply, RelayRequest};
    use crate::contact::ContactFormData;
    use crate::logging::{log_event, LogLevel};
    use gloo_net::http::Request;
    use serde_json::json;

    pub struct HttpRelay {
        config: Option<RelayConfig>,
    }

    impl HttpRelay {
        pub fn from_build_env() -> Self {
            match RelayConfig::from_build_env() {
                Ok(config) => Self {
                    config: Some(config),
                },
                Err(error) => {
                    log_event(
                        LogLevel::Warn,
                        "relay_config_invalid",
                        json!({ "error": error.to_string() }),
                    );
                    Self { config: None }
                }
            }
        }
    }

    impl MessageRelay for HttpRelay {
        async fn deliver(&self, message: &ContactFormData) -> Result<(), RelayError> {
            let config = self.config.as_ref().ok_or(RelayError::NotConfigured)?;
            let body = RelayRequest::new(config, message);

            let response = Request::post(config.endpoint.as_str())
                .json(&body)
                .map_err(|error| RelayError::Transport(error.to_string()))?
                .send()
                .await
                .map_err(|error| RelayError::Transport(error.to_string()))?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|error| RelayError::Transport(error.to_string()))?;

            RelayReply { status, text }.into_result()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> RelayConfig {
        RelayConfig::from_parts(None, Some("service_a"), Some("template_b"), Some("key_c"))
            .expect("complete config")
    }

    #[test]
    fn endpoint_defaults_when_unset_or_blank() {
        let blank = RelayConfig::from_parts(Some("  "), Some("s"), Some("t"), Some("k"))
            .expect("blank endpoint falls back");

        assert_eq!(config().endpoint.as_str(), DEFAULT_RELAY_ENDPOINT);
        assert_eq!(blank.endpoint.as_str(), DEFAULT_RELAY_ENDPOINT);
    }

    #[test]
    fn missing_identifier_is_reported_by_name() {
        let error = RelayConfig::from_parts(None, Some("s"), Some(" "), Some("k"))
            .expect_err("blank template id");

        assert_eq!(error, ConfigError::Missing("PORTFOLIO_RELAY_TEMPLATE_ID"));
    }

    #[test]
    fn non_http_endpoint_is_rejected() {
        let error = RelayConfig::from_parts(Some("ftp://relay.test/send"), Some("s"), Some("t"), Some("k"))
            .expect_err("ftp endpoint");

        assert!(matches!(error, ConfigError::InvalidEndpoint(_)));
    }

    #[test]
    fn request_body_matches_relay_schema() {
        let config = config();
        let message = ContactFormData {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Hello".to_string(),
            message: "Nice site".to_string(),
        };

        let body = serde_json::to_value(RelayRequest::new(&config, &message)).expect("serializes");

        assert_eq!(
            body,
            json!({
                "service_id": "service_a",
                "template_id": "template_b",
                "user_id": "key_c",
                "template_params": {
                    "name": "Ada",
                    "email": "ada@example.com",
                    "subject": "Hello",
                    "message": "Nice site",
                }
            })
        );
    }

    #[test]
    fn only_ok_text_with_success_status_counts_as_delivered() {
        let delivered = RelayReply {
            status: 200,
            text: "OK".to_string(),
        };
        let odd_text = RelayReply {
            status: 200,
            text: "Queued".to_string(),
        };
        let refused = RelayReply {
            status: 400,
            text: "The user ID is invalid".to_string(),
        };

        assert_eq!(delivered.into_result(), Ok(()));
        assert!(odd_text.into_result().is_err());
        assert_eq!(
            refused.into_result(),
            Err(RelayError::Rejected {
                status: 400,
                text: "The user ID is invalid".to_string(),
            })
        );
    }
}
