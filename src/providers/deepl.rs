use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Credentials, TranslationClient, TranslationResult};
use crate::app_config::TranslationConfig;
use crate::errors::ProviderError;

/// Public DeepL free-tier endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api-free.deepl.com/v2/translate";

/// Largest accepted `retry_count`
pub const MAX_RETRY_COUNT: u32 = 10;

/// Upper bound of a single retry delay
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// DeepL client for interacting with the DeepL translate API
#[derive(Debug)]
pub struct DeepL {
    /// HTTP client for API requests
    client: Client,
    /// Full URL of the translate endpoint
    endpoint: String,
    /// Extra attempts after a retryable failure
    retry_count: u32,
    /// Base backoff, doubled on each retry
    retry_backoff: Duration,
}

/// DeepL translate request
#[derive(Debug, Serialize)]
pub struct DeepLRequest<'a> {
    /// Texts to translate, translated in order
    pub text: &'a [String],

    /// Upper-case target language code
    pub target_lang: String,
}

/// DeepL translate response
#[derive(Debug, Deserialize)]
pub struct DeepLResponse {
    #[serde(default)]
    pub translations: Vec<DeepLTranslation>,
}

/// Individual translation in a DeepL response
#[derive(Debug, Deserialize)]
pub struct DeepLTranslation {
    /// Source language detected by DeepL
    pub detected_source_language: String,

    /// The translated text
    pub text: String,
}

impl DeepL {
    /// Create a new DeepL client
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            endpoint: if endpoint.is_empty() {
                DEFAULT_ENDPOINT.to_string()
            } else {
                endpoint
            },
            retry_count: 0,
            retry_backoff: Duration::from_millis(0),
        }
    }

    /// Create a client from the translation section of the config
    pub fn from_config(config: &TranslationConfig) -> Self {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        )
        .with_retry(config.retry_count, Duration::from_millis(config.retry_backoff_ms))
    }

    /// Retry retryable failures up to `count` times with exponential backoff
    pub fn with_retry(mut self, count: u32, backoff: Duration) -> Self {
        self.retry_count = count;
        self.retry_backoff = backoff;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one translate request without retrying
    async fn send(
        &self,
        request: &DeepLRequest<'_>,
        credentials: &Credentials,
    ) -> Result<DeepLResponse, ProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("DeepL-Auth-Key {}", credentials.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("DeepL API error ({}): {}", status, error_text);
            return Err(status_error(status, error_text));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;
        parse_response(&body)
    }
}

/// Classify a non-success HTTP status
fn status_error(status: StatusCode, message: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::AuthenticationError(message)
        }
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message,
        },
    }
}

/// Parse a DeepL response body
pub fn parse_response(body: &str) -> Result<DeepLResponse, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::ParseError(e.to_string()))
}

/// Turn a parsed response into results aligned with `expected` inputs
pub fn into_results(
    response: DeepLResponse,
    expected: usize,
) -> Result<Vec<TranslationResult>, ProviderError> {
    if response.translations.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    if response.translations.len() != expected {
        return Err(ProviderError::LengthMismatch {
            expected,
            actual: response.translations.len(),
        });
    }

    Ok(response
        .translations
        .into_iter()
        .map(|t| TranslationResult::new(t.text, t.detected_source_language))
        .collect())
}

#[async_trait]
impl TranslationClient for DeepL {
    async fn translate(
        &self,
        texts: &[String],
        target_language: &str,
        credentials: &Credentials,
    ) -> Result<Vec<TranslationResult>, ProviderError> {
        if texts.is_empty() {
            return Err(ProviderError::RequestFailed(
                "Texts to translate cannot be empty".to_string(),
            ));
        }
        if credentials.is_empty() {
            return Err(ProviderError::AuthenticationError(
                "Missing API key".to_string(),
            ));
        }

        let request = DeepLRequest {
            text: texts,
            target_lang: target_language.to_uppercase(),
        };
        debug!(
            "Sending {} texts to {} (target {})",
            texts.len(),
            self.endpoint,
            request.target_lang
        );

        let request = &request;
        with_backoff(self.retry_count, self.retry_backoff, || {
            self.send(request, credentials)
        })
        .await
        .and_then(|response| into_results(response, texts.len()))
    }
}

/// Delay before retry number `attempt + 1`: `base * 2^attempt`, capped at `MAX_BACKOFF`
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
        .min(MAX_BACKOFF)
}

/// Run `send`, retrying retryable failures up to `retry_count` times.
///
/// Non-retryable errors are returned at once.
pub async fn with_backoff<T, F, Fut>(
    retry_count: u32,
    backoff: Duration,
    mut send: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 0;
    loop {
        match send().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < retry_count => {
                let delay = backoff_delay(backoff, attempt);
                attempt += 1;
                warn!(
                    "DeepL request failed ({}), retry {}/{} in {:?}",
                    e, attempt, retry_count, delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
