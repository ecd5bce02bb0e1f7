/*!
 * Translation provider clients.
 *
 * This module contains the client abstraction the orchestrator talks to and
 * its implementations:
 * - DeepL: DeepL REST API (or any proxy speaking the same JSON)
 * - Mock: scripted client for tests and offline runs
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;

/// API credentials, passed explicitly into every translation call
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.api_key.trim().is_empty()
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// One translated text, index-aligned with the request batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    /// The translated text
    pub translated_text: String,
    /// Source language as detected by the provider
    pub detected_source_language: String,
}

impl TranslationResult {
    pub fn new(translated_text: impl Into<String>, detected: impl Into<String>) -> Self {
        Self {
            translated_text: translated_text.into(),
            detected_source_language: detected.into(),
        }
    }
}

/// Common trait for translation clients
///
/// Implementations translate a whole batch in one call and auto-detect the
/// source language of every text.
#[async_trait]
pub trait TranslationClient: Send + Sync + Debug {
    /// Translate `texts` into `target_language`
    ///
    /// # Returns
    /// * One result per input text, in input order, or the reason the batch failed
    async fn translate(
        &self,
        texts: &[String],
        target_language: &str,
        credentials: &Credentials,
    ) -> Result<Vec<TranslationResult>, ProviderError>;
}

#[async_trait]
impl<T: TranslationClient + ?Sized> TranslationClient for std::sync::Arc<T> {
    async fn translate(
        &self,
        texts: &[String],
        target_language: &str,
        credentials: &Credentials,
    ) -> Result<Vec<TranslationResult>, ProviderError> {
        (**self).translate(texts, target_language, credentials).await
    }
}

pub mod deepl;
pub mod mock;
