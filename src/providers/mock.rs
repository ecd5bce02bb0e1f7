/*!
 * Mock translation client for testing.
 *
 * This module provides a scripted client that simulates different behaviors:
 * - `MockTranslationClient::working()` - Always succeeds
 * - `MockTranslationClient::failing()` - Always fails with an API error
 * - `MockTranslationClient::short()` - Drops the last translation
 * - `MockTranslationClient::empty()` - Returns no translations
 *
 * Every call is recorded so tests can assert on batching.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::{Credentials, TranslationClient, TranslationResult};
use crate::errors::ProviderError;
use crate::language_utils;

/// Behavior mode for the mock client
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with one result per text
    Working,
    /// Always fails with an API error
    Failing,
    /// Succeeds but returns one result fewer than requested
    Short,
    /// Succeeds with no results at all
    Empty,
}

/// One recorded call
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub texts: Vec<String>,
    pub target_language: String,
    pub credentials: Credentials,
}

/// Mock client for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockTranslationClient {
    /// Behavior mode
    behavior: MockBehavior,
    /// Detected language per source text; falls back to the local detector
    detections: HashMap<String, String>,
    /// Fixed translations per source text
    translations: HashMap<String, String>,
    /// Calls received so far
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockTranslationClient {
    /// Create a new mock client with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            detections: HashMap::new(),
            translations: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn short() -> Self {
        Self::new(MockBehavior::Short)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Report `language` as the detected source language of `text`
    pub fn with_detection(mut self, text: impl Into<String>, language: impl Into<String>) -> Self {
        self.detections.insert(text.into(), language.into());
        self
    }

    /// Translate `text` to `translation` instead of the default marker
    pub fn with_translation(
        mut self,
        text: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        self.translations.insert(text.into(), translation.into());
        self
    }

    /// All calls received so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn result_for(&self, text: &str, target_language: &str) -> TranslationResult {
        let translated = self
            .translations
            .get(text)
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", target_language, text));
        let detected = self
            .detections
            .get(text)
            .cloned()
            .unwrap_or_else(|| language_utils::detect_language(text).to_string());
        TranslationResult::new(translated, detected)
    }
}

#[async_trait]
impl TranslationClient for MockTranslationClient {
    async fn translate(
        &self,
        texts: &[String],
        target_language: &str,
        credentials: &Credentials,
    ) -> Result<Vec<TranslationResult>, ProviderError> {
        self.calls.lock().push(MockCall {
            texts: texts.to_vec(),
            target_language: target_language.to_string(),
            credentials: credentials.clone(),
        });

        let mut results: Vec<TranslationResult> = texts
            .iter()
            .map(|text| self.result_for(text, target_language))
            .collect();

        match self.behavior {
            MockBehavior::Working => Ok(results),
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated API failure".to_string(),
            }),
            MockBehavior::Short => {
                results.pop();
                Ok(results)
            }
            MockBehavior::Empty => Ok(Vec::new()),
        }
    }
}
