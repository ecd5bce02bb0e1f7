/*!
 * Translation pass over a selection.
 *
 * One pass runs these steps in order:
 * 1. reject a missing or "auto" target language
 * 2. collect text units from the selection
 * 3. send every source text to the provider in a single batch
 * 4. drop units already in the target language
 * 5. mutate the remaining nodes in collection order
 *
 * Provider failures abandon the whole batch. A node the host refuses to
 * mutate is reported in the outcome and the pass moves on to the next one.
 */

use log::{debug, warn};
use std::sync::Arc;

use crate::app_config::{Config, FilterStrategy};
use crate::errors::{MutationError, ProviderError, TranslationError, UserInputError};
use crate::language_utils;
use crate::notify::{LogNotifier, Notifier};
use crate::providers::{Credentials, TranslationClient, TranslationResult};
use crate::scene::{NodeId, SceneHost};

use super::collector::{TextUnit, TreeCollector};
use super::mutator::NodeMutator;

/// Parameters of one translation pass
#[derive(Debug, Clone)]
pub struct TranslateRequest {
    /// Target language in provider vocabulary
    pub target_language: String,
    /// Replace text in place, or annotate next to the source node
    pub replace_in_place: bool,
    /// Credentials forwarded to the client
    pub credentials: Credentials,
}

impl TranslateRequest {
    pub fn new(target_language: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            target_language: target_language.into(),
            replace_in_place: true,
            credentials,
        }
    }

    pub fn annotate(mut self) -> Self {
        self.replace_in_place = false;
        self
    }
}

/// A node the host refused to update
#[derive(Debug, Clone, PartialEq)]
pub struct NodeFailure {
    pub node: NodeId,
    pub error: MutationError,
}

/// Result of a translation pass
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationOutcome {
    /// The batch was applied; `updated` counts nodes actually mutated
    Completed {
        updated: usize,
        failures: Vec<NodeFailure>,
    },
    /// Every collected text was already in the target language
    NoOpAlreadyTarget,
    /// The pass was aborted before any mutation
    Failed(TranslationError),
}

impl TranslationOutcome {
    /// Number of mutated nodes; zero unless the pass completed.
    pub fn updated(&self) -> usize {
        match self {
            Self::Completed { updated, .. } => *updated,
            _ => 0,
        }
    }
}

/// Drives collection, the batched provider call and node mutation
pub struct TranslationOrchestrator<C: TranslationClient> {
    client: C,
    mutator: NodeMutator,
    strategy: FilterStrategy,
    notifier: Arc<dyn Notifier>,
}

impl<C: TranslationClient> TranslationOrchestrator<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            mutator: NodeMutator::default(),
            strategy: FilterStrategy::default(),
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Orchestrator using the filter strategy and annotation styling of `config`
    pub fn from_config(client: C, config: &Config) -> Self {
        Self::new(client)
            .with_strategy(config.filter_strategy)
            .with_mutator(NodeMutator::new(config.annotation.clone()))
    }

    pub fn with_strategy(mut self, strategy: FilterStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_mutator(mut self, mutator: NodeMutator) -> Self {
        self.mutator = mutator;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn strategy(&self) -> FilterStrategy {
        self.strategy
    }

    /// Translate every text node under `roots` into the requested language.
    pub async fn run<H: SceneHost>(
        &self,
        host: &mut H,
        roots: &[NodeId],
        request: &TranslateRequest,
    ) -> TranslationOutcome {
        let target = request.target_language.trim();
        if language_utils::is_auto_or_empty(target) {
            return self.fail(UserInputError::MissingTargetLanguage.into());
        }

        let mut units = TreeCollector::collect(&*host, roots);
        if units.is_empty() {
            return self.fail(UserInputError::EmptySelection.into());
        }

        if self.strategy == FilterStrategy::LocalHeuristic {
            units = TreeCollector::retain_untranslated(units, target);
            if units.is_empty() {
                return self.already_target(target);
            }
        }

        let results = match self.translate_batch(&units, target, &request.credentials).await {
            Ok(results) => results,
            Err(e) => return self.fail(e.into()),
        };

        // Index i of the batch always pairs with unit i
        let pending: Vec<(TextUnit, TranslationResult)> = units
            .into_iter()
            .zip(results)
            .filter(|(_, result)| match self.strategy {
                FilterStrategy::ProviderDetected => !result
                    .detected_source_language
                    .eq_ignore_ascii_case(target),
                FilterStrategy::LocalHeuristic => true,
            })
            .collect();

        if pending.is_empty() {
            return self.already_target(target);
        }

        let mut updated = 0;
        let mut failures = Vec::new();
        for (unit, result) in pending {
            let applied = if request.replace_in_place {
                self.mutator
                    .replace(host, unit.node, &result.translated_text)
                    .await
            } else {
                self.mutator
                    .annotate(host, unit.node, &result.translated_text, target)
                    .await
                    .map(|_| ())
            };

            match applied {
                Ok(()) => updated += 1,
                Err(e) => {
                    warn!("Skipping node {}: {}", unit.node, e);
                    failures.push(NodeFailure {
                        node: unit.node,
                        error: e,
                    });
                }
            }
        }

        self.notifier
            .info(&format!("Translation complete. {} nodes updated.", updated));
        if !failures.is_empty() {
            self.notifier
                .error(&format!("{} nodes could not be updated.", failures.len()));
        }

        TranslationOutcome::Completed { updated, failures }
    }

    /// Send all unit texts in one request and check the response covers every one.
    async fn translate_batch(
        &self,
        units: &[TextUnit],
        target: &str,
        credentials: &Credentials,
    ) -> Result<Vec<TranslationResult>, ProviderError> {
        let texts: Vec<String> = units.iter().map(|unit| unit.source_text.clone()).collect();

        self.notifier
            .info(&format!("Translating {} text nodes...", texts.len()));
        debug!("Sending batch of {} texts to {}", texts.len(), target);

        let results = self.client.translate(&texts, target, credentials).await?;
        if results.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        if results.len() != texts.len() {
            return Err(ProviderError::LengthMismatch {
                expected: texts.len(),
                actual: results.len(),
            });
        }
        Ok(results)
    }

    fn already_target(&self, target: &str) -> TranslationOutcome {
        let message = format!(
            "Selected text is already in {}; nothing to translate.",
            language_utils::display_language_name(target)
        );
        self.notifier.info(&message);
        TranslationOutcome::NoOpAlreadyTarget
    }

    fn fail(&self, reason: TranslationError) -> TranslationOutcome {
        debug!("Translation aborted: {:?}", reason);
        self.notifier.error(&reason.to_string());
        TranslationOutcome::Failed(reason)
    }
}
