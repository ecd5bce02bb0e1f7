/*!
 * # LayerLingo - text layer translation for design scenes
 *
 * A Rust library that translates the text layers of a design scene while
 * keeping their styling.
 *
 * ## Features
 *
 * - Collect every text layer under a selection of frames and groups
 * - Translate the whole selection in a single DeepL request
 * - Skip text already in the target language, using either the language the
 *   provider detects or a local script heuristic
 * - Replace text in place while preserving uniform and mixed styling
 * - Alternatively place the translation in an annotation frame next to the
 *   source layer
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `scene`: Host node model:
 *   - `scene::style`: Style values with the `Mixed` sentinel
 *   - `scene::memory`: In-memory host backed by a JSON scene file
 * - `translation`: Translation of text layers:
 *   - `translation::collector`: Selection traversal
 *   - `translation::snapshot`: Style capture and replay
 *   - `translation::mutator`: Node updates
 *   - `translation::orchestrator`: Full translation pass
 * - `language_utils`: Script based language detection and language codes
 * - `providers`: Translation clients:
 *   - `providers::deepl`: DeepL API client
 *   - `providers::mock`: Scripted client for tests
 * - `credentials`: API key storage
 * - `notify`: User-visible notifications
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod credentials;
pub mod errors;
pub mod language_utils;
pub mod notify;
pub mod providers;
pub mod scene;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::{Config, FilterStrategy};
pub use errors::{AppError, MutationError, ProviderError, TranslationError, UserInputError};
pub use language_utils::{detect_language, display_language_name};
pub use scene::MemoryScene;
pub use translation::{
    NodeMutator, StyleSnapshot, TranslateRequest, TranslationOrchestrator, TranslationOutcome,
    TreeCollector,
};
