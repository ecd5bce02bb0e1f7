/*!
 * Translation of text layers.
 *
 * This module turns a selection of scene nodes into translated text. It is
 * split into several submodules:
 *
 * - `collector`: Flattening of a selection into translatable text units
 * - `snapshot`: Capture and replay of per-run text styling
 * - `mutator`: Replace-in-place and annotate modes
 * - `orchestrator`: One full pass from selection to updated nodes
 */

// Re-export main types for easier usage
pub use self::collector::{TextUnit, TreeCollector};
pub use self::mutator::NodeMutator;
pub use self::orchestrator::{
    NodeFailure, TranslateRequest, TranslationOrchestrator, TranslationOutcome,
};
pub use self::snapshot::{StyleRun, StyleSnapshot};

// Submodules
pub mod collector;
pub mod mutator;
pub mod orchestrator;
pub mod snapshot;
