/*!
 * Collection of translatable text from a selection.
 *
 * The walk is an explicit stack over the `SceneTree` abstraction: pre-order,
 * depth-first, children in their stored order. Only text leaves contribute.
 */

use log::debug;
use std::collections::HashSet;

use crate::language_utils;
use crate::scene::{NodeId, NodeKind, SceneTree};

/// One translatable leaf: a text node and its text at collection time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    /// Handle of the text node
    pub node: NodeId,
    /// Text content when collected
    pub source_text: String,
}

/// Flattens a forest of nodes into a list of text units
pub struct TreeCollector;

impl TreeCollector {
    /// Collect every text leaf under `roots`, in pre-order.
    ///
    /// Empty input, or input without text nodes, yields an empty list.
    /// A node reachable twice (e.g. listed twice in the selection) is taken once.
    pub fn collect<T: SceneTree + ?Sized>(tree: &T, roots: &[NodeId]) -> Vec<TextUnit> {
        let mut units = Vec::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<NodeId> = roots.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            match tree.node_kind(id) {
                Some(NodeKind::Text) => {
                    if let Some(source_text) = tree.characters(id) {
                        units.push(TextUnit { node: id, source_text });
                    }
                }
                Some(NodeKind::Container) => {
                    stack.extend(tree.children(id).into_iter().rev());
                }
                Some(NodeKind::Other) | None => {}
            }
        }

        debug!("Collected {} text units from {} roots", units.len(), roots.len());
        units
    }

    /// Drop units whose locally detected language already is `target_language`.
    pub fn retain_untranslated(units: Vec<TextUnit>, target_language: &str) -> Vec<TextUnit> {
        units
            .into_iter()
            .filter(|unit| {
                let detected = language_utils::detect_language(&unit.source_text);
                !detected.eq_ignore_ascii_case(target_language)
            })
            .collect()
    }

    /// Collect, then keep only text the local detector places outside `target_language`.
    pub fn collect_untranslated<T: SceneTree + ?Sized>(
        tree: &T,
        roots: &[NodeId],
        target_language: &str,
    ) -> Vec<TextUnit> {
        Self::retain_untranslated(Self::collect(tree, roots), target_language)
    }
}
