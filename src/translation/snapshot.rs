/*!
 * Capture and replay of per-run text styling.
 *
 * A snapshot is taken before a node's characters are replaced and replayed
 * afterwards. Two shapes exist:
 * - `Uniform`: every attribute shares one value over the whole text, so the
 *   single bundle (plus paragraph alignment) is reapplied to all new text
 * - `Runs`: contiguous, non-overlapping runs covering the original text,
 *   reapplied over the first `min(original, new)` characters only
 *
 * Characters past the original length keep whatever style the host gave
 * them. Attributes that are `Varies` inside a run are never reapplied;
 * captured runs never hold one, but hand-built snapshots may.
 */

use std::collections::BTreeSet;
use std::ops::Range;

use crate::errors::MutationError;
use crate::scene::{FontName, NodeId, SceneTree, StyledText, TextAlignment, TextStyle};

/// A contiguous character range sharing one value per attribute
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRun {
    pub range: Range<usize>,
    pub style: TextStyle,
}

/// Styling of a text node at one point in time
#[derive(Debug, Clone, PartialEq)]
pub enum StyleSnapshot {
    Uniform {
        style: TextStyle,
        alignment: TextAlignment,
    },
    Runs {
        /// Character count of the text the runs describe
        original_len: usize,
        runs: Vec<StyleRun>,
    },
}

impl StyleSnapshot {
    /// Snapshot the current styling of text node `node`.
    pub fn capture<H>(host: &H, node: NodeId) -> Result<Self, MutationError>
    where
        H: SceneTree + StyledText + ?Sized,
    {
        let text = host.characters(node).ok_or(MutationError::NotATextNode(node))?;
        let len = text.chars().count();

        let whole = host.range_style(node, 0..len)?;
        if whole.is_uniform() {
            return Ok(Self::Uniform {
                style: whole,
                alignment: host.text_alignment(node)?,
            });
        }

        // Read per character, so run attributes are never `Varies` here
        let mut runs: Vec<StyleRun> = Vec::new();
        for index in 0..len {
            let style = host.range_style(node, index..index + 1)?;
            match runs.last_mut() {
                Some(run) if run.style == style => run.range.end = index + 1,
                _ => runs.push(StyleRun {
                    range: index..index + 1,
                    style,
                }),
            }
        }

        Ok(Self::Runs {
            original_len: len,
            runs,
        })
    }

    pub fn is_uniform(&self) -> bool {
        matches!(self, Self::Uniform { .. })
    }

    /// Every concrete font the snapshot refers to, deduplicated and sorted.
    pub fn fonts(&self) -> Vec<FontName> {
        let styles: Vec<&TextStyle> = match self {
            Self::Uniform { style, .. } => vec![style],
            Self::Runs { runs, .. } => runs.iter().map(|run| &run.style).collect(),
        };
        styles
            .into_iter()
            .filter_map(|style| style.font_name.uniform().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Replay the snapshot onto `node`, whose text is now `new_len` characters.
    pub fn apply<H>(&self, host: &mut H, node: NodeId, new_len: usize) -> Result<(), MutationError>
    where
        H: StyledText + ?Sized,
    {
        match self {
            Self::Uniform { style, alignment } => {
                if new_len > 0 {
                    host.set_range_style(node, 0..new_len, style)?;
                }
                host.set_text_alignment(node, *alignment)
            }
            Self::Runs { original_len, runs } => {
                let limit = (*original_len).min(new_len);
                for run in runs {
                    if run.range.start >= limit {
                        break;
                    }
                    let end = run.range.end.min(limit);
                    host.set_range_style(node, run.range.start..end, &run.style)?;
                }
                Ok(())
            }
        }
    }
}
