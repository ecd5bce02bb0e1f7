/*!
 * Application of translated text to nodes.
 *
 * Two modes:
 * - replace: swap a node's characters while keeping its styling
 * - annotate: leave the node alone and place a framed copy of the
 *   translation to its left
 */

use log::debug;

use crate::app_config::AnnotationConfig;
use crate::errors::MutationError;
use crate::scene::{
    AxisSizing, FontLoader, FontName, FrameProps, LayoutMode, NodeId, Paint, Point, Rgb,
    SceneHost, Size,
};

use super::snapshot::StyleSnapshot;

/// Maximum number of source characters quoted in an annotation name
const SNIPPET_CHARS: usize = 24;

/// Applies translations to host nodes
#[derive(Debug, Clone, Default)]
pub struct NodeMutator {
    annotation: AnnotationConfig,
}

impl NodeMutator {
    pub fn new(annotation: AnnotationConfig) -> Self {
        Self { annotation }
    }

    pub fn annotation(&self) -> &AnnotationConfig {
        &self.annotation
    }

    /// Replace the text of `node` with `new_text`, preserving its styling.
    ///
    /// Fonts used by the node are loaded before any character changes.
    pub async fn replace<H: SceneHost>(
        &self,
        host: &mut H,
        node: NodeId,
        new_text: &str,
    ) -> Result<(), MutationError> {
        let snapshot = StyleSnapshot::capture(&*host, node)?;
        load_fonts(host, &snapshot.fonts()).await?;

        host.set_characters(node, new_text)?;
        snapshot.apply(host, node, new_text.chars().count())?;

        debug!(
            "Replaced text of node {} ({} style)",
            node,
            if snapshot.is_uniform() { "uniform" } else { "mixed" }
        );
        Ok(())
    }

    /// Place `translated_text` in a new frame left of `node`.
    ///
    /// Returns the handle of the created frame. The source node is not modified.
    pub async fn annotate<H: SceneHost>(
        &self,
        host: &mut H,
        node: NodeId,
        translated_text: &str,
        target_language: &str,
    ) -> Result<NodeId, MutationError> {
        let source_text = host.characters(node).ok_or(MutationError::NotATextNode(node))?;
        let layer_name = host.node_name(node).unwrap_or_default();

        let snapshot = StyleSnapshot::capture(&*host, node)?;
        load_fonts(host, &snapshot.fonts()).await?;

        // Mixed fonts fall back to the configured default
        let font = match &snapshot {
            StyleSnapshot::Uniform { style, .. } => style.font_name.uniform().cloned(),
            StyleSnapshot::Runs { .. } => None,
        }
        .unwrap_or_else(|| self.annotation.default_font.clone());
        host.load_font(&font).await?;

        let config = &self.annotation;
        let frame = host.create_frame(&FrameProps {
            name: annotation_name(target_language, &layer_name, &source_text),
            layout_mode: LayoutMode::Vertical,
            counter_axis_sizing: AxisSizing::Auto,
            opacity: config.opacity,
            vertical_padding: config.vertical_padding,
            horizontal_padding: config.horizontal_padding,
            strokes: vec![Paint::solid(Rgb::BLACK)],
        })?;
        let text = host.create_text(frame, &font, translated_text)?;

        let mut frame_size = host.node_size(frame)?;
        if frame_size.width > config.max_width {
            host.set_counter_axis_sizing(frame, AxisSizing::Fixed)?;
            host.resize(
                frame,
                Size {
                    width: config.max_width,
                    height: frame_size.height,
                },
            )?;
            let text_size = host.node_size(text)?;
            host.resize(
                text,
                Size {
                    width: config.max_width - 2.0 * config.horizontal_padding,
                    height: text_size.height,
                },
            )?;
            frame_size = host.node_size(frame)?;
        }

        let origin = host.absolute_position(node)?;
        host.set_position(
            frame,
            Point {
                x: origin.x - frame_size.width - config.gutter,
                y: origin.y,
            },
        )?;

        debug!("Annotated node {} with frame {}", node, frame);
        Ok(frame)
    }
}

/// Load every font in `fonts`, stopping at the first failure.
pub async fn load_fonts<H: FontLoader + Send + ?Sized>(
    host: &mut H,
    fonts: &[FontName],
) -> Result<(), MutationError> {
    for font in fonts {
        host.load_font(font).await?;
    }
    Ok(())
}

/// Name of an annotation frame: target code, layer name and a source snippet.
pub fn annotation_name(target_language: &str, layer_name: &str, source_text: &str) -> String {
    let mut snippet: String = source_text.chars().take(SNIPPET_CHARS).collect();
    if source_text.chars().count() > SNIPPET_CHARS {
        snippet.push('…');
    }
    format!("{}_{}({})", target_language, layer_name, snippet)
}
