/*!
 * Host node model.
 *
 * The translation engine only ever talks to the design tool through the
 * traits in this module:
 * - `SceneTree`: read-only traversal (kind, children, text)
 * - `StyledText`: per-range style getters and setters on text nodes
 * - `FontLoader`: asynchronous font loading
 * - `NodeFactory`: creation and placement of annotation nodes
 *
 * `SceneHost` bundles all four. `memory::MemoryScene` is a complete
 * in-memory implementation backed by a JSON scene file.
 *
 * Character offsets are counted in Unicode scalar values.
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::errors::MutationError;

pub mod memory;
pub mod style;

pub use memory::MemoryScene;
pub use style::{
    CharStyle, FontName, HorizontalAlign, LetterSpacing, LineHeight, Mixed, Paint, Rgb,
    SpacingUnit, TextAlignment, TextCase, TextDecoration, TextStyle, VerticalAlign,
};

/// Opaque handle to a host node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the traversal needs to know about a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Leaf carrying styled text
    Text,
    /// Node with ordered children
    Container,
    /// Any other leaf (shapes, images...)
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// How a frame sizes itself along its counter axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSizing {
    #[default]
    Auto,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    #[default]
    None,
    Horizontal,
    Vertical,
}

/// Properties of a frame created by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameProps {
    pub name: String,
    pub layout_mode: LayoutMode,
    pub counter_axis_sizing: AxisSizing,
    pub opacity: f32,
    pub vertical_padding: f32,
    pub horizontal_padding: f32,
    pub strokes: Vec<Paint>,
}

/// Read-only traversal over the host's node hierarchy
pub trait SceneTree {
    /// Kind of the node, or `None` when the handle is stale.
    fn node_kind(&self, id: NodeId) -> Option<NodeKind>;

    /// Ordered children; empty for leaves.
    fn children(&self, id: NodeId) -> Vec<NodeId>;

    /// Full text of a text node.
    fn characters(&self, id: NodeId) -> Option<String>;

    /// Layer name as shown in the host.
    fn node_name(&self, id: NodeId) -> Option<String>;
}

/// Styled text access on text nodes
pub trait StyledText {
    /// Style of `range`; attributes not uniform over it are `Varies`.
    fn range_style(&self, id: NodeId, range: Range<usize>) -> Result<TextStyle, MutationError>;

    /// Apply the uniform attributes of `style` to `range`.
    /// `Varies` attributes are left as they are.
    fn set_range_style(
        &mut self,
        id: NodeId,
        range: Range<usize>,
        style: &TextStyle,
    ) -> Result<(), MutationError>;

    /// Replace the full text. Requires every font used by the node to be loaded.
    fn set_characters(&mut self, id: NodeId, text: &str) -> Result<(), MutationError>;

    fn text_alignment(&self, id: NodeId) -> Result<TextAlignment, MutationError>;

    fn set_text_alignment(
        &mut self,
        id: NodeId,
        alignment: TextAlignment,
    ) -> Result<(), MutationError>;
}

/// Asynchronous font loading
#[async_trait]
pub trait FontLoader {
    async fn load_font(&mut self, font: &FontName) -> Result<(), MutationError>;
}

/// Creation and placement of new nodes
pub trait NodeFactory {
    /// Create a detached top-level frame.
    fn create_frame(&mut self, props: &FrameProps) -> Result<NodeId, MutationError>;

    /// Create a text node and append it to `parent`.
    fn create_text(
        &mut self,
        parent: NodeId,
        font: &FontName,
        characters: &str,
    ) -> Result<NodeId, MutationError>;

    fn node_size(&self, id: NodeId) -> Result<Size, MutationError>;

    fn resize(&mut self, id: NodeId, size: Size) -> Result<(), MutationError>;

    fn set_counter_axis_sizing(&mut self, id: NodeId, sizing: AxisSizing)
    -> Result<(), MutationError>;

    /// Position in page coordinates.
    fn absolute_position(&self, id: NodeId) -> Result<Point, MutationError>;

    fn set_position(&mut self, id: NodeId, position: Point) -> Result<(), MutationError>;
}

/// Everything the engine needs from a host
pub trait SceneHost: SceneTree + StyledText + FontLoader + NodeFactory + Send {}

impl<T> SceneHost for T where T: SceneTree + StyledText + FontLoader + NodeFactory + Send {}
