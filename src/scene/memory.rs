/*!
 * In-memory scene host.
 *
 * `MemoryScene` is an arena of nodes that serializes to a JSON scene file.
 * It behaves like the design tool where it matters to the engine:
 * - fonts must be loaded before characters change or a font is assigned
 * - new characters take the style of the first original character
 * - auto-layout frames hug their children
 */

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ops::Range;
use std::path::Path;

use super::{
    AxisSizing, CharStyle, FontLoader, FontName, FrameProps, LayoutMode, NodeFactory, NodeId,
    NodeKind, Paint, Point, SceneTree, Size, StyledText, TextAlignment, TextStyle,
};
use crate::errors::MutationError;

/// Width of one character relative to its font size
const CHAR_WIDTH_RATIO: f32 = 0.6;

/// Height of one line relative to its font size
const LINE_HEIGHT_RATIO: f32 = 1.2;

/// Size of a freshly created frame
const DEFAULT_FRAME_SIZE: Size = Size { width: 100.0, height: 100.0 };

/// A whole scene: the node arena plus the current selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryScene {
    /// Selected top-level nodes, in selection order
    #[serde(default)]
    pub selection: Vec<NodeId>,

    /// All nodes; a node's id is its index
    #[serde(default)]
    pub nodes: Vec<SceneNode>,

    /// Fonts the host cannot load
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable_fonts: Vec<FontName>,

    #[serde(skip)]
    loaded_fonts: HashSet<FontName>,
}

/// One node of the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,

    /// Position in page coordinates
    #[serde(default)]
    pub position: Point,

    #[serde(default)]
    pub size: Size,

    #[serde(flatten)]
    pub content: NodeContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeContent {
    Frame(FrameNode),
    Group(GroupNode),
    Text(TextNode),
    Shape,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameNode {
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(default)]
    pub layout_mode: LayoutMode,
    #[serde(default)]
    pub counter_axis_sizing: AxisSizing,
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub vertical_padding: f32,
    #[serde(default)]
    pub horizontal_padding: f32,
    #[serde(default)]
    pub strokes: Vec<Paint>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupNode {
    #[serde(default)]
    pub children: Vec<NodeId>,
}

fn default_opacity() -> f32 {
    1.0
}

/// Styled text with one style per character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TextNodeRepr", into = "TextNodeRepr")]
pub struct TextNode {
    characters: String,
    styles: Vec<CharStyle>,
    /// Style reported for empty text
    base_style: CharStyle,
    pub alignment: TextAlignment,
    /// Set once the node has been resized to a fixed width
    pub fixed_width: Option<f32>,
}

/// Run-length encoded form used in scene files
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TextNodeRepr {
    characters: String,
    #[serde(default)]
    style: CharStyle,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    spans: Vec<StyleSpan>,
    #[serde(default)]
    alignment: TextAlignment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fixed_width: Option<f32>,
}

/// `len` consecutive characters sharing `style`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSpan {
    pub len: usize,
    pub style: CharStyle,
}

impl From<TextNodeRepr> for TextNode {
    fn from(repr: TextNodeRepr) -> Self {
        let len = repr.characters.chars().count();
        let mut styles: Vec<CharStyle> = repr
            .spans
            .iter()
            .flat_map(|span| std::iter::repeat_n(span.style.clone(), span.len))
            .take(len)
            .collect();
        styles.resize(len, repr.style.clone());

        Self {
            characters: repr.characters,
            styles,
            base_style: repr.style,
            alignment: repr.alignment,
            fixed_width: repr.fixed_width,
        }
    }
}

impl From<TextNode> for TextNodeRepr {
    fn from(node: TextNode) -> Self {
        let mut spans: Vec<StyleSpan> = Vec::new();
        for style in node.styles {
            match spans.last_mut() {
                Some(span) if span.style == style => span.len += 1,
                _ => spans.push(StyleSpan { len: 1, style }),
            }
        }

        // A single span is just the node style
        let style = match spans.as_slice() {
            [only] => only.style.clone(),
            _ => node.base_style,
        };
        if spans.len() == 1 {
            spans.clear();
        }

        Self {
            characters: node.characters,
            style,
            spans,
            alignment: node.alignment,
            fixed_width: node.fixed_width,
        }
    }
}

impl TextNode {
    /// Text with one style for every character.
    pub fn new(characters: &str, style: CharStyle) -> Self {
        Self::from_spans(&[(characters, style)])
    }

    /// Text assembled from consecutive styled pieces.
    pub fn from_spans(pieces: &[(&str, CharStyle)]) -> Self {
        let mut characters = String::new();
        let mut styles = Vec::new();
        for (text, style) in pieces {
            characters.push_str(text);
            styles.extend(std::iter::repeat_n(style.clone(), text.chars().count()));
        }
        let base_style = pieces
            .first()
            .map(|(_, style)| style.clone())
            .unwrap_or_default();

        Self {
            characters,
            styles,
            base_style,
            alignment: TextAlignment::default(),
            fixed_width: None,
        }
    }

    pub fn characters(&self) -> &str {
        &self.characters
    }

    /// Per-character styles, index-aligned with the characters.
    pub fn styles(&self) -> &[CharStyle] {
        &self.styles
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Style new characters receive: the first character's, else the base style.
    fn leading_style(&self) -> &CharStyle {
        self.styles.first().unwrap_or(&self.base_style)
    }

    fn fonts(&self) -> HashSet<&FontName> {
        if self.styles.is_empty() {
            return HashSet::from([&self.base_style.font_name]);
        }
        self.styles.iter().map(|style| &style.font_name).collect()
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), MutationError> {
        let len = self.len();
        let empty_text = len == 0 && range.start == 0 && range.end == 0;
        if !empty_text && (range.start >= range.end || range.end > len) {
            return Err(MutationError::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(())
    }

    /// Unwrapped extents of the text.
    fn natural_size(&self) -> Size {
        let font_size = self.leading_style().font_size;
        let lines: Vec<usize> = self.characters.split('\n').map(|l| l.chars().count()).collect();
        let longest = lines.iter().copied().max().unwrap_or(0);
        Size {
            width: longest as f32 * font_size * CHAR_WIDTH_RATIO,
            height: lines.len().max(1) as f32 * font_size * LINE_HEIGHT_RATIO,
        }
    }

    /// Extents after wrapping to `fixed_width`, when set.
    fn layout_size(&self) -> Size {
        let natural = self.natural_size();
        match self.fixed_width {
            Some(width) if width > 0.0 => {
                let line_height = self.leading_style().font_size * LINE_HEIGHT_RATIO;
                let wrapped_lines = (natural.width / width).ceil().max(1.0);
                let explicit_lines = natural.height / line_height;
                Size {
                    width,
                    height: wrapped_lines.max(explicit_lines) * line_height,
                }
            }
            _ => natural,
        }
    }
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a scene from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut scene: MemoryScene =
            serde_json::from_str(json).context("Failed to parse scene JSON")?;
        scene.relayout_all();
        Ok(scene)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize scene to JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file: {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write scene file: {}", path.display()))
    }

    /// Add a text node at `position`.
    pub fn add_text(&mut self, name: &str, text: TextNode, position: Point) -> NodeId {
        let size = text.layout_size();
        self.push(SceneNode {
            name: name.to_string(),
            position,
            size,
            content: NodeContent::Text(text),
        })
    }

    /// Add a plain frame holding `children`.
    pub fn add_frame(&mut self, name: &str, children: Vec<NodeId>) -> NodeId {
        self.push(SceneNode {
            name: name.to_string(),
            position: Point::default(),
            size: DEFAULT_FRAME_SIZE,
            content: NodeContent::Frame(FrameNode {
                children,
                layout_mode: LayoutMode::None,
                counter_axis_sizing: AxisSizing::Auto,
                opacity: 1.0,
                vertical_padding: 0.0,
                horizontal_padding: 0.0,
                strokes: Vec::new(),
            }),
        })
    }

    pub fn add_group(&mut self, name: &str, children: Vec<NodeId>) -> NodeId {
        self.push(SceneNode {
            name: name.to_string(),
            position: Point::default(),
            size: Size::default(),
            content: NodeContent::Group(GroupNode { children }),
        })
    }

    pub fn add_shape(&mut self, name: &str) -> NodeId {
        self.push(SceneNode {
            name: name.to_string(),
            position: Point::default(),
            size: Size::default(),
            content: NodeContent::Shape,
        })
    }

    pub fn select(&mut self, ids: Vec<NodeId>) {
        self.selection = ids;
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn text_node(&self, id: NodeId) -> Option<&TextNode> {
        match &self.node(id)?.content {
            NodeContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn frame_node(&self, id: NodeId) -> Option<&FrameNode> {
        match &self.node(id)?.content {
            NodeContent::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn is_font_loaded(&self, font: &FontName) -> bool {
        self.loaded_fonts.contains(font)
    }

    /// Mark a font as impossible to load.
    pub fn make_unavailable(&mut self, font: FontName) {
        self.unavailable_fonts.push(font);
    }

    fn push(&mut self, node: SceneNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode, MutationError> {
        self.nodes.get_mut(id.0).ok_or(MutationError::NodeNotFound(id))
    }

    fn text_ref(&self, id: NodeId) -> Result<&TextNode, MutationError> {
        match &self.node(id).ok_or(MutationError::NodeNotFound(id))?.content {
            NodeContent::Text(text) => Ok(text),
            _ => Err(MutationError::NotATextNode(id)),
        }
    }

    fn text_mut(&mut self, id: NodeId) -> Result<&mut TextNode, MutationError> {
        match &mut self.node_mut(id)?.content {
            NodeContent::Text(text) => Ok(text),
            _ => Err(MutationError::NotATextNode(id)),
        }
    }

    fn require_loaded<'a, I>(&self, fonts: I) -> Result<(), MutationError>
    where
        I: IntoIterator<Item = &'a FontName>,
    {
        for font in fonts {
            if !self.loaded_fonts.contains(font) {
                return Err(MutationError::FontNotLoaded {
                    family: font.family.clone(),
                    style: font.style.clone(),
                });
            }
        }
        Ok(())
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.iter().enumerate().find_map(|(index, node)| {
            let children = match &node.content {
                NodeContent::Frame(frame) => &frame.children,
                NodeContent::Group(group) => &group.children,
                _ => return None,
            };
            children.contains(&id).then_some(NodeId(index))
        })
    }

    fn relayout_all(&mut self) {
        for index in 0..self.nodes.len() {
            self.relayout(NodeId(index));
        }
    }

    /// Recompute the size of a node, then of its auto-layout ancestors.
    fn relayout(&mut self, id: NodeId) {
        let mut visited = HashSet::new();
        let mut current = Some(id);
        while let Some(id) = current {
            if !visited.insert(id) {
                break;
            }
            let Some(size) = self.computed_size(id) else {
                break;
            };
            if let Some(node) = self.nodes.get_mut(id.0) {
                node.size = size;
            }
            current = self.parent_of(id);
        }
    }

    /// Size a node lays itself out to, or `None` when it keeps its own.
    fn computed_size(&self, id: NodeId) -> Option<Size> {
        let node = self.node(id)?;
        match &node.content {
            NodeContent::Text(text) => Some(text.layout_size()),
            NodeContent::Frame(frame) if frame.layout_mode == LayoutMode::Vertical => {
                let child_sizes: Vec<Size> = frame
                    .children
                    .iter()
                    .filter_map(|child| self.node(*child).map(|n| n.size))
                    .collect();
                let content_height: f32 = child_sizes.iter().map(|s| s.height).sum();
                let content_width = child_sizes.iter().map(|s| s.width).fold(0.0, f32::max);
                let width = match frame.counter_axis_sizing {
                    AxisSizing::Auto => content_width + 2.0 * frame.horizontal_padding,
                    AxisSizing::Fixed => node.size.width,
                };
                Some(Size {
                    width,
                    height: content_height + 2.0 * frame.vertical_padding,
                })
            }
            _ => None,
        }
    }
}

impl SceneTree for MemoryScene {
    fn node_kind(&self, id: NodeId) -> Option<NodeKind> {
        Some(match self.node(id)?.content {
            NodeContent::Text(_) => NodeKind::Text,
            NodeContent::Frame(_) | NodeContent::Group(_) => NodeKind::Container,
            NodeContent::Shape => NodeKind::Other,
        })
    }

    fn children(&self, id: NodeId) -> Vec<NodeId> {
        match self.node(id).map(|node| &node.content) {
            Some(NodeContent::Frame(frame)) => frame.children.clone(),
            Some(NodeContent::Group(group)) => group.children.clone(),
            _ => Vec::new(),
        }
    }

    fn characters(&self, id: NodeId) -> Option<String> {
        self.text_node(id).map(|text| text.characters.clone())
    }

    fn node_name(&self, id: NodeId) -> Option<String> {
        self.node(id).map(|node| node.name.clone())
    }
}

impl StyledText for MemoryScene {
    fn range_style(&self, id: NodeId, range: Range<usize>) -> Result<TextStyle, MutationError> {
        let text = self.text_ref(id)?;
        text.check_range(&range)?;
        if text.is_empty() {
            return Ok(TextStyle::from(&text.base_style));
        }
        TextStyle::from_chars(&text.styles[range.clone()]).ok_or(MutationError::InvalidRange {
            start: range.start,
            end: range.end,
            len: text.len(),
        })
    }

    fn set_range_style(
        &mut self,
        id: NodeId,
        range: Range<usize>,
        style: &TextStyle,
    ) -> Result<(), MutationError> {
        let text = self.text_ref(id)?;
        text.check_range(&range)?;
        if text.is_empty() {
            return Ok(());
        }

        let mut required: HashSet<&FontName> =
            text.styles[range.clone()].iter().map(|s| &s.font_name).collect();
        if let Some(font) = style.font_name.uniform() {
            required.insert(font);
        }
        self.require_loaded(required)?;

        let text = self.text_mut(id)?;
        for char_style in &mut text.styles[range] {
            style.apply_to(char_style);
        }
        self.relayout(id);
        Ok(())
    }

    fn set_characters(&mut self, id: NodeId, characters: &str) -> Result<(), MutationError> {
        let text = self.text_ref(id)?;
        self.require_loaded(text.fonts())?;

        let text = self.text_mut(id)?;
        let style = text.leading_style().clone();
        text.characters = characters.to_string();
        text.styles = vec![style.clone(); characters.chars().count()];
        text.base_style = style;
        self.relayout(id);
        Ok(())
    }

    fn text_alignment(&self, id: NodeId) -> Result<TextAlignment, MutationError> {
        Ok(self.text_ref(id)?.alignment)
    }

    fn set_text_alignment(
        &mut self,
        id: NodeId,
        alignment: TextAlignment,
    ) -> Result<(), MutationError> {
        self.text_mut(id)?.alignment = alignment;
        Ok(())
    }
}

#[async_trait]
impl FontLoader for MemoryScene {
    async fn load_font(&mut self, font: &FontName) -> Result<(), MutationError> {
        if self.unavailable_fonts.contains(font) {
            return Err(MutationError::FontLoad {
                family: font.family.clone(),
                style: font.style.clone(),
                reason: "font is not available".to_string(),
            });
        }
        if self.loaded_fonts.insert(font.clone()) {
            debug!("Loaded font {}", font);
        }
        Ok(())
    }
}

impl NodeFactory for MemoryScene {
    fn create_frame(&mut self, props: &FrameProps) -> Result<NodeId, MutationError> {
        Ok(self.push(SceneNode {
            name: props.name.clone(),
            position: Point::default(),
            size: DEFAULT_FRAME_SIZE,
            content: NodeContent::Frame(FrameNode {
                children: Vec::new(),
                layout_mode: props.layout_mode,
                counter_axis_sizing: props.counter_axis_sizing,
                opacity: props.opacity,
                vertical_padding: props.vertical_padding,
                horizontal_padding: props.horizontal_padding,
                strokes: props.strokes.clone(),
            }),
        }))
    }

    fn create_text(
        &mut self,
        parent: NodeId,
        font: &FontName,
        characters: &str,
    ) -> Result<NodeId, MutationError> {
        self.require_loaded([font])?;
        let origin = match &self.node(parent).ok_or(MutationError::NodeNotFound(parent))?.content {
            NodeContent::Frame(frame) => Point {
                x: frame.horizontal_padding,
                y: frame.vertical_padding,
            },
            NodeContent::Group(_) => Point::default(),
            _ => {
                return Err(MutationError::Rejected(format!(
                    "node {} cannot hold children",
                    parent
                )));
            }
        };
        let parent_position = self.node(parent).map(|n| n.position).unwrap_or_default();

        let style = CharStyle {
            font_name: font.clone(),
            ..CharStyle::default()
        };
        let text = self.add_text(
            characters,
            TextNode::new(characters, style),
            Point {
                x: parent_position.x + origin.x,
                y: parent_position.y + origin.y,
            },
        );

        match &mut self.node_mut(parent)?.content {
            NodeContent::Frame(frame) => frame.children.push(text),
            NodeContent::Group(group) => group.children.push(text),
            _ => {}
        }
        self.relayout(text);
        Ok(text)
    }

    fn node_size(&self, id: NodeId) -> Result<Size, MutationError> {
        self.node(id)
            .map(|node| node.size)
            .ok_or(MutationError::NodeNotFound(id))
    }

    fn resize(&mut self, id: NodeId, size: Size) -> Result<(), MutationError> {
        let node = self.node_mut(id)?;
        node.size = size;
        let wraps = match &mut node.content {
            NodeContent::Text(text) => {
                text.fixed_width = Some(size.width);
                true
            }
            _ => false,
        };
        // Text wraps to its new width; auto-layout parents follow
        if wraps {
            self.relayout(id);
        }
        Ok(())
    }

    fn set_counter_axis_sizing(
        &mut self,
        id: NodeId,
        sizing: AxisSizing,
    ) -> Result<(), MutationError> {
        match &mut self.node_mut(id)?.content {
            NodeContent::Frame(frame) => {
                frame.counter_axis_sizing = sizing;
                Ok(())
            }
            _ => Err(MutationError::Rejected(format!("node {} is not a frame", id))),
        }
    }

    fn absolute_position(&self, id: NodeId) -> Result<Point, MutationError> {
        self.node(id)
            .map(|node| node.position)
            .ok_or(MutationError::NodeNotFound(id))
    }

    fn set_position(&mut self, id: NodeId, position: Point) -> Result<(), MutationError> {
        let current = self.absolute_position(id)?;
        let (dx, dy) = (position.x - current.x, position.y - current.y);

        // Positions are absolute, so the whole subtree moves along
        let mut visited = HashSet::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if !visited.insert(next) {
                continue;
            }
            let node = self.node_mut(next)?;
            node.position.x += dx;
            node.position.y += dy;
            stack.extend(self.children(next));
        }
        Ok(())
    }
}
