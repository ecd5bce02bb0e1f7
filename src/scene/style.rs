/*!
 * Text style value types.
 *
 * Every per-range attribute is wrapped in `Mixed<T>`: either one concrete
 * value for the whole range, or `Varies` when the range is not uniform.
 * A `Varies` value is never collapsed into a concrete one.
 */

use serde::{Deserialize, Serialize};

/// Value of a style attribute over a character range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "value")]
pub enum Mixed<T> {
    /// The whole range shares this value
    Uniform(T),
    /// The value differs somewhere inside the range
    Varies,
}

impl<T> Mixed<T> {
    /// The uniform value, if any.
    pub fn uniform(&self) -> Option<&T> {
        match self {
            Self::Uniform(value) => Some(value),
            Self::Varies => None,
        }
    }

    pub fn is_varies(&self) -> bool {
        matches!(self, Self::Varies)
    }
}

impl<T: PartialEq> Mixed<T> {
    /// Fold a sequence of concrete values into a single `Mixed`.
    ///
    /// An empty sequence yields `None`; there is nothing to describe.
    pub fn from_values<'a, I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a T>,
        T: Clone + 'a,
    {
        let mut iter = values.into_iter();
        let first = iter.next()?;
        if iter.all(|value| value == first) {
            Some(Self::Uniform(first.clone()))
        } else {
            Some(Self::Varies)
        }
    }
}

/// Font family plus style, e.g. "Inter" / "Regular"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FontName {
    pub family: String,
    pub style: String,
}

impl FontName {
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }
}

impl std::fmt::Display for FontName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    Strikethrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextCase {
    #[default]
    Original,
    Upper,
    Lower,
    Title,
    SmallCaps,
    SmallCapsForced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpacingUnit {
    #[default]
    Pixels,
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LetterSpacing {
    pub value: f32,
    pub unit: SpacingUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "unit", content = "value")]
pub enum LineHeight {
    #[default]
    Auto,
    Pixels(f32),
    Percent(f32),
}

/// RGB colour with channels in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
}

/// A solid paint layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    pub color: Rgb,
    #[serde(default = "default_paint_opacity")]
    pub opacity: f32,
}

impl Paint {
    pub fn solid(color: Rgb) -> Self {
        Self { color, opacity: 1.0 }
    }
}

fn default_paint_opacity() -> f32 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

/// Whole-node paragraph alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextAlignment {
    #[serde(default)]
    pub horizontal: HorizontalAlign,
    #[serde(default)]
    pub vertical: VerticalAlign,
}

/// Concrete style of a single character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharStyle {
    pub font_name: FontName,
    pub font_size: f32,
    #[serde(default)]
    pub decoration: TextDecoration,
    #[serde(default)]
    pub case: TextCase,
    #[serde(default)]
    pub letter_spacing: LetterSpacing,
    #[serde(default)]
    pub line_height: LineHeight,
    #[serde(default)]
    pub fills: Vec<Paint>,
}

impl Default for CharStyle {
    fn default() -> Self {
        Self {
            font_name: FontName::new("Inter", "Regular"),
            font_size: 12.0,
            decoration: TextDecoration::default(),
            case: TextCase::default(),
            letter_spacing: LetterSpacing::default(),
            line_height: LineHeight::default(),
            fills: vec![Paint::solid(Rgb::BLACK)],
        }
    }
}

/// Style of a character range, one `Mixed` per attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_name: Mixed<FontName>,
    pub font_size: Mixed<f32>,
    pub decoration: Mixed<TextDecoration>,
    pub case: Mixed<TextCase>,
    pub letter_spacing: Mixed<LetterSpacing>,
    pub line_height: Mixed<LineHeight>,
    pub fills: Mixed<Vec<Paint>>,
}

impl TextStyle {
    /// Describe a range made of the given per-character styles.
    ///
    /// Returns `None` for an empty range.
    pub fn from_chars(chars: &[CharStyle]) -> Option<Self> {
        Some(Self {
            font_name: Mixed::from_values(chars.iter().map(|c| &c.font_name))?,
            font_size: Mixed::from_values(chars.iter().map(|c| &c.font_size))?,
            decoration: Mixed::from_values(chars.iter().map(|c| &c.decoration))?,
            case: Mixed::from_values(chars.iter().map(|c| &c.case))?,
            letter_spacing: Mixed::from_values(chars.iter().map(|c| &c.letter_spacing))?,
            line_height: Mixed::from_values(chars.iter().map(|c| &c.line_height))?,
            fills: Mixed::from_values(chars.iter().map(|c| &c.fills))?,
        })
    }

    /// True when no attribute varies across the range.
    pub fn is_uniform(&self) -> bool {
        !(self.font_name.is_varies()
            || self.font_size.is_varies()
            || self.decoration.is_varies()
            || self.case.is_varies()
            || self.letter_spacing.is_varies()
            || self.line_height.is_varies()
            || self.fills.is_varies())
    }

    /// Overwrite the uniform attributes of `target`, leaving the rest alone.
    pub fn apply_to(&self, target: &mut CharStyle) {
        if let Mixed::Uniform(font_name) = &self.font_name {
            target.font_name = font_name.clone();
        }
        if let Mixed::Uniform(font_size) = self.font_size {
            target.font_size = font_size;
        }
        if let Mixed::Uniform(decoration) = self.decoration {
            target.decoration = decoration;
        }
        if let Mixed::Uniform(case) = self.case {
            target.case = case;
        }
        if let Mixed::Uniform(letter_spacing) = self.letter_spacing {
            target.letter_spacing = letter_spacing;
        }
        if let Mixed::Uniform(line_height) = self.line_height {
            target.line_height = line_height;
        }
        if let Mixed::Uniform(fills) = &self.fills {
            target.fills = fills.clone();
        }
    }
}

impl From<&CharStyle> for TextStyle {
    fn from(style: &CharStyle) -> Self {
        Self {
            font_name: Mixed::Uniform(style.font_name.clone()),
            font_size: Mixed::Uniform(style.font_size),
            decoration: Mixed::Uniform(style.decoration),
            case: Mixed::Uniform(style.case),
            letter_spacing: Mixed::Uniform(style.letter_spacing),
            line_height: Mixed::Uniform(style.line_height),
            fills: Mixed::Uniform(style.fills.clone()),
        }
    }
}
