//! Page-description tree produced by the composer and consumed by the layout pass.
//!
//! The vocabulary is deliberately small: stacks (`Column`), side-by-side
//! slots (`Row`), wrapping flows (`Inline`), decorated boxes (`Container`)
//! and leaves (`Text`, `Image`, `Rule`). Builders are chainable so
//! the composer reads top-down like the page it describes.

use std::sync::Arc;

use crate::pdf::color::{palette, Rgb};
use crate::pdf::font_metrics::FontFace;

/// US Letter in points.
pub const LETTER_WIDTH: f32 = 612.0;
pub const LETTER_HEIGHT: f32 = 792.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Insets {
    pub const fn all(v: f32) -> Self {
        Self { top: v, right: v, bottom: v, left: v }
    }

    pub const fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self { top: vertical, right: horizontal, bottom: vertical, left: horizontal }
    }

    pub const fn only_bottom(v: f32) -> Self {
        Self { top: 0.0, right: 0.0, bottom: v, left: 0.0 }
    }

    pub const fn only_top(v: f32) -> Self {
        Self { top: v, right: 0.0, bottom: 0.0, left: 0.0 }
    }

    pub const fn only_left(v: f32) -> Self {
        Self { top: 0.0, right: 0.0, bottom: 0.0, left: v }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Page geometry. `continuation_inset` is extra space kept clear at the top
/// of every page after the first and at the bottom of every page, so flowed
/// content never touches the paper edge on zero-margin templates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin: Insets,
    pub continuation_inset: f32,
}

impl PageSetup {
    pub fn letter(margin: Insets, continuation_inset: f32) -> Self {
        Self {
            width: LETTER_WIDTH,
            height: LETTER_HEIGHT,
            margin,
            continuation_inset,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin.horizontal()
    }

    pub fn content_top(&self, page: usize) -> f32 {
        if page == 0 {
            self.margin.top
        } else {
            self.margin.top + self.continuation_inset
        }
    }

    pub fn content_bottom(&self) -> f32 {
        self.height - self.margin.bottom - self.continuation_inset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub face: FontFace,
    pub color: Rgb,
    /// Multiple of `size` used as the line box height.
    pub line_height: f32,
    /// Extra spacing between characters, in em.
    pub letter_spacing: f32,
    pub align: HAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 10.0,
            face: FontFace::Regular,
            color: palette::GREY_DARKEN3,
            line_height: 1.2,
            letter_spacing: 0.0,
            align: HAlign::Left,
        }
    }
}

impl TextStyle {
    /// Letter spacing converted to points.
    pub fn tracking(&self) -> f32 {
        self.letter_spacing * self.size
    }

    pub fn line_box(&self) -> f32 {
        self.size * self.line_height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub content: String,
    pub style: TextStyle,
    /// Target URI; every rendered line of the block becomes clickable.
    pub link: Option<String>,
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: TextStyle::default(),
            link: None,
        }
    }

    pub fn size(mut self, size: f32) -> Self {
        self.style.size = size;
        self
    }

    pub fn bold(mut self) -> Self {
        self.style.face = match self.style.face {
            FontFace::Italic | FontFace::BoldItalic => FontFace::BoldItalic,
            _ => FontFace::Bold,
        };
        self
    }

    pub fn italic(mut self) -> Self {
        self.style.face = match self.style.face {
            FontFace::Bold | FontFace::BoldItalic => FontFace::BoldItalic,
            _ => FontFace::Italic,
        };
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.style.color = color;
        self
    }

    pub fn line_height(mut self, factor: f32) -> Self {
        self.style.line_height = factor;
        self
    }

    pub fn letter_spacing(mut self, em: f32) -> Self {
        self.style.letter_spacing = em;
        self
    }

    pub fn align(mut self, align: HAlign) -> Self {
        self.style.align = align;
        self
    }

    pub fn link(mut self, uri: Option<String>) -> Self {
        self.link = uri;
        self
    }
}

/// Decoded raster image ready for embedding (8-bit RGB, row-major).
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Width {
    Fixed(f32),
    /// Share of the space left after fixed and auto items.
    Relative(f32),
    /// Natural (unwrapped) width of the content.
    Auto,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowItem {
    pub width: Width,
    pub node: Node,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Container {
    pub padding: Insets,
    pub background: Option<Rgb>,
    pub border: Option<(f32, Rgb)>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub align: HAlign,
    /// Centre the child vertically inside a fixed `height`.
    pub middle: bool,
    pub child: Option<Box<Node>>,
}

impl Container {
    pub fn new(child: impl Into<Node>) -> Self {
        Self {
            child: Some(Box::new(child.into())),
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    pub fn background(mut self, color: Rgb) -> Self {
        self.background = Some(color);
        self
    }

    pub fn border(mut self, width: f32, color: Rgb) -> Self {
        self.border = Some((width, color));
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn align(mut self, align: HAlign) -> Self {
        self.align = align;
        self
    }

    pub fn middle(mut self) -> Self {
        self.middle = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Column { spacing: f32, children: Vec<Node> },
    Row { spacing: f32, items: Vec<RowItem> },
    Inline {
        spacing: f32,
        line_spacing: f32,
        align: HAlign,
        items: Vec<Node>,
    },
    Container(Container),
    Text(Text),
    Image { image: usize, width: f32, height: f32, align: HAlign },
    Rule { thickness: f32, color: Rgb },
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

impl From<Container> for Node {
    fn from(container: Container) -> Self {
        Node::Container(container)
    }
}

/// Accumulates column children, skipping the ones a section decided not to emit.
#[derive(Debug, Default)]
pub struct ColumnBuilder {
    spacing: f32,
    children: Vec<Node>,
}

impl ColumnBuilder {
    pub fn new(spacing: f32) -> Self {
        Self {
            spacing,
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, node: impl Into<Node>) -> &mut Self {
        self.children.push(node.into());
        self
    }

    pub fn push_opt(&mut self, node: Option<Node>) -> &mut Self {
        if let Some(node) = node {
            self.children.push(node);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn build(self) -> Node {
        Node::Column {
            spacing: self.spacing,
            children: self.children,
        }
    }
}

/// Left-aligned wrapping flow.
pub fn inline(spacing: f32, line_spacing: f32, items: Vec<Node>) -> Node {
    Node::Inline {
        spacing,
        line_spacing,
        align: HAlign::Left,
        items,
    }
}

pub fn row(spacing: f32, items: Vec<RowItem>) -> Node {
    Node::Row { spacing, items }
}

pub fn fixed(width: f32, node: impl Into<Node>) -> RowItem {
    RowItem {
        width: Width::Fixed(width),
        node: node.into(),
    }
}

pub fn relative(weight: f32, node: impl Into<Node>) -> RowItem {
    RowItem {
        width: Width::Relative(weight),
        node: node.into(),
    }
}

pub fn auto(node: impl Into<Node>) -> RowItem {
    RowItem {
        width: Width::Auto,
        node: node.into(),
    }
}

/// Full-height vertical stripe repeated on every page, under all content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backdrop {
    pub x: f32,
    pub width: f32,
    pub color: Rgb,
}

/// A complete document: page geometry, embedded images and the content tree.
#[derive(Debug, Clone)]
pub struct Document {
    pub page: PageSetup,
    pub images: Vec<Arc<RasterImage>>,
    pub backdrops: Vec<Backdrop>,
    pub root: Node,
}

impl Document {
    pub fn new(page: PageSetup, root: Node) -> Self {
        Self {
            page,
            images: Vec::new(),
            backdrops: Vec::new(),
            root,
        }
    }
}
