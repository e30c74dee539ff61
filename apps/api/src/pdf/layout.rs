//! Layout pass: turns a [`Document`] tree into positioned draw operations per page.
//!
//! # Flow model
//! A single cursor `(page, y)` walks the tree top-down. Before an unbreakable
//! piece (one text line, an inline line, an image, a rule, a fixed-height
//! box) is placed, [`Engine::fit`] moves the cursor to the next page if the
//! piece would cross the bottom of the content area. Row items all start at
//! the row's cursor and flow independently; the row ends at the lowest item.
//!
//! Coordinates are in points with the origin at the top-left of the page;
//! the writer flips them into PDF space. Operations carry the nesting depth
//! of the container that produced them and are painted in depth order, so a
//! background emitted after its content still lands underneath it.

use crate::pdf::color::Rgb;
use crate::pdf::document::{Container, Document, HAlign, Node, PageSetup, RowItem, Text, Width};
use crate::pdf::font_metrics::{get_metrics, FontFace, FIT_TOLERANCE};

/// Fraction of the font size between the top of the em box and the baseline.
const ASCENT: f32 = 0.78;
/// Rows at most this share of the page height are moved whole to the next page.
const KEEP_TOGETHER_FRACTION: f32 = 0.25;
/// Minimum content a flowing container must fit below its top padding before it starts.
const CONTAINER_LEAD: f32 = 36.0;
const EPSILON: f32 = FIT_TOLERANCE;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb,
    },
    Border {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        width: f32,
        color: Rgb,
    },
    Text {
        x: f32,
        baseline: f32,
        text: String,
        face: FontFace,
        size: f32,
        color: Rgb,
        /// Character spacing in points.
        tracking: f32,
    },
    Image {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        image: usize,
    },
}

/// Clickable region pointing at `uri`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkArea {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub ops: Vec<DrawOp>,
    pub links: Vec<LinkArea>,
}

impl PageLayout {
    #[cfg(test)]
    /// All text drawn on the page, one entry per rendered line fragment.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Lays out the whole document. Always returns at least one page.
pub fn layout_document(doc: &Document) -> Vec<PageLayout> {
    let mut engine = Engine::new(doc);
    let start = Cursor {
        page: 0,
        y: doc.page.content_top(0),
    };
    engine.place(
        &doc.root,
        doc.page.margin.left,
        doc.page.content_width(),
        start,
        0,
    );
    engine.finish()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cursor {
    page: usize,
    y: f32,
}

impl Cursor {
    fn lowest(self, other: Cursor) -> Cursor {
        if other.page > self.page || (other.page == self.page && other.y > self.y) {
            other
        } else {
            self
        }
    }
}

struct Engine<'a> {
    doc: &'a Document,
    setup: PageSetup,
    pages: Vec<(Vec<(usize, DrawOp)>, Vec<LinkArea>)>,
    /// While > 0 the cursor never breaks to a new page.
    no_break: u32,
}

impl<'a> Engine<'a> {
    fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            setup: doc.page,
            pages: vec![(Vec::new(), Vec::new())],
            no_break: 0,
        }
    }

    fn finish(self) -> Vec<PageLayout> {
        let backdrops: Vec<DrawOp> = self
            .doc
            .backdrops
            .iter()
            .map(|b| DrawOp::Rect {
                x: b.x,
                y: 0.0,
                w: b.width,
                h: self.setup.height,
                color: b.color,
            })
            .collect();
        self.pages
            .into_iter()
            .map(|(mut ops, links)| {
                ops.sort_by_key(|(depth, _)| *depth);
                PageLayout {
                    ops: backdrops
                        .iter()
                        .cloned()
                        .chain(ops.into_iter().map(|(_, op)| op))
                        .collect(),
                    links,
                }
            })
            .collect()
    }

    fn page_mut(&mut self, page: usize) -> &mut (Vec<(usize, DrawOp)>, Vec<LinkArea>) {
        while self.pages.len() <= page {
            self.pages.push((Vec::new(), Vec::new()));
        }
        &mut self.pages[page]
    }

    fn emit(&mut self, page: usize, depth: usize, op: DrawOp) {
        self.page_mut(page).0.push((depth, op));
    }

    fn emit_link(&mut self, page: usize, link: LinkArea) {
        self.page_mut(page).1.push(link);
    }

    /// Moves to the next page if a piece of height `h` does not fit below `at`.
    /// A piece already at the top of a page stays, even if it is taller than the page.
    fn fit(&self, at: Cursor, h: f32) -> Cursor {
        if self.no_break > 0 {
            return at;
        }
        let top = self.setup.content_top(at.page);
        if at.y + h > self.setup.content_bottom() + EPSILON && at.y > top + EPSILON {
            Cursor {
                page: at.page + 1,
                y: self.setup.content_top(at.page + 1),
            }
        } else {
            at
        }
    }

    fn place(&mut self, node: &Node, x: f32, width: f32, at: Cursor, depth: usize) -> Cursor {
        match node {
            Node::Rule { thickness, color } => {
                let at = self.fit(at, *thickness);
                self.emit(
                    at.page,
                    depth,
                    DrawOp::Rect {
                        x,
                        y: at.y,
                        w: width,
                        h: *thickness,
                        color: *color,
                    },
                );
                Cursor {
                    page: at.page,
                    y: at.y + thickness,
                }
            }
            Node::Text(text) => self.place_text(text, x, width, at, depth),
            Node::Image {
                image,
                width: w,
                height: h,
                align,
            } => {
                let (w, h) = scaled_image(*w, *h, width);
                let at = self.fit(at, h);
                self.emit(
                    at.page,
                    depth,
                    DrawOp::Image {
                        x: x + align_offset(*align, width, w),
                        y: at.y,
                        w,
                        h,
                        image: *image,
                    },
                );
                Cursor {
                    page: at.page,
                    y: at.y + h,
                }
            }
            Node::Column { spacing, children } => {
                let mut cursor = at;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        cursor.y += spacing;
                    }
                    cursor = self.place(child, x, width, cursor, depth);
                }
                cursor
            }
            Node::Row { spacing, items } => {
                let slots = resolve_widths(self.doc, items, width, *spacing);
                let keep_together = (self.setup.content_bottom() - self.setup.content_top(1))
                    * KEEP_TOGETHER_FRACTION;
                let total = measure_height(self.doc, node, width);
                let at = if total <= keep_together {
                    self.fit(at, total)
                } else {
                    at
                };
                let mut end = at;
                for (item, (offset, w)) in items.iter().zip(slots) {
                    let item_end = self.place(&item.node, x + offset, w, at, depth);
                    end = end.lowest(item_end);
                }
                end
            }
            Node::Inline {
                spacing,
                line_spacing,
                align,
                items,
            } => {
                let lines = break_inline(self.doc, items, *spacing, width);
                self.place_inline(items, &lines, *line_spacing, *align, x, width, at, depth)
            }
            Node::Container(container) => self.place_container(container, x, width, at, depth),
        }
    }

    fn place_text(&mut self, text: &Text, x: f32, width: f32, at: Cursor, depth: usize) -> Cursor {
        let style = &text.style;
        let metrics = get_metrics(style.face);
        let tracking = style.tracking();
        let lines = metrics.wrap(&text.content, style.size, tracking, width);
        let line_h = style.line_box();
        let mut cursor = at;

        for line in lines {
            cursor = self.fit(cursor, line_h);
            if !line.is_empty() {
                let line_w = metrics.measure(&line, style.size, tracking);
                let line_x = x + align_offset(style.align, width, line_w);
                let baseline = cursor.y + (line_h - style.size) / 2.0 + style.size * ASCENT;
                if let Some(uri) = &text.link {
                    self.emit_link(
                        cursor.page,
                        LinkArea {
                            x: line_x,
                            y: cursor.y,
                            w: line_w,
                            h: line_h,
                            uri: uri.clone(),
                        },
                    );
                }
                self.emit(
                    cursor.page,
                    depth,
                    DrawOp::Text {
                        x: line_x,
                        baseline,
                        text: line,
                        face: style.face,
                        size: style.size,
                        color: style.color,
                        tracking,
                    },
                );
            }
            cursor.y += line_h;
        }
        cursor
    }

    #[allow(clippy::too_many_arguments)]
    fn place_inline(
        &mut self,
        items: &[Node],
        lines: &[Vec<InlineSlot>],
        line_spacing: f32,
        align: HAlign,
        x: f32,
        width: f32,
        at: Cursor,
        depth: usize,
    ) -> Cursor {
        let mut cursor = at;
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                cursor.y += line_spacing;
            }
            let line_h = line.iter().map(|slot| slot.height).fold(0.0, f32::max);
            let line_w = line.last().map(|slot| slot.x + slot.width).unwrap_or(0.0);
            let offset = align_offset(align, width, line_w);
            cursor = self.fit(cursor, line_h);
            self.no_break += 1;
            for slot in line {
                self.place(&items[slot.index], x + offset + slot.x, slot.width, cursor, depth);
            }
            self.no_break -= 1;
            cursor.y += line_h;
        }
        cursor
    }

    fn place_container(
        &mut self,
        c: &Container,
        x: f32,
        width: f32,
        at: Cursor,
        depth: usize,
    ) -> Cursor {
        let w = c.width.map(|w| w.min(width)).unwrap_or(width);
        let x0 = x + align_offset(c.align, width, w);
        let inner_w = (w - c.padding.horizontal()).max(0.0);

        let (start, end) = match c.height {
            Some(h) => {
                let start = self.fit(at, h);
                if let Some(child) = &c.child {
                    let content_h = measure_height(self.doc, child, inner_w);
                    let offset = if c.middle {
                        ((h - c.padding.vertical() - content_h) / 2.0).max(0.0)
                    } else {
                        0.0
                    };
                    self.no_break += 1;
                    self.place(
                        child,
                        x0 + c.padding.left,
                        inner_w,
                        Cursor {
                            page: start.page,
                            y: start.y + c.padding.top + offset,
                        },
                        depth + 1,
                    );
                    self.no_break -= 1;
                }
                (
                    start,
                    Cursor {
                        page: start.page,
                        y: start.y + h,
                    },
                )
            }
            None => {
                let lead = c
                    .child
                    .as_ref()
                    .map(|child| measure_height(self.doc, child, inner_w).min(CONTAINER_LEAD))
                    .unwrap_or(0.0);
                let start = self.fit(at, c.padding.vertical() + lead);
                let inner_start = Cursor {
                    page: start.page,
                    y: start.y + c.padding.top,
                };
                let inner_end = match &c.child {
                    Some(child) => {
                        self.place(child, x0 + c.padding.left, inner_w, inner_start, depth + 1)
                    }
                    None => inner_start,
                };
                (
                    start,
                    Cursor {
                        page: inner_end.page,
                        y: inner_end.y + c.padding.bottom,
                    },
                )
            }
        };

        if c.background.is_some() || c.border.is_some() {
            for page in start.page..=end.page {
                let top = if page == start.page {
                    start.y
                } else {
                    self.setup.content_top(page)
                };
                let bottom = if page == end.page {
                    end.y
                } else {
                    self.setup.content_bottom()
                };
                if bottom - top <= EPSILON {
                    continue;
                }
                if let Some(color) = c.background {
                    self.emit(
                        page,
                        depth,
                        DrawOp::Rect {
                            x: x0,
                            y: top,
                            w,
                            h: bottom - top,
                            color,
                        },
                    );
                }
                if let Some((stroke, color)) = c.border {
                    self.emit(
                        page,
                        depth,
                        DrawOp::Border {
                            x: x0,
                            y: top,
                            w,
                            h: bottom - top,
                            width: stroke,
                            color,
                        },
                    );
                }
            }
        }
        end
    }
}

struct InlineSlot {
    index: usize,
    x: f32,
    width: f32,
    height: f32,
}

fn break_inline(doc: &Document, items: &[Node], spacing: f32, width: f32) -> Vec<Vec<InlineSlot>> {
    let mut lines: Vec<Vec<InlineSlot>> = Vec::new();
    let mut current: Vec<InlineSlot> = Vec::new();
    let mut line_x = 0.0_f32;

    for (index, item) in items.iter().enumerate() {
        let w = natural_width(doc, item).min(width);
        let h = measure_height(doc, item, w);
        if !current.is_empty() && line_x + spacing + w > width + EPSILON {
            lines.push(std::mem::take(&mut current));
            line_x = 0.0;
        }
        let x = if current.is_empty() { 0.0 } else { line_x + spacing };
        current.push(InlineSlot {
            index,
            x,
            width: w,
            height: h,
        });
        line_x = x + w;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn align_offset(align: HAlign, available: f32, used: f32) -> f32 {
    match align {
        HAlign::Left => 0.0,
        HAlign::Center => ((available - used) / 2.0).max(0.0),
    }
}

fn scaled_image(w: f32, h: f32, available: f32) -> (f32, f32) {
    if w > available && w > 0.0 {
        (available, h * available / w)
    } else {
        (w, h)
    }
}

/// Offsets and widths of row slots. Fixed and auto widths are honoured first;
/// relative items share what remains in proportion to their weights.
fn resolve_widths(doc: &Document, items: &[RowItem], width: f32, spacing: f32) -> Vec<(f32, f32)> {
    let gaps = spacing * items.len().saturating_sub(1) as f32;
    let mut remaining = (width - gaps).max(0.0);
    let mut widths = vec![0.0_f32; items.len()];

    for (i, item) in items.iter().enumerate() {
        if let Width::Fixed(w) = item.width {
            widths[i] = w.min(remaining);
            remaining -= widths[i];
        }
    }
    for (i, item) in items.iter().enumerate() {
        if item.width == Width::Auto {
            widths[i] = natural_width(doc, &item.node).min(remaining);
            remaining -= widths[i];
        }
    }
    let total_weight: f32 = items
        .iter()
        .filter_map(|item| match item.width {
            Width::Relative(weight) => Some(weight),
            _ => None,
        })
        .sum();
    if total_weight > 0.0 {
        for (i, item) in items.iter().enumerate() {
            if let Width::Relative(weight) = item.width {
                widths[i] = remaining * weight / total_weight;
            }
        }
    }

    let mut offset = 0.0;
    widths
        .into_iter()
        .map(|w| {
            let slot = (offset, w);
            offset += w + spacing;
            slot
        })
        .collect()
}

/// Height of `node` laid out at `width` on an infinitely tall page.
pub fn measure_height(doc: &Document, node: &Node, width: f32) -> f32 {
    match node {
        Node::Rule { thickness, .. } => *thickness,
        Node::Text(text) => {
            let style = &text.style;
            let lines = get_metrics(style.face).wrap(&text.content, style.size, style.tracking(), width);
            lines.len() as f32 * style.line_box()
        }
        Node::Image {
            width: w,
            height: h,
            ..
        } => scaled_image(*w, *h, width).1,
        Node::Column { spacing, children } => {
            let content: f32 = children.iter().map(|c| measure_height(doc, c, width)).sum();
            content + spacing * children.len().saturating_sub(1) as f32
        }
        Node::Row { spacing, items } => resolve_widths(doc, items, width, *spacing)
            .into_iter()
            .zip(items)
            .map(|((_, w), item)| measure_height(doc, &item.node, w))
            .fold(0.0, f32::max),
        Node::Inline {
            spacing,
            line_spacing,
            items,
            ..
        } => {
            let lines = break_inline(doc, items, *spacing, width);
            let content: f32 = lines
                .iter()
                .map(|line| line.iter().map(|s| s.height).fold(0.0, f32::max))
                .sum();
            content + line_spacing * lines.len().saturating_sub(1) as f32
        }
        Node::Container(c) => match c.height {
            Some(h) => h,
            None => {
                let w = c.width.map(|w| w.min(width)).unwrap_or(width);
                let inner_w = (w - c.padding.horizontal()).max(0.0);
                c.padding.vertical()
                    + c.child
                        .as_ref()
                        .map(|child| measure_height(doc, child, inner_w))
                        .unwrap_or(0.0)
            }
        },
    }
}

/// Width of `node` if nothing wrapped.
pub fn natural_width(doc: &Document, node: &Node) -> f32 {
    match node {
        Node::Rule { .. } => 0.0,
        Node::Text(text) => {
            let style = &text.style;
            let metrics = get_metrics(style.face);
            text.content
                .lines()
                .map(|line| metrics.measure(line.trim(), style.size, style.tracking()))
                .fold(0.0, f32::max)
        }
        Node::Image { width, .. } => *width,
        Node::Column { children, .. } => children
            .iter()
            .map(|c| natural_width(doc, c))
            .fold(0.0, f32::max),
        Node::Row { spacing, items } => {
            let content: f32 = items
                .iter()
                .map(|item| match item.width {
                    Width::Fixed(w) => w,
                    _ => natural_width(doc, &item.node),
                })
                .sum();
            content + spacing * items.len().saturating_sub(1) as f32
        }
        Node::Inline { spacing, items, .. } => {
            let content: f32 = items.iter().map(|i| natural_width(doc, i)).sum();
            content + spacing * items.len().saturating_sub(1) as f32
        }
        Node::Container(c) => c.width.unwrap_or_else(|| {
            c.padding.horizontal()
                + c.child
                    .as_ref()
                    .map(|child| natural_width(doc, child))
                    .unwrap_or(0.0)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::color::palette;
    use crate::pdf::document::{auto, fixed, inline, relative, row, Backdrop, Insets, Text};

    fn doc(root: Node) -> Document {
        Document::new(PageSetup::letter(Insets::all(50.0), 0.0), root)
    }

    fn column(children: Vec<Node>) -> Node {
        Node::Column {
            spacing: 0.0,
            children,
        }
    }

    #[test]
    fn test_empty_document_has_one_page() {
        let pages = layout_document(&doc(column(vec![])));
        assert_eq!(pages.len(), 1);
        assert!(pages[0].ops.is_empty());
    }

    #[test]
    fn test_text_positioned_inside_margins() {
        let pages = layout_document(&doc(Text::new("Hello").into()));
        match &pages[0].ops[0] {
            DrawOp::Text { x, baseline, text, .. } => {
                assert_eq!(text, "Hello");
                assert_eq!(*x, 50.0);
                assert!(*baseline > 50.0 && *baseline < 70.0);
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_centered_text_offset() {
        let d = doc(Text::new("Hi").align(HAlign::Center).into());
        let pages = layout_document(&d);
        let w = get_metrics(FontFace::Regular).measure("Hi", 10.0, 0.0);
        match &pages[0].ops[0] {
            DrawOp::Text { x, .. } => {
                let expected = 50.0 + (512.0 - w) / 2.0;
                assert!((x - expected).abs() < 1e-3);
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_overflow_creates_second_page() {
        let paragraphs: Vec<Node> = (0..80)
            .map(|i| Text::new(format!("Line number {i}")).size(12.0).into())
            .collect();
        let pages = layout_document(&doc(column(paragraphs)));
        assert!(pages.len() >= 2, "expected pagination, got {} page(s)", pages.len());
        let total: usize = pages.iter().map(|p| p.texts().count()).sum();
        assert_eq!(total, 80);
        // Nothing is drawn below the bottom margin.
        for page in &pages {
            for op in &page.ops {
                if let DrawOp::Text { baseline, .. } = op {
                    assert!(*baseline <= 742.0 + 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_background_painted_before_content() {
        let boxed = Container::new(Text::new("inside"))
            .background(palette::GREY_LIGHTEN2)
            .padding(Insets::all(5.0));
        let pages = layout_document(&doc(boxed.into()));
        assert!(matches!(pages[0].ops[0], DrawOp::Rect { .. }));
        assert!(matches!(pages[0].ops[1], DrawOp::Text { .. }));
    }

    #[test]
    fn test_background_split_across_pages() {
        let lines: Vec<Node> = (0..70).map(|i| Text::new(format!("row {i}")).size(12.0).into()).collect();
        let boxed = Container::new(column(lines)).background(palette::GREY_LIGHTEN2);
        let pages = layout_document(&doc(boxed.into()));
        assert!(pages.len() >= 2);
        for page in &pages {
            assert!(page.ops.iter().any(|op| matches!(op, DrawOp::Rect { .. })));
        }
    }

    #[test]
    fn test_row_auto_item_takes_natural_width() {
        let r = row(
            0.0,
            vec![relative(1.0, Text::new("Company")), auto(Text::new("2020 - 2023"))],
        );
        let pages = layout_document(&doc(r));
        let xs: Vec<f32> = pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { x, .. } => Some(*x),
                _ => None,
            })
            .collect();
        let date_w = get_metrics(FontFace::Regular).measure("2020 - 2023", 10.0, 0.0);
        assert_eq!(xs[0], 50.0);
        assert!((xs[1] - (562.0 - date_w)).abs() < 1e-3);
    }

    #[test]
    fn test_fixed_row_item() {
        let r = row(
            10.0,
            vec![fixed(100.0, Text::new("left")), relative(1.0, Text::new("right"))],
        );
        let pages = layout_document(&doc(r));
        let xs: Vec<f32> = pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { x, .. } => Some(*x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![50.0, 160.0]);
    }

    #[test]
    fn test_inline_wraps_onto_multiple_lines() {
        let pills: Vec<Node> = (0..30)
            .map(|i| {
                Container::new(Text::new(format!("skill-{i}")))
                    .padding(Insets::symmetric(3.0, 8.0))
                    .into()
            })
            .collect();
        let inline = inline(8.0, 8.0, pills);
        let d = doc(inline.clone());
        let single_line = natural_width(&d, &inline);
        assert!(single_line > 512.0);
        let h = measure_height(&d, &inline, 512.0);
        assert!(h > 2.0 * 18.0, "expected several lines, got height {h}");
        let pages = layout_document(&d);
        assert_eq!(pages[0].texts().count(), 30);
    }

    #[test]
    fn test_fixed_height_container_is_centred() {
        let boxed = Container::new(Text::new("T").size(50.0).line_height(1.0))
            .size(80.0, 100.0)
            .align(HAlign::Center)
            .middle()
            .background(palette::BLACK);
        let d = doc(boxed.into());
        let pages = layout_document(&d);
        match &pages[0].ops[0] {
            DrawOp::Rect { x, y, w, h, .. } => {
                assert_eq!((*w, *h), (80.0, 100.0));
                assert!((x - (50.0 + (512.0 - 80.0) / 2.0)).abs() < 1e-3);
                assert_eq!(*y, 50.0);
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_linked_text_produces_link_area() {
        let d = doc(Text::new("example.com").link(Some("https://example.com".into())).into());
        let pages = layout_document(&d);
        assert_eq!(pages[0].links.len(), 1);
        assert_eq!(pages[0].links[0].uri, "https://example.com");
    }

    #[test]
    fn test_centered_inline_line() {
        let items: Vec<Node> = vec![Text::new("a").into(), Text::new("b").into()];
        let d = doc(Node::Inline {
            spacing: 10.0,
            line_spacing: 0.0,
            align: HAlign::Center,
            items,
        });
        let pages = layout_document(&d);
        let m = get_metrics(FontFace::Regular);
        let line_w = m.measure("a", 10.0, 0.0) + 10.0 + m.measure("b", 10.0, 0.0);
        match &pages[0].ops[0] {
            DrawOp::Text { x, .. } => assert!((x - (50.0 + (512.0 - line_w) / 2.0)).abs() < 1e-3),
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn test_backdrop_on_every_page() {
        let lines: Vec<Node> = (0..100).map(|i| Text::new(format!("l{i}")).size(12.0).into()).collect();
        let mut d = doc(column(lines));
        d.backdrops.push(Backdrop {
            x: 0.0,
            width: 200.0,
            color: palette::GREY_LIGHTEN2,
        });
        let pages = layout_document(&d);
        assert!(pages.len() >= 2);
        for page in &pages {
            assert!(matches!(page.ops[0], DrawOp::Rect { w, h, .. } if w == 200.0 && h == 792.0));
        }
    }

    #[test]
    fn test_layout_is_deterministic() {
        let d = doc(column(vec![
            Text::new("Jane Doe").size(24.0).bold().into(),
            Text::new("Lorem ipsum dolor sit amet ".repeat(40)).into(),
        ]));
        assert_eq!(layout_document(&d), layout_document(&d));
    }
}
