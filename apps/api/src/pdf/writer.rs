//! Serialises laid-out pages into PDF bytes with `lopdf`.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document as PdfDocument, Object, ObjectId, Stream, StringFormat};

use crate::pdf::color::Rgb;
use crate::pdf::document::Document;
use crate::pdf::font_metrics::{win_ansi_code, FontFace};
use crate::pdf::layout::{DrawOp, LinkArea, PageLayout};
use crate::pdf::PdfError;

/// Writes `pages` using the geometry and images of `doc`.
pub fn write_pdf(doc: &Document, pages: &[PageLayout], title: &str) -> Result<Vec<u8>, PdfError> {
    let mut pdf = PdfDocument::with_version("1.5");
    let pages_id = pdf.new_object_id();
    let page_height = doc.page.height;

    let mut fonts = Dictionary::new();
    for face in FontFace::ALL {
        let font_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), font_id);
    }
    let fonts_id = pdf.add_object(fonts);

    let image_ids: Vec<ObjectId> = doc
        .images
        .iter()
        .map(|img| {
            let dict = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => img.width as i64,
                "Height" => img.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            };
            pdf.add_object(Stream::new(dict, img.rgb.clone()))
        })
        .collect();

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page_operations(page, page_height),
        };
        let content_id = pdf.add_object(Stream::new(dictionary! {}, content.encode()?));

        let mut xobjects = Dictionary::new();
        for (index, id) in image_ids.iter().enumerate() {
            xobjects.set(image_resource(index), *id);
        }
        let resources_id = pdf.add_object(dictionary! {
            "Font" => fonts_id,
            "XObject" => xobjects,
        });

        let annots: Vec<Object> = page
            .links
            .iter()
            .map(|link| Object::Reference(pdf.add_object(link_annotation(link, page_height))))
            .collect();

        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), real(doc.page.width), real(page_height)],
            "Contents" => content_id,
            "Resources" => resources_id,
        };
        if !annots.is_empty() {
            page_dict.set("Annots", annots);
        }
        kids.push(Object::Reference(pdf.add_object(page_dict)));
    }

    let count = kids.len() as i64;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = pdf.add_object(dictionary! {
        "Title" => text_string(title),
        "Producer" => Object::string_literal(env!("CARGO_PKG_NAME")),
    });
    pdf.trailer.set("Root", catalog_id);
    pdf.trailer.set("Info", info_id);
    pdf.compress();

    let mut bytes = Vec::new();
    pdf.save_to(&mut bytes)?;
    Ok(bytes)
}

fn page_operations(page: &PageLayout, page_height: f32) -> Vec<Operation> {
    let mut ops = Vec::new();
    for op in &page.ops {
        match op {
            DrawOp::Rect { x, y, w, h, color } => {
                ops.push(fill_color(*color));
                ops.push(rect(*x, page_height - y - h, *w, *h));
                ops.push(Operation::new("f", vec![]));
            }
            DrawOp::Border {
                x,
                y,
                w,
                h,
                width,
                color,
            } => {
                ops.push(stroke_color(*color));
                ops.push(Operation::new("w", vec![real(*width)]));
                // Inset by half the stroke so the border stays inside the box.
                let half = width / 2.0;
                ops.push(rect(
                    x + half,
                    page_height - y - h + half,
                    (w - width).max(0.0),
                    (h - width).max(0.0),
                ));
                ops.push(Operation::new("S", vec![]));
            }
            DrawOp::Text {
                x,
                baseline,
                text,
                face,
                size,
                color,
                tracking,
            } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(fill_color(*color));
                ops.push(Operation::new(
                    "Tf",
                    vec![Object::Name(face.resource_name().as_bytes().to_vec()), real(*size)],
                ));
                ops.push(Operation::new("Tc", vec![real(*tracking)]));
                ops.push(Operation::new("Td", vec![real(*x), real(page_height - baseline)]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            DrawOp::Image { x, y, w, h, image } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![real(*w), 0.into(), 0.into(), real(*h), real(*x), real(page_height - y - h)],
                ));
                ops.push(Operation::new(
                    "Do",
                    vec![Object::Name(image_resource(*image).into_bytes())],
                ));
                ops.push(Operation::new("Q", vec![]));
            }
        }
    }
    ops
}

fn link_annotation(link: &LinkArea, page_height: f32) -> Dictionary {
    let bottom = page_height - link.y - link.h;
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![real(link.x), real(bottom), real(link.x + link.w), real(bottom + link.h)],
        "Border" => vec![0.into(), 0.into(), 0.into()],
        "A" => dictionary! {
            "S" => "URI",
            "URI" => Object::string_literal(link.uri.as_str()),
        },
    }
}

fn image_resource(index: usize) -> String {
    format!("Im{}", index + 1)
}

fn real(v: f32) -> Object {
    Object::Real(v)
}

fn rect(x: f32, y: f32, w: f32, h: f32) -> Operation {
    Operation::new("re", vec![real(x), real(y), real(w), real(h)])
}

fn fill_color(color: Rgb) -> Operation {
    let [r, g, b] = color.unit();
    Operation::new("rg", vec![real(r), real(g), real(b)])
}

fn stroke_color(color: Rgb) -> Operation {
    let [r, g, b] = color.unit();
    Operation::new("RG", vec![real(r), real(g), real(b)])
}

/// Encodes text for the standard fonts' WinAnsi encoding. Tabs become
/// spaces; characters outside the code page become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' => b' ',
            _ => win_ansi_code(c).unwrap_or(b'?'),
        })
        .collect()
}

/// PDF text string (document metadata) as UTF-16BE with a byte-order mark.
fn text_string(text: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
