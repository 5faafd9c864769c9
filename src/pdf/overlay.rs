//! A minimal vector canvas that renders into a standalone one-page PDF.
//!
//! Coordinates are PDF user space: origin at the bottom-left corner, units in
//! points. `rotate` turns the coordinate system the same way a `cm` operator
//! does, so positions passed to `draw_string` afterwards are in the rotated
//! frame.

use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};

/// Points per millimetre.
pub const MM: f32 = 72.0 / 25.4;

pub fn mm(value: f32) -> f32 {
    value * MM
}

/// Resource name the canvas font is registered under.
const FONT_NAME: &[u8] = b"F1";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width: 210.0 * MM,
        height: 297.0 * MM,
    };
}

pub struct Canvas {
    size: PageSize,
    font: &'static str,
    font_size: f32,
    operations: Vec<Operation>,
}

impl Canvas {
    pub fn new(size: PageSize) -> Self {
        Canvas {
            size,
            font: "Helvetica",
            font_size: 12.0,
            operations: vec![Operation::new("q", vec![])],
        }
    }

    pub fn with_font(mut self, base_font: &'static str, size: f32) -> Self {
        self.font = base_font;
        self.font_size = size;
        self
    }

    /// Rotate the coordinate system counter-clockwise by `degrees`.
    pub fn rotate(&mut self, degrees: f32) {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let (sin, cos) = (snap(sin), snap(cos));
        self.operations.push(Operation::new(
            "cm",
            vec![
                Object::Real(cos),
                Object::Real(sin),
                Object::Real(-sin),
                Object::Real(cos),
                Object::Integer(0),
                Object::Integer(0),
            ],
        ));
    }

    pub fn draw_string(&mut self, x: f32, y: f32, text: &str) {
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(FONT_NAME.to_vec()), Object::Real(self.font_size)],
            ),
            Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Close the drawing and wrap it in a single-page document.
    pub fn finish(mut self) -> Result<Document> {
        self.operations.push(Operation::new("Q", vec![]));
        let content = Content {
            operations: self.operations,
        }
        .encode()
        .context("Failed to encode overlay content")?;

        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(self.font.as_bytes().to_vec())),
            ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
        ]));
        let resources = Dictionary::from_iter(vec![(
            "Font",
            Object::Dictionary(Dictionary::from_iter(vec![(
                FONT_NAME.to_vec(),
                Object::Reference(font_id),
            )])),
        )]);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(self.size.width),
                    Object::Real(self.size.height),
                ]),
            ),
            ("Resources", Object::Dictionary(resources)),
            ("Contents", Object::Reference(content_id)),
        ]));

        doc.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Pages".to_vec())),
                ("Kids", Object::Array(vec![Object::Reference(page_id)])),
                ("Count", Object::Integer(1)),
            ])),
        );
        let catalog_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        Ok(doc)
    }
}

/// Right-angle rotations should produce exact matrix entries.
fn snap(value: f32) -> f32 {
    if value.abs() < 1e-6 {
        0.0
    } else if (value.abs() - 1.0).abs() < 1e-6 {
        value.signum()
    } else {
        value
    }
}
