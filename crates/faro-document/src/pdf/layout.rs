// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page layout model for the certificate.
//
// The renderer first places everything in page coordinates (millimetres,
// origin at the top-left, text anchored at its baseline) and only then
// converts the layout into `printpdf` operations. Keeping the two steps apart
// lets tests inspect what ends up on the page without parsing PDF streams.

use printpdf::{
    BuiltinFont, Color, Line, LinePoint, Mm, Op, Point, Pt, Rgb, TextItem, XObjectId,
    XObjectTransform,
};

/// Millimetres per PostScript point.
const MM_PER_PT: f32 = 0.3528;

/// The three base-14 faces the certificate uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Helvetica,
    HelveticaBold,
    TimesBold,
}

impl Face {
    fn builtin(self) -> BuiltinFont {
        match self {
            Self::Helvetica => BuiltinFont::Helvetica,
            Self::HelveticaBold => BuiltinFont::HelveticaBold,
            Self::TimesBold => BuiltinFont::TimesBold,
        }
    }

    /// Average glyph advance as a fraction of the font size.
    fn average_advance(self) -> f32 {
        match self {
            Self::Helvetica => 0.50,
            Self::HelveticaBold => 0.56,
            Self::TimesBold => 0.50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8(pub u8, pub u8, pub u8);

impl Rgb8 {
    fn to_color(self) -> Color {
        Color::Rgb(Rgb {
            r: f32::from(self.0) / 255.0,
            g: f32::from(self.1) / 255.0,
            b: f32::from(self.2) / 255.0,
            icc_profile: None,
        })
    }
}

/// One line of text on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub face: Face,
    pub size_pt: f32,
    pub color: Rgb8,
    /// Anchor x: left edge for [`Align::Left`], centre for [`Align::Center`].
    pub x_mm: f32,
    /// Baseline, measured from the top of the page.
    pub y_mm: f32,
    pub align: Align,
}

impl TextRun {
    /// Estimated rendered width. Base-14 metrics are not embedded, so this
    /// uses an average advance per face.
    pub fn width_mm(&self) -> f32 {
        self.text.chars().count() as f32 * self.face.average_advance() * self.size_pt * MM_PER_PT
    }

    fn left_mm(&self) -> f32 {
        match self.align {
            Align::Left => self.x_mm,
            Align::Center => self.x_mm - self.width_mm() / 2.0,
        }
    }
}

/// Stroked vector decoration.
#[derive(Debug, Clone, PartialEq)]
pub enum Stroke {
    /// Rectangle outline, top-left corner plus size.
    Rect {
        x_mm: f32,
        y_mm: f32,
        w_mm: f32,
        h_mm: f32,
        width_mm: f32,
        color: Rgb8,
    },
    /// Horizontal rule.
    Rule {
        x1_mm: f32,
        x2_mm: f32,
        y_mm: f32,
        width_mm: f32,
        color: Rgb8,
    },
}

/// Where the QR bitmap goes: top-left corner and edge length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QrPlacement {
    pub x_mm: f32,
    pub y_mm: f32,
    pub size_mm: f32,
}

/// Everything drawn on the certificate page.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateLayout {
    pub page_w_mm: f32,
    pub page_h_mm: f32,
    pub strokes: Vec<Stroke>,
    pub texts: Vec<TextRun>,
    pub qr: Option<QrPlacement>,
}

impl CertificateLayout {
    pub fn new(page_w_mm: f32, page_h_mm: f32) -> Self {
        Self {
            page_w_mm,
            page_h_mm,
            strokes: Vec::new(),
            texts: Vec::new(),
            qr: None,
        }
    }

    pub fn is_landscape(&self) -> bool {
        self.page_w_mm > self.page_h_mm
    }

    /// All text lines in drawing order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.texts.iter().map(|t| t.text.as_str())
    }

    /// Whether some text line contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.lines().any(|line| line.contains(needle))
    }

    /// The run whose text is exactly `text`.
    pub fn find(&self, text: &str) -> Option<&TextRun> {
        self.texts.iter().find(|t| t.text == text)
    }

    pub(crate) fn push_text(
        &mut self,
        text: impl Into<String>,
        face: Face,
        size_pt: f32,
        color: Rgb8,
        (x_mm, y_mm): (f32, f32),
        align: Align,
    ) {
        self.texts.push(TextRun {
            text: pdf_safe(&text.into()),
            face,
            size_pt,
            color,
            x_mm,
            y_mm,
            align,
        });
    }

    // -- printpdf conversion --------------------------------------------------

    fn point(&self, x_mm: f32, y_mm: f32) -> Point {
        Point {
            x: Mm(x_mm).into_pt(),
            y: Mm(self.page_h_mm - y_mm).into_pt(),
        }
    }

    /// Convert the layout into page operations. `qr_image` is the XObject of
    /// the QR bitmap (with its pixel width) when one was embedded.
    pub(crate) fn to_ops(&self, qr_image: Option<(XObjectId, u32)>) -> Vec<Op> {
        let mut ops = Vec::new();

        for stroke in &self.strokes {
            match *stroke {
                Stroke::Rect {
                    x_mm,
                    y_mm,
                    w_mm,
                    h_mm,
                    width_mm,
                    color,
                } => {
                    ops.push(Op::SetOutlineColor { col: color.to_color() });
                    ops.push(Op::SetOutlineThickness { pt: Mm(width_mm).into_pt() });
                    ops.push(Op::DrawLine {
                        line: Line {
                            points: vec![
                                self.corner(x_mm, y_mm),
                                self.corner(x_mm + w_mm, y_mm),
                                self.corner(x_mm + w_mm, y_mm + h_mm),
                                self.corner(x_mm, y_mm + h_mm),
                            ],
                            is_closed: true,
                        },
                    });
                }
                Stroke::Rule {
                    x1_mm,
                    x2_mm,
                    y_mm,
                    width_mm,
                    color,
                } => {
                    ops.push(Op::SetOutlineColor { col: color.to_color() });
                    ops.push(Op::SetOutlineThickness { pt: Mm(width_mm).into_pt() });
                    ops.push(Op::DrawLine {
                        line: Line {
                            points: vec![self.corner(x1_mm, y_mm), self.corner(x2_mm, y_mm)],
                            is_closed: false,
                        },
                    });
                }
            }
        }

        for run in &self.texts {
            if run.text.is_empty() {
                continue;
            }
            ops.push(Op::SetFillColor { col: run.color.to_color() });
            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: self.point(run.left_mm(), run.y_mm),
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(run.size_pt),
                font: run.face.builtin(),
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(run.text.clone())],
                font: run.face.builtin(),
            });
            ops.push(Op::EndTextSection);
        }

        if let (Some(placement), Some((id, width_px))) = (self.qr, qr_image) {
            // Pick the DPI that makes the bitmap exactly `size_mm` wide.
            let dpi = width_px as f32 * 25.4 / placement.size_mm;
            let origin = self.point(placement.x_mm, placement.y_mm + placement.size_mm);
            ops.push(Op::UseXobject {
                id,
                transform: XObjectTransform {
                    translate_x: Some(origin.x),
                    translate_y: Some(origin.y),
                    scale_x: None,
                    scale_y: None,
                    dpi: Some(dpi),
                    rotate: None,
                },
            });
        }

        ops
    }

    fn corner(&self, x_mm: f32, y_mm: f32) -> LinePoint {
        LinePoint {
            p: self.point(x_mm, y_mm),
            bezier: false,
        }
    }
}

/// Reduce `text` to what the built-in fonts show reliably.
///
/// printpdf writes built-in font strings as raw UTF-8, so only printable
/// ASCII survives intact. Latin-1 letters are folded to their base letter
/// (`é` -> `e`, `ß` -> `ss`); anything else becomes `?`.
fn pdf_safe(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' '..='~' => out.push(c),
            '\t' | '\n' | '\r' | '\u{a0}' => out.push(' '),
            _ => out.push_str(fold_latin1(c).unwrap_or("?")),
        }
    }
    out
}

/// ASCII spelling of a Latin-1 letter.
fn fold_latin1(c: char) -> Option<&'static str> {
    let folded = match c {
        'À'..='Å' => "A",
        'Æ' => "AE",
        'Ç' => "C",
        'È'..='Ë' => "E",
        'Ì'..='Ï' => "I",
        'Ð' => "D",
        'Ñ' => "N",
        'Ò'..='Ö' | 'Ø' => "O",
        'Ù'..='Ü' => "U",
        'Ý' => "Y",
        'Þ' => "Th",
        'ß' => "ss",
        'à'..='å' => "a",
        'æ' => "ae",
        'ç' => "c",
        'è'..='ë' => "e",
        'ì'..='ï' => "i",
        'ð' => "d",
        'ñ' => "n",
        'ò'..='ö' | 'ø' => "o",
        'ù'..='ü' => "u",
        'ý' | 'ÿ' => "y",
        'þ' => "th",
        _ => return None,
    };
    Some(folded)
}
