//! PDF certificate rendering.
//!
//! Callers decide eligibility (see [`crate::progress`]); this module only
//! turns the supplied fields into opaque document bytes.

use printpdf::{
    BuiltinFont, Color, Greyscale, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, Rgb,
    TextItem,
};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

/// Renders completion and achievement certificates on an A4 portrait page
/// with the platform palette.
#[derive(Debug, Clone, Default)]
pub struct CertificateRenderer;

impl CertificateRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Certificate for a completed course or assessment, with an optional
    /// score line.
    pub fn completion(
        &self,
        user_name: &str,
        course_title: &str,
        date_line: &str,
        score: Option<f64>,
    ) -> Vec<u8> {
        let mut body = vec![
            Block::body("This is to certify that"),
            Block::name(user_name),
            Block::body("has successfully completed the course"),
            Block::highlight(course_title),
        ];
        if let Some(score) = score {
            body.push(Block::body(&format!("with a score of {score:.1}%")));
        }
        body.push(Block::body(&format!("on {date_line}")));

        compose("CERTIFICATE OF COMPLETION", &body)
    }

    /// Certificate for a non-scored achievement such as a milestone or a
    /// learning streak.
    pub fn achievement(
        &self,
        user_name: &str,
        achievement_title: &str,
        details: &str,
        date_line: &str,
    ) -> Vec<u8> {
        let body = vec![
            Block::body("This certificate is awarded to"),
            Block::name(user_name),
            Block::body(&format!("for {achievement_title}")),
            Block::highlight(details),
            Block::body(&format!("Awarded on {date_line}")),
        ];

        compose("CERTIFICATE OF ACHIEVEMENT", &body)
    }
}

struct Block {
    text: String,
    font: BuiltinFont,
    size: f32,
    gap_mm: f32,
    color: ColorRole,
}

enum ColorRole {
    Accent,
    Highlight,
    Text,
}

impl Block {
    fn body(text: &str) -> Self {
        Self {
            text: text.to_string(),
            font: BuiltinFont::Helvetica,
            size: 12.0,
            gap_mm: 12.0,
            color: ColorRole::Text,
        }
    }

    fn name(text: &str) -> Self {
        Self {
            text: text.to_string(),
            font: BuiltinFont::HelveticaBold,
            size: 20.0,
            gap_mm: 16.0,
            color: ColorRole::Accent,
        }
    }

    fn highlight(text: &str) -> Self {
        Self {
            text: text.to_string(),
            font: BuiltinFont::HelveticaBold,
            size: 16.0,
            gap_mm: 14.0,
            color: ColorRole::Highlight,
        }
    }
}

fn compose(heading: &str, body: &[Block]) -> Vec<u8> {
    let mut document = PdfDocument::new(heading);
    let mut ops = Vec::new();

    let accent = Color::Rgb(Rgb {
        r: 0.18,
        g: 0.53,
        b: 0.67,
        icc_profile: None,
    });
    let highlight = Color::Rgb(Rgb {
        r: 0.64,
        g: 0.23,
        b: 0.45,
        icc_profile: None,
    });
    let text_color = Color::Greyscale(Greyscale::new(0.1, None));
    let muted = Color::Greyscale(Greyscale::new(0.5, None));

    let resolve = |role: &ColorRole| match role {
        ColorRole::Accent => accent.clone(),
        ColorRole::Highlight => highlight.clone(),
        ColorRole::Text => text_color.clone(),
    };

    let mut cursor = PAGE_HEIGHT_MM - 50.0;
    push_centered_text(
        &mut ops,
        cursor,
        BuiltinFont::HelveticaBold,
        24.0,
        heading,
        &accent,
    );
    cursor -= 22.0;

    for block in body {
        push_centered_text(
            &mut ops,
            cursor,
            block.font,
            block.size,
            &block.text,
            &resolve(&block.color),
        );
        cursor -= block.gap_mm;
    }

    // Signature rules near the footer, then the platform line.
    let rule = "_".repeat(30);
    push_text(&mut ops, 30.0, 50.0, BuiltinFont::Helvetica, 10.0, &rule, &text_color);
    push_text(&mut ops, 125.0, 50.0, BuiltinFont::Helvetica, 10.0, &rule, &text_color);
    push_text(
        &mut ops,
        34.0,
        43.0,
        BuiltinFont::HelveticaBold,
        10.0,
        "Platform Administrator",
        &text_color,
    );
    push_text(
        &mut ops,
        137.0,
        43.0,
        BuiltinFont::HelveticaBold,
        10.0,
        "Date of Issue",
        &text_color,
    );
    push_centered_text(
        &mut ops,
        28.0,
        BuiltinFont::Helvetica,
        10.0,
        "Personalized Learning Platform",
        &muted,
    );

    let page = PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), ops);
    let mut warnings = Vec::new();
    document
        .with_pages(vec![page])
        .save(&PdfSaveOptions::default(), &mut warnings)
}

fn push_centered_text(
    ops: &mut Vec<Op>,
    y_mm: f32,
    font: BuiltinFont,
    font_size: f32,
    text: &str,
    color: &Color,
) {
    // Builtin Helvetica has no metrics here; approximate the width to keep
    // lines visually centered.
    let approx_width_mm = text.chars().count() as f32 * font_size * 0.5 * 0.3528;
    let x_mm = ((PAGE_WIDTH_MM - approx_width_mm) / 2.0).max(15.0);
    push_text(ops, x_mm, y_mm, font, font_size, text, color);
}

fn push_text(
    ops: &mut Vec<Op>,
    x_mm: f32,
    y_mm: f32,
    font: BuiltinFont,
    font_size: f32,
    text: &str,
    color: &Color,
) {
    ops.extend([
        Op::StartTextSection,
        Op::SetTextCursor {
            pos: Point::new(Mm(x_mm), Mm(y_mm)),
        },
        Op::SetFontSizeBuiltinFont {
            size: Pt(font_size),
            font,
        },
        Op::SetLineHeight {
            lh: Pt(font_size * 1.25),
        },
        Op::SetFillColor { col: color.clone() },
        Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font,
        },
        Op::EndTextSection,
    ]);
}
