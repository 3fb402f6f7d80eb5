//! PDF rendering with printpdf's built-in Helvetica fonts

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use super::model::Report;

// A4 landscape
const PAGE_W: f32 = 297.0;
const PAGE_H: f32 = 210.0;
const MARGIN: f32 = 15.0;
const ROW_H: f32 = 7.0;
const BODY_SIZE: f32 = 9.0;
/// Rough Helvetica advance at 9pt, in mm
const CHAR_W: f32 = 1.7;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

struct Writer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: Fonts,
    y: f32,
    pages: usize,
}

impl Writer {
    fn new(title: &str) -> Result<Self, printpdf::Error> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let fonts = Fonts {
            regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
            bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
        };
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            fonts,
            y: PAGE_H - MARGIN,
            pages: 1,
        })
    }

    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.fonts.bold } else { &self.fonts.regular };
        self.layer
            .use_text(winansi_safe(text), size, Mm(x), Mm(self.y), font);
    }

    fn advance(&mut self, by: f32) {
        self.y -= by;
        if self.y < MARGIN {
            self.pages += 1;
            let (page, layer) = self.doc.add_page(
                Mm(PAGE_W),
                Mm(PAGE_H),
                format!("Layer {}", self.pages),
            );
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_H - MARGIN;
        }
    }
}

/// Builtin PDF fonts only cover WinAnsi; anything outside ASCII becomes `?`.
fn winansi_safe(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

fn clip(text: &str, width_mm: f32) -> String {
    let max = ((width_mm / CHAR_W) as usize).max(3);
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut s: String = text.chars().take(max - 2).collect();
        s.push_str("..");
        s
    }
}

pub fn render(report: &Report) -> Result<Vec<u8>, printpdf::Error> {
    let mut w = Writer::new(&report.title)?;

    w.text(&report.title, 18.0, MARGIN, true);
    w.advance(8.0);
    if let Some(subtitle) = &report.subtitle {
        w.text(subtitle, 12.0, MARGIN, false);
        w.advance(7.0);
    }
    w.text(
        &format!(
            "Generated on: {}",
            report.generated_at.format("%Y-%m-%d %H:%M UTC")
        ),
        10.0,
        MARGIN,
        false,
    );
    w.advance(12.0);

    if report.is_empty() {
        w.text(&report.empty_message, 12.0, MARGIN, false);
        w.advance(12.0);
    } else {
        let col_w = (PAGE_W - 2.0 * MARGIN) / report.columns.len().max(1) as f32;

        for (i, header) in report.columns.iter().enumerate() {
            w.text(&clip(header, col_w), 10.0, MARGIN + i as f32 * col_w, true);
        }
        w.advance(ROW_H);

        for row in &report.rows {
            for (i, cell) in row.iter().enumerate() {
                w.text(
                    &clip(&cell.display(), col_w),
                    BODY_SIZE,
                    MARGIN + i as f32 * col_w,
                    false,
                );
            }
            w.advance(ROW_H);
        }
        w.advance(6.0);
    }

    w.text("Summary", 14.0, MARGIN, true);
    w.advance(8.0);
    for (label, value) in &report.summary {
        w.text(&format!("{}: {}", label, value), 11.0, MARGIN, false);
        w.advance(ROW_H);
    }

    w.doc.save_to_bytes()
}
