//! Single-quote PDF rendering.
//!
//! Emits an uncompressed one-page PDF 1.4 document using the standard
//! Helvetica fonts, so no font data is embedded and the text stays
//! searchable in the raw bytes.

use crate::quote::Quote;

pub const PDF_TITLE: &str = "Roofing Project Quote";

pub const PDF_DISCLAIMER: &str = "This quote is an estimate based on the information provided and is subject to change after an on-site inspection.";

const PAGE_WIDTH: u32 = 612;
const PAGE_HEIGHT: u32 = 792;
const MARGIN_LEFT: u32 = 72;
const VALUE_COLUMN: u32 = 220;
const FIRST_ROW_Y: u32 = 660;
const ROW_SPACING: u32 = 28;
const FOOTER_Y: u32 = 60;

/// Labelled rows in their fixed visual order.
fn quote_rows(quote: &Quote) -> Vec<(&'static str, String)> {
    vec![
        ("Quote ID", quote.id.to_string()),
        ("Contractor", quote.contractor_name.clone()),
        ("Company", quote.company.clone()),
        ("Roof Size", format!("{} sq ft", quote.roof_size)),
        ("Roof Type", quote.roof_type.as_str().to_string()),
        ("Location", quote.location()),
        ("Project Date", quote.project_date.format("%Y-%m-%d").to_string()),
        ("Submitted", quote.created_at.format("%Y-%m-%d").to_string()),
    ]
}

/// Escape a string for a PDF literal. Anything outside printable ASCII
/// becomes `?` since the standard fonts are used without an encoding map.
fn pdf_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

fn text_op(font: &str, size: u32, x: u32, y: u32, text: &str) -> String {
    format!("BT /{font} {size} Tf {x} {y} Td ({}) Tj ET\n", pdf_text(text))
}

fn content_stream(quote: &Quote) -> String {
    let mut ops = String::new();
    ops.push_str(&text_op("F2", 20, MARGIN_LEFT, 720, PDF_TITLE));

    let mut y = FIRST_ROW_Y;
    for (label, value) in quote_rows(quote) {
        ops.push_str(&text_op("F2", 12, MARGIN_LEFT, y, label));
        ops.push_str(&text_op("F1", 12, VALUE_COLUMN, y, &value));
        y -= ROW_SPACING;
    }

    ops.push_str(&format!(
        "{MARGIN_LEFT} {} m {} {} l S\n",
        FOOTER_Y + 16,
        PAGE_WIDTH - MARGIN_LEFT,
        FOOTER_Y + 16
    ));
    ops.push_str(&text_op("F1", 8, MARGIN_LEFT, FOOTER_Y, PDF_DISCLAIMER));
    ops
}

/// Minimal object writer that tracks byte offsets for the xref table.
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    /// Append the next object; objects are numbered from 1 in call order.
    fn object(&mut self, body: &str) {
        self.offsets.push(self.buf.len());
        let number = self.offsets.len();
        self.buf
            .extend_from_slice(format!("{number} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    fn finish(mut self, root: usize) -> Vec<u8> {
        let xref_offset = self.buf.len();
        let size = self.offsets.len() + 1;

        let mut xref = format!("xref\n0 {size}\n0000000000 65535 f \n");
        for offset in &self.offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {size} /Root {root} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        ));

        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}

/// Render one quote as a complete PDF document.
pub fn render_quote_pdf(quote: &Quote) -> Vec<u8> {
    let content = content_stream(quote);

    let mut pdf = PdfWriter::new();
    pdf.object("<< /Type /Catalog /Pages 2 0 R >>");
    pdf.object("<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
    pdf.object(&format!(
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
         /Resources << /Font << /F1 4 0 R /F2 5 0 R >> >> /Contents 6 0 R >>"
    ));
    pdf.object("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>");
    pdf.object("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>");
    pdf.object(&format!(
        "<< /Length {} >>\nstream\n{content}endstream",
        content.len()
    ));
    pdf.finish(1)
}
