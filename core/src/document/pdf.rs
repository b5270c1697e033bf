//! Minimal PDF writer
//!
//! Emits PDF 1.4 files made of numbered indirect objects, a cross-reference
//! table with exact byte offsets and a trailer. Only what a blank document
//! needs is supported: a catalog, a page tree and empty pages.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Page dimensions in PostScript points
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// US Letter, 612 × 792 pt
    #[default]
    Letter,
    /// ISO A4, 595 × 842 pt
    A4,
}

impl PageSize {
    /// (width, height) in points
    #[must_use]
    pub fn points(self) -> (u32, u32) {
        match self {
            Self::Letter => (612, 792),
            Self::A4 => (595, 842),
        }
    }

    /// Display name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Letter => "Letter",
            Self::A4 => "A4",
        }
    }
}

/// Builds a PDF object by object
#[derive(Debug)]
pub struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    /// Start a document (writes the header)
    #[must_use]
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(1024);
        buf.extend_from_slice(b"%PDF-1.4\n");
        // Binary marker so transfer tools treat the file as binary
        buf.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    /// Number the next object will receive
    #[must_use]
    pub fn next_object(&self) -> usize {
        self.offsets.len() + 1
    }

    /// Append an indirect object and return its number
    pub fn object(&mut self, body: &str) -> usize {
        let number = self.next_object();
        self.offsets.push(self.buf.len());
        self.buf
            .extend_from_slice(format!("{number} 0 obj\n{body}\nendobj\n").as_bytes());
        number
    }

    /// Write the xref table and trailer; `root` is the catalog object number
    #[must_use]
    pub fn finish(mut self, root: usize) -> Vec<u8> {
        let xref_start = self.buf.len();
        let count = self.offsets.len() + 1;

        let mut xref = String::new();
        let _ = write!(xref, "xref\n0 {count}\n0000000000 65535 f \n");
        for offset in &self.offsets {
            let _ = write!(xref, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            xref,
            "trailer\n<< /Size {count} /Root {root} 0 R >>\nstartxref\n{xref_start}\n%%EOF\n"
        );

        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}

/// A single blank page
#[must_use]
pub fn blank_document(size: PageSize) -> Vec<u8> {
    let (width, height) = size.points();
    let mut pdf = PdfWriter::new();

    // catalog = 1, pages = 2, page = 3
    let catalog = pdf.object("<< /Type /Catalog /Pages 2 0 R >>");
    pdf.object("<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
    pdf.object(&format!(
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {width} {height}] /Resources << >> >>"
    ));

    pdf.finish(catalog)
}
