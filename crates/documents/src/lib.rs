//! Printable documents for niaga
//!
//! Every document is rendered to a [`Document`]: a body plus the file name
//! and content type it should be saved or served with. Receipts and labels
//! are fixed-width plain text for thermal printers; statements, invoices,
//! price lists and reports are standalone HTML pages.
//!
//! Money is always printed through `Rupiah`'s display (`Rp 1.234.567`) and
//! dates through the Indonesian formats in `niaga_core::time`.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod html;
mod receipt;
mod sheet;

pub use receipt::{product_label, sale_receipt, savings_receipt, RECEIPT_WIDTH};
pub use sheet::{business_report, invoice, price_list, savings_statement};

use serde::{Deserialize, Serialize};

/// Content type of plain text documents
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
/// Content type of HTML documents
pub const TEXT_HTML: &str = "text/html; charset=utf-8";

/// A rendered document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Suggested file name, e.g. `struk_12_20250803.txt`
    pub file_name: String,
    /// MIME type with charset
    pub content_type: String,
    /// Rendered body
    pub body: String,
}

impl Document {
    pub(crate) fn text(file_name: String, body: String) -> Self {
        Self {
            file_name,
            content_type: TEXT_PLAIN.to_string(),
            body,
        }
    }

    pub(crate) fn html(file_name: String, body: String) -> Self {
        Self {
            file_name,
            content_type: TEXT_HTML.to_string(),
            body,
        }
    }

    /// Whether the body is HTML
    pub fn is_html(&self) -> bool {
        self.content_type == TEXT_HTML
    }
}

/// First `max` characters of `s`
pub(crate) fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Lowercase file name fragment: runs of anything but ASCII letters and
/// digits become one `_`
pub(crate) fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut gap = false;
    for c in s.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if gap && !out.is_empty() {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            gap = false;
        } else {
            gap = true;
        }
    }
    if out.is_empty() {
        out.push_str("dokumen");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("Kopi Susu Gula Aren Spesial", 20), "Kopi Susu Gula Aren ");
        assert_eq!(truncate("Teh", 20), "Teh");
        assert_eq!(truncate("Ñasi Goreng", 4), "Ñasi");
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Siti Aminah"), "siti_aminah");
        assert_eq!(slug("  Budi / Toko #2 "), "budi_toko_2");
        assert_eq!(slug("***"), "dokumen");
    }

    #[test]
    fn test_document_serializes() {
        let doc = Document::text("a.txt".into(), "x".into());
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["content_type"], TEXT_PLAIN);
        assert!(!doc.is_html());
    }
}
