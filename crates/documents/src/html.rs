//! Minimal HTML page builder
//!
//! Pages are assembled with `push_str`. Every piece of user text goes
//! through [`esc`]; only the builder's own markup is written raw.

use html_escape::encode_text;
use niaga_core::model::BusinessSettings;
use std::fmt::Write;

const STYLE: &str = "body{font-family:Helvetica,Arial,sans-serif;margin:32px;color:#222}\
h1{font-size:20px;margin:0}h2{font-size:16px;margin:24px 0 8px}\
p{margin:2px 0}table{border-collapse:collapse;width:100%;margin-top:8px}\
th{background:#808080;color:#f5f5f5;font-size:12px}\
td{background:#f5f5dc}th,td{border:1px solid #000;padding:4px 8px;text-align:center}\
.header{margin-bottom:16px}.title{font-size:18px;font-weight:bold;margin:16px 0 8px}\
.footer{margin-top:24px;font-size:12px}.right{text-align:right}";

/// Escape user text for element content
pub(crate) fn esc(s: &str) -> String {
    encode_text(s).into_owned()
}

pub(crate) struct Page {
    out: String,
}

impl Page {
    /// Open a page with the business header and a document title
    pub(crate) fn new(title: &str, settings: &BusinessSettings) -> Self {
        let mut out = String::with_capacity(4096);
        out.push_str("<!DOCTYPE html>\n<html lang=\"id\">\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(out, "<title>{}</title>", esc(title));
        let _ = writeln!(out, "<style>{}</style>", STYLE);
        out.push_str("</head>\n<body>\n<div class=\"header\">\n");
        let _ = writeln!(out, "<h1>{}</h1>", esc(&settings.business_name));
        if !settings.address.is_empty() {
            let _ = writeln!(out, "<p>{}</p>", esc(&settings.address));
        }
        if !settings.phone.is_empty() {
            let _ = writeln!(out, "<p>Telp: {}</p>", esc(&settings.phone));
        }
        out.push_str("</div>\n");
        let _ = writeln!(out, "<div class=\"title\">{}</div>", esc(title));
        Self { out }
    }

    /// `<p>label: value</p>`
    pub(crate) fn field(&mut self, label: &str, value: &str) {
        let _ = writeln!(self.out, "<p>{}: {}</p>", esc(label), esc(value));
    }

    pub(crate) fn heading(&mut self, text: &str) {
        let _ = writeln!(self.out, "<h2>{}</h2>", esc(text));
    }

    /// A table with a header row; every cell is escaped
    pub(crate) fn table<R>(&mut self, headers: &[&str], rows: R)
    where
        R: IntoIterator<Item = Vec<String>>,
    {
        self.out.push_str("<table>\n<tr>");
        for h in headers {
            let _ = write!(self.out, "<th>{}</th>", esc(h));
        }
        self.out.push_str("</tr>\n");
        for row in rows {
            self.out.push_str("<tr>");
            for cell in row {
                let _ = write!(self.out, "<td>{}</td>", esc(&cell));
            }
            self.out.push_str("</tr>\n");
        }
        self.out.push_str("</table>\n");
    }

    /// Footer lines, then close the page
    pub(crate) fn finish(mut self, footer: &[&str]) -> String {
        self.out.push_str("<div class=\"footer\">\n");
        for line in footer.iter().filter(|l| !l.is_empty()) {
            let _ = writeln!(self.out, "<p>{}</p>", esc(line));
        }
        self.out.push_str("</div>\n</body>\n</html>\n");
        self.out
    }
}
