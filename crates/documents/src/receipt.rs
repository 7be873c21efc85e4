//! Fixed-width text documents: receipts and product labels

use crate::{slug, truncate, Document};
use niaga_core::model::{BusinessSettings, Product, Sale, Saver, SavingsEntry};
use niaga_core::time::{format_date_compact, format_date_short, format_datetime_short};
use std::fmt::Write;

/// Characters per receipt line
pub const RECEIPT_WIDTH: usize = 40;

const ITEM_NAME_WIDTH: usize = 20;

struct Receipt {
    out: String,
}

impl Receipt {
    fn new(settings: &BusinessSettings) -> Self {
        let mut receipt = Self {
            out: String::with_capacity(1024),
        };
        receipt.center(&settings.business_name);
        if !settings.address.is_empty() {
            receipt.center(&settings.address);
        }
        if !settings.phone.is_empty() {
            receipt.center(&format!("Telp: {}", settings.phone));
        }
        receipt
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn rule(&mut self) {
        self.line(&"-".repeat(RECEIPT_WIDTH));
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn center(&mut self, text: &str) {
        let len = text.chars().count();
        let pad = RECEIPT_WIDTH.saturating_sub(len) / 2;
        let _ = writeln!(self.out, "{}{}", " ".repeat(pad), text);
    }

    /// `left` flush left, `right` flush right
    fn pair(&mut self, left: &str, right: &str) {
        let used = left.chars().count() + right.chars().count();
        let gap = RECEIPT_WIDTH.saturating_sub(used).max(1);
        let _ = writeln!(self.out, "{}{}{}", left, " ".repeat(gap), right);
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Cashier receipt ("struk belanja")
///
/// `cashier_name` is printed as `N/A` when the sale has no cashier.
pub fn sale_receipt(
    settings: &BusinessSettings,
    sale: &Sale,
    cashier_name: Option<&str>,
) -> Document {
    let mut r = Receipt::new(settings);
    r.rule();
    r.center("STRUK BELANJA");
    r.rule();
    r.line(&format!("No. Transaksi: {}", sale.id));
    r.line(&format!("Tanggal: {}", format_datetime_short(sale.timestamp)));
    r.line(&format!("Kasir: {}", cashier_name.unwrap_or("N/A")));
    r.rule();
    for line in &sale.lines {
        let name = truncate(&line.name, ITEM_NAME_WIDTH);
        r.pair(&name, &line.subtotal.to_string());
        r.line(&format!("  {} x {}", line.quantity, line.selling_price));
    }
    r.rule();
    r.pair("Total:", &sale.total.to_string());
    r.pair("Bayar:", &sale.payment.to_string());
    r.pair("Kembali:", &sale.change.to_string());
    r.rule();
    r.blank();
    r.center("Terima kasih atas kunjungan Anda!");

    Document::text(
        format!(
            "struk_{}_{}.txt",
            sale.id,
            format_date_compact(sale.timestamp.date())
        ),
        r.finish(),
    )
}

/// Savings deposit or withdrawal receipt ("struk tabungan")
pub fn savings_receipt(settings: &BusinessSettings, saver: &Saver, entry: &SavingsEntry) -> Document {
    let mut r = Receipt::new(settings);
    r.rule();
    r.center("STRUK TABUNGAN");
    r.rule();
    r.line(&format!("No. Transaksi: {}", entry.id));
    r.line(&format!("Tanggal: {}", format_date_short(entry.date)));
    r.line(&format!("Waktu: {}", entry.created_at.format("%H:%M:%S")));
    r.line(&format!("Nama: {}", saver.name));
    r.line(&format!("Jenis: {}", entry.kind.label()));
    r.rule();
    r.pair("Jumlah:", &entry.amount.to_string());
    r.pair("Saldo Setelah:", &entry.balance_after.to_string());
    if !entry.description.is_empty() {
        r.line(&format!("Keterangan: {}", entry.description));
    }
    r.rule();
    r.blank();
    r.center("Terima kasih atas kepercayaan Anda!");
    if !settings.copyright_text.is_empty() {
        r.center(&settings.copyright_text);
    }

    Document::text(
        format!(
            "struk_tabungan_{}_{}.txt",
            entry.id,
            format_date_compact(entry.date)
        ),
        r.finish(),
    )
}

/// Shelf label carrying the product's barcode and QR payloads
pub fn product_label(product: &Product) -> Document {
    let mut out = String::with_capacity(256);
    let _ = writeln!(out, "{}", product.name);
    let _ = writeln!(out, "ID: {}", product.id);
    let _ = writeln!(out, "Harga: {}", product.selling_price);
    let _ = writeln!(out, "Barcode: {}", product.barcode);
    let _ = writeln!(out, "QR: {}", product.qr_code);
    Document::text(format!("label_{}.txt", slug(&product.id)), out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use niaga_core::model::{EntryKind, SaleLine};
    use niaga_core::Rupiah;

    fn at(h: u32, m: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 3)
            .unwrap()
            .and_hms_opt(h, m, 5)
            .unwrap()
    }

    fn sale() -> Sale {
        Sale {
            id: 12,
            timestamp: at(14, 30),
            lines: vec![SaleLine {
                item_id: 1,
                code: "KOPI".into(),
                name: "Kopi Susu Gula Aren Spesial".into(),
                purchase_price: Rupiah::new(3_000),
                selling_price: Rupiah::new(5_000),
                quantity: 3,
                subtotal: Rupiah::new(15_000),
            }],
            total: Rupiah::new(15_000),
            profit: Rupiah::new(6_000),
            payment: Rupiah::new(20_000),
            change: Rupiah::new(5_000),
            cashier_id: Some(1),
        }
    }

    #[test]
    fn test_sale_receipt() {
        let doc = sale_receipt(&BusinessSettings::default(), &sale(), Some("admin"));
        assert_eq!(doc.file_name, "struk_12_20250803.txt");
        assert_eq!(doc.content_type, crate::TEXT_PLAIN);

        let body = &doc.body;
        assert!(body.contains("STRUK BELANJA"));
        assert!(body.contains("No. Transaksi: 12"));
        assert!(body.contains("Tanggal: 03/08/2025 14:30"));
        assert!(body.contains("Kasir: admin"));
        assert!(body.contains("Kopi Susu Gula Aren "));
        assert!(!body.contains("Spesial"));
        assert!(body.contains("  3 x Rp 5.000"));
        assert!(body.contains("Kembali:"));
        assert!(body.contains("Rp 5.000\n"));
        assert!(body.contains("Terima kasih atas kunjungan Anda!"));
        for line in body.lines() {
            assert!(line.chars().count() <= RECEIPT_WIDTH, "too wide: {line:?}");
        }
    }

    #[test]
    fn test_sale_receipt_without_cashier() {
        let doc = sale_receipt(&BusinessSettings::default(), &sale(), None);
        assert!(doc.body.contains("Kasir: N/A"));
    }

    #[test]
    fn test_savings_receipt() {
        let saver = Saver {
            id: 4,
            name: "Siti".into(),
            phone: String::new(),
            address: String::new(),
            created_at: at(9, 0),
        };
        let entry = SavingsEntry {
            id: 9,
            saver_id: 4,
            date: NaiveDate::from_ymd_opt(2025, 8, 3).unwrap(),
            amount: Rupiah::new(25_000),
            kind: EntryKind::Withdrawal,
            description: "Beli buku".into(),
            balance_after: Rupiah::new(75_000),
            created_at: at(9, 15),
        };
        let settings = BusinessSettings::default();
        let doc = savings_receipt(&settings, &saver, &entry);

        assert_eq!(doc.file_name, "struk_tabungan_9_20250803.txt");
        assert!(doc.body.contains("STRUK TABUNGAN"));
        assert!(doc.body.contains("Waktu: 09:15:05"));
        assert!(doc.body.contains("Jenis: Penarikan"));
        assert!(doc.body.contains("Rp 75.000"));
        assert!(doc.body.contains("Keterangan: Beli buku"));
        assert!(doc.body.contains(&settings.copyright_text));
    }

    #[test]
    fn test_product_label() {
        let product = Product {
            id: "PRD001".into(),
            name: "Kaos Polos".into(),
            description: String::new(),
            barcode: "BCPRD0010803".into(),
            qr_code: "QRPRD001|Kaos Polos|20250803".into(),
            purchase_price: Rupiah::new(30_000),
            selling_price: Rupiah::new(45_000),
            initial_stock: 10,
            current_stock: 10,
            profit: Rupiah::ZERO,
            created_at: at(8, 0),
            updated_at: at(8, 0),
        };
        let doc = product_label(&product);
        assert_eq!(doc.file_name, "label_prd001.txt");
        assert!(doc.body.contains("Barcode: BCPRD0010803"));
        assert!(doc.body.contains("QR: QRPRD001|Kaos Polos|20250803"));
        assert!(doc.body.contains("Harga: Rp 45.000"));
    }
}
