//! HTML documents: statements, invoices, price lists and reports

use crate::html::Page;
use crate::{slug, truncate, Document};
use chrono::NaiveDateTime;
use niaga_core::model::{
    BusinessSettings, EntryKind, Invoice, InvoiceStatus, PeriodReport, PriceListRow, Statement,
};
use niaga_core::time::{format_date_compact, format_date_indonesian, format_date_short, format_datetime_short};

const DESCRIPTION_WIDTH: usize = 30;

/// Account statement ("rekening koran"), entries newest first
pub fn savings_statement(
    settings: &BusinessSettings,
    statement: &Statement,
    printed_at: NaiveDateTime,
) -> Document {
    let saver = &statement.saver;
    let mut page = Page::new("REKENING KORAN TABUNGAN", settings);
    page.field("Nama", &saver.name);
    if !saver.phone.is_empty() {
        page.field("Telepon", &saver.phone);
    }
    if !saver.address.is_empty() {
        page.field("Alamat", &saver.address);
    }
    page.field("Saldo Saat Ini", &statement.balance.to_string());
    page.table(
        &["Tanggal", "Jenis", "Jumlah", "Keterangan", "Saldo"],
        statement.entries.iter().map(|e| {
            vec![
                format_date_short(e.date),
                match e.kind {
                    EntryKind::Deposit => "Setor".to_string(),
                    EntryKind::Withdrawal => "Tarik".to_string(),
                },
                e.amount.to_string(),
                truncate(&e.description, DESCRIPTION_WIDTH),
                e.balance_after.to_string(),
            ]
        }),
    );
    let printed = format!("Dicetak pada: {}", format_datetime_short(printed_at));
    let body = page.finish(&[printed.as_str(), settings.copyright_text.as_str()]);

    Document::html(
        format!(
            "rekening_koran_{}_{}.html",
            slug(&saver.name),
            format_date_compact(printed_at.date())
        ),
        body,
    )
}

fn invoice_status_label(status: InvoiceStatus) -> &'static str {
    match status {
        InvoiceStatus::Draft => "Draft",
        InvoiceStatus::Sent => "Terkirim",
        InvoiceStatus::Paid => "Lunas",
        InvoiceStatus::Overdue => "Jatuh Tempo",
    }
}

/// Trim trailing zeros from a quantity: `1.5`, `2`
fn format_quantity(quantity: f64) -> String {
    let s = format!("{:.2}", quantity);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn format_percent(percent: f64) -> String {
    format!("{}%", format_quantity(percent))
}

/// Service invoice ("nota")
pub fn invoice(settings: &BusinessSettings, invoice: &Invoice) -> Document {
    let mut page = Page::new("NOTA SERVIS", settings);
    page.field("No. Invoice", &invoice.number);
    page.field("Status", invoice_status_label(invoice.status));
    page.field("Tanggal Servis", &format_date_indonesian(invoice.service_date));
    page.field("Tanggal Terbit", &format_date_indonesian(invoice.issue_date));
    page.field("Jatuh Tempo", &format_date_indonesian(invoice.due_date));

    page.heading("Kepada");
    page.field("Nama", &invoice.client_name);
    for (label, value) in [
        ("Email", &invoice.client_email),
        ("Telepon", &invoice.client_phone),
        ("Alamat", &invoice.client_address),
    ] {
        if !value.is_empty() {
            page.field(label, value);
        }
    }

    page.table(
        &["Deskripsi", "Qty", "Tarif", "Jumlah"],
        invoice.items.iter().map(|line| {
            vec![
                line.description.clone(),
                format_quantity(line.quantity),
                line.rate.to_string(),
                line.amount.to_string(),
            ]
        }),
    );

    page.table(
        &["Rincian", "Nilai"],
        vec![
            vec!["Subtotal".to_string(), invoice.subtotal.to_string()],
            vec![
                format!("Diskon ({})", format_percent(invoice.discount_percent)),
                (-invoice.discount_amount).to_string(),
            ],
            vec![
                format!("Pajak ({})", format_percent(invoice.tax_rate)),
                invoice.tax_amount.to_string(),
            ],
            vec!["Total".to_string(), invoice.total.to_string()],
        ],
    );
    if !invoice.notes.is_empty() {
        page.field("Catatan", &invoice.notes);
    }
    let body = page.finish(&[settings.copyright_text.as_str()]);

    Document::html(format!("{}.html", slug(&invoice.number)), body)
}

/// Period report ("laporan bisnis")
pub fn business_report(
    settings: &BusinessSettings,
    report: &PeriodReport,
    printed_at: NaiveDateTime,
) -> Document {
    let mut page = Page::new("LAPORAN BISNIS", settings);
    page.field(
        "Periode",
        &format!(
            "{} - {}",
            format_date_indonesian(report.start),
            format_date_indonesian(report.end)
        ),
    );
    page.table(
        &["Metrik", "Nilai"],
        vec![
            vec!["Total Penjualan".to_string(), report.revenue.to_string()],
            vec!["Total Keuntungan".to_string(), report.profit.to_string()],
            vec!["Total Kerugian".to_string(), report.loss.to_string()],
            vec!["Jumlah Transaksi".to_string(), report.transactions.to_string()],
        ],
    );

    page.heading("ITEM TERLARIS");
    page.table(
        &["Item", "Terjual", "Pendapatan"],
        report.best_sellers.iter().map(|b| {
            vec![
                truncate(&b.name, DESCRIPTION_WIDTH),
                b.quantity.to_string(),
                b.revenue.to_string(),
            ]
        }),
    );

    page.heading("STOK RENDAH");
    page.table(
        &["Item", "Stok Saat Ini", "Minimum Stok"],
        report.low_stock.iter().map(|v| {
            vec![
                truncate(&v.product_name, DESCRIPTION_WIDTH),
                v.item.current_stock.to_string(),
                v.item.minimum_stock.to_string(),
            ]
        }),
    );
    let printed = format!("Dicetak pada: {}", format_datetime_short(printed_at));
    let body = page.finish(&[printed.as_str(), settings.copyright_text.as_str()]);

    Document::html(
        format!(
            "laporan_{}_{}.html",
            format_date_compact(report.start),
            format_date_compact(report.end)
        ),
        body,
    )
}

/// Product price list with cost totals
pub fn price_list(settings: &BusinessSettings, rows: &[PriceListRow]) -> Document {
    let mut page = Page::new("DAFTAR HARGA", settings);
    page.table(
        &["ID", "Nama", "Harga Beli", "Harga Jual", "Stok", "Total Biaya"],
        rows.iter().map(|r| {
            vec![
                r.id.clone(),
                r.name.clone(),
                r.purchase_price.to_string(),
                r.selling_price.to_string(),
                r.current_stock.to_string(),
                r.cost_total.to_string(),
            ]
        }),
    );
    let body = page.finish(&[settings.copyright_text.as_str()]);
    Document::html("daftar_harga.html".to_string(), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use niaga_core::model::{
        BestSeller, InventoryItem, InvoiceLine, ItemView, Saver, SavingsEntry, StockStatus,
    };
    use niaga_core::Rupiah;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn printed() -> NaiveDateTime {
        date(8, 10).and_hms_opt(16, 45, 0).unwrap()
    }

    fn entry(id: u64, kind: EntryKind, amount: i64, after: i64, description: &str) -> SavingsEntry {
        SavingsEntry {
            id,
            saver_id: 1,
            date: date(8, id as u32),
            amount: Rupiah::new(amount),
            kind,
            description: description.into(),
            balance_after: Rupiah::new(after),
            created_at: printed(),
        }
    }

    #[test]
    fn test_savings_statement() {
        let statement = Statement {
            saver: Saver {
                id: 1,
                name: "Siti <Aminah>".into(),
                phone: "0812".into(),
                address: String::new(),
                created_at: printed(),
            },
            balance: Rupiah::new(70_000),
            entries: vec![
                entry(
                    2,
                    EntryKind::Withdrawal,
                    30_000,
                    70_000,
                    "Bayar uang sekolah semester ganjil",
                ),
                entry(1, EntryKind::Deposit, 100_000, 100_000, "Setoran tabungan"),
            ],
        };
        let doc = savings_statement(&BusinessSettings::default(), &statement, printed());

        assert_eq!(doc.file_name, "rekening_koran_siti_aminah_20250810.html");
        assert!(doc.is_html());
        let body = &doc.body;
        assert!(body.contains("REKENING KORAN TABUNGAN"));
        assert!(body.contains("Nama: Siti &lt;Aminah&gt;"));
        assert!(body.contains("Telepon: 0812"));
        assert!(!body.contains("Alamat:"));
        assert!(body.contains("Saldo Saat Ini: Rp 70.000"));
        assert!(body.contains("<th>Keterangan</th>"));
        assert!(body.contains("<td>Bayar uang sekolah semester ga</td>"));
        assert!(body.contains("<td>Tarik</td>"));
        assert!(body.contains("<td>02/08/2025</td>"));
        assert!(body.contains("Dicetak pada: 10/08/2025 16:45"));
        // newest entry stays first
        assert!(body.find("<td>Tarik</td>") < body.find("<td>Setor</td>"));
    }

    #[test]
    fn test_invoice() {
        let invoice = Invoice {
            id: 3,
            number: "INV-00003".into(),
            client_name: "PT Maju & Jaya".into(),
            client_email: String::new(),
            client_phone: "021555".into(),
            client_address: String::new(),
            service_date: date(8, 1),
            issue_date: date(8, 3),
            due_date: date(8, 17),
            status: InvoiceStatus::Sent,
            notes: "Garansi 30 hari".into(),
            items: vec![InvoiceLine {
                description: "Servis AC".into(),
                quantity: 1.5,
                rate: Rupiah::new(100_000),
                amount: Rupiah::new(150_000),
            }],
            subtotal: Rupiah::new(150_000),
            discount_percent: 10.0,
            discount_amount: Rupiah::new(15_000),
            tax_rate: 11.0,
            tax_amount: Rupiah::new(14_850),
            total: Rupiah::new(149_850),
            created_at: printed(),
            updated_at: printed(),
        };
        let doc = invoice_doc(&invoice);

        assert_eq!(doc.file_name, "inv_00003.html");
        let body = &doc.body;
        assert!(body.contains("No. Invoice: INV-00003"));
        assert!(body.contains("Status: Terkirim"));
        assert!(body.contains("Jatuh Tempo: 17 Agustus 2025"));
        assert!(body.contains("Nama: PT Maju &amp; Jaya"));
        assert!(!body.contains("Email:"));
        assert!(body.contains("<td>1.5</td>"));
        assert!(body.contains("<td>Diskon (10%)</td><td>Rp -15.000</td>"));
        assert!(body.contains("<td>Pajak (11%)</td><td>Rp 14.850</td>"));
        assert!(body.contains("<td>Total</td><td>Rp 149.850</td>"));
        assert!(body.contains("Catatan: Garansi 30 hari"));
    }

    fn invoice_doc(i: &Invoice) -> Document {
        invoice(&BusinessSettings::default(), i)
    }

    #[test]
    fn test_business_report() {
        let report = PeriodReport {
            start: date(8, 1),
            end: date(8, 31),
            revenue: Rupiah::new(500_000),
            profit: Rupiah::new(120_000),
            loss: Rupiah::new(5_000),
            transactions: 14,
            best_sellers: vec![BestSeller {
                name: "Roti".into(),
                quantity: 40,
                revenue: Rupiah::new(240_000),
            }],
            low_stock: vec![ItemView {
                item: InventoryItem {
                    id: 1,
                    product_id: "PRD001".into(),
                    code: "SUSU".into(),
                    purchase_price: Rupiah::new(8_000),
                    selling_price: Rupiah::new(9_000),
                    initial_stock: 20,
                    current_stock: 2,
                    minimum_stock: 5,
                    created_at: printed(),
                },
                product_name: "Susu UHT".into(),
                status: StockStatus::Low,
            }],
        };
        let doc = business_report(&BusinessSettings::default(), &report, printed());

        assert_eq!(doc.file_name, "laporan_20250801_20250831.html");
        let body = &doc.body;
        assert!(body.contains("LAPORAN BISNIS"));
        assert!(body.contains("Periode: 1 Agustus 2025 - 31 Agustus 2025"));
        assert!(body.contains("<td>Total Kerugian</td><td>Rp 5.000</td>"));
        assert!(body.contains("<td>Jumlah Transaksi</td><td>14</td>"));
        assert!(body.contains("<td>Roti</td><td>40</td><td>Rp 240.000</td>"));
        assert!(body.contains("<td>Susu UHT</td><td>2</td><td>5</td>"));
    }

    #[test]
    fn test_price_list() {
        let rows = vec![PriceListRow {
            id: "PRD001".into(),
            name: "Kaos <Polos>".into(),
            purchase_price: Rupiah::new(30_000),
            selling_price: Rupiah::new(45_000),
            current_stock: 8,
            cost_total: Rupiah::new(12_500),
        }];
        let doc = price_list(&BusinessSettings::default(), &rows);
        assert_eq!(doc.file_name, "daftar_harga.html");
        assert!(doc.body.contains("<td>Kaos &lt;Polos&gt;</td>"));
        assert!(doc.body.contains("<td>Rp 12.500</td>"));
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(1.5), "1.5");
        assert_eq!(format_quantity(2.0), "2");
        assert_eq!(format_quantity(0.25), "0.25");
        assert_eq!(format_percent(11.0), "11%");
    }
}
