//! Service invoices and customer debts

use crate::test_utils::*;
use niaga::{DebtStatus, InvoiceStatus, NewDebt, NewInvoice, NewInvoiceLine};

fn servis(client: &str, phone: &str) -> NewInvoice {
    NewInvoice {
        client_name: client.into(),
        client_email: String::new(),
        client_phone: phone.into(),
        client_address: "Jl. Melati 4".into(),
        service_date: day(2025, 8, 1),
        issue_date: day(2025, 8, 1),
        due_date: day(2025, 8, 10),
        notes: String::new(),
        items: vec![
            NewInvoiceLine {
                description: "Servis mesin cuci".into(),
                quantity: 1.0,
                rate: rp(120_000),
            },
            NewInvoiceLine {
                description: "Ganti seal".into(),
                quantity: 2.5,
                rate: rp(10_000),
            },
        ],
        discount_percent: 0.0,
        tax_rate: 0.0,
    }
}

fn bon(customer: &str, amount: i64, due: Option<chrono::NaiveDate>) -> NewDebt {
    NewDebt {
        customer_name: customer.into(),
        phone: String::new(),
        email: String::new(),
        address: String::new(),
        invoice_number: None,
        description: "Belanja bulanan".into(),
        amount: rp(amount),
        due_date: due,
    }
}

#[test]
fn invoice_lifecycle_with_overdue_sweep() {
    let clock = clock(at(2025, 8, 3, 9));
    let niaga = shop_at(clock.clone());

    let a = niaga.invoices().create(servis("Pak Joko", "0812-555")).unwrap();
    let b = niaga.invoices().create(servis("Bu Ratna", "0857-777")).unwrap();
    assert_eq!(a.number, "INV-00001");
    assert_eq!(b.number, "INV-00002");
    assert_eq!(a.subtotal, rp(145_000));
    assert_eq!(a.total, rp(145_000));

    niaga.invoices().set_status(a.id, InvoiceStatus::Sent).unwrap();
    niaga.invoices().set_status(b.id, InvoiceStatus::Paid).unwrap();

    // due date not yet passed
    assert_eq!(niaga.invoices().refresh_overdue().unwrap(), 0);

    clock.set(at(2025, 8, 11, 8));
    assert_eq!(niaga.invoices().refresh_overdue().unwrap(), 1);
    assert_eq!(
        niaga.invoices().get(a.id).unwrap().status,
        InvoiceStatus::Overdue
    );
    assert_eq!(
        niaga.invoices().get(b.id).unwrap().status,
        InvoiceStatus::Paid
    );

    let paid = niaga.invoices().set_status(a.id, InvoiceStatus::Paid).unwrap();
    assert_eq!(paid.status, InvoiceStatus::Paid);
    let err = niaga
        .invoices()
        .set_status(a.id, InvoiceStatus::Sent)
        .unwrap_err();
    assert_eq!(err.code(), "invalid_transition");

    assert_eq!(niaga.invoices().search("ratna").unwrap().len(), 1);
    assert_eq!(niaga.invoices().search("0812").unwrap()[0].id, a.id);

    let doc = niaga.documents().invoice(a.id).unwrap();
    assert!(doc.is_html());
    assert!(doc.body.contains("INV-00001"));
    assert!(doc.body.contains("Servis mesin cuci"));
}

#[test]
fn debts_are_paid_down_and_swept() {
    let clock = clock(at(2025, 8, 3, 9));
    let niaga = shop_at(clock.clone());

    let warung = niaga
        .debts()
        .add(bon("Warung Bu Sri", 300_000, Some(day(2025, 8, 20))))
        .unwrap();
    niaga.debts().add(bon("Warung Bu Sri", 50_000, None)).unwrap();
    niaga.debts().add(bon("Pak Dedi", 80_000, Some(day(2025, 8, 5)))).unwrap();

    let customers = niaga.debts().customers().unwrap();
    assert_eq!(customers.len(), 2);
    assert_eq!(
        niaga
            .debts()
            .customer_total(warung.debt.customer_id)
            .unwrap(),
        rp(350_000)
    );

    let receipt = niaga
        .debts()
        .pay(warung.debt.id, rp(100_000), "transfer", None)
        .unwrap();
    assert_eq!(receipt.debt.paid_amount, rp(100_000));
    assert_eq!(receipt.debt.remaining_amount, rp(200_000));
    assert_eq!(receipt.payment.date, day(2025, 8, 3));

    clock.set(at(2025, 8, 6, 9));
    assert_eq!(niaga.debts().refresh_overdue().unwrap(), 1);
    let overdue = niaga.debts().list(None, Some(DebtStatus::Overdue)).unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].customer_name, "Pak Dedi");

    // an overdue debt paid in full is settled
    let settled = niaga
        .debts()
        .pay(overdue[0].debt.id, rp(80_000), "", None)
        .unwrap();
    assert_eq!(settled.debt.status, DebtStatus::Paid);

    let dashboard = niaga.reports().dashboard().unwrap();
    assert_eq!(dashboard.customers, 2);
    assert_eq!(dashboard.total_active_debt, rp(250_000));
    assert_eq!(dashboard.overdue_debts, 0);

    let sri = niaga.debts().list(Some("sri"), None).unwrap();
    assert_eq!(sri.len(), 2);
}
