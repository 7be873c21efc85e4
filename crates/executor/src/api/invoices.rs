//! Service invoices.
//!
//! Access via `niaga.invoices()`.

use crate::{Command, Error, Output, Result, Session};
use niaga_core::model::{Invoice, InvoiceStatus, NewInvoice};

/// Handle for invoice operations.
pub struct Invoices<'a> {
    session: &'a Session,
}

impl<'a> Invoices<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Create a draft invoice.
    pub fn create(&self, invoice: NewInvoice) -> Result<Invoice> {
        match self.session.execute(Command::InvoiceCreate { invoice })? {
            Output::Invoice(invoice) => Ok(invoice),
            _ => Err(Error::unexpected("InvoiceCreate")),
        }
    }

    /// One invoice.
    pub fn get(&self, invoice_id: u64) -> Result<Invoice> {
        match self.session.execute(Command::InvoiceGet { invoice_id })? {
            Output::Invoice(invoice) => Ok(invoice),
            _ => Err(Error::unexpected("InvoiceGet")),
        }
    }

    /// All invoices, newest first.
    pub fn list(&self) -> Result<Vec<Invoice>> {
        match self.session.execute(Command::InvoiceList)? {
            Output::Invoices(invoices) => Ok(invoices),
            _ => Err(Error::unexpected("InvoiceList")),
        }
    }

    /// Invoices whose client name or phone contains `query`.
    pub fn search(&self, query: &str) -> Result<Vec<Invoice>> {
        match self.session.execute(Command::InvoiceSearch {
            query: query.to_string(),
        })? {
            Output::Invoices(invoices) => Ok(invoices),
            _ => Err(Error::unexpected("InvoiceSearch")),
        }
    }

    /// Move an invoice along its lifecycle.
    pub fn set_status(&self, invoice_id: u64, status: InvoiceStatus) -> Result<Invoice> {
        match self
            .session
            .execute(Command::InvoiceSetStatus { invoice_id, status })?
        {
            Output::Invoice(invoice) => Ok(invoice),
            _ => Err(Error::unexpected("InvoiceSetStatus")),
        }
    }

    /// Mark open invoices past their due date as overdue.
    pub fn refresh_overdue(&self) -> Result<usize> {
        match self.session.execute(Command::InvoiceRefreshOverdue)? {
            Output::Count(n) => Ok(n),
            _ => Err(Error::unexpected("InvoiceRefreshOverdue")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::admin;
    use super::*;
    use chrono::NaiveDate;
    use niaga_core::model::NewInvoiceLine;
    use niaga_core::Rupiah;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn servis_ac(client: &str) -> NewInvoice {
        NewInvoice {
            client_name: client.into(),
            client_email: String::new(),
            client_phone: "0813-1111-2222".into(),
            client_address: String::new(),
            service_date: date(2020, 1, 2),
            issue_date: date(2020, 1, 3),
            due_date: date(2020, 1, 10),
            notes: String::new(),
            items: vec![
                NewInvoiceLine {
                    description: "Cuci AC".into(),
                    quantity: 2.0,
                    rate: Rupiah::new(75_000),
                },
                NewInvoiceLine {
                    description: "Isi freon".into(),
                    quantity: 1.0,
                    rate: Rupiah::new(150_000),
                },
            ],
            discount_percent: 10.0,
            tax_rate: 11.0,
        }
    }

    #[test]
    fn test_create_prices_lines() {
        let niaga = admin();
        let invoice = niaga.invoices().create(servis_ac("Pak Harun")).unwrap();
        assert_eq!(invoice.number, "INV-00001");
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert_eq!(invoice.subtotal, Rupiah::new(300_000));
        assert_eq!(invoice.discount_amount, Rupiah::new(30_000));
        assert_eq!(invoice.tax_amount, Rupiah::new(29_700));
        assert_eq!(invoice.total, Rupiah::new(299_700));
    }

    #[test]
    fn test_lifecycle() {
        let niaga = admin();
        let id = niaga.invoices().create(servis_ac("Pak Harun")).unwrap().id;

        let sent = niaga.invoices().set_status(id, InvoiceStatus::Sent).unwrap();
        assert_eq!(sent.status, InvoiceStatus::Sent);
        let paid = niaga.invoices().set_status(id, InvoiceStatus::Paid).unwrap();
        assert_eq!(paid.status, InvoiceStatus::Paid);

        let err = niaga
            .invoices()
            .set_status(id, InvoiceStatus::Draft)
            .unwrap_err();
        assert_eq!(err.code(), "invalid_transition");
    }

    #[test]
    fn test_refresh_overdue_and_search() {
        let niaga = admin();
        let id = niaga.invoices().create(servis_ac("Bu Lestari")).unwrap().id;
        niaga.invoices().create(servis_ac("Pak Harun")).unwrap();

        assert_eq!(niaga.invoices().refresh_overdue().unwrap(), 2);
        assert_eq!(niaga.invoices().refresh_overdue().unwrap(), 0);
        assert_eq!(
            niaga.invoices().get(id).unwrap().status,
            InvoiceStatus::Overdue
        );

        let found = niaga.invoices().search("lestari").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
        assert_eq!(niaga.invoices().list().unwrap().len(), 2);
    }
}
