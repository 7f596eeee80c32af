use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Settings;

/// A postal address on the invoice. Structurally close to the config's
/// company sections but kept as a separate, rendering-facing type so the
/// template shape is decoupled from the on-disk schema.
#[derive(Debug, Clone, Serialize)]
pub struct Address {
    pub name: String,
    pub street: String,
    pub city: String,
    pub postcode: String,
    pub vat_number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BankDetails {
    pub bank_name: String,
    pub account_name: String,
    pub sort_code: String,
    pub account_number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StyleInfo {
    pub primary_color: String,
}

/// Amount, VAT and total are always produced together so the invariants
/// `vat = amount * vat_rate` and `total = amount + vat` hold by construction.
/// No rounding happens here; presentation rounding belongs to the template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub amount: f64,
    pub vat: f64,
    pub total: f64,
}

impl Totals {
    pub fn from_days(days: i64, daily_rate: f64, vat_rate: f64) -> Self {
        let amount = days as f64 * daily_rate;
        let vat = amount * vat_rate;
        Totals {
            amount,
            vat,
            total: amount + vat,
        }
    }
}

/// The single renderable record handed to the template. Built fresh per run
/// and discarded once the PDF is written.
#[derive(Debug, Clone, Serialize)]
pub struct Invoice {
    pub number: String,
    pub date: NaiveDate,
    pub po_number: String,
    pub due_date: NaiveDate,
    pub days: i64,
    pub daily_rate: f64,
    pub amount: f64,
    pub vat: f64,
    pub total: f64,
    pub payment_terms: u32,
    pub from_company: Address,
    pub to_company: Address,
    pub bank: BankDetails,
    pub style: StyleInfo,
}

impl Invoice {
    /// Pure merge of config, CLI inputs and the date-policy outputs. All
    /// validation and I/O happens before this point.
    pub fn assemble(
        settings: &Settings,
        days: i64,
        po_number: &str,
        date: NaiveDate,
    ) -> Self {
        let totals = Totals::from_days(days, settings.business.daily_rate, settings.business.vat_rate);

        Invoice {
            number: crate::dates::invoice_number(date),
            date,
            po_number: po_number.to_string(),
            due_date: crate::dates::due_date(date, settings.business.payment_terms_days),
            days,
            daily_rate: settings.business.daily_rate,
            amount: totals.amount,
            vat: totals.vat,
            total: totals.total,
            payment_terms: settings.business.payment_terms_days,
            from_company: Address {
                name: settings.from_company.name.clone(),
                street: settings.from_company.street.clone(),
                city: settings.from_company.city.clone(),
                postcode: settings.from_company.postcode.clone(),
                vat_number: settings.from_company.vat_number.clone(),
            },
            to_company: Address {
                name: settings.to_company.name.clone(),
                street: settings.to_company.street.clone(),
                city: settings.to_company.city.clone(),
                postcode: settings.to_company.postcode.clone(),
                vat_number: settings.to_company.vat_number.clone(),
            },
            bank: BankDetails {
                bank_name: settings.bank.name.clone(),
                account_name: settings.bank.account_name.clone(),
                sort_code: settings.bank.sort_code.clone(),
                account_number: settings.bank.account_number.clone(),
            },
            style: StyleInfo {
                primary_color: settings.style.primary_color.clone(),
            },
        }
    }

    /// Output filename: the invoice number with path separators made safe,
    /// plus the `.pdf` extension.
    pub fn file_name(&self) -> String {
        file_name_for(&self.number)
    }
}

pub fn file_name_for(invoice_number: &str) -> String {
    format!("{}.pdf", invoice_number.replace('/', "-"))
}
