//! CSV export of validated invoices.
//!
//! Output has a leading `Peringatan` column carrying the record's
//! [`WarningLabel`](crate::models::WarningLabel) text, followed by the
//! contract columns in display form. Cells are quoted only when they
//! contain a comma, a quote or a line break; embedded quotes are doubled.
//! Lines are joined with `\n` and the last line has no terminator.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::config::CheckOptions;
use crate::error::{ExportError, ExportResult};
use crate::models::Invoice;

/// Header of the warning column.
pub const WARNING_HEADER: &str = "Peringatan";

/// Serialize invoices, in the given order, to CSV text.
///
/// Header labels and the significance threshold quoted in warnings come from
/// `options`.
pub fn to_csv(invoices: &[Invoice], options: &CheckOptions) -> ExportResult<String> {
    let headers = &options.headers;
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header = Vec::with_capacity(headers.labels().len() + 1);
    header.push(WARNING_HEADER.to_string());
    header.extend(headers.labels().iter().cloned());
    writer.write_record(&header)?;

    for invoice in invoices {
        writer.write_record(export_row(invoice, options.significance_threshold))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

fn export_row(invoice: &Invoice, threshold: f64) -> [String; 12] {
    [
        invoice.warning().text(threshold),
        invoice.request_date.clone(),
        invoice.completion_date.clone(),
        invoice.customer.clone(),
        invoice.item.clone(),
        format_number(invoice.quantity),
        invoice.unit.clone(),
        format_number(invoice.price),
        format_number(invoice.total),
        format_number(invoice.discount),
        format_number(invoice.service_fee),
        format_number(invoice.final_total),
    ]
}

/// Shortest round-trip form; integers carry no decimal point.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // also folds -0
        return "0".to_string();
    }
    value.to_string()
}
