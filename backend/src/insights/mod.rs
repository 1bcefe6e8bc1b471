//! Context handed to the question-answering collaborator.
//!
//! The collaborator (a hosted language model behind the web app) only ever
//! sees a compact text sample of the validated invoices plus the user's
//! question. Building that text is our side of the contract; answering is
//! not.

use crate::export::format_number;
use crate::models::Invoice;

/// Compact one-line rendering of an invoice.
pub fn format_invoice(invoice: &Invoice) -> String {
    format!(
        "{{request_date: {}, customer: {}, item: {}, price: {}, quantity: {}, unit: {}, discount: {}, final_total: {}}}",
        invoice.request_date,
        invoice.customer,
        invoice.item,
        format_number(invoice.price),
        format_number(invoice.quantity),
        invoice.unit,
        format_number(invoice.discount),
        format_number(invoice.final_total),
    )
}

/// The first `sample_size` invoices with a preamble stating the sample size.
pub fn context_sample(invoices: &[Invoice], sample_size: usize) -> String {
    let sample = &invoices[..sample_size.min(invoices.len())];
    let lines: Vec<String> = sample.iter().map(format_invoice).collect();

    format!(
        "Sales data summary (sample of {} out of {} rows):\n{}",
        sample.len(),
        invoices.len(),
        lines.join("\n")
    )
}

/// Full prompt for one question, or `None` when there is nothing to analyze.
pub fn build_prompt(invoices: &[Invoice], question: &str, sample_size: usize) -> Option<String> {
    if invoices.is_empty() {
        return None;
    }

    let context = context_sample(invoices, sample_size);
    Some(format!(
        r#"You are a data analysis assistant for a produce supplier.
Answer the user's question using the sales data below.
Answer in Indonesian. Be clear, concise and get straight to the point.

## Data Context

{context}

## User Question

"{question}""#,
        question = question.trim()
    ))
}
