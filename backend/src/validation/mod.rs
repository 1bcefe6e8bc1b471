//! Row validation for invoice sheets.
//!
//! Turns a tokenized [`Grid`] into typed [`Invoice`] records plus a list of
//! [`Diagnostic`]s. Validation is pure: the same grid always yields the same
//! report.
//!
//! # Error policy
//!
//! | Condition                                      | Result                                  |
//! |------------------------------------------------|-----------------------------------------|
//! | fewer than 2 rows                              | one row error, no records               |
//! | required header(s) missing                     | one row error naming all of them        |
//! | row entirely blank                             | skipped silently                        |
//! | quantity/price/total/final total unparsable    | one row error per field, row dropped    |
//! | discount/service fee blank or unparsable       | reads as 0                              |
//! | item sold at ≥2 distinct prices                | one finding, matching records flagged   |
//! | spread above threshold (min > 0)               | finding and records marked significant  |
//!
//! # Example
//!
//! ```
//! use salescheck::{parse_csv, validate};
//!
//! let csv = "Tgl Permintaan,Tgl Selesai,Pemesan / Cabang,Item,Jumlah,Satuan,Harga,Total,Diskon,Biaya Jasa,Total + Biaya Jasa - Diskon\n\
//!            1/1,1/2,Toko A,Bawang,10,kg,\"Rp 5.000\",50000,0,0,50000";
//! let report = validate(&parse_csv(csv));
//!
//! assert_eq!(report.invoices.len(), 1);
//! assert_eq!(report.invoices[0].price, 5000.0);
//! assert!(report.diagnostics.is_empty());
//! ```

pub mod collate;
pub mod headers;
pub mod numeric;
pub mod prices;

pub use collate::locale_cmp;
pub use headers::{normalize_header, Column, ColumnIndex, HeaderContract};
pub use numeric::{parse_lenient, parse_optional};
pub use prices::{InconsistentItem, PriceAnalysis, PriceIndex};

use crate::config::CheckOptions;
use crate::models::{Diagnostic, Invoice, PriceInconsistency, Report, RowError};
use crate::parser::{Grid, Row};

/// Required numeric fields; a failure drops the row.
const REQUIRED_NUMERIC: [Column; 4] = [
    Column::Quantity,
    Column::Price,
    Column::Total,
    Column::FinalTotal,
];

/// Validate a grid against the default header contract.
pub fn validate(grid: &Grid) -> Report {
    validate_with(grid, &CheckOptions::default())
}

/// Validate a grid with explicit options.
pub fn validate_with(grid: &Grid, options: &CheckOptions) -> Report {
    let mut report = Report::default();

    if grid.len() < 2 {
        report.diagnostics.push(
            RowError::new(
                1,
                "Empty or invalid input: need a header row and at least one data row",
            )
            .into(),
        );
        return report;
    }

    let columns = match options.headers.resolve(&grid[0]) {
        Ok(columns) => columns,
        Err(missing) => {
            report.diagnostics.push(
                RowError::new(2, format!("Missing required columns: {}", missing.join(", ")))
                    .into(),
            );
            return report;
        }
    };

    let data = &grid[1..];

    let analysis = build_price_index(data, &columns).analyze(options.significance_threshold);
    report.diagnostics.extend(
        analysis
            .items()
            .iter()
            .map(|item| price_finding(data, &columns, item)),
    );

    for (offset, row) in data.iter().enumerate() {
        // header is row 1
        let row_number = offset + 2;

        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        match assemble_invoice(row, row_number, &columns, options, &analysis) {
            Ok(invoice) => report.invoices.push(invoice),
            Err(errors) => report
                .diagnostics
                .extend(errors.into_iter().map(Diagnostic::from)),
        }
    }

    sort_invoices(&mut report.invoices);
    report
}

/// Order invoices by item name; equal names keep sheet order.
pub fn sort_invoices(invoices: &mut [Invoice]) {
    invoices.sort_by(|a, b| locale_cmp(&a.item, &b.item));
}

fn item_key(cell: &str) -> String {
    cell.trim().to_lowercase()
}

fn build_price_index(data: &[Row], columns: &ColumnIndex) -> PriceIndex {
    let item_col = columns.position(Column::Item);
    let price_col = columns.position(Column::Price);
    let min_len = item_col.max(price_col) + 1;

    let mut index = PriceIndex::new();
    for row in data.iter().filter(|r| r.len() >= min_len) {
        let key = item_key(&row[item_col]);
        if key.is_empty() {
            continue;
        }
        if let Some(price) = parse_lenient(&row[price_col]) {
            index.insert(&key, price);
        }
    }
    index
}

/// First spelling of an item in sheet order, trimmed.
fn display_name(data: &[Row], columns: &ColumnIndex, key: &str) -> String {
    data.iter()
        .map(|row| columns.cell(row, Column::Item).trim())
        .find(|name| name.to_lowercase() == key)
        .map(str::to_string)
        .unwrap_or_else(|| key.to_string())
}

fn price_finding(data: &[Row], columns: &ColumnIndex, item: &InconsistentItem) -> Diagnostic {
    PriceInconsistency {
        item_name: display_name(data, columns, &item.key),
        prices: item.prices.clone(),
        is_significant: item.significant,
    }
    .into()
}

fn assemble_invoice(
    row: &Row,
    row_number: usize,
    columns: &ColumnIndex,
    options: &CheckOptions,
    analysis: &PriceAnalysis,
) -> Result<Invoice, Vec<RowError>> {
    let mut errors = Vec::new();
    let mut required = [0.0f64; 4];

    for (slot, column) in required.iter_mut().zip(REQUIRED_NUMERIC) {
        let raw = columns.cell(row, column);
        match parse_lenient(raw) {
            Some(value) => *slot = value,
            None => errors.push(
                RowError::new(
                    row_number,
                    format!(
                        "{} is not a valid number: '{}'",
                        options.headers.label(column),
                        raw
                    ),
                )
                .with_column(options.headers.key(column))
                .with_value(raw),
            ),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let [quantity, price, total, final_total] = required;
    let text = |column: Column| columns.cell(row, column).to_string();
    let key = item_key(columns.cell(row, Column::Item));

    Ok(Invoice {
        request_date: text(Column::RequestDate),
        completion_date: text(Column::CompletionDate),
        customer: text(Column::Customer),
        item: text(Column::Item),
        quantity,
        unit: text(Column::Unit),
        price,
        total,
        discount: parse_optional(columns.cell(row, Column::Discount)),
        service_fee: parse_optional(columns.cell(row, Column::ServiceFee)),
        final_total,
        has_price_inconsistency: analysis.is_inconsistent(&key),
        has_significant_price_inconsistency: analysis.is_significant(&key),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_csv;

    const HEADER: &str = "Tgl Permintaan,Tgl Selesai,Pemesan / Cabang,Item,Jumlah,Satuan,Harga,Total,Diskon,Biaya Jasa,Total + Biaya Jasa - Diskon";

    fn sheet(rows: &[&str]) -> Grid {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        parse_csv(&text)
    }

    #[test]
    fn test_reference_row() {
        let report = validate(&sheet(&[
            r#"1/1,1/2,Toko A,Bawang,10,kg,"Rp 5.000",50000,0,0,50000"#,
        ]));

        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
        assert_eq!(report.invoices.len(), 1);
        let inv = &report.invoices[0];
        assert_eq!(inv.item, "Bawang");
        assert_eq!(inv.request_date, "1/1");
        assert_eq!(inv.completion_date, "1/2");
        assert_eq!(inv.customer, "Toko A");
        assert_eq!(inv.quantity, 10.0);
        assert_eq!(inv.unit, "kg");
        assert_eq!(inv.price, 5000.0);
        assert_eq!(inv.total, 50000.0);
        assert_eq!(inv.final_total, 50000.0);
        assert!(!inv.has_price_inconsistency);
        assert!(!inv.has_significant_price_inconsistency);
    }

    #[test]
    fn test_too_few_rows() {
        for text in ["", "\n\n", HEADER] {
            let report = validate(&parse_csv(text));
            assert!(report.invoices.is_empty());
            assert_eq!(report.diagnostics.len(), 1);
            assert_eq!(report.diagnostics[0].row(), Some(1));
        }
    }

    #[test]
    fn test_missing_headers_single_diagnostic() {
        let grid = parse_csv("Item,Jumlah,Harga,Total\nBawang,1,100,100");
        let report = validate(&grid);

        assert!(report.invoices.is_empty());
        assert_eq!(report.diagnostics.len(), 1);
        let err = report.diagnostics[0].as_row_error().unwrap();
        assert_eq!(err.row, 2);
        assert_eq!(
            err.message,
            "Missing required columns: tgl permintaan, tgl selesai, pemesan / cabang, \
             satuan, diskon, biaya jasa, total + biaya jasa - diskon"
        );
    }

    #[test]
    fn test_column_order_irrelevant() {
        let grid = parse_csv(
            "HARGA,item,Total + Biaya Jasa - Diskon,Total,Jumlah,Satuan,Diskon,Biaya Jasa,Pemesan / Cabang,Tgl Selesai,Tgl Permintaan\n\
             700,Cabai,1400,1400,2,kg,,,Toko B,3/2,3/1",
        );
        let report = validate(&grid);
        assert!(report.diagnostics.is_empty());
        let inv = &report.invoices[0];
        assert_eq!(inv.item, "Cabai");
        assert_eq!(inv.price, 700.0);
        assert_eq!(inv.quantity, 2.0);
        assert_eq!(inv.customer, "Toko B");
        assert_eq!(inv.request_date, "3/1");
    }

    #[test]
    fn test_blank_optional_fields_default_to_zero() {
        let report = validate(&sheet(&["1/1,1/2,Toko A,Tomat,2,kg,100,200,,,200"]));
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.invoices[0].discount, 0.0);
        assert_eq!(report.invoices[0].service_fee, 0.0);
    }

    #[test]
    fn test_garbage_optional_fields_default_to_zero() {
        let report = validate(&sheet(&["1/1,1/2,Toko A,Tomat,2,kg,100,200,n/a,-,200"]));
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.invoices[0].discount, 0.0);
        assert_eq!(report.invoices[0].service_fee, 0.0);
    }

    #[test]
    fn test_optional_fields_parsed() {
        let report = validate(&sheet(&[
            r#"1/1,1/2,Toko A,Tomat,2,kg,100,200,"Rp 1.000","Rp 2.500",1700"#,
        ]));
        assert_eq!(report.invoices[0].discount, 1000.0);
        assert_eq!(report.invoices[0].service_fee, 2500.0);
    }

    #[test]
    fn test_fractional_quantity_kept() {
        let report = validate(&sheet(&["1/1,1/2,Toko A,Kunyit,0.500,kg,20000,10000,0,0,10000"]));
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.invoices[0].quantity, 0.5);
        assert_eq!(report.invoices[0].price, 20000.0);
    }

    #[test]
    fn test_bad_required_fields_one_error_each() {
        let report = validate(&sheet(&[
            "1/1,1/2,Toko A,Tomat,abc,kg,100,200,0,0,",
            "1/1,1/2,Toko A,Wortel,1,kg,50,50,0,0,50",
        ]));

        assert_eq!(report.invoices.len(), 1);
        assert_eq!(report.invoices[0].item, "Wortel");

        let errors: Vec<&RowError> = report.row_errors().collect();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.row == 2));
        assert_eq!(errors[0].message, "Jumlah is not a valid number: 'abc'");
        assert_eq!(errors[0].column.as_deref(), Some("jumlah"));
        assert_eq!(errors[0].value.as_deref(), Some("abc"));
        assert_eq!(
            errors[1].message,
            "Total + Biaya Jasa - Diskon is not a valid number: ''"
        );
    }

    #[test]
    fn test_short_row_reports_missing_fields() {
        let report = validate(&sheet(&["1/1,1/2,Toko A,Tomat,2,kg,100"]));
        assert!(report.invoices.is_empty());
        let errors: Vec<&RowError> = report.row_errors().collect();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].column.as_deref(), Some("total"));
        assert_eq!(errors[1].column.as_deref(), Some("total + biaya jasa - diskon"));
    }

    #[test]
    fn test_blank_rows_skipped_silently() {
        let report = validate(&sheet(&[",,,,,,,,,,", "1/1,1/2,Toko A,Tomat,2,kg,100,200,0,0,200"]));
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.invoices.len(), 1);
    }

    #[test]
    fn test_row_numbers_count_from_header() {
        let report = validate(&sheet(&[
            "1/1,1/2,Toko A,Tomat,2,kg,100,200,0,0,200",
            ",,,,,,,,,,",
            "1/1,1/2,Toko A,Tomat,x,kg,100,200,0,0,200",
        ]));
        assert_eq!(report.row_errors().next().unwrap().row, 4);
    }

    #[test]
    fn test_significant_inconsistency() {
        let report = validate(&sheet(&[
            "1/1,1/2,Toko A,Bawang,1,kg,100,100,0,0,100",
            "1/3,1/4,Toko B,bawang,1,kg,150,150,0,0,150",
        ]));

        let findings: Vec<&PriceInconsistency> = report.price_inconsistencies().collect();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].item_name, "Bawang");
        assert_eq!(findings[0].prices, vec![100.0, 150.0]);
        assert!(findings[0].is_significant);

        assert_eq!(report.invoices.len(), 2);
        assert!(report
            .invoices
            .iter()
            .all(|i| i.has_price_inconsistency && i.has_significant_price_inconsistency));
    }

    #[test]
    fn test_minor_inconsistency() {
        let report = validate(&sheet(&[
            "1/1,1/2,Toko A,Tomat,1,kg,100,100,0,0,100",
            "1/3,1/4,Toko B,Tomat,1,kg,110,110,0,0,110",
            "1/3,1/4,Toko B,Tomat,1,kg,110,110,0,0,110",
        ]));

        let finding = report.price_inconsistencies().next().unwrap();
        assert_eq!(finding.prices, vec![100.0, 110.0]);
        assert!(!finding.is_significant);
        assert!(report
            .invoices
            .iter()
            .all(|i| i.has_price_inconsistency && !i.has_significant_price_inconsistency));
    }

    #[test]
    fn test_price_from_errored_row_still_indexed() {
        // The row is dropped for its bad quantity, but its price still counts
        let report = validate(&sheet(&[
            "1/1,1/2,Toko A,Tomat,1,kg,100,100,0,0,100",
            "1/3,1/4,Toko B,Tomat,x,kg,200,200,0,0,200",
        ]));
        assert_eq!(report.invoices.len(), 1);
        assert!(report.invoices[0].has_significant_price_inconsistency);
    }

    #[test]
    fn test_diagnostic_order() {
        let report = validate(&sheet(&[
            "1/1,1/2,Toko A,Wortel,1,kg,10,10,0,0,10",
            "1/1,1/2,Toko A,Wortel,1,kg,20,20,0,0,20",
            "1/1,1/2,Toko A,Apel,1,kg,5,5,0,0,x",
            "1/1,1/2,Toko A,apel,1,kg,6,6,0,0,6",
            "1/1,1/2,Toko A,Jeruk,q,kg,6,6,0,0,6",
        ]));

        let kinds: Vec<String> = report
            .diagnostics
            .iter()
            .map(|d| match d {
                Diagnostic::PriceInconsistency(p) => format!("price:{}", p.item_name),
                Diagnostic::RowError(e) => format!("row:{}", e.row),
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["price:Apel", "price:Wortel", "row:4", "row:6"]
        );
    }

    #[test]
    fn test_records_sorted_by_item() {
        let report = validate(&sheet(&[
            "1/1,1/2,Toko A,Wortel,1,kg,10,10,0,0,10",
            "1/1,1/2,Toko A,apel,1,kg,5,5,0,0,5",
            "1/1,1/2,Toko A,Bawang,1,kg,7,7,0,0,7",
            "1/1,1/2,Toko B,Apel,1,kg,5,5,0,0,5",
        ]));
        let items: Vec<&str> = report.invoices.iter().map(|i| i.item.as_str()).collect();
        assert_eq!(items, vec!["apel", "Apel", "Bawang", "Wortel"]);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let grid = sheet(&[
            "1/1,1/2,Toko A,Wortel,1,kg,10,10,0,0,10",
            "1/1,1/2,Toko A,Wortel,1,kg,20,20,0,0,20",
            "1/1,1/2,Toko A,Apel,1,kg,bad,5,0,0,5",
        ]);
        assert_eq!(validate(&grid), validate(&grid));
    }

    #[test]
    fn test_custom_threshold() {
        let options = CheckOptions {
            significance_threshold: 0.05,
            ..CheckOptions::default()
        };
        let grid = sheet(&[
            "1/1,1/2,Toko A,Tomat,1,kg,100,100,0,0,100",
            "1/3,1/4,Toko B,Tomat,1,kg,110,110,0,0,110",
        ]);
        let report = validate_with(&grid, &options);
        assert!(report.price_inconsistencies().next().unwrap().is_significant);
    }
}
