//! CSV rendering of a filtered quote set.

use crate::quote::Quote;

/// Fixed column order.
pub const CSV_HEADER: [&str; 8] = [
    "Contractor Name",
    "Company",
    "Roof Size",
    "Roof Type",
    "City",
    "State",
    "Project Date",
    "Submitted",
];

/// Escape a value for CSV: wrap in quotes if it contains comma, quote, or newline.
pub fn csv_escape(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn quote_row(quote: &Quote) -> String {
    let cells = [
        csv_escape(&quote.contractor_name),
        csv_escape(&quote.company),
        quote.roof_size.to_string(),
        quote.roof_type.as_str().to_string(),
        csv_escape(&quote.project_city),
        csv_escape(&quote.project_state),
        quote.project_date.format("%Y-%m-%d").to_string(),
        quote.created_at.format("%Y-%m-%d").to_string(),
    ];
    cells.join(",")
}

/// Build the CSV document. An empty input still yields the header row.
pub fn build_quotes_csv(quotes: &[Quote]) -> String {
    let mut lines = Vec::with_capacity(quotes.len() + 1);
    lines.push(CSV_HEADER.join(","));
    lines.extend(quotes.iter().map(quote_row));
    lines.join("\n")
}
