//! Output formatting for quote rows (table, JSON, CSV).

use crate::config::OutputFormat;
use crate::sellup::models::PriceQuoteRow;

/// Formats quote rows for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a batch of quote rows.
    pub fn format_rows(&self, rows: &[PriceQuoteRow]) -> String {
        if rows.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                OutputFormat::Table => "No quotes collected.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_rows(rows),
            OutputFormat::Table => self.table_rows(rows),
            OutputFormat::Csv => self.csv_rows(rows),
        }
    }

    // JSON formatting

    fn json_rows(&self, rows: &[PriceQuoteRow]) -> String {
        serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_rows(&self, rows: &[PriceQuoteRow]) -> String {
        let id_width = 8;
        let dealer_width = 24;
        let price_width = 10;
        let name_width = 36;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<id_width$}  {:<name_width$}  {:<dealer_width$}  {:>price_width$}  {:>price_width$}  {}",
            "Goods", "Product", "Dealer", "SKU", "Total", "Updated"
        ));
        lines.push(format!(
            "{:-<id_width$}  {:-<name_width$}  {:-<dealer_width$}  {:-<price_width$}  {:-<price_width$}  {:-<19}",
            "", "", "", "", "", ""
        ));

        for row in rows {
            let name = if row.product_name.len() > name_width {
                format!("{}...", &row.product_name[..name_width - 3])
            } else {
                row.product_name.clone()
            };

            let dealer = if row.dealer_name.len() > dealer_width {
                format!("{}...", &row.dealer_name[..dealer_width - 3])
            } else {
                row.dealer_name.clone()
            };

            lines.push(format!(
                "{:<id_width$}  {:<name_width$}  {:<dealer_width$}  {:>price_width$.2}  {:>price_width$.2}  {}",
                row.goods_id, name, dealer, row.sku_price, row.total_price, row.updated_at
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} quotes", rows.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        PriceQuoteRow::HEADER.join(",")
    }

    fn csv_rows(&self, rows: &[PriceQuoteRow]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for row in rows {
            lines.push(format!(
                "{},{},{},{},{},{},{}",
                escape_csv(&row.goods_id),
                escape_csv(&row.product_name),
                escape_csv(&row.dealer_id),
                escape_csv(&row.dealer_name),
                row.sku_price,
                row.total_price,
                escape_csv(&row.updated_at)
            ));
        }

        lines.join("\n")
    }
}

fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_row(goods_id: &str, product: &str, dealer: &str, price: f64) -> PriceQuoteRow {
        PriceQuoteRow {
            goods_id: goods_id.to_string(),
            product_name: product.to_string(),
            dealer_id: "7".to_string(),
            dealer_name: dealer.to_string(),
            sku_price: price,
            total_price: price - 10.0,
            updated_at: "2026-08-23 11:05:00".to_string(),
        }
    }

    #[test]
    fn test_table_format() {
        let rows = vec![make_row("1001", "iPad Pro 11 M4 256GB", "Red White Mobile", 820.0)];
        let output = Formatter::new(OutputFormat::Table).format_rows(&rows);

        assert!(output.contains("iPad Pro 11 M4 256GB"));
        assert!(output.contains("Red White Mobile"));
        assert!(output.contains("820.00"));
        assert!(output.contains("810.00"));
        assert!(output.contains("Total: 1 quotes"));
    }

    #[test]
    fn test_table_truncates_long_names() {
        let long = "iPad Pro 13 M4 2TB Cellular Space Black with Nano-texture Glass";
        let rows = vec![make_row("1001", long, "Dealer", 100.0)];
        let output = Formatter::new(OutputFormat::Table).format_rows(&rows);

        assert!(output.contains("..."));
        assert!(!output.contains(long));
    }

    #[test]
    fn test_table_empty() {
        let output = Formatter::new(OutputFormat::Table).format_rows(&[]);
        assert_eq!(output, "No quotes collected.");
    }

    #[test]
    fn test_json_format() {
        let rows = vec![make_row("1001", "iPad Pro", "Red White Mobile", 820.0)];
        let output = Formatter::new(OutputFormat::Json).format_rows(&rows);

        let parsed: Vec<PriceQuoteRow> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].goods_id, "1001");
        assert_eq!(parsed[0].sku_price, 820.0);
    }

    #[test]
    fn test_json_empty() {
        let output = Formatter::new(OutputFormat::Json).format_rows(&[]);
        assert_eq!(output, "[]");
    }

    #[test]
    fn test_csv_format() {
        let rows = vec![make_row("1001", "iPad Pro", "Red White Mobile", 820.0)];
        let output = Formatter::new(OutputFormat::Csv).format_rows(&rows);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "goods_id,product_name,dealerId,dealerName,skuPrice,totalPrice,updated_at");
        assert!(lines[1].starts_with("1001,iPad Pro,7,Red White Mobile,820,"));
    }

    #[test]
    fn test_csv_empty_is_header_only() {
        let output = Formatter::new(OutputFormat::Csv).format_rows(&[]);
        assert_eq!(output, "goods_id,product_name,dealerId,dealerName,skuPrice,totalPrice,updated_at");
    }

    #[test]
    fn test_csv_escaping() {
        let rows = vec![make_row("1001", "iPad, Pro", "Dealer \"X\"", 100.0)];
        let output = Formatter::new(OutputFormat::Csv).format_rows(&rows);

        assert!(output.contains("\"iPad, Pro\""));
        assert!(output.contains("\"Dealer \"\"X\"\"\""));
    }

    #[test]
    fn test_escape_csv_plain() {
        assert_eq!(escape_csv("plain"), "plain");
    }
}
