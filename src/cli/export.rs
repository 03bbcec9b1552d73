use std::io::Write;

use serde::Serialize;

use crate::cli::SourceArgs;
use crate::error::{OffseasonError, Result};
use crate::loader::load_dataset;
use crate::models::{GraphRow, InventoryRow, TargetRow};
use crate::season::{is_off_season, is_off_season_fw};
use crate::settings::load_settings;

const INVENTORY_COLUMNS: [&str; 22] = [
    "source_year",
    "period",
    "country",
    "item_code",
    "store",
    "season",
    "season_type",
    "years_past",
    "category",
    "category_name",
    "sales_qty",
    "stock_qty",
    "fx_rate",
    "gross_sales",
    "net_sales",
    "cogs",
    "stock_cost",
    "stock_price",
    "ac_sales_gross",
    "ac_sales_net_amount",
    "discount_rate",
    "off_season",
];

const GRAPH_COLUMNS: [&str; 13] = [
    "period",
    "year",
    "country",
    "category",
    "season",
    "season_type",
    "years_past",
    "fx_rate",
    "gross_sales",
    "net_sales",
    "stock_price",
    "stock_cost",
    "discount_rate",
];

const TARGET_COLUMNS: [&str; 9] = [
    "period",
    "season_name",
    "season_code",
    "category",
    "amount",
    "tag_sales",
    "net_sales",
    "discount_rate",
    "years_past",
];

fn opt(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

fn inventory_record(r: &InventoryRow) -> Vec<String> {
    vec![
        r.raw.source_year.map(|s| s.label()).unwrap_or_default().to_string(),
        r.raw.period.clone(),
        r.raw.country.clone(),
        r.raw.item_code.clone(),
        r.raw.store.clone(),
        r.raw.season.clone(),
        r.season.season_type.label().to_string(),
        r.season.bucket.label().to_string(),
        r.raw.category.clone(),
        r.raw.category_name.clone(),
        r.raw.sales_qty.to_string(),
        r.raw.stock_qty.to_string(),
        r.fx_rate.to_string(),
        r.normalized.gross_sales.to_string(),
        r.normalized.net_sales.to_string(),
        r.normalized.cogs.to_string(),
        r.normalized.stock_cost.to_string(),
        r.normalized.stock_price.to_string(),
        r.normalized.ac_sales_gross.to_string(),
        r.normalized.ac_sales_net_amount.to_string(),
        opt(r.discount_rate),
        is_off_season_fw(r).to_string(),
    ]
}

fn graph_record(r: &GraphRow) -> Vec<String> {
    vec![
        r.period.clone(),
        r.year.to_string(),
        r.country.clone(),
        r.category.clone(),
        r.season_code.clone(),
        r.season.season_type.label().to_string(),
        r.season.bucket.label().to_string(),
        r.fx_rate.to_string(),
        r.normalized.gross_sales.to_string(),
        r.normalized.net_sales.to_string(),
        r.normalized.stock_price.to_string(),
        r.normalized.stock_cost.to_string(),
        opt(r.discount_rate),
    ]
}

fn target_record(t: &TargetRow) -> Vec<String> {
    vec![
        t.period.clone(),
        t.season_name.clone(),
        t.season_code.clone(),
        t.category.clone(),
        t.amount.to_string(),
        t.tag_sales.to_string(),
        t.net_sales.to_string(),
        opt(t.discount_rate),
        t.season.bucket.label().to_string(),
    ]
}

fn write_csv<T>(
    out: &mut dyn Write,
    columns: &[&str],
    rows: &[&T],
    record: fn(&T) -> Vec<String>,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(columns)?;
    for row in rows {
        wtr.write_record(record(*row))?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_json<T: Serialize>(out: &mut dyn Write, rows: &[&T]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, rows)?;
    writeln!(out)?;
    Ok(())
}

fn write_rows<T: Serialize>(
    out: &mut dyn Write,
    format: &str,
    columns: &[&str],
    rows: &[&T],
    record: fn(&T) -> Vec<String>,
) -> Result<()> {
    match format {
        "csv" => write_csv(out, columns, rows, record),
        "json" => write_json(out, rows),
        other => Err(OffseasonError::UnknownFormat(other.to_string())),
    }
}

pub fn run(
    sources: &SourceArgs,
    kind: &str,
    format: &str,
    output: Option<&str>,
    off_season: bool,
) -> Result<()> {
    if !matches!(kind, "inventory" | "graph" | "target") {
        return Err(OffseasonError::UnknownKind(kind.to_string()));
    }
    if !matches!(format, "csv" | "json") {
        return Err(OffseasonError::UnknownFormat(format.to_string()));
    }

    let (paths, fiscal_year) = sources.resolve(&load_settings());
    let data = load_dataset(&paths, fiscal_year)?;

    let mut out: Box<dyn Write> = match output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout().lock()),
    };

    let count = match kind {
        "graph" => {
            let rows: Vec<&GraphRow> = data
                .graph
                .records
                .iter()
                .filter(|r| !off_season || is_off_season(&r.season))
                .collect();
            write_rows(&mut *out, format, &GRAPH_COLUMNS, &rows, graph_record)?;
            rows.len()
        }
        "target" => {
            let rows: Vec<&TargetRow> = data
                .targets
                .records
                .iter()
                .filter(|t| !off_season || is_off_season(&t.season))
                .collect();
            write_rows(&mut *out, format, &TARGET_COLUMNS, &rows, target_record)?;
            rows.len()
        }
        _ => {
            let rows: Vec<&InventoryRow> = data
                .inventory()
                .filter(|r| !off_season || is_off_season_fw(r))
                .collect();
            write_rows(&mut *out, format, &INVENTORY_COLUMNS, &rows, inventory_record)?;
            rows.len()
        }
    };
    out.flush()?;

    if let Some(path) = output {
        println!("Exported {count} {kind} rows to {path}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::apply_fx;
    use crate::models::{RawInventoryRecord, SourceYear};
    use crate::season::parse_season;

    fn row() -> InventoryRow {
        let raw = RawInventoryRecord {
            period: "2512".to_string(),
            country: "HK".to_string(),
            season: "24F".to_string(),
            gross_sales: 100.0,
            net_sales: 50.0,
            source_year: Some(SourceYear::Current),
            ..RawInventoryRecord::default()
        };
        apply_fx(raw, parse_season("24F", 25))
    }

    #[test]
    fn test_inventory_record_matches_columns() {
        let rec = inventory_record(&row());
        assert_eq!(rec.len(), INVENTORY_COLUMNS.len());
        assert_eq!(rec[0], "CY");
        assert_eq!(rec[13], "100");
        assert_eq!(rec[14], "50");
        assert_eq!(rec[20], "0.5");
        assert_eq!(rec[21], "true");
    }

    #[test]
    fn test_write_csv_header_and_rows() {
        let r = row();
        let mut buf = Vec::new();
        write_rows(&mut buf, "csv", &INVENTORY_COLUMNS, &[&r], inventory_record).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("source_year,period,country"));
        assert!(lines.next().unwrap().starts_with("CY,2512,HK"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_write_json() {
        let r = row();
        let mut buf = Vec::new();
        write_rows(&mut buf, "json", &INVENTORY_COLUMNS, &[&r], inventory_record).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["raw"]["country"], "HK");
        assert_eq!(value[0]["fx_rate"], 1.0);
        assert_eq!(value[0]["season"]["bucket"], "1yr");
    }

    #[test]
    fn test_unknown_format() {
        let r = row();
        let mut buf = Vec::new();
        let err = write_rows(&mut buf, "xml", &INVENTORY_COLUMNS, &[&r], inventory_record);
        assert!(matches!(err, Err(OffseasonError::UnknownFormat(_))));
    }
}
