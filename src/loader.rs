use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::csv_text::{parse_csv, CsvRow, ParsedCsv};
use crate::decode::{decode_graph, decode_inventory, decode_target};
use crate::error::{OffseasonError, Result};
use crate::fx::{apply_fx, apply_fx_graph};
use crate::models::{
    Batch, GraphRow, InventoryRow, RowError, SkippedRow, SourceYear, TargetRow,
};
use crate::season::parse_season;

// ---------------------------------------------------------------------------
// Per-kind pipelines
// ---------------------------------------------------------------------------

fn collect<T>(
    label: &str,
    parsed: ParsedCsv,
    mut build: impl FnMut(&CsvRow) -> std::result::Result<T, RowError>,
) -> Batch<T> {
    let mut batch = Batch {
        dropped_lines: parsed.dropped_lines,
        ..Batch::default()
    };
    for row in &parsed.rows {
        match build(row) {
            Ok(record) => batch.records.push(record),
            Err(reason) => {
                warn!(source = label, line = row.line, %reason, "Skipping row");
                batch.skipped.push(SkippedRow {
                    line: row.line,
                    reason,
                });
            }
        }
    }
    info!(
        source = label,
        loaded = batch.records.len(),
        skipped = batch.skipped.len(),
        dropped = batch.dropped_lines.len(),
        "Decoded source"
    );
    batch
}

/// Decode one PY or CY inventory extract. Season codes are read against the
/// file's own fiscal year (`current_fiscal_year - 1` for PY).
pub fn load_inventory(
    text: &str,
    source_year: SourceYear,
    current_fiscal_year: i32,
) -> Batch<InventoryRow> {
    let reference_year = source_year.reference_year(current_fiscal_year);
    collect(source_year.label(), parse_csv(text), |row| {
        let raw = decode_inventory(row, source_year)?;
        let season = parse_season(&raw.season, reference_year);
        Ok(apply_fx(raw, season))
    })
}

/// Decode the trend extract. Each row is classified against the fiscal year
/// it reports on.
pub fn load_graph(text: &str) -> Batch<GraphRow> {
    collect("graph", parse_csv(text), |row| {
        let raw = decode_graph(row)?;
        let season = parse_season(&raw.season_code, raw.year % 100);
        let (fx_rate, normalized, discount_rate) = apply_fx_graph(&raw.country, &raw.amounts);
        Ok(GraphRow {
            period: raw.period,
            year: raw.year,
            season_code: raw.season_code,
            country: raw.country,
            category: raw.category,
            raw: raw.amounts,
            fx_rate,
            normalized,
            discount_rate,
            season,
        })
    })
}

pub fn load_targets(text: &str, current_fiscal_year: i32) -> Batch<TargetRow> {
    collect("target", parse_csv(text), |row| {
        decode_target(row, current_fiscal_year)
    })
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Read a source extract. Bytes that aren't UTF-8 are replaced rather than
/// failing the file, and a leading BOM is dropped.
pub fn read_source(label: &'static str, path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| OffseasonError::SourceUnreadable {
        label,
        path: path.display().to_string(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let text: &str = &text;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string())
}

/// Optional sources fall back to no data.
pub fn read_optional_source(label: &'static str, path: Option<&Path>) -> String {
    let Some(path) = path else {
        return String::new();
    };
    match read_source(label, path) {
        Ok(text) => text,
        Err(e) => {
            warn!(source = label, error = %e, "Optional source unavailable, continuing without it");
            String::new()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SourcePaths {
    pub prior: Option<PathBuf>,
    pub current: Option<PathBuf>,
    pub graph: Option<PathBuf>,
    pub target: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct Dataset {
    pub current_fiscal_year: i32,
    pub prior: Batch<InventoryRow>,
    pub current: Batch<InventoryRow>,
    pub graph: Batch<GraphRow>,
    pub targets: Batch<TargetRow>,
}

impl Dataset {
    /// All inventory rows, PY first then CY, each in file order.
    pub fn inventory(&self) -> impl Iterator<Item = &InventoryRow> {
        self.prior.records.iter().chain(self.current.records.iter())
    }
}

/// Load every source. PY and CY are both required; the graph and target
/// extracts are optional and load as empty when missing or unreadable.
pub fn load_dataset(paths: &SourcePaths, current_fiscal_year: i32) -> Result<Dataset> {
    let prior_path = paths
        .prior
        .as_deref()
        .ok_or(OffseasonError::MissingSource("prior-year"))?;
    let current_path = paths
        .current
        .as_deref()
        .ok_or(OffseasonError::MissingSource("current-year"))?;

    let prior_text = read_source("prior-year", prior_path)?;
    let current_text = read_source("current-year", current_path)?;
    let graph_text = read_optional_source("graph", paths.graph.as_deref());
    let target_text = read_optional_source("target", paths.target.as_deref());

    Ok(Dataset {
        current_fiscal_year,
        prior: load_inventory(&prior_text, SourceYear::Prior, current_fiscal_year),
        current: load_inventory(&current_text, SourceYear::Current, current_fiscal_year),
        graph: load_graph(&graph_text),
        targets: load_targets(&target_text, current_fiscal_year),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const INVENTORY_HEADER: &str = "period,Country,Ex-rate,ITEM CODE,ITEM DESC1,ITEM DESC2,STORE,STORE NAME,SALES DIV,SEASON,BRAND,BRAND NAME,CATEGORY,CATEGORY NAME,SUBCATEGORY,SUBCATEGORY NAME,Sales (Qty),\"AC Sales\n(Qty)\",Stock (Qty),Net AcP.C,Net AcP.P,\"AC Sales\n(Cost)\",\"AC Sales\n(Net Amount)\",\"AC Sales\n(Gross Sales)\",Gross Sales ($),Net Sales ($),COGS ($),Stock Cost ($),Stock Price ($)";

    /// One inventory line with the money columns filled in.
    #[allow(clippy::too_many_arguments)]
    pub fn inventory_line(
        period: &str,
        country: &str,
        item: &str,
        season: &str,
        category: &str,
        gross: f64,
        net: f64,
        stock_cost: f64,
        stock_price: f64,
    ) -> String {
        format!(
            "{period},{country},1,{item},Desc,,S01,Store One,RTL,{season},B1,Brand,C1,{category},SC1,Sub,3,3,5,0,0,0,0,0,{gross},{net},{cogs},{stock_cost},{stock_price}",
            cogs = net / 2.0,
        )
    }

    pub fn inventory_csv(lines: &[String]) -> String {
        let mut s = format!("{INVENTORY_HEADER}\n");
        for l in lines {
            s.push_str(l);
            s.push('\n');
        }
        s
    }
}
