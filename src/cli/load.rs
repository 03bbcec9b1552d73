use comfy_table::{Cell, Table};

use crate::cli::SourceArgs;
use crate::error::Result;
use crate::loader::load_dataset;
use crate::models::{Batch, InventoryRow, SkippedRow, SourceYear};
use crate::season::{is_off_season, is_off_season_fw};
use crate::settings::load_settings;

fn off_season_count(batch: &Batch<InventoryRow>) -> usize {
    batch.records.iter().filter(|r| is_off_season_fw(r)).count()
}

fn print_skipped(label: &str, skipped: &[SkippedRow], dropped: &[usize]) {
    for s in skipped {
        println!("  {label} line {}: {}", s.line, s.reason);
    }
    for line in dropped {
        println!("  {label} line {line}: too few fields");
    }
}

pub fn run(sources: &SourceArgs, details: bool) -> Result<()> {
    let (paths, fiscal_year) = sources.resolve(&load_settings());
    let data = load_dataset(&paths, fiscal_year)?;

    let mut table = Table::new();
    table.set_header(vec!["Source", "Loaded", "Off-season FW", "Skipped", "Dropped"]);
    table.add_row(vec![
        Cell::new(format!("PY (FY{})", SourceYear::Prior.reference_year(fiscal_year))),
        Cell::new(data.prior.records.len()),
        Cell::new(off_season_count(&data.prior)),
        Cell::new(data.prior.skipped.len()),
        Cell::new(data.prior.dropped_lines.len()),
    ]);
    table.add_row(vec![
        Cell::new(format!("CY (FY{fiscal_year})")),
        Cell::new(data.current.records.len()),
        Cell::new(off_season_count(&data.current)),
        Cell::new(data.current.skipped.len()),
        Cell::new(data.current.dropped_lines.len()),
    ]);
    table.add_row(vec![
        Cell::new("Graph"),
        Cell::new(data.graph.records.len()),
        Cell::new(
            data.graph
                .records
                .iter()
                .filter(|r| is_off_season(&r.season))
                .count(),
        ),
        Cell::new(data.graph.skipped.len()),
        Cell::new(data.graph.dropped_lines.len()),
    ]);
    table.add_row(vec![
        Cell::new("Targets"),
        Cell::new(data.targets.records.len()),
        Cell::new(""),
        Cell::new(data.targets.skipped.len()),
        Cell::new(data.targets.dropped_lines.len()),
    ]);
    println!("{table}");

    if details {
        println!();
        print_skipped("PY", &data.prior.skipped, &data.prior.dropped_lines);
        print_skipped("CY", &data.current.skipped, &data.current.dropped_lines);
        print_skipped("Graph", &data.graph.skipped, &data.graph.dropped_lines);
        print_skipped("Targets", &data.targets.skipped, &data.targets.dropped_lines);
    }
    Ok(())
}
