use colored::Colorize;
use comfy_table::{Cell, Table};
use serde::Serialize;

use crate::cli::{ReportArgs, ReportCommands};
use crate::error::Result;
use crate::fmt::{days, money, pct, qty};
use crate::loader::{load_dataset, Dataset};
use crate::models::SourceYear;
use crate::reports::{self, SummaryMetrics};
use crate::season::is_off_season_fw;
use crate::settings::load_settings;

pub fn dispatch(cmd: ReportCommands) -> Result<()> {
    match cmd {
        ReportCommands::Summary(args) => summary(&args),
        ReportCommands::Buckets(args) => buckets(&args),
        ReportCommands::Categories(args) => categories(&args),
        ReportCommands::Trend(args) => trend(&args),
        ReportCommands::Targets(args) => targets(&args),
    }
}

fn load(args: &ReportArgs) -> Result<Dataset> {
    let (paths, fiscal_year) = args.sources.resolve(&load_settings());
    load_dataset(&paths, fiscal_year)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn metric_cells(label: String, m: &SummaryMetrics) -> Vec<Cell> {
    vec![
        Cell::new(label),
        Cell::new(m.rows),
        Cell::new(money(m.gross_sales)),
        Cell::new(money(m.net_sales)),
        Cell::new(pct(m.discount_rate)),
        Cell::new(qty(m.stock_qty)),
        Cell::new(money(m.stock_price)),
        Cell::new(money(m.stock_cost)),
        Cell::new(days(m.inventory_days)),
    ]
}

const METRIC_HEADER: [&str; 9] = [
    "", "Rows", "Gross", "Net", "Disc.", "Stock qty", "Stock (tag)", "Stock (cost)", "Inv. days",
];

fn change_cell(change: Option<f64>) -> Cell {
    match change {
        Some(c) if c < 0.0 => Cell::new(pct(Some(c)).red()),
        Some(c) => Cell::new(pct(Some(c)).green()),
        None => Cell::new("-"),
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SummaryReport {
    current_fiscal_year: i32,
    prior_all: SummaryMetrics,
    current_all: SummaryMetrics,
    prior_off_season: SummaryMetrics,
    current_off_season: SummaryMetrics,
}

pub fn summary(args: &ReportArgs) -> Result<()> {
    let data = load(args)?;
    let report = SummaryReport {
        current_fiscal_year: data.current_fiscal_year,
        prior_all: SummaryMetrics::from_rows(&data.prior.records),
        current_all: SummaryMetrics::from_rows(&data.current.records),
        prior_off_season: SummaryMetrics::from_rows(
            data.prior.records.iter().filter(|r| is_off_season_fw(r)),
        ),
        current_off_season: SummaryMetrics::from_rows(
            data.current.records.iter().filter(|r| is_off_season_fw(r)),
        ),
    };
    if args.json {
        return print_json(&report);
    }

    let fy = report.current_fiscal_year;
    let py = SourceYear::Prior.reference_year(fy);
    let mut table = Table::new();
    table.set_header(METRIC_HEADER.to_vec());
    table.add_row(vec![Cell::new("ALL ROWS".bold())]);
    table.add_row(metric_cells(format!("  PY (FY{py})"), &report.prior_all));
    table.add_row(metric_cells(format!("  CY (FY{fy})"), &report.current_all));
    table.add_row(vec![Cell::new("OFF-SEASON FW".yellow().bold())]);
    table.add_row(metric_cells(format!("  PY (FY{py})"), &report.prior_off_season));
    table.add_row(metric_cells(format!("  CY (FY{fy})"), &report.current_off_season));
    println!("Summary (HKD)\n{table}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Buckets
// ---------------------------------------------------------------------------

pub fn buckets(args: &ReportArgs) -> Result<()> {
    let data = load(args)?;
    let report = reports::bucket_report(&data.prior.records, &data.current.records);
    if args.json {
        return print_json(&report);
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Bucket", "PY net", "CY net", "YoY", "PY disc.", "CY disc.", "CY stock (cost)",
        "CY inv. days",
    ]);
    for line in report.lines.iter().chain(std::iter::once(&report.total)) {
        let label = if std::ptr::eq(line, &report.total) {
            Cell::new(line.label.bold())
        } else {
            Cell::new(line.label)
        };
        table.add_row(vec![
            label,
            Cell::new(money(line.prior.net_sales)),
            Cell::new(money(line.current.net_sales)),
            change_cell(line.net_sales_change),
            Cell::new(pct(line.prior.discount_rate)),
            Cell::new(pct(line.current.discount_rate)),
            Cell::new(money(line.current.stock_cost)),
            Cell::new(days(line.current.inventory_days)),
        ]);
    }
    println!(
        "Off-season Fall/Winter by age (CY FY{}, HKD)\n{table}",
        data.current_fiscal_year
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub fn categories(args: &ReportArgs) -> Result<()> {
    let data = load(args)?;
    let lines = reports::category_report(&data.current.records);
    if args.json {
        return print_json(&lines);
    }

    let mut table = Table::new();
    table.set_header(METRIC_HEADER.to_vec());
    for line in &lines {
        table.add_row(metric_cells(line.category.clone(), &line.metrics));
    }
    println!("CY off-season by category (HKD)\n{table}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

pub fn trend(args: &ReportArgs) -> Result<()> {
    let data = load(args)?;
    let points = reports::trend_report(&data.graph.records);
    if args.json {
        return print_json(&points);
    }
    if points.is_empty() {
        println!("No off-season trend data.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Year", "Period", "Gross", "Net", "Disc.", "Stock (tag)", "Stock (cost)"]);
    for p in &points {
        table.add_row(vec![
            Cell::new(p.year),
            Cell::new(&p.period),
            Cell::new(money(p.gross_sales)),
            Cell::new(money(p.net_sales)),
            Cell::new(pct(p.discount_rate)),
            Cell::new(money(p.stock_price)),
            Cell::new(money(p.stock_cost)),
        ]);
    }
    println!("Off-season trend (HKD)\n{table}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

pub fn targets(args: &ReportArgs) -> Result<()> {
    let data = load(args)?;
    let lines = reports::target_report(&data.targets.records, &data.current.records);
    if args.json {
        return print_json(&lines);
    }
    if lines.is_empty() {
        println!("No season targets loaded.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Season", "Name", "Target", "Actual", "Achieved", "Target disc.", "Actual disc.",
    ]);
    for t in &lines {
        let achieved = match t.achievement {
            Some(a) if a >= 1.0 => Cell::new(pct(Some(a)).green()),
            Some(a) => Cell::new(pct(Some(a)).red()),
            None => Cell::new("-"),
        };
        table.add_row(vec![
            Cell::new(&t.season_code),
            Cell::new(&t.season_name),
            Cell::new(money(t.target_sales)),
            Cell::new(money(t.actual_sales)),
            achieved,
            Cell::new(pct(t.target_discount)),
            Cell::new(pct(t.actual_discount)),
        ]);
    }
    println!("Season targets vs CY actuals (HKD)\n{table}");
    Ok(())
}
