use std::path::Path;

use crate::error::Result;
use crate::models::SourceYear;
use crate::settings::{load_settings, settings_path};

fn file_line(label: &str, path: &Option<String>) {
    match path {
        Some(p) if Path::new(p).exists() => println!("{label:<12}{p}"),
        Some(p) => println!("{label:<12}{p} (missing)"),
        None => println!("{label:<12}(not set)"),
    }
}

pub fn run() -> Result<()> {
    let settings = load_settings();

    println!("Settings:   {}", settings_path().display());
    println!(
        "Fiscal year: CY {} / PY {}",
        settings.current_fiscal_year,
        SourceYear::Prior.reference_year(settings.current_fiscal_year)
    );
    println!();
    file_line("PY file:", &settings.prior_year_file);
    file_line("CY file:", &settings.current_year_file);
    file_line("Graph file:", &settings.graph_file);
    file_line("Target:", &settings.target_file);

    if settings.prior_year_file.is_none() || settings.current_year_file.is_none() {
        println!();
        println!("PY and CY files are required. Run `offseason init --py <file> --cy <file>`.");
    }
    Ok(())
}
