use colored::Colorize;

use crate::error::Result;
use crate::season::{is_off_season, parse_season};
use crate::settings::load_settings;

pub fn run(code: &str, fiscal_year: Option<i32>) -> Result<()> {
    let fy = fiscal_year.unwrap_or_else(|| load_settings().current_fiscal_year);
    let info = parse_season(code.trim(), fy);

    println!("Code:        {}", info.code);
    println!("Type:        {}", info.season_type.label());
    println!(
        "Year:        {}",
        info.year.map_or_else(|| "-".to_string(), |y| y.to_string())
    );
    println!("Bucket:      {} (vs FY{fy})", info.bucket.label());
    let verdict = if is_off_season(&info) {
        "yes".yellow().bold()
    } else {
        "no".green()
    };
    println!("Off-season:  {verdict}");
    Ok(())
}
