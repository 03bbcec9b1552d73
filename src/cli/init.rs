use crate::cli::SourceArgs;
use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path, shellexpand_path};

pub fn run(sources: &SourceArgs) -> Result<()> {
    let mut settings = load_settings();

    if let Some(fy) = sources.fiscal_year {
        settings.current_fiscal_year = fy;
    }
    let expand = |p: &Option<String>| p.as_deref().map(shellexpand_path);
    if sources.py.is_some() {
        settings.prior_year_file = expand(&sources.py);
    }
    if sources.cy.is_some() {
        settings.current_year_file = expand(&sources.cy);
    }
    if sources.graph.is_some() {
        settings.graph_file = expand(&sources.graph);
    }
    if sources.target.is_some() {
        settings.target_file = expand(&sources.target);
    }

    save_settings(&settings)?;
    println!("Settings saved to {}", settings_path().display());
    println!("Current fiscal year: {}", settings.current_fiscal_year);
    Ok(())
}
