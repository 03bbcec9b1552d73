use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Cell helpers
// ---------------------------------------------------------------------------

/// Parse a numeric cell. Whitespace anywhere in the cell and comma thousands
/// separators are removed first; anything that still isn't a number is 0.
pub fn parse_number(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

pub fn parse_string(raw: Option<&str>) -> String {
    raw.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Parse a rate cell that may be written as a fraction (`0.125`), a percent
/// (`12.5%`) or a bare percentage (`12.5`). Blank or non-numeric cells are
/// `None` so a missing target is not read as a 0% target.
///
/// Without a `%` sign the magnitude decides: values up to and including 1 are
/// fractions, anything above 1 is a percentage. So `1` is 100% while `1.5`
/// is 1.5%; write `1%` or `0.01` for one percent.
pub fn parse_percent(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let (body, is_percent) = match raw.strip_suffix('%') {
        Some(body) => (body, true),
        None => (raw, false),
    };
    let cleaned: String = body
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    let value = cleaned.parse::<f64>().ok().filter(|v| v.is_finite())?;
    if is_percent || value.abs() > 1.0 {
        Some(value / 100.0)
    } else {
        Some(value)
    }
}

/// Calendar days in a `YYMM` accounting period, e.g. `2502` -> 28.
pub fn period_days(period: &str) -> Option<u32> {
    let period = period.trim();
    if period.len() != 4 || !period.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let yy: i32 = period[..2].parse().ok()?;
    let mm: u32 = period[2..].parse().ok()?;
    let start = NaiveDate::from_ymd_opt(2000 + yy, mm, 1)?;
    let next = if mm == 12 {
        NaiveDate::from_ymd_opt(2001 + yy, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(2000 + yy, mm + 1, 1)?
    };
    u32::try_from((next - start).num_days()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(Some("1,234.5")), 1234.5);
        assert_eq!(parse_number(Some("-42.50")), -42.5);
        assert_eq!(parse_number(Some("0")), 0.0);
    }

    #[test]
    fn test_parse_number_strips_internal_whitespace() {
        assert_eq!(parse_number(Some("  12 34 ")), 1234.0);
        assert_eq!(parse_number(Some("\t1 000,000\t")), 1_000_000.0);
    }

    #[test]
    fn test_parse_number_defaults_to_zero() {
        assert_eq!(parse_number(None), 0.0);
        assert_eq!(parse_number(Some("")), 0.0);
        assert_eq!(parse_number(Some("   ")), 0.0);
        assert_eq!(parse_number(Some("n/a")), 0.0);
        assert_eq!(parse_number(Some("NaN")), 0.0);
        assert_eq!(parse_number(Some("inf")), 0.0);
    }

    #[test]
    fn test_parse_string() {
        assert_eq!(parse_string(Some("  HK ")), "HK");
        assert_eq!(parse_string(None), "");
        assert_eq!(parse_string(Some("")), "");
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent(Some("12.5%")), Some(0.125));
        assert_eq!(parse_percent(Some("0.2")), Some(0.2));
        assert_eq!(parse_percent(Some("35")), Some(0.35));
        assert_eq!(parse_percent(Some("")), None);
        assert_eq!(parse_percent(None), None);
        assert_eq!(parse_percent(Some("tbc")), None);
    }

    #[test]
    fn test_parse_percent_fraction_boundary() {
        assert_eq!(parse_percent(Some("1")), Some(1.0));
        assert_eq!(parse_percent(Some("1%")), Some(0.01));
        assert_eq!(parse_percent(Some("1.5")), Some(0.015));
        assert_eq!(parse_percent(Some("-1")), Some(-1.0));
    }

    #[test]
    fn test_period_days() {
        assert_eq!(period_days("2512"), Some(31));
        assert_eq!(period_days("2502"), Some(28));
        assert_eq!(period_days("2402"), Some(29));
        assert_eq!(period_days("2513"), None);
        assert_eq!(period_days("25-1"), None);
        assert_eq!(period_days(""), None);
    }
}
