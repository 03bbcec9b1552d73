fn with_commas(val: f64) -> String {
    let whole = format!("{:.0}", val.abs());
    let mut out = String::new();
    for (i, c) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    let out: String = out.chars().rev().collect();
    if val < 0.0 && out != "0" {
        format!("-{out}")
    } else {
        out
    }
}

/// Format an HKD amount with thousands separators: HK$1,234
pub fn money(val: f64) -> String {
    let s = with_commas(val);
    match s.strip_prefix('-') {
        Some(abs) => format!("-HK${abs}"),
        None => format!("HK${s}"),
    }
}

pub fn qty(val: f64) -> String {
    with_commas(val)
}

/// Rates print as percentages; a missing rate prints as a dash, not 0%.
pub fn pct(val: Option<f64>) -> String {
    match val {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => "-".to_string(),
    }
}

pub fn days(val: Option<f64>) -> String {
    match val {
        Some(v) => format!("{v:.0}"),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "HK$1,235");
        assert_eq!(money(-500.0), "-HK$500");
        assert_eq!(money(0.0), "HK$0");
        assert_eq!(money(-0.2), "HK$0");
        assert_eq!(money(1000000.4), "HK$1,000,000");
    }

    #[test]
    fn test_pct() {
        assert_eq!(pct(Some(0.1)), "10.0%");
        assert_eq!(pct(Some(-0.125)), "-12.5%");
        assert_eq!(pct(None), "-");
    }

    #[test]
    fn test_days_and_qty() {
        assert_eq!(days(Some(45.4)), "45");
        assert_eq!(days(None), "-");
        assert_eq!(qty(12345.0), "12,345");
        assert_eq!(qty(-7.0), "-7");
    }
}
