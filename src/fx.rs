use crate::models::{GraphAmounts, InventoryAmounts, InventoryRow, RawInventoryRecord, SeasonInfo};

/// Reporting currency is HKD. Local units per HKD, by country code.
const FX_RATES: &[(&str, f64)] = &[("HK", 1.0), ("MC", 1.03), ("TW", 4.02)];

pub fn fx_rate(country: &str) -> f64 {
    FX_RATES
        .iter()
        .find(|(code, _)| *code == country)
        .map(|(_, rate)| *rate)
        .unwrap_or(1.0)
}

/// Convert a local-currency amount to HKD. HK amounts pass through untouched.
pub fn normalize_amount(country: &str, amount: f64) -> f64 {
    if country == "HK" {
        amount
    } else {
        amount / fx_rate(country)
    }
}

/// `1 - net / gross`, or `None` when there were no gross sales.
pub fn discount_rate(net_sales: f64, gross_sales: f64) -> Option<f64> {
    if gross_sales > 0.0 {
        Some(1.0 - net_sales / gross_sales)
    } else {
        None
    }
}

pub fn apply_fx(raw: RawInventoryRecord, season: SeasonInfo) -> InventoryRow {
    let c = raw.country.as_str();
    let normalized = InventoryAmounts {
        gross_sales: normalize_amount(c, raw.gross_sales),
        net_sales: normalize_amount(c, raw.net_sales),
        stock_price: normalize_amount(c, raw.stock_price),
        stock_cost: normalize_amount(c, raw.stock_cost),
        ac_sales_gross: normalize_amount(c, raw.ac_sales_gross),
        net_acp_p: normalize_amount(c, raw.net_acp_p),
        ac_sales_cost: normalize_amount(c, raw.ac_sales_cost),
        ac_sales_net_amount: normalize_amount(c, raw.ac_sales_net_amount),
        cogs: normalize_amount(c, raw.cogs),
    };
    InventoryRow {
        fx_rate: fx_rate(c),
        discount_rate: discount_rate(normalized.net_sales, normalized.gross_sales),
        normalized,
        season,
        raw,
    }
}

/// Graph-extract counterpart of [`apply_fx`]: returns the rate, the HKD
/// amounts and the discount rate.
pub fn apply_fx_graph(country: &str, raw: &GraphAmounts) -> (f64, GraphAmounts, Option<f64>) {
    let normalized = GraphAmounts {
        gross_sales: normalize_amount(country, raw.gross_sales),
        net_sales: normalize_amount(country, raw.net_sales),
        stock_price: normalize_amount(country, raw.stock_price),
        stock_cost: normalize_amount(country, raw.stock_cost),
    };
    let discount = discount_rate(normalized.net_sales, normalized.gross_sales);
    (fx_rate(country), normalized, discount)
}
