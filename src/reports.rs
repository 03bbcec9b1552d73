use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::fx::discount_rate;
use crate::models::{GraphRow, InventoryRow, TargetRow, YearBucket};
use crate::parse::period_days;
use crate::season::{is_off_season, is_off_season_fw};

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub rows: usize,
    pub gross_sales: f64,
    pub net_sales: f64,
    pub discount_rate: Option<f64>,
    pub sales_qty: f64,
    pub cogs: f64,
    /// Latest period present; stock figures are taken from it.
    pub ending_period: Option<String>,
    pub stock_qty: f64,
    pub stock_cost: f64,
    pub stock_price: f64,
    /// Days of COGS the ending stock covers.
    pub inventory_days: Option<f64>,
}

impl SummaryMetrics {
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a InventoryRow>) -> Self {
        let rows: Vec<&InventoryRow> = rows.into_iter().collect();
        let mut m = SummaryMetrics {
            rows: rows.len(),
            ..SummaryMetrics::default()
        };

        let mut periods = BTreeSet::new();
        for r in &rows {
            m.gross_sales += r.normalized.gross_sales;
            m.net_sales += r.normalized.net_sales;
            m.cogs += r.normalized.cogs;
            m.sales_qty += r.raw.sales_qty;
            if !r.raw.period.is_empty() {
                periods.insert(r.raw.period.as_str());
            }
        }

        // Period codes are YYMM so lexical order is chronological.
        let ending = periods.iter().next_back().copied();
        for r in rows.iter().filter(|r| ending.map_or(true, |p| r.raw.period == p)) {
            m.stock_qty += r.raw.stock_qty;
            m.stock_cost += r.normalized.stock_cost;
            m.stock_price += r.normalized.stock_price;
        }

        let days: u32 = periods.iter().filter_map(|p| period_days(p)).sum();
        if m.cogs > 0.0 && days > 0 {
            m.inventory_days = Some(m.stock_cost / (m.cogs / f64::from(days)));
        }
        m.discount_rate = discount_rate(m.net_sales, m.gross_sales);
        m.ending_period = ending.map(str::to_string);
        m
    }
}

fn change(prior: f64, current: f64) -> Option<f64> {
    if prior > 0.0 {
        Some((current - prior) / prior)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Past-season buckets, PY vs CY
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct BucketLine {
    pub label: &'static str,
    pub prior: SummaryMetrics,
    pub current: SummaryMetrics,
    pub net_sales_change: Option<f64>,
}

impl BucketLine {
    fn new(label: &'static str, prior: SummaryMetrics, current: SummaryMetrics) -> Self {
        let net_sales_change = change(prior.net_sales, current.net_sales);
        Self {
            label,
            prior,
            current,
            net_sales_change,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketReport {
    pub lines: Vec<BucketLine>,
    pub total: BucketLine,
}

fn in_bucket(rows: &[InventoryRow], bucket: YearBucket) -> SummaryMetrics {
    SummaryMetrics::from_rows(
        rows.iter()
            .filter(|r| is_off_season_fw(r) && r.season.bucket == bucket),
    )
}

pub fn bucket_report(prior: &[InventoryRow], current: &[InventoryRow]) -> BucketReport {
    let lines = YearBucket::PAST
        .iter()
        .map(|&b| BucketLine::new(b.label(), in_bucket(prior, b), in_bucket(current, b)))
        .collect();

    let total = BucketLine::new(
        "Total off-season",
        SummaryMetrics::from_rows(prior.iter().filter(|r| is_off_season_fw(r))),
        SummaryMetrics::from_rows(current.iter().filter(|r| is_off_season_fw(r))),
    );

    BucketReport { lines, total }
}

// ---------------------------------------------------------------------------
// Category breakdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CategoryLine {
    pub category: String,
    pub metrics: SummaryMetrics,
}

fn category_key(row: &InventoryRow) -> String {
    if !row.raw.category_name.is_empty() {
        row.raw.category_name.clone()
    } else if !row.raw.category.is_empty() {
        row.raw.category.clone()
    } else {
        "(none)".to_string()
    }
}

/// Off-season metrics per category, largest net sales first.
pub fn category_report(rows: &[InventoryRow]) -> Vec<CategoryLine> {
    let mut groups: BTreeMap<String, Vec<&InventoryRow>> = BTreeMap::new();
    for r in rows.iter().filter(|r| is_off_season_fw(r)) {
        groups.entry(category_key(r)).or_default().push(r);
    }

    let mut lines: Vec<CategoryLine> = groups
        .into_iter()
        .map(|(category, rows)| CategoryLine {
            category,
            metrics: SummaryMetrics::from_rows(rows),
        })
        .collect();
    lines.sort_by(|a, b| b.metrics.net_sales.total_cmp(&a.metrics.net_sales));
    lines
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub period: String,
    pub gross_sales: f64,
    pub net_sales: f64,
    pub discount_rate: Option<f64>,
    pub stock_price: f64,
    pub stock_cost: f64,
}

/// Off-season totals per period, oldest first.
pub fn trend_report(rows: &[GraphRow]) -> Vec<TrendPoint> {
    let mut points: BTreeMap<(i32, String), TrendPoint> = BTreeMap::new();
    for r in rows.iter().filter(|r| is_off_season(&r.season)) {
        let p = points
            .entry((r.year, r.period.clone()))
            .or_insert_with(|| TrendPoint {
                year: r.year,
                period: r.period.clone(),
                ..TrendPoint::default()
            });
        p.gross_sales += r.normalized.gross_sales;
        p.net_sales += r.normalized.net_sales;
        p.stock_price += r.normalized.stock_price;
        p.stock_cost += r.normalized.stock_cost;
    }
    points
        .into_values()
        .map(|mut p| {
            p.discount_rate = discount_rate(p.net_sales, p.gross_sales);
            p
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetLine {
    pub season_code: String,
    pub season_name: String,
    pub target_sales: f64,
    pub actual_sales: f64,
    pub achievement: Option<f64>,
    pub target_discount: Option<f64>,
    pub actual_discount: Option<f64>,
}

/// Tag-weighted mean of the rates the target rows carry. Rows without tag
/// sales count equally when no row in the group has any.
fn weighted_target_discount(group: &[&TargetRow]) -> Option<f64> {
    let rated: Vec<(f64, f64)> = group
        .iter()
        .filter_map(|t| t.discount_rate.map(|d| (d, t.tag_sales.max(0.0))))
        .collect();
    if rated.is_empty() {
        return None;
    }
    let weight: f64 = rated.iter().map(|(_, w)| w).sum();
    if weight > 0.0 {
        Some(rated.iter().map(|(d, w)| d * w).sum::<f64>() / weight)
    } else {
        Some(rated.iter().map(|(d, _)| d).sum::<f64>() / rated.len() as f64)
    }
}

/// Compare targets with CY actuals for the same season code. Actuals are
/// matched on the code alone, not through the off-season filter.
pub fn target_report(targets: &[TargetRow], current: &[InventoryRow]) -> Vec<TargetLine> {
    let mut groups: BTreeMap<String, Vec<&TargetRow>> = BTreeMap::new();
    for t in targets {
        let key = if t.season_code.is_empty() {
            t.season_name.clone()
        } else {
            t.season_code.clone()
        };
        groups.entry(key).or_default().push(t);
    }

    groups
        .into_iter()
        .map(|(code, group)| {
            let target_sales: f64 = group.iter().map(|t| t.sales_target()).sum();
            let tag: f64 = group.iter().map(|t| t.tag_sales).sum();
            let net: f64 = group.iter().map(|t| t.net_sales).sum();
            let target_discount =
                weighted_target_discount(&group).or_else(|| discount_rate(net, tag));

            let actual: Vec<&InventoryRow> =
                current.iter().filter(|r| r.raw.season == code).collect();
            let actual_sales: f64 = actual.iter().map(|r| r.normalized.net_sales).sum();
            let actual_gross: f64 = actual.iter().map(|r| r.normalized.gross_sales).sum();

            TargetLine {
                season_name: group
                    .iter()
                    .map(|t| t.season_name.as_str())
                    .find(|n| !n.is_empty())
                    .unwrap_or_default()
                    .to_string(),
                achievement: (target_sales > 0.0).then(|| actual_sales / target_sales),
                actual_discount: discount_rate(actual_sales, actual_gross),
                season_code: code,
                target_sales,
                actual_sales,
                target_discount,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::apply_fx;
    use crate::loader::load_targets;
    use crate::models::{GraphAmounts, RawInventoryRecord, SourceYear};
    use crate::season::parse_season;

    fn inv(period: &str, season: &str, source: SourceYear, gross: f64, net: f64) -> InventoryRow {
        let raw = RawInventoryRecord {
            period: period.to_string(),
            country: "HK".to_string(),
            season: season.to_string(),
            category_name: "Coats".to_string(),
            gross_sales: gross,
            net_sales: net,
            cogs: net / 2.0,
            stock_qty: 2.0,
            stock_cost: 100.0,
            stock_price: 250.0,
            sales_qty: 1.0,
            source_year: Some(source),
            ..RawInventoryRecord::default()
        };
        let season = parse_season(season, source.reference_year(25));
        apply_fx(raw, season)
    }

    #[test]
    fn test_summary_metrics() {
        let rows = vec![
            inv("2511", "24F", SourceYear::Current, 1000.0, 800.0),
            inv("2512", "24F", SourceYear::Current, 1000.0, 700.0),
        ];
        let m = SummaryMetrics::from_rows(&rows);
        assert_eq!(m.rows, 2);
        assert_eq!(m.gross_sales, 2000.0);
        assert_eq!(m.net_sales, 1500.0);
        assert!((m.discount_rate.unwrap() - 0.25).abs() < 1e-9);
        assert_eq!(m.ending_period.as_deref(), Some("2512"));
        // Stock comes from the ending period only.
        assert_eq!(m.stock_cost, 100.0);
        assert_eq!(m.stock_qty, 2.0);
        assert_eq!(m.cogs, 750.0);
        // 30 + 31 days of COGS: 100 / (750 / 61)
        let days = m.inventory_days.unwrap();
        assert!((days - 100.0 / (750.0 / 61.0)).abs() < 1e-9);
    }

    #[test]
    fn test_summary_metrics_empty() {
        let m = SummaryMetrics::from_rows(&Vec::<InventoryRow>::new());
        assert_eq!(m.rows, 0);
        assert_eq!(m.discount_rate, None);
        assert_eq!(m.inventory_days, None);
        assert_eq!(m.ending_period, None);
    }

    #[test]
    fn test_bucket_report() {
        let prior = vec![
            inv("2412", "23F", SourceYear::Prior, 500.0, 400.0),
            inv("2412", "24F", SourceYear::Prior, 900.0, 800.0),
        ];
        let current = vec![
            inv("2512", "24F", SourceYear::Current, 1000.0, 600.0),
            inv("2512", "21F", SourceYear::Current, 300.0, 100.0),
            inv("2512", "24S", SourceYear::Current, 999.0, 999.0),
        ];
        let report = bucket_report(&prior, &current);
        assert_eq!(report.lines.len(), 3);

        let one = &report.lines[0];
        assert_eq!(one.prior.net_sales, 400.0);
        assert_eq!(one.current.net_sales, 600.0);
        assert!((one.net_sales_change.unwrap() - 0.5).abs() < 1e-9);

        assert_eq!(report.lines[1].current.rows, 0);
        assert_eq!(report.lines[2].current.net_sales, 100.0);
        assert_eq!(report.total.current.rows, 2);
        assert_eq!(report.total.prior.rows, 1);
    }

    #[test]
    fn test_category_report_sorted_by_net_sales() {
        let mut small = inv("2512", "23F", SourceYear::Current, 100.0, 50.0);
        small.raw.category_name = String::new();
        small.raw.category = "K1".to_string();
        let rows = vec![
            small,
            inv("2512", "24F", SourceYear::Current, 1000.0, 900.0),
            inv("2512", "25F", SourceYear::Current, 5000.0, 5000.0),
        ];
        let lines = category_report(&rows);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].category, "Coats");
        assert_eq!(lines[1].category, "K1");
    }

    fn graph(year: i32, period: &str, season: &str, gross: f64, net: f64) -> GraphRow {
        let amounts = GraphAmounts {
            gross_sales: gross,
            net_sales: net,
            stock_price: 10.0,
            stock_cost: 4.0,
        };
        GraphRow {
            period: period.to_string(),
            year,
            season_code: season.to_string(),
            country: "HK".to_string(),
            category: String::new(),
            raw: amounts,
            fx_rate: 1.0,
            normalized: amounts,
            discount_rate: discount_rate(net, gross),
            season: parse_season(season, year % 100),
        }
    }

    #[test]
    fn test_trend_report() {
        let rows = vec![
            graph(2025, "2502", "24F", 100.0, 80.0),
            graph(2024, "2402", "23F", 50.0, 25.0),
            graph(2025, "2502", "23F", 100.0, 60.0),
            graph(2025, "2502", "25F", 1000.0, 1000.0),
        ];
        let points = trend_report(&rows);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].period, "2402");
        assert_eq!(points[1].gross_sales, 200.0);
        assert_eq!(points[1].net_sales, 140.0);
        assert_eq!(points[1].stock_cost, 8.0);
        assert!((points[1].discount_rate.unwrap() - 0.3).abs() < 1e-9);
    }

    fn target(code: &str, amount: f64) -> TargetRow {
        TargetRow {
            period: "2512".to_string(),
            season_name: format!("FW{}", &code[..2]),
            season_code: code.to_string(),
            category: "Coats".to_string(),
            amount,
            tag_sales: 0.0,
            net_sales: 0.0,
            discount_rate: Some(0.3),
            season: parse_season(code, 25),
        }
    }

    #[test]
    fn test_target_report() {
        let targets = vec![target("24F", 1000.0), target("24F", 500.0), target("23F", 0.0)];
        let current = vec![
            inv("2512", "24F", SourceYear::Current, 1000.0, 750.0),
            inv("2512", "24S", SourceYear::Current, 1000.0, 750.0),
        ];
        let lines = target_report(&targets, &current);
        assert_eq!(lines.len(), 2);

        let fw23 = &lines[0];
        assert_eq!(fw23.season_code, "23F");
        assert_eq!(fw23.achievement, None);
        assert_eq!(fw23.actual_discount, None);

        let fw24 = &lines[1];
        assert_eq!(fw24.season_name, "FW24");
        assert_eq!(fw24.target_sales, 1500.0);
        assert_eq!(fw24.actual_sales, 750.0);
        assert!((fw24.achievement.unwrap() - 0.5).abs() < 1e-9);
        assert!((fw24.target_discount.unwrap() - 0.3).abs() < 1e-9);
        assert!((fw24.actual_discount.unwrap() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_target_report_prefers_stated_discount() {
        let text = "PERIOD,SEASON_NAME,SEASON,CATEGORY,TAG_SALES,NET_SALES,DISCOUNT_RATE\n\
                    2512,FW24,24F,Coats,1000,600,35%\n";
        let targets = load_targets(text, 25).records;
        assert_eq!(targets[0].discount_rate, Some(0.35));

        let lines = target_report(&targets, &[]);
        assert!((lines[0].target_discount.unwrap() - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_target_report_weights_stated_discounts_by_tag_sales() {
        let mut a = target("24F", 0.0);
        a.tag_sales = 3000.0;
        a.discount_rate = Some(0.2);
        let mut b = target("24F", 0.0);
        b.tag_sales = 1000.0;
        b.discount_rate = Some(0.4);
        let mut unrated = target("24F", 0.0);
        unrated.tag_sales = 5000.0;
        unrated.net_sales = 5000.0;
        unrated.discount_rate = None;

        let lines = target_report(&[a, b, unrated], &[]);
        assert!((lines[0].target_discount.unwrap() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_target_report_derives_discount_when_none_stated() {
        let mut t = target("24F", 0.0);
        t.tag_sales = 1000.0;
        t.net_sales = 700.0;
        t.discount_rate = None;

        let lines = target_report(&[t], &[]);
        assert!((lines[0].target_discount.unwrap() - 0.3).abs() < 1e-9);
    }
}
