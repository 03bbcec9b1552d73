use crate::csv_text::CsvRow;
use crate::fx::discount_rate;
use crate::models::{
    GraphAmounts, RawGraphRecord, RawInventoryRecord, RowError, SourceYear, TargetRow,
};
use crate::parse::{parse_number, parse_percent, parse_string};
use crate::season::parse_season;

// ---------------------------------------------------------------------------
// Column aliases
// ---------------------------------------------------------------------------

// The AC Sales headers are wrapped in the source workbook, so they show up
// either flattened or with the raw line break still inside the name.
const AC_SALES_QTY: &[&str] = &[
    "AC Sales (Qty)",
    "AC Sales\n(Qty)",
    "AC Sales\r\n(Qty)",
    "AC Sales  (Qty)",
];
const AC_SALES_COST: &[&str] = &[
    "AC Sales (Cost)",
    "AC Sales\n(Cost)",
    "AC Sales\r\n(Cost)",
    "AC Sales  (Cost)",
];
const AC_SALES_NET: &[&str] = &[
    "AC Sales (Net Amount)",
    "AC Sales\n(Net Amount)",
    "AC Sales\r\n(Net Amount)",
    "AC Sales  (Net Amount)",
];
const AC_SALES_GROSS: &[&str] = &[
    "AC Sales (Gross Sales)",
    "AC Sales\n(Gross Sales)",
    "AC Sales\r\n(Gross Sales)",
    "AC Sales  (Gross Sales)",
];

const GRAPH_PERIOD: &[&str] = &["Period", "PERIOD", "period"];
const GRAPH_YEAR: &[&str] = &["Year", "YEAR", "year"];
const GRAPH_SEASON: &[&str] = &["Season_Code", "Season Code", "SEASON_CODE", "SEASON"];
const GRAPH_GROSS: &[&str] = &["Gross_Sales", "Gross Sales", "Gross Sales ($)"];
const GRAPH_NET: &[&str] = &["Net_Sales", "Net Sales", "Net Sales ($)"];
const GRAPH_STOCK_PRICE: &[&str] = &["Stock_Price", "Stock Price", "Stock Price ($)"];
const GRAPH_STOCK_COST: &[&str] = &["Stock_Cost", "Stock Cost", "Stock Cost ($)"];
const GRAPH_COUNTRY: &[&str] = &["Country", "COUNTRY"];
const GRAPH_CATEGORY: &[&str] = &["Category", "CATEGORY", "CATEGORY NAME"];

const TARGET_PERIOD: &[&str] = &["PERIOD", "Period"];
const TARGET_SEASON_NAME: &[&str] = &["SEASON_NAME", "Season Name", "SEASON NAME"];
const TARGET_SEASON: &[&str] = &["SEASON", "Season", "SEASON_CODE"];
const TARGET_CATEGORY: &[&str] = &["CATEGORY", "Category"];
const TARGET_AMOUNT: &[&str] = &["AMOUNT", "Amount"];
const TARGET_TAG_SALES: &[&str] = &["TAG_SALES", "Tag Sales"];
const TARGET_NET_SALES: &[&str] = &["NET_SALES", "Net Sales"];
const TARGET_DISCOUNT: &[&str] = &["DISCOUNT_RATE", "Discount Rate"];

fn text(row: &CsvRow, key: &str) -> String {
    parse_string(row.get(key))
}

fn num(row: &CsvRow, key: &str) -> f64 {
    parse_number(row.get(key))
}

fn text_any(row: &CsvRow, keys: &[&str]) -> String {
    parse_string(row.get_any(keys))
}

fn num_any(row: &CsvRow, keys: &[&str]) -> f64 {
    parse_number(row.get_any(keys))
}

// ---------------------------------------------------------------------------
// Inventory detail
// ---------------------------------------------------------------------------

pub fn decode_inventory(
    row: &CsvRow,
    source_year: SourceYear,
) -> Result<RawInventoryRecord, RowError> {
    let record = RawInventoryRecord {
        period: text(row, "period"),
        country: text(row, "Country"),
        ex_rate: num(row, "Ex-rate"),
        item_code: text(row, "ITEM CODE"),
        item_desc1: text(row, "ITEM DESC1"),
        item_desc2: text(row, "ITEM DESC2"),
        store: text(row, "STORE"),
        store_name: text(row, "STORE NAME"),
        sales_div: text(row, "SALES DIV"),
        season: text(row, "SEASON"),
        brand: text(row, "BRAND"),
        brand_name: text(row, "BRAND NAME"),
        category: text(row, "CATEGORY"),
        category_name: text(row, "CATEGORY NAME"),
        subcategory: text(row, "SUBCATEGORY"),
        subcategory_name: text(row, "SUBCATEGORY NAME"),
        sales_qty: num(row, "Sales (Qty)"),
        ac_sales_qty: num_any(row, AC_SALES_QTY),
        stock_qty: num(row, "Stock (Qty)"),
        net_acp_c: num(row, "Net AcP.C"),
        net_acp_p: num(row, "Net AcP.P"),
        ac_sales_cost: num_any(row, AC_SALES_COST),
        ac_sales_net_amount: num_any(row, AC_SALES_NET),
        ac_sales_gross: num_any(row, AC_SALES_GROSS),
        gross_sales: num(row, "Gross Sales ($)"),
        net_sales: num(row, "Net Sales ($)"),
        cogs: num(row, "COGS ($)"),
        stock_cost: num(row, "Stock Cost ($)"),
        stock_price: num(row, "Stock Price ($)"),
        source_year: Some(source_year),
    };

    if record.period.is_empty()
        && record.country.is_empty()
        && record.item_code.is_empty()
        && record.store.is_empty()
    {
        return Err(RowError::BlankRow);
    }
    Ok(record)
}

// ---------------------------------------------------------------------------
// Trend (graph) extract
// ---------------------------------------------------------------------------

/// Four-digit year from the `Year` cell, else from the `YYMM` period prefix.
fn graph_year(year_cell: f64, period: &str) -> Option<i32> {
    if year_cell >= 1.0 {
        let y = year_cell.trunc() as i32;
        return Some(if y < 100 { 2000 + y } else { y });
    }
    let prefix = period.get(..2)?;
    if !prefix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    prefix.parse::<i32>().ok().map(|yy| 2000 + yy)
}

pub fn decode_graph(row: &CsvRow) -> Result<RawGraphRecord, RowError> {
    let period = text_any(row, GRAPH_PERIOD);
    let year = graph_year(num_any(row, GRAPH_YEAR), &period)
        .ok_or_else(|| RowError::MissingYear(period.clone()))?;

    Ok(RawGraphRecord {
        year,
        season_code: text_any(row, GRAPH_SEASON),
        country: text_any(row, GRAPH_COUNTRY),
        category: text_any(row, GRAPH_CATEGORY),
        amounts: GraphAmounts {
            gross_sales: num_any(row, GRAPH_GROSS),
            net_sales: num_any(row, GRAPH_NET),
            stock_price: num_any(row, GRAPH_STOCK_PRICE),
            stock_cost: num_any(row, GRAPH_STOCK_COST),
        },
        period,
    })
}

// ---------------------------------------------------------------------------
// Season targets
// ---------------------------------------------------------------------------

/// Targets carry no money conversion; the season is classified against
/// `current_fiscal_year` directly.
pub fn decode_target(row: &CsvRow, current_fiscal_year: i32) -> Result<TargetRow, RowError> {
    let season_code = text_any(row, TARGET_SEASON);
    let season_name = text_any(row, TARGET_SEASON_NAME);
    if season_code.is_empty() && season_name.is_empty() {
        return Err(RowError::MissingSeason);
    }

    let tag_sales = num_any(row, TARGET_TAG_SALES);
    let net_sales = num_any(row, TARGET_NET_SALES);
    let discount = parse_percent(row.get_any(TARGET_DISCOUNT))
        .or_else(|| discount_rate(net_sales, tag_sales));

    Ok(TargetRow {
        period: text_any(row, TARGET_PERIOD),
        category: text_any(row, TARGET_CATEGORY),
        amount: num_any(row, TARGET_AMOUNT),
        tag_sales,
        net_sales,
        discount_rate: discount,
        season: parse_season(&season_code, current_fiscal_year),
        season_code,
        season_name,
    })
}
