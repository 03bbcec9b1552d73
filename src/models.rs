use serde::Serialize;
use thiserror::Error;

/// Which comparison extract a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceYear {
    #[serde(rename = "PY")]
    Prior,
    #[serde(rename = "CY")]
    Current,
}

impl SourceYear {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Prior => "PY",
            Self::Current => "CY",
        }
    }

    /// Fiscal year the file's season codes are read against.
    pub fn reference_year(&self, current_fiscal_year: i32) -> i32 {
        match self {
            Self::Prior => current_fiscal_year.saturating_sub(1),
            Self::Current => current_fiscal_year,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SeasonType {
    #[serde(rename = "FW")]
    FallWinter,
    #[serde(rename = "SS")]
    Spring,
    #[serde(rename = "ACC")]
    Accessory,
    Other,
}

impl SeasonType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::FallWinter => "FW",
            Self::Spring => "SS",
            Self::Accessory => "ACC",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum YearBucket {
    #[serde(rename = "current")]
    Current,
    #[serde(rename = "1yr")]
    OneYearPast,
    #[serde(rename = "2yr")]
    TwoYearsPast,
    #[serde(rename = "3yr+")]
    ThreePlusYearsPast,
}

impl YearBucket {
    pub const PAST: [YearBucket; 3] = [
        YearBucket::OneYearPast,
        YearBucket::TwoYearsPast,
        YearBucket::ThreePlusYearsPast,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Current => "Current season",
            Self::OneYearPast => "1 year past",
            Self::TwoYearsPast => "2 years past",
            Self::ThreePlusYearsPast => "3+ years past",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonInfo {
    pub code: String,
    pub season_type: SeasonType,
    pub year: Option<i32>,
    pub bucket: YearBucket,
}

/// One line of a PY/CY inventory extract, before currency normalization.
/// Absent or unparseable numbers are 0 and absent strings are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawInventoryRecord {
    pub period: String,
    pub country: String,
    pub ex_rate: f64,
    pub item_code: String,
    pub item_desc1: String,
    pub item_desc2: String,
    pub store: String,
    pub store_name: String,
    pub sales_div: String,
    pub season: String,
    pub brand: String,
    pub brand_name: String,
    pub category: String,
    pub category_name: String,
    pub subcategory: String,
    pub subcategory_name: String,
    pub sales_qty: f64,
    pub ac_sales_qty: f64,
    pub stock_qty: f64,
    pub net_acp_c: f64,
    pub net_acp_p: f64,
    pub ac_sales_cost: f64,
    pub ac_sales_net_amount: f64,
    pub ac_sales_gross: f64,
    pub gross_sales: f64,
    pub net_sales: f64,
    pub cogs: f64,
    pub stock_cost: f64,
    pub stock_price: f64,
    pub source_year: Option<SourceYear>,
}

/// Monetary fields converted into the reporting currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InventoryAmounts {
    pub gross_sales: f64,
    pub net_sales: f64,
    pub stock_price: f64,
    pub stock_cost: f64,
    pub ac_sales_gross: f64,
    pub net_acp_p: f64,
    pub ac_sales_cost: f64,
    pub ac_sales_net_amount: f64,
    pub cogs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRow {
    pub raw: RawInventoryRecord,
    pub fx_rate: f64,
    pub normalized: InventoryAmounts,
    /// `None` when there were no gross sales, never 0.
    pub discount_rate: Option<f64>,
    pub season: SeasonInfo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GraphAmounts {
    pub gross_sales: f64,
    pub net_sales: f64,
    pub stock_price: f64,
    pub stock_cost: f64,
}

/// Decoded trend-extract line, before classification and conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGraphRecord {
    pub period: String,
    pub year: i32,
    pub season_code: String,
    pub country: String,
    pub category: String,
    pub amounts: GraphAmounts,
}

/// One period of the long-range trend extract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphRow {
    pub period: String,
    pub year: i32,
    pub season_code: String,
    pub country: String,
    pub category: String,
    pub raw: GraphAmounts,
    pub fx_rate: f64,
    pub normalized: GraphAmounts,
    pub discount_rate: Option<f64>,
    pub season: SeasonInfo,
}

/// A planning target. Files carry either a single `AMOUNT` or the
/// `TAG_SALES`/`NET_SALES`/`DISCOUNT_RATE` triple; absent columns are 0/None.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetRow {
    pub period: String,
    pub season_name: String,
    pub season_code: String,
    pub category: String,
    pub amount: f64,
    pub tag_sales: f64,
    pub net_sales: f64,
    pub discount_rate: Option<f64>,
    pub season: SeasonInfo,
}

impl TargetRow {
    /// Sales target: `AMOUNT` when given, otherwise the net sales target.
    pub fn sales_target(&self) -> f64 {
        if self.amount != 0.0 {
            self.amount
        } else {
            self.net_sales
        }
    }
}

// ---------------------------------------------------------------------------
// Per-row outcomes
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("row has no period, country, item or store")]
    BlankRow,

    #[error("no year in Year column or period '{0}'")]
    MissingYear(String),

    #[error("row has no season code or season name")]
    MissingSeason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub line: usize,
    pub reason: RowError,
}

/// Result of decoding one file: the rows that made it and the ones that didn't.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedRow>,
    /// Lines the tokenizer rejected for missing fields.
    pub dropped_lines: Vec<usize>,
}

impl<T> Default for Batch<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
            dropped_lines: Vec::new(),
        }
    }
}
