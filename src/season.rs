use crate::models::{InventoryRow, SeasonInfo, SeasonType, YearBucket};

/// Classify a season code such as `24F` against a two-digit fiscal year.
///
/// The trailing letter picks the season type and the leading digits the
/// season year. Only Fall/Winter codes with a numeric year are bucketed by
/// age; everything else is treated as in-season.
pub fn parse_season(code: &str, current_fiscal_year: i32) -> SeasonInfo {
    let Some(last) = code.chars().last() else {
        return SeasonInfo {
            code: String::new(),
            season_type: SeasonType::Other,
            year: None,
            bucket: YearBucket::Current,
        };
    };

    let season_type = match last {
        'F' => SeasonType::FallWinter,
        'S' => SeasonType::Spring,
        'N' => SeasonType::Accessory,
        _ => SeasonType::Other,
    };

    let year_part = &code[..code.len() - last.len_utf8()];
    let year = if !year_part.is_empty() && year_part.chars().all(|c| c.is_ascii_digit()) {
        year_part.parse::<i32>().ok()
    } else {
        None
    };

    let bucket = match (season_type, year) {
        (SeasonType::FallWinter, Some(y)) => {
            bucket_for_diff(current_fiscal_year.saturating_sub(y))
        }
        _ => YearBucket::Current,
    };

    SeasonInfo {
        code: code.to_string(),
        season_type,
        year,
        bucket,
    }
}

fn bucket_for_diff(diff: i32) -> YearBucket {
    match diff {
        d if d <= 0 => YearBucket::Current,
        1 => YearBucket::OneYearPast,
        2 => YearBucket::TwoYearsPast,
        _ => YearBucket::ThreePlusYearsPast,
    }
}

pub fn is_past_bucket(bucket: YearBucket) -> bool {
    bucket != YearBucket::Current
}

/// Whether a season belongs in past-season (off-season) Fall/Winter reporting.
pub fn is_off_season(season: &SeasonInfo) -> bool {
    season.season_type == SeasonType::FallWinter && is_past_bucket(season.bucket)
}

pub fn is_off_season_fw(row: &InventoryRow) -> bool {
    is_off_season(&row.season)
}
