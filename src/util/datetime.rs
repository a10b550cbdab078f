use chrono::{Datelike, NaiveDate};

use crate::declare::QuoteError;

const DATE_FORMAT_ERROR: &str = "股票日期格式錯誤，應為YYYYMM、YYYY-MM、YYYYMMDD或YYYY-MM-DD";

/// 正規化後的查詢日期
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDate {
    /// 西元年 YYYY/MM/DD
    pub slash: String,
    /// 交易所查詢參數 YYYYMMDD
    pub query: String,
    date: NaiveDate,
}

impl NormalizedDate {
    /// 民國年日期 YYY/MM/DD，用來比對交易所回傳的日期欄位
    pub fn republic(&self) -> String {
        to_republic_date(self.date)
    }
}

/// 將輸入的日期或月份轉成交易所查詢用的 YYYYMMDD
///
/// 接受 202501、2025-01、20250115、2025-01-15 四種格式，只給月份時日期補 01。
pub fn normalize(input: &str) -> Result<NormalizedDate, QuoteError> {
    if !input.is_ascii() {
        return Err(QuoteError::format(DATE_FORMAT_ERROR));
    }

    let slash = match input.len() {
        // 202501 => 2025/01/01
        6 => format!("{}/{}/01", &input[..4], &input[4..]),
        // 2025-01 => 2025/01/01
        7 => format!("{}/01", input.replace('-', "/")),
        // 20250115 => 2025/01/15
        8 => format!("{}/{}/{}", &input[..4], &input[4..6], &input[6..]),
        // 2025-01-15 => 2025/01/15
        10 => input.replace('-', "/"),
        _ => return Err(QuoteError::format(DATE_FORMAT_ERROR)),
    };

    let query = slash.replace(['/', '-'], "");
    if query.len() != 8 || !query.bytes().all(|b| b.is_ascii_digit()) {
        return Err(QuoteError::format(DATE_FORMAT_ERROR));
    }

    let date = NaiveDate::parse_from_str(&query, "%Y%m%d")
        .map_err(|why| QuoteError::format(format!("{} ({}: {})", DATE_FORMAT_ERROR, input, why)))?;

    Ok(NormalizedDate { slash, query, date })
}

/// Convert Gregorian year to ROC year.
pub fn gregorian_year_to_roc_year(year: i32) -> i32 {
    year - 1911
}

/// 西元日期轉成民國年格式 YYY/MM/DD，年份不補零
pub fn to_republic_date(date: NaiveDate) -> String {
    format!(
        "{}/{:02}/{:02}",
        gregorian_year_to_roc_year(date.year()),
        date.month(),
        date.day()
    )
}
