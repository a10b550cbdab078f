use concat_string::concat_string;

use crate::{
    config::SETTINGS,
    declare::{DailyQuoteRecord, QuoteError},
    util::{
        self,
        datetime::{self, NormalizedDate},
        http::Fetch,
        text::{split_quoted_fields, trim_quotes},
    },
};

/// 標題與欄位名稱兩行
const HEADER_LINES: usize = 2;
/// 日期、成交股數、成交金額、開盤價、最高價、最低價、收盤價、漲跌價差、成交筆數
const MIN_FIELDS: usize = 9;

/// 證交所會回傳 date 所在月份的全部交易日
pub fn build_url(stock_code: &str, query_date: &str) -> String {
    concat_string!(
        SETTINGS.twse.monthly_url,
        "&date=",
        query_date,
        "&stockNo=",
        urlencoding::encode(stock_code)
    )
}

/// 解析個股當月各日成交資訊
///
/// 第一行為標題，例如 `"114年01月 2330 台積電 各日成交資訊"`，以空白拆開後第三段為股票名稱。
/// 第三行起欄位數不足的列(空行、說明)直接略過。
pub fn parse(raw: &str, stock_code: &str) -> Result<Vec<DailyQuoteRecord>, QuoteError> {
    let mut lines = raw
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line));
    let stock_name = parse_stock_name(lines.next().unwrap_or_default())?;
    let mut records = Vec::with_capacity(23);

    for line in lines.skip(HEADER_LINES - 1) {
        let fields = split_quoted_fields(line);
        if fields.len() < MIN_FIELDS {
            continue;
        }

        records.push(to_record(stock_code, &stock_name, fields));
    }

    Ok(records)
}

fn parse_stock_name(title: &str) -> Result<String, QuoteError> {
    let first = split_quoted_fields(title).into_iter().next().unwrap_or_default();

    first
        .split(' ')
        .nth(2)
        .map(|name| trim_quotes(name).to_string())
        .ok_or_else(|| QuoteError::format(format!("無法從標題取得股票名稱: {}", title)))
}

fn to_record(stock_code: &str, stock_name: &str, fields: Vec<String>) -> DailyQuoteRecord {
    let mut fields = fields.into_iter();
    let mut next = || fields.next().unwrap_or_default();

    DailyQuoteRecord {
        stock_code: stock_code.to_string(),
        stock_name: stock_name.to_string(),
        date: next(),
        volume: next(),
        turnover: next(),
        opening_price: next(),
        highest_price: next(),
        lowest_price: next(),
        closing_price: next(),
        change: next(),
        transaction: next(),
    }
}

/// 下載並解析 date 所在月份的成交資訊，回應本文為 Big5
pub async fn fetch_month(
    fetcher: &dyn Fetch,
    stock_code: &str,
    date: &NormalizedDate,
) -> Result<Vec<DailyQuoteRecord>, QuoteError> {
    let bytes = fetcher.fetch(&build_url(stock_code, &date.query)).await?;
    let text = util::text::big5_2_utf8(&bytes);

    parse(&text, stock_code)
}

/// 抓取指定股票當月各日成交資訊
pub async fn visit(
    fetcher: &dyn Fetch,
    stock_code: &str,
    stock_month: &str,
) -> Result<Vec<DailyQuoteRecord>, QuoteError> {
    let stock_code = stock_code.trim();
    if stock_code.is_empty() {
        return Err(QuoteError::empty_input("股票代號不可為空"));
    }

    let stock_month = stock_month.trim();
    if stock_month.is_empty() {
        return Err(QuoteError::empty_input("股票月份不可為空"));
    }

    let date = datetime::normalize(stock_month)?;
    fetch_month(fetcher, stock_code, &date).await
}
