use crate::{
    crawler::twse::monthly,
    declare::{DailyQuoteRecord, QuoteError},
    util::{datetime, http::Fetch},
};

/// 回傳第一筆日期(民國年 YYY/MM/DD)完全相同的資料
pub fn select_day<'a>(
    records: &'a [DailyQuoteRecord],
    target: &str,
) -> Option<&'a DailyQuoteRecord> {
    records.iter().find(|record| record.date == target)
}

/// 取得指定股票及日期的成交資訊
///
/// 證交所只提供整月的資料，所以先抓日期所在月份，再以民國年日期挑出當日。
pub async fn visit(
    fetcher: &dyn Fetch,
    stock_code: &str,
    stock_date: &str,
) -> Result<DailyQuoteRecord, QuoteError> {
    let stock_code = stock_code.trim();
    if stock_code.is_empty() {
        return Err(QuoteError::empty_input("股票代號不可為空"));
    }

    let stock_date = stock_date.trim();
    if stock_date.is_empty() {
        return Err(QuoteError::empty_input("股票日期不可為空"));
    }

    let date = datetime::normalize(stock_date)?;
    let records = monthly::fetch_month(fetcher, stock_code, &date).await?;
    let target = date.republic();

    select_day(&records, &target)
        .cloned()
        .ok_or_else(|| {
            QuoteError::not_found(format!(
                "無法取得指定日期的股票資料 ({} => {})",
                date.slash, target
            ))
        })
}
