use crate::{
    crawler::twse,
    declare::{DailyQuoteRecord, Outcome, QuoteError, SnapshotRecord},
    logging, report,
    util::http::Fetch,
};

/// 轉成 Outcome，失敗時寫入日誌
fn settle<T: Default>(operation: &str, args: &str, result: Result<T, QuoteError>) -> Outcome<T> {
    let outcome = Outcome::from(result);

    match (outcome.kind(), outcome.message()) {
        (Some(kind), Some(message)) => logging::error_file_async(format!(
            "Failed to {}({}) because [{}] {}",
            operation, args, kind, message
        )),
        _ => logging::info_file_async(format!("{}({}) ok", operation, args)),
    }

    outcome
}

/// 取得即時股價資料，多檔以逗號分隔
pub async fn current_stock_info(
    fetcher: &dyn Fetch,
    stock_code: &str,
) -> Outcome<Vec<SnapshotRecord>> {
    settle(
        "current_stock_info",
        stock_code,
        twse::snapshot::visit(fetcher, stock_code).await,
    )
}

/// 取得指定股票及日期成交資訊
pub async fn daily_stock_info(
    fetcher: &dyn Fetch,
    stock_code: &str,
    stock_date: &str,
) -> Outcome<Option<DailyQuoteRecord>> {
    settle(
        "daily_stock_info",
        &format!("{} {}", stock_code, stock_date),
        twse::daily::visit(fetcher, stock_code, stock_date)
            .await
            .map(Some),
    )
}

/// 取得指定股票當月各日成交資訊，沒有任何交易日時視為查無資料
pub async fn monthly_stock_info(
    fetcher: &dyn Fetch,
    stock_code: &str,
    stock_month: &str,
) -> Outcome<Vec<DailyQuoteRecord>> {
    let result = twse::monthly::visit(fetcher, stock_code, stock_month)
        .await
        .and_then(|records| {
            if records.is_empty() {
                Err(QuoteError::not_found("無法取得當月的股票資料"))
            } else {
                Ok(records)
            }
        });

    settle(
        "monthly_stock_info",
        &format!("{} {}", stock_code, stock_month),
        result,
    )
}

/// 顯示即時股價資訊
pub async fn display_current_stock_info(fetcher: &dyn Fetch, stock_code: &str) -> String {
    let outcome = current_stock_info(fetcher, stock_code).await;
    if !outcome.is_success() || outcome.value.is_empty() {
        return format!("無法取得 {} 的即時股票資料", stock_code);
    }

    report::snapshot(&outcome.value)
}

/// 顯示股票指定日期的股價資訊
pub async fn display_daily_stock_info(
    fetcher: &dyn Fetch,
    stock_code: &str,
    stock_date: &str,
) -> String {
    match daily_stock_info(fetcher, stock_code, stock_date).await.value {
        Some(record) => report::daily(&record),
        None => format!("無法取得 {} {} 的當日股票資料", stock_code, stock_date),
    }
}

/// 顯示當月股價資訊
pub async fn display_monthly_stock_info(
    fetcher: &dyn Fetch,
    stock_code: &str,
    stock_month: &str,
) -> String {
    let outcome = monthly_stock_info(fetcher, stock_code, stock_month).await;
    if !outcome.is_success() || outcome.value.is_empty() {
        return format!("無法取得 {} {} 的當月股票資料", stock_code, stock_month);
    }

    report::monthly(stock_code, stock_month, &outcome.value)
}
