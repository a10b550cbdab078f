use std::fmt::Write as _;

use crate::declare::{DailyQuoteRecord, SnapshotRecord};

const SEPARATOR_WIDTH: usize = 50;

fn separator(out: &mut String) {
    out.push_str(&"-".repeat(SEPARATOR_WIDTH));
    out.push('\n');
}

fn line(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "{}: {}", label, value);
}

/// 即時股價資訊
pub fn snapshot(records: &[SnapshotRecord]) -> String {
    let mut out = String::with_capacity(256 * (records.len() + 1));
    out.push_str("即時股價資訊：\n");
    separator(&mut out);

    for record in records {
        line(&mut out, "股票代號", &record.stock_code);
        line(&mut out, "股票名稱", &record.stock_name);
        line(&mut out, "當前價格", &record.current_price);
        line(&mut out, "最高價格", &record.highest_price);
        line(&mut out, "最低價格", &record.lowest_price);
        separator(&mut out);
    }

    out
}

fn trading_fields(out: &mut String, record: &DailyQuoteRecord) {
    line(out, "交易日期", &record.date);
    line(out, "成交股數", &record.volume);
    line(out, "成交金額", &record.turnover);
    line(out, "開盤價格", &record.opening_price);
    line(out, "最高價格", &record.highest_price);
    line(out, "最低價格", &record.lowest_price);
    line(out, "收盤價格", &record.closing_price);
    line(out, "成交漲跌", &record.change);
    line(out, "成交筆數", &record.transaction);
}

/// 股票指定日期的股價資訊
pub fn daily(record: &DailyQuoteRecord) -> String {
    let mut out = String::with_capacity(512);
    line(&mut out, "股票代號", &record.stock_code);
    line(&mut out, "股票名稱", &record.stock_name);
    trading_fields(&mut out, record);
    out
}

/// 當月各交易日股價資訊，依交易所回傳順序
pub fn monthly(stock_code: &str, stock_month: &str, records: &[DailyQuoteRecord]) -> String {
    let mut out = String::with_capacity(512 * (records.len() + 1));
    line(&mut out, "股票代號", stock_code);
    line(&mut out, "股票月份", stock_month);
    separator(&mut out);

    for record in records {
        trading_fields(&mut out, record);
        separator(&mut out);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot() {
        let text = snapshot(&[SnapshotRecord {
            stock_code: "2330".to_string(),
            stock_name: "台積電".to_string(),
            current_price: "1075.0000".to_string(),
            highest_price: "1085.0000".to_string(),
            lowest_price: "1065.0000".to_string(),
        }]);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "即時股價資訊：");
        assert_eq!(lines[1], "-".repeat(50));
        assert_eq!(lines[2], "股票代號: 2330");
        assert_eq!(lines[4], "當前價格: 1075.0000");
        assert_eq!(lines[6], "最低價格: 1065.0000");
        assert_eq!(lines[7], "-".repeat(50));
        assert_eq!(lines.len(), 8);
    }

    #[test]
    fn test_daily() {
        let text = daily(&DailyQuoteRecord {
            stock_code: "2330".to_string(),
            stock_name: "台積電".to_string(),
            date: "114/01/02".to_string(),
            transaction: "66,208".to_string(),
            ..Default::default()
        });

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[1], "股票名稱: 台積電");
        assert_eq!(lines[2], "交易日期: 114/01/02");
        assert_eq!(lines[3], "成交股數: ");
        assert_eq!(lines[10], "成交筆數: 66,208");
    }

    #[test]
    fn test_monthly_empty_records() {
        let text = monthly("2330", "202501", &[]);
        assert_eq!(text, format!("股票代號: 2330\n股票月份: 202501\n{}\n", "-".repeat(50)));
    }
}
