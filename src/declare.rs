use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use thiserror::Error;

/// 即時報價缺欄位時的替代文字
pub const UNKNOWN_CODE: &str = "未知股票代號";
pub const UNKNOWN_NAME: &str = "未知股票名稱";
pub const UNKNOWN_CURRENT_PRICE: &str = "未知成交價";
pub const UNKNOWN_HIGHEST_PRICE: &str = "未知最高價";
pub const UNKNOWN_LOWEST_PRICE: &str = "未知最低價";

/// 錯誤類別
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, AsRefStr)]
pub enum ErrorKind {
    /// 缺少股票代號或日期
    EmptyInput,
    /// 日期格式錯誤或回應內容無法解析
    Format,
    /// 請求失敗
    Transport,
    /// 查無指定日期的資料
    NotFound,
}

/// 單次查詢的錯誤
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct QuoteError {
    pub kind: ErrorKind,
    pub message: String,
}

impl QuoteError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        QuoteError {
            kind,
            message: message.into(),
        }
    }

    pub fn empty_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptyInput, message)
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Format, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }
}

/// 查詢結果，失敗時 value 為空值並附上錯誤
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub error: Option<QuoteError>,
}

impl<T: Default> Outcome<T> {
    pub fn success(value: T) -> Self {
        Outcome { value, error: None }
    }

    pub fn failure(error: QuoteError) -> Self {
        Outcome {
            value: T::default(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }

    pub fn message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}

impl<T: Default> From<Result<T, QuoteError>> for Outcome<T> {
    fn from(result: Result<T, QuoteError>) -> Self {
        match result {
            Ok(value) => Outcome::success(value),
            Err(why) => Outcome::failure(why),
        }
    }
}

/// 股票即時報價
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    /// 股票代號
    pub stock_code: String,
    /// 股票名稱
    pub stock_name: String,
    /// 當前價格
    pub current_price: String,
    /// 最高價
    pub highest_price: String,
    /// 最低價
    pub lowest_price: String,
}

/// 個股單日成交資訊，數值欄位保留交易所原始文字
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct DailyQuoteRecord {
    /// 股票代號
    pub stock_code: String,
    /// 股票名稱
    pub stock_name: String,
    /// 日期 (民國年 YYY/MM/DD)
    pub date: String,
    /// 成交股數
    pub volume: String,
    /// 成交金額
    pub turnover: String,
    /// 開盤價
    pub opening_price: String,
    /// 最高價
    pub highest_price: String,
    /// 最低價
    pub lowest_price: String,
    /// 收盤價
    pub closing_price: String,
    /// 漲跌價差
    pub change: String,
    /// 成交筆數
    pub transaction: String,
}
