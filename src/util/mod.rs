/// 日期正規化、民國年轉換
pub mod datetime;
pub mod http;
/// 編碼轉換、欄位拆解
pub mod text;
