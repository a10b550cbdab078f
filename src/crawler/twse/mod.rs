/// 個股單日成交資訊
pub mod daily;
/// 個股當月各日成交資訊
pub mod monthly;
/// 即時股價
pub mod snapshot;
