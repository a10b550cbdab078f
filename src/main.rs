use clap::{Parser, Subcommand};

use crate::util::http::HttpFetcher;

pub mod config;
/// 台灣證券交易所資料抓取
pub mod crawler;
pub mod declare;
pub mod logging;
/// 報表文字
pub mod report;
/// 即時、當日、當月股價查詢
pub mod service;
pub mod util;

/// 查詢台灣證券交易所上市股票的即時、當日與當月股價
#[derive(Parser, Debug)]
#[command(name = "twse_quote", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 取得查詢股票代號的即時股價資訊
    Snapshot {
        /// 要查詢的股票代號，多檔以逗號分隔，例如 2330,2317
        stock_code: String,
    },
    /// 取得查詢股票代號指定日期的股價資訊
    Daily {
        /// 要查詢的股票代號
        stock_code: String,
        /// 要查詢的日期：YYYYMMDD 或 YYYY-MM-DD
        stock_date: String,
    },
    /// 取得查詢股票代號指定月份的股價資訊
    Monthly {
        /// 要查詢的股票代號
        stock_code: String,
        /// 要查詢的月份：YYYYMM、YYYY-MM、YYYYMMDD 或 YYYY-MM-DD
        stock_month: String,
    },
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    logging::info_file_async(format!("啟動 {:?}", cli.command));

    let fetcher = HttpFetcher;
    let text = match &cli.command {
        Command::Snapshot { stock_code } => {
            service::display_current_stock_info(&fetcher, stock_code).await
        }
        Command::Daily {
            stock_code,
            stock_date,
        } => service::display_daily_stock_info(&fetcher, stock_code, stock_date).await,
        Command::Monthly {
            stock_code,
            stock_month,
        } => service::display_monthly_stock_info(&fetcher, stock_code, stock_month).await,
    };

    println!("{}", text);
    logging::flush();
}
