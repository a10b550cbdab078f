use std::{env, path::PathBuf, str::FromStr};

use anyhow::Result;
use config::{Config as config_config, File as config_file};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::logging;

const CONFIG_PATH: &str = "app.json";

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct App {
    #[serde(default)]
    pub twse: Twse,
    #[serde(default)]
    pub http: Http,
    #[serde(default)]
    pub log: Log,
}

const TWSE_SNAPSHOT_URL: &str = "TWSE_SNAPSHOT_URL";
const TWSE_MONTHLY_URL: &str = "TWSE_MONTHLY_URL";

/// 證交所 API 位址
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Twse {
    /// 即時股價，後接 ex_ch 參數
    pub snapshot_url: String,
    /// 個股日成交資訊 (CSV)，後接 date、stockNo 參數
    pub monthly_url: String,
}

impl Default for Twse {
    fn default() -> Self {
        Twse {
            snapshot_url: "https://mis.twse.com.tw/stock/api/getStockInfo.jsp?json=1&delay=0&ex_ch="
                .to_string(),
            monthly_url: "http://www.twse.com.tw/exchangeReport/STOCK_DAY?response=csv"
                .to_string(),
        }
    }
}

const HTTP_CONNECT_TIMEOUT_SECS: &str = "HTTP_CONNECT_TIMEOUT_SECS";
const HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
const HTTP_USER_AGENT: &str = "HTTP_USER_AGENT";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Http {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Http {
    fn default() -> Self {
        Http {
            connect_timeout_secs: 8,
            timeout_secs: 15,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
        }
    }
}

const LOG_DIR: &str = "LOG_DIR";
const LOG_MAX_SIZE: &str = "LOG_MAX_SIZE";
const LOG_MAX_AGE_DAYS: &str = "LOG_MAX_AGE_DAYS";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Log {
    pub dir: String,
    /// 單檔最大大小 (bytes)
    pub max_size: u64,
    pub max_age_days: i64,
}

impl Default for Log {
    fn default() -> Self {
        Log {
            dir: "log".to_string(),
            max_size: 10 * 1024 * 1024,
            max_age_days: 7,
        }
    }
}

pub static SETTINGS: Lazy<App> = Lazy::new(|| {
    App::get().unwrap_or_else(|why| {
        // 檔案日誌依賴設定值，這裡只能輸出到 console
        logging::error_console(format!(
            "I can't read the config context because {:?}",
            why
        ));
        App::default().override_with_env()
    })
});

impl App {
    fn get() -> Result<Self> {
        let config_path = config_path();
        if config_path.exists() {
            let config: App = config_config::builder()
                .add_source(config_file::from(config_path))
                .build()?
                .try_deserialize()?;
            return Ok(config.override_with_env());
        }

        Ok(App::default().override_with_env())
    }

    /// 將來至於 env 的設定值覆蓋掉 json 上的設定值
    fn override_with_env(mut self) -> Self {
        if let Ok(url) = env::var(TWSE_SNAPSHOT_URL) {
            self.twse.snapshot_url = url;
        }

        if let Ok(url) = env::var(TWSE_MONTHLY_URL) {
            self.twse.monthly_url = url;
        }

        override_number(HTTP_CONNECT_TIMEOUT_SECS, &mut self.http.connect_timeout_secs);
        override_number(HTTP_TIMEOUT_SECS, &mut self.http.timeout_secs);

        if let Ok(ua) = env::var(HTTP_USER_AGENT) {
            self.http.user_agent = ua;
        }

        if let Ok(dir) = env::var(LOG_DIR) {
            self.log.dir = dir;
        }

        override_number(LOG_MAX_SIZE, &mut self.log.max_size);
        override_number(LOG_MAX_AGE_DAYS, &mut self.log.max_age_days);

        self
    }
}

/// 環境變數存在且可解析時覆蓋數值設定
fn override_number<T: FromStr>(key: &str, target: &mut T) {
    if let Ok(value) = env::var(key) {
        match T::from_str(value.trim()) {
            Ok(v) => *target = v,
            Err(_) => logging::error_console(format!("Ignore invalid {}={}", key, value)),
        }
    }
}

/// 回傳設定檔的路徑
fn config_path() -> PathBuf {
    PathBuf::from(CONFIG_PATH)
}
