use std::sync::Mutex;

use async_trait::async_trait;
use encoding_rs::BIG5;

use crate::{declare::QuoteError, util::http::Fetch};

/// 證交所 STOCK_DAY?response=csv 的回應內容
pub const MONTHLY_CSV: &str = concat!(
    "\"114年01月 2330 台積電           各日成交資訊\"\r\n",
    "\"日期\",\"成交股數\",\"成交金額\",\"開盤價\",\"最高價\",\"最低價\",\"收盤價\",\"漲跌價差\",\"成交筆數\",\r\n",
    "\"114/01/02\",\"38,456,014\",\"41,443,390,557\",\"1,070.00\",\"1,085.00\",\"1,065.00\",\"1,075.00\",\"-5.00\",\"66,208\",\r\n",
    "\"114/01/03\",\"32,312,571\",\"35,204,210,110\",\"1,085.00\",\"1,095.00\",\"1,080.00\",\"1,090.00\",\"+15.00\",\"45,901\",\r\n",
    "\"114/01/06\",\"45,070,335\",\"50,337,020,515\",\"1,110.00\",\"1,125.00\",\"1,105.00\",\"1,115.00\",\"+25.00\",\"89,032\",\r\n",
    "\"說明:\"\r\n",
    "\"符號說明:+/-/X表示漲/跌/不比價\"\r\n",
    "\r\n",
);

/// 即時股價 getStockInfo.jsp 的回應內容，第二筆缺少最低價
pub const SNAPSHOT_JSON: &str = r#"{"msgArray":[{"c":"2330","n":"台積電","z":"1075.0000","h":"1085.0000","l":"1065.0000","tv":"1234"},{"c":"2317","n":"鴻海","z":"-","h":"180.5000"}],"rtcode":"0000","rtmessage":"OK"}"#;

pub fn big5(text: &str) -> Vec<u8> {
    let (bytes, _, _) = BIG5.encode(text);
    bytes.into_owned()
}

/// 回傳固定內容並記下被請求的網址
pub struct StubFetcher {
    body: Result<Vec<u8>, QuoteError>,
    pub urls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new(body: Vec<u8>) -> Self {
        StubFetcher {
            body: Ok(body),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        StubFetcher {
            body: Err(QuoteError::transport("API請求失敗: 503 Service Unavailable")),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetch for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, QuoteError> {
        self.urls.lock().unwrap().push(url.to_string());
        self.body.clone()
    }
}
