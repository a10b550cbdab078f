use concat_string::concat_string;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    config::SETTINGS,
    declare::{
        QuoteError, SnapshotRecord, UNKNOWN_CODE, UNKNOWN_CURRENT_PRICE, UNKNOWN_HIGHEST_PRICE,
        UNKNOWN_LOWEST_PRICE, UNKNOWN_NAME,
    },
    util::http::Fetch,
};

/// 調用 getStockInfo.jsp 後其回應的數據
#[derive(Deserialize, Debug)]
struct SnapshotResponse {
    #[serde(rename = "msgArray")]
    pub msg_array: Option<Vec<Map<String, Value>>>,
}

/// 將以逗號分隔的股票代號拆開，略過空白代號
pub fn split_codes(stock_code: &str) -> Vec<&str> {
    stock_code
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .collect()
}

/// 單一代號為 ex_ch=tse_2330.tw，多個代號時每個後面都接 |
pub fn build_url(codes: &[&str]) -> String {
    let mut url = SETTINGS.twse.snapshot_url.clone();

    if let [code] = codes {
        url.push_str(&concat_string!("tse_", urlencoding::encode(code), ".tw"));
        return url;
    }

    for code in codes {
        url.push_str(&concat_string!("tse_", urlencoding::encode(code), ".tw|"));
    }

    url
}

/// 解析即時股價，缺少的欄位以固定文字代替
pub fn parse(raw: &str) -> Result<Vec<SnapshotRecord>, QuoteError> {
    let response: SnapshotResponse = serde_json::from_str(raw)
        .map_err(|why| QuoteError::format(format!("無法解析即時股價資料: {:?}", why)))?;

    let entries = match response.msg_array {
        Some(entries) if !entries.is_empty() => entries,
        _ => return Err(QuoteError::format("無法取得股票資料")),
    };

    Ok(entries
        .iter()
        .map(|entry| SnapshotRecord {
            stock_code: field(entry, "c", UNKNOWN_CODE),
            stock_name: field(entry, "n", UNKNOWN_NAME),
            current_price: field(entry, "z", UNKNOWN_CURRENT_PRICE),
            highest_price: field(entry, "h", UNKNOWN_HIGHEST_PRICE),
            lowest_price: field(entry, "l", UNKNOWN_LOWEST_PRICE),
        })
        .collect())
}

fn field(entry: &Map<String, Value>, key: &str, placeholder: &str) -> String {
    match entry.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => placeholder.to_string(),
        Some(other) => other.to_string(),
    }
}

/// 抓取一或多檔股票的即時股價，多檔時只送出一個請求
pub async fn visit(fetcher: &dyn Fetch, stock_code: &str) -> Result<Vec<SnapshotRecord>, QuoteError> {
    if stock_code.trim().is_empty() {
        return Err(QuoteError::empty_input("股票代號不可為空"));
    }

    let codes = split_codes(stock_code);
    if codes.is_empty() {
        return Err(QuoteError::empty_input("無效的股票代號"));
    }

    let bytes = fetcher.fetch(&build_url(&codes)).await?;
    let text = String::from_utf8(bytes)
        .map_err(|why| QuoteError::format(format!("即時股價資料不是 UTF-8: {:?}", why)))?;

    parse(&text)
}

#[cfg(test)]
mod tests {
    use crate::{
        declare::ErrorKind,
        util::http::{
            stub::{StubFetcher, SNAPSHOT_JSON},
            HttpFetcher,
        },
    };

    use super::*;

    #[test]
    fn test_build_url() {
        let single = build_url(&["2330"]);
        assert!(single.ends_with("ex_ch=tse_2330.tw"), "{}", single);

        let batch = build_url(&split_codes("2330, 2317 ,0050"));
        assert!(
            batch.ends_with("ex_ch=tse_2330.tw|tse_2317.tw|tse_0050.tw|"),
            "{}",
            batch
        );
    }

    #[test]
    fn test_split_codes() {
        assert_eq!(split_codes("2330"), vec!["2330"]);
        assert_eq!(split_codes(" 2330 ,,2317, "), vec!["2330", "2317"]);
        assert!(split_codes(" , ").is_empty());
    }

    #[test]
    fn test_parse() {
        let records = parse(SNAPSHOT_JSON).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].stock_code, "2330");
        assert_eq!(records[0].stock_name, "台積電");
        assert_eq!(records[0].current_price, "1075.0000");
        assert_eq!(records[0].highest_price, "1085.0000");
        assert_eq!(records[0].lowest_price, "1065.0000");
        assert_eq!(records[1].stock_code, "2317");
        assert_eq!(records[1].current_price, "-");
        assert_eq!(records[1].lowest_price, UNKNOWN_LOWEST_PRICE);
    }

    #[test]
    fn test_parse_missing_fields_and_scalars() {
        let records = parse(r#"{"msgArray":[{"z":1075.5,"n":null}]}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].stock_code, UNKNOWN_CODE);
        assert_eq!(records[0].stock_name, UNKNOWN_NAME);
        assert_eq!(records[0].current_price, "1075.5");
        assert_eq!(records[0].highest_price, UNKNOWN_HIGHEST_PRICE);
    }

    #[test]
    fn test_parse_without_msg_array() {
        for raw in [r#"{"rtcode":"0000"}"#, r#"{"msgArray":[]}"#] {
            let why = parse(raw).unwrap_err();
            assert_eq!(why.kind, ErrorKind::Format, "raw: {}", raw);
        }
    }

    #[test]
    fn test_parse_invalid_json() {
        let why = parse("<html>503</html>").unwrap_err();
        assert_eq!(why.kind, ErrorKind::Format);
    }

    #[tokio::test]
    async fn test_visit_batches_codes() {
        let fetcher = StubFetcher::new(SNAPSHOT_JSON.as_bytes().to_vec());
        let records = visit(&fetcher, "2330,2317").await.unwrap();

        assert_eq!(records.len(), 2);
        let urls = fetcher.requested();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].ends_with("tse_2330.tw|tse_2317.tw|"));
    }

    #[tokio::test]
    async fn test_visit_empty_code() {
        let fetcher = StubFetcher::new(SNAPSHOT_JSON.as_bytes().to_vec());

        let why = visit(&fetcher, "  ").await.unwrap_err();
        assert_eq!(why.kind, ErrorKind::EmptyInput);

        let why = visit(&fetcher, ",").await.unwrap_err();
        assert_eq!(why.kind, ErrorKind::EmptyInput);
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn test_visit_transport_error() {
        let why = visit(&StubFetcher::failing(), "2330").await.unwrap_err();
        assert_eq!(why.kind, ErrorKind::Transport);
    }

    #[tokio::test]
    #[ignore]
    async fn test_visit_live() {
        dotenv::dotenv().ok();
        let records = visit(&HttpFetcher, "2330,2317").await.unwrap();
        dbg!(&records);
        assert_eq!(records.len(), 2);
    }
}
