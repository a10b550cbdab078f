use encoding_rs::BIG5;

use crate::logging;

/// Converts Big5 encoded bytes to a UTF-8 `String`.
///
/// Malformed sequences are replaced with U+FFFD instead of failing the whole
/// body, a warning is logged when that happens.
pub fn big5_2_utf8(data: &[u8]) -> String {
    let (text, had_errors) = BIG5.decode_without_bom_handling(data);
    if had_errors {
        logging::warn_file_async(format!(
            "Big5 decode replaced malformed sequences in {} bytes",
            data.len()
        ));
    }

    text.into_owned()
}

/// 拆解一行以逗號分隔、欄位可能以雙引號包住的文字
///
/// 每個欄位取雙引號內的內容(可含逗號)，或是到下一個逗號為止的字元。
/// 結尾引號與下一個逗號之間的字元會被捨棄。一行有 n 個分隔逗號就回傳 n + 1 個欄位，
/// 空字串回傳一個空欄位。
pub fn split_quoted_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::with_capacity(16);
    let mut rest = line;

    loop {
        let (field, remain) = next_field(rest);
        fields.push(field);
        match remain {
            Some(r) => rest = r,
            None => break,
        }
    }

    fields
}

/// 取出第一個欄位，並回傳下一個欄位開始處(已無逗號時為 None)
fn next_field(input: &str) -> (String, Option<&str>) {
    if let Some(quoted) = input.strip_prefix('"') {
        if let Some(end) = quoted.find('"') {
            let after = &quoted[end + 1..];
            let remain = after.find(',').map(|i| &after[i + 1..]);
            return (quoted[..end].to_string(), remain);
        }
    }

    match input.find(',') {
        Some(i) => (trim_quotes(&input[..i]).to_string(), Some(&input[i + 1..])),
        None => (trim_quotes(input).to_string(), None),
    }
}

/// 去掉前後各一個雙引號
pub fn trim_quotes(s: &str) -> &str {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}
