use crate::core::ids::IdGenerator;
use crate::domain::model::MenuItem;
use regex::Regex;
use std::sync::LazyLock;

// 行尾價格：ASCII 數字，可選 . 或 , 加一到兩位小數，可選 k/K 後綴（不放大數值）
static RE_TRAILING_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+(?:[.,][0-9]{1,2})?)\s*[kK]?$").expect("valid trailing price regex")
});

/// 把 OCR 文字轉成菜單項目的啟發式解析器。
///
/// 每一行獨立處理：只有結尾帶價格且價格前有名稱的行才會成為項目，
/// 其他行（標題、說明、雜訊）一律略過，不會回報錯誤。
#[derive(Debug, Clone, Copy, Default)]
pub struct MenuParser;

impl MenuParser {
    pub fn new() -> Self {
        Self
    }

    /// 依原文行序產生項目，id 由呼叫端的產生器分配
    pub fn parse(&self, text: &str, ids: &IdGenerator) -> Vec<MenuItem> {
        let mut items = Vec::new();
        let mut skipped = 0usize;

        for (line_no, line) in text.split('\n').enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            match Self::parse_line(line) {
                Some((name, price)) => {
                    tracing::trace!("line {}: '{}' -> {:.2}", line_no + 1, name, price);
                    items.push(MenuItem {
                        id: ids.next_item_id(),
                        name,
                        price,
                    });
                }
                None => {
                    tracing::trace!("line {}: skipped '{}'", line_no + 1, line.trim());
                    skipped += 1;
                }
            }
        }

        tracing::debug!(
            "Parsed {} menu items ({} lines skipped)",
            items.len(),
            skipped
        );
        items
    }

    /// 解析單行，回傳 (名稱, 價格)；不是項目的行回傳 None
    pub fn parse_line(line: &str) -> Option<(String, f64)> {
        let trimmed = line.trim();
        let caps = RE_TRAILING_PRICE.captures(trimmed)?;
        let whole = caps.get(0)?;
        let number = caps.get(1)?.as_str().replace(',', ".");

        let price: f64 = number.parse().ok()?;
        if !price.is_finite() {
            return None;
        }

        let name = trimmed[..whole.start()].trim();
        if name.is_empty() {
            return None;
        }

        Some((name.to_string(), price))
    }
}
