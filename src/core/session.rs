use crate::core::aggregator::BillAggregator;
use crate::core::ids::IdGenerator;
use crate::core::parser::MenuParser;
use crate::domain::model::{
    BillConfig, BillSummary, ItemId, MenuItem, Person, PersonId, UploadStatus,
};
use crate::utils::error::Result;

/// 數字輸入框的行為：無法解析或非有限值一律當作 0
pub fn coerce_number(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// 價格另外保證非負
pub fn coerce_price(raw: &str) -> f64 {
    coerce_number(raw).max(0.0)
}

/// 一次分帳的完整狀態：菜單、人員、稅率與小費、上傳狀態。
///
/// 所有修改都透過這裡進行，計算則交給 [`BillAggregator`] 的純函數。
#[derive(Debug, Default)]
pub struct BillSession {
    ids: IdGenerator,
    parser: MenuParser,
    menu: Vec<MenuItem>,
    people: Vec<Person>,
    config: BillConfig,
    status: UploadStatus,
    notice: Option<String>,
}

impl BillSession {
    pub fn new(config: BillConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn menu(&self) -> &[MenuItem] {
        &self.menu
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn config(&self) -> &BillConfig {
        &self.config
    }

    pub fn status(&self) -> &UploadStatus {
        &self.status
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn item(&self, id: ItemId) -> Option<&MenuItem> {
        self.menu.iter().find(|item| item.id == id)
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.people.iter().find(|person| person.id == id)
    }

    /// 名稱比對忽略大小寫與前後空白，回傳第一個符合的項目
    pub fn find_item_by_name(&self, name: &str) -> Option<&MenuItem> {
        let wanted = name.trim().to_lowercase();
        self.menu
            .iter()
            .find(|item| item.name.trim().to_lowercase() == wanted)
    }

    // --- 上傳流程 ---

    /// 開始新的上傳：清空菜單並進入載入中
    pub fn begin_upload(&mut self) {
        self.menu.clear();
        self.notice = None;
        self.status = UploadStatus::Loading;
    }

    /// 辨識完成：成功則解析成菜單，失敗則保持菜單為空並留下提示
    pub fn complete_upload(&mut self, recognized: Result<String>) -> usize {
        match recognized {
            Ok(text) => {
                let count = self.load_menu_text(&text);
                self.status = UploadStatus::Ready { items: count };
                count
            }
            Err(e) => {
                tracing::warn!("Menu recognition failed: {}", e);
                self.menu.clear();
                self.notice = Some(e.user_friendly_message());
                self.status = UploadStatus::Failed {
                    message: e.to_string(),
                };
                0
            }
        }
    }

    /// 以文字取代目前菜單，回傳項目數
    pub fn load_menu_text(&mut self, text: &str) -> usize {
        self.menu = self.parser.parse(text, &self.ids);
        self.menu.len()
    }

    // --- 菜單編輯 ---

    pub fn add_item(&mut self, name: &str, price: f64) -> Option<ItemId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let id = self.ids.next_item_id();
        let price = if price.is_finite() { price.max(0.0) } else { 0.0 };
        self.menu.push(MenuItem {
            id,
            name: name.to_string(),
            price,
        });
        Some(id)
    }

    pub fn edit_item_name(&mut self, id: ItemId, name: &str) -> bool {
        match self.menu.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn edit_item_price(&mut self, id: ItemId, raw: &str) -> bool {
        match self.menu.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.price = coerce_price(raw);
                tracing::debug!("Item {} price set to {}", id, item.price);
                true
            }
            None => false,
        }
    }

    pub fn remove_item(&mut self, id: ItemId) -> bool {
        let before = self.menu.len();
        self.menu.retain(|item| item.id != id);
        before != self.menu.len()
    }

    // --- 人員 ---

    pub fn add_person(&mut self, name: &str) -> Option<PersonId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let id = self.ids.next_person_id();
        self.people.push(Person {
            id,
            name: name.to_string(),
            orders: Vec::new(),
        });
        tracing::debug!("Added person {} ({})", name, id);
        Some(id)
    }

    pub fn remove_person(&mut self, id: PersonId) -> bool {
        let before = self.people.len();
        self.people.retain(|person| person.id != id);
        before != self.people.len()
    }

    /// 未選擇、項目不存在或人員不存在時不做任何事；同一項目可重複指派
    pub fn assign_item(&mut self, person_id: PersonId, item_id: Option<ItemId>) -> bool {
        let Some(item_id) = item_id else {
            return false;
        };
        if self.item(item_id).is_none() {
            return false;
        }

        match self.people.iter_mut().find(|person| person.id == person_id) {
            Some(person) => {
                person.orders.push(item_id);
                true
            }
            None => false,
        }
    }

    // --- 稅率與小費 ---

    pub fn set_tax_rate(&mut self, raw: &str) {
        self.config.tax_rate_percent = coerce_number(raw);
    }

    pub fn set_tip_rate(&mut self, raw: &str) {
        self.config.tip_rate_percent = coerce_number(raw);
    }

    pub fn summary(&self) -> BillSummary {
        BillAggregator::summarize(&self.people, &self.menu, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::SplitError;

    fn session_with_menu() -> BillSession {
        let mut session = BillSession::default();
        session.load_menu_text("Burger 25\nFries 10K\nJust a comment\n");
        session
    }

    #[test]
    fn test_default_rates() {
        let session = BillSession::default();
        assert_eq!(session.config().tax_rate_percent, 10.0);
        assert_eq!(session.config().tip_rate_percent, 15.0);
        assert_eq!(session.status(), &UploadStatus::Idle);
    }

    #[test]
    fn test_add_person_trims_and_rejects_blank() {
        let mut session = BillSession::default();

        assert!(session.add_person("  ").is_none());
        assert!(session.people().is_empty());

        let id = session.add_person("  Alice ").unwrap();
        assert_eq!(session.person(id).unwrap().name, "Alice");
    }

    #[test]
    fn test_remove_person_leaves_others_untouched() {
        let mut session = session_with_menu();
        let burger = session.menu()[0].id;
        let fries = session.menu()[1].id;

        let alice = session.add_person("Alice").unwrap();
        let bob = session.add_person("Bob").unwrap();
        session.assign_item(alice, Some(burger));
        session.assign_item(bob, Some(fries));
        session.assign_item(bob, Some(burger));

        let menu_before = session.menu().to_vec();
        let bob_before = session.person(bob).unwrap().clone();

        assert!(session.remove_person(alice));
        assert!(!session.remove_person(alice));

        assert_eq!(session.people().len(), 1);
        assert_eq!(session.person(bob).unwrap(), &bob_before);
        assert_eq!(session.menu(), menu_before.as_slice());
    }

    #[test]
    fn test_assign_requires_selection_and_existing_item() {
        let mut session = session_with_menu();
        let alice = session.add_person("Alice").unwrap();

        assert!(!session.assign_item(alice, None));
        assert!(!session.assign_item(alice, Some(ItemId(9_999))));
        assert!(!session.assign_item(PersonId(9_999), Some(session.menu()[0].id)));
        assert!(session.person(alice).unwrap().orders.is_empty());
    }

    #[test]
    fn test_same_item_assigned_many_times() {
        let mut session = session_with_menu();
        let fries = session.menu()[1].id;
        let alice = session.add_person("Alice").unwrap();
        let bob = session.add_person("Bob").unwrap();

        assert!(session.assign_item(alice, Some(fries)));
        assert!(session.assign_item(alice, Some(fries)));
        assert!(session.assign_item(bob, Some(fries)));

        let summary = session.summary();
        assert_eq!(summary.people[0].subtotal, 20.0);
        assert_eq!(summary.people[1].subtotal, 10.0);
    }

    #[test]
    fn test_price_edit_propagates_to_assignments() {
        let mut session = session_with_menu();
        let burger = session.menu()[0].id;
        let alice = session.add_person("Alice").unwrap();
        session.assign_item(alice, Some(burger));

        assert!(session.edit_item_price(burger, "30"));
        assert_eq!(session.summary().people[0].subtotal, 30.0);

        assert!(session.edit_item_name(burger, "Cheeseburger"));
        assert_eq!(session.summary().people[0].items[0].name, "Cheeseburger");
    }

    #[test]
    fn test_invalid_price_edit_coerces_to_zero() {
        let mut session = session_with_menu();
        let burger = session.menu()[0].id;

        assert!(session.edit_item_price(burger, "abc"));
        assert_eq!(session.item(burger).unwrap().price, 0.0);

        assert!(session.edit_item_price(burger, "-4"));
        assert_eq!(session.item(burger).unwrap().price, 0.0);

        assert!(!session.edit_item_price(ItemId(9_999), "5"));
    }

    #[test]
    fn test_removed_item_leaves_dangling_order() {
        let mut session = session_with_menu();
        let burger = session.menu()[0].id;
        let fries = session.menu()[1].id;
        let alice = session.add_person("Alice").unwrap();
        session.assign_item(alice, Some(burger));
        session.assign_item(alice, Some(fries));

        assert!(session.remove_item(burger));

        let summary = session.summary();
        assert_eq!(summary.people[0].subtotal, 10.0);
        assert_eq!(session.person(alice).unwrap().orders.len(), 2);
    }

    #[test]
    fn test_rate_inputs_coerce_non_numeric() {
        let mut session = BillSession::default();
        session.set_tax_rate("8.5");
        session.set_tip_rate("lots");

        assert_eq!(session.config().tax_rate_percent, 8.5);
        assert_eq!(session.config().tip_rate_percent, 0.0);
    }

    #[test]
    fn test_upload_success_replaces_menu() {
        let mut session = session_with_menu();
        session.begin_upload();
        assert!(session.menu().is_empty());
        assert!(session.status().is_loading());

        let count = session.complete_upload(Ok("Pasta 12,50\nTiramisu 6".to_string()));

        assert_eq!(count, 2);
        assert_eq!(session.status(), &UploadStatus::Ready { items: 2 });
        assert_eq!(session.menu()[0].price, 12.5);
        assert!(session.notice().is_none());
    }

    #[test]
    fn test_upload_failure_leaves_menu_empty_with_notice() {
        let mut session = session_with_menu();
        session.begin_upload();

        let count = session.complete_upload(Err(SplitError::recognition("engine crashed")));

        assert_eq!(count, 0);
        assert!(session.menu().is_empty());
        assert!(!session.status().is_loading());
        assert!(session.notice().unwrap().contains("engine crashed"));
    }

    #[test]
    fn test_find_item_by_name_is_case_insensitive() {
        let session = session_with_menu();
        assert_eq!(session.find_item_by_name(" fries ").unwrap().price, 10.0);
        assert!(session.find_item_by_name("Salad").is_none());
    }

    #[test]
    fn test_manual_item_gets_unique_id() {
        let mut session = session_with_menu();
        let id = session.add_item("Water", 1.5).unwrap();

        assert!(session.menu().iter().filter(|item| item.id == id).count() == 1);
        assert!(session.add_item("   ", 3.0).is_none());
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(" 12.5 "), 12.5);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("NaN"), 0.0);
        assert_eq!(coerce_number("inf"), 0.0);
        assert_eq!(coerce_number("-3"), -3.0);
        assert_eq!(coerce_price("-3"), 0.0);
    }
}
