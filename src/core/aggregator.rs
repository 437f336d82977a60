use crate::domain::model::{BillConfig, BillSummary, ItemId, MenuItem, Person, PersonSummary};
use std::collections::HashMap;

/// 帳單計算。全部是純函數，不做任何四捨五入（格式化時才處理）
#[derive(Debug, Clone, Copy, Default)]
pub struct BillAggregator;

impl BillAggregator {
    pub fn subtotal<'a, I>(orders: I) -> f64
    where
        I: IntoIterator<Item = &'a MenuItem>,
    {
        orders.into_iter().map(|item| item.price).sum()
    }

    /// 稅與小費都以同一個小計為基數相加，不互相複利
    pub fn total_due<'a, I>(orders: I, tax_rate_percent: f64, tip_rate_percent: f64) -> f64
    where
        I: IntoIterator<Item = &'a MenuItem>,
    {
        Self::apply_rates(Self::subtotal(orders), tax_rate_percent, tip_rate_percent)
    }

    pub fn apply_rates(subtotal: f64, tax_rate_percent: f64, tip_rate_percent: f64) -> f64 {
        subtotal * (1.0 + tax_rate_percent / 100.0 + tip_rate_percent / 100.0)
    }

    pub fn tax_amount(subtotal: f64, tax_rate_percent: f64) -> f64 {
        subtotal * tax_rate_percent / 100.0
    }

    pub fn tip_amount(subtotal: f64, tip_rate_percent: f64) -> f64 {
        subtotal * tip_rate_percent / 100.0
    }

    /// 依 id 找出點餐項目；已不存在的 id 直接略過（視為 0）
    pub fn resolve<'a>(orders: &[ItemId], menu: &'a [MenuItem]) -> Vec<&'a MenuItem> {
        let by_id: HashMap<ItemId, &MenuItem> = menu.iter().map(|item| (item.id, item)).collect();

        orders
            .iter()
            .filter_map(|id| {
                let found = by_id.get(id).copied();
                if found.is_none() {
                    tracing::debug!("Order references missing menu item {}", id);
                }
                found
            })
            .collect()
    }

    pub fn summarize_person(person: &Person, menu: &[MenuItem], config: &BillConfig) -> PersonSummary {
        let items = Self::resolve(&person.orders, menu);
        let subtotal = Self::subtotal(items.iter().copied());

        PersonSummary {
            person_id: person.id,
            name: person.name.clone(),
            items: items.into_iter().cloned().collect(),
            subtotal,
            tax: Self::tax_amount(subtotal, config.tax_rate_percent),
            tip: Self::tip_amount(subtotal, config.tip_rate_percent),
            total_due: Self::apply_rates(
                subtotal,
                config.tax_rate_percent,
                config.tip_rate_percent,
            ),
        }
    }

    pub fn summarize(people: &[Person], menu: &[MenuItem], config: &BillConfig) -> BillSummary {
        let people: Vec<PersonSummary> = people
            .iter()
            .map(|person| Self::summarize_person(person, menu, config))
            .collect();

        BillSummary {
            subtotal: people.iter().map(|p| p.subtotal).sum(),
            total_due: people.iter().map(|p| p.total_due).sum(),
            people,
            config: *config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PersonId;

    fn item(id: u64, name: &str, price: f64) -> MenuItem {
        MenuItem {
            id: ItemId(id),
            name: name.to_string(),
            price,
        }
    }

    #[test]
    fn test_subtotal_of_empty_orders_is_zero() {
        let orders: Vec<MenuItem> = vec![];
        assert_eq!(BillAggregator::subtotal(&orders), 0.0);
    }

    #[test]
    fn test_subtotal_sums_prices() {
        let orders = vec![item(1, "Burger", 10.0), item(2, "Fries", 5.5)];
        assert_eq!(BillAggregator::subtotal(&orders), 15.5);
    }

    #[test]
    fn test_total_due_adds_tax_and_tip_to_same_base() {
        let orders = vec![item(1, "Tasting menu", 100.0)];
        assert_eq!(BillAggregator::total_due(&orders, 10.0, 15.0), 125.0);
    }

    #[test]
    fn test_negative_rates_reduce_total() {
        let orders = vec![item(1, "Lunch set", 100.0)];
        let total = BillAggregator::total_due(&orders, -10.0, 0.0);
        assert!((total - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_orders_count_twice() {
        let menu = vec![item(1, "Beer", 4.0)];
        let person = Person {
            id: PersonId(10),
            name: "Sam".to_string(),
            orders: vec![ItemId(1), ItemId(1)],
        };

        let summary = BillAggregator::summarize_person(&person, &menu, &BillConfig::new(0.0, 0.0));
        assert_eq!(summary.subtotal, 8.0);
        assert_eq!(summary.items.len(), 2);
    }

    #[test]
    fn test_dangling_order_contributes_zero() {
        let menu = vec![item(1, "Salad", 8.0)];
        let person = Person {
            id: PersonId(10),
            name: "Kim".to_string(),
            orders: vec![ItemId(1), ItemId(99)],
        };

        let summary = BillAggregator::summarize_person(&person, &menu, &BillConfig::default());
        assert_eq!(summary.subtotal, 8.0);
        assert_eq!(summary.items, vec![item(1, "Salad", 8.0)]);
    }

    #[test]
    fn test_summarize_grand_totals() {
        let menu = vec![item(1, "Pizza", 20.0), item(2, "Cola", 4.0)];
        let people = vec![
            Person {
                id: PersonId(10),
                name: "Ana".to_string(),
                orders: vec![ItemId(1)],
            },
            Person {
                id: PersonId(11),
                name: "Ben".to_string(),
                orders: vec![ItemId(1), ItemId(2)],
            },
        ];
        let config = BillConfig::new(10.0, 15.0);

        let summary = BillAggregator::summarize(&people, &menu, &config);

        assert_eq!(summary.people.len(), 2);
        assert_eq!(summary.people[0].total_due, 25.0);
        assert_eq!(summary.people[1].subtotal, 24.0);
        assert!((summary.people[1].tax - 2.4).abs() < 1e-9);
        assert!((summary.people[1].tip - 3.6).abs() < 1e-9);
        assert_eq!(summary.subtotal, 44.0);
        assert!((summary.total_due - 55.0).abs() < 1e-9);
        assert_eq!(summary.config, config);
    }
}
