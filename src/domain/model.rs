use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 菜單上的一行：名稱與價格（有限且非負）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
}

/// 點餐以 ItemId 參照菜單，修改菜單價格會反映在所有人的小計
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub orders: Vec<ItemId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BillConfig {
    pub tax_rate_percent: f64,
    pub tip_rate_percent: f64,
}

impl BillConfig {
    pub const DEFAULT_TAX_RATE_PERCENT: f64 = 10.0;
    pub const DEFAULT_TIP_RATE_PERCENT: f64 = 15.0;

    pub fn new(tax_rate_percent: f64, tip_rate_percent: f64) -> Self {
        Self {
            tax_rate_percent,
            tip_rate_percent,
        }
    }
}

impl Default for BillConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TAX_RATE_PERCENT, Self::DEFAULT_TIP_RATE_PERCENT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub person_id: PersonId,
    pub name: String,
    pub items: Vec<MenuItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub tip: f64,
    pub total_due: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillSummary {
    pub people: Vec<PersonSummary>,
    pub subtotal: f64,
    pub total_due: f64,
    pub config: BillConfig,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum UploadStatus {
    #[default]
    Idle,
    Loading,
    Ready {
        items: usize,
    },
    Failed {
        message: String,
    },
}

impl UploadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, UploadStatus::Loading)
    }
}

/// 交給辨識器的影像來源
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Path(std::path::PathBuf),
    Bytes { name: String, data: Vec<u8> },
}

impl ImageSource {
    pub fn display_name(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Bytes { name, .. } => name.clone(),
        }
    }
}

/// 會話檔中的一位用餐者，點餐以菜單名稱表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    #[serde(default)]
    pub orders: Vec<String>,
}
