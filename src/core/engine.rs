use crate::app::export::BillExporter;
use crate::core::session::BillSession;
use crate::core::upload::Uploader;
use crate::domain::model::{BillSummary, ImageSource, RosterEntry};
use crate::domain::ports::Storage;
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct SplitOutcome {
    pub items_recognized: usize,
    pub orders_assigned: usize,
    pub summary: BillSummary,
    pub notice: Option<String>,
    pub export_path: Option<String>,
}

/// 把會話檔中的人員與點餐套用到 session，回傳成功指派的數量。
///
/// 找不到的菜名只記錄警告並略過。
pub fn apply_roster(session: &mut BillSession, roster: &[RosterEntry]) -> usize {
    let mut assigned = 0;

    for entry in roster {
        let Some(person_id) = session.add_person(&entry.name) else {
            tracing::warn!("Skipping roster entry with an empty name");
            continue;
        };

        for order in &entry.orders {
            let item_id = session.find_item_by_name(order).map(|item| item.id);
            if item_id.is_none() {
                tracing::warn!("'{}' ordered '{}', which is not on the menu", entry.name, order);
            }
            if session.assign_item(person_id, item_id) {
                assigned += 1;
            }
        }
    }

    assigned
}

/// 上傳 → 解析 → 指派 → 計算 →（可選）匯出
pub struct SplitEngine<S: Storage> {
    uploader: Uploader,
    language: String,
    exporter: Option<BillExporter<S>>,
}

impl<S: Storage> SplitEngine<S> {
    pub fn new(uploader: Uploader, language: impl Into<String>) -> Self {
        Self {
            uploader,
            language: language.into(),
            exporter: None,
        }
    }

    pub fn with_exporter(mut self, exporter: BillExporter<S>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    pub async fn run(
        &self,
        session: &mut BillSession,
        image: ImageSource,
        roster: &[RosterEntry],
    ) -> Result<SplitOutcome> {
        tracing::info!(
            "📷 Reading menu from {} with {} recognizer",
            image.display_name(),
            self.uploader.recognizer_name()
        );

        // 被拒絕的上傳不能動到 session 既有的菜單與狀態
        let handle = self.uploader.start(image, &self.language)?;
        session.begin_upload();
        let items_recognized = session.complete_upload(handle.finish().await);
        tracing::info!("🧾 Recognized {} menu items", items_recognized);

        let orders_assigned = apply_roster(session, roster);
        tracing::info!(
            "👥 {} people, {} orders assigned",
            session.people().len(),
            orders_assigned
        );

        let summary = session.summary();

        let export_path = match &self.exporter {
            Some(exporter) => {
                let path = exporter.export(session.menu(), &summary).await?;
                tracing::info!("📁 Bill exported to {}", path);
                Some(path)
            }
            None => None,
        };

        Ok(SplitOutcome {
            items_recognized,
            orders_assigned,
            summary,
            notice: session.notice().map(str::to_string),
            export_path,
        })
    }
}
