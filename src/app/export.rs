use crate::domain::model::{BillSummary, MenuItem};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const EXPORT_FILENAME: &str = "bill_export.zip";
pub const SUPPORTED_FORMATS: [&str; 2] = ["csv", "json"];

#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    generated_at: DateTime<Utc>,
    menu: &'a [MenuItem],
    summary: &'a BillSummary,
}

/// 把菜單與分帳結果打包成 zip：menu.csv、summary.csv、summary.json
pub struct BillExporter<S: Storage> {
    storage: S,
    output_path: String,
    formats: Vec<String>,
}

impl<S: Storage> BillExporter<S> {
    pub fn new(storage: S, output_path: String, formats: Vec<String>) -> Self {
        Self {
            storage,
            output_path,
            formats,
        }
    }

    fn wants(&self, format: &str) -> bool {
        self.formats.iter().any(|f| f.eq_ignore_ascii_case(format))
    }

    pub fn menu_csv(menu: &[MenuItem]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["id", "name", "price"])?;
        for item in menu {
            writer.write_record([
                item.id.to_string(),
                item.name.clone(),
                format!("{:.2}", item.price),
            ])?;
        }
        writer.flush()?;
        writer.into_inner().map_err(|e| e.into_error().into())
    }

    pub fn summary_csv(summary: &BillSummary) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["name", "items", "subtotal", "tax", "tip", "total_due"])?;

        for person in &summary.people {
            let items = person
                .items
                .iter()
                .map(|item| item.name.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            writer.write_record([
                person.name.clone(),
                items,
                format!("{:.2}", person.subtotal),
                format!("{:.2}", person.tax),
                format!("{:.2}", person.tip),
                format!("{:.2}", person.total_due),
            ])?;
        }

        writer.write_record([
            "TOTAL".to_string(),
            String::new(),
            format!("{:.2}", summary.subtotal),
            format!("{:.2}", summary.people.iter().map(|p| p.tax).sum::<f64>()),
            format!("{:.2}", summary.people.iter().map(|p| p.tip).sum::<f64>()),
            format!("{:.2}", summary.total_due),
        ])?;
        writer.flush()?;
        writer.into_inner().map_err(|e| e.into_error().into())
    }

    pub async fn export(&self, menu: &[MenuItem], summary: &BillSummary) -> Result<String> {
        let output_path = format!("{}/{}", self.output_path, EXPORT_FILENAME);

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            if self.wants("csv") {
                zip.start_file::<_, ()>("menu.csv", FileOptions::default())?;
                zip.write_all(&Self::menu_csv(menu)?)?;

                zip.start_file::<_, ()>("summary.csv", FileOptions::default())?;
                zip.write_all(&Self::summary_csv(summary)?)?;
            }

            if self.wants("json") {
                let document = ExportDocument {
                    generated_at: Utc::now(),
                    menu,
                    summary,
                };
                zip.start_file::<_, ()>("summary.json", FileOptions::default())?;
                zip.write_all(serde_json::to_string_pretty(&document)?.as_bytes())?;
            }

            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing bill export ({} bytes) to storage", zip_data.len());
        self.storage.write_file(EXPORT_FILENAME, &zip_data).await?;

        Ok(output_path)
    }
}
