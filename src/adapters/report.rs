use crate::domain::model::{ReportHandle, ReportRow, REPORT_HEADER};
use crate::domain::ports::ReportSink;
use crate::utils::error::Result;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// 將報表寫成本機 CSV 檔
#[derive(Debug, Clone)]
pub struct CsvReportSink {
    output_dir: PathBuf,
}

impl CsvReportSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn report_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.csv", name))
    }
}

/// 同一筆訂單的所有列先編碼進緩衝區，再一次寫入
fn encode_rows(rows: &[ReportRow]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut buffer);

        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}

#[async_trait::async_trait]
impl ReportSink for CsvReportSink {
    async fn create_report(&self, name: &str) -> Result<ReportHandle> {
        fs::create_dir_all(&self.output_dir)?;

        let path = self.report_path(name);
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(REPORT_HEADER)?;
        writer.flush()?;

        tracing::debug!("Report header written to {}", path.display());
        Ok(ReportHandle {
            name: name.to_string(),
            location: path.to_string_lossy().into_owned(),
        })
    }

    async fn append_rows(&self, report: &ReportHandle, rows: &[ReportRow]) -> Result<()> {
        let data = encode_rows(rows)?;

        // 不自動建立檔案：報表必須先由 create_report 產生
        let mut file = OpenOptions::new().append(true).open(&report.location)?;
        file.write_all(&data)?;

        tracing::debug!("Appended {} rows to {}", rows.len(), report.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Order;
    use crate::utils::error::OrderError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_report_writes_header_only() {
        let temp_dir = TempDir::new().unwrap();
        let sink = CsvReportSink::new(temp_dir.path());

        let report = sink.create_report("orders_type_A_123_1234567890").await.unwrap();

        assert_eq!(report.name, "orders_type_A_123_1234567890");
        assert!(report.location.ends_with("orders_type_A_123_1234567890.csv"));
        let content = std::fs::read_to_string(&report.location).unwrap();
        assert_eq!(content, "ID,Type,Amount,Flag,Status,Priority\n");
    }

    #[tokio::test]
    async fn test_create_report_makes_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("reports").join("daily");
        let sink = CsvReportSink::new(&nested);

        let report = sink.create_report("r").await.unwrap();

        assert!(nested.join("r.csv").exists());
        assert_eq!(report.location, nested.join("r.csv").to_string_lossy());
    }

    #[tokio::test]
    async fn test_append_rows_renders_order_and_note() {
        let temp_dir = TempDir::new().unwrap();
        let sink = CsvReportSink::new(temp_dir.path());
        let report = sink.create_report("orders").await.unwrap();

        let low = Order::new(1, "A", 100.0, false);
        let high = Order::new(2, "A", 200.0, true);
        sink.append_rows(&report, &[ReportRow::from_order(&low)])
            .await
            .unwrap();
        sink.append_rows(
            &report,
            &[ReportRow::from_order(&high), ReportRow::high_value_note()],
        )
        .await
        .unwrap();

        let content = std::fs::read_to_string(&report.location).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "ID,Type,Amount,Flag,Status,Priority",
                "1,A,100.0,false,new,low",
                "2,A,200.0,true,new,low",
                ",,,,Note,High value order",
            ]
        );
    }

    #[tokio::test]
    async fn test_append_to_missing_report_fails() {
        let temp_dir = TempDir::new().unwrap();
        let sink = CsvReportSink::new(temp_dir.path());
        let report = ReportHandle {
            name: "gone".to_string(),
            location: temp_dir
                .path()
                .join("gone.csv")
                .to_string_lossy()
                .into_owned(),
        };

        let result = sink
            .append_rows(&report, &[ReportRow::high_value_note()])
            .await;

        assert!(matches!(result, Err(OrderError::IoError(_))));
        assert!(!temp_dir.path().join("gone.csv").exists());
    }
}
