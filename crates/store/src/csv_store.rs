use csv::{ReaderBuilder, Writer};
use klinesight_core::market::ingest::RawTable;
use klinesight_core::store::error::StoreError;
use klinesight_core::store::port::ArtifactStore;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// 写入文件头部的 UTF-8 BOM，便于表格软件识别中文
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// # Summary
/// 基于 CSV 文件的产物存储实现。
///
/// # Invariants
/// - 所有文件写入 `base_path` 目录下，目录不存在时在构造时创建。
/// - 表格以 UTF-8 BOM 开头；读取时自动去除。
pub struct CsvArtifactStore {
    base_path: PathBuf,
}

impl CsvArtifactStore {
    /// # Summary
    /// 在全局根目录下创建存储。
    ///
    /// # Returns
    /// * `Result<Self, StoreError>` - 存储实例或目录创建失败。
    pub fn new() -> Result<Self, StoreError> {
        Self::with_dir(crate::config::get_root_dir())
    }

    /// # Summary
    /// 在指定目录下创建存储。
    ///
    /// # Logic
    /// 1. 确保目录存在。
    pub fn with_dir(base_path: PathBuf) -> Result<Self, StoreError> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| StoreError::InitError(e.to_string()))?;
        }
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

fn csv_error(e: csv::Error) -> StoreError {
    StoreError::Csv(e.to_string())
}

impl ArtifactStore for CsvArtifactStore {
    /// # Summary
    /// 写入 CSV 表格。
    ///
    /// # Logic
    /// 1. 创建（覆盖）目标文件并写入 BOM。
    /// 2. 依次写入表头与数据行，行长度不足时以空单元格补齐。
    /// 3. 刷新缓冲区。
    fn save_table(&self, file_name: &str, table: &RawTable) -> Result<PathBuf, StoreError> {
        let path = self.base_path.join(file_name);
        let mut file = File::create(&path).map_err(|e| StoreError::Io(e.to_string()))?;
        file.write_all(UTF8_BOM)
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let mut writer = Writer::from_writer(file);
        writer.write_record(&table.headers).map_err(csv_error)?;
        let width = table.headers.len();
        for row in &table.rows {
            let cells = (0..width).map(|i| row.get(i).map_or("", String::as_str));
            writer.write_record(cells).map_err(csv_error)?;
        }
        writer.flush().map_err(|e| StoreError::Io(e.to_string()))?;

        info!(path = %path.display(), rows = table.rows.len(), "table saved");
        Ok(path)
    }

    /// # Summary
    /// 读取 CSV 表格。
    ///
    /// # Logic
    /// 1. 文件不存在时返回 `StoreError::NotFound`。
    /// 2. 允许行长度与表头不一致。
    /// 3. 去除首个表头上的 BOM。
    fn load_table(&self, path: &Path) -> Result<RawTable, StoreError> {
        if !path.exists() {
            return Err(StoreError::NotFound(path.display().to_string()));
        }
        let file = File::open(path).map_err(|e| StoreError::Io(e.to_string()))?;
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);

        let headers = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();
        let mut table = RawTable::new(headers);
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            table.push_row(record.iter().map(str::to_string).collect());
        }

        debug!(path = %path.display(), rows = table.rows.len(), "table loaded");
        Ok(table)
    }

    fn save_text(&self, file_name: &str, content: &str) -> Result<PathBuf, StoreError> {
        let path = self.base_path.join(file_name);
        fs::write(&path, content).map_err(|e| StoreError::Io(e.to_string()))?;
        info!(path = %path.display(), "text saved");
        Ok(path)
    }
}
