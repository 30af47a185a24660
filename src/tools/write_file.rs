use crate::{
    errors::{AppError, AppResult},
    protocol::registry::Tool,
    tools::{parse_params, to_output, FileService},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{fs, sync::Arc};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriteFileParams {
    pub filepath: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct WriteFileOutput {
    pub message: String,
}

impl FileService {
    /// Overwrites `filepath` with `content`, creating missing parent directories.
    pub fn write_file(&self, filepath: &str, content: &str) -> AppResult<WriteFileOutput> {
        let full = self.guard().admit(filepath)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::write_failed(filepath, e))?;
        }
        fs::write(&full, content.as_bytes()).map_err(|e| AppError::write_failed(filepath, e))?;
        tracing::debug!(path = %full.display(), bytes = content.len(), "file written");
        Ok(WriteFileOutput { message: format!("wrote file '{filepath}'") })
    }
}

pub struct WriteFileTool { service: Arc<FileService> }

impl WriteFileTool { pub fn new(service: Arc<FileService>) -> Self { Self { service } } }

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &'static str { "write_file" }
    async fn call(&self, params: serde_json::Value) -> Result<serde_json::Value, AppError> {
        let p: WriteFileParams = parse_params(self.name(), params)?;
        to_output(&self.service.write_file(&p.filepath, &p.content)?)
    }
}
