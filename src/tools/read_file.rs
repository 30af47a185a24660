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
pub struct ReadFileParams {
    pub filepath: String,
}

#[derive(Debug, Serialize)]
pub struct ReadFileOutput {
    pub filepath: String,
    pub content: String,
}

impl FileService {
    pub fn read_file(&self, filepath: &str) -> AppResult<ReadFileOutput> {
        let full = self.guard().admit(filepath)?;
        let content = fs::read_to_string(&full).map_err(|e| AppError::read_failed(filepath, e))?;
        Ok(ReadFileOutput { filepath: filepath.to_string(), content })
    }
}

pub struct ReadFileTool { service: Arc<FileService> }

impl ReadFileTool { pub fn new(service: Arc<FileService>) -> Self { Self { service } } }

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &'static str { "read_file" }
    async fn call(&self, params: serde_json::Value) -> Result<serde_json::Value, AppError> {
        let p: ReadFileParams = parse_params(self.name(), params)?;
        to_output(&self.service.read_file(&p.filepath)?)
    }
}
