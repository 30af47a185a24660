use crate::{errors::AppError, tools::FileService};
use async_trait::async_trait;
use std::sync::Arc;

pub type DynTool = Arc<dyn Tool + Send + Sync + 'static>;

#[derive(Clone)]
pub struct CommandRegistry {
    tools: Vec<(String, DynTool)>,
}

impl CommandRegistry {
    pub fn new(service: Arc<FileService>) -> Self {
        Self::with_tools(service, Vec::new())
    }

    /// The four file commands plus any `extra` tools.
    pub fn with_tools(service: Arc<FileService>, extra: Vec<DynTool>) -> Self {
        use crate::tools::{
            list_files::ListFilesTool, read_file::ReadFileTool, search::SearchTool,
            write_file::WriteFileTool,
        };
        let mut tools: Vec<DynTool> = vec![
            Arc::new(ListFilesTool::new(service.clone())),
            Arc::new(ReadFileTool::new(service.clone())),
            Arc::new(WriteFileTool::new(service.clone())),
            Arc::new(SearchTool::new(service)),
        ];
        tools.extend(extra);
        tools.sort_by(|a, b| a.name().cmp(b.name()));
        Self { tools: tools.into_iter().map(|t| (t.name().to_string(), t)).collect() }
    }

    pub fn get(&self, name: &str) -> Option<DynTool> { self.tools.iter().find(|(n, _)| n == name).map(|(_, t)| t.clone()) }
    pub fn list_names(&self) -> Vec<String> { self.tools.iter().map(|(n, _)| n.clone()).collect() }
}

/// A single protocol command backed by the file service.
#[async_trait]
pub trait Tool {
    fn name(&self) -> &'static str;
    async fn call(&self, params: serde_json::Value) -> Result<serde_json::Value, AppError>;
}
