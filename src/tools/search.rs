use crate::{
    errors::{AppError, AppResult},
    protocol::{registry::Tool, types::SearchHit},
    tools::{parse_params, to_output, FileService},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchParams {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub results: Vec<SearchHit>,
}

impl FileService {
    /// Literal, case-sensitive substring search over every listed file.
    /// Files that cannot be read as text are skipped, whatever the cause.
    pub fn search_in_files(&self, query: &str) -> AppResult<SearchOutput> {
        let listing = self.list_files(".")?;
        let mut results = Vec::new();
        for filepath in listing.files {
            let file = match self.read_file(&filepath) {
                Ok(f) => f,
                Err(e) => {
                    tracing::debug!(path = %filepath, code = e.code(), error = %e, "search skipped unreadable file");
                    continue;
                }
            };
            results.extend(
                split_lines(&file.content)
                    .into_iter()
                    .enumerate()
                    .filter(|(_, line)| line.contains(query))
                    .map(|(i, line)| SearchHit {
                        filepath: filepath.clone(),
                        line_number: i + 1,
                        line_content: line.trim().to_string(),
                    }),
            );
        }
        Ok(SearchOutput { query: query.to_string(), results })
    }
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// Splits on every line boundary, treating `\r\n` as one break. A trailing
/// break does not produce an empty last line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' && matches!(chars.peek(), Some((_, '\n'))) {
            chars.next();
            start += 1;
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

pub struct SearchTool { service: Arc<FileService> }

impl SearchTool { pub fn new(service: Arc<FileService>) -> Self { Self { service } } }

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &'static str { "search_in_files" }
    async fn call(&self, params: serde_json::Value) -> Result<serde_json::Value, AppError> {
        let p: SearchParams = parse_params(self.name(), params)?;
        to_output(&self.service.search_in_files(&p.query)?)
    }
}
