use crate::{
    errors::{into_envelope, AppError},
    protocol::{
        registry::CommandRegistry,
        types::{Envelope, Request},
    },
};
use anyhow::Context;
use futures::FutureExt;
use std::{any::Any, panic::AssertUnwindSafe, time::Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Reads one request per line until end of input, answering each with exactly
/// one response line. Requests are handled strictly in order; a long listing
/// or search blocks the next request, which keeps writes single-writer.
pub async fn serve<R, W>(registry: &CommandRegistry, mut reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf).await.context("reading request line")?;
        if n == 0 {
            break;
        }
        let mut line = handle_line(registry, &buf).await?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await.context("writing response")?;
        writer.flush().await.context("flushing response")?;
    }
    tracing::info!("input closed, shutting down");
    Ok(())
}

/// Handles one raw request line and returns the serialized response line,
/// without its trailing newline.
pub async fn handle_line(registry: &CommandRegistry, raw: &[u8]) -> anyhow::Result<String> {
    let started = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();
    let (command, outcome) = dispatch(registry, raw).await;
    let (envelope, decision, code) = match outcome.and_then(Envelope::success) {
        Ok(envelope) => (envelope, "allow", "OK"),
        Err(e) => (into_envelope(&e), "error", e.code()),
    };
    let line = serde_json::to_string(&envelope).context("serializing response")?;
    audit_end(&request_id, &command, decision, code, started.elapsed().as_millis() as u64, line.len() as u64);
    Ok(line)
}

async fn dispatch(registry: &CommandRegistry, raw: &[u8]) -> (String, Result<serde_json::Value, AppError>) {
    let request = match parse_request(raw) {
        Ok(r) => r,
        Err(e) => return (String::new(), Err(e)),
    };
    let Some(tool) = registry.get(&request.command) else {
        let command = request.command.clone();
        return (command, Err(AppError::UnknownCommand(request.command)));
    };
    let result = match AssertUnwindSafe(tool.call(request.params)).catch_unwind().await {
        Ok(r) => r,
        Err(panic) => Err(AppError::Internal(panic_message(panic.as_ref()))),
    };
    (request.command, result)
}

fn parse_request(raw: &[u8]) -> Result<Request, AppError> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let text = std::str::from_utf8(raw).map_err(|e| AppError::InvalidJson(format!("input is not valid UTF-8: {e}")))?;
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| AppError::InvalidJson(e.to_string()))?;
    serde_json::from_value(value).map_err(|e| AppError::InvalidRequest(e.to_string()))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

fn audit_end(request_id: &str, command: &str, decision: &str, code: &str, duration_ms: u64, bytes_out: u64) {
    tracing::info!(
        request_id = request_id,
        command = command,
        decision = decision,
        code = code,
        duration_ms = duration_ms,
        bytes_out = bytes_out,
        "audit"
    );
}
