use crate::application::dto::{WorkerMessage, WorkerReply};
use crate::ports::outbound::LayoutWorkerPort;
use crate::shared::Result;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// Totals of one JSON-lines session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonLinesSummary {
    pub messages: usize,
    pub errors: usize,
}

/// Drives a layout worker from newline-delimited JSON
///
/// Reads one `{ id, type, data }` message per line and writes one reply per
/// line, in the same order. Lines that are not valid messages get an error
/// reply (with the `id` recovered when possible) and do not end the session.
/// Blank lines are skipped. Returns when `reader` reaches end of input.
pub async fn serve_json_lines<W, R, O>(
    worker: &W,
    reader: R,
    mut writer: O,
) -> Result<JsonLinesSummary>
where
    W: LayoutWorkerPort + ?Sized,
    R: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut summary = JsonLinesSummary::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        summary.messages += 1;

        let reply = match serde_json::from_str::<WorkerMessage>(line) {
            Ok(message) => worker.dispatch(message).await?,
            Err(e) => {
                warn!(error = %e, "Unreadable worker message");
                WorkerReply::error(recover_id(line), format!("Invalid message: {}", e))
            }
        };
        if !reply.is_success() {
            summary.errors += 1;
        }

        let mut encoded = serde_json::to_string(&reply)?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
    }

    debug!(
        messages = summary.messages,
        errors = summary.errors,
        "JSON-lines input exhausted"
    );
    Ok(summary)
}

/// Best-effort `id` of a line that failed to parse as a message, `null` if none
fn recover_id(line: &str) -> Value {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(mut map)) => map.remove("id").unwrap_or(Value::Null),
        _ => Value::Null,
    }
}
