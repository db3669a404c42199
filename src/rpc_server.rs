//! Watchtime history host: tracker messages over stdin/stdout.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "type":"updateVideoTime", "url":"...", "title":"...", "videoTime":12.5}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Logs go to stderr so stdout carries protocol lines only.

use serde_json::{json, Value};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use watchtime::app::{init_tracing, App};
use watchtime::rpc_handler::handle_message;

/// Wraps a handler response in the line envelope.
fn envelope(id: Value, response: Value) -> Value {
    match response.get("error").and_then(|e| e.as_str()) {
        Some(err) => json!({"id": id, "error": err}),
        None => json!({"id": id, "result": response}),
    }
}

async fn write_line(stdout: &mut io::Stdout, value: &Value) -> io::Result<()> {
    let mut line = value.to_string();
    line.push('\n');
    stdout.write_all(line.as_bytes()).await?;
    stdout.flush().await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("info");

    let app = match App::from_env() {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "Failed to initialize Watchtime");
            return Err(e);
        }
    };
    app.startup().await;

    let mut stdout = io::stdout();
    write_line(
        &mut stdout,
        &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}),
    )
    .await?;

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let request: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                debug!(error = %e, "Unparseable request line");
                write_line(&mut stdout, &json!({"id": null, "error": format!("parse error: {}", e)}))
                    .await?;
                continue;
            }
        };

        let id = request.get("id").cloned().unwrap_or(Value::Null);
        let response = handle_message(&app.history, &request).await;
        write_line(&mut stdout, &envelope(id, response)).await?;
    }

    info!("stdin closed, history host exiting");
    Ok(())
}
