//! Stdio transport.
//!
//! Newline-delimited JSON: one tool request per input line, one result
//! envelope per output line. Requests are served strictly in order - each
//! invocation completes (commit or rollback) before the next line is
//! read. The loop ends on EOF or a shutdown signal, closing the pool on
//! the way out.

use crate::dispatch::ToolDispatcher;
use crate::error::{ToolError, ToolResult};
use crate::models::{Envelope, ToolRequest};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::info;

pub struct StdioServer {
    dispatcher: ToolDispatcher,
}

impl StdioServer {
    pub fn new(dispatcher: ToolDispatcher) -> Self {
        Self { dispatcher }
    }

    pub async fn run(&self) -> ToolResult<()> {
        info!("Serving tool requests over stdio");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            let line = line.trim();
                            if line.is_empty() {
                                continue;
                            }
                            let envelope = self.handle_line(line).await;
                            let mut out = serde_json::to_string(&envelope).map_err(|e| {
                                ToolError::internal(format!("failed to serialize envelope: {e}"))
                            })?;
                            out.push('\n');
                            stdout.write_all(out.as_bytes()).await.map_err(|e| {
                                ToolError::internal(format!("stdout write failed: {e}"))
                            })?;
                            stdout.flush().await.map_err(|e| {
                                ToolError::internal(format!("stdout flush failed: {e}"))
                            })?;
                        }
                        Ok(None) => {
                            info!("Input closed, shutting down");
                            break;
                        }
                        Err(e) => {
                            return Err(ToolError::internal(format!("stdin read failed: {e}")));
                        }
                    }
                }
                _ = wait_for_signal() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        info!("Closing database connection");
        self.dispatcher.gateway().close().await;
        Ok(())
    }

    /// One request line in, one envelope out. A line that does not decode
    /// as a request still produces a failure envelope rather than killing
    /// the loop.
    async fn handle_line(&self, line: &str) -> Envelope {
        match serde_json::from_str::<ToolRequest>(line) {
            Ok(request) => {
                self.dispatcher
                    .invoke(&request.operation, request.content)
                    .await
            }
            Err(e) => Envelope::failure(format!("invalid request: {e}")),
        }
    }
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn wait_for_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }
}
