//! JSON-lines command ingestion for `psyscan serve`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc::UnboundedSender,
};

use crate::telemetry::DiscourseTelemetry;

/// Commands accepted from the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsoleCommand {
    /// Analyze an inline text.
    Analyze {
        /// Speech text.
        text: String,
        /// Declared language; the configured one when absent.
        #[serde(default)]
        language: Option<String>,
        /// Block size override.
        #[serde(default)]
        block_size: Option<usize>,
        /// Echoed back with the result.
        #[serde(default)]
        correlation_id: Option<String>,
    },
    /// Exit the loop.
    Quit,
}

/// Receives JSON line commands and forwards them to the runtime.
pub struct ConsoleCommandReceiver {
    sender: UnboundedSender<ConsoleCommand>,
    telemetry: Option<DiscourseTelemetry>,
}

impl ConsoleCommandReceiver {
    /// Creates a new receiver.
    #[must_use]
    pub const fn new(
        sender: UnboundedSender<ConsoleCommand>,
        telemetry: Option<DiscourseTelemetry>,
    ) -> Self {
        Self { sender, telemetry }
    }

    /// Reads stdin until `quit` or end of input.
    pub async fn run(&self) -> Result<()> {
        self.run_with(BufReader::new(tokio::io::stdin())).await
    }

    /// Reads commands from `reader` until `quit` or end of input.
    pub async fn run_with<R>(&self, reader: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();
        let mut line_no = 0_usize;
        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let cmd: ConsoleCommand = serde_json::from_str(&line)
                .with_context(|| format!("invalid console command JSON on line {line_no}"))?;
            if matches!(cmd, ConsoleCommand::Quit) {
                break;
            }
            self.sender
                .send(cmd)
                .context("console command channel closed")?;
        }
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(
                shared_logging::LogLevel::Info,
                "discourse.console.receiver_shutdown",
                serde_json::json!({ "lines": line_no }),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test]
    async fn forwards_commands_until_quit() {
        let (tx, mut rx) = unbounded_channel();
        let receiver = ConsoleCommandReceiver::new(tx, None);
        let input: &[u8] = concat!(
            r#"{"type":"analyze","text":"Le peuple.","language":"fr"}"#,
            "\n\n",
            r#"{"type":"quit"}"#,
            "\n",
            r#"{"type":"analyze","text":"ignored"}"#,
            "\n",
        )
        .as_bytes();
        receiver.run_with(input).await.unwrap();
        drop(receiver);
        let first = rx.recv().await.unwrap();
        assert_eq!(
            first,
            ConsoleCommand::Analyze {
                text: "Le peuple.".into(),
                language: Some("fr".into()),
                block_size: None,
                correlation_id: None,
            }
        );
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn rejects_malformed_lines() {
        let (tx, _rx) = unbounded_channel();
        let receiver = ConsoleCommandReceiver::new(tx, None);
        let input: &[u8] = b"{\"type\":\"dance\"}\n";
        let err = receiver.run_with(input).await.unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}
