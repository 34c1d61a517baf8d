//! Delivery through a sendmail-compatible command
//!
//! The composed message is written to the command's stdin; recipients are
//! taken from the headers (`sendmail -t`). Any MTA that ships a sendmail
//! shim (postfix, exim, msmtp) works.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{DeliveryStatus, Notifier};
use crate::error::{Error, Result};
use crate::notifications::email::EmailMessage;

/// Pipes messages into a sendmail-compatible program
#[derive(Debug, Clone)]
pub struct SendmailNotifier {
    program: String,
    args: Vec<String>,
}

impl SendmailNotifier {
    /// Create a notifier from a command line such as `["sendmail", "-t", "-i"]`
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for an empty command line
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| Error::config("mail.sendmail_command must not be empty"))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl Notifier for SendmailNotifier {
    fn name(&self) -> &str {
        "sendmail"
    }

    async fn deliver(&self, message: &EmailMessage) -> Result<DeliveryStatus> {
        tracing::debug!(program = %self.program, "Handing message to sendmail");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::notify(format!("Could not start {}: {e}", self.program)))?;

        let raw = message.to_string();
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(raw.as_bytes())
                .await
                .map_err(|e| Error::notify(format!("Could not write message: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| Error::notify(format!("{} did not finish: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::notify(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(DeliveryStatus::delivered_with_message(
            self.name(),
            message.recipients().join(", "),
        ))
    }
}
