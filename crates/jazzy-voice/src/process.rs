//! Runs one external speech program to completion.

use crate::error::VoiceError;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Spawns `command`, feeds it `input` on stdin and returns its stdout.
///
/// `wrap` picks the [`VoiceError`] variant for every failure. The child is
/// killed if the timeout elapses. Stdin is written from a separate task so a
/// full stdout pipe cannot stall the write.
pub(crate) async fn run_piped(
    mut command: Command,
    input: Option<Vec<u8>>,
    timeout: Duration,
    name: &str,
    wrap: fn(String) -> VoiceError,
) -> Result<Vec<u8>, VoiceError> {
    command
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .map_err(|e| wrap(format!("failed to spawn {}: {}", name, e)))?;

    let writer = match (input, child.stdin.take()) {
        (Some(bytes), Some(mut stdin)) => Some(tokio::spawn(async move {
            let result = stdin.write_all(&bytes).await;
            drop(stdin);
            result
        })),
        (Some(_), None) => return Err(wrap(format!("{} stdin unavailable", name))),
        (None, _) => None,
    };

    let output = tokio::time::timeout(timeout, child.wait_with_output())
        .await
        .map_err(|_| wrap(format!("{} timed out after {} seconds", name, timeout.as_secs())))?
        .map_err(|e| wrap(format!("failed to wait for {}: {}", name, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(wrap(format!("{} failed: {}", name, stderr.trim())));
    }

    if let Some(writer) = writer {
        match writer.await {
            Ok(Ok(())) => {}
            // The program exited successfully without reading all of its input.
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(wrap(format!("failed to write to {}: {}", name, e))),
            Err(e) => return Err(wrap(format!("{} stdin task failed: {}", name, e))),
        }
    }

    Ok(output.stdout)
}

/// Builds a [`Command`] from a program-and-arguments list.
pub(crate) fn command_from(
    argv: &[String],
    wrap: fn(String) -> VoiceError,
) -> Result<Command, VoiceError> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| wrap("command is empty".to_string()))?;
    let mut command = Command::new(program);
    command.args(args);
    Ok(command)
}
