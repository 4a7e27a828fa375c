//! Interception of the interactive input fed to a recorded process.
//!
//! The interceptor sits between the operator and the child: a relay task
//! reads lines from the operator's input stream, writes each one into the
//! child's stdin pipe unchanged, and keeps a copy for the recipe.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt};
use tokio::process::ChildStdin;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Handle to the relay task for one recording.
///
/// The task does not forward anything until [`attach`](Self::attach) hands
/// it the child's stdin; it stops when the operator stream is exhausted,
/// when the child closes its end of the pipe, or when
/// [`finish`](Self::finish) signals that the child has exited.
pub struct InputInterceptor {
    stdin_tx: Option<oneshot::Sender<ChildStdin>>,
    exit_tx: Option<oneshot::Sender<()>>,
    relay: JoinHandle<Vec<String>>,
}

impl InputInterceptor {
    /// Spawn the relay task over `source`, the operator's input stream.
    pub fn spawn<R>(source: R) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let (stdin_tx, stdin_rx) = oneshot::channel();
        let (exit_tx, exit_rx) = oneshot::channel();
        let relay = tokio::spawn(relay_lines(source, stdin_rx, exit_rx));
        Self {
            stdin_tx: Some(stdin_tx),
            exit_tx: Some(exit_tx),
            relay,
        }
    }

    /// Hand the freshly spawned child's stdin to the relay task.
    ///
    /// Completes the handshake the task blocks on before forwarding its
    /// first line. Calling it more than once has no effect.
    pub fn attach(&mut self, stdin: ChildStdin) {
        if let Some(tx) = self.stdin_tx.take() {
            let _ = tx.send(stdin);
        }
    }

    /// Signal that the child has exited, join the relay task, and return
    /// the lines that were actually forwarded, in order.
    pub async fn finish(mut self) -> Vec<String> {
        // If no child was ever attached, dropping the sender unblocks the
        // handshake so the task can end with no lines recorded.
        drop(self.stdin_tx.take());
        if let Some(tx) = self.exit_tx.take() {
            let _ = tx.send(());
        }
        match self.relay.await {
            Ok(lines) => lines,
            Err(err) => {
                tracing::warn!(error = %err, "input relay task failed");
                Vec::new()
            }
        }
    }
}

async fn relay_lines<R>(
    mut source: R,
    stdin_rx: oneshot::Receiver<ChildStdin>,
    mut exit_rx: oneshot::Receiver<()>,
) -> Vec<String>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let mut lines = Vec::new();

    // Nothing may be consumed from the operator until the child exists.
    let Ok(mut sink) = stdin_rx.await else {
        return lines;
    };

    let mut buffer = String::new();
    loop {
        buffer.clear();
        tokio::select! {
            _ = &mut exit_rx => break,
            read = source.read_line(&mut buffer) => match read {
                Ok(0) => break, // operator input exhausted
                Ok(_) => {
                    let line = buffer.strip_suffix('\n').unwrap_or(&buffer);
                    if forward(&mut sink, line).await.is_err() {
                        // Child closed its end of the pipe.
                        break;
                    }
                    lines.push(line.to_string());
                    tracing::debug!(line = %line, "forwarded input line");
                    // The child may have exited while the line was in flight.
                    match exit_rx.try_recv() {
                        Err(oneshot::error::TryRecvError::Empty) => {}
                        _ => break,
                    }
                }
                Err(err) => {
                    tracing::debug!(error = %err, "operator input stream failed");
                    break;
                }
            },
        }
    }

    // Dropping the write end closes the pipe; the child sees EOF.
    drop(sink);
    lines
}

async fn forward(sink: &mut ChildStdin, line: &str) -> std::io::Result<()> {
    sink.write_all(line.as_bytes()).await?;
    sink.write_all(b"\n").await?;
    sink.flush().await
}
