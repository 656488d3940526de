//! Candidate collection
//!
//! Merges positional arguments, an optional newline-delimited file and
//! optionally stdin into one stream of raw candidate strings. A background
//! producer feeds a bounded channel, so huge inputs are never held in memory
//! and the consumer sees the first candidates immediately.
//!
//! The producer emits at most one terminal `InputError`, always before it
//! closes the candidate channel.

pub mod extractor;

pub use extractor::{UserId, extract_user_id};

use log::debug;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};

use crate::utils::MAX_INPUT_LINE_BYTES;

/// Candidates buffered between the producer and the orchestrator.
const INPUT_CHANNEL_CAPACITY: usize = 64;

/// Terminal failure of the candidate source
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {source_name}: {source}")]
    Io {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{source_name}: line exceeds {limit} bytes")]
    LineTooLong { source_name: String, limit: usize },

    #[error("no inputs provided")]
    NoInputs,
}

/// Receiving half of a candidate source
#[derive(Debug)]
pub struct InputStream {
    /// Raw candidates in source order; closes when production ends.
    pub inputs: mpsc::Receiver<String>,
    /// Fires at most once, before `inputs` closes.
    pub error: oneshot::Receiver<InputError>,
    /// True when the candidate count is known up front (arguments only).
    pub total_known: bool,
    /// Candidate count when `total_known`; otherwise the argument count.
    pub total: u64,
}

impl InputStream {
    /// Build a stream over fixed candidates, with no error.
    #[must_use]
    pub fn from_candidates<I>(candidates: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let candidates: Vec<String> = candidates.into_iter().map(Into::into).collect();
        let (tx, inputs) = mpsc::channel(candidates.len().max(1));
        let total = candidates.len() as u64;
        for candidate in candidates {
            // Capacity covers every candidate, so this never fails.
            let _ = tx.try_send(candidate);
        }
        let (_error_tx, error) = oneshot::channel();
        Self {
            inputs,
            error,
            total_known: true,
            total,
        }
    }

    /// Known total for progress sizing.
    #[must_use]
    pub fn known_total(&self) -> Option<u64> {
        self.total_known.then_some(self.total)
    }
}

/// Start collecting candidates from arguments, a file, and process stdin.
#[must_use]
pub fn collect_inputs(args: Vec<String>, input_file: Option<PathBuf>, read_stdin: bool) -> InputStream {
    let stdin = read_stdin.then(tokio::io::stdin);
    collect_inputs_from(args, input_file, stdin)
}

/// Start collecting candidates, reading the stdin part from `stdin` if given.
#[must_use]
pub fn collect_inputs_from<R>(
    args: Vec<String>,
    input_file: Option<PathBuf>,
    stdin: Option<R>,
) -> InputStream
where
    R: AsyncRead + Send + Unpin + 'static,
{
    let total_known = input_file.is_none() && stdin.is_none();
    let total = args.len() as u64;
    let (tx, inputs) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
    let (error_tx, error) = oneshot::channel();

    tokio::spawn(async move {
        if let Err(e) = produce(args, input_file, stdin, &tx).await {
            debug!("input collection stopped: {e}");
            let _ = error_tx.send(e);
        }
        // `tx` drops here, after any error was delivered.
        drop(tx);
    });

    InputStream {
        inputs,
        error,
        total_known,
        total,
    }
}

async fn produce<R>(
    args: Vec<String>,
    input_file: Option<PathBuf>,
    stdin: Option<R>,
    tx: &mpsc::Sender<String>,
) -> Result<(), InputError>
where
    R: AsyncRead + Unpin,
{
    let mut count: u64 = 0;

    for arg in args {
        if tx.send(arg).await.is_err() {
            return Ok(());
        }
        count += 1;
    }

    if let Some(path) = input_file {
        let file = open_input_file(&path).await?;
        let source_name = path.display().to_string();
        match stream_lines(BufReader::new(file), &source_name, tx).await? {
            Some(n) => count += n,
            None => return Ok(()),
        }
    }

    if let Some(stdin) = stdin {
        match stream_lines(BufReader::new(stdin), "stdin", tx).await? {
            Some(n) => count += n,
            None => return Ok(()),
        }
    }

    if count == 0 {
        return Err(InputError::NoInputs);
    }
    Ok(())
}

async fn open_input_file(path: &Path) -> Result<tokio::fs::File, InputError> {
    tokio::fs::File::open(path).await.map_err(|source| InputError::Io {
        source_name: path.display().to_string(),
        source,
    })
}

/// Send trimmed, non-empty lines. Returns `None` once the receiver is gone.
async fn stream_lines<R>(
    mut reader: R,
    source_name: &str,
    tx: &mpsc::Sender<String>,
) -> Result<Option<u64>, InputError>
where
    R: AsyncBufRead + Unpin,
{
    let mut count = 0;
    let mut buf = Vec::new();
    // One extra byte leaves room for the newline of a line at the limit.
    let read_limit = MAX_INPUT_LINE_BYTES as u64 + 1;

    loop {
        buf.clear();
        let read = (&mut reader)
            .take(read_limit)
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|source| InputError::Io {
                source_name: source_name.to_string(),
                source,
            })?;
        if read == 0 {
            return Ok(Some(count));
        }

        let line = buf.strip_suffix(b"\n").unwrap_or(&buf);
        if line.len() > MAX_INPUT_LINE_BYTES {
            return Err(InputError::LineTooLong {
                source_name: source_name.to_string(),
                limit: MAX_INPUT_LINE_BYTES,
            });
        }

        let line = String::from_utf8_lossy(line);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if tx.send(line.to_string()).await.is_err() {
            return Ok(None);
        }
        count += 1;
    }
}
