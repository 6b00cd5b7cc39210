//! Line-delimited JSON event processing.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use sentinel_core::Event;

use crate::error::StreamError;
use crate::processor::Fingerprint;

/// Counters for one pass over an event stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    pub processed: u64,
    pub skipped: u64,
}

/// Fingerprint every NDJSON event read from `reader` and write the
/// results, one per line, to `writer`.
///
/// Blank lines are ignored. With `skip_invalid`, lines that are not valid
/// events are logged and dropped; otherwise the first one aborts the run.
pub async fn process_stream<R, W>(
    processor: &mut Fingerprint,
    mut reader: R,
    mut writer: W,
    skip_invalid: bool,
) -> Result<StreamStats, StreamError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = StreamStats::default();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        line_no += 1;

        let event = match parse_line(&buf, line_no) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) if skip_invalid => {
                tracing::warn!(error = %e, "Skipping invalid event");
                stats.skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let event = processor
            .run(event)
            .map_err(|source| StreamError::Process {
                line: line_no,
                source,
            })?;

        let mut out = serde_json::to_vec(&event.to_json())?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        stats.processed += 1;
    }

    writer.flush().await?;
    tracing::info!(
        processed = stats.processed,
        skipped = stats.skipped,
        "Event stream complete"
    );
    Ok(stats)
}

/// Decode one raw line. Blank lines yield `None`.
fn parse_line(raw: &[u8], line_no: usize) -> Result<Option<Event>, StreamError> {
    let line = std::str::from_utf8(raw).map_err(|source| StreamError::InvalidUtf8 {
        line: line_no,
        source,
    })?;
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let json: serde_json::Value =
        serde_json::from_str(line).map_err(|source| StreamError::InvalidJson {
            line: line_no,
            source,
        })?;
    Event::from_json(json)
        .map(Some)
        .map_err(|source| StreamError::InvalidEvent {
            line: line_no,
            source,
        })
}
