//! File logging for the CLI. The terminal belongs to the report and the plot,
//! so every tracing event goes to `<data_dir>/frontier.log`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// A log past this size is cut down at startup
const ROTATE_ABOVE: u64 = 5 * 1024 * 1024;
/// Bytes of recent history that survive a cut
const RETAIN: u64 = 1024 * 1024;
const LOG_FILE_NAME: &str = "frontier.log";
const ROTATION_MARKER: &[u8] = b"--- frontier.log truncated, earlier runs dropped ---\n";

/// The last `RETAIN` bytes of `file`, starting at a line boundary.
fn recent_lines(file: &mut File, len: u64) -> io::Result<Vec<u8>> {
    file.seek(SeekFrom::Start(len.saturating_sub(RETAIN)))?;
    let mut tail = Vec::new();
    file.read_to_end(&mut tail)?;

    let first_full_line = tail
        .iter()
        .position(|&b| b == b'\n')
        .map_or(0, |newline| newline + 1);
    tail.drain(..first_full_line);
    Ok(tail)
}

/// Cut an oversized log down to its most recent lines. Missing files are fine.
fn rotate_log_if_needed(log_path: &Path) -> io::Result<()> {
    let len = match fs::metadata(log_path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if len <= ROTATE_ABOVE {
        return Ok(());
    }

    let kept = recent_lines(&mut File::open(log_path)?, len)?;

    let mut file = File::create(log_path)?;
    file.write_all(ROTATION_MARKER)?;
    file.write_all(&kept)
}

/// Log file handle shared by every writer the subscriber asks for
#[derive(Clone)]
struct SharedLogFile(Arc<Mutex<File>>);

impl SharedLogFile {
    fn new(file: File) -> Self {
        Self(Arc::new(Mutex::new(file)))
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, File>> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))
    }
}

impl Write for SharedLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock()?.flush()
    }
}

impl<'a> MakeWriter<'a> for SharedLogFile {
    type Writer = SharedLogFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install the global subscriber, appending to `<data_dir>/frontier.log`.
///
/// `level` applies to the `frontier` target; the core crate logs at `warn`
/// unless `RUST_LOG` says otherwise. A log above 5 MB is first cut to its
/// last 1 MB.
pub fn init_logging(data_dir: &Path, level: &str) -> color_eyre::Result<()> {
    fs::create_dir_all(data_dir)?;
    let log_path = data_dir.join(LOG_FILE_NAME);

    if let Err(e) = rotate_log_if_needed(&log_path) {
        eprintln!("Warning: could not rotate {}: {e}", log_path.display());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("frontier={level},frontier_core=warn")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(SharedLogFile::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .init();

    tracing::info!(log_path = %log_path.display(), "Logging to file");
    Ok(())
}
