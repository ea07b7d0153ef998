use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use crate::config::SinkConfig;

/// Append-only payload sink with explicit flush/close lifecycle.
///
/// An external collaborator of the receiver: the serve loop appends each
/// payload and flushes every `flush_interval` frames to bound data loss
/// on crash against per-frame I/O overhead.
pub trait PersistenceSink {
    /// Append one payload.
    fn append(&mut self, payload: &[u8]) -> io::Result<()>;

    /// Push buffered data to the underlying storage.
    fn flush(&mut self) -> io::Result<()>;

    /// Flush and release the sink. Further appends fail.
    fn close(&mut self) -> io::Result<()>;

    /// Human-readable destination for log lines.
    fn describe(&self) -> String;
}

/// File-backed sink writing to `<dir>/<prefix>_<unix-seconds>.<ext>`.
pub struct FileSink {
    file: Option<File>,
    path: PathBuf,
}

impl FileSink {
    /// Create the output directory if needed and open a fresh file.
    pub fn create(config: &SinkConfig) -> io::Result<Self> {
        fs::create_dir_all(&config.output_dir)?;

        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let name = format!(
            "{}_{}.{}",
            config.file_prefix, stamp, config.file_extension
        );
        let path = config.output_dir.join(name);

        let file = File::create(&path)?;
        info!(path = %path.display(), "persistence sink opened");

        Ok(Self {
            file: Some(file),
            path,
        })
    }

    /// The path this sink writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceSink for FileSink {
    fn append(&mut self, payload: &[u8]) -> io::Result<()> {
        match &mut self.file {
            Some(file) => file.write_all(payload),
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "sink already closed",
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.file {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            debug!(path = %self.path.display(), "persistence sink closed");
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Best-effort flush if the owner never called close().
        if let Some(file) = &mut self.file {
            let _ = file.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_sink_config(tag: &str) -> SinkConfig {
        SinkConfig {
            output_dir: std::env::temp_dir().join(format!(
                "xrlink-sink-{tag}-{}-{}",
                std::process::id(),
                SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .expect("time should be after epoch")
                    .as_nanos()
            )),
            file_prefix: "stream".to_string(),
            file_extension: "bin".to_string(),
        }
    }

    #[test]
    fn appended_payloads_concatenate_in_order() {
        let config = temp_sink_config("concat");
        let mut sink = FileSink::create(&config).unwrap();
        let path = sink.path().to_path_buf();

        sink.append(b"alpha").unwrap();
        sink.append(b"beta").unwrap();
        sink.close().unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"alphabeta");
        let _ = fs::remove_dir_all(&config.output_dir);
    }

    #[test]
    fn create_makes_missing_directories() {
        let mut config = temp_sink_config("mkdir");
        config.output_dir = config.output_dir.join("nested");

        let sink = FileSink::create(&config).unwrap();
        assert!(sink.path().starts_with(&config.output_dir));

        let _ = fs::remove_dir_all(config.output_dir.parent().unwrap());
    }

    #[test]
    fn filename_carries_prefix_and_extension() {
        let config = temp_sink_config("name");
        let sink = FileSink::create(&config).unwrap();

        let name = sink.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("stream_"));
        assert!(name.ends_with(".bin"));

        let _ = fs::remove_dir_all(&config.output_dir);
    }

    #[test]
    fn append_after_close_fails() {
        let config = temp_sink_config("closed");
        let mut sink = FileSink::create(&config).unwrap();

        sink.close().unwrap();
        assert!(sink.append(b"late").is_err());
        // Second close is a no-op.
        sink.close().unwrap();

        let _ = fs::remove_dir_all(&config.output_dir);
    }
}
