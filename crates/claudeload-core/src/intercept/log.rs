//! Append-only intercept log
//!
//! One line per entry: `<[TAG]> <arg> <arg> ...`. Text arguments are written
//! verbatim, anything else as JSON.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde_json::Value;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

static SHARED_LOGS: Lazy<DashMap<PathBuf, InterceptLog>> = Lazy::new(DashMap::new);

/// Kind of log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTag {
    Request,
    Body,
    Response,
    StreamChunk,
    StreamError,
    PayloadLoaded,
}

impl LogTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "[REQUEST]",
            Self::Body => "[BODY]",
            Self::Response => "[RESPONSE]",
            Self::StreamChunk => "[STREAM CHUNK]",
            Self::StreamError => "[STREAM ERROR]",
            Self::PayloadLoaded => "[PAYLOAD LOADED]",
        }
    }
}

impl fmt::Display for LogTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to an append-only log file
///
/// The file is opened on first append and kept open; a failed write drops
/// the handle so the next append reopens it.
#[derive(Clone)]
pub struct InterceptLog {
    inner: Arc<LogInner>,
}

struct LogInner {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl InterceptLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(LogInner {
                path: path.into(),
                file: Mutex::new(None),
            }),
        }
    }

    /// The process-wide log for `path`
    pub fn shared(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        SHARED_LOGS
            .entry(path.clone())
            .or_insert_with(|| Self::new(path))
            .clone()
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Append an entry, reporting failures only through tracing
    pub fn append<I, V>(&self, tag: LogTag, args: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if let Err(e) = self.try_append(tag, args) {
            warn!(
                "Failed to append to intercept log {}: {}",
                self.inner.path.display(),
                e
            );
        }
    }

    pub fn try_append<I, V>(&self, tag: LogTag, args: I) -> io::Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let line = format_line(tag, args);

        let mut file = self.inner.file.lock();
        let handle = match file.take() {
            Some(handle) => handle,
            None => OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.inner.path)?,
        };
        let handle = file.insert(handle);

        let result = handle.write_all(line.as_bytes());
        if result.is_err() {
            *file = None;
        }
        result
    }
}

/// Render one log line, newline included
pub fn format_line<I, V>(tag: LogTag, args: I) -> String
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let mut line = String::from(tag.as_str());
    for arg in args {
        line.push(' ');
        match arg.into() {
            Value::String(text) => line.push_str(&text),
            other => line.push_str(&other.to_string()),
        }
    }
    line.push('\n');
    line
}

/// First `max` characters of `text`
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_line_text_and_json_args() {
        assert_eq!(
            format_line(LogTag::Request, ["https://api.anthropic.com/v1"]),
            "[REQUEST] https://api.anthropic.com/v1\n"
        );
        assert_eq!(
            format_line(LogTag::Body, [json!("x"), json!({"a": 1}), json!(3)]),
            "[BODY] x {\"a\":1} 3\n"
        );
        assert_eq!(
            format_line(LogTag::StreamChunk, Vec::<String>::new()),
            "[STREAM CHUNK]\n"
        );
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 2), "he");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("日本語", 1), "日");
        assert_eq!(truncate_chars("", 0), "");
    }

    #[test]
    fn test_append_creates_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intercept.log");
        std::fs::write(&path, "existing\n").unwrap();

        let log = InterceptLog::new(&path);
        log.append(LogTag::Request, ["a"]);
        log.append(LogTag::Response, ["b"]);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "existing\n[REQUEST] a\n[RESPONSE] b\n");
    }

    #[test]
    fn test_append_failure_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let log = InterceptLog::new(dir.path().join("missing").join("intercept.log"));
        log.append(LogTag::Request, ["a"]);
        assert!(log.try_append(LogTag::Request, ["a"]).is_err());
    }

    #[test]
    fn test_append_reopens_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("later");
        let log = InterceptLog::new(parent.join("intercept.log"));

        assert!(log.try_append(LogTag::Request, ["lost"]).is_err());
        assert!(log.inner.file.lock().is_none());

        std::fs::create_dir(&parent).unwrap();
        log.try_append(LogTag::Request, ["kept"]).unwrap();
        log.try_append(LogTag::Response, ["too"]).unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content, "[REQUEST] kept\n[RESPONSE] too\n");
    }

    #[test]
    fn test_shared_returns_same_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.log");
        let first = InterceptLog::shared(&path);
        let second = InterceptLog::shared(&path);
        assert!(Arc::ptr_eq(&first.inner, &second.inner));
    }

    #[test]
    fn test_concurrent_appends_keep_lines_whole() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("concurrent.log");
        let log = InterceptLog::new(&path);
        let payload = "x".repeat(4096);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let log = log.clone();
                let payload = payload.as_str();
                scope.spawn(move || {
                    for _ in 0..25 {
                        log.append(LogTag::StreamChunk, [payload]);
                    }
                });
            }
        });

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 200);
        let expected = format!("[STREAM CHUNK] {payload}");
        assert!(lines.iter().all(|line| *line == expected));
    }
}
