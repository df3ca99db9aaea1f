//! Configuration loading and parsing.
//!
//! Parses `leapedit.toml` (or an override path supplied by the binary). Every
//! field has a default so a missing file, a missing table, or a partially
//! specified table all yield a usable configuration. Unknown fields are ignored
//! so the file format can grow without warnings.
//!
//! ```toml
//! [editor]
//! undo_capacity = 256
//! page_lines = 20
//!
//! [input]
//! help_delay_ms = 700
//! double_space_ms = 400
//! less_page_lines = 20
//! ```
//!
//! Out-of-range values are clamped when read through the `Config` accessors,
//! never rejected.

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// File name looked up in the working directory and the platform config dir.
pub const CONFIG_FILE_NAME: &str = "leapedit.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_undo_capacity")]
    pub undo_capacity: usize,
    #[serde(default = "EditorConfig::default_page_lines")]
    pub page_lines: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            undo_capacity: Self::default_undo_capacity(),
            page_lines: Self::default_page_lines(),
        }
    }
}

impl EditorConfig {
    const fn default_undo_capacity() -> usize {
        256
    }
    const fn default_page_lines() -> usize {
        20
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct InputConfig {
    /// Delay before a still-armed command prefix pops up help.
    #[serde(default = "InputConfig::default_help_delay_ms")]
    pub help_delay_ms: u64,
    /// Window within which two spaces on the same line trigger the leading-tab rule.
    #[serde(default = "InputConfig::default_double_space_ms")]
    pub double_space_ms: u64,
    /// Lines advanced per `Space` in less mode.
    #[serde(default = "InputConfig::default_less_page_lines")]
    pub less_page_lines: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            help_delay_ms: Self::default_help_delay_ms(),
            double_space_ms: Self::default_double_space_ms(),
            less_page_lines: Self::default_less_page_lines(),
        }
    }
}

impl InputConfig {
    const fn default_help_delay_ms() -> u64 {
        700
    }
    const fn default_double_space_ms() -> u64 {
        400
    }
    const fn default_less_page_lines() -> usize {
        20
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Errors surfaced by [`load_strict`]. The lenient [`load_from`] never returns them.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Best-effort config path: working directory first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("leapedit").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Load configuration, falling back to defaults when the file is absent or invalid.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    match load_strict(path.clone()) {
        Ok(cfg) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(cfg)
        }
        Err(ConfigError::Read { .. }) => Ok(Config::default()),
        Err(e) => {
            warn!(target: "config", error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration, reporting read and parse failures.
pub fn load_strict(path: PathBuf) -> std::result::Result<Config, ConfigError> {
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let file = toml::from_str::<ConfigFile>(&content)
        .map_err(|source| ConfigError::Parse { path, source })?;
    Ok(Config {
        raw: Some(content),
        file,
    })
}

impl Config {
    /// Undo history bound (at least 1).
    pub fn undo_capacity(&self) -> usize {
        self.clamped("editor.undo_capacity", self.file.editor.undo_capacity, 1)
    }

    /// Lines moved by PageUp/PageDown (at least 1).
    pub fn page_lines(&self) -> usize {
        self.clamped("editor.page_lines", self.file.editor.page_lines, 1)
    }

    /// Lines moved by `Space` in less mode (at least 1).
    pub fn less_page_lines(&self) -> usize {
        self.clamped("input.less_page_lines", self.file.input.less_page_lines, 1)
    }

    pub fn help_delay(&self) -> Duration {
        Duration::from_millis(self.file.input.help_delay_ms)
    }

    pub fn double_space_window(&self) -> Duration {
        Duration::from_millis(self.file.input.double_space_ms)
    }

    fn clamped(&self, key: &'static str, raw: usize, min: usize) -> usize {
        if raw < min {
            info!(target: "config", key, raw, clamped = min, "config_value_clamped");
            min
        } else {
            raw
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
        assert_eq!(cfg.undo_capacity(), 256);
        assert_eq!(cfg.help_delay(), Duration::from_millis(700));
    }

    #[test]
    fn parses_partial_tables() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[editor]\npage_lines = 5\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.page_lines(), 5);
        assert_eq!(cfg.undo_capacity(), 256);
        assert_eq!(cfg.less_page_lines(), 20);
    }

    #[test]
    fn parses_input_fields() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[input]\nhelp_delay_ms = 250\ndouble_space_ms = 150\nless_page_lines = 3\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.help_delay(), Duration::from_millis(250));
        assert_eq!(cfg.double_space_window(), Duration::from_millis(150));
        assert_eq!(cfg.less_page_lines(), 3);
        assert!(cfg.raw.is_some());
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[editor\nundo_capacity = ").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
        let strict = load_strict(tmp.path().to_path_buf());
        assert!(matches!(strict, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn strict_reports_missing_file() {
        let err = load_strict(PathBuf::from("__nope__.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("__nope__.toml"));
    }

    #[test]
    fn zero_values_clamp_with_config_log() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[editor]\nundo_capacity = 0\npage_lines = 0\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let (undo, page) = with_default(subscriber, || (cfg.undo_capacity(), cfg.page_lines()));

        assert_eq!(undo, 1);
        assert_eq!(page, 1);
        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("config_value_clamped"));
    }
}
