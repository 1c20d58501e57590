use std::{
    fmt,
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
    sync::RwLock,
};

use anyhow::Result;
use once_cell::sync::Lazy;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/** \brief 日志目录的环境变量覆盖。 */
pub const LOG_DIR_ENV: &str = "ANTIGRAVITY_SNIPPETS_LOG_DIR";

const DEFAULT_LOG_DIR: &str = "logs";
const LOG_FILE: &str = "antigravity-snippets.log";

static TELEMETRY_ENABLED: Lazy<RwLock<bool>> = Lazy::new(|| RwLock::new(false));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Info => "INFO",
            Level::Error => "ERROR",
        })
    }
}

/**
 * \brief 追加写入单个日志文件的遥测落点。
 * \details 关闭时不创建目录也不创建文件。
 */
#[derive(Debug, Clone)]
pub struct TelemetrySink {
    dir: PathBuf,
    enabled: bool,
}

impl TelemetrySink {
    pub fn new(dir: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            dir: dir.into(),
            enabled,
        }
    }

    /**
     * \brief 以全局开关与 `ANTIGRAVITY_SNIPPETS_LOG_DIR`（缺省 `logs`）构造。
     */
    pub fn from_env() -> Self {
        let dir = std::env::var(LOG_DIR_ENV).unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());
        Self::new(dir, is_enabled())
    }

    pub fn log_file(&self) -> PathBuf {
        self.dir.join(LOG_FILE)
    }

    /**
     * \brief 写入一行日志；返回是否实际写入。
     */
    pub fn record(&self, level: Level, category: &str, message: &str) -> Result<bool> {
        if !self.enabled {
            return Ok(false);
        }
        std::fs::create_dir_all(&self.dir)?;
        let timestamp = OffsetDateTime::now_utc().format(&Rfc3339)?;
        append_line(&self.log_file(), &format_line(&timestamp, level, category, message))?;
        Ok(true)
    }
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", line)?;
    Ok(())
}

fn format_line(timestamp: &str, level: Level, category: &str, message: &str) -> String {
    format!("{} [{}] {} - {}", timestamp, level, category, message)
}

/**
 * \brief 更新遥测开关状态。
 */
pub fn set_enabled(enabled: bool) {
    if let Ok(mut guard) = TELEMETRY_ENABLED.write() {
        *guard = enabled;
    }
}

pub fn is_enabled() -> bool {
    TELEMETRY_ENABLED.read().map(|g| *g).unwrap_or(false)
}

fn log(level: Level, category: &str, message: &str) {
    if let Err(err) = TelemetrySink::from_env().record(level, category, message) {
        eprintln!("telemetry write failed: {}", err);
    }
}

/**
 * \brief 记录常规事件。
 */
pub fn log_event(category: &str, message: &str) {
    log(Level::Info, category, message);
}

/**
 * \brief 记录错误事件。
 */
pub fn log_error(category: &str, message: &str) {
    log(Level::Error, category, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(sink: &TelemetrySink) -> Vec<String> {
        std::fs::read_to_string(sink.log_file())
            .expect("read log file")
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_format_line_layout() {
        let line = format_line("2026-01-01T00:00:00Z", Level::Info, "cli.show", "language=go");
        assert_eq!(line, "2026-01-01T00:00:00Z [INFO] cli.show - language=go");
    }

    #[test]
    fn test_enabled_sink_appends_lines_with_levels() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let sink = TelemetrySink::new(tmp.path().join("logs"), true);

        assert!(sink.record(Level::Info, "cli.show", "language=go").expect("info"));
        assert!(sink.record(Level::Error, "server.snippet", "resolve failed").expect("error"));

        let lines = read_lines(&sink);
        assert_eq!(lines.len(), 2);
        let (ts, rest) = lines[0].split_once(' ').expect("timestamp prefix");
        OffsetDateTime::parse(ts, &Rfc3339).expect("rfc3339 timestamp");
        assert_eq!(rest, "[INFO] cli.show - language=go");
        assert!(lines[1].ends_with(" [ERROR] server.snippet - resolve failed"));
    }

    #[test]
    fn test_disabled_sink_creates_nothing() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().join("logs");
        let sink = TelemetrySink::new(&dir, false);

        assert!(!sink.record(Level::Info, "cli.show", "dropped").expect("info"));
        assert!(!sink.record(Level::Error, "cli.show", "dropped").expect("error"));
        assert!(!dir.exists());
        assert!(!sink.log_file().exists());
    }
}
