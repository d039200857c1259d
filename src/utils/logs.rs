use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// 解析日志级别字符串（不区分大小写）
pub fn parse_log_level(level: &str) -> Result<LogLevel, String> {
    match level.to_lowercase().as_str() {
        "error" => Ok(LogLevel::Error),
        "warn" => Ok(LogLevel::Warn),
        "info" => Ok(LogLevel::Info),
        "debug" => Ok(LogLevel::Debug),
        "trace" => Ok(LogLevel::Trace),
        "off" => Ok(LogLevel::Off),
        other => Err(format!("无效的日志级别: {}", other)),
    }
}

/// 动态设置日志输出级别（不持久化）
pub fn set_view_log_level(level: &str) -> Result<(), String> {
    let level = parse_log_level(level)?;
    log::set_max_level(level.to_filter());
    Ok(())
}

/// 获取当前日志级别
pub fn get_view_log_level() -> LogLevel {
    match log::max_level() {
        log::LevelFilter::Error => LogLevel::Error,
        log::LevelFilter::Warn => LogLevel::Warn,
        log::LevelFilter::Info => LogLevel::Info,
        log::LevelFilter::Debug => LogLevel::Debug,
        log::LevelFilter::Trace => LogLevel::Trace,
        log::LevelFilter::Off => LogLevel::Off,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!(parse_log_level("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(parse_log_level("trace").unwrap(), LogLevel::Trace);
        assert!(parse_log_level("verbose").is_err());
    }

    #[test]
    fn set_and_get_round_trip() {
        set_view_log_level("info").unwrap();
        assert_eq!(get_view_log_level(), LogLevel::Info);
        assert!(set_view_log_level("loud").is_err());
        assert_eq!(get_view_log_level(), LogLevel::Info);
    }
}
