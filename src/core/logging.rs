// Logging setup built on flexi_logger; all bus components log through the
// `log` facade and the embedding application decides whether to call this.

// Global static logger handle for flexi_logger
static LOGGER_HANDLE: std::sync::OnceLock<std::sync::Mutex<flexi_logger::LoggerHandle>> =
    std::sync::OnceLock::new();

/// Initialise logging for the process.
///
/// `log_level` accepts any flexi_logger spec string ("info", "debug",
/// "sysbus=trace", ...). Colored output is opt-in so embedders writing to
/// files or pipes get plain text.
pub fn init_logging(
    log_level: Option<&str>,
    color_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    use flexi_logger::Logger;

    let level_str = log_level.unwrap_or("info");

    let mut logger = Logger::try_with_str(level_str)?;
    if color_enabled {
        logger = logger.format(simple_color_format);
    } else {
        logger = logger.format(simple_format);
    }

    let handle = logger.start()?;
    let _ = LOGGER_HANDLE.set(std::sync::Mutex::new(handle));

    Ok(())
}

/// Change the active log level at runtime.
///
/// Only the level can change after initialisation; format and output target
/// are fixed by flexi_logger's design.
pub fn reconfigure_log_level(log_level: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(handle_mutex) = LOGGER_HANDLE.get() {
        if let Ok(mut handle) = handle_mutex.lock() {
            let _ = handle.parse_and_push_temp_spec(log_level);
            Ok(())
        } else {
            Err("Could not acquire logger handle lock".into())
        }
    } else {
        Err("Logger handle not initialised. Call init_logging first.".into())
    }
}

// Plain text format: "YYYY-MM-DD HH:mm:ss.fff INF message (bus/manager.rs:42)"
fn simple_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        level_abbreviation(record.level()),
        record.args(),
        format_target_as_path(record.target(), record.line())
    )
}

// Colored variant of the same layout
fn simple_color_format(
    w: &mut dyn std::io::Write,
    now: &mut flexi_logger::DeferredNow,
    record: &log::Record,
) -> Result<(), std::io::Error> {
    use colored::*;

    let level_colored = match record.level() {
        log::Level::Error => "ERR".red().bold(),
        log::Level::Warn => "WRN".yellow(),
        log::Level::Info => "INF".green(),
        log::Level::Debug => "DBG".blue(),
        log::Level::Trace => "TRC".magenta(),
    };

    write!(
        w,
        "{} {} {} ({})",
        now.format("%Y-%m-%d %H:%M:%S%.3f").to_string().dimmed(),
        level_colored,
        record.args(),
        format_target_as_path(record.target(), record.line()).dimmed()
    )
}

fn level_abbreviation(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERR",
        log::Level::Warn => "WRN",
        log::Level::Info => "INF",
        log::Level::Debug => "DBG",
        log::Level::Trace => "TRC",
    }
}

// Convert sysbus::bus::manager -> bus/manager.rs:42 for readable source refs
fn format_target_as_path(target: &str, line: Option<u32>) -> String {
    let path_like = if let Some(without_prefix) = target.strip_prefix("sysbus::") {
        without_prefix.replace("::", "/") + ".rs"
    } else {
        target.replace("::", "/")
    };

    if let Some(line_num) = line {
        format!("{}:{}", path_like, line_num)
    } else {
        path_like
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::sync::Once;

    static INIT: Once = Once::new();

    fn init_test_logging() {
        INIT.call_once(|| {
            // Only call this once to avoid "logger already initialized" errors
            let _ = init_logging(Some("debug"), false);
        });
    }

    #[test]
    #[serial]
    fn test_log_macros_work_after_init() {
        init_test_logging();

        log::info!("Test info message");
        log::debug!("Test debug message");
        log::warn!("Test warning message");
    }

    #[test]
    #[serial]
    fn test_runtime_level_reconfiguration() {
        init_test_logging();

        let result = reconfigure_log_level("trace");
        assert!(result.is_ok(), "level change should succeed after init");
    }

    #[test]
    fn test_format_produces_expected_layout() {
        let mut buffer = Vec::new();
        let mut now = flexi_logger::DeferredNow::new();

        let record = log::Record::builder()
            .level(log::Level::Info)
            .target("sysbus::bus::manager")
            .args(format_args!("Test message"))
            .build();

        simple_format(&mut buffer, &mut now, &record).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        assert!(output.contains("INF"), "should contain level abbreviation");
        assert!(output.contains("Test message"), "should contain message");
        assert!(
            output.contains("(bus/manager.rs"),
            "should format target as a source path, got: {}",
            output
        );
    }

    #[test]
    fn test_target_path_formatting() {
        assert_eq!(
            format_target_as_path("sysbus::monitor::poller", Some(7)),
            "monitor/poller.rs:7"
        );
        assert_eq!(
            format_target_as_path("other_crate::module", None),
            "other_crate/module"
        );
    }
}
