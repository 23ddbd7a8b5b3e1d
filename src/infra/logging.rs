//! # Logging Module / 日志模块
//!
//! Diagnostic logging goes to stderr through `tracing`; reports stay on stdout.
//!
//! 诊断日志通过 `tracing` 输出到 stderr；报告保留在 stdout。

use tracing::level_filters::LevelFilter;

/// Map a `-v` count to a level: none → warn, `-v` → info, `-vv` → debug, more → trace.
/// 将 `-v` 的次数映射为日志级别。
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber. Calling it again is a no-op.
/// 安装全局订阅器。重复调用不会产生效果。
pub fn init_logging(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_for(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
