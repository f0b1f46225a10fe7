//! tracing 기반 로깅 초기화.
//!
//! 출력 형식:
//! - **pretty**: 터미널에서 읽기 쉬운 형식
//! - **json**: 로그 수집기로 넘길 때 사용하는 JSON 형식
//! - **compact**: 한 줄 요약 형식
//!
//! 로그는 모두 stderr로 나가므로 stdout의 리포트/CSV 출력과 섞이지 않습니다.

use crate::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 필터 지시어 (예: "info", "chainlens_analytics=debug")
    pub level: String,
    pub format: LogFormat,
    /// span 진입/종료 이벤트 출력 여부
    pub with_span_events: bool,
    /// 파일명/줄 번호 출력 여부
    pub with_file: bool,
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            with_span_events: false,
            with_file: false,
            with_target: true,
        }
    }
}

impl LogConfig {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    /// 로그 형식을 설정합니다.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// span 진입/종료 이벤트를 켜거나 끕니다.
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.with_span_events = enabled;
        self
    }

    /// 파일 위치 출력을 켜거나 끕니다.
    pub fn with_file(mut self, enabled: bool) -> Self {
        self.with_file = enabled;
        self
    }

    /// 환경 변수 `RUST_LOG` / `LOG_FORMAT`의 값으로 덮어씁니다.
    ///
    /// 값이 없거나 형식을 알 수 없으면 기존 값을 유지합니다.
    pub fn override_from_env(mut self) -> Self {
        if let Ok(level) = std::env::var("RUST_LOG") {
            if !level.trim().is_empty() {
                self.level = level;
            }
        }
        if let Some(format) = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.format = format;
        }
        self
    }
}

/// 전역 subscriber를 설치합니다.
///
/// 이미 설치되어 있으면 `PipelineError::Config`를 반환합니다.
///
/// ```no_run
/// use chainlens_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig::new("debug").with_format(LogFormat::Json)).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> PipelineResult<()> {
    let env_filter = EnvFilter::try_new(&config.level)
        .map_err(|e| PipelineError::Config(format!("invalid log filter '{}': {}", config.level, e)))?;

    let span_events = if config.with_span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.with_file)
        .with_line_number(config.with_file)
        .with_target(config.with_target)
        .with_span_events(span_events);

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = match config.format {
        LogFormat::Pretty => registry.with(base.pretty()).try_init(),
        LogFormat::Json => registry.with(base.json()).try_init(),
        LogFormat::Compact => registry.with(base.compact()).try_init(),
    };
    installed.map_err(|e| PipelineError::Config(format!("logging already initialized: {}", e)))?;

    tracing::debug!(
        format = ?config.format,
        level = %config.level,
        "Logging initialized"
    );

    Ok(())
}

/// 파이프라인 단계 span을 생성하는 매크로.
///
/// ```ignore
/// let _guard = pipeline_span!("coerce", "stocks").entered();
/// ```
#[macro_export]
macro_rules! pipeline_span {
    ($stage:expr) => {
        tracing::info_span!("pipeline", stage = %$stage)
    };
    ($stage:expr, $variant:expr) => {
        tracing::info_span!("pipeline", stage = %$stage, variant = %$variant)
    };
    ($stage:expr, $variant:expr, $rows:expr) => {
        tracing::info_span!("pipeline", stage = %$stage, variant = %$variant, rows = $rows)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!(" JSON ".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new("debug")
            .with_format(LogFormat::Json)
            .with_span_events(true)
            .with_file(true);

        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.with_span_events);
        assert!(config.with_file);
    }

    #[test]
    fn test_invalid_filter_is_config_error() {
        let err = init_logging(LogConfig::new("chainlens=loudest")).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
