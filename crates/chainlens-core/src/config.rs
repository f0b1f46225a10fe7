//! 설정 관리.
//!
//! 우선순위: 기본값 → TOML 파일(선택) → `CHAINLENS__섹션__키` 환경 변수.

use crate::error::PipelineResult;
use crate::logging::{LogConfig, LogFormat};
use crate::types::{parse_weekday, RsiSmoothing};
use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// 환경 변수 접두사.
pub const ENV_PREFIX: &str = "CHAINLENS";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub pipeline: PipelineConfig,
    pub chain: ChainConfig,
    pub export: ExportConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 필터 지시어
    pub level: String,
    /// 출력 형식 (pretty, json, compact)
    pub format: LogFormat,
    /// 파일명/줄 번호 출력
    pub file_line: bool,
    /// span 진입/종료 이벤트 출력
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
            file_line: false,
            span_events: false,
        }
    }
}

impl LoggingConfig {
    /// `init_logging`에 넘길 설정으로 변환합니다.
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig::new(self.level.clone())
            .with_format(self.format)
            .with_file(self.file_line)
            .with_span_events(self.span_events)
    }
}

/// 가격 시계열 / 매매 기록 파이프라인 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// RSI 기간
    pub rsi_period: usize,
    /// RSI 평활화 방식
    pub rsi_smoothing: RsiSmoothing,
    /// 스냅샷에 사용하는 SMA 기간
    pub sma_period: usize,
    /// 날짜 파싱 형식 (순서대로 시도)
    pub date_formats: Vec<String>,
    /// 분석 전에 제외할 요일 (영문 이름)
    pub exclude_weekdays: Vec<String>,
    /// 리포트에 포함할 최근 추세 라벨 수
    pub trend_tail: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            rsi_smoothing: RsiSmoothing::Simple,
            sma_period: 14,
            date_formats: default_date_formats(),
            exclude_weekdays: vec!["Saturday".to_string()],
            trend_tail: 30,
        }
    }
}

impl PipelineConfig {
    /// 제외 요일을 파싱합니다.
    pub fn excluded_weekdays(&self) -> PipelineResult<Vec<Weekday>> {
        self.exclude_weekdays
            .iter()
            .map(|name| {
                parse_weekday(name).ok_or_else(|| {
                    crate::PipelineError::Config(format!("unknown weekday in exclude_weekdays: {}", name))
                })
            })
            .collect()
    }
}

/// 기본 날짜 형식 목록.
///
/// 날짜+시간 형식이 먼저 오고, 날짜만 있는 형식이 뒤따릅니다. `%.f`는
/// 소수 초가 없는 값도 받습니다.
pub fn default_date_formats() -> Vec<String> {
    [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d",
        "%d-%b-%Y",
        "%d %b %Y",
        "%b %d, %Y",
        "%m/%d/%Y",
        "%d-%m-%Y",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// 옵션 체인 분석 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// 1 로트당 계약 수
    pub lot_size: u32,
    /// 하루 목표 수익 (통화 단위)
    pub target_daily_profit: Decimal,
    /// ATM 기준 행사가 범위 (가격 단위, ±)
    pub strike_window: Decimal,
    /// 방향별 추천 개수
    pub max_recommendations: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            lot_size: 75,
            target_daily_profit: Decimal::new(750, 0),
            strike_window: Decimal::new(10, 0),
            max_recommendations: 3,
        }
    }
}

/// CSV 내보내기 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    /// 구분자 (한 글자)
    pub delimiter: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
        }
    }
}

impl ExportConfig {
    /// 구분자를 바이트로 반환합니다.
    pub fn delimiter_byte(&self) -> PipelineResult<u8> {
        match self.delimiter.as_bytes() {
            [b] => Ok(*b),
            _ if self.delimiter == "\\t" => Ok(b'\t'),
            _ => Err(crate::PipelineError::Config(format!(
                "delimiter must be a single ASCII character: {:?}",
                self.delimiter
            ))),
        }
    }
}

impl AppConfig {
    /// 파일(선택)과 환경 변수에서 설정을 로드합니다.
    pub fn load(path: Option<&Path>) -> PipelineResult<Self> {
        Self::load_with_env(path, None)
    }

    /// 환경 변수 소스를 직접 지정하여 로드합니다 (`None`이면 프로세스 환경).
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> PipelineResult<Self> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path));
        }
        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("pipeline.exclude_weekdays")
                    .source(env),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 로드합니다.
    pub fn from_toml_str(toml: &str) -> PipelineResult<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from_str(toml, ::config::FileFormat::Toml))
            .build()?;
        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 값 범위를 검증합니다.
    pub fn validate(&self) -> PipelineResult<()> {
        use crate::PipelineError::Config;

        if self.pipeline.rsi_period == 0 {
            return Err(Config("pipeline.rsi_period must be positive".into()));
        }
        if self.pipeline.sma_period == 0 {
            return Err(Config("pipeline.sma_period must be positive".into()));
        }
        if self.pipeline.date_formats.is_empty() {
            return Err(Config("pipeline.date_formats must not be empty".into()));
        }
        if self.chain.lot_size == 0 {
            return Err(Config("chain.lot_size must be positive".into()));
        }
        if self.chain.strike_window.is_sign_negative() {
            return Err(Config("chain.strike_window must not be negative".into()));
        }
        self.pipeline.excluded_weekdays()?;
        self.export.delimiter_byte()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.pipeline.rsi_period, 14);
        assert_eq!(config.pipeline.exclude_weekdays, vec!["Saturday"]);
        assert_eq!(config.chain.lot_size, 75);
        assert_eq!(config.chain.target_daily_profit, dec!(750));
        assert_eq!(config.export.delimiter_byte().unwrap(), b',');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [pipeline]
            rsi_period = 9
            rsi_smoothing = "wilder"

            [chain]
            strike_window = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.pipeline.rsi_period, 9);
        assert_eq!(config.pipeline.rsi_smoothing, RsiSmoothing::Wilder);
        assert_eq!(config.pipeline.trend_tail, 30);
        assert_eq!(config.chain.strike_window, dec!(50));
        assert_eq!(config.chain.lot_size, 75);
    }

    #[test]
    fn test_env_overrides() {
        let mut env = HashMap::new();
        env.insert("CHAINLENS__CHAIN__LOT_SIZE".to_string(), "50".to_string());
        env.insert(
            "CHAINLENS__PIPELINE__EXCLUDE_WEEKDAYS".to_string(),
            "Saturday,Sunday".to_string(),
        );
        env.insert("CHAINLENS__LOGGING__FORMAT".to_string(), "json".to_string());
        env.insert("CHAINLENS__LOGGING__FILE_LINE".to_string(), "true".to_string());

        let config = AppConfig::load_with_env(None, Some(env)).unwrap();
        assert_eq!(config.chain.lot_size, 50);
        assert_eq!(config.pipeline.exclude_weekdays, vec!["Saturday", "Sunday"]);
        assert_eq!(config.logging.format, LogFormat::Json);
        let log = config.logging.to_log_config();
        assert!(log.with_file);
        assert!(!log.with_span_events);
        assert_eq!(
            config.pipeline.excluded_weekdays().unwrap(),
            vec![Weekday::Sat, Weekday::Sun]
        );
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let shipped = AppConfig::from_toml_str(include_str!("../../../config/default.toml")).unwrap();
        assert_eq!(shipped, AppConfig::default());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(AppConfig::from_toml_str("[chain]\nlot_size = 0\n").is_err());
        assert!(AppConfig::from_toml_str("[pipeline]\nexclude_weekdays = [\"Caturday\"]\n").is_err());
        assert!(AppConfig::from_toml_str("[export]\ndelimiter = \";;\"\n").is_err());
    }
}
