use std::time::Duration;

use crate::config_validation::{
    parse_gpio_mode, parse_timeout_ms, validate_pins, validate_sample_size,
};
use crate::driver::GpioMode;
use crate::measurement::MeasurementConfig;

pub use crate::config_validation::ConfigError;

/// アプリケーション設定
///
/// ビルド時に`cfg.toml`ファイルから読み込まれます。
/// ファイルがない場合は以下のデフォルト値が使われます。
#[toml_cfg::toml_config]
pub struct Config {
    #[default(17)]
    trig_pin: u8,

    #[default(27)]
    echo_pin: u8,

    #[default(20.0)] // imperial の場合は °F
    temperature: f64,

    #[default("metric")]
    unit: &'static str,

    #[default("BCM")]
    gpio_mode: &'static str,

    #[default(11)]
    sample_size: u32,

    #[default(100)] // サンプル間待機（ミリ秒）
    sample_wait_ms: u64,

    #[default(100)] // エコー待ちタイムアウト（ミリ秒）
    echo_timeout_ms: u64,
}

/// 検証済みのアプリケーション設定
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// トリガーピン
    pub trig_pin: u8,

    /// エコーピン
    pub echo_pin: u8,

    /// 気温（metric: ℃、imperial: °F）
    pub temperature: f64,

    /// 単位系（検証は測定時に行う）
    pub unit: String,

    /// ピン番号の数え方
    pub gpio_mode: GpioMode,

    /// サンプル数
    pub sample_size: usize,

    /// サンプル間待機時間
    pub sample_wait: Duration,

    /// エコー待ちタイムアウト
    pub echo_timeout: Duration,
}

impl AppConfig {
    /// 設定ファイルから設定をロードします
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_config(&CONFIG)
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        validate_pins(config.trig_pin, config.echo_pin)?;

        Ok(AppConfig {
            trig_pin: config.trig_pin,
            echo_pin: config.echo_pin,
            temperature: config.temperature,
            unit: config.unit.to_string(),
            gpio_mode: parse_gpio_mode(config.gpio_mode)?,
            sample_size: validate_sample_size(config.sample_size)?,
            // 0ms 待機は許容する
            sample_wait: Duration::from_millis(config.sample_wait_ms),
            echo_timeout: parse_timeout_ms("echo_timeout_ms", config.echo_timeout_ms)?,
        })
    }

    /// 測定器の設定に変換
    pub fn measurement_config(&self) -> MeasurementConfig {
        MeasurementConfig::new(self.trig_pin, self.echo_pin)
            .with_temperature(self.temperature)
            .with_unit(self.unit.clone())
            .with_gpio_mode(self.gpio_mode)
            .with_echo_timeout(self.echo_timeout)
    }
}
