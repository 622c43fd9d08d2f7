/*!
 * # HC-SR04 Ultrasonic Sensor Library
 *
 * 超音波センサー（トリガー/エコー）で距離を測定し、
 * 気温による音速補正、単位変換、液深・タンク容積の計算を行うライブラリ
 *
 * ## モジュール構成
 * - `driver`: GPIO パルスドライバの抽象化（embedded-hal 実装、Mock、Raspberry Pi）
 * - `echo_timer`: トリガー/エコーの往復時間測定とサンプル集約
 * - `measurement`: 設定を保持し各操作を提供するファサード
 * - `config`: `cfg.toml` からのアプリケーション設定
 *
 * 計算部分はハードウェア非依存の `sonar_core` クレートにあります。
 */

pub mod config;
pub mod config_validation;
pub mod driver;
pub mod echo_timer;
pub mod error;
pub mod measurement;

pub use config::{AppConfig, ConfigError};
pub use driver::{DriverError, GpioMode, Level, PulseDriver};
pub use error::{SensorError, SensorResult};
pub use measurement::{basic_distance, Measurement, MeasurementConfig};
pub use sonar_core::UnitSystem;

/// ライブラリのバージョン情報
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
