use std::time::Duration;

use sonar_core::{GeometryError, UnitError};

use crate::driver::{DriverError, Level};

/// 測定結果の型
pub type SensorResult<T> = Result<T, SensorError>;

/// 測定のエラー
///
/// どのエラーも内部でリトライはしない。再試行は呼び出し側の判断。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SensorError {
    /// エコーピンがタイムアウト内に遷移しなかった（配線不良・センサー故障）
    #[error("echo pulse was not received on pin {pin} (waiting for {level}, timeout {timeout:?})")]
    NoPulse {
        pin: u8,
        level: Level,
        timeout: Duration,
    },
    /// 単位系が metric / imperial のどちらでもない
    #[error(transparent)]
    InvalidUnit(#[from] UnitError),
    /// サンプル数が 0
    #[error("sample_size must be at least 1 (got {0})")]
    InvalidSampleSize(usize),
    /// 容積計算の寸法が範囲外
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// その他の GPIO エラー
    #[error(transparent)]
    Driver(DriverError),
}

impl From<DriverError> for SensorError {
    fn from(error: DriverError) -> Self {
        match error {
            DriverError::Timeout {
                pin,
                level,
                timeout,
            } => SensorError::NoPulse {
                pin,
                level,
                timeout,
            },
            other => SensorError::Driver(other),
        }
    }
}
