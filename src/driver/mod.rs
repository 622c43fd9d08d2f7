//! GPIO パルスドライバの抽象化
//!
//! `PulseDriver` を実装することで、実機用とテスト用(Mock)の
//! 実装を切り替えることができます。

use std::fmt;
use std::time::{Duration, Instant};

pub mod hal;
pub mod mock;
pub mod pinout;
#[cfg(feature = "rpi")]
pub mod rpi;

/// ドライバ操作の結果の型
pub type DriverResult<T> = Result<T, DriverError>;

/// デジタル入力のレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Low => f.write_str("LOW"),
            Level::High => f.write_str("HIGH"),
        }
    }
}

/// ピン番号の数え方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpioMode {
    /// SoC の GPIO 番号（Broadcom）
    #[default]
    Bcm,
    /// 40ピンヘッダの物理ピン番号
    Board,
}

impl fmt::Display for GpioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpioMode::Bcm => f.write_str("BCM"),
            GpioMode::Board => f.write_str("BOARD"),
        }
    }
}

/// GPIO ドライバのエラー
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DriverError {
    /// 指定レベルへの遷移がタイムアウト内に起きなかった
    #[error("pin {pin} did not reach {level} within {timeout:?}")]
    Timeout {
        pin: u8,
        level: Level,
        timeout: Duration,
    },
    /// ドライバが扱っていないピン
    #[error("pin {0} is not handled by this driver")]
    UnknownPin(u8),
    /// set_output / set_input されていないピンを操作した
    #[error("pin {0} has not been configured")]
    PinNotConfigured(u8),
    /// ドライバ生成時と異なるピン番号モード
    #[error("driver is bound to {bound} numbering, {requested} was requested")]
    ModeMismatch { bound: GpioMode, requested: GpioMode },
    /// BOARD 番号に対応する GPIO がない
    #[error("physical pin {0} is not a GPIO on the 40-pin header")]
    NotAGpio(u8),
    /// ハードウェア層のエラー
    #[error("GPIO error: {0}")]
    Gpio(String),
}

/// 超音波センサーのトリガー/エコー制御インターフェース
///
/// ピン番号は `configure_mode` で選んだ数え方で解釈されます。
pub trait PulseDriver {
    /// ピン番号の数え方を選択する
    fn configure_mode(&mut self, mode: GpioMode) -> DriverResult<()>;

    /// ピンを出力に設定する（初期レベルは LOW）
    fn set_output(&mut self, pin: u8) -> DriverResult<()>;

    /// 出力ピンに `width` 幅の HIGH パルスを出す
    fn pulse(&mut self, pin: u8, width: Duration) -> DriverResult<()>;

    /// ピンを入力に設定する
    fn set_input(&mut self, pin: u8) -> DriverResult<()>;

    /// 入力ピンが `level` になるまで待ち、その時刻を返す
    ///
    /// `timeout` 内に遷移しなければ `DriverError::Timeout`。
    fn wait_for_level(&mut self, pin: u8, level: Level, timeout: Duration)
        -> DriverResult<Instant>;

    /// ピンを解放する
    fn release(&mut self, pins: &[u8]);

    /// サンプル間の待機
    fn settle(&mut self, wait: Duration) {
        std::thread::sleep(wait);
    }
}

impl<D: PulseDriver + ?Sized> PulseDriver for &mut D {
    fn configure_mode(&mut self, mode: GpioMode) -> DriverResult<()> {
        (**self).configure_mode(mode)
    }

    fn set_output(&mut self, pin: u8) -> DriverResult<()> {
        (**self).set_output(pin)
    }

    fn pulse(&mut self, pin: u8, width: Duration) -> DriverResult<()> {
        (**self).pulse(pin, width)
    }

    fn set_input(&mut self, pin: u8) -> DriverResult<()> {
        (**self).set_input(pin)
    }

    fn wait_for_level(
        &mut self,
        pin: u8,
        level: Level,
        timeout: Duration,
    ) -> DriverResult<Instant> {
        (**self).wait_for_level(pin, level, timeout)
    }

    fn release(&mut self, pins: &[u8]) {
        (**self).release(pins)
    }

    fn settle(&mut self, wait: Duration) {
        (**self).settle(wait)
    }
}
