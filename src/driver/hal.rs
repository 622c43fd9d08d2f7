/// embedded-hal 1.0 のデジタルピンを使った PulseDriver 実装
///
/// トリガー/エコーの2本のピンを生成時に束縛し、時刻は `std::time::Instant` で測る。
/// Raspberry Pi では rppal のピン、その他のボードでも embedded-hal を実装した
/// ピンであればそのまま使えます。
use std::time::{Duration, Instant};

use embedded_hal::digital::{InputPin, OutputPin};
use log::{debug, warn};

use super::{DriverError, DriverResult, GpioMode, Level, PulseDriver};

fn gpio_error<E: embedded_hal::digital::Error>(error: E) -> DriverError {
    DriverError::Gpio(format!("{:?}", error))
}

/// embedded-hal ピンのペアで動くパルスドライバ
pub struct HalPulseDriver<T, E> {
    trigger: T,
    echo: E,
    trig_pin: u8,
    echo_pin: u8,
    mode: GpioMode,
    trigger_ready: bool,
    echo_ready: bool,
}

impl<T: OutputPin, E: InputPin> HalPulseDriver<T, E> {
    /// 新しいドライバを作成
    ///
    /// # 引数
    /// * `trigger` - トリガー用の出力ピン
    /// * `echo` - エコー用の入力ピン
    /// * `trig_pin` / `echo_pin` - `mode` で数えたそれぞれのピン番号
    /// * `mode` - ピン番号の数え方
    pub fn new(trigger: T, echo: E, trig_pin: u8, echo_pin: u8, mode: GpioMode) -> Self {
        Self {
            trigger,
            echo,
            trig_pin,
            echo_pin,
            mode,
            trigger_ready: false,
            echo_ready: false,
        }
    }

    /// ピンを取り出してドライバを破棄する
    pub fn into_pins(self) -> (T, E) {
        (self.trigger, self.echo)
    }

    fn expect_trigger(&self, pin: u8) -> DriverResult<()> {
        if pin != self.trig_pin {
            return Err(DriverError::UnknownPin(pin));
        }
        Ok(())
    }

    fn expect_echo(&self, pin: u8) -> DriverResult<()> {
        if pin != self.echo_pin {
            return Err(DriverError::UnknownPin(pin));
        }
        Ok(())
    }
}

impl<T: OutputPin, E: InputPin> PulseDriver for HalPulseDriver<T, E> {
    fn configure_mode(&mut self, mode: GpioMode) -> DriverResult<()> {
        if mode != self.mode {
            return Err(DriverError::ModeMismatch {
                bound: self.mode,
                requested: mode,
            });
        }
        Ok(())
    }

    fn set_output(&mut self, pin: u8) -> DriverResult<()> {
        self.expect_trigger(pin)?;
        self.trigger.set_low().map_err(gpio_error)?;
        self.trigger_ready = true;
        Ok(())
    }

    fn pulse(&mut self, pin: u8, width: Duration) -> DriverResult<()> {
        self.expect_trigger(pin)?;
        if !self.trigger_ready {
            return Err(DriverError::PinNotConfigured(pin));
        }

        self.trigger.set_high().map_err(gpio_error)?;
        // thread::sleep はマイクロ秒精度が出ないのでビジーウェイト
        let start = Instant::now();
        while start.elapsed() < width {
            std::hint::spin_loop();
        }
        self.trigger.set_low().map_err(gpio_error)?;
        Ok(())
    }

    fn set_input(&mut self, pin: u8) -> DriverResult<()> {
        self.expect_echo(pin)?;
        self.echo_ready = true;
        Ok(())
    }

    fn wait_for_level(
        &mut self,
        pin: u8,
        level: Level,
        timeout: Duration,
    ) -> DriverResult<Instant> {
        self.expect_echo(pin)?;
        if !self.echo_ready {
            return Err(DriverError::PinNotConfigured(pin));
        }

        let want_high = level == Level::High;
        let start = Instant::now();
        loop {
            let now = Instant::now();
            if self.echo.is_high().map_err(gpio_error)? == want_high {
                return Ok(now);
            }
            if now.duration_since(start) > timeout {
                return Err(DriverError::Timeout {
                    pin,
                    level,
                    timeout,
                });
            }
            std::hint::spin_loop();
        }
    }

    fn release(&mut self, pins: &[u8]) {
        if pins.contains(&self.trig_pin) && self.trigger_ready {
            if let Err(e) = self.trigger.set_low() {
                warn!("トリガーピン GPIO{} を LOW に戻せませんでした: {:?}", self.trig_pin, e);
            }
            self.trigger_ready = false;
        }
        if pins.contains(&self.echo_pin) {
            self.echo_ready = false;
        }
        debug!("Released pins {:?}", pins);
    }
}
