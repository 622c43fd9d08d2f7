/// Raspberry Pi 用ドライバ（rppal）
///
/// rppal のピンは embedded-hal 1.0 を実装しているので `HalPulseDriver` に載せるだけ。
/// ピンはドライバの破棄時に元のモードへ戻される。
use log::info;
use rppal::gpio::{Gpio, InputPin, OutputPin};

use super::hal::HalPulseDriver;
use super::pinout::to_bcm;
use super::{DriverError, DriverResult, GpioMode};

/// rppal ピンで動くパルスドライバ
pub type RpiPulseDriver = HalPulseDriver<OutputPin, InputPin>;

fn gpio_error(error: rppal::gpio::Error) -> DriverError {
    DriverError::Gpio(error.to_string())
}

/// トリガー/エコーのピンを確保してドライバを作成
///
/// # 引数
/// * `trig_pin` / `echo_pin` - `mode` で数えたピン番号
/// * `mode` - ピン番号の数え方（BOARD の場合は BCM に変換して確保する）
pub fn open(trig_pin: u8, echo_pin: u8, mode: GpioMode) -> DriverResult<RpiPulseDriver> {
    let trig_bcm = to_bcm(trig_pin, mode)?;
    let echo_bcm = to_bcm(echo_pin, mode)?;

    let gpio = Gpio::new().map_err(gpio_error)?;
    let trigger = gpio.get(trig_bcm).map_err(gpio_error)?.into_output_low();
    let echo = gpio.get(echo_bcm).map_err(gpio_error)?.into_input();

    info!(
        "GPIO を確保しました (Trig: {} {} = GPIO{}, Echo: {} {} = GPIO{})",
        mode, trig_pin, trig_bcm, mode, echo_pin, echo_bcm
    );
    Ok(HalPulseDriver::new(trigger, echo, trig_pin, echo_pin, mode))
}
