/// embedded-hal Driver Integration Tests
///
/// embedded-hal のデジタルピンを模したテスト用ピンで `HalPulseDriver` を動かし、
/// 実機と同じコード経路で測定・エラー処理・ピン解放を確認します。

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;
use std::time::Duration;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use hcsr04_sensor::driver::hal::HalPulseDriver;
use hcsr04_sensor::{GpioMode, Measurement, MeasurementConfig, SensorError};

const TRIG_PIN: u8 = 17;
const ECHO_PIN: u8 = 27;

/// 出力レベルの履歴を記録するトリガーピン
#[derive(Clone, Default)]
struct RecordingPin {
    history: Rc<RefCell<Vec<bool>>>,
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.history.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.history.borrow_mut().push(true);
        Ok(())
    }
}

/// 台本どおりにレベルを返すエコーピン（台本が尽きたら LOW のまま）
struct ScriptedEcho {
    levels: VecDeque<bool>,
}

impl ScriptedEcho {
    /// 各サンプルで LOW → HIGH → LOW と遷移する台本
    fn echoes(samples: usize) -> Self {
        let mut levels = VecDeque::new();
        for _ in 0..samples {
            levels.extend([false, true, true, true, false]);
        }
        Self { levels }
    }

    fn silent() -> Self {
        Self {
            levels: VecDeque::new(),
        }
    }
}

impl ErrorType for ScriptedEcho {
    type Error = Infallible;
}

impl InputPin for ScriptedEcho {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.levels.pop_front().unwrap_or(false))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.is_high()?)
    }
}

fn sensor(
    echo: ScriptedEcho,
    config: MeasurementConfig,
) -> (Measurement<HalPulseDriver<RecordingPin, ScriptedEcho>>, RecordingPin) {
    let trigger = RecordingPin::default();
    let driver = HalPulseDriver::new(
        trigger.clone(),
        echo,
        config.trig_pin,
        config.echo_pin,
        config.gpio_mode,
    );
    (Measurement::new(driver, config), trigger)
}

#[test]
fn test_hal_driver_measures_distance() {
    let config = MeasurementConfig::new(TRIG_PIN, ECHO_PIN);
    let (mut value, trigger) = sensor(ScriptedEcho::echoes(3), config);

    let distance = value.raw_distance_with(3, Duration::from_millis(1)).unwrap();
    assert!(distance.is_finite());
    assert!(distance >= 0.0);

    // set_output で LOW、3回のパルス、release で LOW
    let history = trigger.history.borrow().clone();
    assert_eq!(history.len(), 1 + 3 * 2 + 1);
    assert_eq!(history.iter().filter(|high| **high).count(), 3);
    assert_eq!(history.last(), Some(&false));
}

#[test]
fn test_hal_driver_no_pulse() {
    let config = MeasurementConfig::new(TRIG_PIN, ECHO_PIN)
        .with_echo_timeout(Duration::from_millis(5));
    let (mut value, trigger) = sensor(ScriptedEcho::silent(), config);

    let result = value.raw_distance();
    assert!(matches!(
        result,
        Err(SensorError::NoPulse { pin: ECHO_PIN, .. })
    ));
    // 1回目で打ち切り、トリガーは LOW に戻っている
    let history = trigger.history.borrow().clone();
    assert_eq!(history.iter().filter(|high| **high).count(), 1);
    assert_eq!(history.last(), Some(&false));
}

#[test]
fn test_hal_driver_invalid_unit() {
    let config = MeasurementConfig::new(TRIG_PIN, ECHO_PIN).with_unit("Fahrenheit");
    let (mut value, _) = sensor(ScriptedEcho::echoes(1), config);

    let result = value.raw_distance_with(1, Duration::ZERO);
    assert!(matches!(result, Err(SensorError::InvalidUnit(_))));
}

#[test]
fn test_hal_driver_can_measure_again_after_release() {
    let config = MeasurementConfig::new(TRIG_PIN, ECHO_PIN);
    let (mut value, _) = sensor(ScriptedEcho::echoes(2), config);

    assert!(value.raw_distance_with(1, Duration::ZERO).is_ok());
    assert!(value.raw_distance_with(1, Duration::ZERO).is_ok());
}

#[test]
fn test_hal_driver_rejects_mode_change() {
    // BCM で確保したピンを BOARD 番号として使おうとするとエラー
    let trigger = RecordingPin::default();
    let driver = HalPulseDriver::new(
        trigger,
        ScriptedEcho::echoes(1),
        TRIG_PIN,
        ECHO_PIN,
        GpioMode::Bcm,
    );
    let mut value = Measurement::new(
        driver,
        MeasurementConfig::new(TRIG_PIN, ECHO_PIN).with_gpio_mode(GpioMode::Board),
    );

    let result = value.raw_distance_with(1, Duration::ZERO);
    assert!(matches!(result, Err(SensorError::Driver(_))));
}
