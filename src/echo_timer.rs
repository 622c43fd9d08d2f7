/// トリガー/エコーによる往復時間の測定
use std::time::Duration;

use log::{debug, info, warn};
use sonar_core::{median, round_trip_distance_cm, speed_of_sound};

use crate::driver::{GpioMode, Level, PulseDriver};
use crate::error::{SensorError, SensorResult};

/// トリガーパルス幅（HC-SR04 は 10µs 以上）
pub const TRIGGER_PULSE_WIDTH: Duration = Duration::from_micros(10);

/// デフォルトのサンプル数
pub const DEFAULT_SAMPLE_SIZE: usize = 11;

/// デフォルトのサンプル間待機時間
pub const DEFAULT_SAMPLE_WAIT: Duration = Duration::from_millis(100);

/// エコーの各エッジを待つ最大時間
pub const DEFAULT_ECHO_TIMEOUT: Duration = Duration::from_millis(100);

/// 測定中だけピンを確保し、どの経路で抜けても解放する
struct PinSession<'a, D: PulseDriver> {
    driver: &'a mut D,
    pins: [u8; 2],
}

impl<'a, D: PulseDriver> PinSession<'a, D> {
    fn open(driver: &'a mut D, trig_pin: u8, echo_pin: u8, mode: GpioMode) -> SensorResult<Self> {
        let mut session = Self {
            driver,
            pins: [trig_pin, echo_pin],
        };
        session.driver.configure_mode(mode)?;
        session.driver.set_output(trig_pin)?;
        session.driver.set_input(echo_pin)?;
        Ok(session)
    }
}

impl<D: PulseDriver> Drop for PinSession<'_, D> {
    fn drop(&mut self) {
        self.driver.release(&self.pins);
    }
}

/// 超音波の往復時間を測り、距離（cm）に変換する
#[derive(Debug, Clone)]
pub struct EchoTimer {
    trig_pin: u8,
    echo_pin: u8,
    mode: GpioMode,
    speed_of_sound: f64,
    echo_timeout: Duration,
}

impl EchoTimer {
    /// # 引数
    /// * `celsius` - 音速補正に使う気温（℃）
    /// * `echo_timeout` - エコーの各エッジを待つ最大時間
    pub fn new(
        trig_pin: u8,
        echo_pin: u8,
        mode: GpioMode,
        celsius: f64,
        echo_timeout: Duration,
    ) -> Self {
        Self {
            trig_pin,
            echo_pin,
            mode,
            speed_of_sound: speed_of_sound(celsius),
            echo_timeout,
        }
    }

    /// 温度補正済みの音速（m/s）
    pub fn speed_of_sound(&self) -> f64 {
        self.speed_of_sound
    }

    /// 1回トリガーしてエコーのパルス幅を測る
    fn measure_echo<D: PulseDriver>(&self, driver: &mut D) -> SensorResult<Duration> {
        driver.pulse(self.trig_pin, TRIGGER_PULSE_WIDTH)?;
        let rise = driver.wait_for_level(self.echo_pin, Level::High, self.echo_timeout)?;
        let fall = driver.wait_for_level(self.echo_pin, Level::Low, self.echo_timeout)?;
        Ok(fall.duration_since(rise))
    }

    /// `sample_size` 回測定し、各サンプルの距離（cm）を返す
    ///
    /// サンプル間には `sample_wait` だけ待ち、残響を落ち着かせる。
    /// エコーが返らなければその時点で `SensorError::NoPulse` を返す。
    pub fn sample_distances<D: PulseDriver>(
        &self,
        driver: &mut D,
        sample_size: usize,
        sample_wait: Duration,
    ) -> SensorResult<Vec<f64>> {
        if sample_size == 0 {
            return Err(SensorError::InvalidSampleSize(sample_size));
        }

        let mut session = PinSession::open(driver, self.trig_pin, self.echo_pin, self.mode)?;
        let mut distances = Vec::with_capacity(sample_size);

        for i in 0..sample_size {
            if i > 0 {
                session.driver.settle(sample_wait);
            }

            let width = self.measure_echo(&mut *session.driver).map_err(|e| {
                warn!(
                    "エコーを受信できませんでした (Trig: {}, Echo: {}, サンプル {}/{}): {}",
                    self.trig_pin,
                    self.echo_pin,
                    i + 1,
                    sample_size,
                    e
                );
                e
            })?;
            let distance = round_trip_distance_cm(width.as_secs_f64(), self.speed_of_sound);
            debug!(
                "Sample {}/{}: echo {:?} -> {:.2} cm",
                i + 1,
                sample_size,
                width,
                distance
            );
            distances.push(distance);
        }

        Ok(distances)
    }

    /// 複数サンプルの中央値を距離（cm）として返す
    pub fn median_distance_cm<D: PulseDriver>(
        &self,
        driver: &mut D,
        sample_size: usize,
        sample_wait: Duration,
    ) -> SensorResult<f64> {
        let distances = self.sample_distances(driver, sample_size, sample_wait)?;
        let distance =
            median(&distances).ok_or(SensorError::InvalidSampleSize(distances.len()))?;
        info!(
            "📏 距離測定: {:.2} cm ({} サンプルの中央値, 音速 {:.2} m/s)",
            distance,
            distances.len(),
            self.speed_of_sound
        );
        Ok(distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::MockPulseDriver;

    const EPS: f64 = 1e-4;

    fn timer(celsius: f64) -> EchoTimer {
        EchoTimer::new(17, 27, GpioMode::Bcm, celsius, DEFAULT_ECHO_TIMEOUT)
    }

    #[test]
    fn test_single_sample() {
        let mut mock = MockPulseDriver::new(27);
        mock.queue_echo_for_distance(50.0, 20.0);

        let distance = timer(20.0)
            .median_distance_cm(&mut mock, 1, DEFAULT_SAMPLE_WAIT)
            .unwrap();
        assert!((distance - 50.0).abs() < EPS);
        assert!(mock.get_settle_waits().is_empty());
    }

    #[test]
    fn test_median_rejects_reflection_outliers() {
        let mut mock = MockPulseDriver::new(27);
        for cm in [50.0, 49.0, 300.0, 51.0, 3.0] {
            mock.queue_echo_for_distance(cm, 20.0);
        }

        let distance = timer(20.0)
            .median_distance_cm(&mut mock, 5, Duration::from_millis(10))
            .unwrap();
        assert!((distance - 50.0).abs() < EPS);
    }

    #[test]
    fn test_settles_between_samples() {
        let mut mock = MockPulseDriver::new(27);
        let wait = Duration::from_millis(30);

        timer(20.0).sample_distances(&mut mock, 4, wait).unwrap();

        assert_eq!(mock.get_settle_waits(), vec![wait; 3]);
        assert_eq!(mock.get_pulses(), vec![(17, TRIGGER_PULSE_WIDTH); 4]);
    }

    #[test]
    fn test_zero_sample_size() {
        let mut mock = MockPulseDriver::new(27);
        let result = timer(20.0).sample_distances(&mut mock, 0, DEFAULT_SAMPLE_WAIT);

        assert_eq!(result, Err(SensorError::InvalidSampleSize(0)));
        // ピンには触れない
        assert!(mock.get_modes().is_empty());
    }

    #[test]
    fn test_no_pulse_releases_pins() {
        let mut mock = MockPulseDriver::new(27);
        mock.set_no_echo(true);

        let result = timer(20.0).sample_distances(&mut mock, 3, DEFAULT_SAMPLE_WAIT);

        assert!(matches!(
            result,
            Err(SensorError::NoPulse {
                pin: 27,
                level: Level::High,
                ..
            })
        ));
        assert_eq!(mock.get_pulses().len(), 1);
        assert_eq!(mock.get_released(), vec![vec![17, 27]]);
        assert!(!mock.is_holding_pins());
    }

    #[test]
    fn test_pins_released_after_success() {
        let mut mock = MockPulseDriver::new(27);
        timer(20.0)
            .sample_distances(&mut mock, 2, DEFAULT_SAMPLE_WAIT)
            .unwrap();

        assert_eq!(mock.get_modes(), vec![GpioMode::Bcm]);
        assert_eq!(mock.get_released(), vec![vec![17, 27]]);
        assert!(!mock.is_holding_pins());
    }

    #[test]
    fn test_same_echo_reads_farther_in_warmer_air() {
        let width = Duration::from_micros(2_914);

        let mut cold = MockPulseDriver::new(27);
        cold.queue_echo(width);
        let mut warm = MockPulseDriver::new(27);
        warm.queue_echo(width);

        let cold_cm = timer(0.0).median_distance_cm(&mut cold, 1, DEFAULT_SAMPLE_WAIT).unwrap();
        let warm_cm = timer(30.0).median_distance_cm(&mut warm, 1, DEFAULT_SAMPLE_WAIT).unwrap();
        assert!(warm_cm > cold_cm);
    }
}
