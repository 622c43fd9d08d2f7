use super::{DriverError, DriverResult, GpioMode, Level, PulseDriver};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// エコー立ち上がりまでの模擬遅延
const ECHO_LATENCY: Duration = Duration::from_micros(450);

/// 台本が空のときのエコー幅（20℃で約50cm）
pub const DEFAULT_ECHO: Duration = Duration::from_micros(2_914);

/// テスト用のパルスドライバモック実装
///
/// 実際の GPIO を使わずにトリガー/エコーの一連の動作をシミュレートします。
/// 時刻は内部の仮想クロックで進むため、`settle` で実際に眠ることはありません。
/// `Clone` したハンドルは状態を共有するので、`Measurement` に渡した後も
/// 送信パルスや解放されたピンをテストで検証できます。
#[derive(Debug, Clone)]
pub struct MockPulseDriver {
    /// 反射パルスを返すエコーピン番号
    pub responding_pin: u8,
    /// 次のトリガーから順に返すエコー幅のキュー
    pub echo_queue: Arc<Mutex<VecDeque<Duration>>>,
    /// キューが空の時に返すエコー幅（None ならエコーなし）
    pub default_echo: Arc<Mutex<Option<Duration>>>,
    /// 出力されたパルス (ピン, 幅) の記録
    pub pulses: Arc<Mutex<Vec<(u8, Duration)>>>,
    /// release されたピンの記録
    pub released: Arc<Mutex<Vec<Vec<u8>>>>,
    /// configure_mode の記録
    pub modes: Arc<Mutex<Vec<GpioMode>>>,
    /// settle の記録
    pub settle_waits: Arc<Mutex<Vec<Duration>>>,
    /// エコー断線のシミュレーション用フラグ
    pub simulate_no_echo: Arc<Mutex<bool>>,
    outputs: Arc<Mutex<Vec<u8>>>,
    inputs: Arc<Mutex<Vec<u8>>>,
    in_flight: Arc<Mutex<Option<Duration>>>,
    clock: Arc<Mutex<Duration>>,
    epoch: Instant,
}

impl MockPulseDriver {
    /// `responding_pin` にだけエコーを返すモックを作成します
    pub fn new(responding_pin: u8) -> Self {
        Self {
            responding_pin,
            echo_queue: Arc::new(Mutex::new(VecDeque::new())),
            default_echo: Arc::new(Mutex::new(Some(DEFAULT_ECHO))),
            pulses: Arc::new(Mutex::new(Vec::new())),
            released: Arc::new(Mutex::new(Vec::new())),
            modes: Arc::new(Mutex::new(Vec::new())),
            settle_waits: Arc::new(Mutex::new(Vec::new())),
            simulate_no_echo: Arc::new(Mutex::new(false)),
            outputs: Arc::new(Mutex::new(Vec::new())),
            inputs: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(Mutex::new(None)),
            clock: Arc::new(Mutex::new(Duration::ZERO)),
            epoch: Instant::now(),
        }
    }

    /// テスト用: エコー幅をキューに追加
    pub fn queue_echo(&self, width: Duration) {
        self.echo_queue.lock().unwrap().push_back(width);
    }

    /// テスト用: 指定距離（cm）・気温（℃）に相当するエコー幅をキューに追加
    pub fn queue_echo_for_distance(&self, distance_cm: f64, celsius: f64) {
        let cm_per_sec = sonar_core::speed_of_sound(celsius) * 100.0 / 2.0;
        self.queue_echo(Duration::from_secs_f64(distance_cm / cm_per_sec));
    }

    /// テスト用: キューが空の時のエコー幅を設定
    pub fn set_default_echo(&self, width: Option<Duration>) {
        *self.default_echo.lock().unwrap() = width;
    }

    /// テスト用: エコーが返らない状態をシミュレート
    pub fn set_no_echo(&self, enable: bool) {
        *self.simulate_no_echo.lock().unwrap() = enable;
    }

    /// テスト用: 出力されたパルスを取得
    pub fn get_pulses(&self) -> Vec<(u8, Duration)> {
        self.pulses.lock().unwrap().clone()
    }

    /// テスト用: release されたピンを取得
    pub fn get_released(&self) -> Vec<Vec<u8>> {
        self.released.lock().unwrap().clone()
    }

    /// テスト用: 設定されたピン番号モードを取得
    pub fn get_modes(&self) -> Vec<GpioMode> {
        self.modes.lock().unwrap().clone()
    }

    /// テスト用: settle の待機時間を取得
    pub fn get_settle_waits(&self) -> Vec<Duration> {
        self.settle_waits.lock().unwrap().clone()
    }

    /// テスト用: 現在ピンが確保されているか
    pub fn is_holding_pins(&self) -> bool {
        !self.outputs.lock().unwrap().is_empty() || !self.inputs.lock().unwrap().is_empty()
    }

    fn advance(&self, by: Duration) -> Instant {
        let mut clock = self.clock.lock().unwrap();
        *clock += by;
        self.epoch + *clock
    }
}

impl PulseDriver for MockPulseDriver {
    fn configure_mode(&mut self, mode: GpioMode) -> DriverResult<()> {
        self.modes.lock().unwrap().push(mode);
        Ok(())
    }

    fn set_output(&mut self, pin: u8) -> DriverResult<()> {
        self.outputs.lock().unwrap().push(pin);
        Ok(())
    }

    fn pulse(&mut self, pin: u8, width: Duration) -> DriverResult<()> {
        if !self.outputs.lock().unwrap().contains(&pin) {
            return Err(DriverError::PinNotConfigured(pin));
        }

        self.pulses.lock().unwrap().push((pin, width));
        self.advance(width);

        let next = self
            .echo_queue
            .lock()
            .unwrap()
            .pop_front()
            .or(*self.default_echo.lock().unwrap());
        *self.in_flight.lock().unwrap() = next;
        Ok(())
    }

    fn set_input(&mut self, pin: u8) -> DriverResult<()> {
        self.inputs.lock().unwrap().push(pin);
        Ok(())
    }

    fn wait_for_level(
        &mut self,
        pin: u8,
        level: Level,
        timeout: Duration,
    ) -> DriverResult<Instant> {
        if !self.inputs.lock().unwrap().contains(&pin) {
            return Err(DriverError::PinNotConfigured(pin));
        }

        let timed_out = DriverError::Timeout {
            pin,
            level,
            timeout,
        };
        let silent = pin != self.responding_pin || *self.simulate_no_echo.lock().unwrap();

        match level {
            Level::High => {
                if silent || self.in_flight.lock().unwrap().is_none() {
                    self.advance(timeout);
                    return Err(timed_out);
                }
                Ok(self.advance(ECHO_LATENCY))
            }
            Level::Low => {
                let width = self.in_flight.lock().unwrap().take();
                match width {
                    Some(width) if width > timeout => {
                        self.advance(timeout);
                        Err(timed_out)
                    }
                    Some(width) => Ok(self.advance(width)),
                    // パルス中でなければ既に LOW
                    None => Ok(self.advance(Duration::ZERO)),
                }
            }
        }
    }

    fn release(&mut self, pins: &[u8]) {
        self.outputs.lock().unwrap().retain(|p| !pins.contains(p));
        self.inputs.lock().unwrap().retain(|p| !pins.contains(p));
        self.released.lock().unwrap().push(pins.to_vec());
    }

    fn settle(&mut self, wait: Duration) {
        self.settle_waits.lock().unwrap().push(wait);
        self.advance(wait);
    }
}
