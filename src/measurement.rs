/// 測定ファサード
///
/// ピン・気温・単位系の設定を保持し、距離・液深・容積の各操作を提供します。
use std::time::Duration;

use log::{info, warn};
use sonar_core::geometry::{
    cuboid_volume, elliptical_cylinder_volume, elliptical_side_cylinder_volume, liquid_depth,
    side_cylinder_volume, standing_cylinder_volume,
};
use sonar_core::units::cm_to_inches;
use sonar_core::{fahrenheit_to_celsius, UnitSystem};

use crate::driver::{GpioMode, PulseDriver};
use crate::echo_timer::{EchoTimer, DEFAULT_ECHO_TIMEOUT, DEFAULT_SAMPLE_SIZE, DEFAULT_SAMPLE_WAIT};
use crate::error::{SensorError, SensorResult};

/// デフォルト気温（℃ / imperial の場合は °F として解釈）
pub const DEFAULT_TEMPERATURE: f64 = 20.0;

/// 測定設定
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementConfig {
    pub trig_pin: u8,
    pub echo_pin: u8,
    /// 気温。`unit` が imperial なら華氏、それ以外は摂氏
    pub temperature: f64,
    /// `metric` または `imperial`。それ以外の値は変換時にエラーになる
    pub unit: String,
    pub gpio_mode: GpioMode,
    pub echo_timeout: Duration,
}

impl MeasurementConfig {
    pub fn new(trig_pin: u8, echo_pin: u8) -> Self {
        Self {
            trig_pin,
            echo_pin,
            temperature: DEFAULT_TEMPERATURE,
            unit: UnitSystem::Metric.into(),
            gpio_mode: GpioMode::default(),
            echo_timeout: DEFAULT_ECHO_TIMEOUT,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_gpio_mode(mut self, mode: GpioMode) -> Self {
        self.gpio_mode = mode;
        self
    }

    pub fn with_echo_timeout(mut self, timeout: Duration) -> Self {
        self.echo_timeout = timeout;
        self
    }
}

/// 超音波センサー1台分の測定器
///
/// ドライバ（＝トリガー/エコーのピン）を占有するため、`raw_distance` は `&mut self` を取る。
/// 複数のセンサーを使う場合は別々のピンでそれぞれ `Measurement` を作成する。
pub struct Measurement<D> {
    driver: D,
    trig_pin: u8,
    echo_pin: u8,
    temperature: f64,
    unit: String,
    gpio_mode: GpioMode,
    timer: EchoTimer,
}

impl<D: PulseDriver> Measurement<D> {
    /// 新しい測定器を作成
    ///
    /// 単位系が imperial の場合、気温は華氏として摂氏に変換して保持する。
    /// 単位系の妥当性はここでは検査しない（変換を行う操作で初めてエラーになる）。
    pub fn new(driver: D, config: MeasurementConfig) -> Self {
        let temperature = match config.unit.parse::<UnitSystem>() {
            Ok(UnitSystem::Imperial) => fahrenheit_to_celsius(config.temperature),
            _ => config.temperature,
        };
        let timer = EchoTimer::new(
            config.trig_pin,
            config.echo_pin,
            config.gpio_mode,
            temperature,
            config.echo_timeout,
        );

        info!(
            "超音波センサーを設定しました (Trig: {}, Echo: {}, Mode: {}, 気温: {:.4}°C, 単位: {})",
            config.trig_pin, config.echo_pin, config.gpio_mode, temperature, config.unit
        );

        Self {
            driver,
            trig_pin: config.trig_pin,
            echo_pin: config.echo_pin,
            temperature,
            unit: config.unit,
            gpio_mode: config.gpio_mode,
            timer,
        }
    }

    pub fn trig_pin(&self) -> u8 {
        self.trig_pin
    }

    pub fn echo_pin(&self) -> u8 {
        self.echo_pin
    }

    /// 音速補正に使う気温（℃）
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// 設定された単位系の文字列
    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn gpio_mode(&self) -> GpioMode {
        self.gpio_mode
    }

    /// 温度補正済みの音速（m/s）
    pub fn speed_of_sound(&self) -> f64 {
        self.timer.speed_of_sound()
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    /// 単位系を解決する
    pub fn unit_system(&self) -> SensorResult<UnitSystem> {
        self.unit.parse::<UnitSystem>().map_err(|e| {
            warn!("単位系の設定が無効です: {}", e);
            SensorError::from(e)
        })
    }

    /// デフォルト設定（11サンプル、100ms 間隔）で距離を測定
    pub fn raw_distance(&mut self) -> SensorResult<f64> {
        self.raw_distance_with(DEFAULT_SAMPLE_SIZE, DEFAULT_SAMPLE_WAIT)
    }

    /// 距離を測定し、設定された単位系（cm / inch）で返す
    ///
    /// # 引数
    /// * `sample_size` - サンプル数（1以上）
    /// * `sample_wait` - サンプル間の待機時間
    pub fn raw_distance_with(
        &mut self,
        sample_size: usize,
        sample_wait: Duration,
    ) -> SensorResult<f64> {
        let cm = self.echo_distance_cm(sample_size, sample_wait)?;
        self.distance(cm)
    }

    /// 距離を測定し、単位変換せずに cm で返す
    ///
    /// 液深・容積の計算に渡す値はこちらを使う。
    pub fn echo_distance_cm(
        &mut self,
        sample_size: usize,
        sample_wait: Duration,
    ) -> SensorResult<f64> {
        self.timer
            .median_distance_cm(&mut self.driver, sample_size, sample_wait)
    }

    /// cm の距離を設定された単位系に変換
    pub fn distance(&self, raw_cm: f64) -> SensorResult<f64> {
        Ok(match self.unit_system()? {
            UnitSystem::Metric => self.distance_metric(raw_cm),
            UnitSystem::Imperial => self.distance_imperial(raw_cm),
        })
    }

    pub fn distance_metric(&self, raw_cm: f64) -> f64 {
        raw_cm
    }

    pub fn distance_imperial(&self, raw_cm: f64) -> f64 {
        cm_to_inches(raw_cm)
    }

    /// 容器の深さと測定距離から液深を計算
    ///
    /// `hole_depth` は設定された単位系（cm / inch）で渡す。`raw_cm` は常に cm。
    pub fn depth(&self, raw_cm: f64, hole_depth: f64) -> SensorResult<f64> {
        Ok(match self.unit_system()? {
            UnitSystem::Metric => self.depth_metric(raw_cm, hole_depth),
            UnitSystem::Imperial => self.depth_imperial(raw_cm, hole_depth),
        })
    }

    pub fn depth_metric(&self, raw_cm: f64, hole_depth_cm: f64) -> f64 {
        liquid_depth(hole_depth_cm, raw_cm)
    }

    pub fn depth_imperial(&self, raw_cm: f64, hole_depth_inches: f64) -> f64 {
        liquid_depth(hole_depth_inches, cm_to_inches(raw_cm))
    }

    /// 横置き円筒タンクの液量（L / gal）
    ///
    /// # 引数
    /// * `depth` - 液面の高さ
    /// * `height` - 円筒の長さ
    /// * `radius` - 円筒の半径
    pub fn cylinder_volume_side(&self, depth: f64, height: f64, radius: f64) -> SensorResult<f64> {
        let unit = self.unit_system()?;
        Ok(unit.volume_from_cubic(side_cylinder_volume(depth, height, radius)?))
    }

    /// 縦置き円筒タンクの液量（L / gal）
    pub fn cylinder_volume_standing(&self, depth: f64, radius: f64) -> SensorResult<f64> {
        let unit = self.unit_system()?;
        Ok(unit.volume_from_cubic(standing_cylinder_volume(depth, radius)?))
    }

    /// 直方体タンクの液量（L / gal）
    pub fn cuboid_volume(&self, depth: f64, width: f64, length: f64) -> SensorResult<f64> {
        let unit = self.unit_system()?;
        Ok(unit.volume_from_cubic(cuboid_volume(depth, width, length)?))
    }

    /// 縦置き楕円柱タンクの液量（L / gal）
    pub fn elliptical_cylinder_volume(
        &self,
        depth: f64,
        semi_major_axis: f64,
        semi_minor_axis: f64,
    ) -> SensorResult<f64> {
        let unit = self.unit_system()?;
        Ok(unit.volume_from_cubic(elliptical_cylinder_volume(
            depth,
            semi_major_axis,
            semi_minor_axis,
        )?))
    }

    /// 横置き楕円柱タンクの液量（L / gal）
    ///
    /// # 引数
    /// * `depth` - 液面の高さ
    /// * `height` / `width` - 断面楕円の高さと幅
    /// * `length` - タンクの長さ
    pub fn elliptical_side_cylinder_volume(
        &self,
        depth: f64,
        height: f64,
        width: f64,
        length: f64,
    ) -> SensorResult<f64> {
        let unit = self.unit_system()?;
        Ok(unit.volume_from_cubic(elliptical_side_cylinder_volume(
            depth, height, width, length,
        )?))
    }
}

/// デフォルト設定で1回距離を測る簡易関数（cm）
///
/// # 引数
/// * `driver` - パルスドライバ
/// * `trig_pin` / `echo_pin` - BCM 番号
/// * `celsius` - 気温（省略時 20℃）
pub fn basic_distance<D: PulseDriver>(
    driver: D,
    trig_pin: u8,
    echo_pin: u8,
    celsius: Option<f64>,
) -> SensorResult<f64> {
    let config = MeasurementConfig::new(trig_pin, echo_pin)
        .with_temperature(celsius.unwrap_or(DEFAULT_TEMPERATURE));
    Measurement::new(driver, config).raw_distance()
}
