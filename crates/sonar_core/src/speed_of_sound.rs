/// 音速計算ユーティリティ
/// ハードウェア非依存の純粋関数を提供

/// 0℃の乾燥空気中の音速（m/s）
pub const SPEED_OF_SOUND_AT_0C: f64 = 331.3;

/// 0℃の絶対温度（K）
pub const ZERO_CELSIUS_IN_KELVIN: f64 = 273.15;

/// 華氏→摂氏の換算係数（5/9 を小数4桁で丸めた値）
pub const FAHRENHEIT_TO_CELSIUS_FACTOR: f64 = 0.5556;

/// 気温（℃）から温度補正された音速（m/s）を計算
///
/// # Arguments
/// - `celsius`: 気温（℃）
///
/// # Returns
/// - 音速（m/s）
///
/// # Examples
/// ```
/// use sonar_core::speed_of_sound::speed_of_sound;
///
/// let v = speed_of_sound(0.0);
/// assert_eq!(v, 331.3);
/// ```
pub fn speed_of_sound(celsius: f64) -> f64 {
    // v = 331.3 × √(1 + T / 273.15)
    SPEED_OF_SOUND_AT_0C * (1.0 + celsius / ZERO_CELSIUS_IN_KELVIN).sqrt()
}

/// 華氏温度を摂氏温度に変換
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * FAHRENHEIT_TO_CELSIUS_FACTOR
}

/// エコーの往復時間から片道距離（cm）を計算
///
/// # Arguments
/// - `duration_secs`: エコーパルス幅（秒）
/// - `speed_m_per_s`: 音速（m/s）
///
/// # Returns
/// - センサーから反射面までの距離（cm）
pub fn round_trip_distance_cm(duration_secs: f64, speed_m_per_s: f64) -> f64 {
    // 往復分なので 2 で割る
    duration_secs * ((speed_m_per_s * 100.0) / 2.0)
}
