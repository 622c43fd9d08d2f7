use std::time::Duration;

use crate::driver::GpioMode;

/// 設定値の検証エラー
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("ピン番号モードが無効です (BCM / BOARD): {0}")]
    InvalidGpioMode(String),
    #[error("トリガーとエコーに同じピン {0} は使えません")]
    SamePin(u8),
    #[error("sample_size は1以上にしてください: {0}")]
    InvalidSampleSize(u32),
    #[error("{0} は1ms以上にしてください")]
    ZeroTimeout(&'static str),
}

pub fn parse_gpio_mode(value: &str) -> Result<GpioMode, ConfigError> {
    match value.trim().to_ascii_uppercase().as_str() {
        "BCM" => Ok(GpioMode::Bcm),
        "BOARD" => Ok(GpioMode::Board),
        _ => Err(ConfigError::InvalidGpioMode(value.to_string())),
    }
}

pub fn validate_pins(trig_pin: u8, echo_pin: u8) -> Result<(), ConfigError> {
    if trig_pin == echo_pin {
        return Err(ConfigError::SamePin(trig_pin));
    }
    Ok(())
}

pub fn validate_sample_size(value: u32) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidSampleSize(value));
    }
    Ok(value as usize)
}

pub fn parse_timeout_ms(name: &'static str, value: u64) -> Result<Duration, ConfigError> {
    if value == 0 {
        return Err(ConfigError::ZeroTimeout(name));
    }
    Ok(Duration::from_millis(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gpio_mode() {
        assert_eq!(parse_gpio_mode("BCM"), Ok(GpioMode::Bcm));
        assert_eq!(parse_gpio_mode("board"), Ok(GpioMode::Board));
        assert_eq!(parse_gpio_mode(" Board "), Ok(GpioMode::Board));
    }

    #[test]
    fn test_parse_invalid_gpio_mode() {
        assert_eq!(
            parse_gpio_mode("WIRINGPI"),
            Err(ConfigError::InvalidGpioMode("WIRINGPI".to_string()))
        );
    }

    #[test]
    fn test_validate_pins() {
        assert!(validate_pins(17, 27).is_ok());
        assert_eq!(validate_pins(17, 17), Err(ConfigError::SamePin(17)));
    }

    #[test]
    fn test_validate_sample_size() {
        assert_eq!(validate_sample_size(11), Ok(11));
        assert_eq!(validate_sample_size(0), Err(ConfigError::InvalidSampleSize(0)));
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(
            parse_timeout_ms("echo_timeout_ms", 40),
            Ok(Duration::from_millis(40))
        );
        assert_eq!(
            parse_timeout_ms("echo_timeout_ms", 0),
            Err(ConfigError::ZeroTimeout("echo_timeout_ms"))
        );
    }
}
