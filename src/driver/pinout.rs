/// Raspberry Pi 40ピンヘッダのピン番号変換
use super::{DriverError, DriverResult, GpioMode};

/// 物理ピン番号 → BCM GPIO 番号（電源・GND ピンは含まない）
const BOARD_TO_BCM: [(u8, u8); 28] = [
    (3, 2),
    (5, 3),
    (7, 4),
    (8, 14),
    (10, 15),
    (11, 17),
    (12, 18),
    (13, 27),
    (15, 22),
    (16, 23),
    (18, 24),
    (19, 10),
    (21, 9),
    (22, 25),
    (23, 11),
    (24, 8),
    (26, 7),
    (27, 0),
    (28, 1),
    (29, 5),
    (31, 6),
    (32, 12),
    (33, 13),
    (35, 19),
    (36, 16),
    (37, 26),
    (38, 20),
    (40, 21),
];

/// BCM GPIO の最大番号
const MAX_BCM_GPIO: u8 = 27;

/// `mode` で数えたピン番号を BCM GPIO 番号に変換する
///
/// # Examples
/// ```
/// use hcsr04_sensor::driver::{pinout::to_bcm, GpioMode};
///
/// assert_eq!(to_bcm(11, GpioMode::Board).unwrap(), 17);
/// assert_eq!(to_bcm(17, GpioMode::Bcm).unwrap(), 17);
/// ```
pub fn to_bcm(pin: u8, mode: GpioMode) -> DriverResult<u8> {
    match mode {
        GpioMode::Bcm if pin <= MAX_BCM_GPIO => Ok(pin),
        GpioMode::Bcm => Err(DriverError::UnknownPin(pin)),
        GpioMode::Board => BOARD_TO_BCM
            .iter()
            .find(|(board, _)| *board == pin)
            .map(|(_, bcm)| *bcm)
            .ok_or(DriverError::NotAGpio(pin)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcm_passthrough() {
        assert_eq!(to_bcm(17, GpioMode::Bcm), Ok(17));
        assert_eq!(to_bcm(27, GpioMode::Bcm), Ok(27));
    }

    #[test]
    fn test_bcm_out_of_range() {
        assert_eq!(to_bcm(28, GpioMode::Bcm), Err(DriverError::UnknownPin(28)));
    }

    #[test]
    fn test_board_default_sensor_pins() {
        // BOARD 11/13 = BCM 17/27
        assert_eq!(to_bcm(11, GpioMode::Board), Ok(17));
        assert_eq!(to_bcm(13, GpioMode::Board), Ok(27));
    }

    #[test]
    fn test_board_power_pin_is_not_gpio() {
        // 1番ピンは 3.3V、6番ピンは GND
        assert_eq!(to_bcm(1, GpioMode::Board), Err(DriverError::NotAGpio(1)));
        assert_eq!(to_bcm(6, GpioMode::Board), Err(DriverError::NotAGpio(6)));
    }

    #[test]
    fn test_board_table_has_unique_gpios() {
        let mut bcm: Vec<u8> = BOARD_TO_BCM.iter().map(|(_, b)| *b).collect();
        bcm.sort_unstable();
        bcm.dedup();
        assert_eq!(bcm.len(), BOARD_TO_BCM.len());
        assert!(bcm.iter().all(|b| *b <= MAX_BCM_GPIO));
    }
}
