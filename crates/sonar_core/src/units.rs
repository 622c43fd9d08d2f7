use std::fmt;
use std::str::FromStr;

/// cm → inch 換算係数
pub const CM_TO_INCHES: f64 = 0.394;

/// 1リットルあたりの立方センチメートル
pub const CUBIC_CM_PER_LITRE: f64 = 1000.0;

/// 1米ガロンあたりの立方インチ
pub const CUBIC_INCHES_PER_GALLON: f64 = 231.0;

/// 測定結果の単位系
///
/// 長さは metric なら cm、imperial なら inch。
/// 容積は metric ならリットル、imperial なら米ガロン。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitSystem {
    Metric,
    Imperial,
}

/// 単位系の文字列が `metric` / `imperial` のどちらでもない
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid unit '{0}': expected 'metric' or 'imperial'")]
pub struct UnitError(pub String);

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    /// 長さの単位記号
    pub fn length_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "cm",
            UnitSystem::Imperial => "in",
        }
    }

    /// 容積の単位記号
    pub fn volume_symbol(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "L",
            UnitSystem::Imperial => "gal",
        }
    }

    /// cm 単位の距離をこの単位系の長さに変換
    pub fn length_from_cm(&self, cm: f64) -> f64 {
        match self {
            UnitSystem::Metric => cm,
            UnitSystem::Imperial => cm_to_inches(cm),
        }
    }

    /// この単位系の長さで表した立方体積をリットル/ガロンに変換
    ///
    /// metric なら cm³ → L、imperial なら in³ → gal。
    pub fn volume_from_cubic(&self, cubic: f64) -> f64 {
        match self {
            UnitSystem::Metric => cubic / CUBIC_CM_PER_LITRE,
            UnitSystem::Imperial => cubic / CUBIC_INCHES_PER_GALLON,
        }
    }
}

impl FromStr for UnitSystem {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            other => Err(UnitError(other.to_string())),
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<UnitSystem> for String {
    fn from(unit: UnitSystem) -> Self {
        unit.as_str().to_string()
    }
}

/// cm を inch に変換
pub fn cm_to_inches(cm: f64) -> f64 {
    cm * CM_TO_INCHES
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_parse_unit_system() {
        assert_eq!("metric".parse::<UnitSystem>(), Ok(UnitSystem::Metric));
        assert_eq!("imperial".parse::<UnitSystem>(), Ok(UnitSystem::Imperial));
    }

    #[test]
    fn test_parse_invalid_unit_system() {
        let result = "Fahrenheit".parse::<UnitSystem>();
        assert_eq!(result, Err(UnitError("Fahrenheit".to_string())));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Metric".parse::<UnitSystem>().is_err());
        assert!("IMPERIAL".parse::<UnitSystem>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for unit in [UnitSystem::Metric, UnitSystem::Imperial] {
            assert_eq!(unit.to_string().parse::<UnitSystem>(), Ok(unit));
        }
    }

    #[test]
    fn test_metric_length_is_identity() {
        assert_eq!(UnitSystem::Metric.length_from_cm(48.80804985408), 48.80804985408);
    }

    #[test]
    fn test_imperial_length() {
        let inches = UnitSystem::Imperial.length_from_cm(26.454564846);
        assert!((inches - 10.423098549324001).abs() < EPS);
    }

    #[test]
    fn test_volume_conversion() {
        assert_eq!(UnitSystem::Metric.volume_from_cubic(1000.0), 1.0);
        assert_eq!(UnitSystem::Imperial.volume_from_cubic(231.0), 1.0);
    }

    #[test]
    fn test_symbols() {
        assert_eq!(UnitSystem::Metric.length_symbol(), "cm");
        assert_eq!(UnitSystem::Imperial.length_symbol(), "in");
        assert_eq!(UnitSystem::Metric.volume_symbol(), "L");
        assert_eq!(UnitSystem::Imperial.volume_symbol(), "gal");
    }
}
