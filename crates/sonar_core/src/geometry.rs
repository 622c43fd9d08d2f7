/// 液深・タンク容積の計算ユーティリティ
/// ハードウェア非依存の純粋関数を提供
///
/// 容積関数の引数 `liquid_height` はタンク底面からの液面の高さで、
/// 寸法はすべて同じ長さ単位（cm または inch）で渡す。
/// 戻り値はその単位の立方体積（cm³ / in³）。
use std::f64::consts::PI;

/// 寸法が計算可能な範囲外
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("{name} must be a finite, non-negative number (got {value})")]
    Negative { name: &'static str, value: f64 },
    #[error("{name} must be greater than zero (got {value})")]
    NotPositive { name: &'static str, value: f64 },
    #[error("liquid height {height} exceeds the tank height {limit}")]
    AboveTank { height: f64, limit: f64 },
}

fn non_negative(name: &'static str, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::Negative { name, value })
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::NotPositive { name, value })
    }
}

/// 容器の深さから空間距離を引いて液深を計算
///
/// # Arguments
/// - `hole_depth`: 容器全体の深さ
/// - `distance`: センサーから液面までの距離
///
/// # Examples
/// ```
/// use sonar_core::geometry::liquid_depth;
///
/// assert_eq!(liquid_depth(72.0, 22.0), 50.0);
/// ```
pub fn liquid_depth(hole_depth: f64, distance: f64) -> f64 {
    hole_depth - distance
}

/// 半径 `radius` の円を高さ `liquid_height` で切った弓形の面積
///
/// A = r²·acos((r−h)/r) − (r−h)·√(2rh − h²)
pub fn circular_segment_area(liquid_height: f64, radius: f64) -> Result<f64, GeometryError> {
    let r = positive("radius", radius)?;
    let h = non_negative("liquid_height", liquid_height)?;
    if h > 2.0 * r {
        return Err(GeometryError::AboveTank {
            height: h,
            limit: 2.0 * r,
        });
    }

    Ok(r * r * ((r - h) / r).acos() - (r - h) * (2.0 * r * h - h * h).sqrt())
}

/// 横置き円筒タンク内の液体体積
///
/// # Arguments
/// - `liquid_height`: 液面の高さ
/// - `length`: 円筒の長さ
/// - `radius`: 円筒の半径
pub fn side_cylinder_volume(
    liquid_height: f64,
    length: f64,
    radius: f64,
) -> Result<f64, GeometryError> {
    let length = non_negative("length", length)?;
    Ok(circular_segment_area(liquid_height, radius)? * length)
}

/// 縦置き円筒タンク内の液体体積（π·r²·h）
pub fn standing_cylinder_volume(liquid_height: f64, radius: f64) -> Result<f64, GeometryError> {
    let h = non_negative("liquid_height", liquid_height)?;
    let r = non_negative("radius", radius)?;
    Ok(PI * r * r * h)
}

/// 直方体タンク内の液体体積
pub fn cuboid_volume(liquid_height: f64, width: f64, length: f64) -> Result<f64, GeometryError> {
    let h = non_negative("liquid_height", liquid_height)?;
    let w = non_negative("width", width)?;
    let l = non_negative("length", length)?;
    Ok(w * l * h)
}

/// 縦置き楕円柱タンク内の液体体積（π·a·b·h）
pub fn elliptical_cylinder_volume(
    liquid_height: f64,
    semi_major_axis: f64,
    semi_minor_axis: f64,
) -> Result<f64, GeometryError> {
    let h = non_negative("liquid_height", liquid_height)?;
    let a = non_negative("semi_major_axis", semi_major_axis)?;
    let b = non_negative("semi_minor_axis", semi_minor_axis)?;
    Ok(PI * a * b * h)
}

/// 楕円を下から高さ `liquid_height` で切った部分の面積
///
/// 縦半径 `semi_vertical` の円の弓形を横方向に a/b 倍したものと等しい。
pub fn elliptical_segment_area(
    liquid_height: f64,
    semi_horizontal: f64,
    semi_vertical: f64,
) -> Result<f64, GeometryError> {
    let a = non_negative("semi_horizontal", semi_horizontal)?;
    let b = positive("semi_vertical", semi_vertical)?;
    Ok(circular_segment_area(liquid_height, b)? * a / b)
}

/// 横置き楕円柱タンク内の液体体積
///
/// # Arguments
/// - `liquid_height`: 液面の高さ
/// - `height`: 断面楕円の高さ（縦の直径）
/// - `width`: 断面楕円の幅（横の直径）
/// - `length`: タンクの長さ
pub fn elliptical_side_cylinder_volume(
    liquid_height: f64,
    height: f64,
    width: f64,
    length: f64,
) -> Result<f64, GeometryError> {
    let length = non_negative("length", length)?;
    Ok(elliptical_segment_area(liquid_height, width / 2.0, height / 2.0)? * length)
}
