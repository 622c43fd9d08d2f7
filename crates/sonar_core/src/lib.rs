//! 超音波距離センサー向けのハードウェア非依存ロジック
//!
//! GPIOやタイマーに触れない純粋な計算だけをまとめたクレートです。
//! ホスト上でそのまま `cargo test` できます。
//!
//! - `speed_of_sound`: 温度補正された音速と往復時間からの距離計算
//! - `units`: メートル法/ヤード・ポンド法の単位系と換算係数
//! - `geometry`: 液深・タンク容積の計算
//! - `sampling`: 複数サンプルの集約

pub mod geometry;
pub mod sampling;
pub mod speed_of_sound;
pub mod units;

pub use geometry::GeometryError;
pub use sampling::median;
pub use speed_of_sound::{fahrenheit_to_celsius, round_trip_distance_cm, speed_of_sound};
pub use units::{UnitError, UnitSystem};
