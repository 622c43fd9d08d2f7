use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use tracing_subscriber::EnvFilter;

use hcsr04_sensor::config_validation::{parse_gpio_mode, validate_pins, validate_sample_size};
use hcsr04_sensor::driver::rpi;
use hcsr04_sensor::{AppConfig, ConfigError, Measurement};

/// HC-SR04 超音波センサーで距離・液深・タンク容積を測定します
///
/// 省略したオプションは cfg.toml（ビルド時）の値を使います。
#[derive(Parser)]
#[command(name = "hcsr04_sensor", version)]
struct Cli {
    /// トリガーピン番号
    #[arg(long)]
    trig_pin: Option<u8>,

    /// エコーピン番号
    #[arg(long)]
    echo_pin: Option<u8>,

    /// 気温（metric: ℃、imperial: °F）
    #[arg(long, allow_negative_numbers = true)]
    temperature: Option<f64>,

    /// 単位系 (metric / imperial)
    #[arg(long)]
    unit: Option<String>,

    /// ピン番号の数え方 (BCM / BOARD)
    #[arg(long)]
    gpio_mode: Option<String>,

    /// サンプル数
    #[arg(long)]
    sample_size: Option<u32>,

    /// サンプル間待機時間（ミリ秒）
    #[arg(long)]
    sample_wait_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// センサーから反射面までの距離
    Distance,

    /// 容器内の液深
    Depth {
        /// 容器の深さ（センサーから底まで）
        #[arg(long)]
        hole_depth: f64,
    },

    /// 縦置き円筒タンクの液量
    Standing {
        /// タンクの高さ（センサーから底まで）
        #[arg(long)]
        tank_height: f64,
        /// タンクの半径
        #[arg(long)]
        radius: f64,
    },

    /// 横置き円筒タンクの液量
    Side {
        /// タンクの半径（センサーは頂部に設置）
        #[arg(long)]
        radius: f64,
        /// タンクの長さ
        #[arg(long)]
        length: f64,
    },

    /// 直方体タンクの液量
    Cuboid {
        /// タンクの高さ（センサーから底まで）
        #[arg(long)]
        tank_height: f64,
        /// タンクの幅
        #[arg(long)]
        width: f64,
        /// タンクの奥行き
        #[arg(long)]
        length: f64,
    },
}

/// コマンドライン引数で設定を上書きする
fn apply_overrides(cli: &Cli, mut config: AppConfig) -> Result<AppConfig, ConfigError> {
    if let Some(pin) = cli.trig_pin {
        config.trig_pin = pin;
    }
    if let Some(pin) = cli.echo_pin {
        config.echo_pin = pin;
    }
    if let Some(temperature) = cli.temperature {
        config.temperature = temperature;
    }
    if let Some(ref unit) = cli.unit {
        config.unit = unit.clone();
    }
    if let Some(ref mode) = cli.gpio_mode {
        config.gpio_mode = parse_gpio_mode(mode)?;
    }
    if let Some(size) = cli.sample_size {
        config.sample_size = validate_sample_size(size)?;
    }
    if let Some(ms) = cli.sample_wait_ms {
        config.sample_wait = std::time::Duration::from_millis(ms);
    }
    validate_pins(config.trig_pin, config.echo_pin)?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let app_config = AppConfig::load().context("設定ファイルの読み込みに失敗しました")?;
    let app_config = apply_overrides(&cli, app_config).context("引数が無効です")?;

    let driver = rpi::open(app_config.trig_pin, app_config.echo_pin, app_config.gpio_mode)
        .context("GPIO の初期化に失敗しました")?;
    let mut sensor = Measurement::new(driver, app_config.measurement_config());

    let raw_cm = sensor
        .echo_distance_cm(app_config.sample_size, app_config.sample_wait)
        .context("距離の測定に失敗しました")?;
    let unit = sensor.unit_system()?;
    info!("測定距離: {:.2} cm", raw_cm);

    match cli.command {
        Commands::Distance => {
            let distance = sensor.distance(raw_cm)?;
            println!("{:.2} {}", distance, unit.length_symbol());
        }
        Commands::Depth { hole_depth } => {
            let depth = sensor.depth(raw_cm, hole_depth)?;
            println!("{:.2} {}", depth, unit.length_symbol());
        }
        Commands::Standing {
            tank_height,
            radius,
        } => {
            let depth = sensor.depth(raw_cm, tank_height)?;
            let volume = sensor.cylinder_volume_standing(depth, radius)?;
            println!("{:.2} {}", volume, unit.volume_symbol());
        }
        Commands::Side { radius, length } => {
            let depth = sensor.depth(raw_cm, radius * 2.0)?;
            let volume = sensor.cylinder_volume_side(depth, length, radius)?;
            println!("{:.2} {}", volume, unit.volume_symbol());
        }
        Commands::Cuboid {
            tank_height,
            width,
            length,
        } => {
            let depth = sensor.depth(raw_cm, tank_height)?;
            let volume = sensor.cuboid_volume(depth, width, length)?;
            println!("{:.2} {}", volume, unit.volume_symbol());
        }
    }

    Ok(())
}
