use std::path::Path;

fn main() {
    // toml_cfg は cfg.toml をマクロ展開時に読むので、変更時に再ビルドさせる
    println!("cargo:rerun-if-changed=cfg.toml");

    if !Path::new("cfg.toml").exists() {
        println!("cargo:warning=cfg.toml がありません。デフォルト設定でビルドします (cfg.toml.example を参照)");
    }
}
