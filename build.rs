use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=crates/core/data/taxonomy.toml");

    let table = twcascade_core::compile_taxonomy(twcascade_core::BUNDLED_TAXONOMY)
        .unwrap_or_else(|err| panic!("bundled taxonomy is invalid: {}", err));
    let json = table
        .to_json()
        .unwrap_or_else(|err| panic!("failed to serialize compiled table: {}", err));

    let out_dir = env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| panic!("OUT_DIR is not set; build.rs must run under cargo"));
    let out_path = out_dir.join("builtin_table.json");
    fs::write(&out_path, json)
        .unwrap_or_else(|err| panic!("failed to write {}: {}", out_path.display(), err));
}
