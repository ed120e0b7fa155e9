//! Embeds the native solver artifacts found in `AOC_NATIVE_LIB_DIR`.
//!
//! Generates `$OUT_DIR/embedded_libraries.rs` with one `include_bytes!` entry
//! per `.so`, `.dylib` or `.dll` file. Without the variable the table is empty
//! and the binary can only load artifacts through `--library-dir`.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const LIB_DIR_ENV: &str = "AOC_NATIVE_LIB_DIR";
const EXTENSIONS: [&str; 3] = ["so", "dylib", "dll"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    println!("cargo:rerun-if-env-changed={LIB_DIR_ENV}");

    let artifacts = match env::var_os(LIB_DIR_ENV) {
        Some(dir) => {
            let dir = PathBuf::from(dir);
            println!("cargo:rerun-if-changed={}", dir.display());
            collect_artifacts(&dir)?
        }
        None => Vec::new(),
    };

    let mut source = String::from(
        "/// Native solver artifacts embedded at build time.\n\
         pub static EMBEDDED_LIBRARIES: &[aoc_native_loader::EmbeddedResource] = &[\n",
    );
    for (name, path) in &artifacts {
        writeln!(
            source,
            "    aoc_native_loader::EmbeddedResource {{ name: {name:?}, bytes: include_bytes!({:?}) }},",
            path.to_string_lossy()
        )?;
    }
    source.push_str("];\n");

    fs::write(out_dir.join("embedded_libraries.rs"), source)?;
    Ok(())
}

fn collect_artifacts(dir: &Path) -> Result<Vec<(String, PathBuf)>, Box<dyn std::error::Error>> {
    let mut artifacts = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_artifact = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| EXTENSIONS.contains(&ext));
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if is_artifact && path.is_file() {
            artifacts.push((name.to_owned(), fs::canonicalize(&path)?));
        }
    }
    artifacts.sort();
    Ok(artifacts)
}
