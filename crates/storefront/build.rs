//! Build script for the storefront crate.
//!
//! Fingerprints the stylesheet and the drawer/toast script so pages can
//! reference them by content hash, and exports each hash to the crate as a
//! compile-time environment variable.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

/// A static asset served from a content-hashed copy.
struct Asset {
    /// Source file, relative to the crate root.
    source: &'static str,
    /// Directory the hashed copy is written to.
    derived_dir: &'static str,
    /// File stem of the hashed copy (`main` gives `main.<hash>.css`).
    stem: &'static str,
    extension: &'static str,
    /// Environment variable read by the template filters.
    env_var: &'static str,
}

const ASSETS: &[Asset] = &[
    Asset {
        source: "static/css/main.css",
        derived_dir: "static/css/derived",
        stem: "main",
        extension: "css",
        env_var: "CSS_HASH",
    },
    Asset {
        source: "static/js/app.js",
        derived_dir: "static/js/derived",
        stem: "app",
        extension: "js",
        env_var: "JS_HASH",
    },
];

/// Hex digits of the SHA-256 kept in file names.
const HASH_LEN: usize = 8;

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let root = Path::new(&manifest_dir);

    for asset in ASSETS {
        fingerprint(root, asset);
    }
}

/// Copy `asset` to `<derived_dir>/<stem>.<hash>.<extension>` and export the hash.
fn fingerprint(root: &Path, asset: &Asset) {
    let source = root.join(asset.source);
    println!("cargo:rerun-if-changed={}", source.display());

    let content = match fs::read(&source) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {}: {e}", asset.source);
            println!("cargo:rustc-env={}=", asset.env_var);
            return;
        }
    };

    let hash: String = format!("{:x}", Sha256::digest(&content))
        .chars()
        .take(HASH_LEN)
        .collect();
    println!("cargo:rustc-env={}={hash}", asset.env_var);

    let derived_dir = root.join(asset.derived_dir);
    fs::create_dir_all(&derived_dir)
        .unwrap_or_else(|e| panic!("Failed to create {}: {e}", asset.derived_dir));

    let derived = derived_dir.join(format!("{}.{hash}.{}", asset.stem, asset.extension));
    if let Err(e) = fs::copy(&source, &derived) {
        panic!("Failed to copy {} to {}: {e}", asset.source, derived.display());
    }
}
