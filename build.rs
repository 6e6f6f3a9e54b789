//! Build script for health-cli
//!
//! Embeds the build timestamp shown by `--version`.

fn main() {
    // Only rerun when src/ files change (not on every cargo build)
    println!("cargo:rerun-if-changed=src");

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

    println!("cargo:rustc-env=HEALTH_CLI_BUILD_TIMESTAMP={}", timestamp);
}
