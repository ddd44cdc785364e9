//! Build script for stackloop-core
//!
//! This script checks system requirements before compilation:
//! - Minimum Rust version (let-else and `OnceCell::get_or_try_init` need Rust 1.70.0+)
//! - Platform support (live attach is Linux-only)

use std::env;

fn main()
{
    println!("cargo:rerun-if-changed=build.rs");

    match rustc_version::version() {
        Ok(rustc_version) => {
            let min_rust_version = rustc_version::Version::new(1, 70, 0);
            if rustc_version < min_rust_version {
                panic!("stackloop-core requires Rust {min_rust_version} or newer, found {rustc_version}");
            }
        }
        // Some build environments hide rustc; don't fail for that
        Err(_) => println!("cargo:warning=could not verify Rust version"),
    }

    // The build script runs on the host, so ask cargo about the target
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "linux" {
        println!(
            "cargo:warning=stackloop-core: no ptrace host for target OS `{target_os}`; only the in-process pipeline is available"
        );
    }
}
