//! Build script for detecting system dependencies and providing installation guidance.
//!
//! The X11 backend talks the X protocol directly, so nothing is linked; this
//! script only warns when the X server side (XTEST) is unlikely to be present.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Check for XTEST (required for scroll injection on Linux)
    check_xtest();
}

fn check_xtest() {
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");

    if !env::var("TARGET").unwrap_or_default().contains("linux") {
        println!("cargo:warning=Scroll injection uses X11; use --dry-run on this platform.");
        return;
    }

    let output = Command::new("pkg-config").args(["--exists", "xtst"]).output();

    match output {
        Ok(output) if output.status.success() => {}
        _ => {
            println!("cargo:warning=XTEST libraries not found via pkg-config. Scroll injection needs an X server with XTEST.");
            println!("cargo:warning=On Ubuntu: sudo apt-get install libxtst-dev");
        }
    }
}
