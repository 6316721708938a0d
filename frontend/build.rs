//! Forwards build-time configuration from `.env` to the compiler.
//!
//! `src/config.rs` reads these with `option_env!`, so a value set in the
//! shell wins over the file and an unset one falls back to the default.

const FORWARDED: [&str; 2] = ["IMAGEHUB_API_URL", "IMAGEHUB_ASSET_URL"];

fn main() {
    // Missing .env is fine.
    let _ = dotenvy::dotenv();

    println!("cargo:rerun-if-changed=.env");
    println!("cargo:rerun-if-changed=../.env");
    for name in FORWARDED {
        println!("cargo:rerun-if-env-changed={}", name);
        if let Ok(value) = std::env::var(name) {
            println!("cargo:rustc-env={}={}", name, value);
        }
    }
}
