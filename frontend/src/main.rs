//! Entry point for the WASM application

pub fn main() {
    imagehub_frontend::start()
}
