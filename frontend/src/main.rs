//! Entry point for the WASM application

pub fn main() {
    attendme_frontend::start();
}
