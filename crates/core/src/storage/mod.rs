pub mod keys;
pub mod kv;
#[cfg(not(target_arch = "wasm32"))]
pub mod file;
