use wasm_bindgen::prelude::*;

pub mod api;
pub mod grid;
pub mod patterns;
pub mod session;
pub mod types;

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
