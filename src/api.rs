use wasm_bindgen::prelude::*;

use crate::patterns;
use crate::session::LifeSession;
use crate::types::LifeError;

/// WASM-facing handle around one [`LifeSession`].
///
/// Structured results cross the boundary as plain JS objects; errors become
/// JS strings. Bounds checking before drawing stays on the JS side — the
/// change lists emitted here are already limited to the configured board.
#[wasm_bindgen]
pub struct LifeWorld {
    session: LifeSession,
}

#[wasm_bindgen]
impl LifeWorld {
    #[wasm_bindgen(constructor)]
    pub fn new(columns: u32, rows: u32) -> LifeWorld {
        LifeWorld {
            session: LifeSession::new(columns, rows),
        }
    }

    /// Advances one generation; resolves to
    /// `{ alive, undead, changes: [{ x, y, state }] }`.
    pub fn step(&mut self) -> Result<JsValue, JsValue> {
        let generation = self.session.step().map_err(js_error)?;
        serde_wasm_bindgen::to_value(&generation).map_err(JsValue::from)
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.state()).map_err(JsValue::from)
    }

    /// Toggles one cell; resolves to the new state code (0/1/2).
    pub fn switch_cell(&mut self, x: i32, y: i32, place_undead: bool) -> Result<u8, JsValue> {
        self.session
            .switch_cell(x, y, place_undead)
            .map(|state| state.code())
            .map_err(js_error)
    }

    pub fn add_cell(&mut self, x: i32, y: i32, undead: bool) -> Result<(), JsValue> {
        self.session.add_cell(x, y, undead).map_err(js_error)
    }

    pub fn remove_cell(&mut self, x: i32, y: i32) -> Result<(), JsValue> {
        self.session.remove_cell(x, y).map_err(js_error)
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.session.is_occupied(x, y)
    }

    /// Seeds a random board and returns the settling generation's changes.
    pub fn randomize(&mut self, seed: u32) -> Result<JsValue, JsValue> {
        let generation = self.session.randomize(seed as u64).map_err(js_error)?;
        serde_wasm_bindgen::to_value(&generation).map_err(JsValue::from)
    }

    /// Stamps a named pattern; resolves to the number of cells placed.
    pub fn place_pattern(&mut self, name: &str, x: i32, y: i32) -> Result<u32, JsValue> {
        self.session
            .place_pattern(name, x, y)
            .map(|placed| placed as u32)
            .map_err(js_error)
    }

    pub fn pattern_names(&self) -> Vec<String> {
        patterns::names().into_iter().map(str::to_string).collect()
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }
}

fn js_error(err: LifeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
