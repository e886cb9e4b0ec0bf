//! WebAssembly bindings for the settlers engine.
//!
//! This module exposes the game engine to JavaScript through wasm-bindgen.
//! State crosses the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::actions::Command;
use crate::game::GameState;
use crate::rules;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game; with `auto_place` every player gets an opening settlement and road
    #[wasm_bindgen(constructor)]
    pub fn new(auto_place: bool) -> Result<WasmGame, JsValue> {
        let mut state = GameState::new().map_err(to_js_error)?;
        if auto_place {
            let mut rng = rand::thread_rng();
            state
                .auto_place_initial_settlements(&mut rng)
                .map_err(to_js_error)?;
        }
        Ok(WasmGame { state })
    }

    /// Snapshot (with next actions) as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.state.snapshot_with_actions())
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the current player ID
    #[wasm_bindgen(js_name = getCurrentPlayer)]
    pub fn get_current_player(&self) -> u8 {
        self.state.current_player
    }

    /// Roll the dice, returning `[die1, die2]`
    #[wasm_bindgen(js_name = rollDice)]
    pub fn roll_dice(&mut self) -> Vec<u8> {
        let (a, b) = self.state.roll_dice();
        vec![a, b]
    }

    /// Returns whether the settlement was built
    #[wasm_bindgen(js_name = placeSettlement)]
    pub fn place_settlement(&mut self, vertex: u16, player: u8) -> bool {
        self.state.place_settlement(vertex, player)
    }

    #[wasm_bindgen(js_name = placeRoad)]
    pub fn place_road(&mut self, from: u16, to: u16, player: u8) -> Result<(), JsValue> {
        self.state.place_road(from, to, player).map_err(to_js_error)
    }

    /// Returns whether the city was built
    #[wasm_bindgen(js_name = buildCity)]
    pub fn build_city(&mut self, vertex: u16, player: u8) -> bool {
        self.state.build_city(vertex, player)
    }

    #[wasm_bindgen(js_name = endTurn)]
    pub fn end_turn(&mut self) -> u8 {
        self.state.end_turn()
    }

    #[wasm_bindgen(js_name = previousTurn)]
    pub fn previous_turn(&mut self) -> u8 {
        self.state.previous_turn()
    }

    /// Apply a JSON command, returning the outcome JSON or an error
    #[wasm_bindgen(js_name = applyCommand)]
    pub fn apply_command(&mut self, command_json: &str) -> Result<String, JsValue> {
        let command: Command = serde_json::from_str(command_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid command JSON: {}", e)))?;
        let outcome = self.state.apply(command).map_err(to_js_error)?;
        serde_json::to_string(&outcome).map_err(to_js_error)
    }

    /// Best open settlement spot by production, if any
    #[wasm_bindgen(js_name = highestProductionSpot)]
    pub fn highest_production_spot(&self) -> Option<u16> {
        rules::highest_production_spot(&self.state.board)
    }
}
