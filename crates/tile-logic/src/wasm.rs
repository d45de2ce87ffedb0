//! WASM bindings for frontend board replay

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;
use crate::{replay, Board, BoardRules, Classic2048, Direction, WINNING_TILE};

fn parse_seed(seed: &[u8]) -> Result<[u8; 32], JsError> {
    seed.try_into()
        .map_err(|_| JsError::new("Ticket id must be exactly 32 bytes"))
}

/// Accepts `"Up"`, `"up"` or `"u"` (and the same for the other directions)
fn parse_direction(raw: &str) -> Result<Direction, JsError> {
    match raw.to_ascii_lowercase().as_str() {
        "up" | "u" => Ok(Direction::Up),
        "down" | "d" => Ok(Direction::Down),
        "left" | "l" => Ok(Direction::Left),
        "right" | "r" => Ok(Direction::Right),
        _ => Err(JsError::new(&format!("Unknown direction: {}", raw))),
    }
}

fn parse_board(board_json: &str) -> Result<Board, JsError> {
    serde_json::from_str(board_json)
        .map_err(|e| JsError::new(&format!("Invalid board: {}", e)))
}

#[derive(serde::Serialize)]
struct ReplayResult {
    board: Board,
    move_count: u32,
    game_over: bool,
    won: bool,
}

/// Opening board of the session bound to `ticket_id`
#[wasm_bindgen]
pub fn start_board(ticket_id: &[u8]) -> Result<JsValue, JsError> {
    let seed = parse_seed(ticket_id)?;
    let board = Classic2048.start(&seed);

    serde_wasm_bindgen::to_value(&board)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Predict the result of one move.
///
/// # Arguments
/// * `board_json` - JSON serialized Board as read from the game account
/// * `direction` - slide direction
/// * `ticket_id` - 32-byte ticket mint id
/// * `move_count` - session move counter before the move
///
/// # Returns
/// JSON serialized MoveOutcome
#[wasm_bindgen]
pub fn preview_move(
    board_json: &str,
    direction: &str,
    ticket_id: &[u8],
    move_count: u32,
) -> Result<JsValue, JsError> {
    let board = parse_board(board_json)?;
    let direction = parse_direction(direction)?;
    let seed = parse_seed(ticket_id)?;

    let outcome = Classic2048.apply(&board, direction, &seed, move_count);

    serde_wasm_bindgen::to_value(&outcome)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Replay a whole session from its move log (JSON array of directions)
#[wasm_bindgen]
pub fn replay_session(ticket_id: &[u8], directions_json: &str) -> Result<JsValue, JsError> {
    let seed = parse_seed(ticket_id)?;
    let raw: Vec<String> = serde_json::from_str(directions_json)
        .map_err(|e| JsError::new(&format!("Invalid move log: {}", e)))?;
    let directions = raw
        .iter()
        .map(|d| parse_direction(d))
        .collect::<Result<Vec<_>, _>>()?;

    let (board, move_count) = replay(&Classic2048, &seed, &directions);
    let result = ReplayResult {
        board,
        move_count,
        game_over: Classic2048.is_terminal(&board),
        won: board.top_tile >= WINNING_TILE,
    };

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// True when no direction can change the board
#[wasm_bindgen]
pub fn is_game_over(board_json: &str) -> Result<bool, JsError> {
    let board = parse_board(board_json)?;
    Ok(Classic2048.is_terminal(&board))
}
