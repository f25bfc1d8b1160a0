//! Move legality, disc flipping, and end-of-game resolution.

use super::board::{BOARD_SIZE, Board};
use super::types::Disc;
use crate::error::EngineError;
use tracing::instrument;

/// The eight scan directions: orthogonal and diagonal.
const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Outcome of resolving the mover after a move has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The game continues; the given color moves next. When the opponent
    /// has no legal move this is the mover again (forced pass).
    Continue(Disc),
    /// Neither side has a legal move. `Some(disc)` is the winner;
    /// `None` is a draw.
    Finished(Option<Disc>),
}

/// Collects the opponent discs flipped in one direction if a disc of
/// `disc` were placed at (x, y). Empty when the direction produces no
/// capture: no adjacent opponent run, or the run ends at an empty cell
/// or the board edge.
fn run_flips(board: &Board, disc: Disc, x: usize, y: usize, (dx, dy): (i32, i32)) -> Vec<(usize, usize)> {
    let opponent = disc.opponent();
    let mut run = Vec::new();
    let mut cx = x as i32 + dx;
    let mut cy = y as i32 + dy;

    loop {
        if !(0..BOARD_SIZE as i32).contains(&cx) || !(0..BOARD_SIZE as i32).contains(&cy) {
            return Vec::new();
        }
        match board.get(cx as usize, cy as usize) {
            Some(cell) if cell == opponent => run.push((cx as usize, cy as usize)),
            Some(cell) if cell == disc => return run,
            _ => return Vec::new(),
        }
        cx += dx;
        cy += dy;
    }
}

/// Returns every opponent disc that placing `disc` at (x, y) would flip,
/// across all eight directions. An empty result means the placement is
/// not a legal move.
pub fn flips_for(board: &Board, disc: Disc, x: usize, y: usize) -> Vec<(usize, usize)> {
    if board.get(x, y) != Some(Disc::Empty) {
        return Vec::new();
    }
    DIRECTIONS
        .iter()
        .flat_map(|&dir| run_flips(board, disc, x, y, dir))
        .collect()
}

/// Whether placing `disc` at (x, y) is a legal move on this board.
pub fn is_legal(board: &Board, disc: Disc, x: usize, y: usize) -> bool {
    disc.is_player() && !flips_for(board, disc, x, y).is_empty()
}

/// Enumerates every legal move for `disc`, as (x, y) pairs in row-major
/// order.
pub fn legal_moves(board: &Board, disc: Disc) -> Vec<(usize, usize)> {
    let mut moves = Vec::new();
    for (x, y, cell) in board.iter_cells() {
        if cell == Disc::Empty && is_legal(board, disc, x, y) {
            moves.push((x, y));
        }
    }
    moves
}

/// Applies a move, returning the resulting board.
///
/// The input board is never mutated; repeated calls with identical
/// arguments yield identical boards.
///
/// # Errors
///
/// Returns [`EngineError::IllegalMove`] if the coordinate is out of
/// range, the cell is occupied, the disc is not a player color, or the
/// placement flips nothing.
#[instrument(skip(board))]
pub fn apply_move(board: &Board, disc: Disc, x: usize, y: usize) -> Result<Board, EngineError> {
    let illegal = |reason: &str| EngineError::IllegalMove {
        disc,
        x: x as i64,
        y: y as i64,
        reason: reason.to_string(),
    };

    if !disc.is_player() {
        return Err(illegal("disc must be dark or light"));
    }
    if x >= BOARD_SIZE || y >= BOARD_SIZE {
        return Err(illegal("coordinate out of range 0-7"));
    }
    if board.get(x, y) != Some(Disc::Empty) {
        return Err(illegal("cell is already occupied"));
    }

    let flips = flips_for(board, disc, x, y);
    if flips.is_empty() {
        return Err(illegal("placement flips no opponent discs"));
    }

    let mut next = board.clone();
    next.set(x, y, disc);
    for (fx, fy) in flips {
        next.set(fx, fy, disc);
    }
    Ok(next)
}

/// Resolves who moves next after `mover` has just moved on `board`.
///
/// The opponent moves if it has at least one legal move; otherwise the
/// mover moves again (forced pass); if neither side can move the game is
/// finished and the winner is computed by disc count.
#[instrument(skip(board))]
pub fn resolve_outcome(board: &Board, mover: Disc) -> Outcome {
    let opponent = mover.opponent();
    if !legal_moves(board, opponent).is_empty() {
        Outcome::Continue(opponent)
    } else if !legal_moves(board, mover).is_empty() {
        Outcome::Continue(mover)
    } else {
        Outcome::Finished(winner(board))
    }
}

/// Winner of a finished board: the side with strictly more discs, or
/// `None` for a draw. Only meaningful once neither side has a legal move.
pub fn winner(board: &Board) -> Option<Disc> {
    let dark = board.count(Disc::Dark);
    let light = board.count(Disc::Light);
    match dark.cmp(&light) {
        std::cmp::Ordering::Greater => Some(Disc::Dark),
        std::cmp::Ordering::Less => Some(Disc::Light),
        std::cmp::Ordering::Equal => None,
    }
}
