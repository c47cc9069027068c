/// Score of a game that was never slowed down by a move or a second.
pub const BASE_SCORE: u32 = 10_000;

/// Points lost for every move.
pub const MOVE_PENALTY: u32 = 10;

/// `max(0, BASE_SCORE - elapsed_secs - moves * MOVE_PENALTY)`.
pub fn compute_score(moves: u32, elapsed_secs: u64) -> u32 {
    let elapsed = u32::try_from(elapsed_secs).unwrap_or(u32::MAX);
    BASE_SCORE
        .saturating_sub(elapsed)
        .saturating_sub(moves.saturating_mul(MOVE_PENALTY))
}
