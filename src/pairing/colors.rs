use super::{Entrant, Pairing};
use crate::domain::Color;

/// Largest whites-minus-blacks surplus a player may reach in either direction
pub const MAX_COLOR_IMBALANCE: i32 = 2;

/// Color a player must get next because the last two games had the same color.
pub fn due_color(history: &[Color]) -> Option<Color> {
    match history {
        [.., previous, last] if previous == last => Some(last.opposite()),
        _ => None,
    }
}

fn would_exceed(entrant: &Entrant, color: Color) -> bool {
    match color {
        Color::White => entrant.color_balance >= MAX_COLOR_IMBALANCE,
        Color::Black => entrant.color_balance <= -MAX_COLOR_IMBALANCE,
    }
}

/// Colors for `first` (ranked higher) against `second`.
///
/// A due color wins, `first`'s before `second`'s. Otherwise the player with
/// the higher balance takes black and a tie leaves `first` white.
pub fn assign_colors(first: &Entrant, second: &Entrant) -> Pairing {
    let forward = Pairing::new(first.player_id, second.player_id);
    let reversed = Pairing::new(second.player_id, first.player_id);

    match (due_color(&first.color_history), due_color(&second.color_history)) {
        (Some(Color::White), _) => forward,
        (Some(Color::Black), _) => reversed,
        (None, Some(Color::White)) => reversed,
        (None, Some(Color::Black)) => forward,
        (None, None) if first.color_balance > second.color_balance => reversed,
        (None, None) => forward,
    }
}

/// Whether two players can meet without violating a color constraint.
pub fn compatible(a: &Entrant, b: &Entrant) -> bool {
    if a.color_balance == b.color_balance && a.color_balance.abs() >= MAX_COLOR_IMBALANCE {
        return false;
    }

    if let (Some(due_a), Some(due_b)) = (due_color(&a.color_history), due_color(&b.color_history)) {
        if due_a == due_b {
            return false;
        }
    }

    let pairing = assign_colors(a, b);
    let (white, black) = if pairing.white == a.player_id { (a, b) } else { (b, a) };
    !would_exceed(white, Color::White) && !would_exceed(black, Color::Black)
}
