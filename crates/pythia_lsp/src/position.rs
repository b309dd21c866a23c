//! Coordinate translation between the 0-based client schema and the
//! engine's 1-based lines. Character offsets are 0-based on both sides
//! and pass through untouched.

use crate::protocol::{Position, Range};

pub fn to_engine_line(client_line: u32) -> u32 {
    // The schema puts no upper bound on client positions.
    client_line.saturating_add(1)
}

/// Engine lines are 1-based and may be absent; both map onto a valid
/// client line, never below 0.
pub fn to_client_line(engine_line: Option<u32>) -> u32 {
    engine_line.map(|line| line.saturating_sub(1)).unwrap_or(0)
}

/// Engine columns from the syntax checker are 1-based like its lines.
pub fn to_client_column(engine_column: Option<u32>) -> u32 {
    engine_column
        .map(|column| column.saturating_sub(1))
        .unwrap_or(0)
}

/// A range in client coordinates. With no explicit end it covers exactly
/// one character starting at `column`.
pub fn make_range(line: u32, column: u32, end_line: Option<u32>, end_column: Option<u32>) -> Range {
    Range {
        start: Position {
            line,
            character: column,
        },
        end: Position {
            line: end_line.unwrap_or(line),
            character: end_column.unwrap_or(column.saturating_add(1)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_line_round_trips_for_every_client_line() {
        for line in 0..512 {
            assert_eq!(to_client_line(Some(to_engine_line(line))), line);
        }
    }

    #[test]
    fn absent_engine_positions_map_to_zero() {
        assert_eq!(to_client_line(None), 0);
        assert_eq!(to_client_column(None), 0);
    }

    #[test]
    fn zero_engine_positions_clamp_instead_of_underflowing() {
        assert_eq!(to_client_line(Some(0)), 0);
        assert_eq!(to_client_column(Some(0)), 0);
    }

    #[test]
    fn default_range_covers_one_character() {
        let range = make_range(4, 7, None, None);
        assert_eq!(range.start, Position { line: 4, character: 7 });
        assert_eq!(range.end, Position { line: 4, character: 8 });
    }

    #[test]
    fn maximum_client_line_saturates() {
        assert_eq!(to_engine_line(u32::MAX), u32::MAX);
    }

    #[test]
    fn default_range_at_maximum_column_keeps_end_after_start() {
        let range = make_range(0, u32::MAX, None, None);
        assert_eq!(range.end.character, u32::MAX);
        assert!(range.end.character >= range.start.character);
    }

    #[test]
    fn explicit_range_end_is_respected() {
        let range = make_range(1, 2, Some(3), Some(0));
        assert_eq!(range.end, Position { line: 3, character: 0 });
    }
}
