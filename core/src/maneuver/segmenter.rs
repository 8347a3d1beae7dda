use crate::race_interface::{Board, DataPoint, Leg, Maneuver};

/// Legs starting closer together than this collapse into the later one.
pub const MIN_LEG_MS: i64 = 60_000;

/// Collapses the series into runs of identical board.
///
/// Only points with `twa` are classified; points whose race clock is below
/// `pre_start_seconds` are pre-start. The final run is appended with
/// `closed = false` and ends at the last classified point.
pub fn find_maneuvers(points: &[DataPoint], pre_start_seconds: f64) -> Vec<Maneuver> {
    let mut maneuvers = Vec::new();
    let mut current: Option<(Board, i64)> = None;
    let mut last_seen = 0;

    for point in points {
        let Some(twa) = point.twa else {
            continue;
        };
        let board = if point.ot < pre_start_seconds {
            Board::PreStart
        } else {
            Board::from_twa(twa)
        };

        match current {
            Some((open, start)) if open != board => {
                maneuvers.push(Maneuver {
                    board: open,
                    start,
                    end: point.t,
                    closed: true,
                });
                current = Some((board, point.t));
            }
            None => current = Some((board, point.t)),
            _ => {}
        }
        last_seen = point.t;
    }

    if let Some((board, start)) = current {
        maneuvers.push(Maneuver {
            board,
            start,
            end: last_seen,
            closed: false,
        });
    }

    maneuvers
}

/// Marks a new leg wherever the point of sail changes between consecutive
/// maneuvers. Legs are numbered from 2 (the first leg starts at the gun).
pub fn find_legs(maneuvers: &[Maneuver]) -> Vec<Leg> {
    let mut legs: Vec<Leg> = Vec::new();

    for pair in maneuvers.windows(2) {
        if pair[0].board.point_of_sail() == pair[1].board.point_of_sail() {
            continue;
        }
        let start = pair[1].start;
        if legs.last().is_some_and(|last| start - last.start < MIN_LEG_MS) {
            legs.pop();
        }
        legs.push(Leg {
            leg: legs.len() + 2,
            start,
        });
    }

    legs
}
