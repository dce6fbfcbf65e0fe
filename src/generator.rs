use crate::{Board, GameError, Position};
use itertools::iproduct;
use rand::Rng;

/// Builds a `width`×`height` field with `mines_count` mines placed uniformly
/// at random and every cell's adjacency count filled in.
pub fn create_field<R: Rng>(
    width: i32,
    height: i32,
    mines_count: u32,
    rng: &mut R,
) -> Result<Board, GameError> {
    Board::validate(width, height, mines_count)?;

    let positions: Vec<Position> = iproduct!(0..width, 0..height)
        .map(Position::from)
        .collect();
    let shuffled = shuffle_positions(positions, rng);

    let mut board = Board::blank(width, height);
    for &pos in shuffled.iter().take(mines_count as usize) {
        board.place_mine(pos)?;
    }
    board.set_adjacent_mines();

    log::debug!(
        "generated {}x{} field with {} mines",
        width,
        height,
        board.mines_count()
    );
    Ok(board)
}

/// Random permutation built by repeatedly moving a uniformly chosen remaining
/// element to the output.
fn shuffle_positions<R: Rng>(mut remaining: Vec<Position>, rng: &mut R) -> Vec<Position> {
    let mut shuffled = Vec::with_capacity(remaining.len());
    while !remaining.is_empty() {
        let index = rng.gen_range(0..remaining.len());
        shuffled.push(remaining.remove(index));
    }
    shuffled
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_create_field_places_exact_mine_count() {
        let mut rng = StdRng::seed_from_u64(42);
        let board = create_field(30, 16, 99, &mut rng).unwrap();

        assert_eq!(board.dimensions(), (30, 16));
        assert_eq!(board.mines_count(), 99);
        assert_eq!(board.cells().filter(|c| c.is_mine()).count(), 99);
    }

    #[test]
    fn test_create_field_rejects_bad_parameters() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            create_field(3, 3, 9, &mut rng),
            Err(GameError::TooManyMines { .. })
        ));
        assert!(matches!(
            create_field(0, 3, 1, &mut rng),
            Err(GameError::InvalidDimensions { .. })
        ));
        assert!(matches!(create_field(3, 3, 0, &mut rng), Err(GameError::NoMines)));
    }

    #[test]
    fn test_almost_full_field() {
        let mut rng = StdRng::seed_from_u64(3);
        let board = create_field(2, 2, 3, &mut rng).unwrap();
        let safe: Vec<_> = board.cells().filter(|c| !c.is_mine()).collect();

        assert_eq!(safe.len(), 1);
        assert_eq!(safe[0].content().adjacent_mines(), Some(3));
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(11);
        let positions: Vec<Position> = iproduct!(0..5, 0..4).map(Position::from).collect();

        let shuffled = shuffle_positions(positions.clone(), &mut rng);

        assert_eq!(shuffled.len(), positions.len());
        let expected: HashSet<_> = positions.into_iter().collect();
        let actual: HashSet<_> = shuffled.into_iter().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_every_cell_can_hold_a_mine() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let board = create_field(3, 3, 1, &mut rng).unwrap();
            seen.extend(board.cells().filter(|c| c.is_mine()).map(|c| c.position()));
        }
        assert_eq!(seen.len(), 9);
    }
}
