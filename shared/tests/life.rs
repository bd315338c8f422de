use std::time::{Duration, Instant};

use shared::config::LifeConfig;
use shared::grid::Grid;
use shared::input::{Effect, PointerButton, PointerEvent};
use shared::session::Session;
use test_log::test;

const ROWS: usize = 60;
const COLS: usize = 140;
const CELL: f32 = 20.0;

fn alive(grid: &Grid) -> Vec<(usize, usize)> {
    grid.alive_cells()
}

fn center_of(row: usize, col: usize) -> [f32; 2] {
    [col as f32 * CELL + CELL / 2.0, row as f32 * CELL + CELL / 2.0]
}

fn new_session() -> Session {
    Session::new(&LifeConfig::default(), [1600.0, 1300.0], Instant::now())
}

#[test]
fn empty_grid_stays_empty() {
    let empty = Grid::new(ROWS, COLS);
    assert_eq!(empty.next_generation().next_generation(), empty);
}

#[test]
fn lonely_cell_dies() {
    let grid = Grid::from_alive(ROWS, COLS, [(5, 5)]);
    assert!(alive(&grid.next_generation()).is_empty());
}

#[test]
fn block_is_still_life() {
    let block = Grid::from_alive(4, 4, [(0, 0), (0, 1), (1, 0), (1, 1)]);
    let mut grid = block.clone();
    for _ in 0..10 {
        assert!(!grid.advance());
        assert_eq!(grid, block);
    }
}

#[test]
fn blinker_has_period_two() {
    let horizontal = Grid::from_alive(ROWS, COLS, [(5, 4), (5, 5), (5, 6)]);

    let vertical = horizontal.next_generation();
    assert_eq!(alive(&vertical), vec![(4, 5), (5, 5), (6, 5)]);

    assert_eq!(vertical.next_generation(), horizontal);
}

#[test]
fn blinker_wraps_around_corner() {
    let horizontal = Grid::from_alive(10, 10, [(0, 9), (0, 0), (0, 1)]);
    let vertical = horizontal.next_generation();
    assert_eq!(alive(&vertical), vec![(0, 0), (1, 0), (9, 0)]);
}

#[test]
fn corner_counts_opposite_corner() {
    let grid = Grid::from_alive(ROWS, COLS, [(0, 0), (ROWS - 1, COLS - 1)]);
    assert_eq!(grid.alive_neighbors(0, 0), 1);
    assert_eq!(grid.alive_neighbors(ROWS - 1, COLS - 1), 1);
}

#[test]
fn glider_returns_shifted_after_four_generations() {
    let glider = [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];
    let mut grid = Grid::from_alive(8, 8, glider);
    for _ in 0..4 {
        grid.advance();
    }
    let expected = Grid::from_alive(8, 8, glider.map(|(row, col)| (row + 1, col + 1)));
    assert_eq!(grid, expected);
}

#[test]
fn advance_matches_next_generation() {
    let seed = [(10, 10), (10, 11), (11, 10), (12, 13), (13, 12), (13, 13), (59, 0), (0, 139)];
    let mut stepped = Grid::from_alive(ROWS, COLS, seed);
    let mut pure = stepped.clone();
    for _ in 0..20 {
        stepped.advance();
        pure = pure.next_generation();
    }
    assert_eq!(stepped, pure);
}

#[test]
fn toggling_twice_restores_cell() {
    let mut session = new_session();
    let now = Instant::now();
    let click = PointerEvent::Pressed(PointerButton::Primary, center_of(7, 9));

    assert_eq!(session.handle_pointer(click, now), Effect::CellToggled { row: 7, col: 9 });
    assert!(session.grid().is_alive(7, 9));
    session.handle_pointer(click, now);
    assert!(!session.grid().is_alive(7, 9));
}

#[test]
fn clicks_outside_grid_leave_it_unchanged() {
    let mut session = new_session();
    let now = Instant::now();
    session.grid_mut().set(3, 3, shared::grid::CellState::Alive);
    let before = session.grid().clone();

    for pos in [[-5.0, 10.0], [10.0, -5.0], [COLS as f32 * CELL + 1.0, 10.0], [10.0, ROWS as f32 * CELL + 1.0]] {
        let effect = session.handle_pointer(PointerEvent::Pressed(PointerButton::Primary, pos), now);
        assert_eq!(effect, Effect::Nothing);
    }
    assert_eq!(session.grid(), &before);
}

#[test]
fn drag_paints_span_and_nothing_else() {
    let mut session = new_session();
    let now = Instant::now();
    session.grid_mut().set(2, 2, shared::grid::CellState::Alive);
    session.grid_mut().set(20, 20, shared::grid::CellState::Alive);

    // Drag from bottom-right to top-left to exercise the min/max corners.
    session.handle_pointer(PointerEvent::Pressed(PointerButton::Secondary, center_of(4, 5)), now);
    session.handle_pointer(PointerEvent::Moved(center_of(3, 4)), now);
    let effect = session.handle_pointer(PointerEvent::Moved(center_of(2, 2)), now);
    assert_eq!(effect, Effect::DragPainted(7));
    session.handle_pointer(PointerEvent::Released(PointerButton::Secondary, center_of(2, 2)), now);

    for row in 2..=4 {
        for col in 2..=5 {
            assert!(session.grid().is_alive(row, col), "({row}, {col}) should be alive");
        }
    }
    assert_eq!(session.grid().population(), 12 + 1);
    assert!(session.grid().is_alive(20, 20));
    assert!(!session.is_dragging());
}

#[test]
fn pressing_play_runs_the_simulation() {
    let start = Instant::now();
    let mut session = Session::new(&LifeConfig::default(), [1600.0, 1300.0], start);
    for (row, col) in [(5, 4), (5, 5), (5, 6)] {
        session.handle_pointer(PointerEvent::Pressed(PointerButton::Primary, center_of(row, col)), start);
    }

    let button = session.layout().button_rect().center();
    assert_eq!(
        session.handle_pointer(PointerEvent::Pressed(PointerButton::Primary, button), start),
        Effect::PlayToggled
    );
    assert!(session.is_playing());

    assert!(session.tick(start + Duration::from_millis(200)));
    assert_eq!(alive(session.grid()), vec![(4, 5), (5, 5), (6, 5)]);
}
