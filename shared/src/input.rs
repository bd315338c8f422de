use crate::grid::{CellState, Grid};

pub const BUTTON_WIDTH: f32 = 100.0;
pub const BUTTON_HEIGHT: f32 = 30.0;
/// Distance from the bottom edge of the window to the top of the play button.
pub const BUTTON_BOTTOM_OFFSET: f32 = 40.0;
/// Clicks in this strip at the bottom of the window never toggle cells.
pub const BUTTON_STRIP_HEIGHT: f32 = 50.0;

/// Axis-aligned screen rectangle in physical pixels, half-open on the max edges.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl Rect {
    pub fn from_origin_size(origin: [f32; 2], size: [f32; 2]) -> Self {
        Rect {
            min: origin,
            max: [origin[0] + size[0], origin[1] + size[1]],
        }
    }

    pub fn contains(&self, point: [f32; 2]) -> bool {
        point[0] >= self.min[0] && point[0] < self.max[0] && point[1] >= self.min[1] && point[1] < self.max[1]
    }

    pub fn center(&self) -> [f32; 2] {
        [(self.min[0] + self.max[0]) * 0.5, (self.min[1] + self.max[1]) * 0.5]
    }

    /// Shrink by `amount` on every side.
    pub fn inset(&self, amount: f32) -> Rect {
        Rect {
            min: [self.min[0] + amount, self.min[1] + amount],
            max: [self.max[0] - amount, self.max[1] - amount],
        }
    }
}

/// View geometry the input mapper needs: window size and the fixed cell size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Layout {
    window_size: [f32; 2],
    cell_size: f32,
}

impl Layout {
    pub fn new(window_size: [f32; 2], cell_size: f32) -> Self {
        Self {
            window_size,
            cell_size: cell_size.max(1.0),
        }
    }

    pub fn resize(&mut self, window_size: [f32; 2]) {
        self.window_size = window_size;
    }

    pub fn window_size(&self) -> [f32; 2] {
        self.window_size
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// The play button sits horizontally centered near the bottom of the window.
    pub fn button_rect(&self) -> Rect {
        let [width, height] = self.window_size;
        Rect::from_origin_size(
            [(width / 2.0).floor() - BUTTON_WIDTH / 2.0, height - BUTTON_BOTTOM_OFFSET],
            [BUTTON_WIDTH, BUTTON_HEIGHT],
        )
    }

    /// Whether a primary click at `pos` may edit the grid.
    pub fn in_edit_area(&self, pos: [f32; 2]) -> bool {
        pos[1] < self.window_size[1] - BUTTON_STRIP_HEIGHT
    }

    /// Screen rectangle covered by a cell, ignoring whether the window shows it.
    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        Rect::from_origin_size(
            [col as f32 * self.cell_size, row as f32 * self.cell_size],
            [self.cell_size, self.cell_size],
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    Pressed(PointerButton, [f32; 2]),
    Released(PointerButton, [f32; 2]),
    Moved([f32; 2]),
    /// Buttons may have been released without us seeing it (focus lost).
    Cancel,
}

/// What a pointer event did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Effect {
    Nothing,
    CellToggled { row: usize, col: usize },
    PlayToggled,
    DragStarted,
    /// Number of cells that were dead and are now alive.
    DragPainted(usize),
    DragEnded,
}

impl Effect {
    pub fn needs_redraw(&self) -> bool {
        !matches!(self, Effect::Nothing | Effect::DragStarted | Effect::DragPainted(0))
    }
}

/// Signed cell coordinates `(row, col)` under a pixel position. May lie outside the grid.
pub fn cell_coords(pos: [f32; 2], cell_size: f32) -> (i64, i64) {
    let row = (pos[1] / cell_size).floor() as i64;
    let col = (pos[0] / cell_size).floor() as i64;
    (row, col)
}

/// Map a pixel position to the grid cell under it, if there is one.
pub fn screen_to_cell(pos: [f32; 2], cell_size: f32, rows: usize, cols: usize) -> Option<(usize, usize)> {
    let (row, col) = cell_coords(pos, cell_size);
    let in_range = (0..rows as i64).contains(&row) && (0..cols as i64).contains(&col);
    in_range.then_some((row as usize, col as usize))
}

/// Force every in-bounds cell in the inclusive span between two pixel corners alive.
///
/// Returns how many cells changed from dead to alive.
pub fn paint_span(grid: &mut Grid, from: [f32; 2], to: [f32; 2], cell_size: f32) -> usize {
    let (from_row, from_col) = cell_coords(from, cell_size);
    let (to_row, to_col) = cell_coords(to, cell_size);

    let row_start = from_row.min(to_row).max(0);
    let row_end = from_row.max(to_row).min(grid.rows() as i64 - 1);
    let col_start = from_col.min(to_col).max(0);
    let col_end = from_col.max(to_col).min(grid.cols() as i64 - 1);

    let mut painted = 0;
    for row in row_start..=row_end {
        for col in col_start..=col_end {
            let (row, col) = (row as usize, col as usize);
            if !grid.is_alive(row, col) {
                grid.set(row, col, CellState::Alive);
                painted += 1;
            }
        }
    }
    painted
}

/// Turns pointer events into grid edits. Holds the drag anchor between events.
#[derive(Debug, Default, Clone)]
pub struct InputMapper {
    drag_anchor: Option<[f32; 2]>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Apply one pointer event to `grid`. Play-button presses are reported as
    /// [`Effect::PlayToggled`] and leave the grid alone.
    pub fn handle(&mut self, event: PointerEvent, layout: &Layout, grid: &mut Grid) -> Effect {
        match event {
            PointerEvent::Pressed(PointerButton::Primary, pos) => {
                if layout.button_rect().contains(pos) {
                    return Effect::PlayToggled;
                }
                if !layout.in_edit_area(pos) {
                    return Effect::Nothing;
                }
                match screen_to_cell(pos, layout.cell_size(), grid.rows(), grid.cols()) {
                    Some((row, col)) => {
                        grid.toggle(row, col);
                        Effect::CellToggled { row, col }
                    }
                    None => Effect::Nothing,
                }
            }
            PointerEvent::Pressed(PointerButton::Secondary, pos) => {
                self.drag_anchor = Some(pos);
                Effect::DragStarted
            }
            PointerEvent::Moved(pos) => match self.drag_anchor {
                Some(anchor) => Effect::DragPainted(paint_span(grid, anchor, pos, layout.cell_size())),
                None => Effect::Nothing,
            },
            PointerEvent::Released(PointerButton::Secondary, _) | PointerEvent::Cancel => {
                if self.drag_anchor.take().is_some() {
                    Effect::DragEnded
                } else {
                    Effect::Nothing
                }
            }
            PointerEvent::Released(PointerButton::Primary, _) => Effect::Nothing,
        }
    }
}
