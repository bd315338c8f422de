use std::time::Instant;

use crate::config::LifeConfig;
use crate::grid::Grid;
use crate::input::{Effect, InputMapper, Layout, PointerEvent};
use crate::ticker::Ticker;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunState {
    Paused,
    Running,
}

/// Everything the render loop mutates: the grid, play state, drag state and layout.
pub struct Session {
    grid: Grid,
    run_state: RunState,
    input: InputMapper,
    layout: Layout,
    ticker: Ticker,
    generation: u64,
}

impl Session {
    pub fn new(config: &LifeConfig, window_size: [f32; 2], now: Instant) -> Self {
        Self {
            grid: Grid::new(config.rows, config.columns),
            run_state: RunState::Paused,
            input: InputMapper::new(),
            layout: Layout::new(window_size, config.cell_size),
            ticker: Ticker::new(config.tick_interval(), now),
            generation: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_playing(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn is_dragging(&self) -> bool {
        self.input.is_dragging()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Only the layout follows the window; grid dimensions and cell size stay fixed.
    pub fn resize(&mut self, window_size: [f32; 2]) {
        self.layout.resize(window_size);
    }

    pub fn toggle_play(&mut self, now: Instant) {
        self.run_state = match self.run_state {
            RunState::Paused => RunState::Running,
            RunState::Running => RunState::Paused,
        };
        if self.run_state == RunState::Running {
            // First generation after pressing play waits one full interval.
            self.ticker.mark(now);
        }
        log::debug!("play state -> {:?}", self.run_state);
    }

    pub fn handle_pointer(&mut self, event: PointerEvent, now: Instant) -> Effect {
        let effect = self.input.handle(event, &self.layout, &mut self.grid);
        match effect {
            Effect::PlayToggled => self.toggle_play(now),
            Effect::CellToggled { row, col } => log::debug!("toggled cell ({row}, {col})"),
            Effect::DragStarted => log::debug!("drag paint started"),
            Effect::DragEnded => log::debug!("drag paint ended"),
            Effect::DragPainted(_) | Effect::Nothing => {}
        }
        effect
    }

    /// Advance one generation if running and the tick interval has elapsed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.run_state != RunState::Running || !self.ticker.poll(now) {
            return false;
        }
        self.grid.advance();
        self.generation += 1;
        log::trace!("generation {}, population {}", self.generation, self.grid.population());
        true
    }

    /// When the loop should wake up next, or `None` while paused.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.is_playing().then(|| self.ticker.deadline())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::input::PointerButton;

    fn session(now: Instant) -> Session {
        Session::new(&LifeConfig::default(), [1000.0, 800.0], now)
    }

    #[test]
    fn starts_paused_and_empty() {
        let session = session(Instant::now());
        assert_eq!(session.run_state(), RunState::Paused);
        assert!(!session.is_dragging());
        assert_eq!(session.grid().population(), 0);
        assert_eq!((session.grid().rows(), session.grid().cols()), (60, 140));
        assert_eq!(session.next_deadline(), None);
    }

    #[test]
    fn paused_session_never_ticks() {
        let start = Instant::now();
        let mut session = session(start);
        session.grid_mut().set(5, 5, crate::grid::CellState::Alive);

        assert!(!session.tick(start + Duration::from_secs(10)));
        assert!(session.grid().is_alive(5, 5));
    }

    #[test]
    fn button_click_toggles_run_state() {
        let start = Instant::now();
        let mut session = session(start);
        let button = session.layout().button_rect().center();

        session.handle_pointer(PointerEvent::Pressed(PointerButton::Primary, button), start);
        assert_eq!(session.run_state(), RunState::Running);
        assert_eq!(session.next_deadline(), Some(start + Duration::from_millis(200)));

        session.handle_pointer(PointerEvent::Pressed(PointerButton::Primary, button), start);
        assert_eq!(session.run_state(), RunState::Paused);
        assert_eq!(session.grid().population(), 0);
    }

    #[test]
    fn running_session_ticks_at_fixed_rate() {
        let start = Instant::now();
        let mut session = session(start);
        session.toggle_play(start);

        assert!(!session.tick(start + Duration::from_millis(100)));
        assert!(session.tick(start + Duration::from_millis(200)));
        assert!(!session.tick(start + Duration::from_millis(250)));
        assert!(session.tick(start + Duration::from_millis(400)));
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn cancel_stops_drag_paint() {
        let start = Instant::now();
        let mut session = session(start);

        session.handle_pointer(PointerEvent::Pressed(PointerButton::Secondary, [10.0, 10.0]), start);
        session.handle_pointer(PointerEvent::Cancel, start);
        assert!(!session.is_dragging());

        let effect = session.handle_pointer(PointerEvent::Moved([200.0, 200.0]), start);
        assert_eq!(effect, Effect::Nothing);
        assert_eq!(session.grid().population(), 0);
    }

    #[test]
    fn resize_moves_button_not_grid() {
        let mut session = session(Instant::now());
        let before = session.layout().button_rect();
        session.resize([400.0, 300.0]);

        assert_ne!(session.layout().button_rect(), before);
        assert_eq!(session.layout().button_rect().min, [150.0, 260.0]);
        assert_eq!((session.grid().rows(), session.grid().cols()), (60, 140));
        assert_eq!(session.layout().cell_size(), 20.0);
    }
}
