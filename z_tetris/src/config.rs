//! Game configuration passed to boards and sessions

/// Dimensions, timings and scoring of a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Grid width in cells
    pub board_width: usize,

    /// Grid height in cells
    pub board_height: usize,

    /// Gravity period in milliseconds
    pub drop_interval_ms: u64,

    /// Minimum time between horizontal moves in milliseconds
    pub move_interval_ms: u64,

    /// Minimum time between soft-drop steps in milliseconds
    pub soft_drop_interval_ms: u64,

    /// How long cleared rows stay on screen before removal, in milliseconds
    ///
    /// Zero removes them within the tick that locked the piece.
    pub clear_delay_ms: u64,

    /// Points per cleared row
    pub line_clear_score: u64,

    /// Points per successful soft-drop step
    pub soft_drop_score: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 10,
            board_height: 20,
            drop_interval_ms: 1000,
            move_interval_ms: 100,
            soft_drop_interval_ms: 50,
            // four 100 ms flashes, each fading out and back in
            clear_delay_ms: 800,
            line_clear_score: 100,
            soft_drop_score: 1,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grid size; both dimensions are at least 4 cells
    pub fn with_board_size(mut self, width: usize, height: usize) -> Self {
        self.board_width = width.max(4);
        self.board_height = height.max(4);
        self
    }

    /// Set the gravity period in milliseconds
    pub fn with_drop_interval_ms(mut self, interval_ms: u64) -> Self {
        self.drop_interval_ms = interval_ms;
        self
    }

    /// Set the horizontal move rate limit in milliseconds
    pub fn with_move_interval_ms(mut self, interval_ms: u64) -> Self {
        self.move_interval_ms = interval_ms;
        self
    }

    /// Set the soft-drop rate limit in milliseconds
    pub fn with_soft_drop_interval_ms(mut self, interval_ms: u64) -> Self {
        self.soft_drop_interval_ms = interval_ms;
        self
    }

    /// Set the clear animation length in milliseconds
    pub fn with_clear_delay_ms(mut self, delay_ms: u64) -> Self {
        self.clear_delay_ms = delay_ms;
        self
    }
}
