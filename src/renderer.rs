use crate::game::{Game, MatchState};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    MoveLeft,
    MoveRight,
    Fire,
    ToggleDebug,
    Step, // Manual tick while in debug mode
    Restart,
    Quit,
}

/// Match status shown next to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub score: u64,
    pub level: u32,
    pub state: MatchState,
    pub debug: bool,
}

/// Trait that abstracts the display front-end.
/// The engine never draws; the host hands the board to a renderer each frame.
pub trait Renderer {
    /// Initialize the renderer
    fn init(&mut self) -> io::Result<()>;

    /// Render the current board and status line
    fn render(&mut self, game: &Game, hud: &Hud) -> io::Result<()>;

    /// Clean up and restore terminal/display state
    fn cleanup(&mut self) -> io::Result<()>;

    /// Poll for input from the user
    fn poll_input(&mut self) -> io::Result<Option<Input>>;
}
