use crate::collision;
use crate::entity::{Affects, Entity, Shape};
use crate::game::{Game, MatchState};
use crate::geometry::{Position, BOARD_HEIGHT, BOARD_WIDTH};
use crate::renderer::{Hud, Input, Renderer};
use crate::sprite::{PatternSprites, SpriteMask, SpriteSource};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Lines below the board reserved for the status display.
const HUD_LINES: u16 = 3;
/// Finest grid the board is drawn at, in logical units per terminal cell.
const MIN_UNITS_PER_CELL: f64 = 4.0;
const DEFAULT_UNITS_PER_CELL: f64 = 8.0;
/// Absorbs rounding when the cell size divides the board exactly.
const GRID_SLACK: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Paint {
    Block(Color),
    Shot(Color),
}

/// Draws the board into the terminal, each cell two characters wide and
/// covering a square of logical units. Also the sprite source for the match:
/// masks are drawn at a resolution matched to the cell size and re-drawn
/// after the terminal is resized.
pub struct CliRenderer {
    last_render: Instant,
    target_frame_time: Duration,
    units_per_cell: f64,
    sprites: PatternSprites,
    active: bool,
}

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CliRenderer {
    pub fn new() -> Self {
        Self::with_cell_size(DEFAULT_UNITS_PER_CELL)
    }

    pub fn with_cell_size(units_per_cell: f64) -> Self {
        let units_per_cell = units_per_cell.max(MIN_UNITS_PER_CELL);
        Self {
            last_render: Instant::now(),
            // Target 30 FPS for smooth rendering
            target_frame_time: Duration::from_millis(33),
            units_per_cell,
            sprites: PatternSprites::new(pixels_per_unit_for(units_per_cell)),
            active: false,
        }
    }

    pub fn units_per_cell(&self) -> f64 {
        self.units_per_cell
    }

    pub fn sprites(&self) -> &PatternSprites {
        &self.sprites
    }

    /// Picks the finest grid that fits the whole board on screen.
    fn fit_to_terminal(&mut self, term_width: u16, term_height: u16) {
        // Each cell is 2 chars wide; the HUD sits under the board.
        let columns = f64::from((term_width / 2).max(1));
        let rows = f64::from(term_height.saturating_sub(HUD_LINES).max(1));
        self.units_per_cell = (BOARD_WIDTH / columns)
            .max(BOARD_HEIGHT / rows)
            .max(MIN_UNITS_PER_CELL);
        self.sprites
            .set_pixels_per_unit(pixels_per_unit_for(self.units_per_cell));
    }

    fn grid_size(&self) -> (usize, usize) {
        let cells = |length: f64| ((length / self.units_per_cell) - GRID_SLACK).ceil() as usize;
        (cells(BOARD_WIDTH), cells(BOARD_HEIGHT))
    }

    fn cell_of(&self, position: Position) -> Option<(usize, usize)> {
        if position.is_out_of_bounds() {
            return None;
        }
        let (columns, rows) = self.grid_size();
        let column = (position.x / self.units_per_cell) as usize;
        let row = ((BOARD_HEIGHT - position.y) / self.units_per_cell) as usize;
        Some((column.min(columns - 1), row.min(rows - 1)))
    }

    fn cell_center(&self, column: usize, row: usize) -> Position {
        Position::new(
            (column as f64 + 0.5) * self.units_per_cell,
            BOARD_HEIGHT - (row as f64 + 0.5) * self.units_per_cell,
        )
    }

    /// Rasterizes the board into row-major cells.
    fn paint(&self, game: &Game) -> Vec<Option<Paint>> {
        let (columns, rows) = self.grid_size();
        let mut cells = vec![None; columns * rows];

        for entity in game.drawable_entities() {
            let color = entity_color(entity);
            let bounds = entity.bounding_box();
            let corners = (
                self.cell_of(Position::new(bounds.left().max(0.0), bounds.top().min(BOARD_HEIGHT))),
                self.cell_of(Position::new(bounds.right().min(BOARD_WIDTH), bounds.bottom().max(0.0))),
            );
            let (Some((left, top)), Some((right, bottom))) = corners else {
                continue;
            };
            let mut painted_any = false;
            for row in top..=bottom {
                for column in left..=right {
                    if collision::is_painted_at(entity, self.cell_center(column, row)) {
                        cells[row * columns + column] = Some(Paint::Block(color));
                        painted_any = true;
                    }
                }
            }
            // Unrendered or tiny sprites still show up as one cell.
            if !painted_any {
                if let Some((column, row)) = self.cell_of(entity.position) {
                    cells[row * columns + column] = Some(Paint::Block(color));
                }
            }
        }

        for shot in &game.shots {
            if let Some((column, row)) = self.cell_of(shot.position) {
                let color = match shot.affects {
                    Affects::Aliens => Color::White,
                    Affects::Starships => Color::Red,
                };
                cells[row * columns + column] = Some(Paint::Shot(color));
            }
        }

        cells
    }

    fn draw_info(&self, hud: &Hud, board_rows: u16, stdout: &mut io::Stdout) -> io::Result<()> {
        let debug = if hud.debug { "  [DEBUG: T to step]" } else { "" };
        queue!(
            stdout,
            cursor::MoveTo(0, board_rows),
            ResetColor,
            terminal::Clear(ClearType::UntilNewLine),
            Print(format!("Level: {}  Score: {}{}", hud.level, hud.score, debug))
        )?;

        queue!(
            stdout,
            cursor::MoveTo(0, board_rows + 1),
            Print("Controls: Left/Right or A/D to move | Space to fire | G debug | R restart | Q quit")
        )?;

        let message = match hud.state {
            MatchState::Victory => Some((Color::Green, "ALL WAVES CLEARED! Press R to play again")),
            MatchState::GameOver => Some((Color::Red, "GAME OVER! Press R to restart")),
            MatchState::Playing => None,
        };
        queue!(
            stdout,
            cursor::MoveTo(0, board_rows + 2),
            terminal::Clear(ClearType::UntilNewLine)
        )?;
        if let Some((color, text)) = message {
            queue!(stdout, SetForegroundColor(color), Print(text), ResetColor)?;
        }

        Ok(())
    }
}

impl SpriteSource for CliRenderer {
    fn render(&mut self, shape: &Shape) -> Option<SpriteMask> {
        self.sprites.render(shape)
    }
}

/// Coarse grids get coarse masks; there is nothing finer to show.
fn pixels_per_unit_for(units_per_cell: f64) -> usize {
    if units_per_cell >= DEFAULT_UNITS_PER_CELL {
        1
    } else {
        2
    }
}

fn entity_color(entity: &Entity) -> Color {
    if !entity.is_alive() {
        return Color::DarkRed;
    }
    match entity.shape.id() {
        "starship" => Color::Green,
        "bee" => Color::Yellow,
        "boss" => Color::Magenta,
        "abductor" => Color::Cyan,
        _ => Color::White,
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> io::Result<()> {
        let (term_width, term_height) = terminal::size()?;
        self.fit_to_terminal(term_width, term_height);

        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )?;
        self.active = true;
        Ok(())
    }

    fn render(&mut self, game: &Game, hud: &Hud) -> io::Result<()> {
        // Frame rate limiting: skip rendering if not enough time has passed
        if self.last_render.elapsed() < self.target_frame_time {
            return Ok(());
        }

        self.last_render = Instant::now();

        let mut stdout = io::stdout();
        let (columns, rows) = self.grid_size();
        let cells = self.paint(game);

        queue!(stdout, cursor::MoveTo(0, 0))?;

        for row in cells.chunks(columns) {
            for cell in row {
                match cell {
                    None => queue!(stdout, SetBackgroundColor(Color::Black), Print("  "))?,
                    Some(Paint::Block(color)) => {
                        queue!(stdout, SetBackgroundColor(*color), Print("  "))?
                    }
                    Some(Paint::Shot(color)) => queue!(
                        stdout,
                        SetBackgroundColor(Color::Black),
                        SetForegroundColor(*color),
                        Print(" |")
                    )?,
                }
            }
            queue!(stdout, ResetColor, Print("\r\n"))?;
        }

        self.draw_info(hud, rows as u16, &mut stdout)?;

        stdout.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        if event::poll(Duration::from_millis(10))? {
            match event::read()? {
                Event::Key(KeyEvent { code, .. }) => match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(Some(Input::Quit)),
                    KeyCode::Char('r') | KeyCode::Char('R') => return Ok(Some(Input::Restart)),
                    KeyCode::Char('g') | KeyCode::Char('G') => {
                        return Ok(Some(Input::ToggleDebug));
                    }
                    KeyCode::Char('t') | KeyCode::Char('T') => return Ok(Some(Input::Step)),
                    KeyCode::Char(' ') => return Ok(Some(Input::Fire)),
                    KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                        return Ok(Some(Input::MoveLeft));
                    }
                    KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                        return Ok(Some(Input::MoveRight));
                    }
                    _ => {}
                },
                Event::Resize(width, height) => {
                    self.fit_to_terminal(width, height);
                    execute!(io::stdout(), terminal::Clear(ClearType::All))?;
                }
                _ => {}
            }
        }
        Ok(None)
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
