//! Console front end: menu, prompts, board rendering and announcements.
//!
//! The session only talks to [`Game`] through its public surface. Input and
//! output are generic so the whole loop can be driven from a script.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::engine::game::{Game, MoveOutcome};
use crate::engine::notation::parse_move;
use crate::engine::types::{Color, GameStatus};

const FILES: &str = "a b c d e f g h";

/// Render the board with rank labels on both sides, file letters above and
/// below, the move clocks and both capture lists.
pub fn render_board(game: &Game) -> String {
    let border = "  +-----------------+\n";
    let files = format!("  | {FILES} |\n");

    let mut out = String::with_capacity(512);
    out.push_str(border);
    out.push_str(&files);
    out.push_str(border);
    for (row, line) in game.board().rows().iter().enumerate() {
        let rank = 8 - row;
        let cells: Vec<String> = line.chars().map(String::from).collect();
        out.push_str(&format!("{rank} | {} | {rank}\n", cells.join(" ")));
    }
    out.push_str(border);
    out.push_str(&files);
    out.push_str(border);
    out.push_str(&format!(
        "\nHalf-moves: {}  Full moves: {}\n",
        game.halfmove_clock(),
        game.fullmove_number()
    ));
    for color in [Color::White, Color::Black] {
        out.push_str(&format!(
            "{} captured: {}\n",
            color.title(),
            capture_list(game.captures(color))
        ));
    }
    out
}

fn capture_list(pieces: &[char]) -> String {
    if pieces.is_empty() {
        return "None".to_string();
    }
    pieces
        .iter()
        .map(char::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The announcement for a status, if it deserves one.
pub fn announcement(status: GameStatus, checks_given: u32) -> Option<String> {
    match status {
        GameStatus::Active => None,
        GameStatus::Check => Some("Check!".to_string()),
        GameStatus::Checkmate => Some("Checkmate!".to_string()),
        GameStatus::Stalemate => Some("Stalemate! The game is a draw.".to_string()),
        GameStatus::Draw(_) => Some("Draw by the fifty-move rule.".to_string()),
        GameStatus::CheckLimit { winner } => Some(format!(
            "Game over! {} wins after {checks_given} {}.",
            winner.title(),
            if checks_given == 1 { "check" } else { "checks" }
        )),
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

enum Flow {
    Continue,
    Quit,
}

/// A menu-driven game session over arbitrary input and output streams.
pub struct Session<R, W> {
    input: R,
    output: W,
    game: Game,
    config: AppConfig,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, config: AppConfig) -> Self {
        let game = Game::with_check_limit(config.check_limit);
        Session {
            input,
            output,
            game,
            config,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the menu until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.write_menu()?;
            let Some(choice) = self.read_line()? else {
                return Ok(());
            };
            let flow = match choice.as_str() {
                "1" => self.play()?,
                "2" => self.save()?,
                "3" => self.load()?,
                "4" => self.rules()?,
                "5" => {
                    writeln!(self.output, "\nThank you for playing Chess Master. Have a nice day!")?;
                    Flow::Quit
                }
                "6" => {
                    self.game.reset();
                    writeln!(self.output, "New game ready.")?;
                    Flow::Continue
                }
                _ => {
                    writeln!(self.output, "Invalid choice!")?;
                    Flow::Continue
                }
            };
            if let Flow::Quit = flow {
                return Ok(());
            }
        }
    }

    /// One line of input without its line ending, `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn write_menu(&mut self) -> io::Result<()> {
        write!(
            self.output,
            "\n+-------------------------+\n\
             |      Chess Master       |\n\
             +-------------------------+\n\
             |  1. Start Game          |\n\
             |  2. Save Game           |\n\
             |  3. Load Game           |\n\
             |  4. View Rules          |\n\
             |  5. Exit                |\n\
             |  6. New Game            |\n\
             +-------------------------+\n\
             Enter choice: "
        )
    }

    // -----------------------------------------------------------------------
    // Game loop
    // -----------------------------------------------------------------------

    fn play(&mut self) -> io::Result<Flow> {
        if self.game.is_game_over() {
            writeln!(self.output, "The previous game is over. Starting a new one.")?;
            self.game.reset();
        }
        writeln!(
            self.output,
            "\nEnter moves as 'e2 e4'. Promotion: 'd7 d8=Q'. Castling: 'e1 g1'.\n\
             Type 'exit' to return to the menu."
        )?;

        loop {
            let board = render_board(&self.game);
            write!(self.output, "\n{board}")?;
            write!(
                self.output,
                "{}'s turn. Enter move: ",
                self.game.side_to_move().title()
            )?;
            let Some(line) = self.read_line()? else {
                return Ok(Flow::Quit);
            };
            if line == "exit" {
                writeln!(self.output, "Game paused. Returning to menu.")?;
                return Ok(Flow::Continue);
            }

            match parse_move(&line).and_then(|mv| self.game.apply_move(mv)) {
                Ok(outcome) => {
                    if self.report(&outcome)? {
                        let board = render_board(&self.game);
                        write!(self.output, "\n{board}")?;
                        return Ok(Flow::Continue);
                    }
                }
                Err(err) => writeln!(self.output, "Invalid move! ({err})")?,
            }
        }
    }

    /// Announce the result of a move. Returns true when the game ended.
    fn report(&mut self, outcome: &MoveOutcome) -> io::Result<bool> {
        if let Some(text) = announcement(outcome.status, self.game.checks_given()) {
            writeln!(self.output, "{text}")?;
        }
        if outcome.status == GameStatus::Checkmate {
            writeln!(self.output, "{} wins.", outcome.piece.color.title())?;
        }
        if outcome.status.is_game_over() {
            writeln!(self.output, "Game Over!")?;
            return Ok(true);
        }
        Ok(false)
    }

    // -----------------------------------------------------------------------
    // Save / load / rules
    // -----------------------------------------------------------------------

    fn prompt_path(&mut self, verb: &str) -> io::Result<Option<PathBuf>> {
        write!(
            self.output,
            "Enter filename to {verb} [{}]: ",
            self.config.save_path.display()
        )?;
        Ok(self.read_line()?.map(|name| {
            if name.is_empty() {
                self.config.save_path.clone()
            } else {
                PathBuf::from(name)
            }
        }))
    }

    fn save(&mut self) -> io::Result<Flow> {
        let Some(path) = self.prompt_path("save")? else {
            return Ok(Flow::Quit);
        };
        match self.game.save(&path) {
            Ok(()) => writeln!(self.output, "Game saved!")?,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "save failed");
                writeln!(self.output, "Could not save game: {err}")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn load(&mut self) -> io::Result<Flow> {
        let Some(path) = self.prompt_path("load")? else {
            return Ok(Flow::Quit);
        };
        match self.game.load(&path) {
            Ok(()) => {
                writeln!(self.output, "Game loaded!")?;
                if let Some(text) = announcement(self.game.status(), self.game.checks_given()) {
                    writeln!(self.output, "{text}")?;
                }
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "load failed");
                writeln!(self.output, "Could not load game: {err}")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn rules(&mut self) -> io::Result<Flow> {
        let limit_rule = match self.game.check_limit() {
            Some(n) => format!("2. House rule: the game ends after {n} checks"),
            None => "2. Checkmate wins; stalemate and 50 quiet moves draw".to_string(),
        };
        writeln!(
            self.output,
            "\n+--------------------------------------------+\n\
             |                Chess Rules                 |\n\
             +--------------------------------------------+\n\
             1. White moves first\n\
             {limit_rule}\n\
             3. Pieces move as follows:\n\
             \x20  King: 1 square any direction\n\
             \x20  Queen: any direction, any distance\n\
             \x20  Rook: horizontal or vertical, any distance\n\
             \x20  Bishop: diagonal, any distance\n\
             \x20  Knight: L-shape (2x1)\n\
             \x20  Pawn: 1 forward, 2 from the start, captures diagonally\n\
             4. Capture by landing on an opponent's piece\n\
             5. Special moves: castling, en passant, promotion\n\
             +--------------------------------------------+\n\
             Press Enter to return to menu..."
        )?;
        Ok(match self.read_line()? {
            Some(_) => Flow::Continue,
            None => Flow::Quit,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_starting_board() {
        let text = render_board(&Game::new());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "  | a b c d e f g h |");
        assert_eq!(lines[3], "8 | r n b q k b n r | 8");
        assert_eq!(lines[10], "1 | R N B Q K B N R | 1");
        assert_eq!(lines[12], "  | a b c d e f g h |");
        assert!(text.contains("Half-moves: 0  Full moves: 1"));
        assert!(text.contains("White captured: None"));
        assert!(text.contains("Black captured: None"));
    }

    #[test]
    fn capture_list_formatting() {
        assert_eq!(capture_list(&[]), "None");
        assert_eq!(capture_list(&['p', 'n']), "p n");
    }

    #[test]
    fn announcements() {
        assert_eq!(announcement(GameStatus::Active, 0), None);
        assert_eq!(announcement(GameStatus::Check, 1).as_deref(), Some("Check!"));
        assert_eq!(
            announcement(
                GameStatus::CheckLimit {
                    winner: Color::Black
                },
                4
            )
            .as_deref(),
            Some("Game over! Black wins after 4 checks.")
        );
    }
}
