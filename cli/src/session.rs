use anyhow::Result;
use sapper_core::{
    Coord, GameError, MarkOutcome, MatchController, MatchMode, OpenOutcome, Player, RoundOutcome,
    Standing, TimerDisplay,
};
use std::io::{BufRead, Write};
use web_time::Instant;

use crate::config::Settings;
use crate::render::{render_board, render_layout};

const HELP: &str = "\
Commands:
  <row> <col>   toggle a mine (placing) or open a cell (revealing), 1-based
  done          finish placing mines and hand over
  clear         remove every placed mine
  help          show this help
  quit          leave the game";

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Zero-based row and column.
    Cell(Coord, Coord),
    Done,
    Clear,
    Help,
    Quit,
}

impl Command {
    /// Parses `row col` (or `row,col`, 1-based) and the keyword commands.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "done" | "d" | "start" => return Some(Self::Done),
            "clear" | "c" => return Some(Self::Clear),
            "help" | "h" | "?" => return Some(Self::Help),
            "quit" | "q" | "exit" => return Some(Self::Quit),
            _ => {}
        }

        let mut parts = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty());
        let row: Coord = parts.next()?.parse().ok()?;
        let col: Coord = parts.next()?.parse().ok()?;
        if parts.next().is_some() || row == 0 || col == 0 {
            return None;
        }
        Some(Self::Cell(row - 1, col - 1))
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Hot-seat terminal adapter around a [`MatchController`].
pub struct Session<R, W> {
    controller: MatchController,
    mode: Option<MatchMode>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(settings: Settings, input: R, output: W) -> Self {
        Self {
            controller: MatchController::new(settings.board),
            mode: settings.mode,
            input,
            output,
        }
    }

    pub fn run(mut self) -> Result<()> {
        loop {
            let Some(mode) = self.choose_mode()? else {
                return Ok(());
            };
            self.controller.start_match(mode);

            if let Flow::Quit = self.play_match()? {
                return Ok(());
            }
            if !self.confirm("Play again? [y/N]")? {
                return Ok(());
            }
            self.controller.reset_match();
        }
    }

    fn play_match(&mut self) -> Result<Flow> {
        loop {
            if let Flow::Quit = self.placement()? {
                return Ok(Flow::Quit);
            }
            if let Flow::Quit = self.reveal()? {
                return Ok(Flow::Quit);
            }
            self.print_round_summary()?;

            match self.controller.advance_round() {
                Ok(()) => {
                    writeln!(self.output, "Roles swap for the next round.")?;
                }
                Err(GameError::InvalidTransition) => {
                    self.print_final_standing()?;
                    return Ok(Flow::Continue);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn choose_mode(&mut self) -> Result<Option<MatchMode>> {
        if let Some(mode) = self.mode {
            return Ok(Some(mode));
        }

        loop {
            writeln!(self.output, "Choose a mode: [c]lassic or [t]ournament")?;
            let Some(line) = self.read_line("mode> ")? else {
                return Ok(None);
            };
            match line.trim().to_ascii_lowercase().as_str() {
                "c" | "classic" => return Ok(Some(MatchMode::Classic)),
                "t" | "tournament" => return Ok(Some(MatchMode::Tournament)),
                "q" | "quit" => return Ok(None),
                _ => writeln!(self.output, "Unknown mode.")?,
            }
        }
    }

    fn placement(&mut self) -> Result<Flow> {
        let player = self.current_player()?;
        let round = self.controller.current_round().unwrap_or(1);
        writeln!(
            self.output,
            "\nRound {round}: {player}, place your mines. Type `help` for commands."
        )?;

        loop {
            let (Some(layout), Some(remaining)) =
                (self.controller.layout(), self.controller.remaining_capacity())
            else {
                return Err(GameError::InvalidTransition.into());
            };
            let grid = layout.grid();
            write!(self.output, "{}", render_layout(layout))?;
            writeln!(self.output, "Mines left: {remaining}")?;

            let Some(line) = self.read_line(&format!("{player}> "))? else {
                return Ok(Flow::Quit);
            };
            match Command::parse(&line) {
                Some(Command::Cell(row, col)) => {
                    let placement = grid
                        .index(row, col)
                        .and_then(|index| self.controller.toggle_mine(index));
                    match placement {
                        Ok(placement) if placement.outcome == MarkOutcome::NoChange => {
                            writeln!(self.output, "All mines are placed, remove one first.")?
                        }
                        Ok(_) => {}
                        Err(err) => writeln!(self.output, "! {err}")?,
                    }
                }
                Some(Command::Done) => match self.controller.begin_reveal_phase() {
                    Ok(()) => return Ok(Flow::Continue),
                    Err(GameError::IncompleteLayout) => {
                        writeln!(self.output, "Place {remaining} more mine(s) first.")?
                    }
                    Err(err) => return Err(err.into()),
                },
                Some(Command::Clear) => self.controller.begin_placement_phase()?,
                Some(Command::Help) => writeln!(self.output, "{HELP}")?,
                Some(Command::Quit) => return Ok(Flow::Quit),
                None => writeln!(self.output, "Unrecognized command, try `help`.")?,
            }
        }
    }

    fn reveal(&mut self) -> Result<Flow> {
        let player = self.current_player()?;
        writeln!(
            self.output,
            "\n{player}, the field is yours. Open every safe cell."
        )?;
        let started = Instant::now();

        loop {
            let Some(board) = self.controller.board() else {
                return Err(GameError::InvalidTransition.into());
            };
            let grid = board.grid();
            write!(self.output, "{}", render_board(board))?;
            writeln!(
                self.output,
                "Opened: {}  Time: {}",
                board.opened_count(),
                TimerDisplay(self.controller.elapsed_seconds())
            )?;

            let Some(line) = self.read_line(&format!("{player}> "))? else {
                return Ok(Flow::Quit);
            };
            match Command::parse(&line) {
                Some(Command::Cell(row, col)) => {
                    self.sync_timer(started);
                    let outcome = grid
                        .index(row, col)
                        .and_then(|index| self.controller.open_cell(index));
                    match outcome {
                        Ok(outcome) if outcome.round_outcome().is_some() => {
                            if let Some(board) = self.controller.board() {
                                write!(self.output, "{}", render_board(board))?;
                            }
                            return Ok(Flow::Continue);
                        }
                        Ok(OpenOutcome::AlreadyOpen) => {
                            writeln!(self.output, "That cell is already open.")?
                        }
                        Ok(_) => {}
                        Err(err) => writeln!(self.output, "! {err}")?,
                    }
                }
                Some(Command::Done | Command::Clear) => {
                    writeln!(self.output, "Mines are already placed.")?
                }
                Some(Command::Help) => writeln!(self.output, "{HELP}")?,
                Some(Command::Quit) => return Ok(Flow::Quit),
                None => writeln!(self.output, "Unrecognized command, try `help`.")?,
            }
        }
    }

    /// Converts wall-clock time since the reveal began into timer ticks.
    fn sync_timer(&mut self, started: Instant) {
        let target = started.elapsed().as_secs();
        let behind = target.saturating_sub(u64::from(self.controller.elapsed_seconds()));
        for _ in 0..behind {
            self.controller.tick();
        }
    }

    fn print_round_summary(&mut self) -> Result<()> {
        let Some(summary) = self.controller.last_round().copied() else {
            return Ok(());
        };

        match summary.outcome {
            RoundOutcome::Won => writeln!(self.output, "{} cleared the field!", summary.revealer)?,
            RoundOutcome::Lost => writeln!(self.output, "{} hit a mine.", summary.revealer)?,
        }
        writeln!(
            self.output,
            "Time: {}  Opened: {}  Accuracy: {:.1}%  Score: {}",
            TimerDisplay(summary.elapsed_seconds),
            summary.opened_count,
            summary.accuracy_pct,
            summary.score
        )?;
        Ok(())
    }

    fn print_final_standing(&mut self) -> Result<()> {
        if self.controller.mode() != Some(MatchMode::Tournament) {
            return Ok(());
        }
        let scores = self.controller.scores();

        writeln!(
            self.output,
            "Scores: {} {}, {} {}",
            Player::One,
            scores.player1,
            Player::Two,
            scores.player2
        )?;
        match self.controller.final_standing() {
            Some(Standing::Winner(player)) => {
                writeln!(self.output, "Tournament winner: {player}!")?
            }
            Some(Standing::Tie) => writeln!(self.output, "It's a tie!")?,
            None => {}
        }
        Ok(())
    }

    fn current_player(&self) -> Result<Player> {
        Ok(self
            .controller
            .current_player()
            .ok_or(GameError::InvalidTransition)?)
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        writeln!(self.output, "{question}")?;
        Ok(self
            .read_line("> ")?
            .is_some_and(|answer| matches!(answer.trim(), "y" | "Y" | "yes")))
    }

    /// `None` once the input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        log::trace!("input: {:?}", line.trim_end());
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapper_core::GameConfig;
    use std::io::Cursor;

    fn play(mode: Option<MatchMode>, script: &str) -> String {
        let settings = Settings {
            mode,
            board: GameConfig::new(3, 3, 1).unwrap(),
        };
        let mut output = Vec::new();
        Session::new(settings, Cursor::new(script.to_owned()), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("2 3"), Some(Command::Cell(1, 2)));
        assert_eq!(Command::parse(" 1,1 \n"), Some(Command::Cell(0, 0)));
        assert_eq!(Command::parse("DONE"), Some(Command::Done));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("0 1"), None);
        assert_eq!(Command::parse("1 2 3"), None);
        assert_eq!(Command::parse("one two"), None);
    }

    #[test]
    fn classic_round_to_victory() {
        let output = play(Some(MatchMode::Classic), "1 1\ndone\n3 3\nn\n");

        assert!(output.contains("Round 1: Player 1, place your mines."));
        assert!(output.contains("Player 2, the field is yours."));
        assert!(output.contains("Player 2 cleared the field!"));
        assert!(output.contains("Opened: 8"));
        assert!(output.contains("Accuracy: 100.0%"));
        assert!(!output.contains("Tournament winner"));
        assert!(!output.contains("Scores:"));
    }

    #[test]
    fn done_before_all_mines_are_placed_is_refused() {
        let output = play(Some(MatchMode::Classic), "done\nquit\n");

        assert!(output.contains("Place 1 more mine(s) first."));
        assert!(!output.contains("the field is yours"));
    }

    #[test]
    fn full_layout_rejects_extra_mine() {
        let output = play(Some(MatchMode::Classic), "1 1\n2 2\nquit\n");

        assert!(output.contains("All mines are placed, remove one first."));
    }

    #[test]
    fn out_of_range_cell_is_reported() {
        let output = play(Some(MatchMode::Classic), "4 1\nquit\n");

        assert!(output.contains(&format!("! {}", GameError::OutOfRange)));
    }

    #[test]
    fn tournament_announces_winner() {
        let script = "t\n1 1\ndone\n1 1\n1 1\ndone\n3 3\nn\n";
        let output = play(None, script);

        assert!(output.contains("Player 2 hit a mine."));
        assert!(output.contains("Roles swap for the next round."));
        assert!(output.contains("Round 2: Player 2, place your mines."));
        assert!(output.contains("Player 1 cleared the field!"));
        assert!(output.contains("Tournament winner: Player 1!"));
    }

    #[test]
    fn replay_starts_a_fresh_match() {
        let script = "1 1\ndone\n1 1\ny\n1 1\ndone\n3 3\nn\n";
        let output = play(Some(MatchMode::Classic), script);

        assert_eq!(output.matches("Round 1: Player 1").count(), 2);
        assert!(output.contains("Player 2 hit a mine."));
        assert!(output.contains("Player 2 cleared the field!"));
    }

    #[test]
    fn exhausted_input_ends_quietly() {
        let output = play(None, "");

        assert!(output.contains("Choose a mode"));
    }
}
