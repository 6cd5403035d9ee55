use std::io::{self, BufRead, Write};

use crate::config::{DraftFormat, AUTO_PICK_SENTINEL};
use crate::error::{DraftError, Result};

/// Source of operator answers. Blocks until a line is available.
pub trait Prompter {
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// Reads answers from stdin, writing each prompt to stdout first.
pub struct StdinPrompter<R: BufRead> {
    input: R,
}

impl StdinPrompter<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self { input: io::stdin().lock() }
    }
}

impl<R: BufRead> StdinPrompter<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> Prompter for StdinPrompter<R> {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(DraftError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// What the operator asked for at the pick prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    /// Snake: the owner's own picks. Salary Cap: every owner's picks.
    OwnerPicks,
    /// Snake: the owner's depth chart. Salary Cap: every depth chart.
    DepthCharts,
    BestAvailable,
    RecentPicks,
    FullHistory,
    /// Salary Cap only: look up one player's listed value
    PlayerValue,
    AutoPick,
    Player(String),
}

impl MenuChoice {
    /// Reads one answer; anything that is not a menu number is a player name.
    pub fn parse(input: &str, format: DraftFormat) -> Self {
        match (input, format) {
            ("1", _) => MenuChoice::OwnerPicks,
            ("2", _) => MenuChoice::DepthCharts,
            ("3", _) => MenuChoice::BestAvailable,
            ("4", _) => MenuChoice::RecentPicks,
            ("5", _) => MenuChoice::FullHistory,
            ("6", DraftFormat::SalaryCap) => MenuChoice::PlayerValue,
            (s, _) if s == AUTO_PICK_SENTINEL => MenuChoice::AutoPick,
            (s, _) => MenuChoice::Player(s.to_string()),
        }
    }
}

/// Menu text shown at every pick prompt.
pub fn menu_text(format: DraftFormat) -> &'static str {
    match format {
        DraftFormat::Snake => {
            "
You can either enter who you would like to draft or perform any of
the following options by entering its corresponding number:

1) Look at who you already have drafted
2) View your current depth chart
3) See the best players available
4) See the last 10 players drafted
5) Look at the full draft history
9) Take the best player available

"
        }
        DraftFormat::SalaryCap => {
            "
You can either enter who you would like to nominate for the
auction or perform any of the following options by entering its
corresponding number:

1) Look at individual draft histories
2) View all current depth charts
3) See expected salaries and point projections
4) See the last 10 players drafted
5) Look at the full draft history
6) Check how much a player is worth
9) Nominate the best player available

"
        }
    }
}

/// Replays canned answers and remembers every prompt it was shown.
#[cfg(test)]
pub(crate) struct ScriptedPrompter {
    answers: std::collections::VecDeque<String>,
    prompts: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers.pop_front().ok_or(DraftError::InputClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_numbers_map_per_format() {
        assert_eq!(MenuChoice::parse("1", DraftFormat::Snake), MenuChoice::OwnerPicks);
        assert_eq!(MenuChoice::parse("5", DraftFormat::SalaryCap), MenuChoice::FullHistory);
        assert_eq!(MenuChoice::parse("6", DraftFormat::SalaryCap), MenuChoice::PlayerValue);
        assert_eq!(
            MenuChoice::parse("6", DraftFormat::Snake),
            MenuChoice::Player("6".to_string())
        );
        assert_eq!(MenuChoice::parse("9", DraftFormat::Snake), MenuChoice::AutoPick);
        assert_eq!(
            MenuChoice::parse("Justin Jefferson", DraftFormat::Snake),
            MenuChoice::Player("Justin Jefferson".to_string())
        );
    }

    #[test]
    fn stdin_prompter_strips_line_endings_and_reports_eof() {
        let mut prompter = StdinPrompter::new("Bijan Robinson\r\nsecond\n".as_bytes());
        assert_eq!(prompter.ask("? ").unwrap(), "Bijan Robinson");
        assert_eq!(prompter.ask("? ").unwrap(), "second");
        assert!(matches!(prompter.ask("? "), Err(DraftError::InputClosed)));
    }
}
