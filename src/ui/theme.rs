use hanzi_cards::game::{Outcome, TileState};
use ratatui::style::{Color, Modifier, Style};

/// Colours for every screen, built once and handed to the renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub title: Style,
    pub accent: Style,
    pub legend: Style,
    pub notice: Style,
    pub answer: Style,
    pub tile_idle: Style,
    pub tile_selected: Style,
    pub tile_correct: Style,
    pub tile_incorrect: Style,
    pub cursor: Style,
}

impl Default for Theme {
    fn default() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Self {
            title: bold.fg(Color::Rgb(102, 126, 234)),
            accent: bold.fg(Color::Magenta),
            legend: Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
            notice: bold.fg(Color::Yellow),
            answer: bold.fg(Color::Green),
            tile_idle: Style::default().fg(Color::Rgb(102, 126, 234)),
            tile_selected: bold.fg(Color::Rgb(79, 172, 254)),
            tile_correct: bold.fg(Color::Rgb(39, 174, 96)),
            tile_incorrect: bold.fg(Color::Rgb(231, 76, 60)),
            cursor: bold.fg(Color::Yellow),
        }
    }
}

impl Theme {
    /// Evaluation feedback outranks the selection highlight.
    pub fn tile(&self, state: TileState, feedback: Option<Outcome>) -> Style {
        match (feedback, state) {
            (Some(Outcome::Correct), _) | (None, TileState::MatchedPendingRemoval) => {
                self.tile_correct
            }
            (Some(Outcome::Incorrect), _) => self.tile_incorrect,
            (None, TileState::Selected) => self.tile_selected,
            (None, _) => self.tile_idle,
        }
    }
}
