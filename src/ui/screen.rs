use ratatui::{buffer::Buffer, layout::Rect};

use crate::{
    ui::{
        render_flashcard, render_flashcard_results, render_game_results, render_matching,
        render_menu, theme::Theme,
    },
    App, AppState,
};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &mut App, area: Rect, buf: &mut Buffer, theme: &Theme);
}

pub struct MenuScreen;

impl Screen for MenuScreen {
    fn render(&self, app: &mut App, area: Rect, buf: &mut Buffer, theme: &Theme) {
        render_menu(app, area, buf, theme);
    }
}

pub struct FlashcardScreen;

impl Screen for FlashcardScreen {
    fn render(&self, app: &mut App, area: Rect, buf: &mut Buffer, theme: &Theme) {
        render_flashcard(app, area, buf, theme);
    }
}

pub struct FlashcardResultsScreen;

impl Screen for FlashcardResultsScreen {
    fn render(&self, app: &mut App, area: Rect, buf: &mut Buffer, theme: &Theme) {
        render_flashcard_results(app, area, buf, theme);
    }
}

/// Matching board; records tile positions on the app for mouse hit testing
pub struct MatchingScreen;

impl Screen for MatchingScreen {
    fn render(&self, app: &mut App, area: Rect, buf: &mut Buffer, theme: &Theme) {
        render_matching(app, area, buf, theme);
    }
}

pub struct GameResultsScreen;

impl Screen for GameResultsScreen {
    fn render(&self, app: &mut App, area: Rect, buf: &mut Buffer, theme: &Theme) {
        render_game_results(app, area, buf, theme);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Menu => Box::new(MenuScreen),
        AppState::Flashcards => Box::new(FlashcardScreen),
        AppState::FlashcardResults => Box::new(FlashcardResultsScreen),
        AppState::Matching => Box::new(MatchingScreen),
        AppState::GameResults => Box::new(GameResultsScreen),
    }
}
