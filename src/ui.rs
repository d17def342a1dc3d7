pub mod grid;
pub mod screen;
pub mod theme;

use hanzi_cards::{
    flashcards::Rating,
    game::TileState,
    mode::ProjectionMode,
    vocabulary::MIN_WORDS,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Gauge, Paragraph, Widget, Wrap},
    Frame,
};

use crate::App;
use theme::Theme;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

pub fn draw(app: &mut App, f: &mut Frame, theme: &Theme) {
    let area = f.area();
    screen::current_screen(&app.state).render(app, area, f.buffer_mut(), theme);
}

fn legend(text: &str, theme: &Theme) -> Paragraph<'static> {
    Paragraph::new(Span::styled(text.to_string(), theme.legend)).alignment(Alignment::Center)
}

pub fn render_menu(app: &mut App, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let [title_area, modes_area, words_area, notice_area, legend_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(ProjectionMode::ALL.len() as u16 + 2),
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .horizontal_margin(HORIZONTAL_MARGIN)
    .vertical_margin(VERTICAL_MARGIN)
    .areas(area);

    Paragraph::new(Span::styled("Chinese Learning", theme.title))
        .alignment(Alignment::Center)
        .render(title_area, buf);

    let modes = ProjectionMode::ALL
        .iter()
        .map(|mode| {
            if *mode == app.config.mode {
                Line::from(Span::styled(format!("> {}", mode.label()), theme.accent))
            } else {
                Line::from(format!("  {}", mode.label()))
            }
        })
        .collect::<Vec<_>>();
    Paragraph::new(modes)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .title(" Learning mode "),
        )
        .render(modes_area, buf);

    let settings = vec![
        Line::from(vec![
            Span::raw("Number of words: "),
            Span::styled(format!("< {} >", app.word_count()), theme.accent),
            Span::styled(format!("  ({MIN_WORDS}-{})", app.max_words()), theme.legend),
        ]),
        Line::from(format!(
            "Deck: {} ({} words)",
            app.vocabulary.name(),
            app.vocabulary.len()
        )),
    ];
    Paragraph::new(settings)
        .alignment(Alignment::Center)
        .render(words_area, buf);

    if let Some(notice) = &app.notice {
        Paragraph::new(Span::styled(notice.clone(), theme.notice))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(notice_area, buf);
    }

    legend(
        "(↑↓) mode / (←→) words / (f)lashcards / (g)ame / (s)ave settings / (esc)ape",
        theme,
    )
    .render(legend_area, buf);
}

pub fn render_flashcard(app: &mut App, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let Some(deck) = app.deck.as_ref() else {
        return;
    };
    let Some(card) = deck.current() else {
        return;
    };

    let [header_area, gauge_area, card_area, legend_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .horizontal_margin(HORIZONTAL_MARGIN)
    .vertical_margin(VERTICAL_MARGIN)
    .areas(area);

    Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Flashcard {} of {}", deck.position() + 1, deck.len()),
            theme.title,
        )),
        Line::from(Span::styled(deck.mode().label(), theme.legend)),
    ])
    .alignment(Alignment::Center)
    .render(header_area, buf);

    Gauge::default()
        .gauge_style(theme.accent)
        .ratio(deck.progress().clamp(0.0, 1.0))
        .label(format!("{}/{}", deck.position(), deck.len()))
        .render(gauge_area, buf);

    let answer = if deck.answer_shown() {
        Span::styled(card.answer.clone(), theme.answer)
    } else {
        Span::styled("?", theme.legend)
    };
    let block = Block::bordered().border_type(BorderType::Rounded);
    let inner = block.inner(card_area);
    block.render(card_area, buf);
    let top_pad = inner.height.saturating_sub(3) / 2;
    let mut lines = vec![Line::default(); top_pad as usize];
    lines.push(Line::from(Span::styled(card.prompt.clone(), theme.title)));
    lines.push(Line::default());
    lines.push(Line::from(answer));
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(inner, buf);

    let keys = if deck.answer_shown() {
        "(y) correct / (n) incorrect / (b)ack / (esc)ape"
    } else {
        "(space) show answer / (y) correct / (n) incorrect / (b)ack / (esc)ape"
    };
    legend(keys, theme).render(legend_area, buf);
}

pub fn render_flashcard_results(app: &mut App, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let Some(deck) = app.deck.as_ref() else {
        return;
    };
    let summary = deck.summary();
    let rating_style = match summary.rating {
        Rating::Excellent => theme.tile_correct,
        Rating::Good => theme.notice,
        Rating::KeepStudying => theme.tile_incorrect,
    };

    let [body_area, legend_area] = Layout::vertical([Constraint::Min(6), Constraint::Length(1)])
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .areas(area);

    let lines = vec![
        Line::from(Span::styled("Flashcard Results", theme.title)),
        Line::default(),
        Line::from(format!("Score: {}/{}", summary.correct, summary.total)),
        Line::from(format!("Accuracy: {:.1}%", summary.accuracy)),
        Line::default(),
        Line::from(Span::styled(summary.rating.to_string(), rating_style)),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(centered(body_area, 6), buf);

    legend("(r)etry / (m)enu / (esc)ape", theme).render(legend_area, buf);
}

pub fn render_matching(app: &mut App, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let Some(board) = app.board.as_ref() else {
        return;
    };
    let session = &board.session;

    let [header_area, grid_area, legend_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .horizontal_margin(HORIZONTAL_MARGIN)
    .vertical_margin(1)
    .areas(area);

    let summary = session.summary();
    Paragraph::new(vec![
        Line::from(Span::styled(
            format!(
                "Score: {} | Pairs Found: {}/{}",
                summary.score, summary.matched_pairs, summary.total_pairs
            ),
            theme.title,
        )),
        Line::from(Span::styled(
            format!("Match {}", session.mode().label()),
            theme.legend,
        )),
    ])
    .alignment(Alignment::Center)
    .render(header_area, buf);

    let rects = grid::tile_rects(grid_area, session.tiles().len());
    for (index, (tile, rect)) in session.tiles().iter().zip(rects.iter()).enumerate() {
        if tile.state == TileState::Removed {
            continue;
        }
        let style = theme.tile(tile.state, board.feedback.get(&index).copied());
        let border = if index == board.cursor {
            theme.cursor
        } else {
            style
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border);
        let inner = block.inner(*rect);
        block.render(*rect, buf);
        Paragraph::new(Span::styled(
            grid::fit_text(&tile.content, inner.width as usize),
            style,
        ))
        .alignment(Alignment::Center)
        .render(centered(inner, 1), buf);
    }

    legend(
        "(click) or (←↑↓→ + enter) select / (b)ack to menu / (esc)ape",
        theme,
    )
    .render(legend_area, buf);

    app.tile_rects = rects;
}

pub fn render_game_results(app: &mut App, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let Some(board) = app.board.as_ref() else {
        return;
    };
    let session = &board.session;

    let [body_area, legend_area] = Layout::vertical([Constraint::Min(6), Constraint::Length(1)])
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .areas(area);

    let mut lines = vec![
        Line::from(Span::styled("Game Complete!", theme.title)),
        Line::default(),
        Line::from(Span::styled(
            format!("Final Score: {}", session.score()),
            theme.answer,
        )),
        Line::from(format!("All {} pairs matched!", session.total_pairs())),
    ];
    if let Some(at) = board.finished_at {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("finished at {}", at.format("%H:%M:%S")),
            theme.legend,
        )));
    }
    let height = lines.len() as u16;
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(centered(body_area, height), buf);

    legend("(r) play again / (m)enu / (esc)ape", theme).render(legend_area, buf);
}

/// Vertically center a block of `height` rows inside `area`.
fn centered(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..area
    }
}
