use itertools::Itertools;
use ratatui::layout::{Constraint, Layout, Rect};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Columns used for a board of `total` tiles.
pub fn columns_for(total: usize) -> usize {
    if total <= 12 {
        4
    } else {
        5
    }
}

/// Lay out `total` tiles row by row inside `area`.
///
/// Every row is split into the full column count so a short last row stays
/// aligned with the rows above it. The rect at index `i` belongs to tile `i`.
pub fn tile_rects(area: Rect, total: usize) -> Vec<Rect> {
    if total == 0 {
        return Vec::new();
    }
    let cols = columns_for(total);
    let rows = total.div_ceil(cols);
    let row_areas = Layout::vertical(vec![Constraint::Ratio(1, rows as u32); rows]).split(area);

    let mut rects = Vec::with_capacity(total);
    for (chunk, row) in (0..total).chunks(cols).into_iter().zip(row_areas.iter()) {
        let cells =
            Layout::horizontal(vec![Constraint::Ratio(1, cols as u32); cols]).split(*row);
        rects.extend(chunk.zip(cells.iter()).map(|(_, cell)| *cell));
    }
    rects
}

/// Truncate `text` to `width` terminal columns, ending in an ellipsis when cut.
pub fn fit_text(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_rule() {
        assert_eq!(columns_for(6), 4);
        assert_eq!(columns_for(12), 4);
        assert_eq!(columns_for(14), 5);
        assert_eq!(columns_for(30), 5);
    }

    #[test]
    fn rects_cover_every_tile() {
        let area = Rect::new(0, 0, 80, 20);
        let rects = tile_rects(area, 10);
        assert_eq!(rects.len(), 10);

        // 4 columns, 3 rows
        assert_eq!(rects[0].x, 0);
        assert_eq!(rects[0].y, 0);
        assert_eq!(rects[4].x, rects[0].x);
        assert!(rects[4].y > rects[0].y);
        assert_eq!(rects[8].x, rects[0].x);
        assert_eq!(rects[9].x, rects[1].x);
        assert!(rects.iter().all(|r| area.contains(r.as_position())));
    }

    #[test]
    fn rects_do_not_overlap() {
        let rects = tile_rects(Rect::new(0, 0, 100, 30), 30);
        for (a, b) in rects.iter().tuple_combinations() {
            assert!(!a.intersects(*b), "{a:?} overlaps {b:?}");
        }
    }

    #[test]
    fn empty_board() {
        assert!(tile_rects(Rect::new(0, 0, 10, 10), 0).is_empty());
    }

    #[test]
    fn fit_text_keeps_short_text() {
        assert_eq!(fit_text("water", 10), "water");
        assert_eq!(fit_text("水", 2), "水");
    }

    #[test]
    fn fit_text_truncates_by_display_width() {
        assert_eq!(fit_text("good morning", 5), "good…");
        assert_eq!(fit_text("你好世界", 5), "你好…");
        assert_eq!(fit_text("abc", 0), "");
    }
}
