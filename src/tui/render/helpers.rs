use ratatui::layout::Rect;
use ratatui::text::Span;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans.iter().map(|s| s.content.width()).sum()
}

/// Cut `s` to at most `max` display columns, ending in "…" when shortened
pub(super) fn truncate_to_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for g in s.graphemes(true) {
        let w = g.width();
        if used + w + 1 > max {
            break;
        }
        out.push_str(g);
        used += w;
    }
    out.push('\u{2026}');
    out
}

pub(super) fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_to_width("Aspirin", 10), "Aspirin");
        assert_eq!(truncate_to_width("Aspirin", 7), "Aspirin");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate_to_width("Aspirin", 5), "Aspi\u{2026}");
        assert_eq!(truncate_to_width("Aspirin", 0), "");
    }

    #[test]
    fn truncate_counts_wide_chars() {
        // each CJK char is two columns
        assert_eq!(truncate_to_width("日本語", 5), "日本\u{2026}");
    }

    #[test]
    fn centered_rect_stays_inside() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect_fixed(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect_fixed(30, 4, area), Rect::new(0, 3, 20, 4));
    }
}
