use unicode_width::UnicodeWidthStr;

/// Terminal column metrics for aligned text tables.
pub struct TextMetrics {
    pub indent: usize,
    pub gutter: usize,
    pub max_column_width: usize,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            indent: 2,
            gutter: 2,
            max_column_width: 48,
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str) -> usize {
        UnicodeWidthStr::width(text)
    }

    /// Widest entry, capped at `max_column_width`.
    pub fn column_width<'a>(&self, cells: impl IntoIterator<Item = &'a str>) -> usize {
        cells
            .into_iter()
            .map(|c| self.text_width(c))
            .max()
            .unwrap_or(0)
            .min(self.max_column_width)
    }

    /// Pads `text` with spaces to `width` display columns.
    pub fn pad(&self, text: &str, width: usize) -> String {
        let used = self.text_width(text);
        let mut padded = String::with_capacity(text.len() + width.saturating_sub(used));
        padded.push_str(text);
        padded.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
        padded
    }

    /// One table row: indent, left cell padded to `width`, gutter, right cell.
    pub fn row(&self, left: &str, width: usize, right: &str) -> String {
        format!(
            "{}{}{}{}",
            " ".repeat(self.indent),
            self.pad(left, width),
            " ".repeat(self.gutter),
            right
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_width() {
        let m = TextMetrics::default();
        assert_eq!(m.text_width("YEAR"), 4);
    }

    #[test]
    fn test_unicode_width() {
        let m = TextMetrics::default();
        // full-width characters take two columns
        assert_eq!(m.text_width("名前"), 4);
    }

    #[test]
    fn test_mixed_width() {
        let m = TextMetrics::default();
        // "User" (4) + "テスト" (6) = 10
        assert_eq!(m.text_width("Userテスト"), 10);
    }

    #[test]
    fn test_pad_by_display_width() {
        let m = TextMetrics::default();
        assert_eq!(m.pad("名前", 6), "名前  ");
        assert_eq!(m.pad("TITLE", 3), "TITLE");
    }

    #[test]
    fn test_column_width_capped() {
        let m = TextMetrics {
            max_column_width: 5,
            ..TextMetrics::default()
        };
        assert_eq!(m.column_width(["A", "ABC"]), 3);
        assert_eq!(m.column_width(["ABCDEFGH"]), 5);
        assert_eq!(m.column_width(Vec::<&str>::new()), 0);
    }

    #[test]
    fn test_row() {
        let m = TextMetrics::default();
        assert_eq!(m.row("{A}+", 6, "{A, B}"), "  {A}+    {A, B}");
    }
}
