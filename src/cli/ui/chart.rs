//! Horizontal bar charts drawn with text, used by the summary screen in place
//! of graphical plots.

use crate::cli::output::current_preferences;

const DEFAULT_WIDTH: usize = 30;

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// Text printed after the bar, usually the formatted amount.
    pub annotation: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub bars: Vec<Bar>,
    pub width: usize,
}

impl BarChart {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            bars: Vec::new(),
            width: DEFAULT_WIDTH,
        }
    }

    pub fn bar(mut self, label: impl Into<String>, value: f64, annotation: impl Into<String>) -> Self {
        self.bars.push(Bar {
            label: label.into(),
            value,
            annotation: annotation.into(),
        });
        self
    }

    /// Bar length in cells. The largest value fills `width`; any positive
    /// value gets at least one cell.
    fn bar_len(&self, value: f64, max: f64) -> usize {
        if max <= 0.0 || value <= 0.0 {
            return 0;
        }
        let scaled = (value / max * self.width as f64).round() as usize;
        scaled.clamp(1, self.width)
    }

    pub fn render(&self) -> String {
        let glyph = if current_preferences().plain_mode {
            "#"
        } else {
            "█"
        };
        let label_width = self
            .bars
            .iter()
            .map(|bar| bar.label.chars().count())
            .max()
            .unwrap_or(0);
        let max = self.bars.iter().map(|bar| bar.value).fold(0.0_f64, f64::max);

        let mut lines = vec![self.title.clone()];
        for bar in &self.bars {
            let len = self.bar_len(bar.value, max);
            let line = format!(
                "  {:<label_width$} | {:<width$} {}",
                bar.label,
                glyph.repeat(len),
                bar.annotation,
                width = self.width,
            );
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn largest_bar_fills_the_width() {
        let chart = BarChart::new("By category")
            .bar("Food", 150.0, "150.00")
            .bar("Travel", 15.0, "15.00");
        assert_eq!(chart.bar_len(150.0, 150.0), DEFAULT_WIDTH);
        assert_eq!(chart.bar_len(15.0, 150.0), 3);
        assert_eq!(chart.bar_len(0.01, 150.0), 1);
        assert_eq!(chart.bar_len(0.0, 150.0), 0);
    }

    #[test]
    fn render_lists_every_bar_under_the_title() {
        let rendered = BarChart::new("Daily")
            .bar("2024-01-01", 10.0, "10.00")
            .bar("2024-01-02", 5.0, "5.00")
            .render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Daily");
        assert!(lines[1].starts_with("  2024-01-01 | "));
        assert!(lines[2].ends_with("5.00"));
    }
}
