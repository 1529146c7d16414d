//! Table rendering for formatted output.

use console::measure_text_width;

/// A box-drawn table whose cells may carry ANSI styling.
#[derive(Debug)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    column_widths: Vec<usize>,
}

impl Table {
    /// Create a new table with the given headers.
    pub fn new(headers: &[&str]) -> Self {
        let headers: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        let column_widths = headers.iter().map(|h| measure_text_width(h)).collect();

        Self {
            headers,
            rows: Vec::new(),
            column_widths,
        }
    }

    /// Add a row; cells beyond the header count are dropped.
    pub fn add_row(&mut self, row: Vec<String>) {
        for (width, cell) in self.column_widths.iter_mut().zip(&row) {
            *width = (*width).max(measure_text_width(cell));
        }
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table as a string.
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 4);
        lines.push(self.render_border('┌', '┬', '┐'));
        lines.push(self.render_row(&self.headers));
        lines.push(self.render_border('├', '┼', '┤'));
        for row in &self.rows {
            lines.push(self.render_row(row));
        }
        lines.push(self.render_border('└', '┴', '┘'));
        lines.join("\n")
    }

    fn render_border(&self, left: char, mid: char, right: char) -> String {
        let segments: Vec<String> = self
            .column_widths
            .iter()
            .map(|width| "─".repeat(width + 2))
            .collect();
        format!("{}{}{}", left, segments.join(&mid.to_string()), right)
    }

    fn render_row(&self, row: &[String]) -> String {
        let mut s = String::from("│");
        for (i, width) in self.column_widths.iter().enumerate() {
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            // Pad by visible width; `{:width$}` would count escape codes.
            let pad = width.saturating_sub(measure_text_width(cell));
            s.push(' ');
            s.push_str(cell);
            s.push_str(&" ".repeat(pad));
            s.push_str(" │");
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::Style;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn table_empty() {
        let table = Table::new(&["Name", "Status"]);
        assert!(table.is_empty());
        let output = table.render();
        assert!(output.contains("Name"));
        assert_eq!(output.lines().count(), 4);
    }

    #[test]
    fn table_layout() {
        let mut table = Table::new(&["Name", "Status"]);
        table.add_row(cells(&["Git", "✓ installed"]));
        table.add_row(cells(&["Ghost", "✗ missing"]));

        assert_eq!(table.row_count(), 2);
        let output = table.render();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with('┌') && lines[0].contains('┬'));
        assert!(lines[5].starts_with('└') && lines[5].ends_with('┘'));
        assert!(output.contains("Ghost"));
    }

    #[test]
    fn rows_have_equal_visible_width() {
        let mut table = Table::new(&["Name"]);
        table.add_row(cells(&["a-much-longer-value"]));
        table.add_row(cells(&["x"]));

        let output = table.render();
        let widths: Vec<_> = output.lines().map(measure_text_width).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn styled_cells_pad_by_visible_width() {
        let styled = Style::new().green().force_styling(true).apply_to("ok").to_string();
        assert!(styled.len() > 2);

        let mut table = Table::new(&["Status"]);
        table.add_row(vec![styled]);
        table.add_row(cells(&["plain"]));

        let output = table.render();
        let widths: Vec<_> = output.lines().map(measure_text_width).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn missing_cells_render_blank() {
        let mut table = Table::new(&["A", "B", "C"]);
        table.add_row(cells(&["only"]));
        assert!(table.render().contains("only"));
    }
}
