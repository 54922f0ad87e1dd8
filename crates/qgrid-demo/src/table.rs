//! Plain-text rendering of a [`GridView`].

use std::fmt::Write as _;

use qgrid::{ColumnKey, GridView, PageItem};
use unicode_width::UnicodeWidthStr;

/// Pad `text` with spaces to `width` display columns.
fn pad(text: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(text);
    let mut out = String::with_capacity(text.len() + width.saturating_sub(used));
    out.push_str(text);
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}

/// Render one page as an aligned table with a footer and page strip.
///
/// `cell` maps a column and the row's index within the filtered set to text.
pub fn render<K, R>(view: &GridView<'_, K, R>, cell: impl Fn(&R, K, usize) -> String) -> String
where
    K: ColumnKey,
{
    let rows: Vec<Vec<String>> = view
        .page
        .rows
        .iter()
        .enumerate()
        .map(|(i, record)| {
            view.columns
                .iter()
                .map(|c| cell(record, c.id, view.page.start + i))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = view
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| UnicodeWidthStr::width(row[i].as_str()))
                .chain(std::iter::once(UnicodeWidthStr::width(column.label.as_str())))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = view
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| pad(&c.label, *w))
        .collect();
    let _ = writeln!(out, "| {} |", header.join(" | "));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "|-{}-|", rule.join("-|-"));

    if rows.is_empty() {
        let _ = writeln!(out, "  (no records match the current filters)");
    }
    for row in &rows {
        let cells: Vec<String> = row.iter().zip(&widths).map(|(t, w)| pad(t, *w)).collect();
        let _ = writeln!(out, "| {} |", cells.join(" | "));
    }

    let strip: Vec<String> = view
        .pages
        .iter()
        .map(|item| match item {
            PageItem::Page(p) if *p == view.page.current_page => format!("[{p}]"),
            PageItem::Page(p) => p.to_string(),
            PageItem::Ellipsis => "…".to_owned(),
        })
        .collect();
    let _ = writeln!(out, "{}    {}", view.page.summary(), strip.join(" "));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use qgrid::{Column, DataGrid, FieldValue, GridConfig, Predicate, Record};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Col {
        Name,
        City,
    }

    struct Row(&'static str, &'static str);

    impl Record for Row {
        type Field = Col;

        fn field(&self, field: Col) -> FieldValue<'_> {
            match field {
                Col::Name => FieldValue::text(self.0),
                Col::City => FieldValue::text(self.1),
            }
        }
    }

    fn cell(row: &Row, col: Col, _: usize) -> String {
        match col {
            Col::Name => row.0.to_owned(),
            Col::City => row.1.to_owned(),
        }
    }

    #[test]
    fn pads_by_display_width() {
        assert_eq!(pad("東京", 5), "東京 ");
        assert_eq!(pad("abc", 2), "abc");
    }

    #[test]
    fn renders_header_rows_and_footer() {
        let rows = [Row("Ana", "東京"), Row("Bo", "Lisbon")];
        let mut grid: DataGrid<Col, Col> = DataGrid::new(
            vec![Column::new(Col::Name, "Name", 1), Column::new(Col::City, "City", 2)],
            GridConfig::default(),
        )
        .unwrap();
        let text = render(&grid.view(&rows), cell);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "| Name | City   |");
        assert_eq!(lines[2], "| Ana  | 東京   |");
        assert!(lines[4].starts_with("Showing 1 to 2 of 2 entries"));
        assert!(lines[4].ends_with("[1]"));
    }

    #[test]
    fn empty_page_says_so() {
        let rows = [Row("Ana", "Porto")];
        let mut grid: DataGrid<Col, Col> =
            DataGrid::new(vec![Column::new(Col::Name, "Name", 1)], GridConfig::default())
                .unwrap()
                .with_filter("city", Predicate::exact(Col::City));
        grid.filters_mut().set_choice("city", "Oslo");
        let text = render(&grid.view(&rows), cell);
        assert!(text.contains("no records match"));
        assert!(text.contains("No matching entries"));
    }
}
