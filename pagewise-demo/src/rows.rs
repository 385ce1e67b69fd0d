//! Text rendering of rows.

use pagewise::prelude::*;

use crate::api::Row;

/// Builds one text line per slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowLines;

impl PagedBuilder<Row> for RowLines {
    type Node = String;

    fn item(&self, _cx: &BuildContext<'_>, items: &[Row], index: usize) -> String {
        let row = &items[index];
        format!("{:>4}  {}", row.id, row.title)
    }

    fn empty(&self, _cx: &BuildContext<'_>) -> String {
        "(no rows)".to_string()
    }

    fn loading(&self, _cx: &BuildContext<'_>) -> String {
        "loading...".to_string()
    }

    fn error(&self, _cx: &BuildContext<'_>, error: &PageError) -> String {
        format!("failed to load: {}", error)
    }

    fn load_more_indicator(&self, _cx: &BuildContext<'_>) -> String {
        "  ...  loading more".to_string()
    }

    fn load_more_error(&self, _cx: &BuildContext<'_>, error: &PageError) -> String {
        format!("  !!   {} (retrying)", error)
    }
}

impl SeparatedBuilder<Row> for RowLines {
    fn separator(&self, cx: &BuildContext<'_>, _index: usize) -> String {
        match cx.scroll.axis {
            Axis::Vertical => String::new(),
            Axis::Horizontal => " | ".to_string(),
        }
    }
}
