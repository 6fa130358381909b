//! `cba compare`: the side-by-side table.

use anyhow::Result;

use cba_core::api::IndicatorApi;
use cba_core::route::CompareParams;
use cba_core::views::compare::{self, Cell, CompareView, EMPTY_STATE};

use crate::render::{self, OutputFormat};

const LABEL_WIDTH: usize = 18;
const COLUMN_WIDTH: usize = 26;

fn wrap_cell(text: &str) -> Vec<String> {
    let wrapped = render::wrap(text, COLUMN_WIDTH, "");
    if wrapped.is_empty() {
        vec![String::new()]
    } else {
        wrapped.lines().map(str::to_string).collect()
    }
}

fn paint_cell(cell: &Cell, padded: String) -> String {
    match cell.tone {
        Some(tone) => render::paint(&padded, tone),
        None => padded,
    }
}

pub fn format_compare(view: &CompareView) -> String {
    let mut out = String::from("Compare Indicators\n");
    if view.is_empty_state() {
        out.push_str(EMPTY_STATE);
        out.push('\n');
        out.push_str(&format!("Back to Results: {}\n", view.back_route()));
        return out;
    }

    out.push_str(&view.header());
    if view.is_demo() {
        out.push_str(" (demo data)");
    }
    out.push_str("\n\n");

    out.push_str(&format!("{:<w$}", "", w = LABEL_WIDTH));
    for entry in view.entries() {
        let name: String = entry.name.chars().take(COLUMN_WIDTH).collect();
        out.push_str(&format!(" | {:<w$}", name, w = COLUMN_WIDTH));
    }
    out.push('\n');
    let rule = "-".repeat(LABEL_WIDTH + view.entries().len() * (COLUMN_WIDTH + 3));
    out.push_str(&rule);
    out.push('\n');

    for row in view.rows() {
        let wrapped: Vec<Vec<String>> = row.cells.iter().map(|c| wrap_cell(&c.text)).collect();
        let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);
        for line in 0..height {
            let label = if line == 0 { row.label } else { "" };
            let mut buf = format!("{:<w$}", label, w = LABEL_WIDTH);
            for (cell, lines) in row.cells.iter().zip(&wrapped) {
                let text = lines.get(line).map(String::as_str).unwrap_or("");
                let padded = format!("{:<w$}", text, w = COLUMN_WIDTH);
                buf.push_str(" | ");
                buf.push_str(&paint_cell(cell, padded));
            }
            out.push_str(buf.trim_end());
            out.push('\n');
        }
    }

    out.push('\n');
    for entry in view.entries() {
        out.push_str(&format!("remove {}: {}\n", entry.id, view.remove_route(entry.id)));
    }
    out.push_str(&format!("Back to Results: {}\n", view.back_route()));
    out
}

/// CLI entry point for `cba compare`.
pub async fn run_compare(
    api: &dyn IndicatorApi,
    params: &CompareParams,
    format: OutputFormat,
) -> Result<()> {
    let view = compare::resolve(params, api).await;
    if let Some(err) = view.error() {
        render::banner(err);
    }
    match format {
        OutputFormat::Json => render::print_json(&view)?,
        OutputFormat::Text => print!("{}", format_compare(&view)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cba_core::route::parse_ids;

    fn view(ids: &str) -> CompareView {
        CompareView::from_params(&CompareParams {
            ids: parse_ids(ids),
            session_id: None,
        })
    }

    #[test]
    fn table_has_every_row_and_column() {
        let text = format_compare(&view("47,89"));
        assert!(text.contains("2 indicators selected (demo data)"));
        assert!(text.contains("Species Diversity Index"));
        assert!(text.contains("Soil Organic Carbon"));
        for kind in compare::RowKind::ALL {
            assert!(text.contains(kind.label()), "missing row {}", kind.label());
        }
        assert!(text.contains("3 methods"));
        assert!(text.contains("remove 47: /results?ids=47,89&remove=47"));
    }

    #[test]
    fn empty_selection_is_explicit() {
        let text = format_compare(&view("abc,"));
        assert!(text.contains(EMPTY_STATE));
        assert!(text.contains("Back to Results: /results"));
        assert!(!text.contains("Component"));
    }
}
