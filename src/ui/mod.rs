pub mod viewport;

use crate::document::Path;
use crate::highlight::{annotate_line, StyleClass};
use crate::session::ValidationStatus;
use crate::tree::DisplayNode;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub use viewport::Viewport;

fn class_style(class: StyleClass) -> Style {
    match class {
        StyleClass::Key => Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
        StyleClass::String => Style::default().fg(Color::Green),
        StyleClass::Number => Style::default().fg(Color::Yellow),
        StyleClass::Boolean => Style::default().fg(Color::Magenta),
        StyleClass::Null => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    }
}

pub fn status_style(status: &ValidationStatus) -> Style {
    match status {
        ValidationStatus::Valid => Style::default().fg(Color::Green),
        ValidationStatus::Empty => Style::default().fg(Color::Yellow),
        ValidationStatus::Invalid { .. } => Style::default().fg(Color::Red),
    }
}

/// Renders one line of document text with syntax styling; `selection` is a
/// char-column range within this line to draw reversed.
pub fn styled_json_line(text: &str, selection: Option<(usize, usize)>) -> Line<'static> {
    let chars: Vec<char> = text.chars().collect();
    let mut styles = vec![Style::default(); chars.len()];

    for span in annotate_line(text) {
        let end = (span.start + span.length).min(chars.len());
        for style in &mut styles[span.start..end] {
            *style = class_style(span.class);
        }
    }
    if let Some((start, end)) = selection {
        let end = end.min(chars.len());
        for style in &mut styles[start.min(end)..end] {
            *style = style.add_modifier(Modifier::REVERSED);
        }
    }

    // Merge adjacent chars with identical style into one span.
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();
    for (i, ch) in chars.iter().enumerate() {
        if i > 0 && styles[i] != run_style {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = styles[i];
        run.push(*ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    Line::from(spans)
}

/// One flattened row of the tree pane.
#[derive(Debug, Clone)]
pub struct TreeRow {
    pub depth: usize,
    pub text: String,
    pub path: Path,
    pub is_leaf: bool,
}

/// Depth-first flattening of the display forest into selectable rows.
pub fn flatten_forest(forest: &[DisplayNode]) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    fn walk(nodes: &[DisplayNode], depth: usize, rows: &mut Vec<TreeRow>) {
        for node in nodes {
            let text = match &node.leaf_value_repr {
                Some(repr) => format!("{} {}", node.label, repr),
                None => node.label.clone(),
            };
            rows.push(TreeRow {
                depth,
                text,
                path: node.path.clone(),
                is_leaf: node.is_leaf(),
            });
            walk(&node.children, depth + 1, rows);
        }
    }
    walk(forest, 0, &mut rows);
    rows
}
