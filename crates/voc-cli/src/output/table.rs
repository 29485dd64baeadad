//! Plain aligned tables for terminal output.
//!
//! Cells are measured in chars. Overlong cells keep their tail, since the
//! interesting part of a dataset path or digest prefix is rarely the start
//! of a path.

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const MIN_WIDTH: usize = 6;
const GAP: &str = "  ";

/// Render `rows` under `headers`, one line per row plus a divider.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths = column_widths(headers, rows);
    shrink_to_fit(&mut widths, options.max_width);

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(&clip(header, *width), *width, false))
        .collect::<Vec<_>>()
        .join(GAP);
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line);
    lines.push(divider);
    for row in rows {
        let cells = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let value = row.get(index).map_or("-", String::as_str);
                let clipped = clip(value, *width);
                let padded = pad(&clipped, *width, is_count(&clipped));
                if options.color {
                    colorize(&clipped, padded)
                } else {
                    padded
                }
            })
            .collect::<Vec<_>>();
        lines.push(cells.join(GAP).trim_end().to_string());
    }
    lines.join("\n")
}

fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
                .max(MIN_WIDTH)
        })
        .collect()
}

/// Narrow the widest column one char at a time until the table fits.
fn shrink_to_fit(widths: &mut [usize], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };
    let gaps = widths.len().saturating_sub(1) * GAP.len();

    while widths.iter().sum::<usize>() + gaps > max_width {
        let Some((index, _)) = widths
            .iter()
            .enumerate()
            .filter(|(_, width)| **width > MIN_WIDTH)
            .max_by_key(|(_, width)| **width)
        else {
            break;
        };
        widths[index] -= 1;
    }
}

fn clip(value: &str, width: usize) -> String {
    let count = value.chars().count();
    if count <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }
    let tail = value.chars().skip(count - (width - 1)).collect::<String>();
    format!("…{tail}")
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    if right_align {
        format!("{value:>width$}")
    } else {
        format!("{value:<width$}")
    }
}

fn is_count(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|ch| ch.is_ascii_digit())
}

/// Wrap freshness words in ANSI color; `padded` keeps its alignment.
fn colorize(plain: &str, padded: String) -> String {
    let code = match plain {
        "up_to_date" | "true" | "ran" => "32",
        "changed" | "incomplete" | "no_previous" | "output_missing" | "skipped" => "33",
        "false" | "drift" => "31",
        _ => return padded,
    };
    format!("\u{1b}[{code}m{padded}\u{1b}[0m")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[test]
    fn columns_align_to_widest_cell() {
        let rows = vec![
            vec!["frames".to_string(), "up_to_date".to_string()],
            vec!["merged/voc2012".to_string(), "changed".to_string()],
        ];
        let table = render_table(&["dataset", "freshness"], &rows, PLAIN);
        let lines = table.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2].find("up_to_date"), lines[3].find("changed"));
    }

    #[test]
    fn long_cells_keep_their_tail() {
        assert_eq!(clip("/data/voc/merged", 8), "…/merged");
        assert_eq!(clip("short", 8), "short");
    }

    #[test]
    fn narrow_terminal_shrinks_widest_column() {
        let rows = vec![vec![
            "a".repeat(60),
            "up_to_date".to_string(),
        ]];
        let options = TableOptions {
            max_width: Some(40),
            color: false,
        };
        let table = render_table(&["path", "freshness"], &rows, options);

        assert!(table.lines().all(|line| line.chars().count() <= 40));
        assert!(table.contains('…'));
    }

    #[test]
    fn counts_are_right_aligned() {
        let rows = vec![vec!["12".to_string()]];
        let table = render_table(&["annotations"], &rows, PLAIN);
        assert!(table.lines().nth(2).is_some_and(|line| line.ends_with("12")));
        assert!(table.lines().nth(2).is_some_and(|line| line.starts_with(' ')));
    }

    #[test]
    fn color_wraps_freshness_words_only() {
        assert!(colorize("changed", "changed ".into()).starts_with("\u{1b}[33m"));
        assert_eq!(colorize("frames", "frames".into()), "frames");
    }
}
