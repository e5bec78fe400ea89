/// Board reports
///
/// A report lists a board's tasks in one column per status, in the order of
/// [`TaskStatus::ALL`]. Rows are a positional pivot: row N holds the Nth task
/// (by id) of each column, and shorter columns are padded with empty cells.
///
/// ```text
/// +--------+---------------+--------------+
/// | OPEN   | IN_PROGRESS   | COMPLETE     |
/// |--------+---------------+--------------|
/// |        |               | 1-->X(alice) |
/// +--------+---------------+--------------+
/// ```

use crate::models::task::{AssignedTask, TaskStatus};

/// Cell text for a task: `<id>--><title>(<assignee>)`
pub fn task_label(task: &AssignedTask) -> String {
    format!("{}-->{}({})", task.id, task.title, task.user_name)
}

/// Groups task labels by status column and aligns the columns by position
///
/// `tasks` is expected in id order; that order is kept within each column.
pub fn pivot_by_status(tasks: &[AssignedTask]) -> Vec<[String; 3]> {
    let mut columns: [Vec<String>; 3] = Default::default();
    for task in tasks {
        columns[task.status.column()].push(task_label(task));
    }

    let height = columns.iter().map(Vec::len).max().unwrap_or(0);
    (0..height)
        .map(|row| {
            let mut cells: [String; 3] = Default::default();
            for (cell, column) in cells.iter_mut().zip(columns.iter()) {
                if let Some(label) = column.get(row) {
                    cell.clone_from(label);
                }
            }
            cells
        })
        .collect()
}

/// Renders a plain-text table with psql-style borders
///
/// Each column is as wide as its longest cell, and at least two characters
/// wider than its header. Cells are left-aligned with one space of padding on
/// each side. The output has no trailing newline.
pub fn render_table<const N: usize>(headers: [&str; N], rows: &[[String; N]]) -> String {
    let mut widths = [0usize; N];
    for (i, header) in headers.iter().enumerate() {
        let longest_cell = rows
            .iter()
            .map(|row| row[i].chars().count())
            .max()
            .unwrap_or(0);
        widths[i] = (header.chars().count() + 2).max(longest_cell);
    }

    let rule = |left: char, joint: char, right: char| {
        let segments: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
        format!("{}{}{}", left, segments.join(&joint.to_string()), right)
    };
    let line = |cells: [&str; N]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| {
                let fill = width - cell.chars().count();
                format!(" {}{} ", cell, " ".repeat(fill))
            })
            .collect();
        format!("|{}|", padded.join("|"))
    };

    let mut lines = Vec::with_capacity(rows.len() + 4);
    lines.push(rule('+', '+', '+'));
    lines.push(line(headers));
    lines.push(rule('|', '+', '|'));
    for row in rows {
        lines.push(line(row.each_ref().map(String::as_str)));
    }
    lines.push(rule('+', '+', '+'));

    lines.join("\n")
}

/// Renders the full report for a board's tasks
pub fn render_board(tasks: &[AssignedTask]) -> String {
    render_table(
        TaskStatus::ALL.map(|status| status.as_str()),
        &pivot_by_status(tasks),
    )
}

/// File name of a board's report
pub fn report_file_name(board_id: i64) -> String {
    format!("board_{}.txt", board_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, title: &str, user_name: &str, status: TaskStatus) -> AssignedTask {
        AssignedTask {
            id,
            title: title.to_string(),
            user_name: user_name.to_string(),
            status,
        }
    }

    #[test]
    fn test_task_label() {
        assert_eq!(
            task_label(&task(12, "Write docs", "bob", TaskStatus::Open)),
            "12-->Write docs(bob)"
        );
    }

    #[test]
    fn test_single_completed_task() {
        let report = render_board(&[task(1, "X", "alice", TaskStatus::Complete)]);

        let expected = [
            "+--------+---------------+--------------+",
            "| OPEN   | IN_PROGRESS   | COMPLETE     |",
            "|--------+---------------+--------------|",
            "|        |               | 1-->X(alice) |",
            "+--------+---------------+--------------+",
        ]
        .join("\n");
        assert_eq!(report, expected);
    }

    #[test]
    fn test_pivot_aligns_columns_by_position() {
        let rows = pivot_by_status(&[
            task(1, "a", "u", TaskStatus::Open),
            task(2, "b", "u", TaskStatus::Complete),
            task(3, "c", "u", TaskStatus::Open),
            task(4, "d", "u", TaskStatus::InProgress),
        ]);

        assert_eq!(
            rows,
            vec![
                ["1-->a(u)".to_string(), "4-->d(u)".to_string(), "2-->b(u)".to_string()],
                ["3-->c(u)".to_string(), String::new(), String::new()],
            ]
        );
    }

    #[test]
    fn test_empty_board_renders_header_only() {
        let report = render_board(&[]);

        let expected = [
            "+--------+---------------+------------+",
            "| OPEN   | IN_PROGRESS   | COMPLETE   |",
            "|--------+---------------+------------|",
            "+--------+---------------+------------+",
        ]
        .join("\n");
        assert_eq!(report, expected);
    }

    #[test]
    fn test_width_counts_characters_not_bytes() {
        let table = render_table(["A"], &[["é".to_string()]]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "+-----+");
        assert_eq!(lines[3], "| é   |");
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name(7), "board_7.txt");
    }
}
