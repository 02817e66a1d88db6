//! Plain-text layout for tables and panels
//!
//! Everything here returns strings so the layout can be tested without a
//! terminal; colouring happens in the console.

use elo_core::{Incident, Neighborhood, User};

/// A row type that can be shown as a table
pub trait Tabular {
    fn headers() -> Vec<&'static str>;
    fn cells(&self) -> Vec<String>;
}

impl Tabular for User {
    fn headers() -> Vec<&'static str> {
        vec!["id", "name", "role", "email"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.role.clone(),
            self.email.clone(),
        ]
    }
}

impl Tabular for Neighborhood {
    fn headers() -> Vec<&'static str> {
        vec!["id", "name", "risk_area_ratio", "population_density"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.risk_area_ratio.to_string(),
            self.population_density.to_string(),
        ]
    }
}

impl Tabular for Incident {
    fn headers() -> Vec<&'static str> {
        vec![
            "id",
            "title",
            "description",
            "category",
            "date",
            "status",
            "location",
            "user_id",
            "neighborhood_id",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.description.clone(),
            self.category.clone(),
            self.date.clone(),
            self.status.clone(),
            self.location.clone(),
            self.user_id.to_string(),
            self.neighborhood_id.to_string(),
        ]
    }
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, to: usize) -> String {
    format!("{}{}", s, " ".repeat(to.saturating_sub(width(s))))
}

fn border(widths: &[usize], left: char, fill: char, join: char, right: char) -> String {
    let segments: Vec<String> = widths
        .iter()
        .map(|w| fill.to_string().repeat(w + 2))
        .collect();
    format!("{}{}{}", left, segments.join(&join.to_string()), right)
}

fn line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!(" {} ", pad(cell, *w)))
        .collect();
    format!("│{}│", padded.join("│"))
}

/// Box-drawn grid with a double rule under the header
pub fn render_table<T: Tabular>(rows: &[T]) -> String {
    let headers: Vec<String> = T::headers().into_iter().map(String::from).collect();
    let body: Vec<Vec<String>> = rows.iter().map(|row| row.cells()).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| width(h)).collect();
    for row in &body {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(width(cell));
        }
    }

    let mut out = vec![
        border(&widths, '╒', '═', '╤', '╕'),
        line(&headers, &widths),
        border(&widths, '╞', '═', '╪', '╡'),
    ];
    for (i, row) in body.iter().enumerate() {
        if i > 0 {
            out.push(border(&widths, '├', '─', '┼', '┤'));
        }
        out.push(line(row, &widths));
    }
    out.push(border(&widths, '╘', '═', '╧', '╛'));
    out.join("\n")
}

/// Rounded box with the title set into the top edge
pub fn render_panel(title: &str, text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let inner = lines
        .iter()
        .map(|l| width(l))
        .chain(std::iter::once(width(title) + 2))
        .max()
        .unwrap_or(0)
        + 2;

    let label = format!(" {} ", title);
    let left = (inner - width(&label)) / 2;
    let right = inner - width(&label) - left;

    let mut out = vec![format!("╭{}{}{}╮", "─".repeat(left), label, "─".repeat(right))];
    for l in lines {
        out.push(format!("│ {} │", pad(l, inner - 2)));
    }
    out.push(format!("╰{}╯", "─".repeat(inner)));
    out
}

/// Horizontal rule with a centred title
pub fn render_rule(title: &str, total: usize) -> String {
    if title.is_empty() {
        return "─".repeat(total);
    }
    let label = format!(" {} ", title);
    let rest = total.saturating_sub(width(&label));
    format!("{}{}{}", "─".repeat(rest / 2), label, "─".repeat(rest - rest / 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_layout() {
        let users = vec![
            User {
                id: 1,
                name: "Ana".to_string(),
                role: "ong".to_string(),
                email: "a@b.org".to_string(),
            },
            User {
                id: 12,
                name: "João".to_string(),
                role: "admin".to_string(),
                email: "j@c.org".to_string(),
            },
        ];

        let table = render_table(&users);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "╒════╤══════╤═══════╤═════════╕");
        assert_eq!(lines[1], "│ id │ name │ role  │ email   │");
        assert_eq!(lines[3], "│ 1  │ Ana  │ ong   │ a@b.org │");
        assert_eq!(lines[5], "│ 12 │ João │ admin │ j@c.org │");
        assert!(lines.iter().all(|l| width(l) == width(lines[0])));
    }

    #[test]
    fn test_panel_fits_content() {
        let panel = render_panel("ELO", "Welcome to ELO!");
        assert_eq!(panel.len(), 3);
        assert!(panel[0].contains(" ELO "));
        assert_eq!(panel[1], "│ Welcome to ELO! │");
        assert!(panel.iter().all(|l| width(l) == width(&panel[1])));
    }

    #[test]
    fn test_rule_width() {
        assert_eq!(width(&render_rule("Main menu", 40)), 40);
        assert_eq!(render_rule("", 3), "───");
    }
}
