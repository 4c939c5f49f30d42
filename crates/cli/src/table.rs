// SPDX-License-Identifier: MIT

//! A small column-aligned table renderer for `list` commands' text output.

pub enum Align {
    Left,
    Right,
}

pub struct Column {
    pub name: &'static str,
    pub align: Align,
}

impl Column {
    pub fn left(name: &'static str) -> Self {
        Self { name, align: Align::Left }
    }

    pub fn right(name: &'static str) -> Self {
        Self { name, align: Align::Right }
    }
}

/// Prints `columns` as a header row followed by `rows`, each cell padded to
/// the widest value (header included) in its column.
pub fn print(columns: &[Column], rows: &[Vec<String>]) {
    if rows.is_empty() {
        println!("(none)");
        return;
    }

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| rows.iter().map(|r| r[i].len()).max().unwrap_or(0).max(col.name.len()))
        .collect();

    let header: Vec<String> = columns.iter().zip(&widths).map(|(c, w)| pad(c.name, *w, &c.align)).collect();
    println!("{}", header.join("  "));

    for row in rows {
        let cells: Vec<String> = row.iter().zip(columns).zip(&widths).map(|((v, c), w)| pad(v, *w, &c.align)).collect();
        println!("{}", cells.join("  "));
    }
}

fn pad(text: &str, width: usize, align: &Align) -> String {
    match align {
        Align::Left => format!("{text:<width$}"),
        Align::Right => format!("{text:>width$}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_pads_on_the_right() {
        assert_eq!(pad("id", 5, &Align::Left), "id   ");
    }

    #[test]
    fn right_pads_on_the_left() {
        assert_eq!(pad("42", 5, &Align::Right), "   42");
    }

    #[test]
    fn exact_width_is_unchanged() {
        assert_eq!(pad("exact", 5, &Align::Left), "exact");
    }
}
