use std::io::{BufRead, Write};

use rusqlite::types::ValueRef;
use rusqlite::Statement;

use crate::consts::DEFAULT_PAGE_SIZE;
use crate::error::Result;

/// Render rows as a bordered grid table.
pub fn format_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(cols) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let border = |fill: char| {
        let mut line = String::from("+");
        for w in &widths {
            line.extend(std::iter::repeat(fill).take(w + 2));
            line.push('+');
        }
        line.push('\n');
        line
    };
    let render_row = |cells: &[String]| {
        let mut line = String::from("|");
        for (i, w) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            line.push(' ');
            line.push_str(cell);
            line.extend(std::iter::repeat(' ').take(w - cell.chars().count() + 1));
            line.push('|');
        }
        line.push('\n');
        line
    };

    let mut out = border('-');
    out.push_str(&render_row(headers));
    out.push_str(&border('='));
    for row in rows {
        out.push_str(&render_row(row));
        out.push_str(&border('-'));
    }
    out
}

/// Page query output to stdout in tabular format, pausing for Enter
/// between pages.
pub fn paging(stmt: &mut Statement<'_>, page_size: Option<usize>) -> Result<()> {
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let headers: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let cols = headers.len();

    let stdout = std::io::stdout();
    let stdin = std::io::stdin();
    let mut rows = stmt.query([])?;
    loop {
        let mut page: Vec<Vec<String>> = Vec::with_capacity(page_size);
        while page.len() < page_size {
            match rows.next()? {
                Some(row) => {
                    let mut cells = Vec::with_capacity(cols);
                    for i in 0..cols {
                        cells.push(format_value(row.get_ref(i)?));
                    }
                    page.push(cells);
                }
                None => break,
            }
        }
        let exhausted = page.len() < page_size;
        {
            let mut out = stdout.lock();
            out.write_all(format_table(&headers, &page).as_bytes())?;
        }
        if exhausted {
            break;
        }
        print!("Press Enter to continue [Ctrl-C to abort] ...");
        stdout.lock().flush()?;
        let mut discard = String::new();
        stdin.lock().read_line(&mut discard)?;
    }
    Ok(())
}

fn format_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<{} byte blob>", b.len()),
    }
}
