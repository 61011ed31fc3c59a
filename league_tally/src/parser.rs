//! Recovery-oriented parser for the delimited text tables.
//!
//! The exports produced by the league service are mostly well-formed CSV,
//! with the occasional oddity (unbalanced quotes, trailing blank lines,
//! missing final newline). The parser never fails: it toggles the quoting
//! state per quote character encountered and flushes whatever it has at the
//! end of the text.

/// Splits raw text into rows of string fields.
///
/// Rules:
/// * fields are separated by commas, rows by `\n`;
/// * `\r` is discarded unconditionally, even inside quotes;
/// * a double quote toggles the quoting state, except that `""` inside a
///   quoted field yields a literal `"` (the lookahead check is applied
///   before toggling);
/// * commas and newlines inside quotes are field content;
/// * a field that never saw a quote is trimmed of surrounding whitespace,
///   a quoted field is kept verbatim;
/// * a row whose fields are all empty after trimming is dropped, which
///   silently absorbs trailing blank lines;
/// * the final row is flushed even without a trailing terminator, and an
///   unterminated quoted field still closes and is appended.
///
/// There is no header handling here. Callers treat row 0 as the header.
pub fn parse_delimited(text: &str) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut f = FieldAccumulator::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    // Doubled quote: a literal quote character.
                    f.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                    f.saw_quote();
                }
            }
            ',' if !in_quotes => {
                row.push(f.finish());
            }
            '\n' if !in_quotes => {
                row.push(f.finish());
                flush_row(&mut rows, &mut row);
            }
            '\r' => {
                // Carriage returns are never meaningful.
            }
            _ => f.push(c),
        }
    }

    // Final field and row, with or without a trailing terminator.
    if !f.is_empty() || !row.is_empty() {
        row.push(f.finish());
        flush_row(&mut rows, &mut row);
    }
    rows
}

fn flush_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>) {
    if row.iter().any(|f| !f.is_empty()) {
        rows.push(std::mem::take(row));
    } else {
        row.clear();
    }
}

struct FieldAccumulator {
    content: String,
    quoted: bool,
}

impl FieldAccumulator {
    fn new() -> FieldAccumulator {
        FieldAccumulator {
            content: String::new(),
            quoted: false,
        }
    }

    fn push(&mut self, c: char) {
        self.content.push(c);
    }

    fn saw_quote(&mut self) {
        self.quoted = true;
    }

    fn is_empty(&self) -> bool {
        self.content.is_empty() && !self.quoted
    }

    /// Returns the accumulated field and resets the accumulator.
    fn finish(&mut self) -> String {
        let raw = std::mem::take(&mut self.content);
        let res = if self.quoted {
            raw
        } else {
            raw.trim().to_string()
        };
        self.quoted = false;
        res
    }
}
