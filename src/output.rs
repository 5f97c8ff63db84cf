//! Writing highlighted lines out
//!
//! ANSI escape sequences for terminals, or JSON for other tools.

use std::io::{self, Write};

use crate::syntax::{StyleTable, TextFormat, TokenSpan};

const RESET: &str = "\x1b[0m";

/// Escape sequence selecting `format`
pub fn ansi_prefix(format: &TextFormat) -> String {
    let mut codes = Vec::new();
    if format.bold {
        codes.push("1".to_string());
    }
    if format.italic {
        codes.push("3".to_string());
    }
    if let Some(color) = format.foreground {
        codes.push(format!("38;2;{};{};{}", color.r, color.g, color.b));
    }

    if codes.is_empty() {
        String::new()
    } else {
        format!("\x1b[{}m", codes.join(";"))
    }
}

/// Write lines of spans as ANSI colored text, one output line per line
pub fn write_ansi<W: Write>(
    out: &mut W,
    lines: impl IntoIterator<Item = Vec<TokenSpan>>,
    styles: &StyleTable,
) -> io::Result<()> {
    for spans in lines {
        for span in &spans {
            match styles.resolve_format(&span.category) {
                Some(format) => {
                    let prefix = ansi_prefix(&format);
                    if prefix.is_empty() {
                        write!(out, "{}", span.text)?;
                    } else {
                        write!(out, "{}{}{}", prefix, span.text, RESET)?;
                    }
                }
                None => write!(out, "{}", span.text)?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Write lines of spans as a pretty-printed JSON array
pub fn write_json<W: Write>(out: &mut W, lines: &[Vec<TokenSpan>]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, lines)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Category, StyleEntry};
    use crate::theme::Color;

    #[test]
    fn test_ansi_prefix() {
        let format = TextFormat {
            foreground: Some(Color::rgb(1, 2, 3)),
            bold: true,
            italic: false,
        };
        assert_eq!(ansi_prefix(&format), "\x1b[1;38;2;1;2;3m");
        assert_eq!(ansi_prefix(&TextFormat::default()), "");
    }

    #[test]
    fn test_write_ansi_passes_unstyled_text_through() {
        let mut styles = StyleTable::new();
        styles.insert(
            &Category::KEYWORD,
            StyleEntry {
                format: Some(TextFormat {
                    italic: true,
                    ..TextFormat::default()
                }),
                overrides: Vec::new(),
            },
        );

        let lines = vec![vec![
            TokenSpan::new(Category::KEYWORD, "pass", 0),
            TokenSpan::new(Category::TEXT, " ", 4),
        ]];
        let mut out = Vec::new();
        write_ansi(&mut out, lines, &styles).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\x1b[3mpass\x1b[0m \n");
    }

    #[test]
    fn test_write_json() {
        let lines = vec![vec![TokenSpan::new(Category::NAME_CLASS, "Foo", 6)], vec![]];
        let mut out = Vec::new();
        write_json(&mut out, &lines).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0][0]["category"], "Name.Class");
        assert_eq!(value[0][0]["text"], "Foo");
        assert_eq!(value[0][0]["start"], 6);
        assert_eq!(value[1].as_array().unwrap().len(), 0);
    }
}
