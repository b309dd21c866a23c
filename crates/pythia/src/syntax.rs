//! Full-document syntax check.
//!
//! A line scanner that tracks string, bracket, and indentation state and
//! stops at the first failure. Positions are 1-based; `None` means the
//! failure has no usable position.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SyntaxError {
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum SyntaxCheck {
    Valid,
    Invalid(SyntaxError),
}

impl SyntaxCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, SyntaxCheck::Valid)
    }
}

pub fn check_syntax(code: &str) -> SyntaxCheck {
    match scan(code) {
        Ok(()) => SyntaxCheck::Valid,
        Err(error) => SyntaxCheck::Invalid(error),
    }
}

const HEADER_KEYWORDS: &[&str] = &[
    "class", "def", "elif", "else", "except", "finally", "for", "if", "try", "while", "with",
];

struct Bracket {
    open: char,
    line: usize,
    column: usize,
}

/// One statement, possibly spanning physical lines via brackets or a
/// trailing backslash.
struct LogicalLine {
    header: bool,
    saw_colon: bool,
    last_significant: Option<char>,
}

struct Triple {
    quote: char,
    line: usize,
    column: usize,
}

/// Single-quoted string held open by a backslash-escaped newline.
#[derive(Clone, Copy)]
struct OpenString {
    quote: char,
    line: usize,
    column: usize,
}

fn scan(code: &str) -> Result<(), SyntaxError> {
    let mut brackets: Vec<Bracket> = Vec::new();
    let mut triple: Option<Triple> = None;
    let mut open_string: Option<OpenString> = None;
    let mut indents: Vec<usize> = vec![0];
    // Header line whose `:` promised an indented block.
    let mut expect_block: Option<usize> = None;
    let mut logical: Option<LogicalLine> = None;
    let mut continued = false;
    let mut last_lineno = 0usize;

    for (index, line) in code.split('\n').enumerate() {
        let lineno = index + 1;
        last_lineno = lineno;
        let chars: Vec<char> = line.chars().collect();
        let mut i = 0usize;

        // Finish a triple-quoted string opened on an earlier line.
        if let Some(open) = &triple {
            match find_triple_close(&chars, 0, open.quote) {
                Some(after) => {
                    i = after;
                    triple = None;
                }
                None => continue,
            }
        }

        // Finish a single-quoted string continued over an escaped newline.
        if let Some(open) = open_string {
            match find_single_close(&chars, 0, open.quote) {
                SingleClose::After(after) => {
                    i = after;
                    open_string = None;
                }
                SingleClose::Continues => continue,
                SingleClose::LineEnd => {
                    return Err(SyntaxError {
                        line: Some(open.line),
                        column: Some(open.column),
                        message: format!("unterminated string literal (detected at line {lineno})"),
                    });
                }
            }
        }

        let starts_statement = logical.is_none() && !continued;
        continued = false;

        if starts_statement {
            let indent = chars.iter().take_while(|ch| **ch == ' ' || **ch == '\t').count();
            if indent >= chars.len() || chars[indent] == '#' {
                // Blank and comment-only lines carry no indentation meaning.
                continue;
            }
            check_indentation(lineno, indent, &mut indents, &mut expect_block)?;
            let word = leading_word(&chars, indent);
            logical = Some(LogicalLine {
                header: is_header(&word, &chars, indent),
                saw_colon: false,
                last_significant: None,
            });
            i = indent;
        }

        let Some(current) = logical.as_mut() else {
            continue;
        };

        while i < chars.len() {
            let ch = chars[i];
            match ch {
                '#' => {
                    i = chars.len();
                }
                '\'' | '"' => {
                    current.last_significant = Some(ch);
                    if i + 2 < chars.len() && chars[i + 1] == ch && chars[i + 2] == ch {
                        match find_triple_close(&chars, i + 3, ch) {
                            Some(after) => i = after,
                            None => {
                                triple = Some(Triple {
                                    quote: ch,
                                    line: lineno,
                                    column: i + 1,
                                });
                                i = chars.len();
                            }
                        }
                    } else {
                        match find_single_close(&chars, i + 1, ch) {
                            SingleClose::After(after) => i = after,
                            SingleClose::Continues => {
                                open_string = Some(OpenString {
                                    quote: ch,
                                    line: lineno,
                                    column: i + 1,
                                });
                                i = chars.len();
                            }
                            SingleClose::LineEnd => {
                                return Err(SyntaxError {
                                    line: Some(lineno),
                                    column: Some(i + 1),
                                    message: format!(
                                        "unterminated string literal (detected at line {lineno})"
                                    ),
                                });
                            }
                        }
                    }
                }
                '(' | '[' | '{' => {
                    current.last_significant = Some(ch);
                    brackets.push(Bracket {
                        open: ch,
                        line: lineno,
                        column: i + 1,
                    });
                    i += 1;
                }
                ')' | ']' | '}' => {
                    current.last_significant = Some(ch);
                    match brackets.pop() {
                        Some(bracket) if matching_close(bracket.open) == ch => {}
                        Some(bracket) => {
                            return Err(SyntaxError {
                                line: Some(lineno),
                                column: Some(i + 1),
                                message: format!(
                                    "closing parenthesis '{ch}' does not match opening parenthesis '{}'",
                                    bracket.open
                                ),
                            });
                        }
                        None => {
                            return Err(SyntaxError {
                                line: Some(lineno),
                                column: Some(i + 1),
                                message: format!("unmatched '{ch}'"),
                            });
                        }
                    }
                    i += 1;
                }
                ':' => {
                    if brackets.is_empty() {
                        current.saw_colon = true;
                    }
                    current.last_significant = Some(ch);
                    i += 1;
                }
                '\\' if i + 1 == chars.len() => {
                    continued = true;
                    i += 1;
                }
                _ => {
                    if !ch.is_whitespace() {
                        current.last_significant = Some(ch);
                    }
                    i += 1;
                }
            }
        }

        if triple.is_some() || open_string.is_some() || continued || !brackets.is_empty() {
            continue;
        }

        finish_logical(lineno, chars.len(), &mut logical, &mut expect_block)?;
    }

    if let Some(open) = triple {
        return Err(SyntaxError {
            line: Some(open.line),
            column: Some(open.column),
            message: format!("unterminated triple-quoted string literal (detected at line {last_lineno})"),
        });
    }
    if let Some(open) = open_string {
        return Err(SyntaxError {
            line: Some(open.line),
            column: Some(open.column),
            message: format!("unterminated string literal (detected at line {last_lineno})"),
        });
    }
    if let Some(bracket) = brackets.first() {
        return Err(SyntaxError {
            line: Some(bracket.line),
            column: Some(bracket.column),
            message: format!("'{}' was never closed", bracket.open),
        });
    }
    if let Some(header_line) = expect_block {
        return Err(SyntaxError {
            line: Some(last_lineno),
            column: None,
            message: format!("expected an indented block after line {header_line}"),
        });
    }
    Ok(())
}

fn finish_logical(
    lineno: usize,
    line_len: usize,
    logical: &mut Option<LogicalLine>,
    expect_block: &mut Option<usize>,
) -> Result<(), SyntaxError> {
    let Some(current) = logical.take() else {
        return Ok(());
    };
    if current.header && !current.saw_colon {
        return Err(SyntaxError {
            line: Some(lineno),
            column: Some(line_len + 1),
            message: "expected ':'".to_string(),
        });
    }
    if current.header && current.last_significant == Some(':') {
        *expect_block = Some(lineno);
    }
    Ok(())
}

fn check_indentation(
    lineno: usize,
    indent: usize,
    indents: &mut Vec<usize>,
    expect_block: &mut Option<usize>,
) -> Result<(), SyntaxError> {
    let top = indents.last().copied().unwrap_or(0);
    if let Some(header_line) = expect_block.take() {
        if indent <= top {
            return Err(SyntaxError {
                line: Some(lineno),
                column: Some(indent + 1),
                message: format!("expected an indented block after line {header_line}"),
            });
        }
        indents.push(indent);
        return Ok(());
    }
    if indent > top {
        return Err(SyntaxError {
            line: Some(lineno),
            column: Some(indent + 1),
            message: "unexpected indent".to_string(),
        });
    }
    while indents.len() > 1 && indent < indents.last().copied().unwrap_or(0) {
        indents.pop();
    }
    if indent != indents.last().copied().unwrap_or(0) {
        return Err(SyntaxError {
            line: Some(lineno),
            column: Some(indent + 1),
            message: "unindent does not match any outer indentation level".to_string(),
        });
    }
    Ok(())
}

fn leading_word(chars: &[char], start: usize) -> String {
    chars[start..]
        .iter()
        .take_while(|ch| ch.is_alphanumeric() || **ch == '_')
        .collect()
}

fn is_header(word: &str, chars: &[char], indent: usize) -> bool {
    if HEADER_KEYWORDS.contains(&word) {
        return true;
    }
    if word == "async" {
        let rest = indent + word.len();
        let next_start = rest
            + chars[rest..]
                .iter()
                .take_while(|ch| **ch == ' ' || **ch == '\t')
                .count();
        let next = leading_word(chars, next_start.min(chars.len()));
        return matches!(next.as_str(), "def" | "for" | "with");
    }
    false
}

fn matching_close(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

/// How scanning a single-quoted string ended on this line.
enum SingleClose {
    /// Index just past the closing quote.
    After(usize),
    /// A trailing backslash escapes the newline; the string goes on.
    Continues,
    /// The line ran out with the string still open.
    LineEnd,
}

fn find_single_close(chars: &[char], start: usize, quote: char) -> SingleClose {
    let mut i = start;
    while i < chars.len() {
        if chars[i] == '\\' {
            if i + 1 == chars.len() {
                return SingleClose::Continues;
            }
            i += 2;
            continue;
        }
        if chars[i] == quote {
            return SingleClose::After(i + 1);
        }
        i += 1;
    }
    SingleClose::LineEnd
}

/// Index just past the closing `"""`/`'''`, or None when it is not on
/// this line. Backslash escapes apply inside triple quotes too.
fn find_triple_close(chars: &[char], start: usize, quote: char) -> Option<usize> {
    let mut i = start;
    while i < chars.len() {
        if chars[i] == '\\' {
            i += 2;
            continue;
        }
        if chars[i] == quote && chars.get(i + 1) == Some(&quote) && chars.get(i + 2) == Some(&quote)
        {
            return Some(i + 3);
        }
        i += 1;
    }
    None
}
