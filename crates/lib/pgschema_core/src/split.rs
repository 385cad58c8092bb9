//! SQL script splitting.
//!
//! Turns a schema script into standalone statements. Semicolons inside
//! PostgreSQL dollar-quoted literals (`$$ ... $$`, `$body$ ... $body$`) are
//! kept as text so function bodies survive intact.
//!
//! Splitting is purely lexical: single quotes, double quotes and comments are
//! not tracked, and nothing is validated.

/// How a script is cut into statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SplitMode {
    /// Split on every `;`, ignoring quoting entirely.
    Naive,
    /// Split on `;` outside dollar-quoted regions.
    #[default]
    DollarQuoted,
}

impl SplitMode {
    /// Split `script` using this mode.
    pub fn split(self, script: &str) -> Vec<&str> {
        match self {
            SplitMode::Naive => split_naive(script),
            SplitMode::DollarQuoted => split_statements(script),
        }
    }
}

#[derive(Clone, Copy)]
enum State<'a> {
    Normal,
    InDollarQuote(&'a str),
}

/// Split a script into statements, respecting dollar-quoted regions.
///
/// Returned statements borrow from `script`, appear in source order, carry no
/// trailing `;` and are trimmed. Empty statements are dropped. A final
/// statement without a terminating `;` is kept.
///
/// A region opened by a tag is only closed by the identical tag. A different
/// tag seen inside a region is plain text; regions do not nest.
pub fn split_statements(script: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut state = State::Normal;
    let mut start = 0;
    let mut pos = 0;

    while let Some(ch) = script[pos..].chars().next() {
        match (state, ch) {
            (_, '$') => {
                if let Some(tag) = dollar_tag(&script[pos..]) {
                    match state {
                        State::Normal => {
                            state = State::InDollarQuote(tag);
                            pos += tag.len();
                            continue;
                        }
                        State::InDollarQuote(open) if open == tag => {
                            state = State::Normal;
                            pos += tag.len();
                            continue;
                        }
                        // Mismatched tag: only the `$` is consumed as text.
                        State::InDollarQuote(_) => {}
                    }
                }
            }
            (State::Normal, ';') => {
                push_statement(&mut statements, &script[start..=pos]);
                start = pos + 1;
            }
            _ => {}
        }
        pos += ch.len_utf8();
    }

    push_statement(&mut statements, &script[start..]);
    statements
}

/// Split on every `;` with no awareness of quoting.
pub fn split_naive(script: &str) -> Vec<&str> {
    script
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Recognise a dollar-quote tag at the start of `rest`.
///
/// `rest` must begin with `$`. Returns the whole tag including both `$`
/// delimiters, or `None` when the `$` does not start a tag.
fn dollar_tag(rest: &str) -> Option<&str> {
    let body = &rest[1..];
    let len = body
        .find(|c: char| !c.is_alphanumeric())
        .unwrap_or(body.len());
    body[len..].starts_with('$').then(|| &rest[..len + 2])
}

fn push_statement<'a>(statements: &mut Vec<&'a str>, chunk: &'a str) {
    let chunk = chunk.trim();
    let chunk = chunk.strip_suffix(';').unwrap_or(chunk).trim();
    if !chunk.is_empty() {
        statements.push(chunk);
    }
}
