//! Project-wide `#macro` handling: extract, insert, clean.
//!
//! Three pure passes over token streams. `extract` harvests definitions,
//! `insert` substitutes uses, `clean` strips newline markers and definition
//! spans so the parser sees neither. Macros are global to the project: the
//! pipeline merges every script's table before any insertion happens, so a
//! use in one file may refer to a definition in another.
//!
//! Definition spans are re-measured structurally by each pass rather than
//! looked up, so a definition that lost a name collision during the merge is
//! still protected from expansion and still excised by `clean`.

use std::collections::HashMap;

use crate::token::{Token, TokenKind};

/// A single `#macro` definition.
#[derive(Debug, Clone)]
pub struct Macro {
    pub name: String,
    /// Configuration tag from the `#macro Config:NAME body` form.
    pub config: Option<String>,
    /// Body tokens with newline and continuation markers stripped.
    pub body: Vec<Token>,
    /// Token count of the whole definition span in the original stream,
    /// from the `#` through the last body token (terminator excluded).
    pub raw_len: usize,
}

pub type MacroTable = HashMap<String, Macro>;

/// A definition span located in a token stream.
struct DefSpan {
    name_index: usize,
    config_index: Option<usize>,
    body: Vec<Token>,
    raw_len: usize,
}

/// Measure a `#macro` definition starting at `start`, or `None` if the
/// tokens there do not form one. Malformed directives are left in the
/// stream for the parser to reject.
fn definition_span(tokens: &[Token], start: usize) -> Option<DefSpan> {
    if tokens.get(start)?.kind != TokenKind::Hash {
        return None;
    }
    if !tokens.get(start + 1)?.is_ident("macro") {
        return None;
    }

    // `#macro NAME …` or `#macro CONFIG : NAME …`.
    let (name_index, config_index) = if tokens.get(start + 2)?.kind == TokenKind::Ident
        && tokens.get(start + 3).map(|t| t.kind) == Some(TokenKind::Colon)
        && tokens.get(start + 4).map(|t| t.kind) == Some(TokenKind::Ident)
    {
        (start + 4, Some(start + 2))
    } else if tokens.get(start + 2)?.kind == TokenKind::Ident {
        (start + 2, None)
    } else {
        return None;
    };

    let mut body = Vec::new();
    let mut i = name_index + 1;
    loop {
        match tokens.get(i).map(|t| t.kind) {
            None | Some(TokenKind::End) | Some(TokenKind::Newline) => break,
            Some(TokenKind::Backslash)
                if tokens.get(i + 1).map(|t| t.kind) == Some(TokenKind::Newline) =>
            {
                // Line continuation: both markers counted, neither kept.
                i += 2;
            }
            _ => {
                body.push(tokens[i].clone());
                i += 1;
            }
        }
    }

    Some(DefSpan {
        name_index,
        config_index,
        body,
        raw_len: i - start,
    })
}

/// Harvest every `#macro` definition in the stream. Later definitions of
/// the same name overwrite earlier ones.
pub fn extract_macros(tokens: &[Token]) -> MacroTable {
    let mut table = MacroTable::new();
    let mut i = 0;
    while i < tokens.len() {
        match definition_span(tokens, i) {
            Some(span) => {
                let name = tokens[span.name_index].value.clone();
                table.insert(
                    name.clone(),
                    Macro {
                        name,
                        config: span.config_index.map(|c| tokens[c].value.clone()),
                        body: span.body,
                        raw_len: span.raw_len,
                    },
                );
                i += span.raw_len;
            }
            None => i += 1,
        }
    }
    table
}

/// Replace every identifier use of a known macro with its body tokens.
///
/// Definition spans are copied through verbatim (clean excises them later)
/// and their name tokens are never expanded. Substitution is one linear
/// pass: a body naming another macro is spliced as-is, so cyclic references
/// surface as unexpanded identifiers instead of infinite expansion.
pub fn insert_macros(tokens: Vec<Token>, table: &MacroTable) -> Vec<Token> {
    if table.is_empty() {
        return tokens;
    }

    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if let Some(span) = definition_span(&tokens, i) {
            out.extend_from_slice(&tokens[i..i + span.raw_len]);
            i += span.raw_len;
            continue;
        }

        let t = &tokens[i];
        if t.kind == TokenKind::Ident {
            if let Some(mac) = table.get(&t.value) {
                out.extend(mac.body.iter().cloned());
                i += 1;
                continue;
            }
        }
        out.push(t.clone());
        i += 1;
    }
    out
}

/// Strip newline markers and macro-definition spans.
///
/// On a well-formed stream no `Newline`, `Hash`, or `Backslash` token
/// remains afterwards. A `Hash` or `Backslash` outside a definition span
/// belongs to a malformed directive; it is left in place for the parser to
/// reject.
pub fn clean_tokens(tokens: Vec<Token>, _table: &MacroTable) -> Vec<Token> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        if let Some(span) = definition_span(&tokens, i) {
            i += span.raw_len;
            continue;
        }
        if tokens[i].kind == TokenKind::Newline {
            i += 1;
            continue;
        }
        out.push(tokens[i].clone());
        i += 1;
    }
    out
}

/// Merge per-script tables into one project table. Later tables win on
/// name collisions, matching the order the pipeline visits resources.
pub fn merge_macros<I>(tables: I) -> MacroTable
where
    I: IntoIterator<Item = MacroTable>,
{
    let mut merged = MacroTable::new();
    for table in tables {
        merged.extend(table);
    }
    merged
}
