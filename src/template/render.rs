//! Token substitution for live preview and final output.
//!
//! Content is scanned once into literal and token segments. Rendering walks
//! the segments and looks each token up in the form values, so the cost per
//! keystroke is one pass over the template regardless of how many variables
//! it declares. Substituted values are copied verbatim and never re-scanned.

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::session::FormValues;

/// Filler used by printable blank forms.
pub const BLANK_FILLER: &str = "___________";

lazy_static! {
    static ref PLACEHOLDER_PATTERN: Regex = Regex::new(r"\[[\w_]+\]").unwrap();
}

/// What an empty or missing value turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// `[name]`, so the user sees which fields are still blank
    #[default]
    Preview,
    /// Empty string, nothing leaks into the delivered document
    Final,
    /// Underscore line for hand-filled printouts
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(Range<usize>),
    Token { name: Range<usize> },
}

/// Template content pre-scanned into segments.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    source: String,
    segments: Vec<Segment>,
}

/// Output of a render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Rendered {
    pub content: String,
    /// Distinct token names without a value, in first-seen order
    pub missing: Vec<String>,
    /// 1-based numbers of output lines that hold an unresolved token
    pub unresolved_lines: Vec<usize>,
}

/// One output line with its unresolved flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PreviewLine {
    pub number: usize,
    pub text: String,
    pub unresolved: bool,
}

impl Rendered {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn lines(&self) -> Vec<PreviewLine> {
        self.content
            .split('\n')
            .enumerate()
            .map(|(i, text)| PreviewLine {
                number: i + 1,
                text: text.to_string(),
                unresolved: self.unresolved_lines.binary_search(&(i + 1)).is_ok(),
            })
            .collect()
    }
}

fn skip_whitespace(source: &str, mut pos: usize) -> usize {
    while let Some(ch) = source[pos..].chars().next() {
        if ch.is_whitespace() {
            pos += ch.len_utf8();
        } else {
            break;
        }
    }
    pos
}

/// Try to read a token starting at the `{` at `start`.
/// Returns the name range and the end of the whole token.
///
/// The name is whatever sits between the braces with surrounding whitespace
/// trimmed, so any declared variable name can be written as a token. It may
/// not be empty, span lines or contain a brace.
fn match_token(source: &str, start: usize) -> Option<(Range<usize>, usize)> {
    let bytes = source.as_bytes();
    let mut pos = start + 1;
    if bytes.get(pos) == Some(&b'{') {
        pos += 1;
    }
    pos = skip_whitespace(source, pos);

    let name_start = pos;
    let close = name_start + source[name_start..].find(['{', '}'])?;
    if bytes[close] != b'}' {
        return None;
    }
    let inner = &source[name_start..close];
    let name_len = inner.trim_end().len();
    if name_len == 0 || inner[..name_len].contains('\n') {
        return None;
    }
    let name = name_start..name_start + name_len;

    pos = close + 1;
    if bytes.get(pos) == Some(&b'}') {
        pos += 1;
    }

    Some((name, pos))
}

impl CompiledTemplate {
    /// Scan content once. Missing content compiles to an empty template.
    pub fn compile(content: Option<&str>) -> Self {
        let source = content.unwrap_or_default().to_string();
        let mut segments = Vec::new();
        let mut literal_start = 0;
        let mut cursor = 0;

        while let Some(offset) = source[cursor..].find('{') {
            let brace = cursor + offset;
            match match_token(&source, brace) {
                Some((name, end)) => {
                    if brace > literal_start {
                        segments.push(Segment::Literal(literal_start..brace));
                    }
                    segments.push(Segment::Token { name });
                    literal_start = end;
                    cursor = end;
                }
                None => cursor = brace + 1,
            }
        }
        if literal_start < source.len() {
            segments.push(Segment::Literal(literal_start..source.len()));
        }

        Self { source, segments }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Distinct token names in order of first appearance.
    pub fn token_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Token { name } = segment {
                let name = &self.source[name.clone()];
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn render(&self, values: &FormValues, mode: RenderMode) -> Rendered {
        let mut content = String::with_capacity(self.source.len());
        let mut missing: Vec<String> = Vec::new();
        let mut unresolved_lines: Vec<usize> = Vec::new();
        let mut line = 1;

        for segment in &self.segments {
            match segment {
                Segment::Literal(range) => {
                    let text = &self.source[range.clone()];
                    line += text.matches('\n').count();
                    content.push_str(text);
                }
                Segment::Token { name } => {
                    let name = &self.source[name.clone()];
                    match values.get(name).filter(|value| !value.is_empty()) {
                        Some(value) => {
                            line += value.matches('\n').count();
                            content.push_str(value);
                        }
                        None => {
                            match mode {
                                RenderMode::Preview => {
                                    content.push('[');
                                    content.push_str(name);
                                    content.push(']');
                                }
                                RenderMode::Blank => content.push_str(BLANK_FILLER),
                                RenderMode::Final => {}
                            }
                            if !missing.iter().any(|m| m == name) {
                                missing.push(name.to_string());
                            }
                            if unresolved_lines.last() != Some(&line) {
                                unresolved_lines.push(line);
                            }
                        }
                    }
                }
            }
        }

        Rendered {
            content,
            missing,
            unresolved_lines,
        }
    }
}

/// One-shot substitution.
pub fn render(content: Option<&str>, values: &FormValues, mode: RenderMode) -> String {
    CompiledTemplate::compile(content).render(values, mode).content
}

/// True when a rendered line still shows a `[name]` preview placeholder.
///
/// Only matches word-character names. Names holding `-`, `.`, spaces or
/// symbols are not seen here, so callers that have the [`Rendered`] value
/// should rely on [`Rendered::unresolved_lines`] or [`Rendered::lines`].
pub fn line_has_placeholder(line: &str) -> bool {
    PLACEHOLDER_PATTERN.is_match(line)
}
