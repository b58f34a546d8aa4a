//! Source Locator
//!
//! Maps JSON pointers to `{line, column}` positions in the serialized
//! document text. Understands block-style YAML and flow collections, which
//! covers JSON as well. The index is built once per run and is best-effort:
//! pointers into constructs it does not understand simply do not resolve.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use super::pointer;

/// 1-based position of a node (its key, dash, or first character)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Pointer to position index over one source text
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    locations: HashMap<String, Location>,
}

impl SourceMap {
    /// Index every node of the text
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix(super::BOM).unwrap_or(text);
        let mut indexer = Indexer::new(text);
        indexer.index();
        Self {
            locations: indexer.locations,
        }
    }

    /// Read and index a source file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    pub fn locate(&self, pointer: &str) -> Option<Location> {
        self.locations.get(pointer::normalize(pointer)).copied()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

struct Indexer {
    lines: Vec<Vec<char>>,
    cursor: usize,
    locations: HashMap<String, Location>,
}

/// Position inside a flow collection, which may span lines
struct FlowPos {
    line: usize,
    col: usize,
}

impl Indexer {
    fn new(text: &str) -> Self {
        Self {
            lines: text.lines().map(|l| l.chars().collect()).collect(),
            cursor: 0,
            locations: HashMap::new(),
        }
    }

    fn index(&mut self) {
        match self.next_significant() {
            Some(idx) => {
                let indent = indent_of(&self.lines[idx]);
                self.record("", idx, indent);
                self.block_node("", 0);
            }
            None => self.record("", 0, 0),
        }
    }

    fn record(&mut self, at: &str, line: usize, col: usize) {
        self.locations.insert(
            at.to_string(),
            Location {
                line: line + 1,
                column: col + 1,
            },
        );
    }

    /// Move the cursor past blank lines, comments and document markers
    fn next_significant(&mut self) -> Option<usize> {
        while self.cursor < self.lines.len() {
            if !is_insignificant(&self.lines[self.cursor]) {
                return Some(self.cursor);
            }
            self.cursor += 1;
        }
        None
    }

    /// Consume lines indented at least `min_indent` (scalar continuations)
    fn skip_deeper(&mut self, min_indent: usize) {
        while let Some(idx) = self.next_significant() {
            if indent_of(&self.lines[idx]) < min_indent {
                break;
            }
            self.cursor = idx + 1;
        }
    }

    fn block_node(&mut self, at: &str, min_indent: usize) {
        let Some(idx) = self.next_significant() else {
            return;
        };
        let indent = indent_of(&self.lines[idx]);
        if indent < min_indent {
            return;
        }
        let start = skip_properties(&self.lines[idx], indent);
        let line = &self.lines[idx];
        if start >= line.len() {
            self.cursor = idx + 1;
            self.block_node(at, min_indent);
        } else if is_dash(&line[indent..]) {
            self.sequence(at, indent);
        } else if line[start] == '{' || line[start] == '[' {
            self.flow(at, idx, start);
        } else if key_of(&line[indent..]).is_some() {
            self.mapping(at, indent);
        } else {
            self.cursor = idx + 1;
            self.skip_deeper(min_indent.max(indent + 1));
        }
    }

    fn mapping(&mut self, at: &str, indent: usize) {
        while let Some(idx) = self.next_significant() {
            let line_indent = indent_of(&self.lines[idx]);
            if line_indent < indent {
                break;
            }
            if line_indent > indent {
                self.cursor = idx + 1;
                continue;
            }
            let Some((key, after)) = key_of(&self.lines[idx][indent..]) else {
                break;
            };
            let child = pointer::append(at, &key);
            self.record(&child, idx, indent);

            let line = &self.lines[idx];
            let value = skip_properties(line, skip_spaces(line, indent + after));
            let first = line.get(value).copied();
            match first {
                None | Some('#') => {
                    self.cursor = idx + 1;
                    let dash_below = self.next_significant().is_some_and(|next| {
                        let next_line = &self.lines[next];
                        indent_of(next_line) == indent && is_dash(&next_line[indent..])
                    });
                    if dash_below {
                        self.sequence(&child, indent);
                    } else {
                        self.block_node(&child, indent + 1);
                    }
                }
                Some('{') | Some('[') => self.flow(&child, idx, value),
                Some(_) => {
                    self.cursor = idx + 1;
                    self.skip_deeper(indent + 1);
                }
            }
        }
    }

    fn sequence(&mut self, at: &str, indent: usize) {
        let mut index = 0;
        while let Some(idx) = self.next_significant() {
            let line = &self.lines[idx];
            if indent_of(line) != indent || !is_dash(&line[indent..]) {
                break;
            }
            let child = pointer::append_index(at, index);
            index += 1;
            self.record(&child, idx, indent);
            // Blank the dash so the item reads as a node indented past it
            self.lines[idx][indent] = ' ';
            self.block_node(&child, indent + 1);
        }
    }

    fn flow(&mut self, at: &str, line: usize, col: usize) {
        let mut pos = FlowPos { line, col };
        if self.flow_value(at, &mut pos).is_none() {
            log::debug!("Stopped indexing flow collection at line {}", pos.line + 1);
        }
        self.cursor = pos.line + 1;
    }

    fn peek(&self, pos: &FlowPos) -> Option<char> {
        let line = self.lines.get(pos.line)?;
        Some(line.get(pos.col).copied().unwrap_or('\n'))
    }

    fn bump(&self, pos: &mut FlowPos) {
        if pos.col >= self.lines[pos.line].len() {
            pos.line += 1;
            pos.col = 0;
        } else {
            pos.col += 1;
        }
    }

    fn skip_flow_space(&self, pos: &mut FlowPos) {
        while let Some(c) = self.peek(pos) {
            match c {
                ' ' | '\t' | '\r' | '\n' => self.bump(pos),
                '#' => {
                    pos.line += 1;
                    pos.col = 0;
                }
                _ => break,
            }
        }
    }

    fn flow_value(&mut self, at: &str, pos: &mut FlowPos) -> Option<()> {
        self.skip_flow_space(pos);
        match self.peek(pos)? {
            '{' => {
                self.bump(pos);
                loop {
                    self.skip_flow_space(pos);
                    match self.peek(pos)? {
                        '}' => {
                            self.bump(pos);
                            return Some(());
                        }
                        ',' => {
                            self.bump(pos);
                            continue;
                        }
                        _ => {}
                    }
                    let (key_line, key_col) = (pos.line, pos.col);
                    let key = self.flow_scalar(pos, true)?;
                    let child = pointer::append(at, &key);
                    self.record(&child, key_line, key_col);
                    self.skip_flow_space(pos);
                    if self.peek(pos)? == ':' {
                        self.bump(pos);
                        self.flow_value(&child, pos)?;
                    }
                }
            }
            '[' => {
                self.bump(pos);
                let mut index = 0;
                loop {
                    self.skip_flow_space(pos);
                    match self.peek(pos)? {
                        ']' => {
                            self.bump(pos);
                            return Some(());
                        }
                        ',' => {
                            self.bump(pos);
                            continue;
                        }
                        _ => {}
                    }
                    let child = pointer::append_index(at, index);
                    index += 1;
                    self.record(&child, pos.line, pos.col);
                    self.flow_value(&child, pos)?;
                }
            }
            _ => self.flow_scalar(pos, false).map(|_| ()),
        }
    }

    /// Read a quoted or plain scalar; `None` when nothing could be consumed
    fn flow_scalar(&self, pos: &mut FlowPos, is_key: bool) -> Option<String> {
        let line = self.lines.get(pos.line)?;
        match line.get(pos.col)? {
            '"' | '\'' => {
                let (text, end) = read_quoted(line, pos.col)?;
                pos.col = end;
                Some(text)
            }
            _ => {
                let start = pos.col;
                let mut end = start;
                while let Some(&c) = line.get(end) {
                    let stop = matches!(c, ',' | '}' | ']')
                        || (is_key && c == ':')
                        || (c == '#' && end > start && line[end - 1] == ' ');
                    if stop {
                        break;
                    }
                    end += 1;
                }
                if end == start {
                    return None;
                }
                pos.col = end;
                Some(line[start..end].iter().collect::<String>().trim().to_string())
            }
        }
    }
}

fn indent_of(line: &[char]) -> usize {
    line.iter().take_while(|c| **c == ' ').count()
}

fn skip_spaces(line: &[char], from: usize) -> usize {
    let mut idx = from;
    while line.get(idx).is_some_and(|c| *c == ' ' || *c == '\t') {
        idx += 1;
    }
    idx
}

/// Skip anchors (`&name`) and tags (`!tag`) in front of a node
fn skip_properties(line: &[char], from: usize) -> usize {
    let mut idx = skip_spaces(line, from);
    while matches!(line.get(idx), Some('&') | Some('!')) {
        while line.get(idx).is_some_and(|c| *c != ' ') {
            idx += 1;
        }
        idx = skip_spaces(line, idx);
    }
    idx
}

fn is_insignificant(line: &[char]) -> bool {
    let content = &line[indent_of(line)..];
    match content.first() {
        None => true,
        Some('#') | Some('%') => true,
        _ => {
            let text: String = content.iter().collect();
            let text = text.trim_end();
            text == "---" || text == "..." || text.chars().all(char::is_whitespace)
        }
    }
}

fn is_dash(content: &[char]) -> bool {
    content.first() == Some(&'-') && content.get(1).is_none_or(|c| *c == ' ' || *c == '\t')
}

/// Key of a block mapping entry and the offset just past its colon
fn key_of(content: &[char]) -> Option<(String, usize)> {
    let is_colon_at =
        |i: usize| content.get(i) == Some(&':') && content.get(i + 1).is_none_or(|c| *c == ' ' || *c == '\t');

    match content.first()? {
        '"' | '\'' => {
            let (key, end) = read_quoted(content, 0)?;
            let colon = skip_spaces(content, end);
            is_colon_at(colon).then_some((key, colon + 1))
        }
        '{' | '[' | '#' => None,
        _ => {
            for i in 0..content.len() {
                if content[i] == '#' && i > 0 && content[i - 1] == ' ' {
                    return None;
                }
                if is_colon_at(i) {
                    let key: String = content[..i].iter().collect();
                    let key = key.trim();
                    return (!key.is_empty()).then(|| (key.to_string(), i + 1));
                }
            }
            None
        }
    }
}

/// Read a single- or double-quoted scalar starting at `start`
fn read_quoted(chars: &[char], start: usize) -> Option<(String, usize)> {
    let quote = *chars.get(start)?;
    let mut out = String::new();
    let mut i = start + 1;
    while let Some(&c) = chars.get(i) {
        if quote == '"' && c == '\\' {
            let escaped = *chars.get(i + 1)?;
            match escaped {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                'b' => out.push('\u{8}'),
                'f' => out.push('\u{c}'),
                'u' => {
                    let hex: String = chars.get(i + 2..i + 6)?.iter().collect();
                    out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
                    i += 6;
                    continue;
                }
                other => out.push(other),
            }
            i += 2;
            continue;
        }
        if c == quote {
            if quote == '\'' && chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            return Some((out, i + 1));
        }
        out.push(c);
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: usize, column: usize) -> Option<Location> {
        Some(Location { line, column })
    }

    const YAML: &str = r#"openapi: 3.0.0
info:
  title: Petstore   # comment
  version: "1.0"
servers:
  - url: https://api.example.com/v1
  - url: https://staging.example.com
paths:
  /pets:
    get:
      operationId: listPets
      description: |
        Lists pets.
        key: not a key
      tags: [pets, "read only"]
components:
  schemas:
    Pet:
      type: object
      properties:
        tag:
          type: array
          items: {type: string}
"#;

    #[test]
    fn test_yaml_block_mapping() {
        let map = SourceMap::parse(YAML);
        assert_eq!(map.locate(""), at(1, 1));
        assert_eq!(map.locate("/openapi"), at(1, 1));
        assert_eq!(map.locate("/info/title"), at(3, 3));
        assert_eq!(map.locate("/info/version"), at(4, 3));
        assert_eq!(map.locate("/paths/~1pets/get/operationId"), at(11, 7));
        assert_eq!(map.locate("/components/schemas/Pet/properties/tag"), at(21, 9));
    }

    #[test]
    fn test_yaml_sequences_and_block_scalars() {
        let map = SourceMap::parse(YAML);
        assert_eq!(map.locate("/servers/0"), at(6, 3));
        assert_eq!(map.locate("/servers/1/url"), at(7, 5));
        assert_eq!(map.locate("/paths/~1pets/get/description"), at(12, 7));
        assert_eq!(map.locate("/paths/~1pets/get/description/key"), None);
        assert_eq!(map.locate("/paths/~1pets/get/tags"), at(15, 7));
    }

    #[test]
    fn test_yaml_flow_inside_block() {
        let map = SourceMap::parse(YAML);
        assert_eq!(map.locate("/paths/~1pets/get/tags/1"), at(15, 20));
        assert_eq!(
            map.locate("/components/schemas/Pet/properties/tag/items/type"),
            at(23, 19)
        );
    }

    #[test]
    fn test_sequence_at_key_indent() {
        let text = "tags:\n- name: pets\n  description: Pets\n- name: owners\nnext: 1\n";
        let map = SourceMap::parse(text);
        assert_eq!(map.locate("/tags/0"), at(2, 1));
        assert_eq!(map.locate("/tags/0/description"), at(3, 3));
        assert_eq!(map.locate("/tags/1/name"), at(4, 3));
        assert_eq!(map.locate("/next"), at(5, 1));
    }

    #[test]
    fn test_pretty_json() {
        let text = "{\n  \"openapi\": \"3.0.0\",\n  \"paths\": {\n    \"/pets\": {\n      \"get\": {}\n    }\n  },\n  \"servers\": [\n    {\"url\": \"https://x\"}\n  ]\n}\n";
        let map = SourceMap::parse(text);
        assert_eq!(map.locate("/openapi"), at(2, 3));
        assert_eq!(map.locate("/paths/~1pets"), at(4, 5));
        assert_eq!(map.locate("/paths/~1pets/get"), at(5, 7));
        assert_eq!(map.locate("/servers/0"), at(9, 5));
        assert_eq!(map.locate("/servers/0/url"), at(9, 6));
    }

    #[test]
    fn test_minified_json_with_escapes() {
        let text = r#"{"a":{"b~c":[1,{"d/e":true}]},"f":null}"#;
        let map = SourceMap::parse(text);
        assert_eq!(map.locate("/a"), at(1, 2));
        assert_eq!(map.locate("/a/b~0c/1/d~1e"), at(1, 17));
        assert_eq!(map.locate("/f"), at(1, 31));
    }

    #[test]
    fn test_byte_order_mark_is_not_a_column() {
        let map = SourceMap::parse("\u{feff}openapi: 3.0.0\ninfo:\n  title: Test\n");
        assert_eq!(map.locate("/openapi"), Some(Location { line: 1, column: 1 }));
        assert_eq!(map.locate("/info/title"), Some(Location { line: 3, column: 3 }));
    }

    #[test]
    fn test_unresolvable_pointer() {
        let map = SourceMap::parse(YAML);
        assert_eq!(map.locate("/paths/~1owners"), None);
        assert!(!map.is_empty());
    }

    #[test]
    fn test_malformed_flow_does_not_hang() {
        let map = SourceMap::parse("a: {b: [1, 2}\nc: 3\n");
        assert_eq!(map.locate("/a"), at(1, 1));
        assert_eq!(map.locate("/a/b/0"), at(1, 9));
    }
}
