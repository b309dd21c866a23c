//! Cursor-position completion.
//!
//! The engine takes a full document snapshot plus a 1-based line and
//! 0-based character column, works out what sits to the left of the
//! cursor, and answers with matches in a fixed order: document names in
//! order of appearance, then keywords. Attribute access (`base.`) resolves
//! through the module registry.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::modules::ModuleRegistry;

#[derive(Debug, Clone, Serialize)]
pub struct Match {
    pub name: String,
    pub category: String,
    pub docstring: Option<String>,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("line {line} is out of range for a document with {line_count} lines")]
    LineOutOfRange { line: usize, line_count: usize },
    #[error("column {column} is out of range on line {line}")]
    ColumnOutOfRange { line: usize, column: usize },
}

pub const KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class", "continue",
    "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if", "import",
    "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
    "with", "yield",
];

pub struct Engine {
    registry: ModuleRegistry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self {
            registry: ModuleRegistry::builtin(),
        }
    }

    /// Complete at `line` (1-based) / `column` (0-based characters). The
    /// path names the document for callers that key on it; the engine
    /// itself holds no per-document state.
    pub fn complete(
        &self,
        code: &str,
        _path: &str,
        line: usize,
        column: usize,
    ) -> Result<Vec<Match>, EngineError> {
        let lines: Vec<&str> = code.split('\n').collect();
        if line == 0 || line > lines.len() {
            return Err(EngineError::LineOutOfRange {
                line,
                line_count: lines.len(),
            });
        }
        let current = lines[line - 1];
        if column > current.chars().count() {
            return Err(EngineError::ColumnOutOfRange { line, column });
        }

        let cursor = CursorContext::extract(current, column);
        let index = DocumentIndex::build(code, &self.registry);

        if !cursor.base.is_empty() {
            return Ok(self.attribute_matches(&index, &cursor));
        }
        Ok(self.name_matches(&index, &cursor.partial))
    }

    fn attribute_matches(&self, index: &DocumentIndex, cursor: &CursorContext) -> Vec<Match> {
        let Some(module) = index.imports.get(&cursor.base[0]) else {
            return Vec::new();
        };
        let Some(members) = self.registry.resolve_members(module, &cursor.base[1..]) else {
            return Vec::new();
        };
        members
            .iter()
            .filter(|member| member.name.starts_with(cursor.partial.as_str()))
            .map(|member| Match {
                name: member.name.to_string(),
                category: member.category.to_string(),
                docstring: Some(member.docstring.to_string()),
            })
            .collect()
    }

    fn name_matches(&self, index: &DocumentIndex, partial: &str) -> Vec<Match> {
        let mut out = Vec::new();
        for (name, category) in &index.names {
            if name.starts_with(partial) {
                let docstring = index
                    .imports
                    .get(name)
                    .and_then(|module| self.registry.module(module))
                    .map(|entry| entry.docstring.to_string());
                out.push(Match {
                    name: name.clone(),
                    category: category.to_string(),
                    docstring,
                });
            }
        }
        for keyword in KEYWORDS {
            if keyword.starts_with(partial) {
                out.push(Match {
                    name: keyword.to_string(),
                    category: "keyword".to_string(),
                    docstring: None,
                });
            }
        }
        out
    }
}

/// What sits immediately left of the cursor: a partial identifier and,
/// for attribute access, the dotted base in front of it.
struct CursorContext {
    base: Vec<String>,
    partial: String,
}

impl CursorContext {
    fn extract(line: &str, column: usize) -> Self {
        let chars: Vec<char> = line.chars().take(column).collect();
        let mut end = chars.len();
        while end > 0 && is_ident_char(chars[end - 1]) {
            end -= 1;
        }
        let partial: String = chars[end..].iter().collect();

        let mut base = Vec::new();
        let mut cursor = end;
        while cursor > 0 && chars[cursor - 1] == '.' {
            let seg_end = cursor - 1;
            let mut seg_start = seg_end;
            while seg_start > 0 && is_ident_char(chars[seg_start - 1]) {
                seg_start -= 1;
            }
            if seg_start == seg_end {
                base.clear();
                break;
            }
            base.push(chars[seg_start..seg_end].iter().collect());
            cursor = seg_start;
        }
        base.reverse();
        Self { base, partial }
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Top-level names visible in the document, in order of appearance.
struct DocumentIndex {
    names: Vec<(String, &'static str)>,
    /// Bound name -> dotted module path, for every `import`/`from` form.
    imports: HashMap<String, String>,
}

impl DocumentIndex {
    fn build(code: &str, registry: &ModuleRegistry) -> Self {
        let mut names: Vec<(String, &'static str)> = Vec::new();
        let mut imports = HashMap::new();
        let mut push = |names: &mut Vec<(String, &'static str)>, name: String, category| {
            if !name.is_empty() && !names.iter().any(|(existing, _)| *existing == name) {
                names.push((name, category));
            }
        };

        for line in code.split('\n') {
            if line.starts_with(' ') || line.starts_with('\t') {
                continue;
            }
            let trimmed = line.trim_end();
            if let Some(rest) = trimmed.strip_prefix("import ") {
                for part in rest.split(',') {
                    let part = part.trim();
                    let (module, bound) = match part.split_once(" as ") {
                        Some((module, alias)) => (module.trim(), alias.trim().to_string()),
                        None => {
                            let first = part.split('.').next().unwrap_or(part);
                            (part, first.to_string())
                        }
                    };
                    imports.insert(bound.clone(), module.to_string());
                    push(&mut names, bound, "module");
                }
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix("from ") {
                let Some((module, imported)) = rest.split_once(" import ") else {
                    continue;
                };
                let module = module.trim();
                for part in imported.split(',') {
                    let part = part.trim();
                    let (real, bound) = match part.split_once(" as ") {
                        Some((real, alias)) => (real.trim(), alias.trim()),
                        None => (part, part),
                    };
                    let category = registry
                        .module(module)
                        .and_then(|entry| entry.members.iter().find(|member| member.name == real))
                        .map(|member| member.category)
                        .unwrap_or("statement");
                    push(&mut names, bound.to_string(), category);
                }
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix("def ") {
                push(&mut names, leading_ident(rest), "function");
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix("async def ") {
                push(&mut names, leading_ident(rest), "function");
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix("class ") {
                push(&mut names, leading_ident(rest), "class");
                continue;
            }
            if let Some(name) = assignment_target(trimmed) {
                push(&mut names, name, "statement");
            }
        }

        Self { names, imports }
    }
}

fn leading_ident(text: &str) -> String {
    text.chars().take_while(|ch| is_ident_char(*ch)).collect()
}

/// `name = …` or `name: annotation = …` with a bare identifier target;
/// augmented assignment and comparison do not bind a new name.
fn assignment_target(line: &str) -> Option<String> {
    let name = leading_ident(line);
    if name.is_empty() || KEYWORDS.contains(&name.as_str()) {
        return None;
    }
    let rest = line[name.len()..].trim_start();
    if let Some(annotated) = rest.strip_prefix(':') {
        let (_, value) = annotated.split_once('=')?;
        if value.starts_with('=') {
            return None;
        }
        return Some(name);
    }
    let mut chars = rest.chars();
    if chars.next() != Some('=') {
        return None;
    }
    if chars.next() == Some('=') {
        return None;
    }
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = "import example_module\n\nexample_module.";

    fn complete_at(code: &str, line: usize, column: usize) -> Vec<Match> {
        Engine::new()
            .complete(code, "<test>", line, column)
            .expect("completion succeeds")
    }

    fn labels(matches: &[Match]) -> Vec<&str> {
        matches.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn completes_module_members_after_dot() {
        let matches = complete_at(FIXTURE, 3, 15);
        assert_eq!(
            labels(&matches),
            ["add", "subtract", "multiply", "divide", "Calculator"]
        );
        assert!(matches
            .iter()
            .take(4)
            .all(|m| m.category == "function"));
        assert_eq!(matches[4].category, "class");
        assert_eq!(
            matches[0].docstring.as_deref(),
            Some("Add two numbers and return the result.")
        );
    }

    #[test]
    fn filters_members_by_partial_prefix() {
        let code = "import example_module\nexample_module.su";
        let matches = complete_at(code, 2, 17);
        assert_eq!(labels(&matches), ["subtract"]);
    }

    #[test]
    fn completes_class_methods_through_dotted_path() {
        let code = "import example_module\nexample_module.Calculator.";
        let matches = complete_at(code, 2, 26);
        assert_eq!(labels(&matches), ["add", "subtract", "reset", "get_value"]);
        assert!(matches.iter().all(|m| m.category == "method"));
    }

    #[test]
    fn unknown_attribute_base_completes_to_nothing() {
        let matches = complete_at("mystery.", 1, 8);
        assert!(matches.is_empty());
    }

    #[test]
    fn import_alias_resolves_to_module() {
        let code = "import example_module as em\nem.div";
        let matches = complete_at(code, 2, 6);
        assert_eq!(labels(&matches), ["divide"]);
    }

    #[test]
    fn plain_prefix_lists_document_names_then_keywords() {
        let code = "import math\n\ndef greet(name):\n    pass\n\ncount = 0\n\ng";
        let matches = complete_at(code, 8, 1);
        assert_eq!(labels(&matches), ["greet", "global"]);
        assert_eq!(matches[0].category, "function");
        assert_eq!(matches[1].category, "keyword");
    }

    #[test]
    fn imported_module_name_carries_its_docstring() {
        let code = "import math\nmat";
        let matches = complete_at(code, 2, 3);
        assert_eq!(matches[0].name, "math");
        assert_eq!(matches[0].category, "module");
        assert_eq!(
            matches[0].docstring.as_deref(),
            Some("Mathematical functions and constants.")
        );
    }

    #[test]
    fn from_import_binds_member_with_registry_category() {
        let code = "from example_module import Calculator, add\nCal";
        let matches = complete_at(code, 2, 3);
        assert_eq!(labels(&matches), ["Calculator"]);
        assert_eq!(matches[0].category, "class");
    }

    #[test]
    fn assignments_complete_as_statements() {
        let code = "total = 1\ntot";
        let matches = complete_at(code, 2, 3);
        assert_eq!(labels(&matches), ["total"]);
        assert_eq!(matches[0].category, "statement");
    }

    #[test]
    fn annotated_assignments_complete_as_statements() {
        let code = "total: int = 1\ntot";
        let matches = complete_at(code, 2, 3);
        assert_eq!(labels(&matches), ["total"]);
        assert_eq!(matches[0].category, "statement");
    }

    #[test]
    fn bare_annotation_without_value_binds_nothing() {
        let matches = complete_at("x: int\nx2", 2, 2);
        assert!(matches.is_empty());
    }

    #[test]
    fn augmented_assignment_binds_nothing() {
        let code = "x += 1\nx2";
        let matches = complete_at(code, 2, 2);
        assert!(matches.is_empty());
    }

    #[test]
    fn empty_prefix_on_blank_line_lists_keywords() {
        let matches = complete_at("\n", 1, 0);
        let names = labels(&matches);
        assert!(names.contains(&"import"));
        assert!(names.contains(&"lambda"));
    }

    #[test]
    fn line_out_of_range_is_an_error() {
        let result = Engine::new().complete("x = 1\n", "<test>", 9, 0);
        assert!(matches!(result, Err(EngineError::LineOutOfRange { .. })));
        let result = Engine::new().complete("x = 1\n", "<test>", 0, 0);
        assert!(matches!(result, Err(EngineError::LineOutOfRange { .. })));
    }

    #[test]
    fn column_out_of_range_is_an_error() {
        let result = Engine::new().complete("x = 1", "<test>", 1, 40);
        assert!(matches!(result, Err(EngineError::ColumnOutOfRange { .. })));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let first = complete_at(FIXTURE, 3, 15);
        let second = complete_at(FIXTURE, 3, 15);
        assert_eq!(labels(&first), labels(&second));
    }
}
