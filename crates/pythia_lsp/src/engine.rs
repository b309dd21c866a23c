//! Capability boundary to the analysis engine.
//!
//! The handlers only ever read a match's name, category, and docstring,
//! and a syntax outcome's position and message; the trait carries exactly
//! that. `PythiaEngine` adapts the real engine's types at this boundary
//! so nothing else in the service depends on its representation.

use pythia::SyntaxCheck;

#[derive(Debug, Clone)]
pub struct EngineMatch {
    pub name: String,
    pub category: String,
    pub docstring: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct EngineFailure {
    pub message: String,
}

impl EngineFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outcome of a full-document syntax check. A failure is expected data,
/// not an error; positions are 1-based and may be absent.
#[derive(Debug, Clone)]
pub enum SyntaxOutcome {
    Valid,
    Invalid {
        line: Option<u32>,
        column: Option<u32>,
        message: String,
    },
}

pub trait AnalysisEngine: Send + Sync {
    /// Completion matches at a 1-based line and 0-based character column,
    /// in the engine's own ranking order.
    fn complete(
        &self,
        code: &str,
        path: &str,
        line: u32,
        character: u32,
    ) -> Result<Vec<EngineMatch>, EngineFailure>;

    /// First-failure syntax check over the whole document. `Err` is
    /// reserved for the checker itself failing, never for bad syntax.
    fn check_syntax(&self, code: &str) -> Result<SyntaxOutcome, EngineFailure>;
}

#[derive(Default)]
pub struct PythiaEngine {
    inner: pythia::Engine,
}

impl PythiaEngine {
    pub fn new() -> Self {
        Self {
            inner: pythia::Engine::new(),
        }
    }
}

impl AnalysisEngine for PythiaEngine {
    fn complete(
        &self,
        code: &str,
        path: &str,
        line: u32,
        character: u32,
    ) -> Result<Vec<EngineMatch>, EngineFailure> {
        let matches = self
            .inner
            .complete(code, path, line as usize, character as usize)
            .map_err(|err| EngineFailure::new(err.to_string()))?;
        Ok(matches
            .into_iter()
            .map(|m| EngineMatch {
                name: m.name,
                category: m.category,
                docstring: m.docstring,
            })
            .collect())
    }

    fn check_syntax(&self, code: &str) -> Result<SyntaxOutcome, EngineFailure> {
        Ok(match pythia::check_syntax(code) {
            SyntaxCheck::Valid => SyntaxOutcome::Valid,
            SyntaxCheck::Invalid(error) => SyntaxOutcome::Invalid {
                line: error.line.map(|line| line as u32),
                column: error.column.map(|column| column as u32),
                message: error.message,
            },
        })
    }
}
