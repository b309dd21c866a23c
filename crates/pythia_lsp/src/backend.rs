//! Request orchestration: translate client coordinates, call the engine,
//! map the results back into the wire schema. Every request is
//! self-contained; the backend holds nothing but the engine handle.

use std::sync::Arc;

use crate::document::virtual_document_path;
use crate::engine::{AnalysisEngine, SyntaxOutcome};
use crate::kinds::completion_kind;
use crate::position::{make_range, to_client_column, to_client_line, to_engine_line};
use crate::protocol::{
    CompletionItem, CompletionParams, CompletionResponse, Diagnostic, DiagnosticResponse,
    TextDocument, SEVERITY_ERROR,
};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Completion error: {0}")]
    Completion(String),
    #[error("Diagnostic error: {0}")]
    Diagnostic(String),
}

pub struct Backend {
    engine: Arc<dyn AnalysisEngine>,
}

impl Backend {
    pub fn new(engine: Arc<dyn AnalysisEngine>) -> Self {
        Self { engine }
    }

    /// Engine matches become completion items in engine order; this layer
    /// never re-ranks or deduplicates.
    pub fn completion(&self, params: &CompletionParams) -> Result<CompletionResponse, BackendError> {
        let text = &params.text_document.text;
        let line = to_engine_line(params.position.line);
        let character = params.position.character;
        let path = virtual_document_path(text);

        let matches = self
            .engine
            .complete(text, &path, line, character)
            .map_err(|err| {
                tracing::error!(%path, error = %err, "engine completion failed");
                BackendError::Completion(err.to_string())
            })?;

        let items: Vec<CompletionItem> = matches
            .into_iter()
            .map(|m| CompletionItem {
                label: m.name,
                kind: completion_kind(&m.category),
                detail: Some(m.category),
                documentation: m.docstring,
            })
            .collect();
        tracing::debug!(count = items.len(), "completion served");
        Ok(CompletionResponse { items })
    }

    /// Zero or one diagnostic: the checker stops at the first syntax
    /// failure by design.
    pub fn diagnostics(&self, document: &TextDocument) -> Result<DiagnosticResponse, BackendError> {
        let outcome = self.engine.check_syntax(&document.text).map_err(|err| {
            tracing::error!(error = %err, "syntax check failed");
            BackendError::Diagnostic(err.to_string())
        })?;

        let diagnostics = match outcome {
            SyntaxOutcome::Valid => Vec::new(),
            SyntaxOutcome::Invalid {
                line,
                column,
                message,
            } => {
                let line = to_client_line(line);
                let column = to_client_column(column);
                vec![Diagnostic {
                    range: make_range(line, column, None, None),
                    message,
                    severity: SEVERITY_ERROR,
                }]
            }
        };
        Ok(DiagnosticResponse { diagnostics })
    }
}
