pub mod backend;
pub mod document;
pub mod engine;
pub mod kinds;
pub mod position;
pub mod protocol;
pub mod server;


pub use backend::{Backend, BackendError};
pub use engine::{AnalysisEngine, EngineFailure, EngineMatch, PythiaEngine, SyntaxOutcome};
pub use server::{router, serve};
