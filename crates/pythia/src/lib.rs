pub mod complete;
pub mod modules;
pub mod syntax;

pub use complete::{Engine, EngineError, Match, KEYWORDS};
pub use modules::{Member, ModuleEntry, ModuleRegistry};
pub use syntax::{check_syntax, SyntaxCheck, SyntaxError};
