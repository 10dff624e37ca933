//! Front-end for GML, the scripting language of GameMaker projects.
//!
//! Pipeline layers, leaves first:
//! - **lexer**: source text → token stream (`Newline`/`Backslash` markers
//!   included, `End`-terminated)
//! - **macros**: project-wide `#macro` extract / insert / clean over token
//!   streams
//! - **parser**: backtracking recursive descent over cleaned tokens, built
//!   on a transactional cursor
//! - **ast** / **render**: the typed tree and its debug dump
//! - **project**: `.yyp` manifest walking, resource classification, and the
//!   staged tokenize → substitute → parse orchestration
//!
//! Parsing one script is independent of every other; only the macro table
//! crosses file boundaries, and it is frozen before any substitution runs.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod project;
pub mod render;
pub mod token;

pub use error::{Error, Result};
pub use parser::parse_script;
