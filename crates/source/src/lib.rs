#![forbid(unsafe_code)]

pub mod opentdb;
pub mod source;

pub use opentdb::{OpenTdbConfig, OpenTdbError, OpenTdbSource};
pub use source::{Difficulty, QuestionSource, ScriptedSource, SourceError, TriviaQuery};
