//! rehearse-core: Answer scoring, interview flow control and rationales.
//!
//! This crate defines the data model, the domain catalogs, and the three
//! engine stages the rest of rehearse builds on: the lexical scorer, the
//! flow controller and the rationale generator. `session` ties them together
//! for one interview.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod lexicon;
pub mod model;
pub mod rationale;
pub mod report;
pub mod score;
pub mod scorer;
pub mod session;
pub mod state;
pub mod statistics;
pub mod traits;

pub use catalog::CatalogRegistry;
pub use controller::{Action, Decision, FlowController};
pub use model::{Answer, Domain, QuestionType};
pub use rationale::RationaleGenerator;
pub use score::ScoreResult;
pub use scorer::LexicalScorer;
pub use session::{InterviewSession, SessionConfig};
pub use state::InterviewState;
