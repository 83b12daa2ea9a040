//! # docreview client
//!
//! Async side of a documentation review: polling the producer's resources,
//! submitting the reviewer's decision, and driving review cycles.
//!
//! ## Flow
//!
//! 1. A [`PollLoop`] fetches the resources for the configured mode from a
//!    [`ResourceSource`] (HTTP base URL or local directory), retrying on a
//!    fixed interval until all of them are available.
//! 2. A [`Reviewer`] looks at the ready snapshot and returns a verdict.
//! 3. The [`DecisionSubmitter`] POSTs `{"Approved": bool, "Data"?: string}`
//!    to the approval endpoint.
//! 4. In edits mode the session repeats while the continue sentinel is
//!    non-zero.
//!
//! ## Resources
//!
//! ```text
//! edits mode:      current_documentation.md, continue_exec.txt, alteracoes.json
//! full-text mode:  current_documentation.md, new_documentation.md
//! ```

pub mod commands;
pub mod error;
pub mod fetcher;
pub mod poll;
pub mod session;
pub mod source;
pub mod submit;

pub use commands::{cmd_preview, cmd_review, ReviewOptions, TerminalReviewer};
pub use error::{FetchError, SubmitError};
pub use fetcher::DocumentFetcher;
pub use poll::{PollHandle, PollLoop};
pub use session::{ReviewSession, Reviewer, SessionSummary};
pub use source::{source_from_location, DirSource, HttpSource, ResourceSource};
pub use submit::{Decision, DecisionSubmitter};
