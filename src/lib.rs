//! # Carneades Argument Evaluation
//!
//! An implementation of the Carneades argument evaluation structure (CAES):
//! defeasible arguments over polarity-aware propositions, evaluated against
//! an audience under per-proposition proof standards, plus an adversarial
//! dialogue engine that shifts the burden of proof between a proponent and
//! a respondent.
//!
//! ## Features
//!
//! - **Argument graphs**: indexed dependency graphs of propositions and
//!   arguments, with claim states and a consumable node/edge export
//! - **Proof standards**: scintilla, preponderance, clear-and-convincing,
//!   beyond-reasonable-doubt, and dialectical validity
//! - **Acceptability evaluation**: mutually recursive applicability and
//!   acceptability with explicit support-cycle detection
//! - **Burden-of-proof dialogues**: turn-taking exchanges that build a
//!   justification subgraph and a per-turn trace
//! - **Case files**: JSON input with eager validation of names, weights,
//!   thresholds, and standard assignments
//!
//! ## Example
//!
//! ```
//! use carneades::{Argument, ArgumentGraph, Audience, Caes, PropLiteral,
//!                 StandardMap, Thresholds};
//!
//! let kill = PropLiteral::new("kill");
//! let intent = PropLiteral::new("intent");
//! let murder = PropLiteral::new("murder");
//! let witness1 = PropLiteral::new("witness1");
//! let unreliable1 = PropLiteral::new("unreliable1");
//!
//! let mut graph = ArgumentGraph::new();
//! graph.add_argument(
//!     Argument::new("arg1", murder.clone())
//!         .with_premises([kill.clone(), intent.clone()])
//!         .with_weight(0.8),
//!     None,
//!     None,
//! )?;
//! graph.add_argument(
//!     Argument::new("arg2", intent.clone())
//!         .with_premise(witness1.clone())
//!         .with_exception(unreliable1)
//!         .with_weight(0.3),
//!     None,
//!     None,
//! )?;
//!
//! let audience = Audience::new(
//!     [kill, witness1],
//!     [("arg1".to_string(), 0.8), ("arg2".to_string(), 0.3)],
//! )?;
//! let standards = StandardMap::default();
//! let caes = Caes::new(&graph, &audience, &standards, Thresholds::default());
//!
//! assert!(caes.acceptable(&intent)?);
//! assert!(caes.acceptable(&murder)?);
//! assert!(!caes.acceptable(&murder.negate())?);
//! # Ok::<(), carneades::CaesError>(())
//! ```

#![warn(missing_docs)]

/// Case-file loading and eager validation.
pub mod config;
/// Adversarial burden-of-proof dialogues.
pub mod dialogue;
/// Error types and result aliases for each layer.
pub mod error;
/// CAES acceptability evaluation.
pub mod eval;
/// The argument dependency graph.
pub mod graph;
/// Core value types: literals, arguments, audiences, standards, thresholds.
pub mod model;

pub use config::{Case, CaseFile};
pub use dialogue::{BurdenStatus, Dialogue, DialogueOutcome, DialogueTrace, Resolution};
pub use error::{CaesError, CaesResult};
pub use eval::Caes;
pub use graph::{Actor, ArgumentGraph, GraphExport, NodeState};
pub use model::{Argument, Audience, PropLiteral, ProofStandard, StandardMap, Thresholds};
