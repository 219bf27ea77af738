//! Case-file loading and validation.
//!
//! A [`CaseFile`] is the JSON input surface of the crate: declared
//! propositions, audience assumptions, arguments, evaluation parameters,
//! proof-standard assignments, and the issues to evaluate. [`CaseFile::build`]
//! performs every eager validation check (range checks, name resolution,
//! duplicate detection) and produces a ready-to-evaluate [`Case`].
//!
//! Proposition references use a `-` prefix for negation (`"-intent"`);
//! declarations never carry a prefix. Both polarities of every declared
//! proposition are registered in the graph up front, so acceptability
//! queries never trip a not-found error.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dialogue::Dialogue;
use crate::error::{ConfigError, ConfigResult};
use crate::eval::Caes;
use crate::graph::ArgumentGraph;
use crate::model::{Argument, Audience, PropLiteral, ProofStandard, StandardMap, Thresholds};

// ============================================================================
// File format
// ============================================================================

/// One argument of a case file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentSpec {
    /// Argument id, unique within the file.
    pub id: String,
    /// Conclusion reference (`-` prefix for a negated conclusion).
    pub conclusion: String,
    /// Premise references.
    #[serde(default)]
    pub premises: Vec<String>,
    /// Exception references.
    #[serde(default)]
    pub exceptions: Vec<String>,
    /// Weight in [0, 1].
    pub weight: f64,
}

/// The alpha/beta/gamma parameters of a case file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Pro-strength floor.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Pro/con gap floor.
    #[serde(default = "default_beta")]
    pub beta: f64,
    /// Con-strength ceiling.
    #[serde(default = "default_gamma")]
    pub gamma: f64,
}

fn default_alpha() -> f64 {
    0.4
}

fn default_beta() -> f64 {
    0.3
}

fn default_gamma() -> f64 {
    0.2
}

impl Default for ParameterSpec {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            beta: default_beta(),
            gamma: default_gamma(),
        }
    }
}

/// A proof-standard assignment of a case file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardSpec {
    /// Proposition reference.
    pub proposition: String,
    /// Standard name; both `clear_and_convincing` and
    /// `"clear and convincing"` spellings are accepted.
    pub standard: String,
}

/// A complete case file, as deserialized from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFile {
    /// Declared proposition names, without polarity prefixes.
    pub propositions: Vec<String>,
    /// Literals the audience assumes to hold.
    #[serde(default)]
    pub assumptions: Vec<String>,
    /// The arguments of the case.
    #[serde(default)]
    pub arguments: Vec<ArgumentSpec>,
    /// Evaluation thresholds; defaults to 0.4/0.3/0.2.
    #[serde(default)]
    pub parameters: ParameterSpec,
    /// Per-proposition proof standards; unlisted propositions use scintilla.
    #[serde(default)]
    pub proofstandards: Vec<StandardSpec>,
    /// The issues to evaluate.
    #[serde(default)]
    pub issues: Vec<String>,
}

// ============================================================================
// Built case
// ============================================================================

/// A validated, ready-to-evaluate case.
#[derive(Debug, Clone)]
pub struct Case {
    /// The knowledge-base argument graph.
    pub graph: ArgumentGraph,
    /// The audience (assumptions and argument weights).
    pub audience: Audience,
    /// Proof standards per proposition.
    pub standards: StandardMap,
    /// Evaluation thresholds.
    pub thresholds: Thresholds,
    /// The issues to evaluate, in file order.
    pub issues: Vec<PropLiteral>,
}

impl Case {
    /// A CAES evaluator bound to this case.
    pub fn caes(&self) -> Caes<'_> {
        Caes::new(&self.graph, &self.audience, &self.standards, self.thresholds)
    }

    /// A dialogue engine bound to this case.
    pub fn dialogue(&self) -> Dialogue<'_> {
        Dialogue::new(&self.graph, &self.audience, &self.standards, self.thresholds)
    }
}

impl CaseFile {
    /// Parse a case file from a JSON string.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a case file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Validate the file and build the evaluable [`Case`].
    pub fn build(self) -> ConfigResult<Case> {
        info!(propositions = self.propositions.len(), "declaring propositions");
        let mut declared: HashMap<String, PropLiteral> = HashMap::new();
        let mut graph = ArgumentGraph::new();
        for name in &self.propositions {
            if name.is_empty() || name.starts_with('-') {
                return Err(ConfigError::InvalidPropositionName { name: name.clone() });
            }
            let prop = PropLiteral::new(name.clone());
            // register both polarities so no lookup can fail later
            graph.add_proposition(prop.clone(), None);
            graph.add_proposition(prop.negate(), None);
            declared.insert(name.clone(), prop);
        }

        let resolve = |reference: &str| -> ConfigResult<PropLiteral> {
            let (name, negated) = match reference.strip_prefix('-') {
                Some(rest) => (rest, true),
                None => (reference, false),
            };
            let prop = declared
                .get(name)
                .ok_or_else(|| ConfigError::UndeclaredProposition {
                    name: reference.to_string(),
                })?;
            Ok(if negated { prop.negate() } else { prop.clone() })
        };

        info!(assumptions = self.assumptions.len(), "resolving assumptions");
        let mut assumptions = Vec::with_capacity(self.assumptions.len());
        for reference in &self.assumptions {
            assumptions.push(resolve(reference)?);
        }

        info!(arguments = self.arguments.len(), "adding arguments");
        let mut weights = Vec::with_capacity(self.arguments.len());
        for spec in &self.arguments {
            if !(0.0..=1.0).contains(&spec.weight) {
                return Err(ConfigError::WeightOutOfRange {
                    arg_id: spec.id.clone(),
                    weight: spec.weight,
                });
            }
            let mut argument = Argument::new(spec.id.clone(), resolve(&spec.conclusion)?)
                .with_weight(spec.weight);
            for premise in &spec.premises {
                argument = argument.with_premise(resolve(premise)?);
            }
            for exception in &spec.exceptions {
                argument = argument.with_exception(resolve(exception)?);
            }
            debug!(arg_id = %spec.id, argument = %argument, "argument resolved");
            graph
                .add_argument(argument, None, None)
                .map_err(|_| ConfigError::DuplicateArgumentId {
                    arg_id: spec.id.clone(),
                })?;
            weights.push((spec.id.clone(), spec.weight));
        }

        let thresholds = Thresholds::new(
            self.parameters.alpha,
            self.parameters.beta,
            self.parameters.gamma,
        )?;

        info!(
            proofstandards = self.proofstandards.len(),
            "assigning proof standards"
        );
        let mut standards = StandardMap::default();
        for spec in &self.proofstandards {
            let standard: ProofStandard =
                spec.standard
                    .parse()
                    .map_err(|_| ConfigError::UnknownStandard {
                        name: spec.standard.clone(),
                    })?;
            standards = standards.with_standard(resolve(&spec.proposition)?, standard);
        }

        let mut issues = Vec::with_capacity(self.issues.len());
        for reference in &self.issues {
            issues.push(resolve(reference)?);
        }

        let audience = Audience::new(assumptions, weights)?;

        Ok(Case {
            graph,
            audience,
            standards,
            thresholds,
            issues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MURDER_CASE: &str = r#"{
        "propositions": ["kill", "intent", "murder", "witness1", "unreliable1",
                         "witness2", "unreliable2"],
        "assumptions": ["kill", "witness1", "witness2", "unreliable2"],
        "arguments": [
            {"id": "arg1", "conclusion": "murder",
             "premises": ["kill", "intent"], "weight": 0.8},
            {"id": "arg2", "conclusion": "intent",
             "premises": ["witness1"], "exceptions": ["unreliable1"], "weight": 0.3},
            {"id": "arg3", "conclusion": "-intent",
             "premises": ["witness2"], "exceptions": ["unreliable2"], "weight": 0.8}
        ],
        "parameters": {"alpha": 0.4, "beta": 0.3, "gamma": 0.2},
        "proofstandards": [
            {"proposition": "intent", "standard": "beyond reasonable doubt"}
        ],
        "issues": ["murder", "-murder"]
    }"#;

    #[test]
    fn test_build_murder_case() {
        let case = CaseFile::from_json_str(MURDER_CASE).unwrap().build().unwrap();

        assert_eq!(case.graph.argument_count(), 3);
        assert_eq!(case.issues.len(), 2);
        assert_eq!(case.issues[1], PropLiteral::new("murder").negate());
        assert!(case.audience.is_assumed(&PropLiteral::new("kill")));
        assert_eq!(case.audience.weight_of("arg2"), Some(0.3));
        assert_eq!(
            case.standards.standard_for(&PropLiteral::new("intent")),
            ProofStandard::BeyondReasonableDoubt
        );
        assert_eq!(case.thresholds.beta, 0.3);

        // both polarities of every declared proposition are queryable
        let alibi_free = PropLiteral::new("unreliable1").negate();
        assert_eq!(case.graph.get_arguments(&alibi_free).unwrap().len(), 0);
    }

    #[test]
    fn test_built_case_evaluates() {
        let case = CaseFile::from_json_str(MURDER_CASE).unwrap().build().unwrap();
        let caes = case.caes();
        assert!(!caes.acceptable(&PropLiteral::new("murder")).unwrap());
        assert!(!caes.acceptable(&PropLiteral::new("murder").negate()).unwrap());
    }

    #[test]
    fn test_negated_assumption_reference() {
        let file = CaseFile::from_json_str(
            r#"{
                "propositions": ["wet"],
                "assumptions": ["-wet"]
            }"#,
        )
        .unwrap();
        let case = file.build().unwrap();
        assert!(case.audience.is_assumed(&PropLiteral::new("wet").negate()));
        assert!(!case.audience.is_assumed(&PropLiteral::new("wet")));
    }

    #[test]
    fn test_declared_name_must_be_positive() {
        let err = CaseFile::from_json_str(r#"{"propositions": ["-kill"]}"#)
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPropositionName { .. }));
    }

    #[test]
    fn test_undeclared_reference_is_rejected() {
        let err = CaseFile::from_json_str(
            r#"{
                "propositions": ["murder"],
                "arguments": [
                    {"id": "arg1", "conclusion": "murder",
                     "premises": ["kill"], "weight": 0.8}
                ]
            }"#,
        )
        .unwrap()
        .build()
        .unwrap_err();
        match err {
            ConfigError::UndeclaredProposition { name } => assert_eq!(name, "kill"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_weight_out_of_range_is_rejected() {
        let err = CaseFile::from_json_str(
            r#"{
                "propositions": ["murder"],
                "arguments": [
                    {"id": "arg1", "conclusion": "murder", "weight": 1.8}
                ]
            }"#,
        )
        .unwrap()
        .build()
        .unwrap_err();
        assert!(matches!(err, ConfigError::WeightOutOfRange { .. }));
    }

    #[test]
    fn test_duplicate_argument_id_is_rejected() {
        let err = CaseFile::from_json_str(
            r#"{
                "propositions": ["murder"],
                "arguments": [
                    {"id": "arg1", "conclusion": "murder", "weight": 0.8},
                    {"id": "arg1", "conclusion": "-murder", "weight": 0.5}
                ]
            }"#,
        )
        .unwrap()
        .build()
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateArgumentId { .. }));
    }

    #[test]
    fn test_unknown_standard_is_rejected() {
        let err = CaseFile::from_json_str(
            r#"{
                "propositions": ["murder"],
                "proofstandards": [
                    {"proposition": "murder", "standard": "gut feeling"}
                ]
            }"#,
        )
        .unwrap()
        .build()
        .unwrap_err();
        match err {
            ConfigError::UnknownStandard { name } => assert_eq!(name, "gut feeling"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_threshold_out_of_range_is_rejected() {
        let err = CaseFile::from_json_str(
            r#"{
                "propositions": ["murder"],
                "parameters": {"alpha": 1.4}
            }"#,
        )
        .unwrap()
        .build()
        .unwrap_err();
        assert!(matches!(err, ConfigError::ThresholdOutOfRange { .. }));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = CaseFile::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_parameters_default_when_omitted() {
        let case = CaseFile::from_json_str(r#"{"propositions": ["murder"]}"#)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(case.thresholds, Thresholds::default());
    }
}
