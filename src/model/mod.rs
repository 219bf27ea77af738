//! Core value types of the argumentation model.
//!
//! This module provides the data carried through evaluation: polarity-aware
//! proposition literals, arguments (conclusion, premises, exceptions,
//! weight), the audience (assumptions plus argument weights), the closed set
//! of proof standards, the per-proposition standard assignment, and the
//! alpha/beta/gamma evaluation thresholds.


use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

// ============================================================================
// PropLiteral
// ============================================================================

/// An atomic proposition with polarity.
///
/// Two literals are equal iff they have the same name and the same polarity;
/// a proposition and its negation are distinct values that hash differently,
/// so both are usable side by side as map keys and set elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropLiteral {
    name: String,
    polarity: bool,
}

impl PropLiteral {
    /// Create a positive literal with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            polarity: true,
        }
    }

    /// The bare proposition name, without any polarity prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the positive form of the proposition.
    pub fn polarity(&self) -> bool {
        self.polarity
    }

    /// Return a new literal with flipped polarity and the same name.
    ///
    /// Never mutates; `p.negate().negate() == p`.
    pub fn negate(&self) -> Self {
        Self {
            name: self.name.clone(),
            polarity: !self.polarity,
        }
    }
}

impl fmt::Display for PropLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.polarity {
            write!(f, "{}", self.name)
        } else {
            write!(f, "-{}", self.name)
        }
    }
}

// ============================================================================
// Argument
// ============================================================================

/// A defeasible argument: premises and exceptions supporting a conclusion.
///
/// Immutable once constructed; claim state during a dialogue is tracked by
/// the [`ArgumentGraph`](crate::graph::ArgumentGraph), not by the argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    /// Identifier, unique within one argument graph.
    id: String,
    conclusion: PropLiteral,
    premises: BTreeSet<PropLiteral>,
    exceptions: BTreeSet<PropLiteral>,
    weight: f64,
}

impl Argument {
    /// Create an argument for `conclusion` with no premises or exceptions
    /// and weight 0.0.
    pub fn new(id: impl Into<String>, conclusion: PropLiteral) -> Self {
        Self {
            id: id.into(),
            conclusion,
            premises: BTreeSet::new(),
            exceptions: BTreeSet::new(),
            weight: 0.0,
        }
    }

    /// Add a single premise.
    pub fn with_premise(mut self, premise: PropLiteral) -> Self {
        self.premises.insert(premise);
        self
    }

    /// Add several premises at once.
    pub fn with_premises(mut self, premises: impl IntoIterator<Item = PropLiteral>) -> Self {
        self.premises.extend(premises);
        self
    }

    /// Add a single exception.
    pub fn with_exception(mut self, exception: PropLiteral) -> Self {
        self.exceptions.insert(exception);
        self
    }

    /// Add several exceptions at once.
    pub fn with_exceptions(mut self, exceptions: impl IntoIterator<Item = PropLiteral>) -> Self {
        self.exceptions.extend(exceptions);
        self
    }

    /// Set the intrinsic weight. Expected to lie in [0, 1]; range-checked by
    /// the case-file reader and by [`Audience::new`].
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// The argument id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The conclusion this argument supports.
    pub fn conclusion(&self) -> &PropLiteral {
        &self.conclusion
    }

    /// The premises, in deterministic order.
    pub fn premises(&self) -> impl Iterator<Item = &PropLiteral> {
        self.premises.iter()
    }

    /// The exceptions, in deterministic order.
    pub fn exceptions(&self) -> impl Iterator<Item = &PropLiteral> {
        self.exceptions.iter()
    }

    /// Whether the argument carries any exceptions.
    pub fn has_exceptions(&self) -> bool {
        !self.exceptions.is_empty()
    }

    /// The intrinsic weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl fmt::Display for Argument {
    /// Render as `[p1, p2], ~[e1] => conclusion`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |set: &BTreeSet<PropLiteral>| {
            set.iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(
            f,
            "[{}], ~[{}] => {}",
            join(&self.premises),
            join(&self.exceptions),
            self.conclusion
        )
    }
}

// ============================================================================
// ProofStandard
// ============================================================================

/// The five proof standards, in increasing order of strictness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProofStandard {
    /// At least one applicable supporting argument suffices.
    #[default]
    Scintilla,
    /// The strongest applicable pro argument outweighs the strongest con.
    Preponderance,
    /// Pro strength clears the alpha floor and the pro/con gap clears beta.
    ClearAndConvincing,
    /// Clear-and-convincing, and con strength stays below gamma.
    BeyondReasonableDoubt,
    /// Evaluated as [`ProofStandard::Scintilla`]; accepted in input for
    /// compatibility, no stricter rule is defined for it.
    DialecticalValidity,
}

impl ProofStandard {
    /// Get the standard name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ProofStandard::Scintilla => "scintilla",
            ProofStandard::Preponderance => "preponderance",
            ProofStandard::ClearAndConvincing => "clear_and_convincing",
            ProofStandard::BeyondReasonableDoubt => "beyond_reasonable_doubt",
            ProofStandard::DialecticalValidity => "dialectical_validity",
        }
    }
}

impl fmt::Display for ProofStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProofStandard {
    type Err = String;

    /// Accepts both snake_case and the spelled-out input names
    /// (`"clear and convincing"`, `"beyond reasonable doubt"`,
    /// `"dialectical validity"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scintilla" => Ok(ProofStandard::Scintilla),
            "preponderance" => Ok(ProofStandard::Preponderance),
            "clear_and_convincing" | "clear and convincing" => {
                Ok(ProofStandard::ClearAndConvincing)
            }
            "beyond_reasonable_doubt" | "beyond reasonable doubt" => {
                Ok(ProofStandard::BeyondReasonableDoubt)
            }
            "dialectical_validity" | "dialectical validity" => {
                Ok(ProofStandard::DialecticalValidity)
            }
            _ => Err(format!("Unknown proof standard: {}", s)),
        }
    }
}

// ============================================================================
// StandardMap
// ============================================================================

/// Assignment of proof standards to propositions, with a default for any
/// unlisted proposition. Immutable after construction.
#[derive(Debug, Clone)]
pub struct StandardMap {
    default: ProofStandard,
    assignments: HashMap<PropLiteral, ProofStandard>,
}

impl StandardMap {
    /// Create an assignment where every proposition uses `default`.
    pub fn new(default: ProofStandard) -> Self {
        Self {
            default,
            assignments: HashMap::new(),
        }
    }

    /// Assign a specific standard to one proposition.
    pub fn with_standard(mut self, proposition: PropLiteral, standard: ProofStandard) -> Self {
        self.assignments.insert(proposition, standard);
        self
    }

    /// The standard a proposition must meet to be acceptable.
    pub fn standard_for(&self, proposition: &PropLiteral) -> ProofStandard {
        self.assignments
            .get(proposition)
            .copied()
            .unwrap_or(self.default)
    }

    /// The default standard for unlisted propositions.
    pub fn default_standard(&self) -> ProofStandard {
        self.default
    }
}

impl Default for StandardMap {
    /// Scintilla of evidence for every proposition.
    fn default() -> Self {
        Self::new(ProofStandard::Scintilla)
    }
}

// ============================================================================
// Audience
// ============================================================================

/// The audience: assumed propositions plus per-argument weights.
///
/// A pure value type; evaluation never mutates it.
#[derive(Debug, Clone, Default)]
pub struct Audience {
    assumptions: HashSet<PropLiteral>,
    weights: HashMap<String, f64>,
}

impl Audience {
    /// Build an audience, validating that every weight lies in [0, 1].
    pub fn new(
        assumptions: impl IntoIterator<Item = PropLiteral>,
        weights: impl IntoIterator<Item = (String, f64)>,
    ) -> ConfigResult<Self> {
        let weights: HashMap<String, f64> = weights.into_iter().collect();
        for (arg_id, weight) in &weights {
            if !(0.0..=1.0).contains(weight) {
                return Err(ConfigError::WeightOutOfRange {
                    arg_id: arg_id.clone(),
                    weight: *weight,
                });
            }
        }
        Ok(Self {
            assumptions: assumptions.into_iter().collect(),
            weights,
        })
    }

    /// Whether the audience assumes this literal to hold.
    pub fn is_assumed(&self, proposition: &PropLiteral) -> bool {
        self.assumptions.contains(proposition)
    }

    /// The weight the audience assigns to an argument, if any.
    pub fn weight_of(&self, arg_id: &str) -> Option<f64> {
        self.weights.get(arg_id).copied()
    }

    /// Iterate over the assumed literals.
    pub fn assumptions(&self) -> impl Iterator<Item = &PropLiteral> {
        self.assumptions.iter()
    }
}

// ============================================================================
// Thresholds
// ============================================================================

/// The alpha/beta/gamma evaluation thresholds.
///
/// alpha is the pro-strength floor for clear-and-convincing, beta the
/// pro/con gap floor for clear-and-convincing, and gamma the con-weight
/// ceiling for beyond-reasonable-doubt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Pro-strength floor (clear-and-convincing and stricter).
    pub alpha: f64,
    /// Pro/con weight-gap floor (clear-and-convincing and stricter).
    pub beta: f64,
    /// Con-strength ceiling (beyond-reasonable-doubt only).
    pub gamma: f64,
}

impl Thresholds {
    /// Build a threshold triple, validating that each lies in [0, 1].
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> ConfigResult<Self> {
        for (name, value) in [("alpha", alpha), ("beta", beta), ("gamma", gamma)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange {
                    name: name.to_string(),
                    value,
                });
            }
        }
        Ok(Self { alpha, beta, gamma })
    }
}

impl Default for Thresholds {
    /// alpha 0.4, beta 0.3, gamma 0.2.
    fn default() -> Self {
        Self {
            alpha: 0.4,
            beta: 0.3,
            gamma: 0.2,
        }
    }
}
