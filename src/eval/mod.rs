//! CAES acceptability evaluation.
//!
//! A [`Caes`] binds one argument graph, an audience, a standard assignment,
//! and the alpha/beta/gamma thresholds, and answers two mutually recursive
//! questions: whether an argument is *applicable* (premises hold, exceptions
//! do not) and whether a proposition is *acceptable* (its assigned proof
//! standard is met). Evaluators are cheap to construct and are built fresh
//! for each evaluation context; nothing is mutated.
//!
//! The recursion carries an explicit set of propositions currently under
//! evaluation. A proposition re-entered while still on that path means the
//! support relation is cyclic, which is reported as
//! [`EvalError::CycleDetected`] instead of recursing unboundedly.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{EvalError, EvalResult};
use crate::graph::ArgumentGraph;
use crate::model::{Argument, Audience, PropLiteral, ProofStandard, StandardMap, Thresholds};

/// A Carneades argument evaluation structure.
#[derive(Debug, Clone)]
pub struct Caes<'a> {
    graph: &'a ArgumentGraph,
    audience: &'a Audience,
    standards: &'a StandardMap,
    thresholds: Thresholds,
}

impl<'a> Caes<'a> {
    /// Bind an evaluator to a graph, audience, standard assignment, and
    /// thresholds.
    pub fn new(
        graph: &'a ArgumentGraph,
        audience: &'a Audience,
        standards: &'a StandardMap,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            graph,
            audience,
            standards,
            thresholds,
        }
    }

    /// Whether an argument must be taken into account: every premise is
    /// assumed or acceptable (and not assumed false), and no exception is
    /// assumed or acceptable.
    pub fn applicable(&self, argument: &Argument) -> EvalResult<bool> {
        self.applicable_guarded(argument, &mut HashSet::new())
    }

    /// Whether a proposition meets its assigned proof standard.
    pub fn acceptable(&self, proposition: &PropLiteral) -> EvalResult<bool> {
        self.acceptable_guarded(proposition, &mut HashSet::new())
    }

    /// Whether a proposition meets a specific proof standard, regardless of
    /// the one assigned to it.
    pub fn meets_standard(
        &self,
        proposition: &PropLiteral,
        standard: ProofStandard,
    ) -> EvalResult<bool> {
        self.meets_standard_guarded(proposition, standard, &mut HashSet::new())
    }

    /// The maximum weight over applicable arguments pro the proposition,
    /// or 0.0 when there are none.
    pub fn max_weight_pro(&self, proposition: &PropLiteral) -> EvalResult<f64> {
        self.max_weight_pro_guarded(proposition, &mut HashSet::new())
    }

    /// The maximum weight over applicable arguments con the proposition,
    /// or 0.0 when there are none.
    pub fn max_weight_con(&self, proposition: &PropLiteral) -> EvalResult<f64> {
        self.max_weight_pro_guarded(&proposition.negate(), &mut HashSet::new())
    }

    /// The weight the audience assigns to an argument.
    pub fn weight_of(&self, argument: &Argument) -> EvalResult<f64> {
        self.audience
            .weight_of(argument.id())
            .ok_or_else(|| EvalError::MissingWeight {
                arg_id: argument.id().to_string(),
            })
    }

    fn applicable_guarded(
        &self,
        argument: &Argument,
        in_progress: &mut HashSet<PropLiteral>,
    ) -> EvalResult<bool> {
        debug!(arg_id = %argument.id(), "checking applicability");

        for premise in argument.premises() {
            if self.audience.is_assumed(premise) {
                continue;
            }
            if self.audience.is_assumed(&premise.negate()) {
                debug!(arg_id = %argument.id(), premise = %premise, "premise assumed false");
                return Ok(false);
            }
            if !self.acceptable_guarded(premise, in_progress)? {
                debug!(arg_id = %argument.id(), premise = %premise, "premise not acceptable");
                return Ok(false);
            }
        }

        for exception in argument.exceptions() {
            if self.audience.is_assumed(exception) {
                debug!(arg_id = %argument.id(), exception = %exception, "exception assumed");
                return Ok(false);
            }
            if self.audience.is_assumed(&exception.negate()) {
                continue;
            }
            if self.acceptable_guarded(exception, in_progress)? {
                debug!(arg_id = %argument.id(), exception = %exception, "exception acceptable");
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn acceptable_guarded(
        &self,
        proposition: &PropLiteral,
        in_progress: &mut HashSet<PropLiteral>,
    ) -> EvalResult<bool> {
        if !in_progress.insert(proposition.clone()) {
            return Err(EvalError::CycleDetected {
                proposition: proposition.to_string(),
            });
        }
        let standard = self.standards.standard_for(proposition);
        debug!(proposition = %proposition, standard = %standard, "checking acceptability");
        let result = self.meets_standard_guarded(proposition, standard, in_progress);
        in_progress.remove(proposition);
        result
    }

    fn meets_standard_guarded(
        &self,
        proposition: &PropLiteral,
        standard: ProofStandard,
        in_progress: &mut HashSet<PropLiteral>,
    ) -> EvalResult<bool> {
        match standard {
            // dialectical validity has no stricter rule of its own and is
            // evaluated as scintilla
            ProofStandard::Scintilla | ProofStandard::DialecticalValidity => {
                for argument in self.graph.get_arguments(proposition)? {
                    if self.applicable_guarded(argument, in_progress)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            ProofStandard::Preponderance => {
                let pro = self.max_weight_pro_guarded(proposition, in_progress)?;
                let con = self.max_weight_pro_guarded(&proposition.negate(), in_progress)?;
                Ok(pro > con)
            }
            ProofStandard::ClearAndConvincing => {
                let pro = self.max_weight_pro_guarded(proposition, in_progress)?;
                let con = self.max_weight_pro_guarded(&proposition.negate(), in_progress)?;
                debug!(
                    proposition = %proposition,
                    max_weight_pro = pro,
                    max_weight_con = con,
                    alpha = self.thresholds.alpha,
                    beta = self.thresholds.beta,
                    "clear-and-convincing check"
                );
                Ok(pro > self.thresholds.alpha && (pro - con) > self.thresholds.beta)
            }
            ProofStandard::BeyondReasonableDoubt => {
                let clear = self.meets_standard_guarded(
                    proposition,
                    ProofStandard::ClearAndConvincing,
                    in_progress,
                )?;
                let con = self.max_weight_pro_guarded(&proposition.negate(), in_progress)?;
                Ok(clear && con < self.thresholds.gamma)
            }
        }
    }

    fn max_weight_pro_guarded(
        &self,
        proposition: &PropLiteral,
        in_progress: &mut HashSet<PropLiteral>,
    ) -> EvalResult<f64> {
        let mut max_weight: f64 = 0.0;
        for argument in self.graph.get_arguments(proposition)? {
            if self.applicable_guarded(argument, in_progress)? {
                max_weight = max_weight.max(self.weight_of(argument)?);
            }
        }
        Ok(max_weight)
    }
}
