//! Adversarial burden-of-proof dialogues.
//!
//! A [`Dialogue`] simulates the exchange between a proponent and a
//! respondent over an issue. Starting from an empty dialogue graph, the
//! parties alternately introduce arguments from the knowledge base: the
//! active party must first meet its burden of proof (the issue becomes
//! acceptable under a scintilla-of-evidence standard within the dialogue
//! graph), then the opposing party searches for a defeater, either an
//! argument establishing one of the claimed argument's exceptions or a
//! rebuttal of its conclusion. Each defeater opens a sub-issue and the
//! procedure recurses until the issue is decided or the argument pool is
//! exhausted.
//!
//! State (the growing dialogue graph, the turn counter, and the trace) is an
//! explicit struct threaded through the recursion, so a run is a pure
//! function of the knowledge base, the audience, and the standards.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{DialogueResult, EvalError, GraphError};
use crate::eval::Caes;
use crate::graph::{Actor, ArgumentGraph, NodeState};
use crate::model::{Argument, Audience, PropLiteral, StandardMap, Thresholds};

// ============================================================================
// Outcome types
// ============================================================================

/// Burden-of-proof status reported per turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurdenStatus {
    /// Not yet evaluated for this turn.
    Pending,
    /// The active party met its burden.
    Met,
    /// The active party failed to meet its burden.
    Unmet,
    /// No defeater exists; the burden question does not arise.
    Uncontested,
}

impl fmt::Display for BurdenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BurdenStatus::Pending => "?",
            BurdenStatus::Met => "met",
            BurdenStatus::Unmet => "unmet",
            BurdenStatus::Uncontested => "NA",
        };
        write!(f, "{}", s)
    }
}

/// How a dialogue ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// The issue became acceptable within the dialogue graph.
    Accepted,
    /// The active party could not meet its burden of proof.
    BurdenFailed,
    /// The pro-argument pool was exhausted without a decision.
    Unresolved,
    /// The knowledge base holds no argument pro the issue at all; the trace
    /// records a fallback evaluation over the full graph.
    InsufficientArguments,
}

impl Resolution {
    /// Get the resolution as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Accepted => "accepted",
            Resolution::BurdenFailed => "burden_failed",
            Resolution::Unresolved => "unresolved",
            Resolution::InsufficientArguments => "insufficient_arguments",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of one turn: who holds the burden, what has been argued so far,
/// and how the issue stands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Turn number (proponent takes the even turns).
    pub turn: u32,
    /// The party holding the burden of proof this turn.
    pub actor: Actor,
    /// The issue under discussion at this level of the dialogue.
    pub issue: String,
    /// Burden status at the time of the snapshot.
    pub burden: BurdenStatus,
    /// Rendered arguments present in the dialogue graph, in claim order.
    pub arguments: Vec<String>,
    /// Acceptability of the issue under the user's standards, if evaluable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_acceptable: Option<bool>,
    /// Acceptability of the top-level issue, when it differs from `issue`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_issue_acceptable: Option<bool>,
}

/// One entry of a dialogue trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceEvent {
    /// A per-turn snapshot.
    Turn(TurnRecord),
    /// A free-form progress line (sub-issues, support pulling, fallbacks).
    Note(String),
}

/// Ordered, human-renderable log of a dialogue run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogueTrace {
    events: Vec<TraceEvent>,
}

impl DialogueTrace {
    fn turn(&mut self, record: TurnRecord) {
        self.events.push(TraceEvent::Turn(record));
    }

    fn note(&mut self, line: String) {
        self.events.push(TraceEvent::Note(line));
    }

    /// Iterate over the recorded events in order.
    pub fn events(&self) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter()
    }

    /// The per-turn snapshots, skipping notes.
    pub fn turns(&self) -> impl Iterator<Item = &TurnRecord> {
        self.events.iter().filter_map(|e| match e {
            TraceEvent::Turn(record) => Some(record),
            TraceEvent::Note(_) => None,
        })
    }
}

impl fmt::Display for DialogueTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            match event {
                TraceEvent::Note(line) => writeln!(f, "{}", line)?,
                TraceEvent::Turn(record) => {
                    writeln!(f, "================== turn {} ==================", record.turn)?;
                    writeln!(f, "burden of proof @ {}", record.actor)?;
                    writeln!(f, "arguments:")?;
                    for argument in &record.arguments {
                        writeln!(f, "{}", argument)?;
                    }
                    writeln!(f, "-----------------------------------------")?;
                    writeln!(
                        f,
                        "burden of proof met by {}: {}",
                        record.actor, record.burden
                    )?;
                    if let Some(acceptable) = record.issue_acceptable {
                        writeln!(
                            f,
                            "issue \"{}\" acceptable? -> {}",
                            record.issue, acceptable
                        )?;
                    }
                    if let Some(acceptable) = record.top_issue_acceptable {
                        writeln!(f, "top issue acceptable? -> {}", acceptable)?;
                    }
                    writeln!(f, "============================================")?;
                }
            }
        }
        Ok(())
    }
}

/// Result of a dialogue run: the justification subgraph built turn by turn,
/// the trace, and the final resolution.
#[derive(Debug, Clone)]
pub struct DialogueOutcome {
    /// The top-level issue the dialogue was run for.
    pub issue: PropLiteral,
    /// How the dialogue ended.
    pub resolution: Resolution,
    /// Number of turns taken.
    pub turns: u32,
    /// The dialogue graph, consumable via
    /// [`ArgumentGraph::export`](crate::graph::ArgumentGraph::export).
    pub graph: ArgumentGraph,
    /// The ordered trace of the exchange.
    pub trace: DialogueTrace,
}

// ============================================================================
// Internal machinery
// ============================================================================

struct State {
    graph: ArgumentGraph,
    turn: u32,
    trace: DialogueTrace,
}

impl State {
    fn actor(&self) -> Actor {
        if self.turn % 2 == 0 {
            Actor::Proponent
        } else {
            Actor::Respondent
        }
    }
}

enum Advance {
    Accepted,
    Exhausted,
    BurdenFailed,
    Insufficient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefeaterKind {
    Exception,
    Rebuttal,
}

struct Defeater {
    argument: Argument,
    attacked: PropLiteral,
    kind: DefeaterKind,
}

// ============================================================================
// Dialogue
// ============================================================================

/// The adversarial turn-taking engine.
///
/// Borrows the knowledge-base graph read-only; each run builds and returns
/// its own dialogue graph, so independent dialogues over the same base can
/// run side by side.
#[derive(Debug, Clone)]
pub struct Dialogue<'a> {
    graph: &'a ArgumentGraph,
    audience: &'a Audience,
    standards: &'a StandardMap,
    thresholds: Thresholds,
}

impl<'a> Dialogue<'a> {
    /// Create a dialogue engine over a knowledge base.
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

    /// Run the dialogue for an issue to completion.
    pub fn run(&self, issue: &PropLiteral) -> DialogueResult<DialogueOutcome> {
        let mut state = State {
            graph: ArgumentGraph::new(),
            turn: 0,
            trace: DialogueTrace::default(),
        };

        let advance = self.advance(issue, issue, &mut state)?;
        let resolution = match advance {
            Advance::Accepted => Resolution::Accepted,
            Advance::BurdenFailed => Resolution::BurdenFailed,
            Advance::Exhausted => Resolution::Unresolved,
            Advance::Insufficient => Resolution::InsufficientArguments,
        };

        info!(
            issue = %issue,
            resolution = %resolution,
            turns = state.turn,
            arguments = state.graph.argument_count(),
            "dialogue completed"
        );

        Ok(DialogueOutcome {
            issue: issue.clone(),
            resolution,
            turns: state.turn,
            graph: state.graph,
            trace: state.trace,
        })
    }

    fn advance(
        &self,
        issue: &PropLiteral,
        top_issue: &PropLiteral,
        state: &mut State,
    ) -> DialogueResult<Advance> {
        loop {
            let mut pool = self.untried_pro_arguments(issue, &state.graph)?;
            let Some(best) = pool.pop() else {
                if state.graph.argument_count() == 0 {
                    let fallback = self.try_acceptable(self.graph, issue)?;
                    state.trace.note(format!(
                        "issue '{}' cannot be evaluated: insufficient arguments; \
                         full-graph acceptability: {}",
                        issue,
                        fallback.map_or_else(|| "unknown".to_string(), |b| b.to_string())
                    ));
                    return Ok(Advance::Insufficient);
                }
                state
                    .trace
                    .note(format!("no untried arguments remain pro '{}'", issue));
                return Ok(Advance::Exhausted);
            };

            let actor = state.actor();
            state
                .graph
                .add_argument(best.clone(), Some(NodeState::Claimed), Some(actor))?;
            info!(
                turn = state.turn,
                actor = %actor,
                arg_id = best.id(),
                issue = %issue,
                "argument claimed"
            );
            self.record_turn(issue, top_issue, BurdenStatus::Pending, state)?;

            let burden_met = self.burden_met(issue, &best, actor, state)?;
            let burden = if burden_met {
                BurdenStatus::Met
            } else {
                BurdenStatus::Unmet
            };
            self.record_turn(issue, top_issue, burden, state)?;
            if !burden_met {
                info!(actor = %actor, issue = %issue, "burden of proof not met");
                return Ok(Advance::BurdenFailed);
            }

            state.turn += 1;
            match self.find_best_defeater(&state.graph)? {
                None => {
                    state.trace.note(format!(
                        "no defeater found against '{}'; burden NA",
                        issue
                    ));
                    self.record_turn(issue, top_issue, BurdenStatus::Uncontested, state)?;
                    return Ok(Advance::Accepted);
                }
                Some(defeater) => {
                    state.graph.set_status(&defeater.attacked, NodeState::Questioned)?;
                    let sub_issue = defeater.argument.conclusion().clone();
                    state.trace.note(format!("sub-issue: '{}'", sub_issue));
                    debug!(
                        defeater = defeater.argument.id(),
                        attacked = %defeater.attacked,
                        rebuttal = (defeater.kind == DefeaterKind::Rebuttal),
                        "defeater found"
                    );

                    self.advance(&sub_issue, top_issue, state)?;

                    if self.try_acceptable(&state.graph, issue)? == Some(true) {
                        return Ok(Advance::Accepted);
                    }
                    // not acceptable yet: loop back for convergent support
                }
            }
        }
    }

    /// Arguments pro `issue` from the knowledge base that are not yet part
    /// of the dialogue graph, sorted ascending by weight so the heaviest
    /// pops last. Ties keep insertion order.
    fn untried_pro_arguments(
        &self,
        issue: &PropLiteral,
        dialogue_graph: &ArgumentGraph,
    ) -> DialogueResult<Vec<Argument>> {
        let mut pool: Vec<Argument> = self
            .graph
            .get_arguments(issue)?
            .into_iter()
            .filter(|a| !dialogue_graph.contains_argument(a.id()))
            .cloned()
            .collect();
        pool.sort_by(|a, b| {
            a.weight()
                .partial_cmp(&b.weight())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(pool)
    }

    /// Check the active party's burden of proof under a
    /// scintilla-of-evidence standard within the dialogue graph. While the
    /// burden is unmet, pull in knowledge-base arguments supporting the
    /// premises of the claimed argument (and, transitively, of each newly
    /// pulled argument); a duplicate addition counts as no new evidence.
    fn burden_met(
        &self,
        issue: &PropLiteral,
        argument: &Argument,
        actor: Actor,
        state: &mut State,
    ) -> DialogueResult<bool> {
        let scintilla = StandardMap::default();
        let mut frontier = vec![argument.clone()];

        loop {
            let caes = Caes::new(&state.graph, self.audience, &scintilla, self.thresholds);
            if caes.acceptable(issue)? {
                return Ok(true);
            }

            let mut added = Vec::new();
            for claimed in &frontier {
                for premise in claimed.premises() {
                    for support in self.graph.get_arguments(premise)? {
                        match state.graph.add_argument(
                            support.clone(),
                            Some(NodeState::Claimed),
                            Some(actor),
                        ) {
                            Ok(()) => {
                                state.trace.note(format!(
                                    "{} adds supporting argument {}: {}",
                                    actor,
                                    support.id(),
                                    support
                                ));
                                added.push(support.clone());
                            }
                            // already present: no new evidence from this one
                            Err(GraphError::DuplicateArgument { .. }) => continue,
                            Err(e) => return Err(e.into()),
                        }
                    }
                }
            }

            if added.is_empty() {
                return Ok(false);
            }
            frontier = added;
        }
    }

    /// Search for the best defeater against the currently claimed arguments:
    /// arguments establishing one of their exceptions, or con-arguments
    /// rebutting their conclusions. Both kinds compete simultaneously; the
    /// highest weight wins and ties break toward the rebuttal. Most recent
    /// claims are scanned first.
    fn find_best_defeater(
        &self,
        dialogue_graph: &ArgumentGraph,
    ) -> DialogueResult<Option<Defeater>> {
        let claimed = dialogue_graph.get_arguments_by_status(NodeState::Claimed);
        let mut best: Option<Defeater> = None;

        let consider = |best: &mut Option<Defeater>, candidate: Defeater| {
            let replace = match best {
                None => true,
                Some(current) => {
                    let weight = candidate.argument.weight();
                    let current_weight = current.argument.weight();
                    weight > current_weight
                        || (weight == current_weight
                            && candidate.kind == DefeaterKind::Rebuttal
                            && current.kind == DefeaterKind::Exception)
                }
            };
            if replace {
                *best = Some(candidate);
            }
        };

        for claim in claimed.iter().rev() {
            for exception in claim.exceptions() {
                for candidate in self.graph.get_arguments(exception)? {
                    if dialogue_graph.contains_argument(candidate.id()) {
                        continue;
                    }
                    consider(
                        &mut best,
                        Defeater {
                            argument: candidate.clone(),
                            attacked: claim.conclusion().clone(),
                            kind: DefeaterKind::Exception,
                        },
                    );
                }
            }
            for candidate in self.graph.get_arguments_con(claim.conclusion())? {
                if dialogue_graph.contains_argument(candidate.id()) {
                    continue;
                }
                consider(
                    &mut best,
                    Defeater {
                        argument: candidate.clone(),
                        attacked: claim.conclusion().clone(),
                        kind: DefeaterKind::Rebuttal,
                    },
                );
            }
        }

        Ok(best)
    }

    /// Acceptability under the user's standards, or `None` when the
    /// proposition is not (yet) part of the given graph.
    fn try_acceptable(
        &self,
        graph: &ArgumentGraph,
        proposition: &PropLiteral,
    ) -> DialogueResult<Option<bool>> {
        let caes = Caes::new(graph, self.audience, self.standards, self.thresholds);
        match caes.acceptable(proposition) {
            Ok(acceptable) => Ok(Some(acceptable)),
            Err(EvalError::Graph(GraphError::PropositionNotFound { .. })) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn record_turn(
        &self,
        issue: &PropLiteral,
        top_issue: &PropLiteral,
        burden: BurdenStatus,
        state: &mut State,
    ) -> DialogueResult<()> {
        let arguments = state.graph.arguments().map(|a| a.to_string()).collect();
        let issue_acceptable = self.try_acceptable(&state.graph, issue)?;
        let top_issue_acceptable = if top_issue != issue {
            self.try_acceptable(&state.graph, top_issue)?
        } else {
            None
        };
        state.trace.turn(TurnRecord {
            turn: state.turn,
            actor: state.actor(),
            issue: issue.to_string(),
            burden,
            arguments,
            issue_acceptable,
            top_issue_acceptable,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_argument_base() -> (ArgumentGraph, Audience, PropLiteral) {
        let murder = PropLiteral::new("murder");
        let kill = PropLiteral::new("kill");
        let mut graph = ArgumentGraph::new();
        graph
            .add_argument(
                Argument::new("arg1", murder.clone())
                    .with_premise(kill.clone())
                    .with_weight(0.8),
                None,
                None,
            )
            .unwrap();
        let audience = Audience::new([kill], [("arg1".to_string(), 0.8)]).unwrap();
        (graph, audience, murder)
    }

    #[test]
    fn test_uncontested_issue_is_accepted_in_one_turn() {
        let (graph, audience, murder) = single_argument_base();
        let standards = StandardMap::default();
        let dialogue = Dialogue::new(&graph, &audience, &standards, Thresholds::default());

        let outcome = dialogue.run(&murder).unwrap();
        assert_eq!(outcome.resolution, Resolution::Accepted);
        assert_eq!(outcome.turns, 1);
        assert_eq!(outcome.graph.argument_count(), 1);

        let last = outcome.trace.turns().last().unwrap();
        assert_eq!(last.burden, BurdenStatus::Uncontested);
    }

    #[test]
    fn test_unsupported_premise_fails_the_burden() {
        let claim = PropLiteral::new("claim");
        let basis = PropLiteral::new("basis");
        let mut graph = ArgumentGraph::new();
        graph
            .add_argument(
                Argument::new("arg1", claim.clone())
                    .with_premise(basis)
                    .with_weight(0.6),
                None,
                None,
            )
            .unwrap();
        let audience = Audience::new([], [("arg1".to_string(), 0.6)]).unwrap();
        let standards = StandardMap::default();
        let dialogue = Dialogue::new(&graph, &audience, &standards, Thresholds::default());

        let outcome = dialogue.run(&claim).unwrap();
        assert_eq!(outcome.resolution, Resolution::BurdenFailed);
        let last = outcome.trace.turns().last().unwrap();
        assert_eq!(last.burden, BurdenStatus::Unmet);
    }

    #[test]
    fn test_issue_without_arguments_is_insufficient() {
        let issue = PropLiteral::new("claim");
        let mut graph = ArgumentGraph::new();
        graph.add_proposition(issue.clone(), None);
        let audience = Audience::new([], []).unwrap();
        let standards = StandardMap::default();
        let dialogue = Dialogue::new(&graph, &audience, &standards, Thresholds::default());

        let outcome = dialogue.run(&issue).unwrap();
        assert_eq!(outcome.resolution, Resolution::InsufficientArguments);
        assert_eq!(outcome.turns, 0);
        assert!(outcome.graph.is_empty());
    }

    #[test]
    fn test_burden_check_pulls_supporting_arguments() {
        // claim rests on a premise that is itself supported by the base
        let claim = PropLiteral::new("claim");
        let basis = PropLiteral::new("basis");
        let evidence = PropLiteral::new("evidence");
        let mut graph = ArgumentGraph::new();
        graph
            .add_argument(
                Argument::new("arg1", claim.clone())
                    .with_premise(basis.clone())
                    .with_weight(0.6),
                None,
                None,
            )
            .unwrap();
        graph
            .add_argument(
                Argument::new("arg2", basis)
                    .with_premise(evidence.clone())
                    .with_weight(0.5),
                None,
                None,
            )
            .unwrap();
        let audience = Audience::new(
            [evidence],
            [("arg1".to_string(), 0.6), ("arg2".to_string(), 0.5)],
        )
        .unwrap();
        let standards = StandardMap::default();
        let dialogue = Dialogue::new(&graph, &audience, &standards, Thresholds::default());

        let outcome = dialogue.run(&claim).unwrap();
        assert_eq!(outcome.resolution, Resolution::Accepted);
        // the support for the premise was pulled into the dialogue graph
        assert!(outcome.graph.contains_argument("arg2"));
        assert_eq!(outcome.graph.argument_count(), 2);
    }

    #[test]
    fn test_rebuttal_ties_prefer_rebuttal_over_exception() {
        let claim = PropLiteral::new("claim");
        let shaky = PropLiteral::new("shaky");
        let mut graph = ArgumentGraph::new();
        graph
            .add_argument(
                Argument::new("pro", claim.clone())
                    .with_exception(shaky.clone())
                    .with_weight(0.5),
                None,
                None,
            )
            .unwrap();
        graph
            .add_argument(
                Argument::new("undercut", shaky).with_weight(0.7),
                None,
                None,
            )
            .unwrap();
        graph
            .add_argument(
                Argument::new("rebut", claim.negate()).with_weight(0.7),
                None,
                None,
            )
            .unwrap();
        let audience = Audience::new(
            [],
            [
                ("pro".to_string(), 0.5),
                ("undercut".to_string(), 0.7),
                ("rebut".to_string(), 0.7),
            ],
        )
        .unwrap();
        let standards = StandardMap::default();
        let dialogue = Dialogue::new(&graph, &audience, &standards, Thresholds::default());

        let mut state = State {
            graph: ArgumentGraph::new(),
            turn: 0,
            trace: DialogueTrace::default(),
        };
        let pro = graph.get_arguments(&claim).unwrap()[0].clone();
        state
            .graph
            .add_argument(pro, Some(NodeState::Claimed), Some(Actor::Proponent))
            .unwrap();

        let defeater = dialogue.find_best_defeater(&state.graph).unwrap().unwrap();
        assert_eq!(defeater.argument.id(), "rebut");
        assert_eq!(defeater.kind, DefeaterKind::Rebuttal);
    }

    #[test]
    fn test_heavier_exception_defeater_wins() {
        let claim = PropLiteral::new("claim");
        let shaky = PropLiteral::new("shaky");
        let mut graph = ArgumentGraph::new();
        graph
            .add_argument(
                Argument::new("pro", claim.clone())
                    .with_exception(shaky.clone())
                    .with_weight(0.5),
                None,
                None,
            )
            .unwrap();
        graph
            .add_argument(
                Argument::new("undercut", shaky).with_weight(0.9),
                None,
                None,
            )
            .unwrap();
        graph
            .add_argument(
                Argument::new("rebut", claim.negate()).with_weight(0.4),
                None,
                None,
            )
            .unwrap();
        let audience = Audience::new(
            [],
            [
                ("pro".to_string(), 0.5),
                ("undercut".to_string(), 0.9),
                ("rebut".to_string(), 0.4),
            ],
        )
        .unwrap();
        let standards = StandardMap::default();
        let dialogue = Dialogue::new(&graph, &audience, &standards, Thresholds::default());

        let mut state = State {
            graph: ArgumentGraph::new(),
            turn: 0,
            trace: DialogueTrace::default(),
        };
        let pro = graph.get_arguments(&claim).unwrap()[0].clone();
        state
            .graph
            .add_argument(pro, Some(NodeState::Claimed), Some(Actor::Proponent))
            .unwrap();

        let defeater = dialogue.find_best_defeater(&state.graph).unwrap().unwrap();
        assert_eq!(defeater.argument.id(), "undercut");
        assert_eq!(defeater.kind, DefeaterKind::Exception);
    }
}
