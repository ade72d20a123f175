//! Fixed evaluation rubrics, one per stage phase.
//!
//! Each rubric tells the evaluator what a strong stage of that phase looks
//! like across the six dimensions. The blocks are embedded verbatim into the
//! evaluation prompt.

use trek_core::StageType;

/// The rubric block for a stage phase.
#[must_use]
pub fn rubric_for(stage_type: StageType) -> &'static str {
    match stage_type {
        StageType::Orienting => {
            "An orienting stage frames the territory. Strong output states the goal \
             in its own words, names the major unknowns, bounds the scope explicitly, \
             and proposes where exploration should start. Weak output restates the \
             prompt or lists generic considerations."
        }
        StageType::Discovering => {
            "A discovering stage surfaces raw findings. Strong output reports several \
             distinct, concrete observations with enough detail that a later stage \
             could verify each one. Weak output offers broad summaries or a single \
             finding padded with commentary."
        }
        StageType::Deepening => {
            "A deepening stage drills into one finding. Strong output picks a specific \
             thread, follows it past the obvious first layer, and reports mechanisms \
             or causes rather than symptoms. Weak output revisits many findings \
             shallowly instead of one deeply."
        }
        StageType::Questioning => {
            "A questioning stage sharpens the unknowns. Strong output asks pointed, \
             answerable questions, states why each matters, and ranks them. Weak \
             output asks rhetorical or unanswerable questions."
        }
        StageType::Connecting => {
            "A connecting stage relates findings. Strong output draws explicit links \
             between earlier observations, noting where they reinforce or conflict. \
             Weak output lists findings side by side without relating them."
        }
        StageType::Synthesizing => {
            "A synthesizing stage combines findings into an account. Strong output \
             builds a coherent explanation that covers the major findings and flags \
             what the account still cannot explain. Weak output concatenates summaries."
        }
        StageType::Converging => {
            "A converging stage narrows to conclusions. Strong output commits to \
             specific conclusions or decisions, states the supporting evidence for \
             each, and names the alternatives it rejects. Weak output hedges on \
             every point."
        }
        StageType::Reflecting => {
            "A reflecting stage assesses the journey. Strong output judges what the \
             exploration achieved against its goal, identifies what was missed, and \
             recommends concrete next steps. Weak output is a progress recap."
        }
    }
}
