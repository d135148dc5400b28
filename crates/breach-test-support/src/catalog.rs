//! A small two-scenario catalog with every classification case covered.

use breach_content::domain::catalog::ScenarioCatalog;

/// YAML source of [`fixture_catalog`].
///
/// `triage` has one choice in each of the safety/oversight, risk, and
/// unclassified buckets; `allocation` covers the alignment and diplomacy
/// categories.
pub const FIXTURE_CATALOG_YAML: &str = r"
scenarios:
  - id: triage
    title: Alert Triage
    description: A monitoring model flags a suspicious login burst.
    category: oversight
    difficulty: beginner
    situation: The model proposes locking every account in the region.
    context: Thousands of legitimate users would be affected.
    note: Automated responses should stay reviewable.
    ai_recommendation:
      action: Lock all regional accounts
      reasoning: Burst pattern matches a known credential-stuffing campaign
      confidence: 0.82
      potential_risks:
        - Locks out legitimate users
      alignment_issues:
        - Optimizes for blocking, not for user impact
    choices:
      - id: pause_review
        text: Pause and have an analyst review
        category: oversight
        educational_weight: high
        consequence: Keeps a human in the decision
      - id: auto_block
        text: Let the model block automatically
        category: automation
        educational_weight: medium
        consequence: Fast, but nobody checks the blast radius
      - id: ignore_alert
        text: Dismiss the alert
        category: dismissal
        educational_weight: low
        consequence: The attack may continue unchecked
      - id: log_only
        text: Log the alert for later
        category: monitoring
        educational_weight: medium
        consequence: Nothing happens yet
    safety_choice_ids: [pause_review]
    oversight_choice_ids: [pause_review]
    risk_choice_ids: [auto_block, ignore_alert]
    objectives:
      - id: keep_human_in_loop
        title: Keep a human in the loop
        description: Review automated actions before they take effect
        trigger_choice_ids: [pause_review]
  - id: allocation
    title: Bandwidth Allocation
    description: A scheduler wants to starve a low-priority service.
    category: alignment
    difficulty: intermediate
    situation: The scheduler's objective ignores a safety-critical consumer.
    context: The objective is misspecified.
    choices:
      - id: question_objective
        text: Question the scheduler's objective
        category: alignment
        educational_weight: high
        consequence: Exposes the misspecified objective
      - id: accept_plan
        text: Accept the plan
        category: automation
        educational_weight: low
        consequence: The critical consumer is starved
      - id: negotiate
        text: Negotiate a split with the service owners
        category: diplomacy
        educational_weight: medium
        consequence: A compromise is reached
    safety_choice_ids: [question_objective]
    oversight_choice_ids: [question_objective, negotiate]
    risk_choice_ids: [accept_plan]
    objectives:
      - id: spot_misalignment
        title: Spot misalignment
        description: Notice when an objective diverges from intent
        trigger_choice_ids: [question_objective]
";

/// Builds the fixture catalog.
///
/// # Panics
///
/// Panics if [`FIXTURE_CATALOG_YAML`] fails validation.
#[must_use]
pub fn fixture_catalog() -> ScenarioCatalog {
    ScenarioCatalog::from_yaml(FIXTURE_CATALOG_YAML).expect("fixture catalog is valid")
}
