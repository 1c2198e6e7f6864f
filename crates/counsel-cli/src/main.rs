//! Counsel CLI - drive the decision pipeline from the command line.

use anyhow::Context;
use clap::Parser;
use counsel_core::{
    Action, AdviceDraft, CounselConfig, DecisionCore, DecisionState, WillOperator,
};
use serde_json::json;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "counsel")]
#[command(about = "Counsel - proof-gated advisory decisions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run the example decision through the full pipeline
    Demo,
    /// Check a JSON configuration file for validity
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "config/counsel.json")]
        config: String,
    },
    /// Show pipeline readiness
    Status,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    match cli.command {
        Some(Commands::Demo) => demo()?,
        Some(Commands::Check { config }) => {
            let raw = std::fs::read_to_string(&config)
                .with_context(|| format!("reading {config}"))?;
            let parsed: CounselConfig = serde_json::from_str(&raw)?;
            parsed.validate().map_err(anyhow::Error::msg)?;
            println!("Config OK: {config}");
        }
        Some(Commands::Status) => {
            println!("Counsel pipeline: READY");
        }
        None => {
            println!("Counsel v0.1.0 - Use --help for commands");
        }
    }

    Ok(())
}

/// The org-scope inbox-triage example: a draft under the Expansion
/// operator, three candidate moves, full twin cross-check.
fn demo() -> anyhow::Result<()> {
    let core = DecisionCore::new(CounselConfig::default())?;

    let draft = AdviceDraft::new(
        format!("plan:{}", Uuid::new_v4()),
        "Should we enable autonomous inbox triage for the org?",
    )
    .with_plan(json!({
        "data_kind": "personal",
        "deployment_scope": "org",
        "automation_level": "agentic",
        "budget_lines": {"privacy": 0.9, "safety": 0.8, "technical_debt": 0.6},
        "rollback_recipe": "kill-switch + throttle + data quarantine"
    }))
    .with_params(json!({"will": "Expansion", "no_image": true}))
    .with_context(json!({"consent": {"valid": true, "scope": "org"}}));

    let state = DecisionState::new("S5", WillOperator::Expansion)
        .with_context(draft.context.clone());

    let candidates = vec![
        Action::new("a1", "Scale with mitigation A").with_params(json!({
            "scale": 2.0, "coverage": 0.9, "externality_priced": true,
            "risk": 0.2, "rollback_recipe": "flag off", "expected_gain": 0.3
        })),
        Action::new("a2", "Scale with mitigation B").with_params(json!({
            "scale": 1.5, "coverage": 0.8, "externality_priced": true,
            "risk": 0.3, "rollback_recipe": "flag off", "expected_gain": 0.25
        })),
        Action::new("a3", "Postpone and run a pilot").with_params(json!({
            "pilot": true, "coverage": 0.7, "risk": 0.1,
            "rollback_recipe": "stop pilot", "expected_gain": 0.15,
            "reversible_micro_move": true
        })),
    ];

    let result = core.decide(&draft, &state, &candidates)?;
    println!("Verdict:    {}", result.verdict);
    if let Some(action) = &result.chosen_action {
        println!("Action:     {} ({})", action.description, action.id);
    }
    if let (Some(cost), Some(coherence)) = (result.effective_cost, result.coherence) {
        println!("Cost:       {cost:.4}");
        println!("Coherence:  {coherence:.4}");
    }
    if let Some(warning) = &result.persistence_warning {
        println!("Warning:    {warning}");
    }

    let twin = core.contemplate(&draft, "Enable, but gate with reversible micro-moves.")?;
    println!("Twin:       {:?}", twin.selection);
    println!("  primary risk {:.4}, counter risk {:.4}", twin.rationale.primary_risk, twin.rationale.counter_risk);
    println!("  {}", twin.rationale.note);

    Ok(())
}
