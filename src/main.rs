use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use strips_planner::settings::{Format, Settings};
use strips_planner::strips::{Domain, Outcome, Planner, Problem, Report};

fn print_text(report: &Report) {
    match &report.outcome {
        Outcome::Found(plan) if plan.is_empty() => println!("Goal already holds in the initial state."),
        Outcome::Found(plan) => {
            for (i, step) in plan.iter().enumerate() {
                println!("{}. {}", i + 1, step);
            }
        }
        Outcome::Exhausted => println!("No plan exists."),
        Outcome::ResourceExhausted(limit) => println!("Search stopped: {:?} limit reached.", limit),
    }
    let stats = &report.stats;
    eprintln!("{} ground actions, {} states visited, {} expanded, {} duplicates",
        report.ground_actions, stats.visited, stats.expansions, stats.duplicates_suppressed);
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = Settings::new(&args).context("Invalid configuration, usage: strips-plan <domain> <problem> [--json]")?;

    let filter: EnvFilter = settings.logs.clone().try_into().context("Invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let domain = Domain::from_file(&settings.domain)
        .with_context(|| format!("Unable to load domain {}", settings.domain))?;
    let problem = Problem::from_file(&settings.problem)
        .with_context(|| format!("Unable to load problem {}", settings.problem))?;

    let report = Planner::with_limits(settings.limits).plan(&domain, &problem);
    match settings.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => print_text(&report),
    }

    match report.outcome {
        Outcome::Found(_) => Ok(()),
        Outcome::Exhausted => std::process::exit(1),
        Outcome::ResourceExhausted(_) => std::process::exit(2),
    }
}
