//! paramfeed CLI entry point

use anyhow::{Context, Result};
use paramfeed::config::cli::{Cli, ExecutionMode};
use paramfeed::config::{toml, validator, PlanConfig, ProviderConfig};
use paramfeed::output::{json, text, PreviewReport, PreviewRow};
use paramfeed::{CallerId, ParameterSet, ProviderRegistry};
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.debug);
    cli.validate()?;

    let plan = load_plan(&cli)?;

    match cli.mode {
        ExecutionMode::Preview => run_preview(&cli, &plan),
        ExecutionMode::Validate => run_validate(&cli, &plan),
        ExecutionMode::Distribute => run_distribute(&cli, &plan),
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Read and validate the parameter plan
fn load_plan(cli: &Cli) -> Result<PlanConfig> {
    let plan = toml::parse_toml_file(&cli.plan)?;
    validator::validate_plan(&plan).context("Configuration validation failed")?;

    let callers = cli.effective_callers() as u64;
    for provider in &plan.parameters {
        if let ProviderConfig::Username(username) = provider {
            validator::validate_usernames_for_callers(username, callers)?;
        }
    }

    debug!(plan = %cli.plan.display(), parameters = plan.parameters.len(), "loaded plan");
    Ok(plan)
}

fn build_set(plan: &PlanConfig) -> Result<ParameterSet> {
    let start = Instant::now();
    let set = ParameterSet::from_configs(&plan.parameters, &ProviderRegistry::with_builtins())
        .context("Failed to initialize data providers")?;
    info!(
        parameters = set.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "initialized parameter set"
    );
    Ok(set)
}

/// Build every provider and report the plan
fn run_validate(cli: &Cli, plan: &PlanConfig) -> Result<()> {
    build_set(plan)?;

    text::print_plan(plan);
    println!();
    println!("{}: configuration validated successfully", cli.plan.display());
    Ok(())
}

/// Simulate callers resolving the plan
fn run_preview(cli: &Cli, plan: &PlanConfig) -> Result<()> {
    let set = build_set(plan)?;
    let callers = cli.effective_callers();
    let invocations = cli.invocations;

    let parameters = set.names().into_iter().map(String::from).collect();
    let mut report = PreviewReport::new(parameters, callers, invocations);

    report.rows = std::thread::scope(|scope| {
        let handles: Vec<_> = (1..=callers as u64)
            .map(|id| {
                let set = &set;
                scope.spawn(move || {
                    let caller = CallerId(id);
                    (0..invocations)
                        .map(|invocation| match set.resolve(caller) {
                            Ok(values) => PreviewRow {
                                caller,
                                invocation,
                                values,
                                error: None,
                            },
                            Err(e) => PreviewRow {
                                caller,
                                invocation,
                                values: Vec::new(),
                                error: Some(e.to_string()),
                            },
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| anyhow::anyhow!("preview caller thread panicked"))
            })
            .collect::<Result<Vec<_>>>()
    })?
    .into_iter()
    .flatten()
    .collect();
    report.sort();

    if let Some(path) = &cli.json_output {
        json::write_json_output(path, &report, true)?;
        println!("JSON preview written to {}", path.display());
    } else if cli.json {
        println!("{}", json::preview_to_json(&report, true)?);
    } else {
        text::print_preview(&report);
    }

    let errors = report.errors();
    if errors > 0 {
        anyhow::bail!("{} of {} invocations failed to resolve", errors, report.rows.len());
    }
    Ok(())
}

/// Print one plan per agent
fn run_distribute(cli: &Cli, plan: &PlanConfig) -> Result<()> {
    let plans = plan.distribute(cli.agents)?;

    for (agent, agent_plan) in plans.iter().enumerate() {
        if agent > 0 {
            println!();
        }
        println!("# agent {} of {}", agent + 1, plans.len());
        print!("{}", toml::to_toml_string(agent_plan)?);
    }
    Ok(())
}
