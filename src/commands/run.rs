// src/commands/run.rs

use anyhow::Result;
use colored::*;
use std::{path::PathBuf, process::ExitCode};
use tracing::{debug, info};

use crate::{
    core::{
        aggregate::{aggregate, filter},
        config::{resolve_config, DoctorConfig},
        models::{EmptyFilter, RunResult, Totals},
        ComparisonOptions, ExampleEngine, TargetClassifier, TargetRunner,
    },
    infra::{
        clock::MonotonicClock,
        loader::{ChainLoader, Registry, SourceLoader},
        logging::init_logging,
        t,
    },
    reporting::{
        generate_html_report, generate_json_report, print_failed_fast, print_failure_details,
        print_header_panel, print_summary,
    },
    select_locale,
};

/// Everything the run command needs from the command line.
/// 运行命令所需的全部命令行参数。
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub targets: Vec<String>,
    pub verbose: u8,
    pub fail_fast: bool,
    pub empty: EmptyFilter,
    pub panel: bool,
    pub config: Option<PathBuf>,
    pub lang: Option<String>,
    pub html: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

pub fn execute(args: RunArgs) -> Result<ExitCode> {
    init_logging(args.verbose);

    let config = resolve_config(args.config.as_deref())?;
    if args.lang.is_none() {
        if let Some(language) = &config.language {
            rust_i18n::set_locale(&select_locale(Some(language)));
        }
    }
    debug!(?config, "configuration resolved");

    let options = config.comparison_options(args.fail_fast);
    let results = run_all(&config, &args.targets, &options, args.panel)?;

    print_failure_details(&results);

    let failed_fast = options.fail_fast && results.iter().any(RunResult::has_failures);
    let shown = filter(results, args.empty);
    let totals = aggregate(&shown);
    info!(
        targets = totals.targets,
        attempted = totals.attempted,
        failed = totals.failed,
        errored = totals.errored,
        "run finished"
    );

    write_reports(&shown, &totals, &args);

    if failed_fast {
        print_failed_fast();
        return Ok(ExitCode::FAILURE);
    }

    print_summary(&shown, &totals);
    Ok(ExitCode::SUCCESS)
}

fn run_all(
    config: &DoctorConfig,
    targets: &[String],
    options: &ComparisonOptions,
    panel: bool,
) -> Result<Vec<RunResult>> {
    let extensions = config.source_extensions.clone();
    let classifier = TargetClassifier::new(extensions.clone());
    let loader = ChainLoader::new()
        .with(Registry::with_builtins().with_step_limit(config.step_limit))
        .with(SourceLoader::new(config.expanded_search_paths()?, extensions).with_step_limit(config.step_limit));
    let clock = MonotonicClock;
    let engine = ExampleEngine::new(&loader, &clock).with_step_limit(config.step_limit);
    let runner = TargetRunner::new(&classifier, engine, &clock);

    if panel {
        print_header_panel(targets);
    }

    info!(count = targets.len(), fail_fast = options.fail_fast, "running targets");
    Ok(runner.run_targets(targets, options))
}

fn write_reports(results: &[RunResult], totals: &Totals, args: &RunArgs) {
    if let Some(report_path) = &args.html {
        println!("\n{}", t!("generating_html_report", path = report_path.display()));
        if let Err(e) = generate_html_report(results, totals, report_path) {
            eprintln!("{} {:#}", t!("html_report_failed").red(), e);
        }
    }
    if let Some(report_path) = &args.json {
        println!("\n{}", t!("generating_json_report", path = report_path.display()));
        if let Err(e) = generate_json_report(results, totals, report_path) {
            eprintln!("{} {:#}", t!("json_report_failed").red(), e);
        }
    }
}
