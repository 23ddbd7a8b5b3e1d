// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf, process::ExitCode};

use crate::commands::run::RunArgs;
use crate::core::models::EmptyFilter;
use crate::{commands, infra::t, select_locale};

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for `--lang <VALUE>` or `--lang=<VALUE>`.
fn pre_parse_language<I: IntoIterator<Item = String>>(args: I) -> Option<String> {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--lang" {
            return args.next();
        }
        if let Some(value) = arg.strip_prefix("--lang=") {
            return Some(value.to_string());
        }
    }
    None
}

pub fn build_cli(locale: &str) -> Command {
    Command::new("doctor-testerson")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .arg(
            Arg::new("targets")
                .help(t!("arg_targets", locale = locale).to_string())
                .value_name("TARGET")
                .required(true)
                .num_args(1..)
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help(t!("arg_verbose", locale = locale).to_string())
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("fail-fast")
                .short('f')
                .long("fail-fast")
                .help(t!("arg_fail_fast", locale = locale).to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("empty")
                .short('e')
                .long("empty")
                .help(t!("arg_empty", locale = locale).to_string())
                .action(ArgAction::SetTrue)
                .conflicts_with("no-empty"),
        )
        .arg(
            Arg::new("no-empty")
                .short('E')
                .long("no-empty")
                .help(t!("arg_no_empty", locale = locale).to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("panel")
                .short('p')
                .long("panel")
                .help(t!("arg_panel", locale = locale).to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help(t!("arg_config", locale = locale).to_string())
                .value_name("CONFIG")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("html")
                .long("html")
                .help(t!("arg_html", locale = locale).to_string())
                .value_name("HTML")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help(t!("arg_json", locale = locale).to_string())
                .value_name("JSON")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
}

/// Turns parsed matches into the arguments of the run command.
pub fn run_args(matches: &ArgMatches) -> RunArgs {
    let empty = if matches.get_flag("empty") {
        Some(true)
    } else if matches.get_flag("no-empty") {
        Some(false)
    } else {
        None
    };

    RunArgs {
        targets: matches
            .get_many::<String>("targets")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        verbose: matches.get_count("verbose"),
        fail_fast: matches.get_flag("fail-fast"),
        empty: EmptyFilter::from_flag(empty),
        panel: matches.get_flag("panel"),
        config: matches.get_one::<PathBuf>("config").cloned(),
        lang: matches.get_one::<String>("lang").cloned(),
        html: matches.get_one::<PathBuf>("html").cloned(),
        json: matches.get_one::<PathBuf>("json").cloned(),
    }
}

pub fn run() -> Result<ExitCode> {
    // Pre-parse language and initialize i18n first.
    let language = select_locale(pre_parse_language(env::args().skip(1)).as_deref());
    rust_i18n::set_locale(&language);

    let matches = match build_cli(&language).try_get_matches() {
        Ok(matches) => matches,
        Err(err) => {
            err.print()?;
            // Help and version go to stdout and are not errors.
            return Ok(if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            });
        }
    };

    commands::run::execute(run_args(&matches))
}
