// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use runtime::{ApiRuntime, DemoRuntime};
use std::env;
use std::path::PathBuf;
use time::OffsetDateTime;
use tours_app::{AppCommand, AppState};
use tours_tui::{AppRuntime, UiOptions};

const DEFAULT_LIST_WIDTH: usize = 80;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `tours --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    logging::init(config.log_level(), &config.log_path()?)?;

    let ui_options = UiOptions {
        show_image_urls: config.show_image_urls(),
    };

    if options.demo {
        tracing::info!("starting with demo tours");
        let mut runtime = DemoRuntime::default();
        return launch(&options, &mut runtime, ui_options);
    }

    let endpoint = options.url.clone().unwrap_or_else(|| config.endpoint());
    let client = tours_api::Client::new(&endpoint, config.timeout()?).with_context(|| {
        format!(
            "invalid [source] config in {}; fix url/timeout values or pass --url",
            options.config_path.display()
        )
    })?;
    tracing::info!(endpoint = client.endpoint(), timeout = ?client.timeout(), "starting");

    let mut runtime = ApiRuntime::new(client);
    launch(&options, &mut runtime, ui_options)
}

fn launch<R: AppRuntime>(options: &CliOptions, runtime: &mut R, ui_options: UiOptions) -> Result<()> {
    if options.check_only {
        return Ok(());
    }
    if options.list {
        return print_list(runtime, ui_options);
    }
    let mut state = AppState::default();
    tours_tui::run_app(&mut state, runtime, ui_options)
}

fn print_list<R: AppRuntime>(runtime: &mut R, ui_options: UiOptions) -> Result<()> {
    let mut state = AppState::default();
    state.dispatch(AppCommand::BeginLoad);
    let tours = runtime.fetch_tours().context("fetch tours")?;
    state.dispatch(AppCommand::LoadFinished {
        request_id: state.request_id,
        tours,
        fetched_at: OffsetDateTime::now_utc(),
    });

    let width = crossterm::terminal::size()
        .map(|(columns, _)| usize::from(columns))
        .unwrap_or(DEFAULT_LIST_WIDTH);
    print!("{}", tours_tui::render_plain(&state, width, ui_options));
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    url: Option<String>,
    print_config_path: bool,
    print_example: bool,
    demo: bool,
    list: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        url: None,
        print_config_path: false,
        print_example: false,
        demo: false,
        list: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--url" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--url requires an endpoint URL"))?;
                options.url = Some(value.as_ref().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--list" => {
                options.list = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("tours");
    println!("  --config <path>          Use a specific config path");
    println!("  --url <url>              Fetch tours from this endpoint");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Launch with built-in sample tours (no network)");
    println!("  --list                   Print the tour cards once and exit");
    println!("  --check                  Validate config + client setup");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args, print_list};
    use crate::runtime::DemoRuntime;
    use anyhow::Result;
    use std::path::PathBuf;
    use tours_tui::UiOptions;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/tours-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                url: None,
                print_config_path: false,
                print_example: false,
                demo: false,
                list: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_url_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--url", "http://localhost:8080/tours"],
            default_options_path(),
        )?;
        assert_eq!(options.url.as_deref(), Some("http://localhost:8080/tours"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse_cli_args(vec!["--url"], default_options_path())
            .expect_err("missing url value should fail");
        assert!(error.to_string().contains("--url requires an endpoint URL"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_mode_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--demo", "--list", "--check", "--print-example-config"],
            default_options_path(),
        )?;
        assert!(options.demo);
        assert!(options.list);
        assert!(options.check_only);
        assert!(options.print_example);
        assert!(!options.print_config_path);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }

    #[test]
    fn print_list_runs_against_demo_runtime() -> Result<()> {
        print_list(&mut DemoRuntime::default(), UiOptions::default())
    }
}
