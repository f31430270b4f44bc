//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves settings and sets up logging
//! - dispatches to the TUI or to a one-shot CLI command

use chrono::Local;
use clap::Parser;

use crate::cli::{AskArgs, Command, ConnArgs, CostsArgs, SalesArgs, SourceArgs, TuiArgs};
use crate::config::Settings;
use crate::data::DashboardClient;
use crate::error::AppError;

pub mod pipeline;

use pipeline::SalesSource;

/// Entry point for the `dash` binary.
pub fn run() -> Result<(), AppError> {
    // We want `dash` and `dash --demo` to behave like `dash tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Status(conn) => handle_status(&conn),
        Command::Sales(args) => handle_sales(args),
        Command::Costs(args) => handle_costs(args),
        Command::Overview => handle_overview(),
        Command::Ask(args) => handle_ask(args),
        Command::Refresh(conn) => handle_refresh(&conn),
        Command::Categories(conn) => handle_categories(&conn),
    }
}

fn settings_for(conn: &ConnArgs) -> Result<Settings, AppError> {
    Settings::from_env()?.with_overrides(conn.api_base.as_deref(), conn.timeout)
}

fn client_for(conn: &ConnArgs) -> Result<DashboardClient, AppError> {
    DashboardClient::new(settings_for(conn)?)
}

pub fn source_from_args(args: &SourceArgs) -> SalesSource {
    if args.demo {
        SalesSource::demo(args.seed, args.months, Local::now().date_naive())
    } else {
        SalesSource::Backend
    }
}

fn handle_tui(args: TuiArgs) -> Result<(), AppError> {
    let settings = settings_for(&args.conn)?;
    crate::logging::init_file(&settings.log_file)?;

    let client = DashboardClient::new(settings)?;
    crate::tui::run(client, source_from_args(&args.source), args.range)
}

fn handle_status(conn: &ConnArgs) -> Result<(), AppError> {
    crate::logging::init_stderr();
    let client = client_for(conn)?;
    let status = client.status()?;
    print!("{}", crate::report::format_status(&status, client.api_base()));

    if status.is_connected() {
        Ok(())
    } else {
        Err(AppError::runtime(format!(
            "Connection failed: backend reports status '{}'.",
            status.status
        )))
    }
}

fn handle_sales(args: SalesArgs) -> Result<(), AppError> {
    crate::logging::init_stderr();
    let client = client_for(&args.conn)?;
    let source = source_from_args(&args.source);

    let series = pipeline::load_sales(&source, &client)?;
    let window = series.window(args.range);
    print!(
        "{}",
        crate::report::format_sales_report(window.buckets, &window.summary, window.range)
    );

    if let Some(path) = &args.export {
        crate::io::write_sales_export(path, window.buckets, &window.summary, window.range)?;
    }
    Ok(())
}

fn handle_costs(args: CostsArgs) -> Result<(), AppError> {
    let panel = crate::data::mock::cost_panel(args.view);
    print!("{}", crate::report::format_cost_panel(&panel));
    Ok(())
}

fn handle_overview() -> Result<(), AppError> {
    let cards = crate::data::mock::stat_cards(&crate::data::mock::OVERVIEW);
    print!("{}", crate::report::format_overview(&cards));
    Ok(())
}

fn handle_ask(args: AskArgs) -> Result<(), AppError> {
    crate::logging::init_stderr();
    let joined = args.question.join(" ");
    let question = pipeline::validate_question(&joined)?;
    let client = client_for(&args.conn)?;

    let answer = client.ask(question).map_err(|e| {
        tracing::error!(endpoint = e.endpoint(), error = %e, "question failed");
        AppError::runtime(format!("AI analysis failed: {e}"))
    })?;
    println!("{answer}");
    Ok(())
}

fn handle_refresh(conn: &ConnArgs) -> Result<(), AppError> {
    crate::logging::init_stderr();
    let client = client_for(conn)?;
    client.trigger_refresh().map_err(|e| {
        tracing::error!(endpoint = e.endpoint(), error = %e, "refresh failed");
        AppError::runtime(format!("Refresh failed: {e}"))
    })?;
    println!("Data refreshed.");
    Ok(())
}

fn handle_categories(conn: &ConnArgs) -> Result<(), AppError> {
    crate::logging::init_stderr();
    let client = client_for(conn)?;
    let categories = client.categories()?;
    print!("{}", crate::report::format_categories(&categories));
    Ok(())
}

/// Rewrite argv so `dash` defaults to `dash tui`.
///
/// Rules:
/// - `dash`                       -> `dash tui`
/// - `dash --demo -r 3m ...`      -> `dash tui --demo -r 3m ...`
/// - `dash --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "tui" | "status" | "sales" | "costs" | "overview" | "ask" | "refresh" | "categories"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(args(&["dash"])), args(&["dash", "tui"]));
    }

    #[test]
    fn leading_flags_go_to_tui() {
        assert_eq!(
            rewrite_args(args(&["dash", "--demo", "-r", "3m"])),
            args(&["dash", "tui", "--demo", "-r", "3m"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for argv in [
            args(&["dash", "sales", "--range", "6m"]),
            args(&["dash", "--help"]),
            args(&["dash", "-V"]),
            args(&["dash", "ask", "why?"]),
            args(&["dash", "bogus"]),
        ] {
            assert_eq!(rewrite_args(argv.clone()), argv);
        }
    }

    #[test]
    fn rewritten_args_parse() {
        let cli = crate::cli::Cli::parse_from(rewrite_args(args(&["dash", "--demo", "--seed", "3"])));
        let Command::Tui(tui) = cli.command else {
            panic!("expected tui");
        };
        assert!(tui.source.demo);
        assert_eq!(tui.source.seed, 3);
    }

    #[test]
    fn demo_flag_selects_demo_source() {
        let demo = SourceArgs {
            demo: true,
            seed: 1,
            months: 4,
        };
        assert!(source_from_args(&demo).is_demo());
        let live = SourceArgs { demo: false, ..demo };
        assert_eq!(source_from_args(&live), SalesSource::Backend);
    }
}
