//! tsqlbracket CLI - bracket-quote identifiers in T-SQL scripts

use tsqlbracket_cli::cli;
use tsqlbracket_cli::input;
use tsqlbracket_cli::output;

use anyhow::Result;
use clap::Parser;
use is_terminal::IsTerminal;
use std::io::{self, Write};
use std::process::ExitCode;
use tsqlbracket_core::bracketize_script;

use cli::{Args, OutputFormat};
use output::{format_json, format_text, FileAction, FileReport};

/// A file could not be read or written, or `--check` found files to rewrite.
const EXIT_FAILURE: u8 = 1;

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(reports) => {
            let pending = reports
                .iter()
                .any(|report| report.action == FileAction::WouldBracket);
            if args.check && pending {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("tsqlbracket: error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Process every selected file in order, stopping at the first I/O failure.
fn run(args: &Args) -> Result<Vec<FileReport>> {
    let options = args.bracketize_options();
    let colored = std::io::stdout().is_terminal();
    let mut stdout = io::stdout().lock();
    let mut reports = Vec::new();
    let mut skipped_for_comments = 0usize;

    for path in input::select_sql_files(&args.files) {
        let original = input::read_script(path)?;
        let outcome = bracketize_script(&original, &options);

        if outcome.changed && !args.check {
            input::write_script(path, &outcome.sql)?;
        }

        skipped_for_comments += outcome.skipped_for_comments().count();

        let report = FileReport::new(path.display().to_string(), &outcome, args.check);
        if args.format == OutputFormat::Text {
            stdout.write_all(format_text(&report, colored).as_bytes())?;
        }
        reports.push(report);
    }

    if args.format == OutputFormat::Json {
        writeln!(stdout, "{}", format_json(&reports, args.compact))?;
    }

    if skipped_for_comments > 0 && !args.quiet {
        eprintln!(
            "tsqlbracket: warning: left {skipped_for_comments} batch(es) unchanged because comments are present (use --strip-comments to rewrite them)"
        );
    }

    Ok(reports)
}
