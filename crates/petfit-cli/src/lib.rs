pub mod cli;
pub mod diagnostics;
pub mod dispatch;

use anyhow::Result;
use clap::Parser;

use crate::cli::Cli;
use crate::diagnostics::{DiagnosticsSession, LogSink, init_tracing};

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let diagnostics = DiagnosticsSession::initialize(cli.diagnostics)?;
    if let Some(path) = diagnostics.path() {
        eprintln!("Diagnostics enabled: {}", path.display());
    }

    let sink = if cli.command.is_none() {
        LogSink::DiagnosticsOnly
    } else {
        LogSink::Stderr
    };
    init_tracing(cli.verbose, sink, cli.diagnostics);
    diagnostics.record(format!("command={:?}", cli.command));

    let result = dispatch::run_with_deps(cli);
    if let Err(error) = &result {
        diagnostics.record(format!("command failed: {error:#}"));
    }
    result
}
