// nico-list: collect niconico video ids from user listings.
//
// Output goes to stdout (text or JSON), the run summary and progress to
// stderr, logs to stderr or --logfile.

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use nico_list::cli::{Cli, CounterProgress, init_logging};
use nico_list::output::{summary_line, write_json, write_text};
use nico_list::{FetchOrchestrator, build_http_client, collect_inputs, extract_user_id};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.fetch_config()?;
    init_logging(cli.logfile.as_deref())?;

    let orchestrator = FetchOrchestrator::new(config, build_http_client()?);
    let progress = Arc::new(CounterProgress::stderr(
        cli.progress_visible(std::io::stderr().is_terminal()),
    ));

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("interrupt received, stopping");
                shutdown.cancel();
            }
        });
    }

    let input = collect_inputs(cli.inputs.clone(), cli.input_file.clone(), cli.stdin);
    let (report, verdict) = orchestrator
        .run(input, extract_user_id, progress, Some(&shutdown))
        .await;

    // Partial results are printed before the verdict is reported.
    {
        let mut stdout = std::io::stdout().lock();
        if cli.json {
            write_json(&mut stdout, &report)?;
        } else {
            write_text(&mut stdout, &report.ids, cli.tab, cli.url)?;
        }
    }
    eprintln!("{}", summary_line(&report.summary, report.ids.len()));

    verdict?;
    Ok(())
}
