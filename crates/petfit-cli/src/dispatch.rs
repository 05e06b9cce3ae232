use std::path::Path;

use anyhow::{Result, bail};
use comfy_table::{Cell, ContentArrangement, Table};
use petfit_app::{App, FitOutcome, FitRequest, FitSource, ModalScreen, Rejection};
use petfit_core::doctor::{CheckState, DoctorReport};
use petfit_core::time::elapsed_label;
use petfit_tui::UiExit;

use crate::cli::{Cli, Command, FitArgs};

pub fn run_with_deps(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::Doctor(args)) => run_doctor_command(args.page.as_deref()),
        Some(Command::Fit(args)) => run_fit_command(args),
        None => run_root_command(cli.page.as_deref()),
    }
}

fn run_root_command(page_path: Option<&Path>) -> Result<()> {
    let Some(page_path) = page_path else {
        bail!("missing --page <FILE>; describe the product page to open (see README.md)");
    };

    let config = petfit_app::ensure_config_ready()?;
    let page = petfit_app::load_page(page_path)?;
    let app = App::from_config(config)?;
    tracing::debug!(page = %page_path.display(), "opening fitting ui");

    match petfit_tui::run_fitting(&app, page)? {
        UiExit::LoginRedirect { url } => {
            println!("Login required. Sign in at {url} and run petfit again.");
        }
        UiExit::Completed | UiExit::Canceled => {}
    }

    Ok(())
}

fn run_doctor_command(page: Option<&Path>) -> Result<()> {
    let report = petfit_app::doctor(page);
    print_doctor_report(&report);
    Ok(())
}

fn run_fit_command(args: FitArgs) -> Result<()> {
    let config = petfit_app::ensure_config_ready()?;
    let page = petfit_app::load_page(&args.page)?;
    let app = App::from_config(config)?;

    let request = fit_request(args)?;
    tracing::debug!(?request, "running headless fitting");
    let outcome = app.fit(page, &request)?;
    print_fit_outcome(&outcome);

    match outcome.screen {
        ModalScreen::Result => Ok(()),
        _ => bail!("fitting finished without a result ({})", outcome.screen.label()),
    }
}

fn fit_request(args: FitArgs) -> Result<FitRequest> {
    let source = match (args.pet, args.photo, args.breed) {
        (Some(pet_id), None, None) => FitSource::Profile { pet_id },
        (None, Some(photo), Some(breed)) => FitSource::Manual { photo, breed },
        _ => bail!("choose either --pet or --photo with --breed"),
    };

    Ok(FitRequest {
        source,
        product_size: args.size,
        ai_size: args.ai_size,
    })
}

fn print_fit_outcome(outcome: &FitOutcome) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);

    table.add_row(vec![Cell::new("screen"), Cell::new(outcome.screen.label())]);
    if let Some(rejection) = outcome.rejection {
        table.add_row(vec![Cell::new("rejected"), Cell::new(rejection_text(rejection))]);
    }
    if let Some(result) = &outcome.result {
        if let Some(image_url) = &result.image_url {
            table.add_row(vec![Cell::new("result image"), Cell::new(image_url)]);
        }
        table.add_row(vec![Cell::new("message"), Cell::new(&result.message.text)]);
        if let Some(elapsed) = result.elapsed {
            table.add_row(vec![Cell::new("elapsed"), Cell::new(elapsed_label(elapsed))]);
        }
    }
    for alert in &outcome.alerts {
        table.add_row(vec![Cell::new("alert"), Cell::new(alert)]);
    }
    if let Some(url) = &outcome.login_url {
        table.add_row(vec![Cell::new("login"), Cell::new(url)]);
    }

    println!("{table}");
}

fn rejection_text(rejection: Rejection) -> &'static str {
    match rejection {
        Rejection::NoPetSelected => "no pet selected",
        Rejection::PetWithoutImage => "selected pet has no photo",
        Rejection::MissingBreed => "breed is required",
        Rejection::MissingPhoto => "photo is required",
    }
}

fn print_doctor_report(report: &DoctorReport) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Check", "Status", "Details"]);

    for check in &report.checks {
        let status = match check.state {
            CheckState::Pass => "PASS",
            CheckState::Fail => "FAIL",
        };

        table.add_row(vec![
            Cell::new(check.name.as_str()),
            Cell::new(status),
            Cell::new(check.details.as_str()),
        ]);
    }

    println!("{table}");
    println!("{}", report.summary());
}
