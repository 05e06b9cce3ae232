use std::fmt;
use std::path::Path;

use crate::config::{PetfitConfig, load_config, resolve_config_path};
use crate::page::load_page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Pass,
    Fail,
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorCheck {
    pub name: String,
    pub state: CheckState,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    pub fn has_failures(&self) -> bool {
        self.checks
            .iter()
            .any(|check| check.state == CheckState::Fail)
    }

    pub fn summary(&self) -> String {
        let passed = self
            .checks
            .iter()
            .filter(|check| check.state == CheckState::Pass)
            .count();
        let failed = self.checks.len().saturating_sub(passed);
        format!("{passed} passed, {failed} failed")
    }
}

const CONFIG_CHECKS: [&str; 3] = [
    "config file exists",
    "config parses and validates",
    "fitting endpoint configured",
];

pub fn run_doctor(page: Option<&Path>) -> DoctorReport {
    let mut checks = Vec::new();

    match resolve_config_path() {
        Ok(config_path) => check_config_at(&config_path, &mut checks),
        Err(error) => {
            checks.push(fail_check("config path resolves", error.to_string()));
            push_skipped_checks(
                &mut checks,
                &CONFIG_CHECKS,
                "config path could not be resolved",
            );
        }
    }

    if let Some(page) = page {
        checks.push(check_page(page));
    }

    DoctorReport { checks }
}

fn check_config_at(config_path: &Path, checks: &mut Vec<DoctorCheck>) {
    if !config_path.exists() {
        checks.push(fail_check(
            CONFIG_CHECKS[0],
            format!("expected at {}", config_path.display()),
        ));
        push_skipped_checks(checks, &CONFIG_CHECKS[1..], "config file is missing");
        return;
    }

    checks.push(pass_check(
        CONFIG_CHECKS[0],
        format!("found at {}", config_path.display()),
    ));

    match load_config(config_path) {
        Ok(config) => {
            checks.push(pass_check(CONFIG_CHECKS[1], "config is valid"));
            checks.push(check_endpoint(&config));
        }
        Err(error) => {
            checks.push(fail_check(CONFIG_CHECKS[1], error.to_string()));
            checks.push(skipped_check(CONFIG_CHECKS[2], "config is invalid"));
        }
    }
}

fn check_endpoint(config: &PetfitConfig) -> DoctorCheck {
    pass_check(
        CONFIG_CHECKS[2],
        format!(
            "POST {} (timeout {} ms), login at {}",
            config.server.endpoint_url(),
            config.server.timeout_ms,
            config.server.login_url()
        ),
    )
}

fn check_page(path: &Path) -> DoctorCheck {
    match load_page(path) {
        Ok(page) => {
            let kind = if page.is_product_page() {
                "product page"
            } else {
                "non-product page"
            };
            pass_check(
                "page file parses",
                format!(
                    "{kind}, {} pet profile(s), {} size option(s)",
                    page.pets.len(),
                    page.sizes.options.len()
                ),
            )
        }
        Err(error) => fail_check("page file parses", error.to_string()),
    }
}

fn pass_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Pass,
        details: details.into(),
    }
}

fn fail_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Fail,
        details: details.into(),
    }
}

fn skipped_check(name: &str, reason: &str) -> DoctorCheck {
    fail_check(name, format!("skipped because {reason}"))
}

fn push_skipped_checks(checks: &mut Vec<DoctorCheck>, names: &[&str], reason: &str) {
    checks.extend(
        names
            .iter()
            .copied()
            .map(|name| skipped_check(name, reason)),
    );
}
