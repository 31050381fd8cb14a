use mandi_core::config::{AppConfig, LoadOptions};
use serde::Serialize;

use crate::commands::{CommandResult, EXIT_CONFIG_ERROR};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

const DEPENDENT_CHECKS: [&str; 3] =
    ["catalog_integrity", "negotiation_policy", "translation_settings"];

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { EXIT_CONFIG_ERROR };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            serde_json::json!({
                "overall_status": "fail",
                "summary": "doctor serialization failed",
                "error": error.to_string(),
            })
            .to_string()
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_catalog(&config));
            checks.push(check_negotiation_policy(&config));
            checks.push(check_translation(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.extend(DEPENDENT_CHECKS.into_iter().map(|name| DoctorCheck {
                name,
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            }));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_catalog(config: &AppConfig) -> DoctorCheck {
    match config.price_catalog() {
        Ok(catalog) => {
            let crops = catalog.entries().map(|entry| entry.crop_id.as_str()).collect::<Vec<_>>();
            DoctorCheck {
                name: "catalog_integrity",
                status: CheckStatus::Pass,
                details: format!("{} crops priced: {}", crops.len(), crops.join(", ")),
            }
        }
        Err(error) => DoctorCheck {
            name: "catalog_integrity",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_negotiation_policy(config: &AppConfig) -> DoctorCheck {
    match config.negotiation_policy() {
        Ok(policy) => DoctorCheck {
            name: "negotiation_policy",
            status: CheckStatus::Pass,
            details: format!(
                "offers below {} of the average are too low",
                policy.fair_floor_ratio()
            ),
        },
        Err(error) => DoctorCheck {
            name: "negotiation_policy",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn check_translation(config: &AppConfig) -> DoctorCheck {
    let translation = &config.translation;
    if !translation.enabled {
        return DoctorCheck {
            name: "translation_settings",
            status: CheckStatus::Pass,
            details: "translation disabled; /translate returns the fallback message".to_string(),
        };
    }

    DoctorCheck {
        name: "translation_settings",
        status: CheckStatus::Pass,
        details: format!(
            "upstream `{}` (source `{}`, timeout {}s, api key {})",
            translation.base_url,
            translation.source_lang,
            translation.timeout_secs,
            if translation.api_key.is_some() { "set" } else { "unset" }
        ),
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}
