use anyhow::{Context, Result, bail};

use openapi_lint::config::Config;
use openapi_lint::rules;
use openapi_lint::{Document, Linter, Report, RuleRegistry, Severity};

fn main() -> Result<()> {
    // Parse configuration from command line and environment
    let config = Config::from_args_and_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    if config.skip {
        log::info!("Skipping execution as requested");
        return Ok(());
    }

    let registry = RuleRegistry::with_builtin_rules();

    log::info!("Rule set: {}", rules::ZALANDO);
    let all_rules = registry.describe();

    if config.list_rules {
        print_section("Rules", &all_rules);
        return Ok(());
    }

    let linter = Linter::new(&registry, &config.lint)?;
    let mut skipped: Vec<String> = linter.skipped().iter().map(|r| r.describe()).collect();
    skipped.sort();
    print_section("Rules", &all_rules);
    print_section("Skipped rules", &skipped);

    let Some(source) = config.source.as_deref() else {
        bail!("No OpenAPI document given");
    };
    if !source.exists() {
        bail!("Could not find specification file: {}", source.display());
    }

    let fail_on = &config.lint.fail_on;
    if fail_on.is_empty() {
        log::warn!("No severity configured to fail the build, violations will only be reported");
    } else {
        let names: Vec<&str> = fail_on.iter().map(Severity::as_str).collect();
        log::info!("Will fail build on errors of severity: {}", names.join(", "));
    }

    log::info!("Validating file: {}", source.display());
    let document = Document::load(source)
        .with_context(|| format!("Failed to load OpenAPI document: {}", source.display()))?;
    let report = linter.validate(&document)?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if let Some((severity, count)) = report.first_failing(fail_on) {
        bail!("Failing build due to {} errors with severity {}", count, severity);
    }

    Ok(())
}

fn print_section(title: &str, lines: &[String]) {
    let header = format!("{} ({})", title, lines.len());
    log::info!("{}", header);
    log::info!("{}", "-".repeat(header.len()));
    for line in lines {
        log::info!("{}", line);
    }
    log::info!("");
}

fn print_report(report: &Report) {
    for (severity, results) in report.by_severity() {
        let lines: Vec<String> = results.iter().map(|result| result.to_string()).collect();
        print_section(&format!("Severity {}", severity), &lines);
    }
    if report.ignored() > 0 {
        log::info!("{} violation(s) ignored by markers in the document", report.ignored());
    }
}
