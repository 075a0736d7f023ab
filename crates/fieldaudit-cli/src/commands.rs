use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use fieldaudit_diff::{compute_flat_changes, AuditRecord, AuditRequest, ChangeSet, FlatRecord};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::cli::*;
use crate::config::{AuditConfig, OutputFormat};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => AuditConfig::load(path)?,
        None => AuditConfig::default(),
    };
    let format = cli.format.unwrap_or(config.output);
    debug!(?format, ignored = config.ignored_fields.len(), "configuration loaded");

    match cli.command {
        Command::Diff(args) => cmd_diff(args, &config, format),
        Command::Record(args) => cmd_record(args, &config, format),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn cmd_diff(args: DiffArgs, config: &AuditConfig, format: OutputFormat) -> anyhow::Result<()> {
    let before: FlatRecord = read_json(&args.before)?;
    let after: FlatRecord = read_json(&args.after)?;
    let mut ignored = config.ignored();
    ignored.extend(args.ignore);

    let changes = compute_flat_changes(&before, &after, &ignored)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&changes)?),
        OutputFormat::Text => print!("{}", render_changes(&changes)),
    }
    Ok(())
}

fn cmd_record(args: RecordArgs, config: &AuditConfig, format: OutputFormat) -> anyhow::Result<()> {
    let request: AuditRequest = read_json(&args.request)?;
    let mut record = AuditRecord::create(&request, &config.ignored())?;
    if args.assign_id {
        record = record.assign_id();
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Text => {
            println!("Audit from {} ({})", record.origin.bold(), record.user_agent.dimmed());
            if let Some(id) = record.id {
                println!("  Record: {}", id.to_string().yellow());
            }
            print!("{}", render_changes(&record.changes));
        }
    }
    Ok(())
}

fn render_changes(changes: &ChangeSet) -> String {
    if changes.is_empty() {
        return "No changes.\n".to_string();
    }
    let mut out = String::new();
    for (field, entry) in changes.iter() {
        let old = entry.old.as_deref().unwrap_or("null");
        let new = entry.new.as_deref().unwrap_or("null");
        out.push_str(&format!("{} {}\n", "~".yellow(), field.bold()));
        out.push_str(&format!("  {} {}\n", "-".red(), old.red()));
        out.push_str(&format!("  {} {}\n", "+".green(), new.green()));
    }
    out
}

#[cfg(test)]
mod tests {
    use fieldaudit_diff::DiffEntry;

    use super::*;

    #[test]
    fn render_empty() {
        assert_eq!(render_changes(&ChangeSet::new()), "No changes.\n");
    }

    #[test]
    fn render_lists_each_field() {
        let mut changes = ChangeSet::new();
        changes.insert("plan", DiffEntry::texts("free", "pro"));
        changes.insert("nickname", DiffEntry::new(None, Some("Bo".into())));
        let out = render_changes(&changes);
        assert_eq!(out.lines().count(), 6);
        assert!(out.contains("plan"));
        assert!(out.contains("free"));
        assert!(out.contains("null"));
    }

    #[test]
    fn read_json_reports_path() {
        let err = read_json::<FlatRecord>(Path::new("/nonexistent/before.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/before.json"));
    }

    #[test]
    fn diff_and_record_run_against_files() {
        let dir = tempfile::tempdir().unwrap();
        let before = dir.path().join("before.json");
        let after = dir.path().join("after.json");
        let request = dir.path().join("request.json");
        fs::write(&before, r#"{"a": 1, "b": 2}"#).unwrap();
        fs::write(&after, r#"{"a": 1, "b": 3}"#).unwrap();
        fs::write(
            &request,
            r#"{"before": {"a": 1}, "after": {"a": 2}, "origin": "test", "userAgent": "unit"}"#,
        )
        .unwrap();

        let diff = DiffArgs { before, after, ignore: vec!["a".into()] };
        cmd_diff(diff, &AuditConfig::default(), OutputFormat::Json).unwrap();

        let record = RecordArgs { request, assign_id: true };
        cmd_record(record, &AuditConfig::default(), OutputFormat::Text).unwrap();
    }

    #[test]
    fn malformed_request_fails() {
        let dir = tempfile::tempdir().unwrap();
        let request = dir.path().join("request.json");
        fs::write(&request, r#"{"before": {}}"#).unwrap();
        let args = RecordArgs { request, assign_id: false };
        let err = cmd_record(args, &AuditConfig::default(), OutputFormat::Json).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }
}
