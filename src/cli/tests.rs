//! Tests for CLI parsing

use super::runner::RunOverrides;
use super::*;
use crate::config::Settings;
use clap::Parser;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

#[test]
fn test_parse_run() {
    let cli = Cli::try_parse_from([
        "bronze-loader",
        "run",
        "--year",
        "2021",
        "--month",
        "3",
        "--resources",
        "launches,rockets",
        "--destination",
        "/tmp/x.duckdb",
    ])
    .unwrap();

    assert!(!cli.verbose);
    assert_eq!(cli.format, OutputFormat::Pretty);
    match cli.command {
        Commands::Run {
            year,
            month,
            resources,
            destination,
            dataset,
            ..
        } => {
            assert_eq!(year, 2021);
            assert_eq!(month, 3);
            assert_eq!(resources, vec!["launches", "rockets"]);
            assert_eq!(destination, Some(PathBuf::from("/tmp/x.duckdb")));
            assert!(dataset.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "bronze-loader",
        "window",
        "--year",
        "2020",
        "--month",
        "12",
        "--verbose",
        "--format",
        "json",
        "--config",
        "settings.yaml",
    ])
    .unwrap();

    assert!(cli.verbose);
    assert_eq!(cli.format, OutputFormat::Json);
    assert_eq!(cli.config, Some(PathBuf::from("settings.yaml")));
    assert!(matches!(cli.command, Commands::Window { year: 2020, month: 12 }));
}

#[test]
fn test_parse_resources() {
    let cli = Cli::try_parse_from(["bronze-loader", "resources"]).unwrap();
    assert!(matches!(cli.command, Commands::Resources));
}

#[test]
fn test_run_requires_year_and_month() {
    assert!(Cli::try_parse_from(["bronze-loader", "run", "--year", "2021"]).is_err());
    assert!(Cli::try_parse_from(["bronze-loader", "run", "--month", "3"]).is_err());
    assert!(Cli::try_parse_from(["bronze-loader", "run", "--year", "x", "--month", "3"]).is_err());
}

#[test]
fn test_flags_override_settings() {
    let mut settings = Settings {
        dataset: "from_file".to_string(),
        page_limit: 10,
        resources: vec!["cores".to_string()],
        ..Settings::default()
    };
    let overrides = RunOverrides {
        resources: vec![" launches ".to_string(), String::new()],
        dataset: Some("from_flag".to_string()),
        ..RunOverrides::default()
    };

    overrides.apply(&mut settings);
    assert_eq!(settings.dataset, "from_flag");
    assert_eq!(settings.page_limit, 10);
    assert_eq!(settings.resources, vec!["launches"]);
}

#[test]
fn test_empty_flags_keep_settings() {
    let mut settings = Settings::default();
    RunOverrides::default().apply(&mut settings);
    assert_eq!(settings, Settings::default());
}
