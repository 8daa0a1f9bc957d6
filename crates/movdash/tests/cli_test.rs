//! Command behavior against movement files on disk.

use clap::Parser;
use movdash::commands::{load_config, run_options, run_render};
use movdash::{Args, Command};
use movdash_common::test_utils::{create_temp_dir, write_movements_csv};
use movdash_config::Config;

const ROWS: &[&[&str]] = &[
    &["2024-03-05 10:00:00", "LOAD", "D1"],
    &["2024-03-05 14:00:00", "UNLOAD", "D1"],
    &["2024-03-06 09:00:00", "LOAD", "D2"],
    &["2024-04-02 11:30:00", "LOAD", "D2"],
];

fn parse(argv: &[&str]) -> Command {
    Args::try_parse_from(argv).expect("valid arguments").command
}

#[test]
fn test_render_writes_dashboard_and_json_tables() {
    let dir = create_temp_dir();
    let input = write_movements_csv(&dir, "movimentacoes.csv", &["DOCA"], ROWS);
    let output = dir.path().join("painel.svg");

    let Command::Render(render) = parse(&[
        "movdash",
        "render",
        "--input",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "-a",
        "LOAD",
        "--start",
        "2024-03-01",
        "--end",
        "2024-03-31",
        "--json",
    ]) else {
        panic!("expected render");
    };

    let stdout = run_render(&Config::default(), &render).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(json["selection"]["month"], "2024-03");
    assert_eq!(json["filtered_count"], 2);
    assert_eq!(json["by_action"][0]["category"], "LOAD");
    assert_eq!(json["by_day"].as_array().unwrap().len(), 2);
    assert_eq!(json["by_hour"][0]["category"], 9);
    assert!(std::fs::read_to_string(&output).unwrap().contains("<svg"));
}

#[test]
fn test_render_text_output() {
    let dir = create_temp_dir();
    let input = write_movements_csv(&dir, "movimentacoes.csv", &["DOCA"], ROWS);
    let output = dir.path().join("painel.svg");

    let Command::Render(render) = parse(&[
        "movdash",
        "render",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--month",
        "2024-04",
    ]) else {
        panic!("expected render");
    };

    // The default end date is 2024-04-02 at midnight, before the 11:30 record
    let stdout = run_render(&Config::default(), &render).unwrap();
    assert!(stdout.contains("Registros: 0 de 4"));
    assert!(stdout.contains("(sem dados)"));
    assert!(stdout.contains("Painel:"));
}

#[test]
fn test_render_missing_input_fails() {
    let dir = create_temp_dir();
    let Command::Render(render) = parse(&[
        "movdash",
        "render",
        "-i",
        dir.path().join("BASE_MOVIMENTACOES.xlsx").to_str().unwrap(),
        "-o",
        dir.path().join("painel.svg").to_str().unwrap(),
    ]) else {
        panic!("expected render");
    };

    let err = run_render(&Config::default(), &render).unwrap_err();
    assert!(format!("{err:#}").contains("Load error"));
    assert!(!dir.path().join("painel.svg").exists());
}

#[test]
fn test_options_lists_choices() {
    let dir = create_temp_dir();
    let input = write_movements_csv(&dir, "movimentacoes.csv", &["DOCA"], ROWS);

    let Command::Options(options) =
        parse(&["movdash", "options", "--input", input.to_str().unwrap(), "--json"])
    else {
        panic!("expected options");
    };

    let json: serde_json::Value =
        serde_json::from_str(&run_options(&Config::default(), &options).unwrap()).unwrap();

    assert_eq!(json["options"]["months"], serde_json::json!(["2024-03", "2024-04"]));
    assert_eq!(json["options"]["actions"], serde_json::json!(["LOAD", "UNLOAD"]));
    assert_eq!(json["options"]["min_date"], "2024-03-05");
    assert_eq!(json["defaults"]["month"], "2024-03");
    assert_eq!(json["defaults"]["end"], "2024-04-02");
}

#[test]
fn test_load_config_from_file() {
    let dir = create_temp_dir();
    let path = dir.path().join("movdash.yaml");
    std::fs::write(&path, "graph:\n  format: png\n").unwrap();

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.graph.format, movdash_common::OutputFormat::Png);

    std::fs::write(&path, "graph:\n  width: 5\n").unwrap();
    assert!(load_config(Some(&path)).is_err());
}
