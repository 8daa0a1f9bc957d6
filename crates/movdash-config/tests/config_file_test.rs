//! Loading configuration files from disk.

use movdash_common::OutputFormat;
use movdash_config::{ConfigError, ConfigLoader};
use std::fs;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn test_load_full_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movdash.yaml");
    fs::write(
        &path,
        r##"
source:
  path: dados/BASE_MOVIMENTACOES.xlsx
  sheet: Movimentos
  timestamp_column: DATA
  action_column: AÇÃO
dashboard:
  title: Relatório semanal
  action_counts:
    title: Atividades por tipo
    x_label: Ação
    y_label: Quantidade
graph:
  width: 1400
  height: 900
  primary_color: "#2CA02C"
  format: png
  output: saida/painel.png
logging:
  level: debug
  format: pretty
"##,
    )
    .unwrap();

    let config = ConfigLoader::load_config_with(&path, no_env).expect("load config");

    assert_eq!(config.source.path, "dados/BASE_MOVIMENTACOES.xlsx");
    assert_eq!(config.source.sheet.as_deref(), Some("Movimentos"));
    assert_eq!(config.dashboard.title, "Relatório semanal");
    assert_eq!(config.dashboard.action_counts.title, "Atividades por tipo");
    // Untouched sections keep their defaults
    assert_eq!(config.dashboard.daily_volume.title, "Volume de Atividades por Dia");
    assert_eq!(config.graph.format, OutputFormat::Png);
    assert_eq!(config.graph.output_path().to_str(), Some("saida/painel.png"));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_env_overrides_win_over_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movdash.yaml");
    fs::write(&path, "source:\n  path: arquivo.xlsx\n").unwrap();

    let config = ConfigLoader::load_config_with(&path, |key| {
        (key == "MOVDASH_INPUT").then(|| "outro.csv".to_string())
    })
    .unwrap();

    assert_eq!(config.source.path, "outro.csv");
}

#[test]
fn test_empty_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movdash.yaml");
    fs::write(&path, "").unwrap();

    let config = ConfigLoader::load_config_with(&path, no_env).unwrap();
    assert_eq!(config, movdash_config::Config::default());
}

#[test]
fn test_invalid_color_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movdash.yaml");
    fs::write(&path, "graph:\n  background_color: white\n").unwrap();

    let err = ConfigLoader::load_config_with(&path, no_env).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)), "{err:?}");
}

#[test]
fn test_malformed_yaml_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movdash.yaml");
    fs::write(&path, "graph: [width: 10\n").unwrap();

    let err = ConfigLoader::load_config_with(&path, no_env).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)), "{err:?}");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConfigLoader::load_config_with(dir.path().join("nope.yaml"), no_env).unwrap_err();
    assert!(matches!(err, ConfigError::IoError(_)));
}
