use std::io::Write;

use dispatch_optimizer::error::{ConfigError, Error};
use dispatch_optimizer::infrastructure::config::settings::Config;

fn write_temp_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn config_loads_all_sections() {
    let file = write_temp_config(
        r#"
[logging]
level = "debug"
format = "json"

[worker]
max_frame_bytes = 65536

[monte_carlo]
threads = 4
min_scenarios_per_thread = 100
max_scenarios = 5000
"#,
    );

    let config = Config::load(file.path()).expect("valid config");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.worker.max_frame_bytes, 65536);
    assert_eq!(config.monte_carlo.threads, 4);
    assert_eq!(config.monte_carlo.min_scenarios_per_thread, 100);
    assert_eq!(config.monte_carlo.max_scenarios, 5000);
}

#[test]
fn config_rejects_tiny_frame_limit() {
    let file = write_temp_config("[worker]\nmax_frame_bytes = 8\n");
    match Config::load(file.path()) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "max_frame_bytes",
            ..
        })) => {}
        Err(err) => panic!("Expected invalid frame limit error, got {err}"),
        Ok(config) => panic!(
            "Expected tiny frame limit to be rejected, got {}",
            config.worker.max_frame_bytes
        ),
    }
}

#[test]
fn config_rejects_zero_chunk_size() {
    let file = write_temp_config("[monte_carlo]\nmin_scenarios_per_thread = 0\n");
    assert!(matches!(
        Config::load(file.path()),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "min_scenarios_per_thread",
            ..
        }))
    ));
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = Config::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::Config(ConfigError::ReadFile(_)))));
}

#[test]
fn no_path_means_defaults() {
    let config = Config::load_or_default(None).expect("defaults");
    assert_eq!(config.monte_carlo.max_scenarios, 10_000);
}
