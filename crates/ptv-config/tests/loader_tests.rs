//! Configuration file loading tests

use std::io::Write;

use ptv_config::{AppConfig, ConfigLoader};

#[test]
fn test_load_from_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[http]
port = 9191

[auth]
jwt_secret = "from-file"

[paging]
page_size = 0
"#
    )
    .unwrap();

    let config = ConfigLoader::with_path(file.path())
        .without_search_paths()
        .load()
        .unwrap();

    assert_eq!(config.http.port, 9191);
    assert_eq!(config.paging.effective_page_size(), 1000);
    assert_eq!(config.auth.jwt_secret, "from-file");
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_toml_is_reported() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[http\nport = ").unwrap();

    let result = AppConfig::from_file(file.path());
    assert!(matches!(result, Err(ptv_config::ConfigError::ParseError(_))));
}

#[test]
fn test_missing_file_is_read_error() {
    let result = AppConfig::from_file("/definitely/not/here.toml");
    assert!(matches!(result, Err(ptv_config::ConfigError::ReadError(_))));
}
