use super::*;
use std::fs;
use tempfile::TempDir;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::generator::WriteMode;
    use crate::logging::LogFormat;

    #[test]
    fn config_file_persistence() {
        let temp_dir = TempDir::new().expect("should create TempDir successfully");
        let config_path = temp_dir.path().join("config.toml");

        let original_config = Config {
            generator: GeneratorConfig {
                output_dir: "ctxfy/specifications".to_string(),
                write_mode: WriteMode::FailIfExists,
                timeout_ms: 1500,
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Json,
            },
            base_dir: temp_dir.path().to_path_buf(),
        };

        let toml_content = toml::to_string_pretty(&original_config)
            .expect("config should convert to toml string successfully");
        fs::write(&config_path, toml_content).expect("should write to config_path successfully");

        let loaded_config = Config::load(temp_dir.path()).expect("should load config");

        assert_eq!(original_config, loaded_config);
    }

    #[test]
    fn config_directory_is_named_after_the_tool() {
        let config_dir = get_config_dir().expect("home or data dir is available");
        assert!(config_dir.ends_with(".ctxfy") || config_dir.ends_with("ctxfy"));
    }

    #[test]
    fn invalid_toml_handling() {
        let invalid_toml = r#"
            [generator
            output_dir = "specs"
            timeout_ms = "soon"
        "#;

        let result: Result<Config, toml::de::Error> = toml::from_str(invalid_toml);
        assert!(result.is_err());
    }

    #[test]
    fn partial_config_with_defaults() {
        let partial_toml = r#"
            [generator]
            output_dir = "custom"
        "#;

        let config: Config = toml::from_str(partial_toml).expect("missing fields use defaults");
        assert_eq!(config.generator.output_dir, "custom");
        assert_eq!(config.generator.write_mode, WriteMode::Overwrite);
        assert_eq!(config.generator.timeout_ms, 3000);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn complete_valid_config() {
        let valid_toml = r#"
            [generator]
            output_dir = "specs"
            write_mode = "fail_if_exists"
            timeout_ms = 200

            [logging]
            level = "warn"
            format = "json"
        "#;

        let config: Config = toml::from_str(valid_toml).expect("should parse toml successfully");
        assert_eq!(config.generator.write_mode, WriteMode::FailIfExists);
        assert_eq!(config.generator.timeout_ms, 200);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_write_mode_is_rejected() {
        let toml_str = r#"
            [generator]
            write_mode = "append"
        "#;

        let result: Result<Config, toml::de::Error> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn timeout_boundary_validation() {
        let mut generator = GeneratorConfig::default();

        assert!(generator.set_timeout_ms(1).is_ok());
        assert!(generator.set_timeout_ms(60_000).is_ok());
        assert!(generator.set_timeout_ms(0).is_err());
        assert!(generator.set_timeout_ms(60_001).is_err());
    }

    #[test]
    fn error_display_messages() {
        let errors = vec![
            ConfigError::InvalidOutputDir("../x".to_string()),
            ConfigError::InvalidTimeout(0),
            ConfigError::InvalidLogLevel("loud".to_string()),
            ConfigError::DirectoryError,
        ];

        for error in errors {
            let message = format!("{error}");
            assert!(!message.is_empty());
            assert!(message.len() > 10);
        }
    }
}
