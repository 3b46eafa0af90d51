#[cfg(test)]
mod tests {
    use crate::cli::{BuildArgs, SourcemapSetting};
    use crate::config::loading::config_key;
    use crate::config::*;
    use crate::error::{CliError, ConfigError};
    use serial_test::serial;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use wisp_bundler::SourceMapMode;

    fn project(config: Option<&str>) -> TempDir {
        let dir = TempDir::new().unwrap();
        if let Some(config) = config {
            fs::write(dir.path().join(CONFIG_FILE), config).unwrap();
        }
        dir
    }

    #[test]
    fn test_defaults() {
        let config = WispConfig::default_config();
        assert_eq!(config.src, PathBuf::from("./src"));
        assert_eq!(config.dist, PathBuf::from("./dist"));
        assert_eq!(config.target, vec!["es2022"]);
        assert_eq!(config.sourcemap, SourcemapSetting::None);
        assert!(config.dts);
        assert_eq!(config.debounce_ms, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let config = WispConfig {
            clean_dist: true,
            export_conditions: vec!["worker".to_string()],
            ..WispConfig::default_config()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("cleanDist").is_some());
        assert!(json.get("debounceMs").is_some());
        assert_eq!(json["exportConditions"], serde_json::json!(["worker"]));
        assert!(json.get("clean_dist").is_none());

        // skip_serializing_if
        let minimal = serde_json::to_value(WispConfig::default_config()).unwrap();
        assert!(minimal.get("tsconfig").is_none());
        assert!(minimal.get("env").is_none());
        assert!(minimal.get("cwd").is_none());

        assert_eq!(
            serde_json::to_string(&SourcemapSetting::Linked).unwrap(),
            "\"linked\""
        );
    }

    #[test]
    fn test_validation() {
        let invalid = [
            WispConfig {
                target: vec![],
                ..WispConfig::default_config()
            },
            WispConfig {
                src: PathBuf::from("lib"),
                dist: PathBuf::from("./lib"),
                ..WispConfig::default_config()
            },
            WispConfig {
                dist: PathBuf::from("./src/out"),
                ..WispConfig::default_config()
            },
            WispConfig {
                src: PathBuf::from("."),
                dist: PathBuf::from("dist"),
                ..WispConfig::default_config()
            },
            WispConfig {
                debounce_ms: 0,
                ..WispConfig::default_config()
            },
            WispConfig {
                env: [("NODE-ENV".to_string(), "x".to_string())].into(),
                ..WispConfig::default_config()
            },
        ];
        for config in invalid {
            assert!(config.validate().is_err(), "{config:?}");
        }

        let siblings = [("src", "srcdist"), ("./src", "../dist"), (".", "../dist")];
        for (src, dist) in siblings {
            let config = WispConfig {
                src: PathBuf::from(src),
                dist: PathBuf::from(dist),
                ..WispConfig::default_config()
            };
            assert!(config.validate().is_ok(), "{config:?}");
        }

        let err = WispConfig {
            debounce_ms: 0,
            ..WispConfig::default_config()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(
            err,
            CliError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "debounceMs"
        ));
    }

    #[test]
    fn test_build_options() {
        let config = WispConfig {
            src: PathBuf::from("lib"),
            minify: true,
            sourcemap: SourcemapSetting::Inline,
            env: [
                ("NODE_ENV".to_string(), "production".to_string()),
                ("API".to_string(), "x".to_string()),
            ]
            .into(),
            dts: false,
            ..WispConfig::default_config()
        };
        let options = config.build_options(Path::new("/pkg"));
        assert_eq!(options.cwd, PathBuf::from("/pkg"));
        assert_eq!(options.source_dir, PathBuf::from("lib"));
        assert_eq!(options.dist_dir, PathBuf::from("./dist"));
        assert_eq!(options.sourcemap, SourceMapMode::Inline);
        assert!(options.minify);
        assert!(!options.dts);
        assert_eq!(
            options.env,
            vec![
                ("API".to_string(), "x".to_string()),
                ("NODE_ENV".to_string(), "production".to_string()),
            ]
        );
    }

    #[test]
    fn test_config_key_mapping() {
        assert_eq!(config_key("debounce_ms").as_deref(), Some("debounceMs"));
        assert_eq!(config_key("clean_dist").as_deref(), Some("cleanDist"));
        assert_eq!(config_key("minify").as_deref(), Some("minify"));
        assert_eq!(config_key("log"), None);
    }

    #[test]
    #[serial]
    fn test_load_without_file_uses_defaults() {
        let dir = project(None);
        let config = WispConfig::load(&BuildArgs::default(), dir.path()).unwrap();
        assert_eq!(config, WispConfig::default_config());
    }

    #[test]
    #[serial]
    fn test_file_overrides_defaults() {
        let dir = project(Some(
            r#"{ "src": "lib", "minify": true, "sourcemap": "inline", "env": { "NODE_ENV": "test" } }"#,
        ));
        let config = WispConfig::load(&BuildArgs::default(), dir.path()).unwrap();
        assert_eq!(config.src, PathBuf::from("lib"));
        assert!(config.minify);
        assert_eq!(config.sourcemap, SourcemapSetting::Inline);
        assert_eq!(config.env["NODE_ENV"], "test");
        assert_eq!(config.dist, PathBuf::from("./dist"));
    }

    #[test]
    #[serial]
    fn test_cli_overrides_file() {
        let dir = project(Some(r#"{ "dist": "out", "target": ["es2020"], "dts": true }"#));
        let args = BuildArgs {
            dist: Some(PathBuf::from("build")),
            targets: vec!["node18".to_string()],
            no_dts: true,
            env: vec![("DEBUG".to_string(), "1".to_string())],
            ..Default::default()
        };
        let config = WispConfig::load(&args, dir.path()).unwrap();
        assert_eq!(config.dist, PathBuf::from("build"));
        assert_eq!(config.target, vec!["node18"]);
        assert!(!config.dts);
        assert_eq!(config.env["DEBUG"], "1");
    }

    #[test]
    #[serial]
    fn test_unset_flags_do_not_override_file() {
        let dir = project(Some(r#"{ "minify": true, "cleanDist": true }"#));
        let config = WispConfig::load(&BuildArgs::default(), dir.path()).unwrap();
        assert!(config.minify);
        assert!(config.clean_dist);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file_and_cli_overrides_env() {
        let dir = project(Some(r#"{ "debounceMs": 50, "minify": false }"#));
        unsafe {
            std::env::set_var("WISP_DEBOUNCE_MS", "300");
            std::env::set_var("WISP_MINIFY", "true");
        }

        let from_env = WispConfig::load(&BuildArgs::default(), dir.path());
        let args = BuildArgs {
            debounce_ms: Some(20),
            ..Default::default()
        };
        let from_cli = WispConfig::load(&args, dir.path());

        unsafe {
            std::env::remove_var("WISP_DEBOUNCE_MS");
            std::env::remove_var("WISP_MINIFY");
        }

        let from_env = from_env.unwrap();
        assert_eq!(from_env.debounce_ms, 300);
        assert!(from_env.minify);
        assert_eq!(from_cli.unwrap().debounce_ms, 20);
    }

    #[test]
    #[serial]
    fn test_cwd_flag_is_not_a_config_override() {
        let dir = project(Some(r#"{ "cwd": "packages/app" }"#));
        let args = BuildArgs {
            cwd: Some(PathBuf::from("pkg")),
            ..Default::default()
        };
        let config = WispConfig::load(&args, dir.path()).unwrap();
        assert_eq!(config.cwd, Some(PathBuf::from("packages/app")));

        let bare = project(None);
        let config = WispConfig::load(&args, bare.path()).unwrap();
        assert_eq!(config.cwd, None);
    }

    #[test]
    #[serial]
    fn test_explicit_config_must_exist() {
        let dir = project(None);
        let args = BuildArgs {
            config: Some(PathBuf::from("custom.json")),
            ..Default::default()
        };
        let err = WispConfig::load(&args, dir.path()).unwrap_err();
        assert!(matches!(err, CliError::Config(ConfigError::NotFound(_))));
    }

    #[test]
    #[serial]
    fn test_bad_field_type_is_reported() {
        let dir = project(Some(r#"{ "debounceMs": "soon" }"#));
        let err = WispConfig::load(&BuildArgs::default(), dir.path()).unwrap_err();
        assert!(err.to_string().contains("configuration"));
    }
}
