#![allow(clippy::unwrap_used)]
// Config layering: defaults → TOML → environment, and translation into the
// run configuration. Every test runs inside a `figment::Jail` so environment
// changes never leak between tests.

use std::io::Write as _;
use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use figment::Jail;
use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;

use lwmig_config::{Backend, Config, ConfigError, layered, load_config, to_migration_config};
use lwmig_core::TlsVerification;

const FULL: &str = r#"
[source]
base_url = "https://lorawan-ns-na.tektelic.com"
app_id = "3c0f0b70-tek-app"
bearer_token = "tektelic-secret"

[target]
base_url = "https://eu1.cloud.thethings.network"
host = "eu1.cloud.thethings.network"
app_id = "migrated-app"
bearer_token = "NNSXS.SECRET"

[migration]
devices = ["8C83FC05007296E7"]
"#;

fn extract(jail: &Jail) -> figment::error::Result<Config> {
    layered(&jail.directory().join("lwmig.toml")).extract()
}

#[test]
fn defaults_apply_without_file() {
    Jail::expect_with(|jail| {
        let cfg = extract(jail)?;

        assert_eq!(cfg.source.base_url, None);
        assert_eq!(cfg.target.lorawan_version, "1.0.2");
        assert_eq!(cfg.target.lorawan_phy_version, "1.0.2-b");
        assert_eq!(cfg.target.frequency_plan_id, "AU_915_928_FSB_1");
        assert_eq!(cfg.migration.concurrency, 1);
        assert!(cfg.migration.devices.is_empty());
        assert_eq!(cfg.defaults.timeout, 30);
        assert!(!cfg.defaults.insecure);
        Ok(())
    });
}

#[test]
fn toml_file_is_read() {
    Jail::expect_with(|jail| {
        jail.create_file("lwmig.toml", FULL)?;
        let cfg = extract(jail)?;

        assert_eq!(cfg.source.app_id.as_deref(), Some("3c0f0b70-tek-app"));
        assert_eq!(cfg.target.host.as_deref(), Some("eu1.cloud.thethings.network"));
        assert_eq!(cfg.migration.devices, vec!["8C83FC05007296E7"]);
        Ok(())
    });
}

#[test]
fn environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("lwmig.toml", FULL)?;
        jail.set_env("TTS_APP_ID", "from-env");
        jail.set_env("TEKTELIC_BASE_URL", "https://other.tektelic.example");
        jail.set_env("LWMIG_CONCURRENCY", "4");
        jail.set_env("LWMIG_TIMEOUT", "90");
        let cfg = extract(jail)?;

        assert_eq!(cfg.target.app_id.as_deref(), Some("from-env"));
        assert_eq!(
            cfg.source.base_url.as_deref(),
            Some("https://other.tektelic.example")
        );
        assert_eq!(cfg.migration.concurrency, 4);
        assert_eq!(cfg.defaults.timeout, 90);
        Ok(())
    });
}

#[test]
fn numeric_looking_environment_values_are_kept_verbatim() {
    Jail::expect_with(|jail| {
        jail.create_file("lwmig.toml", FULL)?;
        jail.set_env("TEKTELIC_APP_ID", "00042");
        jail.set_env("TEKTELIC_BEARER_TOKEN", "007");
        jail.set_env("TTS_APP_ID", "1.50");
        jail.set_env("TTS_BEARER_TOKEN", "0012345");
        let cfg = extract(jail)?;

        assert_eq!(cfg.source.app_id.as_deref(), Some("00042"));
        assert_eq!(cfg.source.bearer_token.as_deref(), Some("007"));
        assert_eq!(cfg.target.app_id.as_deref(), Some("1.50"));
        assert_eq!(cfg.target.bearer_token.as_deref(), Some("0012345"));

        let mc = to_migration_config(&cfg).map_err(|e| e.to_string())?;
        assert_eq!(mc.source.application_id, "00042");
        assert_eq!(mc.target.token.expose_secret(), "0012345");
        Ok(())
    });
}

#[test]
fn explicit_config_path_must_exist() {
    Jail::expect_with(|_jail| {
        let err = load_config(Some(Path::new("does-not-exist.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        Ok(())
    });
}

#[test]
fn explicit_config_path_is_loaded() {
    Jail::expect_with(|_jail| {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();

        let cfg = load_config(Some(file.path())).map_err(|e| e.to_string())?;
        assert_eq!(cfg.target.app_id.as_deref(), Some("migrated-app"));
        Ok(())
    });
}

#[test]
fn translates_into_migration_config() {
    Jail::expect_with(|jail| {
        jail.create_file("lwmig.toml", FULL)?;
        let cfg = extract(jail)?;
        let run = to_migration_config(&cfg).map_err(|e| e.to_string())?;

        assert_eq!(run.source.url.as_str(), "https://lorawan-ns-na.tektelic.com/");
        assert_eq!(run.source.application_id, "3c0f0b70-tek-app");
        assert_eq!(run.source.token.expose_secret(), "tektelic-secret");
        assert_eq!(run.target.host, "eu1.cloud.thethings.network");
        assert_eq!(run.target.token.expose_secret(), "NNSXS.SECRET");
        assert_eq!(run.target.lorawan.frequency_plan_id, "AU_915_928_FSB_1");
        assert_eq!(run.devices, vec!["8C83FC05007296E7"]);
        assert_eq!(run.concurrency, NonZeroUsize::MIN);
        assert_eq!(run.tls, TlsVerification::SystemDefaults);
        assert_eq!(run.timeout, Duration::from_secs(30));
        Ok(())
    });
}

#[test]
fn bearer_token_env_wins_over_plaintext() {
    Jail::expect_with(|jail| {
        let toml = format!("{FULL}\n[defaults]\ninsecure = true\n").replace(
            "bearer_token = \"NNSXS.SECRET\"",
            "bearer_token = \"NNSXS.SECRET\"\nbearer_token_env = \"MY_TTS_KEY\"",
        );
        jail.create_file("lwmig.toml", &toml)?;
        jail.set_env("MY_TTS_KEY", "NNSXS.FROM-ENV");
        let run = to_migration_config(&extract(jail)?).map_err(|e| e.to_string())?;

        assert_eq!(run.target.token.expose_secret(), "NNSXS.FROM-ENV");
        assert_eq!(run.tls, TlsVerification::DangerAcceptInvalid);
        Ok(())
    });
}

#[test]
fn missing_target_host_is_reported() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "lwmig.toml",
            &FULL.replace("host = \"eu1.cloud.thethings.network\"\n", ""),
        )?;
        let err = to_migration_config(&extract(jail)?).unwrap_err();

        match err {
            ConfigError::Missing { field, env } => {
                assert_eq!(field, "target.host");
                assert_eq!(env, "TTS_HOST");
            }
            other => panic!("expected Missing, got {other:?}"),
        }
        Ok(())
    });
}

#[test]
fn missing_source_token_is_reported() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "lwmig.toml",
            &FULL.replace("bearer_token = \"tektelic-secret\"\n", ""),
        )?;
        let err = to_migration_config(&extract(jail)?).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::NoCredentials {
                backend: Backend::Source
            }
        ));
        Ok(())
    });
}

#[test]
fn zero_concurrency_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("lwmig.toml", FULL)?;
        jail.set_env("LWMIG_CONCURRENCY", "0");
        let err = to_migration_config(&extract(jail)?).unwrap_err();

        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "migration.concurrency"));
        Ok(())
    });
}

#[test]
fn malformed_device_eui_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "lwmig.toml",
            &FULL.replace("8C83FC05007296E7", "not-an-eui"),
        )?;
        let err = to_migration_config(&extract(jail)?).unwrap_err();

        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "migration.devices"));
        Ok(())
    });
}

#[test]
fn non_http_base_url_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "lwmig.toml",
            &FULL.replace(
                "https://eu1.cloud.thethings.network\"\nhost",
                "ftp://eu1.cloud.thethings.network\"\nhost",
            ),
        )?;
        let err = to_migration_config(&extract(jail)?).unwrap_err();

        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "target.base_url"));
        Ok(())
    });
}
