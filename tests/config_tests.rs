use std::path::PathBuf;

use entrykit::config::Config;
use entrykit::error::EntrykitError;

fn set_required(jail: &mut figment::Jail) {
    jail.set_env("DB_HOST", "db");
    jail.set_env("DB_PORT", "5432");
    jail.set_env("DB_NAME", "app_db");
    jail.set_env("DB_USER", "app_user");
    jail.set_env("DB_PASSWORD", "hunter2");
}

#[test]
fn loads_complete_environment_with_defaults() {
    figment::Jail::expect_with(|jail| {
        set_required(jail);

        let cfg = Config::from_env().expect("config should load");
        assert_eq!(cfg.target.host, "db");
        assert_eq!(cfg.target.port, 5432);
        assert_eq!(cfg.target.database, "app_db");
        assert_eq!(cfg.target.username, "app_user");
        assert_eq!(cfg.target.password, "hunter2");
        assert!(cfg.target.url.is_none());
        assert!(!cfg.run_migrations);
        assert!(cfg.migrate_command.is_none());
        assert_eq!(cfg.app_user, "app");
        assert!(cfg.app_group.is_none());
        assert!(cfg.data_dirs.is_empty());
        Ok(())
    });
}

#[test]
fn missing_password_is_a_named_configuration_error() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("DB_HOST", "db");
        jail.set_env("DB_PORT", "5432");
        jail.set_env("DB_NAME", "app_db");
        jail.set_env("DB_USER", "app_user");

        let err = Config::from_env().expect_err("config must not load");
        assert!(matches!(err, EntrykitError::Config(_)));
        assert!(
            err.to_string().contains("db_password"),
            "diagnostic should name the missing field: {err}"
        );
        Ok(())
    });
}

#[test]
fn unparsable_port_is_a_configuration_error() {
    figment::Jail::expect_with(|jail| {
        set_required(jail);
        jail.set_env("DB_PORT", "not-a-port");

        let err = Config::from_env().expect_err("config must not load");
        assert!(matches!(err, EntrykitError::Config(_)));
        Ok(())
    });
}

#[test]
fn precomposed_database_url_is_carried_through() {
    figment::Jail::expect_with(|jail| {
        set_required(jail);
        jail.set_env("DATABASE_URL", "postgres://app_user:hunter2@db:5432/app_db");

        let cfg = Config::from_env().expect("config should load");
        assert_eq!(
            cfg.target.url.as_deref(),
            Some("postgres://app_user:hunter2@db:5432/app_db")
        );
        Ok(())
    });
}

#[test]
fn migrations_flag_requires_a_command() {
    figment::Jail::expect_with(|jail| {
        set_required(jail);
        jail.set_env("RUN_MIGRATIONS", "true");

        let err = Config::from_env().expect_err("config must not load");
        match err {
            EntrykitError::InvalidConfig(msg) => assert!(msg.contains("MIGRATE_COMMAND")),
            other => panic!("expected InvalidConfig, got: {other}"),
        }
        Ok(())
    });
}

#[test]
fn migrations_flag_with_command_is_accepted() {
    figment::Jail::expect_with(|jail| {
        set_required(jail);
        jail.set_env("RUN_MIGRATIONS", "true");
        jail.set_env("MIGRATE_COMMAND", "alembic upgrade head");

        let cfg = Config::from_env().expect("config should load");
        assert!(cfg.run_migrations);
        assert_eq!(cfg.migrate_command.as_deref(), Some("alembic upgrade head"));
        Ok(())
    });
}

#[test]
fn data_dirs_are_split_and_trimmed() {
    figment::Jail::expect_with(|jail| {
        set_required(jail);
        jail.set_env("APP_DATA_DIRS", "/var/lib/app/data, /var/log/app,");

        let cfg = Config::from_env().expect("config should load");
        assert_eq!(
            cfg.data_dirs,
            vec![
                PathBuf::from("/var/lib/app/data"),
                PathBuf::from("/var/log/app")
            ]
        );
        Ok(())
    });
}
