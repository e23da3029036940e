//! Tests for configuration loading and precedence
use clap::Parser;
use live_preview_playground::config::{Args, Command, Config, PROJECT_CONFIG_FILE};
use live_preview_playground::export::{select_exporter, ExporterKind};
use live_preview_playground::FileName;
use live_preview_playground::preview::RefreshPolicy;
use live_preview_playground::session::{KeyBinding, KeyPress, Modifier};
use std::path::Path;
use std::time::Duration;

fn parse(args: &[&str]) -> Args {
    Args::try_parse_from(args).expect("parse arguments")
}

fn write_project_config(dir: &Path, content: &str) {
    std::fs::write(dir.join(PROJECT_CONFIG_FILE), content).expect("write project config");
}

#[test]
fn test_builtin_defaults_without_project_config() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path().to_str().unwrap();

    let config = Config::from_args(&parse(&["playground", "--dir", dir, "build"]))
        .expect("create config");

    assert!(!config.has_project_config());
    assert_eq!(
        config.refresh_policy,
        RefreshPolicy::Debounced(Duration::from_millis(100))
    );
    assert_eq!(config.metadata.fallback_title, "Live Preview");
    assert_eq!(config.metadata.fallback_icon, "https://via.placeholder.com/16");
    assert!(config.metadata.base_url.is_none());
    assert!(config.export.archive);
    assert_eq!(config.export.archive_name, "playground.zip");
    assert_eq!(config.export_dir, temp.path().join("exports"));
    assert_eq!(config.preview_dir, temp.path().join(".playground/preview"));
    assert_eq!(config.save_binding, KeyBinding::SAVE);
    assert_eq!(config.file_path(FileName::Script), temp.path().join("script.js"));
}

#[test]
fn test_project_config_is_picked_up_from_workspace() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_project_config(
        temp.path(),
        r#"
[preview]
debounce_ms = 250
fallback_title = "Scratchpad"
base_url = "https://play.example/sandbox/"

[export]
archive = false
dest = "downloads"

[keys]
save = "ctrl+e"
"#,
    );
    let dir = temp.path().to_str().unwrap();

    let config = Config::from_args(&parse(&["playground", "--dir", dir, "watch"]))
        .expect("create config");

    assert!(config.has_project_config());
    assert_eq!(
        config.refresh_policy,
        RefreshPolicy::Debounced(Duration::from_millis(250))
    );
    assert_eq!(config.metadata.fallback_title, "Scratchpad");
    assert_eq!(
        config.metadata.base_url.as_ref().map(|url| url.as_str()),
        Some("https://play.example/sandbox/")
    );
    assert!(!config.export.archive);
    assert_eq!(config.export_dir, temp.path().join("downloads"));
    assert_eq!(config.save_binding.modifier, Modifier::Ctrl);
    assert!(config.save_binding.matches(&KeyPress::ctrl('e')));
    assert!(!config.save_binding.matches(&KeyPress::meta('e')));

    let options = config.session_options();
    assert_eq!(options.metadata.fallback_title, "Scratchpad");
    assert!(!options.export.archive);
}

#[test]
fn test_command_line_overrides_project_config() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_project_config(temp.path(), "[preview]\ndebounce_ms = 250\n");
    let dir = temp.path().to_str().unwrap();

    let immediate = Config::from_args(&parse(&["playground", "--dir", dir, "watch", "--immediate"]))
        .expect("create config");
    assert_eq!(immediate.refresh_policy, RefreshPolicy::Immediate);

    let faster = Config::from_args(&parse(&[
        "playground",
        "--dir",
        dir,
        "watch",
        "--debounce-ms",
        "20",
        "--out-dir",
        "/tmp/preview-out",
    ]))
    .expect("create config");
    assert_eq!(
        faster.refresh_policy,
        RefreshPolicy::Debounced(Duration::from_millis(20))
    );
    assert_eq!(faster.preview_dir, Path::new("/tmp/preview-out"));
}

#[test]
fn test_zero_debounce_means_immediate() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_project_config(temp.path(), "[preview]\ndebounce_ms = 0\n");
    let dir = temp.path().to_str().unwrap();

    let config = Config::from_args(&parse(&["playground", "--dir", dir, "build"]))
        .expect("create config");

    assert_eq!(config.refresh_policy, RefreshPolicy::Immediate);
}

#[test]
fn test_export_flags() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path().to_str().unwrap();

    let args = parse(&[
        "playground", "--dir", dir, "export", "--all", "--no-archive", "--dest", "/tmp/out",
    ]);
    let config = Config::from_args(&args).expect("create config");

    assert_eq!(
        args.command,
        Command::Export {
            file: None,
            all: true,
            dest: Some("/tmp/out".into()),
            no_archive: true,
        }
    );
    assert!(!config.export.archive);
    assert_eq!(config.export_dir, Path::new("/tmp/out"));
    assert_eq!(
        select_exporter(&config.export).kind(),
        ExporterKind::PerFile
    );
}

#[test]
fn test_export_file_argument_is_validated() {
    assert!(Args::try_parse_from(["playground", "export", "--file", "styles.css"]).is_ok());
    assert!(Args::try_parse_from(["playground", "export", "--file", "main.rs"]).is_err());
    assert!(Args::try_parse_from(["playground", "export", "--file", "index.html", "--all"]).is_err());
}

#[test]
fn test_explicit_config_path() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config_path = temp.path().join("custom.toml");
    std::fs::write(&config_path, "[preview]\nfallback_icon = \"/favicon.ico\"\n")
        .expect("write config");

    let config = Config::from_args(&parse(&[
        "playground",
        "--dir",
        temp.path().to_str().unwrap(),
        "--config",
        config_path.to_str().unwrap(),
        "build",
    ]))
    .expect("create config");

    assert_eq!(config.project_config_path.as_deref(), Some(config_path.as_path()));
    assert_eq!(config.metadata.fallback_icon, "/favicon.ico");
}

#[test]
fn test_invalid_project_config_is_an_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_project_config(temp.path(), "[keys]\nsave = \"hyper+s\"\n");
    let dir = temp.path().to_str().unwrap();

    let err = Config::from_args(&parse(&["playground", "--dir", dir, "build"]))
        .expect_err("bad binding should fail");
    assert!(format!("{:#}", err).contains("hyper+s"));

    write_project_config(temp.path(), "[preview]\nbase_url = \"not a url\"\n");
    assert!(Config::from_args(&parse(&["playground", "--dir", dir, "build"])).is_err());
}

#[test]
fn test_user_template_dir_can_be_skipped() {
    let args = parse(&[
        "playground",
        "--no-user-template",
        "--template",
        "/opt/templates",
        "build",
    ]);
    let config = Config::from_args(&args).expect("create config");
    assert_eq!(config.template_dirs, vec![Path::new("/opt/templates").to_path_buf()]);

    let bare = Config::from_args(&parse(&["playground", "--no-user-template", "build"]))
        .expect("create config");
    assert!(bare.template_dirs.is_empty());
}

#[test]
fn test_template_dir_has_highest_priority() {
    let args = parse(&["playground", "--template", "/opt/templates", "init"]);
    let config = Config::from_args(&args).expect("create config");

    assert_eq!(
        config.template_dirs.last().map(|p| p.as_path()),
        Some(Path::new("/opt/templates"))
    );
}
