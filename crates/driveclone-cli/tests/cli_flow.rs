use clap::Parser;

use driveclone_cli::Cli;
use driveclone_core::config::AppConfig;

fn config_for(dir: &tempfile::TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.storage.data_root = dir.path().to_str().unwrap().to_string();
    config.storage.seed_samples = false;
    config.auth.simulated_latency_ms = 0;
    config
}

async fn run(args: &[&str], config: &AppConfig) {
    let mut argv = vec!["driveclone", "--yes"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv)
        .unwrap()
        .execute(config.clone())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_login_mkdir_upload_download() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir);
    let source = dir.path().join("hello.txt");
    std::fs::write(&source, b"hello from disk").unwrap();
    let target = dir.path().join("copy.txt");

    run(&["login", "cli@x.com"], &config).await;
    run(&["mkdir", "Docs"], &config).await;
    run(&["upload", source.to_str().unwrap()], &config).await;
    run(&["ls", "--format", "json"], &config).await;
    run(&["usage"], &config).await;

    let user_id = driveclone_core::types::UserId::from_email("cli@x.com");
    let files_key = dir
        .path()
        .join("kv")
        .join(format!("driveclone_files_{user_id}.json"));
    let raw = std::fs::read_to_string(files_key).unwrap();
    let files: Vec<driveclone_entity::file::FileEntity> = serde_json::from_str(&raw).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].mime_type, "text/plain");

    run(
        &["download", files[0].id.as_str(), "--out", target.to_str().unwrap()],
        &config,
    )
    .await;
    assert_eq!(std::fs::read(&target).unwrap(), b"hello from disk");

    run(&["rm", files[0].id.as_str()], &config).await;
    run(&["logout"], &config).await;
}

#[tokio::test]
async fn test_commands_need_a_login() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir);

    let err = Cli::try_parse_from(["driveclone", "ls"])
        .unwrap()
        .execute(config)
        .await
        .unwrap_err();
    assert_eq!(err.kind, driveclone_core::error::ErrorKind::Unauthenticated);
}

#[tokio::test]
async fn test_oversize_upload_rejected_before_reading() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(&dir);
    config.storage.max_upload_size_bytes = 4;
    let source = dir.path().join("big.bin");
    std::fs::write(&source, b"more than four bytes").unwrap();

    run(&["login", "big@x.com"], &config).await;
    let err = Cli::try_parse_from(["driveclone", "--yes", "upload", source.to_str().unwrap()])
        .unwrap()
        .execute(config.clone())
        .await
        .unwrap_err();
    assert_eq!(err.kind, driveclone_core::error::ErrorKind::Validation);

    let user_id = driveclone_core::types::UserId::from_email("big@x.com");
    let files_key = dir
        .path()
        .join("kv")
        .join(format!("driveclone_files_{user_id}.json"));
    assert!(!files_key.exists());
}
