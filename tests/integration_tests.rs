use httpmock::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;
use text_saver::{
    Delivery, HttpUpload, LocalDirectory, MemoryDelivery, OverflowPolicy, SaveError, SaverConfig,
    SectionSaver, SectionTable, TextSaver,
};

fn dir_entries(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_single_text_to_directory() {
    let temp_dir = TempDir::new().unwrap();
    let saver = TextSaver::new(LocalDirectory::new(temp_dir.path()));

    saver.save_text("hello world").await.unwrap();

    assert_eq!(dir_entries(temp_dir.path()), vec!["downloaded_text.txt"]);
    let content = std::fs::read_to_string(temp_dir.path().join("downloaded_text.txt")).unwrap();
    assert_eq!(content, "hello world");
}

#[tokio::test]
async fn test_all_sections_to_directory() {
    let temp_dir = TempDir::new().unwrap();
    let saver = SectionSaver::new(LocalDirectory::new(temp_dir.path()));
    let payloads: Vec<String> = SectionTable::DEFAULT_NAMES
        .iter()
        .map(|name| format!("contents of {}\n", name))
        .collect();

    let report = saver.save_sections(&payloads).await.unwrap();
    assert!(report.is_complete());
    assert_eq!(report.delivered.len(), 11);

    // nothing staged is left next to the delivered files
    let mut expected = SectionTable::default().file_names();
    expected.sort();
    assert_eq!(dir_entries(temp_dir.path()), expected);

    for (file_name, payload) in SectionTable::default().file_names().iter().zip(&payloads) {
        let written = std::fs::read_to_string(temp_dir.path().join(file_name)).unwrap();
        assert_eq!(&written, payload);
    }
}

#[tokio::test]
async fn test_sections_continue_after_existing_file() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("indexing_results.txt"), "keep me").unwrap();

    let saver = SectionSaver::new(LocalDirectory::new(temp_dir.path()).overwrite(false));
    let report = saver.save_sections(&["A", "B", "C"]).await.unwrap();

    assert_eq!(report.delivered, vec!["indexed_text.txt", "indexing_debug_log.txt"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].file_name, "indexing_results.txt");
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("indexing_results.txt")).unwrap(),
        "keep me"
    );
    assert!(matches!(
        report.into_result(),
        Err(SaveError::PartialFailure { failed: 1, total: 3, .. })
    ));
}

#[tokio::test]
async fn test_sections_uploaded_in_order() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(PUT)
            .path("/drop/indexed_text.txt")
            .header("content-type", "text/plain")
            .body("A");
        then.status(200);
    });
    let second = server.mock(|when, then| {
        when.method(PUT)
            .path("/drop/indexing_results.txt")
            .body("B");
        then.status(204);
    });

    let upload = HttpUpload::new(&server.url("/drop")).unwrap();
    let saver = SectionSaver::new(upload);
    let report = saver.save_sections(&["A", "B"]).await.unwrap();

    first.assert();
    second.assert();
    assert_eq!(report.delivered, vec!["indexed_text.txt", "indexing_results.txt"]);
}

#[tokio::test]
async fn test_upload_rejection_is_recorded() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PUT).path("/drop/indexed_text.txt");
        then.status(403);
    });
    let accepted = server.mock(|when, then| {
        when.method(PUT).path("/drop/indexing_results.txt");
        then.status(200);
    });

    let saver = SectionSaver::new(HttpUpload::new(&server.url("/drop")).unwrap());
    let report = saver.save_sections(&["A", "B"]).await.unwrap();

    accepted.assert();
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].error.contains("403"));
    assert_eq!(report.delivered, vec!["indexing_results.txt"]);
}

#[tokio::test]
async fn test_config_driven_directory_target() {
    let temp_dir = TempDir::new().unwrap();
    let toml_content = format!(
        r#"
[output]
dir = "{}"

[single]
default_name = "preprocessed_text.txt"

[sections]
names = ["Source Text", "Error Log"]
on_overflow = "skip"
"#,
        temp_dir.path().display().to_string().replace('\\', "\\\\")
    );
    let config = SaverConfig::from_toml_str(&toml_content).unwrap();

    let saver = TextSaver::new(config.build_delivery().unwrap())
        .with_default_name(config.default_name())
        .unwrap();
    saver.save_text("preprocessed").await.unwrap();

    let sections = SectionSaver::new(config.build_delivery().unwrap())
        .with_table(config.section_table().unwrap())
        .with_overflow(config.overflow());
    let report = sections.save_sections(&["s", "e", "extra"]).await.unwrap();
    assert_eq!(report.skipped, 1);

    assert_eq!(
        dir_entries(temp_dir.path()),
        vec!["error_log.txt", "preprocessed_text.txt", "source_text.txt"]
    );
}

#[tokio::test]
async fn test_shared_delivery_between_savers() {
    let memory = Arc::new(MemoryDelivery::new());
    let single = TextSaver::new(memory.clone());
    let sections = SectionSaver::new(memory.clone()).with_overflow(OverflowPolicy::Reject);

    single.save_text("one").await.unwrap();
    sections.save_sections(&["two"]).await.unwrap();

    assert_eq!(
        memory.names().await,
        vec!["downloaded_text.txt", "indexed_text.txt"]
    );
    assert_eq!(memory.in_flight(), 0);
    assert_eq!(memory.describe(), "memory");
}
