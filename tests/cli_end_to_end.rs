#![deny(clippy::all, clippy::pedantic)]

use assert_cmd::Command;
use httpmock::MockServer;
use predicates::str::contains;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const CATEGORIES: &str = r#"[{"id":"a","name":"Rust","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}]"#;

const POSTS: &str = r#"[
    {"id":"p1","title":"First","content":"one","coverImageURL":"","createdAt":"2024-05-01T10:00:00Z","categories":[{"category":{"id":"a","name":"Rust"}}]},
    {"id":"p2","title":"Second","content":"two","coverImageURL":"","createdAt":"2024-05-02T10:00:00Z","categories":[]}
]"#;

fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    file.write_all(contents.as_bytes()).expect("write tmp");
    file
}

fn postdesk() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("postdesk"));
    cmd.env_remove("POSTDESK_SITE_URL")
        .env_remove("POSTDESK_TOKEN")
        .env_remove("POSTDESK_TOKEN_FILE")
        .env_remove("POSTDESK_CONFIG_FILE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn categories_list_works_end_to_end() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path("/api/categories");
        then.status(200)
            .header("content-type", "application/json")
            .body(CATEGORIES);
    });

    let assert = postdesk()
        .env("POSTDESK_SITE_URL", server.url("/api"))
        .arg("categories")
        .arg("list")
        .assert()
        .success();

    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("\"name\": \"Rust\""));
    mock.assert();
}

#[test]
fn posts_list_filters_by_category() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/posts");
        then.status(200)
            .header("content-type", "application/json")
            .body(POSTS);
    });

    let assert = postdesk()
        .arg("--site")
        .arg(server.url("/api"))
        .args(["posts", "list", "--category", "a"])
        .assert()
        .success();

    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("\"title\": \"First\""));
    assert!(!output.contains("\"title\": \"Second\""));
    assert!(output.contains("\"selected_category\": \"a\""));
}

#[test]
fn posts_create_reads_token_file() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/categories");
        then.status(200)
            .header("content-type", "application/json")
            .body(CATEGORIES);
    });
    let create = server.mock(|when, then| {
        when.method("POST")
            .path("/api/admin/posts")
            .header("authorization", "Bearer cli-token")
            .json_body_includes(r#"{"title":"T","content":"C","categoryIds":["a"]}"#);
        then.status(201)
            .header("content-type", "application/json")
            .body(r#"{"id":"p9"}"#);
    });

    let token = temp_file("cli-token\n");
    let assert = postdesk()
        .env("POSTDESK_SITE_URL", server.url("/api"))
        .env("POSTDESK_TOKEN_FILE", token.path())
        .args([
            "posts",
            "create",
            "--title",
            "T",
            "--content",
            "C",
            "--category",
            "a",
        ])
        .assert()
        .success();

    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("\"next\": \"open_post\""));
    assert!(output.contains("\"id\": \"p9\""));
    create.assert();
}

#[test]
fn posts_delete_without_token_is_refused() {
    let server = MockServer::start();
    let delete = server.mock(|when, then| {
        when.method("DELETE");
        then.status(204);
    });

    postdesk()
        .env("POSTDESK_SITE_URL", server.url("/api"))
        .args(["posts", "delete", "p1"])
        .assert()
        .failure()
        .stderr(contains("AuthRequired"));

    delete.assert_calls(0);
}

#[test]
fn cover_upload_uses_config_file_storage() {
    let server = MockServer::start();
    let media = TempDir::new().expect("tempdir");
    let mut config = NamedTempFile::with_suffix(".toml").expect("config file");
    writeln!(
        config,
        "[storage]\nbackend = \"filesystem\"\ndirectory = \"{}\"\npublic_base_url = \"http://localhost/media/\"",
        media.path().display()
    )
    .expect("write config");
    let image = temp_file("not really a png");

    let assert = postdesk()
        .env("POSTDESK_SITE_URL", server.url("/api"))
        .arg("--config-file")
        .arg(config.path())
        .arg("uploads")
        .arg("cover")
        .arg(image.path())
        .assert()
        .success();

    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("\"public_url\": \"http://localhost/media/private/"));
    assert!(media.path().join("private").is_dir());
}

#[test]
fn missing_site_fails_fast() {
    postdesk()
        .arg("categories")
        .arg("list")
        .assert()
        .failure()
        .stderr(contains("MissingSite"));
}
