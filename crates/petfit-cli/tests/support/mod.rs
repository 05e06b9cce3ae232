use assert_cmd::Command;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::thread;

pub fn new_command_with_temp_home() -> (Command, tempfile::TempDir) {
    let temp_home = tempfile::tempdir().expect("temp home");
    let binary = assert_cmd::cargo::cargo_bin!("petfit");
    let mut command = Command::new(binary);
    command.env("HOME", temp_home.path());
    command.env("XDG_CONFIG_HOME", temp_home.path().join(".config"));
    command.env_remove("PETFIT_LOG");
    (command, temp_home)
}

pub fn write_config(home: &Path, base_url: &str) {
    let config_dir = home.join(".config").join("petfit");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(
        config_dir.join("config.toml"),
        format!(
            r#"
version = 1

[server]
base_url = "{base_url}"
timeout_ms = 5000

[progress]
interval_ms = 5
"#
        ),
    )
    .expect("write config");
}

#[allow(dead_code)]
pub fn write_valid_config(home: &Path) {
    write_config(home, "http://127.0.0.1:9");
}

/// Product page with one pet that has a photo and one without.
pub fn write_page(dir: &Path) -> PathBuf {
    let path = dir.join("page.toml");
    fs::write(
        &path,
        r#"
[product]
image_url = "/static/img/raincoat.jpg"
name = "Yellow Raincoat"

[sizes]
options = ["S", "M", "L"]
product = "M"

[[pets]]
id = "7"
name = "Bori"
has_image = true

[[pets]]
id = "9"
name = "Kong"
"#,
    )
    .expect("write page");
    path
}

#[allow(dead_code)]
pub struct CapturedRequest {
    pub url: String,
    pub body: String,
}

/// Answers exactly one request on a loopback port with a JSON body.
#[allow(dead_code)]
pub fn serve_once(status: u16, body: &'static str) -> (String, thread::JoinHandle<CapturedRequest>) {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("bind loopback server");
    let port = server
        .server_addr()
        .to_ip()
        .expect("ip listener")
        .port();

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("receive request");
        let mut raw = Vec::new();
        request
            .as_reader()
            .read_to_end(&mut raw)
            .expect("read request body");
        let captured = CapturedRequest {
            url: request.url().to_string(),
            body: String::from_utf8_lossy(&raw).to_string(),
        };

        let header = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
            .expect("header");
        request
            .respond(
                tiny_http::Response::from_string(body)
                    .with_status_code(status)
                    .with_header(header),
            )
            .expect("respond");
        captured
    });

    (format!("http://127.0.0.1:{port}"), handle)
}

#[allow(dead_code)]
pub fn assert_timestamp_log_names(entries: &[std::fs::DirEntry]) {
    assert!(!entries.is_empty(), "expected at least one diagnostics log");

    for entry in entries {
        let name = entry
            .file_name()
            .into_string()
            .expect("diagnostics filename utf8");
        let stem = name
            .strip_suffix(".log")
            .expect("diagnostics filename .log suffix");
        assert!(
            !stem.is_empty() && stem.chars().all(|character| character.is_ascii_digit()),
            "diagnostics filename must be <timestamp>.log, got: {name}"
        );
    }
}
