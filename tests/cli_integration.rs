use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};
use std::thread;

const LOGIN_REPLY: &str =
    r#"{"serviceName":"MobileLoginSP.login","status":"1","responseBody":{"jsessionid":{"$":"FAKE42"}}}"#;
const QUERY_REPLY: &str = r#"{"serviceName":"DbExplorerSP.executeQuery","status":"1","responseBody":{"fieldsMetadata":[{"name":"NUNOTA"},{"name":"DTALTER"}],"rows":[[101,"28022024 09:00:00"],[102,"28022024 18:45:10"]]}}"#;
const DENIED_REPLY: &str =
    r#"{"serviceName":"DbExplorerSP.executeQuery","status":"0","statusMessage":"Sessao invalida"}"#;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write test file");
}

fn run_extractor(args: &[&str], home: &Path, envs: &[(&str, &str)]) -> (bool, String, String) {
    let bin = std::env::var("CARGO_BIN_EXE_sankhya-extract").unwrap_or_else(|_| {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("target");
        path.push("debug");
        if cfg!(windows) {
            path.push("sankhya-extract.exe");
        } else {
            path.push("sankhya-extract");
        }
        path.to_string_lossy().into_owned()
    });
    let mut cmd = Command::new(bin);
    cmd.args(args)
        .current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("RUST_LOG", "sankhya_extract=info")
        .env_remove("SANKHYA_USER")
        .env_remove("SANKHYA_PASSWORD")
        .env_remove("SANKHYA_HOST")
        .env_remove("SANKHYA_PORT");
    for proxy in ["HTTP_PROXY", "http_proxy", "HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"] {
        cmd.env_remove(proxy);
    }
    for (k, v) in envs {
        cmd.env(k, v);
    }
    let output = cmd.output().expect("run sankhya-extract");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

fn csv_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map(|entries| entries.flatten().map(|e| e.path()).collect())
        .unwrap_or_default();
    files.retain(|p| p.extension().is_some_and(|ext| ext == "csv"));
    files.sort();
    files
}

/// Read one HTTP/1.1 request and return (request line, cookie header)
fn read_request(reader: &mut BufReader<TcpStream>) -> std::io::Result<(String, Option<String>)> {
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    let mut content_length = 0usize;
    let mut chunked = false;
    let mut cookie = None;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            } else if name.eq_ignore_ascii_case("transfer-encoding") {
                chunked = value.eq_ignore_ascii_case("chunked");
            } else if name.eq_ignore_ascii_case("cookie") {
                cookie = Some(value.to_string());
            }
        }
    }

    if chunked {
        loop {
            let mut size_line = String::new();
            reader.read_line(&mut size_line)?;
            let size = usize::from_str_radix(size_line.trim(), 16).unwrap_or(0);
            let mut chunk = vec![0; size + 2];
            reader.read_exact(&mut chunk)?;
            if size == 0 {
                break;
            }
        }
    } else {
        let mut body = vec![0; content_length];
        reader.read_exact(&mut body)?;
    }

    Ok((request_line.trim().to_string(), cookie))
}

fn serve_one(stream: TcpStream, seen: &Mutex<Vec<String>>) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let (request_line, cookie) = read_request(&mut reader)?;

    let reply = if request_line.contains("MobileLoginSP.login") {
        LOGIN_REPLY
    } else if request_line.contains("DbExplorerSP.executeQuery") {
        if cookie.as_deref() == Some("JSESSIONID=FAKE42") {
            QUERY_REPLY
        } else {
            DENIED_REPLY
        }
    } else {
        "{}"
    };
    seen.lock().expect("lock").push(request_line);

    let mut stream = stream;
    write!(
        stream,
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.len(),
        reply
    )?;
    stream.flush()
}

/// Minimal stand-in for the ERP service on a random local port
fn spawn_fake_service() -> (u16, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake service");
    let port = listener.local_addr().expect("local addr").port();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let _ = serve_one(stream, &log);
        }
    });
    (port, seen)
}

#[test]
fn jobs_lists_available_jobs() {
    let home = tempfile::tempdir().expect("tempdir");
    let (ok, stdout, stderr) = run_extractor(&["jobs"], home.path(), &[]);
    assert!(ok, "stderr: {stderr}");
    assert!(stdout.contains("items"));
    assert!(stdout.contains("sales"));
    assert!(stdout.contains("TGFITE"));
}

#[test]
fn dry_run_prints_one_statement_per_window() {
    let home = tempfile::tempdir().expect("tempdir");
    let (ok, stdout, stderr) = run_extractor(
        &[
            "extract",
            "--job",
            "sales",
            "--since",
            "2024-01-01",
            "--until",
            "20240401",
            "--dry-run",
        ],
        home.path(),
        &[],
    );
    assert!(ok, "stderr: {stderr}");
    assert_eq!(stdout.matches("-- ").count(), 3);
    assert!(stdout.contains("-- 2024-02-01..2024-03-01"));
    assert!(stdout.contains("CAB.DTFATUR < TO_DATE('2024-04-01', 'YYYY-MM-DD');"));
    assert!(csv_files(&home.path().join("raw")).is_empty());
}

#[test]
fn invalid_date_fails() {
    let home = tempfile::tempdir().expect("tempdir");
    let (ok, _, stderr) = run_extractor(
        &["extract", "--since", "2023-02-30", "--dry-run"],
        home.path(),
        &[],
    );
    assert!(!ok);
    assert!(stderr.contains("Invalid date"));
}

#[test]
fn config_file_supplies_defaults() {
    let home = tempfile::tempdir().expect("tempdir");
    write_file(
        &home.path().join(".sankhya-extract.toml"),
        "job = \"sales\"\nsince = \"2023-05-01\"\nuntil = \"2023-06-01\"\n",
    );
    let (ok, stdout, stderr) = run_extractor(&["extract", "--dry-run"], home.path(), &[]);
    assert!(ok, "stderr: {stderr}");
    assert!(stdout.contains("-- 2023-05-01..2023-06-01"));
    assert!(stdout.contains("FROM TGFCAB CAB"));
}

#[test]
fn unparsable_default_config_falls_through_to_next_location() {
    let home = tempfile::tempdir().expect("tempdir");
    write_file(
        &home.path().join(".config").join("sankhya-extract").join("config.toml"),
        "job = [not toml\n",
    );
    write_file(
        &home.path().join(".sankhya-extract.toml"),
        "job = \"sales\"\nsince = \"2023-07-01\"\nuntil = \"2023-08-01\"\n",
    );
    let (ok, stdout, stderr) = run_extractor(&["extract", "--dry-run"], home.path(), &[]);
    assert!(ok, "stderr: {stderr}");
    assert!(stderr.contains("Failed to parse config"), "stderr: {stderr}");
    assert!(stdout.contains("-- 2023-07-01..2023-08-01"));
    assert!(stdout.contains("FROM TGFCAB CAB"));
}

#[test]
fn aggregate_merges_csv_files() {
    let home = tempfile::tempdir().expect("tempdir");
    let raw = home.path().join("raw");
    write_file(&raw.join("part-1.csv"), "a,b\n1,2\n3,4\n");
    write_file(&raw.join("part-2.csv"), "a,b\n5,6\n7,8\n9,10\n");

    let (ok, _, stderr) = run_extractor(&["aggregate"], home.path(), &[]);
    assert!(ok, "stderr: {stderr}");

    let merged = fs::read_to_string(home.path().join("files.csv")).expect("merged file");
    let lines: Vec<&str> = merged.lines().collect();
    assert_eq!(lines[0], "a,b");
    assert_eq!(lines.len(), 6);
}

#[test]
fn aggregate_without_inputs_fails() {
    let home = tempfile::tempdir().expect("tempdir");
    let (ok, _, stderr) = run_extractor(
        &["aggregate", "--dir", "missing", "--output", "out.csv"],
        home.path(),
        &[],
    );
    assert!(!ok);
    assert!(stderr.contains("No files match"));
}

#[test]
fn extract_against_fake_service() {
    let home = tempfile::tempdir().expect("tempdir");
    let (port, seen) = spawn_fake_service();
    let port = port.to_string();

    let (ok, _, stderr) = run_extractor(
        &[
            "extract",
            "--since",
            "2024-02-28",
            "--until",
            "2024-03-01",
            "--output-dir",
            "out",
            "--aggregate",
            "merged/all.csv",
        ],
        home.path(),
        &[
            ("SANKHYA_USER", "ana"),
            ("SANKHYA_PASSWORD", "secret"),
            ("SANKHYA_HOST", "127.0.0.1"),
            ("SANKHYA_PORT", &port),
        ],
    );
    assert!(ok, "stderr: {stderr}");
    assert!(stderr.contains("Login successful"), "stderr: {stderr}");

    let files = csv_files(&home.path().join("out"));
    assert_eq!(files.len(), 2, "stderr: {stderr}");
    let first = files[0].file_name().expect("name").to_string_lossy().into_owned();
    assert!(first.starts_with("Sankhya-Extract-2024-02-28-2024-02-29-"));

    let content = fs::read_to_string(&files[0]).expect("window file");
    assert_eq!(
        content.lines().collect::<Vec<_>>(),
        vec!["NUNOTA,DTALTER", "101,2024-02-28 09:00:00", "102,2024-02-28 18:45:10"]
    );

    let merged = fs::read_to_string(home.path().join("merged").join("all.csv")).expect("merged");
    assert_eq!(merged.lines().count(), 5);

    let requests = seen.lock().expect("lock").clone();
    assert_eq!(requests.len(), 4, "{requests:?}");
    assert!(requests[0].starts_with("POST ") && requests[0].contains("MobileLoginSP.login"));
    assert!(requests[1].contains("mgeSession=FAKE42"));
    assert!(requests[3].contains("MobileLoginSP.logout"));
}

#[test]
fn unreachable_service_is_logged_not_fatal() {
    let home = tempfile::tempdir().expect("tempdir");
    // Bind and drop to get a local port nobody listens on
    let port = TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .expect("free port")
        .port()
        .to_string();

    let (ok, _, stderr) = run_extractor(
        &["extract", "--since", "2024-01-01", "--until", "2024-01-03"],
        home.path(),
        &[
            ("SANKHYA_USER", "ana"),
            ("SANKHYA_PASSWORD", "secret"),
            ("SANKHYA_HOST", "127.0.0.1"),
            ("SANKHYA_PORT", &port),
        ],
    );
    assert!(ok, "stderr: {stderr}");
    assert!(stderr.contains("Login failed"), "stderr: {stderr}");
    assert!(stderr.contains("Query failed"), "stderr: {stderr}");
    assert!(stderr.contains("Logout finished"), "stderr: {stderr}");
    assert!(csv_files(&home.path().join("raw")).is_empty());
}

#[test]
fn extract_with_failed_merge_exits_non_zero() {
    let home = tempfile::tempdir().expect("tempdir");
    let port = TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .expect("free port")
        .port()
        .to_string();

    let (ok, _, stderr) = run_extractor(
        &[
            "extract",
            "--since",
            "2024-01-01",
            "--until",
            "2024-01-02",
            "--aggregate",
            "all.csv",
        ],
        home.path(),
        &[
            ("SANKHYA_USER", "ana"),
            ("SANKHYA_PASSWORD", "secret"),
            ("SANKHYA_HOST", "127.0.0.1"),
            ("SANKHYA_PORT", &port),
        ],
    );
    assert!(!ok, "stderr: {stderr}");
    assert!(stderr.contains("Logout finished"), "stderr: {stderr}");
    assert!(stderr.contains("No files match"), "stderr: {stderr}");
    assert!(!home.path().join("all.csv").exists());
}
