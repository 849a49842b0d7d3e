use assert_cmd::Command;
use predicates::prelude::*;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread::{self, JoinHandle};

fn prd_forge(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("prd_forge").unwrap();
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env("NO_PROXY", "127.0.0.1")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .env_remove("RUST_LOG");
    cmd
}

fn read_request_body(stream: &mut impl Read) -> String {
    let mut reader = BufReader::new(stream);
    let mut len = 0;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((k, v)) = line.split_once(':') {
            if k.eq_ignore_ascii_case("content-length") {
                len = v.trim().parse().unwrap();
            }
        }
    }
    let mut body = vec![0; len];
    reader.read_exact(&mut body).unwrap();
    String::from_utf8(body).unwrap()
}

/// Local stand-in for Ollama's `/api/chat`: answers each request with the next reply, returns the request bodies.
fn serve_chat(replies: Vec<&'static str>) -> (String, JoinHandle<Vec<serde_json::Value>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for reply in replies {
            let (mut stream, _) = listener.accept().unwrap();
            let body = read_request_body(&mut stream);
            seen.push(serde_json::from_str(&body).unwrap());
            let out = serde_json::json!({ "message": { "role": "assistant", "content": reply }, "done": true }).to_string();
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                out.len(),
                out
            )
            .unwrap();
        }
        seen
    });
    (url, handle)
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs_err::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn empty_name_fails_before_any_request() {
    let tmp = tempfile::tempdir().unwrap();
    prd_forge(tmp.path())
        .args(["prd", "--name", "", "--description", "A todo app", "--provider", "ollama", "--no-export"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter both App Name and Description."));
}

#[test]
fn blank_prd_on_stdin_fails_with_warning() {
    let tmp = tempfile::tempdir().unwrap();
    prd_forge(tmp.path())
        .args(["plan", "--provider", "ollama", "--no-export"])
        .write_stdin("   \n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please provide a PRD to generate a plan."));
}

#[test]
fn missing_api_key_is_a_failure() {
    let tmp = tempfile::tempdir().unwrap();
    prd_forge(tmp.path())
        .env_remove("OPENAI_API_KEY")
        .args(["prd", "--name", "TaskFlow", "--description", "A todo app", "--provider", "openai"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY not set"));
    assert!(file_names(tmp.path()).is_empty());
}

#[test]
fn with_plan_hands_the_prd_to_the_plan_step() {
    let prd_text = "# TaskFlow PRD with Supabase auth";
    let (url, server) = serve_chat(vec![prd_text, "## Phase 1: Setup"]);
    let tmp = tempfile::tempdir().unwrap();
    fs_err::write(tmp.path().join("prd_forge.toml"), format!("provider = \"ollama\"\nollama_url = \"{url}\"\n")).unwrap();

    prd_forge(tmp.path())
        .args(["prd", "--name", "TaskFlow", "--description", "A todo app", "--with-plan"])
        .assert()
        .success()
        .stdout(predicate::str::contains(prd_text).and(predicate::str::contains("## Phase 1: Setup")));

    let requests = server.join().unwrap();
    assert_eq!(requests.len(), 2);
    let prd_prompt = requests[0]["messages"][0]["content"].as_str().unwrap();
    let plan_prompt = requests[1]["messages"][0]["content"].as_str().unwrap();
    assert!(prd_prompt.contains("App Name: TaskFlow"));
    assert!(plan_prompt.contains(prd_text));
    assert_eq!(requests[1]["stream"], false);

    let names = file_names(tmp.path());
    assert_eq!(names.len(), 3, "{names:?}");
    assert!(names.iter().any(|n| n.starts_with("ImplementationPlan_") && n.ends_with(".md")));
    assert!(names.iter().any(|n| n.starts_with("TaskFlow_PRD_") && n.ends_with(".md")));
}

#[test]
fn plan_reads_the_prd_from_a_file() {
    let (url, server) = serve_chat(vec!["## Phase 1"]);
    let tmp = tempfile::tempdir().unwrap();
    fs_err::write(tmp.path().join("prd.md"), "# Pasted PRD\n").unwrap();

    prd_forge(tmp.path())
        .args(["plan", "--prd-file", "prd.md", "--language", "hindi", "--no-export", "--provider", "ollama"])
        .arg("--config")
        .arg(write_config(tmp.path(), &url))
        .assert()
        .success();

    let requests = server.join().unwrap();
    let prompt = requests[0]["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("# Pasted PRD\n"));
    assert!(prompt.contains("Language: Hindi"));
    assert!(!file_names(tmp.path()).iter().any(|n| n.starts_with("ImplementationPlan_")));
}

fn write_config(dir: &Path, url: &str) -> std::path::PathBuf {
    let path = dir.join("ollama.toml");
    fs_err::write(&path, format!("ollama_url = \"{url}\"\n")).unwrap();
    path
}
