/// End-to-end tests for the CLI
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread;
use tempfile::TempDir;

const STAR_GRAPH: &str = "tests/fixtures/star_graph.json";
const SCATTERED_GRAPH: &str = "tests/fixtures/scattered_graph.json";

/// Serves `responses` HTTP status lines, one per connection, and returns the base URL
fn serve_status(status_line: &'static str, responses: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();

    thread::spawn(move || {
        for stream in listener.incoming().take(responses) {
            let mut stream = stream.unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut body = vec![0; content_length];
            reader.read_exact(&mut body).unwrap();

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                status_line
            );
            stream.write_all(response.as_bytes()).unwrap();
        }
    });

    format!("http://{}/api", address)
}

// Exit code tests for CLI
mod exit_code_tests {
    use super::*;

    /// Exit code 0: --help should return success
    #[test]
    fn test_exit_code_help() {
        cargo_bin_cmd!("career-tree").arg("--help").assert().code(0);
    }

    /// Exit code 0: --version should return success
    #[test]
    fn test_exit_code_version() {
        cargo_bin_cmd!("career-tree")
            .arg("--version")
            .assert()
            .code(0)
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    /// Exit code 2: Invalid arguments
    #[test]
    fn test_exit_code_invalid_argument() {
        cargo_bin_cmd!("career-tree")
            .arg("--invalid-option")
            .assert()
            .code(2);
    }

    /// Exit code 2: Missing subcommand
    #[test]
    fn test_exit_code_missing_subcommand() {
        cargo_bin_cmd!("career-tree").assert().code(2);
    }

    /// Exit code 2: Malformed bounds
    #[test]
    fn test_exit_code_invalid_bounds() {
        cargo_bin_cmd!("career-tree")
            .args(["cull", "--input", STAR_GRAPH, "--bounds", "0,10"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Invalid bounds"));
    }

    /// Exit code 2: Invalid priority value
    #[test]
    fn test_exit_code_invalid_priority() {
        cargo_bin_cmd!("career-tree")
            .args(["recalculate", "--input", STAR_GRAPH, "--priority", "urgent"])
            .assert()
            .code(2);
    }

    /// Exit code 3: Application error - graph file does not exist
    #[test]
    fn test_exit_code_missing_graph_file() {
        cargo_bin_cmd!("career-tree")
            .args(["layout", "--input", "/nonexistent/graph.json"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Graph file not found"));
    }

    /// Exit code 3: Application error - graph file is not valid JSON
    #[test]
    fn test_exit_code_unparseable_graph_file() {
        cargo_bin_cmd!("career-tree")
            .args(["layout", "--input", "tests/fixtures/truncated_graph.json"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Failed to parse graph file"));
    }

    /// Exit code 3: Application error - grid size rejected by the spatial index
    #[test]
    fn test_exit_code_invalid_grid_size() {
        cargo_bin_cmd!("career-tree")
            .args(["cull", "--input", STAR_GRAPH, "--bounds", "0,1,0,1", "--grid-size", "0"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Invalid grid size"));
    }

    /// Exit code 3: Application error - nothing listening on the API port
    #[test]
    fn test_exit_code_unreachable_api() {
        cargo_bin_cmd!("career-tree")
            .args([
                "recalculate",
                "--input",
                STAR_GRAPH,
                "--api-base",
                "http://127.0.0.1:1/api",
            ])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Network error during recalculation"));
    }

    /// Exit code 1: Degraded result - endpoint missing, mock result produced
    #[test]
    fn test_exit_code_mock_fallback() {
        let api_base = serve_status("404 Not Found", 1);

        let output = cargo_bin_cmd!("career-tree")
            .args(["recalculate", "--input", STAR_GRAPH, "--api-base", &api_base])
            .assert()
            .code(1)
            .get_output()
            .stdout
            .clone();

        let response: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(response["mock"], true);
        assert!(response["updatedNodes"].as_array().unwrap().len() >= 1);
    }

    /// Exit code 3: Missing endpoint is an error when the fallback is disabled
    #[test]
    fn test_exit_code_no_mock_fallback() {
        let api_base = serve_status("404 Not Found", 1);

        cargo_bin_cmd!("career-tree")
            .args([
                "recalculate",
                "--input",
                STAR_GRAPH,
                "--api-base",
                &api_base,
                "--no-mock-fallback",
            ])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Recalculation endpoint not found"));
    }

    /// Exit code 3: Server error status
    #[test]
    fn test_exit_code_server_error() {
        let api_base = serve_status("503 Service Unavailable", 1);

        cargo_bin_cmd!("career-tree")
            .args(["recalculate", "--input", STAR_GRAPH, "--api-base", &api_base])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("503"));
    }
}

#[test]
fn test_layout_star_graph_to_stdout() {
    let output = cargo_bin_cmd!("career-tree")
        .args(["layout", "--input", STAR_GRAPH, "--center-x", "-100", "--center-y", "50"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let layout: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let nodes = layout["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 5);
    assert_eq!(nodes[0]["id"], "data-scientist");
    assert_eq!(nodes[0]["position"]["x"], -100.0);
    assert_eq!(nodes[0]["position"]["y"], 50.0);
    assert_eq!(layout["cached"], false);
    assert_eq!(layout["index"]["nodeCount"], 6);
    assert!(layout.get("visible").is_none());
}

#[test]
fn test_layout_with_bounds_writes_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("layout.json");

    cargo_bin_cmd!("career-tree")
        .args([
            "layout",
            "--input",
            SCATTERED_GRAPH,
            "--bounds",
            "-1000,1000,-1000,1000",
            "-o",
        ])
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(&output_path).unwrap();
    let layout: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(layout["visible"]["count"], 3);
    assert_eq!(layout["nodes"].as_array().unwrap().len(), 5);
}

#[test]
fn test_cull_scattered_graph() {
    let output = cargo_bin_cmd!("career-tree")
        .args([
            "cull",
            "--input",
            SCATTERED_GRAPH,
            "--bounds",
            "-1000,1000,-1000,1000",
            "--grid-size",
            "500",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let culled: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(culled["count"], 3);
    let mut ids: Vec<&str> = culled["visibleNodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|node| node["id"].as_str().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["edge-straddler", "near", "origin"]);
}

#[test]
fn test_worker_answers_json_lines_from_stdin() {
    let input = concat!(
        r#"{"id":"1","type":"calculateLayout","data":{"nodes":[{"id":"root","isAnchor":true,"position":{"x":0,"y":0}}],"edges":[]}}"#,
        "\n",
        r#"{"id":"2","type":"teleport","data":{}}"#,
        "\n",
        r#"{"id":"3","type":"getStats"}"#,
        "\n",
    );

    let output = cargo_bin_cmd!("career-tree")
        .arg("worker")
        .write_stdin(input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let replies: Vec<serde_json::Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(replies.len(), 3);
    assert_eq!(replies[0]["id"], "1");
    assert_eq!(replies[0]["type"], "success");
    assert_eq!(replies[1]["type"], "error");
    assert!(replies[1]["error"].as_str().unwrap().contains("teleport"));
    assert_eq!(replies[2]["result"]["messagesHandled"], 3);
    assert_eq!(replies[2]["result"]["errors"], 1);
}
