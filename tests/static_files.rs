use mini_webserver::reactor::Reactor;

use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::Path;
use std::thread;
use std::time::Duration;

fn spawn_server(root: &Path) -> SocketAddr {
    let mut reactor = Reactor::bind("127.0.0.1:0", root).expect("Failed to bind server");
    let addr = reactor.local_addr().expect("Failed to get local address");

    thread::spawn(move || {
        let _ = reactor.run();
    });

    addr
}

fn send_request(addr: SocketAddr, raw: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).expect("Failed to connect to server");
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("Failed to set read timeout");

    stream.write_all(raw).expect("Failed to send request");

    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .expect("Failed to read response");
    response
}

fn get(addr: SocketAddr, target: &str) -> Vec<u8> {
    send_request(addr, format!("GET {target} HTTP/1.1\r\n\r\n").as_bytes())
}

/// Splits a raw response into its header block and body.
fn split_response(response: &[u8]) -> (String, Vec<u8>) {
    let pos = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("No header terminator in response");

    let head = String::from_utf8(response[..pos].to_vec()).expect("Header block is not UTF-8");
    let body = response[pos + 4..].to_vec();

    (head, body)
}

fn header_value<'a>(head: &'a str, name: &str) -> &'a str {
    head.split("\r\n")
        .find_map(|line| line.strip_prefix(name))
        .unwrap_or_else(|| panic!("Missing header {name:?}"))
}

#[test]
fn serves_default_document_for_root_target() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("index.html"), "<h1>home</h1>").expect("Failed to write fixture");

    let addr = spawn_server(dir.path());
    let (head, body) = split_response(&get(addr, "/"));

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(header_value(&head, "Content-Type: "), "text/html");
    assert_eq!(header_value(&head, "Content-Length: "), "13");
    assert_eq!(body, b"<h1>home</h1>");
}

#[test]
fn serves_css_with_its_content_type() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("style.css"), "body { margin: 0 }").expect("Failed to write fixture");

    let addr = spawn_server(dir.path());
    let (head, body) = split_response(&get(addr, "/style.css"));

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(header_value(&head, "Content-Type: "), "text/css");
    assert_eq!(body, b"body { margin: 0 }");
}

#[test]
fn unknown_extension_falls_back_to_octet_stream() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("blob.bin"), [0u8, 1, 2, 3]).expect("Failed to write fixture");

    let addr = spawn_server(dir.path());
    let (head, body) = split_response(&get(addr, "/blob.bin"));

    assert_eq!(
        header_value(&head, "Content-Type: "),
        "application/octet-stream"
    );
    assert_eq!(body, [0u8, 1, 2, 3]);
}

#[test]
fn header_block_fields_arrive_in_order() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("index.html"), "x").expect("Failed to write fixture");

    let addr = spawn_server(dir.path());
    let (head, _) = split_response(&get(addr, "/"));

    let lines: Vec<&str> = head.split("\r\n").collect();
    assert_eq!(lines[0], "HTTP/1.1 200 OK");
    assert_eq!(lines[1], "Server: mini-webserver/0.1");
    assert!(lines[2].starts_with("Date: ") && lines[2].ends_with(" GMT"));
    assert_eq!(lines[3], "Content-Type: text/html");
    assert_eq!(lines[4], "Content-Length: 1");
    assert_eq!(lines[5], "Connection: close");
    assert_eq!(lines.len(), 6, "no fields after Connection: close");
}

#[test]
fn round_trips_an_empty_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("empty.txt"), "").expect("Failed to write fixture");

    let addr = spawn_server(dir.path());
    let (head, body) = split_response(&get(addr, "/empty.txt"));

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(header_value(&head, "Content-Length: "), "0");
    assert!(body.is_empty(), "no bytes after the header block");
}

#[test]
fn round_trips_a_single_byte_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("one.txt"), "x").expect("Failed to write fixture");

    let addr = spawn_server(dir.path());
    let (head, body) = split_response(&get(addr, "/one.txt"));

    assert_eq!(header_value(&head, "Content-Length: "), "1");
    assert_eq!(body, b"x");
}

#[test]
fn round_trips_a_file_larger_than_one_buffer() {
    let payload: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("big.bin"), &payload).expect("Failed to write fixture");

    let addr = spawn_server(dir.path());
    let (head, body) = split_response(&get(addr, "/big.bin"));

    assert_eq!(header_value(&head, "Content-Length: "), "100000");
    assert_eq!(body.len(), payload.len(), "no truncation or duplication");
    assert_eq!(body, payload);
}

#[test]
fn closes_the_connection_after_one_response() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("index.html"), "once").expect("Failed to write fixture");

    let addr = spawn_server(dir.path());

    // read_to_end only returns once the server closes; the body must be
    // exactly the advertised length with nothing after it.
    let (head, body) = split_response(&get(addr, "/"));
    assert_eq!(header_value(&head, "Connection: "), "close");
    assert_eq!(body, b"once");
}

#[test]
fn nested_paths_resolve_under_the_root() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::create_dir(dir.path().join("assets")).expect("Failed to create subdir");
    fs::write(dir.path().join("assets/app.js"), "console.log(1)")
        .expect("Failed to write fixture");

    let addr = spawn_server(dir.path());
    let (head, body) = split_response(&get(addr, "/assets/app.js"));

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(header_value(&head, "Content-Type: "), "application/javascript");
    assert_eq!(body, b"console.log(1)");
}
