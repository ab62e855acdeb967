use super::*;
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Cursor};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Payload {
    query: String,
    limit: usize,
}

#[test]
fn request_round_trips_through_the_wire_format() {
    let payload = Payload { query: "main".to_string(), limit: 10 };
    let req = json_request("POST", "/search", &payload).unwrap();

    let mut buf = Vec::new();
    write_request(&mut buf, &req).unwrap();

    let mut reader = BufReader::new(Cursor::new(buf));
    let parsed = read_request(&mut reader).unwrap();

    assert_eq!(parsed.method, "POST");
    assert_eq!(parsed.path, "/search");
    let decoded: Payload = parse_json_request_body(&parsed).unwrap();
    assert_eq!(decoded, payload);
}

#[test]
fn response_round_trips_through_the_wire_format() {
    let payload = Payload { query: "main".to_string(), limit: 10 };
    let resp = json_response(200, "OK", &payload).unwrap();

    let mut buf = Vec::new();
    write_response(&mut buf, &resp).unwrap();

    let mut reader = BufReader::new(Cursor::new(buf));
    let parsed = read_response(&mut reader).unwrap();

    assert_eq!(parsed.status, 200);
    assert_eq!(content_type(&parsed).as_deref(), Some("application/json"));
    let decoded: Payload = parse_json_body(&parsed).unwrap();
    assert_eq!(decoded, payload);
}

#[test]
fn empty_request_has_no_body() {
    let req = empty_request("GET", "/status");
    let mut buf = Vec::new();
    write_request(&mut buf, &req).unwrap();

    let mut reader = BufReader::new(Cursor::new(buf));
    let parsed = read_request(&mut reader).unwrap();
    assert_eq!(parsed.method, "GET");
    assert!(parsed.body.is_empty());
}

#[test]
fn reading_from_a_closed_connection_errors_instead_of_panicking() {
    let mut reader = BufReader::new(Cursor::new(Vec::<u8>::new()));
    assert!(read_request(&mut reader).is_err());
}
