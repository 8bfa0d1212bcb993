// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Protocol unit tests

use super::*;
use desk_core::client::ClientDraft;

#[test]
fn encode_decode_roundtrip_request() {
    let request = Request::ClientMove {
        token: "session-1".to_string(),
        id: "c-1".to_string(),
        to: "Sent to Banker".to_string(),
        observed: Some("Lead".to_string()),
    };

    let encoded = encode(&request).expect("encode failed");
    let decoded: Request = decode(&encoded).expect("decode failed");

    assert_eq!(request, decoded);
}

#[test]
fn encode_decode_roundtrip_response() {
    let response = Response::Status {
        uptime_secs: 3600,
        clients: 12,
        tasks: 5,
    };

    let encoded = encode(&response).expect("encode failed");
    let decoded: Response = decode(&encoded).expect("decode failed");

    assert_eq!(response, decoded);
}

#[test]
fn encode_decode_error_keeps_the_kind() {
    let response = Response::Error {
        kind: "conflict".to_string(),
        message: "client c-1 was moved concurrently".to_string(),
    };

    let encoded = encode(&response).expect("encode failed");
    let decoded: Response = decode(&encoded).expect("decode failed");

    assert_eq!(response, decoded);
}

#[test]
fn encode_returns_json_without_length_prefix() {
    let response = Response::Ok;
    let encoded = encode(&response).expect("encode failed");

    // encode() returns raw JSON, no length prefix
    let json_str = std::str::from_utf8(&encoded).expect("should be valid UTF-8");
    assert!(json_str.starts_with('{'));
    assert!(json_str.contains("\"type\":\"ok\""));
}

#[test]
fn drafts_cross_the_wire() {
    let request = Request::ClientCreate {
        token: "session-1".to_string(),
        draft: ClientDraft {
            name: "Dana Whitfield".to_string(),
            lender: Some("Westpac".to_string()),
            ..ClientDraft::default()
        },
    };

    let encoded = encode(&request).expect("encode failed");
    let decoded: Request = decode(&encoded).expect("decode failed");
    assert_eq!(request, decoded);
}

#[tokio::test]
async fn frames_round_trip_over_a_stream() {
    let (mut client, mut server) = tokio::io::duplex(1024);

    let request = Request::Hello {
        version: PROTOCOL_VERSION.to_string(),
    };
    write_frame(&mut client, &request, DEFAULT_TIMEOUT)
        .await
        .expect("write failed");

    let received: Request = read_frame(&mut server, DEFAULT_TIMEOUT)
        .await
        .expect("read failed");
    assert_eq!(received, request);
}

#[tokio::test]
async fn closed_connection_is_distinguished() {
    let (client, mut server) = tokio::io::duplex(1024);
    drop(client);

    let result: Result<Request, _> = read_frame(&mut server, DEFAULT_TIMEOUT).await;
    assert!(matches!(result, Err(ProtocolError::ConnectionClosed)));
}

#[tokio::test]
async fn oversized_frames_are_rejected() {
    let (mut client, mut server) = tokio::io::duplex(64);

    // A length prefix claiming 100 MB
    use tokio::io::AsyncWriteExt;
    client.write_all(&(100_000_000u32).to_be_bytes()).await.unwrap();

    let result: Result<Request, _> = read_frame(&mut server, DEFAULT_TIMEOUT).await;
    assert!(matches!(result, Err(ProtocolError::FrameTooLarge(_))));
}
