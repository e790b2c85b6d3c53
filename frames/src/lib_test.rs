use super::*;

#[test]
fn joined_object_is_control_frame() {
    let frame = decode_frame(r#"{"joined":"Alice"}"#);
    assert_eq!(frame, Frame::joined("Alice"));
}

#[test]
fn left_object_is_control_frame() {
    let frame = decode_frame(r#"{"left":"User left the room"}"#);
    assert_eq!(frame, Frame::left("User left the room"));
}

#[test]
fn joined_key_wins_when_both_are_present() {
    let frame = decode_frame(r#"{"left":"bob","joined":"alice"}"#);
    assert_eq!(frame, Frame::joined("alice"));
}

#[test]
fn plain_text_is_content_verbatim() {
    let raw = "def main():\n    print('hi')\n";
    assert_eq!(decode_frame(raw), Frame::content(raw));
}

#[test]
fn malformed_json_is_content_verbatim() {
    let raw = r#"{"joined": "#;
    assert_eq!(decode_frame(raw), Frame::content(raw));
}

#[test]
fn json_without_presence_keys_is_content() {
    let raw = r#"{"config": {"joined": "nested"}}"#;
    assert_eq!(decode_frame(raw), Frame::content(raw));
}

#[test]
fn non_object_json_is_content() {
    for raw in ["42", "\"quoted\"", "[1,2]", "null", "true"] {
        assert_eq!(decode_frame(raw), Frame::content(raw), "payload {raw}");
    }
}

#[test]
fn falsy_presence_value_is_content() {
    for raw in [
        r#"{"joined":""}"#,
        r#"{"joined":null}"#,
        r#"{"left":false}"#,
        r#"{"left":0}"#,
    ] {
        assert_eq!(decode_frame(raw), Frame::content(raw), "payload {raw}");
    }
}

#[test]
fn falsy_joined_falls_through_to_left() {
    let frame = decode_frame(r#"{"joined":"","left":"carol"}"#);
    assert_eq!(frame, Frame::left("carol"));
}

#[test]
fn non_string_presence_value_uses_json_rendering() {
    let frame = decode_frame(r#"{"joined":7}"#);
    assert_eq!(frame, Frame::joined("7"));
}

#[test]
fn encoded_control_frame_decodes_to_itself() {
    let frame = Frame::joined("new user joined");
    let raw = encode_frame(&frame);
    assert_eq!(raw, r#"{"joined":"new user joined"}"#);
    assert_eq!(decode_frame(&raw), frame);
}

#[test]
fn encoded_content_is_raw_text() {
    let frame = Frame::content("x = 1");
    assert_eq!(encode_frame(&frame), "x = 1");
}

#[test]
fn room_socket_path_embeds_room_id() {
    assert_eq!(room_socket_path("abc123"), "/ws/room/abc123");
}

#[test]
fn room_summary_accepts_null_content() {
    let room: RoomSummary =
        serde_json::from_str(r#"{"id":"abc","content":null,"created_at":"2024-01-01T00:00:00"}"#)
            .expect("room should parse");
    assert_eq!(room.id, "abc");
    assert!(room.content.is_none());
}

#[test]
fn autocomplete_request_uses_wire_field_names() {
    let req = AutocompleteRequest {
        code_context: "import os".into(),
        cursor_line: 0,
        cursor_column: 9,
        language: DEFAULT_LANGUAGE.into(),
    };
    let value = serde_json::to_value(&req).expect("serialize");
    assert_eq!(
        value,
        serde_json::json!({
            "code_context": "import os",
            "cursor_line": 0,
            "cursor_column": 9,
            "language": "python",
        })
    );
}

#[test]
fn autocomplete_response_defaults_missing_suggestion() {
    let resp: AutocompleteResponse = serde_json::from_str("{}").expect("parse");
    assert!(resp.suggestion.is_empty());
}
