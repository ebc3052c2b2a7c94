//! Builders for transport notification JSON.
//!
//! Each builder produces the exact envelope a transport would deliver, so
//! tests exercise the decoder as well as the engine.

use serde_json::{Value, json};

/// Envelope with an arbitrary status, kind, and string payload.
pub fn envelope(status: bool, kind: &str, data: &str) -> String {
    json!({ "status": status, "type": kind, "data": data }).to_string()
}

fn ok(kind: &str, data: &Value) -> String {
    envelope(true, kind, &data.to_string())
}

fn ok_empty(kind: &str) -> String {
    envelope(true, kind, "")
}

/// `ConnectedToServer`.
pub fn connected_to_server() -> String {
    ok_empty("ConnectedToServer")
}

/// `Connected`.
pub fn connected() -> String {
    ok_empty("Connected")
}

/// `ConnectFailed` with a reason.
pub fn connect_failed(reason: &str) -> String {
    envelope(true, "ConnectFailed", reason)
}

/// `JoinedChannel`.
pub fn joined_channel() -> String {
    ok_empty("JoinedChannel")
}

/// `JoinChannelFailed` with a reason.
pub fn join_channel_failed(reason: &str) -> String {
    envelope(true, "JoinChannelFailed", reason)
}

/// `LeftChannel`.
pub fn left_channel() -> String {
    ok_empty("LeftChannel")
}

/// `BeginMediaStreamSuccess`.
pub fn stream_began() -> String {
    ok_empty("BeginMediaStreamSuccess")
}

/// `BeginMediaStreamFailed` with a reason.
pub fn stream_failed(reason: &str) -> String {
    envelope(true, "BeginMediaStreamFailed", reason)
}

/// `UserConnected` for a named user.
pub fn user_connected(id: &str, name: &str, is_self: bool) -> String {
    ok("UserConnected", &json!({ "id": id, "main": is_self, "user": { "name": name } }))
}

/// `UserDisconnected`.
pub fn user_disconnected(id: &str) -> String {
    ok("UserDisconnected", &json!({ "id": id }))
}

fn message_value(author: &str, text: &str, created_at_ms: i64) -> Value {
    json!({ "userId": author, "message": text, "createdAt": created_at_ms })
}

/// `MessageReceived`.
pub fn message(author: &str, text: &str, created_at_ms: i64) -> String {
    ok("MessageReceived", &message_value(author, text, created_at_ms))
}

/// `ChannelStateReceived` carrying `(author, text, created_at_ms)` entries
/// in the given order.
pub fn channel_state(messages: &[(&str, &str, i64)]) -> String {
    let messages: Vec<_> =
        messages.iter().map(|(author, text, at)| message_value(author, text, *at)).collect();
    ok("ChannelStateReceived", &json!({ "messages": messages }))
}

/// Binary notification metadata for a tightly packed RGBA32 frame.
pub fn frame_metadata(user_id: &str, width: u32, height: u32) -> String {
    let length = u64::from(width) * u64::from(height) * 4;
    json!({
        "type": "VideoFrameReceived",
        "userId": user_id,
        "width": width,
        "height": height,
        "length": length,
    })
    .to_string()
}
