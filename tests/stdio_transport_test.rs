//! Tests for the JSON-lines host transport

use elite_chat_widget::bridge::{
    ChannelHost, ChatBridge, HostContext, HostSignal, OutboundValue, RenderArgs,
};
use elite_chat_widget::chat::Message;
use elite_chat_widget::config::WidgetConfig;
use elite_chat_widget::transport::stdio::{read_host_events, serve, write_host_signals};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

#[tokio::test]
async fn test_read_host_events_skips_bad_lines() {
    let (host, handle) = ChannelHost::pair();
    let mut bridge = ChatBridge::new(WidgetConfig::default(), HostContext::embedded(host));
    bridge.initialize();

    let input = concat!(
        r#"{"type":"render","args":{"messages":[{"role":"assistant","content":"Hi"}]}}"#,
        "\n",
        "\n",
        "this is not json\n",
        r#"{"type":"unknown"}"#,
        "\n",
        r#"{"type":"render","args":{"user_name":"Alice","session_id":"s-1"}}"#,
        "\n",
    );

    let forwarded = read_host_events(input.as_bytes(), handle.renderer())
        .await
        .unwrap();
    assert_eq!(forwarded, 2);

    assert_eq!(bridge.process_pending(), 2);
    assert_eq!(bridge.messages(), &[Message::assistant("Hi")]);
    assert_eq!(bridge.identity().user_name, "Alice");
    assert_eq!(bridge.session_id(), Some("s-1"));
}

#[tokio::test]
async fn test_write_host_signals_one_line_each() {
    let (host, handle) = ChannelHost::pair();
    let mut bridge = ChatBridge::new(WidgetConfig::default(), HostContext::embedded(host));
    bridge.initialize();
    bridge.send_command("!pvf");
    drop(bridge);

    let mut output = Vec::new();
    let written = write_host_signals(handle, &mut output).await.unwrap();
    assert_eq!(written, 3);

    let text = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], r#"{"type":"component_ready"}"#);
    assert_eq!(lines[1], r#"{"type":"set_frame_height","height":800}"#);

    let last: HostSignal = serde_json::from_str(lines[2]).unwrap();
    assert_eq!(
        last,
        HostSignal::SetComponentValue {
            value: OutboundValue::SendCommand {
                command: "!pvf".to_string(),
                user_name: "User".to_string(),
            }
        }
    );
}

#[tokio::test]
async fn test_serve_until_input_closes() {
    let (host, handle) = ChannelHost::pair();
    let bridge = ChatBridge::new(WidgetConfig::default(), HostContext::embedded(host));

    let (mut host_in, widget_in) = tokio::io::duplex(4096);
    let (widget_out, mut host_out) = tokio::io::duplex(4096);

    let render = serde_json::json!({
        "type": "render",
        "args": RenderArgs::with_messages(vec![Message::assistant("ROLE_PLAY_LEVEL:2END_ROLE_PLAY_LEVEL Go.")]),
    });
    host_in
        .write_all(format!("{}\ngarbage\n", render).as_bytes())
        .await
        .unwrap();
    drop(host_in);

    serve(bridge, handle, widget_in, widget_out).await.unwrap();

    let mut text = String::new();
    host_out.read_to_string(&mut text).await.unwrap();
    let signals: Vec<HostSignal> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(
        signals,
        vec![
            HostSignal::ComponentReady,
            HostSignal::SetFrameHeight { height: 800 },
            HostSignal::SetFrameHeight { height: 800 },
        ]
    );
}
