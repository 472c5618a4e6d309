//! Tests for ChatBridge running without a host

use elite_chat_widget::bridge::{ChatBridge, HostContext, SendOutcome, WidgetEvent, MOCK_REPLY};
use elite_chat_widget::chat::{BridgeState, Message, MessageRole};
use elite_chat_widget::config::{WidgetConfig, DEFAULT_WELCOME_MESSAGE};
use std::time::Duration;
use tokio::time::Instant;

fn standalone_bridge() -> ChatBridge {
    assert!(!HostContext::Standalone.is_embedded());
    let mut bridge = ChatBridge::new(WidgetConfig::default(), HostContext::Standalone);
    bridge.initialize();
    bridge
}

#[test]
fn test_initialize_seeds_welcome_only() {
    let bridge = standalone_bridge();
    assert_eq!(bridge.state(), BridgeState::default());
    assert_eq!(
        bridge.messages(),
        &[Message::assistant(DEFAULT_WELCOME_MESSAGE)]
    );
    assert!(bridge.name_prompt_visible());
}

#[tokio::test(start_paused = true)]
async fn test_send_message_appends_and_replies_after_delay() {
    let mut bridge = standalone_bridge();
    let start = Instant::now();

    assert_eq!(bridge.send_message("How do I handle price?"), SendOutcome::Sent);
    assert!(bridge.is_awaiting_reply());
    assert_eq!(bridge.messages().len(), 2);
    assert_eq!(bridge.messages()[1], Message::user("How do I handle price?"));

    let event = bridge.next_event().await.expect("mock reply");
    assert!(start.elapsed() >= Duration::from_millis(1000));
    bridge.handle_event(event);

    assert!(!bridge.is_awaiting_reply());
    let last = bridge.messages().last().unwrap();
    assert_eq!(last.role, MessageRole::Assistant);
    assert_eq!(last.content, MOCK_REPLY);
}

#[tokio::test(start_paused = true)]
async fn test_command_reply_echoes_input() {
    let mut bridge = standalone_bridge();

    assert_eq!(bridge.send_command("!roleplay price"), SendOutcome::Sent);
    let event = bridge.next_event().await.expect("mock reply");
    bridge.handle_event(event);

    assert_eq!(bridge.messages()[1], Message::user("!roleplay price"));
    assert_eq!(
        bridge.messages()[2].content,
        "You've used a command: !roleplay price. In the full version, this would trigger specific training content."
    );
}

#[tokio::test(start_paused = true)]
async fn test_second_send_is_ignored_while_waiting() {
    let mut bridge = standalone_bridge();

    assert_eq!(bridge.send_message("first"), SendOutcome::Sent);
    assert_eq!(bridge.send_message("second"), SendOutcome::Busy);
    assert_eq!(bridge.send_command("!pvf"), SendOutcome::Busy);
    assert_eq!(bridge.messages().len(), 2);

    let event = bridge.next_event().await.expect("mock reply");
    bridge.handle_event(event);
    assert_eq!(bridge.messages().len(), 3);

    assert_eq!(bridge.send_message("second"), SendOutcome::Sent);
    assert_eq!(bridge.messages().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_no_reply_before_delay() {
    let mut bridge = standalone_bridge();
    bridge.send_message("hello");

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(bridge.try_next_event().is_none());
    assert!(bridge.is_awaiting_reply());

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(bridge.process_pending(), 1);
    assert!(!bridge.is_awaiting_reply());
}

#[tokio::test]
async fn test_blank_input_changes_nothing() {
    let mut bridge = standalone_bridge();
    assert_eq!(bridge.send_message("  "), SendOutcome::Blank);
    assert_eq!(bridge.send_command(""), SendOutcome::Blank);
    assert_eq!(bridge.messages().len(), 1);
    assert!(!bridge.is_awaiting_reply());
    assert!(bridge.try_next_event().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_reply_after_unmount_is_dropped() {
    let mut bridge = standalone_bridge();
    bridge.send_message("hello");
    bridge.unmount();

    let event = bridge.next_event().await.expect("timer still fires");
    assert!(matches!(event, WidgetEvent::MockReply(_)));
    bridge.handle_event(event);

    assert_eq!(bridge.messages().len(), 2);
    assert!(bridge.is_awaiting_reply());
}

#[tokio::test(start_paused = true)]
async fn test_reply_after_drop_is_harmless() {
    let mut bridge = standalone_bridge();
    bridge.send_message("hello");
    drop(bridge);

    tokio::time::sleep(Duration::from_secs(2)).await;
}

#[tokio::test(start_paused = true)]
async fn test_configured_delay_is_used() {
    let config = WidgetConfig {
        mock_delay: Duration::from_millis(50),
        ..WidgetConfig::default()
    };
    let mut bridge = ChatBridge::new(config, HostContext::Standalone);
    assert_eq!(bridge.config().mock_delay, Duration::from_millis(50));
    let start = Instant::now();

    bridge.send_message("quick");
    let event = bridge.next_event().await.expect("mock reply");
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(50));
    assert!(elapsed < Duration::from_millis(1000));
    bridge.handle_event(event);
    assert!(!bridge.is_awaiting_reply());
}

#[test]
fn test_names_apply_locally() {
    let mut bridge = standalone_bridge();
    assert!(bridge.submit_name("  Alice  "));
    assert_eq!(bridge.identity().user_name, "Alice");
    assert!(!bridge.name_prompt_visible());

    let mut other = standalone_bridge();
    assert!(other.skip_name());
    assert_eq!(other.identity().user_name, "User");
    assert!(other.identity().name_confirmed);

    other.request_layout(800);
}
