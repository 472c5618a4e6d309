//! Elite Chat Widget
//!
//! Runs the chat widget's protocol layer either embedded behind a host that
//! speaks JSON lines on stdin/stdout, or standalone in a terminal with mock
//! replies.

use anyhow::Context;
use clap::Parser;
use elite_chat_widget::bridge::{ChannelHost, ChatBridge, HostContext, SendOutcome};
use elite_chat_widget::chat::commands::{find_quick_action, QUICK_ACTIONS};
use elite_chat_widget::chat::MessageRole;
use elite_chat_widget::config::WidgetConfig;
use elite_chat_widget::transport;
use std::io::IsTerminal;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "elite-chat-widget", version, about = "Chat widget host bridge")]
struct Cli {
    /// Run without a host, answering with mock replies
    #[arg(long, conflicts_with = "embedded")]
    standalone: bool,

    /// Run behind a host speaking JSON lines on stdin/stdout
    #[arg(long)]
    embedded: bool,

    /// Layout height requested from the host, in pixels
    #[arg(long)]
    frame_height: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Without a flag, a terminal on stdin means nobody is hosting us
    let standalone = cli.standalone || (!cli.embedded && std::io::stdin().is_terminal());

    // stdout carries the host protocol, so logs go to stderr
    let default_filter = if standalone { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = WidgetConfig::from_env();
    if let Some(height) = cli.frame_height {
        config = config.with_frame_height(height);
    }
    config.validate().context("invalid widget configuration")?;
    info!(standalone, "Configuration loaded: {:?}", config);

    if standalone {
        run_standalone(config).await
    } else {
        run_embedded(config).await
    }
}

async fn run_embedded(config: WidgetConfig) -> anyhow::Result<()> {
    let (host, handle) = ChannelHost::pair();
    let bridge = ChatBridge::new(config, HostContext::embedded(host));

    tokio::select! {
        result = transport::serve_stdio(bridge, handle) => {
            result.context("host transport failed")?;
        }
        _ = shutdown_signal() => {
            info!("Shutting down embedded widget");
        }
    }
    Ok(())
}

async fn run_standalone(config: WidgetConfig) -> anyhow::Result<()> {
    let mut bridge = ChatBridge::new(config, HostContext::Standalone);
    bridge.initialize();

    println!("Standalone mode: no host connected, replies are simulated.");
    if bridge.name_prompt_visible() {
        println!("Enter your name with /name <your name>, or /skip. Type /menu for commands, /quit to exit.");
    }
    let mut printed = print_new_messages(&bridge, 0);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_input(&mut bridge, &line) {
                    break;
                }
            }
            Some(event) = bridge.next_event() => bridge.handle_event(event),
            _ = &mut shutdown => break,
        }
        printed = print_new_messages(&bridge, printed);
    }

    bridge.unmount();
    Ok(())
}

/// Argument of a `/name` command; `None` for any other input
fn name_argument(input: &str) -> Option<&str> {
    match input.split_once(char::is_whitespace) {
        Some(("/name", rest)) => Some(rest),
        None if input == "/name" => Some(""),
        _ => None,
    }
}

/// Apply one line typed in standalone mode; `false` ends the session
fn handle_input(bridge: &mut ChatBridge, line: &str) -> bool {
    let input = line.trim();

    if input == "/quit" {
        return false;
    }
    if input == "/menu" {
        print_menu();
        return true;
    }
    if input == "/skip" {
        if bridge.skip_name() {
            println!("Continuing as {}.", bridge.identity().user_name);
        }
        return true;
    }
    if let Some(name) = name_argument(input) {
        if bridge.submit_name(name) {
            println!("Welcome, {}!", bridge.identity().user_name);
        } else if name.trim().is_empty() {
            println!("Please enter a name after /name.");
        }
        return true;
    }

    let outcome = match find_quick_action(input) {
        Some(action) => bridge.send_command(action.command),
        None => bridge.send_message(line),
    };
    if outcome == SendOutcome::Busy {
        println!("(still waiting for the previous reply)");
    }
    true
}

fn print_menu() {
    for group in QUICK_ACTIONS {
        let labels: Vec<&str> = group.actions.iter().map(|a| a.label).collect();
        println!("{}: {}", group.title, labels.join(", "));
    }
}

/// Print messages from index `from` on; returns the new printed count
fn print_new_messages(bridge: &ChatBridge, from: usize) -> usize {
    let mut count = from;
    for (message, parsed) in bridge.parsed_messages().skip(from) {
        match message.role {
            MessageRole::User => println!("\n> {}", message.content),
            MessageRole::Assistant => {
                if let Some(tip) = &parsed.coaching_tip {
                    println!("\n[Coaching Tip] {}", tip);
                }
                if parsed.role_play_level.is_some() {
                    println!("[Role-Play Depth: Level {}]", parsed.level_or_default());
                }
                println!("\n{}", parsed.display_content);
            }
        }
        count += 1;
    }
    count
}

/// Resolve on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_argument_requires_whole_command() {
        assert_eq!(name_argument("/name Alice"), Some("Alice"));
        assert_eq!(name_argument("/name"), Some(""));
        assert_eq!(name_argument("/nameless"), None);
        assert_eq!(name_argument("/names Bob"), None);
        assert_eq!(name_argument("hello /name Alice"), None);
    }
}
