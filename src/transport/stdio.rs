//! JSON-lines host transport
//!
//! Runs an embedded bridge against a host that speaks one JSON object per
//! line: render events come in on the input stream, lifecycle signals and
//! outbound values go out on the output stream.

use crate::bridge::protocol::{decode_host_event, encode_signal, HostEvent};
use crate::bridge::{ChatBridge, HostHandle, HostRenderer};
use crate::error::WidgetError;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// Forward render events read from `input` to the bridge's listeners
///
/// Blank lines are skipped; lines that do not decode are logged and skipped.
///
/// # Returns
/// * `Ok(usize)` - number of render events forwarded before end of input
/// * `Err(WidgetError::Io)` - reading from `input` failed
pub async fn read_host_events<R>(input: R, renderer: HostRenderer) -> Result<usize, WidgetError>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    let mut forwarded = 0;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match decode_host_event(&line) {
            Ok(HostEvent::Render { args }) => {
                let delivered = renderer.render(args);
                debug!(delivered, "Render event forwarded");
                forwarded += 1;
            }
            Err(e) => {
                warn!(error = %e, line_len = line.len(), "Skipping undecodable host line");
            }
        }
    }

    debug!(forwarded, "Host input closed");
    Ok(forwarded)
}

/// Write every signal the widget emits to `output`, one JSON line each
///
/// Runs until the widget side of the channel is dropped.
///
/// # Returns
/// * `Ok(usize)` - number of signals written
/// * `Err(WidgetError)` - encoding or writing failed
pub async fn write_host_signals<W>(mut handle: HostHandle, mut output: W) -> Result<usize, WidgetError>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while let Some(signal) = handle.next_signal().await {
        let line = encode_signal(&signal)?;
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
        written += 1;
    }
    Ok(written)
}

/// Drive an embedded bridge until the host closes its input
///
/// Initializes the bridge, applies events in delivery order, then unmounts
/// and waits for every emitted signal to be written.
///
/// # Arguments
/// * `bridge` - Bridge built with the `ChannelHost` paired with `handle`
/// * `handle` - Host side of that channel
/// * `input` - Stream of host events
/// * `output` - Stream receiving widget signals
pub async fn serve<R, W>(
    mut bridge: ChatBridge,
    handle: HostHandle,
    input: R,
    output: W,
) -> Result<(), WidgetError>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    // listener must exist before the first line is read
    bridge.initialize();

    let renderer = handle.renderer();
    let mut reader = tokio::spawn(async move { read_host_events(input, renderer).await });
    let writer = tokio::spawn(async move { write_host_signals(handle, output).await });

    let read_result = loop {
        tokio::select! {
            event = bridge.next_event() => match event {
                Some(event) => bridge.handle_event(event),
                None => break Ok(0),
            },
            joined = &mut reader => {
                break joined.map_err(|e| WidgetError::Io(std::io::Error::other(e)))?;
            }
        }
    };

    // events queued before the input closed still apply
    bridge.process_pending();
    bridge.unmount();
    drop(bridge);

    let written = writer
        .await
        .map_err(|e| WidgetError::Io(std::io::Error::other(e)))??;
    let forwarded = read_result?;
    info!(forwarded, written, "Host transport finished");
    Ok(())
}

/// [`serve`] over the process's stdin and stdout
pub async fn serve_stdio(bridge: ChatBridge, handle: HostHandle) -> Result<(), WidgetError> {
    serve(bridge, handle, tokio::io::stdin(), tokio::io::stdout()).await
}
