use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{error, info};

use crate::analysis::{Lifecycle, PlaceholderAnalyzer, SessionState};
use crate::config::Config;
use crate::log::init;
use crate::lsp::dispatcher::Dispatcher;
use crate::rpc::{FrameReader, FrameWriter, TransportError, decode};

/// How the message loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The editor closed the input stream
    EndOfStream,
    /// An `exit` notification was received
    Exit { clean: bool },
}

impl SessionOutcome {
    /// Process exit code: 1 only for `exit` without a prior `shutdown`
    pub fn exit_code(self) -> i32 {
        match self {
            SessionOutcome::EndOfStream | SessionOutcome::Exit { clean: true } => 0,
            SessionOutcome::Exit { clean: false } => 1,
        }
    }
}

pub async fn run_server(config: &Config) -> anyhow::Result<SessionOutcome> {
    let _guard = init(config)?;

    info!("Starting loom-lsp server");

    let analyzer = Arc::new(PlaceholderAnalyzer::with_delay(config.analysis_delay));
    let dispatcher = Dispatcher::new(analyzer);
    let mut state = SessionState::new();

    let outcome = serve(
        tokio::io::stdin(),
        tokio::io::stdout(),
        &dispatcher,
        &mut state,
    )
    .await?;

    info!("loom-lsp server stopped: {:?}", outcome);
    Ok(outcome)
}

/// Reads frames from `input` until end of stream or `exit`, writing responses
/// to `output`. Messages are handled strictly one at a time, in arrival order.
///
/// Only I/O failures are returned; bad frames and bad payloads are logged and
/// skipped.
pub async fn serve<R, W>(
    input: R,
    output: W,
    dispatcher: &Dispatcher,
    state: &mut SessionState,
) -> Result<SessionOutcome, TransportError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = FrameReader::new(input);
    let mut writer = FrameWriter::new(output);

    loop {
        let body = match reader.next_frame().await {
            Ok(Some(body)) => body,
            Ok(None) => break,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                error!("Got a framing error: {}", e);
                continue;
            }
        };

        let message = match decode(&body) {
            Ok(message) => message,
            Err(e) => {
                error!("Got an error: {}", e);
                continue;
            }
        };

        if let Some(response) = dispatcher.dispatch(state, message).await {
            match writer.write(&response).await {
                Ok(()) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => error!("Failed to write response {}: {}", response.id, e),
            }
        }

        if let Lifecycle::Exited { clean } = state.lifecycle {
            return Ok(SessionOutcome::Exit { clean });
        }
    }

    Ok(SessionOutcome::EndOfStream)
}
