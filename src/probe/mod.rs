//! Live SMTP probe of one mail exchange.
//!
//! The dialogue is `HELO` / `MAIL FROM` / `RCPT TO`; `DATA` is never sent.
//! [`state`] holds the pure transition table and this module feeds it socket
//! events under a single deadline.

mod options;
mod session;
mod state;
mod types;

pub use options::ProbeOptions;
pub use types::{ProbeReason, ProbeReport, ProbeResult, SmtpReply};

use tokio::time::{Instant, timeout, timeout_at};
use tracing::{debug, info};

use crate::validator::EmailAddress;
use session::{SessionError, SmtpSession};
use state::{Dialogue, ProbeEvent, ProbeState, Transition};

/// Probes `recipient` against `exchange`.
///
/// Never fails: every network or protocol problem ends up as a
/// [`ProbeReason`]. The deadline from `options` covers the connect and the
/// whole dialogue. Once a verdict exists, `QUIT` is sent from a detached task
/// so it never delays the result.
pub async fn probe_mailbox(
    exchange: &str,
    recipient: &EmailAddress,
    options: &ProbeOptions,
) -> ProbeReport {
    let deadline = Instant::now() + options.timeout();
    let exchange = exchange.trim_end_matches('.').to_ascii_lowercase();
    let sender = options.envelope_sender();
    let rcpt = recipient.to_string();
    let dialogue = Dialogue {
        helo_domain: options.helo_name(),
        mail_from: &sender,
        recipient: &rcpt,
    };

    debug!(%exchange, port = options.port, "connecting to mail exchange");

    let connected = timeout_at(deadline, SmtpSession::connect(&exchange, options.port)).await;
    let mut session = match connected {
        Ok(Ok(session)) => session,
        Ok(Err(err)) => {
            let event = ProbeEvent::Failed(err.to_string());
            let state = ProbeState::Connecting.transition(event, &dialogue).state;
            return finish(exchange, state, Vec::new());
        }
        Err(_) => {
            let state = ProbeState::Connecting
                .transition(ProbeEvent::TimedOut, &dialogue)
                .state;
            return finish(exchange, state, Vec::new());
        }
    };

    let mut state = ProbeState::Connecting;
    // false once the socket failed, closed or timed out
    let mut healthy = true;
    while !state.is_done() {
        let (event, usable) = next_event(&mut session, deadline).await;
        healthy = usable;
        let Transition { state: next, command } = state.transition(event, &dialogue);
        state = next;

        let Some(command) = command else { continue };
        let event = match timeout_at(deadline, session.send_command(&command)).await {
            Ok(Ok(())) => continue,
            Ok(Err(err)) => ProbeEvent::Failed(err.to_string()),
            Err(_) => ProbeEvent::TimedOut,
        };
        healthy = false;
        state = state.transition(event, &dialogue).state;
    }

    let transcript = std::mem::take(&mut session.transcript);
    if healthy {
        let quit_timeout = options.quit_timeout();
        tokio::spawn(async move {
            let _ = timeout(quit_timeout, session.quit()).await;
        });
    }
    finish(exchange, state, transcript)
}

/// The next event, and whether the socket can still carry a `QUIT`.
async fn next_event(session: &mut SmtpSession, deadline: Instant) -> (ProbeEvent, bool) {
    match timeout_at(deadline, session.read_reply()).await {
        Err(_) => (ProbeEvent::TimedOut, false),
        Ok(Err(SessionError::Closed)) => (ProbeEvent::Closed, false),
        Ok(Err(err)) => (ProbeEvent::Failed(err.to_string()), !err.is_fatal()),
        Ok(Ok(reply)) if reply.code == 0 => (
            ProbeEvent::Failed(format!("unparsable reply: {}", reply.message)),
            true,
        ),
        Ok(Ok(reply)) => (ProbeEvent::Reply(reply), true),
    }
}

fn finish(exchange: String, state: ProbeState, transcript: Vec<String>) -> ProbeReport {
    let result = state.into_result().unwrap_or_else(|| {
        ProbeResult::failed(
            ProbeReason::SmtpConnectionError,
            "probe ended without a verdict",
        )
    });
    info!(
        %exchange,
        reason = %result.reason,
        valid = result.valid,
        "SMTP probe finished"
    );
    ProbeReport {
        exchange,
        result,
        transcript,
    }
}
