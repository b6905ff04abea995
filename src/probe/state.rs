//! The probe dialogue as an explicit state machine.
//!
//! [`ProbeState::transition`] is pure: it consumes the current state and one
//! event and returns the next state plus, at most, one command to write. The
//! socket driver in `super` owns all I/O.

use super::types::{ProbeReason, ProbeResult, SmtpReply};

const GREETING_OK: u16 = 220;
const COMPLETED: u16 = 250;
const MAILBOX_UNAVAILABLE: u16 = 550;

/// Parameters of the scripted dialogue.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Dialogue<'a> {
    pub helo_domain: &'a str,
    pub mail_from: &'a str,
    pub recipient: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ProbeEvent {
    Reply(SmtpReply),
    /// Peer closed the connection.
    Closed,
    /// Connect, read or write failure.
    Failed(String),
    /// The probe deadline elapsed.
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ProbeState {
    Connecting,
    HeloSent,
    MailFromSent,
    RcptToSent,
    Done(ProbeResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Transition {
    pub state: ProbeState,
    pub command: Option<String>,
}

impl Transition {
    fn advance(state: ProbeState, command: String) -> Self {
        Self {
            state,
            command: Some(command),
        }
    }

    fn finish(result: ProbeResult) -> Self {
        Self {
            state: ProbeState::Done(result),
            command: None,
        }
    }
}

impl ProbeState {
    pub(crate) fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    #[cfg(test)]
    pub(crate) fn result(&self) -> Option<&ProbeResult> {
        match self {
            Self::Done(result) => Some(result),
            _ => None,
        }
    }

    pub(crate) fn into_result(self) -> Option<ProbeResult> {
        match self {
            Self::Done(result) => Some(result),
            _ => None,
        }
    }

    /// `Done` absorbs every event, so a probe resolves exactly once.
    pub(crate) fn transition(self, event: ProbeEvent, dialogue: &Dialogue<'_>) -> Transition {
        let step = match (self, event) {
            (done @ Self::Done(_), _) => {
                return Transition {
                    state: done,
                    command: None,
                };
            }
            (_, ProbeEvent::TimedOut) => {
                return Transition::finish(ProbeResult::failed(
                    ProbeReason::SmtpTimeout,
                    "SMTP dialogue did not complete before the deadline",
                ));
            }
            (_, ProbeEvent::Failed(err)) => {
                return Transition::finish(ProbeResult::failed(
                    ProbeReason::SmtpConnectionError,
                    format!("connection error: {err}"),
                ));
            }
            (_, ProbeEvent::Closed) => {
                return Transition::finish(ProbeResult::failed(
                    ProbeReason::ConnectionClosedUnexpectedly,
                    "server closed the connection before the dialogue finished",
                ));
            }
            (state, ProbeEvent::Reply(reply)) => (state, reply),
        };

        match step {
            (Self::Connecting, reply) if reply.code == GREETING_OK => Transition::advance(
                Self::HeloSent,
                format!("HELO {}", dialogue.helo_domain),
            ),
            (Self::Connecting, reply) => Transition::finish(ProbeResult::failed(
                ProbeReason::SmtpGreetingError,
                format!("unexpected greeting: {reply}"),
            )),
            (Self::HeloSent, reply) if reply.code == COMPLETED => Transition::advance(
                Self::MailFromSent,
                format!("MAIL FROM:<{}>", dialogue.mail_from),
            ),
            (Self::HeloSent, reply) => Transition::finish(ProbeResult::failed(
                ProbeReason::SmtpHeloError,
                format!("HELO rejected: {reply}"),
            )),
            (Self::MailFromSent, reply) if reply.code == COMPLETED => Transition::advance(
                Self::RcptToSent,
                format!("RCPT TO:<{}>", dialogue.recipient),
            ),
            (Self::MailFromSent, reply) => Transition::finish(ProbeResult::failed(
                ProbeReason::SmtpMailFromError,
                format!("MAIL FROM rejected: {reply}"),
            )),
            (Self::RcptToSent, reply) if reply.code == COMPLETED => {
                Transition::finish(ProbeResult::valid(format!("mailbox accepted: {reply}")))
            }
            (Self::RcptToSent, reply) if reply.code == MAILBOX_UNAVAILABLE => {
                Transition::finish(ProbeResult::failed(
                    ProbeReason::InvalidMailbox,
                    format!("mailbox rejected: {reply}"),
                ))
            }
            (Self::RcptToSent, reply) => Transition::finish(ProbeResult::failed(
                ProbeReason::AmbiguousSmtpResponse,
                format!("unexpected RCPT TO reply: {reply}"),
            )),
            (done @ Self::Done(_), _) => Transition {
                state: done,
                command: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIALOGUE: Dialogue<'static> = Dialogue {
        helo_domain: "probe.local",
        mail_from: "verify@probe.local",
        recipient: "user@example.com",
    };

    fn reply(code: u16) -> ProbeEvent {
        ProbeEvent::Reply(SmtpReply::new(code, "text"))
    }

    fn reason_of(transition: &Transition) -> ProbeReason {
        transition
            .state
            .result()
            .map(|result| result.reason)
            .expect("terminal state")
    }

    #[test]
    fn happy_path_sends_commands_in_order() {
        let t = ProbeState::Connecting.transition(reply(220), &DIALOGUE);
        assert_eq!(t.command.as_deref(), Some("HELO probe.local"));
        let t = t.state.transition(reply(250), &DIALOGUE);
        assert_eq!(t.command.as_deref(), Some("MAIL FROM:<verify@probe.local>"));
        let t = t.state.transition(reply(250), &DIALOGUE);
        assert_eq!(t.command.as_deref(), Some("RCPT TO:<user@example.com>"));
        let t = t.state.transition(reply(250), &DIALOGUE);
        assert!(t.command.is_none());
        let result = t.state.result().expect("done");
        assert!(result.valid);
        assert_eq!(result.reason, ProbeReason::ValidMailbox);
    }

    #[test]
    fn unexpected_codes_map_to_stage_errors() {
        let cases = [
            (ProbeState::Connecting, 554, ProbeReason::SmtpGreetingError),
            (ProbeState::Connecting, 250, ProbeReason::SmtpGreetingError),
            (ProbeState::HeloSent, 501, ProbeReason::SmtpHeloError),
            (ProbeState::MailFromSent, 553, ProbeReason::SmtpMailFromError),
            (ProbeState::RcptToSent, 550, ProbeReason::InvalidMailbox),
            (ProbeState::RcptToSent, 451, ProbeReason::AmbiguousSmtpResponse),
            (ProbeState::RcptToSent, 0, ProbeReason::AmbiguousSmtpResponse),
        ];
        for (state, code, expected) in cases {
            let t = state.transition(reply(code), &DIALOGUE);
            assert!(t.command.is_none(), "no command after failure ({code})");
            assert_eq!(reason_of(&t), expected, "code {code}");
        }
    }

    #[test]
    fn socket_events_terminate_from_any_state() {
        for state in [
            ProbeState::Connecting,
            ProbeState::HeloSent,
            ProbeState::MailFromSent,
            ProbeState::RcptToSent,
        ] {
            let t = state.clone().transition(ProbeEvent::TimedOut, &DIALOGUE);
            assert_eq!(reason_of(&t), ProbeReason::SmtpTimeout);
            let t = state.clone().transition(ProbeEvent::Closed, &DIALOGUE);
            assert_eq!(reason_of(&t), ProbeReason::ConnectionClosedUnexpectedly);
            let t = state.transition(ProbeEvent::Failed("reset".into()), &DIALOGUE);
            assert_eq!(reason_of(&t), ProbeReason::SmtpConnectionError);
        }
    }

    #[test]
    fn done_absorbs_further_events() {
        let done = ProbeState::RcptToSent
            .transition(reply(550), &DIALOGUE)
            .state;
        for event in [reply(250), ProbeEvent::Closed, ProbeEvent::TimedOut] {
            let t = done.clone().transition(event, &DIALOGUE);
            assert_eq!(t.state, done);
            assert!(t.command.is_none());
        }
    }
}
