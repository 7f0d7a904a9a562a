//! Control messages sent from the server to its supervisor.

use std::fmt;

use tokio::sync::mpsc;

/// Sending half of the server control channel.
pub type MessageSender = mpsc::Sender<ServerMessage>;

/// Receiving half of the server control channel.
pub type MessageReceiver = mpsc::Receiver<ServerMessage>;

/// A control message on the server channel.
///
/// Messages travel as 16-bit codes; `0` is [`ServerMessage::Stop`] and any
/// other code is carried through as [`ServerMessage::Other`] for the
/// supervisor to log and ignore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerMessage {
    /// The server can no longer run; the supervisor should clean up and exit.
    Stop,
    /// A message code the supervisor does not recognise.
    Other(u16),
}

impl ServerMessage {
    /// Returns the wire code of this message.
    #[must_use]
    pub fn code(self) -> u16 {
        match self {
            Self::Stop => 0,
            Self::Other(code) => code,
        }
    }
}

impl From<u16> for ServerMessage {
    fn from(code: u16) -> Self {
        match code {
            0 => Self::Stop,
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stop => f.write_str("stop"),
            Self::Other(code) => write!(f, "message({code})"),
        }
    }
}

/// Creates a control channel holding up to `capacity` pending messages.
///
/// A capacity of zero is raised to one.
#[must_use]
pub fn channel(capacity: usize) -> (MessageSender, MessageReceiver) {
    mpsc::channel(capacity.max(1))
}
