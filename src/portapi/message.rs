use thiserror::Error;

/// MessageError describes any error that is encountered when parsing
/// page messages or when converting between the Request/Response types.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("missing message id")]
    MissingID,

    #[error("invalid message id")]
    InvalidID,

    #[error("missing command")]
    MissingCommand,

    #[error("missing payload")]
    MissingPayload,

    #[error("unknown or unsupported command: {0}")]
    UnknownCommand(String),

    #[error(transparent)]
    InvalidPayload(#[from] serde_json::Error),

    #[error(transparent)]
    Payload(#[from] ParseError),
}

/// Payload defines the payload type and content of a message.
///
/// Only JSON payloads (marked by a leading 'J') can be decoded with
/// `Payload::parse()`. Everything else is kept verbatim in
/// `Payload::Unknown`.
#[derive(PartialEq, Debug, Clone)]
pub enum Payload {
    Json(String),
    Unknown(String),
}

/// ParseError is returned from `Payload::parse()`.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("payload is not JSON encoded")]
    Unknown,
}

impl Payload {
    /// Encodes `value` as a JSON payload.
    pub fn json<T: serde::Serialize>(value: &T) -> Result<Payload, serde_json::Error> {
        Ok(Payload::Json(serde_json::to_string(value)?))
    }

    /// Parse the payload into T.
    pub fn parse<'a, T>(&'a self) -> Result<T, ParseError>
    where
        T: serde::de::Deserialize<'a>,
    {
        match self {
            Payload::Json(blob) => Ok(serde_json::from_str::<T>(blob.as_str())?),
            Payload::Unknown(_) => Err(ParseError::Unknown),
        }
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Payload {
        match value.strip_prefix('J') {
            Some(rest) => Payload::Json(rest.to_string()),
            None => Payload::Unknown(value),
        }
    }
}

/// Displays the payload in its wire form.
impl std::fmt::Display for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::Json(payload) => write!(f, "J{}", payload),
            Payload::Unknown(payload) => write!(f, "{}", payload),
        }
    }
}

/// Message is the wire level representation of a request or a response
/// exchanged with a page context: `<id>|<cmd>[|<payload>]`.
///
/// Callers should normally use `portapi::types::Request` and
/// `portapi::types::Response` instead.
#[derive(PartialEq, Debug, Clone)]
pub struct Message {
    pub id: usize,
    pub cmd: String,
    pub payload: Option<Payload>,
}

/// Marshals a message into its wire format. No validation is done here.
impl From<Message> for String {
    fn from(value: Message) -> Self {
        let mut result = format!("{}|{}", value.id, value.cmd);

        if let Some(payload) = value.payload {
            result.push('|');
            result.push_str(&payload.to_string());
        }

        result
    }
}

/// Parses the wire format. The payload is everything after the second
/// separator and may itself contain '|'.
impl std::str::FromStr for Message {
    type Err = MessageError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.splitn(3, '|');

        let id = match parts.next() {
            Some("") | None => return Err(MessageError::MissingID),
            Some(s) => s.parse::<usize>().map_err(|_| MessageError::InvalidID)?,
        };

        let cmd = match parts.next() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => return Err(MessageError::MissingCommand),
        };

        let payload = parts.next().map(|p| Payload::from(p.to_string()));

        Ok(Message { id, cmd, payload })
    }
}
