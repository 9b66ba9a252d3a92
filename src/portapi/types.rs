use super::message::*;
use crate::theme::{StateSnapshot, ThemeOutcome};

pub const CMD_TOGGLE: &str = "TOGGLE";
pub const CMD_GET_STATE: &str = "GET_STATE";

const CMD_TOGGLED: &str = "toggled";
const CMD_STATE: &str = "state";
const CMD_ERROR: &str = "error";

/// Request is a strongly typed message addressed to a page context.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Request {
    /// Flip the theme and persist the new intent.
    Toggle,
    /// Report the current state without changing it.
    GetState,
}

impl TryFrom<Message> for Request {
    type Error = MessageError;

    fn try_from(value: Message) -> Result<Self, Self::Error> {
        match value.cmd.as_str() {
            CMD_TOGGLE => Ok(Request::Toggle),
            CMD_GET_STATE => Ok(Request::GetState),
            cmd => Err(MessageError::UnknownCommand(cmd.to_string())),
        }
    }
}

/// The id is assigned by the client when sending.
impl From<Request> for Message {
    fn from(value: Request) -> Self {
        let cmd = match value {
            Request::Toggle => CMD_TOGGLE,
            Request::GetState => CMD_GET_STATE,
        };

        Message {
            id: 0,
            cmd: cmd.to_string(),
            payload: None,
        }
    }
}

/// Response is a strongly typed reply sent back by a page context.
#[derive(PartialEq, Debug, Clone)]
pub enum Response {
    Toggled(ThemeOutcome),
    State(StateSnapshot),
    /// The page could not handle the request, e.g. an unknown command.
    Error(String),
}

impl TryFrom<Message> for Response {
    type Error = MessageError;

    fn try_from(value: Message) -> Result<Self, MessageError> {
        let payload = value.payload.ok_or(MessageError::MissingPayload)?;

        match value.cmd.as_str() {
            CMD_TOGGLED => Ok(Response::Toggled(payload.parse()?)),
            CMD_STATE => Ok(Response::State(payload.parse()?)),
            CMD_ERROR => Ok(Response::Error(payload.parse()?)),
            cmd => Err(MessageError::UnknownCommand(cmd.to_string())),
        }
    }
}

impl TryFrom<Response> for Message {
    type Error = MessageError;

    fn try_from(value: Response) -> Result<Self, Self::Error> {
        let (cmd, payload) = match value {
            Response::Toggled(outcome) => (CMD_TOGGLED, Payload::json(&outcome)?),
            Response::State(snapshot) => (CMD_STATE, Payload::json(&snapshot)?),
            Response::Error(reason) => (CMD_ERROR, Payload::json(&reason)?),
        };

        Ok(Message {
            id: 0,
            cmd: cmd.to_string(),
            payload: Some(payload),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn request_commands() {
        let m: Message = Request::Toggle.into();
        assert_eq!(m.cmd, "TOGGLE");
        assert_eq!(Request::try_from(m).unwrap(), Request::Toggle);

        let m: Message = "3|GET_STATE".parse().unwrap();
        assert_eq!(Request::try_from(m).unwrap(), Request::GetState);

        let m: Message = "3|DDM_TOGGLE".parse().unwrap();
        assert_matches!(Request::try_from(m), Err(MessageError::UnknownCommand(cmd)) if cmd == "DDM_TOGGLE");
    }

    #[test]
    fn toggled_payload_uses_camel_case() {
        let response = Response::Toggled(ThemeOutcome {
            enabled: true,
            page_was_light: true,
            theme_applied: false,
        });

        let m: Message = response.clone().try_into().unwrap();
        let wire: String = m.into();
        assert_eq!(
            wire,
            r#"0|toggled|J{"enabled":true,"pageWasLight":true,"themeApplied":false}"#
        );

        let back: Message = wire.parse().unwrap();
        assert_eq!(Response::try_from(back).unwrap(), response);
    }

    #[test]
    fn state_payload() {
        let m: Message =
            r#"4|state|J{"enabled":false,"themeApplied":false,"pageIsLight":true}"#.parse().unwrap();

        assert_eq!(
            Response::try_from(m).unwrap(),
            Response::State(StateSnapshot {
                enabled: false,
                theme_applied: false,
                page_is_light: true,
            })
        );
    }

    #[test]
    fn error_response() {
        let m: Message = Response::Error("unknown or unsupported command: X".to_string())
            .try_into()
            .unwrap();
        assert_eq!(m.cmd, "error");

        let wire: String = m.into();
        assert_matches!(
            Response::try_from(wire.parse::<Message>().unwrap()),
            Ok(Response::Error(reason)) if reason.starts_with("unknown")
        );
    }

    #[test]
    fn malformed_responses() {
        let m: Message = "1|toggled".parse().unwrap();
        assert_matches!(Response::try_from(m), Err(MessageError::MissingPayload));

        let m: Message = "1|toggled|J{\"enabled\":1}".parse().unwrap();
        assert_matches!(Response::try_from(m), Err(MessageError::Payload(_)));

        let m: Message = "1|ok|J{}".parse().unwrap();
        assert_matches!(Response::try_from(m), Err(MessageError::UnknownCommand(_)));
    }
}
