//! Message kind taxonomy.
//!
//! Every trace is classified as the send or receive side of a notification, request
//! or response. The lowercase hyphenated string form is what log consumers match on.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Classification of a traced protocol message.
///
/// Wire codes start at 1, in declaration order. Codes outside `1..=6` are carried in
/// [`MessageKind::Unknown`] and render as their decimal value instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Notification sent to the server (`send-notification`, code 1).
    SendNotification,
    /// Notification pushed by the server (`recv-notification`, code 2).
    ReceiveNotification,
    /// Request sent to the server (`send-request`, code 3).
    SendRequest,
    /// Request issued by the server (`recv-request`, code 4).
    ReceiveRequest,
    /// Response sent back to a server request (`send-response`, code 5).
    SendResponse,
    /// Response received for a client request (`recv-response`, code 6).
    ReceiveResponse,
    /// A code this version does not know about. Built only by
    /// [`MessageKind::from_code`].
    Unknown(UnknownKind),
}

/// Wire code outside the known range.
///
/// The field is private, so a known code can never end up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnknownKind(u8);

impl UnknownKind {
    #[must_use]
    pub const fn code(self) -> u8 {
        self.0
    }
}

impl MessageKind {
    /// All known kinds, in wire-code order.
    pub const ALL: [Self; 6] = [
        Self::SendNotification,
        Self::ReceiveNotification,
        Self::SendRequest,
        Self::ReceiveRequest,
        Self::SendResponse,
        Self::ReceiveResponse,
    ];

    /// Decodes a wire code. Never fails.
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            1 => Self::SendNotification,
            2 => Self::ReceiveNotification,
            3 => Self::SendRequest,
            4 => Self::ReceiveRequest,
            5 => Self::SendResponse,
            6 => Self::ReceiveResponse,
            other => Self::Unknown(UnknownKind(other)),
        }
    }

    /// Returns the wire code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::SendNotification => 1,
            Self::ReceiveNotification => 2,
            Self::SendRequest => 3,
            Self::ReceiveRequest => 4,
            Self::SendResponse => 5,
            Self::ReceiveResponse => 6,
            Self::Unknown(unknown) => unknown.code(),
        }
    }

    /// Returns the fixed string form, or `None` for unknown codes.
    #[must_use]
    pub const fn as_str(self) -> Option<&'static str> {
        match self {
            Self::SendNotification => Some("send-notification"),
            Self::ReceiveNotification => Some("recv-notification"),
            Self::SendRequest => Some("send-request"),
            Self::ReceiveRequest => Some("recv-request"),
            Self::SendResponse => Some("send-response"),
            Self::ReceiveResponse => Some("recv-response"),
            Self::Unknown(_) => None,
        }
    }

    /// True for the outgoing variants.
    #[must_use]
    pub const fn is_send(self) -> bool {
        matches!(
            self,
            Self::SendNotification | Self::SendRequest | Self::SendResponse
        )
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) => f.write_str(s),
            None => write!(f, "{}", self.code()),
        }
    }
}

impl Serialize for MessageKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Some(kind) = Self::ALL.into_iter().find(|k| k.as_str() == Some(s)) {
            return Ok(kind);
        }
        s.parse::<u8>()
            .map(Self::from_code)
            .map_err(|_| format!("unknown message kind: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn string_forms_are_unique_and_stable() {
        let forms: Vec<String> = MessageKind::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(
            forms,
            [
                "send-notification",
                "recv-notification",
                "send-request",
                "recv-request",
                "send-response",
                "recv-response",
            ]
        );
        let unique: HashSet<_> = forms.iter().collect();
        assert_eq!(unique.len(), forms.len());
    }

    #[test]
    fn unknown_codes_render_as_decimal() {
        assert_eq!(MessageKind::from_code(0).to_string(), "0");
        assert_eq!(MessageKind::from_code(42).to_string(), "42");
        assert_eq!(MessageKind::from_code(255).code(), 255);
    }

    #[test]
    fn codes_round_trip() {
        for kind in MessageKind::ALL {
            assert_eq!(MessageKind::from_code(kind.code()), kind);
            assert_eq!(kind.to_string().parse::<MessageKind>(), Ok(kind));
        }
        let nine = "9".parse::<MessageKind>().unwrap();
        assert!(matches!(nine, MessageKind::Unknown(u) if u.code() == 9));
        assert!("sideways".parse::<MessageKind>().is_err());
    }

    #[test]
    fn known_codes_never_decode_as_unknown() {
        for code in 0..=u8::MAX {
            let kind = MessageKind::from_code(code);
            assert_eq!(kind.code(), code);
            assert_eq!(
                matches!(kind, MessageKind::Unknown(_)),
                !(1..=6).contains(&code),
                "code {code}"
            );
        }
        assert_eq!(MessageKind::from_code(3), MessageKind::SendRequest);
        assert_eq!("3".parse::<MessageKind>(), Ok(MessageKind::SendRequest));
        assert_eq!(MessageKind::from_code(3).to_string(), "send-request");
    }

    #[test]
    fn serializes_as_string_form() {
        let json = serde_json::to_string(&MessageKind::ReceiveResponse).unwrap();
        assert_eq!(json, "\"recv-response\"");
        let json = serde_json::to_string(&MessageKind::from_code(7)).unwrap();
        assert_eq!(json, "\"7\"");
    }
}
