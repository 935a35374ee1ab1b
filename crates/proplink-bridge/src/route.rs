use bytes::Bytes;
use proplink_directory::{HEARTBEAT, LISTING_MARKER, RELOAD_MARKER};

/// A reassembled frame, classified by its marker bytes.
///
/// Only marker detection happens here. Listing payloads stay opaque —
/// parsing the document is `proplink-directory`'s job, and command
/// payloads are handed to `proplink-command` untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Single-byte keep-alive.
    Heartbeat,
    /// Property directory listing (payload includes the marker).
    Listing(Bytes),
    /// The peer's property source was reloaded; a fresh discovery is in
    /// order.
    Reload,
    /// Anything unmarked: a command frame payload.
    Command(Bytes),
}

impl Inbound {
    /// Classify a frame by its leading bytes.
    pub fn classify(frame: Bytes) -> Self {
        if frame.as_ref() == &HEARTBEAT[..] {
            Inbound::Heartbeat
        } else if frame.starts_with(&LISTING_MARKER) {
            Inbound::Listing(frame)
        } else if frame.starts_with(&RELOAD_MARKER) {
            Inbound::Reload
        } else {
            Inbound::Command(frame)
        }
    }
}

#[cfg(test)]
mod tests {
    use proplink_directory::RELOAD_NOTICE;

    use super::*;

    #[test]
    fn heartbeat_is_exactly_one_marker_byte() {
        assert_eq!(
            Inbound::classify(Bytes::from_static(&[0xFF])),
            Inbound::Heartbeat
        );
    }

    #[test]
    fn listing_marker_detected() {
        let frame = Bytes::from_static(&[0xFF, 0xFF, b'{', b'}', b'\n']);
        assert!(matches!(Inbound::classify(frame), Inbound::Listing(_)));
    }

    #[test]
    fn reload_marker_detected() {
        assert_eq!(
            Inbound::classify(Bytes::from_static(RELOAD_NOTICE)),
            Inbound::Reload
        );
    }

    #[test]
    fn unmarked_frames_are_commands() {
        let frame = Bytes::from_static(&[0x01, 0x03, 0x04, 0x00, 0x00, 0x00]);
        assert!(matches!(Inbound::classify(frame), Inbound::Command(_)));
    }

    #[test]
    fn two_idle_marker_bytes_are_not_a_heartbeat() {
        // [0xFF, 0xFF] alone is a (degenerate) listing prefix, not two
        // heartbeats — frame boundaries decide, not byte counts.
        let frame = Bytes::from_static(&[0xFF, 0xFF]);
        assert!(matches!(Inbound::classify(frame), Inbound::Listing(_)));
    }
}
