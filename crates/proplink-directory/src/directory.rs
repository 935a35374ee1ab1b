use std::collections::{BTreeMap, HashMap};

use bytes::{BufMut, Bytes, BytesMut};
use proplink_command::Command;
use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, Result};
use crate::listing::LISTING_MARKER;
use crate::property::{PropertyDescriptor, PropertyValue};

/// Shape of one entry in the listing JSON document.
#[derive(Debug, Serialize, Deserialize)]
struct ListingEntry {
    id: u8,
    #[serde(rename = "type")]
    kind: String,
}

/// Name-keyed map of the peer's (or our own) addressable properties.
///
/// Names are kept sorted so the listing document is deterministic; a
/// reverse id index serves inbound command dispatch.
#[derive(Debug, Clone, Default)]
pub struct PropertyDirectory {
    by_name: BTreeMap<String, PropertyDescriptor>,
    names_by_id: HashMap<u8, String>,
}

impl PropertyDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property. The wire id must be unique.
    pub fn insert(&mut self, name: impl Into<String>, descriptor: PropertyDescriptor) -> Result<()> {
        let name = name.into();
        if let Some(existing) = self.names_by_id.get(&descriptor.id) {
            if existing != &name {
                return Err(DirectoryError::DuplicateId {
                    id: descriptor.id,
                    name: existing.clone(),
                });
            }
        }
        if let Some(previous) = self.by_name.insert(name.clone(), descriptor) {
            self.names_by_id.remove(&previous.id);
        }
        self.names_by_id.insert(descriptor.id, name);
        Ok(())
    }

    /// Look up a property by name.
    pub fn get(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.by_name.get(name)
    }

    /// Look up a property name by wire id.
    pub fn name_of(&self, id: u8) -> Option<&str> {
        self.names_by_id.get(&id).map(String::as_str)
    }

    /// Look up a descriptor by wire id.
    pub fn get_by_id(&self, id: u8) -> Option<&PropertyDescriptor> {
        self.name_of(id).and_then(|name| self.by_name.get(name))
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyDescriptor)> {
        self.by_name.iter().map(|(name, desc)| (name.as_str(), desc))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Build a set command for a named property.
    ///
    /// The value's type must match the directory entry; narrowing to the
    /// wire field is validated by the command constructors.
    pub fn set_command(&self, name: &str, value: PropertyValue) -> Result<Command> {
        let descriptor = self
            .get(name)
            .ok_or_else(|| DirectoryError::UnknownProperty(name.to_string()))?;

        if value.type_of() != descriptor.kind {
            return Err(DirectoryError::TypeMismatch {
                name: name.to_string(),
                expected: descriptor.kind.tag(),
                got: value.type_of().tag(),
            });
        }

        let command = match value {
            PropertyValue::Int(v) => Command::set_int(descriptor.id, v)?,
            PropertyValue::Float(v) => Command::set_float(descriptor.id, v)?,
            PropertyValue::Bool(v) => Command::set_bool(descriptor.id, v),
        };
        Ok(command)
    }

    /// Render the discovery reply payload: marker, compact JSON
    /// document, trailing newline.
    pub fn encode_listing(&self) -> Result<Bytes> {
        let entries: BTreeMap<&str, ListingEntry> = self
            .by_name
            .iter()
            .map(|(name, desc)| {
                (
                    name.as_str(),
                    ListingEntry {
                        id: desc.id,
                        kind: desc.kind.tag().to_string(),
                    },
                )
            })
            .collect();

        let json = serde_json::to_vec(&entries)?;
        let mut payload = BytesMut::with_capacity(LISTING_MARKER.len() + json.len() + 1);
        payload.put_slice(&LISTING_MARKER);
        payload.put_slice(&json);
        payload.put_u8(b'\n');
        Ok(payload.freeze())
    }

    /// Parse a discovery reply payload back into a directory.
    pub fn parse_listing(payload: &[u8]) -> Result<Self> {
        let document = payload
            .strip_prefix(&LISTING_MARKER[..])
            .ok_or(DirectoryError::MissingMarker)?;
        let document = document.strip_suffix(b"\n").unwrap_or(document);

        let entries: BTreeMap<String, ListingEntry> = serde_json::from_slice(document)?;

        let mut directory = Self::new();
        for (name, entry) in entries {
            let kind = crate::property::PropertyType::from_tag(&entry.kind)?;
            directory.insert(name, PropertyDescriptor::new(entry.id, kind))?;
        }
        Ok(directory)
    }
}

#[cfg(test)]
mod tests {
    use proplink_command::CommandError;

    use super::*;
    use crate::property::PropertyType;

    fn sample() -> PropertyDirectory {
        let mut dir = PropertyDirectory::new();
        dir.insert("rpm", PropertyDescriptor::new(0, PropertyType::Int))
            .unwrap();
        dir.insert("temperature", PropertyDescriptor::new(1, PropertyType::Float))
            .unwrap();
        dir.insert("alarm", PropertyDescriptor::new(2, PropertyType::Bool))
            .unwrap();
        dir
    }

    #[test]
    fn insert_and_lookup_both_directions() {
        let dir = sample();
        assert_eq!(dir.len(), 3);
        assert_eq!(dir.get("rpm").unwrap().id, 0);
        assert_eq!(dir.name_of(1), Some("temperature"));
        assert_eq!(dir.get_by_id(2).unwrap().kind, PropertyType::Bool);
        assert!(dir.get("missing").is_none());
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut dir = sample();
        let err = dir
            .insert("other", PropertyDescriptor::new(0, PropertyType::Bool))
            .unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicateId { id: 0, .. }));
    }

    #[test]
    fn reinserting_a_name_moves_its_id() {
        let mut dir = sample();
        dir.insert("rpm", PropertyDescriptor::new(9, PropertyType::Int))
            .unwrap();
        assert_eq!(dir.get("rpm").unwrap().id, 9);
        assert_eq!(dir.name_of(0), None);
        assert_eq!(dir.name_of(9), Some("rpm"));
    }

    #[test]
    fn listing_roundtrip() {
        let dir = sample();
        let payload = dir.encode_listing().unwrap();

        assert!(payload.starts_with(&LISTING_MARKER));
        assert!(payload.ends_with(b"\n"));

        let parsed = PropertyDirectory::parse_listing(&payload).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed.get("rpm").unwrap().id, 0);
        assert_eq!(parsed.get("temperature").unwrap().kind, PropertyType::Float);
    }

    #[test]
    fn listing_document_shape() {
        let mut dir = PropertyDirectory::new();
        dir.insert("speed", PropertyDescriptor::new(4, PropertyType::Float))
            .unwrap();
        let payload = dir.encode_listing().unwrap();

        let json = &payload[2..payload.len() - 1];
        let value: serde_json::Value = serde_json::from_slice(json).unwrap();
        assert_eq!(value["speed"]["id"], 4);
        assert_eq!(value["speed"]["type"], "float");
    }

    #[test]
    fn parse_listing_accepts_alias_tags() {
        let payload = [
            &LISTING_MARKER[..],
            br#"{"angle":{"id":3,"type":"qreal"}}"#,
            b"\n",
        ]
        .concat();
        let dir = PropertyDirectory::parse_listing(&payload).unwrap();
        assert_eq!(dir.get("angle").unwrap().kind, PropertyType::Float);
    }

    #[test]
    fn parse_listing_without_marker_fails() {
        let err = PropertyDirectory::parse_listing(br#"{"x":{"id":0,"type":"int"}}"#).unwrap_err();
        assert!(matches!(err, DirectoryError::MissingMarker));
    }

    #[test]
    fn parse_listing_bad_json_fails() {
        let payload = [&LISTING_MARKER[..], b"not-json\n"].concat();
        let err = PropertyDirectory::parse_listing(&payload).unwrap_err();
        assert!(matches!(err, DirectoryError::InvalidListing(_)));
    }

    #[test]
    fn parse_listing_unknown_type_fails() {
        let payload = [
            &LISTING_MARKER[..],
            br#"{"label":{"id":0,"type":"QString"}}"#,
            b"\n",
        ]
        .concat();
        let err = PropertyDirectory::parse_listing(&payload).unwrap_err();
        assert!(matches!(err, DirectoryError::UnknownType(_)));
    }

    #[test]
    fn set_command_builds_wire_command() {
        let dir = sample();

        let cmd = dir.set_command("rpm", PropertyValue::Int(1500)).unwrap();
        assert_eq!(cmd, Command::SetInt { property_id: 0, value: 1500 });

        let cmd = dir.set_command("alarm", PropertyValue::Bool(true)).unwrap();
        assert_eq!(cmd.encode().as_ref(), &[0x04, 0x02, 0x01]);
    }

    #[test]
    fn set_command_type_mismatch() {
        let dir = sample();
        let err = dir
            .set_command("rpm", PropertyValue::Float(1.0))
            .unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::TypeMismatch {
                expected: "int",
                got: "float",
                ..
            }
        ));
    }

    #[test]
    fn set_command_unknown_property() {
        let dir = sample();
        let err = dir
            .set_command("missing", PropertyValue::Int(1))
            .unwrap_err();
        assert!(matches!(err, DirectoryError::UnknownProperty(_)));
    }

    #[test]
    fn set_command_out_of_range_propagates() {
        let dir = sample();
        let err = dir
            .set_command("rpm", PropertyValue::Int(i64::MAX))
            .unwrap_err();
        assert!(matches!(
            err,
            DirectoryError::Command(CommandError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn empty_directory_listing_roundtrip() {
        let dir = PropertyDirectory::new();
        let payload = dir.encode_listing().unwrap();
        let parsed = PropertyDirectory::parse_listing(&payload).unwrap();
        assert!(parsed.is_empty());
    }
}
