use std::collections::HashMap;

use bytes::Bytes;
use proplink_command::Command;
use proplink_directory::{PropertyDescriptor, PropertyDirectory, PropertyType, PropertyValue};

use crate::error::{BridgeError, Result};

/// A change applied to the table, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyUpdate {
    pub name: String,
    pub value: PropertyValue,
}

/// The properties a bridge hosts, with their current values.
///
/// Wire ids are assigned in hosting order, mirroring how the reference
/// peer numbers properties as it discovers them.
#[derive(Debug, Clone, Default)]
pub struct PropertyTable {
    directory: PropertyDirectory,
    values: HashMap<u8, PropertyValue>,
    next_id: u8,
}

impl PropertyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Host a property, deriving its type from the initial value.
    /// Returns the assigned wire id.
    pub fn host(&mut self, name: impl Into<String>, initial: PropertyValue) -> Result<u8> {
        let id = self.next_id;
        let descriptor = PropertyDescriptor::new(id, initial.type_of());
        self.directory.insert(name, descriptor)?;
        self.values.insert(id, initial);
        self.next_id = self.next_id.wrapping_add(1);
        Ok(id)
    }

    /// Apply a set command to the table.
    pub fn apply(&mut self, command: Command) -> Result<PropertyUpdate> {
        let (property_id, value) = match command {
            Command::GetPropertyList => {
                return Err(BridgeError::NotAPropertySet(command.kind().name()))
            }
            Command::SetInt { property_id, value } => {
                (property_id, PropertyValue::Int(i64::from(value)))
            }
            Command::SetFloat { property_id, value } => {
                (property_id, PropertyValue::Float(f64::from(value)))
            }
            Command::SetBool { property_id, value } => (property_id, PropertyValue::Bool(value)),
        };

        let descriptor = self
            .directory
            .get_by_id(property_id)
            .copied()
            .ok_or(BridgeError::UnknownPropertyId(property_id))?;
        let name = self
            .directory
            .name_of(property_id)
            .ok_or(BridgeError::UnknownPropertyId(property_id))?
            .to_string();

        if value.type_of() != descriptor.kind {
            return Err(BridgeError::TypeMismatch {
                name,
                expected: descriptor.kind.tag(),
                got: value.type_of().tag(),
            });
        }

        self.values.insert(property_id, value);
        Ok(PropertyUpdate { name, value })
    }

    /// Current value of a named property.
    pub fn get(&self, name: &str) -> Option<PropertyValue> {
        let descriptor = self.directory.get(name)?;
        self.values.get(&descriptor.id).copied()
    }

    /// The hosted directory.
    pub fn directory(&self) -> &PropertyDirectory {
        &self.directory
    }

    /// The discovery reply payload for this table.
    pub fn listing_payload(&self) -> Result<Bytes> {
        Ok(self.directory.encode_listing()?)
    }

    /// Iterate hosted properties in name order with current values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, PropertyType, Option<PropertyValue>)> {
        self.directory
            .iter()
            .map(|(name, desc)| (name, desc.kind, self.values.get(&desc.id).copied()))
    }

    pub fn len(&self) -> usize {
        self.directory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PropertyTable {
        let mut table = PropertyTable::new();
        table.host("rpm", PropertyValue::Int(0)).unwrap();
        table.host("temperature", PropertyValue::Float(20.0)).unwrap();
        table.host("alarm", PropertyValue::Bool(false)).unwrap();
        table
    }

    #[test]
    fn hosting_assigns_sequential_ids() {
        let table = sample();
        assert_eq!(table.directory().get("rpm").unwrap().id, 0);
        assert_eq!(table.directory().get("temperature").unwrap().id, 1);
        assert_eq!(table.directory().get("alarm").unwrap().id, 2);
    }

    #[test]
    fn apply_set_int_updates_value() {
        let mut table = sample();
        let update = table
            .apply(Command::SetInt {
                property_id: 0,
                value: 4500,
            })
            .unwrap();
        assert_eq!(update.name, "rpm");
        assert_eq!(table.get("rpm"), Some(PropertyValue::Int(4500)));
    }

    #[test]
    fn apply_set_float_and_bool() {
        let mut table = sample();
        table
            .apply(Command::SetFloat {
                property_id: 1,
                value: 85.5,
            })
            .unwrap();
        table
            .apply(Command::SetBool {
                property_id: 2,
                value: true,
            })
            .unwrap();

        assert_eq!(table.get("temperature"), Some(PropertyValue::Float(f64::from(85.5f32))));
        assert_eq!(table.get("alarm"), Some(PropertyValue::Bool(true)));
    }

    #[test]
    fn apply_unknown_id_rejected() {
        let mut table = sample();
        let err = table
            .apply(Command::SetInt {
                property_id: 99,
                value: 1,
            })
            .unwrap_err();
        assert!(matches!(err, BridgeError::UnknownPropertyId(99)));
    }

    #[test]
    fn apply_kind_mismatch_rejected() {
        let mut table = sample();
        let err = table
            .apply(Command::SetBool {
                property_id: 0,
                value: true,
            })
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::TypeMismatch {
                expected: "int",
                got: "bool",
                ..
            }
        ));
        // Value untouched on rejection.
        assert_eq!(table.get("rpm"), Some(PropertyValue::Int(0)));
    }

    #[test]
    fn apply_get_property_list_is_not_a_set() {
        let mut table = sample();
        let err = table.apply(Command::GetPropertyList).unwrap_err();
        assert!(matches!(err, BridgeError::NotAPropertySet(_)));
    }

    #[test]
    fn listing_payload_parses_back() {
        let table = sample();
        let payload = table.listing_payload().unwrap();
        let dir = PropertyDirectory::parse_listing(&payload).unwrap();
        assert_eq!(dir.len(), 3);
        assert_eq!(dir.get("alarm").unwrap().kind, PropertyType::Bool);
    }

    #[test]
    fn iter_reports_current_values() {
        let mut table = sample();
        table
            .apply(Command::SetInt {
                property_id: 0,
                value: 7,
            })
            .unwrap();

        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries.len(), 3);
        let rpm = entries.iter().find(|(name, _, _)| *name == "rpm").unwrap();
        assert_eq!(rpm.2, Some(PropertyValue::Int(7)));
    }
}
