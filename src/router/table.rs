//! Field-to-channel routing table
//!
//! The table is the whole routing policy: which record fields are forwarded
//! and under which event names. Fields are checked in declaration order, so
//! a client always sees one record's events in that order.

use std::sync::Arc;

use crate::record::Record;

use super::event::ChannelEvent;

/// Record field routed to one or more client event names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMapping {
    field: String,
    events: Vec<Arc<str>>,
}

impl ChannelMapping {
    /// Record field name
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Event names emitted for the field, in order
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(|e| &**e)
    }
}

/// Ordered routing table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTable {
    mappings: Vec<ChannelMapping>,
}

impl Default for ChannelTable {
    /// Process value, manipulated value and setpoint
    fn default() -> Self {
        Self::empty()
            .map("PV", "pvdata")
            .map("MV", "mvdata")
            .map("SP", "spdata")
    }
}

impl ChannelTable {
    /// Table that routes nothing
    pub fn empty() -> Self {
        Self {
            mappings: Vec::new(),
        }
    }

    /// Route `field` to `event`
    ///
    /// Mapping a field again adds another event name for it; the field keeps
    /// its original position in the table.
    pub fn map(mut self, field: impl Into<String>, event: impl Into<Arc<str>>) -> Self {
        let field = field.into();
        let event = event.into();

        match self.mappings.iter_mut().find(|m| m.field == field) {
            Some(mapping) => {
                if !mapping.events.contains(&event) {
                    mapping.events.push(event);
                }
            }
            None => self.mappings.push(ChannelMapping {
                field,
                events: vec![event],
            }),
        }
        self
    }

    /// Mappings in declaration order
    pub fn mappings(&self) -> &[ChannelMapping] {
        &self.mappings
    }

    /// Number of routed fields
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Produce the channel events for a record
    ///
    /// One event per (present field, event name). Presence decides, not
    /// value: a zero still routes.
    pub fn route(&self, record: &Record) -> Vec<ChannelEvent> {
        let mut events = Vec::new();

        for mapping in &self.mappings {
            if let Some(value) = record.get(&mapping.field) {
                for channel in &mapping.events {
                    events.push(ChannelEvent {
                        channel: Arc::clone(channel),
                        value: value.clone(),
                    });
                }
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Number;

    use super::*;

    fn channels(events: &[ChannelEvent]) -> Vec<&str> {
        events.iter().map(|e| &*e.channel).collect()
    }

    #[test]
    fn test_default_table() {
        let table = ChannelTable::default();

        let fields: Vec<&str> = table.mappings().iter().map(|m| m.field()).collect();
        assert_eq!(fields, ["PV", "MV", "SP"]);
        assert_eq!(
            table.mappings()[0].events().collect::<Vec<_>>(),
            ["pvdata"]
        );
    }

    #[test]
    fn test_route_single_field() {
        let record = Record::new().with_float("PV", 12.5);
        let events = ChannelTable::default().route(&record);

        assert_eq!(events.len(), 1);
        assert_eq!(&*events[0].channel, "pvdata");
        assert_eq!(events[0].value.as_f64(), Some(12.5));
    }

    #[test]
    fn test_route_declaration_order() {
        // Insertion order of the record must not matter
        let record = Record::new().with("SP", 3).with("PV", 1).with("MV", 2);
        let events = ChannelTable::default().route(&record);

        assert_eq!(channels(&events), ["pvdata", "mvdata", "spdata"]);
        let values: Vec<i64> = events.iter().filter_map(|e| e.value.as_i64()).collect();
        assert_eq!(values, [1, 2, 3]);
    }

    #[test]
    fn test_route_zero_is_present() {
        let record = Record::new().with("MV", 0);
        let events = ChannelTable::default().route(&record);

        assert_eq!(channels(&events), ["mvdata"]);
        assert_eq!(events[0].value, Number::from(0));
    }

    #[test]
    fn test_route_absent_and_unknown_fields() {
        let record = Record::new().with("temperature", 40).with("pv", 1);
        assert!(ChannelTable::default().route(&record).is_empty());
        assert!(ChannelTable::default().route(&Record::new()).is_empty());
    }

    #[test]
    fn test_one_field_many_events() {
        let table = ChannelTable::empty()
            .map("PV", "pvdata")
            .map("SP", "spdata")
            .map("PV", "pvtrend")
            .map("PV", "pvdata");

        assert_eq!(table.len(), 2);

        let events = table.route(&Record::new().with("PV", 7).with("SP", 8));
        assert_eq!(channels(&events), ["pvdata", "pvtrend", "spdata"]);
        assert!(events[..2].iter().all(|e| e.value == Number::from(7)));
    }

    #[test]
    fn test_empty_table_routes_nothing() {
        let table = ChannelTable::empty();

        assert!(table.is_empty());
        assert!(table.route(&Record::new().with("PV", 1)).is_empty());
    }
}
