//! In-memory schema fixtures standing in for parsed `common`/`ardupilotmega`
//! definition documents.
//!
//! These mirror the shape (not necessarily every field) of a handful of
//! well-known real-world messages closely enough to exercise the codec's
//! layout, CRC-seed, and round-trip behavior realistically.

use std::collections::HashMap;

use async_trait::async_trait;
use mavcodec_schema::{DefinitionProvider, Definitions, RawField, RawMessage};

fn field(type_token: &str, name: &str) -> RawField {
    RawField { type_token: type_token.to_string(), name: name.to_string() }
}

/// `HEARTBEAT`, id 0.
#[must_use]
pub fn heartbeat() -> RawMessage {
    RawMessage {
        id: 0,
        name: "HEARTBEAT".to_string(),
        fields: vec![
            field("uint8", "type"),
            field("uint8", "autopilot"),
            field("uint8", "base_mode"),
            field("uint32", "custom_mode"),
            field("uint8", "system_status"),
            field("uint8_t_mavlink_version", "mavlink_version"),
        ],
    }
}

/// `ATTITUDE`, id 30.
#[must_use]
pub fn attitude() -> RawMessage {
    RawMessage {
        id: 30,
        name: "ATTITUDE".to_string(),
        fields: vec![
            field("uint32", "time_boot_ms"),
            field("float", "roll"),
            field("float", "pitch"),
            field("float", "yaw"),
            field("float", "rollspeed"),
            field("float", "pitchspeed"),
            field("float", "yawspeed"),
        ],
    }
}

/// `PARAM_VALUE`, id 22.
#[must_use]
pub fn param_value() -> RawMessage {
    RawMessage {
        id: 22,
        name: "PARAM_VALUE".to_string(),
        fields: vec![
            field("float", "param_value"),
            field("uint16", "param_count"),
            field("uint16", "param_index"),
            field("char[16]", "param_id"),
            field("uint8", "param_type"),
        ],
    }
}

/// `GPS_STATUS`, id 25. Arrays are 5 elements rather than the real
/// dialect's 20, to keep fixtures short.
#[must_use]
pub fn gps_status() -> RawMessage {
    RawMessage {
        id: 25,
        name: "GPS_STATUS".to_string(),
        fields: vec![
            field("uint8", "satellites_visible"),
            field("uint8[5]", "satellite_prn"),
            field("uint8[5]", "satellite_used"),
            field("uint8[5]", "satellite_elevation"),
            field("uint8[5]", "satellite_azimuth"),
            field("uint8[5]", "satellite_snr"),
        ],
    }
}

/// The full fixture set, split across the two document identifiers the
/// crate defaults to, the way `common`/`ardupilotmega` really are split.
#[must_use]
pub fn documents() -> HashMap<String, Definitions> {
    let mut documents = HashMap::new();
    documents.insert(
        "common".to_string(),
        Definitions { enums: vec![], messages: vec![heartbeat(), attitude(), param_value(), gps_status()] },
    );
    documents.insert("ardupilotmega".to_string(), Definitions::default());
    documents
}

/// A [`DefinitionProvider`] backed by [`documents`].
pub struct FixtureProvider {
    documents: HashMap<String, Definitions>,
}

impl FixtureProvider {
    /// Build a provider serving the standard fixture set.
    #[must_use]
    pub fn new() -> Self {
        Self { documents: documents() }
    }
}

impl Default for FixtureProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DefinitionProvider for FixtureProvider {
    type Error = String;

    async fn resolve(&self, identifier: &str) -> Result<Definitions, Self::Error> {
        self.documents.get(identifier).cloned().ok_or_else(|| format!("no fixture document for {identifier}"))
    }
}
