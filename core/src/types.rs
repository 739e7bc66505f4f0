//! Request and response payloads of the fleets and characters endpoints.
//!
//! # Design
//! ESI omits fields freely, so response fields are `Option` and default to
//! `None`. Request payloads skip `None` fields when encoding instead of
//! sending explicit nulls.

use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

/// The fleet a character is currently in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterFleet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fleet_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squad_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wing_id: Option<i64>,
}

/// Fleet settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_free_move: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_registered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_voice_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motd: Option<String>,
}

/// Changes to apply to a fleet. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_free_move: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motd: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetMember {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_time: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_type_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solar_system_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squad_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub takes_fleet_warp: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wing_id: Option<i64>,
}

/// An invitation into a fleet. Characters with a CSPA charge cannot be
/// invited through ESI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetInvitation {
    pub character_id: i64,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squad_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wing_id: Option<i64>,
}

/// Where to move a fleet member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetMemberMovement {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squad_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wing_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSquad {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A fleet wing with its squads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetWing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub squads: Vec<FleetSquad>,
}

/// Body of the rename calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Naming {
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedWing {
    pub wing_id: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedSquad {
    pub squad_id: i64,
}

/// Public information about a character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterPublicInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alliance_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestry_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bloodline_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corporation_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faction_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub race_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_status: Option<f64>,
}
