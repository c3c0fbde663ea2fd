//! Shared fixtures and port contract suites.
//!
//! Every store implementation runs the same `contracts::*` functions from
//! `tests/port_contracts.rs`.

pub mod contracts;

use std::sync::Arc;

use domains::{NewPartyRequest, NewRecruitmentPost, Timestamp};
use serde_json::{json, Value};
use services::{Services, Stores};
use storage_adapters::MemoryStore;

pub const MINUTE: Timestamp = 60 * 1000;

/// A fixed, realistic "now" so tests never depend on the wall clock.
pub const T0: Timestamp = 1_717_000_000_000;

pub fn memory_services() -> Services {
    Services::new(Stores::shared(Arc::new(MemoryStore::new())))
}

pub fn character(level: i64, class: &str, attack: i64, max_hp: i64) -> Value {
    json!({
        "level": level,
        "class": class,
        "attack": attack,
        "defense": 12,
        "speed": 8,
        "maxHp": max_hp,
        "equipment": []
    })
}

pub fn recruit(id: &str, username: &str) -> NewRecruitmentPost {
    NewRecruitmentPost {
        id: id.to_string(),
        username: username.to_string(),
        class: "knight".to_string(),
        level: 8,
        power: 240,
        message: "lf healer for the crypt".to_string(),
        max_members: 4,
    }
}

pub fn party_request(id: &str, from_user: &str, to_user: &str) -> NewPartyRequest {
    NewPartyRequest {
        id: id.to_string(),
        from_user: from_user.to_string(),
        to_user: to_user.to_string(),
        class: "cleric".to_string(),
        level: 6,
        power: 150,
    }
}
