#![allow(dead_code)]

use chrono::{DateTime, FixedOffset};
use entities::entity;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

entity! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Team {
        #[property(name = "id", type = "int", required)]
        pub id: i64,
        #[property(type = "bool", required)]
        pub active: bool,
        #[property(required)]
        pub name: String,
        #[property(type = "Address", required)]
        pub address: Option<Address>,
        #[property(name = "createdAt", type = "DateTime", required)]
        pub created_at: Option<DateTime<FixedOffset>>,
        #[property(type = "Member", is_array, required)]
        pub members: Vec<Member>,
    }
}

entity! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Address {
        #[property(name = "addressLine1", required)]
        pub address_line1: String,
        #[property(name = "addressLine2", nullable)]
        pub address_line2: Option<String>,
        #[property(name = "addressLine3", nullable)]
        pub address_line3: Option<String>,
        #[property(required)]
        pub zip: String,
        #[property(required)]
        pub city: String,
        #[property(nullable)]
        pub state: Option<String>,
        #[property(required)]
        pub country: String,
    }
}

entity! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Member {
        #[property(required)]
        pub name: String,
        #[property(name = "realName", required, nullable)]
        pub real_name: Option<String>,
        #[property(is_array, required)]
        pub powers: Vec<String>,
    }
}

pub fn address_json() -> Value {
    json!({
        "addressLine1": "1007 Mountain Drive",
        "addressLine2": "Wayne Manor",
        "zip": "12345",
        "city": "Gotham City",
        "state": "NJ",
        "country": "USA"
    })
}

pub fn justice_league_json() -> Value {
    json!({
        "id": 12,
        "active": true,
        "name": "Justice League",
        "address": address_json(),
        "createdAt": "1960-03-01T20:12:23-04:00",
        "members": [
            {
                "name": "Batman",
                "realName": "Bruce Wayne",
                "powers": []
            },
            {
                "name": "Superman",
                "realName": "Clark Kent",
                "powers": ["invulnerability", "flight", "laser eyes"]
            },
            {
                "name": "The Flash",
                "realName": null,
                "powers": ["super speed"]
            }
        ]
    })
}

/// Copy of `value` with `key` removed from the top-level object
pub fn without(value: &Value, key: &str) -> Value {
    let mut copy = value.clone();
    if let Some(map) = copy.as_object_mut() {
        map.remove(key);
    }
    copy
}

/// Copy of `value` with `key` set in the top-level object
pub fn with(value: &Value, key: &str, field: Value) -> Value {
    let mut copy = value.clone();
    if let Some(map) = copy.as_object_mut() {
        map.insert(key.to_string(), field);
    }
    copy
}
