use blockpress_types::{BlockId, BlockKey, ContentId, UserGroupId};
use std::collections::HashSet;
use std::str::FromStr;

// ── Numeric ids ───────────────────────────────────────────────────

#[test]
fn block_id_roundtrips_raw_value() {
    let id = BlockId::new(42);
    assert_eq!(id.get(), 42);
    assert_eq!(BlockId::from(42), id);
}

#[test]
fn block_id_display_and_parse() {
    let id = BlockId::new(1337);
    assert_eq!(id.to_string(), "1337");
    assert_eq!(BlockId::from_str("1337").unwrap(), id);
    assert_eq!(BlockId::from_str(" 7 ").unwrap(), BlockId::new(7));
}

#[test]
fn block_id_parse_invalid() {
    assert!(BlockId::from_str("seven").is_err());
    assert!(ContentId::from_str("").is_err());
}

#[test]
fn ids_order_numerically() {
    let mut ids = vec![BlockId::new(10), BlockId::new(2), BlockId::new(7)];
    ids.sort();
    assert_eq!(ids, vec![BlockId::new(2), BlockId::new(7), BlockId::new(10)]);
}

#[test]
fn numeric_ids_serialize_transparently() {
    let json = serde_json::to_string(&ContentId::new(9)).unwrap();
    assert_eq!(json, "9");
    let group: UserGroupId = serde_json::from_str("3").unwrap();
    assert_eq!(group, UserGroupId::new(3));
}

// ── BlockKey ──────────────────────────────────────────────────────

#[test]
fn block_key_new_is_unique() {
    let a = BlockKey::new();
    let b = BlockKey::new();
    assert_ne!(a, b);
}

#[test]
fn block_key_from_uuid_roundtrip() {
    let uuid = uuid::Uuid::now_v7();
    let key = BlockKey::from_uuid(uuid);
    assert_eq!(key.as_uuid(), uuid);
}

#[test]
fn block_key_display_and_parse() {
    let key = BlockKey::new();
    let parsed = BlockKey::from_str(&key.to_string()).unwrap();
    assert_eq!(key, parsed);
    assert!(BlockKey::from_str("not-a-uuid").is_err());
}

#[test]
fn block_key_hash_and_eq() {
    let key = BlockKey::new();
    let mut set = HashSet::new();
    set.insert(key);
    set.insert(key);
    assert_eq!(set.len(), 1);
}
