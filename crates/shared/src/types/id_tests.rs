use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_typed_key_roundtrip() {
    let id = ProductId::new(42);
    assert_eq!(id.into_inner(), 42);
    assert_eq!(ProductId::from(42), id);
}

#[test]
fn test_typed_key_display() {
    assert_eq!(MovementId::new(7).to_string(), "7");
}

#[test]
fn test_typed_key_from_str() {
    assert_eq!(LineItemId::from_str(" 15 ").unwrap(), LineItemId::new(15));
    assert!(LineItemId::from_str("abc").is_err());
}

#[test]
fn test_typed_key_ordering() {
    assert!(MovementId::new(1) < MovementId::new(2));
}

#[test]
fn test_typed_key_serializes_transparently() {
    let json = serde_json::to_string(&ProductId::new(3)).unwrap();
    assert_eq!(json, "3");
}

#[test]
fn test_operator_id_from_uuid() {
    let uuid = Uuid::new_v4();
    let id = OperatorId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
    assert_eq!(format!("{id}"), uuid.to_string());
}

#[test]
fn test_operator_id_from_str() {
    let uuid = Uuid::new_v4();
    let id = OperatorId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.into_inner(), uuid);
    assert!(OperatorId::from_str("invalid").is_err());
}

#[test]
fn test_operator_id_default_is_unique() {
    assert_ne!(OperatorId::default(), OperatorId::default());
}
