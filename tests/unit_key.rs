/// Unit tests for contract identities and registration keys

use ferrous_ioc::{ContractType, RegistrationKey};
use std::collections::HashSet;
use std::sync::Arc;

trait Plugin: Send + Sync {}

#[test]
fn test_contract_type_identity() {
    assert_eq!(ContractType::of::<u32>(), ContractType::of::<u32>());
    assert_ne!(ContractType::of::<u32>(), ContractType::of::<u64>());
    assert_ne!(ContractType::of::<dyn Plugin>(), ContractType::of::<Arc<dyn Plugin>>());
}

#[test]
fn test_contract_type_names() {
    assert_eq!(ContractType::of::<u32>().name(), "u32");
    assert_eq!(ContractType::of::<u32>().to_string(), "u32");
    assert!(ContractType::of::<dyn Plugin>().name().starts_with("dyn "));
}

#[test]
fn test_key_equality_ignores_group() {
    let contract = ContractType::of::<String>();
    let a = RegistrationKey::named(contract, "db").with_group("primary");
    let b = RegistrationKey::named(contract, "db").with_group("secondary");
    let c = RegistrationKey::named(contract, "cache");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.group(), Some("primary"));

    let set: HashSet<_> = [a, b, c].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn test_key_unnamed_differs_from_named() {
    let contract = ContractType::of::<String>();
    assert_ne!(RegistrationKey::new(contract), RegistrationKey::named(contract, "x"));
    assert_ne!(
        RegistrationKey::new(contract),
        RegistrationKey::new(ContractType::of::<str>())
    );
}

#[test]
fn test_key_display() {
    let contract = ContractType::of::<u16>();
    assert_eq!(RegistrationKey::new(contract).to_string(), "u16");
    assert_eq!(RegistrationKey::named(contract, "port").to_string(), "u16[port]");
    assert_eq!(
        RegistrationKey::named(contract, "port").with_group("net").to_string(),
        "u16[port]"
    );
}
