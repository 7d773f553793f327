mod common;

use std::sync::Arc;

use common::*;
use quickbuilder::{Contract, Registry};

#[test]
fn synthesizes_once_per_contract() {
    setup();
    let registry = Registry::new();
    assert!(!registry.contains::<FruitBuilder>());

    let a = registry.builder::<FruitBuilder>().unwrap();
    let b = registry.builder::<FruitBuilder>().unwrap();
    assert!(Arc::ptr_eq(
        a.instance().implementation(),
        b.instance().implementation()
    ));
    assert!(!a.instance().same_instance(b.instance()));
    assert!(registry.contains::<FruitBuilder>());
    assert_eq!(registry.syntheses(), 1);
}

#[test]
fn contracts_on_the_same_target_are_separate() {
    setup();
    let registry = Registry::new();
    registry.builder::<FruitBuilder>().unwrap();
    registry.builder::<MutableFruitBuilder>().unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.syntheses(), 2);
}

#[test]
fn generators_share_the_implementation() {
    setup();
    let registry = Registry::new();
    let plain = registry.builder::<IntegerValueBuilder>().unwrap();
    let generated = registry.builder_with::<IntegerValueBuilder>(int_generator).unwrap();
    assert!(Arc::ptr_eq(
        plain.instance().implementation(),
        generated.instance().implementation()
    ));
    assert!(plain.with_i(1).build().is_err());
    assert_eq!(generated.with_i(1).build().unwrap().i(), 1);
}

#[test]
fn concurrent_first_use() {
    setup();
    let registry = Registry::new();
    let builders: Vec<FruitBuilder> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|_| s.spawn(|| registry.builder::<FruitBuilder>().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(registry.syntheses(), 1);
    assert_eq!(registry.len(), 1);
    for builder in &builders[1..] {
        assert!(Arc::ptr_eq(
            builder.instance().implementation(),
            builders[0].instance().implementation()
        ));
    }
}

#[test]
fn builders_cross_threads() {
    setup();
    let builder = quickbuilder::builder::<FruitBuilder>()
        .unwrap()
        .with_name("foo".to_string());
    let fruit = std::thread::spawn(move || builder.and_colour("red".to_string()).build())
        .join()
        .unwrap()
        .unwrap();
    assert_eq!(fruit.name, "foo");
    assert_eq!(fruit.colour, "red");
}

#[test]
fn global_registry_is_shared() {
    setup();
    quickbuilder::builder::<PrimitiveBeanBuilder>().unwrap();
    assert!(Registry::global().contains::<PrimitiveBeanBuilder>());
}
