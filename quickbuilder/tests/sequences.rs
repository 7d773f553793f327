mod common;

use common::*;
use quickbuilder::builders::{compose, constant, elements, once, repeat};
use quickbuilder::{BuildError, Builder, BuilderExt, SequenceBuilder};

fn names(fruits: &[FruitBean]) -> Vec<&str> {
    fruits.iter().map(|f| f.name.as_str()).collect()
}

#[test]
fn composed_values() {
    setup();
    let names = compose([once("foo").shared(), once("bar").shared()])
        .build_all()
        .unwrap();
    assert_eq!(names, ["foo", "bar"]);
}

#[test]
fn composed_builders() {
    setup();
    let fruit = quickbuilder::builder::<FruitBuilder>().unwrap();
    let fruits = compose([
        fruit.with_name("apple".to_string()).shared(),
        fruit
            .with_name(elements(["pear".to_string(), "plum".to_string()]))
            .shared(),
    ])
    .build_all()
    .unwrap();
    assert_eq!(names(&fruits), ["apple", "pear", "plum"]);
}

#[test]
fn composed_builders_as_a_property() {
    setup();
    let fruit = quickbuilder::builder::<FruitBuilder>().unwrap();
    let fruits = compose([
        fruit.with_name("apple".to_string()).shared(),
        fruit.with_name("pear".to_string()).shared(),
    ]);
    let composites = quickbuilder::builder::<CompositeBeanBuilder>()
        .unwrap()
        .with_fruit(fruits.clone())
        .with_more_fruit(fruits)
        .build_all()
        .unwrap();
    assert_eq!(composites.len(), 2);
    assert_eq!(composites[1].fruit.name, "pear");
    assert_eq!(composites[1].more_fruit.name, "pear");
}

#[test]
fn empty_composition() {
    setup();
    let empty = compose(Vec::<std::sync::Arc<dyn Builder<String>>>::new());
    assert!(empty.build_all().unwrap().is_empty());
    assert!(matches!(empty.build(), Err(BuildError::Exhausted)));
}

#[test]
fn shortest_property_ends_the_sequence() {
    setup();
    let fruits = quickbuilder::builder::<FruitBuilder>()
        .unwrap()
        .with_name(elements(["a", "b", "c"].map(String::from)))
        .and_colour(repeat("red".to_string(), 2))
        .build_all()
        .unwrap();
    assert_eq!(names(&fruits), ["a", "b"]);
    assert!(fruits.iter().all(|f| f.colour == "red"));
}

#[test]
fn limited_infinite_sequence() {
    setup();
    let fruit = quickbuilder::builder::<FruitBuilder>()
        .unwrap()
        .with_name(constant("apple".to_string()));
    let fruits = fruit.limit(3).build_all().unwrap();
    assert_eq!(names(&fruits), ["apple"; 3]);
    assert_eq!(fruit.build_n(5).unwrap().len(), 5);
}

#[test]
fn build_n_stops_at_the_end() {
    setup();
    let fruit = quickbuilder::builder::<FruitBuilder>()
        .unwrap()
        .with_name(elements(["a", "b"].map(String::from)));
    assert_eq!(names(&fruit.build_n(5).unwrap()), ["a", "b"]);
    assert!(fruit.build_n(0).unwrap().is_empty());
}

#[test]
fn iterating_a_builder() {
    setup();
    let fruit = quickbuilder::builder::<FruitBuilder>()
        .unwrap()
        .with_name(elements(["a", "b", "c"].map(String::from)));
    let collected: Result<Vec<_>, _> = fruit.iter().collect();
    assert_eq!(names(&collected.unwrap()), ["a", "b", "c"]);

    // every iterator starts from the seed
    assert_eq!(fruit.iter().count(), 3);
    assert_eq!(fruit.iter().nth(1).unwrap().unwrap().name, "b");
}

#[test]
fn iteration_stops_at_the_first_error() {
    setup();
    let builder = quickbuilder::builder_with::<IntegerValueBuilder>(int_generator).unwrap();
    let mut iter = builder.iter();
    assert!(iter.next().unwrap().unwrap_err().is_no_value());
    assert!(iter.next().is_none());
}

#[test]
fn generated_sequences() {
    setup();
    let values = quickbuilder::builder_with::<IntegerValueBuilder>(int_generator)
        .unwrap()
        .with_i(elements([1, 2, 3]))
        .build_all()
        .unwrap();
    let values: Vec<_> = values.iter().map(|v| v.i()).collect();
    assert_eq!(values, [1, 2, 3]);
}
