#![allow(dead_code)]

use std::sync::LazyLock;

use quickbuilder::{BuildError, Target, TargetShape};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static SUBSCRIBER_INIT: LazyLock<()> = LazyLock::new(|| {
    let filter = std::env::var("QUICKBUILDER_LOG")
        .ok()
        .and_then(|s| s.parse::<Targets>().ok())
        .unwrap_or_else(|| Targets::new().with_default(tracing::Level::TRACE));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_target(false)
                .compact(),
        )
        .with(filter)
        .try_init()
        .ok();
});

/// Install the test subscriber once per test binary.
pub fn setup() {
    #[allow(clippy::let_unit_value)]
    let _ = *SUBSCRIBER_INIT;
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FruitBean {
    pub id: String,
    pub name: String,
    pub colour: String,
    pub nickname: Option<String>,
}

impl Target for FruitBean {
    fn shape() -> TargetShape<Self> {
        TargetShape::new("FruitBean")
            .with_default()
            .mutator("id", |f: &mut FruitBean, id: String| f.id = id)
            .mutator("name", |f: &mut FruitBean, name: String| f.name = name)
            .mutator("colour", |f: &mut FruitBean, colour: String| f.colour = colour)
            .mutator("nickname", |f: &mut FruitBean, nickname: Option<String>| {
                f.nickname = nickname
            })
    }
}

quickbuilder::contract! {
    pub struct FruitBuilder: Builder<FruitBean> {
        fn with_id(id: String);
        fn with_name(name: String);
        fn and_colour(colour: String);
        fn with_nickname(nickname: Option<String>);
        fn _name() -> String;
        fn __name() -> Option<String>;
    }
}

quickbuilder::contract! {
    pub struct MutableFruitBuilder: MutableBuilder<FruitBean> {
        fn with_name(name: String);
        fn and_colour(colour: String);
        fn _name() -> String;
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrimitiveBean {
    pub i: i32,
    pub l: i64,
    pub f: f32,
    pub d: f64,
    pub b: bool,
    pub by: i8,
    pub s: i16,
    pub c: char,
}

impl Target for PrimitiveBean {
    fn shape() -> TargetShape<Self> {
        TargetShape::new("PrimitiveBean")
            .with_default()
            .mutator("i", |t: &mut PrimitiveBean, v: i32| t.i = v)
            .mutator("l", |t: &mut PrimitiveBean, v: i64| t.l = v)
            .mutator("f", |t: &mut PrimitiveBean, v: f32| t.f = v)
            .mutator("d", |t: &mut PrimitiveBean, v: f64| t.d = v)
            .mutator("b", |t: &mut PrimitiveBean, v: bool| t.b = v)
            .mutator("by", |t: &mut PrimitiveBean, v: i8| t.by = v)
            .mutator("s", |t: &mut PrimitiveBean, v: i16| t.s = v)
            .mutator("c", |t: &mut PrimitiveBean, v: char| t.c = v)
    }
}

quickbuilder::contract! {
    pub struct PrimitiveBeanBuilder: Builder<PrimitiveBean> {
        fn with_i(i: i32);
        fn with_l(l: i64);
        fn with_f(f: f32);
        fn with_d(d: f64);
        fn with_b(b: bool);
        fn with_by(by: i8);
        fn with_s(s: i16);
        fn with_c(c: char);
        fn _i() -> i32;
        fn __i() -> Option<i32>;
        fn __d() -> Option<f64>;
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ArrayBean {
    pub bytes: Vec<u8>,
    pub strings: Vec<String>,
    pub doubles: Box<[f64]>,
    pub multi: Vec<Vec<Vec<bool>>>,
}

impl Target for ArrayBean {
    fn shape() -> TargetShape<Self> {
        TargetShape::new("ArrayBean")
            .with_default()
            .mutator("bytes", |t: &mut ArrayBean, v: Vec<u8>| t.bytes = v)
            .mutator("strings", |t: &mut ArrayBean, v: Vec<String>| t.strings = v)
            .mutator("doubles", |t: &mut ArrayBean, v: Box<[f64]>| t.doubles = v)
            .mutator("multi", |t: &mut ArrayBean, v: Vec<Vec<Vec<bool>>>| {
                t.multi = v
            })
    }
}

quickbuilder::contract! {
    pub struct ArrayBeanBuilder: Builder<ArrayBean> {
        fn with_bytes(bytes: Vec<u8>);
        fn with_strings(strings: Vec<String>);
        fn with_doubles(doubles: Box<[f64]>);
        fn with_multi(multi: Vec<Vec<Vec<bool>>>);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompositeBean {
    pub fruit: FruitBean,
    pub more_fruit: FruitBean,
}

impl Target for CompositeBean {
    fn shape() -> TargetShape<Self> {
        TargetShape::new("CompositeBean")
            .with_default()
            .mutator("fruit", |t: &mut CompositeBean, v: FruitBean| t.fruit = v)
            .mutator("more_fruit", |t: &mut CompositeBean, v: FruitBean| {
                t.more_fruit = v
            })
    }
}

quickbuilder::contract! {
    pub struct CompositeBeanBuilder: Builder<CompositeBean> {
        fn with_fruit(fruit: FruitBean);
        fn with_more_fruit(more_fruit: impl Builder<FruitBean>);
    }
}

/// Immutable value type: no default constructor, no mutators.
#[derive(Clone, Debug, PartialEq)]
pub struct IntegerValue {
    i: i32,
}

impl IntegerValue {
    pub fn new(i: i32) -> Self {
        Self { i }
    }

    pub fn i(&self) -> i32 {
        self.i
    }
}

impl Target for IntegerValue {
    fn shape() -> TargetShape<Self> {
        TargetShape::new("IntegerValue")
    }
}

quickbuilder::contract! {
    pub struct IntegerValueBuilder: Builder<IntegerValue> {
        fn with_i(i: i32);
        fn _i() -> i32;
    }
}

pub fn int_generator(builder: &IntegerValueBuilder) -> Result<IntegerValue, BuildError> {
    Ok(IntegerValue::new(builder._i()?))
}

#[derive(Clone, Debug, PartialEq)]
pub struct MixedValue {
    pub ds: Vec<f64>,
    pub f: f32,
    pub s: String,
    pub ss: String,
    pub ls: Option<Vec<String>>,
}

impl Target for MixedValue {
    fn shape() -> TargetShape<Self> {
        TargetShape::new("MixedValue")
    }
}

quickbuilder::contract! {
    pub struct MixedValueBuilder: Builder<MixedValue> {
        fn with_ds(ds: Vec<f64>);
        fn with_f(f: f32);
        fn with_s(s: String);
        fn with_ss(ss: String);
        fn with_ls(ls: Option<Vec<String>>);
        fn _ds() -> Vec<f64>;
        fn _f() -> f32;
        fn _s() -> String;
        fn _ss() -> String;
        fn _ls() -> Option<Vec<String>>;
    }
}

pub fn mixed_generator(builder: &MixedValueBuilder) -> Result<MixedValue, BuildError> {
    Ok(MixedValue {
        ds: builder._ds()?,
        f: builder._f()?,
        s: builder._s()?,
        ss: builder._ss()?,
        ls: builder._ls()?,
    })
}
