use ferrous_ioc::{
    Constructor, ContainerBuilder, ContainerOptions, DiError, Injectable, Lifetime, Resolver,
};
use std::sync::Arc;

struct Chicken {
    _egg: Arc<Egg>,
}
struct Egg {
    _chicken: Arc<Chicken>,
}

impl Injectable for Chicken {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|args| Ok(Chicken { _egg: args.dependency::<Egg>(0)? })).dependency::<Egg>("egg")]
    }
}

impl Injectable for Egg {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![
            Constructor::new(|args| Ok(Egg { _chicken: args.dependency::<Chicken>(0)? }))
                .dependency::<Chicken>("chicken"),
        ]
    }
}

fn cycle_path(err: &DiError) -> Vec<&'static str> {
    match err.innermost() {
        DiError::Circular(path) => path.clone(),
        other => panic!("expected a cycle, got: {other}"),
    }
}

#[test]
fn test_two_step_cycle_reports_path() {
    let mut builder = ContainerBuilder::new();
    builder.register_type::<Chicken>();
    builder.register_type::<Egg>();
    let container = builder.build();

    let err = container.resolve::<Chicken>().err().unwrap();
    let path = cycle_path(&err);
    assert_eq!(path.len(), 3);
    assert!(path[0].ends_with("Chicken"));
    assert!(path[1].ends_with("Egg"));
    assert!(path[2].ends_with("Chicken"));
    assert!(err.innermost().to_string().contains(" -> "));
}

#[test]
fn test_singleton_cycle_does_not_hang() {
    let mut builder = ContainerBuilder::new();
    builder.register_type::<Chicken>().lifetime(Lifetime::Singleton);
    builder.register_type::<Egg>().lifetime(Lifetime::Singleton);
    let container = builder.build();

    let err = container.resolve::<Egg>().err().unwrap();
    assert_eq!(cycle_path(&err).len(), 3);

    // The failed cells stay empty; resolving again reports the cycle again
    let err = container.resolve::<Egg>().err().unwrap();
    assert!(matches!(err.innermost(), DiError::Circular(_)));
}

#[test]
fn test_self_referencing_factory() {
    struct Ouroboros;
    let mut builder = ContainerBuilder::new();
    builder.register_factory::<Ouroboros, _>(|ctx| {
        ctx.resolve::<Ouroboros>()?;
        Ok(Arc::new(Ouroboros))
    });
    let container = builder.build();

    let err = container.resolve::<Ouroboros>().err().unwrap();
    assert_eq!(cycle_path(&err).len(), 2);
}

#[test]
fn test_guard_unwinds_after_cycle() {
    let mut builder = ContainerBuilder::new();
    builder.register_type::<Chicken>();
    builder.register_type::<Egg>();
    builder.register_instance::<u8>(Arc::new(1));
    let container = builder.build();

    assert!(container.resolve::<Chicken>().is_err());
    // A failed resolve leaves nothing on the stack
    assert_eq!(*container.resolve::<u8>().unwrap(), 1);
}

/// Level `N` depends on level `N - 1`; level 0 has no dependencies.
struct Level<const N: usize>;

macro_rules! levels {
    ($($n:literal => $prev:literal),*) => {
        $(
            impl Injectable for Level<$n> {
                fn constructors() -> Vec<Constructor<Self>> {
                    vec![Constructor::new(|args| {
                        args.dependency::<Level<$prev>>(0)?;
                        Ok(Level::<$n>)
                    })
                    .dependency::<Level<$prev>>("below")]
                }
            }
        )*
    };
}

impl Injectable for Level<0> {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(|_| Ok(Level::<0>))]
    }
}

levels!(1 => 0, 2 => 1, 3 => 2, 4 => 3, 5 => 4);

fn deep_container(max_depth: usize) -> ferrous_ioc::Container {
    let mut builder = ContainerBuilder::new();
    builder.options(ContainerOptions {
        max_depth,
        ..ContainerOptions::default()
    });
    builder.register_type::<Level<0>>();
    builder.register_type::<Level<1>>();
    builder.register_type::<Level<2>>();
    builder.register_type::<Level<3>>();
    builder.register_type::<Level<4>>();
    builder.register_type::<Level<5>>();
    builder.build()
}

#[test]
fn test_depth_limit() {
    let container = deep_container(3);

    assert!(container.resolve::<Level<2>>().is_ok());
    let err = container.resolve::<Level<5>>().err().unwrap();
    assert!(matches!(err.innermost(), DiError::DepthExceeded(3)));
}

#[test]
fn test_default_depth_allows_deep_chains() {
    let container = deep_container(ContainerOptions::default().max_depth);
    assert!(container.resolve::<Level<5>>().is_ok());
}
