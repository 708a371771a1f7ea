use ferrous_ioc::config::{ENV_INJECT_PROPERTIES, ENV_MAX_DEPTH};
use ferrous_ioc::{ContainerBuilder, ContainerOptions};
use serial_test::serial;
use std::env;

fn clear() {
    env::remove_var(ENV_MAX_DEPTH);
    env::remove_var(ENV_INJECT_PROPERTIES);
}

#[test]
#[serial]
fn test_from_env_defaults_when_unset() {
    clear();
    assert_eq!(ContainerOptions::from_env(), ContainerOptions::default());
}

#[test]
#[serial]
fn test_from_env_reads_variables() {
    clear();
    env::set_var(ENV_MAX_DEPTH, "32");
    env::set_var(ENV_INJECT_PROPERTIES, "true");

    let options = ContainerOptions::from_env();
    assert_eq!(options.max_depth, 32);
    assert!(options.inject_properties_on_activation);
    clear();
}

#[test]
#[serial]
fn test_from_env_ignores_garbage() {
    clear();
    env::set_var(ENV_MAX_DEPTH, "deep");
    env::set_var(ENV_INJECT_PROPERTIES, "yes please");

    let options = ContainerOptions::from_env();
    assert_eq!(options, ContainerOptions::default());
    clear();
}

#[test]
#[serial]
fn test_from_env_trims_whitespace() {
    clear();
    env::set_var(ENV_MAX_DEPTH, " 12 \n");

    assert_eq!(ContainerOptions::from_env().max_depth, 12);
    clear();
}

#[test]
#[serial]
fn test_env_options_reach_the_container() {
    clear();
    env::set_var(ENV_MAX_DEPTH, "5");

    let mut builder = ContainerBuilder::new();
    builder.options(ContainerOptions::from_env());
    assert_eq!(builder.build().options().max_depth, 5);
    clear();
}

#[cfg(feature = "config")]
#[test]
fn test_options_from_json() {
    let options = ContainerOptions::from_json_str(r#"{ "inject_properties_on_activation": true }"#).unwrap();
    assert!(options.inject_properties_on_activation);
    assert_eq!(options.max_depth, ContainerOptions::default().max_depth);

    let round_trip = serde_json::to_string(&options).unwrap();
    assert_eq!(ContainerOptions::from_json_str(&round_trip).unwrap(), options);

    assert!(ContainerOptions::from_json_str(r#"{ "max_depth": "many" }"#).is_err());
}
