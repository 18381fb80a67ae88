//! Property-based tests for the validation engine.

use crate::{ErrorReport, FieldPath, Validator};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

// Strategy for generating flat scalar values
fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(Value::from),
        "[a-zA-Z0-9 @.]{0,12}".prop_map(Value::String),
    ]
}

// Strategy for generating address lists where some entries lack a city
fn address_strategy() -> impl Strategy<Value = Vec<Option<String>>> {
    prop::collection::vec(prop::option::of("[A-Za-z]{0,10}"), 0..8)
}

fn addresses(cities: &[Option<String>]) -> Value {
    let items = cities
        .iter()
        .map(|city| {
            let mut entry = Map::new();
            entry.insert("street".to_string(), json!("Jl. Mangga"));
            if let Some(city) = city {
                entry.insert("city".to_string(), json!(city));
            }
            Value::Object(entry)
        })
        .collect();
    json!({ "address": Value::Array(items) })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // A wildcard over an array of N elements yields N concrete locations.
    #[test]
    fn wildcard_resolves_one_location_per_element(cities in address_strategy()) {
        let data = addresses(&cities);
        let path = FieldPath::parse("address.*.city").unwrap();
        let resolved = path.resolve(&data);

        prop_assert_eq!(resolved.len(), cities.len());
        for (index, location) in resolved.iter().enumerate() {
            prop_assert_eq!(&location.path, &format!("address.{}.city", index));
            prop_assert_eq!(location.value.is_some(), cities[index].is_some());
        }
    }

    // `required` on a wildcard path fails exactly for the blank or missing cities.
    #[test]
    fn wildcard_failures_are_per_element(cities in address_strategy()) {
        let validator = Validator::make(addresses(&cities), [("address.*.city", "required")]).unwrap();
        let errors = validator.errors();

        for (index, city) in cities.iter().enumerate() {
            let blank = city.as_deref().map_or(true, |c| c.trim().is_empty());
            prop_assert_eq!(errors.has(&format!("address.{}.city", index)), blank);
        }
    }

    // Two validators over the same input agree, and a validator agrees with
    // itself on later queries.
    #[test]
    fn outcome_is_stable(username in scalar_strategy(), password in scalar_strategy()) {
        let data = json!({"username": username, "password": password});
        let rules = [("username", "required|email|max:100"), ("password", "required|min:6|max:20")];
        let first = Validator::make(data.clone(), rules).unwrap();
        let second = Validator::make(data, rules).unwrap();

        let report: ErrorReport = first.errors().clone();
        prop_assert_eq!(second.errors(), &report);
        prop_assert_eq!(first.passes(), report.is_empty());
        prop_assert_eq!(second.passes(), report.is_empty());
        prop_assert_eq!(first.errors(), &report);
        prop_assert_eq!(first.validate().is_ok(), second.validate().is_ok());
        prop_assert_eq!(first.failed().count(), second.failed().count());
    }

    // Validated data never contains undeclared keys.
    #[test]
    fn validated_data_is_allow_listed(
        username in "[a-z]{1,10}",
        extra in prop::collection::btree_map("[a-z]{1,6}", scalar_strategy(), 0..5),
    ) {
        let mut data = Map::new();
        data.insert("username".to_string(), json!(username));
        for (key, value) in extra {
            data.entry(key).or_insert(value);
        }

        let validator = Validator::make(Value::Object(data), [("username", "required")]).unwrap();
        let validated = validator.validate().unwrap();

        prop_assert_eq!(validated, json!({"username": username}));
    }
}
