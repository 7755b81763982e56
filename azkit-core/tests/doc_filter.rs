use azkit_core::data_gen::DataGenerator;
use azkit_core::{DocFilter, Document};
use serde_json::{json, Value};

fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be an object, got {other}"),
    }
}

fn sample_docs() -> Vec<Document> {
    let gen = DataGenerator::new();
    let mut docs = gen.random_person_documents(10);
    docs.push(Document::new());
    docs.push(doc(json!({"id": 1, "name": "Ann", "ssn": "111-22-3333"})));
    docs.push(doc(json!({"nested": {"ssn": "kept"}, "list": [1, 2, 3], "flag": null})));
    docs
}

fn sample_filters() -> Vec<DocFilter> {
    vec![
        DocFilter::default(),
        DocFilter::excluding(["ssn", "email", "phone"]),
        DocFilter::including(["id", "name", "state", "missing"]),
        DocFilter::new(["id", "name", "ssn"], ["ssn", "id"]),
        DocFilter::new(["nested", "list"], ["list"]),
    ]
}

#[test]
fn test_concrete_scenarios_table_driven() {
    struct TestCase {
        name: &'static str,
        include: Vec<&'static str>,
        exclude: Vec<&'static str>,
        record: Value,
        expected: Value,
    }

    let test_cases = vec![
        TestCase {
            name: "exclude-only drops ssn",
            include: vec![],
            exclude: vec!["ssn"],
            record: json!({"id": 1, "name": "Ann", "ssn": "111-22-3333"}),
            expected: json!({"id": 1, "name": "Ann"}),
        },
        TestCase {
            name: "include restricts to id and name",
            include: vec!["id", "name"],
            exclude: vec![],
            record: json!({"id": 1, "name": "Ann", "ssn": "111-22-3333"}),
            expected: json!({"id": 1, "name": "Ann"}),
        },
        TestCase {
            name: "exclude beats include and absent names are ignored",
            include: vec!["id", "ssn"],
            exclude: vec!["id"],
            record: json!({"id": 1, "name": "Ann"}),
            expected: json!({}),
        },
        TestCase {
            name: "empty record with restrictive config",
            include: vec!["id"],
            exclude: vec!["name"],
            record: json!({}),
            expected: json!({}),
        },
        TestCase {
            name: "empty record with empty config",
            include: vec![],
            exclude: vec![],
            record: json!({}),
            expected: json!({}),
        },
    ];

    for tc in test_cases {
        let filter = DocFilter::new(tc.include, tc.exclude);
        let out = filter.filter(&doc(tc.record));
        assert_eq!(Value::Object(out), tc.expected, "{}", tc.name);
    }
}

#[test]
fn test_empty_config_is_a_shallow_copy() {
    let filter = DocFilter::from_options(None::<Vec<String>>, None::<Vec<String>>);
    for record in sample_docs() {
        assert_eq!(filter.filter(&record), record);
    }
}

#[test]
fn test_exclude_only_removes_exactly_the_excluded_keys() {
    let excluded = ["ssn", "email", "phone"];
    let filter = DocFilter::excluding(excluded);
    for record in sample_docs() {
        let mut expected = record.clone();
        for key in excluded {
            expected.remove(key);
        }
        assert_eq!(filter.filter(&record), expected);
    }
}

#[test]
fn test_output_never_contains_excluded_keys() {
    for filter in sample_filters() {
        for record in sample_docs() {
            let out = filter.filter(&record);
            for key in out.keys() {
                assert!(!filter.exclude_attrs().contains(key), "excluded key {key} leaked");
            }
        }
    }
}

#[test]
fn test_output_keys_are_within_non_empty_include_set() {
    for filter in sample_filters()
        .into_iter()
        .filter(|f| !f.include_attrs().is_empty())
    {
        for record in sample_docs() {
            let out = filter.filter(&record);
            assert!(out.keys().all(|k| filter.include_attrs().contains(k)));
        }
    }
}

#[test]
fn test_filter_is_idempotent() {
    for filter in sample_filters() {
        for record in sample_docs() {
            let once = filter.filter(&record);
            let twice = filter.filter(&once);
            assert_eq!(once, twice);
        }
    }
}

#[test]
fn test_input_is_not_mutated_and_values_are_untouched() {
    let record = doc(json!({"id": 1, "nested": {"ssn": "x"}, "ssn": "y"}));
    let snapshot = record.clone();
    let out = DocFilter::excluding(["ssn"]).filter(&record);
    assert_eq!(record, snapshot);
    // Exclusions apply to top-level names only.
    assert_eq!(out.get("nested"), Some(&json!({"ssn": "x"})));
}

#[test]
fn test_filter_all_preserves_order() {
    let docs = vec![
        doc(json!({"id": 1, "secret": true})),
        doc(json!({"id": 2})),
        doc(json!({"id": 3, "secret": false})),
    ];
    let out = DocFilter::excluding(["secret"]).filter_all(&docs);
    let ids: Vec<_> = out.iter().map(|d| d["id"].clone()).collect();
    assert_eq!(ids, vec![json!(1), json!(2), json!(3)]);
    assert!(out.iter().all(|d| !d.contains_key("secret")));
}

#[test]
fn test_shared_filter_across_threads() {
    let filter = DocFilter::including(["id", "name"]);
    let docs = sample_docs();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(|| {
                    docs.iter()
                        .map(|d| filter.filter(d))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    });
}

#[test]
fn test_filter_loaded_from_yaml_style_json() {
    let filter: DocFilter = serde_json::from_value(json!({
        "include_attrs": ["id", "name", "name"],
        "exclude_attrs": ["name"]
    }))
    .unwrap();
    let out = filter.filter(&doc(json!({"id": "a", "name": "Ann", "city": "Paris"})));
    assert_eq!(Value::Object(out), json!({"id": "a"}));
}
