use docsearch_config::json_schema;

#[test]
fn category_order_items_are_restricted_to_known_ids() {
    let value = serde_json::to_value(json_schema()).unwrap();

    let ids = value
        .pointer("/definitions/SearchConfig/properties/category_order/items/enum")
        .and_then(|v| v.as_array())
        .expect("category_order items enum");
    let ids: Vec<_> = ids.iter().filter_map(|v| v.as_str()).collect();
    assert_eq!(ids.len(), 14);
    assert_eq!(ids[0], "all");
    assert!(ids.contains(&"enumvalues"));
}

#[test]
fn cap_has_a_minimum_of_one() {
    let value = serde_json::to_value(json_schema()).unwrap();
    let minimum = value
        .pointer("/definitions/SearchConfig/properties/per_category_cap/minimum")
        .and_then(|v| v.as_f64());
    assert_eq!(minimum, Some(1.0));
}

#[test]
fn top_level_tables_are_described() {
    let value = serde_json::to_value(json_schema()).unwrap();
    for table in ["search", "index", "logging"] {
        assert!(
            value.pointer(&format!("/properties/{table}")).is_some(),
            "missing {table}"
        );
    }
}

#[test]
fn camel_case_aliases_are_deprecated_properties() {
    let value = serde_json::to_value(json_schema()).unwrap();
    let search = value
        .pointer("/definitions/SearchConfig/properties")
        .expect("SearchConfig properties");

    for (alias, key) in [
        ("perCategoryCap", "per_category_cap"),
        ("minQueryLength", "min_query_length"),
        ("categoryOrder", "category_order"),
    ] {
        let property = &search[alias];
        assert_eq!(property["deprecated"], true, "{alias}");
        assert_eq!(
            property["description"],
            format!("Deprecated alias for `search.{key}`."),
            "{alias}"
        );
    }
    assert_eq!(search["perCategoryCap"]["minimum"].as_f64(), Some(1.0));
    assert_eq!(
        search["categoryOrder"]["items"]["enum"],
        search["category_order"]["items"]["enum"]
    );
}

#[test]
fn schema_admits_every_key_the_loader_accepts() {
    let value = serde_json::to_value(json_schema()).unwrap();
    let search = value
        .pointer("/definitions/SearchConfig/properties")
        .and_then(|v| v.as_object())
        .expect("SearchConfig properties");

    let text = "[search]\nperCategoryCap = 7\nminQueryLength = 2\ncategoryOrder = [\"files\"]\n";
    let config: toml::Value = toml::from_str(text).unwrap();
    for key in config["search"].as_table().unwrap().keys() {
        assert!(search.contains_key(key), "schema rejects search.{key}");
    }
    assert!(docsearch_config::DocsearchConfig::load_from_str(text).is_ok());
}
