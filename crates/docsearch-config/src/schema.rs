use docsearch_core::Category;
use schemars::schema::{InstanceType, RootSchema, Schema, SchemaObject, SingleOrVec};
use schemars::schema_for;

use crate::DocsearchConfig;

/// JSON schema for `docsearch.toml`, for editor tooling and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    let mut schema = schema_for!(DocsearchConfig);
    restrict_category_ids(&mut schema);
    allow_deprecated_aliases(&mut schema);
    schema
}

/// `category_order` is declared as a list of strings; narrow it to the known
/// category identifiers.
fn restrict_category_ids(schema: &mut RootSchema) {
    let Some(Schema::Object(search)) = schema.definitions.get_mut("SearchConfig") else {
        return;
    };
    let Some(object) = search.object.as_mut() else {
        return;
    };
    let Some(Schema::Object(order)) = object.properties.get_mut("category_order") else {
        return;
    };
    let Some(array) = order.array.as_mut() else {
        return;
    };

    let ids = Category::ALL
        .iter()
        .map(|category| serde_json::Value::from(category.id()))
        .collect();
    let item = SchemaObject {
        instance_type: Some(SingleOrVec::Single(Box::new(InstanceType::String))),
        enum_values: Some(ids),
        ..SchemaObject::default()
    };
    array.items = Some(SingleOrVec::Single(Box::new(Schema::Object(item))));
}

/// The loader still accepts the camelCase spellings of `[search]` keys. They
/// are listed as deprecated copies of the canonical properties so existing
/// files validate.
fn allow_deprecated_aliases(schema: &mut RootSchema) {
    let Some(Schema::Object(search)) = schema.definitions.get_mut("SearchConfig") else {
        return;
    };
    let object = search.object();

    for (alias, key) in crate::DEPRECATED_SEARCH_KEYS {
        let Some(Schema::Object(canonical)) = object.properties.get(*key) else {
            continue;
        };
        let mut property = canonical.clone();
        let metadata = property.metadata();
        metadata.deprecated = true;
        metadata.description = Some(format!("Deprecated alias for `search.{key}`."));
        object
            .properties
            .insert((*alias).to_string(), Schema::Object(property));
    }
}
