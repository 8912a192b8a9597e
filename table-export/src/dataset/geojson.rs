//! GeoJSON FeatureCollection provider
//!
//! The dataset identifier is a file path. Feature properties become fields in
//! first-seen order, preceded by the feature geometry. A collection may carry a
//! foreign `"fields"` member (`[{"name": .., "type": ..}]`) that replaces the
//! inferred schema.

use std::collections::HashMap;
use std::fs;

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use super::{
    DatasetProvider, FieldDescriptor, FieldType, ProjectedCursor, ProviderError, ProviderVersion,
    Row, StepCursor, StepRow, Value, parse_date,
};

/// Name of the geometry field every feature carries
///
/// Underscores are prepended while a property already uses the name.
pub const GEOMETRY_FIELD: &str = "geometry";

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<Feature>,
    #[serde(default)]
    fields: Option<Vec<FieldDescriptor>>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, JsonValue>>,
}

impl Feature {
    fn value_of(&self, field: &FieldDescriptor) -> Value {
        self.properties
            .as_ref()
            .and_then(|props| props.get(&field.name))
            .map(|json| to_value(json, &field.field_type))
            .unwrap_or(Value::Null)
    }
}

/// Reads GeoJSON files from disk
#[derive(Debug, Default, Clone, Copy)]
pub struct GeoJsonProvider;

impl GeoJsonProvider {
    /// Cursor API level implemented by this provider
    pub const API_VERSION: ProviderVersion = ProviderVersion::new(10, 1);

    pub fn new() -> Self {
        Self
    }

    fn load(&self, dataset: &str) -> Result<(Vec<FieldDescriptor>, Vec<Feature>), ProviderError> {
        let content = fs::read_to_string(dataset)
            .map_err(|e| ProviderError::new(dataset, format!("cannot open file: {}", e)))?;

        let collection: FeatureCollection = serde_json::from_str(&content)
            .map_err(|e| ProviderError::new(dataset, format!("invalid GeoJSON: {}", e)))?;

        if collection.kind != "FeatureCollection" {
            return Err(ProviderError::new(
                dataset,
                format!("expected a FeatureCollection, found {:?}", collection.kind),
            ));
        }

        let fields = match collection.fields {
            Some(declared) => declared,
            None => infer_fields(&collection.features),
        };

        log::debug!(
            "Loaded {} features with {} fields from {}",
            collection.features.len(),
            fields.len(),
            dataset
        );

        Ok((fields, collection.features))
    }
}

impl DatasetProvider for GeoJsonProvider {
    fn version(&self) -> ProviderVersion {
        Self::API_VERSION
    }

    fn describe_fields(&self, dataset: &str) -> Result<Vec<FieldDescriptor>, ProviderError> {
        self.load(dataset).map(|(fields, _)| fields)
    }

    fn step_cursor<'a>(&'a self, dataset: &str) -> Result<Box<dyn StepCursor + 'a>, ProviderError> {
        let (fields, features) = self.load(dataset)?;
        Ok(Box::new(GeoJsonStepCursor {
            fields,
            features: features.into_iter(),
        }))
    }

    fn projected_cursor<'a>(
        &'a self,
        dataset: &str,
        columns: &[String],
    ) -> Result<ProjectedCursor<'a>, ProviderError> {
        let (fields, features) = self.load(dataset)?;

        let projection = columns
            .iter()
            .map(|column| {
                fields
                    .iter()
                    .find(|f| &f.name == column)
                    .cloned()
                    .ok_or_else(|| ProviderError::new(dataset, format!("field not found: {}", column)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Box::new(features.into_iter().map(
            move |feature| -> Result<Row, ProviderError> {
                Ok(projection.iter().map(|field| feature.value_of(field)).collect())
            },
        )))
    }
}

struct GeoJsonStepCursor {
    fields: Vec<FieldDescriptor>,
    features: std::vec::IntoIter<Feature>,
}

impl StepCursor for GeoJsonStepCursor {
    fn next_row(&mut self) -> Result<Option<StepRow>, ProviderError> {
        Ok(self.features.next().map(|feature| {
            self.fields
                .iter()
                .map(|field| (field.name.clone(), feature.value_of(field)))
                .collect()
        }))
    }
}

/// Geometry first, then property keys in first-seen order
fn infer_fields(features: &[Feature]) -> Vec<FieldDescriptor> {
    let mut order: Vec<(String, Option<FieldType>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for props in features.iter().filter_map(|f| f.properties.as_ref()) {
        for (key, value) in props {
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                order.push((key.clone(), None));
                order.len() - 1
            });

            if order[slot].1.is_none() && !value.is_null() {
                order[slot].1 = Some(infer_type(value));
            }
        }
    }

    let mut geometry_name = GEOMETRY_FIELD.to_string();
    while index.contains_key(&geometry_name) {
        geometry_name.insert(0, '_');
    }

    std::iter::once(FieldDescriptor::new(geometry_name, FieldType::Geometry))
        .chain(order.into_iter().map(|(name, field_type)| {
            FieldDescriptor::new(name, field_type.unwrap_or(FieldType::String))
        }))
        .collect()
}

fn infer_type(value: &JsonValue) -> FieldType {
    match value {
        JsonValue::Bool(_) => FieldType::Boolean,
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => FieldType::Integer,
        JsonValue::Number(_) => FieldType::Double,
        JsonValue::String(s) if parse_date(s).is_some() => FieldType::Date,
        JsonValue::String(_) | JsonValue::Null => FieldType::String,
        JsonValue::Array(_) | JsonValue::Object(_) => FieldType::Blob,
    }
}

fn to_value(json: &JsonValue, field_type: &FieldType) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => match field_type {
            FieldType::Double => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            _ => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float))
                .unwrap_or(Value::Null),
        },
        JsonValue::String(s) => match field_type {
            FieldType::Date => parse_date(s)
                .map(Value::Date)
                .unwrap_or_else(|| Value::String(s.clone())),
            _ => Value::String(s.clone()),
        },
        JsonValue::Array(_) | JsonValue::Object(_) => Value::String(json.to_string()),
    }
}
