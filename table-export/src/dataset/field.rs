//! Field descriptors reported by a provider

use serde::Deserialize;

/// Field data types a provider can report
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FieldType {
    ObjectId,
    String,
    Integer,
    Double,
    Date,
    Boolean,
    Guid,
    Geometry,
    Raster,
    Blob,
    Other(String),
}

impl FieldType {
    /// Whether columns of this type hold a scalar that can go into a table cell
    pub fn is_exportable(&self) -> bool {
        !matches!(self, FieldType::Geometry | FieldType::Raster | FieldType::Blob)
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "oid" | "objectid" => FieldType::ObjectId,
            "string" | "text" => FieldType::String,
            "integer" | "smallinteger" | "int" => FieldType::Integer,
            "double" | "single" | "float" => FieldType::Double,
            "date" | "datetime" => FieldType::Date,
            "boolean" | "bool" => FieldType::Boolean,
            "guid" | "globalid" => FieldType::Guid,
            "geometry" => FieldType::Geometry,
            "raster" => FieldType::Raster,
            "blob" => FieldType::Blob,
            _ => FieldType::Other(tag.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        FieldType::from(tag.as_str())
    }
}

/// Name and type of one dataset field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_scalar_types_are_not_exportable() {
        assert!(!FieldType::Geometry.is_exportable());
        assert!(!FieldType::Raster.is_exportable());
        assert!(!FieldType::Blob.is_exportable());

        assert!(FieldType::ObjectId.is_exportable());
        assert!(FieldType::Date.is_exportable());
        assert!(FieldType::Other("XML".to_string()).is_exportable());
    }

    #[test]
    fn test_type_tags_are_case_insensitive() {
        assert_eq!(FieldType::from("Geometry"), FieldType::Geometry);
        assert_eq!(FieldType::from("RASTER"), FieldType::Raster);
        assert_eq!(FieldType::from("SmallInteger"), FieldType::Integer);
        assert_eq!(FieldType::from("OID"), FieldType::ObjectId);
        assert_eq!(FieldType::from("Widget"), FieldType::Other("Widget".to_string()));
    }

    #[test]
    fn test_descriptor_deserializes_type_tag() {
        let field: FieldDescriptor =
            serde_json::from_str(r#"{"name": "photo", "type": "Blob"}"#).unwrap();
        assert_eq!(field, FieldDescriptor::new("photo", FieldType::Blob));
    }
}
