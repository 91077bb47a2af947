//! Runtime type model for Avro data.
//!
//! The schema embedded in an Avro container is parsed with `apache_avro` and
//! then lowered into [`AvroKind`], a small tagged model that only keeps what
//! the binary decoder needs: the physical encoding of every type. Logical
//! types collapse to their underlying encoding (a `date` is an `int`, a
//! `decimal` is `bytes` or `fixed`), and named references are inlined.

use std::collections::HashMap;
use std::fmt;

use apache_avro::schema::Name;
use apache_avro::Schema;

use crate::error::{IcebergError, Result};

/// Coarse classification of an Avro type, used for projection type checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindFamily {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Fixed,
    Enum,
    Array,
    Map,
    Union,
    Record,
}

impl KindFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Bytes => "bytes",
            Self::String => "string",
            Self::Fixed => "fixed",
            Self::Enum => "enum",
            Self::Array => "array",
            Self::Map => "map",
            Self::Union => "union",
            Self::Record => "record",
        }
    }
}

impl fmt::Display for KindFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical Avro type of a value.
#[derive(Debug, Clone, PartialEq)]
pub enum AvroKind {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    /// Fixed-size byte array
    Fixed(usize),
    /// Enum with its symbols, encoded as an int index
    Enum(Vec<String>),
    Array(Box<AvroKind>),
    /// Map with string keys
    Map(Box<AvroKind>),
    /// Union branches in declaration order
    Union(Vec<AvroKind>),
    Record(RecordKind),
}

/// A record type: ordered named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordKind {
    /// Record name (unqualified)
    pub name: String,
    pub fields: Vec<FieldKind>,
}

/// A single field of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldKind {
    pub name: String,
    pub kind: AvroKind,
}

impl RecordKind {
    /// Position of a field by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, index: usize) -> Option<&FieldKind> {
        self.fields.get(index)
    }
}

impl AvroKind {
    /// Lower a parsed Avro schema into the runtime model.
    ///
    /// `source` names the file the schema came from and is only used in errors.
    pub fn from_schema(schema: &Schema, source: &str) -> Result<Self> {
        KindBuilder {
            source,
            named: HashMap::new(),
        }
        .build(schema)
    }

    pub fn family(&self) -> KindFamily {
        match self {
            Self::Null => KindFamily::Null,
            Self::Boolean => KindFamily::Boolean,
            Self::Int => KindFamily::Int,
            Self::Long => KindFamily::Long,
            Self::Float => KindFamily::Float,
            Self::Double => KindFamily::Double,
            Self::Bytes => KindFamily::Bytes,
            Self::String => KindFamily::String,
            Self::Fixed(_) => KindFamily::Fixed,
            Self::Enum(_) => KindFamily::Enum,
            Self::Array(_) => KindFamily::Array,
            Self::Map(_) => KindFamily::Map,
            Self::Union(_) => KindFamily::Union,
            Self::Record(_) => KindFamily::Record,
        }
    }

    /// Strip an optional wrapper: `["null", T]` or `[T, "null"]` yields `T`.
    ///
    /// Any other kind (including wider unions) is returned unchanged.
    pub fn non_null(&self) -> &AvroKind {
        match self {
            Self::Union(branches) if branches.len() == 2 => match (&branches[0], &branches[1]) {
                (AvroKind::Null, other) | (other, AvroKind::Null) => other,
                _ => self,
            },
            _ => self,
        }
    }

    pub fn as_record(&self) -> Option<&RecordKind> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }
}

/// Walks an `apache_avro::Schema`, resolving named references as it goes.
struct KindBuilder<'a> {
    source: &'a str,
    named: HashMap<Name, AvroKind>,
}

impl KindBuilder<'_> {
    fn build(&mut self, schema: &Schema) -> Result<AvroKind> {
        let kind = match schema {
            Schema::Null => AvroKind::Null,
            Schema::Boolean => AvroKind::Boolean,
            Schema::Int | Schema::Date | Schema::TimeMillis => AvroKind::Int,
            Schema::Long
            | Schema::TimeMicros
            | Schema::TimestampMillis
            | Schema::TimestampMicros
            | Schema::LocalTimestampMillis
            | Schema::LocalTimestampMicros
            | Schema::TimestampNanos
            | Schema::LocalTimestampNanos => AvroKind::Long,
            Schema::Float => AvroKind::Float,
            Schema::Double => AvroKind::Double,
            Schema::Bytes | Schema::BigDecimal => AvroKind::Bytes,
            Schema::String | Schema::Uuid => AvroKind::String,
            Schema::Duration => AvroKind::Fixed(12),
            Schema::Decimal(decimal) => self.build(&decimal.inner)?,
            Schema::Array(array) => AvroKind::Array(Box::new(self.build(&array.items)?)),
            Schema::Map(map) => AvroKind::Map(Box::new(self.build(&map.types)?)),
            Schema::Union(union) => AvroKind::Union(
                union
                    .variants()
                    .iter()
                    .map(|variant| self.build(variant))
                    .collect::<Result<Vec<_>>>()?,
            ),
            Schema::Fixed(fixed) => {
                let kind = AvroKind::Fixed(fixed.size);
                self.named.insert(fixed.name.clone(), kind.clone());
                kind
            }
            Schema::Enum(en) => {
                let kind = AvroKind::Enum(en.symbols.clone());
                self.named.insert(en.name.clone(), kind.clone());
                kind
            }
            Schema::Record(record) => {
                let fields = record
                    .fields
                    .iter()
                    .map(|field| {
                        Ok(FieldKind {
                            name: field.name.clone(),
                            kind: self.build(&field.schema)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                let kind = AvroKind::Record(RecordKind {
                    name: record.name.name.clone(),
                    fields,
                });
                self.named.insert(record.name.clone(), kind.clone());
                kind
            }
            Schema::Ref { name } => self.named.get(name).cloned().ok_or_else(|| {
                IcebergError::malformed(
                    self.source,
                    format!(
                        "Unresolved or recursive type reference '{}' in Avro schema",
                        name.name
                    ),
                )
            })?,
            other => {
                return Err(IcebergError::malformed(
                    self.source,
                    format!("Unsupported Avro schema type: {:?}", other),
                ))
            }
        };
        Ok(kind)
    }
}
