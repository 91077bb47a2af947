//! Single-field projection over Avro container rows.
//!
//! Only one top-level field is materialized per row. Every other field is
//! walked in its binary encoding and skipped without building a value, so
//! wide schemas (manifest entries carry dozens of statistics maps) cost only
//! a scan over their bytes.

use crate::avro::container::AvroContainer;
use crate::avro::decode::BinaryCursor;
use crate::avro::kind::{AvroKind, KindFamily};
use crate::error::{IcebergError, Result};

/// A decoded Avro value.
///
/// Unions decode to the value of their selected branch.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Null,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bytes(Vec<u8>),
    String(String),
    Fixed(Vec<u8>),
    /// Enum symbol
    Enum(String),
    Array(Vec<Datum>),
    Map(Vec<(String, Datum)>),
    /// Record field values in schema order
    Record(Vec<Datum>),
}

impl Datum {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&[Datum]> {
        match self {
            Self::Record(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// The values of one projected field across every row of a container.
#[derive(Debug, Clone)]
pub struct ProjectedColumn {
    /// Field name
    pub field: String,
    /// Declared type of the field
    pub kind: AvroKind,
    /// One value per row, in file order
    pub values: Vec<Datum>,
}

impl ProjectedColumn {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Take the column as strings.
    ///
    /// Fails if the column is not string-typed or contains nulls.
    pub fn into_strings(self, source: &str) -> Result<Vec<String>> {
        let actual = self.kind.non_null().family();
        if actual != KindFamily::String {
            return Err(IcebergError::type_mismatch(
                self.field,
                KindFamily::String,
                actual,
            ));
        }
        let field = self.field;
        self.values
            .into_iter()
            .enumerate()
            .map(|(row, value)| match value {
                Datum::String(s) => Ok(s),
                other => Err(IcebergError::malformed(
                    source,
                    format!("Row {} of '{}' is {:?}, expected a string", row, field, other),
                )),
            })
            .collect()
    }
}

impl AvroContainer {
    /// Decode one top-level field, by position, across all rows.
    ///
    /// The field's declared type (with an optional `["null", T]` wrapper
    /// removed) must belong to `expected`; this is checked against the schema
    /// before any row is read, so a mismatch yields no partial output.
    pub fn project(&self, index: usize, expected: KindFamily) -> Result<ProjectedColumn> {
        let record = self.record();
        let field = record.field(index).ok_or_else(|| {
            IcebergError::malformed(
                self.path(),
                format!(
                    "Field index {} out of range for record '{}' with {} fields",
                    index,
                    record.name,
                    record.fields.len()
                ),
            )
        })?;

        let actual = field.kind.non_null().family();
        if actual != expected {
            return Err(IcebergError::type_mismatch(&field.name, expected, actual));
        }

        let row_size = record
            .fields
            .iter()
            .map(|column| min_encoded_size(&column.kind))
            .fold(0, usize::saturating_add);

        let mut values = Vec::new();
        for block in self.blocks() {
            let block = block?;
            let mut cursor = BinaryCursor::new(&block.data, self.path());
            check_count(&cursor, block.row_count, row_size)?;
            values.reserve(block.row_count);
            for _ in 0..block.row_count {
                for (position, column) in record.fields.iter().enumerate() {
                    if position == index {
                        values.push(decode_value(&mut cursor, &column.kind)?);
                    } else {
                        skip_value(&mut cursor, &column.kind)?;
                    }
                }
            }
            if !cursor.is_exhausted() {
                return Err(cursor.error(format!(
                    "Block declared {} rows but {} bytes remain after decoding them",
                    block.row_count,
                    cursor.remaining()
                )));
            }
        }

        tracing::trace!(
            path = %self.path(),
            field = %field.name,
            rows = values.len(),
            "Projected Avro column"
        );

        Ok(ProjectedColumn {
            field: field.name.clone(),
            kind: field.kind.clone(),
            values,
        })
    }

    /// Decode one top-level field, by name, across all rows.
    pub fn project_by_name(&self, name: &str, expected: KindFamily) -> Result<ProjectedColumn> {
        let index = self.record().field_index(name).ok_or_else(|| {
            IcebergError::malformed(
                self.path(),
                format!("Field '{}' not found in record '{}'", name, self.record().name),
            )
        })?;
        self.project(index, expected)
    }
}

fn decode_value(cursor: &mut BinaryCursor<'_>, kind: &AvroKind) -> Result<Datum> {
    let datum = match kind {
        AvroKind::Null => Datum::Null,
        AvroKind::Boolean => Datum::Boolean(cursor.read_bool()?),
        AvroKind::Int => Datum::Int(cursor.read_int()?),
        AvroKind::Long => Datum::Long(cursor.read_long()?),
        AvroKind::Float => Datum::Float(cursor.read_float()?),
        AvroKind::Double => Datum::Double(cursor.read_double()?),
        AvroKind::Bytes => Datum::Bytes(cursor.read_bytes()?.to_vec()),
        AvroKind::String => Datum::String(cursor.read_string()?),
        AvroKind::Fixed(size) => Datum::Fixed(cursor.take(*size)?.to_vec()),
        AvroKind::Enum(symbols) => {
            let index = cursor.read_int()?;
            let symbol = usize::try_from(index)
                .ok()
                .and_then(|i| symbols.get(i))
                .ok_or_else(|| cursor.error(format!("Enum index {} out of range", index)))?;
            Datum::Enum(symbol.clone())
        }
        AvroKind::Array(items) => {
            let mut values = Vec::new();
            loop {
                let (count, _) = cursor.read_block_header()?;
                if count == 0 {
                    break;
                }
                check_count(cursor, count, min_encoded_size(items))?;
                for _ in 0..count {
                    values.push(decode_value(cursor, items)?);
                }
            }
            Datum::Array(values)
        }
        AvroKind::Map(values_kind) => {
            let mut entries = Vec::new();
            loop {
                let (count, _) = cursor.read_block_header()?;
                if count == 0 {
                    break;
                }
                check_count(cursor, count, map_entry_size(values_kind))?;
                for _ in 0..count {
                    let key = cursor.read_string()?;
                    entries.push((key, decode_value(cursor, values_kind)?));
                }
            }
            Datum::Map(entries)
        }
        AvroKind::Union(branches) => {
            let branch = union_branch(cursor, branches)?;
            decode_value(cursor, branch)?
        }
        AvroKind::Record(record) => Datum::Record(
            record
                .fields
                .iter()
                .map(|field| decode_value(cursor, &field.kind))
                .collect::<Result<Vec<_>>>()?,
        ),
    };
    Ok(datum)
}

fn skip_value(cursor: &mut BinaryCursor<'_>, kind: &AvroKind) -> Result<()> {
    match kind {
        AvroKind::Null => {}
        AvroKind::Boolean => cursor.skip(1)?,
        AvroKind::Int | AvroKind::Long | AvroKind::Enum(_) => {
            cursor.read_long()?;
        }
        AvroKind::Float => cursor.skip(4)?,
        AvroKind::Double => cursor.skip(8)?,
        AvroKind::Bytes | AvroKind::String => {
            let len = cursor.read_len()?;
            cursor.skip(len)?;
        }
        AvroKind::Fixed(size) => cursor.skip(*size)?,
        AvroKind::Array(items) => loop {
            match cursor.read_block_header()? {
                (0, _) => break,
                (_, Some(size)) => cursor.skip(size)?,
                (count, None) => {
                    check_count(cursor, count, min_encoded_size(items))?;
                    for _ in 0..count {
                        skip_value(cursor, items)?;
                    }
                }
            }
        },
        AvroKind::Map(values) => loop {
            match cursor.read_block_header()? {
                (0, _) => break,
                (_, Some(size)) => cursor.skip(size)?,
                (count, None) => {
                    check_count(cursor, count, map_entry_size(values))?;
                    for _ in 0..count {
                        let len = cursor.read_len()?;
                        cursor.skip(len)?;
                        skip_value(cursor, values)?;
                    }
                }
            }
        },
        AvroKind::Union(branches) => {
            let branch = union_branch(cursor, branches)?;
            skip_value(cursor, branch)?;
        }
        AvroKind::Record(record) => {
            for field in &record.fields {
                skip_value(cursor, &field.kind)?;
            }
        }
    }
    Ok(())
}

/// Most items of a zero-byte kind (only nulls) accepted in one block.
const MAX_ZERO_WIDTH_ITEMS: usize = 1 << 20;

/// Fewest bytes one encoded value of `kind` can occupy.
fn min_encoded_size(kind: &AvroKind) -> usize {
    match kind {
        AvroKind::Null => 0,
        AvroKind::Float => 4,
        AvroKind::Double => 8,
        AvroKind::Fixed(size) => *size,
        AvroKind::Record(record) => record
            .fields
            .iter()
            .map(|field| min_encoded_size(&field.kind))
            .fold(0, usize::saturating_add),
        // Varint, length prefix, block terminator or union index
        _ => 1,
    }
}

fn map_entry_size(values: &AvroKind) -> usize {
    min_encoded_size(values).saturating_add(1)
}

/// Reject an item count that the bytes left in the cursor cannot hold.
fn check_count(cursor: &BinaryCursor<'_>, count: usize, item_size: usize) -> Result<()> {
    let limit = match item_size {
        0 => MAX_ZERO_WIDTH_ITEMS,
        size => cursor.remaining() / size,
    };
    if count > limit {
        return Err(cursor.error(format!(
            "Declared {} items but only {} bytes remain at offset {}",
            count,
            cursor.remaining(),
            cursor.position()
        )));
    }
    Ok(())
}

fn union_branch<'k>(cursor: &mut BinaryCursor<'_>, branches: &'k [AvroKind]) -> Result<&'k AvroKind> {
    let index = cursor.read_long()?;
    usize::try_from(index)
        .ok()
        .and_then(|i| branches.get(i))
        .ok_or_else(|| cursor.error(format!("Union branch {} out of range", index)))
}
