//! Typed per-element fields and the [`FieldCollection`] container.
//!
//! A [`Field`] is a named, dense array attached to one element kind
//! (its [`FieldOwner`]) of a tractogram or a surface. Storage is owned
//! by the field itself: removing a field from its collection drops the
//! buffer, so there is no separate deallocation step to forget.

use std::fmt;
use std::str::FromStr;

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::error::FieldError;

/// The kind of container a field can live on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldDomain {
    /// A streamline collection (owners `POINT` and `STREAMLINE`).
    Tractogram,
    /// A triangle mesh (owners `VERTEX` and `FACE`).
    Surface,
}

impl fmt::Display for FieldDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tractogram => write!(f, "tractogram"),
            Self::Surface => write!(f, "surface"),
        }
    }
}

/// The element kind a field is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldOwner {
    /// One value per streamline point.
    Point,
    /// One value per streamline.
    Streamline,
    /// One value per mesh vertex.
    Vertex,
    /// One value per mesh face.
    Face,
}

impl FieldOwner {
    /// The container domain this owner belongs to.
    pub fn domain(self) -> FieldDomain {
        match self {
            Self::Point | Self::Streamline => FieldDomain::Tractogram,
            Self::Vertex | Self::Face => FieldDomain::Surface,
        }
    }

    /// Canonical upper-case token (`"POINT"`, `"STREAMLINE"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Point => "POINT",
            Self::Streamline => "STREAMLINE",
            Self::Vertex => "VERTEX",
            Self::Face => "FACE",
        }
    }
}

impl fmt::Display for FieldOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldOwner {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POINT" => Ok(Self::Point),
            "STREAMLINE" => Ok(Self::Streamline),
            "VERTEX" => Ok(Self::Vertex),
            "FACE" => Ok(Self::Face),
            _ => Err(FieldError::UnknownOwner {
                token: s.to_string(),
            }),
        }
    }
}

/// Element datatype of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 32-bit signed integers.
    Int,
    /// 32-bit IEEE floats.
    Float,
}

impl DataType {
    /// Size in bytes of one stored element.
    pub const fn size_bytes(self) -> usize {
        4
    }

    /// Lower-case token (`"int"` or `"float"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            _ => Err(FieldError::UnknownDataType {
                token: s.to_string(),
            }),
        }
    }
}

/// Dense field storage, element-major (`element * dimension + component`).
#[derive(Clone, Debug, PartialEq)]
pub enum FieldData {
    /// Integer payload.
    Int(Vec<i32>),
    /// Float payload.
    Float(Vec<f32>),
}

impl FieldData {
    /// A zero-filled buffer of `len` values.
    pub fn zeroed(datatype: DataType, len: usize) -> Self {
        match datatype {
            DataType::Int => Self::Int(vec![0; len]),
            DataType::Float => Self::Float(vec![0.0; len]),
        }
    }

    /// Datatype of the stored values.
    pub fn datatype(&self) -> DataType {
        match self {
            Self::Int(_) => DataType::Int,
            Self::Float(_) => DataType::Float,
        }
    }

    /// Total number of stored values.
    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
        }
    }

    /// Returns `true` if no values are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the integer payload, if this is an `Int` buffer.
    pub fn as_int(&self) -> Option<&[i32]> {
        match self {
            Self::Int(v) => Some(v),
            Self::Float(_) => None,
        }
    }

    /// Borrow the float payload, if this is a `Float` buffer.
    pub fn as_float(&self) -> Option<&[f32]> {
        match self {
            Self::Float(v) => Some(v),
            Self::Int(_) => None,
        }
    }

    /// Mutably borrow the integer payload.
    pub fn as_int_mut(&mut self) -> Option<&mut [i32]> {
        match self {
            Self::Int(v) => Some(v),
            Self::Float(_) => None,
        }
    }

    /// Mutably borrow the float payload.
    pub fn as_float_mut(&mut self) -> Option<&mut [f32]> {
        match self {
            Self::Float(v) => Some(v),
            Self::Int(_) => None,
        }
    }

    /// Encode as little-endian 32-bit elements.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            Self::Int(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            Self::Float(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        }
    }

    /// Decode little-endian 32-bit elements.
    ///
    /// Returns `None` if `bytes.len()` is not a multiple of 4.
    pub fn from_le_bytes(datatype: DataType, bytes: &[u8]) -> Option<Self> {
        if bytes.len() % datatype.size_bytes() != 0 {
            return None;
        }
        let words = bytes
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]]);
        Some(match datatype {
            DataType::Int => Self::Int(words.map(i32::from_le_bytes).collect()),
            DataType::Float => Self::Float(words.map(f32::from_le_bytes).collect()),
        })
    }
}

/// A named, typed, dense array attached to one element kind.
///
/// Invariant: `data.len() == cardinality × dimension` with both factors
/// non-zero. Construction enforces it; the payload can be mutated in
/// place but never resized.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    name: String,
    owner: FieldOwner,
    dimension: usize,
    data: FieldData,
}

impl Field {
    /// Allocate a zero-filled field for `cardinality` elements.
    pub fn zeroed(
        name: impl Into<String>,
        owner: FieldOwner,
        datatype: DataType,
        dimension: usize,
        cardinality: usize,
    ) -> Result<Self, FieldError> {
        let name = name.into();
        check_shape(&name, owner, dimension, cardinality)?;
        Ok(Self {
            name,
            owner,
            dimension,
            data: FieldData::zeroed(datatype, cardinality * dimension),
        })
    }

    /// Wrap an existing buffer, checking it holds exactly
    /// `cardinality × dimension` values.
    pub fn from_data(
        name: impl Into<String>,
        owner: FieldOwner,
        dimension: usize,
        cardinality: usize,
        data: FieldData,
    ) -> Result<Self, FieldError> {
        let name = name.into();
        check_shape(&name, owner, dimension, cardinality)?;
        let expected = cardinality * dimension;
        if data.len() != expected {
            return Err(FieldError::SizeMismatch {
                name,
                expected,
                found: data.len(),
            });
        }
        Ok(Self {
            name,
            owner,
            dimension,
            data,
        })
    }

    /// Build a field from an external flat little-endian buffer.
    ///
    /// All four attributes are supplied by the caller; nothing is
    /// inferred. The buffer must hold exactly
    /// `cardinality × dimension × 4` bytes.
    pub fn from_le_bytes(
        name: impl Into<String>,
        owner: FieldOwner,
        datatype: DataType,
        dimension: usize,
        cardinality: usize,
        bytes: &[u8],
    ) -> Result<Self, FieldError> {
        let name = name.into();
        check_shape(&name, owner, dimension, cardinality)?;
        let expected = cardinality * dimension * datatype.size_bytes();
        if bytes.len() != expected {
            return Err(FieldError::SizeMismatch {
                name,
                expected,
                found: bytes.len(),
            });
        }
        let data = FieldData::from_le_bytes(datatype, bytes).ok_or_else(|| {
            FieldError::SizeMismatch {
                name: name.clone(),
                expected,
                found: bytes.len(),
            }
        })?;
        Ok(Self {
            name,
            owner,
            dimension,
            data,
        })
    }

    /// Field name, unique within its container.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element kind this field is attached to.
    pub fn owner(&self) -> FieldOwner {
        self.owner
    }

    /// Datatype of the stored values.
    pub fn datatype(&self) -> DataType {
        self.data.datatype()
    }

    /// Number of components per element.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of elements the field covers.
    pub fn cardinality(&self) -> usize {
        self.data.len() / self.dimension
    }

    /// The dense payload.
    pub fn data(&self) -> &FieldData {
        &self.data
    }

    /// Mutable access to the payload (length is fixed).
    pub fn data_mut(&mut self) -> &mut FieldData {
        &mut self.data
    }

    /// Float payload, or `DataTypeMismatch` for an integer field.
    pub fn floats(&self) -> Result<&[f32], FieldError> {
        self.data
            .as_float()
            .ok_or_else(|| self.mismatch(DataType::Float))
    }

    /// Integer payload, or `DataTypeMismatch` for a float field.
    pub fn ints(&self) -> Result<&[i32], FieldError> {
        self.data.as_int().ok_or_else(|| self.mismatch(DataType::Int))
    }

    fn mismatch(&self, expected: DataType) -> FieldError {
        FieldError::DataTypeMismatch {
            name: self.name.clone(),
            expected,
            found: self.datatype(),
        }
    }
}

fn check_shape(
    name: &str,
    owner: FieldOwner,
    dimension: usize,
    cardinality: usize,
) -> Result<(), FieldError> {
    if dimension == 0 {
        return Err(FieldError::ZeroDimension {
            name: name.to_string(),
        });
    }
    if cardinality == 0 {
        return Err(FieldError::EmptyOwner {
            name: name.to_string(),
            owner,
        });
    }
    Ok(())
}

/// Name-keyed set of fields owned by one tractogram or surface.
///
/// Iteration follows insertion order, so files are written with their
/// fields in the order they were loaded or attached.
#[derive(Clone, Debug)]
pub struct FieldCollection {
    domain: FieldDomain,
    fields: IndexMap<String, Field>,
}

impl FieldCollection {
    /// Create an empty collection for the given domain.
    pub fn new(domain: FieldDomain) -> Self {
        Self {
            domain,
            fields: IndexMap::new(),
        }
    }

    /// The domain whose owners this collection accepts.
    pub fn domain(&self) -> FieldDomain {
        self.domain
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the collection holds no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` if a field with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Look up a field by name. A miss creates nothing.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Mutable lookup by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.get_mut(name)
    }

    /// Append a field.
    ///
    /// Fails if the name is taken or the owner belongs to another
    /// domain. Replacing a field is the caller's decision: remove the
    /// old one first.
    pub fn insert(&mut self, field: Field) -> Result<&mut Field, FieldError> {
        if field.owner().domain() != self.domain {
            return Err(FieldError::OwnerMismatch {
                name: field.name,
                owner: field.owner,
                domain: self.domain,
            });
        }
        match self.fields.entry(field.name.clone()) {
            Entry::Occupied(_) => Err(FieldError::DuplicateName { name: field.name }),
            Entry::Vacant(slot) => Ok(slot.insert(field)),
        }
    }

    /// Detach a field, handing its storage to the caller.
    pub fn remove(&mut self, name: &str) -> Option<Field> {
        self.fields.shift_remove(name)
    }

    /// Detach and drop a field. Returns whether one existed; deleting
    /// a missing name is a no-op.
    pub fn release(&mut self, name: &str) -> bool {
        self.remove(name).is_some()
    }

    /// Drop every field.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Iterate field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}
