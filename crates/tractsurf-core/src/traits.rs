//! The [`FieldHost`] trait implemented by tractograms and surfaces.

use crate::error::FieldError;
use crate::field::{DataType, Field, FieldCollection, FieldOwner};

/// A container that owns a [`FieldCollection`] and can size fields
/// for its element kinds.
///
/// The provided methods enforce the field invariants that depend on the
/// container: the owner must belong to the container's domain and the
/// payload must cover exactly `cardinality(owner)` elements.
pub trait FieldHost {
    /// Number of elements of the given kind, or `None` if the owner
    /// does not apply to this container.
    fn cardinality(&self, owner: FieldOwner) -> Option<usize>;

    /// The container's fields.
    fn fields(&self) -> &FieldCollection;

    /// Mutable access to the container's fields.
    fn fields_mut(&mut self) -> &mut FieldCollection;

    /// Allocate a zero-filled field and append it.
    ///
    /// Fails with `DuplicateName` if the name is taken; nothing is
    /// allocated in that case.
    fn create_field(
        &mut self,
        name: &str,
        owner: FieldOwner,
        datatype: DataType,
        dimension: usize,
    ) -> Result<&mut Field, FieldError> {
        if self.fields().contains(name) {
            return Err(FieldError::DuplicateName {
                name: name.to_string(),
            });
        }
        let cardinality = self.owner_cardinality(name, owner)?;
        let field = Field::zeroed(name, owner, datatype, dimension, cardinality)?;
        self.fields_mut().insert(field)
    }

    /// Append a prebuilt field after checking it covers this container.
    fn attach_field(&mut self, field: Field) -> Result<&mut Field, FieldError> {
        let cardinality = self.owner_cardinality(field.name(), field.owner())?;
        if field.cardinality() != cardinality {
            return Err(FieldError::SizeMismatch {
                name: field.name().to_string(),
                expected: cardinality * field.dimension(),
                found: field.data().len(),
            });
        }
        self.fields_mut().insert(field)
    }

    /// Build a field from a little-endian byte buffer sized for this
    /// container and append it.
    fn import_field(
        &mut self,
        name: &str,
        owner: FieldOwner,
        datatype: DataType,
        dimension: usize,
        bytes: &[u8],
    ) -> Result<&mut Field, FieldError> {
        if self.fields().contains(name) {
            return Err(FieldError::DuplicateName {
                name: name.to_string(),
            });
        }
        let cardinality = self.owner_cardinality(name, owner)?;
        let field = Field::from_le_bytes(name, owner, datatype, dimension, cardinality, bytes)?;
        self.fields_mut().insert(field)
    }

    /// Cardinality of `owner`, or `OwnerMismatch` if it does not apply.
    fn owner_cardinality(&self, name: &str, owner: FieldOwner) -> Result<usize, FieldError> {
        self.cardinality(owner)
            .ok_or_else(|| FieldError::OwnerMismatch {
                name: name.to_string(),
                owner,
                domain: self.fields().domain(),
            })
    }
}
