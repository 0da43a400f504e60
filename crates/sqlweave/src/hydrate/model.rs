use super::convert::ConvertError;
use crate::value::Value;

/// How a nested field holds its destination records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// `T` or `Box<T>`
    One,
    /// `Option<T>`
    Optional,
    /// `Vec<T>`
    Many,
}

/// Field shape.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Scalar {
        /// Participates in the group key of its record.
        primary_key: bool,
        /// `Vec<T>` of scalars: distinct values are collected across rows.
        collect: bool,
    },
    Nested {
        model: fn() -> &'static ModelDesc,
        cardinality: Cardinality,
        /// Column prefix replacing the nested type's name.
        alias: Option<&'static str>,
        /// Key fields of the nested type, replacing its own primary keys.
        primary_key: Option<&'static [&'static str]>,
    },
}

/// Static description of one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldDesc {
    pub name: &'static str,
    /// `col` replaces the field part of `prefix.col`; `prefix.col` replaces both.
    pub column: Option<&'static str>,
    pub kind: FieldKind,
}

impl FieldDesc {
    pub fn is_primary_key(&self) -> bool {
        matches!(
            self.kind,
            FieldKind::Scalar {
                primary_key: true,
                ..
            }
        )
    }
}

/// Static description of a destination record type.
#[derive(Debug)]
pub struct ModelDesc {
    /// Snake-case type name; the default column prefix.
    pub type_name: &'static str,
    /// `#[sqlweave(table = "...")]`, overriding `type_name` as prefix.
    pub table: Option<&'static str>,
    pub fields: &'static [FieldDesc],
}

impl ModelDesc {
    /// Column prefix of this record when it is the root destination.
    pub fn prefix(&self) -> &'static str {
        self.table.unwrap_or(self.type_name)
    }
}

/// A hydration destination record. Normally derived with `#[derive(Model)]`.
///
/// Field positions passed to `set_scalar` / `nested` index
/// [`ModelDesc::fields`].
pub trait Model: Default + Send + 'static {
    fn descriptor() -> &'static ModelDesc;

    /// Assign a non-null cell to the scalar field at `field`.
    fn set_scalar(&mut self, field: usize, value: Value) -> Result<(), ConvertError>;

    /// Borrow the nested field at `field`.
    fn nested(&mut self, field: usize) -> Option<Nested<'_>>;

    /// Scalar field values by column name, for INSERT / UPDATE.
    fn column_values(&self) -> Vec<(&'static str, Value)>;
}

impl<T: Model> Model for Box<T> {
    fn descriptor() -> &'static ModelDesc {
        T::descriptor()
    }

    fn set_scalar(&mut self, field: usize, value: Value) -> Result<(), ConvertError> {
        (**self).set_scalar(field, value)
    }

    fn nested(&mut self, field: usize) -> Option<Nested<'_>> {
        (**self).nested(field)
    }

    fn column_values(&self) -> Vec<(&'static str, Value)> {
        (**self).column_values()
    }
}

/// Object-safe view of a [`Model`].
pub trait Record {
    fn record_desc(&self) -> &'static ModelDesc;
    fn assign_field(&mut self, field: usize, value: Value) -> Result<(), ConvertError>;
    fn nested_field(&mut self, field: usize) -> Option<Nested<'_>>;
}

impl<T: Model> Record for T {
    fn record_desc(&self) -> &'static ModelDesc {
        T::descriptor()
    }

    fn assign_field(&mut self, field: usize, value: Value) -> Result<(), ConvertError> {
        self.set_scalar(field, value)
    }

    fn nested_field(&mut self, field: usize) -> Option<Nested<'_>> {
        self.nested(field)
    }
}

/// `Option<T>` destination.
pub trait OptionalSlot {
    fn is_some(&self) -> bool;
    /// Current value, or a fresh default inserted in place.
    fn get_or_default(&mut self) -> &mut dyn Record;
    fn clear(&mut self);
}

impl<T: Model> OptionalSlot for Option<T> {
    fn is_some(&self) -> bool {
        Option::is_some(self)
    }

    fn get_or_default(&mut self) -> &mut dyn Record {
        self.get_or_insert_with(T::default)
    }

    fn clear(&mut self) {
        *self = None;
    }
}

/// `Vec<T>` destination.
pub trait ManySlot {
    fn len(&self) -> usize;
    fn element(&mut self, index: usize) -> Option<&mut dyn Record>;
    /// Append a default element and return it.
    fn push_default(&mut self) -> &mut dyn Record;
    fn pop(&mut self);
}

impl<T: Model> ManySlot for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn element(&mut self, index: usize) -> Option<&mut dyn Record> {
        self.get_mut(index).map(|e| e as &mut dyn Record)
    }

    fn push_default(&mut self) -> &mut dyn Record {
        let index = Vec::len(self);
        self.push(T::default());
        &mut self[index]
    }

    fn pop(&mut self) {
        Vec::pop(self);
    }
}

/// Mutable borrow of a nested field, by cardinality.
pub enum Nested<'a> {
    One(&'a mut dyn Record),
    Optional(&'a mut dyn OptionalSlot),
    Many(&'a mut dyn ManySlot),
}
