//! Runtime type identity.
//!
//! A [`TypeKey`] names one declared type: a concrete type, or a contract
//! represented by the trait object type (`dyn Shape`). Keys compare by
//! [`TypeId`] only; the type name is carried for diagnostics.

use std::{
    any::{Any, TypeId},
    fmt,
    hash::{Hash, Hasher},
};

const ERASED_NAME: &str = "<erased>";

/// Opaque, comparable identifier for a type in the host type system.
///
/// Two keys are equal iff they denote the same declared type.
///
/// # Example
///
/// ```rust,ignore
/// trait Shape {}
/// struct Circle;
///
/// let circle = TypeKey::of::<Circle>();
/// let shape = TypeKey::of::<dyn Shape>();
/// assert_ne!(circle, shape);
/// ```
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key of the type `T`. Works for unsized types, including `dyn Trait`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Key of the static type of `value`.
    pub fn of_val<T: ?Sized + 'static>(_value: &T) -> Self {
        Self::of::<T>()
    }

    /// Key of the concrete type behind an erased value.
    ///
    /// The name is not recoverable from a `&dyn Any`, so the key reports
    /// `<erased>` in diagnostics. It still compares equal to `TypeKey::of`
    /// for the same type.
    pub fn of_any(value: &dyn Any) -> Self {
        Self::from_type_id(value.type_id())
    }

    /// Key for a bare [`TypeId`].
    pub fn from_type_id(id: TypeId) -> Self {
        Self {
            id,
            name: ERASED_NAME,
        }
    }

    /// The underlying [`TypeId`].
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The type name captured when the key was built.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this key was built without a type name.
    pub fn is_erased(&self) -> bool {
        self.name == ERASED_NAME
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The category of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A concrete type with at most one supertype.
    Class,
    /// A trait-like contract. Contracts only have super-contracts.
    Contract,
    /// A structural category that cannot be pre-enumerated (arrays of anything).
    Array,
}
