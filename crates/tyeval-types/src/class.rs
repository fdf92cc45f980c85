//! `Class` (§3) — the richest variant in the type model: generic identity,
//! MRO-contributing base classes, and class/instance field maps.
//!
//! Field maps and base classes are the three "controlled append operations"
//! the data model's Lifecycle section allows after construction
//! (`add_base_class`, and the class/instance field insertions). They live
//! behind `RefCell` specifically so that a method stored in a class's own
//! field map can hold an `Arc<ClassType>` pointing back at the class it was
//! defined on without requiring the class to exist, fully formed, before its
//! own methods do (§9: cycles are broken by populating fields after the
//! `Arc` is created, not by making `Type` itself self-referential).

use std::cell::{Ref, RefCell};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::symbol::Symbol;
use crate::typevar::TypeVarDetails;

bitflags::bitflags! {
    /// Class-level flags (§2, C1: "flag queries (built-in, special built-in,
    /// abstract, dataclass)").
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ClassFlags: u16 {
        /// A class defined by the runtime/stdlib (`int`, `list`, `object`, ...).
        const BUILT_IN        = 1 << 0;
        /// A special-form built-in whose subscription has non-uniform
        /// semantics (`Callable`, `Optional`, `Union`, `Generic`, `Tuple`,
        /// `Type`, ... — §C6).
        const SPECIAL_BUILT_IN = 1 << 1;
        const ABSTRACT         = 1 << 2;
        const DATA_CLASS       = 1 << 3;
        /// Synthesized by `NamedTuple(...)` (§4.5).
        const NAMED_TUPLE      = 1 << 4;
        /// A `Protocol` subclass — structural rather than nominal base.
        const PROTOCOL         = 1 << 5;
    }
}

/// Stable identity for a class, assigned once at definition and carried
/// unchanged through every specialization. `isSameGenericClass` (§4.1)
/// reduces to comparing this id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

#[derive(Debug)]
pub struct ClassType {
    pub name: String,
    pub flags: ClassFlags,
    pub type_params: Vec<Arc<TypeVarDetails>>,
    /// Empty when unspecialized; otherwise `len() == type_params.len()`,
    /// with missing trailing slots filled with `Any` on specialization
    /// (§3: "Class").
    pub type_args: Vec<crate::ty::Type>,
    base_classes: RefCell<Vec<(Arc<ClassType>, bool)>>,
    class_fields: RefCell<IndexMap<String, Symbol>>,
    instance_fields: RefCell<IndexMap<String, Symbol>>,
    /// A special-form alias transparently forwards lookups to its target
    /// (§4.1: "Alias classes are followed before lookup", e.g. `List` → `list`).
    pub alias_class: Option<Arc<ClassType>>,
    pub source_id: ClassId,
}

impl ClassType {
    #[must_use]
    pub fn new(name: impl Into<String>, flags: ClassFlags, source_id: ClassId) -> Self {
        ClassType {
            name: name.into(),
            flags,
            type_params: Vec::new(),
            type_args: Vec::new(),
            base_classes: RefCell::new(Vec::new()),
            class_fields: RefCell::new(IndexMap::new()),
            instance_fields: RefCell::new(IndexMap::new()),
            alias_class: None,
            source_id,
        }
    }

    pub fn add_base_class(&self, base: Arc<ClassType>, include_in_mro: bool) {
        self.base_classes.borrow_mut().push((base, include_in_mro));
    }

    pub fn add_class_field(&self, name: impl Into<String>, symbol: Symbol) {
        self.class_fields.borrow_mut().insert(name.into(), symbol);
    }

    pub fn add_instance_field(&self, name: impl Into<String>, symbol: Symbol) {
        self.instance_fields
            .borrow_mut()
            .insert(name.into(), symbol);
    }

    #[must_use]
    pub fn base_classes(&self) -> Ref<'_, Vec<(Arc<ClassType>, bool)>> {
        self.base_classes.borrow()
    }

    #[must_use]
    pub fn class_fields(&self) -> Ref<'_, IndexMap<String, Symbol>> {
        self.class_fields.borrow()
    }

    #[must_use]
    pub fn instance_fields(&self) -> Ref<'_, IndexMap<String, Symbol>> {
        self.instance_fields.borrow()
    }

    #[must_use]
    pub fn is_specialized(&self) -> bool {
        !self.type_args.is_empty()
    }

    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(ClassFlags::ABSTRACT)
    }

    #[must_use]
    pub fn is_built_in(&self) -> bool {
        self.flags.contains(ClassFlags::BUILT_IN)
    }

    #[must_use]
    pub fn is_special_built_in(&self) -> bool {
        self.flags.contains(ClassFlags::SPECIAL_BUILT_IN)
    }

    #[must_use]
    pub fn is_data_class(&self) -> bool {
        self.flags.contains(ClassFlags::DATA_CLASS)
    }

    /// Resolve through an alias class chain (§4.1, `List` → `list`).
    #[must_use]
    pub fn resolve_alias(self: &Arc<Self>) -> Arc<Self> {
        let mut current = self.clone();
        while let Some(target) = current.alias_class.clone() {
            current = target;
        }
        current
    }

    /// Produce a specialized copy of this class with the given type
    /// arguments, keeping `source_id` (and therefore generic identity)
    /// unchanged. Missing trailing slots are filled with `Any` (§3).
    ///
    /// Field maps and base classes are deep-specialized lazily by callers
    /// that walk them (`lookUpClassMember`/MRO walk); `cloneForSpecialization`
    /// itself only fixes the `type_args` vector, matching the source's
    /// description of specialization as substituting type parameters to
    /// "produce a distinct (but same-identity) Class value".
    #[must_use]
    pub fn clone_for_specialization(self: &Arc<Self>, mut type_args: Vec<crate::ty::Type>) -> Arc<Self> {
        while type_args.len() < self.type_params.len() {
            type_args.push(crate::ty::Type::Any { is_ellipsis: false });
        }
        type_args.truncate(self.type_params.len().max(type_args.len()));

        let clone = ClassType {
            name: self.name.clone(),
            flags: self.flags,
            type_params: self.type_params.clone(),
            type_args,
            base_classes: RefCell::new(self.base_classes.borrow().clone()),
            class_fields: RefCell::new(self.class_fields.borrow().clone()),
            instance_fields: RefCell::new(self.instance_fields.borrow().clone()),
            alias_class: self.alias_class.clone(),
            source_id: self.source_id,
        };
        Arc::new(clone)
    }
}

/// §4.1: `isSameGenericClass` — identity comparison that ignores
/// specialization arguments.
#[must_use]
pub fn is_same_generic_class(a: &ClassType, b: &ClassType) -> bool {
    a.source_id == b.source_id
}
