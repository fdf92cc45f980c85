//! Type model, assignability, generic specialization, and special-form
//! synthesis (C1, C2, C6).

pub mod assign;
pub mod bind;
pub mod class;
pub mod combine;
pub mod dataclass;
pub mod function;
pub mod namedtuple;
pub mod narrow;
pub mod special_forms;
pub mod symbol;
pub mod ty;
pub mod typevar;

pub use assign::{can_assign_type, describe, specialize_type, TypeVarMap};
pub use bind::{
    bind_function_to_class_or_object, look_up_class_member, look_up_class_member_with_flags,
    MemberAccessFlags, MemberLookupResult,
};
pub use class::{ClassFlags, ClassId, ClassType};
pub use combine::{combine_types, do_for_subtypes};
pub use dataclass::{synthesize_dataclass_methods, DataClassFieldDecl, DataClassSynthesisError};
pub use function::{FunctionFlags, FunctionType, Param, ParamCategory};
pub use namedtuple::{synthesize_named_tuple, NamedTupleError, NamedTupleFields};
pub use narrow::{remove_falsiness_from_type, remove_truthiness_from_type};
pub use symbol::{DeclarationCategory, Declaration, Symbol};
pub use ty::{ModuleType, PropertyType, Type, TypeResult};
pub use typevar::{TypeVarDetails, Variance};
