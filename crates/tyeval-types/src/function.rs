//! `Function` and its parameters (§3).

use crate::ty::Type;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct FunctionFlags: u16 {
        const STATIC_METHOD   = 1 << 0;
        const CLASS_METHOD    = 1 << 1;
        const INSTANCE_METHOD = 1 << 2;
        const ABSTRACT        = 1 << 3;
        const ASYNC           = 1 << 4;
        const GENERATOR       = 1 << 5;
        const CONSTRUCTOR     = 1 << 6;
        /// Marked synthesized (dataclass/`NamedTuple` generated `__new__`/
        /// `__init__`/etc.) rather than written by the user; purely
        /// informational, does not change call-matching behavior.
        const SYNTHESIZED     = 1 << 7;
    }
}

/// PEP 3102 parameter category (§3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamCategory {
    Simple,
    VarArgList,
    VarArgDictionary,
}

#[derive(Clone, Debug)]
pub struct Param {
    pub category: ParamCategory,
    /// `None` for a bare `*` separator (marks the end of the positional
    /// region without itself binding an argument, §4.3 step 2).
    pub name: Option<String>,
    pub has_default: bool,
    pub default_type: Option<Type>,
    pub r#type: Type,
}

impl Param {
    #[must_use]
    pub fn simple(name: impl Into<String>, ty: Type) -> Self {
        Param {
            category: ParamCategory::Simple,
            name: Some(name.into()),
            has_default: false,
            default_type: None,
            r#type: ty,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default_type: Type) -> Self {
        self.has_default = true;
        self.default_type = Some(default_type);
        self
    }

    #[must_use]
    pub fn bare_star() -> Self {
        Param {
            category: ParamCategory::VarArgList,
            name: None,
            has_default: false,
            default_type: None,
            r#type: Type::Unknown,
        }
    }

    #[must_use]
    pub fn var_arg_list(name: impl Into<String>, element_type: Type) -> Self {
        Param {
            category: ParamCategory::VarArgList,
            name: Some(name.into()),
            has_default: false,
            default_type: None,
            r#type: element_type,
        }
    }

    #[must_use]
    pub fn var_arg_dict(name: impl Into<String>, value_type: Type) -> Self {
        Param {
            category: ParamCategory::VarArgDictionary,
            name: Some(name.into()),
            has_default: false,
            default_type: None,
            r#type: value_type,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FunctionType {
    pub name: String,
    pub flags: FunctionFlags,
    pub parameters: Vec<Param>,
    pub declared_return_type: Option<Type>,
    pub inferred_return_type: Option<Type>,
    /// Name of the built-in operator/dunder this function implements, when
    /// it is a synthesized built-in method rather than user code. Used by
    /// the binary-operator dispatch (§4.4) to special-case numeric
    /// promotion before falling back to a generic dunder call.
    pub built_in_name: Option<String>,
}

impl FunctionType {
    #[must_use]
    pub fn effective_return_type(&self) -> Type {
        self.declared_return_type
            .clone()
            .or_else(|| self.inferred_return_type.clone())
            .unwrap_or(Type::Unknown)
    }

    #[must_use]
    pub fn is_static_method(&self) -> bool {
        self.flags.contains(FunctionFlags::STATIC_METHOD)
    }

    #[must_use]
    pub fn is_class_method(&self) -> bool {
        self.flags.contains(FunctionFlags::CLASS_METHOD)
    }

    #[must_use]
    pub fn is_instance_method(&self) -> bool {
        self.flags.contains(FunctionFlags::INSTANCE_METHOD)
    }
}
