//! `Symbol` — the declaration-and-type record backing every name, class
//! field, and instance field (§3: "Symbol").

use crate::ty::Type;

/// What kind of declaration introduced a symbol. Drives the Name-lookup
/// policy in §4.4: "if the symbol category is non-Variable, use
/// `currentType`; else use `inferredType.getType()`".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclarationCategory {
    Variable,
    Class,
    Function,
    Method,
    Parameter,
    Module,
}

/// One declaration site contributing to a symbol. A symbol can have more
/// than one declaration (e.g. an `@overload`ed function, or a variable
/// reassigned in multiple branches); the evaluator only cares about the
/// declared type, not the count or order of declarations beyond what
/// `currentType`/`inferredType` already summarize.
#[derive(Clone, Debug)]
pub struct Declaration {
    pub category: DeclarationCategory,
    pub declared_type: Option<Type>,
}

/// A name's accumulated type information.
///
/// `current_type` is the narrowed-or-declared type in force at the point of
/// lookup (what a flow-sensitive binder would hand back after applying
/// assignments up to this point); `inferred_type` is the type that would be
/// inferred in the absence of any narrowing. Name resolution (§4.4) prefers,
/// in order: an explicit declared type, then `current_type` for non-variable
/// symbols, then `inferred_type` for plain variables.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub declarations: Vec<Declaration>,
    pub current_type: Type,
    pub inferred_type: Type,
}

impl Symbol {
    #[must_use]
    pub fn new(category: DeclarationCategory, ty: Type) -> Self {
        Symbol {
            declarations: vec![Declaration {
                category,
                declared_type: None,
            }],
            current_type: ty.clone(),
            inferred_type: ty,
        }
    }

    #[must_use]
    pub fn with_declared_type(category: DeclarationCategory, declared_type: Type) -> Self {
        Symbol {
            declarations: vec![Declaration {
                category,
                declared_type: Some(declared_type.clone()),
            }],
            current_type: declared_type.clone(),
            inferred_type: declared_type,
        }
    }

    /// First non-`None` declared type across all declarations, if any.
    #[must_use]
    pub fn declared_type(&self) -> Option<&Type> {
        self.declarations
            .iter()
            .find_map(|d| d.declared_type.as_ref())
    }

    /// The category of the first declaration (used for the Name resolution
    /// policy in §4.4).
    #[must_use]
    pub fn primary_category(&self) -> DeclarationCategory {
        self.declarations
            .first()
            .map_or(DeclarationCategory::Variable, |d| d.category)
    }

    /// Resolve this symbol's effective type per §4.4's Name policy:
    /// declared type if any, else `current_type` for non-variables, else
    /// `inferred_type`.
    #[must_use]
    pub fn effective_type(&self) -> Type {
        if let Some(declared) = self.declared_type() {
            return declared.clone();
        }
        match self.primary_category() {
            DeclarationCategory::Variable => self.inferred_type.clone(),
            _ => self.current_type.clone(),
        }
    }
}
