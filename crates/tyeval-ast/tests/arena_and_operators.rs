//! §6 "Consumed from parser (types only)": the `Arena` storage contract and
//! the `OperatorType` dunder/category tables the evaluator's dispatch relies
//! on without re-deriving.

use tyeval_ast::{Arena, ExprKind, KeywordType, OperatorType};
use tyeval_common::TextRange;

#[test]
fn arena_push_returns_sequential_ids_and_get_round_trips() {
    let mut arena = Arena::new();
    assert!(arena.is_empty());

    let first = arena.push(ExprKind::Name { name: "a".to_string() }, TextRange::new(0, 1), None);
    let second = arena.push(ExprKind::Name { name: "b".to_string() }, TextRange::new(1, 2), Some(first));

    assert_eq!(first.0, 0);
    assert_eq!(second.0, 1);
    assert_eq!(arena.len(), 2);

    match &arena.get(second).kind {
        ExprKind::Name { name } => assert_eq!(name, "b"),
        other => panic!("expected Name, got {other:?}"),
    }
    assert_eq!(arena.get(second).parent, Some(first));
    assert_eq!(arena.get(second).range, TextRange::new(1, 2));
}

#[test]
fn dunder_name_covers_arithmetic_bitwise_and_comparison_operators() {
    assert_eq!(OperatorType::Add.dunder_name(), Some("__add__"));
    assert_eq!(OperatorType::BitwiseAnd.dunder_name(), Some("__and__"));
    assert_eq!(OperatorType::Equals.dunder_name(), Some("__eq__"));
    assert_eq!(OperatorType::Positive.dunder_name(), Some("__pos__"));
}

/// §9: unary invert is intentionally wired to the misspelled `__inv__`
/// rather than the language's real `__invert__` dunder. The enum's own
/// table is the root of that preserved bug, so it gets a test pinning it.
#[test]
fn dunder_name_preserves_the_invert_typo() {
    assert_eq!(OperatorType::Invert.dunder_name(), Some("__inv__"));
}

#[test]
fn dunder_name_is_none_for_boolean_identity_and_membership_operators() {
    for op in [
        OperatorType::And,
        OperatorType::Or,
        OperatorType::Not,
        OperatorType::Is,
        OperatorType::IsNot,
        OperatorType::In,
        OperatorType::NotIn,
    ] {
        assert_eq!(op.dunder_name(), None, "{op:?} should not dispatch through a dunder");
    }
}

#[test]
fn operator_category_predicates_are_mutually_exclusive() {
    for op in [
        OperatorType::Add,
        OperatorType::Subtract,
        OperatorType::Multiply,
        OperatorType::Divide,
        OperatorType::FloorDivide,
        OperatorType::Modulo,
        OperatorType::Power,
        OperatorType::MatrixMultiply,
    ] {
        assert!(op.is_arithmetic());
        assert!(!op.is_bitwise());
        assert!(!op.is_comparison());
    }

    for op in [
        OperatorType::BitwiseAnd,
        OperatorType::BitwiseOr,
        OperatorType::BitwiseXor,
        OperatorType::LeftShift,
        OperatorType::RightShift,
    ] {
        assert!(op.is_bitwise());
        assert!(!op.is_arithmetic());
        assert!(!op.is_comparison());
    }

    for op in [
        OperatorType::Equals,
        OperatorType::NotEquals,
        OperatorType::LessThan,
        OperatorType::LessThanOrEqual,
        OperatorType::GreaterThan,
        OperatorType::GreaterThanOrEqual,
    ] {
        assert!(op.is_comparison());
        assert!(!op.is_arithmetic());
        assert!(!op.is_bitwise());
    }
}

/// `Debug` tokenizes as a keyword (the target language's `__debug__`) but
/// otherwise behaves like any other boolean-typed name (§6).
#[test]
fn keyword_type_distinguishes_debug_from_the_boolean_literals() {
    assert_ne!(KeywordType::Debug, KeywordType::True);
    assert_ne!(KeywordType::Debug, KeywordType::False);
    assert_eq!(KeywordType::None, KeywordType::None);
}
