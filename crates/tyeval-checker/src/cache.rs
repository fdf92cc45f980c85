//! C8: the per-node type cache and the silenced-diagnostic scope used by
//! overload probing (§5, §6, §8).

use rustc_hash::FxHashMap;

use tyeval_ast::NodeId;
use tyeval_common::diagnostics::{DiagnosticSink, NullDiagnosticSink};
use tyeval_types::Type;

/// Per-node read/write cache, injected into the evaluator rather than
/// owned by it (§5: "The injected read/write cache callbacks are the only
/// mutable state crossing the evaluator boundary").
///
/// Writes must be idempotent: writing the same type twice for the same
/// node is permitted and is exactly what happens when a node is visited
/// once for real and once more during overload probing with the real
/// answer already cached.
pub trait TypeCache {
    fn get(&self, node: NodeId) -> Option<Type>;
    fn set(&mut self, node: NodeId, ty: Type);
}

/// A plain hash-map-backed cache, the implementation tests and simple
/// drivers reach for instead of writing their own `TypeCache`. Backed by
/// `FxHashMap` rather than the standard map, matching the per-node
/// `node_types: FxHashMap<u32, TypeId>` table the checker keys its own
/// hot-path caches by.
#[derive(Default)]
pub struct HashMapTypeCache(FxHashMap<NodeId, Type>);

impl TypeCache for HashMapTypeCache {
    fn get(&self, node: NodeId) -> Option<Type> {
        self.0.get(&node).cloned()
    }

    fn set(&mut self, node: NodeId, ty: Type) {
        self.0.insert(node, ty);
    }
}

/// A cache that never hits and discards every write. Used by the
/// overload-probing routine (§4.3, §5): each speculative attempt must
/// re-evaluate its arguments rather than reuse — or pollute — the real
/// cache.
#[derive(Default)]
pub struct NullTypeCache;

impl TypeCache for NullTypeCache {
    fn get(&self, _node: NodeId) -> Option<Type> {
        None
    }

    fn set(&mut self, _node: NodeId, _ty: Type) {}
}

/// Run `f` with diagnostics silenced: `f` receives a fresh
/// [`NullDiagnosticSink`] instead of `sink`, so anything it reports is
/// discarded rather than ever reaching the real sink. Because the
/// substitute sink is a fully separate value, there is nothing to restore
/// on `f`'s return (normal or via an early `?`/panic unwind) — `sink`
/// itself was never touched (§5: "on normal or exceptional return the sink
/// must be restored").
///
/// This is how `validateCall`'s `OverloadedFunction` arm (§4.3) probes each
/// candidate overload without surfacing the failures of every overload it
/// rejects along the way.
pub fn with_silenced_diagnostics<R>(f: impl FnOnce(&mut dyn DiagnosticSink) -> R) -> R {
    let mut null_sink = NullDiagnosticSink;
    f(&mut null_sink)
}
