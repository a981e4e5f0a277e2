//! Method collection over a class's supertype graph, memoized per class.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use beanscope_types::{
    method_signature, superclass_chain, ClassDef, ClassId, MethodDef, Type, TypeEnv,
};
use indexmap::IndexMap;
use parking_lot::RwLock;

/// A method slot: the declaring class and the method's position in its `methods`.
#[derive(Debug, Clone)]
struct MemberRef {
    declaring: ClassId,
    index: usize,
    signature: String,
}

/// A method together with the class that declares it.
#[derive(Clone, Copy)]
pub(crate) struct Member<'a> {
    pub(crate) declaring: ClassId,
    pub(crate) method: &'a MethodDef,
}

/// Per-class method collections shared across discoveries.
///
/// Every class of the superclass chain contributes its own methods before any interface
/// does, so an inherited implementation always shadows the interface declaration it
/// implements. Interfaces follow, per class in chain order, depth-first in declaration order.
/// An interface's closure over its superinterfaces is computed once however many classes or
/// paths reach it.
///
/// Independent of the metadata cache: clearing one leaves the other intact.
#[derive(Debug, Default)]
pub struct MemberIndex {
    classes: RwLock<HashMap<ClassId, Arc<[MemberRef]>>>,
    interfaces: RwLock<HashMap<ClassId, Arc<[MemberRef]>>>,
}

impl MemberIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of classes whose collection is memoized.
    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }

    /// Number of interfaces whose closure is memoized.
    pub fn interface_count(&self) -> usize {
        self.interfaces.read().len()
    }

    pub fn clear(&self) {
        self.classes.write().clear();
        self.interfaces.write().clear();
    }

    /// Every non-synthetic method visible on `class`, de-duplicated by erased signature with
    /// the first declaration in walk order kept.
    pub(crate) fn methods<'e>(&self, env: &'e dyn TypeEnv, class: ClassId) -> Vec<Member<'e>> {
        self.class_members(env, class)
            .iter()
            .filter_map(|member| {
                let method = env.class(member.declaring)?.methods.get(member.index)?;
                Some(Member {
                    declaring: member.declaring,
                    method,
                })
            })
            .collect()
    }

    fn class_members(&self, env: &dyn TypeEnv, class: ClassId) -> Arc<[MemberRef]> {
        if let Some(hit) = self.classes.read().get(&class) {
            return Arc::clone(hit);
        }

        let chain = superclass_chain(env, class);
        let mut unique = UniqueMembers::default();
        for &current in &chain {
            if let Some(def) = env.class(current) {
                unique.add_declared(env, current, def);
            }
        }

        let mut merged = HashSet::new();
        let mut in_progress = HashSet::new();
        for &current in &chain {
            let Some(def) = env.class(current) else {
                continue;
            };
            for iface in def.interfaces.iter().filter_map(Type::raw_class) {
                if merged.insert(iface) {
                    unique.extend(&self.interface_closure(env, iface, &mut in_progress));
                }
            }
        }

        let members = unique.finish();
        self.classes.write().insert(class, Arc::clone(&members));
        members
    }

    fn interface_closure(
        &self,
        env: &dyn TypeEnv,
        iface: ClassId,
        in_progress: &mut HashSet<ClassId>,
    ) -> Arc<[MemberRef]> {
        if let Some(hit) = self.interfaces.read().get(&iface) {
            return Arc::clone(hit);
        }
        let Some(def) = env.class(iface) else {
            return Arc::from(Vec::new());
        };
        // Cyclic registrations contribute nothing the second time round.
        if !in_progress.insert(iface) {
            return Arc::from(Vec::new());
        }

        let mut unique = UniqueMembers::default();
        unique.add_declared(env, iface, def);
        for parent in def.interfaces.iter().filter_map(Type::raw_class) {
            unique.extend(&self.interface_closure(env, parent, in_progress));
        }
        in_progress.remove(&iface);

        let members = unique.finish();
        self.interfaces.write().insert(iface, Arc::clone(&members));
        members
    }
}

#[derive(Default)]
struct UniqueMembers(IndexMap<String, MemberRef>);

impl UniqueMembers {
    fn add_declared(&mut self, env: &dyn TypeEnv, declaring: ClassId, def: &ClassDef) {
        for (index, method) in def.methods.iter().enumerate() {
            if method.is_synthetic {
                continue;
            }
            let signature = method_signature(env, method);
            self.0
                .entry(signature.clone())
                .or_insert(MemberRef {
                    declaring,
                    index,
                    signature,
                });
        }
    }

    fn extend(&mut self, members: &[MemberRef]) {
        for member in members {
            if !self.0.contains_key(&member.signature) {
                self.0.insert(member.signature.clone(), member.clone());
            }
        }
    }

    fn finish(self) -> Arc<[MemberRef]> {
        self.0.into_values().collect()
    }
}
