use std::collections::{BTreeSet, HashMap, HashSet};

use crate::{
    ClassDef, ClassId, ClassKind, ConstructorDef, ConstructorHandle, Type, TypeEnv, TypeParamDef,
    TypeVarId, Value,
};

/// Ids of the JDK classes the introspection algorithms refer to directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub string: ClassId,
    pub number: ClassId,
    pub boolean: ClassId,
    pub integer: ClassId,
    pub long: ClassId,
    pub double: ClassId,
    pub cloneable: ClassId,
    pub serializable: ClassId,
    pub iterable: ClassId,
    pub collection: ClassId,
    pub list: ClassId,
    pub array_list: ClassId,
    pub set: ClassId,
    pub hash_set: ClassId,
    pub sorted_set: ClassId,
    pub tree_set: ClassId,
    pub map: ClassId,
    pub hash_map: ClassId,
}

/// In-memory registration table for class schemas.
///
/// Class ids are interned by binary name so that classes can reference each other (and
/// themselves) before they are defined.
#[derive(Clone, Debug)]
pub struct TypeStore {
    classes: Vec<Option<ClassDef>>,
    names: Vec<String>,
    class_by_name: HashMap<String, ClassId>,
    type_params: Vec<TypeParamDef>,
    well_known: WellKnownTypes,
}

impl Default for TypeStore {
    /// A store that only defines `java.lang.Object`; the other well-known ids are reserved but
    /// left undefined. Most callers want [`TypeStore::with_minimal_jdk`].
    fn default() -> Self {
        let mut names: Vec<String> = Vec::new();
        let mut intern = |name: &str| {
            let id = ClassId::new(names.len() as u32);
            names.push(name.to_string());
            id
        };
        let well_known = WellKnownTypes {
            object: intern("java.lang.Object"),
            string: intern("java.lang.String"),
            number: intern("java.lang.Number"),
            boolean: intern("java.lang.Boolean"),
            integer: intern("java.lang.Integer"),
            long: intern("java.lang.Long"),
            double: intern("java.lang.Double"),
            cloneable: intern("java.lang.Cloneable"),
            serializable: intern("java.io.Serializable"),
            iterable: intern("java.lang.Iterable"),
            collection: intern("java.util.Collection"),
            list: intern("java.util.List"),
            array_list: intern("java.util.ArrayList"),
            set: intern("java.util.Set"),
            hash_set: intern("java.util.HashSet"),
            sorted_set: intern("java.util.SortedSet"),
            tree_set: intern("java.util.TreeSet"),
            map: intern("java.util.Map"),
            hash_map: intern("java.util.HashMap"),
        };

        let class_by_name = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), ClassId::new(idx as u32)))
            .collect();
        let mut classes: Vec<Option<ClassDef>> = vec![None; names.len()];
        classes[well_known.object.to_raw() as usize] =
            Some(ClassDef::new("java.lang.Object", ClassKind::Class));

        Self {
            classes,
            names,
            class_by_name,
            type_params: Vec::new(),
            well_known,
        }
    }
}

impl TypeStore {
    /// A store pre-populated with the handful of JDK classes bean introspection touches:
    /// `Object`, `String`, the boxed numbers, and the collection interfaces with their default
    /// implementations.
    ///
    /// The concrete collections are backed by Rust collections: `ArrayList` by `Vec<Value>`,
    /// `HashSet` by `HashSet<String>`, `TreeSet` by `BTreeSet<String>` and `HashMap` by
    /// `HashMap<String, Value>`.
    pub fn with_minimal_jdk() -> Self {
        let mut store = Self::default();
        let wk = store.well_known.clone();
        let object = Type::Class(wk.object);

        let interface = |name: &str| ClassDef::new(name, ClassKind::Interface);
        store.define_class(wk.serializable, interface("java.io.Serializable"));
        store.define_class(wk.cloneable, interface("java.lang.Cloneable"));

        let comparable_t = store.add_type_param("T", vec![object.clone()]);
        let comparable = store.add_class(ClassDef {
            type_params: vec![comparable_t],
            ..interface("java.lang.Comparable")
        });
        let comparable_of = |id: ClassId| Type::parameterized(comparable, vec![Type::Class(id)]);

        let mut string = ClassDef::new("java.lang.String", ClassKind::Class);
        string.super_class = Some(object.clone());
        string.interfaces = vec![Type::Class(wk.serializable), comparable_of(wk.string)];
        store.define_class(wk.string, string);

        let mut number = ClassDef::new("java.lang.Number", ClassKind::Class);
        number.super_class = Some(object.clone());
        number.interfaces = vec![Type::Class(wk.serializable)];
        store.define_class(wk.number, number);

        let mut boolean = ClassDef::new("java.lang.Boolean", ClassKind::Class);
        boolean.super_class = Some(object.clone());
        boolean.interfaces = vec![Type::Class(wk.serializable), comparable_of(wk.boolean)];
        store.define_class(wk.boolean, boolean);

        for (id, name) in [
            (wk.integer, "java.lang.Integer"),
            (wk.long, "java.lang.Long"),
            (wk.double, "java.lang.Double"),
        ] {
            let mut def = ClassDef::new(name, ClassKind::Class);
            def.super_class = Some(Type::Class(wk.number));
            def.interfaces = vec![comparable_of(id)];
            store.define_class(id, def);
        }

        // interface Iterable<T>
        let iterable_t = store.add_type_param("T", vec![object.clone()]);
        store.define_class(
            wk.iterable,
            ClassDef {
                type_params: vec![iterable_t],
                ..interface("java.lang.Iterable")
            },
        );

        // interface Collection<E> extends Iterable<E>
        let collection_e = store.add_type_param("E", vec![object.clone()]);
        store.define_class(
            wk.collection,
            ClassDef {
                type_params: vec![collection_e],
                interfaces: vec![Type::parameterized(
                    wk.iterable,
                    vec![Type::TypeVar(collection_e)],
                )],
                ..interface("java.util.Collection")
            },
        );

        // List<E>, Set<E> extend Collection<E>; SortedSet<E> extends Set<E>
        for (id, name, parent) in [
            (wk.list, "java.util.List", wk.collection),
            (wk.set, "java.util.Set", wk.collection),
            (wk.sorted_set, "java.util.SortedSet", wk.set),
        ] {
            let e = store.add_type_param("E", vec![object.clone()]);
            store.define_class(
                id,
                ClassDef {
                    type_params: vec![e],
                    interfaces: vec![Type::parameterized(parent, vec![Type::TypeVar(e)])],
                    ..interface(name)
                },
            );
        }

        // interface Map<K, V>
        let map_k = store.add_type_param("K", vec![object.clone()]);
        let map_v = store.add_type_param("V", vec![object.clone()]);
        store.define_class(
            wk.map,
            ClassDef {
                type_params: vec![map_k, map_v],
                ..interface("java.util.Map")
            },
        );

        let collections: [(ClassId, &str, ClassId, ConstructorHandle); 3] = [
            (
                wk.array_list,
                "java.util.ArrayList",
                wk.list,
                ConstructorHandle::default_of::<Vec<Value>>(),
            ),
            (
                wk.hash_set,
                "java.util.HashSet",
                wk.set,
                ConstructorHandle::default_of::<HashSet<String>>(),
            ),
            (
                wk.tree_set,
                "java.util.TreeSet",
                wk.sorted_set,
                ConstructorHandle::default_of::<BTreeSet<String>>(),
            ),
        ];
        for (id, name, iface, ctor) in collections {
            let e = store.add_type_param("E", vec![object.clone()]);
            let mut def = ClassDef::new(name, ClassKind::Class);
            def.type_params = vec![e];
            def.super_class = Some(object.clone());
            def.interfaces = vec![
                Type::parameterized(iface, vec![Type::TypeVar(e)]),
                Type::Class(wk.cloneable),
                Type::Class(wk.serializable),
            ];
            def.constructors = vec![ConstructorDef::new(Vec::new(), ctor)];
            store.define_class(id, def);
        }

        let k = store.add_type_param("K", vec![object.clone()]);
        let v = store.add_type_param("V", vec![object.clone()]);
        let mut hash_map = ClassDef::new("java.util.HashMap", ClassKind::Class);
        hash_map.type_params = vec![k, v];
        hash_map.super_class = Some(object);
        hash_map.interfaces = vec![
            Type::parameterized(wk.map, vec![Type::TypeVar(k), Type::TypeVar(v)]),
            Type::Class(wk.cloneable),
            Type::Class(wk.serializable),
        ];
        hash_map.constructors = vec![ConstructorDef::new(
            Vec::new(),
            ConstructorHandle::default_of::<HashMap<String, Value>>(),
        )];
        store.define_class(wk.hash_map, hash_map);

        store
    }

    /// Return the id for `name`, reserving a placeholder slot if it was never seen before.
    pub fn intern_class_id(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.class_by_name.get(name) {
            return *id;
        }
        let id = ClassId::new(self.classes.len() as u32);
        self.classes.push(None);
        self.names.push(name.to_string());
        self.class_by_name.insert(name.to_string(), id);
        id
    }

    /// Install (or replace) the definition behind an interned id.
    pub fn define_class(&mut self, id: ClassId, def: ClassDef) {
        let idx = id.to_raw() as usize;
        if let Some(name) = self.names.get(idx) {
            if *name != def.name {
                self.class_by_name.remove(name);
                self.class_by_name.insert(def.name.clone(), id);
                self.names[idx] = def.name.clone();
            }
        }
        if let Some(slot) = self.classes.get_mut(idx) {
            *slot = Some(def);
        }
    }

    /// Intern and define in one step. Re-adding a name replaces its definition but keeps the id.
    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = self.intern_class_id(&def.name);
        self.define_class(id, def);
        id
    }

    pub fn add_type_param(&mut self, name: impl Into<String>, upper_bounds: Vec<Type>) -> TypeVarId {
        let id = TypeVarId::new(self.type_params.len() as u32);
        self.type_params.push(TypeParamDef {
            name: name.into(),
            upper_bounds,
        });
        id
    }

    /// Replace the bounds of a type parameter. Used for self-referential bounds such as
    /// `T extends Comparable<T>`, where the variable must exist before its bound can name it.
    pub fn define_type_param(&mut self, id: TypeVarId, def: TypeParamDef) {
        if let Some(slot) = self.type_params.get_mut(id.to_raw() as usize) {
            *slot = def;
        }
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.class_by_name.get(name).copied()
    }

    /// Ids of every defined class, in registration order.
    pub fn class_ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.classes
            .iter()
            .enumerate()
            .filter(|(_, def)| def.is_some())
            .map(|(idx, _)| ClassId::new(idx as u32))
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.to_raw() as usize)?.as_ref()
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.to_raw() as usize)
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        let id = self.class_id(name)?;
        self.class(id).map(|_| id)
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }

    /// Interned names are known even before the class is defined.
    fn class_name(&self, id: ClassId) -> String {
        match self.names.get(id.to_raw() as usize) {
            Some(name) => name.clone(),
            None => format!("<unknown class #{}>", id.to_raw()),
        }
    }
}
