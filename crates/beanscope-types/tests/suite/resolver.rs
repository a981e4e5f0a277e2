use beanscope_types::{
    format_type, resolve_field_type, resolve_param_types, resolve_return_type, resolve_type,
    ClassDef, ClassId, ClassKind, FieldDef, MethodDef, Type, TypeEnv, TypeStore, TypeVarId,
    WildcardType,
};

use pretty_assertions::assert_eq;

/// ```java
/// class Base<K, V> {
///     V value; K getKey(); V getValue(); List<V> getValues(); V[] getArray();
///     List<? extends V> getBounded(); <T extends Number> T convert(); void setValue(V v);
/// }
/// class Mid<V> extends Base<String, V> {}
/// class Sub extends Mid<Long> {}
/// class Passthrough<X> extends Mid<X> {}
/// ```
struct Hierarchy {
    env: TypeStore,
    base: ClassId,
    mid: ClassId,
    sub: ClassId,
    passthrough: ClassId,
    base_k: TypeVarId,
    base_v: TypeVarId,
}

impl Hierarchy {
    fn new() -> Self {
        let mut env = TypeStore::with_minimal_jdk();
        let wk = env.well_known().clone();
        let object = Type::Class(wk.object);

        let base_k = env.add_type_param("K", vec![object.clone()]);
        let base_v = env.add_type_param("V", vec![object.clone()]);
        let convert_t = env.add_type_param("T", vec![Type::Class(wk.number)]);
        let v = Type::TypeVar(base_v);

        let mut base = ClassDef::new("com.example.Base", ClassKind::Class);
        base.type_params = vec![base_k, base_v];
        base.super_class = Some(object.clone());
        base.fields = vec![FieldDef::new("value", v.clone())];
        base.methods = vec![
            MethodDef::new("getKey", vec![], Type::TypeVar(base_k)),
            MethodDef::new("getValue", vec![], v.clone()),
            MethodDef::new(
                "getValues",
                vec![],
                Type::parameterized(wk.list, vec![v.clone()]),
            ),
            MethodDef::new("getArray", vec![], Type::array(v.clone())),
            MethodDef::new(
                "getBounded",
                vec![],
                Type::parameterized(
                    wk.list,
                    vec![Type::Wildcard(WildcardType::extends(v.clone()))],
                ),
            ),
            MethodDef::new("convert", vec![], Type::TypeVar(convert_t))
                .with_type_params(vec![convert_t]),
            MethodDef::new("setValue", vec![v.clone()], Type::Void),
        ];
        let base = env.add_class(base);

        let mid_v = env.add_type_param("V", vec![object.clone()]);
        let mut mid = ClassDef::new("com.example.Mid", ClassKind::Class);
        mid.type_params = vec![mid_v];
        mid.super_class = Some(Type::parameterized(
            base,
            vec![Type::Class(wk.string), Type::TypeVar(mid_v)],
        ));
        let mid = env.add_class(mid);

        let mut sub = ClassDef::new("com.example.Sub", ClassKind::Class);
        sub.super_class = Some(Type::parameterized(mid, vec![Type::Class(wk.long)]));
        let sub = env.add_class(sub);

        let pass_x = env.add_type_param("X", vec![object]);
        let mut passthrough = ClassDef::new("com.example.Passthrough", ClassKind::Class);
        passthrough.type_params = vec![pass_x];
        passthrough.super_class = Some(Type::parameterized(mid, vec![Type::TypeVar(pass_x)]));
        let passthrough = env.add_class(passthrough);

        Self {
            env,
            base,
            mid,
            sub,
            passthrough,
            base_k,
            base_v,
        }
    }

    fn method(&self, name: &str) -> &MethodDef {
        self.env
            .class(self.base)
            .unwrap()
            .methods
            .iter()
            .find(|m| m.name == name)
            .unwrap()
    }

    fn return_type_via(&self, name: &str, viewpoint: &Type) -> String {
        let ty = resolve_return_type(&self.env, self.method(name), self.base, viewpoint);
        format_type(&self.env, &ty)
    }
}

#[test]
fn three_level_chain_resolves_to_concrete_argument() {
    let h = Hierarchy::new();
    let sub = Type::Class(h.sub);

    assert_eq!(h.return_type_via("getValue", &sub), "java.lang.Long");
    assert_eq!(h.return_type_via("getKey", &sub), "java.lang.String");
    assert_eq!(
        h.return_type_via("getValues", &sub),
        "java.util.List<java.lang.Long>"
    );
}

#[test]
fn arrays_and_wildcards_are_resolved_recursively() {
    let h = Hierarchy::new();
    let sub = Type::Class(h.sub);

    let array = resolve_return_type(&h.env, h.method("getArray"), h.base, &sub);
    assert_eq!(array, Type::array(Type::Class(h.env.well_known().long)));
    assert!(array.is_concrete());

    assert_eq!(
        h.return_type_via("getBounded", &sub),
        "java.util.List<? extends java.lang.Long>"
    );
}

#[test]
fn parameterized_viewpoint_passes_arguments_through() {
    let h = Hierarchy::new();
    let integer = Type::Class(h.env.well_known().integer);
    let viewpoint = Type::parameterized(h.passthrough, vec![integer.clone()]);

    assert_eq!(
        resolve_return_type(&h.env, h.method("getValue"), h.base, &viewpoint),
        integer
    );
    assert_eq!(h.return_type_via("getKey", &viewpoint), "java.lang.String");
}

#[test]
fn raw_viewpoint_erases_pass_through_variables() {
    let h = Hierarchy::new();
    let raw = Type::Class(h.passthrough);
    assert_eq!(h.return_type_via("getValue", &raw), "java.lang.Object");

    let raw_mid = Type::Class(h.mid);
    assert_eq!(h.return_type_via("getValue", &raw_mid), "java.lang.Object");
    assert_eq!(h.return_type_via("getKey", &raw_mid), "java.lang.String");
}

#[test]
fn viewpoint_equal_to_declaring_class_uses_first_bound() {
    let mut env = TypeStore::with_minimal_jdk();
    let number = Type::Class(env.well_known().number);
    let t = env.add_type_param("T", vec![number.clone()]);
    let mut boxed = ClassDef::new("com.example.Box", ClassKind::Class);
    boxed.type_params = vec![t];
    let boxed = env.add_class(boxed);

    assert_eq!(
        resolve_type(&env, &Type::TypeVar(t), &Type::Class(boxed), boxed),
        number
    );

    // A parameterized view of the declaring class still yields the bound, not its argument.
    let long = Type::Class(env.well_known().long);
    let viewpoint = Type::parameterized(boxed, vec![long]);
    assert_eq!(
        resolve_type(&env, &Type::TypeVar(t), &viewpoint, boxed),
        number
    );
    assert_eq!(
        format_type(&env, &resolve_type(&env, &Type::TypeVar(t), &viewpoint, boxed)),
        "java.lang.Number"
    );
}

#[test]
fn method_level_variable_erases_to_its_bound() {
    let h = Hierarchy::new();
    assert_eq!(
        h.return_type_via("convert", &Type::Class(h.sub)),
        "java.lang.Number"
    );
}

#[test]
fn field_and_parameter_types_resolve_like_return_types() {
    let h = Hierarchy::new();
    let sub = Type::Class(h.sub);
    let long = Type::Class(h.env.well_known().long);

    let base_def = h.env.class(h.base).unwrap();
    assert_eq!(
        resolve_field_type(&h.env, &base_def.fields[0], h.base, &sub),
        long
    );
    assert_eq!(
        resolve_param_types(&h.env, h.method("setValue"), h.base, &sub),
        vec![long]
    );
}

#[test]
fn interface_declared_variables_resolve_through_implementations() {
    let mut env = TypeStore::with_minimal_jdk();
    let wk = env.well_known().clone();
    let t = env.add_type_param("T", vec![Type::Class(wk.object)]);

    let mut holder = ClassDef::new("com.example.Holder", ClassKind::Interface);
    holder.type_params = vec![t];
    holder.methods = vec![MethodDef::new("getItem", vec![], Type::TypeVar(t))];
    let holder = env.add_class(holder);

    let mut named = ClassDef::new("com.example.Named", ClassKind::Interface);
    named.interfaces = vec![Type::parameterized(holder, vec![Type::Class(wk.string)])];
    let named = env.add_class(named);

    let mut impl_def = ClassDef::new("com.example.Impl", ClassKind::Class);
    impl_def.super_class = Some(Type::Class(wk.object));
    impl_def.interfaces = vec![Type::Class(named)];
    let impl_id = env.add_class(impl_def);

    let method = env.class(holder).unwrap().methods[0].clone();
    assert_eq!(
        resolve_return_type(&env, &method, holder, &Type::Class(impl_id)),
        Type::Class(wk.string)
    );
}

#[test]
fn unrelated_viewpoint_resolves_to_object() {
    let h = Hierarchy::new();
    let string = Type::Class(h.env.well_known().string);
    assert_eq!(
        resolve_type(&h.env, &Type::TypeVar(h.base_v), &string, h.base),
        h.env.object_type()
    );
    assert_eq!(
        resolve_type(&h.env, &Type::TypeVar(h.base_k), &Type::int(), h.base),
        h.env.object_type()
    );
}

#[test]
fn concrete_types_resolve_to_themselves() {
    let h = Hierarchy::new();
    let wk = h.env.well_known();
    let ty = Type::parameterized(wk.map, vec![Type::Class(wk.string), Type::int()]);
    assert_eq!(resolve_type(&h.env, &ty, &Type::Class(h.sub), h.base), ty);
    assert_eq!(
        resolve_type(&h.env, &Type::Void, &Type::Class(h.sub), h.base),
        Type::Void
    );
}
