use beanscope_reflect::{MetadataFactory, ReflectError, Result};
use beanscope_types::{InvokeError, Type, TypeStore, Value};

use pretty_assertions::assert_eq;

use super::fixtures::{factory_for, register_user, string, User};

fn read<T: 'static>(value: Option<Value>) -> T {
    *value
        .expect("getter should return a value")
        .downcast::<T>()
        .expect("value should have the expected type")
}

#[test]
fn method_and_field_invokers_round_trip_a_bean() {
    let mut store = TypeStore::with_minimal_jdk();
    let user_class = register_user(&mut store);
    let (_env, factory) = factory_for(store);
    let metadata = factory.metadata_for(user_class).unwrap();

    let mut bean = metadata
        .default_constructor()
        .unwrap()
        .construct(Vec::new())
        .unwrap();

    let set = |name: &str, value: Value, bean: &mut Value| {
        metadata
            .set_invoker(name)
            .unwrap()
            .invoke(&mut **bean, vec![value])
            .unwrap()
    };
    assert!(set("name", Box::new("Ada".to_string()), &mut bean).is_none());
    set("age", Box::new(36i32), &mut bean);
    // `active` and `email` have no setter method and are written through their fields.
    set("active", Box::new(true), &mut bean);
    set("email", Box::new("ada@example.com".to_string()), &mut bean);

    assert_eq!(
        bean.downcast_ref::<User>(),
        Some(&User {
            name: "Ada".to_string(),
            age: 36,
            active: true,
            email: "ada@example.com".to_string(),
        })
    );

    let get = |name: &str, bean: &mut Value| {
        metadata
            .get_invoker(name)
            .unwrap()
            .invoke(&mut **bean, Vec::new())
            .unwrap()
    };
    assert_eq!(read::<String>(get("name", &mut bean)), "Ada");
    assert_eq!(read::<i32>(get("age", &mut bean)), 36);
    assert!(read::<bool>(get("active", &mut bean)));
    assert_eq!(read::<String>(get("CONST", &mut bean)), "x");
}

#[test]
fn invokers_report_their_declared_types() {
    let mut store = TypeStore::with_minimal_jdk();
    let user_class = register_user(&mut store);
    let string_type = string(&store);
    let (_env, factory) = factory_for(store);
    let metadata = factory.metadata_for(user_class).unwrap();

    assert_eq!(
        metadata.get_invoker("name").unwrap().declared_type(),
        &string_type
    );
    assert_eq!(
        metadata.set_invoker("age").unwrap().declared_type(),
        &Type::int()
    );
    assert_eq!(
        metadata.get_invoker("email").unwrap().declared_type(),
        &string_type
    );
}

#[test]
fn invocation_failures_propagate() {
    let mut store = TypeStore::with_minimal_jdk();
    let user_class = register_user(&mut store);
    let (_env, factory) = factory_for(store);
    let metadata = factory.metadata_for(user_class).unwrap();

    let mut not_a_user = String::from("definitely not a user");
    let err = metadata
        .get_invoker("name")
        .unwrap()
        .invoke(&mut not_a_user, Vec::new())
        .unwrap_err();
    assert!(matches!(err, InvokeError::TargetMismatch { .. }));

    let mut user = User::default();
    let err = metadata
        .set_invoker("age")
        .unwrap()
        .invoke(&mut user, vec![Box::new("thirty")])
        .unwrap_err();
    assert!(matches!(err, InvokeError::ArgumentMismatch { index: 0, .. }));

    let err = metadata
        .set_invoker("email")
        .unwrap()
        .invoke(&mut user, Vec::new())
        .unwrap_err();
    assert_eq!(
        err,
        InvokeError::ArgumentCount {
            expected: 1,
            found: 0
        }
    );
}

#[test]
fn invoke_errors_convert_into_reflect_errors() {
    fn rename(metadata: &beanscope_reflect::ClassMetadata, target: &mut String) -> Result<()> {
        metadata
            .set_invoker("name")?
            .invoke(target, vec![Box::new("Grace".to_string())])?;
        Ok(())
    }

    let mut store = TypeStore::with_minimal_jdk();
    let user_class = register_user(&mut store);
    let (_env, factory) = factory_for(store);
    let metadata = factory.metadata_for(user_class).unwrap();

    let err = rename(&metadata, &mut String::new()).unwrap_err();
    assert!(matches!(
        err,
        ReflectError::Invocation(InvokeError::TargetMismatch { .. })
    ));
    assert!(err.to_string().starts_with("invocation failed: target is not an instance of"));
}
