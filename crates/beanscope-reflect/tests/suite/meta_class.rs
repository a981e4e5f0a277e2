use std::sync::Arc;

use beanscope_reflect::{MetaClass, MetadataFactory, PathStep, ReflectError};
use beanscope_types::{ClassDef, ClassId, ClassKind, FieldDef, Type, TypeEnv, TypeStore};

use pretty_assertions::assert_eq;

use super::fixtures::{bean, factory_for, getter, string};

/// ```java
/// class Address { String city; String zipCode; }
/// class Customer { String name; Address address; }
/// class Item { String sku; int quantity; }
/// class ItemList extends ArrayList<Item> {}
/// class Order {
///     String id; Customer customer; List<Item> items; Item[] featured; ItemList backorders;
///     List legacy; Map<String, Item> getItemsBySku();
/// }
/// class Account { List<Order> orders; }
/// ```
struct Shop {
    env: Arc<TypeStore>,
    factory: Arc<dyn MetadataFactory>,
    account: ClassId,
    order: ClassId,
}

impl Shop {
    fn new() -> Self {
        let mut store = TypeStore::with_minimal_jdk();
        let wk = store.well_known().clone();
        let string = string(&store);

        let mut address = bean(&store, "com.example.Address");
        address.fields = vec![
            FieldDef::new("city", string.clone()),
            FieldDef::new("zipCode", string.clone()),
        ];
        let address = store.add_class(address);

        let mut customer = bean(&store, "com.example.Customer");
        customer.fields = vec![
            FieldDef::new("name", string.clone()),
            FieldDef::new("address", Type::Class(address)),
        ];
        let customer = store.add_class(customer);

        let mut item = bean(&store, "com.example.Item");
        item.fields = vec![
            FieldDef::new("sku", string.clone()),
            FieldDef::new("quantity", Type::int()),
        ];
        let item = store.add_class(item);

        let mut item_list = ClassDef::new("com.example.ItemList", ClassKind::Class);
        item_list.super_class = Some(Type::parameterized(
            wk.array_list,
            vec![Type::Class(item)],
        ));
        let item_list = store.add_class(item_list);

        let mut order = bean(&store, "com.example.Order");
        order.fields = vec![
            FieldDef::new("id", string.clone()),
            FieldDef::new("customer", Type::Class(customer)),
            FieldDef::new(
                "items",
                Type::parameterized(wk.list, vec![Type::Class(item)]),
            ),
            FieldDef::new("featured", Type::array(Type::Class(item))),
            FieldDef::new("backorders", Type::Class(item_list)),
            FieldDef::new("legacy", Type::Class(wk.list)),
        ];
        order.methods = vec![getter(
            "getItemsBySku",
            Type::parameterized(wk.map, vec![string, Type::Class(item)]),
        )];
        let order = store.add_class(order);

        let mut account = bean(&store, "com.example.Account");
        account.fields = vec![FieldDef::new(
            "orders",
            Type::parameterized(wk.list, vec![Type::Class(order)]),
        )];
        let account = store.add_class(account);

        let (env, factory) = factory_for(store);
        Self {
            env,
            factory,
            account,
            order,
        }
    }

    fn meta(&self, class: ClassId) -> MetaClass {
        MetaClass::for_class(class, Arc::clone(&self.factory)).unwrap()
    }

    fn class(&self, name: &str) -> Type {
        Type::Class(self.env.lookup_class(name).unwrap())
    }
}

#[test]
fn path_tokenizes_into_steps() {
    let first = PathStep::parse("orders[0].items[1].sku");
    let steps: Vec<_> = first
        .steps()
        .map(|step| {
            (
                step.name().to_string(),
                step.indexed_name().to_string(),
                step.index().map(str::to_string),
                step.children().map(str::to_string),
            )
        })
        .collect();
    assert_eq!(
        steps,
        vec![
            (
                "orders".to_string(),
                "orders[0]".to_string(),
                Some("0".to_string()),
                Some("items[1].sku".to_string()),
            ),
            (
                "items".to_string(),
                "items[1]".to_string(),
                Some("1".to_string()),
                Some("sku".to_string()),
            ),
            ("sku".to_string(), "sku".to_string(), None, None),
        ]
    );
}

#[test]
fn getter_types_follow_collection_elements() {
    let shop = Shop::new();
    let account = shop.meta(shop.account);
    let wk = shop.env.well_known().clone();

    assert_eq!(
        account.getter_type("orders[0].items[1].sku").unwrap(),
        Type::Class(wk.string)
    );
    assert_eq!(
        account.getter_type("orders").unwrap(),
        Type::Class(wk.list)
    );
    assert_eq!(
        account.getter_type("orders[0]").unwrap(),
        shop.class("com.example.Order")
    );
    assert_eq!(
        account
            .getter_type("orders[0].itemsBySku[abc].quantity")
            .unwrap(),
        Type::int()
    );
    assert_eq!(
        account.getter_type("orders[0].featured[2]").unwrap(),
        shop.class("com.example.Item")
    );
    assert_eq!(
        account.getter_type("orders[0].backorders[0].sku").unwrap(),
        Type::Class(wk.string)
    );
    assert_eq!(
        account.getter_type("orders[0].legacy[0]").unwrap(),
        shop.env.object_type()
    );
}

#[test]
fn setter_types_resolve_the_last_segment() {
    let shop = Shop::new();
    let account = shop.meta(shop.account);

    assert_eq!(
        account.setter_type("orders[0].customer.address").unwrap(),
        shop.class("com.example.Address")
    );
    assert_eq!(
        account.setter_type("orders[0].items[0]").unwrap(),
        shop.class("com.example.Item")
    );
    assert!(matches!(
        account.setter_type("orders[0].itemsBySku"),
        Err(ReflectError::MissingAccessor { .. })
    ));
}

#[test]
fn has_getter_and_setter_check_every_segment() {
    let shop = Shop::new();
    let account = shop.meta(shop.account);

    assert!(account.has_getter("orders[0].customer.address.city"));
    assert!(account.has_setter("orders[0].customer.address.city"));
    assert!(!account.has_getter("orders[0].customer.nope"));
    assert!(!account.has_getter("nope.customer"));
    // `itemsBySku` only has a getter.
    assert!(account.has_getter("orders[0].itemsBySku"));
    assert!(!account.has_setter("orders[0].itemsBySku"));
    assert!(account.has_setter("orders[0].itemsBySku[a].sku"));
}

#[test]
fn find_property_normalizes_case_and_underscores() {
    let shop = Shop::new();
    let account = shop.meta(shop.account);
    let order = shop.meta(shop.order);

    assert_eq!(
        order.find_property("CUSTOMER.Address.city", false),
        Some("customer.address.city".to_string())
    );
    assert_eq!(
        account.find_property("Orders[0].customer.address.zip_code", true),
        Some("orders.customer.address.zipCode".to_string())
    );
    assert_eq!(order.find_property("customer.address.zip_code", false), None);
    assert_eq!(account.find_property("orders[0].nope", false), None);
    // Without an index the segment stays on the collection type itself.
    assert_eq!(account.find_property("orders.customer", false), None);
}

#[test]
fn meta_class_for_property_and_delegates() {
    let shop = Shop::new();
    let order = shop.meta(shop.order);

    let customer = order.meta_class_for_property("customer").unwrap();
    assert_eq!(customer.getter_names(), vec!["name", "address"]);
    assert_eq!(customer.setter_names(), vec!["name", "address"]);
    assert!(!customer.has_default_constructor());
    assert_eq!(
        customer.get_invoker("name").unwrap().declared_type(),
        &shop.class("java.lang.String")
    );
    assert!(customer.set_invoker("address").is_ok());

    assert_eq!(order.metadata().class(), shop.order);
    assert!(matches!(
        order.meta_class_for_property("nope"),
        Err(ReflectError::MissingAccessor { .. })
    ));
}

#[test]
fn navigating_through_non_class_types_fails() {
    let shop = Shop::new();
    let order = shop.meta(shop.order);

    assert!(matches!(
        order.getter_type("featured.sku"),
        Err(ReflectError::UnknownClass { .. })
    ));
    // `String` is registered but has no properties.
    assert!(matches!(
        order.getter_type("id.length"),
        Err(ReflectError::MissingAccessor { .. })
    ));
}
