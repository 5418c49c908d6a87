use calorie_core::{
    EntityRef, Ingredient, IngredientRepository, NewIngredient, RepoError, Store,
    ValidationError,
};

fn sample(num: &str) -> NewIngredient {
    NewIngredient::new(format!("Ingredient{num}"), 100.12, 200.0).with_macros(50.7, 20.4, 12.1)
}

fn create(store: &mut Store, ingredients: &[NewIngredient]) -> Vec<Ingredient> {
    let uow = store.begin().unwrap();
    let created = ingredients
        .iter()
        .map(|ingredient| uow.create_ingredient(ingredient).unwrap())
        .collect();
    uow.commit().unwrap();
    created
}

#[test]
fn create_and_get_roundtrip_preserves_all_fields() {
    let mut store = Store::open_in_memory().unwrap();
    let created = create(&mut store, &[sample("1")]).remove(0);

    let loaded = store.ingredients().get_ingredient(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.name, "Ingredient1");
    assert_eq!(loaded.reference_size, 100.12);
    assert_eq!(loaded.kcal, 200.0);
    assert_eq!(loaded.carbs, Some(50.7));
    assert_eq!(loaded.proteins, Some(20.4));
    assert_eq!(loaded.fats, Some(12.1));
}

#[test]
fn optional_nutrients_roundtrip_as_none() {
    let mut store = Store::open_in_memory().unwrap();
    let created = create(&mut store, &[NewIngredient::new("Lazy potato", 150.0, 110.0)]).remove(0);

    let loaded = store.ingredients().get_ingredient(created.id).unwrap().unwrap();
    assert_eq!(loaded.carbs, None);
    assert_eq!(loaded.proteins, None);
    assert_eq!(loaded.fats, None);
}

#[test]
fn find_by_name_and_list_in_insertion_order() {
    let mut store = Store::open_in_memory().unwrap();
    let mut second = sample("2");
    second.name = "I am second".to_string();
    let created = create(&mut store, &[sample("1"), second, sample("3")]);

    let found = store
        .ingredients()
        .find_ingredient_by_name("I am second")
        .unwrap()
        .unwrap();
    assert_eq!(found.id, created[1].id);
    assert_eq!(store.ingredients().list_ingredients().unwrap(), created);
    assert_eq!(store.ingredients().count_ingredients().unwrap(), 3);
}

#[test]
fn modify_kcal_is_visible_after_commit() {
    let mut store = Store::open_in_memory().unwrap();
    create(&mut store, &[sample("1")]);

    let uow = store.begin().unwrap();
    let mut ingredient = uow.list_ingredients().unwrap().remove(0);
    assert_eq!(ingredient.kcal, 200.0);
    ingredient.kcal = 350.0;
    uow.update_ingredient(&ingredient).unwrap();
    uow.commit().unwrap();

    let loaded = store.ingredients().list_ingredients().unwrap().remove(0);
    assert_eq!(loaded.kcal, 350.0);
}

#[test]
fn delete_reduces_count_and_read_returns_none() {
    let mut store = Store::open_in_memory().unwrap();
    let created = create(&mut store, &[sample("1"), sample("2")]);

    let uow = store.begin().unwrap();
    uow.delete_ingredient(created[0].id).unwrap();
    uow.commit().unwrap();

    assert_eq!(store.ingredients().count_ingredients().unwrap(), 1);
    assert!(store
        .ingredients()
        .get_ingredient(created[0].id)
        .unwrap()
        .is_none());
}

#[test]
fn invalid_quantities_are_rejected() {
    let mut store = Store::open_in_memory().unwrap();
    let uow = store.begin().unwrap();

    let nan = uow
        .create_ingredient(&NewIngredient::new("Mystery", f64::NAN, 10.0))
        .unwrap_err();
    assert!(matches!(
        nan,
        RepoError::Validation(ValidationError::NotFinite {
            field: "ingredient.ssize"
        })
    ));

    let mut negative = NewIngredient::new("Antimatter", 10.0, 10.0);
    negative.fats = Some(-1.0);
    let err = uow.create_ingredient(&negative).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::Negative {
            field: "ingredient.fats"
        })
    ));
}

#[test]
fn update_missing_ingredient_returns_not_found() {
    let mut store = Store::open_in_memory().unwrap();
    let uow = store.begin().unwrap();

    let ghost = Ingredient {
        id: 5,
        name: "Ghost".to_string(),
        reference_size: 1.0,
        kcal: 1.0,
        carbs: None,
        proteins: None,
        fats: None,
    };
    let err = uow.update_ingredient(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(EntityRef::Ingredient(5))));
}
