use calorie_core::{
    EntityRef, MealIngredient, MealIngredientRepository, MealRepository, NewIngredient, NewMeal,
    NewUser, IngredientRepository, RepoError, Store, User, UserRepository, ValidationError,
};

fn setup_with_users(names: &[&str]) -> (Store, Vec<User>) {
    let mut store = Store::open_in_memory().unwrap();
    let uow = store.begin().unwrap();
    let users = names
        .iter()
        .map(|name| uow.create_user(&NewUser::new(*name)).unwrap())
        .collect();
    uow.commit().unwrap();
    (store, users)
}

#[test]
fn create_meal_for_existing_user() {
    let (mut store, users) = setup_with_users(&["Username1"]);

    let uow = store.begin().unwrap();
    let meal = uow
        .create_meal(&NewMeal::new(users[0].id, "Meal1").with_description("Description"))
        .unwrap();
    uow.commit().unwrap();

    let loaded = store.meals().get_meal(meal.id).unwrap().unwrap();
    assert_eq!(loaded, meal);
    assert_eq!(loaded.user_id, users[0].id);
    assert_eq!(loaded.description.as_deref(), Some("Description"));
    assert_eq!(store.meals().count_meals().unwrap(), 1);
}

#[test]
fn create_meal_for_missing_user_fails_with_referential_integrity() {
    let (mut store, _) = setup_with_users(&[]);

    let uow = store.begin().unwrap();
    let err = uow.create_meal(&NewMeal::new(99, "Orphan")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::ReferentialIntegrity(EntityRef::User(99))
    ));
    drop(uow);

    assert_eq!(store.meals().count_meals().unwrap(), 0);
}

#[test]
fn meals_are_listed_per_user_in_insertion_order() {
    let (mut store, users) = setup_with_users(&["Alice", "Bob"]);

    let uow = store.begin().unwrap();
    let breakfast = uow.create_meal(&NewMeal::new(users[0].id, "Breakfast")).unwrap();
    let lunch = uow.create_meal(&NewMeal::new(users[1].id, "Lunch")).unwrap();
    let dinner = uow.create_meal(&NewMeal::new(users[0].id, "Dinner")).unwrap();
    uow.commit().unwrap();

    let alice_meals = store.meals().list_meals_for_user(users[0].id).unwrap();
    assert_eq!(alice_meals, vec![breakfast.clone(), dinner.clone()]);
    assert_eq!(store.meals().list_meals().unwrap(), vec![breakfast, lunch, dinner]);
    assert!(store.meals().list_meals_for_user(777).unwrap().is_empty());
}

#[test]
fn find_meal_by_name_returns_first_match() {
    let (mut store, users) = setup_with_users(&["Alice", "Bob"]);

    let uow = store.begin().unwrap();
    let first = uow.create_meal(&NewMeal::new(users[1].id, "Breakfast")).unwrap();
    uow.create_meal(&NewMeal::new(users[0].id, "Breakfast")).unwrap();
    uow.commit().unwrap();

    let found = store.meals().find_meal_by_name("Breakfast").unwrap().unwrap();
    assert_eq!(found.id, first.id);
    assert!(store.meals().find_meal_by_name("Brunch").unwrap().is_none());
}

#[test]
fn update_meal_fields_and_owner() {
    let (mut store, users) = setup_with_users(&["Alice", "Bob"]);

    let uow = store.begin().unwrap();
    let mut meal = uow.create_meal(&NewMeal::new(users[0].id, "Snack")).unwrap();
    meal.name = "Late snack".to_string();
    meal.description = Some("Crackers".to_string());
    meal.user_id = users[1].id;
    uow.update_meal(&meal).unwrap();
    uow.commit().unwrap();

    let loaded = store.meals().get_meal(meal.id).unwrap().unwrap();
    assert_eq!(loaded.name, "Late snack");
    assert_eq!(loaded.description.as_deref(), Some("Crackers"));
    assert_eq!(loaded.user_id, users[1].id);
}

#[test]
fn moving_meal_to_missing_user_fails() {
    let (mut store, users) = setup_with_users(&["Alice"]);

    let meal = {
        let uow = store.begin().unwrap();
        let meal = uow.create_meal(&NewMeal::new(users[0].id, "Snack")).unwrap();
        uow.commit().unwrap();
        meal
    };

    let uow = store.begin().unwrap();
    let mut moved = meal.clone();
    moved.user_id = 404;
    let err = uow.update_meal(&moved).unwrap_err();
    assert!(matches!(
        err,
        RepoError::ReferentialIntegrity(EntityRef::User(404))
    ));
    drop(uow);

    assert_eq!(store.meals().get_meal(meal.id).unwrap(), Some(meal));
}

#[test]
fn meal_validation_rejects_long_fields() {
    let (mut store, users) = setup_with_users(&["Alice"]);
    let uow = store.begin().unwrap();

    let long_name = uow
        .create_meal(&NewMeal::new(users[0].id, "x".repeat(51)))
        .unwrap_err();
    assert!(matches!(
        long_name,
        RepoError::Validation(ValidationError::TooLong {
            field: "meal.name",
            ..
        })
    ));

    let long_description = uow
        .create_meal(&NewMeal::new(users[0].id, "Fine").with_description("d".repeat(256)))
        .unwrap_err();
    assert!(matches!(
        long_description,
        RepoError::Validation(ValidationError::TooLong {
            field: "meal.description",
            max_chars: 255,
            actual_chars: 256,
        })
    ));
}

#[test]
fn deleting_user_cascades_to_meals_and_links() {
    let (mut store, users) = setup_with_users(&["Alice", "Bob"]);

    let uow = store.begin().unwrap();
    let alice_meal = uow.create_meal(&NewMeal::new(users[0].id, "Breakfast")).unwrap();
    let bob_meal = uow.create_meal(&NewMeal::new(users[1].id, "Dinner")).unwrap();
    let egg = uow
        .create_ingredient(&NewIngredient::new("Egg", 60.0, 80.0))
        .unwrap();
    uow.link_ingredient(&MealIngredient::new(alice_meal.id, egg.id, 2.0))
        .unwrap();
    uow.link_ingredient(&MealIngredient::new(bob_meal.id, egg.id, 1.0))
        .unwrap();
    uow.commit().unwrap();

    let uow = store.begin().unwrap();
    uow.delete_user(users[0].id).unwrap();
    uow.commit().unwrap();

    assert!(store.meals().get_meal(alice_meal.id).unwrap().is_none());
    assert!(store
        .meal_ingredients()
        .list_meal_ingredients(alice_meal.id)
        .unwrap()
        .is_empty());
    assert_eq!(store.meals().list_meals().unwrap(), vec![bob_meal.clone()]);
    assert_eq!(store.meal_ingredients().count_meal_ingredients().unwrap(), 1);
    assert!(store.ingredients().get_ingredient(egg.id).unwrap().is_some());
}

#[test]
fn delete_meal_reduces_count_and_missing_meal_is_not_found() {
    let (mut store, users) = setup_with_users(&["Alice"]);

    let uow = store.begin().unwrap();
    let meal = uow.create_meal(&NewMeal::new(users[0].id, "Breakfast")).unwrap();
    uow.create_meal(&NewMeal::new(users[0].id, "Dinner")).unwrap();
    uow.delete_meal(meal.id).unwrap();
    uow.commit().unwrap();

    assert_eq!(store.meals().count_meals().unwrap(), 1);
    assert!(store.meals().get_meal(meal.id).unwrap().is_none());

    let uow = store.begin().unwrap();
    let err = uow.delete_meal(meal.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(EntityRef::Meal(id)) if id == meal.id));
}
