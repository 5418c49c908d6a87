use calorie_core::{
    DbConfig, NewIngredient, NewUser, RepoError, Store, UserRepository, IngredientRepository,
};

#[test]
fn committed_writes_become_visible_together() {
    let mut store = Store::open_in_memory().unwrap();

    let uow = store.begin().unwrap();
    uow.create_user(&NewUser::new("Alice")).unwrap();
    uow.create_ingredient(&NewIngredient::new("Egg", 60.0, 80.0))
        .unwrap();
    assert_eq!(uow.count_users().unwrap(), 1);
    assert!(!uow.is_poisoned());
    uow.commit().unwrap();

    assert_eq!(store.users().count_users().unwrap(), 1);
    assert_eq!(store.ingredients().count_ingredients().unwrap(), 1);
}

#[test]
fn explicit_rollback_discards_writes() {
    let mut store = Store::open_in_memory().unwrap();

    let uow = store.begin().unwrap();
    uow.create_user(&NewUser::new("Alice")).unwrap();
    uow.rollback().unwrap();

    assert_eq!(store.users().count_users().unwrap(), 0);
}

#[test]
fn dropping_without_commit_rolls_back() {
    let mut store = Store::open_in_memory().unwrap();

    {
        let uow = store.begin().unwrap();
        uow.create_user(&NewUser::new("Alice")).unwrap();
    }

    assert_eq!(store.users().count_users().unwrap(), 0);
}

#[test]
fn failed_write_poisons_unit_and_commit_undoes_earlier_writes() {
    let mut store = Store::open_in_memory().unwrap();

    let uow = store.begin().unwrap();
    uow.create_ingredient(&NewIngredient::new("Egg", 60.0, 80.0))
        .unwrap();
    uow.create_user(&NewUser::new("Alice")).unwrap();
    let err = uow.create_user(&NewUser::new("Alice")).unwrap_err();
    assert!(matches!(err, RepoError::Uniqueness { .. }));
    assert!(uow.is_poisoned());

    // Later writes still run against the transaction but cannot be committed.
    uow.create_user(&NewUser::new("Bob")).unwrap();
    assert!(matches!(uow.commit(), Err(RepoError::UnitAborted)));

    assert_eq!(store.users().count_users().unwrap(), 0);
    assert_eq!(store.ingredients().count_ingredients().unwrap(), 0);
}

#[test]
fn failed_reads_do_not_poison_unit() {
    let mut store = Store::open_in_memory().unwrap();

    let uow = store.begin().unwrap();
    assert!(uow.get_user(42).unwrap().is_none());
    assert!(uow.find_user_by_name("nobody").unwrap().is_none());
    assert!(!uow.is_poisoned());
    uow.create_user(&NewUser::new("Alice")).unwrap();
    uow.commit().unwrap();

    assert_eq!(store.users().count_users().unwrap(), 1);
}

#[test]
fn uncommitted_writes_are_invisible_to_other_connections() {
    let dir = tempfile::tempdir().unwrap();
    let config = DbConfig::file(dir.path().join("tracker.sqlite3"));
    let mut writer = Store::open(&config).unwrap();
    let reader = Store::open(&config).unwrap();

    let uow = writer.begin().unwrap();
    uow.create_user(&NewUser::new("Alice")).unwrap();
    assert_eq!(reader.users().count_users().unwrap(), 0);
    uow.commit().unwrap();

    assert_eq!(reader.users().count_users().unwrap(), 1);
}

#[test]
fn store_accessor_writes_commit_on_their_own() {
    let store = Store::open_in_memory().unwrap();

    store.users().create_user(&NewUser::new("Alice")).unwrap();
    let err = store.users().create_user(&NewUser::new("Alice")).unwrap_err();
    assert!(matches!(err, RepoError::Uniqueness { .. }));

    assert_eq!(store.users().count_users().unwrap(), 1);
}
