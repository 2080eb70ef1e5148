use catalog_core::db::open_db_in_memory;
use catalog_core::{
    AuthorCriteria, AuthorOrderField, AuthorService, EntityKind, FieldErrorKind, Ordering,
    PageRequest, RepoError, SqliteCatalogStore,
};

fn field_errors(err: RepoError) -> Vec<FieldErrorKind> {
    match err {
        RepoError::Validation(errors) => {
            let kinds: Vec<FieldErrorKind> = errors.for_field("name").cloned().collect();
            kinds
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn create_author_stores_normalized_name() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthorService::new(SqliteCatalogStore::try_new(&conn).unwrap());

    let author = service.create_author("  George   R.  Martin  ").unwrap();
    assert_eq!(author.name, "George R. Martin");
    assert!(author.meta.created_at > 0);
    assert_eq!(author.meta.created_at, author.meta.updated_at);

    let loaded = service.get_author(author.id()).unwrap().unwrap();
    assert_eq!(loaded, author);
}

#[test]
fn create_existing_author_fails_with_duplicate() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthorService::new(SqliteCatalogStore::try_new(&conn).unwrap());
    service.create_author("William Shakespeare").unwrap();

    let err = service.create_author(" William  Shakespeare ").unwrap_err();
    assert_eq!(
        field_errors(err),
        vec![FieldErrorKind::DuplicateEntity {
            entity: EntityKind::Author,
            value: "William Shakespeare".to_string()
        }]
    );
}

#[test]
fn create_author_with_blank_name_fails() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthorService::new(SqliteCatalogStore::try_new(&conn).unwrap());

    for blank in ["", "   ", "\t\n"] {
        let err = service.create_author(blank).unwrap_err();
        assert_eq!(field_errors(err), vec![FieldErrorKind::BlankValue]);
    }

    let page = service
        .list_authors(
            &AuthorCriteria::default(),
            Ordering::default(),
            PageRequest::default(),
        )
        .unwrap();
    assert_eq!(page.total, 0);
}

#[test]
fn create_author_over_length_limit_fails() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthorService::new(SqliteCatalogStore::try_new(&conn).unwrap());

    let err = service.create_author(&"x".repeat(101)).unwrap_err();
    assert!(matches!(
        field_errors(err).as_slice(),
        [FieldErrorKind::TooLong { max: 100, .. }]
    ));
    assert!(service.create_author(&"x".repeat(100)).is_ok());
}

#[test]
fn list_authors_filters_by_name_ignoring_case_and_orders() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthorService::new(SqliteCatalogStore::try_new(&conn).unwrap());
    for name in ["William Shakespeare", "William Faulkner", "Jane Austen"] {
        service.create_author(name).unwrap();
    }

    let page = service
        .list_authors(
            &AuthorCriteria::name("WILLIAM"),
            Ordering::default(),
            PageRequest::default(),
        )
        .unwrap();
    let names: Vec<_> = page.items.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["William Faulkner", "William Shakespeare"]);
    assert_eq!(page.total, 2);

    let descending = service
        .list_authors(
            &AuthorCriteria::default(),
            Ordering::desc(AuthorOrderField::Name),
            PageRequest::default(),
        )
        .unwrap();
    assert_eq!(descending.items[0].name, "William Shakespeare");

    let none = service
        .list_authors(
            &AuthorCriteria::name("tolkien"),
            Ordering::default(),
            PageRequest::default(),
        )
        .unwrap();
    assert!(none.items.is_empty());
}

#[test]
fn list_authors_pages_with_stable_total() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthorService::new(SqliteCatalogStore::try_new(&conn).unwrap());
    for index in 0..12 {
        service.create_author(&format!("Author {index:02}")).unwrap();
    }

    let second = service
        .list_authors(
            &AuthorCriteria::default(),
            Ordering::default(),
            PageRequest::page(2, None),
        )
        .unwrap();
    assert_eq!(second.total, 12);
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.items[0].name, "Author 10");
}

#[test]
fn name_filter_folds_non_ascii_case() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthorService::new(SqliteCatalogStore::try_new(&conn).unwrap());
    service.create_author("Émile Zola").unwrap();

    let page = service
        .list_authors(
            &AuthorCriteria::name("émile"),
            Ordering::default(),
            PageRequest::default(),
        )
        .unwrap();
    assert_eq!(page.items.len(), 1);
}
