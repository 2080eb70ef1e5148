use catalog_core::db::open_db_in_memory;
use catalog_core::{
    AuthorService, Book, BookCriteria, BookDraft, BookOrderField, BookRepository, BookService,
    FilterError, FilterQuery, Ordering, PageRequest, Predicate, SqliteCatalogStore,
};
use rusqlite::Connection;

fn seed(conn: &Connection) {
    let store = SqliteCatalogStore::try_new(conn).unwrap();
    let authors = AuthorService::new(store);
    let books = BookService::new(store);

    let shakespeare = authors.create_author("William Shakespeare").unwrap();
    let austen = authors.create_author("Jane Austen").unwrap();
    let fletcher = authors.create_author("John Fletcher").unwrap();

    books
        .create_book(&BookDraft::new("Hamlet", 1, 1603).with_authors([shakespeare.id()]))
        .unwrap();
    books
        .create_book(&BookDraft::new("Macbeth", 2, 1623).with_authors([shakespeare.id()]))
        .unwrap();
    books
        .create_book(
            &BookDraft::new("The Two Noble Kinsmen", 1, 1634)
                .with_authors([shakespeare.id(), fletcher.id()]),
        )
        .unwrap();
    books
        .create_book(&BookDraft::new("Emma", 1, 1815).with_authors([austen.id()]))
        .unwrap();
}

fn names(books: &[Book]) -> Vec<&str> {
    books.iter().map(|book| book.name.as_str()).collect()
}

fn list(conn: &Connection, criteria: &BookCriteria) -> Vec<Book> {
    let books = BookService::new(SqliteCatalogStore::try_new(conn).unwrap());
    books
        .list_books(criteria, Ordering::default(), PageRequest::default())
        .unwrap()
        .items
}

#[test]
fn empty_criteria_returns_everything_by_name() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);

    let all = list(&conn, &BookCriteria::default());
    assert_eq!(
        names(&all),
        vec!["Emma", "Hamlet", "Macbeth", "The Two Noble Kinsmen"]
    );
}

#[test]
fn empty_conjunction_lists_every_book() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let store = SqliteCatalogStore::try_new(&conn).unwrap();
    let query: FilterQuery<BookOrderField> =
        FilterQuery::new(Predicate::And(vec![]), Ordering::default());

    let books = store.list_books(&query, &PageRequest::default()).unwrap();
    assert_eq!(books.len(), 4);
    assert_eq!(store.count_books(&query).unwrap(), 4);
}

#[test]
fn edition_filter_matches_exactly() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);

    let criteria = BookCriteria::from_pairs([("edition", "1")]).unwrap();
    assert_eq!(
        names(&list(&conn, &criteria)),
        vec!["Emma", "Hamlet", "The Two Noble Kinsmen"]
    );
}

#[test]
fn author_filter_is_case_insensitive_substring() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);

    let criteria = BookCriteria::from_pairs([("author", "shake")]).unwrap();
    let found = list(&conn, &criteria);
    assert_eq!(
        names(&found),
        vec!["Hamlet", "Macbeth", "The Two Noble Kinsmen"]
    );

    // Co-authored books appear once with every author expanded.
    let kinsmen = &found[2];
    let authors: Vec<_> = kinsmen.authors.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(authors, vec!["John Fletcher", "William Shakespeare"]);
}

#[test]
fn combined_criteria_are_conjunctive() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);

    let criteria = BookCriteria::from_pairs([
        ("name", "HAM"),
        ("author", "william"),
        ("edition", "1"),
        ("publication_year", "1603"),
    ])
    .unwrap();
    assert_eq!(names(&list(&conn, &criteria)), vec!["Hamlet"]);

    let mismatched = BookCriteria::from_pairs([("name", "hamlet"), ("edition", "2")]).unwrap();
    assert!(list(&conn, &mismatched).is_empty());
}

#[test]
fn blank_values_and_unknown_keys_add_no_constraint() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);

    let criteria =
        BookCriteria::from_pairs([("name", "  "), ("edition", ""), ("genre", "drama")]).unwrap();
    assert_eq!(list(&conn, &criteria).len(), 4);
}

#[test]
fn non_integer_edition_is_rejected() {
    let err = BookCriteria::from_pairs([("edition", "first")]).unwrap_err();
    assert!(matches!(err, FilterError::InvalidValue { .. }));
}

#[test]
fn ordering_and_paging_are_applied() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let books = BookService::new(SqliteCatalogStore::try_new(&conn).unwrap());

    let newest_first = books
        .list_books(
            &BookCriteria::default(),
            Ordering::<BookOrderField>::parse("-publication_year").unwrap(),
            PageRequest::page(1, Some(2)),
        )
        .unwrap();
    assert_eq!(newest_first.total, 4);
    assert_eq!(names(&newest_first.items), vec!["Emma", "The Two Noble Kinsmen"]);

    let second_page = books
        .list_books(
            &BookCriteria::default(),
            Ordering::desc(BookOrderField::PublicationYear),
            PageRequest::page(2, Some(2)),
        )
        .unwrap();
    assert_eq!(names(&second_page.items), vec!["Macbeth", "Hamlet"]);
}

#[test]
fn unknown_ordering_key_is_rejected() {
    let err = Ordering::<BookOrderField>::parse("-rating").unwrap_err();
    assert_eq!(err, FilterError::UnknownOrdering("-rating".to_string()));
}
