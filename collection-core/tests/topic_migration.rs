//! Integration tests for the Topic to Collection migration.
//!
//! Each test builds a small content tree, runs the batch walk and checks the
//! Collections it leaves behind.

use collection_core::content::{ContentItem, Metadata, TopicObject};
use collection_core::criteria::{types, LegacyCriterion};
use collection_core::diagnostics::codes;
use collection_core::{
    migrate_topics, query_digest, CollectionObject, ContentStore, FileContentStore, FixedClock,
    InMemoryContentStore, Level, MigrationConfig, OperationCatalog, QuerystringRegistry,
    RegistryManifest,
};
use serde_json::json;

const NOW: &str = "2013-03-28T14:30:00+01:00";

fn clock() -> FixedClock {
    FixedClock::parse(NOW).expect("valid timestamp")
}

fn registry() -> QuerystringRegistry {
    QuerystringRegistry::standard().expect("standard registry loads")
}

fn topic(path: &str) -> TopicObject {
    TopicObject::new(path, Metadata::new("topic").with_title("Topic"))
}

fn migrate_one(topic: TopicObject) -> (CollectionObject, collection_core::MigrationReport) {
    let path = topic.path.clone();
    let store = InMemoryContentStore::from_items([ContentItem::from(topic)]);
    let report = migrate_topics(&store, &registry(), &MigrationConfig::default(), &clock())
        .expect("migration succeeds");
    match store.get(&path).expect("object still there") {
        ContentItem::Collection(collection) => (collection, report),
        other => panic!("expected a Collection, got {:?}", other),
    }
}

#[test]
fn test_unknown_field_yields_no_rows_for_every_type() {
    let criteria = [
        LegacyCriterion::new(types::SIMPLE_STRING, "nope").with_value(json!("x")),
        LegacyCriterion::new(types::CURRENT_AUTHOR, "nope").with_value(json!("x")),
        LegacyCriterion::new(types::SELECTION, "nope").with_value(json!({"query": ["x"]})),
        LegacyCriterion::new(types::LIST, "nope").with_value(json!({"query": ["x"]})),
        LegacyCriterion::new(types::REFERENCE, "nope").with_value(json!({"query": ["x"]})),
        LegacyCriterion::new(types::PORTAL_TYPE, "nope").with_value(json!(["x"])),
        LegacyCriterion::new(types::PATH, "nope")
            .with_value(json!({"query": ["/x"]}))
            .with_raw_value(vec!["/x".to_string()]),
        LegacyCriterion::new(types::RELATIVE_PATH, "nope").with_value(json!({"query": ".."})),
        LegacyCriterion::new(types::DATE_RANGE, "nope").with_value(json!({"query": ["a", "b"]})),
        LegacyCriterion::new(types::BOOLEAN, "nope").with_value(json!([true])),
        LegacyCriterion::new(types::SIMPLE_INT, "nope").with_value(json!({"query": 1})),
        LegacyCriterion::new(types::DATE, "nope").with_date("more", 5, "+"),
    ];
    let count = criteria.len();
    let mut legacy = topic("/plone/t");
    for criterion in criteria {
        legacy = legacy.with_criterion(criterion);
    }

    let (collection, report) = migrate_one(legacy);
    assert!(collection.query.is_empty());

    let object = report.object("/plone/t").expect("reported");
    let unknown = object
        .diagnostics
        .iter()
        .filter(|d| d.code == codes::UNKNOWN_FIELD)
        .count();
    assert_eq!(unknown, count);
}

#[test]
fn test_legacy_type_name_never_survives() {
    let legacy = topic("/plone/t")
        .with_criterion(
            LegacyCriterion::new(types::SELECTION, "portal_type")
                .with_value(json!({"query": ["Topic", "Document"]})),
        )
        .with_criterion(
            LegacyCriterion::new(types::LIST, "Subject").with_value(json!({"query": ["Topic"]})),
        )
        .with_criterion(
            LegacyCriterion::new(types::PORTAL_TYPE, "portal_type").with_value(json!(["Topic"])),
        );

    let (collection, _) = migrate_one(legacy);
    assert_eq!(collection.query.len(), 3);
    for row in &collection.query {
        let values = row.value.as_ref().and_then(|v| v.as_array()).expect("list value");
        assert!(!values.contains(&json!("Topic")));
        assert!(values.contains(&json!("Collection")));
    }
}

#[test]
fn test_non_recursive_path_is_forced_recursive() {
    let build = |recurse: bool| {
        topic("/plone/t")
            .with_criterion(
                LegacyCriterion::new(types::PATH, "path")
                    .with_value(json!({"query": ["uid-1"]}))
                    .with_recurse(recurse)
                    .with_raw_value(vec!["uid-1".to_string()]),
            )
            .with_criterion(
                LegacyCriterion::new(types::RELATIVE_PATH, "path")
                    .with_value(json!({"query": "../sibling"}))
                    .with_recurse(recurse)
                    .with_relative_path("../sibling"),
            )
    };

    let (recursive, quiet) = migrate_one(build(true));
    let (forced, warned) = migrate_one(build(false));

    assert_eq!(recursive.query, forced.query);
    assert_eq!(quiet.count_at(Level::Warning), 0);
    assert_eq!(warned.count_at(Level::Warning), 2);
}

#[test]
fn test_boolean_picks_exactly_one_operation() {
    let legacy = topic("/plone/t")
        .with_criterion(LegacyCriterion::new(types::BOOLEAN, "is_folderish").with_value(json!([])))
        .with_criterion(
            LegacyCriterion::new(types::BOOLEAN, "is_default_page").with_value(json!([false, 0])),
        );

    let (collection, report) = migrate_one(legacy);
    let operations: Vec<_> = collection.query.iter().map(|r| r.operation_code()).collect();
    assert_eq!(operations, vec!["boolean.isTrue", "boolean.isFalse"]);
    assert_eq!(collection.query[0].index, "isFolderish");
    assert_eq!(report.count_at(Level::Warning), 1);
}

#[test]
fn test_within_day_window_spans_the_target_day() {
    let legacy = topic("/plone/t")
        .with_criterion(LegacyCriterion::new(types::DATE, "created").with_date("within_day", 3, "-"));

    let (collection, _) = migrate_one(legacy);
    assert_eq!(collection.query.len(), 1);
    assert_eq!(collection.query[0].operation_code(), "date.between");

    let window = collection.query[0].value.as_ref().unwrap().as_array().unwrap();
    let start = chrono::DateTime::parse_from_rfc3339(window[0].as_str().unwrap()).unwrap();
    let end = chrono::DateTime::parse_from_rfc3339(window[1].as_str().unwrap()).unwrap();
    assert_eq!(start.to_rfc3339(), "2013-03-25T00:00:00+01:00");
    assert_eq!((end - start).num_seconds(), 24 * 60 * 60 - 1);
}

#[test]
fn test_within_day_today() {
    let legacy = topic("/plone/t")
        .with_criterion(LegacyCriterion::new(types::DATE, "created").with_date("within_day", 0, "+"));
    let (collection, _) = migrate_one(legacy);
    assert_eq!(collection.query[0].operation_code(), "date.today");
    assert_eq!(collection.query[0].value, None);
}

#[test]
fn test_more_five_days() {
    let legacy = topic("/plone/t")
        .with_criterion(LegacyCriterion::new(types::DATE, "expires").with_date("more", 5, "+"));
    let (collection, _) = migrate_one(legacy);
    assert_eq!(collection.query.len(), 1);
    assert_eq!(
        collection.query[0].operation_code(),
        "date.largerThanRelativeDate"
    );
    assert_eq!(collection.query[0].value, Some(json!(5)));
}

#[test]
fn test_integer_min_max_is_dropped_with_warning() {
    let legacy = topic("/plone/t").with_criterion(
        LegacyCriterion::new(types::SIMPLE_INT, "getObjPositionInParent")
            .with_value(json!({"query": [1, 4], "range": "min:max"})),
    );
    let (collection, report) = migrate_one(legacy);
    assert!(collection.query.is_empty());

    let object = report.object("/plone/t").unwrap();
    assert!(object
        .diagnostics
        .iter()
        .any(|d| d.level == Level::Warning && d.code == codes::INT_RANGE_UNSUPPORTED));
}

#[test]
fn test_sort_criterion_only_sets_sort() {
    let legacy = topic("/plone/t")
        .with_criterion(LegacyCriterion::new(types::SORT, "sortable_title"))
        .with_criterion(
            LegacyCriterion::new(types::SIMPLE_STRING, "SearchableText").with_value(json!("x")),
        );
    let (collection, _) = migrate_one(legacy);

    assert_eq!(collection.sort_on.as_deref(), Some("sortable_title"));
    assert!(!collection.sort_reversed);
    assert_eq!(collection.query.len(), 1);
    assert!(collection.query.iter().all(|r| r.index != "sortable_title"));
}

#[test]
fn test_unsupported_type_halts_without_partial_state() {
    let store = InMemoryContentStore::from_items([
        ContentItem::from(topic("/plone/a").with_criterion(
            LegacyCriterion::new(types::SIMPLE_STRING, "Title").with_value(json!("a")),
        )),
        ContentItem::from(
            topic("/plone/b").with_criterion(LegacyCriterion::new("ATFancyCriterion", "Title")),
        ),
        ContentItem::from(topic("/plone/c")),
    ]);

    let err = migrate_topics(&store, &registry(), &MigrationConfig::default(), &clock())
        .unwrap_err();
    assert_eq!(err.error_code(), "UNSUPPORTED_CRITERION");

    // Walk order is path order: a is done, b is untouched, c was never reached
    assert_eq!(store.get("/plone/a").unwrap().portal_type(), "Collection");
    assert_eq!(store.get("/plone/b").unwrap().portal_type(), "Topic");
    assert_eq!(store.get("/plone/c").unwrap().portal_type(), "Topic");
}

#[test]
fn test_unresolvable_date_operation_aborts_the_walk() {
    let catalog = OperationCatalog::standard()
        .without_implementation("plone.app.querystring.queryparser._beforeToday");
    let registry = QuerystringRegistry::load(&RegistryManifest::standard(), &catalog).unwrap();
    let store = InMemoryContentStore::from_items([ContentItem::from(
        topic("/plone/t")
            .with_criterion(LegacyCriterion::new(types::DATE, "created").with_date("less", 0, "-")),
    )]);

    let err = migrate_topics(&store, &registry, &MigrationConfig::default(), &clock()).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_DATE_OPERATION");
    assert!(err.is_fatal());
    assert_eq!(store.get("/plone/t").unwrap().portal_type(), "Topic");
}

#[test]
fn test_out_of_range_date_offset_aborts_the_walk() {
    let store = InMemoryContentStore::from_items([ContentItem::from(
        topic("/plone/t").with_criterion(
            LegacyCriterion::new(types::DATE, "created").with_date("more", i64::MIN, "-"),
        ),
    )]);

    let err = migrate_topics(&store, &registry(), &MigrationConfig::default(), &clock())
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_DATE_OPERATION");
    assert_eq!(store.get("/plone/t").unwrap().portal_type(), "Topic");
}

#[test]
fn test_second_run_finds_nothing() {
    let store = InMemoryContentStore::from_items([ContentItem::from(topic("/plone/t"))]);
    let config = MigrationConfig::default();

    let first = migrate_topics(&store, &registry(), &config, &clock()).unwrap();
    let second = migrate_topics(&store, &registry(), &config, &clock()).unwrap();

    assert_eq!(first.migrated.len(), 1);
    assert!(second.migrated.is_empty());
    assert_ne!(first.run_id, second.run_id);
}

#[test]
fn test_file_store_round_trip() {
    let dir = std::env::temp_dir().join("collection-test-topic-migration");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("content.json");
    std::fs::write(&path, include_str!("fixtures/topics.json")).unwrap();

    let store = FileContentStore::open(&path).unwrap();
    let report = migrate_topics(&store, &registry(), &MigrationConfig::default(), &clock()).unwrap();
    store.flush().unwrap();

    assert_eq!(report.migrated.len(), 2);
    let news = report.object("/plone/news/aggregator").unwrap();
    assert_eq!(news.rows, 3);
    assert!(news
        .diagnostics
        .iter()
        .any(|d| d.code == codes::SELECTION_AND_DEGRADED));

    let reopened = FileContentStore::open(&path).unwrap();
    assert_eq!(reopened.paths_by_type("Collection").unwrap().len(), 3);

    match reopened.get("/plone/news/aggregator").unwrap() {
        ContentItem::Collection(collection) => {
            assert_eq!(collection.metadata.title, "News");
            assert_eq!(collection.metadata.creator.as_deref(), Some("admin"));
            assert_eq!(collection.limit, 10);
            assert_eq!(collection.sort_on.as_deref(), Some("effective"));
            assert!(collection.sort_reversed);
            assert_eq!(collection.layout, "summary_view");
            assert_eq!(query_digest(&collection.query), news.query_digest);
        }
        other => panic!("expected a Collection, got {:?}", other),
    }

    match reopened.get("/plone/events/aggregator").unwrap() {
        ContentItem::Collection(collection) => {
            assert_eq!(collection.layout, "tabular_view");
            assert_eq!(collection.query[0].operation_code(), "date.afterToday");
            assert_eq!(collection.query[1].index, "isDefaultPage");
            assert_eq!(collection.query[1].operation_code(), "boolean.isFalse");
        }
        other => panic!("expected a Collection, got {:?}", other),
    }

    // Cleanup
    let _ = std::fs::remove_dir_all(&dir);
}
