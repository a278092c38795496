//! Integration tests for the catalog over an on-disk redb store.
//!
//! These tests verify the end-to-end behavior of:
//! - Opening new and existing catalogs
//! - The add pipeline (validation, normalization, duplicates)
//! - Search by params, prefix search and grouped listings
//! - Likes/dislikes and ratings
//! - Validation rule management

use std::sync::Arc;
use std::thread;

use catalogdb::{
    Catalog, CatalogError, Config, Gender, NewRecord, NewValidationRule, RecordId, RulePurpose,
    SortOrder, SyncMode,
};
use tempfile::{tempdir, TempDir};

fn open_seeded() -> (Catalog, TempDir) {
    let dir = tempdir().unwrap();
    let catalog = Catalog::open(dir.path().join("catalog.db"), Config::default()).unwrap();
    catalog.seed_default_rules().unwrap();
    (catalog, dir)
}

fn add(catalog: &Catalog, names: &[&str]) -> Vec<RecordId> {
    let batch = names.iter().map(|n| NewRecord::named(*n)).collect();
    catalog
        .add_records(batch)
        .unwrap()
        .inserted
        .into_iter()
        .map(|r| r.id)
        .collect()
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

#[test]
fn test_open_creates_new_database() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.db");

    assert!(!path.exists(), "Database should not exist before open");
    let catalog = Catalog::open(&path, Config::default()).unwrap();
    assert!(path.exists(), "Database file should exist after open");

    assert_eq!(catalog.config().sync_mode, SyncMode::Normal);
    assert_eq!(catalog.path(), Some(path.as_path()));
    catalog.close().unwrap();
}

#[test]
fn test_open_rejects_invalid_config() {
    let dir = tempdir().unwrap();
    let config = Config {
        default_prefix_limit: 50,
        max_prefix_limit: 10,
        ..Default::default()
    };

    let err = Catalog::open(dir.path().join("catalog.db"), config).unwrap_err();
    assert!(matches!(err, CatalogError::InvalidInput(_)));
}

#[test]
fn test_data_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.db");

    let id = {
        let catalog = Catalog::open(&path, Config::default()).unwrap();
        catalog.seed_default_rules().unwrap();
        let id = add(&catalog, &["Tom"])[0];
        catalog.like(id).unwrap();
        catalog.save_description(id, "grey").unwrap();
        catalog.close().unwrap();
        id
    };

    let catalog = Catalog::open(&path, Config::default()).unwrap();
    let tom = catalog.get_by_id(id).unwrap();
    assert_eq!(tom.name, "Tom");
    assert_eq!(tom.likes, 1);
    assert_eq!(tom.description.as_deref(), Some("grey"));

    // Rules persisted too, so seeding is a no-op
    assert_eq!(catalog.seed_default_rules().unwrap(), 0);
    catalog.close().unwrap();
}

// ============================================================================
// Add Pipeline Tests
// ============================================================================

#[test]
fn test_add_normalizes_and_assigns_ids() {
    let (catalog, _dir) = open_seeded();

    let outcome = catalog
        .add_records(vec![
            NewRecord::named("jean-paul").with_gender(Gender::Male),
            NewRecord::named("mary ann"),
            NewRecord::named("bob"),
        ])
        .unwrap();

    let names: Vec<_> = outcome.inserted.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Jean-Paul", "Mary Ann", "Bob"]);
    assert!(outcome.inserted.iter().all(|r| r.likes == 0 && r.dislikes == 0));
    assert!(outcome.inserted[0].id < outcome.inserted[1].id);
}

#[test]
fn test_add_rejects_before_any_write() {
    let (catalog, _dir) = open_seeded();

    // Rule violation on the second record aborts the batch
    let err = catalog
        .add_records(vec![NewRecord::named("Tom"), NewRecord::named("Tom2")])
        .unwrap_err();
    assert!(err.is_validation_failed());

    // In-batch duplicate aborts the batch
    let err = catalog
        .add_records(vec![NewRecord::named("Jerry"), NewRecord::named("JERRY")])
        .unwrap_err();
    assert!(err.is_duplicate());

    // Empty batch
    let err = catalog.add_records(Vec::new()).unwrap_err();
    assert!(err.is_invalid_input());

    // Name too long after normalization
    let err = catalog
        .add_records(vec![NewRecord::named("a".repeat(36))])
        .unwrap_err();
    assert!(err.is_invalid_input());

    assert!(catalog.search_by_prefix("t", None).unwrap_err().is_not_found());
    assert!(catalog.search_by_prefix("j", None).unwrap_err().is_not_found());
}

#[test]
fn test_add_existing_name_conflicts() {
    let (catalog, _dir) = open_seeded();
    add(&catalog, &["Tom"]);

    let err = catalog
        .add_records(vec![NewRecord::named("tom")])
        .unwrap_err();
    assert!(matches!(err, CatalogError::Duplicate { ref name } if name == "Tom"));
}

// ============================================================================
// Search Tests
// ============================================================================

#[test]
fn test_search_by_prefix_has_more() {
    let (catalog, _dir) = open_seeded();
    add(&catalog, &["Anna", "Andy", "Annie", "Bob"]);

    let page = catalog.search_by_prefix("an", Some(2)).unwrap();
    let names: Vec<_> = page.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Andy", "Anna"]);
    assert!(page.has_more);

    let page = catalog.search_by_prefix("AN", Some(3)).unwrap();
    assert_eq!(page.records.len(), 3);
    assert!(!page.has_more);

    let err = catalog.search_by_prefix("zz", Some(5)).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_search_by_prefix_limit_is_clamped() {
    let dir = tempdir().unwrap();
    let config = Config {
        max_prefix_limit: 2,
        default_prefix_limit: 1,
        ..Default::default()
    };
    let catalog = Catalog::open(dir.path().join("catalog.db"), config).unwrap();
    add(&catalog, &["Anna", "Andy", "Annie"]);

    let page = catalog.search_by_prefix("an", Some(50)).unwrap();
    assert_eq!(page.records.len(), 2);
    assert!(page.has_more);

    let page = catalog.search_by_prefix("an", None).unwrap();
    assert_eq!(page.records.len(), 1);
}

#[test]
fn test_search_by_params_groups() {
    let (catalog, _dir) = open_seeded();
    catalog
        .add_records(vec![
            NewRecord::named("Murka").with_gender(Gender::Female),
            NewRecord::named("Murzik").with_gender(Gender::Male),
            NewRecord::named("Amur").with_gender(Gender::Male),
            NewRecord::named("Tom").with_gender(Gender::Male),
        ])
        .unwrap();

    let grouped = catalog.search_by_params("mur", &[]).unwrap();
    assert_eq!(grouped.total_count, 3);
    let titles: String = grouped.groups.iter().map(|g| g.title).collect();
    assert_eq!(titles, "AM");
    assert_eq!(grouped.group('M').unwrap().count, 2);

    let grouped = catalog.search_by_params("mur", &[Gender::Male]).unwrap();
    assert_eq!(grouped.total_count, 2);

    let err = catalog.search_by_params("mur1", &[]).unwrap_err();
    assert!(err.is_validation_failed());
}

#[test]
fn test_get_all_order_and_gender() {
    let (catalog, _dir) = open_seeded();
    catalog
        .add_records(vec![
            NewRecord::named("bob").with_gender(Gender::Male),
            NewRecord::named("amy").with_gender(Gender::Female),
            NewRecord::named("Ann").with_gender(Gender::Female),
            NewRecord::named("Carl"),
        ])
        .unwrap();

    let grouped = catalog.get_all(None, SortOrder::Asc).unwrap();
    let titles: String = grouped.groups.iter().map(|g| g.title).collect();
    assert_eq!(titles, "ABC");
    assert_eq!(grouped.total_count, 4);
    let a: Vec<_> = grouped.groups[0].records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(a, vec!["Amy", "Ann"]);

    let grouped = catalog.get_all(None, SortOrder::Desc).unwrap();
    let titles: String = grouped.groups.iter().map(|g| g.title).collect();
    assert_eq!(titles, "CBA");

    let grouped = catalog.get_all(Some(Gender::Female), SortOrder::Asc).unwrap();
    assert_eq!(grouped.total_count, 2);
    assert_eq!(grouped.groups.len(), 1);
}

// ============================================================================
// Likes & Ratings Tests
// ============================================================================

#[test]
fn test_concurrent_likes_are_not_lost() {
    let (catalog, _dir) = open_seeded();
    let id = add(&catalog, &["Tom"])[0];
    let catalog = Arc::new(catalog);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                for _ in 0..25 {
                    catalog.like(id).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(catalog.get_by_id(id).unwrap().likes, 100);
}

#[test]
fn test_ratings_top_ten() {
    let (catalog, _dir) = open_seeded();
    let names: Vec<String> = ["Alfa", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot"]
        .iter()
        .flat_map(|a| ["Cat", "Dog"].iter().map(move |b| format!("{a} {b}")))
        .collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let ids = add(&catalog, &refs);
    assert_eq!(ids.len(), 12);

    for (i, id) in ids.iter().enumerate() {
        for _ in 0..=i {
            catalog.like(*id).unwrap();
        }
    }
    catalog.dislike(ids[0]).unwrap();

    let top = catalog.top_liked().unwrap();
    assert_eq!(top.len(), 10);
    assert_eq!(top[0].id, ids[11]);
    assert!(top.windows(2).all(|w| w[0].likes >= w[1].likes));

    let top = catalog.top_disliked().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].id, ids[0]);
}

#[test]
fn test_unlike_stops_at_zero() {
    let (catalog, _dir) = open_seeded();
    let id = add(&catalog, &["Tom"])[0];

    assert_eq!(catalog.unlike(id).unwrap().likes, 0);
    assert_eq!(catalog.undislike(id).unwrap().dislikes, 0);
    assert!(catalog.unlike(RecordId(404)).unwrap_err().is_not_found());
}

// ============================================================================
// Validation Rule Tests
// ============================================================================

#[test]
fn test_rules_listing_in_id_order() {
    let (catalog, _dir) = open_seeded();

    let add_rules = catalog.validation_rules(Some(RulePurpose::Add)).unwrap();
    assert!(!add_rules.is_empty());
    assert!(add_rules.windows(2).all(|w| w[0].id < w[1].id));
    assert!(add_rules.iter().all(|r| r.purpose == RulePurpose::Add));

    let all = catalog.validation_rules(None).unwrap();
    assert!(all.len() > add_rules.len());
}

#[test]
fn test_new_rule_applies_to_next_add() {
    let (catalog, _dir) = open_seeded();
    let rule = catalog
        .add_validation_rule(NewValidationRule::new(
            RulePurpose::Add,
            "Name must be at least 3 letters",
            r"\p{L}{3}",
        ))
        .unwrap();

    let err = catalog
        .add_records(vec![NewRecord::named("Bo")])
        .unwrap_err();
    assert_eq!(err.to_string(), "Name must be at least 3 letters");

    catalog.remove_validation_rule(rule.id).unwrap();
    add(&catalog, &["Bo"]);
}

#[test]
fn test_first_failing_rule_wins() {
    let (catalog, _dir) = open_seeded();

    // "1abc" breaks both later rules; the lower id reports
    let err = catalog.validate_name(RulePurpose::Add, "1abc").unwrap_err();
    assert_eq!(err.to_string(), "Name must start with a letter");

    // Symbols around a name are trimmed before the rules run
    let outcome = catalog
        .add_records(vec![NewRecord::named("-1abc!")])
        .unwrap();
    assert_eq!(outcome.inserted[0].name, "Abc");

    let err = catalog.validate_name(RulePurpose::Add, "   ").unwrap_err();
    assert_eq!(err.to_string(), "Name is required");
}
