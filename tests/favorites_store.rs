//! Item store tests: add/remove/clear/list over a decoded archive.

use sidelist::archive::{ArchiveReader, ArchiveWriter};
use sidelist::location::{LocationResolver, MockResolver, PortableResolver};
use sidelist::store::{bootstrap_archive, normalize_path, FavoriteStore};
use sidelist::types::error::SidelistError;
use sidelist::types::{Value, FORCE_TEMPLATE_ICONS_KEY, ITEMS_KEY, PROPERTIES_KEY};

use std::path::Path;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn item_count(archive: &Value) -> usize {
    archive.get(ITEMS_KEY).unwrap().as_sequence().unwrap().len()
}

// ==================== Bootstrap Tests ====================

#[test]
fn test_bootstrap_shape() {
    let archive = bootstrap_archive();
    assert_eq!(item_count(&archive), 0);

    let properties = archive.get(PROPERTIES_KEY).unwrap();
    assert_eq!(
        properties.get(FORCE_TEMPLATE_ICONS_KEY),
        Some(&Value::Boolean(true))
    );
}

#[test]
fn test_bootstrap_roundtrips_through_codec() {
    let archive = bootstrap_archive();
    let bytes = ArchiveWriter::encode(&archive);
    let decoded = ArchiveReader::decode(&bytes).unwrap();
    assert_eq!(decoded, archive);
    assert_eq!(item_count(&decoded), 0);
}

// ==================== Add Tests ====================

#[test]
fn test_add_appends_visible_item() {
    let resolver = MockResolver::new();
    let store = FavoriteStore::new(&resolver);
    let mut archive = bootstrap_archive();

    let item = store.add(&mut archive, "/data/projects").unwrap();
    assert_eq!(item.visibility, 0);
    assert!(item.custom_properties.is_some());
    assert_eq!(item.location, b"/data/projects");
    // UUID v4 string shape: 36 chars, 4 hyphens
    assert_eq!(item.uuid.len(), 36);
    assert_eq!(item.uuid.matches('-').count(), 4);

    assert_eq!(item_count(&archive), 1);
}

#[test]
fn test_add_preserves_call_order() {
    let resolver = MockResolver::new();
    let store = FavoriteStore::new(&resolver);
    let mut archive = bootstrap_archive();

    store.add(&mut archive, "/data/a").unwrap();
    store.add(&mut archive, "/data/b").unwrap();
    store.add(&mut archive, "/data/c").unwrap();

    let paths: Vec<String> = store
        .list(&archive)
        .unwrap()
        .into_iter()
        .map(|entry| entry.path)
        .collect();
    assert_eq!(paths, ["/data/a", "/data/b", "/data/c"]);
}

#[test]
fn test_add_duplicate_rejected() {
    let resolver = MockResolver::new();
    let store = FavoriteStore::new(&resolver);
    let mut archive = bootstrap_archive();

    store.add(&mut archive, "/data/projects").unwrap();
    let result = store.add(&mut archive, "/data/projects");
    assert!(result.is_err());
    match result.unwrap_err() {
        SidelistError::DuplicateFavorite(path) => assert_eq!(path, "/data/projects"),
        e => panic!("Expected DuplicateFavorite, got {:?}", e),
    }
    assert_eq!(item_count(&archive), 1);
}

#[test]
fn test_add_duplicate_detected_after_normalization() {
    let resolver = MockResolver::new();
    let store = FavoriteStore::new(&resolver);
    let mut archive = bootstrap_archive();

    store.add(&mut archive, "/data/projects").unwrap();
    let result = store.add(&mut archive, "/data/./tmp/../projects/");
    assert!(result.is_err());
    match result.unwrap_err() {
        SidelistError::DuplicateFavorite(_) => {}
        e => panic!("Expected DuplicateFavorite, got {:?}", e),
    }
}

#[test]
fn test_add_stale_item_still_counts_as_duplicate() {
    let mut resolver = MockResolver::new();
    resolver.mark_stale("/data/projects");
    let store = FavoriteStore::new(&resolver);
    let mut archive = bootstrap_archive();

    store.add(&mut archive, "/data/projects").unwrap();
    let result = store.add(&mut archive, "/data/projects");
    match result.unwrap_err() {
        SidelistError::DuplicateFavorite(_) => {}
        e => panic!("Expected DuplicateFavorite, got {:?}", e),
    }
}

#[test]
fn test_add_desktop_has_no_custom_properties() {
    let resolver = MockResolver::new();
    let store = FavoriteStore::new(&resolver);
    let mut archive = bootstrap_archive();

    let desktop = store.add(&mut archive, "/home/sam/Desktop").unwrap();
    assert!(desktop.custom_properties.is_none());

    let other = store.add(&mut archive, "/home/sam/Documents").unwrap();
    assert!(other.custom_properties.is_some());

    // Only the final component counts, and the match is exact
    let nested = store.add(&mut archive, "/home/sam/Desktop/sub").unwrap();
    assert!(nested.custom_properties.is_some());
    let lowercase = store.add(&mut archive, "/home/sam/desktop").unwrap();
    assert!(lowercase.custom_properties.is_some());
}

#[test]
fn test_add_desktop_stored_without_properties_key() {
    let resolver = MockResolver::new();
    let store = FavoriteStore::new(&resolver);
    let mut archive = bootstrap_archive();

    store.add(&mut archive, "/home/sam/Desktop").unwrap();

    let items = archive.get(ITEMS_KEY).unwrap().as_sequence().unwrap();
    assert!(items[0].get("custom_properties").is_none());
}

#[test]
fn test_add_bookmark_failure_leaves_archive_untouched() {
    let mut resolver = MockResolver::new();
    resolver.deny("/data/vanished");
    let store = FavoriteStore::new(&resolver);
    let mut archive = bootstrap_archive();

    let result = store.add(&mut archive, "/data/vanished");
    assert!(result.is_err());
    match result.unwrap_err() {
        SidelistError::Bookmark(_) => {}
        e => panic!("Expected Bookmark, got {:?}", e),
    }
    assert_eq!(item_count(&archive), 0);
}

#[test]
fn test_add_missing_items_field_rejected() {
    let resolver = MockResolver::new();
    let store = FavoriteStore::new(&resolver);
    let mut archive = Value::Map(vec![(PROPERTIES_KEY.to_string(), Value::Map(Vec::new()))]);

    let result = store.add(&mut archive, "/data/projects");
    assert!(result.is_err());
    match result.unwrap_err() {
        SidelistError::MissingField("items") => {}
        e => panic!("Expected MissingField(items), got {:?}", e),
    }
}

// ==================== Batch Add Tests ====================

#[test]
fn test_add_all_mixed_outcome() {
    init_logging();
    let mut resolver = MockResolver::new();
    resolver.deny("/data/vanished");
    let store = FavoriteStore::new(&resolver);
    let mut archive = bootstrap_archive();

    let paths = vec![
        "/data/a".to_string(),
        "/data/vanished".to_string(),
        "/data/b".to_string(),
    ];
    let outcome = store.add_all(&mut archive, &paths).unwrap();

    assert_eq!(outcome.added.len(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].0, "/data/vanished");
    assert!(!outcome.all_failed());
    assert_eq!(item_count(&archive), 2);
}

#[test]
fn test_add_all_every_path_failed() {
    let mut resolver = MockResolver::new();
    resolver.deny("/data/x");
    resolver.deny("/data/y");
    let store = FavoriteStore::new(&resolver);
    let mut archive = bootstrap_archive();

    let paths = vec!["/data/x".to_string(), "/data/y".to_string()];
    let outcome = store.add_all(&mut archive, &paths).unwrap();

    assert!(outcome.all_failed());
    assert_eq!(item_count(&archive), 0);
}

// ==================== Remove Tests ====================

#[test]
fn test_remove_match() {
    let resolver = MockResolver::new();
    let store = FavoriteStore::new(&resolver);
    let mut archive = bootstrap_archive();

    store.add(&mut archive, "/data/a").unwrap();
    store.add(&mut archive, "/data/b").unwrap();
    store.add(&mut archive, "/data/c").unwrap();

    assert!(store.remove(&mut archive, "/data/b").unwrap());

    let paths: Vec<String> = store
        .list(&archive)
        .unwrap()
        .into_iter()
        .map(|entry| entry.path)
        .collect();
    assert_eq!(paths, ["/data/a", "/data/c"]);
}

#[test]
fn test_remove_no_match_is_not_an_error() {
    let resolver = MockResolver::new();
    let store = FavoriteStore::new(&resolver);
    let mut archive = bootstrap_archive();

    store.add(&mut archive, "/data/a").unwrap();

    assert!(!store.remove(&mut archive, "/data/missing").unwrap());
    assert_eq!(item_count(&archive), 1);
}

#[test]
fn test_remove_takes_only_first_of_duplicates() {
    let resolver = MockResolver::new();
    let store = FavoriteStore::new(&resolver);
    let mut archive = bootstrap_archive();

    let item = store.add(&mut archive, "/data/a").unwrap();
    // Force a duplicate entry past the invariant, as a foreign writer could
    archive
        .get_mut(ITEMS_KEY)
        .unwrap()
        .as_sequence_mut()
        .unwrap()
        .push(item.to_value());
    assert_eq!(item_count(&archive), 2);

    assert!(store.remove(&mut archive, "/data/a").unwrap());
    assert_eq!(item_count(&archive), 1);
}

#[test]
fn test_remove_bad_path_rejected() {
    let resolver = MockResolver::new();
    let store = FavoriteStore::new(&resolver);
    let mut archive = bootstrap_archive();

    let result = store.remove(&mut archive, "");
    assert!(result.is_err());
    match result.unwrap_err() {
        SidelistError::PathUnresolvable { .. } => {}
        e => panic!("Expected PathUnresolvable, got {:?}", e),
    }
}

// ==================== Clear Tests ====================

#[test]
fn test_clear_empties_items_only() {
    let resolver = MockResolver::new();
    let store = FavoriteStore::new(&resolver);
    let mut archive = bootstrap_archive();

    store.add(&mut archive, "/data/a").unwrap();
    store.add(&mut archive, "/data/b").unwrap();

    store.clear(&mut archive).unwrap();
    assert_eq!(item_count(&archive), 0);
    assert_eq!(
        archive.get(PROPERTIES_KEY).unwrap().get(FORCE_TEMPLATE_ICONS_KEY),
        Some(&Value::Boolean(true))
    );
}

#[test]
fn test_clear_recreates_missing_items() {
    let resolver = MockResolver::new();
    let store = FavoriteStore::new(&resolver);
    let mut archive = Value::Map(vec![(PROPERTIES_KEY.to_string(), Value::Map(Vec::new()))]);

    store.clear(&mut archive).unwrap();
    assert_eq!(item_count(&archive), 0);
}

// ==================== List Tests ====================

#[test]
fn test_list_skips_malformed_entries() {
    init_logging();
    let resolver = MockResolver::new();
    let store = FavoriteStore::new(&resolver);
    let mut archive = bootstrap_archive();

    store.add(&mut archive, "/data/good").unwrap();
    let items = archive
        .get_mut(ITEMS_KEY)
        .unwrap()
        .as_sequence_mut()
        .unwrap();
    // Historic junk written by other tools: wrong shapes everywhere
    items.push(Value::Integer(7));
    items.push(Value::Map(vec![(
        "uuid".to_string(),
        Value::Text("no-location".to_string()),
    )]));
    items.push(Value::Map(vec![(
        "location".to_string(),
        Value::Text("/not/a/blob".to_string()),
    )]));

    let entries = store.list(&archive).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "/data/good");
}

#[test]
fn test_list_reports_stale_entries() {
    let mut resolver = MockResolver::new();
    resolver.mark_stale("/data/moved");
    let store = FavoriteStore::new(&resolver);
    let mut archive = bootstrap_archive();

    store.add(&mut archive, "/data/moved").unwrap();
    store.add(&mut archive, "/data/here").unwrap();

    let entries = store.list(&archive).unwrap();
    assert!(entries[0].stale);
    assert!(!entries[1].stale);
}

#[test]
fn test_operations_survive_codec_roundtrip() {
    let resolver = MockResolver::new();
    let store = FavoriteStore::new(&resolver);
    let mut archive = bootstrap_archive();

    store.add(&mut archive, "/data/a").unwrap();
    store.add(&mut archive, "/data/b").unwrap();

    let bytes = ArchiveWriter::encode(&archive);
    let mut reloaded = ArchiveReader::decode(&bytes).unwrap();
    assert_eq!(reloaded, archive);

    assert!(store.remove(&mut reloaded, "/data/a").unwrap());
    let paths: Vec<String> = store
        .list(&reloaded)
        .unwrap()
        .into_iter()
        .map(|entry| entry.path)
        .collect();
    assert_eq!(paths, ["/data/b"]);
}

// ==================== Path Normalization Tests ====================

#[test]
fn test_normalize_cleans_lexically() {
    assert_eq!(
        normalize_path("/data/./tmp/../projects/").unwrap(),
        Path::new("/data/projects")
    );
    assert_eq!(normalize_path("/..").unwrap(), Path::new("/"));
}

#[test]
fn test_normalize_relative_joins_cwd() {
    let cwd = std::env::current_dir().unwrap();
    assert_eq!(normalize_path("docs").unwrap(), cwd.join("docs"));
}

#[test]
fn test_normalize_empty_rejected() {
    let result = normalize_path("");
    assert!(result.is_err());
    match result.unwrap_err() {
        SidelistError::PathUnresolvable { .. } => {}
        e => panic!("Expected PathUnresolvable, got {:?}", e),
    }
}

#[test]
fn test_normalize_user_tilde_rejected() {
    let result = normalize_path("~sam/docs");
    assert!(result.is_err());
    match result.unwrap_err() {
        SidelistError::PathUnresolvable { .. } => {}
        e => panic!("Expected PathUnresolvable, got {:?}", e),
    }
}

// ==================== Portable Resolver Tests ====================

#[test]
fn test_portable_resolver_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("notes");
    std::fs::write(&target, b"x").unwrap();

    let resolver = PortableResolver::new();
    let token = resolver.encode_location(&target).unwrap();
    let resolved = resolver.decode_location(&token).unwrap();

    assert_eq!(resolved.path, target.to_string_lossy());
    assert!(!resolved.stale);
}

#[test]
fn test_portable_resolver_missing_target_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let resolver = PortableResolver::new();

    let result = resolver.encode_location(&dir.path().join("absent"));
    assert!(result.is_err());
    match result.unwrap_err() {
        SidelistError::Bookmark(_) => {}
        e => panic!("Expected Bookmark, got {:?}", e),
    }
}

#[test]
fn test_portable_resolver_vanished_target_is_stale() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("ephemeral");
    std::fs::write(&target, b"x").unwrap();

    let resolver = PortableResolver::new();
    let token = resolver.encode_location(&target).unwrap();
    std::fs::remove_file(&target).unwrap();

    let resolved = resolver.decode_location(&token).unwrap();
    assert!(resolved.stale);
    assert_eq!(resolved.path, target.to_string_lossy());
}

#[test]
fn test_portable_resolver_corrupt_token_rejected() {
    let resolver = PortableResolver::new();
    let result = resolver.decode_location(b"bogus-token");
    assert!(result.is_err());
    match result.unwrap_err() {
        SidelistError::Bookmark(_) => {}
        e => panic!("Expected Bookmark, got {:?}", e),
    }
}
