use super::*;

fn entry(id: EntityId, name: &str) -> CatalogEntry {
    CatalogEntry {
        id,
        name: name.to_string(),
        image_url: format!("https://img.test/{id}.png"),
        types: vec!["grass".to_string()],
        source_url: format!("https://pokeapi.test/pokemon/{id}/"),
    }
}

#[test]
fn adding_twice_keeps_one() {
    let mut favorites = MemoryFavorites::new();
    assert!(favorites.add(entry(1, "bulbasaur")).unwrap());
    assert!(!favorites.add(entry(1, "bulbasaur")).unwrap());
    assert_eq!(favorites.list().len(), 1);
}

#[test]
fn removing_absent_id_is_a_no_op() {
    let mut favorites = MemoryFavorites::new();
    favorites.add(entry(1, "bulbasaur")).unwrap();
    assert!(!favorites.remove(25).unwrap());
    assert_eq!(favorites.list().len(), 1);
}

#[test]
fn membership_and_removal_use_the_same_key() {
    let mut favorites = MemoryFavorites::new();
    favorites.add(entry(4, "charmander")).unwrap();
    assert!(favorites.contains(4));
    assert!(favorites.remove(4).unwrap());
    assert!(!favorites.contains(4));
}

#[test]
fn toggle_flips_membership() {
    let mut favorites = MemoryFavorites::new();
    assert!(favorites.toggle(entry(7, "squirtle")).unwrap());
    assert!(favorites.contains(7));
    assert!(!favorites.toggle(entry(7, "squirtle")).unwrap());
    assert!(favorites.list().is_empty());
}

#[test]
fn json_missing_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let favorites = JsonFavorites::open(dir.path().join("favorites.json")).unwrap();
    assert!(favorites.list().is_empty());
}

#[test]
fn json_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("favorites.json");

    {
        let mut favorites = JsonFavorites::open(&path).unwrap();
        favorites.add(entry(1, "bulbasaur")).unwrap();
        favorites.add(entry(4, "charmander")).unwrap();
        favorites.add(entry(1, "bulbasaur")).unwrap();
        favorites.remove(1).unwrap();
    }

    let reopened = JsonFavorites::open(&path).unwrap();
    assert_eq!(reopened.list(), &[entry(4, "charmander")]);
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn json_corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("favorites.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(matches!(JsonFavorites::open(&path), Err(StoreError::Json(_))));
}
