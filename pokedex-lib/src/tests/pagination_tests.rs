use super::*;
use crate::test_support::MockSource;

const STALE: Duration = Duration::from_secs(300);

fn setup(total: u32) -> (QueryCache, Arc<MockSource>, Paginator<MockSource>) {
    let cache = QueryCache::new();
    let mock = MockSource::shared(total);
    let paginator = Paginator::new(cache.clone(), mock.clone(), DEFAULT_PAGE_SIZE, STALE);
    (cache, mock, paginator)
}

#[tokio::test(start_paused = true)]
async fn go_to_page_sets_current_page_unchecked() {
    let (_, _, mut paginator) = setup(45);
    assert_eq!(paginator.current_page(), 1);
    for n in [3, 0, 999] {
        paginator.go_to_page(n);
        assert_eq!(paginator.current_page(), n);
    }
}

#[tokio::test(start_paused = true)]
async fn first_page_has_no_previous() {
    let (_, _, mut paginator) = setup(45);
    let page = paginator.load().await.unwrap();

    assert_eq!(page.entries.len(), 20);
    assert_eq!(page.entries[0].name, "bulbasaur");
    assert_eq!(page.total_count, 45);
    assert_eq!(page.previous_page, None);
    assert_eq!(page.next_page, Some(2));
    assert_eq!(paginator.total_pages(), Some(3));
}

#[tokio::test(start_paused = true)]
async fn page_zero_loads_the_first_window() {
    let (_, _, mut paginator) = setup(45);
    paginator.go_to_page(0);
    let page = paginator.load().await.unwrap();

    assert_eq!(paginator.current_page(), 0);
    assert_eq!(page.entries[0].name, "bulbasaur");
    assert_eq!(page.previous_page, None);
    assert_eq!(page.next_page, Some(2));
}

#[tokio::test(start_paused = true)]
async fn second_page_points_back_to_first() {
    let (_, _, mut paginator) = setup(45);
    paginator.go_to_page(2);
    let page = paginator.load().await.unwrap();

    assert_eq!(page.previous_page, Some(1));
    assert_eq!(page.next_page, Some(3));
    assert_eq!(page.entries[0].id, 21);
}

#[tokio::test(start_paused = true)]
async fn next_page_is_prefetched_fresh() {
    let (cache, mock, mut paginator) = setup(45);
    paginator.load().await.unwrap();

    let next = QueryKey::page(2, DEFAULT_PAGE_SIZE);
    cache.settled(&next).await;
    let entry = cache.get::<PagedResult>(&next);
    assert!(entry.is_fresh(STALE));
    assert_eq!(entry.data.unwrap().entries[0].id, 21);
    assert_eq!(MockSource::calls(&mock.list_calls), 2);
}

#[tokio::test(start_paused = true)]
async fn advancing_after_prefetch_is_a_cache_hit() {
    let (cache, mock, mut paginator) = setup(45);
    paginator.load().await.unwrap();
    cache.settled(&QueryKey::page(2, DEFAULT_PAGE_SIZE)).await;

    assert!(paginator.go_to_next());
    let page = paginator.load().await.unwrap();
    assert_eq!(page.entries[0].id, 21);

    cache.settled(&QueryKey::page(3, DEFAULT_PAGE_SIZE)).await;
    // page 1, prefetched page 2, prefetched page 3
    assert_eq!(MockSource::calls(&mock.list_calls), 3);
}

#[tokio::test(start_paused = true)]
async fn last_page_prefetches_nothing() {
    let (cache, mock, mut paginator) = setup(45);
    paginator.go_to_page(3);
    let page = paginator.load().await.unwrap();

    assert_eq!(page.entries.len(), 5);
    assert_eq!(page.next_page, None);
    assert!(!paginator.has_next());
    assert!(paginator.has_previous());

    let beyond = cache.get::<PagedResult>(&QueryKey::page(4, DEFAULT_PAGE_SIZE));
    assert!(beyond.is_pending());
    assert!(!beyond.is_fetching);
    assert_eq!(MockSource::calls(&mock.list_calls), 1);

    assert!(!paginator.go_to_next());
    assert_eq!(paginator.current_page(), 3);
}

#[tokio::test(start_paused = true)]
async fn navigation_without_links_is_a_no_op() {
    let (_, _, mut paginator) = setup(45);
    assert!(!paginator.go_to_next());
    assert_eq!(paginator.total_pages(), None);

    paginator.load().await.unwrap();
    assert!(!paginator.go_to_previous());
    assert_eq!(paginator.current_page(), 1);
}

#[tokio::test(start_paused = true)]
async fn stale_page_is_refetched() {
    let (cache, mock, mut paginator) = setup(45);
    paginator.load().await.unwrap();
    cache.settled(&QueryKey::page(2, DEFAULT_PAGE_SIZE)).await;

    tokio::time::advance(Duration::from_secs(6 * 60)).await;
    paginator.load().await.unwrap();
    cache.settled(&QueryKey::page(2, DEFAULT_PAGE_SIZE)).await;
    assert_eq!(MockSource::calls(&mock.list_calls), 4);
}

#[tokio::test(start_paused = true)]
async fn failed_page_surfaces_error_and_retries_on_next_load() {
    let (cache, mock, mut paginator) = setup(45);
    mock.fail("list");

    let err = paginator.load().await.unwrap_err();
    assert!(err.is_network());
    assert!(paginator.last_result().is_none());
    assert!(paginator.current_entry().error.is_some());

    mock.heal("list");
    let page = paginator.load().await.unwrap();
    assert_eq!(page.entries.len(), 20);
    cache.settled(&QueryKey::page(2, DEFAULT_PAGE_SIZE)).await;
    assert_eq!(MockSource::calls(&mock.list_calls), 3);
}

#[tokio::test(start_paused = true)]
async fn enrichment_failure_fails_the_page() {
    let (_, mock, mut paginator) = setup(45);
    mock.fail("pokemon/7");

    let err = paginator.load().await.unwrap_err();
    assert!(err.is_network());
}

#[tokio::test(start_paused = true)]
async fn loaded_pages_warm_the_search_cache() {
    let (cache, _, mut paginator) = setup(45);
    paginator.load().await.unwrap();
    cache.settled(&QueryKey::page(2, DEFAULT_PAGE_SIZE)).await;
    paginator.go_to_next();
    paginator.load().await.unwrap();

    let warmed = cache
        .get::<Vec<CatalogEntry>>(&QueryKey::search_cache())
        .data
        .unwrap();
    let ids: Vec<EntityId> = warmed.iter().map(|e| e.id).collect();
    assert_eq!(ids, (1..=40).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn invalidate_forces_reload_of_current_page() {
    let (_, mock, mut paginator) = setup(45);
    paginator.go_to_page(3);
    paginator.load().await.unwrap();
    paginator.invalidate();
    paginator.load().await.unwrap();
    assert_eq!(MockSource::calls(&mock.list_calls), 2);
}
