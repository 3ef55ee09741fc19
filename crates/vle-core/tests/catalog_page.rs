use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::time::Duration;
use tokio::time::sleep;
use vle_catalog::{Category, PathId};
use vle_core::{CatalogPage, EnrollOutcome, LoadOutcome, Route, ENROLL_FAILED_MESSAGE};
use vle_notify::{NotificationKind, NotificationPhase, NotificationTimings};
use vle_test_utils::{harness, sample_paths, sample_roadmaps, FakeApi, Reply};

fn ids(page: &CatalogPage) -> Vec<i64> {
    page.view().entries.iter().map(|p| p.id.get()).collect()
}

#[tokio::test]
async fn category_and_search_filter_the_loaded_catalog() {
    let h = harness(FakeApi::new().with_paths(sample_paths()), None);
    let page = CatalogPage::explore(h.ctx, NotificationTimings::default());
    page.mount().await.unwrap();

    page.set_category("Web Development");
    assert_eq!(ids(&page), [1, 3]);

    page.set_category("all");
    page.set_search("INTRO");
    assert_eq!(ids(&page), [2]);

    page.set_search("");
    assert_eq!(ids(&page), [1, 2, 3]);
    assert_eq!(page.view().filter.category, Category::All);
}

#[tokio::test]
async fn roadmaps_page_derives_chips_and_opens_details() {
    let h = harness(FakeApi::new().with_roadmaps(sample_roadmaps()), None);
    let page = CatalogPage::roadmaps(h.ctx, NotificationTimings::default());

    assert_eq!(page.mount().await.unwrap(), LoadOutcome::Loaded { count: 4 });
    assert_eq!(h.api.roadmap_calls(), 1);
    assert_eq!(h.api.path_calls(), 0);

    let labels: Vec<String> = page.categories().into_iter().map(|c| c.label).collect();
    assert_eq!(
        labels,
        ["All Roadmaps", "Web Development", "AI & Data", "Infrastructure"]
    );

    page.set_category("Web Development");
    assert_eq!(ids(&page), [10, 13]);

    page.open_roadmap(PathId(13));
    assert_eq!(h.navigator.routes(), [Route::Roadmap { id: PathId(13) }]);
}

#[tokio::test]
async fn failed_load_is_silent_and_shows_empty_state() {
    let api = FakeApi::new();
    api.script_paths(Duration::ZERO, Reply::Fail(503));
    let h = harness(api, None);
    let page = CatalogPage::explore(h.ctx, NotificationTimings::default());

    assert_eq!(page.mount().await.unwrap(), LoadOutcome::Failed);
    let view = page.view();
    assert!(!view.loading);
    assert!(view.is_empty);
    assert!(page.notifications().is_empty());
    assert_eq!(h.sink.contexts(), ["Failed to fetch learning paths"]);
}

#[tokio::test]
async fn signed_in_enroll_navigates_to_learning_view() {
    let h = harness(FakeApi::new().with_paths(sample_paths()), Some("token"));
    let page = CatalogPage::explore(h.ctx, NotificationTimings::default());
    page.mount().await.unwrap();

    let outcome = page.enroll(PathId(3)).await;
    assert!(outcome.is_enrolled());
    assert_eq!(h.api.enrolled(), [PathId(3)]);
    assert_eq!(h.navigator.routes(), [Route::Learning { path_id: PathId(3) }]);
    assert_eq!(h.navigator.routes()[0].href(), "/learning?path=3");
    assert!(page.notifications().is_empty());
}

#[tokio::test]
async fn empty_token_counts_as_signed_out() {
    let h = harness(FakeApi::new(), Some(""));
    let page = CatalogPage::explore(h.ctx, NotificationTimings::default());

    let outcome = page.enroll(PathId(1)).await;
    assert!(matches!(outcome, EnrollOutcome::RedirectedToLogin));
    assert_eq!(h.api.enroll_calls(), 0);
    assert_eq!(h.navigator.routes(), [Route::Login]);
}

#[tokio::test(start_paused = true)]
async fn enroll_failure_toast_runs_its_lifecycle() {
    let api = FakeApi::new();
    api.fail_enroll(500);
    let h = harness(api, Some("token"));
    let page = CatalogPage::explore(h.ctx, NotificationTimings::default());

    let outcome = page.enroll(PathId(1)).await;
    assert!(outcome.is_failed());
    assert!(h.navigator.routes().is_empty());
    assert_eq!(h.sink.contexts(), ["Failed to enroll"]);

    let toast = page.notifications().active().remove(0);
    assert_eq!(toast.kind, NotificationKind::Error);
    assert_eq!(toast.message, ENROLL_FAILED_MESSAGE);
    assert!(toast.visible);

    sleep(Duration::from_millis(2999)).await;
    assert_eq!(
        page.notifications().phase(toast.id),
        Some(NotificationPhase::Visible)
    );

    sleep(Duration::from_millis(2)).await;
    assert_eq!(
        page.notifications().phase(toast.id),
        Some(NotificationPhase::Fading)
    );
    assert!(!page.notifications().get(toast.id).unwrap().visible);

    sleep(Duration::from_millis(300)).await;
    assert!(page.notifications().is_empty());
}

#[tokio::test(start_paused = true)]
async fn repeated_failures_stack_independent_toasts() {
    let api = FakeApi::new();
    api.fail_enroll(500);
    let h = harness(api, Some("token"));
    let page = CatalogPage::explore(h.ctx, NotificationTimings::default());

    page.enroll(PathId(1)).await;
    sleep(Duration::from_millis(1000)).await;
    page.enroll(PathId(1)).await;
    assert_eq!(page.notifications().len(), 2);

    let first = page.notifications().active()[0].id;
    assert!(page.notifications().dismiss(first));

    sleep(Duration::from_millis(301)).await;
    assert_eq!(page.notifications().len(), 1);

    sleep(Duration::from_millis(3000)).await;
    assert!(page.notifications().is_empty());
    assert_eq!(page.notifications().stats().dwell_fired, 1);
}

#[tokio::test(start_paused = true)]
async fn unmount_cancels_enroll_in_flight() {
    let api = FakeApi::new();
    api.delay_enroll(Duration::from_millis(100));
    let h = harness(api, Some("token"));
    let page = CatalogPage::explore(h.ctx, NotificationTimings::default());

    let task = page.spawn_enroll(PathId(1));
    sleep(Duration::from_millis(10)).await;
    page.unmount();

    assert!(task.await.unwrap_err().is_cancelled());
    assert!(h.navigator.routes().is_empty());
    assert_eq!(h.api.enroll_calls(), 1);
}

#[tokio::test]
async fn enroll_after_unmount_makes_no_request() {
    let h = harness(FakeApi::new().with_paths(sample_paths()), Some("token"));
    let page = CatalogPage::explore(h.ctx, NotificationTimings::default());
    page.mount().await.unwrap();
    page.unmount();

    let outcome = page.enroll(PathId(1)).await;
    assert!(matches!(outcome, EnrollOutcome::Cancelled { path_id } if path_id == PathId(1)));
    assert_eq!(h.api.enroll_calls(), 0);
    assert!(h.navigator.routes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn response_after_unmount_does_not_navigate() {
    let api = FakeApi::new();
    api.delay_enroll(Duration::from_millis(100));
    api.fail_enroll(500);
    let h = harness(api, Some("token"));
    let page = CatalogPage::explore(h.ctx, NotificationTimings::default());

    let (outcome, ()) = tokio::join!(page.enroll(PathId(1)), async {
        sleep(Duration::from_millis(10)).await;
        page.unmount();
    });

    assert!(outcome.is_cancelled());
    assert_eq!(h.api.enroll_calls(), 1);
    assert!(h.navigator.routes().is_empty());
    assert!(h.sink.contexts().is_empty());
    assert!(page.notifications().is_empty());
}

#[tokio::test(start_paused = true)]
async fn successful_response_after_unmount_is_dropped() {
    let api = FakeApi::new();
    api.delay_enroll(Duration::from_millis(100));
    let h = harness(api, Some("token"));
    let page = CatalogPage::explore(h.ctx, NotificationTimings::default());

    let (outcome, ()) = tokio::join!(page.enroll(PathId(2)), async {
        sleep(Duration::from_millis(10)).await;
        page.unmount();
    });

    assert!(outcome.is_cancelled());
    assert_eq!(h.api.enrolled(), [PathId(2)]);
    assert!(h.navigator.routes().is_empty());
}

fn run<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #[test]
    fn prop_signed_out_enroll_never_calls_api(id in any::<i64>()) {
        let h = harness(FakeApi::new(), None);
        let page = CatalogPage::explore(h.ctx, NotificationTimings::default());

        let outcome = run(page.enroll(PathId(id)));

        prop_assert!(matches!(outcome, EnrollOutcome::RedirectedToLogin));
        prop_assert_eq!(h.api.enroll_calls(), 0);
        prop_assert_eq!(h.navigator.routes(), vec![Route::Login]);
    }

    #[test]
    fn prop_signed_in_enroll_calls_api_once(id in any::<i64>(), token in "[a-z0-9]{1,16}") {
        let h = harness(FakeApi::new(), Some(&token));
        let page = CatalogPage::explore(h.ctx, NotificationTimings::default());

        let outcome = run(page.enroll(PathId(id)));

        prop_assert!(outcome.is_enrolled());
        prop_assert_eq!(h.api.enrolled(), vec![PathId(id)]);
        prop_assert_eq!(h.navigator.routes(), vec![Route::Learning { path_id: PathId(id) }]);
    }
}
