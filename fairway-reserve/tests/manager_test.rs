use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use fairway_core::{
    BookingType, Clock, ManualClock, Principal, Role, TeeTime, TeeTimeRepository, TeeTimeStatus,
    TimeSlot,
};
use fairway_reserve::{HoldPolicy, ReservationError, ReservationManager};
use fairway_store::MemoryTeeTimeRepository;

fn setup(
    policy: HoldPolicy,
) -> (
    Arc<MemoryTeeTimeRepository>,
    Arc<ManualClock>,
    Arc<ReservationManager>,
) {
    let repo = Arc::new(MemoryTeeTimeRepository::new());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let manager = Arc::new(ReservationManager::new(repo.clone(), clock.clone(), policy));
    (repo, clock, manager)
}

async fn seed_tee_time(repo: &MemoryTeeTimeRepository, clock: &ManualClock) -> Uuid {
    let tee_time = TeeTime::new(
        Uuid::new_v4(),
        NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
        NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
        180_000,
        4,
        TimeSlot::First,
        BookingType::Booking,
        clock.now(),
    );
    let id = tee_time.id;
    repo.insert(&tee_time).await.unwrap();
    id
}

fn manager_principal() -> Principal {
    Principal::new(Uuid::new_v4(), Role::InternalManager, Some(Uuid::new_v4()))
}

#[tokio::test]
async fn test_reserve_grants_timed_hold() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let id = seed_tee_time(&repo, &clock).await;
    let principal = manager_principal();

    let grant = manager.reserve(id, &principal).await.unwrap();

    assert_eq!(grant.tee_time.status, TeeTimeStatus::Reserved);
    assert_eq!(grant.tee_time.holder_id, Some(principal.id));
    assert_eq!(grant.tee_time.reserved_at, Some(clock.now()));
    assert_eq!(grant.expires_at, clock.now() + Duration::seconds(600));
}

#[tokio::test]
async fn test_reserve_rejects_non_managers() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let id = seed_tee_time(&repo, &clock).await;

    for role in [Role::Member, Role::GolfCourse] {
        let principal = Principal::new(Uuid::new_v4(), role, None);
        let err = manager.reserve(id, &principal).await.unwrap_err();
        assert!(matches!(err, ReservationError::Forbidden(_)));
    }

    // Nothing should have been written
    let current = repo.find(id).await.unwrap().unwrap();
    assert_eq!(current.status, TeeTimeStatus::Available);
}

#[tokio::test]
async fn test_reserve_unknown_id_is_not_found() {
    let (_repo, _clock, manager) = setup(HoldPolicy::default());
    let err = manager
        .reserve(Uuid::new_v4(), &manager_principal())
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::NotFound(_)));
}

#[tokio::test]
async fn test_reserve_on_held_slot_is_conflict() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let id = seed_tee_time(&repo, &clock).await;

    manager.reserve(id, &manager_principal()).await.unwrap();
    let err = manager
        .reserve(id, &manager_principal())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ReservationError::Conflict {
            expected: TeeTimeStatus::Available,
            actual: TeeTimeStatus::Reserved,
        }
    ));
}

#[tokio::test]
async fn test_concurrent_reserves_have_one_winner() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let id = seed_tee_time(&repo, &clock).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let manager = manager.clone();
        let principal = Principal::new(Uuid::new_v4(), Role::ExternalManager, None);
        handles.push(tokio::spawn(
            async move { manager.reserve(id, &principal).await },
        ));
    }

    let mut winners = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(ReservationError::Conflict { .. }) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(conflicts, 7);
}

#[tokio::test]
async fn test_confirm_within_window() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let id = seed_tee_time(&repo, &clock).await;
    let holder = manager_principal();

    manager.reserve(id, &holder).await.unwrap();
    clock.advance(Duration::seconds(599));

    let confirmed = manager.confirm(id, &holder).await.unwrap();
    assert_eq!(confirmed.status, TeeTimeStatus::Confirmed);
    assert_eq!(confirmed.confirmed_by, Some(holder.id));
    assert_eq!(confirmed.holder_id, Some(holder.id));
    assert!(confirmed.reserved_at.is_none());
}

#[tokio::test]
async fn test_confirm_after_hold_expiry_reverts_slot() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let id = seed_tee_time(&repo, &clock).await;
    let holder = manager_principal();

    manager.reserve(id, &holder).await.unwrap();
    clock.advance(Duration::seconds(601));

    let err = manager.confirm(id, &holder).await.unwrap_err();
    assert!(matches!(err, ReservationError::Expired(_)));

    // The failed confirm performed the revert
    let current = repo.find(id).await.unwrap().unwrap();
    assert_eq!(current.status, TeeTimeStatus::Available);
    assert!(current.holder_id.is_none());
    assert!(current.reserved_at.is_none());
}

#[tokio::test]
async fn test_confirm_at_exactly_hold_boundary_still_succeeds() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let id = seed_tee_time(&repo, &clock).await;
    let holder = manager_principal();

    manager.reserve(id, &holder).await.unwrap();
    clock.advance(Duration::seconds(600));

    let confirmed = manager.confirm(id, &holder).await.unwrap();
    assert_eq!(confirmed.status, TeeTimeStatus::Confirmed);
}

#[tokio::test]
async fn test_confirm_authorization() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let team = Uuid::new_v4();
    let holder = Principal::new(Uuid::new_v4(), Role::Partner, Some(team));

    // An unrelated manager below team-leader rank may not confirm
    let id = seed_tee_time(&repo, &clock).await;
    manager.reserve(id, &holder).await.unwrap();
    let outsider = Principal::new(Uuid::new_v4(), Role::InternalManager, Some(Uuid::new_v4()));
    let err = manager.confirm(id, &outsider).await.unwrap_err();
    assert!(matches!(err, ReservationError::Forbidden(_)));

    // A team leader (any team) sits at team-leader-or-above
    let leader = Principal::new(Uuid::new_v4(), Role::TeamLeader, Some(Uuid::new_v4()));
    manager.confirm(id, &leader).await.unwrap();

    // The holder's own team leader
    let id2 = seed_tee_time(&repo, &clock).await;
    manager.reserve(id2, &holder).await.unwrap();
    let own_leader = Principal::new(Uuid::new_v4(), Role::TeamLeader, Some(team));
    manager.confirm(id2, &own_leader).await.unwrap();

    // The holder themselves
    let id3 = seed_tee_time(&repo, &clock).await;
    manager.reserve(id3, &holder).await.unwrap();
    manager.confirm(id3, &holder).await.unwrap();
}

#[tokio::test]
async fn test_confirm_wrong_status_is_conflict() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let id = seed_tee_time(&repo, &clock).await;

    let err = manager.confirm(id, &manager_principal()).await.unwrap_err();
    assert!(matches!(
        err,
        ReservationError::Conflict {
            expected: TeeTimeStatus::Reserved,
            actual: TeeTimeStatus::Available,
        }
    ));
}

#[tokio::test]
async fn test_cancel_by_holder_revives_slot() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let id = seed_tee_time(&repo, &clock).await;
    let holder = manager_principal();

    manager.reserve(id, &holder).await.unwrap();
    let cancelled = manager
        .cancel(id, &holder, Some("customer changed plans"))
        .await
        .unwrap();

    assert_eq!(cancelled.status, TeeTimeStatus::Available);
    assert!(cancelled.holder_id.is_none());
    assert!(cancelled.reserved_at.is_none());
}

#[tokio::test]
async fn test_cancel_authorization() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let id = seed_tee_time(&repo, &clock).await;
    let holder = manager_principal();
    manager.reserve(id, &holder).await.unwrap();

    // Neither holder nor admin: even a team leader may not cancel
    let leader = Principal::new(Uuid::new_v4(), Role::TeamLeader, None);
    let err = manager.cancel(id, &leader, None).await.unwrap_err();
    assert!(matches!(err, ReservationError::Forbidden(_)));

    let admin = Principal::new(Uuid::new_v4(), Role::Admin, None);
    let cancelled = manager.cancel(id, &admin, None).await.unwrap();
    assert_eq!(cancelled.status, TeeTimeStatus::Available);
}

#[tokio::test]
async fn test_cancel_wrong_status_is_conflict() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let id = seed_tee_time(&repo, &clock).await;
    let holder = manager_principal();

    manager.reserve(id, &holder).await.unwrap();
    manager.confirm(id, &holder).await.unwrap();

    let err = manager.cancel(id, &holder, None).await.unwrap_err();
    assert!(matches!(err, ReservationError::Conflict { .. }));
}

#[tokio::test]
async fn test_terminal_cancel_rule() {
    let (repo, clock, manager) = setup(HoldPolicy::new(600, true));
    let id = seed_tee_time(&repo, &clock).await;
    let holder = manager_principal();

    manager.reserve(id, &holder).await.unwrap();
    let cancelled = manager.cancel(id, &holder, None).await.unwrap();

    assert_eq!(cancelled.status, TeeTimeStatus::Cancelled);
    assert!(cancelled.holder_id.is_none());
}

#[tokio::test]
async fn test_timer_inactive_outside_reserved() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let id = seed_tee_time(&repo, &clock).await;

    let timer = manager.timer_status(id).await.unwrap();
    assert_eq!(timer.status, TeeTimeStatus::Available);
    assert_eq!(timer.remaining_seconds, 0);
    assert!(!timer.is_expired);
    assert!(timer.expires_at.is_none());
}

#[tokio::test]
async fn test_timer_counts_down() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let id = seed_tee_time(&repo, &clock).await;
    let holder = manager_principal();

    let grant = manager.reserve(id, &holder).await.unwrap();
    clock.advance(Duration::seconds(90));

    let timer = manager.timer_status(id).await.unwrap();
    assert_eq!(timer.status, TeeTimeStatus::Reserved);
    assert_eq!(timer.expires_at, Some(grant.expires_at));
    assert_eq!(timer.remaining_seconds, 510);
    assert!(!timer.is_expired);
}

#[tokio::test]
async fn test_timer_read_applies_lazy_expiry() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let id = seed_tee_time(&repo, &clock).await;
    let holder = manager_principal();

    manager.reserve(id, &holder).await.unwrap();
    clock.advance(Duration::seconds(601));

    // Until something touches the record it still reads RESERVED
    let stale = repo.find(id).await.unwrap().unwrap();
    assert_eq!(stale.status, TeeTimeStatus::Reserved);

    let timer = manager.timer_status(id).await.unwrap();
    assert!(timer.is_expired);
    assert_eq!(timer.remaining_seconds, 0);
    assert_eq!(timer.status, TeeTimeStatus::Available);

    // The read performed the revert
    let current = repo.find(id).await.unwrap().unwrap();
    assert_eq!(current.status, TeeTimeStatus::Available);
    assert!(current.holder_id.is_none());
}

#[tokio::test]
async fn test_timer_unknown_id_is_not_found() {
    let (_repo, _clock, manager) = setup(HoldPolicy::default());
    let err = manager.timer_status(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, ReservationError::NotFound(_)));
}

#[tokio::test]
async fn test_complete_performance_flow() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let id = seed_tee_time(&repo, &clock).await;
    let holder = manager_principal();

    manager.reserve(id, &holder).await.unwrap();
    manager.confirm(id, &holder).await.unwrap();

    let performance = manager
        .complete_performance(id, &holder, 4, 180_000, Some("full flight".to_string()))
        .await
        .unwrap();

    assert_eq!(performance.revenue, 720_000);
    assert_eq!(performance.tee_time_id, id);
    assert_eq!(performance.recorded_by, holder.id);

    let current = repo.find(id).await.unwrap().unwrap();
    assert_eq!(current.status, TeeTimeStatus::Completed);
    assert!(current.completed_at.is_some());

    let stored = repo.find_performance(id).await.unwrap().unwrap();
    assert_eq!(stored.revenue, 720_000);
}

#[tokio::test]
async fn test_complete_performance_is_once_only() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let id = seed_tee_time(&repo, &clock).await;
    let holder = manager_principal();

    manager.reserve(id, &holder).await.unwrap();
    manager.confirm(id, &holder).await.unwrap();
    manager
        .complete_performance(id, &holder, 3, 150_000, None)
        .await
        .unwrap();

    let err = manager
        .complete_performance(id, &holder, 3, 150_000, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReservationError::Conflict { .. } | ReservationError::AlreadyRecorded(_)
    ));
}

#[tokio::test]
async fn test_complete_performance_guards() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let id = seed_tee_time(&repo, &clock).await;
    let holder = manager_principal();

    // Wrong status: still AVAILABLE
    let err = manager
        .complete_performance(id, &holder, 4, 100_000, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::Conflict { .. }));

    manager.reserve(id, &holder).await.unwrap();
    manager.confirm(id, &holder).await.unwrap();

    let member = Principal::new(Uuid::new_v4(), Role::Member, None);
    let err = manager
        .complete_performance(id, &member, 4, 100_000, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::Forbidden(_)));

    let err = manager
        .complete_performance(id, &holder, 0, 100_000, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::Validation(_)));

    let err = manager
        .complete_performance(id, &holder, 4, -1, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ReservationError::Validation(_)));
}

#[tokio::test]
async fn test_sweep_reverts_only_overdue_holds() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let overdue = seed_tee_time(&repo, &clock).await;
    manager.reserve(overdue, &manager_principal()).await.unwrap();

    clock.advance(Duration::seconds(400));
    let fresh = seed_tee_time(&repo, &clock).await;
    manager.reserve(fresh, &manager_principal()).await.unwrap();

    let untouched = seed_tee_time(&repo, &clock).await;

    // 701s for the first hold, 301s for the second
    clock.advance(Duration::seconds(301));
    let swept = manager.sweep_expired().await.unwrap();
    assert_eq!(swept, 1);

    assert_eq!(
        repo.find(overdue).await.unwrap().unwrap().status,
        TeeTimeStatus::Available
    );
    assert_eq!(
        repo.find(fresh).await.unwrap().unwrap().status,
        TeeTimeStatus::Reserved
    );
    assert_eq!(
        repo.find(untouched).await.unwrap().unwrap().status,
        TeeTimeStatus::Available
    );
}

// The end-to-end walk: reserve, let the hold lapse, watch the slot
// come back.
#[tokio::test]
async fn test_hold_lifecycle_scenario() {
    let (repo, clock, manager) = setup(HoldPolicy::default());
    let id = seed_tee_time(&repo, &clock).await;
    let manager_a = Principal::new(Uuid::new_v4(), Role::ExternalManager, None);

    let grant = manager.reserve(id, &manager_a).await.unwrap();
    assert_eq!(grant.tee_time.status, TeeTimeStatus::Reserved);
    assert_eq!(grant.tee_time.holder_id, Some(manager_a.id));
    assert_eq!(
        grant.expires_at,
        grant.tee_time.reserved_at.unwrap() + Duration::seconds(600)
    );

    clock.advance(Duration::seconds(601));

    let err = manager.confirm(id, &manager_a).await.unwrap_err();
    assert!(matches!(err, ReservationError::Expired(_)));

    let current = repo.find(id).await.unwrap().unwrap();
    assert_eq!(current.status, TeeTimeStatus::Available);

    // The slot is reservable again
    let manager_b = Principal::new(Uuid::new_v4(), Role::Partner, None);
    let regrant = manager.reserve(id, &manager_b).await.unwrap();
    assert_eq!(regrant.tee_time.holder_id, Some(manager_b.id));
}
