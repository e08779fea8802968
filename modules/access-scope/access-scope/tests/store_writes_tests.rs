#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use access_scope::domain::error::DomainError;
use access_scope::domain::repo::{RepoError, UserScopeRepository};
use access_scope::domain::resolver::ScopeProfileResolver;
use access_scope::domain::synchronizer::UserScopeSynchronizer;
use access_scope_sdk::{ProfileId, UserId, UserScopeSet};

/// Wraps the seeded user store, counting replaces and optionally failing them.
struct RecordingUsers {
    inner: Arc<dyn UserScopeRepository>,
    replaces: AtomicUsize,
    fail_replace: AtomicBool,
}

impl RecordingUsers {
    fn replaces(&self) -> usize {
        self.replaces.load(Ordering::SeqCst)
    }
}

impl UserScopeRepository for RecordingUsers {
    fn find_user_scope(&self, user_id: &UserId) -> Result<Option<UserScopeSet>, RepoError> {
        self.inner.find_user_scope(user_id)
    }

    fn replace_user_scope(&self, scope: UserScopeSet) -> Result<(), RepoError> {
        if self.fail_replace.load(Ordering::SeqCst) {
            return Err(RepoError::Unavailable("commit rejected".to_owned()));
        }
        self.replaces.fetch_add(1, Ordering::SeqCst);
        self.inner.replace_user_scope(scope)
    }
}

fn synchronizer() -> (Arc<RecordingUsers>, UserScopeSynchronizer) {
    let stores = common::stores();
    let users = Arc::new(RecordingUsers {
        inner: stores.users,
        replaces: AtomicUsize::new(0),
        fail_replace: AtomicBool::new(false),
    });
    let resolver = ScopeProfileResolver::new(stores.profiles);
    let sync = UserScopeSynchronizer::new(resolver, users.clone());
    (users, sync)
}

#[test]
fn each_successful_call_writes_exactly_once() {
    let (users, sync) = synchronizer();
    let carol = UserId::from("carol");
    let regional = ProfileId::from("Regional");

    sync.apply(&carol, &regional).unwrap();
    assert_eq!(users.replaces(), 1);

    sync.apply(&carol, &regional).unwrap();
    assert_eq!(users.replaces(), 2, "re-applying the same profile still commits once");

    sync.apply(&carol, &ProfileId::from("Empty")).unwrap();
    sync.clear(&carol).unwrap();
    assert_eq!(users.replaces(), 4);
}

#[test]
fn failed_calls_never_write() {
    let (users, sync) = synchronizer();
    let carol = UserId::from("carol");

    assert!(sync.apply(&carol, &ProfileId::from("Missing")).is_err());
    assert!(sync.apply(&UserId::from("ghost"), &ProfileId::from("Regional")).is_err());
    sync.clear(&UserId::from("ghost")).unwrap();

    assert_eq!(users.replaces(), 0);
}

#[test]
fn rejected_commit_keeps_previous_set() {
    let (users, sync) = synchronizer();
    let carol = UserId::from("carol");
    let before = sync.current(&carol).unwrap();

    users.fail_replace.store(true, Ordering::SeqCst);
    let err = sync.apply(&carol, &ProfileId::from("Plant-Ops")).unwrap_err();
    assert!(matches!(err, DomainError::Store(RepoError::Unavailable(_))));
    assert!(matches!(sync.clear(&carol), Err(DomainError::Store(_))));

    assert_eq!(sync.current(&carol).unwrap(), before);
    assert_eq!(users.replaces(), 0);

    users.fail_replace.store(false, Ordering::SeqCst);
    sync.apply(&carol, &ProfileId::from("Plant-Ops")).unwrap();
    assert_eq!(users.replaces(), 1);
}
