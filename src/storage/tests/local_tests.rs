//! Key-value backed repository behaviour.

use super::squad;
use crate::organization::domain::{Contract, Squad};
use crate::shared::{BoardRecord, Collection};
use crate::storage::adapters::local::{KeyValueStore, LocalRepository, MemoryKeyValueStore};
use crate::storage::ports::{RecordRepository, RepositoryError};
use rstest::{fixture, rstest};

type MemoryRepository = LocalRepository<MemoryKeyValueStore>;

#[fixture]
fn repository() -> MemoryRepository {
    LocalRepository::new(MemoryKeyValueStore::new())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_collections_load_empty(repository: MemoryRepository) {
    let squads = RecordRepository::<Squad>::load_all(&repository)
        .await
        .expect("empty store loads");

    assert!(squads.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn temporary_ids_are_stored_in_canonical_form(repository: MemoryRepository) {
    let draft = squad("Core");

    let saved = repository.save(&draft).await.expect("squad saves");

    assert!(draft.id().is_temporary());
    assert!(!saved.id().is_temporary());
    assert_eq!(saved.id(), draft.id().to_canonical());
    let stored = RecordRepository::<Squad>::load_all(&repository)
        .await
        .expect("squads load");
    assert_eq!(stored, [saved]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn saving_twice_replaces_the_stored_record(repository: MemoryRepository) {
    let first = repository.save(&squad("Core")).await.expect("squad saves");
    repository.save(&first).await.expect("squad saves again");
    repository.save(&squad("Mobile")).await.expect("second squad saves");

    let names: Vec<String> = RecordRepository::<Squad>::load_all(&repository)
        .await
        .expect("squads load")
        .iter()
        .map(|stored| stored.name().to_owned())
        .collect();

    assert_eq!(names, ["Core", "Mobile"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_reports_whether_a_record_existed(repository: MemoryRepository) {
    let saved = repository.save(&squad("Core")).await.expect("squad saves");

    let removed = repository.delete(saved.id()).await.expect("delete runs");
    let removed_again = repository.delete(saved.id()).await.expect("delete runs");

    assert!(removed);
    assert!(!removed_again);
    assert!(
        RecordRepository::<Squad>::load_all(&repository)
            .await
            .expect("squads load")
            .is_empty()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mirroring_overwrites_the_collection(repository: MemoryRepository) {
    repository.save(&squad("Core")).await.expect("squad saves");
    let replacement = squad("Mobile").with_id(squad("Mobile").id().to_canonical());

    repository
        .mirror(std::slice::from_ref(&replacement))
        .await
        .expect("mirror writes");

    let stored = RecordRepository::<Squad>::load_all(&repository)
        .await
        .expect("squads load");
    assert_eq!(stored, [replacement]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn undecodable_collections_are_reported_as_corrupt(repository: MemoryRepository) {
    repository
        .store()
        .write(Collection::Squads.storage_key(), "{ not json")
        .expect("raw write");

    let result = RecordRepository::<Squad>::load_all(&repository).await;

    assert!(matches!(
        result,
        Err(RepositoryError::Corrupt {
            collection: "squads",
            ..
        })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn legacy_squads_load_with_migrated_members(repository: MemoryRepository) {
    let legacy = serde_json::json!([{
        "id": "6f1c1a5e-0000-4000-8000-0000000000aa",
        "name": "Core",
        "members": ["Ana", "Bruno"],
        "createdAt": "2025-11-03T10:00:00Z"
    }]);
    repository
        .store()
        .write(Collection::Squads.storage_key(), &legacy.to_string())
        .expect("raw write");

    let squads = RecordRepository::<Squad>::load_all(&repository)
        .await
        .expect("legacy squads load");

    let members = squads.first().map(Squad::members).unwrap_or_default();
    assert_eq!(members.len(), 2);
    assert!(
        members
            .iter()
            .all(|member| *member.contract() == Contract::Unspecified)
    );
}
