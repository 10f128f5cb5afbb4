//! In-memory session store semantics.

use std::sync::Arc;

use crate::conversation::adapters::memory::InMemorySessionStore;
use crate::conversation::domain::{PendingProposal, ProposalKey};
use crate::conversation::ports::SessionStore;
use crate::task::domain::{ChatId, MessageId};
use crate::test_support::ManualClock;
use chrono::Duration;
use eyre::ensure;
use rstest::{fixture, rstest};

struct Fixture {
    clock: Arc<ManualClock>,
    store: InMemorySessionStore<ProposalKey, PendingProposal>,
}

#[fixture]
fn fixture() -> Fixture {
    let clock = Arc::new(ManualClock::midweek());
    let store = InMemorySessionStore::new(clock.clone());
    Fixture { clock, store }
}

fn key(message_id: i64) -> ProposalKey {
    ProposalKey::new(ChatId::new(-42), MessageId::new(message_id))
}

fn proposal(title: &str) -> PendingProposal {
    PendingProposal {
        title: title.to_owned(),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn entries_expire_after_their_ttl(fixture: Fixture) -> eyre::Result<()> {
    let Fixture { clock, store } = fixture;
    store
        .set(key(1), proposal("Починить CI"), Some(Duration::minutes(5)))
        .await?;

    clock.advance(Duration::minutes(4));
    ensure!(store.get(&key(1)).await? == Some(proposal("Починить CI")));

    clock.advance(Duration::minutes(1));
    ensure!(store.get(&key(1)).await?.is_none());
    ensure!(store.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn take_hands_the_value_out_once(fixture: Fixture) -> eyre::Result<()> {
    let store = fixture.store;
    store.set(key(2), proposal("Обновить доку"), None).await?;

    ensure!(store.take(&key(2)).await? == Some(proposal("Обновить доку")));
    ensure!(store.take(&key(2)).await?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn expired_entries_are_not_taken_or_deleted(fixture: Fixture) -> eyre::Result<()> {
    let Fixture { clock, store } = fixture;
    store
        .set(key(3), proposal("Старое"), Some(Duration::minutes(1)))
        .await?;
    clock.advance(Duration::minutes(2));

    ensure!(store.take(&key(3)).await?.is_none());
    store
        .set(key(4), proposal("Тоже старое"), Some(Duration::minutes(1)))
        .await?;
    clock.advance(Duration::minutes(2));
    ensure!(!store.delete(&key(4)).await?);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn set_replaces_and_purge_drops_only_expired(fixture: Fixture) -> eyre::Result<()> {
    let Fixture { clock, store } = fixture;
    store.set(key(5), proposal("первое"), None).await?;
    store.set(key(5), proposal("второе"), None).await?;
    store
        .set(key(6), proposal("короткое"), Some(Duration::seconds(30)))
        .await?;
    clock.advance(Duration::minutes(1));

    ensure!(store.purge_expired()? == 1);
    ensure!(store.len() == 1);
    ensure!(store.get(&key(5)).await? == Some(proposal("второе")));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn distinct_keys_do_not_interfere(fixture: Fixture) -> eyre::Result<()> {
    let store = fixture.store;
    store.set(key(7), proposal("a"), None).await?;
    store.set(key(8), proposal("b"), None).await?;

    ensure!(store.delete(&key(7)).await?);
    ensure!(store.get(&key(8)).await? == Some(proposal("b")));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn writes_sweep_abandoned_entries(fixture: Fixture) -> eyre::Result<()> {
    let Fixture { clock, store } = fixture;
    for message_id in 0..200 {
        store
            .set(key(message_id), proposal("брошенное"), Some(Duration::minutes(30)))
            .await?;
    }
    ensure!(store.len() == 200);
    clock.advance(Duration::days(30));

    store.set(key(1_000), proposal("свежее"), Some(Duration::minutes(30))).await?;

    ensure!(store.len() == 1, "{} entries survived the sweep", store.len());
    ensure!(store.get(&key(1_000)).await? == Some(proposal("свежее")));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sweeps_run_at_most_once_a_minute(fixture: Fixture) -> eyre::Result<()> {
    let Fixture { clock, store } = fixture;
    store.set(key(1), proposal("живое"), None).await?;
    store
        .set(key(2), proposal("короткое"), Some(Duration::seconds(10)))
        .await?;
    clock.advance(Duration::seconds(20));

    store.set(key(3), proposal("ещё"), None).await?;
    ensure!(store.len() == 3, "expired entry should wait for the next sweep");

    clock.advance(Duration::minutes(1));
    ensure!(!store.delete(&key(4)).await?);
    ensure!(store.len() == 2, "due sweep should drop the expired entry");
    Ok(())
}
