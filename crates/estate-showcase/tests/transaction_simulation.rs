use std::time::Duration;

use estate_showcase::listings::{standard_listings, ListingId};
use estate_showcase::transactions::{TransactionDetails, TransactionError, TransactionSession};
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn simulation_walks_pending_confirmed_explorer() {
    let mut session = TransactionSession::new(ListingId(3));
    session.connect_wallet();
    let started = Instant::now();
    let mut arrivals = Vec::new();

    let receipt = session
        .simulate(|log| arrivals.push((started.elapsed(), log.message.clone())))
        .await
        .expect("simulation succeeds");

    assert_eq!(arrivals.len(), 3);
    assert_eq!(arrivals[0], (Duration::ZERO, "Pending...".to_string()));
    assert!(arrivals[1].0 >= Duration::from_secs(2));
    assert!(arrivals[1].0 < Duration::from_millis(2100));
    assert!(arrivals[1].1.starts_with("Confirmed! Tx Hash: 0x"));
    assert!(arrivals[2].0 >= Duration::from_millis(2500));
    assert!(arrivals[2].0 < Duration::from_millis(2600));
    assert_eq!(arrivals[2].1, "View on Sepolia Explorer");

    assert_eq!(receipt.property_id, ListingId(3));
    assert_eq!(receipt.hash.as_str().len(), 66);
    assert_eq!(
        receipt.logs[1].tx_hash.as_ref(),
        Some(&receipt.hash),
        "confirmation carries the full hash"
    );
    assert!(receipt.logs[1].message.ends_with(&receipt.hash.truncated()));
    assert_eq!(
        receipt.logs[2].link.as_deref(),
        Some(receipt.hash.explorer_url().as_str())
    );
    assert!(!session.is_simulating());
    assert_eq!(session.hash(), Some(&receipt.hash));
}

#[tokio::test(start_paused = true)]
async fn rerunning_replaces_previous_results() {
    let mut session = TransactionSession::new(ListingId(1));
    session.connect_wallet();

    let first = session.simulate(|_| {}).await.expect("first run");
    let second = session.simulate(|_| {}).await.expect("second run");

    assert_ne!(first.hash, second.hash);
    assert_eq!(session.logs().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn abandoned_simulation_blocks_until_reset() {
    let mut session = TransactionSession::new(ListingId(5));
    session.connect_wallet();

    let abandoned = tokio::time::timeout(Duration::from_secs(1), session.simulate(|_| {})).await;
    assert!(abandoned.is_err(), "simulation outlives the timeout");
    assert!(session.is_simulating());

    let err = session.simulate(|_| {}).await.expect_err("still running");
    assert_eq!(err, TransactionError::AlreadySimulating);

    session.reset();
    session.connect_wallet();
    session.simulate(|_| {}).await.expect("runs after reset");
}

#[test]
fn details_cover_every_listing() {
    for listing in standard_listings() {
        let details = TransactionDetails::for_property(&listing);
        assert!(details.to.starts_with("0x"));
        assert!(details.to.contains(&format!("Property {} Contract", listing.id)));
        assert!(details.value.ends_with(" Sepolia ETH"));
    }
}
