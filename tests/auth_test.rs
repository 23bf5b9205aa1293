//! Authentication tests: password hashing, staff lookup and the login
//! rate limiter.

mod common;

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use chapelle::auth::{password, rate_limit::RateLimiter};
use chapelle::{db, models::staff};
use common::{ADMIN_PASS, ADMIN_USER, setup_test_db};

const TEST_PASSWORD: &str = "password123";

#[test]
fn test_hash_password_success() {
    let hash = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");

    assert!(!hash.is_empty());
    assert!(hash.starts_with("$argon2"));
}

#[test]
fn test_verify_password() {
    let hash = password::hash_password(TEST_PASSWORD).expect("Failed to hash password");

    assert!(password::verify_password(TEST_PASSWORD, &hash).expect("Verification failed"));
    assert!(!password::verify_password("wrongpassword", &hash).expect("Verification failed"));
}

#[test]
fn test_hash_password_randomness() {
    let hash1 = password::hash_password(TEST_PASSWORD).expect("Failed to hash first password");
    let hash2 = password::hash_password(TEST_PASSWORD).expect("Failed to hash second password");

    // Same password should produce different hashes (different salts)
    assert_ne!(hash1, hash2);
    assert!(password::verify_password(TEST_PASSWORD, &hash1).expect("Verification 1 failed"));
    assert!(password::verify_password(TEST_PASSWORD, &hash2).expect("Verification 2 failed"));
}

#[test]
fn test_malformed_hash_is_an_error() {
    assert!(password::verify_password(TEST_PASSWORD, "not-a-hash").is_err());
}

#[test]
fn test_rate_limiter_is_per_ip() {
    let limiter = RateLimiter::new(3, Duration::from_secs(60));
    let a = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
    let b = IpAddr::V6(Ipv6Addr::LOCALHOST);

    for _ in 0..3 {
        limiter.record_failure(a);
    }
    assert!(limiter.is_blocked(a));
    assert!(!limiter.is_blocked(b));

    // Clones share state, as workers do
    let shared = limiter.clone();
    shared.clear(a);
    assert!(!limiter.is_blocked(a));
}

#[test]
fn test_rate_limiter_window_expires() {
    let limiter = RateLimiter::new(1, Duration::from_millis(20));
    let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);

    limiter.record_failure(ip);
    assert!(limiter.is_blocked(ip));
    std::thread::sleep(Duration::from_millis(40));
    assert!(!limiter.is_blocked(ip));
}

#[tokio::test]
async fn test_seed_admin_creates_account_once() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();

    let hash = password::hash_password(ADMIN_PASS).expect("hash");
    db::seed_admin(pool, &hash).await.expect("seed");
    db::seed_admin(pool, &hash).await.expect("seed again");
    assert_eq!(staff::count(pool).await.expect("count"), 1);

    let admin = staff::find_by_username(pool, ADMIN_USER)
        .await
        .expect("lookup")
        .expect("admin exists");
    assert!(password::verify_password(ADMIN_PASS, &admin.password_hash).expect("verify"));

    assert!(staff::find_by_username(pool, "nobody").await.expect("lookup").is_none());
    db.teardown().await;
}
