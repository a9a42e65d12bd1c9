//! Profile and level integration tests
//!
//! Exercise the client trait and the calculator together, the way an editor
//! plugin or status bar would: fetch a profile, derive levels, send a pulse.

use async_trait::async_trait;
use codestats::client::{
    error, Client, CodeStatsClient, Error, LanguageInfo, Pulse, Result, UserProfile,
};
use codestats::xp::{Calculator, XpCalculator};
use mockall::mock;
use mockall::predicate::eq;
use std::collections::HashMap;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mock! {
    pub StatsClient {}

    #[async_trait]
    impl CodeStatsClient for StatsClient {
        async fn get_user_profile(&self, username: &str) -> Result<UserProfile>;
        async fn send_pulse(&self, pulse: &Pulse) -> Result<()>;
    }
}

fn profile(total_xp: i64, languages: &[(&str, i64)]) -> UserProfile {
    UserProfile {
        user: "alice".to_string(),
        total_xp,
        new_xp: 0,
        machines: HashMap::new(),
        languages: languages
            .iter()
            .map(|(name, xps)| (name.to_string(), LanguageInfo { xps: *xps, new_xps: 0 }))
            .collect(),
        dates: HashMap::new(),
    }
}

/// Level summary line for every language, sorted by name
async fn language_levels(
    client: &dyn CodeStatsClient,
    username: &str,
) -> Result<Vec<(String, i32, i64)>> {
    let calc = Calculator::new();
    let profile = client.get_user_profile(username).await?;

    let mut levels: Vec<_> = profile
        .languages
        .iter()
        .map(|(name, info)| {
            (
                name.clone(),
                calc.get_level(info.xps),
                calc.get_xp_for_next_level(info.xps),
            )
        })
        .collect();
    levels.sort();
    Ok(levels)
}

#[tokio::test]
async fn test_levels_from_mocked_profile() {
    let mut client = MockStatsClient::new();
    client
        .expect_get_user_profile()
        .with(eq("alice"))
        .times(1)
        .returning(|_| Ok(profile(6400, &[("Rust", 4000), ("Go", 1600), ("C", 0)])));

    let levels = language_levels(&client, "alice").await.unwrap();

    assert_eq!(
        levels,
        vec![
            ("C".to_string(), 0, 1600),
            ("Go".to_string(), 1, 6400),
            ("Rust".to_string(), 1, 6400),
        ]
    );
}

#[tokio::test]
async fn test_level_lookup_propagates_classified_errors() {
    let mut client = MockStatsClient::new();
    client
        .expect_get_user_profile()
        .returning(|_| Err(Error::UserNotFound));

    let err = language_levels(&client, "ghost").await.unwrap_err();
    assert!(err.is_user_not_found());
    assert!(!error::is_temporary(Some(&err)));
}

#[tokio::test]
async fn test_pulse_through_trait_object() {
    let mut client = MockStatsClient::new();
    client
        .expect_send_pulse()
        .withf(|pulse: &Pulse| pulse.xps.len() == 1 && pulse.xps[0].language == "Rust")
        .times(1)
        .returning(|_| Ok(()));

    let client: Box<dyn CodeStatsClient> = Box::new(client);
    client
        .send_pulse(&Pulse::now().with_xp("Rust", 25))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_profile_progress_against_mock_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "user": "alice",
            "total_xp": 4000,
            "new_xp": 12,
            "machines": {"laptop": {"xps": 4000, "new_xps": 12}},
            "languages": {"Rust": {"xps": 4000, "new_xps": 12}},
            "dates": {"2024-03-01": 4000}
        })))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url("", mock_server.uri()).unwrap();
    let profile = client.get_user_profile("alice").await.unwrap();

    let calc = Calculator::new();
    assert_eq!(calc.get_level(profile.total_xp), 1);
    assert!((calc.get_level_percentage(profile.total_xp) - 0.5).abs() < 0.01);
    assert_eq!(calc.get_xp_for_next_level(profile.total_xp), 6400);
}

#[tokio::test]
async fn test_stale_pulse_never_reaches_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url("token", mock_server.uri()).unwrap();
    let pulse = Pulse::new(chrono::Utc::now() - chrono::Duration::days(8)).with_xp("Rust", 1);

    let err = client.send_pulse(&pulse).await.unwrap_err();
    assert!(matches!(err, Error::PulseTimestampTooOld));
}
