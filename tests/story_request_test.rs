//! Story request handling from raw body to message count, the way an HTTP
//! handler would use it.

use chatwatch::story::{require_method, ApiError, StoryLength, StoryRequest};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn handle(method: &str, body: &str) -> Result<(StoryLength, u32), ApiError> {
    require_method(method, "POST")?;
    let request = StoryRequest::from_json(body)?.validate()?;
    let mut rng = ChaCha8Rng::seed_from_u64(body.len() as u64);
    let count = request.roll_message_count(&mut rng);
    Ok((request.length, count))
}

#[test]
fn test_full_request_flow() {
    let (length, count) =
        handle("POST", r#"{"genre":"thriller","storyPrompt":"a locked phone","length":"long"}"#)
            .unwrap();
    assert_eq!(length, StoryLength::Long);
    assert!((20..=30).contains(&count));
}

#[test]
fn test_length_defaults_to_medium() {
    let (length, count) = handle("post", r#"{"genre":"romance"}"#).unwrap();
    assert_eq!(length, StoryLength::Medium);
    assert!((12..=18).contains(&count));
}

#[test]
fn test_prompt_alone_is_enough() {
    let (length, _) = handle("POST", r#"{"storyPrompt":"two exes","length":"SHORT"}"#).unwrap();
    assert_eq!(length, StoryLength::Short);
}

#[test]
fn test_wrong_method_is_405() {
    let err = handle("GET", r#"{"genre":"horror"}"#).unwrap_err();
    assert_eq!(err.status(), 405);
    assert_eq!(err.body().error, "Method GET not allowed");
}

#[test]
fn test_missing_fields_is_400() {
    let err = handle("POST", r#"{"genre":"   ","length":"short"}"#).unwrap_err();
    assert_eq!(err.status(), 400);
    assert!(err.body().details.is_none());
}

#[test]
fn test_malformed_body_is_400() {
    let err = handle("POST", "genre=horror").unwrap_err();
    assert_eq!(err.status(), 400);
}

#[test]
fn test_unknown_length_is_400() {
    let err = handle("POST", r#"{"genre":"horror","length":"epic"}"#).unwrap_err();
    assert_eq!(err.status(), 400);
    assert!(err.to_string().contains("epic"));
}

#[test]
fn test_internal_error_body_carries_details() {
    let err = ApiError::internal("Failed to generate story", "upstream timed out");
    let json = serde_json::to_value(err.body()).unwrap();
    assert_eq!(json["error"], "Failed to generate story");
    assert_eq!(json["details"], "upstream timed out");
    assert_eq!(err.status(), 500);
}

#[test]
fn test_counts_cover_whole_range() {
    let request = StoryRequest {
        genre: Some("drama".into()),
        ..Default::default()
    }
    .validate()
    .unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut seen = std::collections::BTreeSet::new();
    for _ in 0..500 {
        seen.insert(request.roll_message_count(&mut rng));
    }
    assert_eq!(seen.into_iter().collect::<Vec<_>>(), (12..=18).collect::<Vec<u32>>());
}
