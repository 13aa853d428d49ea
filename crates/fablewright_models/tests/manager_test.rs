// ProviderManager tests using scripted mock providers.
//
// Time is paused so per-candidate backoff and the fallback deadline
// auto-advance.

use fablewright_core::{
    Capability, Channel, CompletionRequest, ImageGenerationRequest, ImageInput, ImageSize,
};
use fablewright_error::ProviderErrorKind;
use fablewright_models::test_utils::{MockBehavior, MockProvider, handles};
use fablewright_models::{DEFAULT_ANALYSIS_PROMPT, ProviderManager};

fn request() -> CompletionRequest {
    CompletionRequest::from_prompt("Once upon a time")
}

#[tokio::test(start_paused = true)]
async fn test_text_falls_back_to_next_provider() -> anyhow::Result<()> {
    let broken = MockProvider::text(
        "alpha",
        MockBehavior::Fail(ProviderErrorKind::Transient("503".into())),
    );
    let working = MockProvider::text("beta", MockBehavior::Succeed("a story".into()));
    let manager = ProviderManager::new(handles(&[&broken, &working]), vec![]);

    let text = manager.generate_text(&request()).await?;

    assert_eq!(text, "a story");
    // One retry on the transient provider before moving on
    assert_eq!(broken.call_count(), 2);
    assert_eq!(working.call_count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_auth_failure_skips_retry_but_still_falls_back() -> anyhow::Result<()> {
    let rejected = MockProvider::text(
        "alpha",
        MockBehavior::Fail(ProviderErrorKind::Auth("HTTP 401".into())),
    );
    let working = MockProvider::text("beta", MockBehavior::Succeed("ok".into()));
    let manager = ProviderManager::new(handles(&[&rejected, &working]), vec![]);

    assert_eq!(manager.generate_text(&request()).await?, "ok");
    assert_eq!(rejected.call_count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_total_failure_is_tagged_with_last_provider() {
    let first = MockProvider::text(
        "alpha",
        MockBehavior::Fail(ProviderErrorKind::BadRequest("HTTP 400".into())),
    );
    let second = MockProvider::text(
        "beta",
        MockBehavior::Fail(ProviderErrorKind::Auth("HTTP 403".into())),
    );
    let manager = ProviderManager::new(handles(&[&first, &second]), vec![]);

    let err = manager.generate_text(&request()).await.unwrap_err();

    assert!(matches!(
        err.kind(),
        ProviderErrorKind::Exhausted { candidates: 2, .. }
    ));
    assert_eq!(err.provider(), Some("beta"));
}

#[tokio::test]
async fn test_no_text_providers() {
    let manager = ProviderManager::new(vec![], vec![]);
    let err = manager.generate_text(&request()).await.unwrap_err();
    assert!(matches!(err.kind(), ProviderErrorKind::NoProviders(_)));
}

#[tokio::test]
async fn test_unavailable_and_incapable_providers_are_not_candidates() {
    let offline = MockProvider::text("alpha", MockBehavior::Succeed("x".into())).unavailable();
    let painter = MockProvider::image("beta", MockBehavior::Succeed("x".into()));
    let manager = ProviderManager::new(handles(&[&offline, &painter]), vec![]);

    let err = manager.generate_text(&request()).await.unwrap_err();

    assert!(matches!(err.kind(), ProviderErrorKind::NoProviders(_)));
    assert_eq!(offline.call_count(), 0);
    assert_eq!(painter.call_count(), 0);
}

#[tokio::test]
async fn test_analyze_image_requires_capability() {
    let plain = MockProvider::text("alpha", MockBehavior::Succeed("x".into()));
    let manager = ProviderManager::new(handles(&[&plain]), vec![]);

    let err = manager
        .analyze_image(&ImageInput::Url("https://example.com/kid.jpg".into()), None)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), ProviderErrorKind::Unsupported(_)));
    assert_eq!(plain.call_count(), 0);
}

#[tokio::test]
async fn test_analyze_image_uses_default_prompt() -> anyhow::Result<()> {
    let plain = MockProvider::text("alpha", MockBehavior::Succeed("nope".into()));
    let seeing = MockProvider::vision("beta", MockBehavior::Succeed("curly red hair".into()));
    let manager = ProviderManager::new(handles(&[&plain, &seeing]), vec![]);

    let description = manager
        .analyze_image(&ImageInput::Url("https://example.com/kid.jpg".into()), None)
        .await?;

    assert_eq!(description, "curly red hair");
    assert_eq!(plain.call_count(), 0);
    assert_eq!(seeing.prompts(), vec![DEFAULT_ANALYSIS_PROMPT.to_string()]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_images_fall_back_after_deadline() -> anyhow::Result<()> {
    let stuck = MockProvider::image("alpha", MockBehavior::Hang);
    let painter = MockProvider::image("beta", MockBehavior::Succeed("https://img".into()));
    let manager = ProviderManager::new(vec![], handles(&[&stuck, &painter]));

    let started = tokio::time::Instant::now();
    let images = manager
        .generate_images(&ImageGenerationRequest::single("a fox", ImageSize::Landscape))
        .await?;

    assert_eq!(images.len(), 1);
    assert_eq!(images[0].url, "https://img/1.png");
    assert_eq!(started.elapsed().as_secs(), 90);
    Ok(())
}

#[tokio::test]
async fn test_no_image_providers() {
    let manager = ProviderManager::new(
        vec![],
        handles(&[&MockProvider::text("alpha", MockBehavior::Succeed("x".into()))]),
    );
    let err = manager
        .generate_images(&ImageGenerationRequest::single("a fox", ImageSize::Square))
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), ProviderErrorKind::NoProviders(_)));
}

#[test]
fn test_require_checks_availability_and_capability() {
    let writer = MockProvider::text("alpha", MockBehavior::Succeed("x".into()));
    let offline = MockProvider::image("beta", MockBehavior::Succeed("x".into())).unavailable();
    let manager = ProviderManager::new(handles(&[&writer]), handles(&[&offline, &writer]));

    assert!(manager.require(Channel::Text, Capability::Text).is_ok());
    let err = manager
        .require(Channel::Image, Capability::Image)
        .unwrap_err();
    assert!(matches!(err.kind(), ProviderErrorKind::NoProviders(_)));
    assert!(err.to_string().contains("image channel"));
    assert_eq!(writer.call_count() + offline.call_count(), 0);
}

#[test]
fn test_describe_lists_both_channels() {
    let writer = MockProvider::text("alpha", MockBehavior::Succeed("x".into()));
    let painter = MockProvider::image("beta", MockBehavior::Succeed("x".into())).unavailable();
    let manager = ProviderManager::new(handles(&[&writer]), handles(&[&painter]));

    let rows = manager.describe();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0, Channel::Text);
    assert_eq!(rows[0].1.name(), "alpha");
    assert_eq!(rows[1].0, Channel::Image);
    assert!(!rows[1].1.available());
    assert!(rows[0].1.can(Capability::Text));
    assert!(!rows[0].1.can(Capability::Image));
    assert!(!rows[1].1.can(Capability::Image));
}
