// Facade re-export and telemetry tests.

use fablewright::telemetry::{DEFAULT_FILTER, VERBOSE_FILTER, env_filter};
use fablewright::{
    AgeBand, ChildProfile, FablewrightConfig, ProviderManager, StorySubject, StyleOverrides,
    TextGenerationRequest, build_story_prompt, extract_scenes_from_story,
};

#[test]
fn test_pure_pipeline_through_facade() -> anyhow::Result<()> {
    let request = TextGenerationRequest::builder()
        .subject(StorySubject::Single(ChildProfile::new("Noor", ["gentle"])))
        .theme("Bedtime")
        .template_id("bedtime")
        .build()?;
    let prompt = build_story_prompt(&request, AgeBand::Toddler);
    assert!(prompt.contains("Noor"));
    assert!(prompt.contains("about 200 words"));

    let story = "Noor yawned and hugged her soft bunny under the warm, glowing night light. "
        .repeat(5);
    let scenes = extract_scenes_from_story(
        &story,
        "Noor",
        "Bedtime",
        None,
        true,
        StyleOverrides::default(),
    );
    assert_eq!(scenes.len(), 5);
    Ok(())
}

#[test]
fn test_bundled_config_builds_a_manager() -> anyhow::Result<()> {
    let config = FablewrightConfig::bundled()?;
    let manager = ProviderManager::from_config(&config);
    // Every configured provider is either usable or reported as skipped
    let listed = manager.describe().len();
    assert_eq!(
        listed,
        config.text_providers().len() + config.image_providers().len()
    );
    Ok(())
}

#[test]
fn test_filters_parse() {
    assert_ne!(DEFAULT_FILTER, VERBOSE_FILTER);
    // Either RUST_LOG or the fallback must produce a usable filter
    let _ = env_filter(false);
    let _ = env_filter(true);
}
