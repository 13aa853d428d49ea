// Orchestrator tests against scripted mock providers.

use fablewright_core::{
    Appearance, CharacterTier, ChildIdentity, ChildProfile, ImageInput, StorySubject,
    TextGenerationRequest,
};
use fablewright_error::{FablewrightErrorKind, ProviderErrorKind, StoryErrorKind};
use fablewright_models::ProviderManager;
use fablewright_models::test_utils::{MockBehavior, MockProvider, handles};
use fablewright_narrative::{BookRequest, IllustratedBookOrchestrator, PHOTO_DESCRIPTION_PROMPT};
use std::sync::Arc;

fn five_paragraph_story() -> String {
    [
        "Mia lived in a little blue house at the edge of a quiet town full of gardens.",
        "One evening Mia discovered a tiny silver rocket hiding behind the tomato plants.",
        "The rocket was humming softly, and its door slid open with a friendly little beep.",
        "Mia climbed inside, pressed the glowing green button, and zoomed up past the clouds.",
        "When she landed back home, Mia hugged her cat and told him all about the stars.",
    ]
    .join("\n\n")
}

fn story_request() -> TextGenerationRequest {
    TextGenerationRequest::builder()
        .subject(StorySubject::Single(ChildProfile::new("Mia", ["brave"])))
        .theme("Space")
        .build()
        .unwrap()
}

fn orchestrator(text: &MockProvider, image: &MockProvider) -> IllustratedBookOrchestrator {
    IllustratedBookOrchestrator::new(Arc::new(ProviderManager::new(
        handles(&[text]),
        handles(&[image]),
    )))
}

#[tokio::test(start_paused = true)]
async fn test_full_book() -> anyhow::Result<()> {
    let writer = MockProvider::text("writer", MockBehavior::Succeed(five_paragraph_story()));
    let painter = MockProvider::image("painter", MockBehavior::Succeed("https://img".into()));
    let request = BookRequest::builder().story(story_request()).build()?;

    let book = orchestrator(&writer, &painter)
        .generate_illustrated_book(&request)
        .await?;

    assert_eq!(book.content, five_paragraph_story());
    assert_eq!(book.scenes.len(), 5);
    assert_eq!(book.book_pages.len(), 5);
    assert_eq!(painter.call_count(), 5);
    assert!(book.book_pages.iter().all(|p| p.has_illustration()));
    assert_eq!(book.book_pages[1].text, book.scenes[1].text);

    // The narrative prompt carries the age-band target for the default band
    assert!(writer.prompts()[0].contains("about 400 words"));
    // No character data: scenes are environment-only
    assert!(painter.prompts()[0].contains("no people or characters"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_failed_scenes_are_dropped_and_numbers_kept() -> anyhow::Result<()> {
    let writer = MockProvider::text("writer", MockBehavior::Succeed(five_paragraph_story()));
    let painter = MockProvider::image(
        "painter",
        MockBehavior::FailOnCalls {
            calls: vec![2, 4],
            kind: ProviderErrorKind::BadRequest("content policy".into()),
            output: "https://img".into(),
        },
    );
    let request = BookRequest::builder().story(story_request()).build()?;

    let book = orchestrator(&writer, &painter)
        .generate_illustrated_book(&request)
        .await?;

    let numbers: Vec<usize> = book.book_pages.iter().map(|p| p.page_number).collect();
    assert_eq!(numbers, vec![1, 3, 5]);
    assert!(book.book_pages.iter().all(|p| !p.illustration_url.is_empty()));
    assert_eq!(book.scenes.len(), 5);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_all_illustrations_failing_is_an_error() {
    let writer = MockProvider::text("writer", MockBehavior::Succeed(five_paragraph_story()));
    let painter = MockProvider::image(
        "painter",
        MockBehavior::Fail(ProviderErrorKind::Auth("HTTP 401".into())),
    );
    let request = BookRequest::builder()
        .story(story_request())
        .build()
        .unwrap();

    let err = orchestrator(&writer, &painter)
        .generate_illustrated_book(&request)
        .await
        .unwrap_err();

    match err.kind() {
        FablewrightErrorKind::Story(story) => {
            assert!(matches!(
                story.kind,
                StoryErrorKind::AllIllustrationsFailed { scenes: 5, .. }
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(painter.call_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_empty_image_urls_report_a_reason() {
    let writer = MockProvider::text("writer", MockBehavior::Succeed(five_paragraph_story()));
    let painter = MockProvider::image("painter", MockBehavior::Empty);
    let request = BookRequest::builder()
        .story(story_request())
        .build()
        .unwrap();

    let err = orchestrator(&writer, &painter)
        .generate_illustrated_book(&request)
        .await
        .unwrap_err();

    match err.kind() {
        FablewrightErrorKind::Story(story) => match &story.kind {
            StoryErrorKind::AllIllustrationsFailed { scenes, last_error } => {
                assert_eq!(*scenes, 5);
                assert!(last_error.contains("empty image URL"), "{last_error}");
            }
            other => panic!("unexpected story error: {other}"),
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_no_image_provider_skips_the_narrative() {
    let writer = MockProvider::text("writer", MockBehavior::Succeed(five_paragraph_story()));
    let manager = ProviderManager::new(handles(&[&writer]), vec![]);
    let orchestrator = IllustratedBookOrchestrator::new(Arc::new(manager));
    let request = BookRequest::builder()
        .story(story_request())
        .build()
        .unwrap();

    let err = orchestrator
        .generate_illustrated_book(&request)
        .await
        .unwrap_err();

    match err.kind() {
        FablewrightErrorKind::Provider(e) => {
            assert!(matches!(e.kind(), ProviderErrorKind::NoProviders(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(writer.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_image_provider_skips_the_narrative() {
    let writer = MockProvider::text("writer", MockBehavior::Succeed(five_paragraph_story()));
    let painter =
        MockProvider::image("painter", MockBehavior::Succeed("https://img".into())).unavailable();
    let request = BookRequest::builder()
        .story(story_request())
        .build()
        .unwrap();

    let err = orchestrator(&writer, &painter)
        .generate_illustrated_book(&request)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), FablewrightErrorKind::Provider(_)));
    assert_eq!(writer.call_count(), 0);
    assert_eq!(painter.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_text_failure_propagates() {
    let writer = MockProvider::text(
        "writer",
        MockBehavior::Fail(ProviderErrorKind::Auth("HTTP 403".into())),
    );
    let painter = MockProvider::image("painter", MockBehavior::Succeed("https://img".into()));
    let request = BookRequest::builder()
        .story(story_request())
        .build()
        .unwrap();

    let err = orchestrator(&writer, &painter)
        .generate_illustrated_book(&request)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), FablewrightErrorKind::Provider(_)));
    assert_eq!(painter.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_blank_narrative_is_an_error() {
    let writer = MockProvider::text("writer", MockBehavior::Succeed("  \n\n ".into()));
    let painter = MockProvider::image("painter", MockBehavior::Succeed("https://img".into()));
    let request = BookRequest::builder()
        .story(story_request())
        .build()
        .unwrap();

    let err = orchestrator(&writer, &painter)
        .generate_illustrated_book(&request)
        .await
        .unwrap_err();

    match err.kind() {
        FablewrightErrorKind::Story(story) => {
            assert_eq!(story.kind, StoryErrorKind::EmptyNarrative)
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_appearance_tier_reaches_prompts() -> anyhow::Result<()> {
    let writer = MockProvider::text("writer", MockBehavior::Succeed(five_paragraph_story()));
    let painter = MockProvider::image("painter", MockBehavior::Succeed("https://img".into()));
    let request = BookRequest::builder()
        .story(story_request())
        .child(ChildIdentity {
            ai_description: None,
            appearance: Some(Appearance {
                hair_color: Some("Red".into()),
                ..Default::default()
            }),
            age: Some(7),
        })
        .build()?;

    orchestrator(&writer, &painter)
        .generate_illustrated_book(&request)
        .await?;

    let prompts = painter.prompts();
    assert!(prompts.iter().all(|p| p.contains("A child with red hair")));
    assert!(writer.prompts()[0].contains("about 700 words"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_photo_is_described_before_planning() -> anyhow::Result<()> {
    let writer = MockProvider::vision("writer", MockBehavior::Succeed(five_paragraph_story()));
    let painter = MockProvider::image("painter", MockBehavior::Succeed("https://img".into()));
    let request = BookRequest::builder()
        .story(story_request())
        .photo(ImageInput::Url("https://example.com/mia.jpg".into()))
        .build()?;

    orchestrator(&writer, &painter)
        .generate_illustrated_book(&request)
        .await?;

    // First call writes the story, second describes the photo
    assert_eq!(writer.call_count(), 2);
    assert_eq!(writer.prompts()[1], PHOTO_DESCRIPTION_PROMPT);
    // The mock answers the analysis with the story text, used verbatim as the description
    assert!(painter.prompts()[0].contains("Draw Mia exactly as described"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_photo_failure_falls_back_to_appearance() -> anyhow::Result<()> {
    let writer = MockProvider::text("writer", MockBehavior::Succeed(five_paragraph_story()));
    let painter = MockProvider::image("painter", MockBehavior::Succeed("https://img".into()));
    let orchestrator = orchestrator(&writer, &painter);
    let request = BookRequest::builder()
        .story(story_request())
        .child(ChildIdentity {
            appearance: Some(Appearance {
                hair_style: Some("curly".into()),
                ..Default::default()
            }),
            ..Default::default()
        })
        .photo(ImageInput::Url("https://example.com/mia.jpg".into()))
        .build()?;

    orchestrator.generate_illustrated_book(&request).await?;

    // Text-only provider cannot analyze, so the appearance tier is used
    assert_eq!(writer.call_count(), 1);
    assert!(painter.prompts()[0].contains("curly hair"));

    let identity = ChildIdentity {
        appearance: Some(Appearance {
            hair_style: Some("curly".into()),
            ..Default::default()
        }),
        ..Default::default()
    };
    assert_eq!(
        fablewright_narrative::resolve_character(&identity).tier,
        CharacterTier::Appearance
    );
    Ok(())
}

#[tokio::test]
async fn test_request_without_children_is_rejected() {
    let writer = MockProvider::text("writer", MockBehavior::Succeed("x".into()));
    let painter = MockProvider::image("painter", MockBehavior::Succeed("x".into()));
    let story = TextGenerationRequest::builder()
        .subject(StorySubject::Group(vec![]))
        .theme("Space")
        .build()
        .unwrap();
    let request = BookRequest::builder().story(story).build().unwrap();

    let err = orchestrator(&writer, &painter)
        .generate_illustrated_book(&request)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("at least one child"));
    assert_eq!(writer.call_count(), 0);
}
