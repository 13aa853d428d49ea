// Scene planning properties across the split strategies.

use fablewright_core::{ArtStyle, Mood};
use fablewright_narrative::{
    MAX_PROMPT_CHARS, MAX_SCENES, MIN_SCENES, StyleOverrides, extract_scenes_from_story,
};

fn paragraphs(count: usize) -> String {
    (1..=count)
        .map(|i| {
            format!(
                "In part {} of the journey, Ava was racing across the dunes toward the old lighthouse.",
                i
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[test]
fn test_scene_count_is_between_five_and_seven() {
    for count in [5, 6, 7, 9, 12] {
        let scenes = extract_scenes_from_story(
            &paragraphs(count),
            "Ava",
            "Adventure",
            None,
            true,
            StyleOverrides::default(),
        );
        assert!(
            (MIN_SCENES..=MAX_SCENES).contains(&scenes.len()),
            "{} paragraphs gave {} scenes",
            count,
            scenes.len()
        );
    }
}

#[test]
fn test_indices_are_one_based_and_contiguous() {
    let scenes = extract_scenes_from_story(
        &paragraphs(6),
        "Ava",
        "Adventure",
        None,
        true,
        StyleOverrides::default(),
    );
    let indices: Vec<usize> = scenes.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);
    assert!(scenes[5].illustration_prompt.contains("illustration 6 of 6"));
}

#[test]
fn test_single_long_paragraph_falls_back_to_five_chunks() {
    let story = "Ava and her dog walked along the quiet river and counted the ducks ".repeat(5);
    assert!(story.len() > 250);

    let scenes = extract_scenes_from_story(
        &story,
        "Ava",
        "Nature",
        None,
        true,
        StyleOverrides::default(),
    );

    assert_eq!(scenes.len(), 5);
    let words: usize = scenes.iter().map(|s| s.text.split_whitespace().count()).sum();
    assert_eq!(words, story.split_whitespace().count());
}

#[test]
fn test_one_art_style_for_every_scene() {
    // Moods differ per paragraph but the style must not
    let story = [
        "Ava tiptoed through the quiet, sleepy garden as the soft moonlight settled on the roses.",
        "Suddenly a sparkling fairy appeared with a shimmering wand and a trail of glittering stars.",
        "Ava was running and racing after the fairy, laughing as they zoomed over the hedge.",
        "They climbed a mountain and explored a secret cave full of brave old explorers' maps.",
        "At last Ava snuggled under a warm blanket by the cozy fire with a mug of cocoa.",
    ]
    .join("\n\n");

    let scenes = extract_scenes_from_story(
        &story,
        "Ava",
        "Garden",
        None,
        true,
        StyleOverrides::default(),
    );

    assert_eq!(scenes.len(), 5);
    assert!(scenes.iter().all(|s| s.art_style == scenes[0].art_style));
    let moods: Vec<Mood> = scenes.iter().map(|s| s.mood).collect();
    assert!(moods.windows(2).any(|w| w[0] != w[1]));
}

#[test]
fn test_overrides_apply_to_every_scene() {
    let overrides = StyleOverrides::default()
        .with_art_style(ArtStyle::Watercolor)
        .with_mood(Mood::Calm);

    let scenes = extract_scenes_from_story(
        &paragraphs(5),
        "Ava",
        "Robots",
        None,
        true,
        overrides,
    );

    assert!(scenes.iter().all(|s| s.art_style == ArtStyle::Watercolor));
    assert!(scenes.iter().all(|s| s.mood == Mood::Calm));
}

#[test]
fn test_planning_is_deterministic() {
    let story = paragraphs(7);
    let first = extract_scenes_from_story(
        &story,
        "Ava",
        "Space",
        Some("A child with red hair."),
        true,
        StyleOverrides::default(),
    );
    let second = extract_scenes_from_story(
        &story,
        "Ava",
        "Space",
        Some("A child with red hair."),
        true,
        StyleOverrides::default(),
    );
    assert_eq!(first, second);
}

#[test]
fn test_environment_only_prompts_omit_the_child() {
    let scenes = extract_scenes_from_story(
        &paragraphs(5),
        "Ava",
        "Desert",
        None,
        false,
        StyleOverrides::default(),
    );
    for scene in &scenes {
        assert!(!scene.illustration_prompt.contains("Ava"));
        assert!(scene.illustration_prompt.chars().count() <= MAX_PROMPT_CHARS);
    }
}

#[test]
fn test_blank_story_has_no_scenes() {
    let scenes = extract_scenes_from_story(
        "   \n\n  ",
        "Ava",
        "Space",
        None,
        true,
        StyleOverrides::default(),
    );
    assert!(scenes.is_empty());
}
