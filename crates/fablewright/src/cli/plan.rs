//! Scene planning command handler.

use super::commands::{OutputFormat, PlanArgs};
use super::output::{emit, read_file, to_json};
use fablewright::{
    FablewrightResult, Scene, StoryError, StoryErrorKind, StyleOverrides, extract_scenes_from_story,
};

/// Plan scenes for a narrative read from `args.file`.
pub fn scenes_for(args: &PlanArgs) -> FablewrightResult<Vec<Scene>> {
    let bytes = read_file(&args.file)?;
    let content = String::from_utf8_lossy(&bytes);

    let scenes = extract_scenes_from_story(
        &content,
        &args.name,
        &args.theme,
        args.description.as_deref(),
        !args.no_character,
        StyleOverrides {
            art_style: args.art_style,
            mood: args.mood,
        },
    );
    if scenes.is_empty() {
        return Err(StoryError::new(StoryErrorKind::NoScenes).into());
    }
    Ok(scenes)
}

/// Print the planned scenes.
pub fn plan_scenes(args: &PlanArgs) -> FablewrightResult<()> {
    let scenes = scenes_for(args)?;

    match args.format {
        OutputFormat::Json => emit(&to_json(&scenes)?, None)?,
        OutputFormat::Human => {
            for scene in &scenes {
                println!(
                    "Scene {} of {} [{} / {}]",
                    scene.index,
                    scenes.len(),
                    scene.art_style,
                    scene.mood
                );
                println!("{:-<80}", "");
                println!("Key moment: {}", scene.key_moment);
                println!();
                println!("{}", scene.illustration_prompt);
                println!();
            }
        }
    }
    Ok(())
}
