//! Prompt preview command handler.

use super::commands::StoryArgs;
use fablewright::completion_for;

/// Print the system instruction and narrative prompt for a story.
pub fn print_prompt(args: &StoryArgs) {
    let completion = completion_for(&args.request(), args.band());

    if let Some(system) = &completion.system {
        println!("# System\n{}\n", system);
    }
    println!("# Prompt\n{}", completion.prompt);
    println!(
        "\n# Parameters\nmax_tokens = {}\ntemperature = {}",
        completion.max_tokens,
        completion
            .temperature
            .map(|t| t.to_string())
            .unwrap_or_else(|| "provider default".to_string())
    );
}
