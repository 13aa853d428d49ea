//! CLI command definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use fablewright::{
    AgeBand, Appearance, ArtStyle, ChildIdentity, ChildProfile, ImageSize, Mood, StorySubject,
    StyleOverrides, TextGenerationRequest,
};
use std::path::PathBuf;

/// Fablewright - personalised illustrated children's stories
#[derive(Parser, Debug)]
#[command(name = "fablewright")]
#[command(about = "Generate personalised illustrated children's stories", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file layered over the bundled defaults, replacing the usual search
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a story and illustrate every scene
    Generate(GenerateArgs),

    /// Print the narrative prompt without calling any provider
    Prompt(StoryArgs),

    /// Split a narrative file into scenes and print their illustration prompts
    Plan(PlanArgs),

    /// List configured providers with capabilities and availability
    Providers {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
}

/// Story parameters shared by `generate` and `prompt`.
#[derive(Args, Debug, Clone)]
pub struct StoryArgs {
    /// Child as NAME or NAME=adjective,adjective; repeat for a group story
    #[arg(long = "child", required = true, value_parser = parse_child)]
    pub children: Vec<ChildProfile>,

    /// Story theme, e.g. Space or Dinosaurs
    #[arg(long)]
    pub theme: String,

    /// Lesson the story should convey
    #[arg(long)]
    pub moral: Option<String>,

    /// Story template (bedtime, adventure, friendship, learning)
    #[arg(long)]
    pub template: Option<String>,

    /// Child's age in years, selecting length and vocabulary
    #[arg(long)]
    pub age: Option<u8>,

    /// Send this prompt verbatim instead of the built one
    #[arg(long)]
    pub prompt_override: Option<String>,
}

impl StoryArgs {
    /// Story request for these arguments.
    pub fn request(&self) -> TextGenerationRequest {
        let subject = match self.children.as_slice() {
            [only] => StorySubject::Single(only.clone()),
            children => StorySubject::Group(children.to_vec()),
        };
        TextGenerationRequest {
            subject,
            theme: self.theme.clone(),
            moral: self.moral.clone(),
            template_id: self.template.clone(),
            prompt_override: self.prompt_override.clone(),
        }
    }

    /// Reading-age band for the given age.
    pub fn band(&self) -> AgeBand {
        AgeBand::from_age(self.age)
    }
}

/// Arguments for `generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub story: StoryArgs,

    /// Known description of the child's appearance
    #[arg(long)]
    pub description: Option<String>,

    /// Skin tone, or "none"
    #[arg(long)]
    pub skin_tone: Option<String>,

    /// Hair color, or "none"
    #[arg(long)]
    pub hair_color: Option<String>,

    /// Hair style, or "none"
    #[arg(long)]
    pub hair_style: Option<String>,

    /// Photo of the child as a URL or local file; described once, never stored
    #[arg(long)]
    pub photo: Option<String>,

    /// Art style for every scene
    #[arg(long)]
    pub art_style: Option<ArtStyle>,

    /// Mood for every scene
    #[arg(long)]
    pub mood: Option<Mood>,

    /// Illustration shape (square, portrait, landscape)
    #[arg(long, default_value = "square")]
    pub size: ImageSize,

    /// Write the book JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    /// Identity data from the appearance flags.
    pub fn identity(&self) -> ChildIdentity {
        let appearance = Appearance {
            skin_tone: self.skin_tone.clone(),
            hair_color: self.hair_color.clone(),
            hair_style: self.hair_style.clone(),
        };
        ChildIdentity {
            ai_description: self.description.clone(),
            appearance: (appearance != Appearance::default()).then_some(appearance),
            age: self.story.age,
        }
    }

    /// Story-wide style overrides.
    pub fn overrides(&self) -> StyleOverrides {
        StyleOverrides {
            art_style: self.art_style,
            mood: self.mood,
        }
    }
}

/// Arguments for `plan`.
#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Narrative text file
    pub file: PathBuf,

    /// Child name, or names joined as they appear in the story
    #[arg(long)]
    pub name: String,

    /// Story theme
    #[arg(long)]
    pub theme: String,

    /// Character description to draw
    #[arg(long)]
    pub description: Option<String>,

    /// Environment-only illustrations
    #[arg(long)]
    pub no_character: bool,

    /// Art style for every scene
    #[arg(long)]
    pub art_style: Option<ArtStyle>,

    /// Mood for every scene
    #[arg(long)]
    pub mood: Option<Mood>,

    /// Output format
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

/// Parse `NAME` or `NAME=adjective,adjective`.
pub fn parse_child(raw: &str) -> Result<ChildProfile, String> {
    let (name, adjectives) = match raw.split_once('=') {
        Some((name, adjectives)) => (name, adjectives),
        None => (raw, ""),
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("child name is empty in '{}'", raw));
    }
    let adjectives = adjectives
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty());
    Ok(ChildProfile::new(name, adjectives))
}
