//! Art style guides, theme palettes, style selection and mood detection.

use fablewright_core::{ArtStyle, Mood};
use regex::Regex;
use std::sync::LazyLock;

/// Reference description of one art style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtStyleGuide {
    /// Style identifier
    pub style: ArtStyle,
    /// One-line summary
    pub description: &'static str,
    /// Medium and technique
    pub technique: &'static str,
    /// Visual characteristics
    pub characteristics: &'static [&'static str],
    /// Artists whose work sets the reference
    pub reference_artists: &'static [&'static str],
}

static STYLE_GUIDES: [ArtStyleGuide; 4] = [
    ArtStyleGuide {
        style: ArtStyle::ClassicPictureBook,
        description: "timeless children's picture book illustration",
        technique: "gouache and colored pencil with clean outlines",
        characteristics: &[
            "soft rounded shapes",
            "warm saturated colors",
            "clear readable composition",
            "gentle textures",
        ],
        reference_artists: &["Maurice Sendak", "Eric Carle", "Beatrix Potter"],
    },
    ArtStyleGuide {
        style: ArtStyle::Watercolor,
        description: "dreamy watercolor storybook painting",
        technique: "loose transparent watercolor washes on textured paper",
        characteristics: &[
            "soft bleeding edges",
            "luminous light",
            "muted pastel tones",
            "visible paper grain",
        ],
        reference_artists: &["Quentin Blake", "Jon Klassen", "Oliver Jeffers"],
    },
    ArtStyleGuide {
        style: ArtStyle::ModernFlat,
        description: "modern flat vector-style illustration",
        technique: "flat shapes with subtle grain and limited shading",
        characteristics: &[
            "bold geometric forms",
            "bright limited palette",
            "strong silhouettes",
            "playful proportions",
        ],
        reference_artists: &["Mary Blair", "Charley Harper", "Christian Robinson"],
    },
    ArtStyleGuide {
        style: ArtStyle::Whimsical,
        description: "whimsical fairy-tale illustration full of wonder",
        technique: "soft digital painting with glowing highlights",
        characteristics: &[
            "sparkles and gentle glow",
            "curving playful lines",
            "rich jewel tones",
            "tiny hidden details",
        ],
        reference_artists: &["Mary GrandPré", "Brian Froud", "Kay Nielsen"],
    },
];

/// Guide for a style.
pub fn art_style_guide(style: ArtStyle) -> &'static ArtStyleGuide {
    STYLE_GUIDES
        .iter()
        .find(|g| g.style == style)
        .unwrap_or(&STYLE_GUIDES[0])
}

/// Color direction for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    /// Dominant colors
    pub primary: &'static str,
    /// Supporting colors
    pub secondary: &'static str,
    /// Highlight colors
    pub accent: &'static str,
    /// Background treatment
    pub background: &'static str,
    /// Lighting direction
    pub lighting: &'static str,
    /// Overall feeling
    pub mood: &'static str,
}

const FANTASY_PALETTE: ColorPalette = ColorPalette {
    primary: "lavender and rose pink",
    secondary: "soft teal and mint",
    accent: "sparkling gold",
    background: "misty pastel sky",
    lighting: "magical glowing light",
    mood: "enchanted and wondrous",
};

const PALETTES: &[(&str, ColorPalette)] = &[
    ("fantasy", FANTASY_PALETTE),
    (
        "magic",
        ColorPalette {
            primary: "deep violet and midnight blue",
            secondary: "silver and periwinkle",
            accent: "glowing starlight gold",
            background: "twinkling twilight",
            lighting: "shimmering spell light",
            mood: "mysterious and delightful",
        },
    ),
    (
        "space",
        ColorPalette {
            primary: "deep navy and indigo",
            secondary: "cool purple and teal",
            accent: "bright star white and rocket orange",
            background: "starry night sky with planets",
            lighting: "soft glow from stars and planets",
            mood: "awe-inspiring and adventurous",
        },
    ),
    (
        "ocean",
        ColorPalette {
            primary: "turquoise and aqua",
            secondary: "sandy beige and coral",
            accent: "sunny yellow",
            background: "sparkling water and sky",
            lighting: "bright sunlight dancing on water",
            mood: "fresh and playful",
        },
    ),
    (
        "forest",
        ColorPalette {
            primary: "leafy green and moss",
            secondary: "warm brown and ochre",
            accent: "berry red and flower yellow",
            background: "layered trees and dappled light",
            lighting: "sunbeams through the canopy",
            mood: "peaceful and curious",
        },
    ),
    (
        "dinosaurs",
        ColorPalette {
            primary: "jungle green and earthy olive",
            secondary: "warm terracotta",
            accent: "volcano orange",
            background: "prehistoric ferns and distant volcanoes",
            lighting: "warm golden afternoon",
            mood: "exciting and bold",
        },
    ),
    (
        "robots",
        ColorPalette {
            primary: "bright cobalt and silver",
            secondary: "cool gray and white",
            accent: "neon green and signal red",
            background: "clean futuristic workshop",
            lighting: "crisp even light with glowing panels",
            mood: "inventive and cheerful",
        },
    ),
    (
        "superhero",
        ColorPalette {
            primary: "bold red and royal blue",
            secondary: "sunny yellow",
            accent: "white highlights",
            background: "city skyline",
            lighting: "dramatic but friendly daylight",
            mood: "heroic and energetic",
        },
    ),
    (
        "animals",
        ColorPalette {
            primary: "warm browns and meadow green",
            secondary: "sky blue",
            accent: "flower pinks",
            background: "open meadow",
            lighting: "soft morning light",
            mood: "friendly and gentle",
        },
    ),
];

/// Palette for a theme, defaulting to the fantasy palette.
pub fn color_palette(theme: &str) -> &'static ColorPalette {
    let theme = theme.trim().to_lowercase();
    PALETTES
        .iter()
        .find(|(key, _)| theme == *key || theme.contains(key))
        .map(|(_, palette)| palette)
        .unwrap_or(&FANTASY_PALETTE)
}

fn theme_has(theme: &str, words: &[&str]) -> bool {
    let theme = theme.to_lowercase();
    words.iter().any(|w| theme.contains(w))
}

/// Pick the art style for a story.
///
/// Calm or cozy moods win first, then fantasy themes or a magical mood, then
/// robot and superhero themes.
///
/// # Examples
///
/// ```
/// use fablewright_core::{ArtStyle, Mood};
/// use fablewright_narrative::select_art_style;
///
/// assert_eq!(select_art_style("Fantasy", Mood::Cozy), ArtStyle::Watercolor);
/// assert_eq!(select_art_style("Fantasy", Mood::Exciting), ArtStyle::Whimsical);
/// assert_eq!(select_art_style("Robots", Mood::Exciting), ArtStyle::ModernFlat);
/// assert_eq!(select_art_style("Ocean", Mood::Adventurous), ArtStyle::ClassicPictureBook);
/// ```
pub fn select_art_style(theme: &str, mood: Mood) -> ArtStyle {
    match mood {
        Mood::Calm | Mood::Cozy => ArtStyle::Watercolor,
        Mood::Magical => ArtStyle::Whimsical,
        _ if theme_has(theme, &["fantasy", "magic"]) => ArtStyle::Whimsical,
        _ if theme_has(theme, &["robot", "superhero"]) => ArtStyle::ModernFlat,
        _ => ArtStyle::ClassicPictureBook,
    }
}

const MOOD_KEYWORDS: &[(Mood, &[&str])] = &[
    (
        Mood::Calm,
        &["quiet", "gentle", "peace", "calm", "soft", "still", "rest", "slow"],
    ),
    (
        Mood::Magical,
        &["magic", "sparkl", "glow", "enchant", "wizard", "fairy", "spell", "shimmer"],
    ),
    (
        Mood::Exciting,
        &["race", "racing", "fast", "zoom", "jump", "leap", "rush", "shout", "cheer"],
    ),
    (
        Mood::Adventurous,
        &["explor", "journey", "climb", "discover", "map", "treasure", "mountain", "cave"],
    ),
    (
        Mood::Cozy,
        &["warm", "blanket", "snug", "hug", "home", "cocoa", "bed", "fire"],
    ),
];

// Each bucket matches any word starting with one of its stems.
static MOOD_PATTERNS: LazyLock<Vec<(Mood, Regex)>> = LazyLock::new(|| {
    MOOD_KEYWORDS
        .iter()
        .filter_map(|(mood, stems)| {
            Regex::new(&format!(r"(?i)\b(?:{})\w*", stems.join("|")))
                .ok()
                .map(|pattern| (*mood, pattern))
        })
        .collect()
});

/// Classify a scene's mood from keyword buckets.
///
/// Buckets are tested in the order calm, magical, exciting, adventurous,
/// cozy. Nothing matching means exciting.
pub fn determine_mood_from_scene(text: &str) -> Mood {
    MOOD_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(mood, _)| *mood)
        .unwrap_or(Mood::Exciting)
}
