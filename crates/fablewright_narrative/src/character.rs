//! Character tier resolution and character description synthesis.

use fablewright_core::{AgeBand, Appearance, CharacterTier, ChildIdentity};

const FRIENDLINESS_CLAUSE: &str = "with a warm, friendly smile and bright, expressive eyes";

/// Decide how faithfully the child is rendered in illustrations.
///
/// A photo-derived description outranks chosen appearance attributes, which
/// outrank no character at all.
///
/// # Examples
///
/// ```
/// use fablewright_core::{Appearance, CharacterTier};
/// use fablewright_narrative::determine_character_tier;
///
/// let red = Appearance { hair_color: Some("red".into()), ..Default::default() };
/// assert_eq!(determine_character_tier(Some("a smiling girl"), Some(&red)), CharacterTier::Photo);
/// assert_eq!(determine_character_tier(None, Some(&red)), CharacterTier::Appearance);
///
/// let unset = Appearance { skin_tone: Some("none".into()), ..Default::default() };
/// assert_eq!(determine_character_tier(None, Some(&unset)), CharacterTier::None);
/// assert_eq!(determine_character_tier(None, None), CharacterTier::None);
/// ```
pub fn determine_character_tier(
    ai_description: Option<&str>,
    appearance: Option<&Appearance>,
) -> CharacterTier {
    if ai_description.is_some_and(|d| !d.trim().is_empty()) {
        CharacterTier::Photo
    } else if appearance.is_some_and(Appearance::has_selection) {
        CharacterTier::Appearance
    } else {
        CharacterTier::None
    }
}

fn age_word(band: AgeBand) -> &'static str {
    match band {
        AgeBand::Toddler => "toddler",
        AgeBand::Preschool => "young child",
        AgeBand::EarlyElementary => "child",
        AgeBand::Elementary => "school-age child",
    }
}

/// Build a one-sentence character description from chosen attributes.
///
/// Returns `None` when no attribute is selected.
pub fn describe_appearance(appearance: &Appearance, band: AgeBand) -> Option<String> {
    if !appearance.has_selection() {
        return None;
    }

    let mut description = format!("A {}", age_word(band));
    if let Some(skin) = Appearance::selected(&appearance.skin_tone) {
        description.push_str(&format!(" with {} skin", skin.to_lowercase()));
    }

    let hair = match (
        Appearance::selected(&appearance.hair_color),
        Appearance::selected(&appearance.hair_style),
    ) {
        (Some(color), Some(style)) => Some(format!(
            "{} {} hair",
            style.to_lowercase(),
            color.to_lowercase()
        )),
        (Some(color), None) => Some(format!("{} hair", color.to_lowercase())),
        (None, Some(style)) => Some(format!("{} hair", style.to_lowercase())),
        (None, None) => None,
    };
    if let Some(hair) = hair {
        let joiner = if description.contains(" with ") { " and " } else { " with " };
        description.push_str(joiner);
        description.push_str(&hair);
    }

    description.push_str(", ");
    description.push_str(FRIENDLINESS_CLAUSE);
    description.push('.');
    Some(description)
}

/// Resolved character rendering for one story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterRendering {
    /// Tier that was resolved
    pub tier: CharacterTier,
    /// Description to embed in illustration prompts
    pub description: Option<String>,
}

impl CharacterRendering {
    /// Whether illustrations should draw the child.
    pub fn include_character(&self) -> bool {
        self.tier.includes_character()
    }
}

/// Resolve tier and description from the child's identity data.
///
/// The photo tier uses the description verbatim.
pub fn resolve_character(identity: &ChildIdentity) -> CharacterRendering {
    let tier = determine_character_tier(
        identity.ai_description.as_deref(),
        identity.appearance.as_ref(),
    );
    let description = match tier {
        CharacterTier::Photo => identity.ai_description.as_deref().map(|d| d.trim().to_string()),
        CharacterTier::Appearance => identity
            .appearance
            .as_ref()
            .and_then(|a| describe_appearance(a, AgeBand::from_age(identity.age))),
        CharacterTier::None => None,
    };
    CharacterRendering { tier, description }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appearance(skin: &str, color: &str, style: &str) -> Appearance {
        let pick = |v: &str| (!v.is_empty()).then(|| v.to_string());
        Appearance {
            skin_tone: pick(skin),
            hair_color: pick(color),
            hair_style: pick(style),
        }
    }

    #[test]
    fn test_blank_description_is_not_photo() {
        assert_eq!(
            determine_character_tier(Some("   "), Some(&appearance("", "Brown", ""))),
            CharacterTier::Appearance
        );
    }

    #[test]
    fn test_sentinel_is_case_insensitive() {
        assert_eq!(
            determine_character_tier(None, Some(&appearance("None", "NONE", "none"))),
            CharacterTier::None
        );
    }

    #[test]
    fn test_full_appearance_sentence() {
        let text =
            describe_appearance(&appearance("Medium Brown", "Black", "Curly"), AgeBand::Preschool)
                .unwrap();
        assert_eq!(
            text,
            "A young child with medium brown skin and curly black hair, with a warm, friendly smile and bright, expressive eyes."
        );
    }

    #[test]
    fn test_hair_only_sentence() {
        let text = describe_appearance(&appearance("none", "red", ""), AgeBand::Toddler).unwrap();
        assert!(text.starts_with("A toddler with red hair,"));
    }

    #[test]
    fn test_resolve_photo_verbatim() {
        let identity = ChildIdentity {
            ai_description: Some(" A girl with two puffs of dark hair ".into()),
            appearance: Some(appearance("light", "blond", "")),
            age: Some(4),
        };
        let rendering = resolve_character(&identity);
        assert_eq!(rendering.tier, CharacterTier::Photo);
        assert_eq!(
            rendering.description.as_deref(),
            Some("A girl with two puffs of dark hair")
        );
        assert!(rendering.include_character());
    }

    #[test]
    fn test_resolve_none_disables_character() {
        let rendering = resolve_character(&ChildIdentity::default());
        assert_eq!(rendering.tier, CharacterTier::None);
        assert!(rendering.description.is_none());
        assert!(!rendering.include_character());
    }

    #[test]
    fn test_resolve_appearance_uses_age_band() {
        let identity = ChildIdentity {
            ai_description: None,
            appearance: Some(appearance("", "", "braided")),
            age: Some(9),
        };
        let rendering = resolve_character(&identity);
        assert_eq!(rendering.tier, CharacterTier::Appearance);
        assert!(
            rendering
                .description
                .unwrap()
                .starts_with("A school-age child with braided hair")
        );
    }
}
