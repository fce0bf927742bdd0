//! Category button tokens
//!
//! Hardware buttons arrive as `button1`..`button5`, `random` and
//! `selector_change`. A button names a movie family within the active
//! category (sports or music); the candidate filename is
//! `<prefix><n>.mp4` with `n` drawn from the family's variant range.
//!
//! The active category is rolled fresh on every token. Nothing here is
//! kept between calls.

use super::random::RandomSource;
use tracing::debug;

/// Extension shared by every synthesised candidate
pub const CANDIDATE_EXTENSION: &str = "mp4";

/// Movie category selected by the front-panel selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Sports,
    Music,
}

impl Category {
    /// Even coin between the two categories
    pub fn roll(random: &mut dyn RandomSource) -> Self {
        if random.below(2) == 0 {
            Category::Sports
        } else {
            Category::Music
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Category::Sports => Category::Music,
            Category::Music => Category::Sports,
        }
    }

    /// Families in button order
    pub fn families(self) -> &'static [Family; 5] {
        match self {
            Category::Sports => &SPORTS,
            Category::Music => &MUSIC,
        }
    }
}

/// A prefix plus how many numbered variants exist for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Family {
    pub prefix: &'static str,
    pub variants: usize,
}

impl Family {
    const fn new(prefix: &'static str, variants: usize) -> Self {
        Self { prefix, variants }
    }

    /// Candidate filename with a uniformly drawn variant in `1..=variants`
    pub fn candidate(&self, random: &mut dyn RandomSource) -> String {
        let number = random.below(self.variants) + 1;
        format!("{}{}.{}", self.prefix, number, CANDIDATE_EXTENSION)
    }
}

static SPORTS: [Family; 5] = [
    Family::new("baseball", 5),
    Family::new("basketball", 5),
    Family::new("football", 5),
    Family::new("boxing", 5),
    Family::new("intros", 2),
];

static MUSIC: [Family; 5] = [
    Family::new("nineties", 5),
    Family::new("eighties", 5),
    Family::new("seventies", 5),
    Family::new("sixties", 5),
    Family::new("fifties", 5),
];

/// Recognised button keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonToken {
    /// Flip the active category
    SelectorChange,
    /// `button1`..`button5`, stored zero-based
    Button(usize),
    /// Any family of the active category
    Random,
}

impl ButtonToken {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "selector_change" => Some(ButtonToken::SelectorChange),
            "random" => Some(ButtonToken::Random),
            _ => {
                let number: usize = token.strip_prefix("button")?.parse().ok()?;
                (1..=5)
                    .contains(&number)
                    .then_some(ButtonToken::Button(number - 1))
            }
        }
    }
}

/// Candidate movie name for a button token, if it produces one
///
/// `selector_change` flips the category rolled for this call and yields
/// nothing, since no movie is requested.
pub fn candidate_for(token: ButtonToken, random: &mut dyn RandomSource) -> Option<String> {
    let category = Category::roll(random);

    let candidate = match token {
        ButtonToken::SelectorChange => {
            debug!(from = ?category, to = ?category.toggled(), "Selector changed");
            None
        }
        ButtonToken::Button(slot) => Some(category.families()[slot].candidate(random)),
        ButtonToken::Random => {
            let families = category.families();
            let family = &families[random.below(families.len())];
            Some(family.candidate(random))
        }
    };

    if let Some(name) = &candidate {
        debug!(?token, ?category, candidate = %name, "Button candidate");
    }
    candidate
}
