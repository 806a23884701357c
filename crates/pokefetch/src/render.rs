//! Pure mapping from a lookup result to what the display area shows

use pokefetch_api::{LookupResult, SPRITE_LABELS};
use serde::Serialize;

/// Structured description of a creature card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    /// `#006`
    pub number: String,
    pub name: String,
    /// One badge per type, in received order
    pub types: Vec<String>,
    /// `1.7m`
    pub height: String,
    /// `6.9kg`
    pub weight: String,
    pub experience: String,
    pub sprites: Vec<SpriteSlot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpriteSlot {
    pub label: &'static str,
    /// None renders as an empty slot
    pub url: Option<String>,
}

/// What the display area currently holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Display {
    #[default]
    Empty,
    Card(CardView),
    Error(String),
}

/// Build the card for a lookup result
pub fn render(result: &LookupResult) -> CardView {
    CardView {
        number: format!("#{:03}", result.id),
        name: capitalize(&result.name),
        types: result.type_names().map(str::to_string).collect(),
        height: format!("{}m", format_tenths(result.height)),
        weight: format!("{}kg", format_tenths(result.weight)),
        experience: result
            .base_experience
            .map(|xp| xp.to_string())
            .unwrap_or_else(|| "-".to_string()),
        sprites: result
            .sprites
            .slots()
            .into_iter()
            .map(|(label, url)| SpriteSlot {
                label,
                url: url.map(str::to_string),
            })
            .collect(),
    }
}

/// The error block: the message text and nothing else
pub fn render_error(message: &str) -> Display {
    Display::Error(message.to_string())
}

/// `17` -> `1.7`, `20` -> `2`, `7` -> `0.7`
fn format_tenths(raw: u32) -> String {
    let (whole, tenth) = (raw / 10, raw % 10);
    if tenth == 0 {
        whole.to_string()
    } else {
        format!("{}.{}", whole, tenth)
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl CardView {
    /// Plain-text layout used by the one-shot `lookup` command
    pub fn to_text(&self) -> String {
        let badges = self
            .types
            .iter()
            .map(|t| format!("[{}]", t.to_uppercase()))
            .collect::<Vec<_>>()
            .join(" ");

        let mut out = format!("{} {}\n", self.number, self.name);
        out.push_str(&badges);
        out.push('\n');
        out.push_str(&format!(
            "Height {}  Weight {}  XP {}\n",
            self.height, self.weight, self.experience
        ));

        let label_width = SPRITE_LABELS.iter().map(|l| l.len()).max().unwrap_or(0);
        for slot in &self.sprites {
            out.push_str(&format!(
                "{:<width$}  {}\n",
                slot.label,
                slot.url.as_deref().unwrap_or("(no image)"),
                width = label_width
            ));
        }
        out
    }
}
