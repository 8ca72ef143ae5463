//! Per-item scratch data threaded through a step sequence.

use crate::catalog::CatalogEntry;

/// Created fresh for each catalog item and dropped when the item is done.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    pub item_id: Option<i64>,
    pub display_name: String,
    pub english_name: String,
    /// Target audio file relative to the base directory.
    pub audio_path: String,
    /// Filled by `generate_text`, read by clipboard and typing steps.
    pub generated_text: String,
}

impl ExecutionContext {
    pub fn for_entry(entry: &CatalogEntry) -> Self {
        Self {
            item_id: entry.id,
            display_name: entry.name.trim().to_string(),
            english_name: entry.name_english.trim().to_string(),
            audio_path: entry.audio.trim().to_string(),
            generated_text: String::new(),
        }
    }

    /// Derive the spoken phrase and store it. Returns `false` when a name is missing.
    pub fn generate_text(&mut self) -> bool {
        if self.display_name.is_empty() || self.english_name.is_empty() {
            return false;
        }
        self.generated_text = bilingual_phrase(&self.display_name, &self.english_name);
        true
    }
}

/// The fixed phrase handed to the speech app: native name twice, then the
/// English name four times.
pub fn bilingual_phrase(name: &str, english: &str) -> String {
    format!("{name}{name}{english},{english} {english} {english}。")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrase_format() {
        assert_eq!(
            bilingual_phrase("苹果", "apple"),
            "苹果苹果apple,apple apple apple。"
        );
    }

    #[test]
    fn context_trims_entry_fields() {
        let entry = CatalogEntry {
            id: Some(3),
            name: " 梨 ".into(),
            name_english: "pear ".into(),
            audio: "assets/3.mp3".into(),
        };
        let mut ctx = ExecutionContext::for_entry(&entry);
        assert_eq!(ctx.display_name, "梨");
        assert!(ctx.generate_text());
        assert_eq!(ctx.generated_text, "梨梨pear,pear pear pear。");
    }

    #[test]
    fn generate_requires_both_names() {
        let mut ctx = ExecutionContext {
            display_name: "梨".into(),
            ..Default::default()
        };
        assert!(!ctx.generate_text());
        assert!(ctx.generated_text.is_empty());
    }
}
