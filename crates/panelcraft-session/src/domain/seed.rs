//! The fixed introductory scene every story starts from.

use panelcraft_core::story::StoryPart;

/// Illustration shown with the introductory scene.
pub const SEED_IMAGE_URL: &str = "https://storage.googleapis.com/generative-ai-story/hulk.png";

/// Introductory scene text, also used as the start prompt's seed.
pub const SEED_SCENE: &str = "Hulk, enfurecido, acaba de esmagar um laptop em uma cidade em \
ruínas. Ele ruge, \"HULK JÁ APAGOU TUDO E AINDA ESTÁ LENTO!\"";

/// Scene text and illustration a session is seeded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorySeed {
    /// Scene description.
    pub scene: String,
    /// Illustration URL.
    pub image_url: String,
}

impl StorySeed {
    /// The transcript entry the seed renders as.
    #[must_use]
    pub fn to_part(&self) -> StoryPart {
        StoryPart::narrative(self.scene.clone(), self.image_url.clone())
    }
}

impl Default for StorySeed {
    fn default() -> Self {
        Self {
            scene: SEED_SCENE.to_owned(),
            image_url: SEED_IMAGE_URL.to_owned(),
        }
    }
}
