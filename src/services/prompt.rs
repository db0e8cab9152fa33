// src/services/prompt.rs
use crate::models::Role;
use uuid::Uuid;

pub const SYSTEM_GUARD: &str = "You are a photo editor. Transform the input photo while preserving \
the person's identity and biometrics. Do not add logos, brands, political symbols or text \
watermarks. Keep the setting Russian; any lettering in the scene must be in Cyrillic only.";

pub fn role_template(role: Role) -> &'static str {
    match role {
        Role::Journalist => {
            "Preserve identity. Russian media setting: newsroom or press area, a 'Пресса' badge \
             in Cyrillic, a microphone without logos. Chest-up portrait, business casual, \
             neutral lighting."
        }
        Role::Blogger => {
            "Preserve identity. Russian everyday setting: home studio, ring light, smartphone on \
             a tripod, smart-casual outfit. Soft light with a little gloss, no brands."
        }
        Role::Photographer => {
            "Preserve identity. Russian street or backstage scene: a camera without logos on \
             the shoulder, camera strap, natural light, honest skin texture. Chest-up portrait."
        }
    }
}

/// Short random tag appended to every instruction so identical inputs never
/// produce byte-identical prompts.
pub fn variation_token() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_string()
}

pub fn user_instruction(role: Role, token: &str) -> String {
    format!(
        "{} Keep the same composition (chest-up portrait), but make unique micro-variations \
         of the background and lighting. Variant #{}.",
        role_template(role),
        token
    )
}
