use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MODEL_TYPE_PLACEHOLDER: &str = "{model_type}";

const DEFAULT_NEGATIVE_PROMPT: &str = "(deformed iris, deformed pupils, semi-realistic, cgi, 3d, render, sketch, cartoon, drawing, anime:1.4), text, close up, cropped, out of frame, worst quality, low quality, jpeg artifacts, ugly, duplicate, mutilated, extra fingers, mutated hands, poorly drawn hands, poorly drawn face, mutation, deformed, blurry, dehydrated, bad anatomy, bad proportions, extra limbs, cloned face, disfigured, gross proportions, malformed limbs, missing arms, missing legs, extra arms, extra legs, fused fingers, too many fingers, long neck";

const RETRO_PROMPTS: [&str; 16] = [
    "8k close up 1990's high school yearbook photo of @subject {model_type}, preppy stylish uniform, professional headshots, photo-realistic, 4k, high-resolution image, studio settings, upper body, preppy outfit, cute uniform, school, yearbook cloth background, studio lighting",
    "8k 1990's high school yearbook photo of @subject {model_type}, sports uniform, professional headshots, photo-realistic, 4k, high-resolution image, studio settings, upper body, prep school, cute uniform, skirt, yearbook cloth background, studio lighting",
    "8k 1990's hip-hop streetwear fashion photo of @subject {model_type}, award winning photography, retro revival, 4k, 90's streetwear, high resolution, photo-realistic, urban setting, Sportswear Chic",
    "8k 1994 West Coast Hip-Hop Fashion photo of man, award winning photography, 90s Nostalgia, detailed face, 4k, 90's streetwear, high resolution, photo-realistic, Sportswear Chic",
    "@subject {model_type} at Hogwarts party, July 1998, detailed face, detailed arms, full body portrait, Polaroid photo",
    "@subject {model_type} at Hogwarts party, January 1998, detailed face, detailed arms, full body portrait, Polaroid photo",
    "8k polaroid photo of @subject {model_type}, a 1970s Bohemian Hippie, long, flowing, hair, feathers in hair, beads, sun-kissed complexion, flowy tie-dye maxi dress, 4k, high-resolution image, layered necklaces, peace symbols, feathers, vintage-photo, colorful pendants, Beaded bracelets and anklets, barefoot, makeshift campsite in background, grassy meadow, hippy commune",
    "8k polaroid photo of @subject {model_type}, a 1970s Bohemian Hippie, long, flowing, hair, flowers, in hear, beads, sun-kissed complexion, fringed suede vest, bell-bottom jeans, 4k, acoustic guitar, high-resolution image, layered necklaces, peace symbols, feathers, vintage-photo, colorful pendants, Beaded bracelets and anklets, barefoot, Haight Street background, vintage school bus, San francisco",
    "8k 1980s horror film style photo of @subject {model_type}, teen sleepaway camp summer camp, person holding homemade weapon, victim in horror film, 1980s fashion, photo-realistic, high-resolution image, studio settings, full body, 1980s fashion, bloody clothes, 1980s retro slasher film person survivor",
    "8k 1980 horror film style photo of @subject {model_type}, teen sleepaway camp summer camp, teenage victim in 1980 slasher film, 1980s fashion, photo-realistic, high-resolution image, studio settings, full body, bloody clothes",
    "8k vintage portrait of @subject {model_type}, teenage victorian vampire, 1800s beautiful vampire with fangs, fangs, victorian era clothing, blood on face and clothes, photo-realistic, vintage portrait, bloody, grainy picture, victorian style curly hair, horror vampire icon, scary vintage victorian vampire",
    "8k vintage portrait of @subject {model_type}, teenage victorian vampire with fangs, 1800s beautiful young vampire with fangs, victorian era clothing, blood on face and clothes, photo-realistic, vintage portrait, bloody, grainy portrait picture, victorian style curly hair, horror vampire icon, scary vintage victorian vampire, bloody fangs, man-eating vampire",
    "8k photo of @subject {model_type}, siren mermaid, beautiful siren, creepy mermaid, long flowing hair, underwater, photo-realistic, high-resolution image, fantasy siren, studio settings, siren tail, creepy dark siren mermaid, evil, moonlight, ethereal, white, black, ghostly",
    "8k photo of @subject {model_type}, scary siren mermaid, siren mythology, horror, flowing hair, underwater, photo-realistic, high-resolution image, fantasy man-eating siren, studio settings, mermaid tail, creepy, dark, evil, ethereal, white, black, ghostly, sharp teeth, creepy moonlight mermaid",
    "8k polaroid of @subject {model_type}, 1990s young grunge rocker, 1990s vintage grunge clothes, rock band, rocker holding rock music instruments, photo-realistic, 4k, high-resolution image, studio settings, polaroid photo, studio lighting, grainy polaroid of 1990s rocker",
    "8k 1990's polaroid of @subject {model_type}, teenage rocker, 1990s grunge clothes, punk rock band, rocker musician holding rock instruments, photo-realistic, 4k, high-resolution image, studio settings, grainy polaroid photo, studio lighting, 1990's polaroid of punk rocker grunge person, rock band",
];

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid profile json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("profile must contain at least one prompt")]
    NoPrompts,
    #[error("numberOfImages must be at least 1")]
    NoImages,
}

/// Prompt table plus the fixed inference parameters sent for every prompt.
/// A deployment picks its table through `GENERATION_PROFILE_PATH`; fields
/// left out of the file fall back to the built-in retro profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationProfile {
    pub name: String,
    pub prompts: Vec<String>,
    pub number_of_images: u32,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub negative_prompt: String,
    pub prompt_strength: f32,
}

impl Default for GenerationProfile {
    fn default() -> Self {
        Self {
            name: "retro".into(),
            prompts: RETRO_PROMPTS.iter().map(|p| p.to_string()).collect(),
            number_of_images: 4,
            width: 512,
            height: 512,
            steps: 50,
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.into(),
            prompt_strength: 7.5,
        }
    }
}

impl GenerationProfile {
    pub fn from_file(path: &Path) -> Result<Self, ProfileError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ProfileError> {
        let profile: GenerationProfile = serde_json::from_str(raw)?;
        if profile.prompts.is_empty() {
            return Err(ProfileError::NoPrompts);
        }
        if profile.number_of_images == 0 {
            return Err(ProfileError::NoImages);
        }
        Ok(profile)
    }

    /// Every template in table order with the subject category substituted.
    pub fn render_prompts(&self, model_type: &str) -> Vec<String> {
        self.prompts
            .iter()
            .map(|template| template.replace(MODEL_TYPE_PLACEHOLDER, model_type))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_matches_retro_parameters() {
        let profile = GenerationProfile::default();
        assert_eq!(profile.prompts.len(), 16);
        assert_eq!(profile.number_of_images, 4);
        assert_eq!((profile.width, profile.height), (512, 512));
        assert_eq!(profile.steps, 50);
        assert_eq!(profile.prompt_strength, 7.5);
        assert!(profile.negative_prompt.starts_with("(deformed iris"));
    }

    #[test]
    fn render_substitutes_model_type_in_table_order() {
        let profile = GenerationProfile::default();
        let prompts = profile.render_prompts("man");
        assert_eq!(prompts.len(), profile.prompts.len());
        assert!(prompts[0].contains("yearbook photo of @subject man, preppy"));
        assert!(prompts[4].starts_with("@subject man at Hogwarts party, July 1998"));
        assert!(prompts.iter().all(|p| !p.contains(MODEL_TYPE_PLACEHOLDER)));
    }

    #[test]
    fn render_with_empty_model_type_leaves_no_placeholder() {
        let prompts = GenerationProfile::default().render_prompts("");
        assert!(prompts[0].contains("photo of @subject , preppy"));
        assert!(prompts.iter().all(|p| !p.contains(MODEL_TYPE_PLACEHOLDER)));
    }

    #[test]
    fn render_replaces_every_placeholder_occurrence() {
        let profile = GenerationProfile {
            prompts: vec!["{model_type} and another {model_type}".into()],
            ..Default::default()
        };
        assert_eq!(profile.render_prompts("woman"), vec!["woman and another woman"]);
    }

    #[test]
    fn partial_profile_json_falls_back_to_defaults() {
        let profile = GenerationProfile::from_json(
            r#"{ "name": "studio", "prompts": ["headshot of @subject {model_type}"], "numberOfImages": 2, "promptStrength": 6.0 }"#,
        )
        .unwrap();
        assert_eq!(profile.name, "studio");
        assert_eq!(profile.prompts.len(), 1);
        assert_eq!(profile.number_of_images, 2);
        assert_eq!(profile.prompt_strength, 6.0);
        assert_eq!(profile.steps, 50);
        assert_eq!(profile.width, 512);
    }

    #[test]
    fn empty_prompt_table_is_rejected() {
        assert!(matches!(
            GenerationProfile::from_json(r#"{ "prompts": [] }"#),
            Err(ProfileError::NoPrompts)
        ));
        assert!(matches!(
            GenerationProfile::from_json(r#"{ "numberOfImages": 0 }"#),
            Err(ProfileError::NoImages)
        ));
        assert!(matches!(
            GenerationProfile::from_json("not json"),
            Err(ProfileError::Json(_))
        ));
    }
}
