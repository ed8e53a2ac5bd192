use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use itertools::Itertools;
use strum::{EnumCount, IntoEnumIterator};

use crate::error::{LinkError, Result};
use crate::model::{Platform, PlatformDescriptor};

const fn descriptor(
    id: Platform,
    label: &'static str,
    icon_ref: &'static str,
    url_prefix: &'static str,
    background_color: &'static str,
) -> PlatformDescriptor {
    PlatformDescriptor {
        id,
        label,
        icon_ref,
        url_prefix,
        background_color,
        uses_dark_text: false,
    }
}

/// The built-in catalog, in `Platform` declaration order.
const STANDARD_CATALOG: [PlatformDescriptor; Platform::COUNT] = [
    descriptor(Platform::GitHub, "GitHub", "github", "https://github.com/", "#1A1A1A"),
    PlatformDescriptor {
        id: Platform::FrontendMentor,
        label: "Frontend Mentor",
        icon_ref: "frontend-mentor",
        url_prefix: "https://www.frontendmentor.io/profile/",
        background_color: "#FFFFFF",
        uses_dark_text: true,
    },
    descriptor(Platform::Twitter, "Twitter", "twitter", "https://twitter.com/", "#43B7E9"),
    descriptor(Platform::LinkedIn, "LinkedIn", "linkedin", "https://www.linkedin.com/in/", "#2D68FF"),
    descriptor(Platform::YouTube, "YouTube", "youtube", "https://www.youtube.com/channel/", "#EE3939"),
    descriptor(Platform::Facebook, "Facebook", "facebook", "https://www.facebook.com/", "#2442AC"),
    descriptor(Platform::Twitch, "Twitch", "twitch", "https://www.twitch.tv/", "#EE3FC8"),
    descriptor(Platform::DevTo, "Dev.to", "devto", "https://dev.to/", "#333333"),
    descriptor(Platform::Codewars, "Codewars", "codewars", "https://www.codewars.com/users/", "#8A1A50"),
    descriptor(Platform::Codepen, "Codepen", "codepen", "https://codepen.io/", "#333333"),
    descriptor(Platform::FreeCodeCamp, "freeCodeCamp", "freecodecamp", "https://www.freecodecamp.org/", "#302267"),
    descriptor(Platform::GitLab, "GitLab", "gitlab", "https://gitlab.com/", "#EB4925"),
    descriptor(Platform::Hashnode, "Hashnode", "hashnode", "https://hashnode.com/", "#0330D1"),
    descriptor(Platform::StackOverflow, "Stack Overflow", "stack-overflow", "https://stackoverflow.com/users/", "#EC7100"),
];

/// Immutable lookup table from [`Platform`] to its [`PlatformDescriptor`].
///
/// A registry is always total: construction fails unless every platform has
/// exactly one descriptor, so [`descriptor`](Self::descriptor) cannot miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformRegistry {
    // indexed by `Platform` discriminant
    descriptors: Vec<PlatformDescriptor>,
}

impl PlatformRegistry {
    /// The shared built-in catalog of fourteen platforms.
    pub fn standard() -> Arc<PlatformRegistry> {
        static STANDARD: OnceLock<Arc<PlatformRegistry>> = OnceLock::new();
        STANDARD
            .get_or_init(|| {
                Arc::new(PlatformRegistry {
                    descriptors: STANDARD_CATALOG.to_vec(),
                })
            })
            .clone()
    }

    /// Build a registry from a custom table.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = PlatformDescriptor>,
    ) -> Result<Self> {
        let mut slots: Vec<Option<PlatformDescriptor>> = vec![None; Platform::COUNT];
        for descriptor in descriptors {
            let slot = &mut slots[descriptor.id as usize];
            if slot.is_some() {
                return Err(LinkError::DuplicatePlatform {
                    platform: descriptor.id,
                });
            }
            *slot = Some(descriptor);
        }

        let missing = Platform::iter()
            .filter(|p| slots[*p as usize].is_none())
            .join(", ");
        if !missing.is_empty() {
            return Err(LinkError::IncompleteRegistry { missing });
        }

        Ok(Self {
            descriptors: slots.into_iter().flatten().collect(),
        })
    }

    pub fn descriptor(&self, platform: Platform) -> &PlatformDescriptor {
        &self.descriptors[platform as usize]
    }

    /// Resolve a platform key (or display label) coming from outside the
    /// editor. Unknown keys are an error, never silently dropped.
    pub fn resolve(&self, key: &str) -> Result<Platform> {
        Platform::from_str(key)
            .ok()
            .or_else(|| {
                self.descriptors
                    .iter()
                    .find(|d| d.label == key)
                    .map(|d| d.id)
            })
            .ok_or_else(|| LinkError::UnknownPlatform {
                key: key.to_owned(),
            })
    }

    /// All descriptors in catalog order, e.g. for a platform picker.
    pub fn iter(&self) -> impl Iterator<Item = &PlatformDescriptor> {
        self.descriptors.iter()
    }
}
