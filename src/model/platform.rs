use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount, EnumIter, EnumString};

/// A supported external platform a link can point to.
///
/// The string form (`Display`/`FromStr`) is the platform key used on the wire.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumCount,
    EnumIter,
    EnumString,
    strum_macros::Display,
)]
pub enum Platform {
    #[strum(serialize = "GitHub")]
    #[serde(rename = "GitHub")]
    GitHub,
    #[strum(serialize = "Frontend Mentor")]
    #[serde(rename = "Frontend Mentor")]
    FrontendMentor,
    #[strum(serialize = "Twitter")]
    #[serde(rename = "Twitter")]
    Twitter,
    #[strum(serialize = "LinkedIn")]
    #[serde(rename = "LinkedIn")]
    LinkedIn,
    #[strum(serialize = "YouTube")]
    #[serde(rename = "YouTube")]
    YouTube,
    #[strum(serialize = "Facebook")]
    #[serde(rename = "Facebook")]
    Facebook,
    #[strum(serialize = "Twitch")]
    #[serde(rename = "Twitch")]
    Twitch,
    #[strum(serialize = "Dev.to")]
    #[serde(rename = "Dev.to")]
    DevTo,
    #[strum(serialize = "Codewars")]
    #[serde(rename = "Codewars")]
    Codewars,
    #[strum(serialize = "Codepen")]
    #[serde(rename = "Codepen")]
    Codepen,
    #[strum(serialize = "freeCodeCamp")]
    #[serde(rename = "freeCodeCamp")]
    FreeCodeCamp,
    #[strum(serialize = "GitLab")]
    #[serde(rename = "GitLab")]
    GitLab,
    #[strum(serialize = "Hashnode")]
    #[serde(rename = "Hashnode")]
    Hashnode,
    #[strum(serialize = "Stack Overflow")]
    #[serde(rename = "Stack Overflow")]
    StackOverflow,
}

/// Static display and validation metadata for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformDescriptor {
    pub id: Platform,
    pub label: &'static str,
    pub icon_ref: &'static str,
    /// Literal prefix every link for this platform must start with.
    pub url_prefix: &'static str,
    pub background_color: &'static str,
    /// Light backgrounds render their label and icon in dark text.
    pub uses_dark_text: bool,
}
