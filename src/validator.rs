use crate::model::{Field, FieldError, FieldStatus, LinkEntry, ValidationReport};
use crate::registry::PlatformRegistry;

/// Validate every entry of a collection.
///
/// Prefix checks are a literal, case-sensitive `starts_with`, not a URL
/// grammar check. The url of an entry without a platform is disabled and not
/// evaluated.
pub fn validate(entries: &[LinkEntry], registry: &PlatformRegistry) -> ValidationReport {
    let mut report = ValidationReport::default();
    for entry in entries {
        let (platform, url) = check_entry(entry, registry);
        report.fields.insert((entry.id, Field::Platform), platform);
        report.fields.insert((entry.id, Field::Url), url);
    }
    report
}

fn check_entry(entry: &LinkEntry, registry: &PlatformRegistry) -> (FieldStatus, FieldStatus) {
    let Some(platform) = entry.platform else {
        return (
            FieldStatus::Invalid(FieldError::PlatformRequired),
            FieldStatus::Disabled,
        );
    };

    let url = if entry.url.is_empty() {
        FieldStatus::Invalid(FieldError::UrlRequired)
    } else if !entry
        .url
        .starts_with(registry.descriptor(platform).url_prefix)
    {
        FieldStatus::Invalid(FieldError::InvalidUrl)
    } else {
        FieldStatus::Valid
    };
    (FieldStatus::Valid, url)
}
