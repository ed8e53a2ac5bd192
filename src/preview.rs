use crate::model::{LinkEntry, PreviewItem, PreviewLayout, PreviewModel};
use crate::registry::PlatformRegistry;

/// Derive the profile card render model from the collection.
///
/// An entry shows up as soon as it has a platform and a non-empty url, even
/// if the url would fail validation.
pub fn project(
    entries: &[LinkEntry],
    registry: &PlatformRegistry,
    layout: &PreviewLayout,
) -> PreviewModel {
    let items = entries
        .iter()
        .filter(|entry| !entry.url.is_empty())
        .filter_map(|entry| {
            let descriptor = registry.descriptor(entry.platform?);
            Some(PreviewItem {
                entry_id: entry.id,
                platform: descriptor.id,
                label: descriptor.label,
                icon_ref: descriptor.icon_ref,
                background_color: descriptor.background_color,
                uses_dark_text: descriptor.uses_dark_text,
                href: entry.url.clone(),
            })
        })
        .collect();

    let rows = entries.len().max(layout.min_rows);
    PreviewModel {
        items,
        canvas_height: canvas_height(entries.len(), layout),
        placeholder_rows: (0..rows).map(|i| layout.row_offset(i)).collect(),
    }
}

/// Height of the card for `count` rows. Depends on the row count only.
pub fn canvas_height(count: usize, layout: &PreviewLayout) -> u32 {
    if count <= layout.min_rows {
        return layout.baseline_height;
    }

    let last_offset = layout.row_offset(count - 1);
    if last_offset > layout.overflow_threshold {
        last_offset.saturating_add(layout.bottom_margin)
    } else {
        layout.baseline_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntryId, Platform};

    fn entry(id: u64, platform: Option<Platform>, url: &str) -> LinkEntry {
        LinkEntry {
            id: EntryId(id),
            platform,
            url: url.to_string(),
        }
    }

    #[test]
    fn test_canvas_height_reference_values() {
        let layout = PreviewLayout::default();
        assert_eq!(canvas_height(0, &layout), 632);
        assert_eq!(canvas_height(5, &layout), 632);
        assert_eq!(canvas_height(6, &layout), 696);
        assert_eq!(canvas_height(7, &layout), 760);
    }

    #[test]
    fn test_canvas_height_resets_when_rows_fit() {
        let layout = PreviewLayout {
            overflow_threshold: 1000,
            ..PreviewLayout::default()
        };
        assert_eq!(canvas_height(6, &layout), 632);
        assert_eq!(canvas_height(12, &layout), 632);
        assert_eq!(canvas_height(13, &layout), 278 + 12 * 64 + 98);
    }

    #[test]
    fn test_visible_items_are_presence_based() {
        let registry = PlatformRegistry::standard();
        let entries = [
            entry(1, Some(Platform::GitHub), "https://github.com/me"),
            entry(2, None, "https://example.com"),
            entry(3, Some(Platform::Twitch), ""),
            entry(4, Some(Platform::YouTube), "not even a url"),
            entry(5, Some(Platform::FrontendMentor), "https://www.frontendmentor.io/profile/me"),
        ];
        let model = project(&entries, &registry, &PreviewLayout::default());

        let ids: Vec<EntryId> = model.items.iter().map(|i| i.entry_id).collect();
        assert_eq!(ids, vec![EntryId(1), EntryId(4), EntryId(5)]);

        let youtube = &model.items[1];
        assert_eq!(youtube.label, "YouTube");
        assert_eq!(youtube.background_color, "#EE3939");
        assert_eq!(youtube.href, "not even a url");
        assert!(!youtube.uses_dark_text);
        assert!(model.items[2].uses_dark_text);
    }

    #[test]
    fn test_shape_follows_entry_count_not_visibility() {
        let registry = PlatformRegistry::standard();
        let entries: Vec<LinkEntry> = (0..6).map(|i| entry(i, None, "")).collect();
        let model = project(&entries, &registry, &PreviewLayout::default());

        assert!(model.items.is_empty());
        assert_eq!(model.canvas_height, 696);
        assert_eq!(model.placeholder_rows, vec![278, 342, 406, 470, 534, 598]);

        let model = project(&entries[..2], &registry, &PreviewLayout::default());
        assert_eq!(model.canvas_height, 632);
        assert_eq!(model.placeholder_rows.len(), 5);
    }
}
