use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::error::Result;
use crate::gateway::PersistenceGateway;
use crate::model::{EntryId, LinkEntry, Platform, PreviewLayout, PreviewModel, StoredLink, ValidationReport};
use crate::preview::project;
use crate::registry::PlatformRegistry;
use crate::store::LinkCollectionStore;
use crate::validator::validate;

/// Everything a renderer needs after a change, published on every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorView {
    pub entries: Vec<LinkEntry>,
    pub report: ValidationReport,
    pub preview: PreviewModel,
    pub saving: bool,
    pub dirty: bool,
}

/// A save that passed validation and is waiting for the backend.
///
/// Hand it back to [`LinkEditor::complete_save`] together with the gateway
/// result.
#[derive(Debug)]
pub struct PendingSave {
    revision: u64,
    links: Vec<StoredLink>,
}

impl PendingSave {
    /// The payload to submit, in display order.
    pub fn links(&self) -> &[StoredLink] {
        &self.links
    }
}

/// Result of asking the editor to start a save.
#[derive(Debug)]
pub enum SaveGate {
    Ready(PendingSave),
    /// At least one field is invalid.
    Blocked(ValidationReport),
    /// Another save is still outstanding.
    InFlight,
}

/// How a save ended, short of a persistence error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The backend list is now the collection and the baseline.
    Saved,
    /// The backend list became the baseline, but the collection was edited
    /// while the save was pending and keeps those edits.
    Superseded,
    Blocked(ValidationReport),
    InFlight,
}

/// Editing session over one user's link collection.
///
/// Owns the [`LinkCollectionStore`], recomputes validation and the preview
/// after every mutation, and guards saving so that at most one save is in
/// flight at a time.
///
/// # Examples
///
/// ```
/// use linkcard::{LinkEditor, Platform};
///
/// let mut editor = LinkEditor::new();
/// editor.add();
/// editor.set_platform(0, Platform::GitHub);
/// editor.set_url(0, "https://github.com/octocat");
///
/// assert!(editor.report().is_valid());
/// assert_eq!(editor.preview().items.len(), 1);
/// ```
#[derive(Debug)]
pub struct LinkEditor {
    store: LinkCollectionStore,
    registry: Arc<PlatformRegistry>,
    layout: PreviewLayout,
    report: ValidationReport,
    preview: PreviewModel,
    baseline: Vec<StoredLink>,
    saving: bool,
    tx: watch::Sender<EditorView>,
}

impl LinkEditor {
    /// Create an empty editor over the standard platform catalog.
    pub fn new() -> Self {
        Self::with_registry(PlatformRegistry::standard())
    }

    /// Create an empty editor over a custom platform catalog.
    pub fn with_registry(registry: Arc<PlatformRegistry>) -> Self {
        let store = LinkCollectionStore::new();
        let layout = PreviewLayout::default();
        let report = validate(store.snapshot(), &registry);
        let preview = project(store.snapshot(), &registry, &layout);
        let (tx, _) = watch::channel(EditorView {
            entries: Vec::new(),
            report: report.clone(),
            preview: preview.clone(),
            saving: false,
            dirty: false,
        });
        Self {
            store,
            registry,
            layout,
            report,
            preview,
            baseline: Vec::new(),
            saving: false,
            tx,
        }
    }

    /// Use different card geometry for the preview.
    pub fn with_layout(mut self, layout: PreviewLayout) -> Self {
        self.layout = layout;
        self.refresh();
        self
    }

    /// Append an empty entry and return its id.
    pub fn add(&mut self) -> EntryId {
        let id = self.store.add();
        self.refresh();
        id
    }

    /// Remove the entry at `index`, if there is one.
    pub fn remove(&mut self, index: usize) -> Option<LinkEntry> {
        let removed = self.store.remove(index);
        if removed.is_some() {
            self.refresh();
        }
        removed
    }

    /// Choose the platform of an entry; switching platforms clears its url.
    pub fn set_platform(&mut self, index: usize, platform: Platform) -> bool {
        let applied = self.store.set_platform(index, platform);
        if applied {
            self.refresh();
        }
        applied
    }

    /// Set a platform from its key, e.g. the value of a picker option.
    ///
    /// Unknown keys are rejected and leave the entry untouched.
    pub fn select_platform(&mut self, index: usize, key: &str) -> Result<bool> {
        let platform = self.registry.resolve(key)?;
        Ok(self.set_platform(index, platform))
    }

    /// Edit the url of an entry. Entries without a platform have a disabled
    /// url field and ignore the edit.
    pub fn set_url(&mut self, index: usize, value: impl Into<String>) -> bool {
        if !self
            .store
            .snapshot()
            .get(index)
            .is_some_and(LinkEntry::url_enabled)
        {
            debug!(index, "url edit ignored, field disabled");
            return false;
        }
        let applied = self.store.set_url(index, value);
        if applied {
            self.refresh();
        }
        applied
    }

    /// Apply a finished drag. `to` is `None` when dropped outside the list.
    pub fn reorder(&mut self, from: usize, to: Option<usize>) -> bool {
        let applied = self.store.reorder(from, to);
        if applied {
            self.refresh();
        }
        applied
    }

    /// Replace the collection with a user's stored links.
    ///
    /// Every link gets a fresh local id. If any platform is unknown nothing
    /// is loaded.
    #[instrument(skip(self, links), fields(count = links.len()))]
    pub fn load(&mut self, links: Vec<StoredLink>) -> Result<()> {
        let resolved = self.resolve_all(&links)?;
        self.store.replace(resolved);
        self.baseline = links;
        self.refresh();
        Ok(())
    }

    /// Drop every entry and the baseline, e.g. on logout.
    pub fn clear(&mut self) {
        self.store.clear();
        self.baseline.clear();
        self.refresh();
    }

    /// The entries in display order.
    pub fn entries(&self) -> &[LinkEntry] {
        self.store.snapshot()
    }

    /// Validation results for the current entries.
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// The profile card render model for the current entries.
    pub fn preview(&self) -> &PreviewModel {
        &self.preview
    }

    /// The platform catalog this editor validates against.
    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }

    /// The last link list confirmed by the backend (or loaded).
    pub fn baseline(&self) -> &[StoredLink] {
        &self.baseline
    }

    /// Whether a save is waiting for the backend.
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Whether the entries differ from the baseline.
    pub fn has_unsaved_changes(&self) -> bool {
        self.payload() != self.baseline
    }

    /// The collection in wire form: platform label and url, in display order.
    pub fn payload(&self) -> Vec<StoredLink> {
        self.store
            .snapshot()
            .iter()
            .map(|entry| StoredLink {
                platform: entry
                    .platform
                    .map(|p| self.registry.descriptor(p).label.to_string())
                    .unwrap_or_default(),
                link: entry.url.clone(),
            })
            .collect()
    }

    /// Hint text for the url input of an entry.
    pub fn url_placeholder(&self, index: usize) -> Option<String> {
        let entry = self.store.snapshot().get(index)?;
        Some(match entry.platform {
            Some(platform) => format!("e.g. {}username", self.registry.descriptor(platform).url_prefix),
            None => "Enter URL".to_string(),
        })
    }

    /// Receive an [`EditorView`] after every change.
    pub fn subscribe(&self) -> watch::Receiver<EditorView> {
        self.tx.subscribe()
    }

    /// Re-validate and, if everything is valid, mark the editor as saving.
    ///
    /// Local edits stay possible until [`complete_save`](Self::complete_save).
    pub fn begin_save(&mut self) -> SaveGate {
        if self.saving {
            debug!("save ignored, another save is in flight");
            return SaveGate::InFlight;
        }
        self.report = validate(self.store.snapshot(), &self.registry);
        if !self.report.is_valid() {
            debug!(errors = self.report.errors().count(), "save blocked by validation");
            return SaveGate::Blocked(self.report.clone());
        }

        self.saving = true;
        self.publish();
        SaveGate::Ready(PendingSave {
            revision: self.store.revision(),
            links: self.payload(),
        })
    }

    /// Finish a save started with [`begin_save`](Self::begin_save).
    ///
    /// On failure the collection is left exactly as it is. On success the
    /// returned list becomes the baseline; it also replaces the collection
    /// unless the collection changed since the save began.
    pub fn complete_save(
        &mut self,
        pending: PendingSave,
        result: Result<Vec<StoredLink>>,
    ) -> Result<SaveOutcome> {
        self.saving = false;
        let outcome = self.adopt(pending, result);
        self.refresh();
        outcome
    }

    /// Validate, submit to `gateway` and adopt its answer.
    #[instrument(skip_all)]
    pub async fn save<G: PersistenceGateway>(&mut self, gateway: &G) -> Result<SaveOutcome> {
        match self.begin_save() {
            SaveGate::Ready(pending) => {
                let guard = SavingGuard { editor: self };
                let result = gateway.submit(pending.links()).await;
                guard.editor.complete_save(pending, result)
            }
            SaveGate::Blocked(report) => Ok(SaveOutcome::Blocked(report)),
            SaveGate::InFlight => Ok(SaveOutcome::InFlight),
        }
    }

    /// Give up on a save whose response will never be applied.
    ///
    /// The collection and baseline stay as they are and saving is possible
    /// again.
    pub fn cancel_save(&mut self, pending: PendingSave) {
        debug!(revision = pending.revision, "save cancelled");
        self.saving = false;
        self.publish();
    }

    fn adopt(
        &mut self,
        pending: PendingSave,
        result: Result<Vec<StoredLink>>,
    ) -> Result<SaveOutcome> {
        let updated = result.inspect_err(|e| warn!(error = %e, "failed to save links"))?;
        let resolved = self.resolve_all(&updated)?;

        let outcome = if self.store.revision() != pending.revision {
            warn!("collection changed while saving, keeping local edits");
            SaveOutcome::Superseded
        } else {
            if updated != pending.links {
                self.store.replace(resolved);
            }
            SaveOutcome::Saved
        };
        self.baseline = updated;
        Ok(outcome)
    }

    fn resolve_all(&self, links: &[StoredLink]) -> Result<Vec<(Option<Platform>, String)>> {
        links
            .iter()
            .map(|link| {
                let platform = self.registry.resolve(&link.platform)?;
                Ok((Some(platform), link.link.clone()))
            })
            .collect()
    }

    fn refresh(&mut self) {
        self.report = validate(self.store.snapshot(), &self.registry);
        self.preview = project(self.store.snapshot(), &self.registry, &self.layout);
        self.publish();
    }

    fn publish(&self) {
        self.tx.send_replace(EditorView {
            entries: self.store.snapshot().to_vec(),
            report: self.report.clone(),
            preview: self.preview.clone(),
            saving: self.saving,
            dirty: self.has_unsaved_changes(),
        });
    }
}

/// Clears the saving flag if a [`LinkEditor::save`] future is dropped before
/// the gateway answers.
struct SavingGuard<'a> {
    editor: &'a mut LinkEditor,
}

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        if self.editor.saving {
            warn!("save dropped before the backend answered");
            self.editor.saving = false;
            self.editor.publish();
        }
    }
}

impl Default for LinkEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::LinkError;
    use crate::model::{Field, FieldError};

    #[derive(Default)]
    struct RecordingGateway {
        calls: Mutex<Vec<Vec<StoredLink>>>,
        failure: Option<String>,
    }

    impl PersistenceGateway for RecordingGateway {
        async fn submit(&self, links: &[StoredLink]) -> Result<Vec<StoredLink>> {
            self.calls.lock().unwrap().push(links.to_vec());
            match &self.failure {
                Some(message) => Err(LinkError::Persistence {
                    message: message.clone(),
                }),
                None => Ok(links.to_vec()),
            }
        }
    }

    fn filled(links: &[(Platform, &str)]) -> LinkEditor {
        let mut editor = LinkEditor::new();
        for (index, (platform, url)) in links.iter().enumerate() {
            editor.add();
            editor.set_platform(index, *platform);
            editor.set_url(index, *url);
        }
        editor
    }

    #[tokio::test]
    async fn test_add_select_reorder_and_save() {
        let mut editor = LinkEditor::new();
        let ids: Vec<EntryId> = (0..3).map(|_| editor.add()).collect();

        editor.select_platform(0, "GitHub").unwrap();
        editor.set_url(0, "https://github.com/me");
        editor.select_platform(1, "Twitch").unwrap();
        editor.set_url(1, "https://www.twitch.tv/me");
        editor.select_platform(2, "Hashnode").unwrap();
        editor.set_url(2, "https://hashnode.com/@me");

        assert!(editor.reorder(0, Some(2)));
        let order: Vec<(EntryId, Option<Platform>)> =
            editor.entries().iter().map(|e| (e.id, e.platform)).collect();
        assert_eq!(
            order,
            vec![
                (ids[1], Some(Platform::Twitch)),
                (ids[2], Some(Platform::Hashnode)),
                (ids[0], Some(Platform::GitHub)),
            ]
        );
        assert!(editor.report().is_valid());

        let gateway = RecordingGateway::default();
        let outcome = editor.save(&gateway).await.unwrap();
        assert_eq!(outcome, SaveOutcome::Saved);

        let calls = gateway.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            vec![
                StoredLink::new("Twitch", "https://www.twitch.tv/me"),
                StoredLink::new("Hashnode", "https://hashnode.com/@me"),
                StoredLink::new("GitHub", "https://github.com/me"),
            ]
        );
        assert!(!editor.has_unsaved_changes());
        assert!(!editor.is_saving());
        assert_eq!(editor.entries()[2].id, ids[0]);
    }

    #[tokio::test]
    async fn test_invalid_collection_is_not_submitted() {
        let mut editor = filled(&[(Platform::GitHub, "https://gitlab.com/me")]);
        editor.add();

        let gateway = RecordingGateway::default();
        let outcome = editor.save(&gateway).await.unwrap();

        let SaveOutcome::Blocked(report) = outcome else {
            panic!("expected save to be blocked, got {outcome:?}");
        };
        let first = editor.entries()[0].id;
        let second = editor.entries()[1].id;
        assert_eq!(report.error(first, Field::Url), Some(FieldError::InvalidUrl));
        assert_eq!(
            report.error(second, Field::Platform),
            Some(FieldError::PlatformRequired)
        );
        assert!(gateway.calls.lock().unwrap().is_empty());
        assert!(!editor.is_saving());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_local_edits() {
        let mut editor = filled(&[(Platform::Codewars, "https://www.codewars.com/users/me")]);
        let before = editor.entries().to_vec();
        let gateway = RecordingGateway {
            failure: Some("No user found or links unchanged".to_string()),
            ..Default::default()
        };

        let err = editor.save(&gateway).await.unwrap_err();
        assert!(err.to_string().contains("No user found"));
        assert_eq!(editor.entries(), before.as_slice());
        assert!(editor.has_unsaved_changes());
        assert!(!editor.is_saving());
    }

    #[test]
    fn test_only_one_save_in_flight() {
        let mut editor = filled(&[(Platform::GitHub, "https://github.com/me")]);

        let SaveGate::Ready(pending) = editor.begin_save() else {
            panic!("expected first save to start");
        };
        assert!(editor.is_saving());
        assert!(matches!(editor.begin_save(), SaveGate::InFlight));

        let links = pending.links().to_vec();
        let outcome = editor.complete_save(pending, Ok(links)).unwrap();
        assert_eq!(outcome, SaveOutcome::Saved);
        assert!(matches!(editor.begin_save(), SaveGate::Ready(_)));
    }

    #[test]
    fn test_late_response_does_not_overwrite_newer_edits() {
        let mut editor = filled(&[(Platform::GitHub, "https://github.com/me")]);
        let SaveGate::Ready(pending) = editor.begin_save() else {
            panic!("expected save to start");
        };
        let submitted = pending.links().to_vec();

        editor.set_url(0, "https://github.com/someone-else");
        let outcome = editor.complete_save(pending, Ok(submitted.clone())).unwrap();

        assert_eq!(outcome, SaveOutcome::Superseded);
        assert_eq!(editor.entries()[0].url, "https://github.com/someone-else");
        assert_eq!(editor.baseline(), submitted.as_slice());
        assert!(editor.has_unsaved_changes());
    }

    #[test]
    fn test_server_answer_replaces_unchanged_collection() {
        let mut editor = filled(&[(Platform::GitHub, "https://github.com/me")]);
        let SaveGate::Ready(pending) = editor.begin_save() else {
            panic!("expected save to start");
        };

        let answer = vec![StoredLink::new("GitLab", "https://gitlab.com/me")];
        let outcome = editor.complete_save(pending, Ok(answer.clone())).unwrap();

        assert_eq!(outcome, SaveOutcome::Saved);
        assert_eq!(editor.payload(), answer);
        assert_eq!(editor.preview().items[0].platform, Platform::GitLab);
    }

    #[test]
    fn test_load_assigns_fresh_ids_and_rejects_unknown_platforms() {
        let mut editor = LinkEditor::new();
        editor
            .load(vec![
                StoredLink::new("GitHub", "https://github.com/me"),
                StoredLink::new("Stack Overflow", "https://stackoverflow.com/users/1"),
            ])
            .unwrap();
        assert_eq!(editor.entries().len(), 2);
        assert_ne!(editor.entries()[0].id, editor.entries()[1].id);
        assert!(!editor.has_unsaved_changes());

        let err = editor
            .load(vec![
                StoredLink::new("GitLab", "https://gitlab.com/me"),
                StoredLink::new("Myspace", "https://myspace.com/me"),
            ])
            .unwrap_err();
        assert!(matches!(err, LinkError::UnknownPlatform { .. }));
        assert_eq!(editor.entries().len(), 2);
        assert_eq!(editor.entries()[0].platform, Some(Platform::GitHub));
    }

    #[test]
    fn test_unknown_platform_key_is_rejected() {
        let mut editor = filled(&[(Platform::GitHub, "https://github.com/me")]);
        assert!(editor.select_platform(0, "Orkut").is_err());
        assert_eq!(editor.entries()[0].url, "https://github.com/me");
        assert!(!editor.select_platform(4, "GitLab").unwrap());
    }

    #[test]
    fn test_url_disabled_without_platform() {
        let mut editor = LinkEditor::new();
        editor.add();
        assert!(!editor.set_url(0, "https://github.com/me"));
        assert_eq!(editor.entries()[0].url, "");
        assert_eq!(editor.url_placeholder(0).as_deref(), Some("Enter URL"));

        editor.set_platform(0, Platform::LinkedIn);
        assert_eq!(
            editor.url_placeholder(0).as_deref(),
            Some("e.g. https://www.linkedin.com/in/username")
        );
        assert_eq!(editor.url_placeholder(1), None);
    }

    #[test]
    fn test_view_tracks_length_changes() {
        let mut editor = LinkEditor::new();
        let mut rx = editor.subscribe();

        for _ in 0..6 {
            editor.add();
        }
        {
            let view = rx.borrow_and_update();
            assert_eq!(view.entries.len(), 6);
            assert_eq!(view.preview.canvas_height, 696);
            assert!(view.dirty);
            assert!(!view.report.is_valid());
        }

        editor.remove(0);
        assert_eq!(rx.borrow_and_update().preview.canvas_height, 632);

        editor.clear();
        let view = rx.borrow_and_update();
        assert!(view.entries.is_empty());
        assert!(!view.dirty);
    }

    #[test]
    fn test_custom_layout() {
        let layout = PreviewLayout {
            baseline_height: 500,
            ..PreviewLayout::default()
        };
        let editor = LinkEditor::new().with_layout(layout);
        assert_eq!(editor.preview().canvas_height, 500);
    }

    struct HangingGateway;

    impl PersistenceGateway for HangingGateway {
        async fn submit(&self, _links: &[StoredLink]) -> Result<Vec<StoredLink>> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_dropped_save_releases_saving_state() {
        let mut editor = filled(&[(Platform::GitHub, "https://github.com/me")]);
        let mut rx = editor.subscribe();

        tokio::select! {
            biased;
            _ = editor.save(&HangingGateway) => panic!("gateway never answers"),
            _ = async {} => {}
        }

        assert!(!editor.is_saving());
        assert!(!rx.borrow_and_update().saving);
        assert!(matches!(editor.begin_save(), SaveGate::Ready(_)));
    }

    #[test]
    fn test_cancel_save_allows_another_save() {
        let mut editor = filled(&[(Platform::Twitch, "https://www.twitch.tv/me")]);
        let SaveGate::Ready(pending) = editor.begin_save() else {
            panic!("expected save to start");
        };

        editor.cancel_save(pending);
        assert!(!editor.is_saving());
        assert!(editor.baseline().is_empty());
        assert!(matches!(editor.begin_save(), SaveGate::Ready(_)));
    }

    #[test]
    fn test_unknown_platform_in_save_response_is_rejected() {
        let mut editor = LinkEditor::new();
        editor
            .load(vec![StoredLink::new("GitHub", "https://github.com/me")])
            .unwrap();
        editor.set_url(0, "https://github.com/someone-else");
        let before = editor.entries().to_vec();
        let baseline = editor.baseline().to_vec();

        let SaveGate::Ready(pending) = editor.begin_save() else {
            panic!("expected save to start");
        };
        let err = editor
            .complete_save(pending, Ok(vec![StoredLink::new("Myspace", "https://myspace.com/me")]))
            .unwrap_err();

        assert!(matches!(err, LinkError::UnknownPlatform { key } if key == "Myspace"));
        assert!(!editor.is_saving());
        assert_eq!(editor.entries(), before.as_slice());
        assert_eq!(editor.baseline(), baseline.as_slice());
    }
}
