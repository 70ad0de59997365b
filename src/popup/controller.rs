use std::sync::Arc;
use std::time::Duration;

use super::event::{PopupEvent, Toast};
use crate::color::{ColorNamer, ColorReading};
use crate::palette::{ColorListManager, ListError};
use crate::platform::{Clipboard, PickError};
use crate::storage::Store;

const CANCEL_TOAST: Duration = Duration::from_millis(1500);

/// Runs the popup's operations against the lists and capabilities and
/// reports the outcome as [`PopupEvent`]s.
///
/// Failures never escape: every one becomes a toast or a log line, and a
/// failed write never takes back a color that is already on display.
pub struct PopupController<S, C> {
    lists: ColorListManager<S>,
    clipboard: Arc<C>,
    namer: Option<Arc<dyn ColorNamer>>,
    copy_on_pick: bool,
    toast_duration: Duration,
}

impl<S: Store, C: Clipboard> PopupController<S, C> {
    pub fn new(
        lists: ColorListManager<S>,
        clipboard: Arc<C>,
        namer: Option<Arc<dyn ColorNamer>>,
    ) -> Self {
        Self {
            lists,
            clipboard,
            namer,
            copy_on_pick: true,
            toast_duration: Duration::from_millis(2000),
        }
    }

    pub fn copy_on_pick(mut self, enabled: bool) -> Self {
        self.copy_on_pick = enabled;
        self
    }

    pub fn toast_duration(mut self, duration: Duration) -> Self {
        self.toast_duration = duration;
        self
    }

    pub fn describe(&self, hex: &str) -> ColorReading {
        ColorReading::describe(hex, self.namer.as_deref())
    }

    /// Load both lists and show the color handed off by the background
    /// service, or else the newest history entry.
    pub async fn open(&self) -> Vec<PopupEvent> {
        let mut events = Vec::new();

        match self.lists.list_favorites().await {
            Ok(favorites) => events.push(PopupEvent::FavoritesLoaded(favorites)),
            Err(err) => log::error!("failed to load saved colors: {err}"),
        }

        let history = match self.lists.list_history().await {
            Ok(history) => history,
            Err(err) => {
                log::error!("failed to load history: {err}");
                Vec::new()
            }
        };

        let handoff = match self.lists.take_last_picked().await {
            Ok(handoff) => handoff,
            Err(err) => {
                log::error!("failed to read last picked color: {err}");
                None
            }
        };

        match handoff.as_deref().or(history.first().map(String::as_str)) {
            Some(hex) => {
                log::debug!("opening with {hex}");
                events.push(PopupEvent::DisplayChanged(self.describe(hex)));
            }
            None => log::debug!("no history found, nothing to display"),
        }
        events.push(PopupEvent::HistoryLoaded(history));

        events
    }

    /// Start a pick: either `Picking(true)` or the blocking notice shown
    /// instead of sampling when sampling is impossible.
    pub fn begin_pick(&self, sampler_supported: bool) -> PopupEvent {
        if sampler_supported {
            return PopupEvent::Picking(true);
        }
        PopupEvent::Toast(Toast::error(
            "Color sampler not supported on this system.",
            self.toast_duration,
        ))
    }

    pub async fn finish_pick(&self, result: Result<String, PickError>) -> Vec<PopupEvent> {
        let mut events = vec![PopupEvent::Picking(false)];

        let hex = match result {
            Ok(hex) => hex,
            Err(err) => {
                events.push(self.pick_error_notice(&err));
                return events;
            }
        };

        events.push(PopupEvent::DisplayChanged(self.describe(&hex)));
        match self.lists.record_history(&hex).await {
            Ok(history) => events.push(PopupEvent::HistoryLoaded(history)),
            Err(err) => log::error!("failed to add {hex} to history: {err}"),
        }

        let toast = if !self.copy_on_pick {
            Toast::info("Color picked.", self.toast_duration)
        } else {
            match self.clipboard.write(&hex).await {
                Ok(()) => Toast::info("Color copied to clipboard!", self.toast_duration),
                Err(err) => {
                    log::warn!("failed to copy {hex}: {err}");
                    Toast::error("Color picked, copy failed.", self.toast_duration)
                }
            }
        };
        events.push(PopupEvent::Toast(toast));

        events
    }

    /// A color picked by the background service while the popup is open
    pub async fn external_pick(&self, hex: &str) -> Vec<PopupEvent> {
        let mut events = vec![PopupEvent::DisplayChanged(self.describe(hex))];

        // The popup is open, so the handoff is already delivered
        if let Err(err) = self.lists.take_last_picked().await {
            log::warn!("failed to clear last picked color: {err}");
        }

        match self.lists.list_history().await {
            Ok(history) => events.push(PopupEvent::HistoryLoaded(history)),
            Err(err) => log::error!("failed to load history: {err}"),
        }
        events.push(PopupEvent::Toast(Toast::info(
            format!("Color {hex} picked via external trigger!"),
            self.toast_duration,
        )));

        events
    }

    pub fn pick_error_notice(&self, err: &PickError) -> PopupEvent {
        let toast = match err {
            PickError::Cancelled => Toast::info("Color picking cancelled.", CANCEL_TOAST),
            PickError::Unsupported(program) => {
                log::error!("sampler {program} is not available");
                Toast::error("Color sampler not supported on this system.", self.toast_duration)
            }
            PickError::Failed(reason) => {
                log::error!("sampler error: {reason}");
                Toast::error("Could not pick color.", self.toast_duration)
            }
        };
        PopupEvent::Toast(toast)
    }

    pub async fn save_current(&self, current: Option<&str>) -> Vec<PopupEvent> {
        match self.lists.save_favorite(current).await {
            Ok(favorites) => vec![
                PopupEvent::FavoritesLoaded(favorites),
                PopupEvent::Toast(Toast::info("Color saved!", self.toast_duration)),
            ],
            Err(ListError::NothingSelected) => vec![PopupEvent::Toast(Toast::error(
                "No color selected to save.",
                self.toast_duration,
            ))],
            Err(err) => {
                log::error!("failed to save color: {err}");
                vec![PopupEvent::Toast(Toast::error(
                    "Error saving color.",
                    self.toast_duration,
                ))]
            }
        }
    }

    pub async fn remove_favorite(&self, hex: &str) -> Vec<PopupEvent> {
        match self.lists.remove_favorite(hex).await {
            Ok(favorites) => vec![
                PopupEvent::FavoritesLoaded(favorites),
                PopupEvent::Toast(Toast::info("Color removed.", self.toast_duration)),
            ],
            Err(err) => {
                log::error!("failed to remove color: {err}");
                vec![PopupEvent::Toast(Toast::error(
                    "Error removing color.",
                    self.toast_duration,
                ))]
            }
        }
    }

    /// Copy one of the displayed representations; `label` names it in the
    /// toast ("hex", "rgb", "hsl").
    pub async fn copy(&self, label: &str, text: Option<&str>) -> Vec<PopupEvent> {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return Vec::new();
        };
        let label = label.to_uppercase();
        let toast = match self.clipboard.write(text).await {
            Ok(()) => Toast::info(format!("{label} copied!"), self.toast_duration),
            Err(err) => {
                log::warn!("failed to copy {label}: {err}");
                Toast::error(format!("Failed to copy {label}."), self.toast_duration)
            }
        };
        vec![PopupEvent::Toast(toast)]
    }

    /// Copy a history or favorites entry and put it on display
    pub async fn copy_entry(&self, hex: &str) -> Vec<PopupEvent> {
        let toast = match self.clipboard.write(hex).await {
            Ok(()) => Toast::info("Copied color!", self.toast_duration),
            Err(err) => {
                log::warn!("failed to copy {hex}: {err}");
                Toast::error("Failed to copy.", self.toast_duration)
            }
        };
        vec![
            PopupEvent::DisplayChanged(self.describe(hex)),
            PopupEvent::Toast(toast),
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use serde_json::json;

    use super::*;
    use crate::color::NamedColorTable;
    use crate::palette::{FAVORITES_KEY, HISTORY_KEY, LAST_PICKED_KEY};
    use crate::platform::fakes::FakeClipboard;
    use crate::popup::event::ToastKind;
    use crate::popup::state::PopupState;
    use crate::storage::{MemoryStore, StoreError};

    fn controller_with(
        clipboard: FakeClipboard,
    ) -> (PopupController<MemoryStore, FakeClipboard>, Arc<MemoryStore>, Arc<FakeClipboard>) {
        let store = Arc::new(MemoryStore::new());
        let clipboard = Arc::new(clipboard);
        let namer: Arc<dyn ColorNamer> = Arc::new(NamedColorTable::css());
        let controller = PopupController::new(
            ColorListManager::new(Arc::clone(&store)),
            Arc::clone(&clipboard),
            Some(namer),
        );
        (controller, store, clipboard)
    }

    fn controller() -> (PopupController<MemoryStore, FakeClipboard>, Arc<MemoryStore>, Arc<FakeClipboard>) {
        controller_with(FakeClipboard::default())
    }

    fn toast_of(events: &[PopupEvent]) -> Option<&Toast> {
        events.iter().find_map(|e| match e {
            PopupEvent::Toast(t) => Some(t),
            _ => None,
        })
    }

    fn display_of(events: &[PopupEvent]) -> Option<&ColorReading> {
        events.iter().find_map(|e| match e {
            PopupEvent::DisplayChanged(r) => Some(r),
            _ => None,
        })
    }

    /// Store that fails every access
    struct BrokenStore;

    impl Store for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<serde_json::Value>, StoreError> {
            Err(StoreError::Poisoned)
        }

        async fn set(&self, _key: &str, _value: serde_json::Value) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }

        async fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }
    }

    #[tokio::test]
    async fn pick_displays_records_and_copies() {
        let (controller, _store, clipboard) = controller();

        let mut events = vec![controller.begin_pick(true)];
        events.extend(controller.finish_pick(Ok("#2ECC71".to_string())).await);
        let mut state = PopupState::new();
        state.apply_all(events.clone(), Instant::now());

        assert!(!state.picking);
        let display = state.display.as_ref().unwrap();
        assert_eq!(display.hex, "#2ECC71");
        assert_eq!(display.rgb, "rgb(46, 204, 113)");
        assert_eq!(display.hsl, "hsl(145, 63%, 49%)");
        assert_eq!(state.history, vec!["#2ECC71"]);
        assert_eq!(clipboard.writes(), vec!["#2ECC71"]);
        assert_eq!(toast_of(&events).unwrap().message, "Color copied to clipboard!");
    }

    #[tokio::test]
    async fn cancelled_pick_writes_nothing() {
        let (controller, store, clipboard) = controller();

        let events = controller.finish_pick(Err(PickError::Cancelled)).await;

        assert!(display_of(&events).is_none());
        let toast = toast_of(&events).unwrap();
        assert_eq!(toast.message, "Color picking cancelled.");
        assert_eq!(toast.kind, ToastKind::Info);
        assert!(store.get(HISTORY_KEY).await.unwrap().is_none());
        assert!(clipboard.writes().is_empty());
    }

    #[test]
    fn unsupported_sampler_blocks_the_pick() {
        let (controller, _store, _clipboard) = controller();

        let PopupEvent::Toast(toast) = controller.begin_pick(false) else {
            panic!("expected a notice");
        };
        assert_eq!(toast.message, "Color sampler not supported on this system.");
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(controller.begin_pick(true), PopupEvent::Picking(true));
    }

    #[tokio::test]
    async fn sampler_failure_is_an_error_toast() {
        let (controller, store, _clipboard) = controller();
        let events = controller
            .finish_pick(Err(PickError::Failed("no display".to_string())))
            .await;
        let toast = toast_of(&events).unwrap();
        assert_eq!(toast.message, "Could not pick color.");
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(store.get(HISTORY_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn copy_failure_keeps_display_and_history() {
        let (controller, _store, _clipboard) = controller_with(FakeClipboard::failing());
        let events = controller.finish_pick(Ok("#FF0000".to_string())).await;

        assert_eq!(display_of(&events).unwrap().hex, "#FF0000");
        assert!(events.contains(&PopupEvent::HistoryLoaded(vec!["#FF0000".to_string()])));
        assert_eq!(toast_of(&events).unwrap().message, "Color picked, copy failed.");
    }

    #[tokio::test]
    async fn copy_on_pick_can_be_disabled() {
        let (controller, _store, clipboard) = controller();
        let controller = controller.copy_on_pick(false);
        let events = controller.finish_pick(Ok("#FF0000".to_string())).await;
        assert!(clipboard.writes().is_empty());
        assert_eq!(toast_of(&events).unwrap().message, "Color picked.");
    }

    #[tokio::test]
    async fn store_failure_does_not_roll_back_display() {
        let clipboard = Arc::new(FakeClipboard::default());
        let controller = PopupController::new(
            ColorListManager::new(Arc::new(BrokenStore)),
            Arc::clone(&clipboard),
            None,
        );
        let events = controller.finish_pick(Ok("#0000FF".to_string())).await;

        let display = display_of(&events).unwrap();
        assert_eq!(display.hex, "#0000FF");
        assert_eq!(display.name, "N/A");
        assert!(!events.iter().any(|e| matches!(e, PopupEvent::HistoryLoaded(_))));
        assert_eq!(clipboard.writes(), vec!["#0000FF"]);
    }

    #[tokio::test]
    async fn open_prefers_handoff_and_clears_it() {
        let (controller, store, _clipboard) = controller();
        store.set(HISTORY_KEY, json!(["#111111"])).await.unwrap();
        store.set(LAST_PICKED_KEY, json!("#222222")).await.unwrap();

        let events = controller.open().await;

        assert_eq!(display_of(&events).unwrap().hex, "#222222");
        assert!(store.get(LAST_PICKED_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn open_falls_back_to_newest_history() {
        let (controller, store, _clipboard) = controller();
        store.set(HISTORY_KEY, json!(["#111111", "#333333"])).await.unwrap();
        store.set(FAVORITES_KEY, json!(["#444444"])).await.unwrap();

        let events = controller.open().await;
        let mut state = PopupState::new();
        state.apply_all(events, Instant::now());

        assert_eq!(state.current_hex(), Some("#111111"));
        assert_eq!(state.favorites, vec!["#444444"]);
        assert_eq!(state.history, vec!["#111111", "#333333"]);
    }

    #[tokio::test]
    async fn open_with_nothing_stored_displays_nothing() {
        let (controller, _store, _clipboard) = controller();
        let events = controller.open().await;
        assert!(display_of(&events).is_none());
    }

    #[tokio::test]
    async fn external_pick_reloads_history() {
        let (controller, store, _clipboard) = controller();
        store.set(HISTORY_KEY, json!(["#ABCDEF"])).await.unwrap();
        store.set(LAST_PICKED_KEY, json!("#ABCDEF")).await.unwrap();

        let events = controller.external_pick("#ABCDEF").await;

        assert!(events.contains(&PopupEvent::HistoryLoaded(vec!["#ABCDEF".to_string()])));
        assert_eq!(
            toast_of(&events).unwrap().message,
            "Color #ABCDEF picked via external trigger!"
        );
        assert!(store.get(LAST_PICKED_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_without_selection_is_reported() {
        let (controller, store, _clipboard) = controller();
        let events = controller.save_current(None).await;
        let toast = toast_of(&events).unwrap();
        assert_eq!(toast.message, "No color selected to save.");
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(store.get(FAVORITES_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_remove() {
        let (controller, _store, _clipboard) = controller();
        let events = controller.save_current(Some("#123456")).await;
        assert!(events.contains(&PopupEvent::FavoritesLoaded(vec!["#123456".to_string()])));
        assert_eq!(toast_of(&events).unwrap().message, "Color saved!");

        let events = controller.remove_favorite("#123456").await;
        assert!(events.contains(&PopupEvent::FavoritesLoaded(Vec::new())));
        assert_eq!(toast_of(&events).unwrap().message, "Color removed.");
    }

    #[tokio::test]
    async fn save_failure_is_reported() {
        let controller = PopupController::new(
            ColorListManager::new(Arc::new(BrokenStore)),
            Arc::new(FakeClipboard::default()),
            None,
        );
        let events = controller.save_current(Some("#123456")).await;
        assert_eq!(toast_of(&events).unwrap().message, "Error saving color.");
    }

    #[tokio::test]
    async fn copy_labels_toast() {
        let (controller, _store, clipboard) = controller();
        let events = controller.copy("rgb", Some("rgb(1, 2, 3)")).await;
        assert_eq!(toast_of(&events).unwrap().message, "RGB copied!");
        assert_eq!(clipboard.writes(), vec!["rgb(1, 2, 3)"]);
    }

    #[tokio::test]
    async fn copy_with_nothing_displayed_is_silent() {
        let (controller, _store, clipboard) = controller();
        assert!(controller.copy("hex", None).await.is_empty());
        assert!(clipboard.writes().is_empty());
    }

    #[tokio::test]
    async fn copy_entry_shows_it() {
        let (controller, _store, clipboard) = controller();
        let events = controller.copy_entry("#00FF00").await;
        assert_eq!(display_of(&events).unwrap().hex, "#00FF00");
        assert_eq!(toast_of(&events).unwrap().message, "Copied color!");
        assert_eq!(clipboard.writes(), vec!["#00FF00"]);
    }
}
