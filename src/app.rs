//! Runs popup actions and incoming messages against the controller, and
//! starts picks either on the popup's own sampler task or through the
//! background service.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc::UnboundedSender;

use crate::background::{BackgroundRequest, TriggerSource};
use crate::color::ColorReading;
use crate::input::Action;
use crate::platform::{Clipboard, Notifier, PickError, Sampler};
use crate::popup::{PopupController, PopupEvent, PopupMessage, PopupState};
use crate::storage::Store;

pub struct App<S, C, P> {
    pub state: PopupState,
    controller: PopupController<S, C>,
    sampler: Arc<P>,
    background: UnboundedSender<BackgroundRequest>,
    popup: Notifier<PopupMessage>,
}

impl<S, C, P> App<S, C, P>
where
    S: Store,
    C: Clipboard,
    P: Sampler + 'static,
{
    /// `popup` is this popup's own inbox, used to deliver its pick results
    pub fn new(
        controller: PopupController<S, C>,
        sampler: Arc<P>,
        background: UnboundedSender<BackgroundRequest>,
        popup: Notifier<PopupMessage>,
    ) -> Self {
        Self {
            state: PopupState::new(),
            controller,
            sampler,
            background,
            popup,
        }
    }

    fn apply(&mut self, events: impl IntoIterator<Item = PopupEvent>) {
        self.state.apply_all(events, Instant::now());
    }

    pub async fn open(&mut self) {
        let events = self.controller.open().await;
        self.apply(events);
    }

    /// Run one action; `screen` is the terminal size for menu placement
    pub async fn dispatch(&mut self, action: Action, screen: (u16, u16)) {
        match action {
            Action::Pick => self.start_pick(),
            Action::ShortcutPick => self.trigger(TriggerSource::Shortcut),
            Action::OpenContextMenu { column, row } => {
                self.state.open_context_menu_within(column, row, screen)
            }
            Action::ContextMenuPick => {
                self.state.close_context_menu();
                self.trigger(TriggerSource::ContextMenu);
            }
            Action::CloseMenu => self.state.close_context_menu(),
            Action::SaveFavorite => {
                let current = self.state.current_hex().map(str::to_string);
                let events = self.controller.save_current(current.as_deref()).await;
                self.apply(events);
            }
            Action::RemoveFavorite => {
                let Some(hex) = self.state.selected_favorite().map(str::to_string) else {
                    return;
                };
                let events = self.controller.remove_favorite(&hex).await;
                self.apply(events);
            }
            Action::CopyHex => self.copy_field("hex", |d| &d.hex).await,
            Action::CopyRgb => self.copy_field("rgb", |d| &d.rgb).await,
            Action::CopyHsl => self.copy_field("hsl", |d| &d.hsl).await,
            Action::Activate => match self.state.selected_color().map(str::to_string) {
                Some(hex) => {
                    let events = self.controller.copy_entry(&hex).await;
                    self.apply(events);
                }
                None if self.state.focused_list().is_none() => self.start_pick(),
                None => {}
            },
            Action::FocusNext => self.state.focus_next(),
            Action::MoveUp => self.state.move_up(),
            Action::MoveDown => self.state.move_down(),
            Action::Quit => self.state.quit(),
        }
    }

    pub async fn on_message(&mut self, message: PopupMessage) {
        let events = match message {
            PopupMessage::ColorPicked(hex) => {
                let mut events = vec![PopupEvent::Picking(false)];
                events.extend(self.controller.external_pick(&hex).await);
                events
            }
            PopupMessage::PickerError(err) => vec![
                PopupEvent::Picking(false),
                self.controller.pick_error_notice(&err),
            ],
            PopupMessage::PickFinished(result) => self.controller.finish_pick(result).await,
        };
        self.apply(events);
    }

    async fn copy_field(&mut self, label: &str, field: impl Fn(&ColorReading) -> &String) {
        let text = self.state.display.as_ref().map(|d| field(d).clone());
        let events = self.controller.copy(label, text.as_deref()).await;
        self.apply(events);
    }

    /// Sample from the popup itself; the result comes back as `PickFinished`
    fn start_pick(&mut self) {
        if self.state.picking {
            log::debug!("pick already in progress");
            return;
        }
        let begin = self.controller.begin_pick(self.sampler.is_supported());
        let started = begin == PopupEvent::Picking(true);
        self.apply([begin]);
        if !started {
            return;
        }

        let sampler = Arc::clone(&self.sampler);
        let popup = self.popup.clone();
        tokio::spawn(async move {
            let result = sampler.sample().await;
            popup.notify_best_effort(PopupMessage::PickFinished(result), "pick finished");
        });
    }

    /// Hand the pick to the background service, as the shortcut and the
    /// context menu do.
    fn trigger(&mut self, source: TriggerSource) {
        if self.state.picking {
            log::debug!("pick already in progress, ignoring {source}");
            return;
        }
        match self.background.send(BackgroundRequest::Trigger(source)) {
            Ok(()) => self.apply([PopupEvent::Picking(true)]),
            Err(_) => {
                log::error!("background service is not running");
                let notice = self
                    .controller
                    .pick_error_notice(&PickError::Failed("background service stopped".into()));
                self.apply([notice]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

    use super::*;
    use crate::palette::{ColorListManager, FAVORITES_KEY, HISTORY_KEY};
    use crate::platform::fakes::{FakeClipboard, FakeSampler};
    use crate::popup::Focus;
    use crate::storage::MemoryStore;

    struct Harness {
        app: App<MemoryStore, FakeClipboard, FakeSampler>,
        store: Arc<MemoryStore>,
        clipboard: Arc<FakeClipboard>,
        requests: UnboundedReceiver<BackgroundRequest>,
        inbox: UnboundedReceiver<PopupMessage>,
    }

    fn harness(sampler: FakeSampler) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let clipboard = Arc::new(FakeClipboard::default());
        let controller = PopupController::new(
            ColorListManager::new(Arc::clone(&store)),
            Arc::clone(&clipboard),
            None,
        );
        let (background, requests) = unbounded_channel();
        let (popup, inbox) = Notifier::channel();
        Harness {
            app: App::new(controller, Arc::new(sampler), background, popup),
            store,
            clipboard,
            requests,
            inbox,
        }
    }

    const SCREEN: (u16, u16) = (80, 24);

    #[tokio::test]
    async fn popup_pick_round_trips_through_inbox() {
        let mut h = harness(FakeSampler::returning(vec![Ok("#2ECC71".to_string())]));

        h.app.dispatch(Action::Pick, SCREEN).await;
        assert!(h.app.state.picking);

        let message = h.inbox.recv().await.unwrap();
        h.app.on_message(message).await;

        assert!(!h.app.state.picking);
        assert_eq!(h.app.state.current_hex(), Some("#2ECC71"));
        assert_eq!(h.app.state.history, vec!["#2ECC71"]);
        assert_eq!(h.clipboard.writes(), vec!["#2ECC71"]);
    }

    #[tokio::test]
    async fn second_pick_is_ignored_while_picking() {
        let mut h = harness(FakeSampler::returning(vec![Ok("#000001".to_string())]));

        h.app.dispatch(Action::Pick, SCREEN).await;
        h.app.dispatch(Action::ShortcutPick, SCREEN).await;

        assert!(h.requests.try_recv().is_err());
    }

    #[tokio::test]
    async fn unsupported_sampler_shows_notice() {
        let mut h = harness(FakeSampler::unsupported());
        h.app.dispatch(Action::Pick, SCREEN).await;
        assert!(!h.app.state.picking);
        assert_eq!(h.app.sampler.calls(), 0);
        assert_eq!(
            h.app.state.toast.as_ref().unwrap().toast.message,
            "Color sampler not supported on this system."
        );
    }

    #[tokio::test]
    async fn context_menu_pick_goes_to_background() {
        let mut h = harness(FakeSampler::returning(Vec::new()));

        h.app
            .dispatch(Action::OpenContextMenu { column: 3, row: 4 }, SCREEN)
            .await;
        assert!(h.app.state.context_menu.is_some());

        h.app.dispatch(Action::ContextMenuPick, SCREEN).await;
        assert!(h.app.state.context_menu.is_none());
        assert!(h.app.state.picking);
        assert_eq!(
            h.requests.try_recv().unwrap(),
            BackgroundRequest::Trigger(TriggerSource::ContextMenu)
        );
    }

    #[tokio::test]
    async fn external_pick_ends_picking() {
        let mut h = harness(FakeSampler::returning(Vec::new()));
        h.app.dispatch(Action::ShortcutPick, SCREEN).await;
        h.store.set(HISTORY_KEY, json!(["#ABCDEF"])).await.unwrap();

        h.app
            .on_message(PopupMessage::ColorPicked("#ABCDEF".to_string()))
            .await;

        assert!(!h.app.state.picking);
        assert_eq!(h.app.state.current_hex(), Some("#ABCDEF"));
        assert_eq!(h.app.state.history, vec!["#ABCDEF"]);
    }

    #[tokio::test]
    async fn background_error_ends_picking() {
        let mut h = harness(FakeSampler::returning(Vec::new()));
        h.app.dispatch(Action::ShortcutPick, SCREEN).await;

        h.app
            .on_message(PopupMessage::PickerError(PickError::Cancelled))
            .await;

        assert!(!h.app.state.picking);
        assert_eq!(
            h.app.state.toast.as_ref().unwrap().toast.message,
            "Color picking cancelled."
        );
    }

    #[tokio::test]
    async fn stopped_background_is_reported() {
        let mut h = harness(FakeSampler::returning(Vec::new()));
        drop(h.requests);

        h.app.dispatch(Action::ShortcutPick, SCREEN).await;

        assert!(!h.app.state.picking);
        assert_eq!(
            h.app.state.toast.as_ref().unwrap().toast.message,
            "Could not pick color."
        );
    }

    #[tokio::test]
    async fn save_and_remove_selected_favorite() {
        let mut h = harness(FakeSampler::returning(Vec::new()));
        h.store.set(HISTORY_KEY, json!(["#123456"])).await.unwrap();
        h.app.open().await;

        h.app.dispatch(Action::SaveFavorite, SCREEN).await;
        assert_eq!(h.app.state.favorites, vec!["#123456"]);

        h.app.dispatch(Action::FocusNext, SCREEN).await;
        h.app.dispatch(Action::FocusNext, SCREEN).await;
        assert_eq!(h.app.state.focus, Focus::Favorites);

        h.app.dispatch(Action::RemoveFavorite, SCREEN).await;
        assert!(h.app.state.favorites.is_empty());
        assert_eq!(h.store.get(FAVORITES_KEY).await.unwrap(), Some(json!([])));
    }

    #[tokio::test]
    async fn activate_copies_selected_entry() {
        let mut h = harness(FakeSampler::returning(Vec::new()));
        h.store
            .set(HISTORY_KEY, json!(["#111111", "#222222"]))
            .await
            .unwrap();
        h.app.open().await;

        h.app.dispatch(Action::FocusNext, SCREEN).await;
        h.app.dispatch(Action::MoveDown, SCREEN).await;
        h.app.dispatch(Action::Activate, SCREEN).await;

        assert_eq!(h.app.state.current_hex(), Some("#222222"));
        assert_eq!(h.clipboard.writes(), vec!["#222222"]);
    }

    #[tokio::test]
    async fn copy_rgb_of_display() {
        let mut h = harness(FakeSampler::returning(Vec::new()));
        h.store.set(HISTORY_KEY, json!(["#2ECC71"])).await.unwrap();
        h.app.open().await;

        h.app.dispatch(Action::CopyRgb, SCREEN).await;

        assert_eq!(h.clipboard.writes(), vec!["rgb(46, 204, 113)"]);
        assert_eq!(
            h.app.state.toast.as_ref().unwrap().toast.message,
            "RGB copied!"
        );
    }

    #[tokio::test]
    async fn quit_stops_running() {
        let mut h = harness(FakeSampler::returning(Vec::new()));
        h.app.dispatch(Action::Quit, SCREEN).await;
        assert!(!h.app.state.running);
    }
}
