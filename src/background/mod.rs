//! The background service behind the keyboard shortcut and the context menu.
//!
//! A trigger starts the sampler on its own task, the same way a content
//! script is injected and reports back later. The reported color is stored as
//! the handoff for a popup that is not open yet, recorded into history, and
//! announced to the popup if one is listening.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc::{
    UnboundedReceiver, UnboundedSender, WeakUnboundedSender, unbounded_channel,
};

use crate::palette::ColorListManager;
use crate::platform::{Notifier, PickError, Sampler};
use crate::popup::PopupMessage;
use crate::storage::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    Shortcut,
    ContextMenu,
}

impl fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerSource::Shortcut => write!(f, "keyboard shortcut"),
            TriggerSource::ContextMenu => write!(f, "context menu"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundRequest {
    Trigger(TriggerSource),
    ColorPicked(String),
    PickerError(PickError),
}

pub struct Background<S, P> {
    lists: ColorListManager<S>,
    sampler: Arc<P>,
    popup: Notifier<PopupMessage>,
    // Weak so that the service stops once every trigger source is gone
    replies: WeakUnboundedSender<BackgroundRequest>,
}

impl<S, P> Background<S, P>
where
    S: Store + 'static,
    P: Sampler + 'static,
{
    /// Create the service along with both ends of its request queue.
    ///
    /// The sender goes to whatever hosts the shortcut and the context menu.
    pub fn new(
        lists: ColorListManager<S>,
        sampler: Arc<P>,
        popup: Notifier<PopupMessage>,
    ) -> (
        Self,
        UnboundedSender<BackgroundRequest>,
        UnboundedReceiver<BackgroundRequest>,
    ) {
        let (requests, rx) = unbounded_channel();
        let background = Self {
            lists,
            sampler,
            popup,
            replies: requests.downgrade(),
        };
        (background, requests, rx)
    }

    /// Serve requests until every sender is gone
    pub async fn run(self, mut rx: UnboundedReceiver<BackgroundRequest>) {
        while let Some(request) = rx.recv().await {
            self.handle(request).await;
        }
        log::debug!("background service stopped");
    }

    fn spawn_pick(&self, source: TriggerSource) {
        let Some(reply) = self.replies.upgrade() else {
            log::debug!("background stopping, ignoring pick via {source}");
            return;
        };
        log::info!("pick requested via {source}");
        let sampler = Arc::clone(&self.sampler);
        tokio::spawn(async move {
            let report = sample_and_report(sampler.as_ref()).await;
            if reply.send(report).is_err() {
                log::debug!("background gone before pick finished");
            }
        });
    }

    /// Sample on the current task and handle the outcome; used by the
    /// headless `pick` command.
    pub async fn pick_now(&self, source: TriggerSource) -> Result<String, PickError> {
        log::info!("pick requested via {source}");
        let report = sample_and_report(self.sampler.as_ref()).await;
        let outcome = match &report {
            BackgroundRequest::ColorPicked(hex) => Ok(hex.clone()),
            BackgroundRequest::PickerError(err) => Err(err.clone()),
            BackgroundRequest::Trigger(_) => Err(PickError::Cancelled),
        };
        self.handle(report).await;
        outcome
    }

    pub async fn handle(&self, request: BackgroundRequest) {
        match request {
            BackgroundRequest::Trigger(source) => self.spawn_pick(source),
            BackgroundRequest::ColorPicked(hex) => self.color_picked(hex).await,
            BackgroundRequest::PickerError(err) => self.picker_error(err),
        }
    }

    async fn color_picked(&self, hex: String) {
        log::info!("background received {hex}");

        if let Err(err) = self.lists.set_last_picked(&hex).await {
            log::error!("failed to store last picked color: {err}");
        }
        if let Err(err) = self.lists.record_history(&hex).await {
            log::error!("background failed to add {hex} to history: {err}");
        }

        if !self
            .popup
            .notify_best_effort(PopupMessage::ColorPicked(hex), "color picked")
        {
            log::info!("popup not open, color stored");
        }
    }

    fn picker_error(&self, err: PickError) {
        match &err {
            PickError::Cancelled => log::warn!("picker closed without a color"),
            other => log::error!("picker error: {other}"),
        }
        self.popup
            .notify_best_effort(PopupMessage::PickerError(err), "picker error");
    }
}

async fn sample_and_report<P: Sampler>(sampler: &P) -> BackgroundRequest {
    if !sampler.is_supported() {
        return BackgroundRequest::PickerError(PickError::Unsupported(
            sampler.name().to_string(),
        ));
    }
    match sampler.sample().await {
        Ok(hex) => BackgroundRequest::ColorPicked(hex),
        Err(err) => BackgroundRequest::PickerError(err),
    }
}
