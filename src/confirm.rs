//! Confirmation dialogs that resolve to a single yes/no answer.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use crossterm::event::KeyCode;
use tokio::sync::oneshot;

use crate::content::{ActionTrigger, ButtonVariant, Content};
use crate::overlay::{OverlayController, OverlayOptions, OverlaySize, WeakOverlay};

/// Options for a confirmation dialog.
#[derive(Debug, Clone)]
pub struct ConfirmOptions {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
    /// Variant of the confirm trigger; cancel is always secondary.
    pub variant: ButtonVariant,
}

impl Default for ConfirmOptions {
    fn default() -> Self {
        Self {
            title: "Confirm".to_string(),
            message: "Are you sure?".to_string(),
            confirm_text: "Confirm".to_string(),
            cancel_text: "Cancel".to_string(),
            variant: ButtonVariant::Primary,
        }
    }
}

impl ConfirmOptions {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = text.into();
        self
    }

    pub fn with_cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = text.into();
        self
    }

    pub fn with_variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }
}

/// The single producer side of a confirmation. Resolving twice is a no-op.
struct Resolver {
    sender: RefCell<Option<oneshot::Sender<bool>>>,
}

impl Resolver {
    fn resolve(&self, answer: bool) -> bool {
        let Some(sender) = self.sender.borrow_mut().take() else {
            return false;
        };
        tracing::debug!(answer, "confirmation resolved");
        // The receiver may already be gone; nobody is waiting then.
        let _ = sender.send(answer);
        true
    }
}

/// Pending answer of a confirmation dialog.
///
/// Awaiting it yields `true` for confirm and `false` for cancel. Closing the
/// dialog any other way, or dropping it unanswered, yields `false`.
#[derive(Debug)]
pub struct Confirmation {
    receiver: oneshot::Receiver<bool>,
    overlay: OverlayController,
    answer: Option<bool>,
}

impl Confirmation {
    /// The overlay presenting the question.
    pub fn overlay(&self) -> &OverlayController {
        &self.overlay
    }

    /// Non-blocking check, for polling from a render loop.
    pub fn try_result(&mut self) -> Option<bool> {
        if self.answer.is_none() {
            self.answer = match self.receiver.try_recv() {
                Ok(answer) => Some(answer),
                Err(oneshot::error::TryRecvError::Empty) => None,
                Err(oneshot::error::TryRecvError::Closed) => Some(false),
            };
        }
        self.answer
    }
}

impl Future for Confirmation {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        if let Some(answer) = self.answer {
            return Poll::Ready(answer);
        }
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(result) => {
                let answer = result.unwrap_or(false);
                self.answer = Some(answer);
                Poll::Ready(answer)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Build and open a confirmation overlay using `create` to construct it.
///
/// Backdrop clicks never dismiss it. Each call gets its own overlay and its
/// own result channel.
pub(crate) fn open_with(
    options: ConfirmOptions,
    create: impl FnOnce(OverlayOptions) -> OverlayController,
) -> Confirmation {
    let (sender, receiver) = oneshot::channel();
    let resolver = Rc::new(Resolver {
        sender: RefCell::new(Some(sender)),
    });

    let confirm = ActionTrigger::new(options.confirm_text)
        .with_variant(options.variant)
        .with_key(KeyCode::Enter);
    let cancel = ActionTrigger::new(options.cancel_text)
        .with_variant(ButtonVariant::Secondary)
        .with_key(KeyCode::Esc);

    let on_close = resolver.clone();
    let overlay = create(
        OverlayOptions::new(Content::text(options.message))
            .with_title(options.title)
            .with_actions(vec![cancel.clone(), confirm.clone()])
            .close_on_backdrop(false)
            .with_size(OverlaySize::Sm)
            .on_close(move || {
                on_close.resolve(false);
            }),
    );

    wire(&confirm, overlay.downgrade(), resolver.clone(), true);
    wire(&cancel, overlay.downgrade(), resolver, false);
    overlay.open();

    Confirmation {
        receiver,
        overlay,
        answer: None,
    }
}

fn wire(trigger: &ActionTrigger, overlay: WeakOverlay, resolver: Rc<Resolver>, answer: bool) {
    trigger.on_click(move || {
        if let Some(overlay) = overlay.upgrade() {
            overlay.close();
        }
        resolver.resolve(answer);
    });
}
