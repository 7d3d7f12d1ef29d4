//! 全局通知
//!
//! 通知在 3 秒后自动消失；新通知会替换旧通知并重新计时。

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

const TOAST_MILLIS: u32 = 3_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub is_error: bool,
}

#[derive(Clone, Copy)]
pub struct Toaster {
    current: RwSignal<Option<Toast>>,
    generation: RwSignal<u64>,
}

impl Toaster {
    pub fn new() -> Self {
        Self {
            current: RwSignal::new(None),
            generation: RwSignal::new(0),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(Toast {
            message: message.into(),
            is_error: false,
        });
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(Toast {
            message: message.into(),
            is_error: true,
        });
    }

    fn show(&self, toast: Toast) {
        self.current.set(Some(toast));
        self.generation.update(|g| *g += 1);
        let shown = self.generation.get_untracked();

        let current = self.current;
        let generation = self.generation;
        // 只清除自己显示的那条通知
        Timeout::new(TOAST_MILLIS, move || {
            if generation.get_untracked() == shown {
                current.set(None);
            }
        })
        .forget();
    }
}

pub fn use_toaster() -> Toaster {
    use_context::<Toaster>().expect("Toaster should be provided")
}

#[component]
pub fn ToastHost() -> impl IntoView {
    let toaster = use_toaster();

    move || {
        toaster.current.get().map(|toast| {
            let class = if toast.is_error {
                "alert alert-error shadow-lg"
            } else {
                "alert alert-success shadow-lg"
            };
            view! {
                <div class="toast toast-top toast-end z-50">
                    <div class=class>
                        <span>{toast.message}</span>
                    </div>
                </div>
            }
        })
    }
}
