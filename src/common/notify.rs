// src/common/notify.rs

// A UI original exibia toasts; aqui o núcleo só conhece esta costura.
// Quem renderiza decide o que fazer com cada notificação.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Danger,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
    pub duration_ms: u32,
    // Id estável para a camada de exibição deduplicar toasts repetidos
    pub id: &'static str,
}

impl Notification {
    pub fn success(text: impl Into<String>, id: &'static str) -> Self {
        Self { kind: NotificationKind::Success, text: text.into(), duration_ms: 4000, id }
    }

    pub fn danger(text: impl Into<String>, id: &'static str) -> Self {
        Self { kind: NotificationKind::Danger, text: text.into(), duration_ms: 4000, id }
    }

    pub fn with_duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Implementação padrão: joga tudo no log estruturado.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                tracing::info!(id = notification.id, "✅ {}", notification.text)
            }
            NotificationKind::Danger => {
                tracing::error!(id = notification.id, "❌ {}", notification.text)
            }
        }
    }
}
