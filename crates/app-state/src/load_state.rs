//! Load state
//!
//! State of a one-shot fetch (a planet list, a mission detail, a gallery) as
//! a screen renders it.

use orbita_client::{network_retry, FetchError, Result, RetryPolicy};
use std::future::Future;

/// State of a one-shot fetch
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    /// Nothing requested yet
    #[default]
    Idle,

    /// Request in flight
    Loading,

    /// Request succeeded
    Loaded(T),

    /// Request failed
    Failed(FetchError),
}

impl<T> LoadState<T> {
    /// Build the settled state from a fetch result
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(data) => LoadState::Loaded(data),
            Err(err) => LoadState::Failed(err),
        }
    }

    /// Run a screen load, retrying connectivity failures under `policy`
    ///
    /// HTTP and shape errors settle the state on the first failure; network
    /// errors and timeouts are retried before giving up.
    pub async fn load_retrying<F, Fut>(policy: &RetryPolicy, operation: F) -> Self
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        Self::from_result(network_retry(policy, operation).await)
    }

    /// Check if a request is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// Check if the fetch has finished, successfully or not
    pub fn is_settled(&self) -> bool {
        matches!(self, LoadState::Loaded(_) | LoadState::Failed(_))
    }

    /// Loaded data, if any
    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    /// Failure, if any
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Message to show for a failure
    pub fn user_message(&self) -> Option<String> {
        self.error().map(user_message)
    }

    /// Transform loaded data, keeping every other state
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> LoadState<U> {
        match self {
            LoadState::Idle => LoadState::Idle,
            LoadState::Loading => LoadState::Loading,
            LoadState::Loaded(data) => LoadState::Loaded(f(data)),
            LoadState::Failed(err) => LoadState::Failed(err),
        }
    }
}

/// Human-readable text for a fetch failure
///
/// Screens show this text; the raw error goes to telemetry.
pub fn user_message(err: &FetchError) -> String {
    match err {
        FetchError::Network(_) => "Error de red: Verifica tu conexión a internet".to_string(),
        FetchError::Timeout(_) => {
            "El servidor tardó demasiado en responder. Inténtalo de nuevo".to_string()
        }
        FetchError::Http { status, .. } if *status >= 500 => {
            format!("El servidor no está disponible (HTTP {})", status)
        }
        FetchError::Http { status: 404, .. } => "No se encontró el contenido solicitado".to_string(),
        FetchError::Http { status, .. } => format!("Error del servidor (HTTP {})", status),
        FetchError::MalformedResponse(_) | FetchError::InvalidShape(_) => {
            "Respuesta inesperada del servidor".to_string()
        }
        FetchError::Cancelled => "Operación cancelada".to_string(),
        FetchError::InvalidInput(_) => "Solicitud no válida".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        let state: LoadState<Vec<u32>> = LoadState::default();
        assert_eq!(state, LoadState::Idle);
        assert!(!state.is_loading());
        assert!(!state.is_settled());
        assert!(state.data().is_none());
    }

    #[test]
    fn test_from_result() {
        let loaded = LoadState::from_result(Ok(3));
        assert_eq!(loaded.data(), Some(&3));
        assert!(loaded.is_settled());
        assert!(loaded.user_message().is_none());

        let failed: LoadState<u32> = LoadState::from_result(Err(FetchError::Cancelled));
        assert_eq!(failed.error(), Some(&FetchError::Cancelled));
        assert_eq!(failed.user_message().as_deref(), Some("Operación cancelada"));
    }

    #[tokio::test]
    async fn test_load_retrying_recovers_from_timeout() {
        let attempts = std::sync::atomic::AtomicUsize::new(0);
        let policy = RetryPolicy::new(2)
            .with_delays(std::time::Duration::from_millis(1), std::time::Duration::from_millis(1));

        let state = LoadState::load_retrying(&policy, || {
            let attempt = attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(FetchError::Timeout("slow".to_string()))
                } else {
                    Ok(vec![1, 2])
                }
            }
        })
        .await;

        assert_eq!(state, LoadState::Loaded(vec![1, 2]));
        assert_eq!(attempts.into_inner(), 2);
    }

    #[tokio::test]
    async fn test_load_retrying_settles_on_http_error() {
        let attempts = std::sync::atomic::AtomicUsize::new(0);

        let state: LoadState<u32> = LoadState::load_retrying(&RetryPolicy::new(3), || {
            attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            async { Err(FetchError::Http { status: 404, body: String::new() }) }
        })
        .await;

        assert_eq!(state.error().and_then(FetchError::status), Some(404));
        assert_eq!(attempts.into_inner(), 1);
    }

    #[test]
    fn test_map_keeps_failure() {
        let failed: LoadState<u32> = LoadState::Failed(FetchError::Timeout("t".to_string()));
        let mapped = failed.map(|n| n * 2);
        assert!(matches!(mapped, LoadState::Failed(FetchError::Timeout(_))));

        assert_eq!(LoadState::Loaded(2).map(|n| n * 2), LoadState::Loaded(4));
    }

    #[test]
    fn test_user_messages_per_kind() {
        assert!(user_message(&FetchError::Network("refused".to_string())).contains("red"));
        assert!(user_message(&FetchError::Timeout("t".to_string())).contains("tardó"));
        assert_eq!(
            user_message(&FetchError::Http { status: 503, body: String::new() }),
            "El servidor no está disponible (HTTP 503)"
        );
        assert_eq!(
            user_message(&FetchError::Http { status: 404, body: String::new() }),
            "No se encontró el contenido solicitado"
        );
        assert_eq!(
            user_message(&FetchError::Http { status: 401, body: String::new() }),
            "Error del servidor (HTTP 401)"
        );
        assert_eq!(
            user_message(&FetchError::InvalidShape("x".to_string())),
            user_message(&FetchError::MalformedResponse("y".to_string()))
        );
    }
}
