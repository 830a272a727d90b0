//! Command handlers for threadchat
//!
//! Each subcommand of the CLI has an entry point here: `serve` runs the
//! browser surface and `chat` runs the terminal surface.

pub mod chat;
pub mod special_commands;

pub mod serve {
    //! Browser chat server handler.
    //!
    //! A provider that cannot be built does not stop the server; the pages
    //! show the unavailable banner instead.

    use crate::config::Config;
    use crate::engine::ChatEngine;
    use crate::error::Result;
    use crate::surface::{run_server, AppState};

    /// Build the surface state for `config`
    ///
    /// Engine construction failures are logged and turned into the
    /// unavailable state.
    ///
    /// # Errors
    ///
    /// Returns error only if the page template fails to compile
    pub fn build_state(config: &Config) -> Result<AppState> {
        match ChatEngine::from_config(&config.provider) {
            Ok(engine) => AppState::available(engine, config.server.title.clone()),
            Err(e) => {
                tracing::error!("Chatbot unavailable: {:#}", e);
                AppState::unavailable(e.to_string(), config.server.title.clone())
            }
        }
    }

    /// Start the browser chat server
    ///
    /// # Errors
    ///
    /// Returns error if the server cannot bind or fails while running
    pub async fn run_serve(config: Config) -> Result<()> {
        tracing::info!(
            "Starting chat server: provider={}, model={}",
            config.provider.provider_type,
            config.active_model()
        );
        let state = build_state(&config)?;
        run_server(&config.server, state).await
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::config::{OllamaConfig, GEMINI_API_KEY_ENV};
        use crate::surface::create_app;
        use crate::test_utils::test_config;
        use axum::body::{to_bytes, Body};
        use axum::http::{Request, StatusCode};
        use serial_test::serial;
        use tower::ServiceExt;

        #[test]
        fn test_build_state_with_ollama_is_available() {
            let mut config = test_config();
            config.provider.provider_type = "ollama".to_string();
            config.provider.ollama = OllamaConfig::default();
            assert!(build_state(&config).is_ok());
        }

        #[test]
        fn test_build_state_with_unknown_provider_still_succeeds() {
            let mut config = test_config();
            config.provider.provider_type = "nonexistent".to_string();
            assert!(build_state(&config).is_ok());
        }

        #[tokio::test]
        #[serial]
        async fn test_missing_gemini_key_serves_unavailable_health() {
            std::env::remove_var(GEMINI_API_KEY_ENV);
            let state = build_state(&Config::default()).unwrap();

            let response = create_app(state)
                .oneshot(Request::get("/health").body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(json["status"], "unavailable");
            assert!(json["detail"].as_str().unwrap().contains(GEMINI_API_KEY_ENV));
        }
    }
}
