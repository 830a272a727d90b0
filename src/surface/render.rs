//! HTML rendering of chat views
//!
//! The page template is compiled into the binary and rendered with Tera,
//! with autoescaping on, so transcript text can never inject markup.

use crate::error::Result;
use crate::surface::ViewSnapshot;
use tera::{Context, Tera};

const CHAT_TEMPLATE: &str = "chat.html";

/// Banner shown in place of the chat when no engine could be built
pub const UNAVAILABLE_BANNER: &str =
    "❌ Chatbot unavailable. Check your GOOGLE_API_KEY and dependencies.";

/// Notice shown while a view has no messages
pub const WELCOME_NOTICE: &str = "👋 Welcome! Ask me anything to get started.";

/// Placeholder of the chat input
pub const INPUT_PLACEHOLDER: &str = "What would you like to know?";

/// Page renderer
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Compile the page template
    ///
    /// # Errors
    ///
    /// Returns `ThreadchatError::Template` if the template does not parse
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(CHAT_TEMPLATE, include_str!("../../templates/chat.html"))
            .map_err(crate::error::ThreadchatError::from)?;
        Ok(Self { tera })
    }

    /// Render the full chat page
    ///
    /// `unavailable` carries the engine failure detail; when set the page
    /// shows the banner instead of the transcript and input.
    pub fn render_page(
        &self,
        title: &str,
        view: &ViewSnapshot,
        unavailable: Option<&str>,
    ) -> Result<String> {
        let mut context = Context::new();
        context.insert("title", title);
        context.insert("view", view);
        context.insert("unavailable", &unavailable);
        context.insert("unavailable_banner", UNAVAILABLE_BANNER);
        context.insert("welcome", WELCOME_NOTICE);
        context.insert("placeholder", INPUT_PLACEHOLDER);

        self.tera
            .render(CHAT_TEMPLATE, &context)
            .map_err(|e| crate::error::ThreadchatError::from(e).into())
    }
}
