//! Handlebars rendering of the weekly notification

use handlebars::Handlebars;
use std::path::Path;

use super::NotificationContext;
use crate::error::Result;

/// Built-in notification template
const DEFAULT_TEMPLATE: &str = include_str!("../../templates/cleaning_schedule.hbs");

const TEMPLATE_NAME: &str = "cleaning_schedule";

/// Renders [`NotificationContext`] into an HTML body
pub struct TemplateRenderer<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> TemplateRenderer<'a> {
    /// Create a renderer with the built-in template
    ///
    /// # Errors
    ///
    /// Returns `Error::Template` if the template does not compile
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_template_string(TEMPLATE_NAME, DEFAULT_TEMPLATE)?;
        Ok(Self { handlebars })
    }

    /// Create a renderer from a custom template file
    ///
    /// # Errors
    ///
    /// Returns `Error::Template` if the file cannot be read or compiled
    pub fn with_template(template_path: &Path) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_template_file(TEMPLATE_NAME, template_path)?;
        Ok(Self { handlebars })
    }

    /// Create a renderer from an optional custom template
    pub fn from_optional(template_path: Option<&Path>) -> Result<Self> {
        match template_path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Rendering email template from file");
                Self::with_template(path)
            }
            None => Self::new(),
        }
    }

    /// Render the notification body
    ///
    /// # Errors
    ///
    /// Returns `Error::Template` on render failures
    pub fn render(&self, context: &NotificationContext) -> Result<String> {
        Ok(self.handlebars.render(TEMPLATE_NAME, context)?)
    }
}
