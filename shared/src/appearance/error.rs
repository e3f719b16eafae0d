use thiserror::Error;

/// Errors that can occur while resolving an appearance against a theme.
///
/// Only raised in strict mode; otherwise resolution degrades to "no style".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppearanceError {
    /// Neither the theme nor any of its bases define the id
    #[error("Appearance {id} is not defined in theme {theme}")]
    UndefinedAppearance { theme: String, id: String },

    /// Following `include` links leads back to an appearance being resolved
    #[error("Appearance {id} in theme {theme} includes itself")]
    IncludeCycle { theme: String, id: String },

    /// A lookup happened before any theme was set
    #[error("Cannot resolve appearance {id}: no theme is set")]
    NoTheme { id: String },
}
