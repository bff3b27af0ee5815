//! Hash-fragment routes.
//!
//! Route tokens are case-sensitive. Anything that is not an exact known token,
//! including the empty, `#` and `#/` forms, maps to [`Route::Uninitialized`].

/// A navigable view of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    /// Empty or unrecognised hash. Renders the landing page.
    #[default]
    Uninitialized,
    Home,
    SignIn,
    Predictive,
    Emotion,
    Cognitive,
    Exercise,
}

impl Route {
    /// Parse a raw hash fragment (`""`, `"#"`, `"#/predictive"`, ...).
    #[must_use]
    pub fn from_hash(hash: &str) -> Self {
        let Some(token) = hash.strip_prefix("#/") else {
            return Self::Uninitialized;
        };
        Self::from_token(token).unwrap_or(Self::Uninitialized)
    }

    /// Map a bare token (without `#/`) to a route.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "home" => Some(Self::Home),
            "signin" => Some(Self::SignIn),
            "predictive" => Some(Self::Predictive),
            "emotion" => Some(Self::Emotion),
            "cognitive" => Some(Self::Cognitive),
            "exercise" => Some(Self::Exercise),
            _ => None,
        }
    }

    /// Canonical hash fragment written by `navigate`.
    #[must_use]
    pub fn hash(&self) -> &'static str {
        match self {
            Self::Uninitialized => "",
            Self::Home => "#/home",
            Self::SignIn => "#/signin",
            Self::Predictive => "#/predictive",
            Self::Emotion => "#/emotion",
            Self::Cognitive => "#/cognitive",
            Self::Exercise => "#/exercise",
        }
    }

    /// Views reachable only while authenticated.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Predictive | Self::Emotion | Self::Cognitive)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => f.write_str("<uninitialized>"),
            other => f.write_str(other.hash()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tokens() {
        assert_eq!(Route::from_hash("#/home"), Route::Home);
        assert_eq!(Route::from_hash("#/signin"), Route::SignIn);
        assert_eq!(Route::from_hash("#/predictive"), Route::Predictive);
        assert_eq!(Route::from_hash("#/emotion"), Route::Emotion);
        assert_eq!(Route::from_hash("#/cognitive"), Route::Cognitive);
        assert_eq!(Route::from_hash("#/exercise"), Route::Exercise);
    }

    #[test]
    fn test_empty_forms_are_uninitialized() {
        assert_eq!(Route::from_hash(""), Route::Uninitialized);
        assert_eq!(Route::from_hash("#"), Route::Uninitialized);
        assert_eq!(Route::from_hash("#/"), Route::Uninitialized);
    }

    #[test]
    fn test_unknown_and_miscased_tokens_degrade() {
        assert_eq!(Route::from_hash("#/Predictive"), Route::Uninitialized);
        assert_eq!(Route::from_hash("#predictive"), Route::Uninitialized);
        assert_eq!(Route::from_hash("#/settings"), Route::Uninitialized);
        assert_eq!(Route::from_hash("#/predictive/"), Route::Uninitialized);
    }

    #[test]
    fn test_protected_views() {
        assert!(Route::Predictive.is_protected());
        assert!(Route::Emotion.is_protected());
        assert!(Route::Cognitive.is_protected());
        assert!(!Route::SignIn.is_protected());
        assert!(!Route::Exercise.is_protected());
        assert!(!Route::Home.is_protected());
        assert!(!Route::Uninitialized.is_protected());
    }
}
