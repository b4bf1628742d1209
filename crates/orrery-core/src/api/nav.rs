use crate::api::types::BodyId;

/// Client-side pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Scene view with the thumbnail strip.
    Home,
    /// Detail page; the id is a deep link into the selection.
    Planet(BodyId),
    Quiz,
    Explore,
    NotFound,
}

impl Route {
    /// Parse a location path. Query and fragment are ignored, a trailing
    /// slash is tolerated, and a non-numeric planet id is `NotFound`.
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_matches('/');
        let mut segments = trimmed.split('/');

        match (segments.next(), segments.next(), segments.next()) {
            (Some(""), None, None) => Route::Home,
            (Some("quiz"), None, None) => Route::Quiz,
            (Some("explore"), None, None) => Route::Explore,
            (Some("planet"), Some(id), None) => id
                .parse::<u32>()
                .map(|id| Route::Planet(BodyId(id)))
                .unwrap_or(Route::NotFound),
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Planet(id) => format!("/planet/{}", id),
            Route::Quiz => "/quiz".to_string(),
            Route::Explore => "/explore".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }

    /// The orbital scene is mounted only on the home page.
    pub fn shows_scene(&self) -> bool {
        matches!(self, Route::Home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_pages() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/quiz"), Route::Quiz);
        assert_eq!(Route::parse("/quiz/"), Route::Quiz);
        assert_eq!(Route::parse("/explore?tab=1"), Route::Explore);
        assert_eq!(Route::parse("/planet/3"), Route::Planet(BodyId(3)));
    }

    #[test]
    fn unknown_or_malformed_is_not_found() {
        assert_eq!(Route::parse("/planet/earth"), Route::NotFound);
        assert_eq!(Route::parse("/planet"), Route::NotFound);
        assert_eq!(Route::parse("/planet/3/moons"), Route::NotFound);
        assert_eq!(Route::parse("/explore/galaxies"), Route::NotFound);
    }

    #[test]
    fn path_round_trips() {
        for route in [Route::Home, Route::Planet(BodyId(6)), Route::Quiz, Route::Explore] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }
}
