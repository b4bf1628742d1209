//! In-process rendition of the read-only JSON API.
//!
//! `GET` only; every path maps to a catalog call and a status code.

use serde::Serialize;
use serde_json::{json, Value};

use crate::api::types::{BodyId, QuestionId};
use crate::assets::catalog::Catalog;
use crate::error::DataError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(body) => Self { status: 200, body },
            Err(err) => {
                log::warn!("Response serialization failed: {}", err);
                Self::message(500, "Failed to serialize response")
            }
        }
    }

    fn message(status: u16, message: &str) -> Self {
        Self { status, body: json!({ "message": message }) }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Like JavaScript `parseInt`: optional sign then leading digits, rest ignored.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Out-of-range ids still parse; they saturate and miss the catalog.
    let n = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * n)
}

fn fetch_failed(err: &DataError, message: &str) -> ApiResponse {
    log::warn!("{}: {}", message, err);
    ApiResponse::message(500, message)
}

/// Answer one `GET` request against `catalog`.
pub fn respond(catalog: &dyn Catalog, path: &str) -> ApiResponse {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let path = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

    match segments.as_slice() {
        ["api", "planets"] => match catalog.bodies() {
            Ok(bodies) => ApiResponse::ok(&bodies),
            Err(err) => fetch_failed(&err, "Failed to fetch planets"),
        },
        ["api", "planets", raw] => {
            let Some(id) = parse_leading_int(raw) else {
                return ApiResponse::message(400, "Invalid planet ID");
            };
            let Ok(id) = u32::try_from(id) else {
                return ApiResponse::message(404, "Planet not found");
            };
            match catalog.body(BodyId(id)) {
                Ok(body) => ApiResponse::ok(body),
                Err(DataError::NotFound { .. }) => ApiResponse::message(404, "Planet not found"),
                Err(err) => fetch_failed(&err, "Failed to fetch planet"),
            }
        }
        ["api", "quiz-questions"] => match catalog.questions() {
            Ok(questions) => ApiResponse::ok(&questions),
            Err(err) => fetch_failed(&err, "Failed to fetch quiz questions"),
        },
        ["api", "quiz-questions", raw] => {
            let Some(id) = parse_leading_int(raw) else {
                return ApiResponse::message(400, "Invalid question ID");
            };
            let Ok(id) = u32::try_from(id) else {
                return ApiResponse::message(404, "Question not found");
            };
            match catalog.question(QuestionId(id)) {
                Ok(question) => ApiResponse::ok(question),
                Err(DataError::NotFound { .. }) => ApiResponse::message(404, "Question not found"),
                Err(err) => fetch_failed(&err, "Failed to fetch quiz question"),
            }
        }
        ["api", "fun-facts"] => match catalog.fun_facts() {
            Ok(facts) => ApiResponse::ok(&facts),
            Err(err) => fetch_failed(&err, "Failed to fetch fun facts"),
        },
        ["api", "explore-contents"] => match catalog.explore_contents() {
            Ok(contents) => ApiResponse::ok(&contents),
            Err(err) => fetch_failed(&err, "Failed to fetch explore contents"),
        },
        _ => ApiResponse::message(404, "Not found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::catalog::{MemCatalog, UnavailableCatalog};

    fn seeded() -> MemCatalog {
        MemCatalog::seeded().unwrap()
    }

    #[test]
    fn lists_planets_in_order() {
        let res = respond(&seeded(), "/api/planets");
        assert_eq!(res.status, 200);
        let names: Vec<&str> = res.body.as_array().unwrap().iter().map(|p| p["name"].as_str().unwrap()).collect();
        assert_eq!(names.first(), Some(&"Mercury"));
        assert_eq!(names.last(), Some(&"Neptune"));
        assert_eq!(res.body[0]["orderFromSun"], 1);
    }

    #[test]
    fn planet_by_id() {
        let cat = seeded();
        let res = respond(&cat, "/api/planets/3");
        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "Earth");
        assert_eq!(res.body["color"], "#1F7CDA");

        // parseInt keeps the leading digits
        assert_eq!(respond(&cat, "/api/planets/4abc").body["name"], "Mars");
    }

    #[test]
    fn planet_errors() {
        let cat = seeded();
        let bad = respond(&cat, "/api/planets/earth");
        assert_eq!(bad.status, 400);
        assert_eq!(bad.body["message"], "Invalid planet ID");

        let missing = respond(&cat, "/api/planets/99");
        assert_eq!(missing.status, 404);
        assert_eq!(missing.body["message"], "Planet not found");
        assert_eq!(respond(&cat, "/api/planets/-1").status, 404);
        assert_eq!(respond(&cat, "/api/planets/99999999999999999999999").status, 404);
        assert_eq!(respond(&cat, "/api/quiz-questions/-99999999999999999999999").status, 404);
    }

    #[test]
    fn questions_and_display_records() {
        let cat = seeded();
        assert_eq!(respond(&cat, "/api/quiz-questions").body.as_array().unwrap().len(), 5);
        let q = respond(&cat, "/api/quiz-questions/2");
        assert_eq!(q.body["correctOptionId"], 3);
        assert_eq!(respond(&cat, "/api/quiz-questions/x").body["message"], "Invalid question ID");
        assert_eq!(respond(&cat, "/api/quiz-questions/42").status, 404);

        let facts = respond(&cat, "/api/fun-facts");
        assert_eq!(facts.body[0]["iconBgColor"], "mars-red");
        let explore = respond(&cat, "/api/explore-contents/");
        assert_eq!(explore.body[2]["link"], "/explore/missions");
    }

    #[test]
    fn unknown_path_is_404() {
        let res = respond(&seeded(), "/api/moons");
        assert_eq!(res.status, 404);
        assert!(!res.is_success());
    }

    #[test]
    fn unavailable_catalog_is_500() {
        let cat = UnavailableCatalog::new("upstream timeout");
        let res = respond(&cat, "/api/planets");
        assert_eq!(res.status, 500);
        assert_eq!(res.body["message"], "Failed to fetch planets");
        assert_eq!(respond(&cat, "/api/planets/1").body["message"], "Failed to fetch planet");
    }

    #[test]
    fn parse_like_parse_int() {
        assert_eq!(parse_leading_int("12"), Some(12));
        assert_eq!(parse_leading_int(" 7x"), Some(7));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("123456789012345678901234"), Some(i64::MAX));
        assert_eq!(parse_leading_int("-123456789012345678901234"), Some(-i64::MAX));
    }
}
