/// Reason phrase rendered next to the status code in the access line.
///
/// Only the common codes are named; anything else renders as an empty
/// phrase rather than an error.
pub fn status_phrase(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "CREATED",
        204 => "NO CONTENT",
        400 => "BAD REQUEST",
        401 => "UNAUTHORIZED",
        403 => "FORBIDDEN",
        404 => "NOT FOUND",
        500 => "INTERNAL SERVER ERROR",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_have_phrases() {
        assert_eq!(status_phrase(200), "OK");
        assert_eq!(status_phrase(201), "CREATED");
        assert_eq!(status_phrase(204), "NO CONTENT");
        assert_eq!(status_phrase(400), "BAD REQUEST");
        assert_eq!(status_phrase(401), "UNAUTHORIZED");
        assert_eq!(status_phrase(403), "FORBIDDEN");
        assert_eq!(status_phrase(404), "NOT FOUND");
        assert_eq!(status_phrase(500), "INTERNAL SERVER ERROR");
    }

    #[test]
    fn unknown_codes_are_empty() {
        assert_eq!(status_phrase(418), "");
        assert_eq!(status_phrase(302), "");
        assert_eq!(status_phrase(0), "");
    }

    #[test]
    fn lookup_is_stable_across_calls() {
        for _ in 0..3 {
            assert_eq!(status_phrase(200), "OK");
            assert_eq!(status_phrase(404), "NOT FOUND");
            assert_eq!(status_phrase(418), "");
        }
    }
}
