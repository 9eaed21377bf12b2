// src/utils/html.rs

/// Sanitizes author-supplied rich text (question descriptions, option text
/// and explanations) with ammonia's whitelist.
///
/// Safe formatting tags such as <b> and <p> survive; <script> elements
/// (including their content), <iframe> and event-handler attributes are
/// stripped. Plain text passes through unchanged apart from entity escaping
/// of stray angle brackets.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
