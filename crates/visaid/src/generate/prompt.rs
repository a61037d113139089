//! Prompt text sent to the text-generation model.

use visaid_core::diagram::DiagramType;

/// Sample descriptions, one per commonly used diagram type.
pub const SAMPLE_PROMPTS: [(&str, DiagramType); 3] = [
    (
        "Create a flowchart for user registration process with login, email verification, and profile setup",
        DiagramType::Flowchart,
    ),
    (
        "Create a sequence diagram for an e-commerce checkout process between customer, cart, and payment system",
        DiagramType::Sequence,
    ),
    (
        "Create a class diagram for a library management system with books, members, and librarians",
        DiagramType::Class,
    ),
];

/// Builds the system message for `diagram_type`.
pub fn system_message(diagram_type: DiagramType) -> String {
    format!(
        "You write Mermaid diagram markup. Produce a {kind} ({description}). \
         Reply with the markup only: no explanations and no Markdown fences. \
         The first line must start with `{keyword}`. Keep node labels short and \
         quote labels that contain punctuation.",
        kind = diagram_type.tag().replace('-', " "),
        description = diagram_type.description().to_lowercase(),
        keyword = diagram_type.keyword(),
    )
}

/// Builds the user message carrying the description.
pub fn user_message(prompt: &str) -> String {
    format!("Diagram description:\n{}", prompt.trim())
}

/// Returns the body of the first fenced code block in `reply`, or the whole
/// reply when it has no fence.
///
/// ```
/// use visaid::generate::prompt::strip_fences;
///
/// assert_eq!(strip_fences("```mermaid\npie\n```"), "pie");
/// assert_eq!(strip_fences("```mermaid pie```"), "pie");
/// assert_eq!(strip_fences("pie"), "pie");
/// ```
pub fn strip_fences(reply: &str) -> &str {
    let Some(start) = reply.find("```") else {
        return reply.trim();
    };
    let after_fence = &reply[start + 3..];
    let body = match after_fence.find('\n') {
        // Skip the info string (e.g. `mermaid`) up to the end of the line.
        Some(newline) => &after_fence[newline + 1..],
        None => single_line_body(after_fence),
    };
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Drops a leading `mermaid` info string from a fence that has no line break.
fn single_line_body(after_fence: &str) -> &str {
    let trimmed = after_fence.trim_start();
    match trimmed.split_once(char::is_whitespace) {
        Some((info, rest)) if info.eq_ignore_ascii_case("mermaid") => rest,
        _ => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_message_names_keyword() {
        for kind in DiagramType::ALL {
            let message = system_message(kind);
            assert!(message.contains(kind.keyword()), "{kind}: {message}");
        }
    }

    #[test]
    fn test_user_message_trims_prompt() {
        assert_eq!(
            user_message("  a login flow \n"),
            "Diagram description:\na login flow"
        );
    }

    #[test]
    fn test_strip_fences_with_surrounding_text() {
        let reply = "Here you go:\n```mermaid\nflowchart TD\n  A-->B\n```\nEnjoy!";
        assert_eq!(strip_fences(reply), "flowchart TD\n  A-->B");
    }

    #[test]
    fn test_strip_bare_fence() {
        assert_eq!(strip_fences("```\nerDiagram\n```"), "erDiagram");
    }

    #[test]
    fn test_strip_unterminated_fence() {
        assert_eq!(strip_fences("```mermaid\ngantt\n"), "gantt");
    }

    #[test]
    fn test_strip_single_line_fence() {
        assert_eq!(strip_fences("```mermaid pie```"), "pie");
        assert_eq!(strip_fences("```pie```"), "pie");
        assert_eq!(
            strip_fences("Sure: ```Mermaid graph TD; A-->B``` done"),
            "graph TD; A-->B"
        );
    }

    #[test]
    fn test_sample_prompts_match_types() {
        assert_eq!(SAMPLE_PROMPTS[0].1, DiagramType::Flowchart);
        assert!(SAMPLE_PROMPTS.iter().all(|(prompt, _)| !prompt.is_empty()));
    }
}
