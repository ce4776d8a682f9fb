//INFO: Free-text routing for "ask me anything" input
//NOTE: Pure keyword matching; the caller decides what to fetch

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Emails,
    Events,
    Unknown,
}

const EMAIL_PATTERN: &str = r"(?i)\b(e-?mails?|mails?|inbox|gmail|messages?)\b";
const EVENT_PATTERN: &str = r"(?i)\b(calendar|events?|meetings?|schedule|agenda|appointments?)\b";

static EMAIL_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid email regex"));

static EVENT_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EVENT_PATTERN).expect("valid calendar regex"));

//INFO: Classifies a user's question
//NOTE: Email words win when both kinds appear
pub fn classify(input: &str) -> Intent {
    let input = input.trim();

    if input.is_empty() {
        Intent::Unknown
    } else if EMAIL_WORDS.is_match(input) {
        Intent::Emails
    } else if EVENT_WORDS.is_match(input) {
        Intent::Events
    } else {
        Intent::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_questions() {
        for input in [
            "show my emails",
            "Any new mail?",
            "what's in my INBOX",
            "check Gmail",
            "read my latest message",
            "e-mail from Ada",
        ] {
            assert_eq!(classify(input), Intent::Emails, "{input}");
        }
    }

    #[test]
    fn test_calendar_questions() {
        for input in [
            "what's on my calendar",
            "upcoming events",
            "Do I have meetings today?",
            "show my schedule",
            "agenda for tomorrow",
            "next appointment",
        ] {
            assert_eq!(classify(input), Intent::Events, "{input}");
        }
    }

    #[test]
    fn test_unrelated_or_blank() {
        for input in [
            "",
            "   ",
            "tell me a joke",
            "eventually",
            "mailbox-free zone",
            "scheduler",
        ] {
            assert_eq!(classify(input), Intent::Unknown, "{input}");
        }
    }

    #[test]
    fn test_email_wins_ties() {
        assert_eq!(classify("emails about the meeting"), Intent::Emails);
    }
}
