//! Answer-set validation for the respond form.

pub const MAX_ANSWER_CHARS: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerIssue {
    Blank,
    TooLong { chars: usize },
}

/// Why an individual answer is not acceptable, if it isn't.
pub fn answer_issue(answer: &str) -> Option<AnswerIssue> {
    if answer.trim().is_empty() {
        return Some(AnswerIssue::Blank);
    }
    let chars = answer.chars().count();
    if chars > MAX_ANSWER_CHARS {
        return Some(AnswerIssue::TooLong { chars });
    }
    None
}

/// First unacceptable answer as `(index, issue)`.
pub fn first_issue(answers: &[String]) -> Option<(usize, AnswerIssue)> {
    answers
        .iter()
        .enumerate()
        .find_map(|(i, a)| answer_issue(a).map(|issue| (i, issue)))
}

/// Every answer is non-blank and within the length limit, and there is at
/// least one answer.
pub fn answers_complete(answers: &[String]) -> bool {
    !answers.is_empty() && first_issue(answers).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn all_filled_answers_are_complete() {
        assert!(answers_complete(&owned(&["yes", "  blue  "])));
    }

    #[test]
    fn whitespace_only_answer_blocks_submit() {
        let answers = owned(&["yes", " \n\t "]);
        assert!(!answers_complete(&answers));
        assert_eq!(first_issue(&answers), Some((1, AnswerIssue::Blank)));
    }

    #[test]
    fn length_limit_is_inclusive() {
        let at_limit = "a".repeat(MAX_ANSWER_CHARS);
        let over = "é".repeat(MAX_ANSWER_CHARS + 1);
        assert!(answers_complete(&[at_limit]));
        assert_eq!(
            answer_issue(&over),
            Some(AnswerIssue::TooLong {
                chars: MAX_ANSWER_CHARS + 1
            })
        );
    }

    #[test]
    fn no_answers_is_incomplete() {
        assert!(!answers_complete(&[]));
    }
}
