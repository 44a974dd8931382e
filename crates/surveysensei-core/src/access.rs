//! Creator-only visibility decisions.

/// True only when both addresses are present and equal ignoring ASCII case.
///
/// Blank strings count as absent.
pub fn is_creator(viewer: Option<&str>, creator: Option<&str>) -> bool {
    match (present(viewer), present(creator)) {
        (Some(v), Some(c)) => v.eq_ignore_ascii_case(c),
        _ => false,
    }
}

fn present(addr: Option<&str>) -> Option<&str> {
    addr.map(str::trim).filter(|a| !a.is_empty())
}

/// Where a shareable link is being offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkContext {
    SurveyDetail,
    Dashboard,
}

/// Per-viewer gate, recomputed after every successful detail read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessDecision {
    pub is_creator: bool,
}

impl AccessDecision {
    pub fn evaluate(viewer: Option<&str>, creator: Option<&str>) -> Self {
        Self {
            is_creator: is_creator(viewer, creator),
        }
    }

    pub fn show_stats(&self) -> bool {
        self.is_creator
    }

    pub fn show_responses(&self) -> bool {
        self.is_creator
    }

    /// Shown to non-creators, including while the creator is still unknown.
    pub fn show_respond_cta(&self) -> bool {
        !self.is_creator
    }

    pub fn can_copy_link(&self, context: LinkContext) -> bool {
        match context {
            LinkContext::SurveyDetail => self.is_creator,
            LinkContext::Dashboard => true,
        }
    }
}
