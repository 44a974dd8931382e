//! Terminal rendering for progress entries, survey cards, and lists.

use surveysensei_core::link::{compact_id, share_url};
use surveysensei_core::progress::{Indicator, Segment, indicator, segments};
use surveysensei_core::{CreatedAt, Network, StatusEntry, SurveySummary, Verdict};
use surveysensei_flow::SurveyPage;

const MAX_RESPONSES: usize = 10;

// ── Progress ──

fn glyph(indicator: Indicator) -> &'static str {
    match indicator {
        Indicator::InProgress => "…",
        Indicator::Completed => "✓",
        Indicator::Failed => "✗",
        Indicator::Neutral => "•",
    }
}

/// Entry text with any transaction hash expanded to its explorer URL.
fn linked_text(text: &str, network: Network) -> String {
    segments(text, network)
        .into_iter()
        .map(|seg| match seg {
            Segment::Text(t) => t.to_string(),
            Segment::Link { label, url } => format!("{label} ({url})"),
        })
        .collect()
}

pub fn entry_line(entry: &StatusEntry, network: Network) -> String {
    format!("{} {}", glyph(indicator(entry)), linked_text(&entry.text, network))
}

pub fn print_entry(entry: &StatusEntry, network: Network) {
    println!("{}", entry_line(entry, network));
}

// ── Survey card ──

fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<20} {}", label, value);
}

fn date(created_at: Option<&CreatedAt>) -> String {
    created_at.map(CreatedAt::display_date).unwrap_or_else(|| "-".into())
}

/// Print the open survey. Creator-only sections appear only when the page's
/// gate allows them.
pub fn print_survey_card(page: &SurveyPage, origin: &str) {
    let Some(doc) = page.document() else {
        return;
    };
    let detail = &doc.detail;

    println!(
        "=== {} ===",
        detail.title.as_deref().unwrap_or("Untitled survey")
    );
    if let Some(description) = &detail.description {
        println!("{description}");
    }
    println!();

    println!("Survey");
    field("id", &detail.survey_id);
    if let Some(reward) = &detail.total_reward {
        field("total reward", format!("{reward} BNB"));
    }
    if let Some(target) = detail.target_responses {
        field("target responses", target);
    }
    if let Some(creator) = &detail.creator_address {
        field("creator", compact_id(creator));
    }
    field("created", date(detail.created_at.as_ref()));
    println!();

    if !doc.questions.is_empty() {
        println!("Questions");
        for (i, q) in doc.questions.iter().enumerate() {
            println!("  {}. {}", i + 1, q);
        }
        println!();
    }

    if let Some(stats) = page.stats() {
        println!("Stats");
        field("responses", stats.total_responses);
        field("valid wallets", stats.total_valid_wallets);
        if let Some(avg) = stats.avg_score {
            field("average score", format!("{avg:.1}"));
        }
        println!();
    }

    let responses = page.responses();
    if !responses.is_empty() {
        println!("Responses ({})", responses.len());
        for r in responses.iter().take(MAX_RESPONSES) {
            let status = r.status.as_ref().map_or("-", |s| s.as_str());
            let score = r.score.map_or_else(|| "-".to_string(), |s| format!("{s:.1}"));
            println!(
                "  {:<15} {:<8} {:>5}  {}",
                compact_id(&r.wallet),
                status,
                score,
                date(r.created_at.as_ref())
            );
            if let Some(explanation) = &r.explanation {
                println!("      {explanation}");
            }
        }
        if responses.len() > MAX_RESPONSES {
            println!("  ... and {} more", responses.len() - MAX_RESPONSES);
        }
        println!();
    }

    let gate = page.gate();
    if page.can_copy_link() {
        println!("Share link: {}", share_url(origin, &detail.survey_id));
    }
    if gate.show_respond_cta() {
        println!(
            "Respond: surveysensei answer {} --answer <text> ...",
            detail.survey_id
        );
    }
    if let Some(error) = page.error() {
        println!("Last refresh failed: {error}");
    }
}

// ── Lists ──

pub fn summary_line(s: &SurveySummary) -> String {
    let title = s.title.as_deref().unwrap_or("Untitled survey");
    let reward = s.total_reward.as_deref().unwrap_or("-");
    let progress = match (s.total_responses, s.target_responses) {
        (Some(done), Some(target)) => format!("{done}/{target}"),
        (None, Some(target)) => format!("0/{target}"),
        _ => "-".to_string(),
    };
    format!(
        "{:<15} {:<12} {:>8} BNB {:>9}  {}",
        compact_id(&s.id),
        date(s.created_at.as_ref()),
        reward,
        progress,
        title
    )
}

pub fn print_survey_list(surveys: &[SurveySummary], origin: &str) {
    if surveys.is_empty() {
        println!("No surveys yet.");
        return;
    }
    for s in surveys {
        println!("{}", summary_line(s));
        println!("  {}", share_url(origin, &s.id));
    }
}

// ── Verdict ──

pub fn print_verdict(verdict: &Verdict, network: Network) {
    if verdict.is_valid() {
        println!("✓ Your answers are valid. You're eligible for the reward.");
    } else {
        println!("✗ Your answers were not accepted. You can revise and resubmit.");
    }
    if let Some(score) = verdict.score {
        field("score", format!("{score:.1}"));
    }
    if let Some(reason) = verdict.reason.as_deref().or(verdict.explanation.as_deref()) {
        field("reason", reason);
    }
    if let Some(hash) = verdict.transaction_hash() {
        field("reward tx", linked_text(hash, network));
    }
}
