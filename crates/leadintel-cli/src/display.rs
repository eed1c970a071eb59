//! Terminal rendering for the dashboard: recent leads, stats, the research
//! form and the grouped result card.

use chrono::{DateTime, Utc};
use leadintel_core::present::{DecisionMakerView, FactorBar};
use leadintel_core::{AggregateStats, HistoryEntry, ResultView, ScoreBadge};
use leadintel_workflow::{RequestSubmission, ViewState, WorkflowController};

const MAX_LIST_ITEMS: usize = 10;
const BAR_CELLS: usize = 20;

// ── Public API ──

/// Redraw the sidebar and whichever main view is active.
pub fn print_screen(ctl: &WorkflowController) {
    print_sidebar(&ctl.history_entries(), ctl.stats());
    match ctl.view() {
        ViewState::ViewingForm => {
            print_form(ctl.submission());
            if let Some(lead) = ctl.current_analysis() {
                println!("  (`resume` returns to {})", lead.display_name());
                println!();
            }
        }
        ViewState::ViewingResult(_) => {
            if let Some(view) = ctl.result_view() {
                print_result(&view);
            }
        }
    }
}

pub fn print_help() {
    println!("Commands:");
    println!("  {:<26} {}", "name <company>", "set company name");
    println!("  {:<26} {}", "domain <domain>", "set company domain");
    println!("  {:<26} {}", "persona <text>", "set target ICP persona (required)");
    println!("  {:<26} {}", "submit", "run the research agent");
    println!("  {:<26} {}", "open <n|id>", "show a recent lead or a lead by id");
    println!("  {:<26} {}", "back", "back to the form, keep the result");
    println!("  {:<26} {}", "resume", "return to the kept result");
    println!("  {:<26} {}", "new", "start new research");
    println!("  {:<26} {}", "refresh", "reload recent leads");
    println!("  {:<26} {}", "show", "redraw");
    println!("  {:<26} {}", "quit", "exit");
    println!();
}

pub fn prompt(ctl: &WorkflowController) {
    let mode = match ctl.view() {
        ViewState::ViewingForm if ctl.submission().is_submitting() => "researching",
        ViewState::ViewingForm => "form",
        ViewState::ViewingResult(_) => "result",
    };
    println!("[{mode}] >");
}

// ── Sidebar ──

fn print_sidebar(entries: &[HistoryEntry], stats: AggregateStats) {
    println!("=== Recent Leads ===");
    if entries.is_empty() {
        println!("  No leads yet");
    }
    for (i, entry) in entries.iter().enumerate() {
        let when = entry
            .created_at
            .map(|ts| short_time(&ts))
            .unwrap_or_default();
        println!(
            "  {}. {:<28} {:<18} {:>3}% reply  {:>3} quality",
            i + 1,
            truncate(&entry.company_name, 28),
            when,
            entry.reply_percent,
            entry.quality
        );
    }
    println!();
    println!("Agent Stats");
    println!("  {:<26} {}", "Total", stats.total);
    println!("  {:<26} {}%", "Avg Quality", stats.avg_quality);
    println!("  {:<26} {}%", "Avg Reply", stats.avg_reply);
    println!();
}

// ── Form ──

fn print_form(sub: &RequestSubmission) {
    let form = sub.form();
    println!("=== Lead Research ===");
    println!("  {:<26} {}", "Company Name", or_dash(&form.company_name));
    println!("  {:<26} {}", "Domain (optional)", or_dash(&form.company_domain));
    println!("  {:<26} {}", "Target ICP Persona *", or_dash(&form.icp_persona));
    if sub.is_submitting() {
        println!("  Agent researching...");
    }
    if let Some(err) = sub.error() {
        println!("  ! {err}");
    }
    println!();
}

// ── Result card ──

pub fn print_result(view: &ResultView) {
    let header = &view.header;
    println!("=== {} ===", header.company_name);
    let mut subtitle = Vec::new();
    if let Some(domain) = header.company_domain.as_deref().filter(|d| !d.is_empty()) {
        subtitle.push(domain.to_string());
    }
    if let Some(ts) = header.created_at {
        subtitle.push(ts.format("%b %-d, %Y").to_string());
    }
    if !subtitle.is_empty() {
        println!("{}", subtitle.join(" • "));
    }
    if let Some(persona) = &header.icp_persona {
        println!("ICP: {persona}");
    }
    println!(
        "{}   {}",
        badge(view.reply_badge, "Reply", "%"),
        badge(view.quality_badge, "Quality", "")
    );
    println!();

    println!("Generated Email");
    print_field("Subject", view.email.subject.as_deref());
    if let Some(body) = &view.email.body {
        for line in body.lines() {
            println!("    {line}");
        }
    }
    print_list("Personalization", &view.email.personalization);
    print_field("CTA", view.email.cta.as_deref());
    println!();

    println!("Company Intelligence");
    print_field("Summary", view.insights.company_summary.as_deref());
    print_list("Key insights", &view.insights.key_insights);
    print_list("Pain points", &view.insights.pain_points);
    print_list("Opportunities", &view.insights.opportunities);
    print_field("Pain hypothesis", view.pain_hypothesis.as_deref());
    println!();

    print_decision_makers(&view.decision_makers);

    if !view.tech_stack.is_empty() {
        println!("Tech Stack");
        for tech in view.tech_stack.iter().take(MAX_LIST_ITEMS) {
            print!("  {:<26} {}", tech.technology, tech.category.as_deref().unwrap_or(""));
            if let Some(c) = tech.confidence {
                print!("  ({:.0}%)", c * 100.0);
            }
            println!();
        }
        more(view.tech_stack.len());
        println!();
    }

    print_factors(&view.factors);
    print_field("Reasoning", view.reasoning.as_deref());
    println!();
}

fn print_decision_makers(people: &[DecisionMakerView]) {
    if people.is_empty() {
        return;
    }
    println!("Decision Makers");
    for dm in people.iter().take(MAX_LIST_ITEMS) {
        let label = if dm.name.is_empty() { "-" } else { dm.name.as_str() };
        println!(
            "  [{:<3}] {:<22} {}",
            dm.initials,
            truncate(label, 22),
            dm.title.as_deref().unwrap_or("")
        );
        println!("        relevance {} {:.0}%", bar(dm.relevance_width), dm.relevance_width);
        if let Some(email) = &dm.email {
            println!("        {email}");
        }
        if let Some(url) = &dm.linkedin_url {
            println!("        {url}");
        }
    }
    more(people.len());
    println!();
}

fn print_factors(factors: &[FactorBar]) {
    if factors.is_empty() {
        return;
    }
    println!("Scoring Factors");
    for f in factors {
        println!("  {:<26} {} {:.1}/10", f.name, bar(f.width), f.value);
    }
}

// ── Helpers ──

fn print_field(label: &str, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
        println!("  {:<26} {}", label, v);
    }
}

fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("  {label}:");
    for item in items.iter().take(MAX_LIST_ITEMS) {
        println!("    - {item}");
    }
    more(items.len());
}

fn more(len: usize) {
    if len > MAX_LIST_ITEMS {
        println!("    ... and {} more", len - MAX_LIST_ITEMS);
    }
}

fn badge(badge: ScoreBadge, label: &str, unit: &str) -> String {
    format!("{label}: {}{unit} ({})", badge.percent, badge.tier.label())
}

/// Fixed-width bar for a percentage; out-of-range widths are clamped.
pub fn bar(width_percent: f64) -> String {
    let filled = ((width_percent.clamp(0.0, 100.0) / 100.0) * BAR_CELLS as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_CELLS - filled))
}

fn short_time(ts: &DateTime<Utc>) -> String {
    ts.format("%b %-d, %-I:%M %p").to_string()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}
