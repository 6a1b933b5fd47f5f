//! Terminal rendering of sessions and analyses.
//!
//! `describe_*` functions build plain lines; `print_*` functions color them.

use algoscope_application::FailureClass;
use algoscope_core::analysis::{
    AnalysisResult, CaseType, ComplexityCase, ResolutionCase, StructuralMetric,
};
use algoscope_core::session::{Message, MessageRole, Session};
use colored::Colorize;

/// Turns diagram source into something printable.
pub trait DiagramRenderer {
    fn render(&self, text: &str, is_dark: bool) -> String;
}

/// Prints the diagram source inside a frame.
pub struct PlainDiagramRenderer;

impl DiagramRenderer for PlainDiagramRenderer {
    fn render(&self, text: &str, is_dark: bool) -> String {
        let bar = if is_dark { "┃" } else { "│" };
        if text.trim().is_empty() {
            return format!("{bar} (no diagram available)");
        }
        text.lines()
            .map(|line| format!("{bar} {line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Strips a leading ```lang fence and trailing ``` from message content.
pub fn strip_code_fence(content: &str) -> Option<&str> {
    let rest = content.strip_prefix("```")?;
    let body = match rest.split_once('\n') {
        Some((tag, body)) if tag.chars().all(|c| c.is_ascii_alphabetic()) => body,
        _ => rest,
    };
    Some(body.trim_end().strip_suffix("```").unwrap_or(body).trim_end())
}

// ============================================================================
// Plain descriptions
// ============================================================================

fn case_name(case_type: Option<CaseType>) -> &'static str {
    match case_type {
        None => "All cases",
        Some(CaseType::Best) => "Best case",
        Some(CaseType::Worst) => "Worst case",
        Some(CaseType::Average) => "Average case",
    }
}

fn describe_complexity(label: &str, case: &ComplexityCase) -> String {
    let mut line = format!("{label}: {}", case.function.as_deref().unwrap_or("-"));
    if let Some(condition) = &case.condition {
        line.push_str(&format!(" when {condition}"));
    }
    if let Some(explanation) = &case.explanation {
        line.push_str(&format!(" ({explanation})"));
    }
    line
}

fn describe_resolution(label: &str, case: &ResolutionCase) -> Vec<String> {
    let details = &case.resolution;
    let bound = |value: &Option<String>| value.as_deref().unwrap_or("?").to_string();
    let mut lines = vec![format!(
        "{label}: O({}) Ω({}) Θ({}){}",
        bound(&details.big_o),
        bound(&details.omega),
        bound(&details.theta),
        if details.is_tight_bound { " tight" } else { "" }
    )];
    if let Some(equation) = &case.original_equation {
        lines.push(format!("  from {equation}"));
    }
    if let Some(method) = &details.method {
        lines.push(format!("  method: {method}"));
    }
    for (i, step) in details.steps.iter().enumerate() {
        lines.push(format!("  {}. {step}", i + 1));
    }
    if let Some(explanation) = &details.explanation {
        lines.push(format!("  {explanation}"));
    }
    lines
}

/// Plain-text breakdown of an analysis, one entry per line.
pub fn describe_analysis(result: &AnalysisResult) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(translation) = &result.translation {
        lines.push(format!(
            "Translation: {} after {} attempt(s), confidence {:.0}%",
            if translation.validated { "validated" } else { "not validated" },
            translation.attempts,
            translation.confidence * 100.0
        ));
    }

    if let Some(analysis) = &result.analysis {
        let name = analysis.algorithm_name.as_deref().unwrap_or("unnamed");
        let kind = analysis.algorithm_type.as_deref().unwrap_or("unknown type");
        lines.push(format!("Algorithm: {name} ({kind})"));
        match analysis.metric {
            Some(StructuralMetric::RecursiveCalls(n)) => lines.push(format!("Recursive calls: {n}")),
            Some(StructuralMetric::NestingDepth(n)) => lines.push(format!("Max nesting: {n}")),
            None => {}
        }
        if let Some(base) = &analysis.base_case_condition {
            lines.push(format!("Base case: {base}"));
        }
        for (case_type, case) in analysis.cases.present() {
            lines.push(describe_complexity(case_name(case_type), case));
        }
    }

    if let Some(resolution) = &result.resolution {
        for (case_type, case) in resolution.cases.present() {
            lines.extend(describe_resolution(case_name(case_type), case));
        }
    }

    if let Some(ast) = &result.ast {
        if ast.from_cache {
            lines.push("AST served from cache".to_string());
        }
    }
    if let Some(error) = result.error.as_deref().filter(|e| !e.is_empty()) {
        lines.push(format!("Service reported: {error}"));
    }
    lines
}

// ============================================================================
// Colored output
// ============================================================================

pub fn print_session_list(sessions: &[Session], current_id: Option<&str>) {
    for (i, session) in sessions.iter().enumerate() {
        let marker = if Some(session.id.as_str()) == current_id { "*" } else { " " };
        let mode = session
            .input_mode()
            .map(|m| m.as_str())
            .unwrap_or("no mode");
        println!(
            "{} {} {} {}",
            marker.bright_green(),
            format!("{:>2}.", i + 1).bright_black(),
            session.title.bold(),
            format!("[{mode}, {} messages]", session.messages().len()).bright_black()
        );
    }
}

pub fn print_message(message: &Message, renderer: &dyn DiagramRenderer, is_dark: bool) {
    match message.role() {
        MessageRole::User => {
            println!("{}", "You".bright_black());
            let content = strip_code_fence(message.content()).unwrap_or(message.content());
            for line in content.lines() {
                println!("{}", line.green());
            }
        }
        MessageRole::Assistant if message.is_pending() => {
            println!("{}", message.content().yellow());
        }
        MessageRole::Assistant if message.is_error() => {
            let class = FailureClass::classify(message.error_detail().unwrap_or(message.content()));
            println!("{}", message.content().red());
            println!("{}", class.hint().bright_black());
        }
        MessageRole::Assistant => {
            println!("{}", "Analyzer".bright_black());
            println!("{}", message.content().bright_blue().bold());
            if let Some(analysis) = message.analysis() {
                print_analysis(analysis, renderer, is_dark);
            }
        }
    }
}

pub fn print_analysis(result: &AnalysisResult, renderer: &dyn DiagramRenderer, is_dark: bool) {
    for line in describe_analysis(result) {
        if line.starts_with("  ") {
            println!("{}", line.bright_black());
        } else {
            println!("{}", line.bright_blue());
        }
    }
    if let Some(diagram) = &result.mermaid {
        println!("{}", renderer.render(diagram, is_dark));
    }
}

pub fn print_session(session: &Session, renderer: &dyn DiagramRenderer, is_dark: bool) {
    println!("{}", format!("== {} ==", session.title).bright_magenta().bold());
    if session.messages().is_empty() {
        match session.input_mode() {
            None => println!(
                "{}",
                "Choose how you will write in this chat: /mode pseudocode or /mode natural".bright_black()
            ),
            Some(_) => println!(
                "{}",
                "No messages yet. Write your first message to start the analysis.".bright_black()
            ),
        }
    }
    for message in session.messages() {
        print_message(message, renderer, is_dark);
        println!();
    }
}

pub fn print_help() {
    let rows = [
        ("/new", "start a new chat"),
        ("/list", "list chats"),
        ("/switch <n|id>", "switch to a chat"),
        ("/rename <title>", "rename the current chat"),
        ("/mode pseudocode|natural", "choose the input mode (once per chat)"),
        ("/retry", "resend the last message"),
        ("/theme", "toggle light/dark"),
        ("/show", "show the current chat"),
        ("/quit", "exit"),
    ];
    for (command, description) in rows {
        println!("  {:<26} {}", command.bright_cyan(), description.bright_black());
    }
    println!(
        "  {}",
        "End a line with \\ to continue the message on the next line.".bright_black()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```pseudo\nx <- 1\n```"), Some("x <- 1"));
        assert_eq!(strip_code_fence("plain"), None);
    }

    #[test]
    fn test_diagram_fallback_when_empty() {
        let renderer = PlainDiagramRenderer;
        assert!(renderer.render("  ", false).contains("no diagram available"));
        assert_eq!(renderer.render("A-->B\nB-->C", true), "┃ A-->B\n┃ B-->C");
    }

    #[test]
    fn test_describe_distinct_analysis() {
        let result: AnalysisResult = serde_json::from_value(json!({
            "analysis": {
                "algorithm_name": "linear_search",
                "algorithm_type": "iterative",
                "max_nesting": 1,
                "has_different_cases": true,
                "best_case": { "case_type": "best", "function": "1", "condition": "first element" },
                "worst_case": { "case_type": "worst", "function": "n" }
            },
            "resolution": {
                "has_different_cases": true,
                "worst_case": {
                    "case_type": "worst",
                    "resolution": { "O": "n", "Theta": "n", "is_tight_bound": true, "steps": ["sum 1..n"] }
                }
            }
        }))
        .unwrap();

        let lines = describe_analysis(&result);
        assert_eq!(lines[0], "Algorithm: linear_search (iterative)");
        assert_eq!(lines[1], "Max nesting: 1");
        assert_eq!(lines[2], "Best case: 1 when first element");
        assert_eq!(lines[3], "Worst case: n");
        assert_eq!(lines[4], "Worst case: O(n) Ω(?) Θ(n) tight");
        assert_eq!(lines[5], "  1. sum 1..n");
    }
}
