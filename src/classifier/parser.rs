//! Extraction of a category and reply from untrusted model output.
//!
//! The model is asked for `CATEGORIA: ...` / `RESPOSTA: ...`, but nothing
//! enforces that. Parsing is therefore total: every input yields a category and
//! a non-empty reply, and deviations fall through an ordered rule table instead
//! of raising.

use crate::domain::{Category, ClassificationResult};

use super::prompt::{CATEGORY_LABEL, PRODUCTIVE_TOKEN, REPLY_LABEL, UNPRODUCTIVE_TOKEN};

pub const DEFAULT_REPLY: &str = "Obrigado pelo seu email. Entraremos em contato em breve.";

/// Which rule decided the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryRule {
    /// Labelled line names PRODUTIVO and not IMPRODUTIVO.
    LabelledProductive,
    /// Labelled line names IMPRODUTIVO.
    LabelledUnproductive,
    /// No usable label, but IMPRODUTIVO appears somewhere in the output.
    UnlabelledMention,
    /// Nothing usable; ambiguous output is treated as actionable.
    Default,
}

impl CategoryRule {
    pub fn label(&self) -> &'static str {
        match self {
            CategoryRule::LabelledProductive => "labelled-productive",
            CategoryRule::LabelledUnproductive => "labelled-unproductive",
            CategoryRule::UnlabelledMention => "unlabelled-mention",
            CategoryRule::Default => "default",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Extracted,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub result: ClassificationResult,
    pub category_rule: CategoryRule,
    pub reply_source: ReplySource,
}

impl ParseOutcome {
    /// True when the output did not follow the two-line contract closely
    /// enough for both fields to be read from their labelled lines.
    pub fn deviated(&self) -> bool {
        matches!(
            self.category_rule,
            CategoryRule::UnlabelledMention | CategoryRule::Default
        ) || self.reply_source == ReplySource::Default
    }
}

struct Scan<'a> {
    /// Uppercased value after the first colon of the first labelled line.
    labelled_value: Option<String>,
    output: &'a str,
}

type Resolver = fn(&Scan<'_>) -> Option<Category>;

// Evaluated top to bottom; the first rule that resolves wins. The last entry
// always resolves.
const CATEGORY_RULES: [(CategoryRule, Resolver); 4] = [
    (CategoryRule::LabelledProductive, labelled_productive),
    (CategoryRule::LabelledUnproductive, labelled_unproductive),
    (CategoryRule::UnlabelledMention, unlabelled_mention),
    (CategoryRule::Default, always_productive),
];

fn labelled_productive(scan: &Scan<'_>) -> Option<Category> {
    let value = scan.labelled_value.as_deref()?;
    (value.contains(PRODUCTIVE_TOKEN) && !value.contains(UNPRODUCTIVE_TOKEN))
        .then_some(Category::Productive)
}

fn labelled_unproductive(scan: &Scan<'_>) -> Option<Category> {
    let value = scan.labelled_value.as_deref()?;
    value
        .contains(UNPRODUCTIVE_TOKEN)
        .then_some(Category::Unproductive)
}

fn unlabelled_mention(scan: &Scan<'_>) -> Option<Category> {
    scan.output
        .to_uppercase()
        .contains(UNPRODUCTIVE_TOKEN)
        .then_some(Category::Unproductive)
}

fn always_productive(_: &Scan<'_>) -> Option<Category> {
    Some(Category::Productive)
}

/// Parses model output into a classification. Never fails.
pub fn parse(model_output: &str) -> ClassificationResult {
    parse_detailed(model_output).result
}

pub fn parse_detailed(model_output: &str) -> ParseOutcome {
    let (category, category_rule) = extract_category(model_output);
    let (response, reply_source) = extract_reply(model_output);
    ParseOutcome {
        result: ClassificationResult { category, response },
        category_rule,
        reply_source,
    }
}

fn extract_category(output: &str) -> (Category, CategoryRule) {
    let labelled_value = output
        .lines()
        .find(|line| line.to_uppercase().contains(CATEGORY_LABEL))
        .map(|line| value_after_colon(line).to_uppercase());

    let scan = Scan {
        labelled_value,
        output,
    };

    CATEGORY_RULES
        .iter()
        .find_map(|(rule, resolve)| resolve(&scan).map(|category| (category, *rule)))
        .unwrap_or((Category::Productive, CategoryRule::Default))
}

enum ReplyState {
    Searching,
    Capturing,
}

fn extract_reply(output: &str) -> (String, ReplySource) {
    let mut state = ReplyState::Searching;
    let mut fragments: Vec<&str> = Vec::new();

    for line in output.lines() {
        match state {
            ReplyState::Searching => {
                if line.to_uppercase().contains(REPLY_LABEL) {
                    fragments.push(value_after_colon(line));
                    state = ReplyState::Capturing;
                }
            }
            ReplyState::Capturing => fragments.push(line.trim()),
        }
    }

    let reply = fragments
        .into_iter()
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if reply.is_empty() {
        (DEFAULT_REPLY.to_string(), ReplySource::Default)
    } else {
        (reply, ReplySource::Extracted)
    }
}

/// Text after the first colon on the line, trimmed.
fn value_after_colon(line: &str) -> &str {
    line.split_once(':')
        .map(|(_, rest)| rest.trim())
        .unwrap_or_default()
}
