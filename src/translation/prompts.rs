/*!
 * Prompt templates for chunk translation.
 *
 * User templates use named placeholders (`{source}`, `{prev_summary}`,
 * `{prev_context}`, `{target_lang}`). Literal braces are written `{{` and
 * `}}`. Templates are parsed once; unknown placeholders are rejected up
 * front instead of being passed through to the model.
 */

use crate::errors::TemplateError;
use crate::providers::openai::ChatMessage;

/// System instruction sent with every chunk.
pub const SYSTEM_PROMPT: &str = "You are a professional translator. Keep formatting as plaintext. \
If the input is code or structured data, preserve code blocks and technical terms.";

/// Default user template.
pub const DEFAULT_TEMPLATE: &str = "Translate the following text into {target_lang}. \
Preserve the paragraph structure, code blocks and technical terms.

Preceding translated context (for continuity only, do not translate or repeat it):
{prev_context}

Text to translate:
{source}";

/// A placeholder a template may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Source,
    PrevSummary,
    PrevContext,
    TargetLang,
}

impl Placeholder {
    fn parse(name: &str) -> Result<Self, TemplateError> {
        match name {
            "source" => Ok(Self::Source),
            "prev_summary" => Ok(Self::PrevSummary),
            "prev_context" => Ok(Self::PrevContext),
            "target_lang" => Ok(Self::TargetLang),
            other => Err(TemplateError::UnknownPlaceholder(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Placeholder),
}

/// Values substituted into a [`PromptTemplate`].
#[derive(Debug, Clone, Copy)]
pub struct PromptFields<'a> {
    pub source: &'a str,
    pub prev_summary: &'a str,
    pub prev_context: &'a str,
    pub target_lang: &'a str,
}

impl PromptFields<'_> {
    fn get(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::Source => self.source,
            Placeholder::PrevSummary => self.prev_summary,
            Placeholder::PrevContext => self.prev_context,
            Placeholder::TargetLang => self.target_lang,
        }
    }
}

/// Parsed user prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parse a template, failing on unknown placeholders or stray braces.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, inner) in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        name.push(inner);
                    }
                    if !closed {
                        return Err(TemplateError::UnclosedPlaceholder(pos));
                    }
                    let field = Placeholder::parse(name.trim())?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(field));
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(TemplateError::UnmatchedBrace(pos)),
                other => literal.push(other),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Whether the template references `placeholder` at least once.
    pub fn uses(&self, placeholder: Placeholder) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Field(p) if *p == placeholder))
    }

    /// Substitute the fields into the template.
    pub fn render(&self, fields: &PromptFields<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(placeholder) => out.push_str(fields.get(*placeholder)),
            }
        }
        out
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::parse(DEFAULT_TEMPLATE).unwrap_or_else(|_| Self {
            segments: vec![Segment::Field(Placeholder::Source)],
        })
    }
}

/// Build the two-message request for one chunk.
pub fn build_messages(template: &PromptTemplate, fields: &PromptFields<'_>) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(template.render(fields)),
    ]
}
