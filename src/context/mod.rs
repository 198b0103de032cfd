//! Context assembly: retrieved passages into one bounded text block.

#[cfg(test)]
mod tests;

use std::fmt;

use tracing::{debug, warn};

use crate::retrieval::RetrievalResult;

/// Text emitted when retrieval matched nothing. It tells the generator to answer from
/// general knowledge and never collides with verse content.
pub const NO_CONTEXT_MARKER: &str = "Nenhum versículo específico encontrado para esta palavra-chave. \
Por favor, use seu conhecimento geral da Bíblia para responder.";

/// Assembled context, or the explicit absence of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    /// Newline-joined `"{label}: {text}"` entries.
    Grounded { text: String, items: usize },
    /// Nothing matched; renders as [`NO_CONTEXT_MARKER`].
    NoContext,
}

impl Context {
    /// The context block, or [`NO_CONTEXT_MARKER`].
    pub fn text(&self) -> &str {
        match self {
            Self::Grounded { text, .. } => text,
            Self::NoContext => NO_CONTEXT_MARKER,
        }
    }

    pub fn items(&self) -> usize {
        match self {
            Self::Grounded { items, .. } => *items,
            Self::NoContext => 0,
        }
    }

    pub fn is_grounded(&self) -> bool {
        matches!(self, Self::Grounded { .. })
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Joins retrieved passages, optionally under a character budget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextAssembler {
    max_chars: Option<usize>,
}

impl ContextAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the joined block at `max_chars` characters.
    ///
    /// Entries are added in order until the next one would overflow. The first entry is
    /// always kept, truncated if it alone exceeds the budget. A zero budget fits nothing,
    /// so [`assemble`](Self::assemble) then returns [`Context::NoContext`].
    pub fn with_max_chars(max_chars: usize) -> Self {
        Self {
            max_chars: Some(max_chars),
        }
    }

    pub fn max_chars(&self) -> Option<usize> {
        self.max_chars
    }

    /// Joins up to `max_items` rendered passages with `\n`, preserving order.
    pub fn assemble(&self, result: &RetrievalResult, max_items: usize) -> Context {
        let passages = result.passages();
        if passages.is_empty() || max_items == 0 {
            warn!(max_items, "no grounding passages, emitting no-context marker");
            return Context::NoContext;
        }
        if self.max_chars == Some(0) {
            warn!("context budget is zero, emitting no-context marker");
            return Context::NoContext;
        }

        let mut text = String::new();
        let mut used_chars = 0usize;
        let mut items = 0usize;

        for passage in passages.iter().take(max_items) {
            let line = passage.render();
            let line_chars = line.chars().count();
            let separator = usize::from(items > 0);

            if let Some(budget) = self.max_chars {
                if items == 0 && line_chars > budget {
                    text.push_str(truncate_chars(&line, budget));
                    used_chars = budget;
                    items = 1;
                    break;
                }
                if used_chars + separator + line_chars > budget {
                    break;
                }
            }

            if items > 0 {
                text.push('\n');
            }
            text.push_str(&line);
            used_chars += separator + line_chars;
            items += 1;
        }

        debug!(
            items,
            available = passages.len(),
            chars = used_chars,
            "context assembled"
        );

        Context::Grounded { text, items }
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
