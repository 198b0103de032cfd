use super::*;
use crate::retrieval::Passage;

fn found(entries: &[(&str, &str)]) -> RetrievalResult {
    RetrievalResult::from_passages(
        entries
            .iter()
            .map(|(label, text)| Passage::new(*label, *text))
            .collect(),
    )
}

fn psalms() -> RetrievalResult {
    found(&[
        ("SL 23:1", "O Senhor é o meu pastor"),
        ("SL 23:2", "Deitar-me faz em verdes pastos"),
        ("SL 23:3", "Refrigera a minha alma"),
    ])
}

#[test]
fn test_joins_in_order_with_newlines() {
    let context = ContextAssembler::new().assemble(&psalms(), 7);

    assert!(context.is_grounded());
    assert_eq!(context.items(), 3);
    assert_eq!(
        context.text(),
        "SL 23:1: O Senhor é o meu pastor\n\
         SL 23:2: Deitar-me faz em verdes pastos\n\
         SL 23:3: Refrigera a minha alma"
    );
}

#[test]
fn test_never_exceeds_max_items() {
    let context = ContextAssembler::new().assemble(&psalms(), 2);

    assert_eq!(context.items(), 2);
    assert_eq!(context.text().lines().count(), 2);
    assert!(context.text().starts_with("SL 23:1"));
    assert!(!context.text().contains("SL 23:3"));
}

#[test]
fn test_no_match_yields_marker() {
    let context = ContextAssembler::new().assemble(&RetrievalResult::NoMatch, 7);

    assert_eq!(context, Context::NoContext);
    assert_eq!(context.text(), NO_CONTEXT_MARKER);
    assert_eq!(context.to_string(), NO_CONTEXT_MARKER);
    assert_eq!(context.items(), 0);
}

#[test]
fn test_zero_items_yields_marker() {
    assert_eq!(
        ContextAssembler::new().assemble(&psalms(), 0),
        Context::NoContext
    );
}

#[test]
fn test_marker_is_not_verse_shaped() {
    assert!(!NO_CONTEXT_MARKER.contains('\n'));
    assert!(NO_CONTEXT_MARKER.contains("conhecimento geral"));
}

#[test]
fn test_char_budget_stops_before_overflow() {
    let first_two = "SL 23:1: O Senhor é o meu pastor\nSL 23:2: Deitar-me faz em verdes pastos";
    let budget = first_two.chars().count();

    let context = ContextAssembler::with_max_chars(budget).assemble(&psalms(), 7);

    assert_eq!(context.items(), 2);
    assert_eq!(context.text(), first_two);
}

#[test]
fn test_char_budget_truncates_first_entry_on_char_boundary() {
    let result = found(&[("SL 23:1", "O Senhor é o meu pastor")]);

    let context = ContextAssembler::with_max_chars(19).assemble(&result, 7);

    assert_eq!(context.items(), 1);
    assert_eq!(context.text(), "SL 23:1: O Senhor é");
    assert_eq!(context.text().chars().count(), 19);
}

#[test]
fn test_generous_budget_keeps_everything() {
    let context = ContextAssembler::with_max_chars(10_000).assemble(&psalms(), 7);
    assert_eq!(context.items(), 3);
    assert_eq!(
        ContextAssembler::with_max_chars(10_000).max_chars(),
        Some(10_000)
    );
}

#[test]
fn test_zero_budget_yields_marker_not_empty_block() {
    let result = found(&[("GN 1:1", "No princípio criou Deus os céus e a terra")]);

    let context = ContextAssembler::with_max_chars(0).assemble(&result, 7);

    assert_eq!(context, Context::NoContext);
    assert_eq!(context.text(), NO_CONTEXT_MARKER);
    assert_eq!(context.items(), 0);
}

#[test]
fn test_one_char_budget_keeps_a_non_empty_prefix() {
    let context = ContextAssembler::with_max_chars(1).assemble(&psalms(), 7);

    assert!(context.is_grounded());
    assert_eq!(context.text(), "S");
}
