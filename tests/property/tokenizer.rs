//! Tokenizer properties: normalization, qualifier syntax, emptiness.

use proptest::prelude::*;
use talpa::Tokenizer;

proptest! {
    /// No token is ever empty, whatever the input.
    #[test]
    fn tokens_are_never_empty(query in "\\PC{0,60}") {
        for token in Tokenizer::new().tokenize(&query) {
            prop_assert!(!token.text.is_empty());
            if let Some(qualifiers) = &token.qualifiers {
                prop_assert!(!qualifiers.is_empty());
                prop_assert!(qualifiers.iter().all(|q| !q.is_empty()));
            }
        }
    }

    /// Token text is already in normal form: lowercase, no configured
    /// punctuation, no whitespace.
    #[test]
    fn tokens_are_normalized(query in "[A-Za-z,.;:! ]{0,60}") {
        for token in Tokenizer::new().tokenize(&query) {
            prop_assert_eq!(token.text.clone(), token.text.to_lowercase());
            prop_assert!(!token.text.contains(char::is_whitespace));
            prop_assert!(!token.text.contains([',', '.', ';', '!']));
        }
    }

    /// Tokenizing is insensitive to surrounding and repeated whitespace.
    #[test]
    fn whitespace_shape_is_irrelevant(words in prop::collection::vec("[a-z]{1,8}", 0..6)) {
        let single = words.join(" ");
        let messy = format!("  {}  ", words.join("   "));
        let tokenizer = Tokenizer::new();
        prop_assert_eq!(tokenizer.tokenize(&single), tokenizer.tokenize(&messy));
    }

    /// The qualifier split preserves the qualifier list and the text.
    #[test]
    fn qualifier_syntax_round_trips(
        qualifiers in prop::collection::vec("[a-z]{1,6}", 1..4),
        text in "[a-z]{1,10}",
    ) {
        let query = format!("{}:{}", qualifiers.join(","), text);
        let tokens = Tokenizer::new().tokenize(&query);
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(&tokens[0].text, &text);
        prop_assert_eq!(tokens[0].qualifiers.as_ref(), Some(&qualifiers));
    }

    /// Index-side tokens agree with unqualified query tokens.
    #[test]
    fn index_and_query_tokens_agree(text in "[A-Za-z,. ]{0,60}") {
        let tokenizer = Tokenizer::new();
        let query_texts: Vec<String> = tokenizer
            .tokenize(&text)
            .into_iter()
            .map(|token| token.text)
            .collect();
        prop_assert_eq!(tokenizer.index_tokens(&text), query_texts);
    }
}
