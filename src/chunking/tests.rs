use super::*;

#[test]
fn splits_on_terminal_punctuation() {
    let sentences = split_into_sentences("First sentence. Second one! Third one? Fourth.");
    assert_eq!(
        sentences,
        vec!["First sentence.", "Second one!", "Third one?", "Fourth."]
    );
}

#[test]
fn punctuation_stays_attached() {
    let sentences = split_into_sentences("Is it done? Yes.");
    assert_eq!(sentences, vec!["Is it done?", "Yes."]);
}

#[test]
fn mid_token_periods_do_not_split() {
    // Decimal points and tight abbreviations have no trailing whitespace.
    let sentences = split_into_sentences("Pi is roughly 3.14159 in value. Next sentence.");
    assert_eq!(
        sentences,
        vec!["Pi is roughly 3.14159 in value.", "Next sentence."]
    );
}

#[test]
fn no_punctuation_yields_whole_text() {
    let sentences = split_into_sentences("  a block of text with no terminator  ");
    assert_eq!(sentences, vec!["a block of text with no terminator"]);
}

#[test]
fn empty_and_whitespace_yield_nothing() {
    assert!(split_into_sentences("").is_empty());
    assert!(split_into_sentences("   \n\t  ").is_empty());
}

#[test]
fn splitting_across_newlines() {
    let sentences = split_into_sentences("First line.\nSecond line.\n\nThird.");
    assert_eq!(sentences, vec!["First line.", "Second line.", "Third."]);
}

#[test]
fn consecutive_punctuation_breaks_once() {
    let sentences = split_into_sentences("Wait...! Really? Yes.");
    assert_eq!(sentences, vec!["Wait...!", "Really?", "Yes."]);
}

#[test]
fn default_config_is_valid() {
    assert!(ChunkingConfig::default().validate().is_ok());
}

#[test]
fn zero_max_chunk_size_rejected() {
    let config = ChunkingConfig {
        max_chunk_size: 0,
        overlap_size: 0,
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidMaxChunkSize(0))
    ));
}

#[test]
fn overlap_must_be_smaller_than_max() {
    let config = ChunkingConfig {
        max_chunk_size: 100,
        overlap_size: 100,
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidOverlapSize(100, 100))
    ));
}

#[test]
fn short_text_is_one_chunk() {
    let config = ChunkingConfig::default();
    let chunks = chunk_text("One short sentence.", &config);
    assert_eq!(chunks, vec!["One short sentence."]);
}

#[test]
fn empty_text_produces_no_chunks() {
    let config = ChunkingConfig::default();
    assert!(chunk_text("", &config).is_empty());
    assert!(chunk_text("  \n ", &config).is_empty());
}

#[test]
fn overlap_carries_trailing_sentence() {
    // Sentences of length 2 each; "A. B." fills the 7-char budget, and the
    // 3-char overlap budget admits exactly one trailing sentence.
    let config = ChunkingConfig {
        max_chunk_size: 7,
        overlap_size: 3,
    };
    let chunks = chunk_text("A. B. C.", &config);
    assert_eq!(chunks, vec!["A. B.", "B. C."]);
}

#[test]
fn overlap_prefers_two_trailing_sentences() {
    let config = ChunkingConfig {
        max_chunk_size: 20,
        overlap_size: 6,
    };
    // "Abcdefghi. B. C." flushes when the last sentence arrives; both "B."
    // and "C." fit under the 6-char overlap budget (joined length 5).
    let chunks = chunk_text("Abcdefghi. B. C. Defghijkl.", &config);
    assert_eq!(chunks, vec!["Abcdefghi. B. C.", "B. C. Defghijkl."]);
}

#[test]
fn zero_overlap_never_duplicates() {
    let config = ChunkingConfig {
        max_chunk_size: 30,
        overlap_size: 0,
    };
    let text = "Alpha sentence here. Beta sentence here. Gamma sentence here. Delta sentence here.";
    let chunks = chunk_text(text, &config);
    assert!(chunks.len() > 1);

    let rejoined = chunks.join(" ");
    let original = split_into_sentences(text);
    let reconstructed = split_into_sentences(&rejoined);
    assert_eq!(reconstructed, original);
}

#[test]
fn oversized_sentence_passes_through_unsplit() {
    let config = ChunkingConfig {
        max_chunk_size: 1000,
        overlap_size: 200,
    };
    let long_sentence = format!("{} ends here.", "word ".repeat(500).trim_end());
    assert!(long_sentence.len() > config.max_chunk_size);

    let chunks = chunk_text(&long_sentence, &config);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0], long_sentence);
}

#[test]
fn oversized_sentence_flushes_pending_chunk_and_clears_overlap() {
    let config = ChunkingConfig {
        max_chunk_size: 30,
        overlap_size: 20,
    };
    let long = "x".repeat(40);
    let text = format!("Short one here. {}. After that. Final bit.", long);
    let chunks = chunk_text(&text, &config);

    assert_eq!(chunks[0], "Short one here.");
    assert_eq!(chunks[1], format!("{}.", long));
    // No overlap carried out of the oversized chunk.
    assert_eq!(chunks[2], "After that. Final bit.");
}

#[test]
fn size_bound_holds_unless_single_oversized_sentence() {
    let config = ChunkingConfig {
        max_chunk_size: 50,
        overlap_size: 15,
    };
    let text = "The first point is made here. A second point follows it. \
                Then a considerably longer third point arrives in due course. \
                Short tail. End.";
    for chunk in chunk_text(text, &config) {
        let sentences = split_into_sentences(&chunk);
        assert!(
            chunk.len() <= config.max_chunk_size || sentences.len() == 1,
            "chunk over budget with {} sentences: {:?}",
            sentences.len(),
            chunk
        );
    }
}

#[test]
fn chunks_never_cut_mid_sentence() {
    let config = ChunkingConfig {
        max_chunk_size: 40,
        overlap_size: 10,
    };
    let text = "Employees accrue leave monthly. Unused days roll over once. \
                Approval rests with the manager. Requests go through the portal. \
                Exceptions need written signoff.";
    let original: Vec<&str> = split_into_sentences(text);
    for chunk in chunk_text(text, &config) {
        for sentence in split_into_sentences(&chunk) {
            assert!(
                original.contains(&sentence),
                "sentence was altered: {:?}",
                sentence
            );
        }
    }
}

#[test]
fn no_sentence_is_dropped() {
    let config = ChunkingConfig {
        max_chunk_size: 45,
        overlap_size: 25,
    };
    let text = "One thing happened. Then another thing. A third followed. \
                The fourth was quiet. Five closed it out.";
    let chunks = chunk_text(text, &config);

    let mut reconstructed: Vec<&str> = Vec::new();
    for chunk in &chunks {
        for sentence in split_into_sentences(chunk) {
            // Overlap repeats at most the last two sentences; skip those.
            let duplicated = reconstructed
                .iter()
                .rev()
                .take(2)
                .any(|seen| *seen == sentence);
            if !duplicated {
                reconstructed.push(sentence);
            }
        }
    }
    assert_eq!(reconstructed, split_into_sentences(text));
}

#[test]
fn chunking_is_deterministic() {
    let config = ChunkingConfig {
        max_chunk_size: 60,
        overlap_size: 25,
    };
    let text = "Repeatable input text. It contains several sentences. \
                They pack into chunks. The packing never changes. Not once.";
    assert_eq!(chunk_text(text, &config), chunk_text(text, &config));
}

#[test]
fn unpunctuated_text_over_budget_is_one_oversized_chunk() {
    let config = ChunkingConfig {
        max_chunk_size: 20,
        overlap_size: 5,
    };
    let text = "twenty five characters of plain text without any terminator";
    let chunks = chunk_text(text, &config);
    assert_eq!(chunks, vec![text]);
}
