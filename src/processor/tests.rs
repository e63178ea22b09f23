use std::collections::HashSet;

use super::*;

fn processor() -> DocumentProcessor {
    DocumentProcessor::new(ChunkingConfig::default()).expect("default config is valid")
}

fn page(number: u32, text: &str) -> Page {
    Page {
        number,
        text: text.to_string(),
    }
}

#[test]
fn rejects_invalid_chunking_config() {
    let result = DocumentProcessor::new(ChunkingConfig {
        max_chunk_size: 0,
        overlap_size: 0,
    });
    assert!(matches!(result, Err(ConfigError::InvalidMaxChunkSize(0))));
}

#[test]
fn assigns_ids_from_stem_page_and_index() {
    let chunks = processor().process(
        "hr_leave_policy.pdf",
        &[page(1, "First sentence. Second sentence."), page(3, "Later page.")],
    );

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].id, "hr_leave_policy_p1_c0");
    assert_eq!(chunks[1].id, "hr_leave_policy_p3_c0");
}

#[test]
fn chunk_indices_restart_per_page() {
    let config = ChunkingConfig {
        max_chunk_size: 30,
        overlap_size: 0,
    };
    let processor = DocumentProcessor::new(config).expect("config is valid");
    let long_page = "Alpha sentence lives here. Beta sentence lives here. Gamma sentence lives here.";

    let chunks = processor.process("doc.pdf", &[page(1, long_page), page(2, long_page)]);

    let page_one: Vec<u32> = chunks
        .iter()
        .filter(|c| c.page_number == 1)
        .map(|c| c.chunk_index)
        .collect();
    let page_two: Vec<u32> = chunks
        .iter()
        .filter(|c| c.page_number == 2)
        .map(|c| c.chunk_index)
        .collect();

    assert!(page_one.len() > 1);
    assert_eq!(page_one, (0..page_one.len() as u32).collect::<Vec<_>>());
    assert_eq!(page_two, (0..page_two.len() as u32).collect::<Vec<_>>());
}

#[test]
fn ids_are_unique_within_a_document() {
    let config = ChunkingConfig {
        max_chunk_size: 25,
        overlap_size: 10,
    };
    let processor = DocumentProcessor::new(config).expect("config is valid");
    let text = "One sentence here. Two sentences here. Three sentences here. Four sentences here.";

    let chunks = processor.process("report.pdf", &[page(1, text), page(2, text), page(3, text)]);

    let ids: HashSet<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids.len(), chunks.len());
}

#[test]
fn derives_title_and_keeps_source() {
    let chunks = processor().process("employee_handbook_2024.pdf", &[page(1, "Policy text.")]);

    assert_eq!(chunks[0].title, "Employee Handbook 2024");
    assert_eq!(chunks[0].source, "employee_handbook_2024.pdf");
}

#[test]
fn title_casing_lowercases_the_tail() {
    let chunks = processor().process("HR_POLICY.pdf", &[page(1, "Policy text.")]);
    assert_eq!(chunks[0].title, "Hr Policy");
    assert_eq!(chunks[0].id, "HR_POLICY_p1_c0");
}

#[test]
fn source_without_extension_is_its_own_stem() {
    let chunks = processor().process("handbook", &[page(1, "Some text.")]);
    assert_eq!(chunks[0].id, "handbook_p1_c0");
    assert_eq!(chunks[0].source, "handbook");
}

#[test]
fn no_pages_produce_no_chunks() {
    assert!(processor().process("empty.pdf", &[]).is_empty());
}

#[test]
fn processing_is_deterministic() {
    let pages = [page(1, "Stable input. Stable output. Every run."), page(2, "More text here.")];
    let first = processor().process("doc.pdf", &pages);
    let second = processor().process("doc.pdf", &pages);
    assert_eq!(first, second);
}
