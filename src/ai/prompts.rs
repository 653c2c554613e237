//! Instruction templates and prompt builders for text generation.
//!
//! Prompts only wrap journal text; the text blocks themselves are produced by
//! `export::prompt` so the same serialization feeds every model call.

/// System instruction for reformatting a single entry.
pub const REFORMAT_INSTRUCTION: &str = r#"You are an editor helping a researcher tidy up field-journal notes.

Guidelines:
- Rewrite the notes as clear, well-structured prose, keeping one paragraph per section
- Correct spelling and punctuation
- Keep every fact, name and place exactly as written
- Do not add interpretations, conclusions or information that is not in the notes
- Answer in the same language as the notes"#;

/// System instruction for merging several entries about one location.
pub const MERGE_INSTRUCTION: &str = r#"You are an editor consolidating field-journal notes taken at the same place on different visits.

Guidelines:
- Merge the visits into a single account, organised by section
- Remove repetition but keep every distinct observation
- When visits disagree, keep both statements and say which visit each comes from
- Do not add information that is not in the notes
- Answer in the same language as the notes"#;

/// Builds the user prompt for reformatting one entry's text block.
pub fn reformat_prompt(location: &str, text_block: &str) -> String {
    format!(
        r#"Reformat the following field notes taken at "{}".

Notes:
---
{}
---"#,
        location, text_block
    )
}

/// Builds the user prompt for merging every visit to one location.
pub fn merge_prompt(location: &str, visit_blocks: &[String]) -> String {
    let visits = if visit_blocks.is_empty() {
        "No notes recorded for this location.".to_string()
    } else {
        visit_blocks
            .iter()
            .enumerate()
            .map(|(i, block)| format!("[Visit {}]\n{}\n", i + 1, block))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"Merge these notes from {} visit(s) to "{}" into one account.

Visits:
---
{}
---"#,
        visit_blocks.len(),
        location,
        visits
    )
}
