use crate::core::citation::CitationStyle;
use crate::search::PaperRecord;

/// The single system instruction injected on every generation call. Never
/// persisted; replaying stored history reconstructs it at call time.
pub const SYSTEM_PROMPT: &str = "\
You are a paper summarization and citation expert who helps researchers. \
When the user gives you a topic together with retrieved paper data, answer \
strictly from that data.

Rules:
- Base every summary on the provided abstract; never invent findings.
- Follow the requested citation style exactly, including author name \
formatting (Last, F. M. where the style demands it).
- Always include the paper's URL inside the citation.
- If the provided data contains no papers, say so honestly.";

/// Builds the instruction block for one turn: the recomputed record count
/// with the exhaustive-coverage directive, the citation style name verbatim,
/// the fixed per-paper reply template, and the serialized records beneath.
pub fn compose_prompt(
    original_query: &str,
    translated_query: &str,
    records: &[PaperRecord],
    style: CitationStyle,
    language: &str,
) -> String {
    let count = records.len();
    let style_name = style.style_name();

    let mut prompt = format!(
        "The user is looking for papers about \"{original_query}\" \
         (search keywords used: \"{translated_query}\").\n\
         Exactly {count} papers were retrieved. Your reply MUST cover every \
         one of the {count} papers individually. Never merge papers into one \
         entry and never omit a paper.\n\n\
         For each paper, use this exact shape:\n\n\
         ### N. [Paper Title] (Publication Year)\n\
         * **Summary:** a summary of the abstract in {language}, three \
         sentences at most.\n\
         * **{style_name} citation:** a complete citation in {style_name} \
         style, including the paper's URL.\n\
         * **PDF link:** the bare PDF link URL.\n\n\
         [Retrieved paper data]\n"
    );

    for record in records {
        prompt.push('\n');
        prompt.push_str(&record.to_block());
        prompt.push('\n');
    }

    prompt
}
