// Prompt text and assembly for the match explanation call.

use crate::models::job::JobPosting;

/// Opening instruction placed before the resume text.
pub const RAG_PREAMBLE: &str = "You are a job-matching assistant.\n\nGiven the user's resume:";

/// Bridge between the resume text and the job listings.
pub const RAG_JOBS_HEADER: &str = "And the following job postings:";

/// Closing instruction placed after the job listings.
pub const RAG_CLOSING_INSTRUCTION: &str =
    "Explain which jobs best fit the candidate and why. Provide a friendly summary.";

/// Characters of resume text shown back to the user after extraction.
pub const RESUME_PREVIEW_CHARS: usize = 1500;

/// Characters of a job description shown in a match listing.
pub const DESCRIPTION_SNIPPET_CHARS: usize = 300;

/// Formats the matched postings as the job-context block. Descriptions are never truncated.
pub fn build_job_context(matches: &[&JobPosting]) -> String {
    let mut context = String::new();
    for job in matches {
        context.push_str(&format!(
            "Job Title: {}\nCompany: {}\nDescription: {}\n\n",
            job.title, job.company, job.description
        ));
    }
    context
}

/// Assembles the full prompt: preamble, resume, job listings, closing instruction.
pub fn build_prompt(resume_text: &str, matches: &[&JobPosting]) -> String {
    let context = build_job_context(matches);
    format!(
        "{RAG_PREAMBLE}\n\n{resume_text}\n\n{RAG_JOBS_HEADER}\n\n{context}\n\n{RAG_CLOSING_INSTRUCTION}"
    )
}

/// First `max_chars` characters of `text`, with `...` appended when anything was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
