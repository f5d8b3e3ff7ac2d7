//! Prompt templates for resume matching

/// Build the fixed evaluation prompt for a resume and job description
///
/// One deterministic template, both texts embedded verbatim, demanding a
/// single raw JSON object with the response key set.
pub fn build_match_prompt(resume_text: &str, jd_text: &str) -> String {
    format!(
        r"You are a FAANG-level recruiter with 10+ years of experience, extremely strict when evaluating resumes against job descriptions. Provide objective, experience-backed feedback.

Return ONLY a raw JSON object with keys:
- score (0-100)
- advice
- fit_analysis: {{summary, strengths, weaknesses}}
- missing_skills
- resume_suggestions
- resources (list of {{title, url}})

---RESUME---
{resume_text}

---JOB DESCRIPTION---
{jd_text}
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_both_texts_verbatim() {
        let prompt = build_match_prompt("Rust engineer resume", "Backend role JD");
        assert!(prompt.contains("Rust engineer resume"));
        assert!(prompt.contains("Backend role JD"));
        assert!(prompt.contains("---RESUME---"));
        assert!(prompt.contains("---JOB DESCRIPTION---"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let a = build_match_prompt("r", "j");
        let b = build_match_prompt("r", "j");
        assert_eq!(a, b);
    }
}
