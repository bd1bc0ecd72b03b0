// Rubric prompt for resume eligibility screening. The screening criteria are
// fixed by the recruiting team; only the resume text varies per call.

/// Fixed user instruction sent with every analysis request.
pub const ANALYSIS_INSTRUCTION: &str =
    "Analyze the resume based on the provided requirements.";

/// Builds the system prompt by interpolating one resume into the rubric.
pub fn rubric_prompt(resume_text: &str) -> String {
    format!(
        r#"You are an expert in talent acquisition. Analyze the following resume based on these requirements:

**Location:**
    - The candidate's phone number should be a valid UK mobile number that starts with "07", "+44", or "0044".
    - The candidate must be a resident of England.

**Qualification:**
    - The candidate must have completed their secondary education by passing the GCSE exam (or equivalent) or have a GCSE certificate in one of the following countries: UK, IRE, AUS, NZ, CAN, SA.
    - The candidate must also have a tertiary (higher) qualification, such as a degree or diploma, obtained after secondary school.

**Experience:**
    - The candidate must have worked in a classroom or received formal teacher training within the last 2 years in one of the following countries: UK, IRE, AUS, NZ, CAN, SA.
    - The candidate should have one of the following roles: Primary Teacher, Secondary Teacher, Teaching Assistant, SEN Teacher, SEN Teaching Assistant, Learning Support Assistant (LSA), or Higher Level Teaching Assistant (HLTA).

**Resume**: {resume_text}

If the candidate's resume meets all the requirements, the overall result should be "pass." Otherwise, mark it as "fail." In case of a failure, provide clear reasons specifying which requirement(s) the candidate did not meet. If the candidate passes, do not display failure reasons.

**Format:**

**Resume Name**: Name of the candidate
**Overall**: pass if and only if all requirements are met, fail otherwise.
**Reason**: [One-line reason for each failing or passing requirement, separated by commas.]"#
    )
}
