use crate::wire::{AppType, Language};

/// Sections every PRD must contain, in order.
pub const PRD_SECTIONS: [&str; 10] = [
    "Overview",
    "Essential Core Features",
    "Tech Stack",
    "Design Preferences",
    "All Screens/Pages",
    "App Menu and Navigation Structure",
    "User Flow",
    "Monetization Strategy",
    "Risks & Challenges",
    "Roadmap (MVP → Future Releases)",
];

pub const PRD_START: &str = "--- PRD START ---";
pub const PRD_END: &str = "--- PRD END ---";

fn numbered_sections() -> String {
    let mut s = String::new();
    for (i, section) in PRD_SECTIONS.iter().enumerate() {
        s.push_str(&format!("{}. {}\n", i + 1, section));
    }
    s
}

fn plan_rules() -> &'static str {
r#"Rules for the implementation plan:
- Break the plan into logical phases (e.g., Frontend, Backend, AI Integration, Authentication, Testing, Deployment, Optimization).
  Only include phases that are relevant to THIS PRD.
- For each phase, provide:
  • Objectives
  • Detailed Tasks (must reference actual features, APIs, and technologies mentioned in the PRD)
  • Deliverables
- Do NOT create generic filler tasks. All tasks must map directly to the PRD.
- If the PRD specifies unique tools (e.g., Supabase, Firebase, OCR API, OpenAI), mention them explicitly in tasks.
- If the PRD is lightweight, reduce the number of phases but go deeper into tasks.
- Ensure the final roadmap looks like a professional execution plan tailored to this project."#
}

/// Prompt asking for a ten-section PRD. Values are substituted verbatim.
pub fn build_prd_prompt(name: &str, description: &str, app_type: AppType, language: Language) -> String {
    format!(
"You are an expert product manager. Create a **Product Requirements Document (PRD)**
for the following app idea. The PRD should be clear, structured, and tailored
to the app type and description provided.

App Name: {name}
App Type: {app_type}
Description: {description}

Structure the PRD with these sections:
{sections}
Language: {language}
",
        name = name,
        app_type = app_type,
        description = description,
        sections = numbered_sections(),
        language = language,
    )
}

/// Prompt asking for a phased implementation plan grounded in `prd_text`.
pub fn build_plan_prompt(prd_text: &str, language: Language) -> String {
    format!(
"You are a senior software architect. Carefully read the PRD below and
generate a **unique, PRD-specific step-by-step implementation plan**.

{start}
{prd_text}
{end}

{rules}

Language: {language}
",
        start = PRD_START,
        prd_text = prd_text,
        end = PRD_END,
        rules = plan_rules(),
        language = language,
    )
}
