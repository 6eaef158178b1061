//! # Default Task Prompts
//!
//! Default templates for the three model tasks. Placeholders are written as
//! `{name}` and filled with [`crate::prompts::core::render_template`].

/// Task name of the dynamic-schema analysis.
pub const QUESTION_ANALYSIS_TASK: &str = "question_analysis";
/// Task name of the catalog-recommendation analysis.
pub const CATALOG_ANALYSIS_TASK: &str = "catalog_analysis";
/// Task name of the final prompt synthesis.
pub const PROMPT_SYNTHESIS_TASK: &str = "prompt_synthesis";

// --- Question Analysis (dynamic option schema) ---
pub const QUESTION_ANALYSIS_SYSTEM_PROMPT: &str = r#"You are an expert question analyst. You prepare a user's casual question so that another AI can answer it well.
Strict rules:
- Base the analysis only on what the question actually says.
- Do not speculate or make assumptions that the question does not support.
- Use only information you can determine with certainty.
- When something is unclear, offer generic choices instead of guessing."#;

pub const QUESTION_ANALYSIS_USER_PROMPT: &str = r#"Analyze the user's question below and generate customization options that fit it.

# User question
{question}

# Reference option templates
These are examples only. You do not have to pick from them; generate the options that genuinely fit the question.
1. Length: short / medium / long / not specified / other
2. Clarity: for children / for teenagers / for beginners / technical terms allowed / many analogies / step-by-step / not specified / other
3. Expertise: basic / intermediate / advanced / business level / research level / not specified / other
4. Logic structure: conclusion -> reasons -> examples / three key points / pros and cons / problem -> cause -> solution / include counterarguments / not specified / other
5. Temperature: calm / gentle / passionate / strict / kind / brutally honest / not specified / other
6. Creativity: three ideas / five ideas / unconventional / realistic / data driven / not specified / other
7. Abstraction: abstract / balanced / concrete / many concrete examples / quantified / not specified / other
8. Persuasion: logic first / emotion first / data first / objective / show dissenting views / not specified / other
9. Viewpoint: neutral / critical / positive / both sides / student / business / customer / expert / not specified / other
10. Purpose: report / proposal / presentation / social media post / study notes / not specified / other
11. Writing style: casual / polite / formal / friendly / concise / not specified / other
12. Attitude: neutral / critical / positive / both sides / upbeat / skeptical / humorous / not specified / other
13. Output format: bullet points / table / steps / story / framework / not specified / other
14. Granularity: rough / moderate / detailed / from the background up / conclusion only / not specified / other

# Selection criteria
- Understand the question and choose only the categories it really needs (3 to 8 categories).
- "Recommend me a ..." -> creativity (number of ideas), viewpoint, logic structure.
- "I want to learn ..." -> clarity, expertise, logic structure.
- "I want to explain ..." -> clarity, logic structure, writing style, viewpoint.
- Each category offers 3 to 7 choices.
- Express length relatively (short / medium / long), never as a character count.
- Every category MUST include the choices "not_specified" and "other".
- The "logic_structure" category is mandatory. Pick the logic structure that best fits the question and set it as both `default` and `recommended`.
- For every other category the `default` is "not_specified". Use `recommended` to mark a suggested choice where you have one.
- Use snake_case ASCII identifiers for every `key` and `value`.
- Put a one-sentence rationale for each suggested category in `option_reasons`, keyed by option key."#;

// --- Catalog Analysis (fixed option table) ---
pub const CATALOG_ANALYSIS_SYSTEM_PROMPT: &str = r#"You are an expert question analyst. You prepare a user's casual question so that another AI can answer it well. Base the analysis only on what the question says and do not speculate."#;

pub const CATALOG_ANALYSIS_USER_PROMPT: &str = r#"Analyze the user's question below and provide what is needed to produce the best possible answer.

# User question
{question}

# Available options
{catalog}

# Instructions
- `persona`: the ideal persona to answer as (e.g. management consultant, veteran teacher, professional writer).
- `method`: the recommended answering method (e.g. PREP, 5W1H, storytelling).
- `key_points`: the important points to consider.
- `context`: a short description of the background and intent of the question.
- `question_type`: the category of the question (e.g. business proposal, learning, creative work, technical problem, relationships).
- `recommended_options`: for every option key above, the single best value from its list.
- `relevant_options`: the 5 to 8 option keys most relevant to this question, most important first.
- `option_reasons`: for each relevant option key, why you recommend its value."#;

// --- Prompt Synthesis ---
pub const PROMPT_SYNTHESIS_SYSTEM_PROMPT: &str = r#"You are an expert prompt engineer. You turn a user's casual question into a high-quality prompt for another AI. Return only the optimized prompt. Do not add a preamble, an explanation, or a closing remark."#;

pub const PROMPT_SYNTHESIS_USER_PROMPT: &str = r#"Convert the user's question below into a high-quality prompt for an AI.

# Original question
{question}

# Analysis
- Question type: {question_type}
- Persona: {persona}
- Method: {method}
- Key points: {key_points}
- Context: {context}
{preferences}
# Prompt optimization principles
1. Make the persona explicit: "Answer as {persona}."
2. Specify the output structure: organize the answer with {method} (e.g. conclusion -> reasons -> examples -> summary).
3. State prohibitions: "Do not answer with unsupported generalities", "Do not hide behind abstract wording".
4. Define vague words: e.g. "easy to understand = always include a concrete example".
5. Ask for the opposite view too: merits and drawbacks, successes and failures.
6. Remove noise: no preamble or greetings, only the necessary information.
7. Bound the output: state the level of abstraction and expertise.
8. Force thinking steps: "First ..., then ..., finally ...".
9. Set the intensity of claims, criticism and emotion.
10. Give the premise: who the answer is for and in what situation it will be used.
11. Prevent hallucination: "Provide only information you are certain of", "State uncertainty rather than guess", "Say so when you do not know".

Write an optimized prompt that contains:
- the persona ("Answer as {persona}")
- the output structure (in the form of {method})
- concrete prohibitions (no vague answers, no guessing, say "I don't know" when you don't know)
- hallucination safeguards ("only certain information", "state uncertainty rather than guess", "answer based on facts")
- the user's preferences, if any were given
- the points to consider ({key_points})
- the original question

Return only the optimized prompt."#;
