//! Per-category prompt wording.

use super::classifier::QueryCategory;

/// Asks the model to cite by domain instead of by number.
pub const CITATION_INSTRUCTION: &str = "For all citations, instead of using [1], [2], etc., use the source's domain name in parentheses, e.g., (techradar.com), right after the relevant information. Do not use numbers for citations.";

/// Asks the model to answer compound prompts piece by piece.
pub const MULTI_QUESTION_INSTRUCTION: &str = "If the prompt contains multiple questions or requirements, break them down and answer each as a separate item or section.";

const NO_MARKDOWN: &str = "DO NOT use markdown symbols (#, *, -, etc.)";

pub(crate) struct Template {
    pub role: &'static str,
    pub task: &'static str,
    /// Instructions placed before the shared citation lines.
    pub lead: &'static [&'static str],
    /// Instructions placed after them.
    pub tail: &'static [&'static str],
    pub closing: &'static str,
}

impl Template {
    /// Numbered instruction list, shared lines included.
    pub fn instructions(&self) -> Vec<&'static str> {
        let mut all: Vec<&'static str> = self.lead.to_vec();
        all.push(NO_MARKDOWN);
        all.push(CITATION_INSTRUCTION);
        all.push(MULTI_QUESTION_INSTRUCTION);
        all.extend_from_slice(self.tail);
        all
    }
}

pub(crate) fn template_for(category: QueryCategory) -> Template {
    match category {
        QueryCategory::List => Template {
            role: "a helpful research assistant",
            task: "provide a comprehensive and well-structured response",
            lead: &[
                "Analyze the query and provide exactly what was asked for (e.g., if asked for \"top 10\", provide exactly 10 items)",
                "Use clear, engaging formatting with emojis and bullet points",
            ],
            tail: &[
                "Focus on providing the specific information requested",
                "If the query asks for a specific number, provide exactly that number",
                "Make the response directly answer the question asked",
            ],
            closing: "Please provide a response that directly answers the specific query, using domain-based citations and breaking down multiple questions if present:",
        },
        QueryCategory::HowTo => Template {
            role: "a helpful guide and instructor",
            task: "provide a clear, step-by-step guide",
            lead: &[
                "Provide a practical, actionable guide with clear steps",
                "Use numbered steps and bullet points for clarity",
                "Include tips, warnings, and best practices where relevant",
            ],
            tail: &[
                "Focus on being helpful and practical",
                "Add relevant emojis to make the guide engaging",
            ],
            closing: "Please provide a helpful, practical guide that directly addresses the query:",
        },
        QueryCategory::Definition => Template {
            role: "a knowledgeable educator",
            task: "provide a clear, comprehensive explanation",
            lead: &[
                "Provide a clear, accurate definition or explanation",
                "Include relevant context, examples, and applications",
                "Use simple language while being comprehensive",
            ],
            tail: &[
                "Add relevant emojis to make the explanation engaging",
                "Structure the response logically with clear sections",
            ],
            closing: "Please provide a clear, comprehensive explanation that directly addresses the query:",
        },
        QueryCategory::Comparison => Template {
            role: "an expert analyst",
            task: "provide a detailed comparison",
            lead: &[
                "Provide a balanced, objective comparison",
                "Use a clear, structured comparison format",
                "Include pros and cons for each option",
            ],
            tail: &[
                "Add relevant emojis to make the comparison engaging",
                "Provide a clear recommendation if appropriate",
            ],
            closing: "Please provide a detailed, balanced comparison that directly addresses the query:",
        },
        QueryCategory::News => Template {
            role: "a news analyst and reporter",
            task: "provide the latest news and developments",
            lead: &[
                "Focus on the most recent and relevant news",
                "Provide context and background information",
                "Include multiple perspectives when available",
            ],
            tail: &[
                "Add relevant emojis to make the news engaging",
                "Structure with clear sections for different aspects",
            ],
            closing: "Please provide the latest news and developments that directly address the query:",
        },
        QueryCategory::Technical => Template {
            role: "a technical expert and developer",
            task: "provide technical guidance and implementation details",
            lead: &[
                "Provide technical details and implementation guidance",
                "Include code examples, architecture considerations, and best practices",
                "Address technical challenges and solutions",
            ],
            tail: &[
                "Add relevant emojis to make the technical content engaging",
                "Structure with clear sections for different technical aspects",
            ],
            closing: "Please provide technical guidance that directly addresses the query:",
        },
        QueryCategory::General => Template {
            role: "a helpful AI assistant",
            task: "provide a comprehensive and useful response",
            lead: &[
                "Analyze the query and provide the most relevant and helpful information",
                "Structure your response logically based on the query type",
                "Use clear, engaging formatting with appropriate emojis",
            ],
            tail: &[
                "Focus on being genuinely helpful and informative",
                "Adapt the format to best serve the specific query",
            ],
            closing: "Please provide a helpful response that directly addresses the query:",
        },
    }
}
