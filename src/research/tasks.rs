//! Research depth, target audience and the ordered task plan.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::agents::AgentRole;

/// How thorough a research run is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchDepth {
    Basic,
    #[default]
    Comprehensive,
    Expert,
}

impl ResearchDepth {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Comprehensive => "comprehensive",
            Self::Expert => "expert",
        }
    }

    /// Whether the plan includes a deep-dive task.
    pub fn includes_deep_dive(self) -> bool {
        matches!(self, Self::Comprehensive | Self::Expert)
    }
}

impl fmt::Display for ResearchDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResearchDepth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "comprehensive" => Ok(Self::Comprehensive),
            "expert" => Ok(Self::Expert),
            other => Err(format!("unknown research depth: {other}")),
        }
    }
}

/// Who the report is written for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[default]
    General,
    Academic,
    Business,
    Technical,
}

impl Audience {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Academic => "academic",
            Self::Business => "business",
            Self::Technical => "technical",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(Self::General),
            "academic" => Ok(Self::Academic),
            "business" => Ok(Self::Business),
            "technical" => Ok(Self::Technical),
            other => Err(format!("unknown audience: {other}")),
        }
    }
}

/// Stages of a research run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Planning,
    InitialResearch,
    DeepDive,
    DataAnalysis,
    ContentEditing,
    ReportGeneration,
    FinalReview,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::InitialResearch => "initial_research",
            Self::DeepDive => "deep_dive",
            Self::DataAnalysis => "data_analysis",
            Self::ContentEditing => "content_editing",
            Self::ReportGeneration => "report_generation",
            Self::FinalReview => "final_review",
        }
    }

    /// Agent that carries out this task.
    pub fn assignee(self) -> AgentRole {
        match self {
            Self::Planning | Self::FinalReview => AgentRole::Manager,
            Self::InitialResearch | Self::DeepDive => AgentRole::Researcher,
            Self::DataAnalysis => AgentRole::Analyst,
            Self::ContentEditing => AgentRole::Editor,
            Self::ReportGeneration => AgentRole::Reporter,
        }
    }

    /// Whether the task gathers fresh search evidence before prompting.
    pub fn gathers_evidence(self) -> bool {
        matches!(self, Self::InitialResearch | Self::DeepDive)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned task: what to do and what a good answer looks like.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchTask {
    pub kind: TaskKind,
    pub assignee: AgentRole,
    pub description: String,
    pub expected_output: String,
}

/// Ordered task plan for `topic`.
///
/// The deep dive only runs for comprehensive and expert depth.
pub fn plan_tasks(topic: &str, depth: ResearchDepth, audience: Audience) -> Vec<ResearchTask> {
    let mut kinds = vec![TaskKind::Planning, TaskKind::InitialResearch];
    if depth.includes_deep_dive() {
        kinds.push(TaskKind::DeepDive);
    }
    kinds.extend([
        TaskKind::DataAnalysis,
        TaskKind::ContentEditing,
        TaskKind::ReportGeneration,
        TaskKind::FinalReview,
    ]);

    kinds
        .into_iter()
        .map(|kind| {
            let (description, expected_output) = brief(kind, topic, depth, audience);
            ResearchTask {
                kind,
                assignee: kind.assignee(),
                description,
                expected_output,
            }
        })
        .collect()
}

fn brief(kind: TaskKind, topic: &str, depth: ResearchDepth, audience: Audience) -> (String, String) {
    match kind {
        TaskKind::Planning => (
            format!(
                "Create a research plan for the topic \"{topic}\" at {depth} depth.\n\
                 Cover:\n\
                 1. Research objectives and scope\n\
                 2. 5-7 key research questions\n\
                 3. Methodology and source types to consult\n\
                 4. Timeline and resource allocation across the team\n\
                 5. Quality criteria for the findings\n\
                 6. Risks and mitigations"
            ),
            "A structured research plan with objectives, key questions, methodology, \
             timeline, quality criteria and identified risks."
                .to_owned(),
        ),
        TaskKind::InitialResearch => (
            format!(
                "Conduct initial research on \"{topic}\" following the research plan.\n\
                 Use the search results below to:\n\
                 1. Gather current information from web and academic sources\n\
                 2. Identify key facts, statistics and trends\n\
                 3. Note expert opinions and authoritative sources\n\
                 4. Record every source you rely on"
            ),
            "Comprehensive research findings with key facts, statistics, trends and \
             properly cited sources."
                .to_owned(),
        ),
        TaskKind::DeepDive => (
            format!(
                "Perform an in-depth investigation of \"{topic}\" building on the initial research.\n\
                 Focus on:\n\
                 1. Advanced aspects and technical details\n\
                 2. Case studies and real-world examples\n\
                 3. Emerging developments and future directions\n\
                 4. Conflicting viewpoints and open debates"
            ),
            "Detailed analysis of advanced aspects with case studies, emerging trends and \
             a balanced view of conflicting perspectives."
                .to_owned(),
        ),
        TaskKind::DataAnalysis => (
            format!(
                "Analyze the research gathered on \"{topic}\".\n\
                 1. Identify patterns, correlations and trends\n\
                 2. Evaluate the strength of the evidence\n\
                 3. Extract the most important insights\n\
                 4. Highlight gaps or limitations in the data"
            ),
            "An analytical summary of patterns, evidence quality, key insights and \
             data limitations."
                .to_owned(),
        ),
        TaskKind::ContentEditing => (
            format!(
                "Review and edit the research findings on \"{topic}\".\n\
                 1. Check accuracy and internal consistency\n\
                 2. Improve clarity and logical flow\n\
                 3. Remove redundancy\n\
                 4. Make sure the tone suits a {audience} audience"
            ),
            "Polished, accurate and well-organized research content ready for the \
             final report."
                .to_owned(),
        ),
        TaskKind::ReportGeneration => (
            format!(
                "Write the final research report on \"{topic}\" for a {audience} audience.\n\
                 Structure it with these sections:\n\
                 1. Executive Summary\n\
                 2. Introduction\n\
                 3. Methodology\n\
                 4. Key Findings (as a bulleted list)\n\
                 5. Detailed Analysis\n\
                 6. Case Studies and Examples\n\
                 7. Trends and Future Outlook\n\
                 8. Challenges and Limitations\n\
                 9. Recommendations (as a bulleted list)\n\
                 10. Conclusion\n\
                 11. References"
            ),
            format!(
                "A complete, well-structured research report in markdown suitable for a \
                 {audience} audience, with Key Findings and Recommendations as bullet lists."
            ),
        ),
        TaskKind::FinalReview => (
            format!(
                "Review the final report on \"{topic}\" for quality.\n\
                 1. Verify that all research objectives were met\n\
                 2. Check completeness, accuracy and citations\n\
                 3. Rate the overall quality from 1 to 10\n\
                 4. State whether the report is approved for delivery"
            ),
            "A quality assessment with a 1-10 rating, remaining issues and a final \
             approval decision."
                .to_owned(),
        ),
    }
}
