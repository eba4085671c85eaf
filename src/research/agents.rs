//! Agent personas that make up a research team.
//!
//! The five core roles are always present. Domain specialists join when the
//! topic mentions one of their trigger keywords.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::tools::ToolKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Manager,
    Researcher,
    Analyst,
    Editor,
    Reporter,
    TechSpecialist,
    BusinessSpecialist,
    ScienceSpecialist,
    FinanceSpecialist,
}

impl AgentRole {
    pub const CORE: [Self; 5] = [
        Self::Manager,
        Self::Researcher,
        Self::Analyst,
        Self::Editor,
        Self::Reporter,
    ];

    pub const SPECIALISTS: [Self; 4] = [
        Self::TechSpecialist,
        Self::BusinessSpecialist,
        Self::ScienceSpecialist,
        Self::FinanceSpecialist,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Researcher => "researcher",
            Self::Analyst => "analyst",
            Self::Editor => "editor",
            Self::Reporter => "reporter",
            Self::TechSpecialist => "tech_specialist",
            Self::BusinessSpecialist => "business_specialist",
            Self::ScienceSpecialist => "science_specialist",
            Self::FinanceSpecialist => "finance_specialist",
        }
    }

    /// Topic keywords that bring a specialist onto the team.
    pub fn triggers(self) -> &'static [&'static str] {
        match self {
            Self::TechSpecialist => &["tech", "software", "ai", "machine learning", "programming"],
            Self::BusinessSpecialist => &["business", "market", "company", "industry", "strategy"],
            Self::ScienceSpecialist => &["science", "research", "study", "experiment", "laboratory"],
            Self::FinanceSpecialist => &["finance", "investment", "market", "economy", "financial"],
            _ => &[],
        }
    }

    pub fn profile(self) -> AgentProfile {
        use ToolKind::{AcademicSearch, ContentExtraction, TextAnalysis, WebSearch};

        let (title, goal, backstory, tools, allow_delegation): (_, _, _, &'static [ToolKind], _) =
            match self {
                Self::Manager => (
                    "Research Project Manager",
                    "Coordinate the research team, plan the research and ensure the final \
                     report meets its objectives",
                    "A seasoned research director who has led multidisciplinary teams on \
                     complex investigations and knows how to break a question into tasks.",
                    &[WebSearch, AcademicSearch, TextAnalysis],
                    true,
                ),
                Self::Researcher => (
                    "Primary Research Specialist",
                    "Gather comprehensive, accurate and current information from diverse \
                     reliable sources",
                    "An experienced investigator skilled at finding authoritative sources, \
                     separating facts from noise and keeping track of citations.",
                    &[WebSearch, AcademicSearch, ContentExtraction, TextAnalysis],
                    false,
                ),
                Self::Analyst => (
                    "Data Analysis Specialist",
                    "Analyze research data to identify patterns, trends and actionable insights",
                    "A quantitative analyst who turns scattered findings into clear evidence \
                     and is candid about the limits of the data.",
                    &[TextAnalysis, WebSearch],
                    false,
                ),
                Self::Editor => (
                    "Content Editor and Quality Assurance Specialist",
                    "Ensure research content is accurate, clear, well-structured and suited \
                     to its audience",
                    "A meticulous editor with a background in scientific publishing who \
                     catches inconsistencies and tightens prose.",
                    &[TextAnalysis, WebSearch],
                    false,
                ),
                Self::Reporter => (
                    "Research Report Generator",
                    "Produce a comprehensive, well-structured final report from the team's work",
                    "A technical writer who has produced hundreds of research reports for \
                     academic, business and general readers.",
                    &[TextAnalysis, WebSearch],
                    false,
                ),
                Self::TechSpecialist => (
                    "Technology Research Specialist",
                    "Provide deep expertise on technology, software and AI developments",
                    "A former software architect who follows technical literature and \
                     industry releases closely.",
                    &[WebSearch, AcademicSearch, ContentExtraction],
                    false,
                ),
                Self::BusinessSpecialist => (
                    "Business Research Specialist",
                    "Provide expertise on markets, companies, industries and strategy",
                    "A management consultant experienced in market sizing and competitive \
                     analysis.",
                    &[WebSearch, ContentExtraction],
                    false,
                ),
                Self::ScienceSpecialist => (
                    "Scientific Research Specialist",
                    "Provide expertise on scientific studies, experiments and methodology",
                    "A research scientist comfortable reading papers across disciplines and \
                     judging study quality.",
                    &[AcademicSearch, WebSearch, ContentExtraction],
                    false,
                ),
                Self::FinanceSpecialist => (
                    "Financial Research Specialist",
                    "Provide expertise on finance, investment and economic trends",
                    "A financial analyst who has covered markets and macroeconomics for \
                     institutional investors.",
                    &[WebSearch, ContentExtraction],
                    false,
                ),
            };

        AgentProfile {
            role: self,
            title,
            goal,
            backstory,
            tools,
            allow_delegation,
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentProfile {
    pub role: AgentRole,
    pub title: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
    pub tools: &'static [ToolKind],
    pub allow_delegation: bool,
}

impl AgentProfile {
    /// System prompt describing this persona.
    pub fn persona(&self) -> String {
        let tools: Vec<&str> = self.tools.iter().map(|t| t.as_str()).collect();
        format!(
            "You are the {}.\nGoal: {}\nBackground: {}\nAvailable tools: {}",
            self.title,
            self.goal,
            self.backstory,
            tools.join(", ")
        )
    }
}

/// Whether `keyword` occurs in `topic`.
///
/// Single words match at the start of a topic word ("tech" matches
/// "technology"); phrases match anywhere in the lowercased topic.
fn mentions(topic: &str, keyword: &str) -> bool {
    let lowered = topic.to_lowercase();
    if keyword.contains(' ') {
        return lowered.contains(keyword);
    }
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word.starts_with(keyword))
}

/// The agents assembled for one research run.
#[derive(Debug, Clone)]
pub struct ResearchTeam {
    members: Vec<AgentProfile>,
}

impl ResearchTeam {
    /// Core roles plus every specialist whose triggers appear in `topic`.
    pub fn assemble(topic: &str) -> Self {
        let mut team = Self {
            members: AgentRole::CORE.iter().map(|r| r.profile()).collect(),
        };
        for role in AgentRole::SPECIALISTS {
            if role.triggers().iter().any(|k| mentions(topic, k)) {
                team.add_specialist(role);
            }
        }
        tracing::debug!(topic, roles = ?team.roles(), "research team assembled");
        team
    }

    /// Add `role` unless it is already a member.
    pub fn add_specialist(&mut self, role: AgentRole) {
        if self.get(role).is_none() {
            self.members.push(role.profile());
        }
    }

    pub fn members(&self) -> &[AgentProfile] {
        &self.members
    }

    pub fn get(&self, role: AgentRole) -> Option<&AgentProfile> {
        self.members.iter().find(|m| m.role == role)
    }

    pub fn roles(&self) -> Vec<AgentRole> {
        self.members.iter().map(|m| m.role).collect()
    }

    /// Specialists on the team, in trigger order.
    pub fn specialists(&self) -> impl Iterator<Item = &AgentProfile> {
        self.members
            .iter()
            .filter(|m| AgentRole::SPECIALISTS.contains(&m.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_team_without_specialists() {
        let team = ResearchTeam::assemble("history of the Roman aqueducts");
        assert_eq!(team.roles(), AgentRole::CORE);
        assert_eq!(team.specialists().count(), 0);
    }

    #[test]
    fn prefix_keywords_add_specialists() {
        let team = ResearchTeam::assemble("Technology market trends");
        let roles = team.roles();
        assert!(roles.contains(&AgentRole::TechSpecialist));
        assert!(roles.contains(&AgentRole::BusinessSpecialist));
        assert!(roles.contains(&AgentRole::FinanceSpecialist));
        assert!(!roles.contains(&AgentRole::ScienceSpecialist));
    }

    #[test]
    fn short_keyword_needs_word_start() {
        assert!(!mentions("the captain sailed", "ai"));
        assert!(mentions("AI safety", "ai"));
        assert!(mentions("Advances in Machine Learning", "machine learning"));
    }

    #[test]
    fn add_specialist_is_idempotent() {
        let mut team = ResearchTeam::assemble("software supply chains");
        let before = team.members().len();
        team.add_specialist(AgentRole::TechSpecialist);
        assert_eq!(team.members().len(), before);
        team.add_specialist(AgentRole::ScienceSpecialist);
        assert_eq!(team.members().len(), before + 1);
    }

    #[test]
    fn manager_delegates_and_persona_lists_tools() {
        let manager = AgentRole::Manager.profile();
        assert!(manager.allow_delegation);
        assert_eq!(manager.title, "Research Project Manager");
        let persona = manager.persona();
        assert!(persona.starts_with("You are the Research Project Manager."));
        assert!(persona.contains("web_search, academic_search, text_analysis"));
        assert!(!AgentRole::Reporter.profile().allow_delegation);
    }
}
