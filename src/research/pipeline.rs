//! Sequential multi-agent research run.
//!
//! Each planned task is handed to its agent as one completion: the agent
//! persona as the system prompt, and the task brief, fresh search evidence
//! (research tasks only) and every earlier task's output as the user prompt.
//! Any LLM failure aborts the run.

use chrono::Local;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use research_search::{deduplicate, SearchResult};

use super::agents::{AgentProfile, AgentRole, ResearchTeam};
use super::analysis::analyze;
use super::report::{section_bullets, ResearchReport};
use super::tasks::{plan_tasks, Audience, ResearchDepth, ResearchTask, TaskKind};
use super::tools::{Evidence, ToolBox};
use crate::config::LlmSection;
use crate::error::Result;
use crate::llm::{AiProvider, CompletionProvider, CompletionRequest};

/// Output of one finished task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutput {
    pub kind: TaskKind,
    pub agent: AgentRole,
    pub text: String,
}

pub struct ResearchPipeline {
    llm: Arc<dyn CompletionProvider>,
    provider: AiProvider,
    model: String,
    tools: ToolBox,
    max_tokens: u32,
    temperature: f32,
}

impl ResearchPipeline {
    pub fn new(
        llm: Arc<dyn CompletionProvider>,
        provider: AiProvider,
        model: impl Into<String>,
        tools: ToolBox,
    ) -> Self {
        let defaults = LlmSection::default();
        Self {
            llm,
            provider,
            model: model.into(),
            tools,
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
        }
    }

    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    pub fn provider(&self) -> AiProvider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Research `topic` end to end.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ResearchError::Llm`] from the first failed task.
    pub async fn run(
        &self,
        topic: &str,
        depth: ResearchDepth,
        audience: Audience,
    ) -> Result<ResearchReport> {
        let started = Instant::now();
        let timestamp = Local::now();
        let team = ResearchTeam::assemble(topic);
        let tasks = plan_tasks(topic, depth, audience);
        info!(
            topic,
            %depth,
            %audience,
            provider = %self.provider,
            model = self.model.as_str(),
            tasks = tasks.len(),
            agents = team.members().len(),
            "starting research"
        );

        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(tasks.len());
        let mut sources: Vec<SearchResult> = Vec::new();

        for task in &tasks {
            let evidence = if task.kind.gathers_evidence() {
                let evidence = self.tools.gather(&evidence_query(topic, task.kind)).await;
                sources.extend(evidence.sources().cloned());
                Some(evidence)
            } else {
                None
            };

            let agent = team
                .get(task.assignee)
                .cloned()
                .unwrap_or_else(|| task.assignee.profile());
            let text = self
                .execute(task, &agent, &team, evidence.as_ref(), &outputs)
                .await?;
            outputs.push(TaskOutput {
                kind: task.kind,
                agent: agent.role,
                text,
            });
        }

        let output_of = |kind: TaskKind| {
            outputs
                .iter()
                .find(|o| o.kind == kind)
                .map(|o| o.text.clone())
                .unwrap_or_default()
        };
        let summary = output_of(TaskKind::ReportGeneration);
        let review = output_of(TaskKind::FinalReview);
        let execution_time = started.elapsed().as_secs_f64();

        info!(
            topic,
            seconds = execution_time,
            sources = sources.len(),
            "research complete"
        );

        Ok(ResearchReport {
            topic: topic.to_owned(),
            research_depth: depth,
            target_audience: audience,
            ai_provider: self.provider,
            ai_model: self.model.clone(),
            timestamp,
            execution_time,
            key_findings: section_bullets(&summary, "key findings"),
            recommendations: section_bullets(&summary, "recommendations"),
            analysis: analyze(&summary),
            sources: deduplicate(sources),
            summary,
            review,
        })
    }

    async fn execute(
        &self,
        task: &ResearchTask,
        agent: &AgentProfile,
        team: &ResearchTeam,
        evidence: Option<&Evidence>,
        earlier: &[TaskOutput],
    ) -> Result<String> {
        info!(task = %task.kind, agent = %agent.role, "running task");
        let request = CompletionRequest::new(task_prompt(task, team, evidence, earlier))
            .with_system(agent.persona())
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);

        match self.llm.complete(&self.model, &request).await {
            Ok(completion) => {
                tracing::debug!(task = %task.kind, chars = completion.text.len(), "task finished");
                Ok(completion.text)
            }
            Err(e) => {
                error!(task = %task.kind, provider = self.llm.name(), error = %e, "task failed");
                Err(e.into())
            }
        }
    }
}

fn evidence_query(topic: &str, kind: TaskKind) -> String {
    match kind {
        TaskKind::DeepDive => format!("{topic} case studies latest developments"),
        _ => topic.to_owned(),
    }
}

/// User prompt for one task.
pub fn task_prompt(
    task: &ResearchTask,
    team: &ResearchTeam,
    evidence: Option<&Evidence>,
    earlier: &[TaskOutput],
) -> String {
    let mut prompt = format!("TASK:\n{}\n", task.description);

    let specialists: Vec<String> = team
        .specialists()
        .map(|s| format!("- {}: {}", s.title, s.goal))
        .collect();
    if !specialists.is_empty() {
        prompt.push_str(&format!(
            "\nDomain expertise available on the team:\n{}\nApply this expertise where relevant.\n",
            specialists.join("\n")
        ));
    }

    if let Some(evidence) = evidence {
        prompt.push_str(&format!("\nSEARCH RESULTS:\n{}\n", evidence.render()));
    }

    if !earlier.is_empty() {
        prompt.push_str("\nWORK COMPLETED SO FAR:\n");
        for output in earlier {
            prompt.push_str(&format!(
                "\n### {} ({})\n{}\n",
                output.kind, output.agent, output.text
            ));
        }
    }

    prompt.push_str(&format!("\nEXPECTED OUTPUT:\n{}", task.expected_output));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_brief_evidence_and_history() {
        let team = ResearchTeam::assemble("software testing");
        let tasks = plan_tasks("software testing", ResearchDepth::Basic, Audience::General);
        let earlier = vec![TaskOutput {
            kind: TaskKind::Planning,
            agent: AgentRole::Manager,
            text: "Plan: look at fuzzing.".into(),
        }];

        let prompt = task_prompt(&tasks[1], &team, Some(&Evidence::default()), &earlier);
        assert!(prompt.starts_with("TASK:\nConduct initial research on \"software testing\""));
        assert!(prompt.contains("- Technology Research Specialist:"));
        assert!(prompt.contains("SEARCH RESULTS:\nNo search results were found."));
        assert!(prompt.contains("### planning (manager)\nPlan: look at fuzzing."));
        assert!(prompt.ends_with(&tasks[1].expected_output));
    }

    #[test]
    fn prompt_without_specialists_or_history() {
        let team = ResearchTeam::assemble("medieval poetry");
        let tasks = plan_tasks("medieval poetry", ResearchDepth::Basic, Audience::General);
        let prompt = task_prompt(&tasks[0], &team, None, &[]);
        assert!(!prompt.contains("Domain expertise"));
        assert!(!prompt.contains("SEARCH RESULTS"));
        assert!(!prompt.contains("WORK COMPLETED"));
    }

    #[test]
    fn deep_dive_uses_wider_query() {
        assert_eq!(evidence_query("rust", TaskKind::InitialResearch), "rust");
        assert!(evidence_query("rust", TaskKind::DeepDive).starts_with("rust "));
    }
}
