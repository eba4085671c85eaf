//! Multi-agent deep research.
//!
//! A [`ResearchTeam`] works through the [`plan_tasks`] plan one task at a
//! time, gathering web and academic evidence through a [`ToolBox`], and the
//! final report is analysed and saved by [`report`].

pub mod agents;
pub mod analysis;
pub mod pipeline;
pub mod report;
pub mod tasks;
pub mod tools;

pub use agents::{AgentProfile, AgentRole, ResearchTeam};
pub use analysis::{analyze, TextAnalysis};
pub use pipeline::{ResearchPipeline, TaskOutput};
pub use report::{save_report, OutputFormat, ResearchReport};
pub use tasks::{plan_tasks, Audience, ResearchDepth, ResearchTask, TaskKind};
pub use tools::{Evidence, GatherLimits, ToolBox, ToolKind};
