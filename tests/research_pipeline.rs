//! Research pipeline integration tests with scripted LLM and search backends.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use deep_research::llm::{
    AiProvider, Completion, CompletionProvider, CompletionRequest, LlmError, Result as LlmResult,
};
use deep_research::research::report::render_markdown;
use deep_research::research::{
    save_report, Audience, GatherLimits, OutputFormat, ResearchDepth, ResearchPipeline, ToolBox,
};
use deep_research::ResearchError;
use research_search::{
    AcademicSearch, SearchAggregator, SearchBackend, SearchConfig, SearchError, SearchProvider,
    SearchResult,
};
use std::sync::{Arc, Mutex};

const FINAL_REPORT: &str = "## Executive Summary\nSolid-state batteries are close to market.\n\n\
## Key Findings\n- Energy density is up to 2x higher\n- Manufacturing cost is the main barrier\n\n\
## Recommendations\n1. Track pilot production lines\n2. Watch sulfide electrolyte suppliers\n\n\
## Conclusion\nA promising but early technology.";

struct ScriptedLlm {
    fail_on_call: Option<usize>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlm {
    fn new(fail_on_call: Option<usize>) -> Arc<Self> {
        Arc::new(Self {
            fail_on_call,
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CompletionProvider for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, model: &str, request: &CompletionRequest) -> LlmResult<Completion> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(request.clone());
            calls.len()
        };
        if self.fail_on_call == Some(call) {
            return Err(LlmError::Provider("scripted HTTP 500: boom".into()));
        }

        let text = if request.prompt.starts_with("TASK:\nWrite the final research report") {
            FINAL_REPORT.to_owned()
        } else if request.prompt.starts_with("TASK:\nReview the final report") {
            "Quality rating: 8/10. Approved.".to_owned()
        } else {
            format!("output of call {call}")
        };
        Ok(Completion {
            text,
            model: model.to_owned(),
        })
    }
}

struct FixedSearch {
    provider: SearchProvider,
    results: Vec<(&'static str, &'static str)>,
}

#[async_trait]
impl SearchBackend for FixedSearch {
    fn provider(&self) -> SearchProvider {
        self.provider
    }

    async fn search(
        &self,
        _query: &str,
        max_results: usize,
        _config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        Ok(self
            .results
            .iter()
            .take(max_results)
            .map(|(title, url)| SearchResult::new(*title, *url, "snippet", self.provider))
            .collect())
    }
}

fn tools() -> ToolBox {
    let backend: Arc<dyn SearchBackend> = Arc::new(FixedSearch {
        provider: SearchProvider::DuckDuckGo,
        results: vec![
            ("Solid-state batteries explained", "https://a.example/ssb"),
            ("Battery startups raise funding", "https://b.example/funding"),
        ],
    });
    let web = SearchAggregator::new(vec![backend], SearchConfig::default());
    let academic = AcademicSearch::new(
        Arc::new(FixedSearch {
            provider: SearchProvider::Arxiv,
            results: vec![("Sulfide electrolytes for lithium metal cells", "https://arxiv.org/abs/2401.1")],
        }),
        Arc::new(FixedSearch {
            provider: SearchProvider::Wikipedia,
            results: vec![("Solid-state battery", "https://en.wikipedia.org/wiki/Solid-state_battery")],
        }),
    );
    ToolBox::new(
        web,
        Arc::new(academic),
        GatherLimits {
            web_results: 5,
            academic_results: 4,
            fetch_pages: 0,
            page_chars: 1000,
        },
    )
}

fn pipeline(llm: Arc<ScriptedLlm>) -> ResearchPipeline {
    ResearchPipeline::new(llm, AiProvider::Anthropic, "claude-3-sonnet-20240229", tools())
}

#[tokio::test]
async fn basic_run_produces_structured_report() {
    let llm = ScriptedLlm::new(None);
    let report = pipeline(llm.clone())
        .run("solid-state batteries", ResearchDepth::Basic, Audience::Business)
        .await
        .expect("research succeeds");

    assert_eq!(report.topic, "solid-state batteries");
    assert_eq!(report.ai_provider, AiProvider::Anthropic);
    assert_eq!(report.ai_model, "claude-3-sonnet-20240229");
    assert_eq!(report.summary, FINAL_REPORT);
    assert_eq!(report.review, "Quality rating: 8/10. Approved.");
    assert_eq!(
        report.key_findings,
        [
            "Energy density is up to 2x higher",
            "Manufacturing cost is the main barrier"
        ]
    );
    assert_eq!(
        report.recommendations,
        [
            "Track pilot production lines",
            "Watch sulfide electrolyte suppliers"
        ]
    );
    assert_eq!(report.sources.len(), 4);
    assert!(report.analysis.statistics.word_count > 0);

    let calls = llm.calls.lock().unwrap();
    assert_eq!(calls.len(), 6, "basic depth skips the deep dive");
    assert!(calls.iter().all(|c| c.max_tokens == 4000));
    assert!(calls[0]
        .system
        .as_deref()
        .unwrap()
        .starts_with("You are the Research Project Manager."));
    assert!(calls[1].prompt.contains("SEARCH RESULTS:\n[1] Solid-state batteries explained"));
    assert!(calls[1].prompt.contains("### planning (manager)\noutput of call 1"));
    assert!(calls[4].prompt.contains("business audience"));
}

#[tokio::test]
async fn expert_run_includes_deep_dive() {
    let llm = ScriptedLlm::new(None);
    pipeline(llm.clone())
        .run("solid-state batteries", ResearchDepth::Expert, Audience::General)
        .await
        .unwrap();
    let calls = llm.calls.lock().unwrap();
    assert_eq!(calls.len(), 7);
    assert!(calls[2].prompt.starts_with("TASK:\nPerform an in-depth investigation"));
}

#[tokio::test]
async fn llm_failure_aborts_run() {
    let llm = ScriptedLlm::new(Some(3));
    let err = pipeline(llm.clone())
        .run("solid-state batteries", ResearchDepth::Basic, Audience::General)
        .await
        .unwrap_err();
    assert!(matches!(err, ResearchError::Llm(LlmError::Provider(_))));
    assert_eq!(llm.calls.lock().unwrap().len(), 3, "no tasks after the failure");
}

#[tokio::test]
async fn report_saves_in_every_format() {
    let report = pipeline(ScriptedLlm::new(None))
        .run("Solid-state batteries: 2025?", ResearchDepth::Basic, Audience::General)
        .await
        .unwrap();
    let dir = tempfile::tempdir().unwrap();

    for format in [OutputFormat::Markdown, OutputFormat::Html, OutputFormat::Json] {
        let path = save_report(&report, format, dir.path()).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("Solid-state_batteries_2025_"), "{name}");
        assert!(name.ends_with(&format!(".{}", format.extension())));
    }

    let md_path = save_report(&report, OutputFormat::Markdown, dir.path()).unwrap();
    assert_eq!(std::fs::read_to_string(md_path).unwrap(), render_markdown(&report));
}
