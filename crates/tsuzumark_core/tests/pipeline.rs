//! End-to-end annotation passes over in-memory documents.

use std::fs;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::sync::Notify;
use tsuzumark_core::{
    AnnotateError, Annotator, AnnotatorConfig, ContentKind, EngineError, IssueOutcome,
    LintEngine, LintIssue, LintOutput, Orchestrator, OrchestratorState, ParagraphOutcome,
    ResolveError, RuleKernel, RuleRegistry,
};
use tsuzumark_document::test_utils::FaultyDocument;
use tsuzumark_document::{
    DocumentHost, HighlightColor, MarkerRemoval, MarkerTag, MemoryDocument, TextRange,
};

type Issues = Result<Vec<LintIssue>, EngineError>;

/// Engine backed by a closure over the paragraph text.
struct FnEngine<F>(F);

impl<F> FnEngine<F>
where
    F: Fn(&str) -> Issues + Send + Sync,
{
    fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> LintEngine for FnEngine<F>
where
    F: Fn(&str) -> Issues + Send + Sync,
{
    async fn lint(&self, text: &str, _kind: ContentKind) -> Result<LintOutput, EngineError> {
        (self.0)(text).map(LintOutput::new)
    }
}

fn issue(line: u32, column: u32, message: &str) -> LintIssue {
    LintIssue::new("test", line, column, message)
}

/// Reports column 1 of every non-empty paragraph and fails on "FAIL".
fn first_char_engine() -> FnEngine<impl Fn(&str) -> Issues + Send + Sync> {
    FnEngine::new(|text: &str| {
        if text.contains("FAIL") {
            Err(EngineError::rule("test", "cannot lint"))
        } else if text.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(vec![issue(1, 1, &format!("starts {}", text))])
        }
    })
}

fn silent_engine() -> FnEngine<impl Fn(&str) -> Issues + Send + Sync> {
    FnEngine::new(|_: &str| Ok(Vec::new()))
}

/// Markers as `(range, title)`, ignoring host-assigned ids.
fn marker_state(doc: &MemoryDocument) -> Vec<(TextRange, String)> {
    let mut markers: Vec<_> = doc
        .markers()
        .into_iter()
        .map(|m| (m.range, m.title))
        .collect();
    markers.sort();
    markers
}

#[tokio::test]
async fn test_third_character_is_annotated() {
    let doc = MemoryDocument::new(["AのAがBも"]);
    let engine = FnEngine::new(|_: &str| Ok(vec![issue(1, 3, "doubled particle")]));
    let orchestrator = Orchestrator::new(doc.clone(), engine);

    let report = orchestrator.run().await.unwrap();

    assert_eq!(report.annotated_count(), 1);
    assert_eq!(
        marker_state(&doc),
        vec![(TextRange::single(0, 2), "doubled particle;".to_string())]
    );
    assert_eq!(
        doc.highlighted_ranges(),
        vec![(TextRange::single(0, 2), HighlightColor::Turquoise)]
    );
}

#[tokio::test]
async fn test_identical_ranges_accumulate_in_issue_order() {
    let doc = MemoryDocument::new(["AのAがBも"]);
    let engine = FnEngine::new(|_: &str| {
        Ok(vec![
            issue(1, 1, "first"),
            issue(1, 1, "second"),
            issue(1, 3, "third"),
        ])
    });
    let orchestrator = Orchestrator::new(doc.clone(), engine);

    let report = orchestrator.run().await.unwrap();

    let markers = doc.markers();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].range, TextRange::single(0, 0));
    assert_eq!(markers[0].messages(), vec!["first", "second"]);
    assert_eq!(markers[1].range, TextRange::single(0, 2));
    assert_eq!(markers[1].title, "third;");

    let ParagraphOutcome::Linted(issues) = &report.paragraphs[0].outcome else {
        panic!("Expected Linted, got {:?}", report.paragraphs[0].outcome);
    };
    let accumulated: Vec<bool> = issues
        .iter()
        .map(|i| match i.outcome {
            IssueOutcome::Annotated { accumulated, .. } => accumulated,
            IssueOutcome::ResolutionFailure(_) => panic!("Unexpected resolution failure"),
        })
        .collect();
    assert_eq!(accumulated, vec![false, true, false]);
}

#[tokio::test]
async fn test_unresolvable_issue_is_skipped() {
    let doc = MemoryDocument::new(["one line"]);
    let engine =
        FnEngine::new(|_: &str| Ok(vec![issue(1, 2, "ok"), issue(4, 1, "no such line")]));
    let orchestrator = Orchestrator::new(doc.clone(), engine);

    let report = orchestrator.run().await.unwrap();

    assert!(report.is_complete());
    assert_eq!(report.annotated_count(), 1);
    let failures = report.resolution_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].1.message, "no such line");
    assert_eq!(
        failures[0].2,
        &ResolveError::LineOutOfRange { line: 4, lines: 1 }
    );
    assert_eq!(doc.markers().len(), 1);
}

#[tokio::test]
async fn test_soft_breaks_resolve_to_their_line() {
    let doc = MemoryDocument::from_plain_text("first line\nsecond line");
    let engine = FnEngine::new(|_: &str| Ok(vec![issue(2, 1, "s")]));
    let orchestrator = Orchestrator::new(doc.clone(), engine);

    orchestrator.run().await.unwrap();

    assert_eq!(
        marker_state(&doc),
        vec![(TextRange::single(0, 11), "s;".to_string())]
    );
}

#[tokio::test]
async fn test_engine_failure_is_scoped_to_one_paragraph() {
    let doc = MemoryDocument::new(["zero", "one", "FAIL two", "three"]);
    let orchestrator = Orchestrator::new(doc.clone(), first_char_engine());

    let report = orchestrator.run().await.unwrap();

    assert!(report.is_complete());
    assert_eq!(report.paragraphs.len(), 4);
    assert_eq!(
        report.engine_failures(),
        vec![(2, &EngineError::rule("test", "cannot lint"))]
    );
    let annotated: Vec<usize> = doc.markers().iter().map(|m| m.range.paragraph).collect();
    assert_eq!(annotated, vec![0, 1, 3]);
}

#[tokio::test]
async fn test_clear_then_silent_run_leaves_nothing() {
    let doc = MemoryDocument::new(["text", "more text"]);
    Orchestrator::new(doc.clone(), first_char_engine())
        .run()
        .await
        .unwrap();
    assert_eq!(doc.markers().len(), 2);

    let orchestrator = Orchestrator::new(doc.clone(), silent_engine());
    orchestrator.clear().await.unwrap();
    let report = orchestrator.run().await.unwrap();

    assert_eq!(report.annotated_count(), 0);
    assert!(doc.markers().is_empty());
    assert!(doc.highlighted_ranges().is_empty());
}

#[tokio::test]
async fn test_run_then_clear_leaves_no_trace() {
    let doc = MemoryDocument::new(["AのAがBも", "second"]);
    let orchestrator = Orchestrator::new(doc.clone(), first_char_engine());

    orchestrator.run().await.unwrap();
    let summary = orchestrator.clear().await.unwrap();

    assert_eq!(summary.markers_removed, 2);
    assert!(doc.markers().is_empty());
    assert!(doc.highlighted_ranges().is_empty());
    assert_eq!(doc.paragraph_text(0).as_deref(), Some("AのAがBも"));
    assert_eq!(doc.paragraph_text(1).as_deref(), Some("second"));
}

#[tokio::test]
async fn test_run_twice_matches_clear_then_run() {
    let texts = ["AのAがBも", "", "second\nline"];
    let engine = || FnEngine::new(|_: &str| Ok(vec![issue(1, 1, "a"), issue(1, 1, "b")]));

    let twice = MemoryDocument::new(texts);
    let orchestrator = Orchestrator::new(twice.clone(), engine());
    orchestrator.run().await.unwrap();
    let second = orchestrator.run().await.unwrap();
    assert_eq!(second.cleared.markers_removed, 2);

    let cleared = MemoryDocument::new(texts);
    let orchestrator = Orchestrator::new(cleared.clone(), engine());
    orchestrator.clear().await.unwrap();
    orchestrator.run().await.unwrap();

    assert_eq!(marker_state(&twice), marker_state(&cleared));
    assert_eq!(twice.highlighted_ranges(), cleared.highlighted_ranges());
    assert_eq!(marker_state(&twice)[0].1, "a;b;");
}

#[tokio::test]
async fn test_overlapping_ranges_last_highlight_wins() {
    let doc = MemoryDocument::new(["abcdef"]);
    let yellow = Annotator::default().with_color(HighlightColor::Yellow);
    let pink = Annotator::default().with_color(HighlightColor::Pink);

    yellow
        .annotate(&doc, TextRange::new(0, 0, 4), "wide")
        .await
        .unwrap();
    pink.annotate(&doc, TextRange::new(0, 2, 6), "later")
        .await
        .unwrap();

    assert_eq!(
        doc.highlighted_ranges(),
        vec![
            (TextRange::new(0, 0, 2), HighlightColor::Yellow),
            (TextRange::new(0, 2, 6), HighlightColor::Pink),
        ]
    );
    assert_eq!(
        marker_state(&doc),
        vec![
            (TextRange::new(0, 0, 4), "wide;".to_string()),
            (TextRange::new(0, 2, 6), "later;".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_sync_failure_aborts_remaining_units() {
    // Clearing syncs twice; every issue then syncs once to resolve and once
    // to annotate. The sixth sync is the second paragraph's annotation.
    let doc = FaultyDocument::new(MemoryDocument::new(["zero", "one", "two"])).fail_sync_at(6);
    let orchestrator = Orchestrator::new(doc, first_char_engine());

    let report = orchestrator.run().await.unwrap();

    assert!(!report.is_complete());
    assert!(matches!(report.aborted, Some(AnnotateError::Sync(_))));
    assert_eq!(report.paragraphs.len(), 2);
    assert_eq!(report.annotated_count(), 1);

    let committed = orchestrator.host().document();
    assert_eq!(
        marker_state(committed),
        vec![(TextRange::single(0, 0), "starts zero;".to_string())]
    );
    assert_eq!(committed.pending_writes(), 0);
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
}

#[tokio::test]
async fn test_document_lost_mid_run_keeps_flushed_work() {
    let doc =
        FaultyDocument::new(MemoryDocument::new(["zero", "one", "two"])).unavailable_after_syncs(4);
    let orchestrator = Orchestrator::new(doc, first_char_engine());

    let report = orchestrator.run().await.unwrap();

    assert!(matches!(
        report.aborted,
        Some(AnnotateError::DocumentUnavailable(_))
    ));
    assert_eq!(report.annotated_count(), 1);
    assert_eq!(orchestrator.host().document().markers().len(), 1);
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
}

#[tokio::test]
async fn test_unreadable_document_fails_before_any_unit() {
    // The first read belongs to clearing, the second to enumeration.
    let doc = FaultyDocument::new(MemoryDocument::new(["zero"])).fail_paragraph_read_at(2);
    let orchestrator = Orchestrator::new(doc, first_char_engine());

    let err = orchestrator.run().await.unwrap_err();

    assert!(matches!(err, AnnotateError::DocumentUnavailable(_)));
    assert!(orchestrator.host().document().markers().is_empty());
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
}

/// Engine that blocks until released.
struct GatedEngine {
    gate: Notify,
}

#[async_trait]
impl LintEngine for GatedEngine {
    async fn lint(&self, _text: &str, _kind: ContentKind) -> Result<LintOutput, EngineError> {
        self.gate.notified().await;
        Ok(LintOutput::default())
    }
}

#[tokio::test]
async fn test_second_pass_while_running_is_busy() {
    let orchestrator = Orchestrator::new(
        MemoryDocument::new(["text"]),
        GatedEngine {
            gate: Notify::new(),
        },
    );

    let (first, second) = tokio::join!(orchestrator.run(), async {
        while orchestrator.state() != (OrchestratorState::Linting { paragraph: 0 }) {
            tokio::task::yield_now().await;
        }
        let busy_run = orchestrator.run().await;
        let busy_clear = orchestrator.clear().await;
        orchestrator.engine().gate.notify_one();
        (busy_run, busy_clear)
    });

    assert!(first.unwrap().is_complete());
    assert_eq!(second.0.unwrap_err(), AnnotateError::Busy);
    assert_eq!(second.1.unwrap_err(), AnnotateError::Busy);
    assert_eq!(orchestrator.state(), OrchestratorState::Idle);
}

#[tokio::test]
async fn test_foreign_markers_survive_passes() {
    let doc = MemoryDocument::new(["text"]);
    let foreign = MarkerTag::new("com.example", "review").unwrap();
    doc.insert_marker(TextRange::new(0, 0, 4), foreign.clone())
        .unwrap();
    doc.sync().await.unwrap();

    let orchestrator = Orchestrator::new(doc.clone(), first_char_engine());
    orchestrator.run().await.unwrap();
    orchestrator.clear().await.unwrap();

    let markers = doc.markers();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].tag, foreign);
}

#[tokio::test]
async fn test_configured_kernel_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("terms.txt"), "ユーザ\n").unwrap();
    let config_path = dir.path().join(".tsuzumark.jsonc");
    fs::write(
        &config_path,
        r#"{
            "rules": [
                { "id": "no-todo", "rule": "pattern", "options": { "patterns": ["TODO"] } },
                { "id": "terms", "rule": "pattern",
                  "options": { "dictionary": "terms.txt", "message": "Use ユーザー, not {match}" } }
            ],
            "highlight": "yellow",
            "removal": "with-content"
        }"#,
    )
    .unwrap();

    let config = AnnotatorConfig::from_file(&config_path).unwrap();
    let kernel = RuleKernel::from_config(&config, &RuleRegistry::builtin()).unwrap();
    let doc = MemoryDocument::from_plain_text("TODO: ユーザ設定\nユーザー一覧");
    let orchestrator = Orchestrator::new(doc.clone(), kernel)
        .with_annotator(config.annotator())
        .with_content_kind(config.content_kind);

    let report = orchestrator.run().await.unwrap();

    assert_eq!(report.annotated_count(), 3);
    let issues: Vec<(&str, u32, u32)> = report
        .issues()
        .map(|(_, i)| (i.issue.rule_id.as_str(), i.issue.line, i.issue.column))
        .collect();
    assert_eq!(
        issues,
        vec![("no-todo", 1, 1), ("terms", 1, 7), ("terms", 2, 1)]
    );
    assert_eq!(
        marker_state(&doc),
        vec![
            (TextRange::single(0, 0), "Found \"TODO\";".to_string()),
            (TextRange::single(0, 6), "Use ユーザー, not ユーザ;".to_string()),
            (TextRange::single(0, 12), "Use ユーザー, not ユーザ;".to_string()),
        ]
    );
    assert_eq!(doc.highlight_at(0, 6), Some(HighlightColor::Yellow));

    assert_eq!(config.removal, MarkerRemoval::WithContent);
    orchestrator.clear().await.unwrap();
    assert_eq!(doc.paragraph_text(0).as_deref(), Some("ODO: ーザ設定\nーザー一覧"));
}

#[tokio::test]
async fn test_failed_annotation_leaves_no_highlight() {
    let doc = FaultyDocument::new(MemoryDocument::new(["abcd"])).fail_insert_marker_at(1);
    let engine = FnEngine::new(|_: &str| Ok(vec![issue(1, 1, "first"), issue(1, 3, "third")]));
    let orchestrator = Orchestrator::new(doc, engine);

    let report = orchestrator.run().await.unwrap();

    assert!(report.is_complete());
    assert_eq!(report.annotated_count(), 1);
    let failures = report.resolution_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].1.message, "first");
    assert!(matches!(failures[0].2, ResolveError::Document(_)));

    let committed = orchestrator.host().document();
    assert_eq!(
        marker_state(committed),
        vec![(TextRange::single(0, 2), "third;".to_string())]
    );
    assert_eq!(
        committed.highlighted_ranges(),
        vec![(TextRange::single(0, 2), HighlightColor::Turquoise)]
    );
    assert_eq!(committed.pending_writes(), 0);
}
